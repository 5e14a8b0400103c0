//! `radport cases` and `radport pending` - case listings.

use anyhow::Result;
use radport_client::{CaseCounts, CaseFeed, CaseRecord, CaseView, FeedSource, Urgency};

use super::output::{print_case_table, print_counts};
use super::{build_client, build_session};
use crate::cli::args::{CasesArgs, ConnectionArgs, OutputFormat, PendingArgs};
use crate::exit_codes::SUCCESS;

pub async fn cmd_cases(conn: &ConnectionArgs, args: CasesArgs) -> Result<i32> {
    let client = build_client(conn)?;
    let session = build_session(conn);

    let feed = if args.placeholder_on_error {
        client.fetch_cases_or_placeholder(&session).await
    } else {
        CaseFeed::Live(client.list_cases(&session).await?)
    };

    let mut view = CaseView::new();
    let ticket = view.begin_refresh();
    view.apply(ticket, feed);

    if let Some(reason) = view.error() {
        eprintln!("warning: {} (showing placeholder data)", reason);
    }

    let cases: Vec<CaseRecord> = if args.urgent {
        view.urgent().cloned().collect()
    } else {
        view.cases().to_vec()
    };

    // counts describe exactly the listed cases
    render(&cases, view.source(), CaseCounts::of(&cases), args.format)?;
    Ok(SUCCESS)
}

pub async fn cmd_pending(conn: &ConnectionArgs, args: PendingArgs) -> Result<i32> {
    let client = build_client(conn)?;
    let session = build_session(conn);

    let mut cases = client.list_pending_cases(&session).await?;
    // urgent first, highest probability first
    cases.sort_by(|a, b| {
        let rank = |c: &CaseRecord| {
            (
                c.urgency() == Urgency::Routine,
                -c.pneumonia_probability().unwrap_or(0.0),
            )
        };
        rank(a)
            .partial_cmp(&rank(b))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut view = CaseView::new();
    let ticket = view.begin_refresh();
    view.apply(ticket, CaseFeed::Live(cases));

    render(view.cases(), view.source(), view.counts(), args.format)?;
    Ok(SUCCESS)
}

fn render(
    cases: &[CaseRecord],
    source: FeedSource,
    counts: CaseCounts,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Table => {
            print_case_table(cases);
            print_counts(&counts);
        }
        OutputFormat::Json => {
            let cases: Vec<_> = cases
                .iter()
                .map(|c| -> Result<serde_json::Value, serde_json::Error> {
                    let mut value = serde_json::to_value(c)?;
                    value["urgency"] = serde_json::to_value(c.urgency())?;
                    Ok(value)
                })
                .collect::<Result<_, _>>()?;
            let doc = serde_json::json!({
                "source": source,
                "counts": counts,
                "cases": cases,
            });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
    }
    Ok(())
}
