use anyhow::Result;

use super::output::print_prediagnostic;
use super::{build_client, build_session};
use crate::cli::args::{ConnectionArgs, OutputFormat, PrediagnosticArgs};
use crate::exit_codes::{NOT_FOUND, SUCCESS};

pub async fn run(conn: &ConnectionArgs, args: PrediagnosticArgs) -> Result<i32> {
    let client = build_client(conn)?;
    let session = build_session(conn);

    let Some(pd) = client.get_prediagnostic(&session, &args.id).await? else {
        eprintln!("No prediagnostic found for {}", args.id);
        return Ok(NOT_FOUND);
    };

    match args.format {
        OutputFormat::Table => print_prediagnostic(&pd),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&pd)?),
    }
    Ok(SUCCESS)
}
