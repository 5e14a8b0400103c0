//! Terminal rendering for case data.

use radport_client::{format_timestamp, CaseCounts, CaseRecord, PreDiagnostic, UserProfile, Urgency};

pub fn urgency_label(urgency: Urgency) -> &'static str {
    match urgency {
        Urgency::Urgent => "URGENT",
        Urgency::Routine => "routine",
    }
}

fn probability(p: Option<f64>) -> String {
    p.map(|p| format!("{:.1}%", p * 100.0))
        .unwrap_or_else(|| "-".to_string())
}

pub fn print_case_table(cases: &[CaseRecord]) {
    if cases.is_empty() {
        println!("No cases.");
        return;
    }

    println!(
        "{:<20} {:<10} {:<18} {:<10} {:<8} {:<12} {:>7}",
        "ID", "PATIENT", "UPLOADED", "STATUS", "URGENCY", "FINDING", "PROB"
    );
    for case in cases {
        let label = case
            .model_result
            .as_ref()
            .and_then(|m| m.label.as_deref())
            .unwrap_or("-");
        println!(
            "{:<20} {:<10} {:<18} {:<10} {:<8} {:<12} {:>7}",
            case.id,
            case.patient_id.as_deref().unwrap_or("-"),
            format_timestamp(&case.uploaded_at),
            case.status,
            urgency_label(case.urgency()),
            label,
            probability(case.pneumonia_probability()),
        );
    }
}

pub fn print_counts(counts: &CaseCounts) {
    eprintln!(
        "{} cases: {} uploaded, {} processed, {} validated ({} urgent)",
        counts.total, counts.uploaded, counts.processed, counts.validated, counts.urgent
    );
}

pub fn print_prediagnostic(pd: &PreDiagnostic) {
    println!("Prediagnostic {}", pd.id);
    println!("  Patient:   {}", pd.patient_id.as_deref().unwrap_or("-"));
    println!("  Uploaded:  {}", format_timestamp(&pd.uploaded_at));
    println!("  Status:    {}", pd.status);
    println!("  Urgency:   {}", urgency_label(pd.urgency()));
    if let Some(url) = &pd.image_url {
        println!("  Image:     {}", url);
    }
    match &pd.model_result {
        Some(model) => {
            println!(
                "  Finding:   {} ({:?})",
                model.label.as_deref().unwrap_or("-"),
                model.finding()
            );
            println!("  Pneumonia: {}", probability(model.pneumonia_probability));
        }
        None => println!("  Model result not available yet"),
    }
}

pub fn print_profile(profile: &UserProfile) {
    println!("id:    {}", profile.id);
    println!("name:  {}", profile.name);
    println!("email: {}", profile.email);
    println!(
        "role:  {}",
        profile
            .role
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
}
