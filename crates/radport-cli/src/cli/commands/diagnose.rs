use anyhow::Result;
use radport_client::{Approval, DiagnosticPayload, PortalError};

use super::{build_client, build_session};
use crate::cli::args::{ConnectionArgs, DiagnoseArgs};
use crate::exit_codes::{NOT_FOUND, SUCCESS};

pub async fn run(conn: &ConnectionArgs, args: DiagnoseArgs) -> Result<i32> {
    let approval = if args.approve {
        Approval::Approve
    } else {
        Approval::Reject
    };
    let payload = DiagnosticPayload::new(approval, args.comment);

    // Reject a bad form before touching the network or the config.
    let errors = payload.validate();
    if !errors.is_empty() {
        return Err(PortalError::Validation { errors }.into());
    }

    let client = build_client(conn)?;
    let session = build_session(conn);
    let receipt = client.create_diagnostic(&session, &args.id, &payload).await?;

    if receipt.success {
        println!("{}", receipt.message);
        Ok(SUCCESS)
    } else {
        eprintln!("Diagnostic not accepted: {}", receipt.message);
        Ok(NOT_FOUND)
    }
}
