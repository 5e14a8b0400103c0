use clap::Parser;

mod cli;
pub mod exit_codes;

use cli::args::Cli;
use cli::commands::dispatch;
use radport_client::PortalError;

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();
    let cli = Cli::parse();
    let code = match dispatch(cli).await {
        Ok(code) => code,
        Err(e) => match e.downcast_ref::<PortalError>() {
            Some(portal) => {
                eprintln!("error: {}", portal.user_message());
                tracing::debug!(error = %portal, "command failed");
                portal.exit_code()
            }
            None => {
                eprintln!("fatal: {e:?}");
                exit_codes::INTERNAL_ERROR
            }
        },
    };
    std::process::exit(code);
}
