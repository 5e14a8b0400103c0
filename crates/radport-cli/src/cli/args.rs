use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use radport_client::Role;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "radport",
    version,
    about = "Radiograph portal client: list cases, read prediagnostics, record doctor reviews"
)]
pub struct Cli {
    #[command(flatten)]
    pub conn: ConnectionArgs,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the signed-in user's cases
    Cases(CasesArgs),
    /// List cases awaiting doctor review
    Pending(PendingArgs),
    /// Show one prediagnostic
    Prediagnostic(PrediagnosticArgs),
    /// Record a doctor review for a prediagnostic
    Diagnose(DiagnoseArgs),
    /// Upload a radiograph image
    Upload(UploadArgs),
    /// Sign in and print the session cookie
    Login(LoginArgs),
    /// Create an account
    Register(RegisterArgs),
    /// Show who the current token belongs to
    Whoami,
    Version,
}

/// Backend and session settings shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Backend base URL
    #[arg(long, global = true, env = "RADPORT_URL")]
    pub url: Option<String>,

    /// Bearer token
    #[arg(long, global = true, env = "RADPORT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// User role (paciente or doctor)
    #[arg(long, global = true, env = "RADPORT_ROLE")]
    pub role: Option<Role>,

    /// Cookie header holding auth-token and user-role (as printed by `radport login`)
    #[arg(long, global = true, env = "RADPORT_COOKIE", hide_env_values = true)]
    pub cookie: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "RADPORT_TIMEOUT")]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON document
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct CasesArgs {
    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Show placeholder cases instead of failing when the backend is unavailable
    #[arg(long)]
    pub placeholder_on_error: bool,

    /// Only list urgent cases
    #[arg(long)]
    pub urgent: bool,
}

#[derive(Args, Debug, Clone)]
pub struct PendingArgs {
    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Args, Debug, Clone)]
pub struct PrediagnosticArgs {
    /// Prediagnostic ID
    #[arg(value_name = "ID")]
    pub id: String,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Args, Debug, Clone)]
#[command(group(ArgGroup::new("decision").required(true).args(["approve", "reject"])))]
pub struct DiagnoseArgs {
    /// Prediagnostic ID
    #[arg(value_name = "ID")]
    pub id: String,

    /// Agree with the model result
    #[arg(long)]
    pub approve: bool,

    /// Disagree with the model result
    #[arg(long)]
    pub reject: bool,

    /// Medical comment (10 to 1000 characters)
    #[arg(long, short = 'm')]
    pub comment: String,
}

#[derive(Args, Debug, Clone)]
pub struct UploadArgs {
    /// Image file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Content type (guessed from the extension when omitted)
    #[arg(long)]
    pub content_type: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long, env = "RADPORT_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Args, Debug, Clone)]
pub struct RegisterArgs {
    /// Full name
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long, env = "RADPORT_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Account role (paciente or doctor)
    #[arg(long = "as", value_name = "ROLE")]
    pub account_role: Role,

    #[arg(long)]
    pub age: u32,

    /// National identification number
    #[arg(long)]
    pub identification: String,

    /// Consent to personal data processing
    #[arg(long)]
    pub accept_data_processing: bool,
}
