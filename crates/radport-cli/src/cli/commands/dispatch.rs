use super::super::args::*;
use crate::exit_codes::SUCCESS;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    let conn = cli.conn;
    match cli.cmd {
        Command::Cases(args) => super::cases::cmd_cases(&conn, args).await,
        Command::Pending(args) => super::cases::cmd_pending(&conn, args).await,
        Command::Prediagnostic(args) => super::prediagnostic::run(&conn, args).await,
        Command::Diagnose(args) => super::diagnose::run(&conn, args).await,
        Command::Upload(args) => super::upload::run(&conn, args).await,
        Command::Login(args) => super::login::cmd_login(&conn, args).await,
        Command::Register(args) => super::login::cmd_register(&conn, args).await,
        Command::Whoami => super::login::cmd_whoami(&conn).await,
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(SUCCESS)
        }
    }
}
