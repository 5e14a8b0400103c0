//! Account commands: `login`, `register`, `whoami`.

use anyhow::Result;
use radport_client::Registration;

use super::output::print_profile;
use super::{build_client, build_session};
use crate::cli::args::{ConnectionArgs, LoginArgs, RegisterArgs};
use crate::exit_codes::SUCCESS;

pub async fn cmd_login(conn: &ConnectionArgs, args: LoginArgs) -> Result<i32> {
    let client = build_client(conn)?;
    let (session, profile) = client.login(&args.email, &args.password).await?;

    eprintln!("Signed in as {} ({})", profile.name, args.email);
    // stdout carries only the cookie so it can be captured into RADPORT_COOKIE
    println!("{}", session.to_cookie_header());
    Ok(SUCCESS)
}

pub async fn cmd_register(conn: &ConnectionArgs, args: RegisterArgs) -> Result<i32> {
    let registration = Registration {
        full_name: args.name,
        age: args.age,
        role: args.account_role,
        identification: args.identification,
        email: args.email,
        password: args.password,
        accepts_data_processing: args.accept_data_processing,
    };

    let client = build_client(conn)?;
    let profile = client.register(&registration).await?;
    println!("Account created");
    print_profile(&profile);
    Ok(SUCCESS)
}

pub async fn cmd_whoami(conn: &ConnectionArgs) -> Result<i32> {
    let client = build_client(conn)?;
    let session = build_session(conn);
    let profile = client.current_user(&session).await?;
    print_profile(&profile);
    Ok(SUCCESS)
}
