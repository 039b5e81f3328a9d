//! CLI commands for signing in and registering

use clap::Args;

use crate::config::AuthSettings;
use crate::error::FinanceResult;
use crate::models::User;
use crate::services::{AuthRequest, Authenticator, SimulatedAuthBackend};

#[derive(Args, Debug)]
pub struct LoginArgs {
    #[arg(short, long)]
    pub email: String,

    #[arg(short, long, env = "CONTACERTA_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Skip the simulated network delay
    #[arg(long)]
    pub no_delay: bool,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(short, long)]
    pub name: String,

    #[arg(short, long)]
    pub email: String,

    #[arg(short, long, env = "CONTACERTA_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Password confirmation
    #[arg(short, long)]
    pub confirm: String,

    /// Skip the simulated network delay
    #[arg(long)]
    pub no_delay: bool,
}

fn authenticator(settings: &AuthSettings, no_delay: bool) -> Authenticator<SimulatedAuthBackend> {
    let backend = if no_delay {
        SimulatedAuthBackend::instant()
    } else {
        SimulatedAuthBackend::from_settings(settings)
    };
    Authenticator::new(backend, settings)
}

pub async fn handle_login_command(settings: &AuthSettings, args: LoginArgs) -> FinanceResult<User> {
    let auth = authenticator(settings, args.no_delay);
    let user = auth
        .authenticate(&AuthRequest::login(args.email, args.password))
        .await?;

    println!("Bem-vindo de volta, {}!", user.name);
    println!("Email: {}", user.email);
    Ok(user)
}

pub async fn handle_register_command(
    settings: &AuthSettings,
    args: RegisterArgs,
) -> FinanceResult<User> {
    let auth = authenticator(settings, args.no_delay);
    let request = AuthRequest::register(args.name, args.email, args.password, args.confirm);
    let user = auth.authenticate(&request).await?;

    println!("Bem-vindo ao ContaCerta, {}!", user.name);
    println!("Email: {}", user.email);
    Ok(user)
}
