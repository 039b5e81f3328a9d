use anyhow::Result;
use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use contacerta::cli::{
    handle_login_command, handle_message_command, handle_register_command, handle_replay_command,
    handle_tip_command, LoginArgs, RegisterArgs, ReplayArgs,
};
use contacerta::clock::{Clock, SystemClock};
use contacerta::config::{ContaCertaPaths, Settings};

#[derive(Parser)]
#[command(
    name = "contacerta",
    version,
    about = "Gamified personal finance tracker",
    long_about = "ContaCerta records income and expenses, tracks savings goals and \
                  rewards good habits with levels and achievements. Sessions are \
                  scripted and replayed in memory; nothing is persisted."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a session script and print reports
    Replay(ReplayArgs),

    /// Show a financial tip
    Tip {
        /// Seed for a reproducible pick
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show the motivational message of the day
    Message {
        /// Date to show the message for (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Sign in with the simulated authentication service
    Login(LoginArgs),

    /// Create an account with the simulated authentication service
    Register(RegisterArgs),

    /// Write the default settings file
    Init,

    /// Show current configuration and paths
    Config,
}

fn init_logger(verbose: u8) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        };
        EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let paths = ContaCertaPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    let today = SystemClock.today();

    match cli.command {
        Some(Commands::Replay(args)) => handle_replay_command(settings, args, today)?,
        Some(Commands::Tip { seed }) => handle_tip_command(seed),
        Some(Commands::Message { date }) => handle_message_command(date, today),
        Some(Commands::Login(args)) => {
            handle_login_command(&settings.auth, args).await?;
        }
        Some(Commands::Register(args)) => {
            handle_register_command(&settings.auth, args).await?;
        }
        Some(Commands::Init) => {
            settings.save(&paths)?;
            println!("Settings written to: {}", paths.settings_file().display());
        }
        Some(Commands::Config) => {
            println!("ContaCerta Configuration");
            println!("========================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Export directory: {}", paths.export_dir().display());
            println!("Initialized:      {}", paths.is_initialized());
            println!();
            println!("Settings:");
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        None => {
            println!("ContaCerta - Gamified personal finance tracker");
            println!();
            println!("Run 'contacerta --help' for usage information.");
            println!("Run 'contacerta replay <script>' to replay a session.");
        }
    }

    Ok(())
}
