use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fundwise::core::log::init_logging;
use fundwise::core::session::OAuthProvider;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for fundwise::AppCommand {
    fn from(cmd: Commands) -> fundwise::AppCommand {
        match cmd {
            Commands::Login { email, password } => fundwise::AppCommand::Login { email, password },
            Commands::Signup {
                name,
                email,
                password,
                agree_terms,
            } => fundwise::AppCommand::Signup(fundwise::cli::auth::SignupArgs {
                name,
                email,
                password,
                agree_terms: agree_terms.then_some(true),
            }),
            Commands::Oauth { provider } => fundwise::AppCommand::OAuth(provider),
            Commands::Logout => fundwise::AppCommand::Logout,
            Commands::Whoami => fundwise::AppCommand::WhoAmI,
            Commands::Search { query } => fundwise::AppCommand::Search {
                query: query.join(" "),
            },
            Commands::Fund { scheme_code } => fundwise::AppCommand::Fund { scheme_code },
            Commands::Save { scheme_code } => fundwise::AppCommand::Save { scheme_code },
            Commands::Remove { scheme_code } => fundwise::AppCommand::Remove { scheme_code },
            Commands::Saved { refresh } => fundwise::AppCommand::Saved { refresh },
            Commands::Shell => fundwise::AppCommand::Shell,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Sign in with email and password
    Login {
        #[arg(short, long)]
        email: Option<String>,
        /// Prompted for when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Create an account
    Signup {
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
        /// Prompted for (twice) when omitted
        #[arg(short, long)]
        password: Option<String>,
        /// Agree to the terms and conditions; asked for when omitted
        #[arg(long)]
        agree_terms: bool,
    },
    /// Sign in with Google or GitHub
    Oauth {
        #[arg(value_parser = parse_provider)]
        provider: OAuthProvider,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Search funds by name; lists popular funds without a query
    Search { query: Vec<String> },
    /// Show fund details and recent NAV history
    Fund { scheme_code: String },
    /// Save a fund to your list
    Save { scheme_code: String },
    /// Remove a fund from your list
    Remove { scheme_code: String },
    /// List saved funds
    Saved {
        /// Fetch the latest NAV for each saved fund
        #[arg(short, long)]
        refresh: bool,
    },
    /// Start an interactive session
    Shell,
}

fn parse_provider(s: &str) -> Result<OAuthProvider, String> {
    s.parse().map_err(|e: anyhow::Error| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    let result = match cli.command {
        Some(Commands::Setup) => fundwise::cli::setup::setup(),
        Some(cmd) => fundwise::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
