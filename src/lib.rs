pub mod cli;
pub mod controller;
pub mod core;
pub mod providers;
pub mod store;

use crate::controller::Controller;
use crate::core::bookmarks::BookmarkStore;
use crate::core::config::AppConfig;
use crate::core::session::OAuthProvider;
use crate::core::storage::Storage;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Login {
        email: Option<String>,
        password: Option<String>,
    },
    Signup(cli::auth::SignupArgs),
    OAuth(OAuthProvider),
    Logout,
    WhoAmI,
    Search {
        query: String,
    },
    Fund {
        scheme_code: String,
    },
    Save {
        scheme_code: String,
    },
    Remove {
        scheme_code: String,
    },
    Saved {
        refresh: bool,
    },
    Shell,
}

/// Wires the mock session store, the mfapi directory and the bookmark store
/// over `storage`.
pub fn build_controller(config: &AppConfig, storage: Arc<dyn Storage>) -> Controller {
    let session = providers::mock_auth::MockAuthProvider::new(
        Arc::clone(&storage),
        config.auth.clone(),
    );
    let directory = providers::mfapi_provider::MfApiProvider::new(config.mfapi_base_url());
    Controller::new(
        Arc::new(session),
        Arc::new(directory),
        BookmarkStore::new(storage),
    )
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("FundWise starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let storage = store::open(&config)?;
    let mut controller = build_controller(&config, storage);

    match command {
        AppCommand::Login { email, password } => {
            cli::auth::login(&mut controller, email, password).await
        }
        AppCommand::Signup(args) => cli::auth::signup(&mut controller, args).await,
        AppCommand::OAuth(provider) => cli::auth::oauth(&mut controller, provider).await,
        AppCommand::Logout => {
            cli::auth::logout(&mut controller);
            Ok(())
        }
        AppCommand::WhoAmI => {
            cli::auth::whoami(&controller);
            Ok(())
        }
        AppCommand::Search { query } => cli::funds::search(&controller, &query).await,
        AppCommand::Fund { scheme_code } => cli::funds::show(&controller, &scheme_code).await,
        AppCommand::Save { scheme_code } => cli::funds::save(&mut controller, &scheme_code).await,
        AppCommand::Remove { scheme_code } => {
            cli::funds::remove(&mut controller, &scheme_code);
            Ok(())
        }
        AppCommand::Saved { refresh } => cli::saved::run(&mut controller, refresh).await,
        AppCommand::Shell => cli::shell::run(&mut controller).await,
    }
}
