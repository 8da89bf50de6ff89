//! `gymdesk` command line
//!
//! Admin console for gym membership records: log in, list and filter
//! members, inspect one member, and edit, renew or delete memberships.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use gymdesk_client::{ApiClient, FileSessionStore};
use gymdesk_console::commands::{self, MemberChanges, Report};
use gymdesk_console::prompt::{self, FixedAnswer, TerminalConfirm};
use gymdesk_console::routes::{Access, Route, RouteGuard};
use gymdesk_core::{Config, Credentials, MemberFilter, MemberId, MemberStatus, PlanType, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};

/// Command line interface for the membership console
#[derive(Parser)]
#[command(
    name = "gymdesk",
    version = env!("CARGO_PKG_VERSION"),
    about = "Admin console for gym membership records"
)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Enable structured JSON logging
    #[arg(long, global = true)]
    json: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session token
    Login {
        /// Admin user name
        #[arg(short, long)]
        username: String,

        /// Password; prompted for when omitted
        #[arg(short, long, env = "GYMDESK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored session token
    Logout,

    /// Manage members
    Members {
        /// Member subcommand
        #[command(subcommand)]
        action: MemberCommands,
    },
}

/// Member management commands
#[derive(Subcommand)]
enum MemberCommands {
    /// List members
    List {
        /// Name substring, case-insensitive
        #[arg(short, long)]
        search: Option<String>,

        /// Only members with this status (Active, Expired)
        #[arg(long)]
        status: Option<MemberStatus>,

        /// Only members on this plan (Monthly, Quarterly, Yearly)
        #[arg(long)]
        plan: Option<PlanType>,
    },

    /// Show one member with membership and attendance history
    Show {
        /// Member ID
        #[arg(value_name = "ID")]
        id: MemberId,
    },

    /// Change member fields; unset fields keep their value
    Update {
        /// Member ID
        #[arg(value_name = "ID")]
        id: MemberId,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New phone number
        #[arg(long)]
        phone: Option<String>,

        /// New email; pass an empty string to clear
        #[arg(long)]
        email: Option<String>,

        /// New plan
        #[arg(long)]
        plan: Option<PlanType>,

        /// New membership start (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        start_date: Option<NaiveDate>,

        /// New membership end (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        end_date: Option<NaiveDate>,
    },

    /// Set a new membership end date
    Renew {
        /// Member ID
        #[arg(value_name = "ID")]
        id: MemberId,

        /// New end date (YYYY-MM-DD); defaults to the current end date
        #[arg(long, value_name = "DATE")]
        end_date: Option<String>,
    },

    /// Delete a member
    Delete {
        /// Member ID
        #[arg(value_name = "ID")]
        id: MemberId,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Main entry point for the console
///
/// # Errors
///
/// Returns error if configuration, logging or session storage fail
#[tokio::main]
async fn main() -> Result<ExitCode> {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = Config::load_from(cli.config.as_deref())?;

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    let format = if cli.json {
        "json"
    } else {
        config.logging.format.as_str()
    };
    gymdesk_core::init_logging(&level, format)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        api = %config.api.base_url,
        "gymdesk starting"
    );

    let report = run(cli.command, &config).await?;
    print!("{}", report.text);

    Ok(if report.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Dispatch one command
///
/// # Errors
///
/// Returns error if the HTTP client cannot be built or the session store fails
async fn run(command: Commands, config: &Config) -> Result<Report> {
    let store = FileSessionStore::from_config(&config.session);
    debug!(path = %store.path().display(), "session store");

    match command {
        Commands::Login { username, password } => {
            let password = match password {
                Some(password) => password,
                None => prompt::read_password()?,
            };
            let client = ApiClient::from_config(&config.api)?;
            Ok(commands::login(client, store, &Credentials::new(username, password)).await)
        }
        Commands::Logout => commands::logout(&store),
        Commands::Members { action } => {
            let route = match &action {
                MemberCommands::Show { id } => Route::MemberDetail(id.clone()),
                _ => Route::Members,
            };

            let client = match RouteGuard::new(store).check(&route)? {
                Access::Granted(session) => {
                    ApiClient::from_config(&config.api)?.with_session(session)
                }
                Access::Open => ApiClient::from_config(&config.api)?,
                Access::Redirect(to) => {
                    return Ok(Report {
                        text: format!(
                            "Not logged in. Run `gymdesk login --username <name>` first ({to}).\n"
                        ),
                        success: false,
                    });
                }
            };

            Ok(run_member_command(action, &Arc::new(client)).await)
        }
    }
}

/// Run a member command against an authenticated client
async fn run_member_command(action: MemberCommands, client: &Arc<ApiClient>) -> Report {
    match action {
        MemberCommands::List {
            search,
            status,
            plan,
        } => {
            let filter = MemberFilter {
                search: search.and_then(gymdesk_core::types::normalize_search),
                status,
                plan_type: plan,
            };
            commands::list_members(client, filter).await
        }
        MemberCommands::Show { id } => commands::show_member(client, id).await,
        MemberCommands::Update {
            id,
            name,
            phone,
            email,
            plan,
            start_date,
            end_date,
        } => {
            let changes = MemberChanges {
                name,
                phone,
                email,
                plan_type: plan,
                start_date,
                end_date,
            };
            commands::update_member(client, &id, &changes).await
        }
        MemberCommands::Renew { id, end_date } => {
            commands::renew_member(client, &id, end_date.as_deref()).await
        }
        MemberCommands::Delete { id, yes } => {
            if yes {
                commands::delete_member(client, &id, &FixedAnswer::YES).await
            } else {
                commands::delete_member(client, &id, &TerminalConfirm).await
            }
        }
    }
}
