use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::error::Error;
use crate::core::state::AppState;
use crate::nav::menu;
use crate::routes::guard::HistoryNavigator;
use crate::routes::table;
use crate::types::user::{Credentials, Identity, Registration};

#[derive(Parser)]
#[command(name = "warehouse-portal")]
#[command(about = "Session client for the warehouse rental portal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML configuration file, overridden by PORTAL_* variables
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Log in and store the access token
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "PORTAL_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create a customer account
    Register {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "PORTAL_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(short, long)]
        username: Option<String>,

        #[arg(long)]
        phone: Option<String>,
    },

    /// Forget the stored access token
    Logout,

    /// Show who is logged in
    Status,

    /// Fetch the profile and fill in the role
    Profile,

    /// List the navigation entries for the current session
    Menu,

    /// Navigate to a path through the route guards
    Open { path: String },
}

pub async fn execute(state: &AppState, command: Command) -> Result<(), Error> {
    let session = state.session.as_ref();

    match command {
        Command::Login { email, password } => {
            let result = session.login(&Credentials::new(email, password)).await?;

            println!("{}", describe(&Identity::new(result.username, result.role)));
        }
        Command::Register {
            email,
            password,
            username,
            phone,
        } => {
            state
                .users()
                .register(&Registration {
                    email,
                    password,
                    username,
                    phone,
                })
                .await?;

            println!("Registered, you can now log in");
        }
        Command::Logout => {
            session.logout();

            println!("Logged out");
        }
        Command::Status => match session.reconcile().identity() {
            Some(identity) => println!("{}", describe(identity)),
            None => println!("Not logged in"),
        },
        Command::Profile => {
            let identity = session.refresh_profile().await?.ok_or(Error::NotLoggedIn)?;

            println!("{}", describe(&identity));
        }
        Command::Menu => {
            let current = session.reconcile();

            for entry in menu::menu_for(current.identity()) {
                println!("{:<20} {}", entry.path, entry.label);
            }
        }
        Command::Open { path } => {
            let route = table::classify(&path);

            let rendered = match route.category.guard() {
                Some(guard) => {
                    let navigator = HistoryNavigator::new();

                    match guard.render(session, &state.landing, &navigator, || route.page) {
                        Some(page) => Ok(page),
                        None => Err(navigator.last().unwrap_or_default()),
                    }
                }
                None => Ok(route.page),
            };

            match rendered {
                Ok(page) => println!("{path} -> {page}"),
                Err(target) => println!("{path} -> redirect {target}"),
            }
        }
    }

    Ok(())
}

fn describe(identity: &Identity) -> String {
    match identity.role {
        Some(role) => format!("Logged in as {} ({})", identity.username, role),
        None => format!("Logged in as {}", identity.username),
    }
}
