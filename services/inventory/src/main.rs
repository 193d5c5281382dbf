//! Inventory manager entry point
//!
//! # Usage
//!
//! ```bash
//! # Interactive login and menus
//! inventory
//!
//! # Register a login; the password is prompted for when omitted
//! inventory user add alice
//! printf 'secret\n' | inventory user add alice
//!
//! # Scripted product maintenance
//! inventory product add Widget 10 2.50
//! inventory product update 1 Widget 8 2.75
//! inventory product delete 1
//! inventory product low-stock --threshold 5 --json
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::{self, IsTerminal};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use common::database::{DatabaseConfig, health_check, init_pool};
use inventory::commands;
use inventory::config::AppConfig;
use inventory::models::{NewProduct, parse_price};
use inventory::repositories::{ProductRepository, UserRepository};
use inventory::schema::ensure_schema;
use inventory::screen::ScreenController;
use inventory::terminal::Terminal;

#[derive(Parser)]
#[command(name = "inventory")]
#[command(author, version, about = "Single-user inventory manager")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and use the menus (default)
    Run,
    /// Manage logins
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Manage products without logging in
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Register a login; duplicate usernames are accepted
    Add {
        username: String,

        /// Visible in shell history and process listings; omit it to be
        /// prompted or to read the password from stdin
        #[arg(short, long)]
        password: Option<String>,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// Add a product
    Add {
        name: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
        #[arg(allow_negative_numbers = true, value_parser = parse_price)]
        price: f64,
    },
    /// Overwrite every field of a product
    Update {
        id: i64,
        name: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
        #[arg(allow_negative_numbers = true, value_parser = parse_price)]
        price: f64,
    },
    /// Delete a product
    Delete { id: i64 },
    /// List every product
    List {
        #[arg(long)]
        json: bool,
    },
    /// List products below the low-stock threshold
    LowStock {
        /// Defaults to `INVENTORY_LOW_STOCK_THRESHOLD`
        #[arg(short, long)]
        threshold: Option<i64>,

        #[arg(long)]
        json: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let app_config = AppConfig::load()?;

    // Logs go to stderr so they never interleave with the screens on stdout
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_new(&app_config.log)?)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if let Err(e) = run(cli, &app_config).await {
        tracing::error!("Command failed: {e:#}");
        return Err(e);
    }
    Ok(())
}

async fn run(cli: Cli, app_config: &AppConfig) -> Result<()> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    if !health_check(&pool).await? {
        anyhow::bail!("Failed to connect to database");
    }
    ensure_schema(&pool).await?;

    let users = UserRepository::new(pool.clone());
    let products = ProductRepository::new(pool);
    let mut out = io::stdout().lock();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            if users.count().await? == 0 {
                warn!(
                    "No users registered; create one with `inventory user add <username>`"
                );
            }

            let mut controller =
                ScreenController::new(users, products, app_config.low_stock_threshold);
            let stdin = io::stdin();
            let masking = stdin.is_terminal();
            Terminal::new(stdin.lock(), out)
                .with_masking(masking)
                .run(&mut controller)
                .await?;
            info!("Session ended");
        }
        Commands::User { action } => match action {
            UserAction::Add { username, password } => {
                let password = match password {
                    Some(password) => password,
                    None => read_password()?,
                };
                commands::add_user(&users, &username, &password, &mut out).await?;
            }
        },
        Commands::Product { action } => match action {
            ProductAction::Add {
                name,
                quantity,
                price,
            } => {
                let product = NewProduct::new(name, quantity, price);
                commands::add_product(&products, &product, &mut out).await?;
            }
            ProductAction::Update {
                id,
                name,
                quantity,
                price,
            } => {
                let product = NewProduct::new(name, quantity, price);
                commands::update_product(&products, id, &product, &mut out).await?;
            }
            ProductAction::Delete { id } => {
                commands::delete_product(&products, id, &mut out).await?;
            }
            ProductAction::List { json } => {
                commands::list_products(&products, json, &mut out).await?;
            }
            ProductAction::LowStock { threshold, json } => {
                let threshold = threshold.unwrap_or(app_config.low_stock_threshold);
                commands::list_low_stock(&products, threshold, json, &mut out).await?;
            }
        },
    }

    Ok(())
}

/// Read a password from stdin, concealed when stdin is a terminal. The
/// prompt goes to stderr so stdout only carries the command result.
fn read_password() -> Result<String> {
    let stdin = io::stdin();
    let masking = stdin.is_terminal();
    let mut terminal = Terminal::new(stdin.lock(), io::stderr()).with_masking(masking);
    match terminal.read_secret("Password: ")? {
        Some(password) => Ok(password),
        None => anyhow::bail!("No password given: input ended"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_interactive() {
        let cli = Cli::try_parse_from(["inventory"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_user_add() {
        let cli =
            Cli::try_parse_from(["inventory", "user", "add", "alice", "--password", "secret"])
                .unwrap();
        match cli.command {
            Some(Commands::User {
                action: UserAction::Add { username, password },
            }) => {
                assert_eq!(username, "alice");
                assert_eq!(password.as_deref(), Some("secret"));
            }
            _ => panic!("expected user add"),
        }
    }

    #[test]
    fn user_add_password_is_optional() {
        let cli = Cli::try_parse_from(["inventory", "user", "add", "q"]).unwrap();
        match cli.command {
            Some(Commands::User {
                action: UserAction::Add { username, password },
            }) => {
                assert_eq!(username, "q");
                assert!(password.is_none());
            }
            _ => panic!("expected user add"),
        }
    }

    #[test]
    fn rejects_non_finite_price() {
        for price in ["NaN", "inf", "-inf"] {
            assert!(
                Cli::try_parse_from(["inventory", "product", "add", "Widget", "1", price]).is_err(),
                "add must reject {price}"
            );
            assert!(
                Cli::try_parse_from(["inventory", "product", "update", "1", "Widget", "1", price])
                    .is_err(),
                "update must reject {price}"
            );
        }
    }

    #[test]
    fn accepts_negative_price() {
        let cli = Cli::try_parse_from(["inventory", "product", "add", "Refund", "1", "-2.50"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Product {
                action: ProductAction::Add { price, .. }
            }) if price == -2.50
        ));
    }

    #[test]
    fn parses_product_update_with_negative_quantity() {
        let cli = Cli::try_parse_from(["inventory", "product", "update", "3", "Bolt", "-2", "0.10"])
            .unwrap();
        match cli.command {
            Some(Commands::Product {
                action:
                    ProductAction::Update {
                        id,
                        name,
                        quantity,
                        price,
                    },
            }) => {
                assert_eq!(id, 3);
                assert_eq!(name, "Bolt");
                assert_eq!(quantity, -2);
                assert_eq!(price, 0.10);
            }
            _ => panic!("expected product update"),
        }
    }

    #[test]
    fn rejects_non_numeric_quantity() {
        assert!(Cli::try_parse_from(["inventory", "product", "add", "Widget", "ten", "2.50"]).is_err());
    }

    #[test]
    fn low_stock_threshold_is_optional() {
        let cli = Cli::try_parse_from(["inventory", "product", "low-stock", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Product {
                action: ProductAction::LowStock {
                    threshold: None,
                    json: true
                }
            })
        ));
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
