//! # Storefront CLI Library
//!
//! ## Module Organization
//! ```text
//! storefront_cli/
//! ├── lib.rs          ◄─── You are here (startup, dispatch to commands)
//! ├── cli.rs          ◄─── clap definitions
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── config.rs   ◄─── ConfigState (STOREFRONT_* env)
//! │   └── session.rs  ◄─── Store + storage writer
//! ├── commands/       ◄─── One module per route
//! └── error.rs        ◄─── ApiError for commands
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod state;

use directories::ProjectDirs;
use std::path::PathBuf;
use storefront_db::{Database, DbConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{AdminAction, AdminProductAction, CartAction, Cli, Command, WishlistAction};
use commands::{account, admin, cart, checkout, home, order, product, wishlist, Render};
use error::ApiError;
use state::{ConfigState, Session};

/// Runs one command against the configured database.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Load ConfigState (STOREFRONT_* over defaults)                       │
/// │  2. Determine database path (STOREFRONT_DB_PATH or data dir)            │
/// │  3. Connect to database, run migrations                                 │
/// │  4. Open session: hydrate store, attach persistence                     │
/// │  5. Execute the command                                                 │
/// │  6. Save queued writes, close the pool                                  │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
/// Returns the text to print.
pub async fn run(cli: Cli) -> Result<String, ApiError> {
    let config = ConfigState::load()?;

    let db_path = match &config.database_path {
        Some(path) => path.clone(),
        None => get_database_path()?,
    };
    info!(?db_path, "Database path determined");

    let db = Database::new(DbConfig::new(db_path)).await?;
    let mut session = Session::open(db, config).await?;

    let output = execute(&mut session, cli.command, cli.json).await;
    session.close().await?;
    output
}

/// Executes `command` in an open session.
pub async fn execute(session: &mut Session, command: Command, json: bool) -> Result<String, ApiError> {
    match command {
        Command::Home { tab, trending } => {
            let view = home::home(session, tab, trending.as_deref());
            emit(session, &view, json)
        }
        Command::Products(args) => {
            let view = product::list_products(
                session,
                product::ListArgs {
                    query: args.query,
                    category: args.category,
                    sort: args.sort,
                    min_price: args.min_price,
                    max_price: args.max_price,
                },
            )?;
            emit(session, &view, json)
        }
        Command::Product { id } => {
            let view = product::product_detail(session, &id)?;
            emit(session, &view, json)
        }
        Command::Cart { action } => {
            let view = match action.unwrap_or(CartAction::Show) {
                CartAction::Show => cart::get_cart(session),
                CartAction::Add {
                    product_id,
                    quantity,
                    size,
                } => cart::add_to_cart(session, &product_id, quantity, size).await?,
                CartAction::Remove { id } => cart::remove_from_cart(session, &id).await?,
                CartAction::Set { id, quantity } => {
                    cart::set_quantity(session, &id, quantity).await?
                }
                CartAction::Clear => cart::clear_cart(session).await?,
            };
            emit(session, &view, json)
        }
        Command::Wishlist { action } => {
            let view = match action.unwrap_or(WishlistAction::Show) {
                WishlistAction::Show => wishlist::get_wishlist(session),
                WishlistAction::Add { product_id } => {
                    wishlist::add_to_wishlist(session, &product_id).await?
                }
                WishlistAction::Remove { product_id } => {
                    wishlist::remove_from_wishlist(session, &product_id).await?
                }
                WishlistAction::Toggle { product_id } => {
                    wishlist::toggle_wishlist(session, &product_id).await?
                }
                WishlistAction::MoveToCart { product_id } => {
                    wishlist::move_to_cart(session, &product_id).await?
                }
                WishlistAction::Clear => wishlist::clear_wishlist(session).await?,
            };
            emit(session, &view, json)
        }
        Command::Checkout(args) => {
            let shipping = checkout::ShippingArgs {
                full_name: args.full_name,
                email: args.email,
                phone: args.phone,
                address: args.address,
                city: args.city,
                state: args.state,
                pincode: args.pincode,
            };
            let view = checkout::checkout(session, shipping, args.payment).await?;
            emit(session, &view, json)
        }
        Command::Order { id } => {
            let view = order::order_confirmation(session, id.as_deref())?;
            emit(session, &view, json)
        }
        Command::Orders => {
            let view = order::my_orders(session)?;
            emit(session, &view, json)
        }
        Command::Login { email, password } => {
            let view = account::login(session, &email, &password).await?;
            emit(session, &view, json)
        }
        Command::Register {
            name,
            email,
            password,
            phone,
            address,
        } => {
            let form = storefront_core::account::RegistrationForm {
                name,
                email,
                password,
                phone,
                address,
            };
            let view = account::register_account(session, form).await?;
            emit(session, &view, json)
        }
        Command::Logout => {
            let view = account::logout(session).await?;
            emit(session, &view, json)
        }
        Command::Whoami => emit(session, &account::whoami(session), json),
        Command::Admin { action } => execute_admin(session, action, json).await,
    }
}

async fn execute_admin(session: &mut Session, action: AdminAction, json: bool) -> Result<String, ApiError> {
    match action {
        AdminAction::Dashboard => {
            let view = admin::dashboard(session)?;
            emit(session, &view, json)
        }
        AdminAction::Product { action } => match action {
            AdminProductAction::Save(args) => {
                let form = admin::ProductForm {
                    id: args.id,
                    name: args.name,
                    price: args.price,
                    original_price: args.original_price,
                    category: args.category,
                    description: args.description,
                    image: args.image,
                    additional_images: args.additional_images,
                    key_highlights: args.key_highlights,
                    sizes: args.sizes,
                    rating: args.rating,
                    reviews: args.reviews,
                    in_stock: args.in_stock,
                    on_sale: args.on_sale,
                    is_new: args.is_new,
                };
                let view = admin::save_product(session, form).await?;
                emit(session, &view, json)
            }
            AdminProductAction::Delete { id } => {
                let view = admin::delete_product(session, &id).await?;
                emit(session, &view, json)
            }
        },
        AdminAction::Orders { status } => {
            let view = admin::list_orders(session, status)?;
            emit(session, &view, json)
        }
        AdminAction::OrderStatus { id, status } => {
            let view = admin::set_order_status(session, &id, status).await?;
            emit(session, &view, json)
        }
        AdminAction::Users => {
            let view = admin::list_users(session)?;
            emit(session, &view, json)
        }
    }
}

fn emit<T: Render>(session: &Session, view: &T, json: bool) -> Result<String, ApiError> {
    if json {
        serde_json::to_string_pretty(view).map_err(|e| ApiError::internal(e.to_string()))
    } else {
        Ok(view.render(session.config()))
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=storefront=trace` - Show trace for storefront crates only
/// - Default: `info,storefront=debug,sqlx=warn`
///
/// Logs go to stderr so command output stays clean.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,storefront=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Determines the database file path based on the platform.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.fixderma.storefront/storefront.db`
/// - **Windows**: `%APPDATA%\fixderma\storefront\data\storefront.db`
/// - **Linux**: `~/.local/share/storefront/storefront.db`
///
/// `STOREFRONT_DB_PATH` overrides this (see [`ConfigState`]).
pub fn get_database_path() -> Result<PathBuf, ApiError> {
    let proj_dirs = ProjectDirs::from("com", "fixderma", "storefront")
        .ok_or_else(|| ApiError::internal("Could not determine app data directory"))?;

    let data_dir = proj_dirs.data_dir();

    // Create directory if it doesn't exist
    std::fs::create_dir_all(data_dir).map_err(|e| {
        ApiError::internal(format!("Could not create {}: {}", data_dir.display(), e))
    })?;

    Ok(data_dir.join("storefront.db"))
}
