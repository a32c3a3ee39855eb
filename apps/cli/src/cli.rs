//! # Command Line
//!
//! One subcommand per storefront route.
//!
//! ```bash
//! storefront home --tab bestsellers
//! storefront products --query serum --sort price-low
//! storefront product 1
//! storefront cart add 1 --quantity 2 --size 30ml
//! storefront login -e admin@fixderma.com -p admin123
//! storefront checkout --city Pune --state Maharashtra --pincode 411001
//! storefront admin dashboard
//! ```

use clap::{Args, Parser, Subcommand};
use storefront_core::catalog::{EssentialsTab, SortKey};
use storefront_core::{OrderStatus, PaymentMethod};

#[derive(Debug, Parser)]
#[command(name = "storefront")]
#[command(author, version, about = "Fixderma storefront demo")]
pub struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Home page sections
    Home {
        /// Essentials strip tab (new-launches, bestsellers, best-offers, combo-kits)
        #[arg(short, long, default_value = "new-launches")]
        tab: EssentialsTab,

        /// Trending category
        #[arg(long)]
        trending: Option<String>,
    },
    /// Product listing with search, category and price filters
    Products(ProductsArgs),
    /// Product detail page
    Product {
        /// Product id
        id: String,
    },
    /// Shopping cart
    Cart {
        #[command(subcommand)]
        action: Option<CartAction>,
    },
    /// Wishlist
    Wishlist {
        #[command(subcommand)]
        action: Option<WishlistAction>,
    },
    /// Place an order for the cart
    Checkout(CheckoutArgs),
    /// Order confirmation (latest order by default)
    Order {
        /// Order id
        id: Option<String>,
    },
    /// Your orders, newest first
    Orders,
    /// Sign in
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        #[arg(long, default_value = "")]
        phone: String,

        #[arg(long, default_value = "")]
        address: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Admin panel
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Debug, Args)]
pub struct ProductsArgs {
    /// Search name and description
    #[arg(short, long)]
    pub query: Option<String>,

    /// Category name, or "all"
    #[arg(short, long)]
    pub category: Option<String>,

    /// name, price-low, price-high, rating or reviews
    #[arg(short, long, default_value = "name")]
    pub sort: SortKey,

    /// Minimum price in rupees
    #[arg(long)]
    pub min_price: Option<i64>,

    /// Maximum price in rupees
    #[arg(long)]
    pub max_price: Option<i64>,
}

#[derive(Debug, Subcommand)]
pub enum CartAction {
    /// Show the cart (default)
    Show,
    /// Add a product
    Add {
        /// Product id
        product_id: String,

        #[arg(short, long, default_value_t = 1)]
        quantity: i64,

        #[arg(short, long)]
        size: Option<String>,
    },
    /// Remove an entry (entry id or product id)
    Remove { id: String },
    /// Set an entry's quantity; 0 removes it
    Set {
        id: String,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
}

#[derive(Debug, Subcommand)]
pub enum WishlistAction {
    /// Show the wishlist (default)
    Show,
    Add { product_id: String },
    Remove { product_id: String },
    /// Add when absent, remove when present
    Toggle { product_id: String },
    /// Move one unit into the cart
    MoveToCart { product_id: String },
    Clear,
}

#[derive(Debug, Args)]
pub struct CheckoutArgs {
    /// Defaults to the account name
    #[arg(long)]
    pub full_name: Option<String>,

    /// Defaults to the account email
    #[arg(long)]
    pub email: Option<String>,

    /// Defaults to the account phone
    #[arg(long)]
    pub phone: Option<String>,

    /// Defaults to the account address
    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    #[arg(long)]
    pub state: Option<String>,

    /// 6-digit pincode
    #[arg(long)]
    pub pincode: Option<String>,

    /// card, upi or cod
    #[arg(long, default_value = "card")]
    pub payment: PaymentMethod,
}

#[derive(Debug, Subcommand)]
pub enum AdminAction {
    /// Revenue, orders and catalog overview
    Dashboard,
    /// Manage products
    Product {
        #[command(subcommand)]
        action: AdminProductAction,
    },
    /// List orders
    Orders {
        #[arg(short, long)]
        status: Option<OrderStatus>,
    },
    /// Change an order's status
    OrderStatus { id: String, status: OrderStatus },
    /// List accounts
    Users,
}

#[derive(Debug, Subcommand)]
pub enum AdminProductAction {
    /// Add a product, or update the product with `--id`
    Save(ProductFormArgs),
    /// Delete a product
    Delete { id: String },
}

#[derive(Debug, Args)]
pub struct ProductFormArgs {
    /// Existing product id to update
    #[arg(long)]
    pub id: Option<String>,

    #[arg(long)]
    pub name: Option<String>,

    /// Price in rupees
    #[arg(long)]
    pub price: Option<i64>,

    /// Original (MRP) price in rupees
    #[arg(long)]
    pub original_price: Option<i64>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub image: Option<String>,

    /// Additional gallery image (repeatable)
    #[arg(long = "additional-image")]
    pub additional_images: Vec<String>,

    /// Key highlight (repeatable)
    #[arg(long = "highlight")]
    pub key_highlights: Vec<String>,

    /// Comma-separated sizes, e.g. "15ml,30ml"
    #[arg(long, value_delimiter = ',')]
    pub sizes: Vec<String>,

    #[arg(long)]
    pub rating: Option<f64>,

    #[arg(long)]
    pub reviews: Option<u32>,

    #[arg(long)]
    pub in_stock: Option<bool>,

    #[arg(long)]
    pub on_sale: Option<bool>,

    #[arg(long)]
    pub is_new: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_products_filters() {
        let cli = Cli::try_parse_from([
            "storefront", "products", "-q", "serum", "--sort", "price-high", "--max-price", "500",
        ])
        .unwrap();
        match cli.command {
            Command::Products(args) => {
                assert_eq!(args.query.as_deref(), Some("serum"));
                assert_eq!(args.sort, SortKey::PriceHigh);
                assert_eq!(args.max_price, Some(500));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_cart_set_zero_and_json_flag() {
        let cli = Cli::try_parse_from(["storefront", "cart", "set", "abc", "0", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Command::Cart {
                action: Some(CartAction::Set { quantity: 0, .. })
            }
        ));
    }

    #[test]
    fn test_parse_admin_order_status() {
        let cli =
            Cli::try_parse_from(["storefront", "admin", "order-status", "o-1", "shipped"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Admin {
                action: AdminAction::OrderStatus {
                    status: OrderStatus::Shipped,
                    ..
                }
            }
        ));
    }

    #[test]
    fn test_bad_sort_is_rejected() {
        assert!(Cli::try_parse_from(["storefront", "products", "--sort", "cheapest"]).is_err());
    }
}
