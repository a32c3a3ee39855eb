//! # Hydration
//!
//! Rebuilds a [`Store`] from local storage at startup.
//!
//! ## Fallback Rules
//! ```text
//! ┌──────────────────────┬──────────────────────────────────────────────────┐
//! │ key                  │ when missing, empty or unreadable                │
//! ├──────────────────────┼──────────────────────────────────────────────────┤
//! │ fixderma_products    │ seed catalog (also when the stored list is [])   │
//! │ fixderma_users       │ [admin]; admin is re-added / given a credential  │
//! │ fixderma_orders      │ []                                               │
//! │ fixderma_cart        │ [] (valid entries replayed through AddToCart)    │
//! │ fixderma_wishlist    │ [] (stored ids replayed through AddToWishlist)   │
//! │ fixderma_currentUser │ signed out, or admin when auto-login is enabled; │
//! │                      │ a stored user is re-read from users by id        │
//! │ (categories)         │ always the seed list                             │
//! └──────────────────────┴──────────────────────────────────────────────────┘
//! ```
//! Unreadable entries are logged with `warn!` and never abort startup.
//! Stored products that fail validation and cart entries outside
//! `1..=MAX_ITEM_QUANTITY` are dropped the same way.

use chrono::Utc;
use serde::de::DeserializeOwned;
use storefront_core::account::hash_password;
use storefront_core::store::{Action, StateSlice, Store};
use storefront_core::validation::{validate_product, validate_quantity};
use storefront_core::{seed, CartItem, Order, Product, User, ADMIN_EMAIL, MAX_ITEM_QUANTITY};
use tracing::{info, warn};

use crate::error::{DbError, DbResult};
use crate::pool::Database;
use crate::repository::LocalStorageRepository;

/// Startup choices that are not stored state.
#[derive(Debug, Clone)]
pub struct HydrateOptions {
    /// Email of the administrator account.
    pub admin_email: String,
    /// Password given to the administrator when the account is missing or
    /// has no credential.
    pub admin_password: String,
    /// Sign in as the administrator when no session was stored.
    pub auto_login_admin: bool,
}

impl Default for HydrateOptions {
    fn default() -> Self {
        HydrateOptions {
            admin_email: ADMIN_EMAIL.to_string(),
            admin_password: "admin123".to_string(),
            auto_login_admin: false,
        }
    }
}

/// Outcome of reading one storage key.
enum Loaded<T> {
    Value(T),
    Missing,
    Unreadable,
}

impl<T> Loaded<T> {
    fn into_option(self) -> Option<T> {
        match self {
            Loaded::Value(v) => Some(v),
            Loaded::Missing | Loaded::Unreadable => None,
        }
    }
}

async fn load<T: DeserializeOwned>(
    storage: &LocalStorageRepository,
    slice: StateSlice,
) -> DbResult<Loaded<T>> {
    let Some(key) = slice.storage_key() else {
        return Ok(Loaded::Missing);
    };

    let raw = match storage.get_item(key).await? {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Ok(Loaded::Missing),
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Loaded::Value(value)),
        Err(e) => {
            warn!(key, error = %e, "Ignoring unreadable storage entry");
            Ok(Loaded::Unreadable)
        }
    }
}

/// Builds the startup store from `db`, applying the fallback rules.
///
/// The returned store has no subscribers. Attach persistence afterwards and
/// queue [`snapshot_writes`](crate::persist::snapshot_writes) so storage
/// reflects the hydrated state.
pub async fn hydrate(db: &Database, options: &HydrateOptions) -> DbResult<Store> {
    let storage = db.local_storage();
    let mut store = Store::default();

    // products
    let products = match load::<Vec<Product>>(&storage, StateSlice::Products).await? {
        Loaded::Value(products) => usable_products(products),
        Loaded::Missing | Loaded::Unreadable => Vec::new(),
    };
    let products = match products {
        products if !products.is_empty() => products,
        _ => {
            info!("Seeding product catalog");
            seed::products()
        }
    };
    store.dispatch(Action::SetProducts(products));

    // users, with a usable administrator account
    let mut users = load::<Vec<User>>(&storage, StateSlice::Users)
        .await?
        .into_option()
        .unwrap_or_default();
    ensure_admin(&mut users, options)?;
    let admin = users
        .iter()
        .find(|u| u.has_email(&options.admin_email))
        .cloned();
    store.dispatch(Action::SetUsers(users));

    if let Some(orders) = load::<Vec<Order>>(&storage, StateSlice::Orders)
        .await?
        .into_option()
    {
        store.dispatch(Action::SetOrders(orders));
    }

    if let Some(cart) = load::<Vec<CartItem>>(&storage, StateSlice::Cart)
        .await?
        .into_option()
    {
        for item in cart {
            if let Err(e) = validate_quantity(item.quantity) {
                warn!(entry = %item.id, quantity = item.quantity, error = %e, "Dropping stored cart entry");
                continue;
            }
            store.dispatch(Action::AddToCart(item));
        }
        clamp_merged_quantities(&mut store);
    }

    if let Some(wishlist) = load::<Vec<String>>(&storage, StateSlice::Wishlist)
        .await?
        .into_option()
    {
        for product_id in wishlist {
            store.dispatch(Action::AddToWishlist(product_id));
        }
    }

    // a stored `null` is an explicit logout and suppresses auto-login
    let current_user = match load::<Option<User>>(&storage, StateSlice::CurrentUser).await? {
        Loaded::Value(user) => user.and_then(|stored| {
            let account = store.state().user(&stored.id).cloned();
            if account.is_none() {
                warn!(user_id = %stored.id, "Stored session has no matching account; signing out");
            }
            account
        }),
        Loaded::Missing | Loaded::Unreadable if options.auto_login_admin => {
            info!("Auto-login as administrator enabled");
            admin
        }
        Loaded::Missing | Loaded::Unreadable => None,
    };
    store.dispatch(Action::SetCurrentUser(current_user));

    store.dispatch(Action::SetCategories(seed::categories()));

    let state = store.state();
    info!(
        products = state.products.len(),
        users = state.users.len(),
        orders = state.orders.len(),
        cart_entries = state.cart.len(),
        wishlist = state.wishlist.len(),
        signed_in = state.current_user.is_some(),
        "State hydrated"
    );

    Ok(store)
}

/// Keeps the stored products that pass [`validate_product`].
fn usable_products(products: Vec<Product>) -> Vec<Product> {
    products
        .into_iter()
        .filter(|p| match validate_product(p) {
            Ok(()) => true,
            Err(e) => {
                warn!(product_id = %p.id, error = %e, "Dropping stored product");
                false
            }
        })
        .collect()
}

/// Entries merged past [`MAX_ITEM_QUANTITY`] are capped at it.
fn clamp_merged_quantities(store: &mut Store) {
    let over: Vec<String> = store
        .state()
        .cart
        .iter()
        .filter(|item| item.quantity > MAX_ITEM_QUANTITY)
        .map(|item| item.id.clone())
        .collect();
    for id in over {
        warn!(entry = %id, "Capping merged cart quantity");
        store.dispatch(Action::UpdateCartQuantity {
            id,
            quantity: MAX_ITEM_QUANTITY,
        });
    }
}

fn ensure_admin(users: &mut Vec<User>, options: &HydrateOptions) -> DbResult<()> {
    let hash = || {
        hash_password(&options.admin_password).map_err(|e| DbError::Internal(e.to_string()))
    };

    match users.iter_mut().find(|u| u.has_email(&options.admin_email)) {
        Some(admin) if !admin.has_credential() => {
            warn!("Administrator account has no credential; resetting");
            admin.password_hash = hash()?;
        }
        Some(_) => {}
        None => {
            info!("Seeding administrator account");
            let mut admin = seed::admin_user(hash()?, Utc::now());
            admin.email = options.admin_email.clone();
            users.push(admin);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::{snapshot_writes, storage_channel};
    use crate::DbConfig;
    use storefront_core::account::{authenticate, verify_password};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_empty_storage_uses_seed_data() {
        let db = db().await;
        let store = hydrate(&db, &HydrateOptions::default()).await.unwrap();
        let state = store.state();

        assert_eq!(state.products, seed::products());
        assert_eq!(state.categories, seed::categories());
        assert_eq!(state.users.len(), 1);
        assert!(state.users[0].is_admin);
        assert!(state.orders.is_empty() && state.cart.is_empty() && state.wishlist.is_empty());
        assert!(state.current_user.is_none());
        assert!(authenticate(&state.users, ADMIN_EMAIL, "admin123").is_ok());
    }

    #[tokio::test]
    async fn test_auto_login_only_when_enabled_and_no_session() {
        let db = db().await;
        let options = HydrateOptions {
            auto_login_admin: true,
            ..HydrateOptions::default()
        };
        let store = hydrate(&db, &options).await.unwrap();
        assert!(store.state().is_admin_session());

        db.local_storage()
            .set_item("fixderma_currentUser", "null")
            .await
            .unwrap();
        let store = hydrate(&db, &options).await.unwrap();
        assert!(store.state().current_user.is_none());
    }

    #[tokio::test]
    async fn test_malformed_entries_fall_back() {
        let db = db().await;
        let storage = db.local_storage();
        storage.set_item("fixderma_products", "{not json").await.unwrap();
        storage.set_item("fixderma_cart", "[{\"bad\":true}]").await.unwrap();
        storage.set_item("fixderma_wishlist", "").await.unwrap();

        let store = hydrate(&db, &HydrateOptions::default()).await.unwrap();
        assert_eq!(store.state().products.len(), 8);
        assert!(store.state().cart.is_empty());
        assert!(store.state().wishlist.is_empty());
    }

    #[tokio::test]
    async fn test_empty_product_list_is_reseeded() {
        let db = db().await;
        db.local_storage()
            .set_item("fixderma_products", "[]")
            .await
            .unwrap();
        let store = hydrate(&db, &HydrateOptions::default()).await.unwrap();
        assert_eq!(store.state().products.len(), 8);
    }

    #[tokio::test]
    async fn test_stored_cart_is_merged_on_replay() {
        let db = db().await;
        let cart = vec![
            CartItem::new("1", 1).with_id("a"),
            CartItem::new("1", 2).with_id("b"),
            CartItem::new("2", 1).with_id("c"),
        ];
        db.local_storage()
            .set_item("fixderma_cart", &serde_json::to_string(&cart).unwrap())
            .await
            .unwrap();
        db.local_storage()
            .set_item("fixderma_wishlist", r#"["1","1","2"]"#)
            .await
            .unwrap();

        let store = hydrate(&db, &HydrateOptions::default()).await.unwrap();
        let state = store.state();
        assert_eq!(state.cart.len(), 2);
        assert_eq!(state.cart[0].id, "a");
        assert_eq!(state.cart[0].quantity, 3);
        assert_eq!(state.wishlist, vec!["1".to_string(), "2".to_string()]);
    }

    #[tokio::test]
    async fn test_out_of_range_cart_quantities_are_dropped() {
        let db = db().await;
        let cart = vec![
            CartItem::new("1", i64::MAX).with_id("huge"),
            CartItem::new("1", 1).with_id("one"),
            CartItem::new("2", 0).with_id("zero"),
            CartItem::new("3", -4).with_id("negative"),
            CartItem::new("4", 600).with_id("a"),
            CartItem::new("4", 600).with_id("b"),
        ];
        db.local_storage()
            .set_item("fixderma_cart", &serde_json::to_string(&cart).unwrap())
            .await
            .unwrap();

        let store = hydrate(&db, &HydrateOptions::default()).await.unwrap();
        let cart = &store.state().cart;
        assert_eq!(cart.len(), 2);
        assert_eq!((cart[0].id.as_str(), cart[0].quantity), ("one", 1));
        assert_eq!((cart[1].id.as_str(), cart[1].quantity), ("a", MAX_ITEM_QUANTITY));
    }

    #[tokio::test]
    async fn test_invalid_stored_products_are_dropped() {
        let db = db().await;
        let mut products = seed::products();
        products[0].price_paise = i64::MAX;
        products[1].rating = 9.0;
        db.local_storage()
            .set_item("fixderma_products", &serde_json::to_string(&products).unwrap())
            .await
            .unwrap();

        let store = hydrate(&db, &HydrateOptions::default()).await.unwrap();
        let ids: Vec<&str> = store.state().products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "4", "5", "6", "7", "8"]);

        // nothing usable left: reseed
        let mut broken = seed::products();
        for p in &mut broken {
            p.price_paise = -1;
        }
        db.local_storage()
            .set_item("fixderma_products", &serde_json::to_string(&broken).unwrap())
            .await
            .unwrap();
        let store = hydrate(&db, &HydrateOptions::default()).await.unwrap();
        assert_eq!(store.state().products, seed::products());
    }

    #[tokio::test]
    async fn test_stored_session_is_resolved_against_users() {
        let db = db().await;
        let ghost = User {
            id: "ghost".into(),
            name: "Deleted".into(),
            email: "ghost@example.com".into(),
            password_hash: String::new(),
            phone: String::new(),
            address: String::new(),
            is_admin: true,
            created_at: Utc::now(),
        };
        db.local_storage()
            .set_item("fixderma_currentUser", &serde_json::to_string(&ghost).unwrap())
            .await
            .unwrap();
        let store = hydrate(&db, &HydrateOptions::default()).await.unwrap();
        assert!(store.state().current_user.is_none());

        // a stale admin snapshot picks up the repaired credential
        let mut stale = store.state().users[0].clone();
        stale.password_hash = "stale".into();
        db.local_storage()
            .set_item("fixderma_users", &serde_json::to_string(&store.state().users).unwrap())
            .await
            .unwrap();
        db.local_storage()
            .set_item("fixderma_currentUser", &serde_json::to_string(&stale).unwrap())
            .await
            .unwrap();
        let store = hydrate(&db, &HydrateOptions::default()).await.unwrap();
        let current = store.state().current_user.as_ref().unwrap();
        assert_eq!(current, &store.state().users[0]);
        assert!(verify_password("admin123", &current.password_hash));
    }

    #[tokio::test]
    async fn test_admin_without_credential_is_repaired() {
        let db = db().await;
        let stored = vec![seed::admin_user(String::new(), Utc::now())];
        db.local_storage()
            .set_item("fixderma_users", &serde_json::to_string(&stored).unwrap())
            .await
            .unwrap();

        let options = HydrateOptions {
            admin_password: "s3cret!".into(),
            ..HydrateOptions::default()
        };
        let store = hydrate(&db, &options).await.unwrap();
        let admin = store.state().user_by_email(ADMIN_EMAIL).unwrap();
        assert_eq!(store.state().users.len(), 1);
        assert!(verify_password("s3cret!", &admin.password_hash));
    }

    #[tokio::test]
    async fn test_configured_admin_email() {
        let db = db().await;
        let options = HydrateOptions {
            admin_email: "owner@example.com".into(),
            auto_login_admin: true,
            ..HydrateOptions::default()
        };
        let store = hydrate(&db, &options).await.unwrap();
        let state = store.state();
        assert_eq!(state.users.len(), 1);
        assert_eq!(state.users[0].email, "owner@example.com");
        assert!(state.is_admin_session());
    }

    #[tokio::test]
    async fn test_round_trip_through_storage() {
        let db = db().await;
        let mut store = hydrate(&db, &HydrateOptions::default()).await.unwrap();
        let (subscriber, mut writer) = storage_channel(db.local_storage());
        subscriber.queue(snapshot_writes(store.state()).unwrap());
        store.subscribe(Box::new(subscriber));

        store.dispatch(Action::AddToCart(CartItem::new("3", 2)));
        store.dispatch(Action::AddToWishlist("5".into()));
        writer.flush().await.unwrap();

        let again = hydrate(&db, &HydrateOptions::default()).await.unwrap();
        assert_eq!(again.state().cart, store.state().cart);
        assert_eq!(again.state().wishlist, store.state().wishlist);
        assert_eq!(again.state().users, store.state().users);
    }
}
