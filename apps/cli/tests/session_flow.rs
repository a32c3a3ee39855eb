//! End-to-end flows through the session layer against an in-memory database.

use storefront_cli::commands::checkout::ShippingArgs;
use storefront_cli::commands::{account, admin, cart, checkout, order, product, wishlist};
use storefront_cli::error::ErrorCode;
use storefront_cli::state::{ConfigState, Session};
use storefront_core::account::RegistrationForm;
use storefront_core::catalog::SortKey;
use storefront_core::{Money, OrderStatus, PaymentMethod, ADMIN_EMAIL};
use storefront_db::{Database, DbConfig};

async fn memory_db() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

async fn open(db: &Database) -> Session {
    Session::open(db.clone(), ConfigState::default()).await.unwrap()
}

fn pune() -> ShippingArgs {
    ShippingArgs {
        city: Some("Pune".into()),
        state: Some("Maharashtra".into()),
        pincode: Some("411001".into()),
        ..ShippingArgs::default()
    }
}

#[tokio::test]
async fn test_cart_add_merge_remove() {
    let db = memory_db().await;
    let mut session = open(&db).await;

    let view = cart::add_to_cart(&mut session, "1", 1, None).await.unwrap();
    assert_eq!(view.lines.len(), 1);
    assert_eq!(view.lines[0].quantity, 1);
    assert_eq!(view.lines[0].size.as_deref(), Some("15ml"));

    let view = cart::add_to_cart(&mut session, "1", 1, None).await.unwrap();
    assert_eq!(view.lines.len(), 1);
    assert_eq!(view.lines[0].quantity, 2);

    // ₹998 ships free; GST 179.64 rounds to 180
    assert_eq!(view.pricing.subtotal, Money::from_rupees(998));
    assert!(view.pricing.has_free_shipping());
    assert_eq!(view.pricing.tax, Money::from_rupees(180));
    assert_eq!(view.pricing.total, Money::from_rupees(1178));

    let view = cart::remove_from_cart(&mut session, "1").await.unwrap();
    assert!(view.is_empty());
}

#[tokio::test]
async fn test_cart_rejects_bad_input() {
    let db = memory_db().await;
    let mut session = open(&db).await;

    let err = cart::add_to_cart(&mut session, "404", 1, None).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);

    let err = cart::add_to_cart(&mut session, "1", 0, None).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    let err = cart::add_to_cart(&mut session, "1", 1, Some("1l".into()))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    let err = cart::set_quantity(&mut session, "nope", 2).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
    assert!(session.state().cart.is_empty());
}

#[tokio::test]
async fn test_set_quantity_zero_removes_entry() {
    let db = memory_db().await;
    let mut session = open(&db).await;

    let view = cart::add_to_cart(&mut session, "2", 1, Some("100ml".into()))
        .await
        .unwrap();
    let entry_id = view.lines[0].id.clone();

    let view = cart::set_quantity(&mut session, &entry_id, 3).await.unwrap();
    assert_eq!(view.lines[0].quantity, 3);
    assert_eq!(view.lines[0].size.as_deref(), Some("100ml"));

    let view = cart::set_quantity(&mut session, &entry_id, 0).await.unwrap();
    assert!(view.is_empty());
}

#[tokio::test]
async fn test_state_survives_reopen() {
    let db = memory_db().await;

    let mut session = open(&db).await;
    cart::add_to_cart(&mut session, "3", 2, None).await.unwrap();
    wishlist::add_to_wishlist(&mut session, "4").await.unwrap();
    wishlist::add_to_wishlist(&mut session, "4").await.unwrap();
    product::list_products(
        &mut session,
        product::ListArgs {
            query: Some("cream".into()),
            ..product::ListArgs::default()
        },
    )
    .unwrap();
    session.save().await.unwrap();
    drop(session);

    let session = open(&db).await;
    let state = session.state();
    assert_eq!(state.cart.len(), 1);
    assert_eq!(state.cart[0].quantity, 2);
    assert_eq!(state.wishlist, vec!["4".to_string()]);
    // the search box is not persisted
    assert_eq!(state.search_query, "");
    assert!(!db
        .local_storage()
        .keys()
        .await
        .unwrap()
        .iter()
        .any(|k| k.contains("search")));
}

#[tokio::test]
async fn test_listing_filters_and_sorts() {
    let db = memory_db().await;
    let mut session = open(&db).await;

    let view = product::list_products(
        &mut session,
        product::ListArgs {
            category: Some("sunscreen".into()),
            ..product::ListArgs::default()
        },
    )
    .unwrap();
    assert!(!view.products.is_empty());
    assert!(view.products.iter().all(|p| p.category == "Sunscreen"));

    let low = product::list_products(
        &mut session,
        product::ListArgs {
            sort: SortKey::PriceLow,
            max_price: Some(450),
            ..product::ListArgs::default()
        },
    )
    .unwrap();
    assert!(low.products.iter().all(|p| p.price_paise <= 45000));
    assert!(low
        .products
        .windows(2)
        .all(|w| w[0].price_paise <= w[1].price_paise));

    let err = product::list_products(
        &mut session,
        product::ListArgs {
            min_price: Some(500),
            max_price: Some(100),
            ..product::ListArgs::default()
        },
    )
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
}

#[tokio::test]
async fn test_out_of_range_numbers_are_rejected() {
    let db = memory_db().await;
    let mut session = open(&db).await;

    for (min_price, max_price) in [
        (None, Some(100_000_000_000_000_000)),
        (Some(i64::MAX), None),
        (Some(-1), None),
    ] {
        let err = product::list_products(
            &mut session,
            product::ListArgs {
                min_price,
                max_price,
                ..product::ListArgs::default()
            },
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    // a bound far above every price still lists the whole catalog
    let all = product::list_products(
        &mut session,
        product::ListArgs {
            max_price: Some(10_000_000_000),
            ..product::ListArgs::default()
        },
    )
    .unwrap();
    assert_eq!(all.products.len(), 8);

    let err = cart::add_to_cart(&mut session, "1", i64::MAX, None).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
    let err = cart::add_to_cart(&mut session, "1", -3, None).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
    assert!(session.state().cart.is_empty());

    account::login(&mut session, ADMIN_EMAIL, "admin123").await.unwrap();
    for (price, original_price) in [
        (Some(i64::MAX), None),
        (Some(100_000_000_000_000_000), None),
        (Some(10_000_001), None),
        (Some(100), Some(i64::MAX)),
    ] {
        let err = admin::save_product(
            &mut session,
            admin::ProductForm {
                name: Some("Gold Serum".into()),
                category: Some("Serum".into()),
                price,
                original_price,
                ..admin::ProductForm::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
    let err = admin::save_product(
        &mut session,
        admin::ProductForm {
            id: Some("1".into()),
            price: Some(i64::MAX / 50),
            ..admin::ProductForm::default()
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
    assert_eq!(session.state().products.len(), 8);
    assert_eq!(session.state().product("1").unwrap().price_paise, 49900);
}

#[tokio::test]
async fn test_unreachable_database_is_reported() {
    let db = memory_db().await;
    db.close().await;

    let err = Session::open(db, ConfigState::default()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::DatabaseError);
}

#[tokio::test]
async fn test_product_detail_and_related() {
    let db = memory_db().await;
    let session = open(&db).await;

    let view = product::product_detail(&session, "1").unwrap();
    assert_eq!(view.product.category, "Serum");
    assert_eq!(view.discount_percent, Some(17));
    assert!(view.related.iter().all(|p| p.id != "1" && p.category == "Serum"));

    let err = product::product_detail(&session, "999").unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn test_checkout_flow() {
    let db = memory_db().await;
    let mut session = open(&db).await;

    cart::add_to_cart(&mut session, "5", 1, None).await.unwrap();

    let err = checkout::checkout(&mut session, pune(), PaymentMethod::Upi)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::Unauthenticated);

    account::login(&mut session, ADMIN_EMAIL, "admin123").await.unwrap();

    let err = checkout::checkout(
        &mut session,
        ShippingArgs {
            pincode: Some("4110".into()),
            ..pune()
        },
        PaymentMethod::Upi,
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
    assert_eq!(session.state().cart.len(), 1);

    // ₹299 + ₹50 shipping + ₹54 GST (53.82 rounded)
    let confirmation = checkout::checkout(&mut session, pune(), PaymentMethod::Upi)
        .await
        .unwrap();
    assert_eq!(confirmation.order.total(), Money::from_rupees(403));
    assert_eq!(confirmation.order.status, OrderStatus::Pending);
    assert_eq!(
        confirmation.order.shipping_address,
        "123 Admin Street, Mumbai, India, Pune, Maharashtra - 411001"
    );
    assert!(session.state().cart.is_empty());

    let latest = order::order_confirmation(&session, None).unwrap();
    assert_eq!(latest.order.id, confirmation.order.id);
    assert_eq!(order::my_orders(&session).unwrap().orders.len(), 1);

    let err = checkout::checkout(&mut session, pune(), PaymentMethod::Cod)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::CartError);
}

#[tokio::test]
async fn test_register_login_logout() {
    let db = memory_db().await;
    let mut session = open(&db).await;

    let form = RegistrationForm {
        name: "Asha Rao".into(),
        email: "asha@example.com".into(),
        password: "secret1".into(),
        ..RegistrationForm::default()
    };
    let view = account::register_account(&mut session, form.clone()).await.unwrap();
    assert_eq!(view.user.map(|u| u.is_admin), Some(false));
    assert_eq!(session.state().users.len(), 2);

    let err = account::register_account(
        &mut session,
        RegistrationForm {
            email: "ASHA@example.com".into(),
            ..form
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
    assert_eq!(session.state().users.len(), 2);

    account::logout(&mut session).await.unwrap();
    let err = account::login(&mut session, "asha@example.com", "wrong-pass")
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidCredentials);

    account::login(&mut session, "asha@example.com", "secret1").await.unwrap();
    assert!(account::whoami(&session).user.is_some());

    // non-admins cannot reach the admin panel
    let err = admin::dashboard(&session).unwrap_err();
    assert_eq!(err.code, ErrorCode::Forbidden);
}

#[tokio::test]
async fn test_logout_survives_auto_login() {
    let db = memory_db().await;
    let config = ConfigState {
        demo_auto_login: true,
        ..ConfigState::default()
    };

    let mut session = Session::open(db.clone(), config.clone()).await.unwrap();
    assert!(session.state().is_admin_session());
    account::logout(&mut session).await.unwrap();
    drop(session);

    let session = Session::open(db.clone(), config).await.unwrap();
    assert!(session.state().current_user.is_none());
}

#[tokio::test]
async fn test_admin_manages_catalog_and_orders() {
    let db = memory_db().await;
    let mut session = open(&db).await;

    let err = admin::list_users(&session).unwrap_err();
    assert_eq!(err.code, ErrorCode::Unauthenticated);

    account::login(&mut session, ADMIN_EMAIL, "admin123").await.unwrap();

    let saved = admin::save_product(
        &mut session,
        admin::ProductForm {
            name: Some("Combo Kit".into()),
            price: Some(999),
            original_price: Some(1299),
            category: Some("Combo".into()),
            sizes: vec!["1 kit".into()],
            ..admin::ProductForm::default()
        },
    )
    .await
    .unwrap();
    assert!(saved.created);
    assert_eq!(saved.product.image, admin::PLACEHOLDER_IMAGE);
    assert_eq!(session.state().products.len(), 9);

    let updated = admin::save_product(
        &mut session,
        admin::ProductForm {
            id: Some(saved.product.id.clone()),
            in_stock: Some(false),
            ..admin::ProductForm::default()
        },
    )
    .await
    .unwrap();
    assert!(!updated.created);
    assert!(!updated.product.in_stock);
    assert_eq!(updated.product.name, "Combo Kit");

    let err = cart::add_to_cart(&mut session, &saved.product.id, 1, None)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::CartError);

    let err = admin::save_product(
        &mut session,
        admin::ProductForm {
            name: Some("No Price".into()),
            category: Some("Serum".into()),
            ..admin::ProductForm::default()
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    admin::delete_product(&mut session, &saved.product.id).await.unwrap();
    assert_eq!(session.state().products.len(), 8);
    let err = admin::delete_product(&mut session, &saved.product.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);

    cart::add_to_cart(&mut session, "2", 2, None).await.unwrap();
    let placed = checkout::checkout(&mut session, pune(), PaymentMethod::Card)
        .await
        .unwrap();
    let shipped = admin::set_order_status(&mut session, &placed.order.id, OrderStatus::Shipped)
        .await
        .unwrap();
    assert_eq!(shipped.status, OrderStatus::Shipped);

    let dashboard = admin::dashboard(&session).unwrap();
    assert_eq!(dashboard.stats.order_count, 1);
    assert_eq!(dashboard.stats.total_revenue, placed.order.total());
    assert_eq!(dashboard.stats.orders_by_status[&OrderStatus::Shipped], 1);
    assert_eq!(
        admin::list_orders(&session, Some(OrderStatus::Pending))
            .unwrap()
            .orders
            .len(),
        0
    );
}

#[tokio::test]
async fn test_execute_renders_text_and_json() {
    let db = memory_db().await;
    let mut session = open(&db).await;
    let parse = |args: &[&str]| {
        <storefront_cli::cli::Cli as clap::Parser>::try_parse_from(
            std::iter::once("storefront").chain(args.iter().copied()),
        )
        .unwrap()
    };

    let cli = parse(&["cart", "add", "1", "--quantity", "2"]);
    let text = storefront_cli::execute(&mut session, cli.command, cli.json)
        .await
        .unwrap();
    assert!(text.contains("Skarfix-Plus Brightening Face Serum"));
    assert!(text.contains("Shipping: FREE"));

    let cli = parse(&["--json", "wishlist", "toggle", "2"]);
    let json = storefront_cli::execute(&mut session, cli.command, cli.json)
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["products"][0]["id"], "2");
    assert_eq!(value["products"][0]["wishlisted"], true);
}
