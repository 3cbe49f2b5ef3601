//! Order placement across the cart, session and currency stores.

use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::dec;
use shop_cache::{Cache, FileStore};
use shop_commerce::auth::{AuthProvider, AuthSession, SessionStore, TokenScheme, User};
use shop_commerce::cart::{CartProduct, CartStore};
use shop_commerce::checkout::{
    BillingDetails, CheckoutFlow, OrderConfirmation, OrderGateway, OrderRequest,
};
use shop_commerce::currency::CurrencyStore;
use shop_commerce::error::{AuthError, CheckoutError, SourceError};
use shop_commerce::money::{Currency, ExchangeRates};

struct Provider;

#[async_trait]
impl AuthProvider for Provider {
    async fn authenticate(&self, username: &str, _: &str) -> Result<AuthSession, AuthError> {
        Ok(AuthSession::new(
            "jwt",
            TokenScheme::Bearer,
            User::new("42", "Aysel Mammadova", format!("{username}@example.com")),
        ))
    }
}

#[derive(Default)]
struct RecordingGateway {
    fail: bool,
    received: Mutex<Vec<(String, OrderRequest)>>,
}

#[async_trait]
impl OrderGateway for RecordingGateway {
    async fn create_order(
        &self,
        session: &AuthSession,
        request: &OrderRequest,
    ) -> Result<OrderConfirmation, SourceError> {
        self.received
            .lock()
            .unwrap()
            .push((session.authorization(), request.clone()));
        if self.fail {
            return Err(SourceError::Service("payment gateway unavailable".into()));
        }
        Ok(OrderConfirmation {
            id: "b3JkZXI6MTAx".into(),
            order_number: Some("101".into()),
            total: Some("59.40".into()),
            status: Some("PENDING".into()),
            payment_url: None,
        })
    }
}

fn billing(user: &User) -> BillingDetails {
    BillingDetails::for_user(user)
        .with_phone("+994501234567")
        .with_address("28 May St", "Baku", "AZ1000", "AZ")
}

#[tokio::test]
async fn test_successful_order_clears_cart() {
    let cache = Cache::memory();
    let cart = CartStore::open(cache.clone());
    let session = SessionStore::open(cache.clone());
    let user = session.login(&Provider, "aysel", "pw").await.unwrap();

    cart.add_item(CartProduct::new("p1", "Tea", dec!(20), "tea"), 2);
    cart.add_item(CartProduct::new("p2", "Cup", dec!(15), "cup"), 1);

    let gateway = RecordingGateway::default();
    let flow = CheckoutFlow::default();
    let placed = flow
        .place_order(&cart, &session, billing(&user), None, &gateway)
        .await
        .unwrap();

    // 55 subtotal, 4.40 tax, free shipping
    assert_eq!(placed.total, dec!(59.40));
    assert_eq!(placed.confirmation.order_number.as_deref(), Some("101"));
    assert!(cart.is_empty());

    let received = gateway.received.lock().unwrap();
    let (authorization, request) = &received[0];
    assert_eq!(authorization, "Bearer jwt");
    assert_eq!(request.payment_method, "card");
    assert_eq!(request.line_items.len(), 2);
    assert_eq!(request.line_items[0].quantity, 2);
}

#[tokio::test]
async fn test_failed_order_leaves_cart() {
    let cache = Cache::memory();
    let cart = CartStore::open(cache.clone());
    let session = SessionStore::open(cache);
    let user = session.login(&Provider, "aysel", "pw").await.unwrap();
    cart.add_item(CartProduct::new("p1", "Tea", dec!(20), "tea"), 1);

    let gateway = RecordingGateway {
        fail: true,
        ..Default::default()
    };
    let err = CheckoutFlow::default()
        .place_order(&cart, &session, billing(&user), Some("cod"), &gateway)
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::Gateway(_)));
    assert_eq!(cart.item_count(), 1);
}

#[tokio::test]
async fn test_login_and_contents_required() {
    let cache = Cache::memory();
    let cart = CartStore::open(cache.clone());
    let session = SessionStore::open(cache);
    let gateway = RecordingGateway::default();
    let flow = CheckoutFlow::default();
    let someone = User::new("1", "A B", "a@b.az");

    cart.add_item(CartProduct::new("p1", "Tea", dec!(20), "tea"), 1);
    let err = flow
        .place_order(&cart, &session, billing(&someone), None, &gateway)
        .await
        .unwrap_err();
    assert_eq!(err, CheckoutError::LoginRequired);

    session.login(&Provider, "aysel", "pw").await.unwrap();
    cart.clear();
    let err = flow
        .place_order(&cart, &session, billing(&someone), None, &gateway)
        .await
        .unwrap_err();
    assert_eq!(err, CheckoutError::EmptyCart);
    assert!(gateway.received.lock().unwrap().is_empty());
}

#[test]
fn test_summary_formats_in_active_currency() {
    let cart = CartStore::in_memory();
    cart.add_item(CartProduct::new("p1", "Tea", dec!(100), "tea"), 1);
    let currency = CurrencyStore::in_memory();
    currency.change_currency(Currency::USD);

    let summary = CheckoutFlow::default().summary(&cart.state());
    assert_eq!(currency.format_price(summary.subtotal), "$59.00");
    assert_eq!(currency.format_price(summary.tax), "$4.72");
    assert_eq!(currency.format_price(summary.shipping), "$0.00");
}

#[test]
fn test_state_survives_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    {
        let cache = Cache::new(std::sync::Arc::new(FileStore::open(&path).unwrap()));
        let cart = CartStore::open(cache.clone());
        cart.add_item(CartProduct::new("p1", "Tea", dec!(3.50), "tea"), 3);
        CurrencyStore::open(cache, ExchangeRates::default(), Currency::AZN)
            .change_currency(Currency::EUR);
    }

    let cache = Cache::new(std::sync::Arc::new(FileStore::open(&path).unwrap()));
    let cart = CartStore::open(cache.clone());
    let currency = CurrencyStore::open(cache, ExchangeRates::default(), Currency::AZN);
    assert_eq!(cart.subtotal(), dec!(10.50));
    assert_eq!(currency.active(), Currency::EUR);
}
