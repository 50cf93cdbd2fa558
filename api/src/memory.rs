//! A process-local backend with a seeded catalog.
//!
//! Used when `DASHDROP_BACKEND=memory` (the default) and throughout the tests.
//! It implements both [`GroceryStore`] and [`AuthProvider`] so a single value
//! can stand in for the whole cloud side.

use std::collections::HashMap;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use async_trait::async_trait;
use chrono::Duration;
use chrono::Utc;
use dioxus_logger::tracing::debug;

use crate::auth::AuthProvider;
use crate::auth::FederatedProvider;
use crate::auth::Session;
use crate::error::ApiResult;
use crate::error::AuthFailure;
use crate::error::BackendError;
use crate::models::CartLine;
use crate::models::Category;
use crate::models::DeliveryAddress;
use crate::models::Item;
use crate::models::Order;
use crate::models::UserProfile;
use crate::price::Price;
use crate::store::GroceryStore;

const MIN_PASSWORD_LEN: usize = 6;
const TOKEN_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Clone)]
struct Account {
    uid: String,
    password: Option<String>,
}

#[derive(Debug, Default)]
struct UserData {
    profile: Option<UserProfile>,
    cart: Vec<CartLine>,
    favourites: Vec<Item>,
    addresses: Vec<DeliveryAddress>,
    orders: Vec<Order>,
}

#[derive(Debug, Default)]
struct Data {
    categories: Vec<Category>,
    items: Vec<Item>,
    // keyed by email, or "<provider>:<subject>" for federated accounts
    accounts: HashMap<String, Account>,
    users: HashMap<String, UserData>,
    session: Option<Session>,
    next_id: u64,
}

impl Data {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn issue_session(&mut self, uid: &str, email: &str) -> Session {
        let token = self.next_id("token");
        let session = Session {
            uid: uid.to_string(),
            email: email.to_string(),
            display_name: None,
            id_token: format!("{token}-id"),
            refresh_token: format!("{token}-refresh"),
            expires_at: Utc::now() + Duration::seconds(TOKEN_LIFETIME_SECS),
        };
        self.session = Some(session.clone());
        session
    }

    fn user(&mut self, session: &Session) -> ApiResult<&mut UserData> {
        match &self.session {
            Some(current) if current.id_token == session.id_token => {}
            _ => return Err(AuthFailure::SessionExpired.into()),
        }
        Ok(self.users.entry(session.uid.clone()).or_default())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryBackend {
    data: Arc<Mutex<Data>>,
    reads: Arc<AtomicUsize>,
}

impl InMemoryBackend {
    /// An empty backend: no catalog, no accounts.
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend holding the demo catalog.
    pub fn seeded() -> Self {
        let backend = Self::new();
        {
            let mut data = backend.data();
            data.categories = seed_categories();
            data.items = seed_items();
        }
        backend
    }

    pub fn with_catalog(categories: Vec<Category>, items: Vec<Item>) -> Self {
        let backend = Self::new();
        {
            let mut data = backend.data();
            data.categories = categories;
            data.items = items;
        }
        backend
    }

    /// Number of read requests served so far.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Replaces the stored addresses of `uid`.
    pub fn set_addresses(&self, uid: &str, addresses: Vec<DeliveryAddress>) {
        self.data()
            .users
            .entry(uid.to_string())
            .or_default()
            .addresses = addresses;
    }

    /// Orders placed by `uid`, oldest first.
    pub fn orders(&self, uid: &str) -> Vec<Order> {
        self.data()
            .users
            .get(uid)
            .map(|u| u.orders.clone())
            .unwrap_or_default()
    }

    fn data(&self) -> MutexGuard<'_, Data> {
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn read(&self) {
        self.reads.fetch_add(1, Ordering::SeqCst);
    }

    fn create_account(data: &mut Data, key: String, email: &str, password: Option<String>) -> String {
        let uid = data.next_id("uid");
        data.accounts.insert(
            key,
            Account {
                uid: uid.clone(),
                password,
            },
        );
        data.users.insert(
            uid.clone(),
            UserData {
                addresses: vec![default_address(email)],
                ..Default::default()
            },
        );
        uid
    }
}

#[async_trait]
impl GroceryStore for InMemoryBackend {
    async fn categories(&self, session: &Session) -> ApiResult<Vec<Category>> {
        self.read();
        let mut data = self.data();
        data.user(session)?;
        Ok(data.categories.clone())
    }

    async fn items_in_category(&self, session: &Session, category: &str) -> ApiResult<Vec<Item>> {
        self.read();
        let mut data = self.data();
        data.user(session)?;
        Ok(data
            .items
            .iter()
            .filter(|i| i.category == category)
            .cloned()
            .collect())
    }

    async fn cart(&self, session: &Session) -> ApiResult<Vec<CartLine>> {
        self.read();
        Ok(self.data().user(session)?.cart.clone())
    }

    async fn add_to_cart(&self, session: &Session, mut line: CartLine) -> ApiResult<()> {
        let mut data = self.data();
        let id = data.next_id("cart");
        line.id.get_or_insert(id);
        data.user(session)?.cart.push(line);
        Ok(())
    }

    async fn favourites(&self, session: &Session) -> ApiResult<Vec<Item>> {
        self.read();
        Ok(self.data().user(session)?.favourites.clone())
    }

    async fn add_to_favourites(&self, session: &Session, item: Item) -> ApiResult<()> {
        let mut data = self.data();
        let favourites = &mut data.user(session)?.favourites;
        if !favourites.iter().any(|f| f.id == item.id) {
            favourites.push(item);
        }
        Ok(())
    }

    async fn addresses(&self, session: &Session) -> ApiResult<Vec<DeliveryAddress>> {
        self.read();
        Ok(self.data().user(session)?.addresses.clone())
    }

    async fn profile(&self, session: &Session) -> ApiResult<Option<UserProfile>> {
        self.read();
        Ok(self.data().user(session)?.profile.clone())
    }

    async fn save_profile(&self, session: &Session, profile: UserProfile) -> ApiResult<()> {
        self.data().user(session)?.profile = Some(profile);
        Ok(())
    }

    async fn place_order(&self, session: &Session, order: Order) -> ApiResult<String> {
        let mut data = self.data();
        let user = data.user(session)?;
        user.cart.retain(|line| {
            line.id
                .as_deref()
                .map_or(true, |id| !order.line_ids().any(|ordered| ordered == id))
        });
        let id = order.id.clone();
        match user.orders.iter_mut().find(|o| o.id == id) {
            Some(existing) => *existing = order,
            None => user.orders.push(order),
        }
        Ok(id)
    }
}

#[async_trait]
impl AuthProvider for InMemoryBackend {
    fn current_session(&self) -> Option<Session> {
        self.data().session.clone()
    }

    async fn fresh_session(&self) -> ApiResult<Session> {
        let mut data = self.data();
        let session = data.session.clone().ok_or(BackendError::NotSignedIn)?;
        if session.needs_refresh(Utc::now()) {
            debug!("memory auth: refreshing session for {}", session.uid);
            return Ok(data.issue_session(&session.uid, &session.email));
        }
        Ok(session)
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> ApiResult<Session> {
        let mut data = self.data();
        let account = data
            .accounts
            .get(email)
            .cloned()
            .ok_or(AuthFailure::UnknownAccount)?;
        if account.password.as_deref() != Some(password) {
            return Err(AuthFailure::InvalidCredentials.into());
        }
        Ok(data.issue_session(&account.uid, email))
    }

    async fn sign_in_with_id_token(
        &self,
        provider: FederatedProvider,
        id_token: &str,
    ) -> ApiResult<Session> {
        let subject = id_token.trim();
        if subject.is_empty() {
            return Err(AuthFailure::FederatedRejected.into());
        }
        let email = if subject.contains('@') {
            subject.to_string()
        } else {
            format!("{subject}@federated.local")
        };

        let mut data = self.data();
        let key = format!("{}:{subject}", provider.provider_id());
        let existing = data.accounts.get(&key).map(|account| account.uid.clone());
        let uid = match existing {
            Some(uid) => uid,
            None => Self::create_account(&mut data, key, &email, None),
        };
        Ok(data.issue_session(&uid, &email))
    }

    async fn sign_up(&self, email: &str, password: &str) -> ApiResult<Session> {
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AuthFailure::WeakPassword.into());
        }
        let mut data = self.data();
        if data.accounts.contains_key(email) {
            return Err(AuthFailure::EmailTaken.into());
        }
        let uid = Self::create_account(&mut data, email.to_string(), email, Some(password.to_string()));
        Ok(data.issue_session(&uid, email))
    }

    async fn sign_out(&self) -> ApiResult<()> {
        self.data().session = None;
        Ok(())
    }
}

fn default_address(email: &str) -> DeliveryAddress {
    let name = email.split('@').next().unwrap_or(email).to_string();
    DeliveryAddress {
        address_id: 1,
        name,
        phone_number: "6200000000".into(),
        address: "12 Station Road".into(),
        locality: "Pandaul".into(),
        city: "Madhubani".into(),
        state: "Bihar".into(),
        pincode: "847234".into(),
        country: "India".into(),
    }
}

fn seed_categories() -> Vec<Category> {
    ["Vegetables", "Fruits", "Dairy", "Bakery", "Beverages"]
        .into_iter()
        .map(|name| Category {
            name: name.to_string(),
            image_url: None,
        })
        .collect()
}

fn seed_items() -> Vec<Item> {
    let rows: [(&str, &str, i64, &str); 12] = [
        ("Vegetables", "Tomato", 40, "KG"),
        ("Vegetables", "Potato", 30, "KG"),
        ("Vegetables", "Spinach", 25, "Bunch"),
        ("Fruits", "Banana", 60, "Dozen"),
        ("Fruits", "Apple", 150, "KG"),
        ("Fruits", "Mango", 120, "KG"),
        ("Dairy", "Milk", 56, "Litre"),
        ("Dairy", "Paneer", 90, "200g"),
        ("Bakery", "Brown Bread", 45, "Loaf"),
        ("Bakery", "Rusk", 35, "Pack"),
        ("Beverages", "Green Tea", 180, "Box"),
        ("Beverages", "Orange Juice", 110, "Litre"),
    ];
    rows.into_iter()
        .enumerate()
        .map(|(i, (category, name, rupees, unit))| Item {
            id: format!("item-{}", i + 1),
            name: name.to_string(),
            category: category.to_string(),
            price: Price::from_rupees(rupees),
            unit: unit.to_string(),
            image_url: None,
            description: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sign_up_then_sign_in() {
        let backend = InMemoryBackend::seeded();
        let created = backend.sign_up("asha@dashdrop.in", "secret1").await.unwrap();
        backend.sign_out().await.unwrap();
        assert!(!backend.is_signed_in());

        let session = backend
            .sign_in_with_password("asha@dashdrop.in", "secret1")
            .await
            .unwrap();
        assert_eq!(session.uid, created.uid);
        assert!(backend.is_signed_in());

        let wrong = backend
            .sign_in_with_password("asha@dashdrop.in", "nope")
            .await
            .unwrap_err();
        assert!(matches!(wrong, BackendError::Auth(AuthFailure::InvalidCredentials)));
        assert!(matches!(
            backend.sign_up("asha@dashdrop.in", "secret1").await,
            Err(BackendError::Auth(AuthFailure::EmailTaken))
        ));
        assert!(matches!(
            backend.sign_up("new@dashdrop.in", "123").await,
            Err(BackendError::Auth(AuthFailure::WeakPassword))
        ));
    }

    #[tokio::test]
    async fn store_requires_current_session() {
        let backend = InMemoryBackend::seeded();
        let session = backend.sign_up("ravi@dashdrop.in", "secret1").await.unwrap();
        assert_eq!(backend.cart(&session).await.unwrap(), vec![]);

        backend.sign_out().await.unwrap();
        assert!(backend.cart(&session).await.is_err());
        assert!(matches!(
            backend.fresh_session().await,
            Err(BackendError::NotSignedIn)
        ));
    }

    #[tokio::test]
    async fn cart_favourites_and_orders() {
        let backend = InMemoryBackend::seeded();
        let session = backend.sign_up("meera@dashdrop.in", "secret1").await.unwrap();
        let tomatoes = backend
            .items_in_category(&session, "Vegetables")
            .await
            .unwrap()
            .remove(0);

        backend
            .add_to_cart(&session, CartLine::for_item(&tomatoes, 2))
            .await
            .unwrap();
        backend
            .add_to_favourites(&session, tomatoes.clone())
            .await
            .unwrap();
        backend
            .add_to_favourites(&session, tomatoes.clone())
            .await
            .unwrap();

        let cart = backend.cart(&session).await.unwrap();
        assert_eq!(cart.len(), 1);
        assert!(cart[0].id.is_some());
        assert_eq!(backend.favourites(&session).await.unwrap().len(), 1);

        let address = backend.addresses(&session).await.unwrap().remove(0);
        let order = Order::new(address.address_id, cart);
        assert_eq!(order.total, Price::from_rupees(80));
        backend.place_order(&session, order.clone()).await.unwrap();
        assert!(backend.cart(&session).await.unwrap().is_empty());
        assert_eq!(backend.orders(&session.uid).len(), 1);

        // a replayed order is stored once and spares lines added since
        backend
            .add_to_cart(&session, CartLine::for_item(&tomatoes, 1))
            .await
            .unwrap();
        let id = backend.place_order(&session, order.clone()).await.unwrap();
        assert_eq!(id, order.id);
        assert_eq!(backend.orders(&session.uid), vec![order]);
        assert_eq!(backend.cart(&session).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn federated_accounts_are_reused() {
        let backend = InMemoryBackend::seeded();
        let first = backend
            .sign_in_with_id_token(FederatedProvider::Google, "asha@gmail.com")
            .await
            .unwrap();
        let second = backend
            .sign_in_with_id_token(FederatedProvider::Google, "asha@gmail.com")
            .await
            .unwrap();
        assert_eq!(first.uid, second.uid);
        assert_eq!(second.email, "asha@gmail.com");
        assert!(backend
            .sign_in_with_id_token(FederatedProvider::Google, "  ")
            .await
            .is_err());
    }
}
