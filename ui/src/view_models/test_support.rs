use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use api::memory::InMemoryBackend;
use api::ApiResult;
use api::AuthProvider;
use api::Backend;
use api::BackendError;
use api::CartLine;
use api::Category;
use api::DeliveryAddress;
use api::GroceryStore;
use api::Item;
use api::Order;
use api::Session;
use api::UserProfile;
use async_trait::async_trait;
use tokio::sync::Semaphore;

use super::Services;
use crate::navigation::Navigator;

pub const EMAIL: &str = "asha@example.in";
pub const PASSWORD: &str = "secret1";

/// Delegates to an in-memory backend, but every call first waits for a
/// permit, so tests can observe requests while they are in flight.
pub struct GatedStore {
    inner: InMemoryBackend,
    gate: Semaphore,
    calls: AtomicUsize,
    lose_order_reply: AtomicBool,
}

impl GatedStore {
    pub fn new(inner: InMemoryBackend) -> Arc<Self> {
        Arc::new(Self {
            inner,
            gate: Semaphore::new(0),
            calls: AtomicUsize::new(0),
            lose_order_reply: AtomicBool::new(false),
        })
    }

    /// Lets `n` waiting (or future) calls through.
    pub fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }

    /// The next order is stored, but the caller is told it failed.
    pub fn lose_next_order_reply(&self) {
        self.lose_order_reply.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn pass(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(permit) = self.gate.acquire().await {
            permit.forget();
        }
    }
}

#[async_trait]
impl GroceryStore for GatedStore {
    async fn categories(&self, session: &Session) -> ApiResult<Vec<Category>> {
        self.pass().await;
        self.inner.categories(session).await
    }

    async fn items_in_category(&self, session: &Session, category: &str) -> ApiResult<Vec<Item>> {
        self.pass().await;
        self.inner.items_in_category(session, category).await
    }

    async fn cart(&self, session: &Session) -> ApiResult<Vec<CartLine>> {
        self.pass().await;
        self.inner.cart(session).await
    }

    async fn add_to_cart(&self, session: &Session, line: CartLine) -> ApiResult<()> {
        self.pass().await;
        self.inner.add_to_cart(session, line).await
    }

    async fn favourites(&self, session: &Session) -> ApiResult<Vec<Item>> {
        self.pass().await;
        self.inner.favourites(session).await
    }

    async fn add_to_favourites(&self, session: &Session, item: Item) -> ApiResult<()> {
        self.pass().await;
        self.inner.add_to_favourites(session, item).await
    }

    async fn addresses(&self, session: &Session) -> ApiResult<Vec<DeliveryAddress>> {
        self.pass().await;
        self.inner.addresses(session).await
    }

    async fn profile(&self, session: &Session) -> ApiResult<Option<UserProfile>> {
        self.pass().await;
        self.inner.profile(session).await
    }

    async fn save_profile(&self, session: &Session, profile: UserProfile) -> ApiResult<()> {
        self.pass().await;
        self.inner.save_profile(session, profile).await
    }

    async fn place_order(&self, session: &Session, order: Order) -> ApiResult<String> {
        self.pass().await;
        let id = self.inner.place_order(session, order).await?;
        if self.lose_order_reply.swap(false, Ordering::SeqCst) {
            return unavailable();
        }
        Ok(id)
    }
}

/// A store whose every call fails the way an unreachable server would.
pub struct FailingStore;

fn unavailable<T>() -> ApiResult<T> {
    Err(BackendError::Status {
        code: 503,
        message: "service unavailable".into(),
    })
}

#[async_trait]
impl GroceryStore for FailingStore {
    async fn categories(&self, _: &Session) -> ApiResult<Vec<Category>> {
        unavailable()
    }

    async fn items_in_category(&self, _: &Session, _: &str) -> ApiResult<Vec<Item>> {
        unavailable()
    }

    async fn cart(&self, _: &Session) -> ApiResult<Vec<CartLine>> {
        unavailable()
    }

    async fn add_to_cart(&self, _: &Session, _: CartLine) -> ApiResult<()> {
        unavailable()
    }

    async fn favourites(&self, _: &Session) -> ApiResult<Vec<Item>> {
        unavailable()
    }

    async fn add_to_favourites(&self, _: &Session, _: Item) -> ApiResult<()> {
        unavailable()
    }

    async fn addresses(&self, _: &Session) -> ApiResult<Vec<DeliveryAddress>> {
        unavailable()
    }

    async fn profile(&self, _: &Session) -> ApiResult<Option<UserProfile>> {
        unavailable()
    }

    async fn save_profile(&self, _: &Session, _: UserProfile) -> ApiResult<()> {
        unavailable()
    }

    async fn place_order(&self, _: &Session, _: Order) -> ApiResult<String> {
        unavailable()
    }
}

/// Services over `store`, authenticated by `auth`.
pub fn services(store: Arc<dyn GroceryStore>, auth: &InMemoryBackend) -> Services {
    let auth: Arc<dyn AuthProvider> = Arc::new(auth.clone());
    let backend = Backend::from_parts(store, auth.clone(), Duration::from_secs(300));
    Services::new(backend, Navigator::new(auth), Duration::from_secs(5))
}

/// A seeded in-memory backend with a signed-in account.
pub async fn signed_in() -> (InMemoryBackend, Session) {
    let backend = InMemoryBackend::seeded();
    let session = backend
        .sign_up(EMAIL, PASSWORD)
        .await
        .expect("sign up");
    (backend, session)
}

/// Services straight over a signed-in in-memory backend.
pub async fn memory_services() -> (Services, InMemoryBackend, Session) {
    let (backend, session) = signed_in().await;
    let services = services(Arc::new(backend.clone()), &backend);
    (services, backend, session)
}

pub fn item(id: &str, category: &str, rupees: i64) -> Item {
    Item {
        id: id.into(),
        name: format!("Item {id}"),
        category: category.into(),
        price: api::Price::from_rupees(rupees),
        unit: "KG".into(),
        image_url: None,
        description: None,
    }
}
