//! The document store contract.

use async_trait::async_trait;

use crate::auth::Session;
use crate::error::ApiResult;
use crate::models::CartLine;
use crate::models::Category;
use crate::models::DeliveryAddress;
use crate::models::Item;
use crate::models::Order;
use crate::models::UserProfile;

/// Reads and writes the grocery documents on behalf of a signed-in user.
///
/// Every call is a single request/response exchange. Writes report only
/// whether the store accepted them; the UI learns the new contents from the
/// next read.
#[async_trait]
pub trait GroceryStore: Send + Sync {
    async fn categories(&self, session: &Session) -> ApiResult<Vec<Category>>;

    async fn items_in_category(&self, session: &Session, category: &str) -> ApiResult<Vec<Item>>;

    async fn cart(&self, session: &Session) -> ApiResult<Vec<CartLine>>;

    async fn add_to_cart(&self, session: &Session, line: CartLine) -> ApiResult<()>;

    async fn favourites(&self, session: &Session) -> ApiResult<Vec<Item>>;

    async fn add_to_favourites(&self, session: &Session, item: Item) -> ApiResult<()>;

    async fn addresses(&self, session: &Session) -> ApiResult<Vec<DeliveryAddress>>;

    /// The signed-in user's profile, `None` if it was never stored.
    async fn profile(&self, session: &Session) -> ApiResult<Option<UserProfile>>;

    async fn save_profile(&self, session: &Session, profile: UserProfile) -> ApiResult<()>;

    /// Stores `order` under its own id and removes the cart lines it was
    /// built from, as one write. Placing the same order again changes
    /// nothing. Returns the order's id.
    async fn place_order(&self, session: &Session, order: Order) -> ApiResult<String>;
}
