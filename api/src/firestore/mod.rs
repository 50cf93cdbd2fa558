//! Cloud Firestore over its REST API.

pub mod codec;
pub mod value;

use async_trait::async_trait;
use dioxus_logger::tracing::debug;
use reqwest::RequestBuilder;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::auth::Session;
use crate::config::FirebaseConfig;
use crate::error::ApiResult;
use crate::error::AuthFailure;
use crate::error::BackendError;
use crate::models::CartLine;
use crate::models::Category;
use crate::models::DeliveryAddress;
use crate::models::Item;
use crate::models::Order;
use crate::models::UserProfile;
use crate::store::GroceryStore;
use codec::decode_all;
use codec::FromDocument;
use codec::ToFields;
use value::Document;
use value::DocumentBody;
use value::Fields;
use value::Value;

const PAGE_SIZE: &str = "300";

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<Document>,
    next_page_token: Option<String>,
}

#[derive(Deserialize, Debug)]
struct RunQueryEntry {
    document: Option<Document>,
}

#[derive(Deserialize, Debug)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize, Debug)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

/// A [`GroceryStore`] backed by Cloud Firestore.
///
/// Layout: `categories`, `items` (filtered on `category`), and per user
/// `users/{uid}` with `cart`, `favourites`, `addresses` and `orders`
/// subcollections.
#[derive(Clone)]
pub struct FirestoreStore {
    http: reqwest::Client,
    documents_url: String,
    documents_name: String,
}

impl FirestoreStore {
    pub fn new(config: &FirebaseConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            documents_url: config.documents_url(),
            documents_name: config.documents_name(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.documents_url, path)
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> ApiResult<T> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|e| e.error)
            .unwrap_or(ErrorBody {
                message: body,
                status: String::new(),
            });
        Err(match status {
            StatusCode::UNAUTHORIZED => AuthFailure::SessionExpired.into(),
            StatusCode::NOT_FOUND => BackendError::NotFound(detail.message),
            _ => BackendError::Status {
                code: status.as_u16(),
                message: format!("{} {}", detail.status, detail.message)
                    .trim()
                    .to_string(),
            },
        })
    }

    /// All documents of a collection, following page tokens.
    async fn list(&self, session: &Session, collection: &str) -> ApiResult<Vec<Document>> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut request = self
                .http
                .get(self.url(collection))
                .bearer_auth(&session.id_token)
                .query(&[("pageSize", PAGE_SIZE)]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }
            let page: ListDocumentsResponse = Self::send(request).await?;
            documents.extend(page.documents);
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
        debug!("firestore: listed {} documents in {collection}", documents.len());
        Ok(documents)
    }

    async fn get(&self, session: &Session, path: &str) -> ApiResult<Option<Document>> {
        let request = self.http.get(self.url(path)).bearer_auth(&session.id_token);
        match Self::send::<Document>(request).await {
            Ok(doc) => Ok(Some(doc)),
            Err(BackendError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn create(&self, session: &Session, collection: &str, fields: &Fields) -> ApiResult<Document> {
        let request = self
            .http
            .post(self.url(collection))
            .bearer_auth(&session.id_token)
            .json(&DocumentBody { fields });
        Self::send(request).await
    }

    async fn patch(&self, session: &Session, path: &str, fields: &Fields) -> ApiResult<Document> {
        let request = self
            .http
            .patch(self.url(path))
            .bearer_auth(&session.id_token)
            .json(&DocumentBody { fields });
        Self::send(request).await
    }

    /// Documents of `collection` whose `field` equals `value`.
    async fn query_eq(
        &self,
        session: &Session,
        collection: &str,
        field: &str,
        value: Value,
    ) -> ApiResult<Vec<Document>> {
        let body = json!({
            "structuredQuery": {
                "from": [{ "collectionId": collection }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": field },
                        "op": "EQUAL",
                        "value": value,
                    }
                }
            }
        });
        let request = self
            .http
            .post(format!("{}:runQuery", self.documents_url))
            .bearer_auth(&session.id_token)
            .json(&body);
        let entries: Vec<RunQueryEntry> = Self::send(request).await?;
        Ok(entries.into_iter().filter_map(|e| e.document).collect())
    }

    fn user_path(session: &Session, sub: &str) -> String {
        format!("users/{}/{sub}", session.uid)
    }
}

#[async_trait]
impl GroceryStore for FirestoreStore {
    async fn categories(&self, session: &Session) -> ApiResult<Vec<Category>> {
        decode_all(&self.list(session, "categories").await?)
    }

    async fn items_in_category(&self, session: &Session, category: &str) -> ApiResult<Vec<Item>> {
        let docs = self
            .query_eq(session, "items", "category", Value::string(category))
            .await?;
        decode_all(&docs)
    }

    async fn cart(&self, session: &Session) -> ApiResult<Vec<CartLine>> {
        decode_all(&self.list(session, &Self::user_path(session, "cart")).await?)
    }

    async fn add_to_cart(&self, session: &Session, line: CartLine) -> ApiResult<()> {
        self.create(session, &Self::user_path(session, "cart"), &line.to_fields())
            .await?;
        Ok(())
    }

    async fn favourites(&self, session: &Session) -> ApiResult<Vec<Item>> {
        decode_all(&self.list(session, &Self::user_path(session, "favourites")).await?)
    }

    async fn add_to_favourites(&self, session: &Session, item: Item) -> ApiResult<()> {
        // keyed by item id so favouriting twice keeps one document
        let path = Self::user_path(session, &format!("favourites/{}", item.id));
        self.patch(session, &path, &item.to_fields()).await?;
        Ok(())
    }

    async fn addresses(&self, session: &Session) -> ApiResult<Vec<DeliveryAddress>> {
        decode_all(&self.list(session, &Self::user_path(session, "addresses")).await?)
    }

    async fn profile(&self, session: &Session) -> ApiResult<Option<UserProfile>> {
        let path = format!("users/{}", session.uid);
        self.get(session, &path)
            .await?
            .map(|doc| UserProfile::from_document(&doc))
            .transpose()
    }

    async fn save_profile(&self, session: &Session, profile: UserProfile) -> ApiResult<()> {
        let path = format!("users/{}", session.uid);
        self.patch(session, &path, &profile.to_fields()).await?;
        Ok(())
    }

    async fn place_order(&self, session: &Session, order: Order) -> ApiResult<String> {
        let body = order_commit(&self.documents_name, &session.uid, &order);
        let request = self
            .http
            .post(format!("{}:commit", self.documents_url))
            .bearer_auth(&session.id_token)
            .json(&body);
        let _: serde_json::Value = Self::send(request).await?;
        debug!(
            "firestore: committed order {} and removed {} cart line(s)",
            order.id,
            order.line_ids().count()
        );
        Ok(order.id)
    }
}

/// One atomic `:commit` body: write the order under its own id and delete
/// exactly the cart lines it was built from.
///
/// Replaying the same commit leaves the same result, and lines added to the
/// cart after the order was built are kept.
fn order_commit(documents_name: &str, uid: &str, order: &Order) -> serde_json::Value {
    let user = format!("{documents_name}/users/{uid}");
    let mut writes = vec![json!({
        "update": {
            "name": format!("{user}/orders/{}", order.id),
            "fields": order.to_fields(),
        }
    })];
    writes.extend(
        order
            .line_ids()
            .map(|id| json!({ "delete": format!("{user}/cart/{id}") })),
    );
    json!({ "writes": writes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::price::Price;

    fn line(id: Option<&str>) -> CartLine {
        CartLine {
            id: id.map(str::to_string),
            item_id: "milk".into(),
            name: "Milk".into(),
            price: Price::from_rupees(56),
            quantity: 1,
            unit: "Litre".into(),
            image_url: None,
        }
    }

    #[test]
    fn order_commit_deletes_only_the_ordered_lines() {
        let order = Order::new(3, vec![line(Some("c1")), line(None), line(Some("c2"))]);
        let body = order_commit("projects/p/databases/(default)/documents", "u1", &order);
        let writes = body["writes"].as_array().unwrap();

        assert_eq!(writes.len(), 3);
        assert_eq!(
            writes[0]["update"]["name"],
            format!("projects/p/databases/(default)/documents/users/u1/orders/{}", order.id)
        );
        assert_eq!(writes[0]["update"]["fields"]["address_id"]["integerValue"], "3");
        assert_eq!(
            writes[1]["delete"],
            "projects/p/databases/(default)/documents/users/u1/cart/c1"
        );
        assert_eq!(
            writes[2]["delete"],
            "projects/p/databases/(default)/documents/users/u1/cart/c2"
        );
    }

    #[test]
    fn replaying_an_order_commit_targets_the_same_documents() {
        let order = Order::new(3, vec![line(Some("c1"))]);
        let first = order_commit("projects/p/databases/(default)/documents", "u1", &order);
        let again = order_commit("projects/p/databases/(default)/documents", "u1", &order.clone());
        assert_eq!(first, again);
    }
}
