//! Mapping between documents and the app's records.

use crate::error::ApiResult;
use crate::error::BackendError;
use crate::models::CartLine;
use crate::models::Category;
use crate::models::DeliveryAddress;
use crate::models::Item;
use crate::models::Order;
use crate::models::UserProfile;

use super::value::Document;
use super::value::Fields;
use super::value::Value;

pub trait FromDocument: Sized {
    fn from_document(doc: &Document) -> ApiResult<Self>;
}

pub trait ToFields {
    fn to_fields(&self) -> Fields;
}

/// Decodes every document, failing on the first malformed one.
pub fn decode_all<T: FromDocument>(docs: &[Document]) -> ApiResult<Vec<T>> {
    docs.iter().map(T::from_document).collect()
}

impl FromDocument for Category {
    fn from_document(doc: &Document) -> ApiResult<Self> {
        Ok(Self {
            name: doc.fields.string("category_name")?,
            image_url: doc.fields.opt_string("image_url")?,
        })
    }
}

impl FromDocument for Item {
    fn from_document(doc: &Document) -> ApiResult<Self> {
        let f = &doc.fields;
        Ok(Self {
            // favourites keep the catalog id in a field; catalog items use the document id
            id: f.opt_string("item_id")?.unwrap_or_else(|| doc.id().to_string()),
            name: f.string("item_name")?,
            category: f.opt_string("category")?.unwrap_or_default(),
            price: f.price("item_price")?,
            unit: f.opt_string("unit")?.unwrap_or_else(|| "KG".to_string()),
            image_url: f.opt_string("image_url")?,
            description: f.opt_string("description")?,
        })
    }
}

impl ToFields for Item {
    fn to_fields(&self) -> Fields {
        Fields::new()
            .with("item_id", Value::string(&self.id))
            .with("item_name", Value::string(&self.name))
            .with("category", Value::string(&self.category))
            .with("item_price", Value::string(self.price.to_string()))
            .with("unit", Value::string(&self.unit))
            .with("image_url", Value::optional_string(self.image_url.as_deref()))
            .with("description", Value::optional_string(self.description.as_deref()))
    }
}

fn cart_line_from_fields(f: &Fields, id: Option<String>) -> ApiResult<CartLine> {
    let quantity = f.integer("quantity")?;
    Ok(CartLine {
        id,
        item_id: f.opt_string("item_id")?.unwrap_or_default(),
        name: f.string("item_name")?,
        price: f.price("item_price")?,
        quantity: u32::try_from(quantity)
            .map_err(|_| BackendError::Decode(format!("invalid quantity {quantity}")))?,
        unit: f.opt_string("unit")?.unwrap_or_else(|| "KG".to_string()),
        image_url: f.opt_string("image_url")?,
    })
}

impl FromDocument for CartLine {
    fn from_document(doc: &Document) -> ApiResult<Self> {
        cart_line_from_fields(&doc.fields, Some(doc.id().to_string()))
    }
}

impl ToFields for CartLine {
    fn to_fields(&self) -> Fields {
        Fields::new()
            .with("item_id", Value::string(&self.item_id))
            .with("item_name", Value::string(&self.name))
            .with("item_price", Value::string(self.price.to_string()))
            .with("quantity", Value::integer(i64::from(self.quantity)))
            .with("unit", Value::string(&self.unit))
            .with("image_url", Value::optional_string(self.image_url.as_deref()))
    }
}

impl FromDocument for DeliveryAddress {
    fn from_document(doc: &Document) -> ApiResult<Self> {
        let f = &doc.fields;
        Ok(Self {
            address_id: f.integer("address_id")?,
            name: f.string("name")?,
            phone_number: f.opt_string("phone_number")?.unwrap_or_default(),
            address: f.string("address")?,
            locality: f.opt_string("locality")?.unwrap_or_default(),
            city: f.string("city")?,
            state: f.string("state")?,
            pincode: f.string("pincode")?,
            country: f.opt_string("country")?.unwrap_or_else(|| "India".to_string()),
        })
    }
}

impl FromDocument for UserProfile {
    fn from_document(doc: &Document) -> ApiResult<Self> {
        Ok(Self {
            uid: doc.id().to_string(),
            name: doc.fields.opt_string("name")?.unwrap_or_default(),
            email: doc.fields.opt_string("email")?.unwrap_or_default(),
        })
    }
}

impl ToFields for UserProfile {
    fn to_fields(&self) -> Fields {
        Fields::new()
            .with("name", Value::string(&self.name))
            .with("email", Value::string(&self.email))
    }
}

impl FromDocument for Order {
    fn from_document(doc: &Document) -> ApiResult<Self> {
        let f = &doc.fields;
        let lines = f
            .array("lines")?
            .iter()
            .map(|v| match v {
                Value::MapValue(m) => cart_line_from_fields(&m.fields, None),
                other => Err(BackendError::Decode(format!(
                    "order line should be a map, found {other:?}"
                ))),
            })
            .collect::<ApiResult<Vec<_>>>()?;
        Ok(Self {
            id: doc.id().to_string(),
            address_id: f.integer("address_id")?,
            lines,
            total: f.price("total")?,
            placed_at: f.timestamp("placed_at")?,
        })
    }
}

impl ToFields for Order {
    fn to_fields(&self) -> Fields {
        let lines = self
            .lines
            .iter()
            .map(|line| Value::map(line.to_fields()))
            .collect();
        Fields::new()
            .with("address_id", Value::integer(self.address_id))
            .with("lines", Value::array(lines))
            .with("total", Value::string(self.total.to_string()))
            .with("placed_at", Value::timestamp(self.placed_at))
    }
}
