//! Records exchanged with the document store.
//!
//! These are plain immutable values: the UI renders them as fetched and
//! never edits them in place.

use chrono::DateTime;
use chrono::Utc;
use itertools::Itertools;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::price::Price;

pub type ItemId = String;
pub type AddressId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub image_url: Option<String>,
}

/// A catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub category: String,
    pub price: Price,
    /// Selling unit shown after the price, e.g. "KG".
    pub unit: String,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

/// One row of a user's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Document id, absent until the store has assigned one.
    pub id: Option<String>,
    pub item_id: ItemId,
    pub name: String,
    pub price: Price,
    pub quantity: u32,
    pub unit: String,
    pub image_url: Option<String>,
}

impl CartLine {
    pub fn for_item(item: &Item, quantity: u32) -> Self {
        Self {
            id: None,
            item_id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            quantity,
            unit: item.unit.clone(),
            image_url: item.image_url.clone(),
        }
    }

    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryAddress {
    pub address_id: AddressId,
    pub name: String,
    pub phone_number: String,
    pub address: String,
    pub locality: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub country: String,
}

impl DeliveryAddress {
    /// Single-line form, e.g. "12 Station Road, Pandaul, Madhubani, Bihar 847234".
    /// Blank parts are skipped.
    pub fn one_line(&self) -> String {
        let state = format!("{} {}", self.state.trim(), self.pincode.trim());
        let line = [
            self.address.trim(),
            self.locality.trim(),
            self.city.trim(),
            state.trim(),
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .join(", ");
        line
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub uid: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Chosen when the order is built, so storing it again overwrites
    /// instead of duplicating.
    pub id: String,
    pub address_id: AddressId,
    pub lines: Vec<CartLine>,
    pub total: Price,
    pub placed_at: DateTime<Utc>,
}

impl Order {
    pub fn new(address_id: AddressId, lines: Vec<CartLine>) -> Self {
        let total = lines.iter().map(CartLine::line_total).sum();
        Self {
            id: Uuid::new_v4().to_string(),
            address_id,
            lines,
            total,
            placed_at: Utc::now(),
        }
    }

    /// Store ids of the cart lines this order consumes.
    pub fn line_ids(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().filter_map(|line| line.id.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(locality: &str) -> DeliveryAddress {
        DeliveryAddress {
            address_id: 1,
            name: "Asha".to_string(),
            phone_number: "9800000000".to_string(),
            address: "12 Station Road".to_string(),
            locality: locality.to_string(),
            city: "Madhubani".to_string(),
            state: "Bihar".to_string(),
            pincode: "847234".to_string(),
            country: "India".to_string(),
        }
    }

    #[test]
    fn one_line_skips_blank_parts() {
        assert_eq!(
            address("Pandaul").one_line(),
            "12 Station Road, Pandaul, Madhubani, Bihar 847234"
        );
        assert_eq!(
            address("  ").one_line(),
            "12 Station Road, Madhubani, Bihar 847234"
        );
    }
}
