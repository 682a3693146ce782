//! Flattening of an order and its user into one CSV row

use crate::formatter::{BsonConverter, PlainTextConverter, datetime_to_export_string};

use super::model::{Order, User};

/// Placeholder for a missing user or food
pub const UNKNOWN: &str = "Unknown";

/// Column names, in output order
pub const HEADERS: [&str; 10] = [
    "_id",
    "user_name",
    "email",
    "food_name",
    "totalPrice",
    "status",
    "createdAt",
    "updatedAt",
    "paymentId",
    "quantity",
];

/// One exported order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportRow {
    pub id: String,
    pub user_name: String,
    pub email: String,
    pub food_name: String,
    pub total_price: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
    pub payment_id: String,
    pub quantity: String,
}

impl ExportRow {
    /// Build the row for `order`, with `user` being the resolved reference
    ///
    /// Defaults:
    /// - no user: `user_name` and `email` are `"Unknown"`
    /// - no first item, or a first item without food name: `food_name` is `"Unknown"`
    /// - no first item, or no quantity: `quantity` is empty
    /// - everything else missing renders empty
    pub fn build(order: &Order, user: Option<&User>, converter: &PlainTextConverter) -> Self {
        let (user_name, email) = match user {
            Some(user) => (
                converter.convert_optional(user.name.as_ref()),
                converter.convert_optional(user.email.as_ref()),
            ),
            None => (UNKNOWN.to_string(), UNKNOWN.to_string()),
        };

        let food_name = order
            .first_item
            .as_ref()
            .and_then(|item| item.food.as_ref())
            .and_then(|food| food.name.as_ref())
            .map(|name| converter.convert(name))
            .unwrap_or_else(|| UNKNOWN.to_string());

        let quantity = converter.convert_optional(
            order
                .first_item
                .as_ref()
                .and_then(|item| item.quantity.as_ref()),
        );

        Self {
            id: converter.convert_optional(order.id.as_ref()),
            user_name,
            email,
            food_name,
            total_price: converter.convert_optional(order.total_price.as_ref()),
            status: converter.convert_optional(order.status.as_ref()),
            created_at: order
                .created_at
                .as_ref()
                .and_then(datetime_to_export_string)
                .unwrap_or_default(),
            updated_at: order
                .updated_at
                .as_ref()
                .and_then(datetime_to_export_string)
                .unwrap_or_default(),
            payment_id: converter.convert_optional(order.payment_id.as_ref()),
            quantity,
        }
    }

    /// Field values in [`HEADERS`] order
    pub fn fields(&self) -> [&str; 10] {
        [
            self.id.as_str(),
            self.user_name.as_str(),
            self.email.as_str(),
            self.food_name.as_str(),
            self.total_price.as_str(),
            self.status.as_str(),
            self.created_at.as_str(),
            self.updated_at.as_str(),
            self.payment_id.as_str(),
            self.quantity.as_str(),
        ]
    }
}
