//! Typed views over order and user documents
//!
//! Documents are read untyped and projected field by field. Every field is
//! optional, and BSON `null` is folded into `None` so "missing" and "null"
//! render the same way. Shapes that cannot be projected are recorded as
//! [`ShapeIssue`]s instead of failing the document.

use std::fmt;

use mongodb::bson::{Bson, DateTime, Document};

/// Field names in the `orders` collection
pub mod fields {
    pub const ID: &str = "_id";
    pub const USER: &str = "user";
    pub const ITEMS: &str = "items";
    pub const FOOD: &str = "food";
    pub const FOOD_NAME: &str = "name";
    pub const QUANTITY: &str = "quantity";
    pub const TOTAL_PRICE: &str = "totalPrice";
    pub const STATUS: &str = "status";
    pub const CREATED_AT: &str = "createdAt";
    pub const UPDATED_AT: &str = "updatedAt";
    pub const PAYMENT_ID: &str = "paymentId";
    pub const USER_NAME: &str = "name";
    pub const USER_EMAIL: &str = "email";
}

/// A field that was present but not of the expected shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeIssue {
    /// `items` is not an array
    ItemsNotArray,
    /// `items[0]` is not a sub-document
    ItemNotDocument,
    /// `items[0].food` is not a sub-document
    FoodNotDocument,
    /// A timestamp field is not a BSON datetime
    NotADate(&'static str),
}

impl fmt::Display for ShapeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeIssue::ItemsNotArray => write!(f, "'items' is not an array"),
            ShapeIssue::ItemNotDocument => write!(f, "'items[0]' is not a document"),
            ShapeIssue::FoodNotDocument => write!(f, "'items[0].food' is not a document"),
            ShapeIssue::NotADate(field) => write!(f, "'{field}' is not a date"),
        }
    }
}

/// Food referenced by an order item
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Food {
    pub name: Option<Bson>,
}

/// First entry of an order's `items` array
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Item {
    pub food: Option<Food>,
    pub quantity: Option<Bson>,
}

/// An order document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Order {
    pub id: Option<Bson>,
    /// Reference to `users._id`
    pub user: Option<Bson>,
    /// Only the first item is kept
    pub first_item: Option<Item>,
    pub total_price: Option<Bson>,
    pub status: Option<Bson>,
    pub created_at: Option<DateTime>,
    pub updated_at: Option<DateTime>,
    pub payment_id: Option<Bson>,
    pub issues: Vec<ShapeIssue>,
}

/// A user document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct User {
    pub id: Option<Bson>,
    pub name: Option<Bson>,
    pub email: Option<Bson>,
}

/// Look up a field, folding `null` and `undefined` into absence
fn present<'a>(doc: &'a Document, key: &str) -> Option<&'a Bson> {
    match doc.get(key) {
        None | Some(Bson::Null) | Some(Bson::Undefined) => None,
        Some(value) => Some(value),
    }
}

fn present_owned(doc: &Document, key: &str) -> Option<Bson> {
    present(doc, key).cloned()
}

impl Order {
    /// Project an order document
    pub fn from_document(doc: &Document) -> Self {
        let mut issues = Vec::new();

        let first_item = match present(doc, fields::ITEMS) {
            None => None,
            Some(Bson::Array(items)) => items
                .first()
                .and_then(|value| Item::from_bson(value, &mut issues)),
            Some(_) => {
                issues.push(ShapeIssue::ItemsNotArray);
                None
            }
        };

        let created_at = Self::date_field(doc, fields::CREATED_AT, &mut issues);
        let updated_at = Self::date_field(doc, fields::UPDATED_AT, &mut issues);

        Self {
            id: present_owned(doc, fields::ID),
            user: present_owned(doc, fields::USER),
            first_item,
            total_price: present_owned(doc, fields::TOTAL_PRICE),
            status: present_owned(doc, fields::STATUS),
            created_at,
            updated_at,
            payment_id: present_owned(doc, fields::PAYMENT_ID),
            issues,
        }
    }

    /// Whether the order has no usable first item
    pub fn has_no_items(&self) -> bool {
        self.first_item.is_none()
    }

    fn date_field(
        doc: &Document,
        key: &'static str,
        issues: &mut Vec<ShapeIssue>,
    ) -> Option<DateTime> {
        match present(doc, key) {
            None => None,
            Some(Bson::DateTime(dt)) => Some(*dt),
            Some(_) => {
                issues.push(ShapeIssue::NotADate(key));
                None
            }
        }
    }
}

impl Item {
    /// Project `items[0]`; `None` when it is null or not a document
    fn from_bson(value: &Bson, issues: &mut Vec<ShapeIssue>) -> Option<Self> {
        let doc = match value {
            Bson::Document(doc) => doc,
            Bson::Null | Bson::Undefined => return None,
            _ => {
                issues.push(ShapeIssue::ItemNotDocument);
                return None;
            }
        };

        let food = match present(doc, fields::FOOD) {
            None => None,
            Some(Bson::Document(food)) => Some(Food {
                name: present_owned(food, fields::FOOD_NAME),
            }),
            Some(_) => {
                issues.push(ShapeIssue::FoodNotDocument);
                None
            }
        };

        Some(Self {
            food,
            quantity: present_owned(doc, fields::QUANTITY),
        })
    }
}

impl User {
    /// Project a user document
    pub fn from_document(doc: &Document) -> Self {
        Self {
            id: present_owned(doc, fields::ID),
            name: present_owned(doc, fields::USER_NAME),
            email: present_owned(doc, fields::USER_EMAIL),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn test_order_full_projection() {
        let created = DateTime::from_millis(1_704_103_200_000);
        let order = Order::from_document(&doc! {
            "_id": "o1",
            "user": "u1",
            "items": [
                { "food": { "name": "Pizza" }, "quantity": 2 },
                { "food": { "name": "Burger" }, "quantity": 1 },
            ],
            "totalPrice": 10,
            "status": "done",
            "createdAt": created,
            "paymentId": "p1",
        });

        assert_eq!(order.id, Some(Bson::String("o1".into())));
        assert_eq!(order.user, Some(Bson::String("u1".into())));
        let item = order.first_item.unwrap();
        assert_eq!(item.food.unwrap().name, Some(Bson::String("Pizza".into())));
        assert_eq!(item.quantity, Some(Bson::Int32(2)));
        assert_eq!(order.created_at, Some(created));
        assert_eq!(order.updated_at, None);
        assert!(order.issues.is_empty());
    }

    #[test]
    fn test_null_fields_are_absent() {
        let order = Order::from_document(&doc! {
            "_id": "o2",
            "user": Bson::Null,
            "items": Bson::Null,
            "status": Bson::Null,
            "createdAt": Bson::Null,
        });

        assert!(order.user.is_none());
        assert!(order.has_no_items());
        assert!(order.status.is_none());
        assert!(order.created_at.is_none());
        assert!(order.issues.is_empty());
    }

    #[test]
    fn test_items_not_array_is_recorded() {
        let order = Order::from_document(&doc! { "items": "Pizza" });
        assert!(order.has_no_items());
        assert_eq!(order.issues, vec![ShapeIssue::ItemsNotArray]);
    }

    #[test]
    fn test_first_item_not_document() {
        let order = Order::from_document(&doc! { "items": [42, { "quantity": 1 }] });
        assert!(order.has_no_items());
        assert_eq!(order.issues, vec![ShapeIssue::ItemNotDocument]);
    }

    #[test]
    fn test_null_first_item_is_absent() {
        let order = Order::from_document(&doc! {
            "items": [Bson::Null, { "food": { "name": "Pizza" }, "quantity": 1 }],
        });
        assert!(order.has_no_items());
        assert!(order.issues.is_empty());
    }

    #[test]
    fn test_item_without_food() {
        let order = Order::from_document(&doc! { "items": [{ "quantity": 3 }] });
        let item = order.first_item.unwrap();
        assert!(item.food.is_none());
        assert_eq!(item.quantity, Some(Bson::Int32(3)));
    }

    #[test]
    fn test_food_not_document() {
        let order = Order::from_document(&doc! { "items": [{ "food": "Samosa", "quantity": 1 }] });
        assert!(order.first_item.unwrap().food.is_none());
        assert_eq!(order.issues, vec![ShapeIssue::FoodNotDocument]);
    }

    #[test]
    fn test_string_timestamp_is_recorded() {
        let order = Order::from_document(&doc! { "updatedAt": "2024-01-01" });
        assert!(order.updated_at.is_none());
        assert_eq!(order.issues, vec![ShapeIssue::NotADate(fields::UPDATED_AT)]);
    }

    #[test]
    fn test_user_projection() {
        let user = User::from_document(&doc! { "_id": "u1", "name": "Alice" });
        assert_eq!(user.name, Some(Bson::String("Alice".into())));
        assert!(user.email.is_none());
    }

    #[test]
    fn test_user_null_name_is_absent() {
        let user = User::from_document(&doc! { "_id": "u1", "name": Bson::Null, "email": "a@x.com" });
        assert!(user.name.is_none());
        assert_eq!(user.email, Some(Bson::String("a@x.com".into())));
    }
}
