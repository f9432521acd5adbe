//! House-scoped resources fetched for the dashboard.
//!
//! Balance and ledger arithmetic happens server-side; these are read-only
//! projections for display.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One member's net balance within a house, as computed by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub user_id: String,
    /// Positive means the user is owed money, negative means they owe.
    pub amount: f64,
}

/// An item on the shared shopping list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub added_by: Option<String>,
}

/// A recorded shared expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub description: String,
    pub amount: f64,
    pub paid_by: String,
    pub created_at: DateTime<Utc>,
}

/// A settlement payment between two members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub amount: f64,
    pub from_user: String,
    pub to_user: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expense_deserializes_with_timestamp() {
        let json = r#"{
            "id": "e1",
            "description": "Groceries",
            "amount": 42.5,
            "paid_by": "u1",
            "created_at": "2026-08-20T10:30:00Z"
        }"#;
        let expense: Expense = serde_json::from_str(json).unwrap();
        assert_eq!(expense.amount, 42.5);
        assert_eq!(expense.paid_by, "u1");
    }

    #[test]
    fn shopping_item_defaults() {
        let json = r#"{"id":"s1","name":"Milk"}"#;
        let item: ShoppingItem = serde_json::from_str(json).unwrap();
        assert!(!item.done);
        assert!(item.added_by.is_none());
    }
}
