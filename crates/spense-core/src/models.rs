//! Domain models for Spense
//!
//! Wire shapes follow the REST API contract: camelCase field names,
//! `INCOME`/`EXPENSE` type tags, and Spring-style page envelopes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Transaction type - determines display sign and the valid category set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "INCOME" => Ok(Self::Income),
            "EXPENSE" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A category in the taxonomy; belongs to exactly one transaction type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: TransactionType,
}

/// A single income or expense transaction
///
/// `amount` is a non-negative magnitude; the sign shown to the user is
/// implied by `transaction_type`. `category` may be absent
/// ("Uncategorized").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
    pub amount: f64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    #[serde(default)]
    pub category: Option<Category>,
}

impl Transaction {
    /// Category name for display, with the uncategorized fallback
    pub fn category_name(&self) -> &str {
        self.category
            .as_ref()
            .map(|c| c.name.as_str())
            .unwrap_or("Uncategorized")
    }

    /// Amount with the sign implied by the transaction type
    pub fn signed_amount(&self) -> f64 {
        match self.transaction_type {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

/// Payload for creating a transaction
///
/// The category is referenced by name; the server resolves it (and
/// rejects names that do not match the transaction type).
#[derive(Debug, Clone, Serialize)]
pub struct NewTransaction {
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

/// One server-paginated slice of a listing
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_pages: u32,
}

/// Raw page envelope as it appears on the wire
///
/// Two backend revisions exist: one serializes `totalPages` at the top
/// level, the other nests it under `page`. We accept both; the flat
/// shape is canonical.
#[derive(Debug, Deserialize)]
pub(crate) struct PageEnvelope<T> {
    pub content: Vec<T>,
    #[serde(rename = "totalPages")]
    pub total_pages: Option<u32>,
    pub page: Option<PageMeta>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PageMeta {
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub(crate) fn from_envelope(envelope: PageEnvelope<T>) -> Result<Self> {
        let total_pages = envelope
            .total_pages
            .or(envelope.page.map(|p| p.total_pages))
            .ok_or_else(|| {
                Error::InvalidData("page response carries no totalPages field".to_string())
            })?;
        Ok(Self {
            items: envelope.content,
            total_pages,
        })
    }
}

/// Dashboard stat card totals for a date range
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
}

/// Expense total per category, for the category chart
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStat {
    pub category_name: String,
    pub total_amount: f64,
}

/// Income/expense totals per month, for the trend chart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyStat {
    pub month: String,
    pub income: f64,
    pub expense: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_type_roundtrip() {
        assert_eq!("INCOME".parse::<TransactionType>(), Ok(TransactionType::Income));
        assert_eq!("expense".parse::<TransactionType>(), Ok(TransactionType::Expense));
        assert!("TRANSFER".parse::<TransactionType>().is_err());
        assert_eq!(TransactionType::Income.to_string(), "INCOME");
    }

    #[test]
    fn transaction_deserializes_from_wire_shape() {
        let json = r#"{
            "id": 7,
            "date": "2024-01-15",
            "description": "Groceries",
            "amount": 42.50,
            "type": "EXPENSE",
            "category": {"id": 2, "name": "Food", "type": "EXPENSE"}
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.id, 7);
        assert_eq!(tx.category_name(), "Food");
        assert_eq!(tx.signed_amount(), -42.50);
    }

    #[test]
    fn transaction_without_category_is_uncategorized() {
        let json = r#"{"id": 1, "date": "2024-02-01", "amount": 5.0, "type": "INCOME"}"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.category_name(), "Uncategorized");
        assert_eq!(tx.signed_amount(), 5.0);
    }

    #[test]
    fn page_accepts_flat_envelope() {
        let json = r#"{"content": [1, 2, 3], "totalPages": 4}"#;
        let envelope: PageEnvelope<i64> = serde_json::from_str(json).unwrap();
        let page = Page::from_envelope(envelope).unwrap();
        assert_eq!(page.items, vec![1, 2, 3]);
        assert_eq!(page.total_pages, 4);
    }

    #[test]
    fn page_accepts_nested_envelope() {
        let json = r#"{"content": [9], "page": {"totalPages": 2}}"#;
        let envelope: PageEnvelope<i64> = serde_json::from_str(json).unwrap();
        let page = Page::from_envelope(envelope).unwrap();
        assert_eq!(page.items, vec![9]);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn page_rejects_envelope_without_total() {
        let json = r#"{"content": []}"#;
        let envelope: PageEnvelope<i64> = serde_json::from_str(json).unwrap();
        assert!(Page::from_envelope(envelope).is_err());
    }

    #[test]
    fn new_transaction_serializes_camel_case_type() {
        let new = NewTransaction {
            amount: 12.0,
            description: Some("Bus".to_string()),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            category: Some("Transport".to_string()),
            transaction_type: TransactionType::Expense,
        };
        let value = serde_json::to_value(&new).unwrap();
        assert_eq!(value["type"], "EXPENSE");
        assert_eq!(value["category"], "Transport");
        assert_eq!(value["date"], "2024-03-01");
    }
}
