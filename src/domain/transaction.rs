use std::fmt;

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::common::{Identifiable, RawBacked};

/// Settlement state reported by the API for a transaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Held,
    Settled,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Held => "HELD",
            TransactionStatus::Settled => "SETTLED",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single movement of money on an account.
///
/// `pending` is not stored: it is always derived from `status`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Transaction {
    pub(crate) id: String,
    pub(crate) status: TransactionStatus,
    pub(crate) raw_text: Option<String>,
    pub(crate) description: String,
    pub(crate) message: Option<String>,
    pub(crate) settled_at: Option<DateTime<FixedOffset>>,
    pub(crate) created_at: DateTime<FixedOffset>,
    pub(crate) amount: Decimal,
    pub(crate) currency: String,
    pub(crate) category: Option<String>,
    pub(crate) parent_category: Option<String>,
    pub(crate) tags: Vec<String>,
    #[serde(skip)]
    pub(crate) raw: Value,
}

impl Transaction {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    pub fn pending(&self) -> bool {
        self.status != TransactionStatus::Settled
    }

    pub fn raw_text(&self) -> Option<&str> {
        self.raw_text.as_deref()
    }

    /// Typically the merchant or counterparty.
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn settled_at(&self) -> Option<DateTime<FixedOffset>> {
        self.settled_at
    }

    pub fn created_at(&self) -> DateTime<FixedOffset> {
        self.created_at
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn parent_category(&self) -> Option<&str> {
        self.parent_category.as_deref()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Combines description and message, e.g. `"Coffee: thanks"`.
    pub fn format_description(&self) -> String {
        match self.message.as_deref() {
            Some(message) if !message.is_empty() => format!("{}: {}", self.description, message),
            _ => self.description.clone(),
        }
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> &str {
        &self.id
    }
}

impl RawBacked for Transaction {
    fn raw(&self) -> &Value {
        &self.raw
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Transaction {}: {} {} [{}]>",
            self.status, self.amount, self.currency, self.description
        )
    }
}
