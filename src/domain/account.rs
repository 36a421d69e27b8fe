use std::fmt;

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::filters::TransactionFilter;
use crate::core::client::ClientHandle;
use crate::domain::common::{Identifiable, RawBacked};
use crate::domain::transaction::Transaction;
use crate::errors::Result;
use crate::mapper::ResourceKind;
use crate::pagination::{ListOptions, PaginatedList};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    Transactional,
    Saver,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Transactional => "TRANSACTIONAL",
            AccountType::Saver => "SAVER",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents a bank account and its current balance.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Account {
    pub(crate) id: String,
    pub(crate) name: String,
    #[serde(rename = "type")]
    pub(crate) account_type: AccountType,
    pub(crate) created_at: DateTime<FixedOffset>,
    pub(crate) balance: Decimal,
    pub(crate) currency: String,
    #[serde(skip)]
    pub(crate) raw: Value,
    #[serde(skip)]
    pub(crate) client: ClientHandle,
}

impl Account {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn account_type(&self) -> AccountType {
        self.account_type
    }

    pub fn created_at(&self) -> DateTime<FixedOffset> {
        self.created_at
    }

    /// Available funds.
    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Lists the transactions recorded against this account, through the
    /// client the account was fetched with.
    pub fn transactions(
        &self,
        filter: TransactionFilter,
        options: ListOptions,
    ) -> Result<PaginatedList<Transaction>> {
        self.client
            .get(ResourceKind::Account)?
            .accounts()
            .transactions(&self.id, filter, options)
    }
}

impl Identifiable for Account {
    fn id(&self) -> &str {
        &self.id
    }
}

impl RawBacked for Account {
    fn raw(&self) -> &Value {
        &self.raw
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Account '{}' ({}): {} {}>",
            self.name, self.account_type, self.balance, self.currency
        )
    }
}
