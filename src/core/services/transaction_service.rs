use crate::core::client::{resource_path, Client};
use crate::core::filters::TransactionFilter;
use crate::domain::Transaction;
use crate::errors::Result;
use crate::pagination::{ListOptions, PaginatedList};
use crate::transport::Request;

const TRANSACTIONS: &str = "/transactions";
const ACCOUNTS: &str = "/accounts";

pub struct TransactionService<'a> {
    client: &'a Client,
}

impl<'a> TransactionService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn get(&self, id: &str) -> Result<Transaction> {
        let path = resource_path(TRANSACTIONS, id)?;
        self.client.fetch_one(Request::get(path))
    }

    /// Lists transactions newest first, as ordered by the API.
    pub fn list(
        &self,
        filter: TransactionFilter,
        options: ListOptions,
    ) -> Result<PaginatedList<Transaction>> {
        let query = filter.to_query()?;
        let path = match filter.account.as_deref() {
            Some(account_id) => format!("{}{}", resource_path(ACCOUNTS, account_id)?, TRANSACTIONS),
            None => TRANSACTIONS.to_string(),
        };
        self.client.paginate(path, query, options)
    }
}
