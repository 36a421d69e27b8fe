use crate::core::client::{resource_path, Client};
use crate::core::filters::{AccountFilter, TransactionFilter};
use crate::domain::{Account, Transaction};
use crate::errors::Result;
use crate::pagination::{ListOptions, PaginatedList};
use crate::transport::Request;

const ACCOUNTS: &str = "/accounts";

pub struct AccountService<'a> {
    client: &'a Client,
}

impl<'a> AccountService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn get(&self, id: &str) -> Result<Account> {
        let path = resource_path(ACCOUNTS, id)?;
        self.client.fetch_one(Request::get(path))
    }

    pub fn list(&self, filter: AccountFilter, options: ListOptions) -> Result<PaginatedList<Account>> {
        self.client
            .paginate(ACCOUNTS.to_string(), filter.to_query(), options)
    }

    /// Transactions of one account; any account set on `filter` is replaced.
    pub fn transactions(
        &self,
        account_id: &str,
        filter: TransactionFilter,
        options: ListOptions,
    ) -> Result<PaginatedList<Transaction>> {
        self.client
            .transactions()
            .list(filter.account(account_id), options)
    }
}
