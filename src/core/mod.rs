pub mod client;
pub mod filters;
pub mod services;

pub use client::Client;
pub use filters::{AccountFilter, TransactionFilter};
pub use services::{AccountService, TransactionService, WebhookService};
