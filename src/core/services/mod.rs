pub mod account_service;
pub mod transaction_service;
pub mod webhook_service;

pub use account_service::AccountService;
pub use transaction_service::TransactionService;
pub use webhook_service::WebhookService;
