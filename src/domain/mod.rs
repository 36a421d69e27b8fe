pub mod account;
pub mod common;
pub mod transaction;
pub mod webhook;

pub use account::{Account, AccountType};
pub use common::{Identifiable, RawBacked};
pub use transaction::{Transaction, TransactionStatus};
pub use webhook::{Webhook, WebhookEvent, WebhookLog};
