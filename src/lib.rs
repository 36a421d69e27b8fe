#![doc(test(attr(deny(warnings))))]

//! Typed bindings for the Up Bank REST API.
//!
//! Accounts, transactions, webhooks and webhook delivery logs are mapped from
//! their JSON:API documents into immutable domain entities. List endpoints are
//! exposed as lazy [`PaginatedList`]s that follow the API's `links.next`
//! cursors one page at a time. HTTP and authentication stay outside the crate:
//! callers hand a [`Transport`] to [`Client::new`].

pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod mapper;
pub mod pagination;
pub mod transport;
pub mod utils;

pub use crate::config::ClientConfig;
pub use crate::core::{AccountFilter, Client, TransactionFilter};
pub use crate::domain::{
    Account, AccountType, Transaction, TransactionStatus, Webhook, WebhookEvent, WebhookLog,
};
pub use crate::errors::{ClientError, Result, TransportError};
pub use crate::mapper::{map, FromResource, Resource, ResourceKind};
pub use crate::pagination::{ListOptions, ListState, PaginatedList, RawPage};
pub use crate::transport::{Method, Request, Response, Transport};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Up Bank client tracing initialized.");
    });
}
