use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use serde_json::Value;

use crate::core::client::ClientHandle;
use crate::domain::common::{Identifiable, RawBacked};
use crate::domain::transaction::Transaction;
use crate::errors::Result;
use crate::mapper::ResourceKind;
use crate::pagination::{ListOptions, PaginatedList};

/// A registered delivery endpoint for account events.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Webhook {
    pub(crate) id: String,
    pub(crate) url: String,
    pub(crate) description: Option<String>,
    pub(crate) secret_key: Option<String>,
    pub(crate) created_at: DateTime<FixedOffset>,
    #[serde(skip)]
    pub(crate) raw: Value,
    #[serde(skip)]
    pub(crate) client: ClientHandle,
}

impl Webhook {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Key used to verify signed deliveries. Only returned when the webhook is created.
    pub fn secret_key(&self) -> Option<&str> {
        self.secret_key.as_deref()
    }

    pub fn created_at(&self) -> DateTime<FixedOffset> {
        self.created_at
    }

    /// Sends a `PING` event to this webhook.
    pub fn ping(&self) -> Result<WebhookEvent> {
        self.client.get(ResourceKind::Webhook)?.webhooks().ping(&self.id)
    }

    pub fn logs(&self, options: ListOptions) -> Result<PaginatedList<WebhookLog>> {
        self.client
            .get(ResourceKind::Webhook)?
            .webhooks()
            .logs(&self.id, options)
    }

    /// Deletes the webhook server-side. The value should be discarded afterwards.
    pub fn delete(&self) -> Result<()> {
        self.client.get(ResourceKind::Webhook)?.webhooks().delete(&self.id)
    }
}

impl Identifiable for Webhook {
    fn id(&self) -> &str {
        &self.id
    }
}

impl RawBacked for Webhook {
    fn raw(&self) -> &Value {
        &self.raw
    }
}

impl fmt::Display for Webhook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.description.as_deref() {
            Some(description) => write!(f, "<Webhook '{}': {} ({})>", self.id, self.url, description),
            None => write!(f, "<Webhook '{}': {}>", self.id, self.url),
        }
    }
}

/// One delivery attempt of a webhook event.
///
/// `response_code` and `response_body` are both absent when the receiver
/// never answered.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WebhookLog {
    pub(crate) id: String,
    pub(crate) event: WebhookEvent,
    pub(crate) delivery_status: String,
    pub(crate) created_at: DateTime<FixedOffset>,
    pub(crate) response_code: Option<u16>,
    pub(crate) response_body: Option<String>,
    #[serde(skip)]
    pub(crate) raw: Value,
}

impl WebhookLog {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn event(&self) -> &WebhookEvent {
        &self.event
    }

    pub fn delivery_status(&self) -> &str {
        &self.delivery_status
    }

    pub fn created_at(&self) -> DateTime<FixedOffset> {
        self.created_at
    }

    pub fn response_code(&self) -> Option<u16> {
        self.response_code
    }

    pub fn response_body(&self) -> Option<&str> {
        self.response_body.as_deref()
    }
}

impl Identifiable for WebhookLog {
    fn id(&self) -> &str {
        &self.id
    }
}

impl RawBacked for WebhookLog {
    fn raw(&self) -> &Value {
        &self.raw
    }
}

impl fmt::Display for WebhookLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.response_code {
            Some(code) => write!(
                f,
                "<WebhookLog {}: response_code={}>",
                self.delivery_status, code
            ),
            None => write!(f, "<WebhookLog {}>", self.delivery_status),
        }
    }
}

/// An event emitted to a webhook, such as `TRANSACTION_CREATED` or `PING`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WebhookEvent {
    pub(crate) id: String,
    #[serde(rename = "type")]
    pub(crate) event_type: String,
    pub(crate) webhook_id: String,
    pub(crate) transaction_id: Option<String>,
    pub(crate) created_at: DateTime<FixedOffset>,
    #[serde(skip)]
    pub(crate) raw: Value,
    #[serde(skip)]
    pub(crate) client: ClientHandle,
}

impl WebhookEvent {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn webhook_id(&self) -> &str {
        &self.webhook_id
    }

    pub fn transaction_id(&self) -> Option<&str> {
        self.transaction_id.as_deref()
    }

    pub fn created_at(&self) -> DateTime<FixedOffset> {
        self.created_at
    }

    pub fn webhook(&self) -> Result<Webhook> {
        self.client
            .get(ResourceKind::WebhookEvent)?
            .webhooks()
            .get(&self.webhook_id)
    }

    /// Fetches the related transaction; `None` for events without one.
    pub fn transaction(&self) -> Result<Option<Transaction>> {
        match self.transaction_id.as_deref() {
            Some(id) => self
                .client
                .get(ResourceKind::WebhookEvent)?
                .transactions()
                .get(id)
                .map(Some),
            None => Ok(None),
        }
    }
}

impl Identifiable for WebhookEvent {
    fn id(&self) -> &str {
        &self.id
    }
}

impl RawBacked for WebhookEvent {
    fn raw(&self) -> &Value {
        &self.raw
    }
}

impl fmt::Display for WebhookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.transaction_id.as_deref() {
            Some(transaction_id) => write!(
                f,
                "<WebhookEvent {}: webhook_id='{}' transaction_id='{}'>",
                self.event_type, self.webhook_id, transaction_id
            ),
            None => write!(
                f,
                "<WebhookEvent {}: webhook_id='{}'>",
                self.event_type, self.webhook_id
            ),
        }
    }
}
