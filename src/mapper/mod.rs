//! Conversion of raw JSON:API resource objects into domain entities.
//!
//! Every function here is pure: it either builds the complete entity or fails
//! with [`ClientError::MalformedResource`].

mod raw;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::core::client::ClientHandle;
use crate::core::Client;
use crate::domain::{Account, Transaction, Webhook, WebhookEvent, WebhookLog};
use crate::errors::{ClientError, Result};
use crate::utils::parse_timestamp;

use raw::{
    AccountAttributes, MoneyObject, PlainResourceObject, ResourceObject, ToMany, ToOne,
    TransactionAttributes, TransactionRelationships, WebhookAttributes, WebhookEventAttributes,
    WebhookEventRelationships, WebhookLogAttributes,
};

/// The resource families the mapper understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Transaction,
    Account,
    Webhook,
    WebhookLog,
    WebhookEvent,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Transaction => "transaction",
            ResourceKind::Account => "account",
            ResourceKind::Webhook => "webhook",
            ResourceKind::WebhookLog => "webhook log",
            ResourceKind::WebhookEvent => "webhook event",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any entity produced by [`map`].
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    Transaction(Transaction),
    Account(Account),
    Webhook(Webhook),
    WebhookLog(WebhookLog),
    WebhookEvent(WebhookEvent),
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Resource::Transaction(_) => ResourceKind::Transaction,
            Resource::Account(_) => ResourceKind::Account,
            Resource::Webhook(_) => ResourceKind::Webhook,
            Resource::WebhookLog(_) => ResourceKind::WebhookLog,
            Resource::WebhookEvent(_) => ResourceKind::WebhookEvent,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Resource::Transaction(inner) => inner.id(),
            Resource::Account(inner) => inner.id(),
            Resource::Webhook(inner) => inner.id(),
            Resource::WebhookLog(inner) => inner.id(),
            Resource::WebhookEvent(inner) => inner.id(),
        }
    }
}

/// Entities that can be built from a single raw resource object.
pub trait FromResource: Sized {
    const KIND: ResourceKind;

    fn from_resource(raw: &Value) -> Result<Self>;

    /// Links the entity to `client` so its follow-up calls go through it.
    /// Services do this for everything they return.
    fn attach(&mut self, _client: &Client) {}
}

/// Maps `raw` as a resource of the given kind.
pub fn map(kind: ResourceKind, raw: &Value) -> Result<Resource> {
    Ok(match kind {
        ResourceKind::Transaction => Resource::Transaction(Transaction::from_resource(raw)?),
        ResourceKind::Account => Resource::Account(Account::from_resource(raw)?),
        ResourceKind::Webhook => Resource::Webhook(Webhook::from_resource(raw)?),
        ResourceKind::WebhookLog => Resource::WebhookLog(WebhookLog::from_resource(raw)?),
        ResourceKind::WebhookEvent => Resource::WebhookEvent(WebhookEvent::from_resource(raw)?),
    })
}

fn decode<'a, T: Deserialize<'a>>(kind: ResourceKind, raw: &'a Value) -> Result<T> {
    if !raw.is_object() {
        return Err(ClientError::malformed(kind, "expected a JSON object"));
    }
    T::deserialize(raw).map_err(|err| ClientError::malformed(kind, err.to_string()))
}

fn require_id(kind: ResourceKind, id: String) -> Result<String> {
    if id.trim().is_empty() {
        Err(ClientError::malformed(kind, "empty `id`"))
    } else {
        Ok(id)
    }
}

fn timestamp(kind: ResourceKind, field: &str, value: &str) -> Result<DateTime<FixedOffset>> {
    parse_timestamp(value).ok_or_else(|| {
        ClientError::malformed(kind, format!("`{}` is not a valid timestamp: {:?}", field, value))
    })
}

fn money(kind: ResourceKind, field: &str, value: &MoneyObject) -> Result<(Decimal, String)> {
    let amount = Decimal::from_str(value.value.trim()).map_err(|_| {
        ClientError::malformed(
            kind,
            format!("`{}.value` is not a decimal: {:?}", field, value.value),
        )
    })?;
    Ok((amount, value.currency_code.clone()))
}

/// Id of a to-one relationship; `None` when `data` is null. Blank ids are refused.
fn related_id(kind: ResourceKind, field: &str, relationship: &ToOne) -> Result<Option<String>> {
    match relationship.data.as_ref() {
        Some(data) if data.id.trim().is_empty() => Err(ClientError::malformed(
            kind,
            format!("`{}` relationship has an empty id", field),
        )),
        Some(data) => Ok(Some(data.id.clone())),
        None => Ok(None),
    }
}

fn related_ids(kind: ResourceKind, field: &str, relationship: &ToMany) -> Result<Vec<String>> {
    relationship
        .data
        .iter()
        .map(|data| {
            if data.id.trim().is_empty() {
                Err(ClientError::malformed(
                    kind,
                    format!("`{}` relationship has an empty id", field),
                ))
            } else {
                Ok(data.id.clone())
            }
        })
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|inner| !inner.is_empty())
}

impl FromResource for Transaction {
    const KIND: ResourceKind = ResourceKind::Transaction;

    fn from_resource(raw: &Value) -> Result<Self> {
        let object: ResourceObject<TransactionAttributes, TransactionRelationships> =
            decode(Self::KIND, raw)?;
        let attributes = object.attributes;
        let relationships = object.relationships;

        let settled_at = match attributes.settled_at.as_deref() {
            Some(value) => Some(timestamp(Self::KIND, "settledAt", value)?),
            None => None,
        };
        let created_at = timestamp(Self::KIND, "createdAt", &attributes.created_at)?;
        let (amount, currency) = money(Self::KIND, "amount", &attributes.amount)?;

        Ok(Transaction {
            id: require_id(Self::KIND, object.id)?,
            status: attributes.status,
            raw_text: attributes.raw_text,
            description: attributes.description,
            message: attributes.message,
            settled_at,
            created_at,
            amount,
            currency,
            category: related_id(Self::KIND, "category", &relationships.category)?,
            parent_category: related_id(
                Self::KIND,
                "parentCategory",
                &relationships.parent_category,
            )?,
            tags: related_ids(Self::KIND, "tags", &relationships.tags)?,
            raw: raw.clone(),
        })
    }
}

impl FromResource for Account {
    const KIND: ResourceKind = ResourceKind::Account;

    fn from_resource(raw: &Value) -> Result<Self> {
        let object: PlainResourceObject<AccountAttributes> = decode(Self::KIND, raw)?;
        let attributes = object.attributes;
        let (balance, currency) = money(Self::KIND, "balance", &attributes.balance)?;

        Ok(Account {
            id: require_id(Self::KIND, object.id)?,
            name: attributes.display_name,
            account_type: attributes.account_type,
            created_at: timestamp(Self::KIND, "createdAt", &attributes.created_at)?,
            balance,
            currency,
            raw: raw.clone(),
            client: ClientHandle::default(),
        })
    }

    fn attach(&mut self, client: &Client) {
        self.client.attach(client);
    }
}

impl FromResource for Webhook {
    const KIND: ResourceKind = ResourceKind::Webhook;

    fn from_resource(raw: &Value) -> Result<Self> {
        let object: PlainResourceObject<WebhookAttributes> = decode(Self::KIND, raw)?;
        let attributes = object.attributes;

        Ok(Webhook {
            id: require_id(Self::KIND, object.id)?,
            url: attributes.url,
            description: attributes.description,
            secret_key: non_empty(attributes.secret_key),
            created_at: timestamp(Self::KIND, "createdAt", &attributes.created_at)?,
            raw: raw.clone(),
            client: ClientHandle::default(),
        })
    }

    fn attach(&mut self, client: &Client) {
        self.client.attach(client);
    }
}

impl FromResource for WebhookLog {
    const KIND: ResourceKind = ResourceKind::WebhookLog;

    fn from_resource(raw: &Value) -> Result<Self> {
        let object: PlainResourceObject<WebhookLogAttributes> = decode(Self::KIND, raw)?;
        let attributes = object.attributes;

        let body: Value = serde_json::from_str(&attributes.request.body).map_err(|err| {
            ClientError::malformed(Self::KIND, format!("request body is not JSON: {}", err))
        })?;
        let data = body
            .get("data")
            .ok_or_else(|| ClientError::malformed(Self::KIND, "request body has no `data`"))?;
        let event = WebhookEvent::from_resource(data).map_err(|err| match err {
            ClientError::MalformedResource { reason, .. } => {
                ClientError::malformed(Self::KIND, format!("request body event: {}", reason))
            }
            other => other,
        })?;

        let (response_code, response_body) = match attributes.response {
            Some(response) => (response.status_code, response.body),
            None => (None, None),
        };

        Ok(WebhookLog {
            id: require_id(Self::KIND, object.id)?,
            event,
            delivery_status: attributes.delivery_status,
            created_at: timestamp(Self::KIND, "createdAt", &attributes.created_at)?,
            response_code,
            response_body,
            raw: raw.clone(),
        })
    }

    fn attach(&mut self, client: &Client) {
        self.event.attach(client);
    }
}

impl FromResource for WebhookEvent {
    const KIND: ResourceKind = ResourceKind::WebhookEvent;

    fn from_resource(raw: &Value) -> Result<Self> {
        let object: ResourceObject<WebhookEventAttributes, WebhookEventRelationships> =
            decode(Self::KIND, raw)?;
        let attributes = object.attributes;
        let relationships = object.relationships;

        let webhook_id = related_id(Self::KIND, "webhook", &relationships.webhook)?
            .ok_or_else(|| ClientError::malformed(Self::KIND, "`webhook` relationship is null"))?;
        let transaction_id = match relationships.transaction.as_ref() {
            Some(relationship) => related_id(Self::KIND, "transaction", relationship)?,
            None => None,
        };

        Ok(WebhookEvent {
            id: require_id(Self::KIND, object.id)?,
            event_type: attributes.event_type,
            webhook_id,
            transaction_id,
            created_at: timestamp(Self::KIND, "createdAt", &attributes.created_at)?,
            raw: raw.clone(),
            client: ClientHandle::default(),
        })
    }

    fn attach(&mut self, client: &Client) {
        self.client.attach(client);
    }
}
