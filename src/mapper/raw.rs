//! Wire shapes of the JSON:API resource objects returned by the API.
//!
//! Only the members the domain model reads are declared; unknown members are
//! ignored so new API fields do not break existing clients.

use serde::{Deserialize, Deserializer};

use crate::domain::{AccountType, TransactionStatus};

#[derive(Debug, Deserialize)]
pub(crate) struct ResourceObject<A, R> {
    pub id: String,
    pub attributes: A,
    pub relationships: R,
}

/// Resource object whose relationships are not read.
#[derive(Debug, Deserialize)]
pub(crate) struct PlainResourceObject<A> {
    pub id: String,
    pub attributes: A,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResourceIdentifier {
    pub id: String,
}

/// Relationship to at most one resource. `data` must be present; `null`
/// means no related resource.
#[derive(Debug, Deserialize)]
pub(crate) struct ToOne {
    #[serde(deserialize_with = "nullable")]
    pub data: Option<ResourceIdentifier>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ToMany {
    pub data: Vec<ResourceIdentifier>,
}

/// Reads a member that has to be present but may be `null`. Plain `Option`
/// fields would also accept a missing key.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MoneyObject {
    pub value: String,
    pub currency_code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TransactionAttributes {
    pub status: TransactionStatus,
    #[serde(deserialize_with = "nullable")]
    pub raw_text: Option<String>,
    pub description: String,
    #[serde(deserialize_with = "nullable")]
    pub message: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub settled_at: Option<String>,
    pub created_at: String,
    pub amount: MoneyObject,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TransactionRelationships {
    pub category: ToOne,
    pub parent_category: ToOne,
    pub tags: ToMany,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AccountAttributes {
    pub display_name: String,
    pub account_type: AccountType,
    pub created_at: String,
    pub balance: MoneyObject,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WebhookAttributes {
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub secret_key: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WebhookLogAttributes {
    pub request: DeliveryRequest,
    #[serde(deserialize_with = "nullable")]
    pub response: Option<DeliveryResponse>,
    pub delivery_status: String,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeliveryRequest {
    pub body: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeliveryResponse {
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WebhookEventAttributes {
    pub event_type: String,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WebhookEventRelationships {
    pub webhook: ToOne,
    #[serde(default)]
    pub transaction: Option<ToOne>,
}
