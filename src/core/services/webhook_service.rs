use serde_json::{json, Map, Value};

use crate::core::client::{resource_path, Client};
use crate::domain::{Webhook, WebhookEvent, WebhookLog};
use crate::errors::{ClientError, Result};
use crate::pagination::{ListOptions, PaginatedList};
use crate::transport::Request;

const WEBHOOKS: &str = "/webhooks";

pub struct WebhookService<'a> {
    client: &'a Client,
}

impl<'a> WebhookService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn get(&self, id: &str) -> Result<Webhook> {
        let path = resource_path(WEBHOOKS, id)?;
        self.client.fetch_one(Request::get(path))
    }

    pub fn list(&self, options: ListOptions) -> Result<PaginatedList<Webhook>> {
        self.client
            .paginate(WEBHOOKS.to_string(), Vec::new(), options)
    }

    /// Registers a new webhook. The returned value is the only one that
    /// carries the secret key.
    pub fn create(&self, url: &str, description: Option<&str>) -> Result<Webhook> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ClientError::InvalidFilter("webhook url must not be empty".into()));
        }
        let mut attributes = Map::new();
        attributes.insert("url".into(), Value::String(url.to_string()));
        if let Some(description) = description {
            attributes.insert("description".into(), Value::String(description.to_string()));
        }
        let body = json!({ "data": { "attributes": attributes } });
        self.client
            .fetch_one(Request::post(WEBHOOKS, Some(body)))
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        let path = resource_path(WEBHOOKS, id)?;
        self.client.send(Request::delete(path))?;
        Ok(())
    }

    /// Asks the API to deliver a `PING` event to the webhook.
    pub fn ping(&self, id: &str) -> Result<WebhookEvent> {
        let path = format!("{}/ping", resource_path(WEBHOOKS, id)?);
        self.client.fetch_one(Request::post(path, None))
    }

    /// Delivery logs of a webhook, newest first.
    pub fn logs(&self, id: &str, options: ListOptions) -> Result<PaginatedList<WebhookLog>> {
        let path = format!("{}/logs", resource_path(WEBHOOKS, id)?);
        self.client.paginate(path, Vec::new(), options)
    }
}
