#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use upbank::{Client, Request, Response, Transport, TransportError};

pub const API_ROOT: &str = "https://api.up.com.au/api/v1";

#[derive(Default)]
struct Script {
    responses: VecDeque<Result<Response, TransportError>>,
    requests: Vec<Request>,
}

/// Transport that replays scripted responses in order and records every request.
#[derive(Clone, Default)]
pub struct MockTransport {
    script: Arc<Mutex<Script>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: u16, body: Value) -> &Self {
        self.push(Ok(Response::new(status, body)))
    }

    pub fn ok(&self, body: Value) -> &Self {
        self.respond(200, body)
    }

    pub fn fail(&self, message: &str) -> &Self {
        self.push(Err(TransportError::Network(message.to_string())))
    }

    fn push(&self, response: Result<Response, TransportError>) -> &Self {
        self.script
            .lock()
            .expect("lock mock script")
            .responses
            .push_back(response);
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.script.lock().expect("lock mock script").requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.script.lock().expect("lock mock script").requests.len()
    }
}

impl Transport for MockTransport {
    fn fetch(&self, request: &Request) -> Result<Response, TransportError> {
        let mut script = self.script.lock().expect("lock mock script");
        script.requests.push(request.clone());
        script.responses.pop_front().unwrap_or_else(|| {
            Err(TransportError::Network(format!(
                "no scripted response for {} {}",
                request.method, request.path
            )))
        })
    }
}

/// Creates a client wired to a fresh mock transport.
pub fn setup_client() -> (Client, MockTransport) {
    let transport = MockTransport::new();
    (Client::new(transport.clone()), transport)
}

pub fn single(resource: Value) -> Value {
    json!({ "data": resource })
}

pub fn collection(resources: Vec<Value>, next: Option<&str>) -> Value {
    json!({
        "data": resources,
        "links": { "prev": null, "next": next }
    })
}

pub fn next_link(path: &str, cursor: &str) -> String {
    format!("{}{}?page[size]=2&page[after]={}", API_ROOT, path, cursor)
}

pub fn transaction(id: &str, status: &str, value: &str) -> Value {
    let settled_at = if status == "SETTLED" {
        json!("2023-01-01T10:00:00+10:00")
    } else {
        Value::Null
    };
    json!({
        "type": "transactions",
        "id": id,
        "attributes": {
            "status": status,
            "rawText": "COFFEE CO SYDNEY",
            "description": "Coffee Co",
            "message": null,
            "settledAt": settled_at,
            "createdAt": "2023-01-01T09:59:00+10:00",
            "amount": { "value": value, "currencyCode": "AUD", "valueInBaseUnits": 0 }
        },
        "relationships": {
            "account": { "data": { "type": "accounts", "id": "a1" } },
            "category": { "data": null },
            "parentCategory": { "data": null },
            "tags": { "data": [] }
        }
    })
}

pub fn account(id: &str, name: &str, account_type: &str, balance: &str) -> Value {
    json!({
        "type": "accounts",
        "id": id,
        "attributes": {
            "displayName": name,
            "accountType": account_type,
            "ownershipType": "INDIVIDUAL",
            "balance": { "value": balance, "currencyCode": "AUD", "valueInBaseUnits": 0 },
            "createdAt": "2020-05-01T12:00:00+10:00"
        },
        "relationships": {
            "transactions": { "links": { "related": format!("{}/accounts/{}/transactions", API_ROOT, id) } }
        }
    })
}

pub fn webhook(id: &str, url: &str, description: Option<&str>, secret_key: Option<&str>) -> Value {
    json!({
        "type": "webhooks",
        "id": id,
        "attributes": {
            "url": url,
            "description": description,
            "secretKey": secret_key,
            "createdAt": "2023-02-01T08:00:00+11:00"
        },
        "relationships": {
            "logs": { "links": { "related": format!("{}/webhooks/{}/logs", API_ROOT, id) } }
        }
    })
}

pub fn webhook_event(id: &str, event_type: &str, webhook_id: &str, transaction_id: Option<&str>) -> Value {
    let mut relationships = json!({
        "webhook": { "data": { "type": "webhooks", "id": webhook_id } }
    });
    if let Some(transaction_id) = transaction_id {
        relationships["transaction"] = json!({ "data": { "type": "transactions", "id": transaction_id } });
    }
    json!({
        "type": "webhook-events",
        "id": id,
        "attributes": { "eventType": event_type, "createdAt": "2023-02-01T08:00:00+11:00" },
        "relationships": relationships
    })
}

pub fn webhook_log(id: &str, event: Value, status_code: Option<u16>) -> Value {
    let response = match status_code {
        Some(code) => json!({ "statusCode": code, "body": "{\"ok\":true}" }),
        None => Value::Null,
    };
    let delivery_status = if status_code.is_some() {
        "DELIVERED"
    } else {
        "UNDELIVERABLE"
    };
    json!({
        "type": "webhook-delivery-logs",
        "id": id,
        "attributes": {
            "request": { "body": json!({ "data": event }).to_string() },
            "response": response,
            "deliveryStatus": delivery_status,
            "createdAt": "2023-02-01T08:00:01+11:00"
        },
        "relationships": {
            "webhookEvent": { "data": { "type": "webhook-events", "id": "e1" } }
        }
    })
}
