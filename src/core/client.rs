use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::config::{ClientConfig, ConfigError};
use crate::core::services::{AccountService, TransactionService, WebhookService};
use crate::errors::{ClientError, Result, TransportError};
use crate::mapper::{FromResource, ResourceKind};
use crate::pagination::{ListOptions, PaginatedList, RawPage};
use crate::transport::{Request, Transport};

const PAGE_SIZE_PARAM: &str = "page[size]";

/// Facade over the injected transport.
///
/// Cloning is cheap; clones share the same transport. Entities never own a
/// client, their follow-up calls borrow one.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    config: ClientConfig,
}

impl Client {
    pub fn new<T: Transport + 'static>(transport: T) -> Self {
        Self::from_shared(Arc::new(transport))
    }

    pub fn from_shared(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            config: ClientConfig::default(),
        }
    }

    pub fn with_config<T: Transport + 'static>(
        transport: T,
        config: ClientConfig,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            transport: Arc::new(transport),
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// List options seeded from the client configuration.
    pub fn options(&self) -> ListOptions {
        ListOptions::from_config(&self.config)
    }

    pub fn accounts(&self) -> AccountService<'_> {
        AccountService::new(self)
    }

    pub fn transactions(&self) -> TransactionService<'_> {
        TransactionService::new(self)
    }

    pub fn webhooks(&self) -> WebhookService<'_> {
        WebhookService::new(self)
    }

    /// Checks the credentials of the transport. Returns the id of the
    /// authenticated user when the API reports one.
    pub fn ping(&self) -> Result<Option<String>> {
        let body = self.send(Request::get("/util/ping"))?;
        Ok(body
            .get("meta")
            .and_then(|meta| meta.get("id"))
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    /// Sends `request` and returns the JSON body of a successful response.
    pub(crate) fn send(&self, request: Request) -> Result<Value> {
        debug!(method = %request.method, path = %request.path, "sending request");
        let response = self.transport.fetch(&request)?;
        if !response.is_success() {
            return Err(ClientError::Transport(TransportError::Status {
                status: response.status,
                body: response.body.to_string(),
            }));
        }
        Ok(response.body)
    }

    /// Maps the `data` member of a single-resource document.
    pub(crate) fn fetch_one<T: FromResource>(&self, request: Request) -> Result<T> {
        let body = self.send(request)?;
        let data = body
            .get("data")
            .ok_or_else(|| ClientError::malformed(T::KIND, "response has no `data`"))?;
        let mut entity = T::from_resource(data)?;
        entity.attach(self);
        Ok(entity)
    }

    /// Builds a fresh list over `path`; nothing is sent until it is advanced.
    pub(crate) fn paginate<T: FromResource + 'static>(
        &self,
        path: String,
        query: Vec<(String, String)>,
        options: ListOptions,
    ) -> Result<PaginatedList<T>> {
        let client = self.clone();
        let kind = T::KIND;
        let fetch = move |cursor: Option<&str>, page_size: u32| -> Result<RawPage> {
            let request = match cursor {
                Some(link) => Request::get(link),
                None => {
                    let mut params = query.clone();
                    params.push((PAGE_SIZE_PARAM.to_string(), page_size.to_string()));
                    Request::get(path.clone()).with_query(params)
                }
            };
            let body = client.send(request)?;
            RawPage::from_body(kind, &body)
        };
        Ok(PaginatedList::new(fetch, options)?.attached_to(self))
    }
}

/// Joins a collection path and a caller supplied id.
pub(crate) fn resource_path(collection: &str, id: &str) -> Result<String> {
    let id = id.trim();
    if id.is_empty() || id.contains('/') {
        return Err(ClientError::InvalidFilter(format!(
            "invalid resource id {:?}",
            id
        )));
    }
    Ok(format!("{}/{}", collection, id))
}

/// Link from an entity back to the client it was fetched through.
///
/// Set by the services when they hand out an entity; entities built directly
/// by the mapper start detached. Never part of entity equality.
#[derive(Clone, Default)]
pub(crate) struct ClientHandle(Option<Client>);

impl ClientHandle {
    pub(crate) fn attach(&mut self, client: &Client) {
        self.0 = Some(client.clone());
    }

    pub(crate) fn get(&self, kind: ResourceKind) -> Result<&Client> {
        self.0.as_ref().ok_or(ClientError::Detached { kind })
    }

    pub(crate) fn is_attached(&self) -> bool {
        self.0.is_some()
    }
}

impl PartialEq for ClientHandle {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl fmt::Debug for ClientHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_attached() { "attached" } else { "detached" })
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
