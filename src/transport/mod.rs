//! Boundary to the authenticated HTTP collaborator.
//!
//! The crate never opens connections itself. Callers inject something that
//! implements [`Transport`]: a real HTTP client wrapper that adds the bearer
//! token, or a scripted stand-in for tests. Any
//! `Fn(&Request) -> Result<Response, TransportError>` closure qualifies.

use std::fmt;

use serde_json::Value;

use crate::errors::TransportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One API call.
///
/// `path` is either relative to the API root (`/accounts`) or an absolute
/// pagination link returned by a previous page.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl Request {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            query: Vec::new(),
            body,
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    /// Looks up the first query value stored under `key`.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }
}

/// Status code and decoded JSON body. Bodiless responses carry `Value::Null`.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Value,
}

impl Response {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn ok(body: Value) -> Self {
        Self::new(200, body)
    }

    pub fn no_content() -> Self {
        Self::new(204, Value::Null)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Authenticated request/response capability.
pub trait Transport: Send + Sync {
    fn fetch(&self, request: &Request) -> Result<Response, TransportError>;
}

impl<F> Transport for F
where
    F: Fn(&Request) -> Result<Response, TransportError> + Send + Sync,
{
    fn fetch(&self, request: &Request) -> Result<Response, TransportError> {
        self(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn closures_are_transports() {
        let transport = |request: &Request| -> Result<Response, TransportError> {
            Ok(Response::ok(json!({"path": request.path})))
        };
        let response = transport.fetch(&Request::get("/util/ping")).expect("response");
        assert_eq!(response.body["path"], "/util/ping");
        assert!(response.is_success());
    }

    #[test]
    fn query_lookup_returns_first_match() {
        let request = Request::get("/transactions").with_query(vec![
            ("page[size]".into(), "10".into()),
            ("filter[status]".into(), "HELD".into()),
        ]);
        assert_eq!(request.query_value("filter[status]"), Some("HELD"));
        assert_eq!(request.query_value("filter[tag]"), None);
    }

    #[test]
    fn success_range_is_2xx() {
        assert!(Response::no_content().is_success());
        assert!(!Response::new(404, Value::Null).is_success());
        assert!(!Response::new(301, Value::Null).is_success());
    }
}
