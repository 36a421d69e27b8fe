//! Typed list filters and their query-string rendering.
//!
//! Unset filters are left out of the query entirely.

use chrono::{DateTime, FixedOffset, Offset, TimeZone};

use crate::domain::{AccountType, TransactionStatus};
use crate::errors::{ClientError, Result};
use crate::utils::{format_timestamp, parse_timestamp};

pub type QueryParams = Vec<(String, String)>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub status: Option<TransactionStatus>,
    pub since: Option<DateTime<FixedOffset>>,
    pub until: Option<DateTime<FixedOffset>>,
    pub category: Option<String>,
    pub tag: Option<String>,
    /// Restricts the list to one account (`/accounts/{id}/transactions`).
    pub account: Option<String>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: TransactionStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Only transactions created at or after `since`. The offset is kept.
    pub fn since<Tz: TimeZone>(mut self, since: DateTime<Tz>) -> Self {
        self.since = Some(with_fixed_offset(since));
        self
    }

    /// Parses an RFC 3339 timestamp; values without an offset are refused.
    pub fn since_str(self, since: &str) -> Result<Self> {
        let parsed = parse_filter_time("since", since)?;
        Ok(self.since(parsed))
    }

    /// Only transactions created before `until`. The offset is kept.
    pub fn until<Tz: TimeZone>(mut self, until: DateTime<Tz>) -> Self {
        self.until = Some(with_fixed_offset(until));
        self
    }

    pub fn until_str(self, until: &str) -> Result<Self> {
        let parsed = parse_filter_time("until", until)?;
        Ok(self.until(parsed))
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn account(mut self, account_id: impl Into<String>) -> Self {
        self.account = Some(account_id.into());
        self
    }

    /// Renders the filter as query parameters. Account scoping is part of the
    /// path, not the query.
    pub fn to_query(&self) -> Result<QueryParams> {
        if let (Some(since), Some(until)) = (self.since, self.until) {
            if since > until {
                return Err(ClientError::InvalidFilter(format!(
                    "`since` ({}) is after `until` ({})",
                    format_timestamp(&since),
                    format_timestamp(&until)
                )));
            }
        }

        let mut params = QueryParams::new();
        if let Some(status) = self.status {
            params.push(("filter[status]".into(), status.as_str().into()));
        }
        if let Some(since) = &self.since {
            params.push(("filter[since]".into(), format_timestamp(since)));
        }
        if let Some(until) = &self.until {
            params.push(("filter[until]".into(), format_timestamp(until)));
        }
        if let Some(category) = &self.category {
            params.push(("filter[category]".into(), non_blank("category", category)?));
        }
        if let Some(tag) = &self.tag {
            params.push(("filter[tag]".into(), non_blank("tag", tag)?));
        }
        Ok(params)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountFilter {
    pub account_type: Option<AccountType>,
}

impl AccountFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account_type(mut self, account_type: AccountType) -> Self {
        self.account_type = Some(account_type);
        self
    }

    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        if let Some(account_type) = self.account_type {
            params.push(("filter[accountType]".into(), account_type.as_str().into()));
        }
        params
    }
}

fn with_fixed_offset<Tz: TimeZone>(value: DateTime<Tz>) -> DateTime<FixedOffset> {
    let offset = value.offset().fix();
    value.with_timezone(&offset)
}

fn parse_filter_time(name: &str, raw: &str) -> Result<DateTime<FixedOffset>> {
    parse_timestamp(raw).ok_or_else(|| {
        ClientError::InvalidFilter(format!(
            "`{}` must be an RFC 3339 timestamp with an offset, got {:?}",
            name, raw
        ))
    })
}

fn non_blank(name: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ClientError::InvalidFilter(format!("`{}` must not be empty", name)));
    }
    Ok(trimmed.to_string())
}
