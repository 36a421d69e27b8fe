//! Lazy traversal of cursor-paginated collection endpoints.

use std::collections::VecDeque;
use std::fmt;
use std::iter::FusedIterator;

use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::core::Client;
use crate::errors::{ClientError, Result};
use crate::mapper::{FromResource, ResourceKind};

/// Largest page the API accepts.
pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Limit and page size of a list request.
///
/// `limit` caps the total number of items yielded across all pages; `None`
/// walks the collection to its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    pub limit: Option<usize>,
    pub page_size: u32,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            limit: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListOptions {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            limit: config.default_limit,
            page_size: config.default_page_size,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn unbounded(mut self) -> Self {
        self.limit = None;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Page sizes outside `1..=100` are rejected rather than clamped.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ClientError::InvalidFilter(format!(
                "page size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.page_size
            )));
        }
        Ok(())
    }
}

/// One page as returned by the API: raw items plus the link to the next page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawPage {
    pub items: Vec<Value>,
    pub next: Option<String>,
}

impl RawPage {
    pub fn new(items: Vec<Value>, next: Option<String>) -> Self {
        Self { items, next }
    }

    /// Reads a collection document: `{"data": [...], "links": {"next": url | null}}`.
    pub fn from_body(kind: ResourceKind, body: &Value) -> Result<Self> {
        let items = body
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| ClientError::malformed(kind, "collection has no `data` array"))?
            .clone();
        let next = match body.get("links").and_then(|links| links.get("next")) {
            None | Some(Value::Null) => None,
            Some(Value::String(link)) if link.is_empty() => None,
            Some(Value::String(link)) => Some(link.clone()),
            Some(other) => {
                return Err(ClientError::malformed(
                    kind,
                    format!("`links.next` is not a string: {}", other),
                ))
            }
        };
        Ok(Self { items, next })
    }
}

/// Where a list is in its traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    NotStarted,
    Fetching,
    HasBuffer,
    Exhausted,
    Failed,
}

type PageFetch = Box<dyn FnMut(Option<&str>, u32) -> Result<RawPage> + Send>;

/// Forward-only sequence of entities backed by a paginated endpoint.
///
/// Nothing is requested until the first advance. Each page is fetched only
/// once its predecessor has been fully consumed, and no page is fetched once
/// `limit` items have been yielded. A failed fetch moves the list into
/// [`ListState::Failed`]; [`PaginatedList::try_next`] then keeps returning that
/// error, while the [`Iterator`] view yields it once and ends.
pub struct PaginatedList<T> {
    fetch: PageFetch,
    options: ListOptions,
    state: ListState,
    buffer: VecDeque<T>,
    cursor: Option<String>,
    error: Option<ClientError>,
    error_reported: bool,
    fetches: usize,
    yielded: usize,
    client: Option<Client>,
}

impl<T: FromResource> PaginatedList<T> {
    /// `fetch` receives the cursor of the page to load (`None` for the first
    /// page) and the number of items to request.
    pub fn new<F>(fetch: F, options: ListOptions) -> Result<Self>
    where
        F: FnMut(Option<&str>, u32) -> Result<RawPage> + Send + 'static,
    {
        options.validate()?;
        Ok(Self {
            fetch: Box::new(fetch),
            options,
            state: ListState::NotStarted,
            buffer: VecDeque::new(),
            cursor: None,
            error: None,
            error_reported: false,
            fetches: 0,
            yielded: 0,
            client: None,
        })
    }

    /// Items yielded from now on carry a handle to `client`.
    pub(crate) fn attached_to(mut self, client: &Client) -> Self {
        self.client = Some(client.clone());
        self
    }

    /// Advances the list, fetching the next page when the buffer runs dry.
    pub fn try_next(&mut self) -> Result<Option<T>> {
        loop {
            match self.state {
                ListState::Failed => {
                    return match &self.error {
                        Some(err) => Err(err.clone()),
                        None => Ok(None),
                    };
                }
                ListState::Exhausted => return Ok(None),
                _ => {}
            }

            if self.limit_reached() {
                self.finish();
                return Ok(None);
            }

            if let Some(item) = self.buffer.pop_front() {
                self.yielded += 1;
                return Ok(Some(item));
            }

            let cursor = match self.state {
                ListState::NotStarted => None,
                _ => match self.cursor.clone() {
                    Some(cursor) => Some(cursor),
                    None => {
                        self.finish();
                        return Ok(None);
                    }
                },
            };
            self.fetch_page(cursor)?;
        }
    }

    fn fetch_page(&mut self, cursor: Option<String>) -> Result<()> {
        let page_size = self.request_size();
        self.state = ListState::Fetching;
        self.fetches += 1;
        let kind = T::KIND;
        debug!(
            kind = %kind,
            cursor = cursor.as_deref().unwrap_or("<first>"),
            page_size,
            "fetching page"
        );

        let page = match (self.fetch)(cursor.as_deref(), page_size) {
            Ok(page) => page,
            Err(err) => return Err(self.fail(err)),
        };
        let mut items = match page
            .items
            .iter()
            .map(T::from_resource)
            .collect::<Result<VecDeque<T>>>()
        {
            Ok(items) => items,
            Err(err) => return Err(self.fail(err)),
        };
        if let Some(client) = &self.client {
            items.iter_mut().for_each(|item| item.attach(client));
        }

        debug!(
            kind = %kind,
            items = items.len(),
            has_next = page.next.is_some(),
            "page received"
        );
        self.buffer = items;
        self.cursor = page.next;
        self.state = ListState::HasBuffer;
        Ok(())
    }

    fn fail(&mut self, err: ClientError) -> ClientError {
        self.state = ListState::Failed;
        self.error = Some(err.clone());
        err
    }
}

impl<T> PaginatedList<T> {
    pub fn state(&self) -> ListState {
        self.state
    }

    pub fn options(&self) -> ListOptions {
        self.options
    }

    /// Number of page requests issued so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches
    }

    /// Number of items handed out so far.
    pub fn yielded(&self) -> usize {
        self.yielded
    }

    /// Items of the current page that have not been yielded yet.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    pub fn next_cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    pub fn last_error(&self) -> Option<&ClientError> {
        self.error.as_ref()
    }

    fn limit_reached(&self) -> bool {
        self.options
            .limit
            .map_or(false, |limit| self.yielded >= limit)
    }

    fn request_size(&self) -> u32 {
        match self.options.limit {
            Some(limit) => {
                let remaining = limit.saturating_sub(self.yielded).max(1);
                self.options.page_size.min(remaining.min(u32::MAX as usize) as u32)
            }
            None => self.options.page_size,
        }
    }

    fn finish(&mut self) {
        self.state = ListState::Exhausted;
        self.buffer.clear();
        self.cursor = None;
    }
}

impl<T: FromResource> Iterator for PaginatedList<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.error_reported {
            return None;
        }
        match self.try_next() {
            Ok(item) => item.map(Ok),
            Err(err) => {
                self.error_reported = true;
                Some(Err(err))
            }
        }
    }
}

impl<T: FromResource> FusedIterator for PaginatedList<T> {}

impl<T> fmt::Debug for PaginatedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaginatedList")
            .field("options", &self.options)
            .field("state", &self.state)
            .field("buffered", &self.buffer.len())
            .field("cursor", &self.cursor)
            .field("fetches", &self.fetches)
            .field("yielded", &self.yielded)
            .field("error", &self.error)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use super::*;
    use crate::domain::WebhookEvent;
    use crate::errors::TransportError;

    fn event(id: usize) -> Value {
        json!({
            "id": format!("e{}", id),
            "attributes": {"eventType": "PING", "createdAt": "2023-02-01T08:00:00+11:00"},
            "relationships": {"webhook": {"data": {"type": "webhooks", "id": "w1"}}}
        })
    }

    /// Serves pages of the given sizes, numbering items consecutively.
    fn paged(sizes: &[usize]) -> Vec<RawPage> {
        let mut next_id = 0;
        let total = sizes.len();
        sizes
            .iter()
            .enumerate()
            .map(|(index, size)| {
                let items = (0..*size)
                    .map(|_| {
                        next_id += 1;
                        event(next_id)
                    })
                    .collect();
                let next = (index + 1 < total).then(|| format!("cursor-{}", index + 1));
                RawPage::new(items, next)
            })
            .collect()
    }

    type Calls = Arc<Mutex<Vec<(Option<String>, u32)>>>;

    fn scripted(
        pages: Vec<Result<RawPage>>,
    ) -> (
        impl FnMut(Option<&str>, u32) -> Result<RawPage> + Send + 'static,
        Calls,
    ) {
        let calls: Calls = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&calls);
        let mut pages = pages.into_iter();
        let fetch = move |cursor: Option<&str>, size: u32| {
            recorded
                .lock()
                .unwrap()
                .push((cursor.map(str::to_string), size));
            pages
                .next()
                .unwrap_or_else(|| panic!("unexpected fetch for cursor {:?}", cursor))
        };
        (fetch, calls)
    }

    fn ids(list: PaginatedList<WebhookEvent>) -> Vec<String> {
        list.map(|item| item.expect("item").id().to_string())
            .collect()
    }

    #[test]
    fn zero_limit_yields_nothing_and_never_fetches() {
        let (fetch, calls) = scripted(Vec::new());
        let mut list: PaginatedList<WebhookEvent> =
            PaginatedList::new(fetch, ListOptions::default().with_limit(0)).unwrap();

        assert!(list.try_next().unwrap().is_none());
        assert_eq!(list.state(), ListState::Exhausted);
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn construction_is_lazy() {
        let (fetch, calls) = scripted(paged(&[2]).into_iter().map(Ok).collect());
        let list: PaginatedList<WebhookEvent> =
            PaginatedList::new(fetch, ListOptions::default()).unwrap();

        assert_eq!(list.state(), ListState::NotStarted);
        assert_eq!(list.fetch_count(), 0);
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn unbounded_list_walks_every_page_once() {
        let (fetch, calls) = scripted(paged(&[3, 3, 1]).into_iter().map(Ok).collect());
        let list: PaginatedList<WebhookEvent> =
            PaginatedList::new(fetch, ListOptions::default().with_page_size(3)).unwrap();

        let ids = ids(list);
        assert_eq!(ids, ["e1", "e2", "e3", "e4", "e5", "e6", "e7"]);

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], (None, 3));
        assert_eq!(calls[1].0.as_deref(), Some("cursor-1"));
        assert_eq!(calls[2].0.as_deref(), Some("cursor-2"));
    }

    #[test]
    fn limit_stops_before_fetching_more_pages() {
        let (fetch, calls) = scripted(paged(&[2, 2, 2]).into_iter().map(Ok).collect());
        let mut list: PaginatedList<WebhookEvent> = PaginatedList::new(
            fetch,
            ListOptions::default().with_page_size(2).with_limit(3),
        )
        .unwrap();

        let mut seen = Vec::new();
        while let Some(item) = list.try_next().unwrap() {
            seen.push(item.id().to_string());
        }

        assert_eq!(seen, ["e1", "e2", "e3"]);
        assert_eq!(list.fetch_count(), 2);
        assert_eq!(calls.lock().unwrap().len(), 2);
        assert_eq!(list.state(), ListState::Exhausted);
        assert_eq!(list.buffered(), 0);
    }

    #[test]
    fn limit_on_page_boundary_needs_no_extra_fetch() {
        let (fetch, calls) = scripted(paged(&[2, 2]).into_iter().map(Ok).collect());
        let list: PaginatedList<WebhookEvent> = PaginatedList::new(
            fetch,
            ListOptions::default().with_page_size(2).with_limit(2),
        )
        .unwrap();

        assert_eq!(ids(list), ["e1", "e2"]);
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn limit_above_total_yields_everything_available() {
        let (fetch, _calls) = scripted(paged(&[2, 1]).into_iter().map(Ok).collect());
        let list: PaginatedList<WebhookEvent> =
            PaginatedList::new(fetch, ListOptions::default().with_limit(50)).unwrap();

        assert_eq!(ids(list), ["e1", "e2", "e3"]);
    }

    #[test]
    fn first_request_shrinks_to_small_limit() {
        let (fetch, calls) = scripted(paged(&[5]).into_iter().map(Ok).collect());
        let list: PaginatedList<WebhookEvent> =
            PaginatedList::new(fetch, ListOptions::default().with_limit(5)).unwrap();

        assert_eq!(ids(list).len(), 5);
        assert_eq!(calls.lock().unwrap()[0], (None, 5));
    }

    #[test]
    fn second_page_failure_surfaces_after_first_page_drains() {
        let mut pages: Vec<Result<RawPage>> = paged(&[2, 2]).into_iter().map(Ok).collect();
        pages[1] = Err(ClientError::Transport(TransportError::Network(
            "connection reset".into(),
        )));
        let (fetch, _calls) = scripted(pages);
        let mut list: PaginatedList<WebhookEvent> =
            PaginatedList::new(fetch, ListOptions::default().with_page_size(2)).unwrap();

        assert_eq!(list.try_next().unwrap().unwrap().id(), "e1");
        assert_eq!(list.try_next().unwrap().unwrap().id(), "e2");
        assert_eq!(list.fetch_count(), 1);

        let err = list.try_next().unwrap_err();
        assert!(err.is_transport());
        assert_eq!(list.state(), ListState::Failed);
        assert_eq!(list.last_error(), Some(&err));

        assert_eq!(list.next_cursor(), Some("cursor-1"));

        // Further advances re-raise the same failure without fetching again.
        assert_eq!(list.try_next().unwrap_err(), err);
        assert_eq!(list.fetch_count(), 2);
        assert_eq!(list.next_cursor(), Some("cursor-1"));
    }

    #[test]
    fn iterator_reports_failure_once() {
        let pages = vec![Err(ClientError::Transport(TransportError::Status {
            status: 500,
            body: "boom".into(),
        }))];
        let (fetch, _calls) = scripted(pages);
        let mut list: PaginatedList<WebhookEvent> =
            PaginatedList::new(fetch, ListOptions::default()).unwrap();

        assert!(matches!(list.next(), Some(Err(ClientError::Transport(_)))));
        assert!(list.next().is_none());
        assert_eq!(list.state(), ListState::Failed);
    }

    #[test]
    fn malformed_item_fails_the_page() {
        let mut page = paged(&[2]).remove(0);
        page.items[1]["attributes"]
            .as_object_mut()
            .unwrap()
            .remove("eventType");
        let (fetch, _calls) = scripted(vec![Ok(page)]);
        let mut list: PaginatedList<WebhookEvent> =
            PaginatedList::new(fetch, ListOptions::default()).unwrap();

        let err = list.try_next().unwrap_err();
        assert!(err.is_malformed());
        assert_eq!(list.yielded(), 0);
    }

    #[test]
    fn empty_intermediate_page_is_skipped() {
        let (fetch, calls) = scripted(paged(&[0, 2]).into_iter().map(Ok).collect());
        let list: PaginatedList<WebhookEvent> =
            PaginatedList::new(fetch, ListOptions::default()).unwrap();

        assert_eq!(ids(list), ["e1", "e2"]);
        assert_eq!(calls.lock().unwrap().len(), 2);
    }

    #[test]
    fn out_of_range_page_sizes_are_rejected() {
        for page_size in [0, 101] {
            let (fetch, _calls) = scripted(Vec::new());
            let err = PaginatedList::<WebhookEvent>::new(
                fetch,
                ListOptions::default().with_page_size(page_size),
            )
            .unwrap_err();
            assert!(matches!(err, ClientError::InvalidFilter(_)));
        }
    }

    #[test]
    fn raw_page_reads_collection_document() {
        let body = json!({
            "data": [event(1)],
            "links": {"prev": null, "next": "https://api.up.com.au/api/v1/webhooks?page[after]=abc"}
        });
        let page = RawPage::from_body(ResourceKind::WebhookEvent, &body).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(
            page.next.as_deref(),
            Some("https://api.up.com.au/api/v1/webhooks?page[after]=abc")
        );

        let last = json!({"data": [], "links": {"prev": null, "next": null}});
        assert_eq!(RawPage::from_body(ResourceKind::WebhookEvent, &last).unwrap().next, None);

        for next in [json!(7), json!({"href": "https://api.up.com.au/api/v1/webhooks"})] {
            let odd = json!({"data": [], "links": {"next": next}});
            assert!(RawPage::from_body(ResourceKind::WebhookEvent, &odd)
                .unwrap_err()
                .is_malformed());
        }

        let broken = json!({"errors": []});
        assert!(RawPage::from_body(ResourceKind::WebhookEvent, &broken)
            .unwrap_err()
            .is_malformed());
    }
}
