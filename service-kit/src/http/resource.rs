//! Descriptions of REST resources called through [`HttpClient`](super::HttpClient).

use bytes::Bytes;
use reqwest::Method;

/// Path segment for nested collections of an entry.
pub const COLLECTIONS_SEGMENT: &str = "collections";
/// Path segment for resource actions.
pub const ACTIONS_SEGMENT: &str = "actions";
/// Query key listing nested entries to embed in a response.
pub const NESTED_ENTRIES_KEY: &str = "include";

/// What the client needs to know to call a resource.
pub trait ResourceInfo {
    /// HTTP method.
    fn method(&self) -> &Method;

    /// Absolute resource URL.
    fn url(&self) -> &str;

    /// Headers in insertion order. A name may repeat.
    fn headers(&self) -> &[(String, String)];

    /// Request body, if any.
    fn body(&self) -> Option<&Bytes> {
        None
    }
}

/// A single HTTP call: method, URL, headers and optional body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResource {
    method: Method,
    url: String,
    headers: Vec<(String, String)>,
    body: Option<Bytes>,
}

impl HttpResource {
    /// Describe a call with no headers and no body.
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Add a header value. Earlier values under the same name are kept.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    /// Builder form of [`add_header`](Self::add_header).
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_header(name, value);
        self
    }

    /// Set the request body.
    pub fn set_body(&mut self, body: impl Into<Bytes>) {
        self.body = Some(body.into());
    }

    /// Values sent under `name`, compared case-insensitively.
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl ResourceInfo for HttpResource {
    fn method(&self) -> &Method {
        &self.method
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }
}

/// Builds [`HttpResource`]s for the usual REST shapes under a base URL.
///
/// Entries live at `<base>/<resource>/<id>`, nested collections at
/// `<base>/<resource>/<id>/collections/<collection>` and actions at
/// `<base>/<resource>/actions/<action>`. Nested entries are requested with
/// `?include=a,b`. Updates are sent as `POST`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceResolver;

impl ResourceResolver {
    /// Create a resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// `POST <base>/<resource>`
    #[must_use]
    pub fn create_entry(&self, base_url: &str, resource: &str) -> HttpResource {
        HttpResource::new(Method::POST, resource_url(base_url, resource))
    }

    /// `GET <base>/<resource>/<id>`
    #[must_use]
    pub fn read_entry(&self, base_url: &str, resource: &str, id: &str) -> HttpResource {
        HttpResource::new(Method::GET, entry_url(base_url, resource, id))
    }

    /// `GET <base>/<resource>/<id>?include=<nested,...>`
    #[must_use]
    pub fn read_entry_with_nested(
        &self,
        base_url: &str,
        resource: &str,
        id: &str,
        nested: &[&str],
    ) -> HttpResource {
        HttpResource::new(
            Method::GET,
            with_nested_entries(entry_url(base_url, resource, id), nested),
        )
    }

    /// `POST <base>/<resource>/<id>`
    #[must_use]
    pub fn update_entry(&self, base_url: &str, resource: &str, id: &str) -> HttpResource {
        HttpResource::new(Method::POST, entry_url(base_url, resource, id))
    }

    /// `DELETE <base>/<resource>/<id>`
    #[must_use]
    pub fn delete_entry(&self, base_url: &str, resource: &str, id: &str) -> HttpResource {
        HttpResource::new(Method::DELETE, entry_url(base_url, resource, id))
    }

    /// `GET <base>/<resource>/<id>/collections/<collection>`
    #[must_use]
    pub fn read_nested_collection(
        &self,
        base_url: &str,
        resource: &str,
        id: &str,
        collection: &str,
    ) -> HttpResource {
        HttpResource::new(
            Method::GET,
            collection_url(base_url, resource, id, collection),
        )
    }

    /// `GET <base>/<resource>/<id>/collections/<collection>?include=<nested,...>`
    #[must_use]
    pub fn read_nested_collection_with_nested(
        &self,
        base_url: &str,
        resource: &str,
        id: &str,
        collection: &str,
        nested: &[&str],
    ) -> HttpResource {
        HttpResource::new(
            Method::GET,
            with_nested_entries(collection_url(base_url, resource, id, collection), nested),
        )
    }

    /// `POST <base>/<resource>/actions/<action>`
    #[must_use]
    pub fn invoke_action(&self, base_url: &str, resource: &str, action: &str) -> HttpResource {
        HttpResource::new(
            Method::POST,
            format!("{}/{ACTIONS_SEGMENT}/{action}", resource_url(base_url, resource)),
        )
    }
}

fn resource_url(base_url: &str, resource: &str) -> String {
    format!("{base_url}/{resource}")
}

fn entry_url(base_url: &str, resource: &str, id: &str) -> String {
    format!("{}/{id}", resource_url(base_url, resource))
}

fn collection_url(base_url: &str, resource: &str, id: &str, collection: &str) -> String {
    format!(
        "{}/{COLLECTIONS_SEGMENT}/{collection}",
        entry_url(base_url, resource, id)
    )
}

fn with_nested_entries(url: String, nested: &[&str]) -> String {
    format!("{url}?{NESTED_ENTRIES_KEY}={}", nested.join(","))
}
