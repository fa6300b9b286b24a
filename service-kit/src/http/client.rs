//! Outgoing calls to external APIs.

use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, ClientBuilder, StatusCode};
use tracing::{debug, warn};

use super::resource::ResourceInfo;
use crate::config::Config;
use crate::error::{KitError, Result};

/// Settings for the outgoing connection pool.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Deadline for a whole call, body included
    pub request_timeout: Duration,
    /// Deadline for establishing a connection
    pub connect_timeout: Duration,
    /// How long an idle pooled connection is kept
    pub pool_idle_timeout: Duration,
    /// User agent sent with every call
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_idle_timeout: Duration::from_secs(90),
            user_agent: concat!("service-kit/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpClientConfig {
    /// Derive call deadlines from the registry's HTTP timeouts.
    ///
    /// A call may take as long as the service allows for reading a request
    /// and writing its response. Connecting never takes longer than that.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let request_timeout = config.http_read_timeout() + config.http_write_timeout();
        let defaults = Self::default();
        Self {
            request_timeout,
            connect_timeout: defaults.connect_timeout.min(request_timeout),
            ..defaults
        }
    }

    /// Set the whole-call deadline.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    fn build(&self) -> reqwest::Result<Client> {
        ClientBuilder::new()
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .pool_idle_timeout(self.pool_idle_timeout)
            .user_agent(&self.user_agent)
            .use_rustls_tls()
            .build()
    }
}

/// Calls external APIs described by [`ResourceInfo`].
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Build a client from explicit settings.
    ///
    /// # Errors
    ///
    /// Returns an error if TLS initialization fails.
    pub fn new(config: &HttpClientConfig) -> Result<Self> {
        Ok(Self {
            client: config.build()?,
        })
    }

    /// Build a client whose deadlines follow the registry's HTTP timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if TLS initialization fails.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&HttpClientConfig::from_config(config))
    }

    /// Wrap an already configured reqwest client.
    #[must_use]
    pub const fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Call the resource and return the raw response body.
    ///
    /// Every header value is sent, including repeated names. Only `200 OK`
    /// counts as success; any other status fails with
    /// [`KitError::ExternalApi`] carrying the status and the body text.
    ///
    /// # Errors
    ///
    /// - [`KitError::RequestCreation`] for an invalid URL or header
    /// - [`KitError::Http`] when the request cannot be sent
    /// - [`KitError::ResponseRead`] when the body cannot be read
    /// - [`KitError::ExternalApi`] for a non-200 answer
    pub async fn raw_call<R>(&self, resource: &R) -> Result<Bytes>
    where
        R: ResourceInfo + Sync + ?Sized,
    {
        let mut builder = self
            .client
            .request(resource.method().clone(), resource.url())
            .headers(header_map(resource.headers())?);
        if let Some(body) = resource.body() {
            builder = builder.body(body.clone());
        }
        let request = builder
            .build()
            .map_err(|e| KitError::request_creation(e.to_string()))?;

        debug!(method = %request.method(), url = %request.url(), "Calling external API");
        let response = self.client.execute(request).await?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| KitError::ResponseRead { source })?;

        if status != StatusCode::OK {
            warn!(status = status.as_u16(), url = resource.url(), "External API answered with an error");
            return Err(KitError::external_api(
                status.as_u16(),
                String::from_utf8_lossy(&body),
            ));
        }

        Ok(body)
    }
}

fn header_map(headers: &[(String, String)]) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| KitError::request_creation(format!("header {name}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| KitError::request_creation(format!("header {name}: {e}")))?;
        map.append(name, value);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::resource::{HttpResource, ResourceResolver};
    use reqwest::Method;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> HttpClient {
        HttpClient::new(&HttpClientConfig::default()).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = HttpClientConfig::default();
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert!(config.user_agent.starts_with("service-kit/"));
    }

    #[test]
    fn test_config_follows_registry_timeouts() {
        let registry = Config::new()
            .with_http_read_timeout(Duration::from_secs(2))
            .with_http_write_timeout(Duration::from_secs(3));

        let config = HttpClientConfig::from_config(&registry);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.connect_timeout, Duration::from_secs(5));

        let config = HttpClientConfig::from_config(&Config::new());
        assert_eq!(config.request_timeout, Duration::from_secs(2));
        assert_eq!(config.connect_timeout, Duration::from_secs(2));
        assert!(HttpClient::from_config(&registry).is_ok());
    }

    #[test]
    fn test_repeated_header_names_keep_every_value() {
        let headers = [
            ("accept".to_string(), "application/json".to_string()),
            ("accept".to_string(), "text/plain".to_string()),
        ];
        let map = header_map(&headers).unwrap();

        let values: Vec<_> = map.get_all("accept").iter().collect();
        assert_eq!(values, ["application/json", "text/plain"]);
    }

    #[tokio::test]
    async fn test_raw_call_returns_body_on_ok() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/cards/42"))
            .and(header("x-api-key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[1,2]"))
            .mount(&server)
            .await;

        let resource = ResourceResolver::new()
            .read_entry(&format!("{}/v1", server.uri()), "cards", "42")
            .with_header("x-api-key", "secret");
        let body = client().raw_call(&resource).await.unwrap();

        assert_eq!(&body[..], b"[1,2]");
    }

    #[tokio::test]
    async fn test_raw_call_sends_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/cards"))
            .and(body_string(r#"{"id":1}"#))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let mut resource = ResourceResolver::new().create_entry(&server.uri(), "cards");
        resource.set_body(r#"{"id":1}"#);

        assert!(client().raw_call(&resource).await.is_ok());
    }

    #[tokio::test]
    async fn test_raw_call_fails_on_non_ok_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201).set_body_string("created"))
            .mount(&server)
            .await;

        let err = client()
            .raw_call(&HttpResource::new(Method::POST, server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(
            &err,
            KitError::ExternalApi { status: 201, body } if body == "created"
        ));
    }

    #[tokio::test]
    async fn test_raw_call_rejects_invalid_header() {
        let resource =
            HttpResource::new(Method::GET, "http://localhost").with_header("bad header", "v");
        let err = client().raw_call(&resource).await.unwrap_err();

        assert!(matches!(err, KitError::RequestCreation(_)));
    }

    #[tokio::test]
    async fn test_raw_call_rejects_invalid_url() {
        let err = client()
            .raw_call(&HttpResource::new(Method::GET, "not a url"))
            .await
            .unwrap_err();

        assert!(matches!(err, KitError::RequestCreation(_)));
    }
}
