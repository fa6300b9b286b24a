//! Shared building blocks for backend HTTP services.
//!
//! This crate provides:
//! - A typed configuration parameter registry fed by flags and environment
//! - Connection string parsing for Cassandra and Redis
//! - An outgoing HTTP client with REST resource URLs, a JSON router and a
//!   service runner
//! - Dependency health endpoints
//! - Redis-backed and in-memory cache clients, Cassandra sessions
//! - JWT signing glue and logging setup
//!
//! A typical service wires them together at startup:
//!
//! ```no_run
//! use service_kit::config::{Config, Parameter};
//! use service_kit::health::{BuildVersion, Dispatcher};
//! use service_kit::http::{Router, Service};
//! use service_kit::logging::{LoggingConfig, exit_on_startup_error, init_logging};
//!
//! #[tokio::main]
//! async fn main() {
//!     Config::load_dotenv();
//!     let mut config = Config::new();
//!     config.register(Parameter::HTTP_ADDRESS);
//!     config.register(Parameter::LOG_SEVERITY);
//!     if let Err(e) = config.parse() {
//!         exit_on_startup_error(&e);
//!     }
//!
//!     let severity = config.log_info().map(|p| p.severity()).unwrap_or_default();
//!     init_logging(&LoggingConfig::default().with_service_name("cards").with_severity(severity));
//!
//!     let health = Dispatcher::new(BuildVersion::from_env());
//!     let router = Router::new().merge(health.routes());
//!     match Service::from_config(router, &config) {
//!         Ok(service) => {
//!             if let Err(e) = service.run().await {
//!                 exit_on_startup_error(&e);
//!             }
//!         }
//!         Err(e) => exit_on_startup_error(&e),
//!     }
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cache;
pub mod cassandra;
pub mod config;
pub mod error;
pub mod health;
pub mod http;
pub mod jwt;
pub mod logging;

pub use cache::{CacheClient, CacheValue, MemoryCache, RedisCache};
pub use cassandra::{CassandraSession, ClusterSettings};
pub use config::{Config, ConfigError, Parameter, ParameterKind};
pub use error::{KitError, Result};
pub use http::{HttpClient, HttpClientConfig, HttpResource, ResourceResolver};
pub use jwt::{TokenError, TokenSigner};
pub use logging::{LoggingConfig, Severity, init_logging};
