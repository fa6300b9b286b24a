//! HTTP plumbing: outgoing client, REST resource URLs, JSON router, error
//! bodies and the service runner.

mod client;
mod resource;
mod response;
mod router;
mod service;

pub use client::{HttpClient, HttpClientConfig};
pub use reqwest::Method;
pub use resource::{
    ACTIONS_SEGMENT, COLLECTIONS_SEGMENT, HttpResource, NESTED_ENTRIES_KEY, ResourceInfo,
    ResourceResolver,
};
pub use response::{ErrorCode, HttpError, Response};
pub use router::{DEFAULT_BODY_LIMIT, HandlerError, RequestHandler, Router};
pub use service::{Service, shutdown_signal};
