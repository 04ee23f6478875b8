#![doc = include_str!("../README.md")]

pub mod client;
pub mod endpoint;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;
pub mod publish;
pub mod transport;

pub use client::ApiClient;
pub use endpoint::Endpoint;
pub use publish::{Publisher, redact_url};
pub use transport::{ApiRequest, ApiResponse, BoxFuture, Method, ReqwestTransport, Transport};
