//! VxSDK client
//!
//! Async access to a video management server's REST API:
//! - [`VxClient`]: top-level collections, creation and system calls
//! - [`Handle`]: snapshot of one resource with setters and relations
//! - [`Transport`]: pluggable request executor ([`HttpTransport`] for real
//!   servers, [`MockTransport`] for tests)
//! - [`SystemConfiguration`]: the independent configuration areas

pub mod client;
pub mod config;
pub mod configuration;
pub mod handle;
pub mod http;
pub mod mock;
pub mod resources;
pub mod transport;

pub use client::{SystemStatus, VxClient};
pub use config::{ClientConfig, Credentials};
pub use configuration::{
    AuthConfig, BookmarkConfig, ClusterConfig, SmtpConfig, SystemConfiguration, TimeConfig,
};
pub use handle::Handle;
pub use http::HttpTransport;
pub use mock::MockTransport;
pub use resources::ResourceData;
pub use transport::{ApiRequest, ApiResponse, Method, Transport};

pub use vxsdk_common as common;
pub use vxsdk_common::{Collection, CollectionQuery, Error, FilterKey, Result, ResultCode};
