//! HTTP transport.

pub mod headers;
pub mod http;

pub use headers::{Authorization, RequestOptions};
pub use http::{HttpExecutor, MultipartUpload};
