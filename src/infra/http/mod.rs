//! HTTP plumbing shared by the preview and action flows.

pub mod transport;

pub use transport::{
    CSRF_HEADER_NAME, HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError,
};
