pub mod transport;
#[cfg(feature = "http")]
pub mod http;

pub use transport::{transport_fn, FnTransport, SharedTransport, Transport};
#[cfg(feature = "http")]
pub use http::{HttpTransport, HttpTransportConfig};
