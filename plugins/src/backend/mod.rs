mod http;
pub mod improve;
pub mod stream;

pub use http::{server_error_message, TOKEN_HEADER};
pub use improve::ImproveClient;
pub use stream::StreamingClient;
