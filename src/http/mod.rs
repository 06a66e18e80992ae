pub mod digest;
pub mod handler;
pub mod options;
pub mod request;

pub use handler::Handler;
pub use options::{RequestOptions, DEFAULT_TIMEOUT};
pub use request::{HttpRequest, RequestBody};
