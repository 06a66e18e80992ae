//! Splunk solutions helper library.
//!
//! Building blocks for Splunk modular input integrations: an HTTP request
//! wrapper with credential-store, proxy and auth handling
//! ([`http::HttpRequest`]), environment helpers that resolve runtime
//! configuration through `btool` ([`splunkenv`]), content codecs for
//! compressed payloads ([`codecs`]) and small process utilities
//! ([`utils`]).

pub mod codecs;
pub mod credentials;
pub mod http;
pub mod splunkenv;
pub mod utils;

// Re-export specific items to avoid conflicts
pub use codecs::{GzipDecoder, ZipDecoder};
pub use credentials::{CredentialManager, SplunkCredentialManager};
pub use http::{Handler, HttpRequest, RequestBody, RequestOptions};
pub use splunkenv::{
    get_conf_stanzas, get_splunk_bin, get_splunkd_server_info, get_splunkd_uri,
    make_splunkhome_path, SplunkdInfo,
};
pub use utils::errors::{Result, SolnLibError};
pub use utils::{
    datetime_to_seconds, escape_json_control_chars, is_false, is_true,
    register_teardown_handler, TeardownHandle,
};
