/// Protocol handlers applied to an outgoing call, in chain order.
///
/// The chain is a closed set: TLS always leads, then the proxy when one is
/// configured, then both auth variants when an API user is configured so
/// the call can satisfy whichever scheme the server challenges for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handler {
    Tls { verify: bool },
    Proxy(String),
    BasicAuth { user: String, password: String },
    DigestAuth { user: String, password: String },
}

/// Resolve proxy settings into a proxy URL.
///
/// Server, port, user and password together yield an authenticated proxy;
/// server and port alone yield an unauthenticated one. Any other non-empty
/// subset is an invalid configuration: it is logged and the proxy is
/// disabled rather than failing the caller.
pub(crate) fn resolve_proxy_url(
    server: Option<&str>,
    port: Option<u16>,
    user: Option<&str>,
    password: Option<&str>,
) -> Option<String> {
    match (server, port, user, password) {
        (Some(server), Some(port), Some(user), Some(password)) => {
            Some(format!("http://{user}:{password}@{server}:{port}"))
        }
        (Some(server), Some(port), None, None) => Some(format!("http://{server}:{port}")),
        (None, None, None, None) => None,
        _ => {
            tracing::warn!("Invalid proxy settings, proxy disabled.");
            None
        }
    }
}

/// Assemble the ordered handler chain for one call.
pub(crate) fn build_handler_chain(
    verify_tls: bool,
    proxy_url: Option<&str>,
    api_credentials: Option<(&str, &str)>,
) -> Vec<Handler> {
    let mut handlers = vec![Handler::Tls { verify: verify_tls }];

    if let Some(url) = proxy_url {
        handlers.push(Handler::Proxy(url.to_string()));
    }

    if let Some((user, password)) = api_credentials {
        handlers.push(Handler::BasicAuth {
            user: user.to_string(),
            password: password.to_string(),
        });
        handlers.push(Handler::DigestAuth {
            user: user.to_string(),
            password: password.to_string(),
        });
    }

    handlers
}
