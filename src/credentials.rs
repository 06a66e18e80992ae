use std::time::Duration;

use serde::Deserialize;

use crate::utils::errors::{Result, SolnLibError};

/// Secret-resolution boundary consumed by the HTTP request wrapper.
///
/// Implementations are keyed however they like (splunkd password storage,
/// an in-memory table in tests); callers only ask for a user's password.
pub trait CredentialManager {
    /// Resolve the password stored for `user`.
    ///
    /// Fails with [`SolnLibError::CredentialNotFound`] when no matching
    /// secret exists.
    fn get_password(&self, user: &str) -> Result<String>;
}

/// Credential lookups against splunkd password storage.
///
/// Reads `storage/passwords` from the management API inside the
/// `(owner, app)` namespace, matching entries on username and realm.
/// Lookup only; storing passwords is splunkd's job.
pub struct SplunkCredentialManager {
    session_key: String,
    app: String,
    owner: String,
    realm: Option<String>,
    scheme: String,
    host: String,
    port: u16,
    timeout: Duration,
}

impl SplunkCredentialManager {
    pub fn new(session_key: &str, app: &str) -> Self {
        Self {
            session_key: session_key.to_string(),
            app: app.to_string(),
            owner: "nobody".to_string(),
            realm: None,
            scheme: "https".to_string(),
            host: "localhost".to_string(),
            port: 8089,
            timeout: Duration::from_secs(30),
        }
    }

    /// Set the namespace owner (defaults to `nobody`).
    pub fn with_owner(mut self, owner: &str) -> Self {
        self.owner = owner.to_string();
        self
    }

    /// Set the credential realm. Entries stored without a realm only match
    /// when no realm is configured.
    pub fn with_realm(mut self, realm: &str) -> Self {
        self.realm = Some(realm.to_string());
        self
    }

    /// Point at a non-default management endpoint.
    pub fn with_endpoint(mut self, scheme: &str, host: &str, port: u16) -> Self {
        self.scheme = scheme.to_string();
        self.host = host.to_string();
        self.port = port;
        self
    }

    fn passwords_url(&self) -> String {
        format!(
            "{}://{}:{}/servicesNS/{}/{}/storage/passwords?output_mode=json&count=-1",
            self.scheme, self.host, self.port, self.owner, self.app
        )
    }
}

impl CredentialManager for SplunkCredentialManager {
    fn get_password(&self, user: &str) -> Result<String> {
        let url = self.passwords_url();
        tracing::debug!("Fetching stored passwords from: {url}");

        // splunkd ships a self-signed certificate out of the box.
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .danger_accept_invalid_certs(true)
            .build()?;

        let response = client
            .get(&url)
            .header("Authorization", format!("Splunk {}", self.session_key))
            .send()?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SolnLibError::Auth(format!(
                "storage/passwords request failed: {status} - {error_text}"
            )));
        }

        let list: PasswordList = response.json()?;
        find_clear_password(&list, user, self.realm.as_deref()).ok_or_else(|| {
            tracing::error!("Credential could not be found for user: {user}");
            SolnLibError::CredentialNotFound(user.to_string())
        })
    }
}

#[derive(Deserialize)]
struct PasswordList {
    entry: Vec<PasswordEntry>,
}

#[derive(Deserialize)]
struct PasswordEntry {
    content: PasswordContent,
}

#[derive(Deserialize)]
struct PasswordContent {
    username: String,
    #[serde(default)]
    realm: String,
    clear_password: String,
}

fn find_clear_password(list: &PasswordList, user: &str, realm: Option<&str>) -> Option<String> {
    let expected_realm = realm.unwrap_or("");
    list.entry
        .iter()
        .map(|entry| &entry.content)
        .find(|content| content.username == user && content.realm == expected_realm)
        .map(|content| content.clear_password.clone())
}
