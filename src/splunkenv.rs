//! Splunk platform environment helpers.
//!
//! Resolution of `$SPLUNK_HOME` paths and of the runtime configuration
//! splunkd actually runs with, by shelling out to `btool` and parsing its
//! ini-style listing.

use std::collections::HashMap;
use std::env;
use std::path::{Component, Path, PathBuf};
use std::process::Command;

use crate::utils::convert::is_true;
use crate::utils::errors::{Result, SolnLibError};

// Subtrees that live on shared storage when search head pooling is enabled.
const ON_SHARED_STORAGE: &[&str] = &[
    "etc/apps",
    "etc/users",
    "var/run/splunk/dispatch",
    "var/run/splunk/srtemp",
    "var/run/splunk/rss",
    "var/run/splunk/scheduler",
    "var/run/splunk/lookup_tmp",
];

/// Splunkd management endpoint location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplunkdInfo {
    pub scheme: String,
    pub host: String,
    pub port: u16,
}

/// Construct an absolute path from `$SPLUNK_HOME` and `parts`.
///
/// Paths under the well-known shared subtrees resolve against the search
/// head pooling storage root when `server.conf` enables pooling. The
/// joined path is lexically normalized and must stay inside the chosen
/// base directory.
pub fn make_splunkhome_path(parts: &[&str]) -> Result<PathBuf> {
    let relpath = normalize_path(&parts.iter().collect::<PathBuf>());

    let basepath = match shared_storage_root() {
        Some(storage)
            if ON_SHARED_STORAGE
                .iter()
                .any(|candidate| relpath.starts_with(candidate)) =>
        {
            storage
        }
        _ => splunk_home()?,
    };

    let basepath = normalize_path(&basepath);
    let fullpath = normalize_path(&basepath.join(&relpath));

    // Check that we haven't escaped from the intended parent directory.
    if !fullpath.starts_with(&basepath) {
        return Err(SolnLibError::InvalidInput(format!(
            "illegal escape from parent directory {}: {}",
            basepath.display(),
            fullpath.display()
        )));
    }
    Ok(fullpath)
}

/// Absolute path of the splunk CLI.
pub fn get_splunk_bin() -> Result<PathBuf> {
    let splunk_bin = if cfg!(windows) { "splunk.exe" } else { "splunk" };
    make_splunkhome_path(&["bin", splunk_bin])
}

/// Resolve the splunkd management endpoint from runtime configuration.
///
/// Scheme follows `server.conf [sslConfig] enableSplunkdSSL`, host and
/// port come from `web.conf [settings] mgmtHostPort`, and `$SPLUNK_BINDIP`
/// overrides the host when set.
pub fn get_splunkd_server_info() -> Result<SplunkdInfo> {
    let server_conf = get_conf_stanzas("server")?;
    let ssl_enabled = server_conf
        .get("sslConfig")
        .and_then(|stanza| stanza.get("enableSplunkdSSL"))
        .ok_or_else(|| {
            SolnLibError::Config(
                "server.conf is missing [sslConfig] enableSplunkdSSL".to_string(),
            )
        })?;
    let scheme = if is_true(ssl_enabled) { "https" } else { "http" };

    let web_conf = get_conf_stanzas("web")?;
    let host_port = web_conf
        .get("settings")
        .and_then(|stanza| stanza.get("mgmtHostPort"))
        .ok_or_else(|| {
            SolnLibError::Config("web.conf is missing [settings] mgmtHostPort".to_string())
        })?;
    let (host, port) = host_port.split_once(':').ok_or_else(|| {
        SolnLibError::Config(format!("malformed mgmtHostPort: {host_port}"))
    })?;
    let port: u16 = port
        .trim()
        .parse()
        .map_err(|_| SolnLibError::Config(format!("malformed mgmtHostPort: {host_port}")))?;

    let host = match env::var("SPLUNK_BINDIP") {
        Ok(bindip) => strip_bind_port(&bindip).to_string(),
        Err(_) => host.to_string(),
    };

    Ok(SplunkdInfo {
        scheme: scheme.to_string(),
        host,
        port,
    })
}

/// Splunkd management URI, `$SPLUNKD_URI` when set.
pub fn get_splunkd_uri() -> Result<String> {
    if let Ok(uri) = env::var("SPLUNKD_URI") {
        if !uri.is_empty() {
            return Ok(uri);
        }
    }

    let info = get_splunkd_server_info()?;
    Ok(format!("{}://{}:{}", info.scheme, info.host, info.port))
}

/// Resolve a configuration domain through `btool`.
///
/// Runs `$SPLUNK_HOME/bin/btool <conf> list` (a trailing `.conf` on the
/// name is accepted) and returns the parsed stanzas as
/// `{stanza_name: {key: value}}`. Key case is preserved.
pub fn get_conf_stanzas(conf_name: &str) -> Result<HashMap<String, HashMap<String, String>>> {
    let conf_name = conf_name.strip_suffix(".conf").unwrap_or(conf_name);
    let btool_bin = if cfg!(windows) { "btool.exe" } else { "btool" };
    let btool_path = splunk_home()?.join("bin").join(btool_bin);

    tracing::debug!("Resolving {conf_name}.conf via: {}", btool_path.display());
    let output = Command::new(&btool_path)
        .arg(conf_name)
        .arg("list")
        .output()
        .map_err(|e| {
            SolnLibError::Config(format!(
                "failed to execute btool at {}: {e}",
                btool_path.display()
            ))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SolnLibError::Config(format!(
            "btool {conf_name} list failed: {}",
            stderr.trim()
        )));
    }

    let stdout = String::from_utf8(output.stdout)?;
    Ok(parse_conf_stanzas(&stdout))
}

fn splunk_home() -> Result<PathBuf> {
    env::var_os("SPLUNK_HOME")
        .map(PathBuf::from)
        .ok_or_else(|| {
            SolnLibError::Config("SPLUNK_HOME is not set in the environment".to_string())
        })
}

/// Shared storage root when search head pooling is enabled.
///
/// An unreadable `server.conf` is treated as pooling off rather than an
/// error, so path construction keeps working outside a full install.
fn shared_storage_root() -> Option<PathBuf> {
    let server_conf = match get_conf_stanzas("server") {
        Ok(conf) => conf,
        Err(e) => {
            tracing::debug!("server.conf unavailable, assuming pooling disabled: {e}");
            return None;
        }
    };

    let pooling = server_conf.get("pooling")?;
    let state = pooling.get("state").map(String::as_str).unwrap_or("disabled");
    let storage = pooling.get("storage")?;
    (state == "enabled" && !storage.is_empty()).then(|| PathBuf::from(storage))
}

/// `$SPLUNK_BINDIP` may carry a port suffix; the host part wins.
fn strip_bind_port(bindip: &str) -> &str {
    match bindip.rfind(':') {
        Some(idx) if idx > 0 => &bindip[..idx],
        _ => bindip,
    }
}

/// Lexically normalize `.` and `..` components without touching the
/// filesystem.
fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(Component::ParentDir),
            },
            other => normalized.push(other),
        }
    }
    normalized
}

fn parse_conf_stanzas(text: &str) -> HashMap<String, HashMap<String, String>> {
    let mut stanzas: HashMap<String, HashMap<String, String>> = HashMap::new();
    let mut current: Option<String> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(name) = line
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        {
            stanzas.entry(name.to_string()).or_default();
            current = Some(name.to_string());
            continue;
        }

        if let (Some(stanza), Some((key, value))) = (&current, line.split_once('=')) {
            if let Some(map) = stanzas.get_mut(stanza) {
                map.insert(key.trim().to_string(), value.trim().to_string());
            }
        }
    }

    stanzas
}
