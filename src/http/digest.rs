use md5::{Digest, Md5};

use crate::utils::errors::{Result, SolnLibError};

/// Parsed `WWW-Authenticate: Digest` challenge.
#[derive(Debug, Clone)]
pub(crate) struct DigestChallenge {
    realm: String,
    nonce: String,
    qop: Option<String>,
    opaque: Option<String>,
    algorithm: Algorithm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Algorithm {
    Md5,
    Md5Sess,
}

impl DigestChallenge {
    /// Parse a challenge header value, e.g.
    /// `Digest realm="splunk", nonce="abc", qop="auth"`.
    pub(crate) fn parse(header: &str) -> Result<Self> {
        let header = header.trim();
        let params = header
            .strip_prefix("Digest ")
            .or_else(|| header.strip_prefix("digest "))
            .ok_or_else(|| SolnLibError::Auth("not a digest challenge".to_string()))?;

        let mut realm = None;
        let mut nonce = None;
        let mut qop = None;
        let mut opaque = None;
        let mut algorithm = Algorithm::Md5;

        for (key, value) in parse_params(params) {
            match key.as_str() {
                "realm" => realm = Some(value),
                "nonce" => nonce = Some(value),
                "qop" => qop = Some(value),
                "opaque" => opaque = Some(value),
                "algorithm" => {
                    algorithm = match value.to_ascii_uppercase().as_str() {
                        "MD5" => Algorithm::Md5,
                        "MD5-SESS" => Algorithm::Md5Sess,
                        other => {
                            return Err(SolnLibError::Auth(format!(
                                "unsupported digest algorithm: {other}"
                            )))
                        }
                    }
                }
                _ => {}
            }
        }

        // qop is a list; we only speak "auth".
        let qop = match qop {
            Some(list) => {
                if list.split(',').any(|q| q.trim() == "auth") {
                    Some("auth".to_string())
                } else {
                    return Err(SolnLibError::Auth(format!(
                        "unsupported digest qop: {list}"
                    )));
                }
            }
            None => None,
        };

        Ok(Self {
            realm: realm
                .ok_or_else(|| SolnLibError::Auth("digest challenge missing realm".to_string()))?,
            nonce: nonce
                .ok_or_else(|| SolnLibError::Auth("digest challenge missing nonce".to_string()))?,
            qop,
            opaque,
            algorithm,
        })
    }

    /// Compute the `Authorization` header value answering this challenge.
    pub(crate) fn respond(
        &self,
        user: &str,
        password: &str,
        method: &str,
        uri: &str,
        cnonce: &str,
        nc: u32,
    ) -> String {
        let mut ha1 = md5_hex(&format!("{user}:{}:{password}", self.realm));
        if self.algorithm == Algorithm::Md5Sess {
            ha1 = md5_hex(&format!("{ha1}:{}:{cnonce}", self.nonce));
        }
        let ha2 = md5_hex(&format!("{method}:{uri}"));

        let response = match &self.qop {
            Some(qop) => md5_hex(&format!(
                "{ha1}:{}:{nc:08x}:{cnonce}:{qop}:{ha2}",
                self.nonce
            )),
            None => md5_hex(&format!("{ha1}:{}:{ha2}", self.nonce)),
        };

        let mut header = format!(
            "Digest username=\"{user}\", realm=\"{}\", nonce=\"{}\", uri=\"{uri}\", response=\"{response}\"",
            self.realm, self.nonce
        );
        if let Some(qop) = &self.qop {
            header.push_str(&format!(", qop={qop}, nc={nc:08x}, cnonce=\"{cnonce}\""));
        }
        if let Some(opaque) = &self.opaque {
            header.push_str(&format!(", opaque=\"{opaque}\""));
        }
        if self.algorithm == Algorithm::Md5Sess {
            header.push_str(", algorithm=MD5-sess");
        }
        header
    }
}

/// Answer a digest challenge with a fresh client nonce.
pub(crate) fn answer_challenge(
    header: &str,
    user: &str,
    password: &str,
    method: &str,
    uri: &str,
) -> Result<String> {
    let challenge = DigestChallenge::parse(header)?;
    let cnonce = hex::encode(rand::random::<[u8; 16]>());
    Ok(challenge.respond(user, password, method, uri, &cnonce, 1))
}

/// Split a challenge parameter list into key/value pairs.
///
/// Values are either quoted strings or bare tokens; quoted values may
/// contain commas (`qop="auth,auth-int"`).
fn parse_params(mut input: &str) -> Vec<(String, String)> {
    let mut params = Vec::new();
    loop {
        input = input.trim_start_matches(|c: char| c == ',' || c.is_whitespace());
        if input.is_empty() {
            break;
        }
        let Some(eq) = input.find('=') else { break };
        let key = input[..eq].trim().to_ascii_lowercase();
        input = &input[eq + 1..];

        let value = if let Some(quoted) = input.strip_prefix('"') {
            let Some(end) = quoted.find('"') else { break };
            let value = quoted[..end].to_string();
            input = &quoted[end + 1..];
            value
        } else {
            let end = input.find(',').unwrap_or(input.len());
            let value = input[..end].trim().to_string();
            input = &input[end..];
            value
        };

        params.push((key, value));
    }
    params
}

fn md5_hex(data: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(data.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RFC2617_CHALLENGE: &str = "Digest realm=\"testrealm@host.com\", \
        qop=\"auth,auth-int\", nonce=\"dcd98b7102dd2f0e8b11d0f600bfb0c093\", \
        opaque=\"5ccc069c403ebaf9f0171e9517f40e41\"";

    #[test]
    fn test_parse_challenge() {
        let challenge = DigestChallenge::parse(RFC2617_CHALLENGE).unwrap();
        assert_eq!(challenge.realm, "testrealm@host.com");
        assert_eq!(challenge.nonce, "dcd98b7102dd2f0e8b11d0f600bfb0c093");
        assert_eq!(challenge.qop.as_deref(), Some("auth"));
        assert_eq!(
            challenge.opaque.as_deref(),
            Some("5ccc069c403ebaf9f0171e9517f40e41")
        );
        assert_eq!(challenge.algorithm, Algorithm::Md5);
    }

    #[test]
    fn test_rfc2617_response_vector() {
        let challenge = DigestChallenge::parse(RFC2617_CHALLENGE).unwrap();
        let header = challenge.respond(
            "Mufasa",
            "Circle Of Life",
            "GET",
            "/dir/index.html",
            "0a4f113b",
            1,
        );
        assert!(
            header.contains("response=\"6629fae49393a05397450978507c4ef1\""),
            "unexpected header: {header}"
        );
        assert!(header.contains("username=\"Mufasa\""));
        assert!(header.contains("qop=auth, nc=00000001, cnonce=\"0a4f113b\""));
        assert!(header.contains("opaque=\"5ccc069c403ebaf9f0171e9517f40e41\""));
    }

    #[test]
    fn test_response_without_qop() {
        let challenge =
            DigestChallenge::parse("Digest realm=\"splunk\", nonce=\"abc123\"").unwrap();
        let header = challenge.respond("admin", "changeme", "GET", "/services", "ffff", 1);
        assert!(header.contains("nonce=\"abc123\""));
        assert!(!header.contains("qop="));
        assert!(!header.contains("cnonce="));
    }

    #[test]
    fn test_rejects_non_digest_scheme() {
        assert!(matches!(
            DigestChallenge::parse("Basic realm=\"splunk\""),
            Err(SolnLibError::Auth(_))
        ));
    }

    #[test]
    fn test_rejects_unsupported_algorithm() {
        assert!(matches!(
            DigestChallenge::parse(
                "Digest realm=\"r\", nonce=\"n\", algorithm=SHA-256"
            ),
            Err(SolnLibError::Auth(_))
        ));
    }

    #[test]
    fn test_rejects_missing_nonce() {
        assert!(matches!(
            DigestChallenge::parse("Digest realm=\"r\""),
            Err(SolnLibError::Auth(_))
        ));
    }

    #[test]
    fn test_md5_sess_changes_response() {
        let md5 = DigestChallenge::parse("Digest realm=\"r\", nonce=\"n\", qop=\"auth\"").unwrap();
        let sess = DigestChallenge::parse(
            "Digest realm=\"r\", nonce=\"n\", qop=\"auth\", algorithm=MD5-sess",
        )
        .unwrap();
        let a = md5.respond("u", "p", "GET", "/", "c", 1);
        let b = sess.respond("u", "p", "GET", "/", "c", 1);
        assert_ne!(a, b);
        assert!(b.contains("algorithm=MD5-sess"));
    }
}
