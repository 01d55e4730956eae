//! LPA activation payload codec.
//!
//! Real devices scan the payload as `LPA:1$<server-host>$<activation-code>`;
//! the format must be reproduced byte-for-byte for activation to work.

use thiserror::Error;

const SCHEME: &str = "LPA";
const VERSION: &str = "1";

#[derive(Error, Debug, PartialEq)]
pub enum LpaError {
    #[error("not an LPA payload: {0}")]
    BadScheme(String),
    #[error("unsupported LPA version: {0}")]
    BadVersion(String),
    #[error("malformed LPA payload: expected 3 '$'-separated fields, got {0}")]
    BadFieldCount(usize),
    #[error("empty {0} field")]
    EmptyField(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LpaActivation {
    pub host: String,
    pub code: String,
}

/// Builds the QR payload for an activation code hosted at `host`.
pub fn encode(host: &str, code: &str) -> String {
    format!("{SCHEME}:{VERSION}${host}${code}")
}

/// Parses a payload produced by [`encode`] (or a carrier's QR code).
pub fn parse(payload: &str) -> Result<LpaActivation, LpaError> {
    let parts: Vec<&str> = payload.split('$').collect();
    if parts.len() != 3 {
        return Err(LpaError::BadFieldCount(parts.len()));
    }

    let (scheme, version) = parts[0]
        .split_once(':')
        .ok_or_else(|| LpaError::BadScheme(parts[0].to_string()))?;
    if scheme != SCHEME {
        return Err(LpaError::BadScheme(scheme.to_string()));
    }
    if version != VERSION {
        return Err(LpaError::BadVersion(version.to_string()));
    }
    if parts[1].is_empty() {
        return Err(LpaError::EmptyField("host"));
    }
    if parts[2].is_empty() {
        return Err(LpaError::EmptyField("code"));
    }

    Ok(LpaActivation {
        host: parts[1].to_string(),
        code: parts[2].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_is_byte_exact() {
        assert_eq!(
            encode("rsp.truphone.com", "K2-1X9P7-ABCDE"),
            "LPA:1$rsp.truphone.com$K2-1X9P7-ABCDE"
        );
    }

    #[test]
    fn round_trip_preserves_code() {
        let payload = encode("smdp.example.org", "CODE-42");
        let parsed = parse(&payload).unwrap();
        assert_eq!(parsed.host, "smdp.example.org");
        assert_eq!(parsed.code, "CODE-42");
    }

    #[test]
    fn rejects_malformed_payloads() {
        assert_eq!(parse("LPA:1$only-host"), Err(LpaError::BadFieldCount(2)));
        assert_eq!(
            parse("QR:1$host$code"),
            Err(LpaError::BadScheme("QR".to_string()))
        );
        assert_eq!(
            parse("LPA:2$host$code"),
            Err(LpaError::BadVersion("2".to_string()))
        );
        assert_eq!(parse("LPA:1$$code"), Err(LpaError::EmptyField("host")));
        assert_eq!(parse("LPA:1$host$"), Err(LpaError::EmptyField("code")));
    }
}
