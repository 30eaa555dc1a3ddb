use std::time::{SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "X-Relay-Signature";
pub const TIMESTAMP_HEADER: &str = "X-Relay-Timestamp";

/// Headers to attach to one outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeaders {
    pub signature: (String, String),
    pub timestamp: (String, String),
}

/// Signs outbound event bodies with a shared secret.
///
/// Headers are always `X-Relay-Signature` and `X-Relay-Timestamp`, the
/// names `verify_relay_request` looks for.
#[derive(Clone)]
pub struct Signer {
    secret: Vec<u8>,
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl Signer {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Sign `body` as of now.
    pub fn sign(&self, body: &[u8]) -> SignatureHeaders {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        self.sign_at(body, now)
    }

    /// Sign `body` with an explicit unix timestamp.
    pub fn sign_at(&self, body: &[u8], timestamp_secs: u64) -> SignatureHeaders {
        let timestamp = timestamp_secs.to_string();
        let signature = compute_signature(&self.secret, body, &timestamp);

        SignatureHeaders {
            signature: (SIGNATURE_HEADER.to_string(), signature),
            timestamp: (TIMESTAMP_HEADER.to_string(), timestamp),
        }
    }
}

fn mac_for(secret: &[u8]) -> HmacSha256 {
    // HMAC is defined for keys of any length.
    HmacSha256::new_from_slice(secret).expect("hmac accepts any key length")
}

/// Hex HMAC-SHA256 over `timestamp || body`.
pub fn compute_signature(secret: &[u8], body: &[u8], timestamp: &str) -> String {
    let mut mac = mac_for(secret);
    mac.update(timestamp.as_bytes());
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// Constant-time check of a hex signature.
pub fn verify_signature(secret: &[u8], body: &[u8], timestamp: &str, signature_hex: &str) -> bool {
    let Ok(signature) = hex::decode(signature_hex) else {
        return false;
    };

    let mut mac = mac_for(secret);
    mac.update(timestamp.as_bytes());
    mac.update(body);
    mac.verify_slice(&signature).is_ok()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    MissingSignature,
    MissingTimestamp,
    InvalidTimestamp,
    StaleTimestamp,
    InvalidSignature,
}

impl std::fmt::Display for VerificationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            VerificationError::MissingSignature => "signature header missing",
            VerificationError::MissingTimestamp => "timestamp header missing",
            VerificationError::InvalidTimestamp => "timestamp is not a unix time",
            VerificationError::StaleTimestamp => "timestamp outside the allowed window",
            VerificationError::InvalidSignature => "signature mismatch",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for VerificationError {}

/// Receiver-side check of a relayed request.
///
/// Header names are matched case-insensitively. The timestamp must be no
/// older than `max_age_secs` relative to `now_secs` and not in the future.
pub fn verify_relay_request<'a, I>(
    headers: I,
    body: &[u8],
    secret: &[u8],
    max_age_secs: u64,
    now_secs: u64,
) -> Result<(), VerificationError>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut signature = None;
    let mut timestamp = None;

    for (name, value) in headers {
        if name.eq_ignore_ascii_case(SIGNATURE_HEADER) {
            signature = Some(value);
        } else if name.eq_ignore_ascii_case(TIMESTAMP_HEADER) {
            timestamp = Some(value);
        }
    }

    let signature = signature.ok_or(VerificationError::MissingSignature)?;
    let timestamp = timestamp.ok_or(VerificationError::MissingTimestamp)?;
    let timestamp_secs = timestamp
        .parse::<u64>()
        .map_err(|_| VerificationError::InvalidTimestamp)?;

    if timestamp_secs > now_secs || now_secs - timestamp_secs > max_age_secs {
        return Err(VerificationError::StaleTimestamp);
    }

    if verify_signature(secret, body, timestamp, signature) {
        Ok(())
    } else {
        Err(VerificationError::InvalidSignature)
    }
}
