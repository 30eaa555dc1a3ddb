use ingest_relay::{
    compute_signature, verify_relay_request, verify_signature, Signer, VerificationError,
    SIGNATURE_HEADER, TIMESTAMP_HEADER,
};

const SECRET: &[u8] = b"supersecret";
const BODY: &[u8] = br#"{"event":"click"}"#;

#[test]
fn test_signature_roundtrip() {
    let signature = compute_signature(SECRET, BODY, "1700000000");
    assert_eq!(signature.len(), 64);
    assert!(verify_signature(SECRET, BODY, "1700000000", &signature));
    assert!(!verify_signature(SECRET, BODY, "1700000001", &signature));
    assert!(!verify_signature(SECRET, br#"{"event":"other"}"#, "1700000000", &signature));
    assert!(!verify_signature(SECRET, BODY, "1700000000", "not-hex"));
}

#[test]
fn test_signer_headers() {
    let headers = Signer::new(SECRET).sign_at(BODY, 1_700_000_000);

    assert_eq!(headers.signature.0, SIGNATURE_HEADER);
    assert_eq!(headers.timestamp, (TIMESTAMP_HEADER.to_string(), "1700000000".to_string()));
    assert_eq!(headers.signature.1, compute_signature(SECRET, BODY, "1700000000"));
}

#[test]
fn test_signer_debug_hides_secret() {
    let rendered = format!("{:?}", Signer::new(SECRET));
    assert!(!rendered.contains("supersecret"));
}

#[test]
fn test_verify_relay_request() {
    let headers = Signer::new(SECRET).sign_at(BODY, 1_700_000_000);
    let pairs = [
        ("x-relay-signature", headers.signature.1.as_str()),
        ("X-RELAY-TIMESTAMP", headers.timestamp.1.as_str()),
    ];

    assert_eq!(verify_relay_request(pairs, BODY, SECRET, 300, 1_700_000_200), Ok(()));
    assert_eq!(
        verify_relay_request(pairs, BODY, SECRET, 300, 1_700_000_301),
        Err(VerificationError::StaleTimestamp)
    );
    assert_eq!(
        verify_relay_request(pairs, BODY, SECRET, 300, 1_699_999_999),
        Err(VerificationError::StaleTimestamp)
    );
    assert_eq!(
        verify_relay_request(pairs, b"tampered", SECRET, 300, 1_700_000_000),
        Err(VerificationError::InvalidSignature)
    );
}

#[test]
fn test_verify_relay_request_missing_headers() {
    assert_eq!(
        verify_relay_request([("X-Relay-Timestamp", "1700000000")], BODY, SECRET, 300, 1_700_000_000),
        Err(VerificationError::MissingSignature)
    );
    assert_eq!(
        verify_relay_request([("X-Relay-Signature", "ab")], BODY, SECRET, 300, 1_700_000_000),
        Err(VerificationError::MissingTimestamp)
    );
    assert_eq!(
        verify_relay_request(
            [("X-Relay-Signature", "ab"), ("X-Relay-Timestamp", "yesterday")],
            BODY,
            SECRET,
            300,
            1_700_000_000,
        ),
        Err(VerificationError::InvalidTimestamp)
    );
}

#[test]
fn test_signer_output_verifies_as_is() {
    let headers = Signer::new(SECRET).sign_at(BODY, 100);
    let pairs = [
        (headers.signature.0.as_str(), headers.signature.1.as_str()),
        (headers.timestamp.0.as_str(), headers.timestamp.1.as_str()),
    ];

    assert_eq!(verify_relay_request(pairs, BODY, SECRET, 300, 100), Ok(()));
    assert_eq!(
        verify_relay_request(pairs, BODY, b"s", 300, 100),
        Err(VerificationError::InvalidSignature)
    );
}
