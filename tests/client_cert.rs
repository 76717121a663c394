use trust_chain_validator::cert_ops::{ensure_client_certificate, ClientCertStatus};
use x509_parser::pem::parse_x509_pem;

#[test]
fn test_generates_then_leaves_existing_files() {
    let dir = tempfile::tempdir().unwrap();
    let cert_path = dir.path().join("certs").join("client.crt");
    let key_path = dir.path().join("certs").join("client.key");

    let status = ensure_client_certificate(&cert_path, &key_path).unwrap();
    assert_eq!(status, ClientCertStatus::Generated);

    let cert_bytes = std::fs::read(&cert_path).unwrap();
    let key_bytes = std::fs::read(&key_path).unwrap();
    assert!(String::from_utf8_lossy(&key_bytes).contains("BEGIN PRIVATE KEY"));

    let status = ensure_client_certificate(&cert_path, &key_path).unwrap();
    assert_eq!(status, ClientCertStatus::Existing);
    assert_eq!(std::fs::read(&cert_path).unwrap(), cert_bytes);
    assert_eq!(std::fs::read(&key_path).unwrap(), key_bytes);
}

#[test]
fn test_generated_certificate_fields() {
    let dir = tempfile::tempdir().unwrap();
    let cert_path = dir.path().join("client.crt");
    let key_path = dir.path().join("client.key");
    ensure_client_certificate(&cert_path, &key_path).unwrap();

    let pem_text = std::fs::read(&cert_path).unwrap();
    let (_, pem) = parse_x509_pem(&pem_text).unwrap();
    let cert = pem.parse_x509().unwrap();

    let subject = cert.subject().to_string();
    assert!(subject.contains("CN=client.test"));
    assert!(subject.contains("O=Test Client"));
    assert!(subject.contains("OU=Testing"));
    assert_eq!(cert.subject(), cert.issuer());
    assert_eq!(cert.serial.to_string(), "1000");
    assert_eq!(
        cert.signature_algorithm.algorithm,
        x509_parser::oid_registry::OID_PKCS1_SHA256WITHRSA
    );

    let validity = cert.validity();
    let days = (validity.not_after.timestamp() - validity.not_before.timestamp()) / 86_400;
    assert_eq!(days, 3650);
}

#[test]
fn test_missing_key_regenerates_both() {
    let dir = tempfile::tempdir().unwrap();
    let cert_path = dir.path().join("client.crt");
    let key_path = dir.path().join("client.key");
    std::fs::write(&cert_path, "stale").unwrap();

    let status = ensure_client_certificate(&cert_path, &key_path).unwrap();
    assert_eq!(status, ClientCertStatus::Generated);
    assert_ne!(std::fs::read_to_string(&cert_path).unwrap(), "stale");
    assert!(key_path.exists());
}
