//! Self-signed client certificate generation for mTLS testing

use crate::utils::ClientCertError;
use rcgen::{CertificateParams, DistinguishedName, DnType, KeyPair, SerialNumber};
use rsa::pkcs1::LineEnding;
use rsa::pkcs8::EncodePrivateKey;
use rsa::RsaPrivateKey;
use std::path::Path;
use time::{Duration, OffsetDateTime};

/// RSA modulus size of generated client keys
pub const CLIENT_KEY_BITS: usize = 2048;
/// Validity of generated client certificates
pub const CLIENT_CERT_VALIDITY_DAYS: i64 = 10 * 365;
/// Serial number of generated client certificates
pub const CLIENT_CERT_SERIAL: u64 = 1000;

/// What `ensure_client_certificate` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCertStatus {
    /// Both files were already present and left untouched
    Existing,
    /// A new key pair and certificate were written
    Generated,
}

/// Make sure a client certificate and key exist at the given paths.
///
/// When both files exist nothing is written. Otherwise a fresh RSA key and a
/// self-signed SHA-256 certificate replace whatever is there.
pub fn ensure_client_certificate(
    cert_path: &Path,
    key_path: &Path,
) -> Result<ClientCertStatus, ClientCertError> {
    if cert_path.exists() && key_path.exists() {
        tracing::debug!("Client certificate already exists at {}", cert_path.display());
        return Ok(ClientCertStatus::Existing);
    }

    for path in [cert_path, key_path] {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ClientCertError::WriteError {
                path: parent.display().to_string(),
                message: e.to_string(),
            })?;
        }
    }

    let (cert_pem, key_pem) = generate_self_signed()?;

    write_file(cert_path, &cert_pem)?;
    write_file(key_path, &key_pem)?;

    tracing::info!("Generated client certificate and key at {}", cert_path.display());
    Ok(ClientCertStatus::Generated)
}

/// Generate a PEM certificate and PKCS#8 PEM key
fn generate_self_signed() -> Result<(String, String), ClientCertError> {
    let mut rng = rand::rngs::OsRng;
    let private_key = RsaPrivateKey::new(&mut rng, CLIENT_KEY_BITS).map_err(|e| {
        ClientCertError::KeyGeneration {
            message: e.to_string(),
        }
    })?;
    let key_pem = private_key
        .to_pkcs8_pem(LineEnding::LF)
        .map_err(|e| ClientCertError::KeyGeneration {
            message: e.to_string(),
        })?
        .as_str()
        .to_owned();

    let key_pair = KeyPair::from_pem_and_sign_algo(&key_pem, &rcgen::PKCS_RSA_SHA256).map_err(
        |e| ClientCertError::Signing {
            message: e.to_string(),
        },
    )?;

    let mut params = CertificateParams::default();
    params.distinguished_name = client_distinguished_name();
    params.serial_number = Some(SerialNumber::from(CLIENT_CERT_SERIAL));
    let now = OffsetDateTime::now_utc();
    params.not_before = now;
    params.not_after = now + Duration::days(CLIENT_CERT_VALIDITY_DAYS);

    let cert = params
        .self_signed(&key_pair)
        .map_err(|e| ClientCertError::Signing {
            message: e.to_string(),
        })?;

    Ok((cert.pem(), key_pem))
}

fn client_distinguished_name() -> DistinguishedName {
    let mut dn = DistinguishedName::new();
    dn.push(DnType::CountryName, "US");
    dn.push(DnType::StateOrProvinceName, "California");
    dn.push(DnType::LocalityName, "San Francisco");
    dn.push(DnType::OrganizationName, "Test Client");
    dn.push(DnType::OrganizationalUnitName, "Testing");
    dn.push(DnType::CommonName, "client.test");
    dn
}

fn write_file(path: &Path, contents: &str) -> Result<(), ClientCertError> {
    std::fs::write(path, contents).map_err(|e| ClientCertError::WriteError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
