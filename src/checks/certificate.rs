//! Certificate parsing
//!
//! Turns DER certificates into [`CertificateDetails`] using x509-parser.

use crate::models::CertificateDetails;
use crate::utils::CertificateError;
use chrono::{DateTime, TimeZone, Utc};
use sha2::Digest;
use std::collections::BTreeMap;
use x509_parser::extensions::{GeneralName, ParsedExtension};
use x509_parser::objects::{oid2abbrev, oid2sn, oid_registry};
use x509_parser::prelude::*;

/// Certificate parser
pub struct CertificateChecker;

impl CertificateChecker {
    pub fn new() -> Self {
        Self
    }

    /// Parse a single DER-encoded certificate
    pub fn parse_details(&self, der: &[u8]) -> Result<CertificateDetails, CertificateError> {
        let (_, cert) =
            X509Certificate::from_der(der).map_err(|e| CertificateError::ParseError {
                message: format!("Failed to parse certificate: {:?}", e),
            })?;

        let not_before = asn1_time_to_datetime(cert.validity().not_before)?;
        let not_after = asn1_time_to_datetime(cert.validity().not_after)?;

        let signature_algorithm = oid2sn(&cert.signature_algorithm.algorithm, oid_registry())
            .map(str::to_string)
            .unwrap_or_else(|_| cert.signature_algorithm.algorithm.to_id_string());

        Ok(CertificateDetails {
            subject: name_components(cert.subject()),
            issuer: name_components(cert.issuer()),
            // Raw 0-based field, v3 is 2
            version: cert.version().0,
            serial_number: cert.serial.to_string(),
            not_before: format_time(&not_before),
            not_after: format_time(&not_after),
            signature_algorithm,
            extensions: self.extract_extensions(&cert),
            fingerprint: fingerprint(der),
        })
    }

    /// Parse every certificate of a chain, in order
    pub fn parse_all(&self, chain: &[Vec<u8>]) -> Result<Vec<CertificateDetails>, CertificateError> {
        chain.iter().map(|der| self.parse_details(der)).collect()
    }

    fn extract_extensions(&self, cert: &X509Certificate) -> BTreeMap<String, String> {
        let mut extensions = BTreeMap::new();

        for ext in cert.extensions() {
            let name = oid2sn(&ext.oid, oid_registry())
                .map(str::to_string)
                .unwrap_or_else(|_| ext.oid.to_id_string());
            let value = render_extension(ext.parsed_extension())
                .unwrap_or_else(|| hex_colon(ext.value));
            extensions.insert(name, value);
        }

        extensions
    }
}

impl Default for CertificateChecker {
    fn default() -> Self {
        Self::new()
    }
}

/// Collect RDN attributes keyed by their short name
fn name_components(name: &X509Name) -> BTreeMap<String, String> {
    let mut components = BTreeMap::new();
    for attr in name.iter_attributes() {
        let key = oid2abbrev(attr.attr_type(), oid_registry())
            .map(str::to_string)
            .unwrap_or_else(|_| attr.attr_type().to_id_string());
        let value = attr
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|_| hex_colon(attr.attr_value().data));
        components.insert(key, value);
    }
    components
}

/// Text rendering of the extensions we know how to describe
fn render_extension(parsed: &ParsedExtension) -> Option<String> {
    let text = match parsed {
        ParsedExtension::BasicConstraints(bc) => {
            let mut s = format!("CA:{}", if bc.ca { "TRUE" } else { "FALSE" });
            if let Some(len) = bc.path_len_constraint {
                s.push_str(&format!(", pathlen:{}", len));
            }
            s
        }
        ParsedExtension::KeyUsage(ku) => key_usage_names(ku).join(", "),
        ParsedExtension::ExtendedKeyUsage(eku) => extended_key_usage_names(eku).join(", "),
        ParsedExtension::SubjectAlternativeName(san) => san
            .general_names
            .iter()
            .map(render_general_name)
            .collect::<Vec<_>>()
            .join(", "),
        ParsedExtension::SubjectKeyIdentifier(ki) => hex_colon(ki.0),
        ParsedExtension::AuthorityKeyIdentifier(aki) => match &aki.key_identifier {
            Some(ki) => format!("keyid:{}", hex_colon(ki.0)),
            None => return None,
        },
        _ => return None,
    };
    Some(text)
}

fn render_general_name(name: &GeneralName) -> String {
    match name {
        GeneralName::DNSName(dns) => format!("DNS:{}", dns),
        GeneralName::RFC822Name(email) => format!("email:{}", email),
        GeneralName::URI(uri) => format!("URI:{}", uri),
        GeneralName::IPAddress(ip) => {
            if ip.len() == 4 {
                format!("IP Address:{}.{}.{}.{}", ip[0], ip[1], ip[2], ip[3])
            } else if ip.len() == 16 {
                let parts: Vec<String> = ip
                    .chunks(2)
                    .map(|c| format!("{:x}", u16::from_be_bytes([c[0], c[1]])))
                    .collect();
                format!("IP Address:{}", parts.join(":"))
            } else {
                format!("IP Address:{}", hex_colon(ip))
            }
        }
        other => format!("{:?}", other),
    }
}

fn key_usage_names(ku: &KeyUsage) -> Vec<&'static str> {
    let mut usages = Vec::new();
    if ku.digital_signature() {
        usages.push("Digital Signature");
    }
    if ku.non_repudiation() {
        usages.push("Non Repudiation");
    }
    if ku.key_encipherment() {
        usages.push("Key Encipherment");
    }
    if ku.data_encipherment() {
        usages.push("Data Encipherment");
    }
    if ku.key_agreement() {
        usages.push("Key Agreement");
    }
    if ku.key_cert_sign() {
        usages.push("Certificate Sign");
    }
    if ku.crl_sign() {
        usages.push("CRL Sign");
    }
    usages
}

fn extended_key_usage_names(eku: &ExtendedKeyUsage) -> Vec<String> {
    let mut usages: Vec<String> = Vec::new();
    if eku.server_auth {
        usages.push("TLS Web Server Authentication".into());
    }
    if eku.client_auth {
        usages.push("TLS Web Client Authentication".into());
    }
    if eku.code_signing {
        usages.push("Code Signing".into());
    }
    if eku.email_protection {
        usages.push("E-mail Protection".into());
    }
    if eku.time_stamping {
        usages.push("Time Stamping".into());
    }
    if eku.ocsp_signing {
        usages.push("OCSP Signing".into());
    }
    usages.extend(eku.other.iter().map(|oid| oid.to_id_string()));
    usages
}

/// SHA-256 over the DER encoding
pub fn fingerprint(der: &[u8]) -> String {
    let mut hasher = sha2::Sha256::new();
    hasher.update(der);
    hex_colon(&hasher.finalize())
}

fn hex_colon(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(":")
}

fn format_time(time: &DateTime<Utc>) -> String {
    time.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Convert ASN.1 time to chrono DateTime
fn asn1_time_to_datetime(time: ASN1Time) -> Result<DateTime<Utc>, CertificateError> {
    let timestamp = time.timestamp();
    Utc.timestamp_opt(timestamp, 0)
        .single()
        .ok_or_else(|| CertificateError::ParseError {
            message: "Invalid timestamp in certificate".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcgen::{BasicConstraints, CertificateParams, DnType, IsCa, KeyPair};

    fn ca_der() -> Vec<u8> {
        let mut params = CertificateParams::new(vec!["ca.example.test".to_string()]).unwrap();
        params.distinguished_name.push(DnType::CommonName, "Example Root");
        params.distinguished_name.push(DnType::OrganizationName, "Example Org");
        params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        let key = KeyPair::generate().unwrap();
        params.self_signed(&key).unwrap().der().to_vec()
    }

    #[test]
    fn test_parse_details() {
        let der = ca_der();
        let details = CertificateChecker::new().parse_details(&der).unwrap();

        assert_eq!(details.subject.get("CN").map(String::as_str), Some("Example Root"));
        assert_eq!(details.subject.get("O").map(String::as_str), Some("Example Org"));
        assert_eq!(details.subject, details.issuer);
        assert_eq!(details.version, 2);
        assert!(details.not_before.ends_with(" UTC"));
        assert_eq!(details.signature_algorithm, "ecdsa-with-SHA256");
        assert_eq!(
            details.extensions.get("basicConstraints").map(String::as_str),
            Some("CA:TRUE")
        );
        assert_eq!(
            details.extensions.get("subjectAltName").map(String::as_str),
            Some("DNS:ca.example.test")
        );
        // 32 bytes rendered as XX separated by colons
        assert_eq!(details.fingerprint.len(), 32 * 3 - 1);
        assert_eq!(details.fingerprint, fingerprint(&der));
    }

    #[test]
    fn test_parse_garbage() {
        let err = CertificateChecker::new().parse_details(&[0x30, 0x82, 0x01]);
        assert!(matches!(err, Err(CertificateError::ParseError { .. })));
    }
}
