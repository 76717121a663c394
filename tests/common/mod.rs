//! Shared fixtures: a throwaway PKI and a local TLS server

#![allow(dead_code)]

use rcgen::{
    BasicConstraints, CertificateParams, DnType, ExtendedKeyUsagePurpose, IsCa, KeyPair,
};
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use rustls::server::WebPkiClientVerifier;
use rustls::{RootCertStore, ServerConfig};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const HOST: &str = "127.0.0.1";

/// A certificate with its key
pub struct Issued {
    pub cert: rcgen::Certificate,
    pub key: KeyPair,
}

impl Issued {
    pub fn pem(&self) -> String {
        self.cert.pem()
    }

    pub fn der(&self) -> CertificateDer<'static> {
        self.cert.der().clone()
    }
}

pub fn install_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// Self-signed CA
pub fn ca(name: &str) -> Issued {
    let mut params = CertificateParams::new(Vec::<String>::new()).unwrap();
    params.distinguished_name.push(DnType::CommonName, name);
    params.distinguished_name.push(DnType::OrganizationName, "Trust Tests");
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    let key = KeyPair::generate().unwrap();
    let cert = params.self_signed(&key).unwrap();
    Issued { cert, key }
}

/// Intermediate CA signed by `issuer`
pub fn intermediate(name: &str, issuer: &Issued) -> Issued {
    let mut params = CertificateParams::new(Vec::<String>::new()).unwrap();
    params.distinguished_name.push(DnType::CommonName, name);
    params.is_ca = IsCa::Ca(BasicConstraints::Constrained(0));
    let key = KeyPair::generate().unwrap();
    let cert = params.signed_by(&key, &issuer.cert, &issuer.key).unwrap();
    Issued { cert, key }
}

/// Leaf for `localhost` / 127.0.0.1 with the given purpose
pub fn leaf(name: &str, purpose: ExtendedKeyUsagePurpose, issuer: &Issued) -> Issued {
    let mut params =
        CertificateParams::new(vec!["localhost".to_string(), HOST.to_string()]).unwrap();
    params.distinguished_name.push(DnType::CommonName, name);
    params.extended_key_usages = vec![purpose];
    let key = KeyPair::generate().unwrap();
    let cert = params.signed_by(&key, &issuer.cert, &issuer.key).unwrap();
    Issued { cert, key }
}

pub fn server_leaf(issuer: &Issued) -> Issued {
    leaf("localhost", ExtendedKeyUsagePurpose::ServerAuth, issuer)
}

pub fn client_leaf(issuer: &Issued) -> Issued {
    leaf("client.test", ExtendedKeyUsagePurpose::ClientAuth, issuer)
}

pub fn write(path: &Path, contents: &str) -> PathBuf {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
    path.to_path_buf()
}

/// Write a client certificate and key pair, returning their paths
pub fn write_client(dir: &Path, client: &Issued) -> (PathBuf, PathBuf) {
    let cert = write(&dir.join("client.crt"), &client.pem());
    let key = write(&dir.join("client.key"), &client.key.serialize_pem());
    (cert, key)
}

/// Client certificate policy of the test server
pub enum ClientAuth<'a> {
    None,
    /// Accept certificates from this CA, but do not require one
    Optional(&'a Issued),
    /// Reject any handshake without a certificate from this CA
    Required(&'a Issued),
}

/// Start a TLS server on an ephemeral port that answers `200 OK`.
///
/// The server presents `chain` (leaf first) and accepts client certificates
/// issued by `client_ca`, if given, without requiring one.
pub async fn spawn_tls_server(
    chain: Vec<CertificateDer<'static>>,
    key: &KeyPair,
    client_ca: Option<&Issued>,
    body: &'static str,
) -> SocketAddr {
    let auth = match client_ca {
        Some(ca) => ClientAuth::Optional(ca),
        None => ClientAuth::None,
    };
    spawn_https_server(chain, key, auth, "200 OK", body).await
}

/// Start a TLS server giving every request the same HTTP/1.1 response
pub async fn spawn_https_server(
    chain: Vec<CertificateDer<'static>>,
    key: &KeyPair,
    auth: ClientAuth<'_>,
    status: &'static str,
    body: &'static str,
) -> SocketAddr {
    install_provider();

    let builder = ServerConfig::builder();
    let builder = match auth {
        ClientAuth::None => builder.with_no_client_auth(),
        ClientAuth::Optional(ca) => {
            let verifier = WebPkiClientVerifier::builder(Arc::new(roots_of(ca)))
                .allow_unauthenticated()
                .build()
                .unwrap();
            builder.with_client_cert_verifier(verifier)
        }
        ClientAuth::Required(ca) => {
            let verifier = WebPkiClientVerifier::builder(Arc::new(roots_of(ca)))
                .build()
                .unwrap();
            builder.with_client_cert_verifier(verifier)
        }
    };
    let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key.serialize_der()));
    let config = builder.with_single_cert(chain, key).unwrap();
    let acceptor = tokio_rustls::TlsAcceptor::from(Arc::new(config));

    let listener = TcpListener::bind((HOST, 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            let acceptor = acceptor.clone();
            tokio::spawn(async move {
                let Ok(mut tls) = acceptor.accept(stream).await else {
                    return;
                };
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match tls.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = tls.write_all(response.as_bytes()).await;
                let _ = tls.shutdown().await;
            });
        }
    });

    addr
}

fn roots_of(ca: &Issued) -> RootCertStore {
    let mut roots = RootCertStore::empty();
    roots.add(ca.der()).unwrap();
    roots
}
