//! CLI argument definitions using clap

use clap::Parser;
use std::path::PathBuf;

/// Trust store validator command line
#[derive(Parser, Debug)]
#[command(name = "trust-validator")]
#[command(version)]
#[command(
    about = "Validate discovered trust stores against a TLS webserver and its mTLS endpoint",
    long_about = None
)]
pub struct Cli {
    /// Directory to scan for trust stores
    #[arg(short = 'd', long, value_name = "DIR")]
    pub scan_dir: PathBuf,

    /// Webserver host
    #[arg(long, default_value = "localhost")]
    pub host: String,

    /// Webserver port
    #[arg(long, default_value = "443")]
    pub port: u16,

    /// Client certificate for the mTLS test
    #[arg(long, value_name = "FILE", default_value = "certs/client.crt")]
    pub client_cert: PathBuf,

    /// Client private key for the mTLS test
    #[arg(long, value_name = "FILE", default_value = "certs/client.key")]
    pub client_key: PathBuf,

    /// Write the JSON report to file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Settings file (TOML)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Keystore password to try before the built-in candidates (repeatable)
    #[arg(long = "keystore-password", value_name = "PASSWORD")]
    pub keystore_passwords: Vec<String>,

    /// Skip the mTLS test
    #[arg(long)]
    pub no_mtls: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// Certificate info server command line
#[derive(Parser, Debug)]
#[command(name = "cert-info-server")]
#[command(version)]
#[command(about = "Serve certificate chain details as JSON", long_about = None)]
pub struct ServerCli {
    /// Address to listen on
    #[arg(long, value_name = "ADDR", default_value = "0.0.0.0:5000")]
    pub bind: String,

    /// Settings file (TOML)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
