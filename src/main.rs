//! Trust Validator - checks discovered trust stores against a TLS webserver
//!
//! Scans a directory for PEM bundles and Java keystores, then for each one
//! attempts a TLS handshake and an mTLS request against the target. Exits
//! non-zero if any test fails or no trust store is found.

use clap::Parser;
use console::style;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use trust_chain_validator::cert_ops::{ensure_client_certificate, ClientCertStatus};
use trust_chain_validator::output::{print_summary, report_event};
use trust_chain_validator::utils::progress::ProgressTracker;
use trust_chain_validator::{Cli, Settings, TrustChainValidator, ValidationConfig, ValidationEvent};

#[tokio::main]
async fn main() -> ExitCode {
    // Install the ring crypto provider for rustls
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    if cli.no_color {
        console::set_colors_enabled(false);
    }

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<bool> {
    let settings = Settings::load(cli.config.as_deref())?;

    if !cli.no_mtls {
        // The run proceeds without a client certificate; the mTLS test then skips
        match ensure_client_certificate(&cli.client_cert, &cli.client_key) {
            Ok(ClientCertStatus::Existing) => tracing::info!(
                "Client certificates already exist at {}",
                cli.client_cert.display()
            ),
            Ok(ClientCertStatus::Generated) => tracing::info!(
                "Generated client certificate and key at {}",
                cli.client_cert.display()
            ),
            Err(e) => tracing::error!("Error generating client certificate: {}", e),
        }
    }

    let config = ValidationConfig {
        scan_dir: cli.scan_dir,
        host: cli.host,
        port: cli.port,
        client_cert: cli.client_cert,
        client_key: cli.client_key,
        output: cli.output,
        mtls_enabled: !cli.no_mtls,
        keystore_passwords: cli.keystore_passwords,
        settings,
    };

    println!(
        "{} {}:{}",
        style("Validating trust chains against").bold(),
        style(&config.host).cyan(),
        style(config.port).cyan()
    );

    let validator = TrustChainValidator::new(config);
    let tracker = ProgressTracker::new("Starting trust chain validation tests");
    let result = validator
        .run_tests(&|event: ValidationEvent| report_event(&tracker, &event))
        .await;
    tracker.finish_and_clear();

    let result = result?;
    print_summary(&result.report);
    Ok(result.success)
}
