//! go-plugin server
//!
//! Terraform launches the provider with a magic cookie in the environment,
//! reads a single handshake line from stdout and then talks gRPC to the
//! advertised address. In debug mode the provider runs on its own and prints
//! a `TF_REATTACH_PROVIDERS` value for Terraform to attach to instead.

use log::{debug, info};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tonic_health::ServingStatus;

use crate::config::plugin::{
    CLIENT_CERT_ENV, CORE_PROTOCOL_VERSION, HEALTH_SERVICE, MAGIC_COOKIE_KEY, MAGIC_COOKIE_VALUE,
    NOT_A_PLUGIN_MESSAGE, PROTOCOL_VERSION, PROTOCOL_VERSIONS_ENV,
};
use crate::error::{ProviderError, Result};
use crate::plugin::controller::Controller;
use crate::plugin::proto::plugin::grpc_controller_server::GrpcControllerServer;
use crate::plugin::proto::tfplugin6::provider_server::ProviderServer;
use crate::plugin::service::PluginService;
use crate::plugin::tls::ServerCertificate;
use crate::provider::GoliatProvider;

/// How the plugin server is started
#[derive(Debug, Clone)]
pub struct ServeOptions {
    /// Run standalone and print reattach information
    pub debug: bool,
    /// Registry address used as the reattach key
    pub provider_address: String,
}

/// Ensure we were started by Terraform
pub fn check_magic_cookie(value: Option<&str>) -> Result<()> {
    match value {
        Some(v) if v == MAGIC_COOKIE_VALUE => Ok(()),
        _ => Err(ProviderError::Plugin(NOT_A_PLUGIN_MESSAGE.to_string())),
    }
}

/// Pick the protocol version from the versions Terraform offers
///
/// An absent list means the host did not negotiate and accepts ours.
pub fn negotiate_protocol(offered: Option<&str>) -> Result<u32> {
    let Some(offered) = offered.filter(|s| !s.trim().is_empty()) else {
        return Ok(PROTOCOL_VERSION);
    };

    let supported = offered
        .split(',')
        .filter_map(|v| v.trim().parse::<u32>().ok())
        .any(|v| v == PROTOCOL_VERSION);

    if supported {
        Ok(PROTOCOL_VERSION)
    } else {
        Err(ProviderError::Plugin(format!(
            "Terraform offered plugin protocol versions [{}], this provider only speaks version {}",
            offered, PROTOCOL_VERSION
        )))
    }
}

/// The line Terraform reads from stdout
pub fn handshake_line(addr: SocketAddr, cert: Option<&str>) -> String {
    format!(
        "{}|{}|tcp|{}|grpc|{}",
        CORE_PROTOCOL_VERSION,
        PROTOCOL_VERSION,
        addr,
        cert.unwrap_or_default()
    )
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ReattachAddr {
    network: String,
    string: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ReattachConfig {
    protocol: &'static str,
    protocol_version: u32,
    pid: u32,
    test: bool,
    addr: ReattachAddr,
}

/// JSON value for `TF_REATTACH_PROVIDERS`
pub fn reattach_config(provider_address: &str, addr: SocketAddr, pid: u32) -> Result<String> {
    let mut providers = BTreeMap::new();
    providers.insert(
        provider_address,
        ReattachConfig {
            protocol: "grpc",
            protocol_version: PROTOCOL_VERSION,
            pid,
            test: true,
            addr: ReattachAddr {
                network: "tcp".to_string(),
                string: addr.to_string(),
            },
        },
    );
    Ok(serde_json::to_string(&providers)?)
}

fn client_cert_requested() -> bool {
    std::env::var(CLIENT_CERT_ENV).is_ok_and(|v| !v.trim().is_empty())
}

/// Resolves when the server should stop
///
/// Terraform owns the plugin lifecycle, so an interrupt only stops a
/// standalone debug server.
async fn shutdown_signal(shutdown: Arc<Notify>, debug: bool) {
    loop {
        tokio::select! {
            _ = shutdown.notified() => return,
            result = tokio::signal::ctrl_c() => {
                if debug || result.is_err() {
                    info!("Interrupted, stopping provider");
                    return;
                }
                debug!("Ignoring interrupt, waiting for Terraform to stop the plugin");
            }
        }
    }
}

/// Serve the provider until Terraform (or Ctrl-C in debug mode) stops it
pub async fn serve(provider: GoliatProvider, options: ServeOptions) -> Result<()> {
    if !options.debug {
        check_magic_cookie(std::env::var(MAGIC_COOKIE_KEY).ok().as_deref())?;
        negotiate_protocol(std::env::var(PROTOCOL_VERSIONS_ENV).ok().as_deref())?;
    }

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    debug!("Listening on {}", addr);

    let shutdown = Arc::new(Notify::new());
    let (mut health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_service_status(HEALTH_SERVICE, ServingStatus::Serving)
        .await;

    let certificate = if !options.debug && client_cert_requested() {
        info!("Terraform requested AutoMTLS, generating server certificate");
        Some(ServerCertificate::generate()?)
    } else {
        None
    };

    let mut builder = Server::builder();
    if let Some(cert) = &certificate {
        builder = builder.tls_config(cert.tls_config())?;
    }

    let router = builder
        .add_service(health_service)
        .add_service(GrpcControllerServer::new(Controller::new(shutdown.clone())))
        .add_service(ProviderServer::new(PluginService::new(provider)));

    let mut stdout = std::io::stdout();
    if options.debug {
        let reattach = reattach_config(&options.provider_address, addr, std::process::id())?;
        writeln!(stdout, "Provider started. To attach Terraform CLI, set the TF_REATTACH_PROVIDERS environment variable with the following:\n")?;
        writeln!(stdout, "\tTF_REATTACH_PROVIDERS='{}'", reattach)?;
    } else {
        let cert = certificate.as_ref().map(ServerCertificate::handshake_value);
        writeln!(stdout, "{}", handshake_line(addr, cert.as_deref()))?;
    }
    stdout.flush()?;

    router
        .serve_with_incoming_shutdown(
            TcpListenerStream::new(listener),
            shutdown_signal(shutdown, options.debug),
        )
        .await?;

    info!("Provider stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr() -> SocketAddr {
        "127.0.0.1:43127".parse().unwrap()
    }

    #[test]
    fn test_check_magic_cookie() {
        assert!(check_magic_cookie(Some(MAGIC_COOKIE_VALUE)).is_ok());

        let err = check_magic_cookie(None).unwrap_err();
        assert!(err.to_string().contains("This binary is a plugin"));
        assert!(check_magic_cookie(Some("wrong")).is_err());
    }

    #[test]
    fn test_negotiate_protocol() {
        assert_eq!(negotiate_protocol(Some("5,6")).unwrap(), 6);
        assert_eq!(negotiate_protocol(Some(" 6 ")).unwrap(), 6);
        assert_eq!(negotiate_protocol(None).unwrap(), 6);
        assert!(negotiate_protocol(Some("4,5")).is_err());
    }

    #[test]
    fn test_handshake_line_plain() {
        assert_eq!(
            handshake_line(addr(), None),
            "1|6|tcp|127.0.0.1:43127|grpc|"
        );
    }

    #[test]
    fn test_handshake_line_with_cert() {
        let line = handshake_line(addr(), Some("MIIB"));
        assert_eq!(line.split('|').count(), 6);
        assert!(line.ends_with("|grpc|MIIB"));
    }

    #[test]
    fn test_reattach_config() {
        let json = reattach_config("registry.terraform.io/goliat/goliatdashboard", addr(), 4242)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let entry = &value["registry.terraform.io/goliat/goliatdashboard"];
        assert_eq!(entry["Protocol"], "grpc");
        assert_eq!(entry["ProtocolVersion"], 6);
        assert_eq!(entry["Pid"], 4242);
        assert_eq!(entry["Test"], true);
        assert_eq!(entry["Addr"]["Network"], "tcp");
        assert_eq!(entry["Addr"]["String"], "127.0.0.1:43127");
    }

    #[tokio::test]
    async fn test_shutdown_signal_resolves_on_notify() {
        let notify = Arc::new(Notify::new());
        notify.notify_one();
        tokio::time::timeout(
            std::time::Duration::from_secs(1),
            shutdown_signal(notify, false),
        )
        .await
        .unwrap();
    }
}
