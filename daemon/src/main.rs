//! Village daemon: entry point for running the attendee community service.

mod config;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use village_community::CityService;
use village_mail::{DisabledMailer, Mailer, ResendConfig, ResendMailer};
use village_rpc::{RpcServer, RpcState, Stores};
use village_store_lmdb::environment::DEFAULT_MAX_DBS;
use village_store_lmdb::LmdbEnvironment;
use village_types::SystemClock;
use village_utils::{init_logging, LogFormat};
use village_verification::{AccessCodeGenerator, AnswerKey};

use crate::config::DaemonConfig;

#[derive(Parser)]
#[command(name = "village-daemon", about = "Attendee verification and community service")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "VILLAGE_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory for the LMDB environment.
    #[arg(long, env = "VILLAGE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Address to bind the HTTP server to.
    #[arg(long, env = "VILLAGE_BIND_ADDR")]
    bind_addr: Option<String>,

    /// HTTP server port.
    #[arg(long, env = "VILLAGE_HTTP_PORT")]
    http_port: Option<u16>,

    /// LMDB map size in mebibytes.
    #[arg(long, env = "VILLAGE_MAP_SIZE_MB")]
    map_size_mb: Option<usize>,

    /// Log format: "human" or "json".
    #[arg(long, env = "VILLAGE_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "VILLAGE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Public URL of the web client, used in emails.
    #[arg(long, env = "VILLAGE_APP_URL")]
    app_url: Option<String>,

    /// Sender address for outgoing email.
    #[arg(long, env = "VILLAGE_MAIL_FROM")]
    mail_from: Option<String>,

    /// Mail provider endpoint.
    #[arg(long, env = "VILLAGE_MAIL_API_URL")]
    mail_api_url: Option<String>,

    /// Mail provider API key. Without one, recovery emails are not sent.
    #[arg(long, env = "VILLAGE_MAIL_API_KEY", hide_env_values = true)]
    mail_api_key: Option<String>,

    /// Allow cross-origin requests from any origin.
    #[arg(long, env = "VILLAGE_ENABLE_CORS")]
    enable_cors: Option<bool>,
}

impl Cli {
    /// Layer CLI flags and environment variables over the file config.
    fn apply(self, mut config: DaemonConfig) -> (DaemonConfig, Option<String>) {
        if let Some(v) = self.data_dir {
            config.data_dir = v;
        }
        if let Some(v) = self.bind_addr {
            config.bind_addr = v;
        }
        if let Some(v) = self.http_port {
            config.http_port = v;
        }
        if let Some(v) = self.map_size_mb {
            config.map_size_mb = v;
        }
        if let Some(v) = self.log_format {
            config.log_format = v;
        }
        if let Some(v) = self.log_level {
            config.log_level = v;
        }
        if let Some(v) = self.app_url {
            config.app_url = v;
        }
        if let Some(v) = self.mail_from {
            config.mail_from = v;
        }
        if let Some(v) = self.mail_api_url {
            config.mail_api_url = v;
        }
        if let Some(v) = self.enable_cors {
            config.enable_cors = v;
        }
        let api_key = self.mail_api_key.filter(|k| !k.trim().is_empty());
        (config, api_key)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut cli = Cli::parse();

    let file_config = match cli.config.take() {
        Some(path) => DaemonConfig::from_toml_file(&path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => DaemonConfig::default(),
    };
    let (config, mail_api_key) = cli.apply(file_config);

    init_logging(config.log_format, &config.log_level);

    let env = LmdbEnvironment::open(&config.data_dir, DEFAULT_MAX_DBS, config.map_size_bytes())
        .with_context(|| format!("opening data directory {}", config.data_dir.display()))?;

    let stores = Stores {
        accounts: Arc::new(env.account_store()),
        listings: Arc::new(env.listing_store()),
        contacts: Arc::new(env.contact_store()),
        groups: Arc::new(env.group_store()),
        cities: Arc::new(env.city_store()),
    };

    if !config.seed_cities.is_empty() {
        let added = CityService::new(stores.cities.clone())
            .seed(&config.seed_cities)
            .context("seeding approved cities")?;
        tracing::info!(added, configured = config.seed_cities.len(), "city seed applied");
    }

    let mailer: Arc<dyn Mailer> = match mail_api_key {
        Some(api_key) => Arc::new(
            ResendMailer::new(ResendConfig {
                api_url: config.mail_api_url.clone(),
                api_key,
                from: config.mail_from.clone(),
                app_url: config.app_url.clone(),
            })
            .context("building mail client")?,
        ),
        None => {
            tracing::warn!("VILLAGE_MAIL_API_KEY not set; access-code recovery emails are disabled");
            Arc::new(DisabledMailer)
        }
    };

    let state = RpcState::new(
        stores,
        Arc::new(AnswerKey::startup_school()),
        AccessCodeGenerator::default(),
        mailer,
        Arc::new(SystemClock),
    );

    let addr: SocketAddr = format!("{}:{}", config.bind_addr, config.http_port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", config.bind_addr, config.http_port))?;

    tracing::info!(
        data_dir = %config.data_dir.display(),
        %addr,
        log_format = %config.log_format,
        "starting village daemon"
    );

    RpcServer::new(addr, Arc::new(state))
        .with_cors(config.enable_cors)
        .start(shutdown_signal())
        .await?;

    tracing::info!("village daemon exited cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_file_values() {
        let file = DaemonConfig::from_toml_str("http_port = 8080\nlog_level = \"debug\"").unwrap();
        let cli = Cli::try_parse_from([
            "village-daemon",
            "--http-port",
            "9000",
            "--log-format",
            "json",
            "--mail-api-key",
            "re_test",
        ])
        .unwrap();

        let (config, key) = cli.apply(file);
        assert_eq!(config.http_port, 9000);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.log_level, "debug");
        assert_eq!(key.as_deref(), Some("re_test"));
    }

    #[test]
    fn blank_mail_key_is_ignored() {
        let cli = Cli::try_parse_from(["village-daemon", "--mail-api-key", "  "]).unwrap();
        let (_, key) = cli.apply(DaemonConfig::default());
        assert!(key.is_none());
    }
}
