//! Main entry point for the share-stress binary
//!
//! Wires the REST client, the share action factory and the driver together,
//! translates termination signals into a shutdown request, and maps the
//! session outcome onto the process exit status.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use share_stress::{
    CleanupManager, DriverOptions, RestSharesClient, RunnerConfig, ShareActionFactory,
    StressConfig, StressDriver, config::load_action_file, runtime::spawn_signal_listener,
    shutdown_channel,
};
use stress_shared::{SizeRange, WorkerId, logging, worker_debug, worker_info};

/// Stress test a share service with concurrent create/delete actions
#[derive(Parser)]
#[command(name = "share-stress")]
#[command(about = "Runs share stress actions concurrently and reports run/failure counts")]
pub struct Args {
    /// JSON file listing the actions to run
    #[arg(short, long)]
    pub actions: PathBuf,

    /// Stop each batch after this many seconds
    #[arg(short, long)]
    pub duration: Option<u64>,

    /// Trials per runner (defaults to --count-recreations when set)
    #[arg(short, long)]
    pub number: Option<u64>,

    /// Run one action at a time
    #[arg(short, long)]
    pub serial: bool,

    /// Abort once more than one trial has failed
    #[arg(long)]
    pub stop_on_error: bool,

    /// Remove leftover stress-tests-* resources after the session
    #[arg(long)]
    pub cleanup: bool,

    /// Write the session report as JSON to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Share API endpoint including the tenant path
    #[arg(long, env = "SHARE_ENDPOINT", default_value = "http://127.0.0.1:8786/v2")]
    pub endpoint: String,

    /// Token sent as X-Auth-Token
    #[arg(long, env = "SHARE_AUTH_TOKEN", hide_env_values = true)]
    pub auth_token: Option<String>,

    /// API microversion header value
    #[arg(long, env = "SHARE_API_VERSION")]
    pub api_version: Option<String>,

    /// Share network new shares attach to (also scopes share server cleanup)
    #[arg(long, env = "SHARE_NETWORK_ID")]
    pub share_network_id: Option<String>,

    /// Enabled share protocols, comma separated; actions use the first
    #[arg(long, value_delimiter = ',', default_value = "nfs,cifs")]
    pub protocols: Vec<String>,

    /// Share size range in GiB, e.g. 1-2
    #[arg(long, default_value = "1-2")]
    pub sizes_range: SizeRange,

    /// Default run budget for share actions
    #[arg(long)]
    pub count_recreations: Option<u64>,

    /// Seconds between status polls
    #[arg(long, default_value = "3")]
    pub build_interval_secs: u64,

    /// Seconds before a status wait gives up
    #[arg(long, default_value = "500")]
    pub build_timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    fn stress_config(&self) -> StressConfig {
        let mut builder = StressConfig::builder()
            .endpoint(&self.endpoint)
            .build_interval(Duration::from_secs(self.build_interval_secs))
            .build_timeout(Duration::from_secs(self.build_timeout_secs))
            .count_recreations(self.count_recreations)
            .sizes_range(self.sizes_range)
            .protocols(self.protocols.iter().map(|p| p.trim().to_string()));

        if let Some(token) = &self.auth_token {
            builder = builder.auth_token(token);
        }
        if let Some(version) = &self.api_version {
            builder = builder.api_version(version);
        }
        if let Some(network) = &self.share_network_id {
            builder = builder.share_network_id(network);
        }
        builder.build()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // .env values feed the env-backed arguments
    let _ = dotenv::dotenv();
    let args = Args::parse();

    logging::init_tracing(Some(&args.log_level));
    let driver_id = WorkerId::Driver;

    let config = args.stress_config();
    config.validate().context("invalid configuration")?;

    let specs = load_action_file(&args.actions)
        .with_context(|| format!("failed to load actions from {}", args.actions.display()))?;
    worker_debug!(driver_id, "Loaded {} actions from {}", specs.len(), args.actions.display());

    let client = Arc::new(
        RestSharesClient::new(&config.service).context("failed to build share API client")?,
    );
    let wait = config.service.wait_policy();
    let factory = ShareActionFactory::new(client.clone(), config.share_stress.clone(), wait);

    let options = DriverOptions {
        duration: args.duration.map(Duration::from_secs),
        runner: RunnerConfig::new()
            .max_runs(args.number.or(config.share_stress.count_recreations))
            .stop_on_error(args.stop_on_error),
        serial: args.serial,
        ..DriverOptions::default()
    };
    worker_info!(
        driver_id,
        "🖥️  Endpoint {}, runs per runner {}",
        config.service.endpoint,
        options
            .runner
            .max_runs
            .map(|n| n.to_string())
            .unwrap_or_else(|| "unlimited".to_string())
    );

    let (trigger, shutdown) = shutdown_channel();
    let listener = spawn_signal_listener(trigger).context("failed to install signal handlers")?;

    let driver = StressDriver::new(factory);
    let report = driver
        .run(&specs, &options, shutdown)
        .await
        .context("stress session failed to start")?;

    if args.cleanup {
        let manager =
            CleanupManager::new(client, config.share_stress.share_network_id.clone(), wait);
        manager.cleanup().await;
    }

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        worker_info!(driver_id, "📝 Report written to {}", path.display());
    }

    listener.abort();
    let code = report.exit_code();
    logging::log_shutdown(&driver_id, &format!("{:?}, exit code {}", report.stop_reason, code));
    Ok(ExitCode::from(code as u8))
}
