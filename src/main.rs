//! carbon-slots entry point: CLI wiring and config-driven source construction.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use carbon_slots::config::ServiceConfig;
use carbon_slots::forecast::{ForecastRecord, LocalForecast, SyntheticForecast, parse_records};
use carbon_slots::io::export::export_csv;
use carbon_slots::io::ingest::load_forecast_file;
use carbon_slots::slots::{SelectionMode, SlotRecord, SlotSelector};

#[derive(Parser)]
#[command(
    name = "carbon-slots",
    about = "Find the lowest carbon-intensity time slots for an activity",
    version
)]
struct Cli {
    /// Load configuration from a TOML file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Use a built-in preset (live, offline).
    #[arg(long, global = true, conflicts_with = "config")]
    preset: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Select slots once and print them.
    Select {
        /// Activity duration in minutes (default from config: 30).
        #[arg(short, long, allow_hyphen_values = true)]
        duration: Option<i64>,
        /// Require a single bucket that covers the whole duration.
        #[arg(short, long, conflicts_with = "greedy")]
        contiguous: bool,
        /// Accumulate the cleanest buckets, overriding a contiguous config default.
        #[arg(long)]
        greedy: bool,
        #[command(flatten)]
        source: SourceArgs,
        /// Export selected slots to CSV.
        #[arg(long)]
        csv_out: Option<PathBuf>,
        /// Print slots as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Serve `GET /slots` over HTTP.
    #[cfg(feature = "api")]
    Serve {
        /// Interface to bind (default from config: 0.0.0.0).
        #[arg(long)]
        bind: Option<String>,
        /// TCP port (default from config: 3000).
        #[arg(short, long)]
        port: Option<u16>,
        #[command(flatten)]
        source: SourceArgs,
    },
}

/// Forecast source overrides shared by all subcommands.
#[derive(Args)]
struct SourceArgs {
    /// Read the forecast from a JSON file.
    #[arg(long, conflicts_with = "synthetic")]
    input: Option<PathBuf>,
    /// Use a seeded synthetic forecast instead of the live service.
    #[arg(long)]
    synthetic: bool,
    /// Seed for the synthetic forecast.
    #[arg(long)]
    seed: Option<u64>,
}

impl SourceArgs {
    fn apply(&self, cfg: &mut ServiceConfig) {
        if let Some(ref path) = self.input {
            cfg.forecast.source = "file".to_string();
            cfg.forecast.path = Some(path.clone());
        } else if self.synthetic {
            cfg.forecast.source = "synthetic".to_string();
        }
        if let Some(seed) = self.seed {
            cfg.forecast.seed = seed;
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<ServiceConfig> {
    // --config takes priority, then --preset, then the live default
    let cfg = if let Some(ref path) = cli.config {
        ServiceConfig::from_toml_file(path)?
    } else if let Some(ref name) = cli.preset {
        ServiceConfig::from_preset(name)?
    } else {
        ServiceConfig::live()
    };
    Ok(cfg)
}

fn validate(cfg: &ServiceConfig) -> anyhow::Result<()> {
    let errors = cfg.validate();
    if errors.is_empty() {
        return Ok(());
    }
    for e in &errors {
        eprintln!("{e}");
    }
    bail!("invalid configuration ({} error(s))", errors.len())
}

/// Builds the offline forecast source, or `None` for the remote service.
fn local_forecast(cfg: &ServiceConfig) -> anyhow::Result<Option<LocalForecast>> {
    let f = &cfg.forecast;
    match f.source.as_str() {
        "file" => {
            let path = f
                .path
                .as_deref()
                .context("forecast.path is required for the file source")?;
            let records = load_forecast_file(path)
                .with_context(|| format!("failed to load forecast from {}", path.display()))?;
            info!(path = %path.display(), records = records.len(), "loaded forecast file");
            Ok(Some(LocalForecast::Static(records)))
        }
        "synthetic" => Ok(Some(LocalForecast::Synthetic(SyntheticForecast::starting_now(
            f.seed,
        )))),
        _ => Ok(None),
    }
}

#[cfg(feature = "api")]
fn fetch_remote(cfg: &ServiceConfig) -> anyhow::Result<Vec<ForecastRecord>> {
    use carbon_slots::forecast::CarbonIntensityClient;

    let client = CarbonIntensityClient::from_config(&cfg.forecast)?;
    let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
    let records = rt
        .block_on(client.fetch_forecast(chrono::Utc::now()))
        .context("failed to fetch forecast data")?;
    Ok(records)
}

#[cfg(not(feature = "api"))]
fn fetch_remote(_cfg: &ServiceConfig) -> anyhow::Result<Vec<ForecastRecord>> {
    bail!("the remote forecast source needs the `api` feature; use --input or --synthetic")
}

/// Resolves the mode from CLI flags, falling back to the configured default.
fn selection_mode(contiguous: bool, greedy: bool, default_contiguous: bool) -> SelectionMode {
    if greedy {
        SelectionMode::Greedy
    } else if contiguous {
        SelectionMode::SingleContiguous
    } else {
        SelectionMode::from_contiguous(default_contiguous)
    }
}

fn run_select(
    cfg: &ServiceConfig,
    duration: Option<i64>,
    mode: SelectionMode,
    csv_out: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let records = match local_forecast(cfg)? {
        Some(local) => local.records(),
        None => fetch_remote(cfg)?,
    };

    let duration = duration.unwrap_or(cfg.selection.duration_minutes);

    let parsed = parse_records(&records);
    let selection = SlotSelector.select_with_report(&parsed.buckets, duration, mode)?;

    if !selection.is_complete(duration) {
        warn!(
            duration,
            covered_minutes = selection.covered_minutes,
            %mode,
            "forecast cannot cover the requested duration"
        );
    }

    if json {
        let records: Vec<SlotRecord> = selection.slots.iter().map(SlotRecord::from).collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        println!("{selection}");
    }

    if let Some(path) = csv_out {
        export_csv(&selection.slots, path)
            .with_context(|| format!("failed to write CSV to {}", path.display()))?;
        info!(path = %path.display(), "slots written");
    }

    Ok(())
}

#[cfg(feature = "api")]
fn run_serve(cfg: &ServiceConfig) -> anyhow::Result<()> {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use carbon_slots::api::{AppState, serve};
    use carbon_slots::forecast::{CarbonIntensityClient, ForecastProvider};

    let provider = match local_forecast(cfg)? {
        Some(local) => ForecastProvider::Local(local),
        None => ForecastProvider::Remote(CarbonIntensityClient::from_config(&cfg.forecast)?),
    };
    let state = Arc::new(AppState {
        provider,
        defaults: cfg.selection.clone(),
    });

    let addr: SocketAddr = format!("{}:{}", cfg.server.bind, cfg.server.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", cfg.server.bind, cfg.server.port))?;
    let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
    rt.block_on(serve(state, addr)).context("server error")?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut cfg = load_config(&cli)?;

    match cli.command {
        Command::Select {
            duration,
            contiguous,
            greedy,
            ref source,
            ref csv_out,
            json,
        } => {
            source.apply(&mut cfg);
            validate(&cfg)?;
            let mode = selection_mode(contiguous, greedy, cfg.selection.contiguous);
            run_select(&cfg, duration, mode, csv_out.as_deref(), json)
        }
        #[cfg(feature = "api")]
        Command::Serve {
            ref bind,
            port,
            ref source,
        } => {
            source.apply(&mut cfg);
            if let Some(bind) = bind {
                cfg.server.bind = bind.clone();
            }
            if let Some(port) = port {
                cfg.server.port = port;
            }
            validate(&cfg)?;
            run_serve(&cfg)
        }
    }
}
