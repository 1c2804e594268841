use anyhow::Context;
use clap::Parser;
use log::{info, warn};
use std::sync::Arc;

use traffic_datagen::engine::{EngineRng, HistoricalCounts, SimulationScheduler};
use traffic_datagen::persistence::memory::{MemorySink, StaticVehicleSource};
use traffic_datagen::persistence::rest::RestClient;
use traffic_datagen::persistence::{tables, RecordSink, VehicleSource};

#[derive(Parser)]
#[command(name = "traffic_datagen")]
#[command(about = "Synthetic city traffic dataset generator and simulator")]
struct Cli {
    /// Clear existing data before seeding
    #[arg(long)]
    clear: bool,

    /// Seed historical data for the past 24 hours
    #[arg(long)]
    seed: bool,

    /// Run the continuous near-real-time simulation
    #[arg(long)]
    simulate: bool,

    /// Number of historical vehicle records to generate
    #[arg(long, default_value_t = 10000)]
    vehicles: usize,

    /// Number of historical anomaly records to generate
    #[arg(long, default_value_t = 10000)]
    anomalies: usize,

    /// Number of historical trust ledger records to generate
    #[arg(long, default_value_t = 1000)]
    trust: usize,

    /// Seed for the engine's random source (OS entropy when omitted)
    #[arg(long)]
    rng_seed: Option<u64>,

    /// Collect batches in memory instead of posting to the REST endpoint
    #[arg(long)]
    dry_run: bool,

    /// REST endpoint base URL
    #[arg(long, env = "TRAFFIC_DB_URL")]
    db_url: Option<String>,

    /// REST endpoint API key
    #[arg(long, env = "TRAFFIC_DB_KEY", hide_env_values = true)]
    db_key: Option<String>,
}

/// Rows each table should hold after seeding.
const MIN_SEEDED_ROWS: u64 = 1000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let mut cli = Cli::parse();

    // Default to a full seed-and-simulate run when no mode is chosen
    if !(cli.clear || cli.seed || cli.simulate) {
        cli.seed = true;
        cli.simulate = true;
    }

    let rng = match cli.rng_seed {
        Some(seed) => EngineRng::seeded(seed),
        None => EngineRng::from_entropy(),
    };
    let counts = HistoricalCounts {
        vehicles: cli.vehicles,
        anomalies: cli.anomalies,
        trust: cli.trust,
    };

    info!("initializing traffic data simulation");

    if cli.dry_run {
        let sink: Arc<dyn RecordSink> = Arc::new(MemorySink::new());
        let source: Arc<dyn VehicleSource> = Arc::new(StaticVehicleSource::empty());
        let mut scheduler = SimulationScheduler::new(sink, source, rng);

        if cli.seed {
            scheduler.seed_historical(&counts).await;
        }
        if cli.simulate {
            simulate_until_interrupted(scheduler).await?;
        }
        return Ok(());
    }

    let db_url = cli
        .db_url
        .clone()
        .context("--db-url or TRAFFIC_DB_URL is required")?;
    let db_key = cli
        .db_key
        .clone()
        .context("--db-key or TRAFFIC_DB_KEY is required")?;
    let client = Arc::new(RestClient::new(db_url, db_key)?);

    if cli.clear {
        for table in tables::ALL {
            if let Err(e) = client.clear_table(table).await {
                warn!("{e:#}");
            }
        }
    }

    let sink: Arc<dyn RecordSink> = client.clone();
    let source: Arc<dyn VehicleSource> = client.clone();
    let mut scheduler = SimulationScheduler::new(sink, source, rng);

    if cli.seed {
        scheduler.seed_historical(&counts).await;
        verify_row_counts(client.as_ref()).await;
    }

    if cli.simulate {
        simulate_until_interrupted(scheduler).await?;
    }

    Ok(())
}

/// Run the four generator tasks until Ctrl-C, then stop them cleanly.
async fn simulate_until_interrupted(scheduler: SimulationScheduler) -> anyhow::Result<()> {
    info!("starting continuous data simulation");
    let handle = scheduler.start();

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    info!("shutdown requested");
    handle.shutdown().await;
    Ok(())
}

/// Check that every table holds enough rows to be useful downstream.
async fn verify_row_counts(client: &RestClient) {
    for table in tables::ALL {
        match client.record_count(table).await {
            Ok(count) if count >= MIN_SEEDED_ROWS => {
                info!("{table}: {count} records (sufficient)");
            }
            Ok(count) => {
                warn!("{table}: {count} records (below minimum of {MIN_SEEDED_ROWS})");
            }
            Err(e) => warn!("could not verify {table}: {e:#}"),
        }
    }
}
