//! Periodic task scheduler
//!
//! Runs the four generators as independent tokio tasks, each on its own
//! cadence, forwarding every batch to the shared persistence sink. A failure
//! in one generator's tick never halts the others.

use chrono::{Timelike, Utc};
use log::{error, info, warn};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::persistence::{rows, tables, KnownVehicle, RecordSink, VehicleSource};

use super::anomalies::AnomalyEventProcess;
use super::city::fallback_vehicle_id;
use super::congestion::CongestionFieldModel;
use super::error::TickError;
use super::intensity::traffic_intensity;
use super::rng::EngineRng;
use super::trust::TrustLedger;
use super::vehicles::VehiclePopulationManager;

/// Cadences and sizing knobs for the scheduler.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub vehicle_interval: Duration,
    pub congestion_interval: Duration,
    pub anomaly_interval: Duration,
    pub anomaly_jitter: Duration,
    pub trust_interval: Duration,
    pub trust_jitter: Duration,
    /// Floor applied to jittered intervals.
    pub min_interval: Duration,
    /// Vehicles spawned before the first vehicle tick.
    pub initial_population: usize,
    /// Row limit for known-vehicle snapshot fetches.
    pub snapshot_limit: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            vehicle_interval: Duration::from_secs(5),
            congestion_interval: Duration::from_secs(60),
            anomaly_interval: Duration::from_secs(900),
            anomaly_jitter: Duration::from_secs(60),
            trust_interval: Duration::from_secs(1800),
            trust_jitter: Duration::from_secs(300),
            min_interval: Duration::from_secs(60),
            initial_population: 100,
            snapshot_limit: 1000,
        }
    }
}

/// Record counts for historical seeding.
#[derive(Debug, Clone)]
pub struct HistoricalCounts {
    pub vehicles: usize,
    pub anomalies: usize,
    pub trust: usize,
}

impl Default for HistoricalCounts {
    fn default() -> Self {
        Self {
            vehicles: 10_000,
            anomalies: 10_000,
            trust: 1_000,
        }
    }
}

/// Handle to a running scheduler; dropping it does not stop the tasks.
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl SchedulerHandle {
    /// Signal all generator tasks to stop after their current tick and wait
    /// for them to finish. No mid-batch cancellation: a tick's batch is
    /// always generated and submitted before the task observes the signal.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        for task in self.tasks {
            let _ = task.await;
        }
    }
}

/// Drives the four generators against a persistence sink and vehicle source.
pub struct SimulationScheduler {
    sink: Arc<dyn RecordSink>,
    source: Arc<dyn VehicleSource>,
    config: SchedulerConfig,
    rng: EngineRng,
}

impl SimulationScheduler {
    pub fn new(sink: Arc<dyn RecordSink>, source: Arc<dyn VehicleSource>, rng: EngineRng) -> Self {
        Self::with_config(sink, source, rng, SchedulerConfig::default())
    }

    pub fn with_config(
        sink: Arc<dyn RecordSink>,
        source: Arc<dyn VehicleSource>,
        rng: EngineRng,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            sink,
            source,
            config,
            rng,
        }
    }

    /// Generate and persist the historical backfill for all four tables.
    ///
    /// Best effort: a failed table is logged and the remaining tables are
    /// still seeded.
    pub async fn seed_historical(&mut self, counts: &HistoricalCounts) {
        info!("seeding historical data");
        let now = Utc::now();

        let mut population = VehiclePopulationManager::new(self.rng.fork());
        let vehicles = population.historical_batch(counts.vehicles);
        info!("generated {} historical vehicle records", vehicles.len());
        if let Err(e) = push_batch(self.sink.as_ref(), tables::VEHICLES, &vehicles).await {
            error!("{e}");
        }

        let mut congestion = CongestionFieldModel::new(self.rng.fork());
        let congestion_records = congestion.historical_batch(now);
        info!(
            "generated {} historical congestion records",
            congestion_records.len()
        );
        if let Err(e) = push_batch(
            self.sink.as_ref(),
            tables::ZONES_CONGESTION,
            &congestion_records,
        )
        .await
        {
            error!("{e}");
        }

        let snapshot = known_vehicles(
            self.source.as_ref(),
            self.config.snapshot_limit,
            &mut self.rng,
        )
        .await;
        let known_ids: Vec<String> = snapshot.iter().map(|v| v.vehicle_id.clone()).collect();

        let mut anomalies = AnomalyEventProcess::new(self.rng.fork());
        let anomaly_events = anomalies.historical_batch(counts.anomalies, now, &known_ids);
        info!(
            "generated {} historical anomaly records",
            anomaly_events.len()
        );
        if let Err(e) = push_batch(self.sink.as_ref(), tables::ANOMALIES, &anomaly_events).await {
            error!("{e}");
        }

        let mut ledger = TrustLedger::new(self.rng.fork());
        let ledger_snapshot = to_score_snapshot(&snapshot);
        let trust_entries = ledger.historical_batch(counts.trust, now, &ledger_snapshot);
        info!(
            "generated {} historical trust ledger records",
            trust_entries.len()
        );
        if let Err(e) = push_batch(self.sink.as_ref(), tables::TRUST_LEDGER, &trust_entries).await {
            error!("{e}");
        }

        info!("historical data seeding complete");
    }

    /// Spawn the four generator tasks and return a handle for shutdown.
    pub fn start(mut self) -> SchedulerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let tasks = vec![
            tokio::spawn(run_vehicle_task(
                Arc::clone(&self.sink),
                self.config.clone(),
                self.rng.fork(),
                shutdown_rx.clone(),
            )),
            tokio::spawn(run_congestion_task(
                Arc::clone(&self.sink),
                self.config.clone(),
                self.rng.fork(),
                shutdown_rx.clone(),
            )),
            tokio::spawn(run_anomaly_task(
                Arc::clone(&self.sink),
                Arc::clone(&self.source),
                self.config.clone(),
                self.rng.fork(),
                shutdown_rx.clone(),
            )),
            tokio::spawn(run_trust_task(
                Arc::clone(&self.sink),
                Arc::clone(&self.source),
                self.config.clone(),
                self.rng.fork(),
                shutdown_rx,
            )),
        ];

        SchedulerHandle {
            shutdown: shutdown_tx,
            tasks,
        }
    }
}

async fn run_vehicle_task(
    sink: Arc<dyn RecordSink>,
    config: SchedulerConfig,
    mut rng: EngineRng,
    mut shutdown: watch::Receiver<bool>,
) {
    info!("starting vehicle simulation");
    let mut population =
        VehiclePopulationManager::with_initial_population(rng.fork(), config.initial_population);

    loop {
        let intensity = traffic_intensity(&mut rng, Utc::now().hour());
        let target = VehiclePopulationManager::target_for_intensity(intensity);
        population.rebalance(target);

        let batch = population.advance_tick(config.vehicle_interval.as_secs_f64());
        match push_batch(sink.as_ref(), tables::VEHICLES, &batch).await {
            Ok(()) => info!("updated {} vehicles", batch.len()),
            Err(e) => warn!("vehicle tick: {e}"),
        }

        if sleep_or_shutdown(config.vehicle_interval, &mut shutdown).await {
            break;
        }
    }
    info!("vehicle simulation stopped");
}

async fn run_congestion_task(
    sink: Arc<dyn RecordSink>,
    config: SchedulerConfig,
    rng: EngineRng,
    mut shutdown: watch::Receiver<bool>,
) {
    info!("starting congestion simulation");
    let mut model = CongestionFieldModel::new(rng);

    loop {
        let batch = model.tick(Utc::now());
        match push_batch(sink.as_ref(), tables::ZONES_CONGESTION, &batch).await {
            Ok(()) => info!("updated congestion levels for {} zones", batch.len()),
            Err(e) => warn!("congestion tick: {e}"),
        }

        if sleep_or_shutdown(config.congestion_interval, &mut shutdown).await {
            break;
        }
    }
    info!("congestion simulation stopped");
}

async fn run_anomaly_task(
    sink: Arc<dyn RecordSink>,
    source: Arc<dyn VehicleSource>,
    config: SchedulerConfig,
    mut rng: EngineRng,
    mut shutdown: watch::Receiver<bool>,
) {
    info!("starting anomaly simulation");
    let mut process = AnomalyEventProcess::new(rng.fork());

    loop {
        let snapshot = known_vehicles(source.as_ref(), config.snapshot_limit, &mut rng).await;
        let known_ids: Vec<String> = snapshot.into_iter().map(|v| v.vehicle_id).collect();

        let batch = process.tick(Utc::now(), &known_ids);
        match push_batch(sink.as_ref(), tables::ANOMALIES, &batch).await {
            Ok(()) => info!("generated {} new anomalies", batch.len()),
            Err(e) => warn!("anomaly tick: {e}"),
        }

        let wait = jittered(
            config.anomaly_interval,
            config.anomaly_jitter,
            config.min_interval,
            &mut rng,
        );
        if sleep_or_shutdown(wait, &mut shutdown).await {
            break;
        }
    }
    info!("anomaly simulation stopped");
}

async fn run_trust_task(
    sink: Arc<dyn RecordSink>,
    source: Arc<dyn VehicleSource>,
    config: SchedulerConfig,
    mut rng: EngineRng,
    mut shutdown: watch::Receiver<bool>,
) {
    info!("starting trust ledger simulation");
    let mut ledger = TrustLedger::new(rng.fork());

    loop {
        let snapshot = known_vehicles(source.as_ref(), config.snapshot_limit, &mut rng).await;
        let ledger_snapshot = to_score_snapshot(&snapshot);

        let batch = ledger.tick(Utc::now(), &ledger_snapshot);
        match push_batch(sink.as_ref(), tables::TRUST_LEDGER, &batch).await {
            Ok(()) => info!("generated {} new trust ledger entries", batch.len()),
            Err(e) => warn!("trust tick: {e}"),
        }

        let wait = jittered(
            config.trust_interval,
            config.trust_jitter,
            config.min_interval,
            &mut rng,
        );
        if sleep_or_shutdown(wait, &mut shutdown).await {
            break;
        }
    }
    info!("trust ledger simulation stopped");
}

/// Serialize and submit one batch, mapping failures into the tick taxonomy.
async fn push_batch<T: Serialize>(
    sink: &dyn RecordSink,
    table: &str,
    records: &[T],
) -> Result<(), TickError> {
    if records.is_empty() {
        return Ok(());
    }

    let batch = rows(records).map_err(TickError::Generation)?;
    match sink.insert_batch(table, batch).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(TickError::SinkUnavailable {
            table: table.to_string(),
            reason: anyhow::anyhow!("no batch chunk was accepted"),
        }),
        Err(reason) => Err(TickError::SinkUnavailable {
            table: table.to_string(),
            reason,
        }),
    }
}

/// Fetch the known-vehicle snapshot, substituting synthesized placeholder
/// vehicles for this tick when the source is empty or unavailable.
async fn known_vehicles(
    source: &dyn VehicleSource,
    limit: usize,
    rng: &mut EngineRng,
) -> Vec<KnownVehicle> {
    match source.fetch_known_vehicles(limit).await {
        Ok(snapshot) if !snapshot.is_empty() => snapshot,
        Ok(_) => {
            warn!("vehicle source returned no rows; synthesizing placeholder vehicles");
            placeholder_vehicles(rng)
        }
        Err(e) => {
            warn!("{}", TickError::SourceUnavailable(e));
            placeholder_vehicles(rng)
        }
    }
}

fn placeholder_vehicles(rng: &mut EngineRng) -> Vec<KnownVehicle> {
    (0..100)
        .map(|_| KnownVehicle {
            vehicle_id: fallback_vehicle_id(rng),
            trust_score: None,
        })
        .collect()
}

fn to_score_snapshot(snapshot: &[KnownVehicle]) -> Vec<(String, Option<i64>)> {
    snapshot
        .iter()
        .map(|v| (v.vehicle_id.clone(), v.trust_score))
        .collect()
}

/// Interval with uniform jitter applied, clamped to the configured floor.
fn jittered(base: Duration, jitter: Duration, floor: Duration, rng: &mut EngineRng) -> Duration {
    let jitter_secs = jitter.as_secs_f64();
    let offset = if jitter_secs > 0.0 {
        rng.f64_range(-jitter_secs..jitter_secs)
    } else {
        0.0
    };
    let secs = (base.as_secs_f64() + offset).max(floor.as_secs_f64());
    Duration::from_secs_f64(secs)
}

/// Sleep for `wait`, returning true if shutdown was signaled first.
async fn sleep_or_shutdown(wait: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    if *shutdown.borrow() {
        return true;
    }
    tokio::select! {
        _ = tokio::time::sleep(wait) => false,
        _ = shutdown.changed() => true,
    }
}
