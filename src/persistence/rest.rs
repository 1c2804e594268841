//! REST persistence client
//!
//! Talks to a PostgREST-style endpoint: rows are POSTed as JSON arrays to
//! `/rest/v1/{table}`. Large batches are split into chunks with a small
//! inter-chunk delay to stay under rate limits, and a batch counts as
//! persisted when at least one chunk lands (best-effort policy).

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{info, warn};
use serde_json::Value;
use std::time::Duration;

use super::{KnownVehicle, RecordSink, VehicleSource};

/// Rows per insert request.
const DEFAULT_BATCH_SIZE: usize = 100;

/// Pause between chunks to avoid rate limits.
const CHUNK_DELAY: Duration = Duration::from_millis(500);

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    batch_size: usize,
}

impl RestClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            batch_size: DEFAULT_BATCH_SIZE,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Number of rows currently in a table, from the count header.
    pub async fn record_count(&self, table: &str) -> Result<u64> {
        let response = self
            .client
            .get(self.table_url(table))
            .query(&[("select", "count")])
            .header("apikey", &self.api_key)
            .header("Prefer", "count=exact")
            .send()
            .await
            .with_context(|| format!("count request for {table} failed"))?;

        if !response.status().is_success() {
            anyhow::bail!("count request for {table} returned {}", response.status());
        }

        let total = response
            .headers()
            .get("content-range")
            .and_then(|value| value.to_str().ok())
            .and_then(|range| range.rsplit('/').next())
            .and_then(|count| count.parse::<u64>().ok())
            .unwrap_or(0);

        Ok(total)
    }

    /// Delete all rows from a table.
    pub async fn clear_table(&self, table: &str) -> Result<()> {
        warn!("clearing all data from {table}");

        let response = self
            .client
            .delete(self.table_url(table))
            .query(&[("select", "*")])
            .header("apikey", &self.api_key)
            .send()
            .await
            .with_context(|| format!("clear request for {table} failed"))?;

        if !response.status().is_success() {
            anyhow::bail!("clear request for {table} returned {}", response.status());
        }

        info!("cleared table {table}");
        Ok(())
    }
}

#[async_trait]
impl RecordSink for RestClient {
    async fn insert_batch(&self, table: &str, records: Vec<Value>) -> Result<bool> {
        if records.is_empty() {
            warn!("no data to insert into {table}");
            return Ok(false);
        }

        info!("inserting {} records into {table}", records.len());

        let chunks: Vec<&[Value]> = records.chunks(self.batch_size).collect();
        let chunk_count = chunks.len();
        let mut accepted = 0usize;

        for (index, chunk) in chunks.into_iter().enumerate() {
            let result = self
                .client
                .post(self.table_url(table))
                .header("apikey", &self.api_key)
                .header("Prefer", "resolution=merge-duplicates")
                .json(chunk)
                .send()
                .await;

            match result {
                Ok(response) if response.status().is_success() => {
                    accepted += chunk.len();
                }
                Ok(response) => {
                    warn!(
                        "failed to insert chunk {}/{chunk_count} into {table}: status {}",
                        index + 1,
                        response.status()
                    );
                }
                Err(e) => {
                    warn!(
                        "failed to insert chunk {}/{chunk_count} into {table}: {e}",
                        index + 1
                    );
                }
            }

            if index + 1 < chunk_count {
                tokio::time::sleep(CHUNK_DELAY).await;
            }
        }

        info!(
            "inserted {accepted}/{} records into {table}",
            records.len()
        );
        Ok(accepted > 0)
    }
}

#[async_trait]
impl VehicleSource for RestClient {
    async fn fetch_known_vehicles(&self, limit: usize) -> Result<Vec<KnownVehicle>> {
        let response = self
            .client
            .get(self.table_url("vehicles"))
            .query(&[
                ("select", "vehicle_id,trust_score".to_string()),
                ("limit", limit.to_string()),
            ])
            .header("apikey", &self.api_key)
            .send()
            .await
            .context("vehicle snapshot request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("vehicle snapshot request returned {}", response.status());
        }

        response
            .json::<Vec<KnownVehicle>>()
            .await
            .context("failed to decode vehicle snapshot")
    }
}
