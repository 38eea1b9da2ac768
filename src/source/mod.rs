//! Loading the reference rate table and answering lookups against it.

pub mod archive;
pub mod download;
pub mod util;

use crate::core::config::SourceConfig;
use crate::core::{LookupError, RateQuery, RateResult, RateTable};
use anyhow::{Context, Result};
use archive::Unzipper;
use download::ZipDownloader;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};

/// Downloads the archive, extracts the CSV and parses it.
pub async fn load_rate_table(config: &SourceConfig) -> Result<RateTable> {
    let zipped = ZipDownloader::new(&config.zip_url)
        .with_retries(config.retries, config.retry_delay_ms)
        .with_timeout(Duration::from_millis(config.request_timeout_ms))
        .fetch()
        .await?;
    let csv = Unzipper::new(&config.file_to_extract).extract(&zipped)?;
    let table = RateTable::from_csv(csv.as_slice())
        .with_context(|| format!("Failed to parse {}", config.file_to_extract))?;

    info!(
        currencies = table.currencies().len(),
        dates = table.len(),
        first = ?table.first_date(),
        last = ?table.last_date(),
        "Rate table loaded"
    );
    Ok(table)
}

type SharedLoad = Shared<BoxFuture<'static, Result<Arc<RateTable>, LookupError>>>;

enum LoadState {
    Empty,
    Loading(SharedLoad),
    Loaded(Arc<RateTable>),
}

/// Owns the rate table for the lifetime of the process.
///
/// The table is loaded on first use and shared by every request after that.
/// Requests arriving while a load is in flight wait for that same load and
/// all see its outcome. A failed load leaves the source empty, so the next
/// lookup tries again.
pub struct RateSource {
    config: Arc<SourceConfig>,
    state: Mutex<LoadState>,
}

impl RateSource {
    pub fn new(config: SourceConfig) -> Self {
        Self {
            config: Arc::new(config),
            state: Mutex::new(LoadState::Empty),
        }
    }

    /// A source that is already loaded and never touches the network.
    pub fn from_table(table: RateTable) -> Self {
        Self {
            config: Arc::new(SourceConfig::default()),
            state: Mutex::new(LoadState::Loaded(Arc::new(table))),
        }
    }

    pub async fn is_loaded(&self) -> bool {
        matches!(*self.state.lock().await, LoadState::Loaded(_))
    }

    pub async fn table(&self) -> Result<Arc<RateTable>, LookupError> {
        let load = {
            let mut state = self.state.lock().await;
            match &*state {
                LoadState::Loaded(table) => return Ok(Arc::clone(table)),
                LoadState::Loading(load) => load.clone(),
                LoadState::Empty => {
                    let config = Arc::clone(&self.config);
                    let load = async move {
                        load_rate_table(&config).await.map(Arc::new).map_err(|e| {
                            error!("Failed to load rate table: {e:#}");
                            LookupError::from(e)
                        })
                    }
                    .boxed()
                    .shared();
                    *state = LoadState::Loading(load.clone());
                    load
                }
            }
        };

        let result = load.clone().await;

        // Only the load that is still current may settle the state
        let mut state = self.state.lock().await;
        if matches!(&*state, LoadState::Loading(current) if current.ptr_eq(&load)) {
            *state = match &result {
                Ok(table) => LoadState::Loaded(Arc::clone(table)),
                Err(_) => LoadState::Empty,
            };
        }
        result
    }

    /// Loads the table ahead of the first request. Returns whether it loaded.
    pub async fn warm_up(&self) -> bool {
        match self.table().await {
            Ok(_) => true,
            Err(e) => {
                warn!("Rate table not loaded yet, will retry on first request: {e}");
                false
            }
        }
    }

    /// Resolves the rate for a raw `date`/`currency` pair.
    ///
    /// Input is validated before the table is touched, so a malformed
    /// request never triggers a download.
    #[instrument(name = "RateLookup", skip(self))]
    pub async fn lookup(&self, date: &str, currency: &str) -> Result<RateResult, LookupError> {
        let query = RateQuery::parse(date, currency)?;
        let table = self.table().await?;
        let value = table.value(&query)?;
        Ok(RateResult::new(&query, value))
    }
}
