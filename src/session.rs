//! Per-session cache of the loaded dataset.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::analyzers::governorate::aggregate_governorates;
use crate::analyzers::threshold::Threshold;
use crate::analyzers::transport::{classification_summary, transport_availability};
use crate::analyzers::types::{ClassificationSummary, GovernorateAggregate, TransportAvailability};
use crate::dataset::Dataset;
use crate::error::DataUnavailable;
use crate::parser::load_dataset;

/// Holds the dataset for the lifetime of a dashboard session. Loaded on the
/// first [`get`](Self::get) and reused afterwards; a failed load leaves the
/// cache empty so the next call tries again.
pub struct DatasetCache {
    source: String,
    cell: OnceCell<Arc<Dataset>>,
}

impl DatasetCache {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            cell: OnceCell::new(),
        }
    }

    /// A cache that is already populated, for callers that loaded the data
    /// themselves.
    pub fn with_dataset(dataset: Dataset) -> Self {
        Self {
            source: dataset.source.clone(),
            cell: OnceCell::new_with(Some(Arc::new(dataset))),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    pub async fn get(&self) -> Result<Arc<Dataset>, DataUnavailable> {
        let dataset = self
            .cell
            .get_or_try_init(|| async {
                info!(source = %self.source, "Loading dataset");
                match load_dataset(&self.source).await {
                    Ok(dataset) => Ok(Arc::new(dataset)),
                    Err(e) => {
                        warn!(source = %self.source, error = %e, "Dataset load failed");
                        Err(e)
                    }
                }
            })
            .await?;
        Ok(Arc::clone(dataset))
    }
}

/// Both views derived from one dataset at one threshold.
#[derive(Debug, Clone)]
pub struct DashboardViews {
    pub governorates: Vec<GovernorateAggregate>,
    pub transport: TransportAvailability,
    pub filtered: TransportAvailability,
    pub classification: ClassificationSummary,
    pub threshold: Threshold,
}

impl DashboardViews {
    /// Recomputes every view from scratch.
    pub fn compute(dataset: &Dataset, threshold: Threshold) -> Self {
        let transport = transport_availability(&dataset.records);
        Self {
            governorates: aggregate_governorates(&dataset.records),
            filtered: threshold.apply(&transport),
            transport,
            classification: classification_summary(&dataset.records),
            threshold,
        }
    }
}
