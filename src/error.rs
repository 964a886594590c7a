use crate::category::Dimension;
use thiserror::Error;

/// Errors raised by the chart core.
#[derive(Debug, Error)]
pub enum ChartError {
    /// The loader reported a failure; nothing is rendered.
    #[error("failed to load data: {0}")]
    DataLoad(String),

    #[error("unknown display mode '{0}' (expected 'all', 'fuel', 'doors', 'fuel-system' or 'bodyStyle')")]
    UnknownMode(String),

    #[error("no position configured for category '{key}' of dimension '{dimension}'")]
    UnknownCategory { dimension: Dimension, key: String },
}
