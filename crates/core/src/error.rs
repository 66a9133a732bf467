use thiserror::Error;

use crate::catalog::ContentError;
use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum PortfolioError {
    #[error("content: {0}")]
    Content(#[from] ContentError),
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("no project at index {index} (catalog has {len})")]
    UnknownProject { index: usize, len: usize },
}
