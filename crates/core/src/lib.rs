//! Reactive state core of the folio portfolio page.
//!
//! Hosts (a browser DOM, a terminal) feed input events into a [`Portfolio`]
//! and execute the [`folio_protocol::HostCommand`]s it returns. The core does
//! no I/O and keeps its own logical clock, so every behavior can be driven
//! deterministically from tests.

pub mod catalog;
pub mod config;
pub mod error;
pub mod navigation;
pub mod pointer;
pub mod portfolio;
pub mod presentation;
pub mod preview;
pub mod scheduler;
pub mod visibility;

pub use catalog::{Catalog, ContentError, ProjectId};
pub use config::{ConfigError, ControllerConfig};
pub use error::PortfolioError;
pub use navigation::{Navigator, SectionLocator};
pub use portfolio::Portfolio;
pub use preview::{PreviewController, PreviewState};
pub use scheduler::{Scheduler, TimerHandle, TimerKind};
pub use visibility::{RevealedSet, VisibilityTracker, measure};
