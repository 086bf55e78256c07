//! Game detection and profile caching.
//!
//! A [`Detector`] walks an explicit launcher table, resolves each launcher's
//! install directory, lists its library into an owned [`GameTable`] and hands
//! out [`GameProfile`](vrconvert_types::GameProfile)s through a
//! [`ProfileCache`] that classifies each game at most once.

pub mod cache;
pub mod detector;
pub mod error;
pub mod table;

// Re-export primary types.
pub use cache::ProfileCache;
pub use detector::{Detector, LauncherScan, ScanReport};
pub use error::DetectorError;
pub use table::GameTable;
