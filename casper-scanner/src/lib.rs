pub mod config;
pub mod enablement;
pub mod error;
pub mod fetcher;
pub mod links;
pub mod result;
pub mod safety;
pub mod scanner;
pub mod stats;

pub use config::ScannerConfig;
pub use enablement::{EnablementSource, EnablementStatus, ScanSwitch};
pub use error::ScanError;
pub use fetcher::{HttpPageSource, PageFetcher, PageSource};
pub use links::extract_links;
pub use result::{FetchOutcome, ScannedPage};
pub use safety::SafetyFilter;
pub use scanner::{PageCallback, Scanner};
pub use stats::{ScanStats, ScanStatsSnapshot};
