pub mod crawl;
pub mod data;
pub mod error;
pub mod learning;
pub mod store;
pub mod summary;

pub use crawl::{
    PageRecord, ScanOptions, ScanProgressCallback, ScanSummary, execute_scan,
    generate_scan_report,
};
pub use data::{Database, MemoryRecord, RecordKind};
pub use error::StoreError;
pub use learning::{Learner, LearningSink};
pub use store::{InMemoryStore, MemoryStore, StoreConfig, open_store};

/// Prints the startup banner.
pub fn print_banner() {
    println!(
        r#"
   ___                          _    ___
  / __|__ _ ____ __  ___ _ _   /_\  |_ _|
 | (__/ _` (_-< '_ \/ -_) '_| / _ \  | |
  \___\__,_/__/ .__/\___|_|  /_/ \_\|___|
              |_|       v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
