pub mod config;
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{load_urls_from_file, load_urls_from_source, parse_url_line};

// Re-export scan functionality from casper-core
pub use casper_core::crawl::{
    ScanOptions, ScanProgressCallback, execute_scan, extract_url_path, generate_scan_report,
};
