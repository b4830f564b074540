use casper::config::CasperConfig;
use casper::handlers::*;
use casper_core::{MemoryRecord, RecordKind};
use std::io::Write;
use std::path::PathBuf;
use tempfile::{NamedTempFile, TempDir};
use url::Url;

#[test]
fn test_parse_url_line_with_scheme() {
    let result = parse_url_line("https://example.com");
    assert_eq!(result, Some("https://example.com".to_string()));
}

#[test]
fn test_parse_url_line_without_scheme() {
    let result = parse_url_line("wikipedia.org");
    assert_eq!(result, Some("https://wikipedia.org".to_string()));
}

#[test]
fn test_parse_url_line_invalid() {
    let result = parse_url_line("not a valid url!!!");
    assert_eq!(result, None);
}

#[test]
fn test_load_urls_from_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut temp_file = NamedTempFile::new()?;
    writeln!(temp_file, "https://example.com")?;
    writeln!(temp_file, "# seeds below are added by hand")?;
    writeln!(temp_file, "opensource.org")?;
    writeln!(temp_file)?; // Empty line
    writeln!(temp_file, "  https://wikipedia.org  ")?;

    let path = PathBuf::from(temp_file.path());
    let urls = load_urls_from_file(&path)?;

    assert_eq!(
        urls,
        vec![
            "https://example.com",
            "https://opensource.org",
            "https://wikipedia.org"
        ]
    );

    Ok(())
}

#[test]
fn test_load_urls_from_file_empty() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file).unwrap();
    writeln!(temp_file, "   ").unwrap();

    let path = PathBuf::from(temp_file.path());
    let result = load_urls_from_file(&path);

    assert!(result.is_err());
    assert!(result.unwrap_err().contains("No valid URLs"));
}

#[test]
fn test_load_urls_from_source_urls() {
    let urls = vec![
        Url::parse("https://example.com").unwrap(),
        Url::parse("https://opensource.org/licenses").unwrap(),
    ];
    let result = load_urls_from_source(&urls, None).unwrap();

    assert_eq!(
        result,
        vec!["https://example.com/", "https://opensource.org/licenses"]
    );
}

#[test]
fn test_load_urls_from_source_no_input_uses_defaults() {
    let result = load_urls_from_source(&[], None).unwrap();
    assert!(result.is_empty());
}

#[test]
fn test_format_memories() {
    let records = vec![
        MemoryRecord::new("alice", "Pizza is great", RecordKind::Memory),
        MemoryRecord::new("alice", "Ghosts are friendly", RecordKind::Memory),
    ];

    let out = format_memories("alice", &records);

    assert!(out.starts_with("2 memories for alice"));
    assert!(out.contains("(pizza) Pizza is great"));
    assert!(out.contains("(ghosts) Ghosts are friendly"));
    assert_eq!(format_memories("bob", &[]), "No memories for bob\n");
}

#[test]
fn test_status_report_memory_backend() {
    let config = CasperConfig::default();
    let report = status_report(&config);

    assert_eq!(report.status, "online");
    assert_eq!(report.backend, "memory");
    assert!(report.autonomous.active);
    assert_eq!(report.autonomous.status, "Active");
    assert_eq!((report.users, report.memories), (0, 0));
}

#[test]
fn test_status_report_counts_sqlite_memories() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = CasperConfig::default();
    config.autonomous = false;
    config.store.sqlite_path = Some(temp_dir.path().join("casper.db"));

    let learner = casper_core::Learner::new(casper_core::open_store(&config.store));
    learner.learn("alice", "Haunted houses are cozy").unwrap();
    learner.learn("bob", "Libraries are quiet").unwrap();

    let report = status_report(&config);

    assert_eq!(report.backend, "sqlite");
    assert_eq!(report.autonomous.status, "Inactive");
    assert_eq!((report.users, report.memories), (2, 2));
}
