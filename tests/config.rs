use anyhow::Result;
use ironbrc::testing::temp_input;
use ironbrc::{Error, RunConfig};

#[test]
fn defaults() {
    let cfg = RunConfig::default();
    assert_eq!(cfg.worker_count, None);
    assert_eq!(cfg.chunk_size_hint, RunConfig::DEFAULT_CHUNK_SIZE);
    assert_eq!(cfg.partitions_per_worker, 1);
    assert!(!cfg.sequential);
    assert!(!cfg.buffered);
    assert!(cfg.workers() >= 1);
    assert!(cfg.validate().is_ok());
}

#[test]
fn sequential_overrides_worker_count() {
    let cfg = RunConfig {
        worker_count: Some(8),
        partitions_per_worker: 4,
        sequential: true,
        ..RunConfig::default()
    };
    assert_eq!(cfg.workers(), 1);
    assert_eq!(cfg.partitions(), 4);
}

#[test]
fn loads_partial_json() -> Result<()> {
    let file = temp_input(r#"{ "worker_count": 6, "chunk_size_hint": 4096 }"#)?;
    let cfg = RunConfig::from_json_file(file.path())?;
    assert_eq!(cfg.workers(), 6);
    assert_eq!(cfg.chunk_size_hint, 4096);
    assert_eq!(cfg.partitions_per_worker, 1);
    Ok(())
}

#[test]
fn round_trips_through_json() -> Result<()> {
    let cfg = RunConfig {
        worker_count: Some(2),
        sequential: true,
        ..RunConfig::default()
    };
    let back: RunConfig = serde_json::from_str(&serde_json::to_string(&cfg)?)?;
    assert_eq!(back, cfg);
    Ok(())
}

#[test]
fn rejects_invalid_values() {
    for cfg in [
        RunConfig {
            worker_count: Some(0),
            ..RunConfig::default()
        },
        RunConfig {
            chunk_size_hint: 0,
            ..RunConfig::default()
        },
        RunConfig {
            partitions_per_worker: 0,
            ..RunConfig::default()
        },
        RunConfig {
            chunk_size_hint: RunConfig::MAX_CHUNK_SIZE + 1,
            ..RunConfig::default()
        },
        RunConfig {
            partitions_per_worker: usize::MAX,
            ..RunConfig::default()
        },
    ] {
        assert!(matches!(cfg.validate(), Err(Error::InvalidConfig(_))), "{cfg:?}");
    }
}

#[test]
fn rejects_bad_json_file() -> Result<()> {
    let file = temp_input(r#"{ "worker_count": "four" }"#)?;
    assert!(matches!(
        RunConfig::from_json_file(file.path()),
        Err(Error::InvalidConfig(_))
    ));

    let zero = temp_input(r#"{ "chunk_size_hint": 0 }"#)?;
    assert!(matches!(
        RunConfig::from_json_file(zero.path()),
        Err(Error::InvalidConfig(_))
    ));
    Ok(())
}

#[test]
fn missing_config_file_is_read_error() -> Result<()> {
    let dir = tempfile::tempdir()?;
    assert!(matches!(
        RunConfig::from_json_file(dir.path().join("missing.json")),
        Err(Error::SourceRead { .. })
    ));
    Ok(())
}

#[test]
fn accepts_limits() {
    let cfg = RunConfig {
        chunk_size_hint: RunConfig::MAX_CHUNK_SIZE,
        partitions_per_worker: RunConfig::MAX_PARTITIONS_PER_WORKER,
        ..RunConfig::default()
    };
    assert!(cfg.validate().is_ok());
}

#[test]
fn partitions_saturate() {
    let cfg = RunConfig {
        worker_count: Some(usize::MAX),
        partitions_per_worker: 4,
        ..RunConfig::default()
    };
    assert_eq!(cfg.partitions(), usize::MAX);
}

#[test]
fn loads_buffered_flag() -> Result<()> {
    let file = temp_input(r#"{ "buffered": true, "sequential": true }"#)?;
    let cfg = RunConfig::from_json_file(file.path())?;
    assert!(cfg.buffered);
    assert_eq!(cfg.workers(), 1);
    Ok(())
}
