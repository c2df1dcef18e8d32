#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use assert_cmd::cargo_bin_cmd;
use predicates::prelude::predicate;

/// Minimal catalog with one late-night program crossing midnight.
const SEED_JSON: &str = r#"{
    "streams": [{"id": "st1", "numberOfChunks": 60}],
    "series": [{
        "id": "s1", "title": "Night Drama",
        "description": "d", "thumbnailUrl": "/t/s1.webp"
    }],
    "episodes": [{
        "id": "e1", "title": "Episode 1", "description": "d",
        "thumbnailUrl": "/t/e1.webp", "order": 1,
        "seriesId": "s1", "streamId": "st1", "premium": false
    }],
    "channels": [{"id": "c1", "name": "One", "logoUrl": "/l/c1.svg"}],
    "programs": [{
        "id": "p1", "title": "LateNightDrama", "description": "d",
        "startAt": "23:30:00", "endAt": "00:00:00",
        "thumbnailUrl": "/t/p1.webp", "channelId": "c1", "episodeId": "e1"
    }]
}"#;

#[test]
fn test_db_seed_help() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("telecast");
    cmd.args(["db", "seed", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--file"));
}

#[test]
fn test_db_schedule_help() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("telecast");
    cmd.args(["db", "schedule", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--channel"));
}

#[test]
fn test_db_seed_missing_file_fails() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("telecast");
    cmd.args(["--dir", dir.path().to_str().unwrap()])
        .args(["db", "seed", "--file", "/nonexistent/seed.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn test_db_schedule_without_channel_or_config_fails() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("telecast");
    cmd.args(["--dir", dir.path().to_str().unwrap()])
        .args(["db", "schedule"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no channel specified"));
}

#[test]
fn test_db_seed_then_schedule_with_rollover() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let seed_path = dir.path().join("seed.json");
    std::fs::write(&seed_path, SEED_JSON).unwrap();

    // Act: seed
    let mut seed = cargo_bin_cmd!("telecast");
    seed.args(["--dir", dir.path().to_str().unwrap()])
        .args(["db", "seed", "--file", seed_path.to_str().unwrap()])
        .args(["--date", "2024-05-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Seed load complete"));

    // Act: schedule on the same reference date
    let mut schedule = cargo_bin_cmd!("telecast");
    schedule
        .args(["--dir", dir.path().to_str().unwrap()])
        .args(["db", "schedule", "--channel", "c1", "--date", "2024-05-01"])
        .assert()
        .success()
        // Assert: midnight end rolled over to the next day
        .stdout(predicate::str::contains("LateNightDrama"))
        .stdout(predicate::str::contains("2024-05-01 23:30:00"))
        .stdout(predicate::str::contains("2024-05-02 00:00:00"));
}

#[test]
fn test_db_seed_rejects_dangling_reference() {
    // Arrange: program references a channel that is not in the seed
    let dir = tempfile::tempdir().unwrap();
    let seed_path = dir.path().join("seed.json");
    let broken = SEED_JSON.replace(r#""channelId": "c1""#, r#""channelId": "c9""#);
    std::fs::write(&seed_path, broken).unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("telecast");
    cmd.args(["--dir", dir.path().to_str().unwrap()])
        .args(["db", "seed", "--file", seed_path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to insert programs"));
}

#[test]
fn test_db_series_lists_episodes() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let seed_path = dir.path().join("seed.json");
    std::fs::write(&seed_path, SEED_JSON).unwrap();
    let mut seed = cargo_bin_cmd!("telecast");
    seed.args(["--dir", dir.path().to_str().unwrap()])
        .args(["db", "seed", "--file", seed_path.to_str().unwrap()])
        .assert()
        .success();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("telecast");
    cmd.args(["--dir", dir.path().to_str().unwrap()])
        .args(["db", "series", "--id", "s1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Night Drama"))
        .stdout(predicate::str::contains("Episode 1"));
}
