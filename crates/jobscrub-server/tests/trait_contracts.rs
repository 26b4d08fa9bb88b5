//! Trait contract tests for BuildServer.
//!
//! These tests verify the behavioral contract of the build-server trait
//! using the in-memory fake. Any conforming implementation must behave the
//! same way.

use jobscrub_server::fakes::MemoryBuildServer;
use jobscrub_server::{BuildServer, ServerError};
use regex::Regex;

#[tokio::test]
async fn list_jobs_preserves_seeding_order() {
    let server = MemoryBuildServer::new()
        .with_job("build-x", 3, 1_700_000_000_000)
        .with_unbuilt_job("fresh")
        .with_job("nightly-y", 9, 1_700_000_100_000);

    let jobs = server.list_jobs().await.unwrap();
    let names: Vec<&str> = jobs.iter().map(|job| job.name.as_str()).collect();

    assert_eq!(names, vec!["build-x", "fresh", "nightly-y"]);
}

#[tokio::test]
async fn get_job_info_returns_last_build_pointer() {
    let server = MemoryBuildServer::new().with_job("deploy", 42, 1_700_000_000_000);

    let info = server.get_job_info("deploy").await.unwrap();

    assert_eq!(info.name, "deploy");
    assert_eq!(info.last_build.unwrap().number, 42);
}

#[tokio::test]
async fn get_job_info_never_built_is_none_not_error() {
    let server = MemoryBuildServer::new().with_unbuilt_job("fresh");

    let info = server.get_job_info("fresh").await.unwrap();

    assert!(info.last_build.is_none());
}

#[tokio::test]
async fn get_job_info_unknown_name_is_not_found() {
    let server = MemoryBuildServer::new();

    let err = server.get_job_info("ghost").await.unwrap_err();

    assert!(matches!(err, ServerError::NotFound(_)));
}

#[tokio::test]
async fn get_build_info_returns_timestamp() {
    let server = MemoryBuildServer::new().with_job("deploy", 42, 1_700_000_000_000);

    let build = server.get_build_info("deploy", 42).await.unwrap();

    assert_eq!(build.number, 42);
    assert_eq!(build.timestamp, 1_700_000_000_000);
}

#[tokio::test]
async fn get_build_info_wrong_number_is_not_found() {
    let server = MemoryBuildServer::new().with_job("deploy", 42, 1_700_000_000_000);

    let err = server.get_build_info("deploy", 41).await.unwrap_err();

    assert!(matches!(err, ServerError::NotFound(_)));
}

#[tokio::test]
async fn delete_job_records_and_removes() {
    let server = MemoryBuildServer::new().with_job("stale", 1, 1_600_000_000_000);

    server.delete_job("stale").await.unwrap();

    assert_eq!(server.deleted_jobs(), vec!["stale".to_string()]);
    assert!(matches!(
        server.get_job_info("stale").await.unwrap_err(),
        ServerError::NotFound(_)
    ));
}

#[tokio::test]
async fn delete_job_failure_leaves_job_in_place() {
    let server = MemoryBuildServer::new()
        .with_job("protected", 1, 1_600_000_000_000)
        .with_failing_delete("protected");

    let err = server.delete_job("protected").await.unwrap_err();

    assert!(matches!(err, ServerError::Deletion { .. }));
    assert!(server.deleted_jobs().is_empty());
    assert!(server.get_job_info("protected").await.is_ok());
}

#[tokio::test]
async fn offline_server_fails_with_connection_error() {
    let server = MemoryBuildServer::new()
        .with_job("build-x", 1, 1_600_000_000_000)
        .offline();

    assert!(matches!(
        server.list_jobs().await.unwrap_err(),
        ServerError::Connection(_)
    ));
    assert!(matches!(
        server.delete_job("build-x").await.unwrap_err(),
        ServerError::Connection(_)
    ));
}

#[tokio::test]
async fn jobs_matching_filters_with_unanchored_search() {
    let server = MemoryBuildServer::new()
        .with_job("nightly-build", 1, 1_600_000_000_000)
        .with_job("release", 2, 1_600_000_000_000)
        .with_job("old-nightly", 3, 1_600_000_000_000);

    let pattern = Regex::new("nightly").unwrap();
    let jobs = server.jobs_matching(&pattern).await.unwrap();
    let names: Vec<&str> = jobs.iter().map(|job| job.name.as_str()).collect();

    assert_eq!(names, vec!["nightly-build", "old-nightly"]);
}
