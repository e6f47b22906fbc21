//! End-to-end tests for the lockout flow an authentication handler drives.

use chrono::{Duration, Utc};
use portcullis::{Identity, LockoutConfig, LockoutRecord, Portcullis};

fn identity() -> Identity {
    Identity::new("user@example.com", "203.0.113.7")
}

#[tokio::test]
async fn test_unknown_identity_reads_as_zero_valued() {
    let portcullis = Portcullis::with_defaults();

    let record = portcullis.lockout_status(identity()).await;
    assert_eq!(record, LockoutRecord::default());
    assert!(!portcullis.is_locked(identity()).await);
}

#[tokio::test]
async fn test_lockout_after_limit_failures() {
    let portcullis = Portcullis::new(LockoutConfig::default().with_max_failed_attempts(3));

    portcullis.record_failed_attempt(identity()).await;
    assert_eq!(portcullis.remaining_attempts(identity()).await, 2);
    portcullis.record_failed_attempt(identity()).await;
    assert_eq!(portcullis.remaining_attempts(identity()).await, 1);
    portcullis.record_failed_attempt(identity()).await;

    let record = portcullis.lockout_status(identity()).await;
    assert!(record.locked);
    assert_eq!(record.attempts, 0);
    assert_eq!(record.locks, 1);
    assert!(portcullis.is_locked(identity()).await);
    assert!(record.retry_after_seconds().is_some());
}

#[tokio::test]
async fn test_escalation_windows_are_cumulative() {
    let portcullis = Portcullis::new(LockoutConfig::default().with_max_failed_attempts(1));

    // First episode: 20 × 1³ = 20 minutes.
    let before = Utc::now();
    portcullis.record_failed_attempt(identity()).await;
    let record = portcullis.lockout_status(identity()).await;
    let after = Utc::now();

    let unlock_at = record.unlock_at.expect("First episode should set unlock_at");
    assert_eq!(record.locks, 1);
    assert!(unlock_at >= before + Duration::minutes(20));
    assert!(unlock_at <= after + Duration::minutes(20));

    // Second episode: 20 × (1³ + 2³) = 180 minutes from its own
    // registration time.
    let before = Utc::now();
    portcullis.record_failed_attempt(identity()).await;
    let record = portcullis.lockout_status(identity()).await;
    let after = Utc::now();

    let unlock_at = record.unlock_at.expect("Second episode should set unlock_at");
    assert_eq!(record.locks, 2);
    assert!(unlock_at >= before + Duration::minutes(180));
    assert!(unlock_at <= after + Duration::minutes(180));
}

#[tokio::test]
async fn test_clear_lockout_preserves_endured_episodes() {
    let portcullis = Portcullis::new(LockoutConfig::default().with_max_failed_attempts(2));

    for _ in 0..2 {
        portcullis.record_failed_attempt(identity()).await;
    }
    assert!(portcullis.is_locked(identity()).await);

    portcullis.clear_lockout(identity()).await;

    let record = portcullis.lockout_status(identity()).await;
    assert!(!record.locked);
    assert_eq!(record.unlock_at, None);
    assert_eq!(record.attempts, 0);
    assert_eq!(record.locks, 1);
}

#[tokio::test]
async fn test_successful_login_forgives_one_episode() {
    let portcullis = Portcullis::new(LockoutConfig::default().with_max_failed_attempts(1));

    // Two endured episodes.
    portcullis.record_failed_attempt(identity()).await;
    portcullis.record_failed_attempt(identity()).await;
    assert_eq!(portcullis.lockout_status(identity()).await.locks, 2);

    portcullis.record_successful_login(identity()).await;
    let record = portcullis.lockout_status(identity()).await;
    assert!(!record.locked);
    assert_eq!(record.locks, 1);

    // Forgiving the last episode deletes the record entirely.
    portcullis.record_successful_login(identity()).await;
    let record = portcullis.lockout_status(identity()).await;
    assert_eq!(record, LockoutRecord::default());
}

#[tokio::test]
async fn test_is_locked_self_heals_once_window_elapses() {
    // A zero base window makes every lockout expire immediately.
    let config = LockoutConfig::default()
        .with_max_failed_attempts(1)
        .with_base_minutes(0);
    let portcullis = Portcullis::new(config);

    portcullis.record_failed_attempt(identity()).await;
    assert!(portcullis.lockout_status(identity()).await.locked);

    // The elapsed window is observed and cleared in one call.
    assert!(!portcullis.is_locked(identity()).await);

    let record = portcullis.lockout_status(identity()).await;
    assert!(!record.locked);
    assert_eq!(record.attempts, 0);
    assert_eq!(record.locks, 1);
}

#[tokio::test]
async fn test_identities_do_not_cross_contaminate() {
    let portcullis = Portcullis::new(LockoutConfig::default().with_max_failed_attempts(4));

    let mut tasks = Vec::new();
    for i in 0..10 {
        let portcullis = portcullis.clone();
        tasks.push(tokio::spawn(async move {
            let identity = Identity::new(format!("user{i}@example.com"), format!("10.0.0.{i}"));
            for _ in 0..3 {
                portcullis.record_failed_attempt(identity.clone()).await;
            }
            identity
        }));
    }

    for task in tasks {
        let identity = task.await.expect("Task panicked");
        let record = portcullis.lockout_status(identity.clone()).await;
        assert!(!record.locked, "{identity} saw foreign attempts");
        assert_eq!(record.attempts, 3);
        assert_eq!(record.locks, 0);
    }
}
