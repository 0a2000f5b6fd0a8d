mod common;

use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use snaplink::application::services::{LinkError, LinkService};
use snaplink::domain::clock::{Clock, ManualClock};
use snaplink::domain::entities::GoneReason;
use snaplink::infrastructure::persistence::SqliteLinkRepository;
use snaplink::infrastructure::telemetry::Telemetry;
use snaplink::utils::code_generator::ALPHABET;
use sqlx::SqlitePool;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

struct Harness {
    service: LinkService<SqliteLinkRepository>,
    clock: Arc<ManualClock>,
    telemetry: Arc<Telemetry>,
}

impl Harness {
    fn clock_now(&self) -> chrono::DateTime<Utc> {
        self.clock.now()
    }
}

fn harness(pool: SqlitePool) -> Harness {
    let clock = Arc::new(ManualClock::starting_at(
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap(),
    ));
    let telemetry = Arc::new(Telemetry::new());
    let service = LinkService::new(
        Arc::new(SqliteLinkRepository::new(Arc::new(pool))),
        clock.clone(),
        telemetry.clone(),
    );

    Harness {
        service,
        clock,
        telemetry,
    }
}

#[sqlx::test]
async fn test_create_then_resolve(pool: SqlitePool) {
    let h = harness(pool);

    let link = h
        .service
        .create_link("https://example.com/a".to_string(), None)
        .await
        .unwrap();

    assert_eq!(link.code.len(), 8);
    assert!(link.code.bytes().all(|b| ALPHABET.contains(&b)));
    assert_eq!(link.created_at, h.clock_now());
    assert_eq!(link.hit_count, 0);

    let resolved = h.service.resolve_link(&link.code).await.unwrap();
    assert_eq!(resolved.target_url, "https://example.com/a");
    assert_eq!(h.telemetry.snapshot().links_created, 1);
}

#[sqlx::test]
async fn test_custom_code_length(pool: SqlitePool) {
    let h = harness(pool);
    let service = h.service.with_code_length(12);

    let link = service
        .create_link("https://example.com".to_string(), None)
        .await
        .unwrap();

    assert_eq!(link.code.len(), 12);
}

#[sqlx::test]
async fn test_many_links_get_distinct_codes(pool: SqlitePool) {
    let h = harness(pool);
    let mut codes = HashSet::new();

    for i in 0..200 {
        let link = h
            .service
            .create_link(format!("https://example.com/{}", i), None)
            .await
            .unwrap();
        assert!(codes.insert(link.code));
    }

    assert_eq!(h.service.total_links().await.unwrap(), 200);
    assert_eq!(h.telemetry.snapshot().links_created, 200);
}

#[sqlx::test]
async fn test_same_target_twice_gets_two_codes(pool: SqlitePool) {
    let h = harness(pool);

    let a = h
        .service
        .create_link("https://example.com".to_string(), None)
        .await
        .unwrap();
    let b = h
        .service
        .create_link("https://example.com".to_string(), None)
        .await
        .unwrap();

    assert_ne!(a.code, b.code);
}

#[sqlx::test]
async fn test_resolve_unknown_code(pool: SqlitePool) {
    let h = harness(pool);

    let result = h.service.resolve_link("nope1234").await;

    assert!(matches!(result, Err(LinkError::NotFound { .. })));
}

#[sqlx::test]
async fn test_link_expires_at_exact_instant(pool: SqlitePool) {
    let h = harness(pool);
    let expires_at = h.clock_now() + ChronoDuration::seconds(60);

    let link = h
        .service
        .create_link("https://example.com".to_string(), Some(expires_at))
        .await
        .unwrap();

    h.clock.advance(Duration::from_secs(59));
    assert!(h.service.resolve_link(&link.code).await.is_ok());

    h.clock.advance(Duration::from_secs(1));
    match h.service.resolve_link(&link.code).await {
        Err(LinkError::Gone { reason, .. }) => assert_eq!(reason, GoneReason::Expired),
        other => panic!("expected Gone, got {:?}", other),
    }
}

#[sqlx::test]
async fn test_past_expiry_is_accepted_but_never_resolves(pool: SqlitePool) {
    let h = harness(pool);
    let past = h.clock_now() - ChronoDuration::hours(1);

    let link = h
        .service
        .create_link("https://example.com".to_string(), Some(past))
        .await
        .unwrap();

    assert!(matches!(
        h.service.resolve_link(&link.code).await,
        Err(LinkError::Gone {
            reason: GoneReason::Expired,
            ..
        })
    ));
}

#[sqlx::test]
async fn test_revoked_link_is_gone(pool: SqlitePool) {
    let h = harness(pool);
    let link = h
        .service
        .create_link("https://example.com".to_string(), None)
        .await
        .unwrap();

    h.service.revoke_link(&link.code).await.unwrap();

    match h.service.resolve_link(&link.code).await {
        Err(LinkError::Gone { reason, .. }) => assert_eq!(reason, GoneReason::Revoked),
        other => panic!("expected Gone, got {:?}", other),
    }
}

#[sqlx::test]
async fn test_revoke_is_idempotent(pool: SqlitePool) {
    let h = harness(pool);
    let link = h
        .service
        .create_link("https://example.com".to_string(), None)
        .await
        .unwrap();

    assert!(h.service.revoke_link(&link.code).await.is_ok());
    assert!(h.service.revoke_link(&link.code).await.is_ok());
}

#[sqlx::test]
async fn test_revoke_unknown_code(pool: SqlitePool) {
    let h = harness(pool);

    assert!(matches!(
        h.service.revoke_link("nope1234").await,
        Err(LinkError::NotFound { .. })
    ));
}

#[sqlx::test]
async fn test_revoked_and_expired_reports_revoked(pool: SqlitePool) {
    let h = harness(pool);
    let link = h
        .service
        .create_link(
            "https://example.com".to_string(),
            Some(h.clock_now() + ChronoDuration::seconds(1)),
        )
        .await
        .unwrap();

    h.service.revoke_link(&link.code).await.unwrap();
    h.clock.advance(Duration::from_secs(10));

    assert!(matches!(
        h.service.resolve_link(&link.code).await,
        Err(LinkError::Gone {
            reason: GoneReason::Revoked,
            ..
        })
    ));
}

#[sqlx::test]
async fn test_hits_are_counted_and_resolve_is_read_only(pool: SqlitePool) {
    let h = harness(pool.clone());
    let link = h
        .service
        .create_link("https://example.com".to_string(), None)
        .await
        .unwrap();

    h.service.resolve_link(&link.code).await.unwrap();
    assert_eq!(common::hit_count(&pool, &link.code).await, 0);

    for _ in 0..3 {
        h.service.increment_hits(&link.code).await.unwrap();
    }

    assert_eq!(common::hit_count(&pool, &link.code).await, 3);
    assert_eq!(h.telemetry.snapshot().redirects_served, 3);
}

#[sqlx::test]
async fn test_increment_hits_unknown_code(pool: SqlitePool) {
    let h = harness(pool);

    assert!(matches!(
        h.service.increment_hits("nope1234").await,
        Err(LinkError::NotFound { .. })
    ));
    assert_eq!(h.telemetry.snapshot().redirects_served, 0);
}

#[sqlx::test]
async fn test_active_links_tracks_lifecycle(pool: SqlitePool) {
    let h = harness(pool);
    let now = h.clock_now();

    let permanent = h
        .service
        .create_link("https://example.com/1".to_string(), None)
        .await
        .unwrap();
    h.service
        .create_link(
            "https://example.com/2".to_string(),
            Some(now + ChronoDuration::minutes(5)),
        )
        .await
        .unwrap();

    assert_eq!(h.service.active_links().await.unwrap(), 2);

    h.clock.advance(Duration::from_secs(5 * 60));
    assert_eq!(h.service.active_links().await.unwrap(), 1);

    h.service.revoke_link(&permanent.code).await.unwrap();
    assert_eq!(h.service.active_links().await.unwrap(), 0);
    assert_eq!(h.service.total_links().await.unwrap(), 2);
}

#[sqlx::test]
async fn test_health_check_fails_on_closed_pool(pool: SqlitePool) {
    let h = harness(pool.clone());

    assert!(h.service.health_check().await.is_ok());

    pool.close().await;

    assert!(matches!(
        h.service.health_check().await,
        Err(LinkError::Store { .. })
    ));
}
