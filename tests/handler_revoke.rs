mod common;

use sqlx::SqlitePool;

#[sqlx::test]
async fn test_revoke_link(pool: SqlitePool) {
    common::create_test_link(&pool, "torevoke", "https://example.com").await;
    let server = common::test_server(common::create_test_state(pool));

    let response = server
        .delete("/torevoke")
        .add_header("X-API-Key", common::TEST_API_KEY)
        .await;

    assert_eq!(response.status_code(), 204);

    let redirect = server.get("/torevoke").await;
    assert_eq!(redirect.status_code(), 410);
}

#[sqlx::test]
async fn test_revoke_twice(pool: SqlitePool) {
    common::create_test_link(&pool, "twice123", "https://example.com").await;
    let server = common::test_server(common::create_test_state(pool));

    for _ in 0..2 {
        let response = server
            .delete("/twice123")
            .add_header("X-API-Key", common::TEST_API_KEY)
            .await;
        assert_eq!(response.status_code(), 204);
    }
}

#[sqlx::test]
async fn test_revoke_not_found(pool: SqlitePool) {
    let server = common::test_server(common::create_test_state(pool));

    let response = server
        .delete("/missing1")
        .add_header("X-API-Key", common::TEST_API_KEY)
        .await;

    assert_eq!(response.status_code(), 404);
}

#[sqlx::test]
async fn test_revoke_requires_api_key(pool: SqlitePool) {
    common::create_test_link(&pool, "guarded1", "https://example.com").await;
    let server = common::test_server(common::create_test_state(pool));

    let response = server.delete("/guarded1").await;

    assert_eq!(response.status_code(), 401);

    // The link keeps resolving and the public route stays open.
    let redirect = server.get("/guarded1").await;
    assert_eq!(redirect.status_code(), 307);
}
