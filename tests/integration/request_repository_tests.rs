//! Request repository integration tests
//!
//! Covers persistence, ordering, the foreign-key delete policies and the
//! pending-time predicates evaluated against stored rows.

use chrono::{Duration, Utc};
use uuid::Uuid;

use startup_requests::db::message_repository::MessageRepository;
use startup_requests::db::migrations::check_migrations;
use startup_requests::db::request_repository::RequestRepository;
use startup_requests::models::NewRequest;
use startup_requests::AppError;

use crate::common::{backdate_request, MessageFactory, TestDb};

#[tokio::test]
async fn test_create_and_fetch_request() {
    let db = TestDb::new().await;
    let repo = RequestRepository::new(&db.pool);

    let created = db.create_request().await;
    let fetched = repo
        .get_by_id(created.id)
        .await
        .unwrap()
        .expect("request should exist");

    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.user_id, db.user_id);
    assert_eq!(fetched.service_id, db.service_id);
    assert_eq!(fetched.organization_id, None);
    assert!(Utc::now() - fetched.created_at < Duration::seconds(5));
}

#[tokio::test]
async fn test_get_by_id_missing_returns_none() {
    let db = TestDb::new().await;
    let repo = RequestRepository::new(&db.pool);

    let found = repo.get_by_id(Uuid::new_v4()).await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_list_orders_most_recent_first() {
    let db = TestDb::new().await;
    let repo = RequestRepository::new(&db.pool);

    let oldest = db.create_request().await;
    let middle = db.create_request().await;
    let newest = db.create_request().await;

    backdate_request(&db.pool, oldest.id, 3).await;
    backdate_request(&db.pool, middle.id, 2).await;
    backdate_request(&db.pool, newest.id, 1).await;

    let listed = repo.list().await.unwrap();
    let ids: Vec<Uuid> = listed.iter().map(|r| r.id).collect();

    assert_eq!(ids, vec![newest.id, middle.id, oldest.id]);
}

#[tokio::test]
async fn test_list_for_user_filters_by_owner() {
    let db = TestDb::new().await;
    let repo = RequestRepository::new(&db.pool);

    let mine = db.create_request().await;

    let other_user = db.seed_extra_user().await;
    repo.create(&NewRequest {
        user_id: other_user,
        organization_id: None,
        service_id: db.service_id,
    })
    .await
    .unwrap();

    let listed = repo.list_for_user(db.user_id).await.unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, mine.id);
}

#[tokio::test]
async fn test_assign_organization_sets_and_clears_link() {
    let db = TestDb::new().await;
    let repo = RequestRepository::new(&db.pool);

    let request = db.create_request().await;

    let attached = repo
        .assign_organization(request.id, Some(db.organization_id))
        .await
        .unwrap()
        .expect("request should exist");
    assert_eq!(attached.organization_id, Some(db.organization_id));

    let detached = repo
        .assign_organization(request.id, None)
        .await
        .unwrap()
        .expect("request should exist");
    assert_eq!(detached.organization_id, None);
}

#[tokio::test]
async fn test_assign_organization_missing_returns_none() {
    let db = TestDb::new().await;
    let repo = RequestRepository::new(&db.pool);

    let result = repo
        .assign_organization(Uuid::new_v4(), Some(db.organization_id))
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_saving_refreshes_created_at() {
    let db = TestDb::new().await;
    let repo = RequestRepository::new(&db.pool);

    let request = db.create_request().await;
    backdate_request(&db.pool, request.id, 10).await;

    let stale = repo.get_by_id(request.id).await.unwrap().unwrap();

    let updated = repo
        .assign_organization(request.id, Some(db.organization_id))
        .await
        .unwrap()
        .unwrap();

    // The stamp doubles as last-modified: any save restarts the clock.
    assert!(updated.created_at > stale.created_at);
    assert!(Utc::now() - updated.created_at < Duration::seconds(5));
}

#[tokio::test]
async fn test_delete_request() {
    let db = TestDb::new().await;
    let repo = RequestRepository::new(&db.pool);

    let request = db.create_request().await;

    assert!(repo.delete(request.id).await.unwrap());
    assert!(repo.get_by_id(request.id).await.unwrap().is_none());
    assert!(!repo.delete(request.id).await.unwrap());
}

#[tokio::test]
async fn test_deleting_user_cascades_to_requests() {
    let db = TestDb::new().await;
    let repo = RequestRepository::new(&db.pool);

    let request = db.create_request().await;

    sqlx::query("DELETE FROM auth_user WHERE id = ?")
        .bind(db.user_id.to_string())
        .execute(&db.pool)
        .await
        .unwrap();

    assert!(repo.get_by_id(request.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_deleting_service_cascades_to_requests() {
    let db = TestDb::new().await;
    let repo = RequestRepository::new(&db.pool);

    let request = db.create_request().await;

    sqlx::query("DELETE FROM startup_service WHERE id = ?")
        .bind(db.service_id.to_string())
        .execute(&db.pool)
        .await
        .unwrap();

    assert!(repo.get_by_id(request.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_deleting_organization_detaches_requests() {
    let db = TestDb::new().await;
    let repo = RequestRepository::new(&db.pool);

    let request = db.create_request_in_org().await;
    assert_eq!(request.organization_id, Some(db.organization_id));

    sqlx::query("DELETE FROM startup_organization WHERE id = ?")
        .bind(db.organization_id.to_string())
        .execute(&db.pool)
        .await
        .unwrap();

    // SET NULL policy: the request survives, the link does not.
    let survivor = repo.get_by_id(request.id).await.unwrap().unwrap();
    assert_eq!(survivor.organization_id, None);
}

#[tokio::test]
async fn test_deleting_user_cascades_through_to_message() {
    let db = TestDb::new().await;
    let requests = RequestRepository::new(&db.pool);
    let messages = MessageRepository::new(&db.pool);

    let request = db.create_request().await;
    let message = messages
        .create(&MessageFactory::new().create(request.id).build())
        .await
        .unwrap();

    sqlx::query("DELETE FROM auth_user WHERE id = ?")
        .bind(db.user_id.to_string())
        .execute(&db.pool)
        .await
        .unwrap();

    // user -> request -> message, two cascades deep.
    assert!(requests.get_by_id(request.id).await.unwrap().is_none());
    assert!(messages.get_by_id(message.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_deleting_request_deletes_its_message() {
    let db = TestDb::new().await;
    let requests = RequestRepository::new(&db.pool);
    let messages = MessageRepository::new(&db.pool);

    let request = db.create_request().await;
    let message = messages
        .create(&MessageFactory::new().create(request.id).build())
        .await
        .unwrap();

    assert!(requests.delete(request.id).await.unwrap());
    assert!(messages.get_by_id(message.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_get_message_for_request() {
    let db = TestDb::new().await;
    let requests = RequestRepository::new(&db.pool);
    let messages = MessageRepository::new(&db.pool);

    let request = db.create_request().await;
    assert!(requests.get_message(request.id).await.unwrap().is_none());

    let message = messages
        .create(&MessageFactory::new().create(request.id).build())
        .await
        .unwrap();

    let attached = requests
        .get_message(request.id)
        .await
        .unwrap()
        .expect("message should be attached");
    assert_eq!(attached.id, message.id);
    assert_eq!(attached.related_request_id, request.id);
}

#[tokio::test]
async fn test_create_with_unknown_user_fails() {
    let db = TestDb::new().await;
    let repo = RequestRepository::new(&db.pool);

    let err = repo
        .create(&NewRequest {
            user_id: Uuid::new_v4(),
            organization_id: None,
            service_id: db.service_id,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Database(_)));
}

#[tokio::test]
async fn test_pending_predicates_against_stored_rows() {
    let db = TestDb::new().await;
    let repo = RequestRepository::new(&db.pool);

    let fresh = db.create_request().await;
    let fetched = repo.get_by_id(fresh.id).await.unwrap().unwrap();
    assert!(fetched.is_newly_requested().unwrap());
    assert!(!fetched.is_pending_too_long().unwrap());

    let aged = db.create_request().await;
    backdate_request(&db.pool, aged.id, 31).await;
    let fetched = repo.get_by_id(aged.id).await.unwrap().unwrap();
    assert!(!fetched.is_newly_requested().unwrap());
    assert!(fetched.is_pending_too_long().unwrap());
}

#[tokio::test]
async fn test_migrated_schema_has_expected_tables() {
    let db = TestDb::new().await;
    assert!(check_migrations(&db.pool).await.unwrap());
}
