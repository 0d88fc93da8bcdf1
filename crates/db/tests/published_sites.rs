//! Integration tests for the published-site repository.
//!
//! Exercises the pointer CAS semantics against a real database: lazy
//! creation at version 0, strict +1 advancement, CAS misses on stale
//! expectations, rollback repointing, and the subdomain unique constraint.

use invita_db::models::invitation::CreateInvitation;
use invita_db::models::published_site::CreatePublishedSite;
use invita_db::repositories::{InvitationRepo, PublishedSiteRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_site(pool: &PgPool, email: &str, subdomain: &str) -> CreatePublishedSite {
    let user = UserRepo::create(pool, email).await.unwrap();
    let invitation = InvitationRepo::create(
        pool,
        &CreateInvitation {
            user_id: user.id,
            layout_id: "classic".to_string(),
            data: None,
        },
    )
    .await
    .unwrap();

    CreatePublishedSite {
        invitation_id: invitation.id,
        owner_user_id: user.id,
        subdomain: subdomain.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_starts_unpublished_at_version_zero(pool: PgPool) {
    let input = seed_site(&pool, "a@example.com", "my-wedding").await;
    let site = PublishedSiteRepo::create(&pool, &input).await.unwrap();

    assert!(!site.published);
    assert_eq!(site.current_version, 0);
    assert!(site.published_at.is_none());
    assert_eq!(site.subdomain, "my-wedding");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn find_by_subdomain_and_invitation(pool: PgPool) {
    let input = seed_site(&pool, "a@example.com", "my-wedding").await;
    let site = PublishedSiteRepo::create(&pool, &input).await.unwrap();

    let by_sub = PublishedSiteRepo::find_by_subdomain(&pool, "my-wedding")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_sub.id, site.id);

    let by_inv = PublishedSiteRepo::find_by_invitation(&pool, input.invitation_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_inv.id, site.id);

    assert!(PublishedSiteRepo::find_by_subdomain(&pool, "nope")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn advance_version_sets_published_and_timestamps(pool: PgPool) {
    let input = seed_site(&pool, "a@example.com", "my-wedding").await;
    let site = PublishedSiteRepo::create(&pool, &input).await.unwrap();

    let updated = PublishedSiteRepo::advance_version(&pool, site.id, 0, 1)
        .await
        .unwrap()
        .expect("CAS should succeed from version 0");

    assert!(updated.published);
    assert_eq!(updated.current_version, 1);
    assert!(updated.published_at.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn advance_version_misses_on_stale_expectation(pool: PgPool) {
    let input = seed_site(&pool, "a@example.com", "my-wedding").await;
    let site = PublishedSiteRepo::create(&pool, &input).await.unwrap();

    PublishedSiteRepo::advance_version(&pool, site.id, 0, 1)
        .await
        .unwrap()
        .unwrap();

    // A second writer that also observed version 0 loses the race.
    let stale = PublishedSiteRepo::advance_version(&pool, site.id, 0, 1)
        .await
        .unwrap();
    assert!(stale.is_none());

    let current = PublishedSiteRepo::find_by_id(&pool, site.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.current_version, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn set_current_version_repoints_without_publishing(pool: PgPool) {
    let input = seed_site(&pool, "a@example.com", "my-wedding").await;
    let site = PublishedSiteRepo::create(&pool, &input).await.unwrap();

    PublishedSiteRepo::advance_version(&pool, site.id, 0, 1)
        .await
        .unwrap()
        .unwrap();
    let v2 = PublishedSiteRepo::advance_version(&pool, site.id, 1, 2)
        .await
        .unwrap()
        .unwrap();
    let published_at = v2.published_at;

    let rolled = PublishedSiteRepo::set_current_version(&pool, site.id, 2, 1)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(rolled.current_version, 1);
    assert!(rolled.published);
    // Rollback does not count as a publish.
    assert_eq!(rolled.published_at, published_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn subdomain_unique_constraint(pool: PgPool) {
    let first = seed_site(&pool, "a@example.com", "my-wedding").await;
    PublishedSiteRepo::create(&pool, &first).await.unwrap();

    let second = seed_site(&pool, "b@example.com", "my-wedding").await;
    let err = PublishedSiteRepo::create(&pool, &second).await.unwrap_err();

    match err {
        sqlx::Error::Database(db) => {
            assert_eq!(db.code().as_deref(), Some("23505"));
            assert!(db
                .constraint()
                .unwrap_or_default()
                .starts_with("uq_published_sites"));
        }
        other => panic!("expected unique violation, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_subdomain_rebinds(pool: PgPool) {
    let input = seed_site(&pool, "a@example.com", "my-wedding").await;
    let site = PublishedSiteRepo::create(&pool, &input).await.unwrap();

    let rebound = PublishedSiteRepo::update_subdomain(&pool, site.id, "our-wedding")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rebound.subdomain, "our-wedding");

    assert!(PublishedSiteRepo::find_by_subdomain(&pool, "my-wedding")
        .await
        .unwrap()
        .is_none());
}
