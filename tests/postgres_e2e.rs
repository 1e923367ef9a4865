// End-to-end tests against a real PostgreSQL. Ignored by default; run with
//
//   DATABASE_URL=postgres://... cargo test -- --ignored
//
// Wallets are generated per test so runs do not collide.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use arena_server::{
    app_state::AppState,
    config::{Config, DatabaseConfig, ServerConfig},
    database::Database,
    error::AppError,
    validation::{NewComment, NewPost, NewUser, PageRequest, UserPatch},
};

async fn state() -> AppState {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must point at a test PostgreSQL");
    let database = Database::connect(&url).await.expect("connect");
    database.init().await.expect("schema init");
    let config = Config {
        database: DatabaseConfig { url },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
    };
    AppState::with_database(Arc::new(database), config)
}

fn unique_wallet() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("0x{:040x}", nanos)
}

fn new_post(wallet: &str, content: &str) -> NewPost {
    NewPost {
        wallet_address: wallet.to_string(),
        content: content.to_string(),
    }
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (set DATABASE_URL)"]
async fn created_post_round_trips_through_detail() {
    let state = state().await;
    let wallet = unique_wallet();

    let post = state
        .posts
        .create_post(new_post(&wallet, "first post"))
        .await
        .unwrap();

    let detail = state
        .posts
        .get_post_by_id(post.id)
        .await
        .unwrap()
        .expect("post should exist");

    assert_eq!(detail.post.id, post.id);
    assert_eq!(detail.post.content, "first post");
    assert_eq!(detail.post.wallet_address, wallet.to_lowercase());
    assert_eq!(detail.post.timestamp, post.timestamp);
    assert!(detail.likes.is_empty());
    assert!(detail.comments.is_empty());
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (set DATABASE_URL)"]
async fn missing_post_is_none_not_an_error() {
    let state = state().await;
    let detail = state.posts.get_post_by_id(i64::MAX).await.unwrap();
    assert!(detail.is_none());
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (set DATABASE_URL)"]
async fn second_like_from_same_wallet_conflicts() {
    let state = state().await;
    let author = unique_wallet();
    let liker = unique_wallet();

    let post = state
        .posts
        .create_post(new_post(&author, "like me"))
        .await
        .unwrap();

    let like = state.posts.like_post(post.id, &liker).await.unwrap();
    assert_eq!(like.post_id, post.id);
    assert_eq!(like.wallet_address, liker.to_lowercase());

    // Address case must not defeat deduplication.
    let err = state
        .posts
        .like_post(post.id, &liker.to_uppercase().replace("0X", "0x"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DuplicateLike));

    let detail = state.posts.get_post_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(detail.likes.len(), 1);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (set DATABASE_URL)"]
async fn concurrent_identical_likes_yield_exactly_one_row() {
    let state = state().await;
    let author = unique_wallet();
    let liker = unique_wallet();

    let post = state
        .posts
        .create_post(new_post(&author, "race me"))
        .await
        .unwrap();

    // Both tasks can pass the fast-path check; the composite key decides.
    let a = state.posts.clone();
    let b = state.posts.clone();
    let (wallet_a, wallet_b) = (liker.clone(), liker.clone());
    let (res_a, res_b) = tokio::join!(
        tokio::spawn(async move { a.like_post(post.id, &wallet_a).await }),
        tokio::spawn(async move { b.like_post(post.id, &wallet_b).await }),
    );
    let results = [res_a.unwrap(), res_b.unwrap()];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(AppError::DuplicateLike)))
        .count();
    assert_eq!(successes, 1);
    assert_eq!(conflicts, 1);

    let detail = state.posts.get_post_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(detail.likes.len(), 1);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (set DATABASE_URL)"]
async fn liking_a_missing_post_is_rejected() {
    let state = state().await;
    let err = state
        .posts
        .like_post(i64::MAX, &unique_wallet())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::PostNotFound));
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (set DATABASE_URL)"]
async fn commenting_on_a_missing_post_is_rejected() {
    let state = state().await;
    let err = state
        .posts
        .create_comment(
            i64::MAX,
            NewComment {
                wallet_address: unique_wallet(),
                content: "hello?".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::PostNotFound));
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (set DATABASE_URL)"]
async fn feed_is_newest_first_with_full_total() {
    let state = state().await;
    let wallet = unique_wallet();

    let mut created = Vec::new();
    for i in 0..3 {
        created.push(
            state
                .posts
                .create_post(new_post(&wallet, &format!("feed post {}", i)))
                .await
                .unwrap(),
        );
    }

    let page = state
        .posts
        .get_posts(PageRequest { page: 1, limit: 2 })
        .await
        .unwrap();
    assert_eq!(page.posts.len(), 2);
    assert!(page.total >= 3, "total counts all rows, not the page");

    // Newest first with id as the tie-break, so order is fully deterministic.
    let feed = state
        .posts
        .get_posts(PageRequest {
            page: 1,
            limit: 100,
        })
        .await
        .unwrap();
    for pair in feed.posts.windows(2) {
        assert!(
            (pair[0].timestamp, pair[0].id) >= (pair[1].timestamp, pair[1].id),
            "feed must be ordered by (timestamp, id) descending"
        );
    }
    let mine: Vec<i64> = feed
        .posts
        .iter()
        .filter(|p| p.wallet_address == wallet.to_lowercase())
        .map(|p| p.id)
        .collect();
    let expected: Vec<i64> = created.iter().rev().map(|p| p.id).collect();
    assert_eq!(mine, expected);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (set DATABASE_URL)"]
async fn registration_is_case_folded_and_conflicts_on_repeat() {
    let state = state().await;
    let wallet = unique_wallet().to_uppercase().replace("0X", "0x");

    let user = state
        .users
        .create_user(NewUser {
            wallet_address: wallet.clone(),
            username: Some("casefold".to_string()),
            bio: None,
            profile_pic_url: None,
        })
        .await
        .unwrap();
    assert_eq!(user.wallet_address, wallet.to_lowercase());

    let err = state
        .users
        .create_user(NewUser {
            wallet_address: wallet.to_lowercase(),
            username: None,
            bio: None,
            profile_pic_url: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::UserAlreadyExists));

    // Lookup with the original casing still finds the row.
    let found = state.users.verify_user(&wallet).await.unwrap();
    assert!(found.is_some());
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (set DATABASE_URL)"]
async fn update_merges_only_provided_fields() {
    let state = state().await;
    let wallet = unique_wallet();

    state
        .users
        .create_user(NewUser {
            wallet_address: wallet.clone(),
            username: Some("before".to_string()),
            bio: Some("old bio".to_string()),
            profile_pic_url: None,
        })
        .await
        .unwrap();

    let updated = state
        .users
        .update_user(
            &wallet,
            UserPatch {
                username: None,
                bio: Some("new bio".to_string()),
                profile_pic_url: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.username.as_deref(), Some("before"));
    assert_eq!(updated.bio.as_deref(), Some("new bio"));
    assert!(updated.profile_pic_url.is_none());
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (set DATABASE_URL)"]
async fn update_on_unknown_wallet_is_not_found_and_creates_nothing() {
    let state = state().await;
    let wallet = unique_wallet();

    let err = state
        .users
        .update_user(
            &wallet,
            UserPatch {
                username: Some("ghost".to_string()),
                bio: None,
                profile_pic_url: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::UserNotFound));

    // The failed update must not have created a row as a side effect.
    assert!(state.users.verify_user(&wallet).await.unwrap().is_none());
}
