//! Service-level behavior of registration, login and the session lifecycle,
//! run against the in-memory store.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use api_lib::adapters::{InMemoryStore, JwtTokenService};
use common::{services, PlainHasher, TEST_SECRET};
use uuid::Uuid;
use wellness_core::domain::{SaveDraft, SessionDraft, SessionStatus};
use wellness_core::ports::{CredentialStore, PasswordHasher, PortError, PortResult, TokenService};
use wellness_core::services::{AuthService, SessionService};

#[derive(Default)]
struct CountingHasher {
    hashes: AtomicUsize,
    verifications: AtomicUsize,
}

impl PasswordHasher for CountingHasher {
    fn hash(&self, password: &str) -> PortResult<String> {
        self.hashes.fetch_add(1, Ordering::SeqCst);
        PlainHasher.hash(password)
    }

    fn verify(&self, password: &str, password_hash: &str) -> PortResult<bool> {
        self.verifications.fetch_add(1, Ordering::SeqCst);
        PlainHasher.verify(password, password_hash)
    }
}

/// Lets the clock move so refreshed timestamps compare strictly greater.
async fn tick() {
    tokio::time::sleep(Duration::from_millis(5)).await;
}

fn draft(title: &str) -> SessionDraft {
    SessionDraft::new(title, "yoga, meditation ,  wellness", "http://example.com/s.json")
}

async fn create(sessions: &SessionService, owner: Uuid, title: &str) -> Uuid {
    sessions
        .save_draft(owner, SaveDraft::Create(draft(title)))
        .await
        .unwrap()
        .id
}

//=========================================================================================
// Auth
//=========================================================================================

#[tokio::test]
async fn registering_the_same_email_twice_conflicts() {
    let (auth, _, _) = services();
    auth.register("a@x.com", "secret1").await.unwrap();
    let second = auth.register("a@x.com", "other-secret").await;
    assert!(matches!(second, Err(PortError::Conflict(_))));
}

#[tokio::test]
async fn password_is_stored_hashed() {
    let (auth, _, store) = services();
    auth.register("a@x.com", "secret1").await.unwrap();
    let creds = store.get_user_by_email("a@x.com").await.unwrap();
    assert_ne!(creds.password_hash, "secret1");
}

#[tokio::test]
async fn malformed_credentials_are_rejected() {
    let (auth, _, store) = services();
    for (email, password) in [
        ("nope", "a"),
        ("  ", "secret1"),
        ("nope", "secret1"),
        ("a@x.com", ""),
        ("a@x.com", "12345"),
    ] {
        assert!(
            matches!(auth.register(email, password).await, Err(PortError::Validation(_))),
            "{email:?}/{password:?} should be rejected"
        );
    }
    assert!(matches!(
        store.get_user_by_email("nope").await,
        Err(PortError::NotFound(_))
    ));
    assert!(matches!(
        store.get_user_by_email("a@x.com").await,
        Err(PortError::NotFound(_))
    ));
}

#[tokio::test]
async fn unknown_email_still_checks_a_password_hash() {
    let store = Arc::new(InMemoryStore::new());
    let hasher = Arc::new(CountingHasher::default());
    let auth = AuthService::new(
        store,
        hasher.clone(),
        Arc::new(JwtTokenService::new(TEST_SECRET.as_bytes())),
    );
    auth.register("a@x.com", "secret1").await.unwrap();

    assert!(matches!(auth.login("a@x.com", "wrong-pw").await, Err(PortError::Unauthorized)));
    assert_eq!(hasher.verifications.load(Ordering::SeqCst), 1);

    assert!(matches!(auth.login("ghost@x.com", "secret1").await, Err(PortError::Unauthorized)));
    assert_eq!(hasher.verifications.load(Ordering::SeqCst), 2);
    assert!(matches!(auth.login("ghost@x.com", "secret1").await, Err(PortError::Unauthorized)));
    assert_eq!(hasher.verifications.load(Ordering::SeqCst), 3);
    // One hash for the registration, one for the cached dummy.
    assert_eq!(hasher.hashes.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn login_token_decodes_to_the_registered_user() {
    let (auth, _, _) = services();
    let user = auth.register("a@x.com", "secret1").await.unwrap();
    let token = auth.login("a@x.com", "secret1").await.unwrap();

    assert_eq!(auth.authenticate(&token).unwrap(), user.id);
    let verifier = JwtTokenService::new(TEST_SECRET.as_bytes());
    assert_eq!(verifier.verify(&token).unwrap(), user.id);
}

#[tokio::test]
async fn bad_login_is_unauthorized() {
    let (auth, _, _) = services();
    auth.register("a@x.com", "secret1").await.unwrap();

    assert!(matches!(auth.login("a@x.com", "wrong").await, Err(PortError::Unauthorized)));
    assert!(matches!(auth.login("b@x.com", "secret1").await, Err(PortError::Unauthorized)));
    // Emails match exactly as stored.
    assert!(matches!(auth.login("A@x.com", "secret1").await, Err(PortError::Unauthorized)));
}

//=========================================================================================
// Sessions
//=========================================================================================

#[tokio::test]
async fn create_always_makes_a_new_draft() {
    let (_, sessions, _) = services();
    let owner = Uuid::new_v4();

    let first = sessions
        .save_draft(owner, SaveDraft::Create(draft("T1")))
        .await
        .unwrap();
    let second = sessions
        .save_draft(owner, SaveDraft::Create(draft("T1")))
        .await
        .unwrap();

    assert_ne!(first.id, second.id);
    for s in [&first, &second] {
        assert_eq!(s.status, SessionStatus::Draft);
        assert_eq!(s.owner_id, owner);
        assert_eq!(s.tags, vec!["yoga", "meditation", "wellness"]);
    }
    assert_eq!(sessions.list_mine(owner).await.unwrap().len(), 2);
}

#[tokio::test]
async fn update_edits_in_place_and_reverts_to_draft() {
    let (_, sessions, _) = services();
    let owner = Uuid::new_v4();
    let id = create(&sessions, owner, "T1").await;
    let published = sessions.publish(owner, id).await.unwrap();
    tick().await;

    let updated = sessions
        .save_draft(
            owner,
            SaveDraft::Update {
                id,
                draft: SessionDraft::new("T2", "x,y", "http://u"),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.id, id);
    assert_eq!(updated.title, "T2");
    assert_eq!(updated.tags, vec!["x", "y"]);
    assert_eq!(updated.status, SessionStatus::Draft);
    assert_eq!(updated.created_at, published.created_at);
    assert!(updated.updated_at > published.updated_at);
    assert_eq!(sessions.list_mine(owner).await.unwrap().len(), 1);
}

#[tokio::test]
async fn publish_refreshes_updated_at_only() {
    let (_, sessions, _) = services();
    let owner = Uuid::new_v4();
    let created = sessions
        .save_draft(owner, SaveDraft::Create(draft("T1")))
        .await
        .unwrap();
    tick().await;

    let published = sessions.publish(owner, created.id).await.unwrap();
    assert!(published.updated_at > created.updated_at);
    assert_eq!(published.created_at, created.created_at);
    assert_eq!(published.title, created.title);
    assert_eq!(published.tags, created.tags);
    tick().await;

    let again = sessions.publish(owner, created.id).await.unwrap();
    assert!(again.updated_at > published.updated_at);
    assert_eq!(again.created_at, created.created_at);

    let stored = sessions.get_mine(owner, created.id).await.unwrap();
    assert_eq!(stored.updated_at, again.updated_at);
}

#[tokio::test]
async fn publish_is_idempotent() {
    let (_, sessions, _) = services();
    let owner = Uuid::new_v4();
    let id = create(&sessions, owner, "T1").await;

    let once = sessions.publish(owner, id).await.unwrap();
    let twice = sessions.publish(owner, id).await.unwrap();
    assert_eq!(once.status, SessionStatus::Published);
    assert_eq!(twice.status, SessionStatus::Published);
    assert_eq!(twice.id, id);
}

#[tokio::test]
async fn public_listing_only_has_published_sessions() {
    let (_, sessions, _) = services();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    let alice_public = create(&sessions, alice, "A1").await;
    create(&sessions, alice, "A2").await;
    let bob_public = create(&sessions, bob, "B1").await;
    create(&sessions, bob, "B2").await;
    sessions.publish(alice, alice_public).await.unwrap();
    sessions.publish(bob, bob_public).await.unwrap();

    let listed = sessions.list_published().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|s| s.status == SessionStatus::Published));
    let ids: Vec<Uuid> = listed.iter().map(|s| s.id).collect();
    assert!(ids.contains(&alice_public) && ids.contains(&bob_public));
}

#[tokio::test]
async fn other_owners_see_not_found() {
    let (_, sessions, _) = services();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let id = create(&sessions, alice, "A1").await;

    assert!(matches!(sessions.get_mine(bob, id).await, Err(PortError::NotFound(_))));
    assert!(matches!(sessions.publish(bob, id).await, Err(PortError::NotFound(_))));
    assert!(matches!(sessions.delete(bob, id).await, Err(PortError::NotFound(_))));
    let hijack = sessions
        .save_draft(bob, SaveDraft::Update { id, draft: draft("mine now") })
        .await;
    assert!(matches!(hijack, Err(PortError::NotFound(_))));

    // Alice's session is untouched.
    let session = sessions.get_mine(alice, id).await.unwrap();
    assert_eq!(session.title, "A1");
    assert_eq!(session.status, SessionStatus::Draft);
    assert!(sessions.list_mine(bob).await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_id_is_not_found() {
    let (_, sessions, _) = services();
    let owner = Uuid::new_v4();
    let missing = Uuid::new_v4();

    assert!(matches!(sessions.get_mine(owner, missing).await, Err(PortError::NotFound(_))));
    let update = sessions
        .save_draft(owner, SaveDraft::Update { id: missing, draft: draft("T") })
        .await;
    assert!(matches!(update, Err(PortError::NotFound(_))));
}

#[tokio::test]
async fn delete_removes_the_session() {
    let (_, sessions, _) = services();
    let owner = Uuid::new_v4();
    let id = create(&sessions, owner, "T1").await;

    sessions.delete(owner, id).await.unwrap();
    assert!(matches!(sessions.get_mine(owner, id).await, Err(PortError::NotFound(_))));
    assert!(matches!(sessions.delete(owner, id).await, Err(PortError::NotFound(_))));
}

#[tokio::test]
async fn invalid_drafts_are_not_stored() {
    let (_, sessions, _) = services();
    let owner = Uuid::new_v4();

    let no_title = sessions
        .save_draft(owner, SaveDraft::Create(SessionDraft::new("", "a", "http://u")))
        .await;
    assert!(matches!(no_title, Err(PortError::Validation(_))));
    let no_url = sessions
        .save_draft(owner, SaveDraft::Create(SessionDraft::new("T", "a", " ")))
        .await;
    assert!(matches!(no_url, Err(PortError::Validation(_))));
    assert!(sessions.list_mine(owner).await.unwrap().is_empty());
}
