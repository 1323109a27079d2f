use doc_store::{Document, DocumentActor, DocumentClient, StoreClient, StoreError};

// --- Test Document ---

#[derive(Clone, Debug, PartialEq)]
struct Profile {
    name: String,
    visits: u32,
}

#[derive(Debug)]
enum ProfilePatch {
    Rename(String),
    Visit,
}

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
enum ProfileError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("store: {0}")]
    Store(String),
}

impl From<String> for ProfileError {
    fn from(msg: String) -> Self {
        ProfileError::Store(msg)
    }
}

impl Document for Profile {
    type Id = u32;
    type Patch = ProfilePatch;
    type Error = ProfileError;

    fn validate(&self) -> Result<(), ProfileError> {
        if self.name.is_empty() {
            return Err(ProfileError::EmptyName);
        }
        Ok(())
    }

    fn apply_patch(&mut self, patch: ProfilePatch) -> Result<(), ProfileError> {
        match patch {
            ProfilePatch::Rename(name) => self.name = name,
            ProfilePatch::Visit => self.visits += 1,
        }
        Ok(())
    }
}

struct ProfileClient {
    inner: StoreClient<Profile>,
}

impl DocumentClient<Profile> for ProfileClient {
    type Error = ProfileError;

    fn inner(&self) -> &StoreClient<Profile> {
        &self.inner
    }

    fn map_error(e: StoreError) -> ProfileError {
        e.rejection::<ProfileError>()
            .cloned()
            .unwrap_or_else(|| ProfileError::Store(e.to_string()))
    }
}

fn profile(name: &str) -> Profile {
    Profile {
        name: name.to_string(),
        visits: 0,
    }
}

#[tokio::test]
async fn test_store_round_trip() {
    let (actor, client) = DocumentActor::<Profile>::new("profiles", 8);
    let handle = tokio::spawn(actor.run());

    assert!(!client.get(1).await.unwrap().exists());
    client.set(1, profile("ada")).await.unwrap();
    client.set(2, profile("grace")).await.unwrap();

    let visited = client.update(1, ProfilePatch::Visit).await.unwrap();
    assert_eq!(visited.revision, 2);
    assert_eq!(visited.document.unwrap().visits, 1);

    let mut names: Vec<_> = client.list().await.unwrap().into_iter().map(|p| p.name).collect();
    names.sort();
    assert_eq!(names, vec!["ada", "grace"]);

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_update_without_seed_needs_existing_document() {
    let (actor, client) = DocumentActor::<Profile>::new("profiles", 8);
    tokio::spawn(actor.run());

    let err = client.update(7, ProfilePatch::Visit).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == "7"));

    let err = client.delete(7).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn test_invalid_writes_are_rejected() {
    let (actor, client) = DocumentActor::<Profile>::new("profiles", 8);
    tokio::spawn(actor.run());

    let err = client.set(1, profile("")).await.unwrap_err();
    assert_eq!(err.rejection::<ProfileError>(), Some(&ProfileError::EmptyName));
    assert!(!client.get(1).await.unwrap().exists());

    client.set(1, profile("ada")).await.unwrap();
    let err = client
        .update(1, ProfilePatch::Rename(String::new()))
        .await
        .unwrap_err();
    assert!(err.rejection::<ProfileError>().is_some());
    assert_eq!(client.get(1).await.unwrap().document, Some(profile("ada")));
}

/// Two writers holding the same stale copy: the later full write wins.
#[tokio::test]
async fn test_last_full_write_wins() {
    let (actor, phone) = DocumentActor::<Profile>::new("profiles", 8);
    tokio::spawn(actor.run());
    let laptop = phone.clone();

    phone.set(1, profile("ada")).await.unwrap();
    let mut on_phone = phone.get(1).await.unwrap().document.unwrap();
    let mut on_laptop = laptop.get(1).await.unwrap().document.unwrap();

    on_phone.visits = 10;
    on_laptop.name = "ada lovelace".to_string();
    phone.set(1, on_phone).await.unwrap();
    let last = laptop.set(1, on_laptop).await.unwrap();

    assert_eq!(last.revision, 3);
    assert_eq!(
        phone.get(1).await.unwrap().document,
        Some(Profile {
            name: "ada lovelace".to_string(),
            visits: 0,
        })
    );
}

#[tokio::test]
async fn test_feeds_follow_their_own_key() {
    let (actor, client) = DocumentActor::<Profile>::new("profiles", 8);
    tokio::spawn(actor.run());

    let mut one = client.subscribe(1).await.unwrap();
    let mut also_one = client.subscribe(1).await.unwrap();
    let two = client.subscribe(2).await.unwrap();

    client.set(1, profile("ada")).await.unwrap();
    one.changed().await.unwrap();
    also_one.changed().await.unwrap();
    assert_eq!(one.borrow().revision, 1);
    assert_eq!(also_one.borrow().revision, 1);
    assert!(!two.has_changed().unwrap());

    // dropping every receiver releases the feed; a new subscriber starts fresh
    drop(one);
    drop(also_one);
    client.update(1, ProfilePatch::Visit).await.unwrap();
    let renewed = client.subscribe(1).await.unwrap();
    assert_eq!(renewed.borrow().revision, 2);
}

#[tokio::test]
async fn test_closed_store() {
    let (actor, client) = DocumentActor::<Profile>::new("profiles", 8);
    drop(actor);

    let wrapped = ProfileClient { inner: client };
    let err = wrapped.fetch(1).await.unwrap_err();
    assert!(matches!(err, ProfileError::Store(_)));
}
