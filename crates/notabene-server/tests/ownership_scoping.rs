//! Repository contract tests against the in-memory store.
//!
//! Covers the invariants the repository boundary has to hold regardless of
//! backing: author scoping on every note operation, stable newest-first
//! pagination, owner-independent totals, and unique emails.

use notabene_postgres::mock::MemoryStore;
use notabene_postgres::model::{NewNote, NewUser, UpdateNote, UpdateUser};
use notabene_postgres::query::{NoteRepository, Pagination, UserRepository};

async fn create_user(store: &mut MemoryStore, email: &str) -> anyhow::Result<i64> {
    let user = store
        .create_user(NewUser {
            display_name: "Test".to_owned(),
            email_address: email.to_owned(),
            password_hash: "$argon2id$fake".to_owned(),
        })
        .await?;
    Ok(user.id)
}

async fn create_notes(store: &mut MemoryStore, author_id: i64, count: usize) -> anyhow::Result<Vec<i64>> {
    let mut ids = Vec::with_capacity(count);
    for i in 0..count {
        let note = store
            .create_note(NewNote {
                author_id,
                title: format!("note {i}"),
                content: "body".to_owned(),
                ..Default::default()
            })
            .await?;
        ids.push(note.id);
    }
    Ok(ids)
}

#[tokio::test]
async fn notes_of_other_owners_behave_as_missing() -> anyhow::Result<()> {
    let mut store = MemoryStore::new();
    let alice = create_user(&mut store, "alice@x.com").await?;
    let bella = create_user(&mut store, "bella@x.com").await?;

    let note = store
        .create_note(NewNote {
            author_id: alice,
            title: "private".to_owned(),
            content: "body".to_owned(),
            ..Default::default()
        })
        .await?;

    // Reads, updates, and deletes by another owner all act as "not found"
    assert!(store.find_note(bella, note.id).await?.is_none());
    assert!(
        store
            .update_note(bella, note.id, UpdateNote::default())
            .await?
            .is_none()
    );
    assert!(!store.delete_note(bella, note.id).await?);

    // The note is untouched for its owner
    let found = store.find_note(alice, note.id).await?.expect("note exists");
    assert_eq!(found.title, "private");

    Ok(())
}

#[tokio::test]
async fn pagination_returns_the_requested_window_newest_first() -> anyhow::Result<()> {
    let mut store = MemoryStore::new();
    let owner = create_user(&mut store, "owner@x.com").await?;
    let other = create_user(&mut store, "other@x.com").await?;

    let ids = create_notes(&mut store, owner, 25).await?;
    create_notes(&mut store, other, 5).await?;

    let page = store
        .list_notes(owner, Pagination::from_page(2, 10))
        .await?;

    // Newest first: page 2 of size 10 holds the 11th..20th newest notes
    let mut expected: Vec<i64> = ids.clone();
    expected.reverse();
    let expected: Vec<i64> = expected[10..20].to_vec();
    let got: Vec<i64> = page.iter().map(|n| n.id).collect();
    assert_eq!(got, expected);

    // Ordering within the page is by creation time, newest first
    for window in page.windows(2) {
        assert!(
            jiff::Timestamp::from(window[0].created_at) >= window[1].created_at.into(),
            "listing must be newest first"
        );
    }

    // Totals are owner-scoped and independent of the requested page
    assert_eq!(store.count_notes(owner).await?, 25);
    assert_eq!(store.count_notes(other).await?, 5);
    let last_page = store
        .list_notes(owner, Pagination::from_page(3, 10))
        .await?;
    assert_eq!(last_page.len(), 5);
    assert_eq!(store.count_notes(owner).await?, 25);

    Ok(())
}

#[tokio::test]
async fn update_refreshes_the_timestamp_and_keeps_the_author() -> anyhow::Result<()> {
    let mut store = MemoryStore::new();
    let owner = create_user(&mut store, "owner@x.com").await?;

    let note = store
        .create_note(NewNote {
            author_id: owner,
            title: "before".to_owned(),
            content: "body".to_owned(),
            ..Default::default()
        })
        .await?;

    let updated = store
        .update_note(
            owner,
            note.id,
            UpdateNote {
                title: Some("after".to_owned()),
                ..Default::default()
            },
        )
        .await?
        .expect("own note updates");

    assert_eq!(updated.title, "after");
    assert_eq!(updated.content, "body");
    assert_eq!(updated.author_id, owner);
    assert!(
        jiff::Timestamp::from(updated.updated_at) >= note.updated_at.into(),
        "update must refresh the timestamp"
    );

    Ok(())
}

#[tokio::test]
async fn emails_are_unique_across_create_and_update() -> anyhow::Result<()> {
    let mut store = MemoryStore::new();
    create_user(&mut store, "first@x.com").await?;
    let second = create_user(&mut store, "second@x.com").await?;

    // Duplicate on create
    let error = store
        .create_user(NewUser {
            display_name: "Dup".to_owned(),
            email_address: "first@x.com".to_owned(),
            password_hash: "$argon2id$fake".to_owned(),
        })
        .await
        .expect_err("duplicate email must not insert");
    assert!(error.is_unique_violation());

    // Duplicate on update
    let error = store
        .update_user(
            second,
            UpdateUser {
                email_address: Some("first@x.com".to_owned()),
                ..Default::default()
            },
        )
        .await
        .expect_err("updating onto a taken email must fail");
    assert!(error.is_unique_violation());

    Ok(())
}

#[tokio::test]
async fn updating_a_missing_user_is_silently_none() -> anyhow::Result<()> {
    let mut store = MemoryStore::new();

    let result = store
        .update_user(
            999,
            UpdateUser {
                display_name: Some("Ghost".to_owned()),
                ..Default::default()
            },
        )
        .await?;
    assert!(result.is_none());

    Ok(())
}

#[tokio::test]
async fn deleting_a_user_cascades_to_their_notes() -> anyhow::Result<()> {
    let mut store = MemoryStore::new();
    let owner = create_user(&mut store, "owner@x.com").await?;
    let keeper = create_user(&mut store, "keeper@x.com").await?;

    create_notes(&mut store, owner, 3).await?;
    create_notes(&mut store, keeper, 2).await?;
    assert_eq!(store.total_notes(), 5);

    assert!(store.delete_user(owner).await?);

    assert_eq!(store.total_notes(), 2);
    assert_eq!(store.count_notes(keeper).await?, 2);

    Ok(())
}

#[tokio::test]
async fn user_listing_pages_like_notes() -> anyhow::Result<()> {
    let mut store = MemoryStore::new();
    for i in 0..7 {
        create_user(&mut store, &format!("user{i}@x.com")).await?;
    }

    let first = store.list_users(Pagination::from_page(1, 5)).await?;
    let second = store.list_users(Pagination::from_page(2, 5)).await?;

    assert_eq!(first.len(), 5);
    assert_eq!(second.len(), 2);
    assert_eq!(store.count_users().await?, 7);

    Ok(())
}
