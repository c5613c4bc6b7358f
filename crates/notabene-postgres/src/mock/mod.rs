//! In-memory implementation of the repository traits for testing.
//!
//! This module provides [`MemoryStore`], a hash-map-backed store that
//! implements [`UserRepository`] and [`NoteRepository`] with the same
//! semantics as the Postgres implementations: normalized emails, a
//! unique-email violation on duplicates, author-scoped note access, and
//! newest-first ordering. Code written against the repository traits runs
//! unchanged against either backing.
//!
//! # Feature Flag
//!
//! This module is only available when the `test-utils` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! notabene-postgres = { version = "...", features = ["test-utils"] }
//! ```

use std::collections::HashMap;

use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::model::{NewNote, NewUser, Note, UpdateNote, UpdateUser, User};
use crate::query::{NoteRepository, Pagination, UserRepository};
use crate::{PgError, PgResult};

/// Hash-map-backed store implementing the repository traits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: HashMap<i64, User>,
    notes: HashMap<i64, Note>,
    next_user_id: i64,
    next_note_id: i64,
}

impl MemoryStore {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored notes across all authors.
    pub fn total_notes(&self) -> usize {
        self.notes.len()
    }

    fn unique_email_violation() -> PgError {
        PgError::Query(DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new(
                "duplicate key value violates unique constraint \"users_email_address_key\""
                    .to_owned(),
            ),
        ))
    }

    fn now() -> jiff_diesel::Timestamp {
        jiff::Timestamp::now().into()
    }
}

impl UserRepository for MemoryStore {
    async fn create_user(&mut self, new_user: NewUser) -> PgResult<User> {
        let email = new_user.email_address.trim().to_lowercase();
        if self.users.values().any(|u| u.email_address == email) {
            return Err(Self::unique_email_violation());
        }

        self.next_user_id += 1;
        let now = Self::now();
        let user = User {
            id: self.next_user_id,
            display_name: new_user.display_name.trim().to_owned(),
            email_address: email,
            password_hash: new_user.password_hash,
            created_at: now,
            updated_at: now,
        };

        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&mut self, user_id: i64) -> PgResult<Option<User>> {
        Ok(self.users.get(&user_id).cloned())
    }

    async fn find_user_by_email(&mut self, email: &str) -> PgResult<Option<User>> {
        Ok(self
            .users
            .values()
            .find(|u| u.email_address == email)
            .cloned())
    }

    async fn update_user(&mut self, user_id: i64, updates: UpdateUser) -> PgResult<Option<User>> {
        let new_email = updates
            .email_address
            .as_ref()
            .map(|email| email.trim().to_lowercase());

        if let Some(ref email) = new_email
            && self
                .users
                .values()
                .any(|u| u.id != user_id && u.email_address == *email)
        {
            return Err(Self::unique_email_violation());
        }

        let Some(user) = self.users.get_mut(&user_id) else {
            return Ok(None);
        };

        if let Some(name) = updates.display_name {
            user.display_name = name.trim().to_owned();
        }
        if let Some(email) = new_email {
            user.email_address = email;
        }
        if let Some(hash) = updates.password_hash {
            user.password_hash = hash;
        }
        user.updated_at = updates.updated_at.unwrap_or_else(Self::now);

        Ok(Some(user.clone()))
    }

    async fn delete_user(&mut self, user_id: i64) -> PgResult<bool> {
        let removed = self.users.remove(&user_id).is_some();
        if removed {
            // Foreign-key cascade
            self.notes.retain(|_, note| note.author_id != user_id);
        }
        Ok(removed)
    }

    async fn list_users(&mut self, pagination: Pagination) -> PgResult<Vec<User>> {
        let mut users: Vec<_> = self.users.values().cloned().collect();
        users.sort_by(|a, b| {
            jiff::Timestamp::from(b.created_at)
                .cmp(&a.created_at.into())
                .then(b.id.cmp(&a.id))
        });

        Ok(users
            .into_iter()
            .skip(pagination.offset.max(0) as usize)
            .take(pagination.limit.max(0) as usize)
            .collect())
    }

    async fn count_users(&mut self) -> PgResult<i64> {
        Ok(self.users.len() as i64)
    }

    async fn email_exists(&mut self, email: &str) -> PgResult<bool> {
        Ok(self.users.values().any(|u| u.email_address == email))
    }
}

impl NoteRepository for MemoryStore {
    async fn create_note(&mut self, new_note: NewNote) -> PgResult<Note> {
        self.next_note_id += 1;
        let now = Self::now();
        let note = Note {
            id: self.next_note_id,
            author_id: new_note.author_id,
            title: new_note.title,
            content: new_note.content,
            tag: new_note.tag,
            subject: new_note.subject,
            created_at: now,
            updated_at: now,
        };

        self.notes.insert(note.id, note.clone());
        Ok(note)
    }

    async fn find_note(&mut self, author_id: i64, note_id: i64) -> PgResult<Option<Note>> {
        Ok(self
            .notes
            .get(&note_id)
            .filter(|note| note.is_authored_by(author_id))
            .cloned())
    }

    async fn list_notes(&mut self, author_id: i64, pagination: Pagination) -> PgResult<Vec<Note>> {
        let mut notes: Vec<_> = self
            .notes
            .values()
            .filter(|note| note.is_authored_by(author_id))
            .cloned()
            .collect();

        notes.sort_by(|a, b| {
            jiff::Timestamp::from(b.created_at)
                .cmp(&a.created_at.into())
                .then(b.id.cmp(&a.id))
        });

        Ok(notes
            .into_iter()
            .skip(pagination.offset.max(0) as usize)
            .take(pagination.limit.max(0) as usize)
            .collect())
    }

    async fn count_notes(&mut self, author_id: i64) -> PgResult<i64> {
        Ok(self
            .notes
            .values()
            .filter(|note| note.is_authored_by(author_id))
            .count() as i64)
    }

    async fn update_note(
        &mut self,
        author_id: i64,
        note_id: i64,
        updates: UpdateNote,
    ) -> PgResult<Option<Note>> {
        let Some(note) = self
            .notes
            .get_mut(&note_id)
            .filter(|note| note.author_id == author_id)
        else {
            return Ok(None);
        };

        if let Some(title) = updates.title {
            note.title = title;
        }
        if let Some(content) = updates.content {
            note.content = content;
        }
        if let Some(tag) = updates.tag {
            note.tag = tag;
        }
        if let Some(subject) = updates.subject {
            note.subject = subject;
        }
        note.updated_at = updates.updated_at.unwrap_or_else(Self::now);

        Ok(Some(note.clone()))
    }

    async fn delete_note(&mut self, author_id: i64, note_id: i64) -> PgResult<bool> {
        let owned = self
            .notes
            .get(&note_id)
            .is_some_and(|note| note.is_authored_by(author_id));

        if owned {
            self.notes.remove(&note_id);
        }
        Ok(owned)
    }
}
