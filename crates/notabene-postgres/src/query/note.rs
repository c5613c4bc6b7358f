//! Note repository with mandatory author scoping.
//!
//! Every operation here takes the author id as its first parameter and
//! filters on it. A note that exists but belongs to a different author
//! behaves exactly like a missing note, so callers cannot distinguish the
//! two cases and upstream authorization mistakes cannot expose foreign
//! data.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::Pagination;
use crate::model::{NewNote, Note, UpdateNote};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for note database operations, scoped by author.
pub trait NoteRepository {
    /// Creates a new note for the author set in `new_note`.
    fn create_note(&mut self, new_note: NewNote) -> impl Future<Output = PgResult<Note>> + Send;

    /// Finds a note by id, restricted to the given author.
    ///
    /// Returns `None` if the note does not exist or belongs to someone
    /// else.
    fn find_note(
        &mut self,
        author_id: i64,
        note_id: i64,
    ) -> impl Future<Output = PgResult<Option<Note>>> + Send;

    /// Lists the author's notes, newest first.
    ///
    /// Ordering is by creation time descending with the id as a
    /// tie-breaker, so pages are stable across requests.
    fn list_notes(
        &mut self,
        author_id: i64,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<Note>>> + Send;

    /// Counts all of the author's notes, independent of pagination.
    fn count_notes(&mut self, author_id: i64) -> impl Future<Output = PgResult<i64>> + Send;

    /// Applies partial updates to a note, restricted to the given author.
    ///
    /// Refreshes `updated_at` on success. Returns `None` if the note does
    /// not exist or belongs to someone else.
    fn update_note(
        &mut self,
        author_id: i64,
        note_id: i64,
        updates: UpdateNote,
    ) -> impl Future<Output = PgResult<Option<Note>>> + Send;

    /// Deletes a note, restricted to the given author.
    ///
    /// Returns `false` if the note does not exist or belongs to someone
    /// else.
    fn delete_note(
        &mut self,
        author_id: i64,
        note_id: i64,
    ) -> impl Future<Output = PgResult<bool>> + Send;
}

impl NoteRepository for PgConnection {
    async fn create_note(&mut self, new_note: NewNote) -> PgResult<Note> {
        use schema::notes;

        diesel::insert_into(notes::table)
            .values(&new_note)
            .returning(Note::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_note(&mut self, author_id: i64, note_id: i64) -> PgResult<Option<Note>> {
        use schema::notes::{self, dsl};

        notes::table
            .filter(dsl::id.eq(note_id))
            .filter(dsl::author_id.eq(author_id))
            .select(Note::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn list_notes(&mut self, author_id: i64, pagination: Pagination) -> PgResult<Vec<Note>> {
        use schema::notes::{self, dsl};

        notes::table
            .filter(dsl::author_id.eq(author_id))
            .order((dsl::created_at.desc(), dsl::id.desc()))
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(Note::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn count_notes(&mut self, author_id: i64) -> PgResult<i64> {
        use schema::notes::{self, dsl};

        notes::table
            .filter(dsl::author_id.eq(author_id))
            .count()
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn update_note(
        &mut self,
        author_id: i64,
        note_id: i64,
        mut updates: UpdateNote,
    ) -> PgResult<Option<Note>> {
        use schema::notes::{self, dsl};

        updates.updated_at.get_or_insert_with(|| jiff::Timestamp::now().into());

        diesel::update(
            notes::table
                .filter(dsl::id.eq(note_id))
                .filter(dsl::author_id.eq(author_id)),
        )
        .set(&updates)
        .returning(Note::as_returning())
        .get_result(self)
        .await
        .optional()
        .map_err(PgError::from)
    }

    async fn delete_note(&mut self, author_id: i64, note_id: i64) -> PgResult<bool> {
        use schema::notes::{self, dsl};

        let deleted = diesel::delete(
            notes::table
                .filter(dsl::id.eq(note_id))
                .filter(dsl::author_id.eq(author_id)),
        )
        .execute(self)
        .await
        .map_err(PgError::from)?;

        Ok(deleted > 0)
    }
}
