//! Main note model for PostgreSQL database operations.

use diesel::prelude::*;
use jiff_diesel::Timestamp;

use crate::schema::notes;

/// Main note model representing a note owned by a user.
///
/// The `author_id` is set once at creation and never changes; every query
/// touching a note filters on it.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = notes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Note {
    /// Unique note identifier.
    pub id: i64,
    /// Reference to the account that owns this note.
    pub author_id: i64,
    /// Note title (1-255 characters).
    pub title: String,
    /// Free-text note body.
    pub content: String,
    /// Optional classification tag.
    pub tag: Option<String>,
    /// Optional subject line.
    pub subject: Option<String>,
    /// Timestamp when the note was created.
    pub created_at: Timestamp,
    /// Timestamp when the note was last updated.
    pub updated_at: Timestamp,
}

/// Data for creating a new note.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = notes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewNote {
    /// Account that owns the note.
    pub author_id: i64,
    /// Note title.
    pub title: String,
    /// Free-text note body.
    pub content: String,
    /// Optional classification tag.
    pub tag: Option<String>,
    /// Optional subject line.
    pub subject: Option<String>,
}

/// Data for updating a note.
///
/// Only fields set to `Some(value)` are written. The author is not part of
/// the changeset: ownership never moves.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = notes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateNote {
    /// Note title.
    pub title: Option<String>,
    /// Free-text note body.
    pub content: Option<String>,
    /// Optional classification tag.
    pub tag: Option<Option<String>>,
    /// Optional subject line.
    pub subject: Option<Option<String>>,
    /// Timestamp when the note was last updated.
    pub updated_at: Option<Timestamp>,
}

impl Note {
    /// Returns whether the note is owned by the given account.
    #[inline]
    pub fn is_authored_by(&self, account_id: i64) -> bool {
        self.author_id == account_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(author_id: i64) -> Note {
        Note {
            id: 1,
            author_id,
            title: "T".to_owned(),
            content: "B".to_owned(),
            tag: None,
            subject: None,
            created_at: jiff::Timestamp::UNIX_EPOCH.into(),
            updated_at: jiff::Timestamp::UNIX_EPOCH.into(),
        }
    }

    #[test]
    fn authorship_check() {
        assert!(note(7).is_authored_by(7));
        assert!(!note(7).is_authored_by(8));
    }
}
