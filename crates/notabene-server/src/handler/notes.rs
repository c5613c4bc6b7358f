//! Note management handlers.
//!
//! Every route resolves the caller first and passes the caller's id into
//! the repository, where all note access is author-scoped. A note that
//! belongs to someone else renders the same `not_found` response as a note
//! that does not exist.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use jiff::Timestamp;
use notabene_postgres::PgClient;
use notabene_postgres::model::{NewNote, Note, UpdateNote};
use notabene_postgres::query::NoteRepository;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use validator::Validate;

use crate::extract::{AuthState, Json, Path, ValidateJson};
use crate::handler::pagination::PaginationQuery;
use crate::handler::response::ErrorResponse;
use crate::handler::{ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for note operations.
const TRACING_TARGET: &str = "notabene_server::handler::notes";

/// `Path` param for `{noteId}` handlers.
#[must_use]
#[derive(Debug, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct NotePathParams {
    /// Unique identifier of the note.
    pub note_id: i64,
}

/// Request payload for creating a new note.
#[must_use]
#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "title": "Meeting notes",
    "content": "Discussed the Q3 roadmap",
    "tag": "work"
}))]
struct CreateNoteRequest {
    /// Title of the note.
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    /// Free-text body of the note.
    pub content: String,
    /// Optional classification tag.
    #[validate(length(max = 100))]
    pub tag: Option<String>,
    /// Optional subject line.
    #[validate(length(max = 255))]
    pub subject: Option<String>,
}

/// Request payload for updating a note.
///
/// Absent fields are left unchanged.
#[must_use]
#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
struct UpdateNoteRequest {
    /// New title.
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    /// New body.
    pub content: Option<String>,
    /// New classification tag.
    #[validate(length(max = 100))]
    pub tag: Option<String>,
    /// New subject line.
    #[validate(length(max = 255))]
    pub subject: Option<String>,
}

/// Wire representation of a note.
#[must_use]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct NoteResponse {
    /// ID of the note.
    pub note_id: i64,
    /// ID of the owning account.
    pub author_id: i64,
    /// Title of the note.
    pub title: String,
    /// Free-text body of the note.
    pub content: String,
    /// Optional classification tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Optional subject line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Timestamp when the note was created.
    #[schema(value_type = String, format = DateTime)]
    pub created_at: Timestamp,
    /// Timestamp when the note was last updated.
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: Timestamp,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            note_id: note.id,
            author_id: note.author_id,
            title: note.title,
            content: note.content,
            tag: note.tag,
            subject: note.subject,
            created_at: note.created_at.into(),
            updated_at: note.updated_at.into(),
        }
    }
}

/// Response for the paginated note listing.
#[must_use]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct NotesListResponse {
    /// Notes on the requested page, newest first.
    pub items: Vec<NoteResponse>,
    /// Total number of the caller's notes, independent of the page.
    pub total_count: i64,
    /// 1-based page number.
    pub page: i64,
    /// Page size used for this listing.
    pub per_page: i64,
}

/// Creates a new note owned by the caller.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    post, path = "/notes", tag = "notes",
    request_body(
        content = CreateNoteRequest,
        description = "New note",
        content_type = "application/json",
    ),
    responses(
        (status = BAD_REQUEST, description = "Invalid note data", body = ErrorResponse),
        (status = UNAUTHORIZED, description = "Missing or invalid token", body = ErrorResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Internal server error", body = ErrorResponse),
        (status = CREATED, description = "Note created", body = NoteResponse),
    ),
)]
async fn create_note(
    State(pg_client): State<PgClient>,
    AuthState(current_user): AuthState,
    ValidateJson(request): ValidateJson<CreateNoteRequest>,
) -> Result<(StatusCode, Json<NoteResponse>)> {
    tracing::info!(
        target: TRACING_TARGET,
        author_id = current_user.id,
        title = %request.title,
        "creating note",
    );

    let new_note = NewNote {
        author_id: current_user.id,
        title: request.title,
        content: request.content,
        tag: request.tag,
        subject: request.subject,
    };

    let mut conn = pg_client.get_connection().await?;
    let note = conn.create_note(new_note).await?;

    Ok((StatusCode::CREATED, Json(note.into())))
}

/// Lists the caller's notes, newest first.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    get, path = "/notes", tag = "notes",
    params(PaginationQuery),
    responses(
        (status = UNAUTHORIZED, description = "Missing or invalid token", body = ErrorResponse),
        (status = OK, description = "One page of notes", body = NotesListResponse),
    ),
)]
async fn list_notes(
    State(pg_client): State<PgClient>,
    AuthState(current_user): AuthState,
    Query(query): Query<PaginationQuery>,
) -> Result<(StatusCode, Json<NotesListResponse>)> {
    tracing::trace!(
        target: TRACING_TARGET,
        author_id = current_user.id,
        page = query.page_number(),
        per_page = query.page_size(),
        "listing notes",
    );

    let mut conn = pg_client.get_connection().await?;
    let notes = conn
        .list_notes(current_user.id, query.to_pagination())
        .await?;
    let total_count = conn.count_notes(current_user.id).await?;

    let response = NotesListResponse {
        items: notes.into_iter().map(Into::into).collect(),
        total_count,
        page: query.page_number(),
        per_page: query.page_size(),
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Retrieves one of the caller's notes.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    get, path = "/notes/{noteId}", tag = "notes",
    params(NotePathParams),
    responses(
        (status = UNAUTHORIZED, description = "Missing or invalid token", body = ErrorResponse),
        (status = NOT_FOUND, description = "Note not found or not owned by the caller", body = ErrorResponse),
        (status = OK, description = "The note", body = NoteResponse),
    ),
)]
async fn get_note(
    State(pg_client): State<PgClient>,
    AuthState(current_user): AuthState,
    Path(path_params): Path<NotePathParams>,
) -> Result<(StatusCode, Json<NoteResponse>)> {
    let mut conn = pg_client.get_connection().await?;

    let Some(note) = conn.find_note(current_user.id, path_params.note_id).await? else {
        return Err(ErrorKind::NotFound
            .with_resource("note")
            .with_message("Note not found or you don't have permission to access it")
            .into_static());
    };

    Ok((StatusCode::OK, Json(note.into())))
}

/// Updates one of the caller's notes.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    patch, path = "/notes/{noteId}", tag = "notes",
    params(NotePathParams),
    request_body(
        content = UpdateNoteRequest,
        description = "Fields to update",
        content_type = "application/json",
    ),
    responses(
        (status = BAD_REQUEST, description = "Invalid note data", body = ErrorResponse),
        (status = UNAUTHORIZED, description = "Missing or invalid token", body = ErrorResponse),
        (status = NOT_FOUND, description = "Note not found or not owned by the caller", body = ErrorResponse),
        (status = OK, description = "Updated note", body = NoteResponse),
    ),
)]
async fn update_note(
    State(pg_client): State<PgClient>,
    AuthState(current_user): AuthState,
    Path(path_params): Path<NotePathParams>,
    ValidateJson(request): ValidateJson<UpdateNoteRequest>,
) -> Result<(StatusCode, Json<NoteResponse>)> {
    tracing::info!(
        target: TRACING_TARGET,
        author_id = current_user.id,
        note_id = path_params.note_id,
        "updating note",
    );

    let updates = UpdateNote {
        title: request.title,
        content: request.content,
        tag: request.tag.map(Some),
        subject: request.subject.map(Some),
        ..Default::default()
    };

    let mut conn = pg_client.get_connection().await?;
    let Some(note) = conn
        .update_note(current_user.id, path_params.note_id, updates)
        .await?
    else {
        return Err(ErrorKind::NotFound
            .with_resource("note")
            .with_message("Note not found or you don't have permission to access it")
            .into_static());
    };

    Ok((StatusCode::OK, Json(note.into())))
}

/// Deletes one of the caller's notes.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    delete, path = "/notes/{noteId}", tag = "notes",
    params(NotePathParams),
    responses(
        (status = UNAUTHORIZED, description = "Missing or invalid token", body = ErrorResponse),
        (status = NOT_FOUND, description = "Note not found or not owned by the caller", body = ErrorResponse),
        (status = NO_CONTENT, description = "Note deleted"),
    ),
)]
async fn delete_note(
    State(pg_client): State<PgClient>,
    AuthState(current_user): AuthState,
    Path(path_params): Path<NotePathParams>,
) -> Result<StatusCode> {
    let mut conn = pg_client.get_connection().await?;
    let deleted = conn
        .delete_note(current_user.id, path_params.note_id)
        .await?;

    if !deleted {
        return Err(ErrorKind::NotFound
            .with_resource("note")
            .with_message("Note not found or you don't have permission to access it")
            .into_static());
    }

    tracing::info!(
        target: TRACING_TARGET,
        author_id = current_user.id,
        note_id = path_params.note_id,
        "note deleted",
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Returns the note routes.
pub fn routes() -> OpenApiRouter<ServiceState> {
    OpenApiRouter::new()
        .routes(routes!(create_note, list_notes))
        .routes(routes!(get_note, update_note, delete_note))
}
