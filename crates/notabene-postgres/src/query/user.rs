//! User repository for managing accounts.

use std::future::Future;

use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::Pagination;
use crate::model::{NewUser, UpdateUser, User};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for user account database operations.
///
/// Handles account lifecycle management: creation, lookup for
/// authentication, profile updates, and deletion.
pub trait UserRepository {
    /// Creates a new user account.
    ///
    /// Inserts a new account record with the provided display name, email,
    /// and password hash. Fields are trimmed and the email is lowercased
    /// before insertion. A duplicate email surfaces as a unique-constraint
    /// violation.
    fn create_user(&mut self, new_user: NewUser) -> impl Future<Output = PgResult<User>> + Send;

    /// Finds a user by its unique identifier.
    fn find_user_by_id(
        &mut self,
        user_id: i64,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Finds a user by email address.
    ///
    /// Emails are stored lowercase, so lookups are effectively
    /// case-insensitive as long as callers normalize the input.
    fn find_user_by_email(
        &mut self,
        email: &str,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Applies partial updates to an existing user.
    ///
    /// Only fields set to `Some(value)` are modified; `updated_at` is
    /// refreshed on success. Returns `None` if the user does not exist.
    fn update_user(
        &mut self,
        user_id: i64,
        updates: UpdateUser,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Deletes a user account.
    ///
    /// Owned notes are removed by the foreign-key cascade. Returns whether
    /// a row was actually deleted.
    fn delete_user(&mut self, user_id: i64) -> impl Future<Output = PgResult<bool>> + Send;

    /// Lists accounts with pagination support, most recent first.
    fn list_users(
        &mut self,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<User>>> + Send;

    /// Counts all accounts.
    fn count_users(&mut self) -> impl Future<Output = PgResult<i64>> + Send;

    /// Checks if an email address is already registered.
    ///
    /// Used during registration and profile updates to prevent duplicate
    /// accounts before the constraint fires.
    fn email_exists(&mut self, email: &str) -> impl Future<Output = PgResult<bool>> + Send;
}

impl UserRepository for PgConnection {
    async fn create_user(&mut self, mut new_user: NewUser) -> PgResult<User> {
        use schema::users;

        // Normalize fields: trim whitespace, lowercase the email
        new_user.display_name = new_user.display_name.trim().to_owned();
        new_user.email_address = new_user.email_address.trim().to_lowercase();

        diesel::insert_into(users::table)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_user_by_id(&mut self, user_id: i64) -> PgResult<Option<User>> {
        use schema::users::{self, dsl};

        users::table
            .filter(dsl::id.eq(user_id))
            .select(User::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_user_by_email(&mut self, email: &str) -> PgResult<Option<User>> {
        use schema::users::{self, dsl};

        users::table
            .filter(dsl::email_address.eq(email))
            .select(User::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn update_user(&mut self, user_id: i64, mut updates: UpdateUser) -> PgResult<Option<User>> {
        use schema::users::{self, dsl};

        if let Some(ref mut email) = updates.email_address {
            *email = email.trim().to_lowercase();
        }
        if let Some(ref mut name) = updates.display_name {
            *name = name.trim().to_owned();
        }
        updates.updated_at.get_or_insert_with(|| jiff::Timestamp::now().into());

        diesel::update(users::table.filter(dsl::id.eq(user_id)))
            .set(&updates)
            .returning(User::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn delete_user(&mut self, user_id: i64) -> PgResult<bool> {
        use schema::users::{self, dsl};

        let deleted = diesel::delete(users::table.filter(dsl::id.eq(user_id)))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(deleted > 0)
    }

    async fn list_users(&mut self, pagination: Pagination) -> PgResult<Vec<User>> {
        use schema::users::{self, dsl};

        users::table
            .order((dsl::created_at.desc(), dsl::id.desc()))
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(User::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn count_users(&mut self) -> PgResult<i64> {
        use schema::users;

        users::table
            .count()
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn email_exists(&mut self, email: &str) -> PgResult<bool> {
        use schema::users::{self, dsl};

        diesel::select(exists(
            users::table.filter(dsl::email_address.eq(email)),
        ))
        .get_result(self)
        .await
        .map_err(PgError::from)
    }
}
