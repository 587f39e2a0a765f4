use std::{error::Error, fmt::Debug};

use anyhow::Context;
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl, SelectableHelper};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::{
    auth::password::compute_password_hash,
    domain::{capabilities::Capabilities, phone_number::PhoneNumberDomain, user_email::UserEmail},
    models::{NewUser, User, UserSummary},
    schema::users,
    telemetry::spawn_blocking_with_tracing,
    utils::{error_fmt_chain, DbConnection}
};

// Error associated with inserting user to users table
#[derive(Error)]
pub enum UserInsertError{
    #[error("a user with this email already exists")]
    EmailNotUnique(#[source] diesel::result::Error),
    #[error("unexpected database / hashing error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for UserInsertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

#[tracing::instrument(
    "Inserting user into the database",
    skip(conn, password),
    fields(email = %email)
)]
pub async fn insert_user_into_database(
    mut conn: DbConnection,
    name: String,
    email: UserEmail,
    phone: PhoneNumberDomain,
    password: SecretString,
    capabilities: Capabilities
) -> Result<UserSummary, UserInsertError> {

    let password_hash = spawn_blocking_with_tracing(move || {
        compute_password_hash(password)
    })
    .await
    .context("Failed due to threadpool error")??;

    let new_user = NewUser{
        email: email.inner(),
        phone: phone.inner(),
        name,
        password_hash: password_hash.expose_secret().to_string(),
        can_buy: capabilities.can_buy,
        can_sell: capabilities.can_sell
    };

    spawn_blocking_with_tracing(move || {
        diesel::insert_into(users::table)
            .values(&new_user)
            .returning(UserSummary::as_returning())
            .get_result::<UserSummary>(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::DatabaseError(
                    diesel::result::DatabaseErrorKind::UniqueViolation,
                    _
                ) => UserInsertError::EmailNotUnique(e),
                _ => UserInsertError::UnexpectedError(
                    anyhow::Error::new(e).context("Failed to insert user")
                )
            })
    })
    .await
    .context("Failed due to threadpool error")?
}

// Function to query user from email id
#[tracing::instrument(
    "Getting user by email",
    skip(conn)
)]
pub async fn get_user_from_email(
    mut conn: DbConnection,
    email: UserEmail
) -> Result<Option<User>, anyhow::Error> {
    spawn_blocking_with_tracing(move || {
        users::table
            .filter(users::email.eq(email.inner()))
            .select(User::as_select())
            .first::<User>(&mut conn)
            .optional()
            .context("Failed to query user by email")
    })
    .await
    .context("Failed due to threadpool error")?
}

#[tracing::instrument(
    "Listing users",
    skip_all
)]
pub async fn list_users(
    mut conn: DbConnection
) -> Result<Vec<UserSummary>, anyhow::Error> {
    spawn_blocking_with_tracing(move || {
        users::table
            .select(UserSummary::as_select())
            .order(users::id.asc())
            .load::<UserSummary>(&mut conn)
            .context("Failed to list users")
    })
    .await
    .context("Failed due to threadpool error")?
}
