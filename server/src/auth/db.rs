use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::models::{NewRefreshToken, User};
use crate::schema::{refresh_tokens, users};

use super::jwt::IssuedToken;

/// Add a refresh token to the outstanding-token ledger.
pub fn record_refresh_token(
    conn: &mut PgConnection,
    user_id: Uuid,
    issued: &IssuedToken,
) -> QueryResult<()> {
    diesel::insert_into(refresh_tokens::table)
        .values(&NewRefreshToken {
            jti: issued.jti,
            user_id,
            expires_at: issued.expires_at,
        })
        .execute(conn)?;
    Ok(())
}

/// The owner of a refresh token that is recorded, unexpired and unrevoked.
pub fn live_refresh_token_owner(
    conn: &mut PgConnection,
    jti: Uuid,
    now: DateTime<Utc>,
) -> QueryResult<Option<User>> {
    refresh_tokens::table
        .inner_join(users::table)
        .filter(refresh_tokens::jti.eq(jti))
        .filter(refresh_tokens::revoked_at.is_null())
        .filter(refresh_tokens::expires_at.gt(now))
        .select(User::as_select())
        .first(conn)
        .optional()
}

/// Revoke every outstanding refresh token for a user. Returns how many.
pub fn revoke_refresh_tokens(
    conn: &mut PgConnection,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> QueryResult<usize> {
    diesel::update(
        refresh_tokens::table
            .filter(refresh_tokens::user_id.eq(user_id))
            .filter(refresh_tokens::revoked_at.is_null()),
    )
    .set(refresh_tokens::revoked_at.eq(Some(now)))
    .execute(conn)
}

pub fn find_user(conn: &mut PgConnection, user_id: Uuid) -> QueryResult<Option<User>> {
    users::table
        .find(user_id)
        .select(User::as_select())
        .first(conn)
        .optional()
}

/// Case-insensitive lookup; emails are stored lowercased.
pub fn find_user_by_email(conn: &mut PgConnection, email: &str) -> QueryResult<Option<User>> {
    users::table
        .filter(users::email.eq(email.trim().to_lowercase()))
        .select(User::as_select())
        .first(conn)
        .optional()
}
