//! Raw SQL fragments that can't be expressed in Diesel's type-safe DSL.
//!
//! # Safety
//!
//! All SQL in this module has been reviewed for SQL injection safety:
//! - User input is ALWAYS passed via `.bind()` parameters
//! - No string concatenation or interpolation with user data
//!
//! When adding new SQL here, document why Diesel DSL can't be used and make
//! sure all user input goes through `.bind()`.

use diesel::dsl::sql;
use diesel::expression::SqlLiteral;
use diesel::sql_types::BigInt;

/// Window function for counting total rows across the full result set.
///
/// Returns `COUNT(*) OVER()` which gives the total count before LIMIT/OFFSET.
/// Diesel doesn't support window functions natively.
///
/// # Safety
/// Static SQL string with no user input.
pub fn count_over() -> SqlLiteral<BigInt> {
    sql::<BigInt>("COUNT(*) OVER()")
}

/// Number of likes on the current `recipes` row.
///
/// A correlated subquery, so it can be both selected and ordered by without
/// grouping the outer query.
///
/// # Safety
/// Static SQL string with no user input.
pub fn likes_count() -> SqlLiteral<BigInt> {
    sql::<BigInt>("(SELECT COUNT(*) FROM recipe_likes rl WHERE rl.recipe_id = recipes.id)")
}

/// Take a transaction-scoped advisory lock on a text key.
///
/// Serializes toggles of the same (set, recipe, user) triple; the lock is
/// released when the surrounding transaction ends.
///
/// # Safety
/// The key MUST be passed via `.bind::<Text, _>()`.
///
/// # Why raw SQL?
/// Diesel has no binding for `pg_advisory_xact_lock`.
pub const ADVISORY_XACT_LOCK: &str = "SELECT pg_advisory_xact_lock(hashtextextended($1, 0))";
