//! User model for storage and API.

use serde::Serialize;
use sqlx::FromRow;

/// User record in the `users` table.
///
/// Created on the first authenticated visit; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct User {
    /// Internal numeric identity
    pub id: i32,
    /// Subject issued by the identity provider
    pub external_id: String,
    /// Primary email address reported by the identity provider
    pub email: String,
}
