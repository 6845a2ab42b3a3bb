//! Customer domain and wire types.

use core::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::id::CustomerId;

/// A customer as exposed over the API.
///
/// This type deliberately has no password field: a stored password hash can
/// never be serialized through it. Field order matches the JSON shape clients
/// rely on (`id`, timestamps, then the editable fields).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Store-assigned identifier.
    pub id: CustomerId,
    /// When the customer was created.
    pub created_at: DateTime<Utc>,
    /// When the customer was last updated.
    pub updated_at: DateTime<Utc>,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Date of birth (`YYYY-MM-DD` on the wire).
    pub dob: NaiveDate,
    /// Unique login name.
    pub username: String,
}

/// A fully validated set of customer fields, ready to be hashed and stored.
///
/// Produced only by [`crate::validation::validate_customer`]. The password is
/// still plaintext here; `Debug` redacts it.
#[derive(Clone, PartialEq, Eq)]
pub struct CustomerDraft {
    pub first_name: String,
    pub last_name: String,
    pub dob: NaiveDate,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for CustomerDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomerDraft")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("dob", &self.dob)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Request body for creating or replacing a customer.
///
/// All fields are plain strings: the server validates them, so nothing is
/// parsed or checked on construction.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInput {
    pub first_name: String,
    pub last_name: String,
    pub dob: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for CustomerInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomerInput")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("dob", &self.dob)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
