//! Strongly-typed identifier value objects.
//!
//! Identifiers are assigned by the store (BIGSERIAL), so these newtypes wrap
//! the raw `i64` handed back by an insert rather than generating values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

macro_rules! store_assigned_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a store-assigned identifier.
            pub const fn from_i64(id: i64) -> Self {
                Self(id)
            }

            /// Returns the raw identifier.
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }
    };
}

store_assigned_id! {
    /// Unique identifier for a registered user.
    UserId
}

store_assigned_id! {
    /// Unique identifier for a doctor profile.
    DoctorId
}

store_assigned_id! {
    /// Unique identifier for a consultation.
    ConsultationId
}

store_assigned_id! {
    /// Unique identifier for a message in a consultation transcript.
    MessageId
}
