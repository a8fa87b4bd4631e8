//! Workout Tracker Shared Library
//!
//! This crate contains the domain types, API request/response models and
//! validation helpers used by the backend and its clients.

/// Implements `as_str`, `FromStr` and `Display` for a unit-only enum stored
/// as text.
macro_rules! text_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::errors::DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err($crate::errors::DomainError::unknown($kind, other)),
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub mod achievements;
pub mod errors;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use achievements::{Comparison, Requirement, StatSnapshot, Statistic};
pub use errors::DomainError;
pub use models::{Difficulty, GoalStatus, MealType, Rarity, WorkoutStatus};
