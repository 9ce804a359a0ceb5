//! Deciding which of two releases of the same slot survives.
//!
//! Everything here is pure: [`resolve`] returns a [`Resolution`] and the
//! [`organize`](crate::organize) executor carries it out.

mod decision;
mod resolve;
mod score;

pub use self::decision::{Outcome, UpgradeDecision, decide};
pub use self::resolve::{Resolution, covers, resolve, same_slot};
pub use self::score::Scorer;
