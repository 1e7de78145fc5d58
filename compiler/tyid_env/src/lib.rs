//! Type identity environment.
//!
//! An [`Environment`] gives a type checker two services:
//!
//! - **Canonicalization**: [`Environment::type_hash`] renders a type into an
//!   exact structural fingerprint, and [`Environment::type_for_hash`] maps
//!   each fingerprint to one canonical `Arc<Named>` for the environment's
//!   lifetime. [`Environment::instance`] composes the two.
//! - **Identity ids**: [`Environment::id_for`] hands out sequential `u32` ids
//!   keyed by reference identity.
//!
//! The fingerprint is produced by a [`TypeHasher`]; the hasher calls back
//! into the environment for the id of every named type it encodes.
//!
//! # Thread Safety
//! All state sits behind one mutex. Share an `&Environment` or clone a
//! [`SharedEnvironment`] across threads.

mod environment;
mod error;
mod hasher;

pub use environment::{Environment, SharedEnvironment};
pub use error::EnvError;
pub use hasher::{CanonicalHasher, TypeHasher};
