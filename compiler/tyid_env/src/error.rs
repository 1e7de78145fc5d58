//! Recoverable environment errors.
//!
//! Misuse (missing type arguments, arguments on a non-generic type, reserved
//! bytes in a hash) is a caller or hasher bug and panics instead.

/// Error when the environment cannot satisfy a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvError {
    /// Every `u32` id has been handed out.
    #[error("environment exhausted its id space after {assigned} instances")]
    IdOverflow { assigned: u64 },
}
