//! Custom error types used in avalanche-sdk.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Backing errors for all build, codec, and issue operations.
#[derive(Clone, Debug, Error)]
pub enum Error {
    /// Malformed caller input (bad address, out-of-range field, invalid
    /// staking window, etc.).
    #[error("invalid input (message: {message:?})")]
    InvalidInput { message: String },

    /// Coin selection could not satisfy the requested amount/burn targets.
    #[error("insufficient funds (message: {message:?})")]
    InsufficientFunds { message: String },

    /// A checksummed encoding (cb58 or hex) failed its checksum.
    #[error("invalid checksum (message: {message:?})")]
    Checksum { message: String },

    /// The codec ran out of bytes while unpacking.
    #[error("truncated buffer (message: {message:?})")]
    TruncatedBuffer { message: String },

    /// The codec read a type ID with no registered type.
    #[error("unknown type ID {type_id} (message: {message:?})")]
    UnknownTypeId { type_id: u32, message: String },

    /// A selected spender address is not in the referenced owner set.
    /// Never expected in practice; indicates a selection bug.
    #[error("spender mismatch (message: {message:?})")]
    SpenderMismatch { message: String },

    /// The fee sanity check rejected the built transaction.
    #[error("goose egg (message: {message:?})")]
    GooseEgg { message: String },

    /// A field required at pack/issue time was never set.
    #[error("invalid state (message: {message:?})")]
    State { message: String },

    /// Transport or node-side RPC failure, surfaced verbatim.
    #[error("failed API (message: {message:?}, retryable: {retryable:?})")]
    API { message: String, retryable: bool },
}

impl Error {
    /// Returns the error message in "String".
    #[inline]
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Error::InvalidInput { message }
            | Error::InsufficientFunds { message }
            | Error::Checksum { message }
            | Error::TruncatedBuffer { message }
            | Error::UnknownTypeId { message, .. }
            | Error::SpenderMismatch { message }
            | Error::GooseEgg { message }
            | Error::State { message }
            | Error::API { message, .. } => message.clone(),
        }
    }

    /// Returns if the error is retryable.
    /// Everything but the API transport kind is deterministic.
    #[inline]
    #[must_use]
    pub fn retryable(&self) -> bool {
        match self {
            Error::API { retryable, .. } => *retryable,
            _ => false,
        }
    }

    /// Returns true if the error message contains the substring.
    #[inline]
    #[must_use]
    pub fn contains(&self, s: &str) -> bool {
        self.message().contains(s)
    }
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- errors::test_error_kinds --exact --show-output
#[test]
fn test_error_kinds() {
    let e = Error::InsufficientFunds {
        message: "asset drained".to_string(),
    };
    assert!(e.contains("drained"));
    assert!(!e.retryable());

    let e = Error::API {
        message: "503".to_string(),
        retryable: true,
    };
    assert!(e.retryable());

    let e = Error::UnknownTypeId {
        type_id: 99,
        message: "no registered output type".to_string(),
    };
    assert!(e.to_string().contains("99"));
}
