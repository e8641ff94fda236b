//! Cryptographic key abstractions for transaction signing.
pub mod secp256k1;
