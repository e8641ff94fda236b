//! P-chain (PlatformVM) transaction types and builder.
pub mod builder;
pub mod txs;
