//! X-chain (AVM) transaction types and builder.
pub mod builder;
pub mod txs;
