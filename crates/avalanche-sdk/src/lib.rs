//! # avalanche-sdk
//!
//! avalanche-sdk is a client-side library for the Avalanche network: it
//! builds, serializes, signs, and issues X-chain (AVM) and P-chain
//! (PlatformVM) transactions from a user's UTXOs.
//!
//! The byte formats are consensus-critical. Every typed entity has a
//! deterministic, round-trippable wire form; inputs, outputs, owner
//! addresses, and signature indices are sorted into canonical order before
//! any digest is taken, and the per-input signer lists survive those sorts
//! so credentials land next to the inputs they spend.
//!
#![cfg_attr(docsrs, feature(doc_cfg))]
pub mod avm;
pub mod codec;
pub mod constants;
pub mod errors;
pub mod formatting;
pub mod hash;
pub mod ids;
pub mod jsonrpc;
pub mod key;
pub mod nftfx;
pub mod packer;
pub mod platformvm;
pub mod storage;
pub mod txs;
pub mod units;

#[cfg(feature = "wallet")]
#[cfg_attr(docsrs, doc(cfg(feature = "wallet")))]
pub mod wallet;
