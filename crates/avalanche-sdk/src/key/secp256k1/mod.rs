//! secp256k1 key capabilities and fx types.
pub mod keychain;
pub mod private_key;
pub mod public_key;
pub mod signature;
pub mod txs;

use crate::{errors::Result, ids::short};
use async_trait::async_trait;

/// The capability to produce 65-byte recoverable signatures over
/// 32-byte SHA256 digests. Key material stays behind this seam;
/// remote signers implement the same trait.
#[async_trait]
pub trait SignOnly: Send + Sync {
    async fn sign_digest(&self, digest: &[u8]) -> Result<[u8; signature::LEN]>;
}

/// The read-only side of a key: address derivation.
pub trait ReadOnly {
    /// Returns the 20-byte short address of the key.
    fn short_address(&self) -> Result<short::Id>;

    /// Returns the bech32 address for the network and chain alias
    /// (e.g. "X-avax1...").
    fn hrp_address(&self, network_id: u32, chain_id_alias: &str) -> Result<String>;
}
