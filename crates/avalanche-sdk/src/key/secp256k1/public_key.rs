//! secp256k1 public key and address derivation.
use crate::{
    errors::{Error, Result},
    formatting, hash,
    ids::short,
    key::secp256k1::signature::Sig,
};
use k256::{
    ecdsa::{signature::hazmat::PrehashVerifier, VerifyingKey},
    PublicKey,
};

/// The size (in bytes) of a compressed public key.
/// ref. "secp256k1::constants::PUBLIC_KEY_SIZE"
pub const LEN: usize = 33;

/// Represents "k256::PublicKey" and "k256::ecdsa::VerifyingKey".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key(pub PublicKey);

impl Key {
    /// Decodes compressed or uncompressed SEC1 public key bytes.
    /// ref. <http://www.secg.org/sec1-v2.pdf>
    pub fn from_sec1_bytes(b: &[u8]) -> Result<Self> {
        let pubkey = PublicKey::from_sec1_bytes(b).map_err(|e| Error::InvalidInput {
            message: format!("failed PublicKey::from_sec1_bytes {e}"),
        })?;
        Ok(Self(pubkey))
    }

    pub fn from_verifying_key(verifying_key: &VerifyingKey) -> Self {
        let pubkey: PublicKey = verifying_key.into();
        Self(pubkey)
    }

    pub fn to_verifying_key(&self) -> VerifyingKey {
        self.0.into()
    }

    /// Verifies the digest against the recoverable signature.
    pub fn verify(&self, digest: &[u8], sig: &[u8]) -> Result<bool> {
        let sig = Sig::from_bytes(sig)?;

        let verifying_key = self.to_verifying_key();
        if verifying_key.verify_prehash(digest, &sig.0 .0).is_err() {
            return Ok(false);
        }

        let recovered = sig.recover_verifying_key(digest)?;
        Ok(*self == Self::from_verifying_key(&recovered))
    }

    /// Converts the public key to compressed bytes.
    pub fn to_compressed_bytes(&self) -> [u8; LEN] {
        let vkey: VerifyingKey = self.0.into();
        let ep = vkey.to_encoded_point(true);
        let bb = ep.as_bytes();

        let mut b = [0u8; LEN];
        b.copy_from_slice(bb);
        b
    }

    /// "hashing.PubkeyBytesToAddress": the short address is
    /// ripemd160(sha256(compressed public key)).
    /// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/utils/hashing#PubkeyBytesToAddress>
    pub fn to_short_bytes(&self) -> Result<Vec<u8>> {
        let compressed = self.to_compressed_bytes();
        hash::sha256_ripemd160(compressed)
    }

    pub fn to_short_id(&self) -> Result<short::Id> {
        let b = self.to_short_bytes()?;
        Ok(short::Id::from_slice(&b))
    }

    /// Formats the short address as `<chain-alias>-<bech32(hrp, addr)>`.
    pub fn to_hrp_address(&self, chain_id_alias: &str, hrp: &str) -> Result<String> {
        let b = self.to_short_bytes()?;
        formatting::address(chain_id_alias, hrp, &b)
    }
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- key::secp256k1::public_key::test_public_key --exact --show-output
#[test]
fn test_public_key() {
    let k = crate::key::secp256k1::private_key::Key::generate().unwrap();
    let pubkey = k.to_public_key();

    let compressed = pubkey.to_compressed_bytes();
    assert_eq!(compressed.len(), LEN);
    let pubkey2 = Key::from_sec1_bytes(&compressed).unwrap();
    assert_eq!(pubkey, pubkey2);

    let digest = hash::sha256(b"payload");
    let sig = k.sign_digest(&digest).unwrap();
    assert!(pubkey.verify(&digest, &sig.to_bytes()).unwrap());

    // a different digest must not verify
    let other = hash::sha256(b"other payload");
    assert!(!pubkey.verify(&other, &sig.to_bytes()).unwrap());

    let addr = pubkey.to_hrp_address("X", "avax").unwrap();
    assert!(addr.starts_with("X-avax1"));
}
