//! Hot secp256k1 private key backed by "k256".
use std::str::FromStr;

use crate::{
    constants,
    errors::{Error, Result},
    formatting, hash,
    ids::short,
    key::{
        self,
        secp256k1::{public_key, signature::Sig},
    },
};
use async_trait::async_trait;
use k256::ecdsa::SigningKey;

/// The size (in bytes) of a secret key.
pub const LEN: usize = 32;

/// cb58-encoded private keys are prefixed with this.
/// ref. "avalanchego/utils/crypto.PrivateKeyPrefix"
pub const PRIVATE_KEY_ENCODE_PREFIX: &str = "PrivateKey-";

/// Represents "k256::ecdsa::SigningKey".
/// "k256::ecdsa::SigningKey" already implements "zeroize" with "Drop".
#[derive(Debug, Clone)]
pub struct Key(SigningKey);

impl Key {
    /// Generates a private key from random bytes.
    pub fn generate() -> Result<Self> {
        let mut rng = rand::thread_rng();
        let signing_key = SigningKey::random(&mut rng);
        Ok(Self(signing_key))
    }

    /// Loads the private key from the raw scalar bytes.
    pub fn from_bytes(raw: &[u8]) -> Result<Self> {
        if raw.len() != LEN {
            return Err(Error::InvalidInput {
                message: format!("private key must be {LEN}-byte, got {}", raw.len()),
            });
        }
        let signing_key = SigningKey::from_slice(raw).map_err(|e| Error::InvalidInput {
            message: format!("failed SigningKey::from_slice {e}"),
        })?;
        Ok(Self(signing_key))
    }

    /// Loads the private key from a cb58-encoded "PrivateKey-" string.
    /// ref. "avalanchego/utils/crypto.PrivateKeySECP256K1R"
    pub fn from_cb58(encoded: impl AsRef<str>) -> Result<Self> {
        let raw = encoded
            .as_ref()
            .trim()
            .trim_start_matches(PRIVATE_KEY_ENCODE_PREFIX);
        let b = formatting::decode_cb58_with_checksum(raw)?;
        Self::from_bytes(&b)
    }

    /// Encodes the private key as a cb58 "PrivateKey-" string.
    pub fn to_cb58(&self) -> String {
        let b = self.to_bytes();
        let enc = formatting::encode_cb58_with_checksum_string(&b);
        format!("{PRIVATE_KEY_ENCODE_PREFIX}{enc}")
    }

    pub fn to_bytes(&self) -> [u8; LEN] {
        let b = self.0.to_bytes();
        let mut bb = [0u8; LEN];
        bb.copy_from_slice(&b);
        bb
    }

    pub fn to_public_key(&self) -> public_key::Key {
        public_key::Key::from_verifying_key(self.0.verifying_key())
    }

    /// Signs the 32-byte SHA256 output message with the ECDSA private key,
    /// producing the 65-byte "r ‖ s ‖ v" recoverable signature.
    /// ref. "avalanchego/utils/crypto.PrivateKeySECP256K1R.SignHash"
    pub fn sign_digest(&self, digest: &[u8]) -> Result<Sig> {
        // ref. "crypto/sha256.Size"
        if digest.len() != hash::SHA256_OUTPUT_LEN {
            return Err(Error::InvalidInput {
                message: format!(
                    "sign_digest only takes {}-byte, got {}-byte",
                    hash::SHA256_OUTPUT_LEN,
                    digest.len()
                ),
            });
        }

        let (sig, recid) =
            self.0
                .sign_prehash_recoverable(digest)
                .map_err(|e| Error::InvalidInput {
                    message: format!("failed sign_prehash_recoverable '{e}'"),
                })?;
        Ok(Sig((sig, recid)))
    }
}

impl FromStr for Key {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_cb58(s)
    }
}

impl key::secp256k1::ReadOnly for Key {
    fn short_address(&self) -> Result<short::Id> {
        self.to_public_key().to_short_id()
    }

    fn hrp_address(&self, network_id: u32, chain_id_alias: &str) -> Result<String> {
        let hrp = constants::hrp_for_network(network_id);
        self.to_public_key().to_hrp_address(chain_id_alias, hrp)
    }
}

#[async_trait]
impl key::secp256k1::SignOnly for Key {
    async fn sign_digest(&self, digest: &[u8]) -> Result<[u8; 65]> {
        let sig = Key::sign_digest(self, digest)?;
        Ok(sig.to_bytes())
    }
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- key::secp256k1::private_key::test_key_round_trip --exact --show-output
#[test]
fn test_key_round_trip() {
    let k = Key::generate().unwrap();
    let encoded = k.to_cb58();
    assert!(encoded.starts_with(PRIVATE_KEY_ENCODE_PREFIX));

    let k2 = Key::from_cb58(&encoded).unwrap();
    assert_eq!(k.to_bytes(), k2.to_bytes());
    assert_eq!(
        k.to_public_key().to_short_id().unwrap(),
        k2.to_public_key().to_short_id().unwrap()
    );
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- key::secp256k1::private_key::test_known_key_address --exact --show-output
/// ref. "avalanchego/vms/avm/vm_test.go" test key
#[test]
fn test_known_key_address() {
    let k = Key::from_cb58("PrivateKey-24jUJ9vZexUM6expyMcT48LBx27k1m7xpraoV62oSQAHdziao5").unwrap();
    let short_addr = k.to_public_key().to_short_id().unwrap();
    assert_eq!(
        short_addr,
        short::Id::from_slice(&<Vec<u8>>::from([
            0xfc, 0xed, 0xa8, 0xf9, 0x0f, 0xcb, 0x5d, 0x30, //
            0x61, 0x4b, 0x99, 0xd7, 0x9f, 0xc4, 0xba, 0xa2, //
            0x93, 0x07, 0x76, 0x26, //
        ]))
    );
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- key::secp256k1::private_key::test_sign_recover --exact --show-output
#[test]
fn test_sign_recover() {
    let k = Key::generate().unwrap();
    let digest = hash::sha256(b"hello");

    let sig = k.sign_digest(&digest).unwrap();
    let b = sig.to_bytes();
    assert_eq!(b.len(), crate::key::secp256k1::signature::LEN);

    // deterministic (RFC 6979)
    let sig2 = k.sign_digest(&digest).unwrap();
    assert_eq!(b, sig2.to_bytes());

    // recovered key matches the signer
    let recovered = Sig::from_bytes(&b)
        .unwrap()
        .recover_verifying_key(&digest)
        .unwrap();
    assert_eq!(
        public_key::Key::from_verifying_key(&recovered).to_short_id().unwrap(),
        k.to_public_key().to_short_id().unwrap()
    );
}
