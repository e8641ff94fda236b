use crate::errors::{Error, Result};
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};

/// The length of a recoverable ECDSA signature: r(32) ‖ s(32) ‖ v(1).
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/utils/crypto#SECP256K1RSigLen>
pub const LEN: usize = 65;

/// Represents a recoverable signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sig(pub (Signature, RecoveryId));

impl Sig {
    /// Loads the recoverable signature from the bytes.
    pub fn from_bytes(b: &[u8]) -> Result<Self> {
        if b.len() != LEN {
            return Err(Error::InvalidInput {
                message: format!("invalid signature length {}", b.len()),
            });
        }

        let sig = Signature::try_from(&b[..64]).map_err(|e| Error::InvalidInput {
            message: format!("failed to load recoverable signature {e}"),
        })?;
        let recid = RecoveryId::try_from(b[64]).map_err(|e| Error::InvalidInput {
            message: format!("failed to create recovery Id {e}"),
        })?;
        Ok(Self((sig, recid)))
    }

    /// Converts the signature to the 65-byte wire form.
    pub fn to_bytes(&self) -> [u8; LEN] {
        let bb = self.0 .0.to_bytes();

        let mut b = [0u8; LEN];
        b.copy_from_slice(&[&bb[..], &[self.0 .1.to_byte()]].concat());
        b
    }

    /// Recovers the verifying key from the 32-byte SHA256 digest.
    pub fn recover_verifying_key(&self, digest: &[u8]) -> Result<VerifyingKey> {
        VerifyingKey::recover_from_prehash(digest, &self.0 .0, self.0 .1).map_err(|e| {
            Error::InvalidInput {
                message: format!("failed recover_from_prehash {e}"),
            }
        })
    }

    /// Returns the recovery Id.
    pub fn v(&self) -> u8 {
        self.0 .1.to_byte()
    }
}
