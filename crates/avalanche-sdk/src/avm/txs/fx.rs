//! Per-input credential, tagged by the fx that verifies it.
use crate::{errors::Result, key, nftfx, packer::Packer};
use serde::{Deserialize, Serialize};

/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/avm/fxs#FxCredential>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone)]
#[serde(untagged)]
pub enum Credential {
    Secp(key::secp256k1::txs::Credential),
    Nft(nftfx::Credential),
}

impl Default for Credential {
    fn default() -> Self {
        Credential::Secp(Default::default())
    }
}

impl Credential {
    pub fn type_id(&self) -> u32 {
        match self {
            Credential::Secp(_) => key::secp256k1::txs::Credential::type_id(),
            Credential::Nft(_) => nftfx::Credential::type_id(),
        }
    }

    pub fn signatures(&self) -> &[Vec<u8>] {
        match self {
            Credential::Secp(cred) => &cred.signatures,
            Credential::Nft(cred) => &cred.cred.signatures,
        }
    }

    /// Packs `cred_type_id(4) ‖ nsigs(4) ‖ sigs`.
    pub fn pack(&self, packer: &Packer) -> Result<()> {
        packer.pack_u32(self.type_id())?;
        match self {
            Credential::Secp(cred) => cred.pack(packer),
            Credential::Nft(cred) => cred.cred.pack(packer),
        }
    }
}
