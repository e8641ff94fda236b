//! P-chain transaction kinds.
pub mod add_delegator;
pub mod add_subnet_validator;
pub mod add_validator;
pub mod export;
pub mod import;

use crate::{
    errors::{Error, Result},
    ids::node,
    key, packer, txs,
};
use serde::{Deserialize, Serialize};

/// The staking window and weight of a validator or delegator.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/platformvm/txs#Validator>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct Validator {
    #[serde(rename = "nodeID")]
    pub node_id: node::Id,
    #[serde(rename = "startTime")]
    pub start_time: u64,
    #[serde(rename = "endTime")]
    pub end_time: u64,
    /// The stake amount for primary-network stakers, the sampling weight
    /// for subnet validators.
    pub weight: u64,
}

impl Validator {
    /// ref. "platformvm/txs.Validator.Verify"
    pub fn verify(&self) -> Result<()> {
        if self.node_id.is_empty() {
            return Err(Error::InvalidInput {
                message: "node id is not set".to_string(),
            });
        }
        if self.end_time <= self.start_time {
            // ref. "errBadSubnetID"/"errStakeTooShort" family
            return Err(Error::InvalidInput {
                message: format!(
                    "end time {} not after start time {}",
                    self.end_time, self.start_time
                ),
            });
        }
        if self.weight == 0 {
            return Err(Error::InvalidInput {
                message: "weight is zero".to_string(),
            });
        }
        Ok(())
    }

    /// Packs `node_id(20) ‖ start(8) ‖ end(8) ‖ weight(8)`.
    pub fn pack(&self, packer: &packer::Packer) -> Result<()> {
        packer.pack_bytes(self.node_id.as_ref())?;
        packer.pack_u64(self.start_time)?;
        packer.pack_u64(self.end_time)?;
        packer.pack_u64(self.weight)
    }

    pub fn unpack(packer: &packer::Packer) -> Result<Self> {
        let node_id = node::Id::from_slice(&packer.unpack_bytes(node::LEN)?);
        let start_time = packer.unpack_u64()?;
        let end_time = packer.unpack_u64()?;
        let weight = packer.unpack_u64()?;
        Ok(Self {
            node_id,
            start_time,
            end_time,
            weight,
        })
    }
}

/// Appends `numCreds(4) ‖ (secp256k1fx.Credential type ID ‖ numSigs ‖ sigs)*`
/// to the unsigned bytes in the packer; P-chain credentials are all secp.
pub(crate) fn seal(
    packer: packer::Packer,
    creds: &[key::secp256k1::txs::Credential],
) -> Result<txs::Metadata> {
    let tx_bytes_with_no_signature = packer.take_bytes();
    packer.set_bytes(&tx_bytes_with_no_signature);

    packer.pack_u32(creds.len() as u32)?;
    let cred_type_id = key::secp256k1::txs::Credential::type_id();
    for cred in creds.iter() {
        packer.pack_u32(cred_type_id)?;
        cred.pack(&packer)?;
    }

    let tx_bytes_with_signatures = packer.take_bytes();
    Ok(txs::Metadata::new(
        &tx_bytes_with_no_signature,
        &tx_bytes_with_signatures,
    ))
}

/// Signs the digest once per input, in sorted-input order.
pub(crate) async fn sign_digest_all<T: key::secp256k1::SignOnly>(
    digest: &[u8],
    signers: &[Vec<T>],
) -> Result<Vec<key::secp256k1::txs::Credential>> {
    let mut creds: Vec<key::secp256k1::txs::Credential> = Vec::with_capacity(signers.len());
    for keys in signers.iter() {
        let mut sigs: Vec<Vec<u8>> = Vec::with_capacity(keys.len());
        for k in keys.iter() {
            let sig = k.sign_digest(digest).await?;
            sigs.push(Vec::from(sig));
        }
        creds.push(key::secp256k1::txs::Credential { signatures: sigs });
    }
    Ok(creds)
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- platformvm::txs::test_validator --exact --show-output
#[test]
fn test_validator() {
    let v = Validator {
        node_id: node::Id::from_slice(&[0x01]),
        start_time: 100,
        end_time: 200,
        weight: 2_000,
    };
    v.verify().unwrap();

    let packer = packer::Packer::new_for_tx();
    v.pack(&packer).unwrap();
    let b = packer.take_bytes();
    assert_eq!(b.len(), 20 + 8 + 8 + 8);
    let packer = packer::Packer::load_bytes_for_unpack(1024, &b);
    assert_eq!(Validator::unpack(&packer).unwrap(), v);

    // end must be after start
    let v = Validator {
        node_id: node::Id::from_slice(&[0x01]),
        start_time: 200,
        end_time: 200,
        weight: 2_000,
    };
    assert!(v.verify().is_err());
}
