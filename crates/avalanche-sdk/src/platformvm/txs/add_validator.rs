//! P-chain add-validator transaction.
use crate::{
    codec, constants,
    errors::{Error, Result},
    hash, ids, key, packer,
    platformvm::txs::Validator,
    txs::{self, transferable},
};
use serde::{Deserialize, Serialize};

/// Stakes AVAX to validate the primary network, naming the reward owner
/// and the validator's cut of delegation rewards.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/platformvm/txs#AddValidatorTx>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct Tx {
    pub base_tx: txs::Tx,
    pub validator: Validator,
    pub stake_outs: Option<Vec<transferable::Output>>,
    pub rewards_owner: key::secp256k1::txs::OutputOwners,
    /// The validator's share of delegation rewards, in 1/10,000ths of a
    /// percent (1_000_000 == 100%).
    pub shares: u32,
}

impl Tx {
    pub fn new(base_tx: txs::Tx) -> Self {
        Self {
            base_tx,
            ..Self::default()
        }
    }

    pub fn tx_id(&self) -> ids::Id {
        if let Some(m) = &self.base_tx.metadata {
            m.id
        } else {
            ids::Id::default()
        }
    }

    pub fn type_name() -> String {
        "platformvm.AddValidatorTx".to_string()
    }

    pub fn type_id() -> u32 {
        *(codec::P_TYPES.get(&Self::type_name()).unwrap()) as u32
    }

    pub fn verify(&self) -> Result<()> {
        self.validator.verify()?;
        if self.shares > constants::MAX_DELEGATION_SHARES {
            return Err(Error::InvalidInput {
                message: format!(
                    "shares {} exceed max {}",
                    self.shares,
                    constants::MAX_DELEGATION_SHARES
                ),
            });
        }
        self.rewards_owner.verify()?;
        self.base_tx.verify()
    }

    /// Packs `base body ‖ validator ‖ stake_outs ‖ rewards_owner(typed)
    /// ‖ shares(4)`.
    pub fn pack_unsigned(&self) -> Result<packer::Packer> {
        let packer = self.base_tx.pack(codec::VERSION, Self::type_id())?;
        self.validator.pack(&packer)?;

        if let Some(outs) = &self.stake_outs {
            packer.pack_u32(outs.len() as u32)?;
            for out in outs.iter() {
                out.pack(&packer)?;
            }
        } else {
            packer.pack_u32(0_u32)?;
        }

        // the rewards owner is an fx interface on the wire
        packer.pack_u32(key::secp256k1::txs::OutputOwners::type_id())?;
        self.rewards_owner.pack(&packer)?;

        packer.pack_u32(self.shares)?;
        Ok(packer)
    }

    pub fn unpack(d: &[u8]) -> Result<Self> {
        let packer = packer::Packer::load_bytes_for_unpack(d.len() + 1024, d);
        txs::Tx::unpack_header(&packer, Self::type_id())?;
        let base_tx = txs::Tx::unpack_body(&packer)?;

        let validator = Validator::unpack(&packer)?;

        let n = packer.unpack_u32()?;
        let stake_outs = if n > 0 {
            let mut outs = Vec::with_capacity(n as usize);
            for _ in 0..n {
                outs.push(transferable::Output::unpack(&packer)?);
            }
            Some(outs)
        } else {
            None
        };

        let owners_type_id = packer.unpack_u32()?;
        if owners_type_id != key::secp256k1::txs::OutputOwners::type_id() {
            return Err(Error::UnknownTypeId {
                type_id: owners_type_id,
                message: "expected secp256k1fx.OutputOwners".to_string(),
            });
        }
        let rewards_owner = key::secp256k1::txs::OutputOwners::unpack(&packer)?;
        let shares = packer.unpack_u32()?;

        Ok(Self {
            base_tx,
            validator,
            stake_outs,
            rewards_owner,
            shares,
        })
    }

    pub async fn sign<T: key::secp256k1::SignOnly>(&mut self, signers: Vec<Vec<T>>) -> Result<()> {
        self.verify()?;
        let packer = self.pack_unsigned()?;

        let unsigned = packer.take_bytes();
        packer.set_bytes(&unsigned);
        let digest = hash::sha256(&unsigned);

        let creds = super::sign_digest_all(&digest, &signers).await?;
        self.base_tx.metadata = Some(super::seal(packer, &creds)?);
        Ok(())
    }
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- platformvm::txs::add_validator::test_add_validator_round_trip --exact --show-output
#[test]
fn test_add_validator_round_trip() {
    use crate::ids::{node, short};

    let owner = short::Id::from_slice(&[0x01]);
    let tx = Tx {
        base_tx: txs::Tx {
            network_id: 5,
            blockchain_id: ids::Id::from_slice(&[0x01]),
            ..txs::Tx::default()
        },
        validator: Validator {
            node_id: node::Id::from_slice(&[0x02]),
            start_time: 1_000,
            end_time: 2_000,
            weight: constants::MIN_VALIDATOR_STAKE,
        },
        stake_outs: Some(vec![transferable::Output {
            asset_id: ids::Id::from_slice(&[0xaa]),
            out: transferable::TransferableOut::TransferOutput(
                key::secp256k1::txs::transfer::Output {
                    amount: constants::MIN_VALIDATOR_STAKE,
                    output_owners: key::secp256k1::txs::OutputOwners::new(0, 1, &[owner]),
                },
            ),
        }]),
        rewards_owner: key::secp256k1::txs::OutputOwners::new(0, 1, &[owner]),
        shares: 20_000, // 2%
    };
    tx.verify().unwrap();

    let packer = tx.pack_unsigned().unwrap();
    let b = packer.take_bytes();
    let decoded = Tx::unpack(&b).unwrap();
    assert_eq!(tx, decoded);

    // over-full shares rejected
    let mut bad = tx.clone();
    bad.shares = constants::MAX_DELEGATION_SHARES + 1;
    assert!(bad.verify().is_err());
}
