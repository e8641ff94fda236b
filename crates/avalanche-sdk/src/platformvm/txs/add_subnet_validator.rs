//! P-chain add-subnet-validator transaction.
use crate::{
    codec,
    errors::{Error, Result},
    hash, ids, key, packer,
    platformvm::txs::Validator,
    txs::{self},
};
use serde::{Deserialize, Serialize};

/// Adds a validator to a subnet with a sampling weight; spending authority
/// over the subnet is proven by the subnet auth signature indices.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/platformvm/txs#AddSubnetValidatorTx>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct Tx {
    pub base_tx: txs::Tx,
    pub validator: Validator,
    #[serde(rename = "subnetID")]
    pub subnet_id: ids::Id,
    /// Indices into the subnet owner's control keys.
    pub subnet_auth: key::secp256k1::txs::Input,
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
        "platformvm.AddSubnetValidatorTx".to_string()
    }

    pub fn type_id() -> u32 {
        *(codec::P_TYPES.get(&Self::type_name()).unwrap()) as u32
    }

    pub fn verify(&self) -> Result<()> {
        self.validator.verify()?;
        if self.subnet_id.is_empty() {
            return Err(Error::InvalidInput {
                message: "subnet id is not set".to_string(),
            });
        }
        self.subnet_auth.verify()?;
        self.base_tx.verify()
    }

    /// Packs `base body ‖ validator ‖ subnet_id(32) ‖ subnet_auth(typed)`.
    pub fn pack_unsigned(&self) -> Result<packer::Packer> {
        let packer = self.base_tx.pack(codec::VERSION, Self::type_id())?;
        self.validator.pack(&packer)?;
        packer.pack_bytes(self.subnet_id.as_ref())?;

        // the subnet auth is an fx interface on the wire
        packer.pack_u32(key::secp256k1::txs::Input::type_id())?;
        self.subnet_auth.pack(&packer)?;
        Ok(packer)
    }

    pub fn unpack(d: &[u8]) -> Result<Self> {
        let packer = packer::Packer::load_bytes_for_unpack(d.len() + 1024, d);
        txs::Tx::unpack_header(&packer, Self::type_id())?;
        let base_tx = txs::Tx::unpack_body(&packer)?;

        let validator = Validator::unpack(&packer)?;
        let subnet_id = ids::Id::from_slice(&packer.unpack_bytes(ids::LEN)?);

        let auth_type_id = packer.unpack_u32()?;
        if auth_type_id != key::secp256k1::txs::Input::type_id() {
            return Err(Error::UnknownTypeId {
                type_id: auth_type_id,
                message: "expected secp256k1fx.Input".to_string(),
            });
        }
        let subnet_auth = key::secp256k1::txs::Input::unpack(&packer)?;

        Ok(Self {
            base_tx,
            validator,
            subnet_id,
            subnet_auth,
        })
    }

    /// Credentials cover the base inputs first, then the subnet auth.
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

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- platformvm::txs::add_subnet_validator::test_add_subnet_validator_round_trip --exact --show-output
#[test]
fn test_add_subnet_validator_round_trip() {
    use crate::ids::node;

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
            weight: 7,
        },
        subnet_id: ids::Id::from_slice(&[0x03]),
        subnet_auth: key::secp256k1::txs::Input::new(vec![0, 1]),
    };
    tx.verify().unwrap();

    let packer = tx.pack_unsigned().unwrap();
    let b = packer.take_bytes();
    let decoded = Tx::unpack(&b).unwrap();
    assert_eq!(tx, decoded);

    // the subnet must be named
    let mut bad = tx.clone();
    bad.subnet_id = ids::Id::empty();
    assert!(bad.verify().is_err());
}
