//! secp256k1 mint output and mint operation.
use std::cmp::Ordering;

use crate::{
    codec,
    errors::Result,
    key,
    packer::Packer,
};
use serde::{Deserialize, Serialize};

/// The right to mint more units of an asset; carries no amount, only owners.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/secp256k1fx#MintOutput>
#[derive(Debug, Serialize, Deserialize, Eq, Clone, Default)]
pub struct Output {
    #[serde(flatten)]
    pub output_owners: key::secp256k1::txs::OutputOwners,
}

impl Output {
    pub fn new(output_owners: key::secp256k1::txs::OutputOwners) -> Self {
        Self { output_owners }
    }

    pub fn type_name() -> String {
        "secp256k1fx.MintOutput".to_string()
    }

    pub fn type_id() -> u32 {
        *(codec::X_TYPES.get(&Self::type_name()).unwrap()) as u32
    }

    pub fn verify(&self) -> Result<()> {
        self.output_owners.verify()
    }

    pub fn pack(&self, packer: &Packer) -> Result<()> {
        self.output_owners.pack(packer)
    }

    pub fn unpack(packer: &Packer) -> Result<Self> {
        let output_owners = key::secp256k1::txs::OutputOwners::unpack(packer)?;
        Ok(Self { output_owners })
    }
}

impl Ord for Output {
    fn cmp(&self, other: &Output) -> Ordering {
        self.output_owners.cmp(&other.output_owners)
    }
}

impl PartialOrd for Output {
    fn partial_cmp(&self, other: &Output) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Output {
    fn eq(&self, other: &Output) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

/// Consumes a mint output and produces a fresh mint output plus newly
/// minted transfer units.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/secp256k1fx#MintOperation>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct Operation {
    /// Proof of ownership over the consumed mint output.
    pub mint_input: key::secp256k1::txs::Input,
    /// The re-created minting right.
    pub mint_output: Output,
    /// The newly minted units.
    pub transfer_output: key::secp256k1::txs::transfer::Output,
}

impl Operation {
    pub fn type_name() -> String {
        "secp256k1fx.MintOperation".to_string()
    }

    pub fn type_id() -> u32 {
        *(codec::X_TYPES.get(&Self::type_name()).unwrap()) as u32
    }

    pub fn verify(&self) -> Result<()> {
        self.mint_input.verify()?;
        self.mint_output.verify()?;
        self.transfer_output.verify()
    }

    /// Packs `input ‖ mint_output ‖ transfer_output` (without the op type ID).
    pub fn pack(&self, packer: &Packer) -> Result<()> {
        self.mint_input.pack(packer)?;
        self.mint_output.pack(packer)?;
        self.transfer_output.pack(packer)
    }

    pub fn unpack(packer: &Packer) -> Result<Self> {
        let mint_input = key::secp256k1::txs::Input::unpack(packer)?;
        let mint_output = Output::unpack(packer)?;
        let transfer_output = key::secp256k1::txs::transfer::Output::unpack(packer)?;
        Ok(Self {
            mint_input,
            mint_output,
            transfer_output,
        })
    }
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- key::secp256k1::txs::mint::test_mint_operation_round_trip --exact --show-output
#[test]
fn test_mint_operation_round_trip() {
    use crate::ids::short;

    let owners = key::secp256k1::txs::OutputOwners::new(0, 1, &[short::Id::from_slice(&[0x01])]);
    let op = Operation {
        mint_input: key::secp256k1::txs::Input::new(vec![0]),
        mint_output: Output::new(owners.clone()),
        transfer_output: key::secp256k1::txs::transfer::Output::new(777, owners),
    };
    op.verify().unwrap();

    let packer = Packer::new_for_tx();
    op.pack(&packer).unwrap();
    let b = packer.take_bytes();

    let packer = Packer::load_bytes_for_unpack(1024, &b);
    let decoded = Operation::unpack(&packer).unwrap();
    assert_eq!(op, decoded);
}
