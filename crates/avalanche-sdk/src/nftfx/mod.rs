//! NFT fx output and operation types (X-chain only).
use std::cmp::Ordering;

use crate::{
    codec, constants,
    errors::{Error, Result},
    key,
    packer::Packer,
};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

/// The right to mint NFTs into the group.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/nftfx#MintOutput>
#[derive(Debug, Serialize, Deserialize, Eq, Clone, Default)]
pub struct MintOutput {
    #[serde(rename = "groupID")]
    pub group_id: u32,
    #[serde(flatten)]
    pub output_owners: key::secp256k1::txs::OutputOwners,
}

impl MintOutput {
    pub fn new(group_id: u32, output_owners: key::secp256k1::txs::OutputOwners) -> Self {
        Self {
            group_id,
            output_owners,
        }
    }

    pub fn type_name() -> String {
        "nftfx.MintOutput".to_string()
    }

    pub fn type_id() -> u32 {
        *(codec::X_TYPES.get(&Self::type_name()).unwrap()) as u32
    }

    pub fn verify(&self) -> Result<()> {
        self.output_owners.verify()
    }

    /// Packs `group_id(4) ‖ output_owners` (without the type ID prefix).
    pub fn pack(&self, packer: &Packer) -> Result<()> {
        packer.pack_u32(self.group_id)?;
        self.output_owners.pack(packer)
    }

    pub fn unpack(packer: &Packer) -> Result<Self> {
        let group_id = packer.unpack_u32()?;
        let output_owners = key::secp256k1::txs::OutputOwners::unpack(packer)?;
        Ok(Self {
            group_id,
            output_owners,
        })
    }
}

impl Ord for MintOutput {
    fn cmp(&self, other: &MintOutput) -> Ordering {
        self.group_id
            .cmp(&other.group_id)
            .then_with(|| self.output_owners.cmp(&other.output_owners))
    }
}

impl PartialOrd for MintOutput {
    fn partial_cmp(&self, other: &MintOutput) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for MintOutput {
    fn eq(&self, other: &MintOutput) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

/// One NFT: a group ID plus an immutable payload, owned by the owner set.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/nftfx#TransferOutput>
#[serde_as]
#[derive(Debug, Serialize, Deserialize, Eq, Clone, Default)]
pub struct TransferOutput {
    #[serde(rename = "groupID")]
    pub group_id: u32,
    #[serde_as(as = "serde_with::hex::Hex")]
    pub payload: Vec<u8>,
    #[serde(flatten)]
    pub output_owners: key::secp256k1::txs::OutputOwners,
}

impl TransferOutput {
    pub fn new(
        group_id: u32,
        payload: Vec<u8>,
        output_owners: key::secp256k1::txs::OutputOwners,
    ) -> Self {
        Self {
            group_id,
            payload,
            output_owners,
        }
    }

    pub fn type_name() -> String {
        "nftfx.TransferOutput".to_string()
    }

    pub fn type_id() -> u32 {
        *(codec::X_TYPES.get(&Self::type_name()).unwrap()) as u32
    }

    pub fn verify(&self) -> Result<()> {
        if self.payload.len() > constants::MAX_NFT_PAYLOAD_SIZE {
            // ref. "errPayloadTooLarge"
            return Err(Error::InvalidInput {
                message: format!(
                    "payload {} exceeds max size {}",
                    self.payload.len(),
                    constants::MAX_NFT_PAYLOAD_SIZE
                ),
            });
        }
        self.output_owners.verify()
    }

    /// Packs `group_id(4) ‖ payload(4 + len) ‖ output_owners`
    /// (without the type ID prefix).
    pub fn pack(&self, packer: &Packer) -> Result<()> {
        packer.pack_u32(self.group_id)?;
        packer.pack_bytes_with_header(&self.payload)?;
        self.output_owners.pack(packer)
    }

    pub fn unpack(packer: &Packer) -> Result<Self> {
        let group_id = packer.unpack_u32()?;
        let payload = packer.unpack_bytes_with_header()?;
        let output_owners = key::secp256k1::txs::OutputOwners::unpack(packer)?;
        Ok(Self {
            group_id,
            payload,
            output_owners,
        })
    }
}

impl Ord for TransferOutput {
    fn cmp(&self, other: &TransferOutput) -> Ordering {
        self.group_id
            .cmp(&other.group_id)
            .then_with(|| self.payload.cmp(&other.payload))
            .then_with(|| self.output_owners.cmp(&other.output_owners))
    }
}

impl PartialOrd for TransferOutput {
    fn partial_cmp(&self, other: &TransferOutput) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for TransferOutput {
    fn eq(&self, other: &TransferOutput) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

/// Consumes an NFT mint output and creates the group's NFTs.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/nftfx#MintOperation>
#[serde_as]
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct MintOperation {
    /// Proof of ownership over the consumed mint output.
    pub mint_input: key::secp256k1::txs::Input,
    #[serde(rename = "groupID")]
    pub group_id: u32,
    #[serde_as(as = "serde_with::hex::Hex")]
    pub payload: Vec<u8>,
    /// Owner sets of the minted NFTs; one transfer output is created per set.
    pub outputs: Vec<key::secp256k1::txs::OutputOwners>,
}

impl MintOperation {
    pub fn type_name() -> String {
        "nftfx.MintOperation".to_string()
    }

    pub fn type_id() -> u32 {
        *(codec::X_TYPES.get(&Self::type_name()).unwrap()) as u32
    }

    pub fn verify(&self) -> Result<()> {
        self.mint_input.verify()?;
        if self.payload.len() > constants::MAX_NFT_PAYLOAD_SIZE {
            return Err(Error::InvalidInput {
                message: format!(
                    "payload {} exceeds max size {}",
                    self.payload.len(),
                    constants::MAX_NFT_PAYLOAD_SIZE
                ),
            });
        }
        for owners in self.outputs.iter() {
            owners.verify()?;
        }
        Ok(())
    }

    /// Packs `input ‖ group_id(4) ‖ payload(4 + len) ‖ nowners(4) ‖ owners`
    /// (without the op type ID). The owner sets are concrete structs on the
    /// wire; they carry no type IDs.
    pub fn pack(&self, packer: &Packer) -> Result<()> {
        self.mint_input.pack(packer)?;
        packer.pack_u32(self.group_id)?;
        packer.pack_bytes_with_header(&self.payload)?;
        packer.pack_u32(self.outputs.len() as u32)?;
        for owners in self.outputs.iter() {
            owners.pack(packer)?;
        }
        Ok(())
    }

    pub fn unpack(packer: &Packer) -> Result<Self> {
        let mint_input = key::secp256k1::txs::Input::unpack(packer)?;
        let group_id = packer.unpack_u32()?;
        let payload = packer.unpack_bytes_with_header()?;
        let n = packer.unpack_u32()?;
        let mut outputs = Vec::with_capacity(n as usize);
        for _ in 0..n {
            outputs.push(key::secp256k1::txs::OutputOwners::unpack(packer)?);
        }
        Ok(Self {
            mint_input,
            group_id,
            payload,
            outputs,
        })
    }
}

/// Moves an NFT to a new owner set.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/nftfx#TransferOperation>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct TransferOperation {
    pub input: key::secp256k1::txs::Input,
    pub output: TransferOutput,
}

impl TransferOperation {
    pub fn type_name() -> String {
        "nftfx.TransferOperation".to_string()
    }

    pub fn type_id() -> u32 {
        *(codec::X_TYPES.get(&Self::type_name()).unwrap()) as u32
    }

    pub fn verify(&self) -> Result<()> {
        self.input.verify()?;
        self.output.verify()
    }

    /// Packs `input ‖ transfer_output` (without the op type ID).
    pub fn pack(&self, packer: &Packer) -> Result<()> {
        self.input.pack(packer)?;
        self.output.pack(packer)
    }

    pub fn unpack(packer: &Packer) -> Result<Self> {
        let input = key::secp256k1::txs::Input::unpack(packer)?;
        let output = TransferOutput::unpack(packer)?;
        Ok(Self { input, output })
    }
}

/// Same wire shape as the secp256k1fx credential, tagged with the nftfx
/// credential type ID.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/nftfx#Credential>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct Credential {
    pub cred: key::secp256k1::txs::Credential,
}

impl Credential {
    pub fn type_name() -> String {
        "nftfx.Credential".to_string()
    }

    pub fn type_id() -> u32 {
        *(codec::X_TYPES.get(&Self::type_name()).unwrap()) as u32
    }
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- nftfx::test_nft_round_trips --exact --show-output
#[test]
fn test_nft_round_trips() {
    use crate::ids::short;

    let owners = key::secp256k1::txs::OutputOwners::new(0, 1, &[short::Id::from_slice(&[0x01])]);

    let out = TransferOutput::new(7, vec![0xde, 0xad], owners.clone());
    out.verify().unwrap();
    let packer = Packer::new_for_tx();
    out.pack(&packer).unwrap();
    let b = packer.take_bytes();
    let expected: Vec<u8> = vec![
        // group id
        0x00, 0x00, 0x00, 0x07, //
        // payload.len()
        0x00, 0x00, 0x00, 0x02, //
        // payload
        0xde, 0xad, //
        // locktime
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
        // threshold
        0x00, 0x00, 0x00, 0x01, //
        // addrs.len()
        0x00, 0x00, 0x00, 0x01, //
        // addrs[0]
        0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
    ];
    assert!(cmp_manager::eq_vectors(&expected, &b));
    let packer = Packer::load_bytes_for_unpack(1024, &b);
    assert_eq!(TransferOutput::unpack(&packer).unwrap(), out);

    let mint_op = MintOperation {
        mint_input: key::secp256k1::txs::Input::new(vec![0]),
        group_id: 7,
        payload: vec![0xbe, 0xef],
        outputs: vec![owners.clone(), owners.clone()],
    };
    mint_op.verify().unwrap();
    let packer = Packer::new_for_tx();
    mint_op.pack(&packer).unwrap();
    let b = packer.take_bytes();
    let packer = Packer::load_bytes_for_unpack(1024, &b);
    assert_eq!(MintOperation::unpack(&packer).unwrap(), mint_op);

    let transfer_op = TransferOperation {
        input: key::secp256k1::txs::Input::new(vec![0]),
        output: out,
    };
    transfer_op.verify().unwrap();
    let packer = Packer::new_for_tx();
    transfer_op.pack(&packer).unwrap();
    let b = packer.take_bytes();
    let packer = Packer::load_bytes_for_unpack(1024, &b);
    assert_eq!(TransferOperation::unpack(&packer).unwrap(), transfer_op);

    // oversized payload rejected
    let big = TransferOutput::new(0, vec![0u8; constants::MAX_NFT_PAYLOAD_SIZE + 1], owners);
    assert!(big.verify().is_err());
}
