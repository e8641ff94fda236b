//! Asset-tagged outputs and inputs embedded in transactions.
use std::cmp::Ordering;

use crate::{
    errors::{Error, Result},
    ids::{self, short},
    key, nftfx,
    packer::Packer,
    txs,
};
use serde::{Deserialize, Serialize};

/// The tagged output kinds a "TransferableOutput" may carry.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/components/avax#TransferableOut>
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(untagged)]
pub enum TransferableOut {
    TransferOutput(key::secp256k1::txs::transfer::Output),
    MintOutput(key::secp256k1::txs::mint::Output),
    NftTransferOutput(nftfx::TransferOutput),
    NftMintOutput(nftfx::MintOutput),
}

impl Default for TransferableOut {
    fn default() -> Self {
        TransferableOut::TransferOutput(Default::default())
    }
}

impl TransferableOut {
    pub fn type_id(&self) -> u32 {
        match self {
            TransferableOut::TransferOutput(_) => key::secp256k1::txs::transfer::Output::type_id(),
            TransferableOut::MintOutput(_) => key::secp256k1::txs::mint::Output::type_id(),
            TransferableOut::NftTransferOutput(_) => nftfx::TransferOutput::type_id(),
            TransferableOut::NftMintOutput(_) => nftfx::MintOutput::type_id(),
        }
    }

    /// Returns the amount for amount-bearing kinds; NFT and mint outputs
    /// carry no amount.
    pub fn amount(&self) -> Option<u64> {
        match self {
            TransferableOut::TransferOutput(out) => Some(out.amount),
            _ => None,
        }
    }

    /// Returns the owner set of the output, whatever the kind.
    pub fn output_owners(&self) -> &key::secp256k1::txs::OutputOwners {
        match self {
            TransferableOut::TransferOutput(out) => &out.output_owners,
            TransferableOut::MintOutput(out) => &out.output_owners,
            TransferableOut::NftTransferOutput(out) => &out.output_owners,
            TransferableOut::NftMintOutput(out) => &out.output_owners,
        }
    }

    pub fn verify(&self) -> Result<()> {
        match self {
            TransferableOut::TransferOutput(out) => out.verify(),
            TransferableOut::MintOutput(out) => out.verify(),
            TransferableOut::NftTransferOutput(out) => out.verify(),
            TransferableOut::NftMintOutput(out) => out.verify(),
        }
    }

    /// Packs `type_id(4) ‖ output bytes`.
    pub fn pack(&self, packer: &Packer) -> Result<()> {
        packer.pack_u32(self.type_id())?;
        match self {
            TransferableOut::TransferOutput(out) => out.pack(packer),
            TransferableOut::MintOutput(out) => out.pack(packer),
            TransferableOut::NftTransferOutput(out) => out.pack(packer),
            TransferableOut::NftMintOutput(out) => out.pack(packer),
        }
    }

    /// Unpacks `type_id(4) ‖ output bytes`, dispatching on the tag.
    pub fn unpack(packer: &Packer) -> Result<Self> {
        let type_id = packer.unpack_u32()?;
        match type_id {
            id if id == key::secp256k1::txs::transfer::Output::type_id() => Ok(
                TransferableOut::TransferOutput(key::secp256k1::txs::transfer::Output::unpack(
                    packer,
                )?),
            ),
            id if id == key::secp256k1::txs::mint::Output::type_id() => Ok(
                TransferableOut::MintOutput(key::secp256k1::txs::mint::Output::unpack(packer)?),
            ),
            id if id == nftfx::TransferOutput::type_id() => Ok(
                TransferableOut::NftTransferOutput(nftfx::TransferOutput::unpack(packer)?),
            ),
            id if id == nftfx::MintOutput::type_id() => Ok(TransferableOut::NftMintOutput(
                nftfx::MintOutput::unpack(packer)?,
            )),
            _ => Err(Error::UnknownTypeId {
                type_id,
                message: "no registered output type".to_string(),
            }),
        }
    }
}

impl Ord for TransferableOut {
    fn cmp(&self, other: &TransferableOut) -> Ordering {
        // ordering over `type_id(4) ‖ output bytes`; field-wise comparison
        // of the inner types matches the packed byte order
        let type_id_ord = self.type_id().cmp(&other.type_id());
        if type_id_ord != Ordering::Equal {
            // no need to compare further
            return type_id_ord;
        }

        match (self, other) {
            (TransferableOut::TransferOutput(a), TransferableOut::TransferOutput(b)) => a.cmp(b),
            (TransferableOut::MintOutput(a), TransferableOut::MintOutput(b)) => a.cmp(b),
            (TransferableOut::NftTransferOutput(a), TransferableOut::NftTransferOutput(b)) => {
                a.cmp(b)
            }
            (TransferableOut::NftMintOutput(a), TransferableOut::NftMintOutput(b)) => a.cmp(b),
            (_, _) => type_id_ord,
        }
    }
}

impl PartialOrd for TransferableOut {
    fn partial_cmp(&self, other: &TransferableOut) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/components/avax#TransferableOutput>
#[derive(Debug, Serialize, Deserialize, Eq, Clone, Default)]
pub struct Output {
    #[serde(rename = "assetID")]
    pub asset_id: ids::Id,

    #[serde(rename = "output")]
    pub out: TransferableOut,
}

impl Output {
    pub fn new(asset_id: ids::Id, out: TransferableOut) -> Self {
        Self { asset_id, out }
    }

    pub fn verify(&self) -> Result<()> {
        self.out.verify()
    }

    /// Packs `asset_id(32) ‖ type_id(4) ‖ output bytes`.
    pub fn pack(&self, packer: &Packer) -> Result<()> {
        packer.pack_bytes(self.asset_id.as_ref())?;
        self.out.pack(packer)
    }

    pub fn unpack(packer: &Packer) -> Result<Self> {
        let asset_id = ids::Id::from_slice(&packer.unpack_bytes(ids::LEN)?);
        let out = TransferableOut::unpack(packer)?;
        Ok(Self { asset_id, out })
    }
}

/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/components/avax#SortTransferableOutputs>
impl Ord for Output {
    fn cmp(&self, other: &Output) -> Ordering {
        let asset_id_ord = self.asset_id.cmp(&(other.asset_id));
        if asset_id_ord != Ordering::Equal {
            // no need to compare further
            return asset_id_ord;
        }

        self.out.cmp(&other.out)
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

/// The tagged input kinds a "TransferableInput" may carry. Mint and NFT
/// spends prove ownership inside their operations, so the only standalone
/// wire kind is the amount-bearing transfer input.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/components/avax#TransferableIn>
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(untagged)]
pub enum TransferableIn {
    TransferInput(key::secp256k1::txs::transfer::Input),
}

impl Default for TransferableIn {
    fn default() -> Self {
        TransferableIn::TransferInput(Default::default())
    }
}

impl TransferableIn {
    pub fn type_id(&self) -> u32 {
        match self {
            TransferableIn::TransferInput(_) => key::secp256k1::txs::transfer::Input::type_id(),
        }
    }

    pub fn amount(&self) -> u64 {
        match self {
            TransferableIn::TransferInput(input) => input.amount,
        }
    }

    pub fn sig_indices(&self) -> &[u32] {
        match self {
            TransferableIn::TransferInput(input) => &input.sig_indices,
        }
    }

    pub fn verify(&self) -> Result<()> {
        match self {
            TransferableIn::TransferInput(input) => input.verify(),
        }
    }

    /// Packs `type_id(4) ‖ input bytes`.
    pub fn pack(&self, packer: &Packer) -> Result<()> {
        packer.pack_u32(self.type_id())?;
        match self {
            TransferableIn::TransferInput(input) => input.pack(packer),
        }
    }

    pub fn unpack(packer: &Packer) -> Result<Self> {
        let type_id = packer.unpack_u32()?;
        match type_id {
            id if id == key::secp256k1::txs::transfer::Input::type_id() => Ok(
                TransferableIn::TransferInput(key::secp256k1::txs::transfer::Input::unpack(
                    packer,
                )?),
            ),
            _ => Err(Error::UnknownTypeId {
                type_id,
                message: "no registered input type".to_string(),
            }),
        }
    }
}

/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/components/avax#TransferableInput>
#[derive(Debug, Serialize, Deserialize, Eq, Clone, Default)]
pub struct Input {
    #[serde(flatten)]
    pub utxo_id: txs::utxo::Id,

    #[serde(rename = "assetID")]
    pub asset_id: ids::Id,

    #[serde(rename = "input")]
    pub input: TransferableIn,
}

impl Input {
    pub fn verify(&self) -> Result<()> {
        self.input.verify()
    }

    /// Packs `tx_id(32) ‖ output_index(4) ‖ asset_id(32) ‖ type_id(4) ‖ input bytes`.
    pub fn pack(&self, packer: &Packer) -> Result<()> {
        packer.pack_bytes(self.utxo_id.tx_id.as_ref())?;
        packer.pack_u32(self.utxo_id.output_index)?;
        packer.pack_bytes(self.asset_id.as_ref())?;
        self.input.pack(packer)
    }

    pub fn unpack(packer: &Packer) -> Result<Self> {
        let tx_id = ids::Id::from_slice(&packer.unpack_bytes(ids::LEN)?);
        let output_index = packer.unpack_u32()?;
        let asset_id = ids::Id::from_slice(&packer.unpack_bytes(ids::LEN)?);
        let input = TransferableIn::unpack(packer)?;
        Ok(Self {
            utxo_id: txs::utxo::Id {
                tx_id,
                output_index,
                ..txs::utxo::Id::default()
            },
            asset_id,
            input,
        })
    }
}

/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/components/avax#SortTransferableInputs>
impl Ord for Input {
    fn cmp(&self, other: &Input) -> Ordering {
        self.utxo_id
            .tx_id
            .cmp(&(other.utxo_id.tx_id)) // returns when "utxo_id.tx_id"s are not Equal
            .then_with(
                || self.utxo_id.output_index.cmp(&other.utxo_id.output_index), // if "utxo_id.tx_id"s are Equal, compare "output_index"
            )
    }
}

impl PartialOrd for Input {
    fn partial_cmp(&self, other: &Input) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Input {
    fn eq(&self, other: &Input) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

/// Sorts the inputs by `(tx_id, output_index)` while keeping each input's
/// signer addresses attached. The per-input signer list must survive any
/// sort performed before the digest is taken.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/components/avax#SortTransferableInputsWithSigners>
pub fn sort_inputs_with_signers(inputs: &mut [(Input, Vec<short::Id>)]) {
    inputs.sort_by(|a, b| a.0.cmp(&b.0));
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- txs::transferable::test_sort_transferable_outputs --exact --show-output
/// ref. "avalanchego/vms/components/avax.TestTransferableOutputSorting"
#[test]
fn test_sort_transferable_outputs() {
    use crate::ids::short;

    let mut outputs: Vec<Output> = Vec::new();
    for i in (0..10).rev() {
        // same asset: NFT transfer output sorts after the amount output
        outputs.push(Output {
            asset_id: ids::Id::from_slice(&[i as u8, 2, 2, 3, 4, 5, 6, 7, 8, 9]),
            out: TransferableOut::NftTransferOutput(nftfx::TransferOutput {
                group_id: i as u32,
                payload: Vec::new(),
                output_owners: key::secp256k1::txs::OutputOwners {
                    locktime: 0,
                    threshold: 1,
                    addresses: vec![short::Id::from_slice(&[i as u8, 1, 2, 3, 4, 5])],
                },
            }),
        });
        outputs.push(Output {
            asset_id: ids::Id::from_slice(&[i as u8, 2, 2, 3, 4, 5, 6, 7, 8, 9]),
            out: TransferableOut::TransferOutput(key::secp256k1::txs::transfer::Output {
                amount: (i + 1) as u64,
                output_owners: key::secp256k1::txs::OutputOwners {
                    locktime: i as u64,
                    threshold: i as u32,
                    addresses: vec![short::Id::from_slice(&[i as u8, 1, 2, 3, 4, 5])],
                },
            }),
        });
        outputs.push(Output {
            asset_id: ids::Id::from_slice(&[i as u8, 2, 2, 3, 4, 5, 6, 7, 8, 9]),
            out: TransferableOut::TransferOutput(key::secp256k1::txs::transfer::Output {
                amount: i as u64,
                output_owners: key::secp256k1::txs::OutputOwners {
                    locktime: i as u64,
                    threshold: i as u32,
                    addresses: vec![short::Id::from_slice(&[i as u8, 1, 2, 3, 4, 5])],
                },
            }),
        });
        outputs.push(Output {
            asset_id: ids::Id::from_slice(&[i as u8, 1, 2, 3, 4, 5, 6, 7, 8, 9]),
            out: TransferableOut::TransferOutput(key::secp256k1::txs::transfer::Output {
                amount: i as u64,
                output_owners: key::secp256k1::txs::OutputOwners {
                    locktime: i as u64,
                    threshold: i as u32,
                    addresses: vec![short::Id::from_slice(&[i as u8, 1, 2, 3, 4, 5])],
                },
            }),
        });
    }
    assert!(!cmp_manager::is_sorted_and_unique(&outputs));
    outputs.sort();

    let mut sorted_outputs: Vec<Output> = Vec::new();
    for i in 0..10 {
        sorted_outputs.push(Output {
            asset_id: ids::Id::from_slice(&[i as u8, 1, 2, 3, 4, 5, 6, 7, 8, 9]),
            out: TransferableOut::TransferOutput(key::secp256k1::txs::transfer::Output {
                amount: i as u64,
                output_owners: key::secp256k1::txs::OutputOwners {
                    locktime: i as u64,
                    threshold: i as u32,
                    addresses: vec![short::Id::from_slice(&[i as u8, 1, 2, 3, 4, 5])],
                },
            }),
        });
        sorted_outputs.push(Output {
            asset_id: ids::Id::from_slice(&[i as u8, 2, 2, 3, 4, 5, 6, 7, 8, 9]),
            out: TransferableOut::TransferOutput(key::secp256k1::txs::transfer::Output {
                amount: i as u64,
                output_owners: key::secp256k1::txs::OutputOwners {
                    locktime: i as u64,
                    threshold: i as u32,
                    addresses: vec![short::Id::from_slice(&[i as u8, 1, 2, 3, 4, 5])],
                },
            }),
        });
        sorted_outputs.push(Output {
            asset_id: ids::Id::from_slice(&[i as u8, 2, 2, 3, 4, 5, 6, 7, 8, 9]),
            out: TransferableOut::TransferOutput(key::secp256k1::txs::transfer::Output {
                amount: (i + 1) as u64,
                output_owners: key::secp256k1::txs::OutputOwners {
                    locktime: i as u64,
                    threshold: i as u32,
                    addresses: vec![short::Id::from_slice(&[i as u8, 1, 2, 3, 4, 5])],
                },
            }),
        });
        sorted_outputs.push(Output {
            asset_id: ids::Id::from_slice(&[i as u8, 2, 2, 3, 4, 5, 6, 7, 8, 9]),
            out: TransferableOut::NftTransferOutput(nftfx::TransferOutput {
                group_id: i as u32,
                payload: Vec::new(),
                output_owners: key::secp256k1::txs::OutputOwners {
                    locktime: 0,
                    threshold: 1,
                    addresses: vec![short::Id::from_slice(&[i as u8, 1, 2, 3, 4, 5])],
                },
            }),
        });
    }
    assert!(cmp_manager::is_sorted_and_unique(&outputs));
    assert_eq!(outputs, sorted_outputs);
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- txs::transferable::test_sort_transferable_inputs --exact --show-output
/// ref. "avalanchego/vms/components/avax.TestTransferableInputSorting"
#[test]
fn test_sort_transferable_inputs() {
    let mut inputs: Vec<Input> = Vec::new();
    for i in (0..10).rev() {
        inputs.push(Input {
            utxo_id: txs::utxo::Id {
                tx_id: ids::Id::from_slice(&[i as u8, 1, 2, 3, 4, 5, 6, 7, 8, 9]),
                output_index: (i + 1) as u32,
                ..txs::utxo::Id::default()
            },
            ..Input::default()
        });
        inputs.push(Input {
            utxo_id: txs::utxo::Id {
                tx_id: ids::Id::from_slice(&[i as u8, 1, 2, 3, 4, 5, 6, 7, 8, 9]),
                output_index: i as u32,
                ..txs::utxo::Id::default()
            },
            ..Input::default()
        });
    }
    assert!(!cmp_manager::is_sorted_and_unique(&inputs));
    inputs.sort();

    let mut sorted_inputs: Vec<Input> = Vec::new();
    for i in 0..10 {
        sorted_inputs.push(Input {
            utxo_id: txs::utxo::Id {
                tx_id: ids::Id::from_slice(&[i as u8, 1, 2, 3, 4, 5, 6, 7, 8, 9]),
                output_index: i as u32,
                ..txs::utxo::Id::default()
            },
            ..Input::default()
        });
        sorted_inputs.push(Input {
            utxo_id: txs::utxo::Id {
                tx_id: ids::Id::from_slice(&[i as u8, 1, 2, 3, 4, 5, 6, 7, 8, 9]),
                output_index: (i + 1) as u32,
                ..txs::utxo::Id::default()
            },
            ..Input::default()
        });
    }
    assert!(cmp_manager::is_sorted_and_unique(&sorted_inputs));
    assert_eq!(inputs, sorted_inputs);
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- txs::transferable::test_sort_inputs_with_signers --exact --show-output
#[test]
fn test_sort_inputs_with_signers() {
    use crate::ids::short;

    let addr_a = short::Id::from_slice(&[0xaa]);
    let addr_b = short::Id::from_slice(&[0xbb]);

    let input = |tx_byte: u8| Input {
        utxo_id: txs::utxo::Id {
            tx_id: ids::Id::from_slice(&[tx_byte]),
            output_index: 0,
            ..txs::utxo::Id::default()
        },
        ..Input::default()
    };

    let mut pairs = vec![(input(0x02), vec![addr_b]), (input(0x01), vec![addr_a])];
    sort_inputs_with_signers(&mut pairs);

    // signer lists follow their inputs through the sort
    assert_eq!(pairs[0].0.utxo_id.tx_id, ids::Id::from_slice(&[0x01]));
    assert_eq!(pairs[0].1, vec![addr_a]);
    assert_eq!(pairs[1].0.utxo_id.tx_id, ids::Id::from_slice(&[0x02]));
    assert_eq!(pairs[1].1, vec![addr_b]);
}
