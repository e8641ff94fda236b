//! Asset-tagged operations consuming UTXOs and producing fx outputs.
use std::cmp::Ordering;

use crate::{
    errors::{Error, Result},
    ids, key, nftfx,
    packer::Packer,
    txs::utxo,
};
use serde::{Deserialize, Serialize};

/// The tagged operation kinds a "TransferableOperation" may carry.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/avm/txs#Operation>
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(untagged)]
pub enum Op {
    SecpMint(key::secp256k1::txs::mint::Operation),
    NftMint(nftfx::MintOperation),
    NftTransfer(nftfx::TransferOperation),
}

impl Default for Op {
    fn default() -> Self {
        Op::NftTransfer(Default::default())
    }
}

impl Op {
    pub fn type_id(&self) -> u32 {
        match self {
            Op::SecpMint(_) => key::secp256k1::txs::mint::Operation::type_id(),
            Op::NftMint(_) => nftfx::MintOperation::type_id(),
            Op::NftTransfer(_) => nftfx::TransferOperation::type_id(),
        }
    }

    /// The signature indices proving ownership over the consumed UTXO.
    pub fn sig_indices(&self) -> &[u32] {
        match self {
            Op::SecpMint(op) => &op.mint_input.sig_indices,
            Op::NftMint(op) => &op.mint_input.sig_indices,
            Op::NftTransfer(op) => &op.input.sig_indices,
        }
    }

    pub fn verify(&self) -> Result<()> {
        match self {
            Op::SecpMint(op) => op.verify(),
            Op::NftMint(op) => op.verify(),
            Op::NftTransfer(op) => op.verify(),
        }
    }

    pub fn pack(&self, packer: &Packer) -> Result<()> {
        packer.pack_u32(self.type_id())?;
        match self {
            Op::SecpMint(op) => op.pack(packer),
            Op::NftMint(op) => op.pack(packer),
            Op::NftTransfer(op) => op.pack(packer),
        }
    }

    pub fn unpack(packer: &Packer) -> Result<Self> {
        let type_id = packer.unpack_u32()?;
        match type_id {
            id if id == key::secp256k1::txs::mint::Operation::type_id() => Ok(Op::SecpMint(
                key::secp256k1::txs::mint::Operation::unpack(packer)?,
            )),
            id if id == nftfx::MintOperation::type_id() => {
                Ok(Op::NftMint(nftfx::MintOperation::unpack(packer)?))
            }
            id if id == nftfx::TransferOperation::type_id() => {
                Ok(Op::NftTransfer(nftfx::TransferOperation::unpack(packer)?))
            }
            _ => Err(Error::UnknownTypeId {
                type_id,
                message: "no registered operation type".to_string(),
            }),
        }
    }
}

/// An operation applied to the listed UTXOs of one asset.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/components/avax#TransferableOperation>
#[derive(Debug, Serialize, Deserialize, Eq, Clone, Default)]
pub struct TransferableOperation {
    #[serde(rename = "assetID")]
    pub asset_id: ids::Id,
    #[serde(rename = "utxoIDs")]
    pub utxo_ids: Vec<utxo::Id>,
    pub op: Op,
}

impl TransferableOperation {
    /// Creates the operation with its UTXO list in canonical order.
    pub fn new(asset_id: ids::Id, utxo_ids: &[utxo::Id], op: Op) -> Self {
        let mut utxo_ids = Vec::from(utxo_ids);
        utxo_ids.sort();
        Self {
            asset_id,
            utxo_ids,
            op,
        }
    }

    pub fn verify(&self) -> Result<()> {
        if self.utxo_ids.is_empty() {
            // ref. "errNoUTXOs"
            return Err(Error::InvalidInput {
                message: "operation has no utxos".to_string(),
            });
        }
        if !cmp_manager::is_sorted_and_unique(&self.utxo_ids) {
            return Err(Error::InvalidInput {
                message: "utxo ids not sorted and unique".to_string(),
            });
        }
        self.op.verify()
    }

    /// Packs `asset_id(32) ‖ n(4) ‖ (tx_id ‖ output_index)* ‖ op_type_id(4) ‖ op`.
    pub fn pack(&self, packer: &Packer) -> Result<()> {
        packer.pack_bytes(self.asset_id.as_ref())?;
        packer.pack_u32(self.utxo_ids.len() as u32)?;
        for id in self.utxo_ids.iter() {
            packer.pack_bytes(id.tx_id.as_ref())?;
            packer.pack_u32(id.output_index)?;
        }
        self.op.pack(packer)
    }

    pub fn unpack(packer: &Packer) -> Result<Self> {
        let asset_id = ids::Id::from_slice(&packer.unpack_bytes(ids::LEN)?);
        let n = packer.unpack_u32()?;
        let mut utxo_ids = Vec::with_capacity(n as usize);
        for _ in 0..n {
            let tx_id = packer.unpack_bytes(ids::LEN)?;
            let output_index = packer.unpack_u32()?;
            utxo_ids.push(utxo::Id::new(&tx_id, output_index)?);
        }
        let op = Op::unpack(packer)?;
        Ok(Self {
            asset_id,
            utxo_ids,
            op,
        })
    }
}

/// Operations sort by their source UTXO-id list.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/components/avax#SortTransferableOperations>
impl Ord for TransferableOperation {
    fn cmp(&self, other: &TransferableOperation) -> Ordering {
        // packer encodes the list length first
        let l1 = self.utxo_ids.len();
        let l2 = other.utxo_ids.len();
        l1.cmp(&l2)
            .then_with(|| self.utxo_ids.cmp(&other.utxo_ids))
    }
}

impl PartialOrd for TransferableOperation {
    fn partial_cmp(&self, other: &TransferableOperation) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for TransferableOperation {
    fn eq(&self, other: &TransferableOperation) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- txs::operation::test_operation_round_trip --exact --show-output
#[test]
fn test_operation_round_trip() {
    use crate::ids::short;

    let owners = key::secp256k1::txs::OutputOwners::new(0, 1, &[short::Id::from_slice(&[0x01])]);
    let op = TransferableOperation::new(
        ids::Id::from_slice(&[0xaa]),
        &[
            utxo::Id::new(&[0x02; 32], 1).unwrap(),
            utxo::Id::new(&[0x01; 32], 0).unwrap(),
        ],
        Op::NftTransfer(nftfx::TransferOperation {
            input: key::secp256k1::txs::Input::new(vec![0]),
            output: nftfx::TransferOutput::new(3, vec![0xaa, 0xbb], owners),
        }),
    );
    // "new" sorted the utxo ids
    assert!(op.utxo_ids[0] < op.utxo_ids[1]);
    op.verify().unwrap();

    let packer = Packer::new_for_tx();
    op.pack(&packer).unwrap();
    let b = packer.take_bytes();

    let packer = Packer::load_bytes_for_unpack(4096, &b);
    let decoded = TransferableOperation::unpack(&packer).unwrap();
    assert_eq!(op, decoded);
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- txs::operation::test_sort_operations --exact --show-output
#[test]
fn test_sort_operations() {
    let op_for = |tx_byte: u8| {
        TransferableOperation::new(
            ids::Id::from_slice(&[0xaa]),
            &[utxo::Id::new(&[tx_byte; 32], 0).unwrap()],
            Op::NftTransfer(nftfx::TransferOperation::default()),
        )
    };

    let mut ops = vec![op_for(0x03), op_for(0x01), op_for(0x02)];
    assert!(!cmp_manager::is_sorted_and_unique(&ops));
    ops.sort();
    assert!(cmp_manager::is_sorted_and_unique(&ops));
    assert_eq!(ops[0].utxo_ids[0].tx_id, ids::Id::from_slice(&[0x01; 32]));
}
