//! Definitions of Avalanche transaction types.
pub mod aad;
pub mod operation;
pub mod transferable;
pub mod utxo;
pub mod utxo_set;

use crate::{
    codec, constants,
    errors::{Error, Result},
    hash, ids, packer,
};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

/// The unsigned base transaction body shared by every transaction kind.
///
/// The VM flow checker adds "fee_amount" and "output" amounts to the "produced",
/// and "input" amounts to the "consumed". The check fails with "errInsufficientFunds",
/// if the "produced" amount ("fee" + "outputs") is greater than the "consumed" ("inputs").
///
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/components/avax#BaseTx>
#[serde_as]
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct Tx {
    #[serde(skip)]
    pub metadata: Option<Metadata>, // skip serialization due to serialize:"false"

    #[serde(rename = "networkID")]
    pub network_id: u32,
    #[serde(rename = "blockchainID")]
    pub blockchain_id: ids::Id,

    #[serde(rename = "outputs")]
    pub transferable_outputs: Option<Vec<transferable::Output>>,
    #[serde(rename = "inputs")]
    pub transferable_inputs: Option<Vec<transferable::Input>>,

    #[serde_as(as = "Option<serde_with::hex::Hex>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<Vec<u8>>,
}

impl Tx {
    pub fn type_name() -> String {
        "avm.BaseTx".to_string()
    }

    pub fn type_id() -> u32 {
        *(codec::X_TYPES.get(&Self::type_name()).unwrap()) as u32
    }

    pub fn verify(&self) -> Result<()> {
        if let Some(memo) = &self.memo {
            if memo.len() > constants::MAX_MEMO_SIZE {
                // ref. "avax.errMemoTooLarge"
                return Err(Error::InvalidInput {
                    message: format!(
                        "memo {} exceeds max size {}",
                        memo.len(),
                        constants::MAX_MEMO_SIZE
                    ),
                });
            }
        }
        if let Some(outs) = &self.transferable_outputs {
            for o in outs.iter() {
                o.verify()?;
            }
        }
        if let Some(ins) = &self.transferable_inputs {
            for i in ins.iter() {
                i.verify()?;
            }
        }
        Ok(())
    }

    /// Marshals the base body with the codec version and the caller's
    /// type ID, returning the packer so subclassed transactions can keep
    /// appending their own fields.
    /// ref. "avalanchego/codec.manager.Marshal(codecVersion, &t.UnsignedTx)"
    pub fn pack(&self, codec_version: u16, type_id: u32) -> Result<packer::Packer> {
        let packer = packer::Packer::new_for_tx();

        // codec version and interface type ID
        // ref. "avalanchego/codec/linearcodec.linearCodec.MarshalInto"
        packer.pack_u16(codec_version)?;
        packer.pack_u32(type_id)?;

        packer.pack_u32(self.network_id)?;
        packer.pack_bytes(self.blockchain_id.as_ref())?;

        // "transferable_outputs" field; pack the number of slice elements
        if let Some(transferable_outputs) = &self.transferable_outputs {
            packer.pack_u32(transferable_outputs.len() as u32)?;
            for transferable_output in transferable_outputs.iter() {
                transferable_output.pack(&packer)?;
            }
        } else {
            packer.pack_u32(0_u32)?;
        }

        // "transferable_inputs" field; pack the number of slice elements
        if let Some(transferable_inputs) = &self.transferable_inputs {
            packer.pack_u32(transferable_inputs.len() as u32)?;
            for transferable_input in transferable_inputs.iter() {
                transferable_input.pack(&packer)?;
            }
        } else {
            packer.pack_u32(0_u32)?;
        }

        // marshal "BaseTx.memo"
        if let Some(memo) = &self.memo {
            packer.pack_bytes_with_header(memo)?;
        } else {
            packer.pack_u32(0_u32)?;
        }

        Ok(packer)
    }

    /// Unpacks the base body fields starting at "network_id"; the caller
    /// has already consumed the codec version and type ID.
    pub fn unpack_body(packer: &packer::Packer) -> Result<Self> {
        let network_id = packer.unpack_u32()?;
        let blockchain_id = ids::Id::from_slice(&packer.unpack_bytes(ids::LEN)?);

        let n = packer.unpack_u32()?;
        let transferable_outputs = if n > 0 {
            let mut outs = Vec::with_capacity(n as usize);
            for _ in 0..n {
                outs.push(transferable::Output::unpack(packer)?);
            }
            Some(outs)
        } else {
            None
        };

        let n = packer.unpack_u32()?;
        let transferable_inputs = if n > 0 {
            let mut ins = Vec::with_capacity(n as usize);
            for _ in 0..n {
                ins.push(transferable::Input::unpack(packer)?);
            }
            Some(ins)
        } else {
            None
        };

        let memo = packer.unpack_bytes_with_header()?;
        let memo = if memo.is_empty() { None } else { Some(memo) };

        Ok(Self {
            metadata: None,
            network_id,
            blockchain_id,
            transferable_outputs,
            transferable_inputs,
            memo,
        })
    }

    /// Consumes and checks the codec version and type ID header.
    pub fn unpack_header(packer: &packer::Packer, expected_type_id: u32) -> Result<()> {
        let codec_version = packer.unpack_u16()?;
        if codec_version != codec::VERSION {
            return Err(Error::InvalidInput {
                message: format!("unexpected codec version {codec_version}"),
            });
        }
        let type_id = packer.unpack_u32()?;
        if type_id != expected_type_id {
            return Err(Error::UnknownTypeId {
                type_id,
                message: format!("expected type ID {expected_type_id}"),
            });
        }
        Ok(())
    }
}

/// Hashes and bytes recorded by the signing pass.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/components/avax#Metadata>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct Metadata {
    pub id: ids::Id,
    pub tx_bytes_with_no_signature: Vec<u8>,
    pub tx_bytes_with_signatures: Vec<u8>,
}

impl Metadata {
    pub fn new(tx_bytes_with_no_signature: &[u8], tx_bytes_with_signatures: &[u8]) -> Self {
        let id = hash::sha256(tx_bytes_with_signatures);
        let id = ids::Id::from_slice(&id);
        Self {
            id,
            tx_bytes_with_no_signature: Vec::from(tx_bytes_with_no_signature),
            tx_bytes_with_signatures: Vec::from(tx_bytes_with_signatures),
        }
    }

    pub fn verify(&self) -> Result<()> {
        if self.id.is_empty() {
            // ref. "errMetadataNotInitialize"
            return Err(Error::State {
                message: "metadata was never initialized and is not valid".to_string(),
            });
        }
        Ok(())
    }
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- txs::test_base_tx_serialization --exact --show-output
/// ref. "avalanchego/vms/avm.TestBaseTxSerialization"
#[test]
fn test_base_tx_serialization() {
    use crate::{ids::short, key};

    let test_key = key::secp256k1::private_key::Key::from_cb58(
        "PrivateKey-24jUJ9vZexUM6expyMcT48LBx27k1m7xpraoV62oSQAHdziao5",
    )
    .expect("failed to load private key");
    let test_key_short_addr = test_key
        .to_public_key()
        .to_short_id()
        .expect("failed to_short_id");

    let unsigned_tx = Tx {
        network_id: 10,
        blockchain_id: ids::Id::from_slice(&<Vec<u8>>::from([5, 4, 3, 2, 1])),
        transferable_outputs: Some(vec![transferable::Output {
            asset_id: ids::Id::from_slice(&<Vec<u8>>::from([1, 2, 3])),
            out: transferable::TransferableOut::TransferOutput(
                key::secp256k1::txs::transfer::Output {
                    amount: 12345,
                    output_owners: key::secp256k1::txs::OutputOwners {
                        locktime: 0,
                        threshold: 1,
                        addresses: vec![test_key_short_addr],
                    },
                },
            ),
        }]),
        transferable_inputs: Some(vec![transferable::Input {
            utxo_id: utxo::Id {
                tx_id: ids::Id::from_slice(&<Vec<u8>>::from([
                    0xff, 0xfe, 0xfd, 0xfc, 0xfb, 0xfa, 0xf9, 0xf8, //
                    0xf7, 0xf6, 0xf5, 0xf4, 0xf3, 0xf2, 0xf1, 0xf0, //
                    0xef, 0xee, 0xed, 0xec, 0xeb, 0xea, 0xe9, 0xe8, //
                    0xe7, 0xe6, 0xe5, 0xe4, 0xe3, 0xe2, 0xe1, 0xe0, //
                ])),
                output_index: 1,
                ..utxo::Id::default()
            },
            asset_id: ids::Id::from_slice(&<Vec<u8>>::from([1, 2, 3])),
            input: transferable::TransferableIn::TransferInput(
                key::secp256k1::txs::transfer::Input {
                    amount: 54321,
                    sig_indices: vec![2],
                },
            ),
        }]),
        memo: Some(vec![0x00, 0x01, 0x02, 0x03]),
        ..Tx::default()
    };
    let unsigned_tx_packer = unsigned_tx
        .pack(codec::VERSION, Tx::type_id())
        .expect("failed to pack unsigned_tx");
    let unsigned_tx_bytes = unsigned_tx_packer.take_bytes();

    let expected_unsigned_tx_bytes: Vec<u8> = vec![
        // codec version
        0x00, 0x00, //
        //
        // avm.BaseTx type ID
        0x00, 0x00, 0x00, 0x00, //
        //
        // network id
        0x00, 0x00, 0x00, 0x0a, //
        //
        // blockchain id
        0x05, 0x04, 0x03, 0x02, 0x01, 0x00, 0x00, 0x00, //
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
        //
        // outs.len()
        0x00, 0x00, 0x00, 0x01, //
        //
        // "outs[0]" TransferableOutput.asset_id
        0x01, 0x02, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, //
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
        //
        // "outs[0]" secp256k1fx.TransferOutput type ID
        0x00, 0x00, 0x00, 0x07, //
        //
        // "outs[0]" amount
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x30, 0x39, //
        //
        // "outs[0]" locktime
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
        //
        // "outs[0]" threshold
        0x00, 0x00, 0x00, 0x01, //
        //
        // "outs[0]" addrs.len()
        0x00, 0x00, 0x00, 0x01, //
        //
        // "outs[0]" addrs[0]
        0xfc, 0xed, 0xa8, 0xf9, 0x0f, 0xcb, 0x5d, 0x30, //
        0x61, 0x4b, 0x99, 0xd7, 0x9f, 0xc4, 0xba, 0xa2, //
        0x93, 0x07, 0x76, 0x26, //
        //
        // ins.len()
        0x00, 0x00, 0x00, 0x01, //
        //
        // "ins[0]" TransferableInput.utxo_id.tx_id
        0xff, 0xfe, 0xfd, 0xfc, 0xfb, 0xfa, 0xf9, 0xf8, //
        0xf7, 0xf6, 0xf5, 0xf4, 0xf3, 0xf2, 0xf1, 0xf0, //
        0xef, 0xee, 0xed, 0xec, 0xeb, 0xea, 0xe9, 0xe8, //
        0xe7, 0xe6, 0xe5, 0xe4, 0xe3, 0xe2, 0xe1, 0xe0, //
        //
        // "ins[0]" TransferableInput.utxo_id.output_index
        0x00, 0x00, 0x00, 0x01, //
        //
        // "ins[0]" TransferableInput.asset_id
        0x01, 0x02, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, //
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
        //
        // "ins[0]" secp256k1fx.TransferInput type ID
        0x00, 0x00, 0x00, 0x05, //
        //
        // "ins[0]" amount
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xd4, 0x31, //
        //
        // "ins[0]" sig_indices.len()
        0x00, 0x00, 0x00, 0x01, //
        //
        // "ins[0]" sig_indices[0]
        0x00, 0x00, 0x00, 0x02, //
        //
        // memo.len()
        0x00, 0x00, 0x00, 0x04, //
        //
        // memo
        0x00, 0x01, 0x02, 0x03, //
    ];
    assert!(cmp_manager::eq_vectors(
        &expected_unsigned_tx_bytes,
        &unsigned_tx_bytes
    ));

    // round-trip: the canonical bytes decode back to the same body
    let packer = packer::Packer::load_bytes_for_unpack(4096, &unsigned_tx_bytes);
    Tx::unpack_header(&packer, Tx::type_id()).unwrap();
    let decoded = Tx::unpack_body(&packer).unwrap();
    assert_eq!(unsigned_tx, decoded);
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- txs::test_memo_limit --exact --show-output
#[test]
fn test_memo_limit() {
    let tx = Tx {
        memo: Some(vec![0u8; constants::MAX_MEMO_SIZE]),
        ..Tx::default()
    };
    tx.verify().unwrap();

    let tx = Tx {
        memo: Some(vec![0u8; constants::MAX_MEMO_SIZE + 1]),
        ..Tx::default()
    };
    assert!(tx.verify().is_err());
}
