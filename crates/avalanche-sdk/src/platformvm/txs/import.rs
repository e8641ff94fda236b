//! P-chain import transaction.
use crate::{
    codec,
    errors::{Error, Result},
    hash, ids, key, packer,
    txs::{self, transferable},
};
use serde::{Deserialize, Serialize};

/// Consumes UTXOs parked in this chain's atomic memory by another chain's
/// export. Credentials cover the base inputs first, then the imported
/// inputs, in their sorted orders.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/platformvm/txs#ImportTx>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct Tx {
    pub base_tx: txs::Tx,
    /// "None" until the caller names the source chain.
    pub source_chain_id: Option<ids::Id>,
    pub source_chain_transferable_inputs: Option<Vec<transferable::Input>>,
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
        "platformvm.ImportTx".to_string()
    }

    pub fn type_id() -> u32 {
        *(codec::P_TYPES.get(&Self::type_name()).unwrap()) as u32
    }

    /// Packs `base body ‖ source_chain(32) ‖ nins(4) ‖ ins`.
    pub fn pack_unsigned(&self) -> Result<packer::Packer> {
        let source_chain_id = self.source_chain_id.ok_or_else(|| Error::State {
            message: "source chain is not set".to_string(),
        })?;

        let packer = self.base_tx.pack(codec::VERSION, Self::type_id())?;
        packer.pack_bytes(source_chain_id.as_ref())?;

        if let Some(ins) = &self.source_chain_transferable_inputs {
            packer.pack_u32(ins.len() as u32)?;
            for input in ins.iter() {
                input.pack(&packer)?;
            }
        } else {
            packer.pack_u32(0_u32)?;
        }
        Ok(packer)
    }

    pub fn unpack(d: &[u8]) -> Result<Self> {
        let packer = packer::Packer::load_bytes_for_unpack(d.len() + 1024, d);
        txs::Tx::unpack_header(&packer, Self::type_id())?;
        let base_tx = txs::Tx::unpack_body(&packer)?;

        let source_chain_id = Some(ids::Id::from_slice(&packer.unpack_bytes(ids::LEN)?));
        let n = packer.unpack_u32()?;
        let source_chain_transferable_inputs = if n > 0 {
            let mut ins = Vec::with_capacity(n as usize);
            for _ in 0..n {
                ins.push(transferable::Input::unpack(&packer)?);
            }
            Some(ins)
        } else {
            None
        };

        Ok(Self {
            base_tx,
            source_chain_id,
            source_chain_transferable_inputs,
        })
    }

    pub async fn sign<T: key::secp256k1::SignOnly>(&mut self, signers: Vec<Vec<T>>) -> Result<()> {
        self.base_tx.verify()?;
        let packer = self.pack_unsigned()?;

        let unsigned = packer.take_bytes();
        packer.set_bytes(&unsigned);
        let digest = hash::sha256(&unsigned);

        let creds = super::sign_digest_all(&digest, &signers).await?;
        self.base_tx.metadata = Some(super::seal(packer, &creds)?);
        Ok(())
    }
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- platformvm::txs::import::test_p_import_round_trip --exact --show-output
#[test]
fn test_p_import_round_trip() {
    let tx = Tx {
        base_tx: txs::Tx {
            network_id: 5,
            blockchain_id: ids::Id::from_slice(&[0x01]),
            ..txs::Tx::default()
        },
        source_chain_id: Some(ids::Id::from_slice(&[0x02])),
        source_chain_transferable_inputs: Some(vec![transferable::Input {
            utxo_id: txs::utxo::Id {
                tx_id: ids::Id::from_slice(&[0x03]),
                output_index: 1,
                ..txs::utxo::Id::default()
            },
            asset_id: ids::Id::from_slice(&[0xaa]),
            input: transferable::TransferableIn::TransferInput(
                key::secp256k1::txs::transfer::Input {
                    amount: 5,
                    sig_indices: vec![0],
                },
            ),
        }]),
    };

    let packer = tx.pack_unsigned().unwrap();
    let b = packer.take_bytes();
    // codec version then platformvm.ImportTx type ID (17)
    assert_eq!(&b[..6], &[0x00, 0x00, 0x00, 0x00, 0x00, 0x11]);
    let decoded = Tx::unpack(&b).unwrap();
    assert_eq!(tx, decoded);
}
