//! X-chain export transaction.
use crate::{
    avm::txs::fx,
    codec,
    errors::{Error, Result},
    hash, ids, key, packer,
    txs::{self, transferable},
};
use serde::{Deserialize, Serialize};

/// Moves outputs into another chain's atomic memory.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/avm/txs#ExportTx>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct Tx {
    pub base_tx: txs::Tx,
    /// "None" until the caller names the destination; note that the
    /// platform chain id is the all-zero id, so a zero id is a valid
    /// destination and only a missing one is an error.
    pub destination_chain_id: Option<ids::Id>,
    pub destination_chain_transferable_outputs: Option<Vec<transferable::Output>>,
    pub fx_creds: Vec<fx::Credential>,
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
        "avm.ExportTx".to_string()
    }

    pub fn type_id() -> u32 {
        *(codec::X_TYPES.get(&Self::type_name()).unwrap()) as u32
    }

    /// Packs `base body ‖ destination_chain(32) ‖ nouts(4) ‖ outs`.
    pub fn pack_unsigned(&self) -> Result<packer::Packer> {
        let destination_chain_id = self.destination_chain_id.ok_or_else(|| Error::State {
            message: "destination chain is not set".to_string(),
        })?;

        let packer = self.base_tx.pack(codec::VERSION, Self::type_id())?;
        packer.pack_bytes(destination_chain_id.as_ref())?;

        if let Some(outs) = &self.destination_chain_transferable_outputs {
            packer.pack_u32(outs.len() as u32)?;
            for out in outs.iter() {
                out.pack(&packer)?;
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

        let destination_chain_id = Some(ids::Id::from_slice(&packer.unpack_bytes(ids::LEN)?));
        let n = packer.unpack_u32()?;
        let destination_chain_transferable_outputs = if n > 0 {
            let mut outs = Vec::with_capacity(n as usize);
            for _ in 0..n {
                outs.push(transferable::Output::unpack(&packer)?);
            }
            Some(outs)
        } else {
            None
        };

        Ok(Self {
            base_tx,
            destination_chain_id,
            destination_chain_transferable_outputs,
            fx_creds: Vec::new(),
        })
    }

    /// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/avm/txs#Tx.SignSECP256K1Fx>
    pub async fn sign<T: key::secp256k1::SignOnly>(&mut self, signers: Vec<Vec<T>>) -> Result<()> {
        self.base_tx.verify()?;
        let packer = self.pack_unsigned()?;

        let unsigned = packer.take_bytes();
        packer.set_bytes(&unsigned);
        let digest = hash::sha256(&unsigned);

        let creds = super::sign_digest_all(&digest, &signers).await?;
        self.fx_creds = creds.into_iter().map(fx::Credential::Secp).collect();

        self.base_tx.metadata = Some(super::seal(packer, &self.fx_creds)?);
        Ok(())
    }
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- avm::txs::export::test_export_tx_round_trip --exact --show-output
#[test]
fn test_export_tx_round_trip() {
    use crate::ids::short;

    let tx = Tx {
        base_tx: txs::Tx {
            network_id: 5,
            blockchain_id: ids::Id::from_slice(&[0x01]),
            ..txs::Tx::default()
        },
        destination_chain_id: Some(ids::Id::from_slice(&[0x02])),
        destination_chain_transferable_outputs: Some(vec![transferable::Output {
            asset_id: ids::Id::from_slice(&[0xaa]),
            out: transferable::TransferableOut::TransferOutput(
                key::secp256k1::txs::transfer::Output {
                    amount: 90,
                    output_owners: key::secp256k1::txs::OutputOwners::new(
                        0,
                        1,
                        &[short::Id::from_slice(&[0x0d])],
                    ),
                },
            ),
        }]),
        fx_creds: Vec::new(),
    };

    let packer = tx.pack_unsigned().unwrap();
    let b = packer.take_bytes();
    let decoded = Tx::unpack(&b).unwrap();
    assert_eq!(tx, decoded);

    // the destination chain must be set before serializing
    let incomplete = Tx {
        base_tx: txs::Tx::default(),
        ..Tx::default()
    };
    match incomplete.pack_unsigned() {
        Err(Error::State { .. }) => {}
        other => panic!("expected state error, got {:?}", other),
    }
}
