//! X-chain operation transaction (NFT and mint operations).
use crate::{
    avm::txs::fx,
    codec,
    errors::{Error, Result},
    hash, ids, key, packer,
    txs::{self, operation::TransferableOperation},
};
use serde::{Deserialize, Serialize};

/// Applies fx operations to existing UTXOs. Credentials cover the base
/// inputs first, then one credential per operation, in their sorted orders;
/// NFT operations carry the nftfx credential tag.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/avm/txs#OperationTx>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct Tx {
    pub base_tx: txs::Tx,
    pub ops: Vec<TransferableOperation>,
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
        "avm.OperationTx".to_string()
    }

    pub fn type_id() -> u32 {
        *(codec::X_TYPES.get(&Self::type_name()).unwrap()) as u32
    }

    pub fn verify(&self) -> Result<()> {
        if self.ops.is_empty() {
            // ref. "errNoOperations"
            return Err(Error::InvalidInput {
                message: "operation tx has no operations".to_string(),
            });
        }
        for op in self.ops.iter() {
            op.verify()?;
        }
        self.base_tx.verify()
    }

    /// Packs `base body ‖ nops(4) ‖ ops`.
    pub fn pack_unsigned(&self) -> Result<packer::Packer> {
        let packer = self.base_tx.pack(codec::VERSION, Self::type_id())?;
        packer.pack_u32(self.ops.len() as u32)?;
        for op in self.ops.iter() {
            op.pack(&packer)?;
        }
        Ok(packer)
    }

    pub fn unpack(d: &[u8]) -> Result<Self> {
        let packer = packer::Packer::load_bytes_for_unpack(d.len() + 1024, d);
        txs::Tx::unpack_header(&packer, Self::type_id())?;
        let base_tx = txs::Tx::unpack_body(&packer)?;

        let n = packer.unpack_u32()?;
        let mut ops = Vec::with_capacity(n as usize);
        for _ in 0..n {
            ops.push(TransferableOperation::unpack(&packer)?);
        }

        Ok(Self {
            base_tx,
            ops,
            fx_creds: Vec::new(),
        })
    }

    /// Signs the base inputs, then the operations. "op_signers" must be
    /// aligned with the sorted operation order.
    pub async fn sign<T: key::secp256k1::SignOnly>(
        &mut self,
        input_signers: Vec<Vec<T>>,
        op_signers: Vec<Vec<T>>,
    ) -> Result<()> {
        self.verify()?;
        if op_signers.len() != self.ops.len() {
            return Err(Error::InvalidInput {
                message: format!(
                    "{} op signers for {} operations",
                    op_signers.len(),
                    self.ops.len()
                ),
            });
        }

        let packer = self.pack_unsigned()?;
        let unsigned = packer.take_bytes();
        packer.set_bytes(&unsigned);
        let digest = hash::sha256(&unsigned);

        let input_creds = super::sign_digest_all(&digest, &input_signers).await?;
        let op_creds = super::sign_digest_all(&digest, &op_signers).await?;

        self.fx_creds = Vec::with_capacity(input_creds.len() + op_creds.len());
        self.fx_creds
            .extend(input_creds.into_iter().map(fx::Credential::Secp));
        for (op, cred) in self.ops.iter().zip(op_creds.into_iter()) {
            let fx_cred = match &op.op {
                txs::operation::Op::SecpMint(_) => fx::Credential::Secp(cred),
                txs::operation::Op::NftMint(_) | txs::operation::Op::NftTransfer(_) => {
                    fx::Credential::Nft(crate::nftfx::Credential { cred })
                }
            };
            self.fx_creds.push(fx_cred);
        }

        self.base_tx.metadata = Some(super::seal(packer, &self.fx_creds)?);
        Ok(())
    }
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- avm::txs::operation::test_operation_tx --exact --show-output
#[test]
fn test_operation_tx() {
    use crate::{ids::short, nftfx, txs::operation::Op, txs::utxo};

    macro_rules! ab {
        ($e:expr) => {
            tokio_test::block_on($e)
        };
    }

    let test_key = key::secp256k1::private_key::Key::generate().unwrap();
    let owner = test_key.to_public_key().to_short_id().unwrap();
    let owners = key::secp256k1::txs::OutputOwners::new(0, 1, &[owner]);

    let mut tx = Tx {
        base_tx: txs::Tx {
            network_id: 5,
            blockchain_id: ids::Id::from_slice(&[0x01]),
            ..txs::Tx::default()
        },
        ops: vec![TransferableOperation::new(
            ids::Id::from_slice(&[0xaa]),
            &[utxo::Id::new(&[0x02; 32], 0).unwrap()],
            Op::NftTransfer(nftfx::TransferOperation {
                input: key::secp256k1::txs::Input::new(vec![0]),
                output: nftfx::TransferOutput::new(0, vec![0x01], owners),
            }),
        )],
        fx_creds: Vec::new(),
    };
    tx.verify().unwrap();

    let packer = tx.pack_unsigned().unwrap();
    let b = packer.take_bytes();
    let decoded = Tx::unpack(&b).unwrap();
    assert_eq!(tx, decoded);

    // no base inputs, one op: one nftfx credential
    ab!(tx.sign(Vec::new(), vec![vec![test_key]])).unwrap();
    assert_eq!(tx.fx_creds.len(), 1);
    assert_eq!(tx.fx_creds[0].type_id(), nftfx::Credential::type_id());
    assert!(!tx.tx_id().is_empty());
}
