//! X-chain transaction kinds.
pub mod create_asset;
pub mod export;
pub mod fx;
pub mod import;
pub mod operation;

use crate::{
    codec,
    errors::Result,
    hash, ids, key, packer,
    txs::{self},
};
use serde::{Deserialize, Serialize};

/// Signs the digest once per input, in sorted-input order, yielding one
/// signature bundle per credential.
pub(crate) async fn sign_digest_all<T: key::secp256k1::SignOnly>(
    digest: &[u8],
    signers: &[Vec<T>],
) -> Result<Vec<key::secp256k1::txs::Credential>> {
    let mut creds: Vec<key::secp256k1::txs::Credential> = Vec::with_capacity(signers.len());
    for keys in signers.iter() {
        let mut sigs: Vec<Vec<u8>> = Vec::with_capacity(keys.len());
        for k in keys.iter() {
            let sig = k.sign_digest(digest).await?;
            sigs.push(Vec::from(sig));
        }
        creds.push(key::secp256k1::txs::Credential { signatures: sigs });
    }
    Ok(creds)
}

/// Appends `numCreds(4) ‖ (credTypeID(4) ‖ numSigs(4) ‖ sigs)*` to the
/// unsigned bytes already in the packer, and returns the signing metadata.
pub(crate) fn seal(
    packer: packer::Packer,
    fx_creds: &[fx::Credential],
) -> Result<txs::Metadata> {
    let tx_bytes_with_no_signature = packer.take_bytes();
    packer.set_bytes(&tx_bytes_with_no_signature);

    packer.pack_u32(fx_creds.len() as u32)?;
    for fx_cred in fx_creds.iter() {
        fx_cred.pack(&packer)?;
    }

    let tx_bytes_with_signatures = packer.take_bytes();
    Ok(txs::Metadata::new(
        &tx_bytes_with_no_signature,
        &tx_bytes_with_signatures,
    ))
}

/// The base transfer transaction.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/avm/txs#BaseTx>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct Tx {
    /// The transaction ID is empty for unsigned tx
    /// as long as "avax.BaseTx.Metadata" is "None".
    /// Once Metadata is updated with signing, "tx_id" is non-empty.
    pub base_tx: txs::Tx,
    pub fx_creds: Vec<fx::Credential>,
}

impl Tx {
    pub fn new(base_tx: txs::Tx) -> Self {
        Self {
            base_tx,
            ..Self::default()
        }
    }

    /// Returns the transaction ID.
    /// Only non-empty if the embedded metadata is updated
    /// with the signing process.
    pub fn tx_id(&self) -> ids::Id {
        if let Some(m) = &self.base_tx.metadata {
            m.id
        } else {
            ids::Id::default()
        }
    }

    pub fn type_name() -> String {
        "avm.BaseTx".to_string()
    }

    pub fn type_id() -> u32 {
        *(codec::X_TYPES.get(&Self::type_name()).unwrap()) as u32
    }

    /// Hashes the canonical unsigned bytes and attaches one secp
    /// credential per input, in sorted-input order.
    /// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/avm/txs#Tx.SignSECP256K1Fx>
    pub async fn sign<T: key::secp256k1::SignOnly>(&mut self, signers: Vec<Vec<T>>) -> Result<()> {
        self.base_tx.verify()?;
        let packer = self.base_tx.pack(codec::VERSION, Self::type_id())?;

        // IMPORTANT: take the hash only of the marshaled unsigned tx bytes,
        // not the credentials appended after
        let unsigned = packer.take_bytes();
        packer.set_bytes(&unsigned);
        let digest = hash::sha256(&unsigned);

        let creds = sign_digest_all(&digest, &signers).await?;
        self.fx_creds = creds.into_iter().map(fx::Credential::Secp).collect();

        self.base_tx.metadata = Some(seal(packer, &self.fx_creds)?);
        Ok(())
    }
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- avm::txs::test_tx_serialization_with_two_signers --exact --show-output
/// ref. "avalanchego/vms/avm.TestBaseTxSerialization"
#[test]
fn test_tx_serialization_with_two_signers() {
    use crate::txs::transferable::{self, TransferableIn, TransferableOut};

    macro_rules! ab {
        ($e:expr) => {
            tokio_test::block_on($e)
        };
    }

    // ref. "avalanchego/vms/avm/vm_test.go"
    let test_key = key::secp256k1::private_key::Key::from_cb58(
        "PrivateKey-24jUJ9vZexUM6expyMcT48LBx27k1m7xpraoV62oSQAHdziao5",
    )
    .expect("failed to load private key");
    let test_key_short_addr = test_key
        .to_public_key()
        .to_short_id()
        .expect("failed to_short_id");

    let unsigned_tx = txs::Tx {
        network_id: 10,
        blockchain_id: ids::Id::from_slice(&<Vec<u8>>::from([5, 4, 3, 2, 1])),
        transferable_outputs: Some(vec![transferable::Output {
            asset_id: ids::Id::from_slice(&<Vec<u8>>::from([1, 2, 3])),
            out: TransferableOut::TransferOutput(key::secp256k1::txs::transfer::Output {
                amount: 12345,
                output_owners: key::secp256k1::txs::OutputOwners {
                    locktime: 0,
                    threshold: 1,
                    addresses: vec![test_key_short_addr],
                },
            }),
        }]),
        transferable_inputs: Some(vec![transferable::Input {
            utxo_id: txs::utxo::Id {
                tx_id: ids::Id::from_slice(&<Vec<u8>>::from([
                    0xff, 0xfe, 0xfd, 0xfc, 0xfb, 0xfa, 0xf9, 0xf8, //
                    0xf7, 0xf6, 0xf5, 0xf4, 0xf3, 0xf2, 0xf1, 0xf0, //
                    0xef, 0xee, 0xed, 0xec, 0xeb, 0xea, 0xe9, 0xe8, //
                    0xe7, 0xe6, 0xe5, 0xe4, 0xe3, 0xe2, 0xe1, 0xe0, //
                ])),
                output_index: 1,
                ..txs::utxo::Id::default()
            },
            asset_id: ids::Id::from_slice(&<Vec<u8>>::from([1, 2, 3])),
            input: TransferableIn::TransferInput(key::secp256k1::txs::transfer::Input {
                amount: 54321,
                sig_indices: vec![2],
            }),
        }]),
        memo: Some(vec![0x00, 0x01, 0x02, 0x03]),
        ..txs::Tx::default()
    };

    let keys1: Vec<key::secp256k1::private_key::Key> = vec![test_key.clone(), test_key.clone()];
    let keys2: Vec<key::secp256k1::private_key::Key> = vec![test_key.clone(), test_key.clone()];
    let signers: Vec<Vec<key::secp256k1::private_key::Key>> = vec![keys1, keys2];
    let mut tx_with_two_signers = Tx::new(unsigned_tx);
    ab!(tx_with_two_signers.sign(signers)).expect("failed to sign");

    let metadata = tx_with_two_signers.base_tx.metadata.clone().unwrap();
    metadata.verify().unwrap();
    let signed = metadata.tx_bytes_with_signatures;

    // unsigned prefix + 2 credentials of 2 signatures each
    assert_eq!(tx_with_two_signers.fx_creds.len(), 2);
    assert!(signed.len() > metadata.tx_bytes_with_no_signature.len());
    assert!(signed.starts_with(&metadata.tx_bytes_with_no_signature));

    // numCreds
    let creds_offset = metadata.tx_bytes_with_no_signature.len();
    assert_eq!(&signed[creds_offset..creds_offset + 4], &[0, 0, 0, 2]);
    // first credential: secp256k1fx.Credential type ID then 2 signatures
    assert_eq!(&signed[creds_offset + 4..creds_offset + 8], &[0, 0, 0, 9]);
    assert_eq!(&signed[creds_offset + 8..creds_offset + 12], &[0, 0, 0, 2]);

    // signing is a pure function of the unsigned bytes and the keys
    let mut tx_again = Tx::new(tx_with_two_signers.base_tx.clone());
    tx_again.base_tx.metadata = None;
    ab!(tx_again.sign(vec![
        vec![test_key.clone(), test_key.clone()],
        vec![test_key.clone(), test_key.clone()],
    ]))
    .expect("failed to sign");
    assert_eq!(
        tx_again.base_tx.metadata.as_ref().unwrap().tx_bytes_with_signatures,
        signed
    );
    assert_eq!(tx_with_two_signers.tx_id(), tx_again.tx_id());
}
