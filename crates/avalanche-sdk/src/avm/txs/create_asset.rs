//! X-chain asset-creation transaction.
use std::cmp::Ordering;

use crate::{
    avm::txs::fx,
    codec, constants,
    errors::{Error, Result},
    hash, ids, key, packer,
    txs::{self, transferable::TransferableOut},
};
use serde::{Deserialize, Serialize};

/// The outputs a feature extension starts with when the asset is created.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/avm/txs#InitialState>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct InitialState {
    #[serde(rename = "fxIndex")]
    pub fx_index: u32,
    pub outputs: Vec<TransferableOut>,
}

impl InitialState {
    /// Creates the state with its outputs in canonical order.
    pub fn new(fx_index: u32, outputs: Vec<TransferableOut>) -> Self {
        let mut outputs = outputs;
        outputs.sort();
        Self { fx_index, outputs }
    }

    pub fn verify(&self) -> Result<()> {
        for out in self.outputs.iter() {
            out.verify()?;
        }
        if self.outputs.windows(2).any(|w| w[0] > w[1]) {
            return Err(Error::InvalidInput {
                message: "initial state outputs not sorted".to_string(),
            });
        }
        Ok(())
    }

    /// Packs `fx_index(4) ‖ nouts(4) ‖ (type_id ‖ out)*`.
    pub fn pack(&self, packer: &packer::Packer) -> Result<()> {
        packer.pack_u32(self.fx_index)?;
        packer.pack_u32(self.outputs.len() as u32)?;
        for out in self.outputs.iter() {
            out.pack(packer)?;
        }
        Ok(())
    }

    pub fn unpack(packer: &packer::Packer) -> Result<Self> {
        let fx_index = packer.unpack_u32()?;
        let n = packer.unpack_u32()?;
        let mut outputs = Vec::with_capacity(n as usize);
        for _ in 0..n {
            outputs.push(TransferableOut::unpack(packer)?);
        }
        Ok(Self { fx_index, outputs })
    }
}

impl Ord for InitialState {
    fn cmp(&self, other: &InitialState) -> Ordering {
        self.fx_index
            .cmp(&other.fx_index)
            .then_with(|| self.outputs.cmp(&other.outputs))
    }
}

impl PartialOrd for InitialState {
    fn partial_cmp(&self, other: &InitialState) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Creates a new asset with its name, symbol, denomination, and the
/// initial outputs of each feature extension.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/avm/txs#CreateAssetTx>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct Tx {
    pub base_tx: txs::Tx,
    pub name: String,
    pub symbol: String,
    pub denomination: u8,
    pub initial_states: Vec<InitialState>,
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
        "avm.CreateAssetTx".to_string()
    }

    pub fn type_id() -> u32 {
        *(codec::X_TYPES.get(&Self::type_name()).unwrap()) as u32
    }

    /// ref. "avalanchego/vms/avm/txs.CreateAssetTx.SyntacticVerify"
    pub fn verify(&self) -> Result<()> {
        if self.name.is_empty() || self.name.len() > constants::MAX_NAME_LEN {
            return Err(Error::InvalidInput {
                message: format!(
                    "name must be 1..={} bytes, got {}",
                    constants::MAX_NAME_LEN,
                    self.name.len()
                ),
            });
        }
        if self.symbol.is_empty() || self.symbol.len() > constants::MAX_SYMBOL_LEN {
            return Err(Error::InvalidInput {
                message: format!(
                    "symbol must be 1..={} bytes, got {}",
                    constants::MAX_SYMBOL_LEN,
                    self.symbol.len()
                ),
            });
        }
        if !self.symbol.bytes().all(|b| (b' '..=b'~').contains(&b)) {
            return Err(Error::InvalidInput {
                message: format!("symbol {:?} is not printable ASCII", self.symbol),
            });
        }
        if self.denomination > constants::MAX_DENOMINATION {
            return Err(Error::InvalidInput {
                message: format!(
                    "denomination {} exceeds max {}",
                    self.denomination,
                    constants::MAX_DENOMINATION
                ),
            });
        }
        if self.initial_states.is_empty() {
            return Err(Error::InvalidInput {
                message: "create asset tx has no initial states".to_string(),
            });
        }
        for state in self.initial_states.iter() {
            state.verify()?;
        }
        self.base_tx.verify()
    }

    /// Packs `base body ‖ name(str16) ‖ symbol(str16) ‖ denomination(1)
    /// ‖ nstates(4) ‖ states`.
    pub fn pack_unsigned(&self) -> Result<packer::Packer> {
        let packer = self.base_tx.pack(codec::VERSION, Self::type_id())?;
        packer.pack_str(&self.name)?;
        packer.pack_str(&self.symbol)?;
        packer.pack_byte(self.denomination)?;
        packer.pack_u32(self.initial_states.len() as u32)?;
        for state in self.initial_states.iter() {
            state.pack(&packer)?;
        }
        Ok(packer)
    }

    pub fn unpack(d: &[u8]) -> Result<Self> {
        let packer = packer::Packer::load_bytes_for_unpack(d.len() + 1024, d);
        txs::Tx::unpack_header(&packer, Self::type_id())?;
        let base_tx = txs::Tx::unpack_body(&packer)?;

        let name = packer.unpack_str()?;
        let symbol = packer.unpack_str()?;
        let denomination = packer.unpack_byte()?;
        let n = packer.unpack_u32()?;
        let mut initial_states = Vec::with_capacity(n as usize);
        for _ in 0..n {
            initial_states.push(InitialState::unpack(&packer)?);
        }

        Ok(Self {
            base_tx,
            name,
            symbol,
            denomination,
            initial_states,
            fx_creds: Vec::new(),
        })
    }

    pub async fn sign<T: key::secp256k1::SignOnly>(&mut self, signers: Vec<Vec<T>>) -> Result<()> {
        self.verify()?;
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

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- avm::txs::create_asset::test_create_asset_tx --exact --show-output
#[test]
fn test_create_asset_tx() {
    use crate::ids::short;

    let owners = key::secp256k1::txs::OutputOwners::new(0, 1, &[short::Id::from_slice(&[0x01])]);
    let mut tx = Tx {
        base_tx: txs::Tx {
            network_id: 5,
            blockchain_id: ids::Id::from_slice(&[0x01]),
            ..txs::Tx::default()
        },
        name: "Team Rocket NFT".to_string(),
        symbol: "TRNT".to_string(),
        denomination: 0,
        initial_states: vec![InitialState::new(
            1,
            vec![
                TransferableOut::NftMintOutput(crate::nftfx::MintOutput::new(1, owners.clone())),
                TransferableOut::NftMintOutput(crate::nftfx::MintOutput::new(0, owners.clone())),
            ],
        )],
        fx_creds: Vec::new(),
    };
    tx.verify().unwrap();
    // "InitialState::new" sorted the outputs by group id
    match &tx.initial_states[0].outputs[0] {
        TransferableOut::NftMintOutput(out) => assert_eq!(out.group_id, 0),
        other => panic!("unexpected output {:?}", other),
    }

    let packer = tx.pack_unsigned().unwrap();
    let b = packer.take_bytes();
    let decoded = Tx::unpack(&b).unwrap();
    assert_eq!(tx, decoded);

    // symbol too long
    tx.symbol = "TOOBIG".to_string();
    assert!(tx.verify().is_err());
    tx.symbol = "T\u{7f}".to_string();
    assert!(tx.verify().is_err());
    tx.symbol = "OK".to_string();
    tx.denomination = constants::MAX_DENOMINATION + 1;
    assert!(tx.verify().is_err());
}
