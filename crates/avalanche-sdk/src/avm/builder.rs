//! Builds unsigned X-chain transactions from a UTXO set.
use std::collections::BTreeMap;

use crate::{
    avm::txs as avm_txs,
    errors::{Error, Result},
    ids::{self, short},
    key, nftfx,
    txs::{
        self,
        aad::AssetAmountDestination,
        operation::{Op, TransferableOperation},
        transferable,
        utxo::{self, Utxo},
        utxo_set::{Spendable, UtxoSet},
    },
    units,
};

/// Per-input signer addresses, aligned with the sorted inputs of the
/// transaction they were selected for. Each inner list is in sig-index
/// order; the keychain resolves them to keys at signing time.
pub type Signers = Vec<Vec<short::Id>>;

/// Common context for building X-chain transactions.
#[derive(Debug, Clone)]
pub struct Builder<'a> {
    pub network_id: u32,
    pub blockchain_id: ids::Id,

    /// The AVAX asset id; fees are always denominated in it.
    pub avax_asset_id: ids::Id,
    /// Fee burned by every non-asset-creating transaction.
    pub tx_fee: u64,
    /// Fee burned by asset creation.
    pub create_asset_tx_fee: u64,

    pub utxo_set: &'a UtxoSet,
}

impl<'a> Builder<'a> {
    pub fn new(
        network_id: u32,
        blockchain_id: ids::Id,
        avax_asset_id: ids::Id,
        tx_fee: u64,
        create_asset_tx_fee: u64,
        utxo_set: &'a UtxoSet,
    ) -> Self {
        Self {
            network_id,
            blockchain_id,
            avax_asset_id,
            tx_fee,
            create_asset_tx_fee,
            utxo_set,
        }
    }

    fn base_body(
        &self,
        aad: &AssetAmountDestination,
        extra_outputs: Vec<transferable::Output>,
        memo: Option<Vec<u8>>,
    ) -> (txs::Tx, Signers) {
        let mut outs: Vec<transferable::Output> = Vec::new();
        outs.extend(aad.outputs.iter().cloned());
        outs.extend(aad.change_outputs.iter().cloned());
        outs.extend(extra_outputs);
        outs.sort();

        // inputs were sorted in lockstep with their signers by selection
        let ins: Vec<transferable::Input> = aad.inputs.iter().map(|(i, _)| i.clone()).collect();
        let signers: Signers = aad.inputs.iter().map(|(_, s)| s.clone()).collect();

        (
            txs::Tx {
                network_id: self.network_id,
                blockchain_id: self.blockchain_id,
                transferable_outputs: if outs.is_empty() { None } else { Some(outs) },
                transferable_inputs: if ins.is_empty() { None } else { Some(ins) },
                memo,
                ..txs::Tx::default()
            },
            signers,
        )
    }

    /// Rejects transactions whose AVAX burn is absurd: the burn must stay
    /// within 10 AVAX or within the AVAX moved to outputs.
    pub fn check_goose_egg(
        &self,
        base_tx: &txs::Tx,
        extra_outputs: &[transferable::Output],
    ) -> Result<()> {
        let mut consumed: u64 = 0;
        if let Some(ins) = &base_tx.transferable_inputs {
            for input in ins.iter() {
                if input.asset_id == self.avax_asset_id {
                    consumed = consumed.saturating_add(input.input.amount());
                }
            }
        }

        let mut produced: u64 = 0;
        let base_outs = base_tx.transferable_outputs.clone().unwrap_or_default();
        for out in base_outs.iter().chain(extra_outputs.iter()) {
            if out.asset_id == self.avax_asset_id {
                produced = produced.saturating_add(out.out.amount().unwrap_or(0));
            }
        }

        let burned = consumed.saturating_sub(produced);
        if burned > 10 * units::AVAX && burned > produced {
            return Err(Error::GooseEgg {
                message: format!("burning {burned} nAVAX against {produced} nAVAX of outputs"),
            });
        }
        Ok(())
    }

    /// Builds a standard transfer of "amount" units of "asset_id" to the
    /// destination addresses. Returns "None" when there is nothing to move
    /// and nothing to burn.
    #[allow(clippy::too_many_arguments)]
    pub fn base_tx(
        &self,
        asset_id: ids::Id,
        amount: u64,
        to: &[short::Id],
        senders: &[short::Id],
        change_addresses: &[short::Id],
        memo: Option<Vec<u8>>,
        as_of: u64,
        locktime: u64,
        threshold: u32,
    ) -> Result<Option<(avm_txs::Tx, Signers)>> {
        let mut aad = AssetAmountDestination::new(senders, to, change_addresses);
        aad.add_asset_amount(asset_id, amount, 0);
        if self.tx_fee > 0 {
            // merges into the same entry when the fee asset is transferred
            aad.add_asset_amount(self.avax_asset_id, 0, self.tx_fee);
        }

        if self
            .utxo_set
            .get_minimum_spendable(&mut aad, as_of, locktime, threshold)?
            == Spendable::NoTransaction
        {
            return Ok(None);
        }

        let (base_tx, signers) = self.base_body(&aad, Vec::new(), memo);
        self.check_goose_egg(&base_tx, &[])?;
        Ok(Some((avm_txs::Tx::new(base_tx), signers)))
    }

    /// Builds an asset-creation transaction carrying the initial states.
    #[allow(clippy::too_many_arguments)]
    pub fn create_asset_tx(
        &self,
        name: &str,
        symbol: &str,
        denomination: u8,
        initial_states: Vec<avm_txs::create_asset::InitialState>,
        senders: &[short::Id],
        change_addresses: &[short::Id],
        memo: Option<Vec<u8>>,
        as_of: u64,
    ) -> Result<(avm_txs::create_asset::Tx, Signers)> {
        let mut aad = AssetAmountDestination::new(senders, senders, change_addresses);
        if self.create_asset_tx_fee > 0 {
            aad.add_asset_amount(self.avax_asset_id, 0, self.create_asset_tx_fee);
            self.utxo_set.get_minimum_spendable(&mut aad, as_of, 0, 1)?;
        }

        let (base_tx, signers) = self.base_body(&aad, Vec::new(), memo);
        self.check_goose_egg(&base_tx, &[])?;

        let mut states = initial_states;
        states.sort();
        let tx = avm_txs::create_asset::Tx {
            base_tx,
            name: name.to_string(),
            symbol: symbol.to_string(),
            denomination,
            initial_states: states,
            fx_creds: Vec::new(),
        };
        tx.verify()?;
        Ok((tx, signers))
    }

    /// Finds a UTXO of the asset whose output satisfies "pred" and is
    /// spendable by the senders, returning it with its spenders.
    fn find_operable_utxo(
        &self,
        asset_id: &ids::Id,
        senders: &[short::Id],
        as_of: u64,
        pred: impl Fn(&transferable::TransferableOut) -> bool,
    ) -> Result<(Utxo, Vec<(u32, short::Id)>)> {
        for id in self.utxo_set.utxo_ids_by_asset(asset_id) {
            let u = self.utxo_set.get(&id).expect("indexed utxo");
            if !pred(&u.out) {
                continue;
            }
            let owners = u.out.output_owners();
            if !owners.meets_threshold(senders, as_of) {
                continue;
            }
            return Ok((u.clone(), owners.get_spenders(senders, as_of)));
        }
        Err(Error::InsufficientFunds {
            message: format!("no operable utxo for asset {asset_id}"),
        })
    }

    fn operation_tx(
        &self,
        ops: Vec<(TransferableOperation, Vec<short::Id>)>,
        senders: &[short::Id],
        change_addresses: &[short::Id],
        memo: Option<Vec<u8>>,
        as_of: u64,
    ) -> Result<(avm_txs::operation::Tx, Signers, Signers)> {
        let mut aad = AssetAmountDestination::new(senders, senders, change_addresses);
        if self.tx_fee > 0 {
            aad.add_asset_amount(self.avax_asset_id, 0, self.tx_fee);
            self.utxo_set.get_minimum_spendable(&mut aad, as_of, 0, 1)?;
        }

        let (base_tx, input_signers) = self.base_body(&aad, Vec::new(), memo);
        self.check_goose_egg(&base_tx, &[])?;

        // operations sort by their utxo-id lists; signers follow
        let mut ops = ops;
        ops.sort_by(|a, b| a.0.cmp(&b.0));
        let op_signers: Signers = ops.iter().map(|(_, s)| s.clone()).collect();
        let ops: Vec<TransferableOperation> = ops.into_iter().map(|(op, _)| op).collect();

        let tx = avm_txs::operation::Tx {
            base_tx,
            ops,
            fx_creds: Vec::new(),
        };
        tx.verify()?;
        Ok((tx, input_signers, op_signers))
    }

    /// Builds an operation transaction minting "group_id"/"payload" NFTs
    /// of the asset to the owner sets in "to".
    #[allow(clippy::too_many_arguments)]
    pub fn mint_nft_tx(
        &self,
        asset_id: ids::Id,
        group_id: u32,
        payload: &[u8],
        to: &[short::Id],
        senders: &[short::Id],
        change_addresses: &[short::Id],
        memo: Option<Vec<u8>>,
        as_of: u64,
    ) -> Result<(avm_txs::operation::Tx, Signers, Signers)> {
        let (minting_utxo, spenders) =
            self.find_operable_utxo(&asset_id, senders, as_of, |out| {
                matches!(
                    out,
                    transferable::TransferableOut::NftMintOutput(o) if o.group_id == group_id
                )
            })?;

        let sig_indices: Vec<u32> = spenders.iter().map(|(i, _)| *i).collect();
        let signer_addrs: Vec<short::Id> = spenders.iter().map(|(_, a)| *a).collect();

        let op = TransferableOperation::new(
            asset_id,
            &[minting_utxo.utxo_id.clone()],
            Op::NftMint(nftfx::MintOperation {
                mint_input: key::secp256k1::txs::Input::new(sig_indices),
                group_id,
                payload: Vec::from(payload),
                outputs: vec![key::secp256k1::txs::OutputOwners::new(0, 1, to)],
            }),
        );

        self.operation_tx(
            vec![(op, signer_addrs)],
            senders,
            change_addresses,
            memo,
            as_of,
        )
    }

    /// Builds an operation transaction transferring the NFT held by
    /// "nft_utxo_id" to the destination addresses.
    #[allow(clippy::too_many_arguments)]
    pub fn transfer_nft_tx(
        &self,
        nft_utxo_id: &utxo::Id,
        to: &[short::Id],
        senders: &[short::Id],
        change_addresses: &[short::Id],
        memo: Option<Vec<u8>>,
        as_of: u64,
    ) -> Result<(avm_txs::operation::Tx, Signers, Signers)> {
        let u = self
            .utxo_set
            .get(nft_utxo_id)
            .ok_or_else(|| Error::InvalidInput {
                message: format!("utxo {} not found", nft_utxo_id.to_cb58()),
            })?
            .clone();

        let nft_out = match &u.out {
            transferable::TransferableOut::NftTransferOutput(out) => out.clone(),
            other => {
                return Err(Error::InvalidInput {
                    message: format!("utxo holds no NFT transfer output (type {})", other.type_id()),
                })
            }
        };
        if !nft_out.output_owners.meets_threshold(senders, as_of) {
            return Err(Error::InsufficientFunds {
                message: "senders cannot spend the NFT".to_string(),
            });
        }

        let spenders = nft_out.output_owners.get_spenders(senders, as_of);
        let sig_indices: Vec<u32> = spenders.iter().map(|(i, _)| *i).collect();
        let signer_addrs: Vec<short::Id> = spenders.iter().map(|(_, a)| *a).collect();

        let op = TransferableOperation::new(
            u.asset_id,
            &[u.utxo_id.clone()],
            Op::NftTransfer(nftfx::TransferOperation {
                input: key::secp256k1::txs::Input::new(sig_indices),
                output: nftfx::TransferOutput::new(
                    nft_out.group_id,
                    nft_out.payload.clone(),
                    key::secp256k1::txs::OutputOwners::new(0, 1, to),
                ),
            }),
        );

        self.operation_tx(
            vec![(op, signer_addrs)],
            senders,
            change_addresses,
            memo,
            as_of,
        )
    }

    /// Builds an operation transaction exercising a secp mint output:
    /// mints "amount" fresh units to the destinations and re-creates the
    /// minting right under its current owners.
    #[allow(clippy::too_many_arguments)]
    pub fn mint_tx(
        &self,
        asset_id: ids::Id,
        amount: u64,
        to: &[short::Id],
        senders: &[short::Id],
        change_addresses: &[short::Id],
        memo: Option<Vec<u8>>,
        as_of: u64,
    ) -> Result<(avm_txs::operation::Tx, Signers, Signers)> {
        let (minting_utxo, spenders) = self.find_operable_utxo(&asset_id, senders, as_of, |out| {
            matches!(out, transferable::TransferableOut::MintOutput(_))
        })?;
        let mint_out = match &minting_utxo.out {
            transferable::TransferableOut::MintOutput(out) => out.clone(),
            _ => unreachable!("predicate admitted mint outputs only"),
        };

        let sig_indices: Vec<u32> = spenders.iter().map(|(i, _)| *i).collect();
        let signer_addrs: Vec<short::Id> = spenders.iter().map(|(_, a)| *a).collect();

        let op = TransferableOperation::new(
            asset_id,
            &[minting_utxo.utxo_id.clone()],
            Op::SecpMint(key::secp256k1::txs::mint::Operation {
                mint_input: key::secp256k1::txs::Input::new(sig_indices),
                mint_output: mint_out,
                transfer_output: key::secp256k1::txs::transfer::Output::new(
                    amount,
                    key::secp256k1::txs::OutputOwners::new(0, 1, to),
                ),
            }),
        );

        self.operation_tx(
            vec![(op, signer_addrs)],
            senders,
            change_addresses,
            memo,
            as_of,
        )
    }

    /// Builds an import transaction consuming the atomic UTXOs exported by
    /// "source_chain_id". The fee is taken out of the imported AVAX first;
    /// any shortfall is funded from the local UTXO set.
    #[allow(clippy::too_many_arguments)]
    pub fn import_tx(
        &self,
        source_chain_id: ids::Id,
        atomic_utxos: &[Utxo],
        to: &[short::Id],
        senders: &[short::Id],
        change_addresses: &[short::Id],
        memo: Option<Vec<u8>>,
        as_of: u64,
        locktime: u64,
        threshold: u32,
    ) -> Result<(avm_txs::import::Tx, Signers)> {
        let mut imported: Vec<(transferable::Input, Vec<short::Id>)> = Vec::new();
        let mut imported_amounts: BTreeMap<ids::Id, u64> = BTreeMap::new();

        for u in atomic_utxos.iter() {
            let amount = match u.out.amount() {
                Some(a) => a,
                None => continue,
            };
            let owners = u.out.output_owners();
            if !owners.meets_threshold(senders, as_of) {
                continue;
            }
            let spenders = owners.get_spenders(senders, as_of);
            let sig_indices: Vec<u32> = spenders.iter().map(|(i, _)| *i).collect();
            let signer_addrs: Vec<short::Id> = spenders.iter().map(|(_, a)| *a).collect();

            imported.push((
                transferable::Input {
                    utxo_id: u.utxo_id.clone(),
                    asset_id: u.asset_id,
                    input: transferable::TransferableIn::TransferInput(
                        key::secp256k1::txs::transfer::Input {
                            amount,
                            sig_indices,
                        },
                    ),
                },
                signer_addrs,
            ));
            *imported_amounts.entry(u.asset_id).or_insert(0) += amount;
        }

        if imported.is_empty() {
            return Err(Error::InsufficientFunds {
                message: "no spendable atomic utxos to import".to_string(),
            });
        }
        transferable::sort_inputs_with_signers(&mut imported);

        // pay the fee from the imported AVAX first
        let mut fee_remaining = self.tx_fee;
        let mut outs: Vec<transferable::Output> = Vec::new();
        for (asset_id, amount) in imported_amounts.iter() {
            let mut remaining = *amount;
            if *asset_id == self.avax_asset_id && fee_remaining > 0 {
                let burn = std::cmp::min(remaining, fee_remaining);
                fee_remaining -= burn;
                remaining -= burn;
            }
            if remaining > 0 {
                outs.push(transferable::Output {
                    asset_id: *asset_id,
                    out: transferable::TransferableOut::TransferOutput(
                        key::secp256k1::txs::transfer::Output {
                            amount: remaining,
                            output_owners: key::secp256k1::txs::OutputOwners::new(
                                locktime, threshold, to,
                            ),
                        },
                    ),
                });
            }
        }

        // fund the rest of the fee locally
        let mut aad = AssetAmountDestination::new(senders, to, change_addresses);
        if fee_remaining > 0 {
            aad.add_asset_amount(self.avax_asset_id, 0, fee_remaining);
            self.utxo_set.get_minimum_spendable(&mut aad, as_of, 0, 1)?;
        }

        let (base_tx, mut signers) = self.base_body(&aad, outs, memo);
        let imported_ins: Vec<transferable::Input> =
            imported.iter().map(|(i, _)| i.clone()).collect();

        // the imported inputs count as consumed value for the fee sanity check
        let mut check_tx = base_tx.clone();
        let mut all_ins = check_tx.transferable_inputs.take().unwrap_or_default();
        all_ins.extend(imported_ins.iter().cloned());
        check_tx.transferable_inputs = Some(all_ins);
        self.check_goose_egg(&check_tx, &[])?;

        // credentials cover the base inputs first, then the imported inputs
        signers.extend(imported.into_iter().map(|(_, s)| s));

        let tx = avm_txs::import::Tx {
            base_tx,
            source_chain_id: Some(source_chain_id),
            source_chain_transferable_inputs: Some(imported_ins),
            fx_creds: Vec::new(),
        };
        Ok((tx, signers))
    }

    /// Builds an export transaction moving "amount" AVAX into the
    /// destination chain's atomic memory. The exported asset must be the
    /// fee asset; the rule holds on both chains.
    #[allow(clippy::too_many_arguments)]
    pub fn export_tx(
        &self,
        destination_chain_id: ids::Id,
        asset_id: ids::Id,
        amount: u64,
        to: &[short::Id],
        senders: &[short::Id],
        change_addresses: &[short::Id],
        memo: Option<Vec<u8>>,
        as_of: u64,
        locktime: u64,
        threshold: u32,
    ) -> Result<(avm_txs::export::Tx, Signers)> {
        if asset_id != self.avax_asset_id {
            return Err(Error::InvalidInput {
                message: format!("exported asset {asset_id} must be the fee asset"),
            });
        }
        if amount == 0 {
            return Err(Error::InvalidInput {
                message: "export amount must be positive".to_string(),
            });
        }

        let mut aad = AssetAmountDestination::new(senders, to, change_addresses);
        aad.add_asset_amount(asset_id, amount, self.tx_fee);
        self.utxo_set
            .get_minimum_spendable(&mut aad, as_of, locktime, threshold)?;

        // the destination outputs leave the chain; only change stays local
        let exported_outs = aad.outputs.clone();
        let mut local_outs = aad.change_outputs.clone();
        local_outs.sort();
        let mut exported = exported_outs;
        exported.sort();

        let ins: Vec<transferable::Input> = aad.inputs.iter().map(|(i, _)| i.clone()).collect();
        let signers: Signers = aad.inputs.iter().map(|(_, s)| s.clone()).collect();

        let base_tx = txs::Tx {
            network_id: self.network_id,
            blockchain_id: self.blockchain_id,
            transferable_outputs: if local_outs.is_empty() {
                None
            } else {
                Some(local_outs)
            },
            transferable_inputs: if ins.is_empty() { None } else { Some(ins) },
            memo,
            ..txs::Tx::default()
        };
        self.check_goose_egg(&base_tx, &exported)?;

        let tx = avm_txs::export::Tx {
            base_tx,
            destination_chain_id: Some(destination_chain_id),
            destination_chain_transferable_outputs: Some(exported),
            fx_creds: Vec::new(),
        };
        Ok((tx, signers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::secp256k1::txs::OutputOwners;
    use crate::txs::transferable::TransferableOut;

    fn avax() -> ids::Id {
        ids::Id::from_slice(&[0xa0])
    }

    fn amount_utxo(tx_byte: u8, asset: ids::Id, amount: u64, owner: short::Id) -> Utxo {
        Utxo {
            utxo_id: utxo::Id::new(&[tx_byte; 32], 0).unwrap(),
            asset_id: asset,
            out: TransferableOut::TransferOutput(key::secp256k1::txs::transfer::Output {
                amount,
                output_owners: OutputOwners::new(0, 1, &[owner]),
            }),
        }
    }

    /// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- avm::builder::tests::test_build_base_tx --exact --show-output
    #[test]
    fn test_build_base_tx() {
        let sender = short::Id::from_slice(&[0x01]);
        let dest = short::Id::from_slice(&[0x02]);

        let mut set = UtxoSet::new();
        set.add(amount_utxo(0x01, avax(), 600, sender), false);
        set.add(amount_utxo(0x02, avax(), 500, sender), false);

        let builder = Builder::new(5, ids::Id::from_slice(&[0x10]), avax(), 100, 100, &set);
        let (tx, signers) = builder
            .base_tx(avax(), 1000, &[dest], &[sender], &[], None, 1, 0, 1)
            .unwrap()
            .expect("spendable");

        let ins = tx.base_tx.transferable_inputs.clone().unwrap();
        let outs = tx.base_tx.transferable_outputs.clone().unwrap();
        assert_eq!(ins.len(), 2);
        // 600 + 500 == 1000 + 100: no change output
        assert_eq!(outs.len(), 1);
        assert_eq!(outs[0].out.amount(), Some(1000));
        assert_eq!(signers.len(), 2);
        for (input, input_signers) in ins.iter().zip(signers.iter()) {
            assert_eq!(input.input.sig_indices(), &[0]);
            assert_eq!(input_signers, &vec![sender]);
        }

        // value conservation: inputs == outputs + fee
        let consumed: u64 = ins.iter().map(|i| i.input.amount()).sum();
        let produced: u64 = outs.iter().filter_map(|o| o.out.amount()).sum();
        assert_eq!(consumed, produced + 100);

        // zero targets surface the no-op sentinel
        let builder_free = Builder::new(5, ids::Id::from_slice(&[0x10]), avax(), 0, 0, &set);
        assert!(builder_free
            .base_tx(avax(), 0, &[dest], &[sender], &[], None, 1, 0, 1)
            .unwrap()
            .is_none());
    }

    /// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- avm::builder::tests::test_build_export_tx --exact --show-output
    #[test]
    fn test_build_export_tx() {
        let sender = short::Id::from_slice(&[0x01]);
        let dest = short::Id::from_slice(&[0x02]);
        let p_chain = ids::Id::from_slice(&[0x77]);

        let mut set = UtxoSet::new();
        set.add(amount_utxo(0x01, avax(), 100, sender), false);

        let builder = Builder::new(5, ids::Id::from_slice(&[0x10]), avax(), 10, 10, &set);
        let (tx, signers) = builder
            .export_tx(p_chain, avax(), 90, &[dest], &[sender], &[], None, 1, 0, 1)
            .unwrap();

        assert_eq!(tx.destination_chain_id, Some(p_chain));
        let exported = tx.destination_chain_transferable_outputs.clone().unwrap();
        assert_eq!(exported.len(), 1);
        assert_eq!(exported[0].out.amount(), Some(90));
        // 100 - 90 - 10 == 0: no local change outputs
        assert!(tx.base_tx.transferable_outputs.is_none());
        assert_eq!(signers.len(), 1);

        // a non-fee asset cannot be exported
        let other_asset = ids::Id::from_slice(&[0xbb]);
        match builder.export_tx(p_chain, other_asset, 90, &[dest], &[sender], &[], None, 1, 0, 1) {
            Err(Error::InvalidInput { .. }) => {}
            other => panic!("expected invalid input, got {:?}", other),
        }
    }

    /// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- avm::builder::tests::test_build_import_tx --exact --show-output
    #[test]
    fn test_build_import_tx() {
        let sender = short::Id::from_slice(&[0x01]);
        let dest = short::Id::from_slice(&[0x02]);
        let x_chain = ids::Id::from_slice(&[0x66]);

        let set = UtxoSet::new();
        let atomic = vec![amount_utxo(0x05, avax(), 1000, sender)];

        let builder = Builder::new(5, ids::Id::from_slice(&[0x10]), avax(), 10, 10, &set);
        let (tx, signers) = builder
            .import_tx(x_chain, &atomic, &[dest], &[sender], &[], None, 1, 0, 1)
            .unwrap();

        assert_eq!(tx.source_chain_id, Some(x_chain));
        let imported = tx.source_chain_transferable_inputs.clone().unwrap();
        assert_eq!(imported.len(), 1);
        assert_eq!(imported[0].input.amount(), 1000);
        // no local inputs needed; fee paid from the imported amount
        assert!(tx.base_tx.transferable_inputs.is_none());
        let outs = tx.base_tx.transferable_outputs.clone().unwrap();
        assert_eq!(outs.len(), 1);
        assert_eq!(outs[0].out.amount(), Some(990));
        assert_eq!(signers.len(), 1);

        // nothing to import
        match builder.import_tx(x_chain, &[], &[dest], &[sender], &[], None, 1, 0, 1) {
            Err(Error::InsufficientFunds { .. }) => {}
            other => panic!("expected insufficient funds, got {:?}", other),
        }
    }

    /// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- avm::builder::tests::test_build_nft_txs --exact --show-output
    #[test]
    fn test_build_nft_txs() {
        let sender = short::Id::from_slice(&[0x01]);
        let dest = short::Id::from_slice(&[0x02]);
        let nft_asset = ids::Id::from_slice(&[0xbb]);

        let mut set = UtxoSet::new();
        set.add(amount_utxo(0x01, avax(), 50, sender), false);
        set.add(
            Utxo {
                utxo_id: utxo::Id::new(&[0x02; 32], 0).unwrap(),
                asset_id: nft_asset,
                out: TransferableOut::NftMintOutput(nftfx::MintOutput::new(
                    0,
                    OutputOwners::new(0, 1, &[sender]),
                )),
            },
            false,
        );
        let nft_utxo_id = utxo::Id::new(&[0x03; 32], 1).unwrap();
        set.add(
            Utxo {
                utxo_id: nft_utxo_id.clone(),
                asset_id: nft_asset,
                out: TransferableOut::NftTransferOutput(nftfx::TransferOutput::new(
                    0,
                    vec![0xaa],
                    OutputOwners::new(0, 1, &[sender]),
                )),
            },
            false,
        );

        let builder = Builder::new(5, ids::Id::from_slice(&[0x10]), avax(), 10, 10, &set);

        let (mint_tx, input_signers, op_signers) = builder
            .mint_nft_tx(
                nft_asset,
                0,
                &[0xca, 0xfe],
                &[dest],
                &[sender],
                &[],
                None,
                1,
            )
            .unwrap();
        assert_eq!(mint_tx.ops.len(), 1);
        assert_eq!(input_signers.len(), 1); // fee input
        assert_eq!(op_signers, vec![vec![sender]]);
        match &mint_tx.ops[0].op {
            Op::NftMint(op) => {
                assert_eq!(op.group_id, 0);
                assert_eq!(op.payload, vec![0xca, 0xfe]);
                assert_eq!(op.mint_input.sig_indices, vec![0]);
            }
            other => panic!("unexpected op {:?}", other),
        }

        let (transfer_tx, _, op_signers) = builder
            .transfer_nft_tx(&nft_utxo_id, &[dest], &[sender], &[], None, 1)
            .unwrap();
        assert_eq!(op_signers, vec![vec![sender]]);
        match &transfer_tx.ops[0].op {
            Op::NftTransfer(op) => {
                // payload rides along; ownership moves to the destination
                assert_eq!(op.output.payload, vec![0xaa]);
                assert_eq!(op.output.output_owners.addresses, vec![dest]);
            }
            other => panic!("unexpected op {:?}", other),
        }
    }

    /// Build a transaction burning ~11 AVAX of fees against 1 nAVAX of
    /// outputs: the sanity guard must reject it.
    /// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- avm::builder::tests::test_goose_egg --exact --show-output
    #[test]
    fn test_goose_egg() {
        let sender = short::Id::from_slice(&[0x01]);
        let dest = short::Id::from_slice(&[0x02]);

        let mut set = UtxoSet::new();
        set.add(
            amount_utxo(0x01, avax(), 12 * units::AVAX, sender),
            false,
        );

        let builder = Builder::new(
            5,
            ids::Id::from_slice(&[0x10]),
            avax(),
            11 * units::AVAX, // absurd fee
            10,
            &set,
        );
        match builder.base_tx(avax(), 1, &[dest], &[sender], &[], None, 1, 0, 1) {
            Err(Error::GooseEgg { .. }) => {}
            other => panic!("expected goose egg, got {:?}", other),
        }

        // burning big fees is fine when the moved value is bigger
        let builder = Builder::new(
            5,
            ids::Id::from_slice(&[0x10]),
            avax(),
            units::AVAX,
            10,
            &set,
        );
        assert!(builder
            .base_tx(avax(), 11 * units::AVAX, &[dest], &[sender], &[], None, 1, 0, 1)
            .unwrap()
            .is_some());
    }
}
