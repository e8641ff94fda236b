//! Builds unsigned P-chain transactions from a UTXO set.
use std::collections::BTreeMap;

use crate::{
    constants,
    errors::{Error, Result},
    ids::{self, node, short},
    key,
    platformvm::txs as platform_txs,
    txs::{
        self,
        aad::AssetAmountDestination,
        transferable,
        utxo::Utxo,
        utxo_set::UtxoSet,
    },
    units,
};

/// Per-input signer addresses, aligned with the sorted inputs of the
/// transaction they were selected for.
pub type Signers = Vec<Vec<short::Id>>;

/// Common context for building P-chain transactions.
#[derive(Debug, Clone)]
pub struct Builder<'a> {
    pub network_id: u32,
    pub blockchain_id: ids::Id,

    /// The staking/fee asset id.
    pub avax_asset_id: ids::Id,
    /// Fee burned by import/export transactions.
    pub tx_fee: u64,
    /// Fee burned by staking transactions.
    pub add_staker_fee: u64,

    pub utxo_set: &'a UtxoSet,
}

/// Converts an API-unit delegation fee (percent, at most 4 decimals
/// meaningful) into shares of 1/10,000ths of a percent.
pub fn shares_from_percent(percent: f64) -> Result<u32> {
    if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
        return Err(Error::InvalidInput {
            message: format!("delegation fee {percent} must be within [0, 100]"),
        });
    }
    Ok((percent * 10_000.0).round() as u32)
}

impl<'a> Builder<'a> {
    pub fn new(
        network_id: u32,
        blockchain_id: ids::Id,
        avax_asset_id: ids::Id,
        tx_fee: u64,
        add_staker_fee: u64,
        utxo_set: &'a UtxoSet,
    ) -> Self {
        Self {
            network_id,
            blockchain_id,
            avax_asset_id,
            tx_fee,
            add_staker_fee,
            utxo_set,
        }
    }

    /// The staking window must start in the future and stay within the
    /// network's duration bounds.
    fn verify_staking_window(&self, start_time: u64, end_time: u64, now: u64) -> Result<()> {
        if start_time <= now {
            return Err(Error::InvalidInput {
                message: format!("start time {start_time} not after current time {now}"),
            });
        }
        if end_time <= start_time {
            return Err(Error::InvalidInput {
                message: format!("end time {end_time} not after start time {start_time}"),
            });
        }
        let duration = end_time - start_time;
        if duration < constants::MIN_STAKE_DURATION {
            return Err(Error::InvalidInput {
                message: format!(
                    "staking duration {duration} below minimum {}",
                    constants::MIN_STAKE_DURATION
                ),
            });
        }
        if duration > constants::MAX_STAKE_DURATION {
            return Err(Error::InvalidInput {
                message: format!(
                    "staking duration {duration} above maximum {}",
                    constants::MAX_STAKE_DURATION
                ),
            });
        }
        Ok(())
    }

    fn check_goose_egg(
        &self,
        ins: &[transferable::Input],
        outs: &[transferable::Output],
        stake_outs: &[transferable::Output],
    ) -> Result<()> {
        let mut consumed: u64 = 0;
        for input in ins.iter() {
            if input.asset_id == self.avax_asset_id {
                consumed = consumed.saturating_add(input.input.amount());
            }
        }
        let mut produced: u64 = 0;
        for out in outs.iter().chain(stake_outs.iter()) {
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

    /// Selects "stake_amount + fee" AVAX: the amount-target outputs become
    /// the stake, the change stays liquid.
    fn spend_stake(
        &self,
        stake_amount: u64,
        senders: &[short::Id],
        change_addresses: &[short::Id],
        as_of: u64,
    ) -> Result<(txs::Tx, Vec<transferable::Output>, Signers)> {
        let mut aad = AssetAmountDestination::new(senders, senders, change_addresses);
        aad.add_asset_amount(self.avax_asset_id, stake_amount, self.add_staker_fee);
        self.utxo_set.get_minimum_spendable(&mut aad, as_of, 0, 1)?;

        let mut stake_outs = aad.outputs.clone();
        stake_outs.sort();
        let mut outs = aad.change_outputs.clone();
        outs.sort();

        let ins: Vec<transferable::Input> = aad.inputs.iter().map(|(i, _)| i.clone()).collect();
        let signers: Signers = aad.inputs.iter().map(|(_, s)| s.clone()).collect();

        self.check_goose_egg(&ins, &outs, &stake_outs)?;

        Ok((
            txs::Tx {
                network_id: self.network_id,
                blockchain_id: self.blockchain_id,
                transferable_outputs: if outs.is_empty() { None } else { Some(outs) },
                transferable_inputs: if ins.is_empty() { None } else { Some(ins) },
                memo: None,
                ..txs::Tx::default()
            },
            stake_outs,
            signers,
        ))
    }

    /// Builds an add-validator transaction staking "stake_amount" AVAX.
    /// "shares" is the validator's cut of delegation rewards in
    /// 1/10,000ths of a percent.
    #[allow(clippy::too_many_arguments)]
    pub fn add_validator_tx(
        &self,
        node_id: node::Id,
        start_time: u64,
        end_time: u64,
        stake_amount: u64,
        reward_addresses: &[short::Id],
        shares: u32,
        senders: &[short::Id],
        change_addresses: &[short::Id],
        as_of: u64,
    ) -> Result<(platform_txs::add_validator::Tx, Signers)> {
        self.verify_staking_window(start_time, end_time, as_of)?;
        if stake_amount < constants::MIN_VALIDATOR_STAKE {
            return Err(Error::InvalidInput {
                message: format!(
                    "stake {stake_amount} below minimum {}",
                    constants::MIN_VALIDATOR_STAKE
                ),
            });
        }
        if shares > constants::MAX_DELEGATION_SHARES {
            return Err(Error::InvalidInput {
                message: format!(
                    "shares {shares} exceed max {}",
                    constants::MAX_DELEGATION_SHARES
                ),
            });
        }

        let (base_tx, stake_outs, signers) =
            self.spend_stake(stake_amount, senders, change_addresses, as_of)?;

        let tx = platform_txs::add_validator::Tx {
            base_tx,
            validator: platform_txs::Validator {
                node_id,
                start_time,
                end_time,
                weight: stake_amount,
            },
            stake_outs: Some(stake_outs),
            rewards_owner: key::secp256k1::txs::OutputOwners::new(0, 1, reward_addresses),
            shares,
        };
        tx.verify()?;
        Ok((tx, signers))
    }

    /// Builds an add-delegator transaction staking "stake_amount" AVAX
    /// behind an existing validator.
    #[allow(clippy::too_many_arguments)]
    pub fn add_delegator_tx(
        &self,
        node_id: node::Id,
        start_time: u64,
        end_time: u64,
        stake_amount: u64,
        reward_addresses: &[short::Id],
        senders: &[short::Id],
        change_addresses: &[short::Id],
        as_of: u64,
    ) -> Result<(platform_txs::add_delegator::Tx, Signers)> {
        self.verify_staking_window(start_time, end_time, as_of)?;
        if stake_amount < constants::MIN_DELEGATOR_STAKE {
            return Err(Error::InvalidInput {
                message: format!(
                    "stake {stake_amount} below minimum {}",
                    constants::MIN_DELEGATOR_STAKE
                ),
            });
        }

        let (base_tx, stake_outs, signers) =
            self.spend_stake(stake_amount, senders, change_addresses, as_of)?;

        let tx = platform_txs::add_delegator::Tx {
            base_tx,
            validator: platform_txs::Validator {
                node_id,
                start_time,
                end_time,
                weight: stake_amount,
            },
            stake_outs: Some(stake_outs),
            rewards_owner: key::secp256k1::txs::OutputOwners::new(0, 1, reward_addresses),
        };
        tx.verify()?;
        Ok((tx, signers))
    }

    /// Builds an add-subnet-validator transaction with the sampling
    /// "weight". The subnet auth indices index the subnet owner's control
    /// keys; its credential is appended after the input credentials at
    /// signing time.
    #[allow(clippy::too_many_arguments)]
    pub fn add_subnet_validator_tx(
        &self,
        node_id: node::Id,
        start_time: u64,
        end_time: u64,
        weight: u64,
        subnet_id: ids::Id,
        subnet_auth_indices: &[u32],
        senders: &[short::Id],
        change_addresses: &[short::Id],
        as_of: u64,
    ) -> Result<(platform_txs::add_subnet_validator::Tx, Signers)> {
        self.verify_staking_window(start_time, end_time, as_of)?;

        let mut aad = AssetAmountDestination::new(senders, senders, change_addresses);
        let mut signers: Signers = Vec::new();
        let mut base_tx = txs::Tx {
            network_id: self.network_id,
            blockchain_id: self.blockchain_id,
            ..txs::Tx::default()
        };
        if self.tx_fee > 0 {
            aad.add_asset_amount(self.avax_asset_id, 0, self.tx_fee);
            self.utxo_set.get_minimum_spendable(&mut aad, as_of, 0, 1)?;

            let mut outs = aad.change_outputs.clone();
            outs.sort();
            let ins: Vec<transferable::Input> = aad.inputs.iter().map(|(i, _)| i.clone()).collect();
            signers = aad.inputs.iter().map(|(_, s)| s.clone()).collect();
            self.check_goose_egg(&ins, &outs, &[])?;

            base_tx.transferable_outputs = if outs.is_empty() { None } else { Some(outs) };
            base_tx.transferable_inputs = if ins.is_empty() { None } else { Some(ins) };
        }

        let mut auth_indices = Vec::from(subnet_auth_indices);
        auth_indices.sort_unstable();

        let tx = platform_txs::add_subnet_validator::Tx {
            base_tx,
            validator: platform_txs::Validator {
                node_id,
                start_time,
                end_time,
                weight,
            },
            subnet_id,
            subnet_auth: key::secp256k1::txs::Input::new(auth_indices),
        };
        tx.verify()?;
        Ok((tx, signers))
    }

    /// Builds an import transaction consuming the atomic UTXOs exported by
    /// "source_chain_id"; the fee comes out of the imported AVAX first.
    #[allow(clippy::too_many_arguments)]
    pub fn import_tx(
        &self,
        source_chain_id: ids::Id,
        atomic_utxos: &[Utxo],
        to: &[short::Id],
        senders: &[short::Id],
        change_addresses: &[short::Id],
        as_of: u64,
    ) -> Result<(platform_txs::import::Tx, Signers)> {
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
            imported.push((
                transferable::Input {
                    utxo_id: u.utxo_id.clone(),
                    asset_id: u.asset_id,
                    input: transferable::TransferableIn::TransferInput(
                        key::secp256k1::txs::transfer::Input {
                            amount,
                            sig_indices: spenders.iter().map(|(i, _)| *i).collect(),
                        },
                    ),
                },
                spenders.iter().map(|(_, a)| *a).collect(),
            ));
            *imported_amounts.entry(u.asset_id).or_insert(0) += amount;
        }

        if imported.is_empty() {
            return Err(Error::InsufficientFunds {
                message: "no spendable atomic utxos to import".to_string(),
            });
        }
        transferable::sort_inputs_with_signers(&mut imported);

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
                            output_owners: key::secp256k1::txs::OutputOwners::new(0, 1, to),
                        },
                    ),
                });
            }
        }

        let mut aad = AssetAmountDestination::new(senders, to, change_addresses);
        if fee_remaining > 0 {
            aad.add_asset_amount(self.avax_asset_id, 0, fee_remaining);
            self.utxo_set.get_minimum_spendable(&mut aad, as_of, 0, 1)?;
        }

        outs.extend(aad.change_outputs.iter().cloned());
        outs.sort();
        let ins: Vec<transferable::Input> = aad.inputs.iter().map(|(i, _)| i.clone()).collect();
        let mut signers: Signers = aad.inputs.iter().map(|(_, s)| s.clone()).collect();

        let imported_ins: Vec<transferable::Input> =
            imported.iter().map(|(i, _)| i.clone()).collect();
        self.check_goose_egg(
            &[ins.clone(), imported_ins.clone()].concat(),
            &outs,
            &[],
        )?;
        // credentials cover the base inputs first, then the imported inputs
        signers.extend(imported.into_iter().map(|(_, s)| s));

        let tx = platform_txs::import::Tx {
            base_tx: txs::Tx {
                network_id: self.network_id,
                blockchain_id: self.blockchain_id,
                transferable_outputs: if outs.is_empty() { None } else { Some(outs) },
                transferable_inputs: if ins.is_empty() { None } else { Some(ins) },
                memo: None,
                ..txs::Tx::default()
            },
            source_chain_id: Some(source_chain_id),
            source_chain_transferable_inputs: Some(imported_ins),
        };
        Ok((tx, signers))
    }

    /// Builds an export transaction moving "amount" AVAX into the
    /// destination chain's atomic memory. The exported asset is always
    /// the fee asset.
    #[allow(clippy::too_many_arguments)]
    pub fn export_tx(
        &self,
        destination_chain_id: ids::Id,
        amount: u64,
        to: &[short::Id],
        senders: &[short::Id],
        change_addresses: &[short::Id],
        as_of: u64,
    ) -> Result<(platform_txs::export::Tx, Signers)> {
        if amount == 0 {
            return Err(Error::InvalidInput {
                message: "export amount must be positive".to_string(),
            });
        }

        let mut aad = AssetAmountDestination::new(senders, to, change_addresses);
        aad.add_asset_amount(self.avax_asset_id, amount, self.tx_fee);
        self.utxo_set.get_minimum_spendable(&mut aad, as_of, 0, 1)?;

        let mut exported = aad.outputs.clone();
        exported.sort();
        let mut local_outs = aad.change_outputs.clone();
        local_outs.sort();

        let ins: Vec<transferable::Input> = aad.inputs.iter().map(|(i, _)| i.clone()).collect();
        let signers: Signers = aad.inputs.iter().map(|(_, s)| s.clone()).collect();
        self.check_goose_egg(&ins, &local_outs, &exported)?;

        let tx = platform_txs::export::Tx {
            base_tx: txs::Tx {
                network_id: self.network_id,
                blockchain_id: self.blockchain_id,
                transferable_outputs: if local_outs.is_empty() {
                    None
                } else {
                    Some(local_outs)
                },
                transferable_inputs: if ins.is_empty() { None } else { Some(ins) },
                memo: None,
                ..txs::Tx::default()
            },
            destination_chain_id: Some(destination_chain_id),
            destination_chain_transferable_outputs: Some(exported),
        };
        Ok((tx, signers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::secp256k1::txs::OutputOwners;
    use crate::txs::{transferable::TransferableOut, utxo};

    fn avax() -> ids::Id {
        ids::Id::from_slice(&[0xa0])
    }

    fn amount_utxo(tx_byte: u8, amount: u64, owner: short::Id) -> Utxo {
        Utxo {
            utxo_id: utxo::Id::new(&[tx_byte; 32], 0).unwrap(),
            asset_id: avax(),
            out: TransferableOut::TransferOutput(key::secp256k1::txs::transfer::Output {
                amount,
                output_owners: OutputOwners::new(0, 1, &[owner]),
            }),
        }
    }

    /// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- platformvm::builder::tests::test_shares_from_percent --exact --show-output
    #[test]
    fn test_shares_from_percent() {
        assert_eq!(shares_from_percent(2.0).unwrap(), 20_000);
        assert_eq!(shares_from_percent(0.0).unwrap(), 0);
        assert_eq!(shares_from_percent(100.0).unwrap(), 1_000_000);
        assert!(shares_from_percent(100.0001).is_err());
        assert!(shares_from_percent(-0.5).is_err());
    }

    /// Validator build, the window and stake validations, and that the
    /// stake outputs sum to exactly the stake amount.
    /// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- platformvm::builder::tests::test_add_validator --exact --show-output
    #[test]
    fn test_add_validator() {
        let sender = short::Id::from_slice(&[0x01]);
        let reward = short::Id::from_slice(&[0x02]);
        let node = node::Id::from_slice(&[0x03]);

        let mut set = UtxoSet::new();
        set.add(
            amount_utxo(0x01, constants::MIN_VALIDATOR_STAKE + units::AVAX, sender),
            false,
        );

        let builder = Builder::new(5, ids::Id::from_slice(&[0x10]), avax(), 0, 0, &set);

        let now = 1_000_000;
        let start = now + 60;
        let end = start + 14 * 24 * 60 * 60;

        // starting in the past is invalid
        match builder.add_validator_tx(
            node,
            now - 1,
            end,
            constants::MIN_VALIDATOR_STAKE,
            &[reward],
            20_000,
            &[sender],
            &[],
            now,
        ) {
            Err(Error::InvalidInput { .. }) => {}
            other => panic!("expected invalid input, got {:?}", other),
        }

        // understaked is invalid
        match builder.add_validator_tx(
            node,
            start,
            end,
            constants::MIN_VALIDATOR_STAKE - 1,
            &[reward],
            20_000,
            &[sender],
            &[],
            now,
        ) {
            Err(Error::InvalidInput { .. }) => {}
            other => panic!("expected invalid input, got {:?}", other),
        }

        let (tx, signers) = builder
            .add_validator_tx(
                node,
                start,
                end,
                constants::MIN_VALIDATOR_STAKE,
                &[reward],
                20_000,
                &[sender],
                &[],
                now,
            )
            .unwrap();

        assert_eq!(tx.validator.weight, constants::MIN_VALIDATOR_STAKE);
        let staked: u64 = tx
            .stake_outs
            .as_ref()
            .unwrap()
            .iter()
            .filter_map(|o| o.out.amount())
            .sum();
        assert_eq!(staked, constants::MIN_VALIDATOR_STAKE);
        assert_eq!(tx.rewards_owner.addresses, vec![reward]);
        assert_eq!(signers.len(), 1);

        // 1 AVAX of change stays liquid
        let change: u64 = tx
            .base_tx
            .transferable_outputs
            .as_ref()
            .unwrap()
            .iter()
            .filter_map(|o| o.out.amount())
            .sum();
        assert_eq!(change, units::AVAX);
    }

    /// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- platformvm::builder::tests::test_add_delegator_and_subnet --exact --show-output
    #[test]
    fn test_add_delegator_and_subnet() {
        let sender = short::Id::from_slice(&[0x01]);
        let reward = short::Id::from_slice(&[0x02]);
        let node = node::Id::from_slice(&[0x03]);

        let mut set = UtxoSet::new();
        set.add(
            amount_utxo(0x01, constants::MIN_DELEGATOR_STAKE + units::AVAX, sender),
            false,
        );

        let builder = Builder::new(5, ids::Id::from_slice(&[0x10]), avax(), units::MILLI_AVAX, 0, &set);

        let now = 1_000_000;
        let start = now + 60;
        let end = start + 14 * 24 * 60 * 60;

        let (tx, _) = builder
            .add_delegator_tx(
                node,
                start,
                end,
                constants::MIN_DELEGATOR_STAKE,
                &[reward],
                &[sender],
                &[],
                now,
            )
            .unwrap();
        let staked: u64 = tx
            .stake_outs
            .as_ref()
            .unwrap()
            .iter()
            .filter_map(|o| o.out.amount())
            .sum();
        assert_eq!(staked, constants::MIN_DELEGATOR_STAKE);

        let subnet = ids::Id::from_slice(&[0x55]);
        let (tx, signers) = builder
            .add_subnet_validator_tx(
                node,
                start,
                end,
                7,
                subnet,
                &[1, 0],
                &[sender],
                &[],
                now,
            )
            .unwrap();
        assert_eq!(tx.validator.weight, 7);
        assert_eq!(tx.subnet_id, subnet);
        // auth indices were sorted
        assert_eq!(tx.subnet_auth.sig_indices, vec![0, 1]);
        assert_eq!(signers.len(), 1); // the fee input
    }

    /// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- platformvm::builder::tests::test_p_import_export --exact --show-output
    #[test]
    fn test_p_import_export() {
        let sender = short::Id::from_slice(&[0x01]);
        let dest = short::Id::from_slice(&[0x02]);
        let x_chain = ids::Id::from_slice(&[0x66]);

        let mut set = UtxoSet::new();
        set.add(amount_utxo(0x01, 100, sender), false);

        let builder = Builder::new(5, ids::Id::from_slice(&[0x10]), avax(), 10, 0, &set);

        let (tx, signers) = builder
            .export_tx(x_chain, 90, &[dest], &[sender], &[], 1)
            .unwrap();
        let exported = tx.destination_chain_transferable_outputs.clone().unwrap();
        assert_eq!(exported[0].out.amount(), Some(90));
        assert!(tx.base_tx.transferable_outputs.is_none());
        assert_eq!(signers.len(), 1);

        let atomic = vec![amount_utxo(0x07, 50, sender)];
        let (tx, signers) = builder
            .import_tx(x_chain, &atomic, &[dest], &[sender], &[], 1)
            .unwrap();
        let imported = tx.source_chain_transferable_inputs.clone().unwrap();
        assert_eq!(imported.len(), 1);
        let outs = tx.base_tx.transferable_outputs.clone().unwrap();
        assert_eq!(outs[0].out.amount(), Some(40));
        assert_eq!(signers.len(), 1);
    }
}
