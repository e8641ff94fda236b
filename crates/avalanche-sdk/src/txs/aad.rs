//! Asset-amount destination: the in-progress coin-selection state.
use std::collections::HashMap;

use crate::{
    errors::Error,
    ids::{self, short},
    txs::transferable,
};

/// Per-asset spend/burn targets and their running totals.
#[derive(Debug, Clone, Default)]
pub struct AssetAmount {
    pub asset_id: ids::Id,

    /// Units that must reach the destinations.
    pub amount: u64,
    /// Units consumed as fees.
    pub burn: u64,

    /// Units applied to the "amount" target so far.
    pub spent: u64,
    /// Units applied to the "burn" target so far.
    pub burned: u64,
    /// True once the "amount" target is fully funded.
    pub stake_satisfied: bool,
}

impl AssetAmount {
    pub fn new(asset_id: ids::Id, amount: u64, burn: u64) -> Self {
        Self {
            asset_id,
            amount,
            burn,
            ..Self::default()
        }
    }

    /// Applies the value to the amount target first; overflow goes to the
    /// burn target. Returns the value actually consumed.
    pub fn spend(&mut self, value: u64) -> u64 {
        let mut consumed = 0_u64;

        if self.spent < self.amount {
            let to_amount = std::cmp::min(value, self.amount - self.spent);
            self.spent += to_amount;
            consumed += to_amount;
        }
        if self.spent >= self.amount {
            self.stake_satisfied = true;
        }

        let remaining = value - consumed;
        if remaining > 0 && self.burned < self.burn {
            let to_burn = std::cmp::min(remaining, self.burn - self.burned);
            self.burned += to_burn;
            consumed += to_burn;
        }

        // anything beyond both targets is tracked as change surplus
        self.spent += value - consumed;
        consumed
    }

    /// True iff both targets are funded.
    pub fn finished(&self) -> bool {
        self.spent >= self.amount && self.burned >= self.burn
    }

    /// Surplus over the amount target, to be returned as change.
    pub fn change(&self) -> u64 {
        self.spent.saturating_sub(self.amount)
    }
}

/// Addresses and accumulators threaded through "get_minimum_spendable".
/// "senders" prove spendability on inputs, "destinations" receive the paid
/// outputs, "change_addresses" receive the rest.
#[derive(Debug, Clone, Default)]
pub struct AssetAmountDestination {
    pub senders: Vec<short::Id>,
    pub destinations: Vec<short::Id>,
    pub change_addresses: Vec<short::Id>,

    amounts: HashMap<ids::Id, AssetAmount>,
    /// Insertion order of the asset keys, for deterministic iteration.
    asset_order: Vec<ids::Id>,

    /// Selected inputs, each with the signer addresses (in sig-index order)
    /// that will later resolve to keys.
    pub inputs: Vec<(transferable::Input, Vec<short::Id>)>,
    /// Outputs paid to the destinations.
    pub outputs: Vec<transferable::Output>,
    /// Outputs returned to the change addresses.
    pub change_outputs: Vec<transferable::Output>,
}

impl AssetAmountDestination {
    pub fn new(
        senders: &[short::Id],
        destinations: &[short::Id],
        change_addresses: &[short::Id],
    ) -> Self {
        Self {
            senders: Vec::from(senders),
            destinations: Vec::from(destinations),
            change_addresses: if change_addresses.is_empty() {
                // spend back to the senders when no change address is given
                Vec::from(senders)
            } else {
                Vec::from(change_addresses)
            },
            ..Self::default()
        }
    }

    /// Registers a spend/burn target for the asset. Merges into the
    /// existing entry if the asset is already tracked, so a fee in the
    /// transferred asset folds into a single accumulator.
    pub fn add_asset_amount(&mut self, asset_id: ids::Id, amount: u64, burn: u64) {
        if let Some(existing) = self.amounts.get_mut(&asset_id) {
            existing.amount += amount;
            existing.burn += burn;
            return;
        }
        self.amounts
            .insert(asset_id, AssetAmount::new(asset_id, amount, burn));
        self.asset_order.push(asset_id);
    }

    pub fn get_amount(&self, asset_id: &ids::Id) -> Option<&AssetAmount> {
        self.amounts.get(asset_id)
    }

    pub fn get_amount_mut(&mut self, asset_id: &ids::Id) -> Option<&mut AssetAmount> {
        self.amounts.get_mut(asset_id)
    }

    /// Asset keys in insertion order.
    pub fn asset_ids(&self) -> &[ids::Id] {
        &self.asset_order
    }

    /// True iff every tracked asset funded both its targets.
    pub fn can_complete(&self) -> bool {
        self.amounts.values().all(|a| a.finished())
    }

    /// True iff every target is zero (nothing to move, nothing to burn).
    pub fn is_empty_targets(&self) -> bool {
        self.amounts.values().all(|a| a.amount == 0 && a.burn == 0)
    }

    /// The assets whose targets are not yet funded, for error reporting.
    pub fn unfunded_assets(&self) -> Vec<ids::Id> {
        let mut unfunded: Vec<ids::Id> = self
            .asset_order
            .iter()
            .filter(|id| !self.amounts[id].finished())
            .copied()
            .collect();
        unfunded.sort();
        unfunded
    }

    /// Surfaces the incomplete state as the canonical error.
    pub fn insufficient_funds_error(&self) -> Error {
        let unfunded = self.unfunded_assets();
        let descriptions: Vec<String> = unfunded
            .iter()
            .map(|id| {
                let a = &self.amounts[id];
                format!(
                    "{id} (amount {}/{}, burn {}/{})",
                    a.spent.min(a.amount),
                    a.amount,
                    a.burned,
                    a.burn
                )
            })
            .collect();
        Error::InsufficientFunds {
            message: format!("could not fund assets: {}", descriptions.join(", ")),
        }
    }
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- txs::aad::test_asset_amount_spend --exact --show-output
#[test]
fn test_asset_amount_spend() {
    let asset = ids::Id::from_slice(&[0x01]);
    let mut a = AssetAmount::new(asset, 1000, 100);
    assert!(!a.finished());

    // amount target drains first
    a.spend(600);
    assert_eq!(a.spent, 600);
    assert_eq!(a.burned, 0);
    assert!(!a.finished());
    assert!(!a.stake_satisfied);

    // overflow rolls into the burn target, then change
    a.spend(600);
    assert_eq!(a.burned, 100);
    assert!(a.stake_satisfied);
    assert!(a.finished());
    assert_eq!(a.change(), 100);
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- txs::aad::test_aad_targets --exact --show-output
#[test]
fn test_aad_targets() {
    let sender = short::Id::from_slice(&[0x01]);
    let dest = short::Id::from_slice(&[0x02]);

    let asset_a = ids::Id::from_slice(&[0xaa]);
    let asset_b = ids::Id::from_slice(&[0xbb]);

    // no change address given: change goes back to the senders
    let mut aad = AssetAmountDestination::new(&[sender], &[dest], &[]);
    assert_eq!(aad.change_addresses, vec![sender]);

    // fee asset == transferred asset merges into one entry
    aad.add_asset_amount(asset_a, 1000, 0);
    aad.add_asset_amount(asset_a, 0, 100);
    assert_eq!(aad.asset_ids().len(), 1);
    let a = aad.get_amount(&asset_a).unwrap();
    assert_eq!((a.amount, a.burn), (1000, 100));

    // distinct fee asset stays a separate entry
    aad.add_asset_amount(asset_b, 0, 5);
    assert_eq!(aad.asset_ids().len(), 2);

    assert!(!aad.can_complete());
    assert!(!aad.is_empty_targets());
    assert_eq!(aad.unfunded_assets().len(), 2);

    aad.get_amount_mut(&asset_a).unwrap().spend(1100);
    aad.get_amount_mut(&asset_b).unwrap().spend(5);
    assert!(aad.can_complete());

    let zero = AssetAmountDestination::new(&[sender], &[dest], &[]);
    assert!(zero.is_empty_targets());
}
