//! Optional key-value persistence for UTXO caches.
use std::collections::HashMap;

use crate::{
    errors::{Error, Result},
    txs::utxo_set::{MergeRule, UtxoSet},
};
use serde::{Deserialize, Serialize};

/// The storage capability callers supply; any key-value store honoring
/// get/set/has works.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    /// Returns false when the key exists and "overwrite" is not set.
    fn set(&mut self, key: &str, value: Vec<u8>, overwrite: bool) -> Result<bool>;
    fn has(&self, key: &str) -> Result<bool>;
}

/// How a cached UTXO set is stored and refreshed.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct PersistenceOptions {
    /// The storage key.
    pub name: String,
    /// Whether a fresh save may replace an existing entry.
    pub overwrite: bool,
    /// How a newly fetched set merges into the cached one.
    pub merge_rule: MergeRule,
}

impl PersistenceOptions {
    pub fn new(name: &str, overwrite: bool, merge_rule: MergeRule) -> Self {
        Self {
            name: String::from(name),
            overwrite,
            merge_rule,
        }
    }
}

/// In-memory store, mostly for tests and short-lived processes.
#[derive(Debug, Clone, Default)]
pub struct MemStorage {
    entries: HashMap<String, Vec<u8>>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Vec<u8>, overwrite: bool) -> Result<bool> {
        if self.entries.contains_key(key) && !overwrite {
            return Ok(false);
        }
        self.entries.insert(String::from(key), value);
        Ok(true)
    }

    fn has(&self, key: &str) -> Result<bool> {
        Ok(self.entries.contains_key(key))
    }
}

/// Serializes the set as a JSON list of hex-with-checksum UTXO strings.
fn encode_utxo_set(set: &UtxoSet) -> Result<Vec<u8>> {
    let mut serialized: Vec<String> = Vec::with_capacity(set.len());
    for u in set.utxos() {
        serialized.push(u.to_hex()?);
    }
    serde_json::to_vec(&serialized).map_err(|e| Error::State {
        message: format!("failed to serialize utxo set '{e}'"),
    })
}

fn decode_utxo_set(d: &[u8]) -> Result<UtxoSet> {
    let serialized: Vec<String> = serde_json::from_slice(d).map_err(|e| Error::State {
        message: format!("failed to deserialize utxo set '{e}'"),
    })?;
    let mut set = UtxoSet::new();
    for s in serialized.iter() {
        set.add(UtxoSet::parse_utxo(s)?, true);
    }
    Ok(set)
}

/// Loads the cached set under "name", or an empty set when absent.
pub fn load_utxo_set(store: &dyn Storage, name: &str) -> Result<UtxoSet> {
    match store.get(name)? {
        Some(d) => decode_utxo_set(&d),
        None => Ok(UtxoSet::new()),
    }
}

/// Merges the fetched set into the cached one under the options' rule and
/// stores the result. Returns the merged set, or "None" when the store
/// refused the write (existing entry, "overwrite" unset).
pub fn save_utxo_set(
    store: &mut dyn Storage,
    opts: &PersistenceOptions,
    fetched: &UtxoSet,
) -> Result<Option<UtxoSet>> {
    let cached = load_utxo_set(store, &opts.name)?;
    let merged = cached.merge_by_rule(fetched, opts.merge_rule);
    if !store.set(&opts.name, encode_utxo_set(&merged)?, opts.overwrite)? {
        return Ok(None);
    }
    Ok(Some(merged))
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- storage::test_utxo_set_persistence --exact --show-output
#[test]
fn test_utxo_set_persistence() {
    use crate::{
        ids::{self, short},
        key,
        txs::{transferable::TransferableOut, utxo},
    };

    let owner = short::Id::from_slice(&[0x01]);
    let make_utxo = |tx_byte: u8, amount: u64| utxo::Utxo {
        utxo_id: utxo::Id::new(&[tx_byte; 32], 0).unwrap(),
        asset_id: ids::Id::from_slice(&[0xaa]),
        out: TransferableOut::TransferOutput(key::secp256k1::txs::transfer::Output {
            amount,
            output_owners: key::secp256k1::txs::OutputOwners::new(0, 1, &[owner]),
        }),
    };

    let mut store = MemStorage::new();
    let opts = PersistenceOptions::new("x-utxos", true, MergeRule::Union);

    let mut fetched = UtxoSet::new();
    fetched.add(make_utxo(0x01, 100), false);
    let merged = save_utxo_set(&mut store, &opts, &fetched).unwrap().unwrap();
    assert_eq!(merged.len(), 1);
    assert!(store.has("x-utxos").unwrap());

    // a refresh under "union" keeps the old entries
    let mut fetched = UtxoSet::new();
    fetched.add(make_utxo(0x02, 200), false);
    let merged = save_utxo_set(&mut store, &opts, &fetched).unwrap().unwrap();
    assert_eq!(merged.len(), 2);

    let loaded = load_utxo_set(&store, "x-utxos").unwrap();
    assert_eq!(loaded.len(), 2);

    // a non-overwriting save against an existing entry is refused
    let opts = PersistenceOptions::new("x-utxos", false, MergeRule::Union);
    assert!(save_utxo_set(&mut store, &opts, &UtxoSet::new())
        .unwrap()
        .is_none());
}
