//! A set of keys addressable by their short addresses.
use std::collections::HashMap;

use crate::{
    errors::{Error, Result},
    ids::short,
    key,
};

/// Support multiple keys as a chain.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/secp256k1fx#Keychain>
#[derive(Debug, Clone)]
pub struct Keychain<T: key::secp256k1::ReadOnly + key::secp256k1::SignOnly> {
    pub keys: Vec<T>,
    pub short_addr_to_key_index: HashMap<short::Id, u32>,
}

impl<T> Keychain<T>
where
    T: key::secp256k1::ReadOnly + key::secp256k1::SignOnly + Clone,
{
    pub fn new(keys: Vec<T>) -> Self {
        let mut short_addr_to_key_index = HashMap::new();
        for (pos, k) in keys.iter().enumerate() {
            short_addr_to_key_index.insert(k.short_address().unwrap(), pos as u32);
        }
        Self {
            keys,
            short_addr_to_key_index,
        }
    }

    /// Returns true if the keychain holds the key for the address.
    pub fn has_address(&self, short_addr: &short::Id) -> bool {
        self.short_addr_to_key_index.contains_key(short_addr)
    }

    /// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/secp256k1fx#Keychain.Get>
    pub fn get(&self, short_addr: &short::Id) -> Option<T> {
        self.short_addr_to_key_index
            .get(short_addr)
            .map(|k| self.keys[(*k) as usize].clone())
    }

    /// Returns the short addresses of all held keys, in key order.
    pub fn addresses(&self) -> Vec<short::Id> {
        self.keys
            .iter()
            .map(|k| k.short_address().unwrap())
            .collect()
    }

    /// Maps the per-input signer addresses (as recorded at selection time)
    /// to their keys. Surfaces a spender mismatch for any address the
    /// keychain does not hold; selection only reports addresses it proved
    /// spendable, so a miss here is a bug.
    pub fn keys_for_signers(&self, signers: &[Vec<short::Id>]) -> Result<Vec<Vec<T>>> {
        let mut keys: Vec<Vec<T>> = Vec::with_capacity(signers.len());
        for input_signers in signers.iter() {
            let mut input_keys: Vec<T> = Vec::with_capacity(input_signers.len());
            for addr in input_signers.iter() {
                match self.get(addr) {
                    Some(k) => input_keys.push(k),
                    None => {
                        return Err(Error::SpenderMismatch {
                            message: format!("keychain does not hold key for spender {addr}"),
                        })
                    }
                }
            }
            keys.push(input_keys);
        }
        Ok(keys)
    }

    /// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/secp256k1fx#Keychain.Match>
    pub fn match_threshold(
        &self,
        output_owners: &key::secp256k1::txs::OutputOwners,
        time: u64,
    ) -> Option<(Vec<u32>, Vec<T>)> {
        let spenders = output_owners.get_spenders(&self.addresses(), time);
        if (spenders.len() as u32) < output_owners.threshold {
            return None;
        }

        let mut sig_indices: Vec<u32> = Vec::new();
        let mut keys: Vec<T> = Vec::new();
        for (pos, addr) in spenders.iter() {
            let key = self.get(addr)?;
            sig_indices.push(*pos);
            keys.push(key);
        }
        Some((sig_indices, keys))
    }

    /// Returns "None" if the threshold is NOT met.
    /// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/secp256k1fx#Keychain.Spend>
    pub fn spend(
        &self,
        output: &key::secp256k1::txs::transfer::Output,
        time: u64,
    ) -> Option<(key::secp256k1::txs::transfer::Input, Vec<T>)> {
        let (sig_indices, keys) = self.match_threshold(&output.output_owners, time)?;
        Some((
            key::secp256k1::txs::transfer::Input {
                amount: output.amount,
                sig_indices,
            },
            keys,
        ))
    }
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- key::secp256k1::keychain::test_keychain_spend --exact --show-output
#[test]
fn test_keychain_spend() {
    use crate::key::secp256k1::private_key;

    let k1 = private_key::Key::generate().unwrap();
    let k2 = private_key::Key::generate().unwrap();
    let addr1 = k1.to_public_key().to_short_id().unwrap();
    let addr2 = k2.to_public_key().to_short_id().unwrap();

    let keychain = Keychain::new(vec![k1, k2]);
    assert!(keychain.has_address(&addr1));
    assert!(keychain.get(&addr2).is_some());
    assert!(!keychain.has_address(&short::Id::empty()));

    let owners = key::secp256k1::txs::OutputOwners::new(0, 2, &[addr1, addr2]);
    let out = key::secp256k1::txs::transfer::Output::new(1000, owners.clone());

    let (input, keys) = keychain.spend(&out, 5).unwrap();
    assert_eq!(input.amount, 1000);
    assert_eq!(input.sig_indices, vec![0, 1]);
    assert_eq!(keys.len(), 2);

    // still locked at "time <= locktime"
    assert!(keychain.spend(&out, 0).is_none());

    // threshold unmet without the second key
    let keychain_one = Keychain::new(vec![keychain.keys[0].clone()]);
    assert!(keychain_one.spend(&out, 5).is_none());

    // signer address resolution
    let keys = keychain.keys_for_signers(&[vec![addr1], vec![addr2, addr1]]).unwrap();
    assert_eq!(keys[0].len(), 1);
    assert_eq!(keys[1].len(), 2);
    match keychain.keys_for_signers(&[vec![short::Id::from_slice(&[0xff])]]) {
        Err(Error::SpenderMismatch { .. }) => {}
        other => panic!("expected spender mismatch, got {:?}", other),
    }
}
