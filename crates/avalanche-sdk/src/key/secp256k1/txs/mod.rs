//! secp256k1 fx owner, input, and credential types.
pub mod mint;
pub mod transfer;

use std::cmp::Ordering;

use crate::{
    codec,
    errors::{Error, Result},
    ids::short,
    packer::Packer,
};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/secp256k1fx#Credential>
#[serde_as]
#[derive(Debug, Serialize, Deserialize, Eq, Clone, Default)]
pub struct Credential {
    /// Signatures, each must be length of 65.
    /// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/utils/crypto#SECP256K1RSigLen>
    #[serde_as(as = "Vec<serde_with::hex::Hex>")]
    pub signatures: Vec<Vec<u8>>,
}

impl Credential {
    pub fn new(sigs: Vec<Vec<u8>>) -> Self {
        Self { signatures: sigs }
    }

    pub fn type_name() -> String {
        "secp256k1fx.Credential".to_string()
    }

    pub fn type_id() -> u32 {
        *(codec::X_TYPES.get(&Self::type_name()).unwrap()) as u32
    }

    /// Packs the signature list (without the type ID prefix).
    pub fn pack(&self, packer: &Packer) -> Result<()> {
        packer.pack_u32(self.signatures.len() as u32)?;
        for sig in self.signatures.iter() {
            packer.pack_bytes(sig)?;
        }
        Ok(())
    }
}

impl Ord for Credential {
    fn cmp(&self, other: &Credential) -> Ordering {
        Signatures::new(&self.signatures).cmp(&Signatures::new(&other.signatures))
    }
}

impl PartialOrd for Credential {
    fn partial_cmp(&self, other: &Credential) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Credential {
    fn eq(&self, other: &Credential) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

#[derive(Eq)]
pub struct Signatures(Vec<Vec<u8>>);

impl Signatures {
    pub fn new(sigs: &[Vec<u8>]) -> Self {
        Signatures(Vec::from(sigs))
    }
}

impl Ord for Signatures {
    fn cmp(&self, other: &Signatures) -> Ordering {
        // packer encodes the array length first
        // so if the lengths differ, the ordering is decided
        let l1 = self.0.len();
        let l2 = other.0.len();
        l1.cmp(&l2) // returns when lengths are not Equal
            .then_with(
                || self.0.cmp(&other.0), // if lengths are Equal, compare the signatures
            )
    }
}

impl PartialOrd for Signatures {
    fn partial_cmp(&self, other: &Signatures) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Signatures {
    fn eq(&self, other: &Signatures) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

#[derive(Eq)]
pub struct SigIndices(Vec<u32>);

impl SigIndices {
    pub fn new(ids: &[u32]) -> Self {
        SigIndices(Vec::from(ids))
    }
}

impl Ord for SigIndices {
    fn cmp(&self, other: &SigIndices) -> Ordering {
        // packer encodes the array length first
        // so if the lengths differ, the ordering is decided
        let l1 = self.0.len();
        let l2 = other.0.len();
        l1.cmp(&l2) // returns when lengths are not Equal
            .then_with(
                || self.0.cmp(&other.0), // if lengths are Equal, compare the ids
            )
    }
}

impl PartialOrd for SigIndices {
    fn partial_cmp(&self, other: &SigIndices) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SigIndices {
    fn eq(&self, other: &SigIndices) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

/// The owner set of a spendable output: funds are locked until "locktime",
/// then any "threshold" of "addresses" may spend.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/secp256k1fx#OutputOwners>
#[derive(Debug, Serialize, Deserialize, Eq, Clone, Default)]
pub struct OutputOwners {
    pub locktime: u64,
    pub threshold: u32,
    pub addresses: Vec<short::Id>,
}

impl OutputOwners {
    /// Creates a new owner set, sorting the addresses into the canonical
    /// raw-byte-ascending order.
    pub fn new(locktime: u64, threshold: u32, addrs: &[short::Id]) -> Self {
        let mut addresses = Vec::from(addrs);
        addresses.sort();
        Self {
            locktime,
            threshold,
            addresses,
        }
    }

    pub fn type_name() -> String {
        "secp256k1fx.OutputOwners".to_string()
    }

    pub fn type_id() -> u32 {
        *(codec::P_TYPES.get(&Self::type_name()).unwrap()) as u32
    }

    /// ref. "vms/secp256k1fx.OutputOwners.Verify"
    pub fn verify(&self) -> Result<()> {
        if (self.threshold as usize) > self.addresses.len() {
            // ref. "errOutputUnspendable"
            return Err(Error::InvalidInput {
                message: format!(
                    "threshold {} exceeds number of addresses {}",
                    self.threshold,
                    self.addresses.len()
                ),
            });
        }
        if !cmp_manager::is_sorted_and_unique(&self.addresses) {
            // ref. "errAddrsNotSortedUnique"
            return Err(Error::InvalidInput {
                message: "addresses not sorted and unique".to_string(),
            });
        }
        Ok(())
    }

    /// Returns the spenders among the candidates, each with its position in
    /// the owner address list. Walks owners in stored order so the resulting
    /// indices are ascending; stops once "threshold" matches are collected.
    /// Returns empty when the output is still locked at "as_of".
    pub fn get_spenders(&self, candidates: &[short::Id], as_of: u64) -> Vec<(u32, short::Id)> {
        if as_of <= self.locktime {
            // still locked
            return Vec::new();
        }

        let mut spenders: Vec<(u32, short::Id)> = Vec::new();
        for (pos, addr) in self.addresses.iter().enumerate() {
            if !candidates.contains(addr) {
                continue;
            }
            spenders.push((pos as u32, *addr));
            if (spenders.len() as u32) == self.threshold {
                break;
            }
        }
        spenders
    }

    /// Returns true iff the candidates can meet the signature threshold at "as_of".
    pub fn meets_threshold(&self, candidates: &[short::Id], as_of: u64) -> bool {
        (self.get_spenders(candidates, as_of).len() as u32) >= self.threshold
    }

    /// Packs `locktime(8) ‖ threshold(4) ‖ n(4) ‖ addrs`.
    pub fn pack(&self, packer: &Packer) -> Result<()> {
        packer.pack_u64(self.locktime)?;
        packer.pack_u32(self.threshold)?;
        packer.pack_u32(self.addresses.len() as u32)?;
        for addr in self.addresses.iter() {
            packer.pack_bytes(addr.as_ref())?;
        }
        Ok(())
    }

    /// Unpacks the owner set; the wire form must already be sorted.
    pub fn unpack(packer: &Packer) -> Result<Self> {
        let locktime = packer.unpack_u64()?;
        let threshold = packer.unpack_u32()?;
        let addr_len = packer.unpack_u32()?;
        let mut addresses: Vec<short::Id> = Vec::with_capacity(addr_len as usize);
        for _ in 0..addr_len {
            let b = packer.unpack_bytes(short::LEN)?;
            addresses.push(short::Id::from_slice(&b));
        }
        Ok(Self {
            locktime,
            threshold,
            addresses,
        })
    }
}

impl Ord for OutputOwners {
    fn cmp(&self, other: &OutputOwners) -> Ordering {
        self.locktime
            .cmp(&(other.locktime)) // returns when "locktime"s are not Equal
            .then_with(
                || self.threshold.cmp(&other.threshold), // if "locktime"s are Equal, compare "threshold"
            )
            .then_with(
                || short::Ids::new(&self.addresses).cmp(&short::Ids::new(&other.addresses)), // if "locktime"s and "threshold"s are Equal, compare "addrs"
            )
    }
}

impl PartialOrd for OutputOwners {
    fn partial_cmp(&self, other: &OutputOwners) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OutputOwners {
    fn eq(&self, other: &OutputOwners) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

/// A bare signature-index input (no amount); used as P-chain subnet auth
/// and as the proof-of-ownership input inside mint operations.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/secp256k1fx#Input>
#[derive(Debug, Serialize, Deserialize, Eq, Clone, Default)]
pub struct Input {
    #[serde(rename = "signatureIndices")]
    pub sig_indices: Vec<u32>,
}

impl Input {
    pub fn new(sig_indices: Vec<u32>) -> Self {
        Self { sig_indices }
    }

    pub fn type_name() -> String {
        "secp256k1fx.Input".to_string()
    }

    pub fn type_id() -> u32 {
        *(codec::P_TYPES.get(&Self::type_name()).unwrap()) as u32
    }

    pub fn verify(&self) -> Result<()> {
        if !cmp_manager::is_sorted_and_unique(&self.sig_indices) {
            // ref. "errNotSortedUnique"
            return Err(Error::InvalidInput {
                message: "signatures not sorted and unique".to_string(),
            });
        }
        Ok(())
    }

    pub fn pack(&self, packer: &Packer) -> Result<()> {
        packer.pack_u32(self.sig_indices.len() as u32)?;
        for idx in self.sig_indices.iter() {
            packer.pack_u32(*idx)?;
        }
        Ok(())
    }

    pub fn unpack(packer: &Packer) -> Result<Self> {
        let n = packer.unpack_u32()?;
        let mut sig_indices: Vec<u32> = Vec::with_capacity(n as usize);
        for _ in 0..n {
            sig_indices.push(packer.unpack_u32()?);
        }
        Ok(Self { sig_indices })
    }
}

impl Ord for Input {
    fn cmp(&self, other: &Input) -> Ordering {
        SigIndices::new(&self.sig_indices).cmp(&SigIndices::new(&other.sig_indices))
    }
}

impl PartialOrd for Input {
    fn partial_cmp(&self, other: &Input) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Input {
    fn eq(&self, other: &Input) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- key::secp256k1::txs::test_get_spenders --exact --show-output
#[test]
fn test_get_spenders() {
    let x = short::Id::from_slice(&[0x01]);
    let y = short::Id::from_slice(&[0x02]);

    let owners = OutputOwners::new(0, 1, &[x, y]);
    owners.verify().unwrap();

    // spendable by either owner once past the locktime
    assert!(owners.meets_threshold(&[y], 1));
    assert!(!owners.meets_threshold(&[], 1));

    // locked when "as_of <= locktime"
    assert!(!owners.meets_threshold(&[y], 0));

    // spender indices follow the owner-list order
    let spenders = owners.get_spenders(&[y, x], 1);
    assert_eq!(spenders.len(), 1); // threshold is 1
    assert_eq!(spenders[0], (0, x));

    let owners = OutputOwners::new(0, 2, &[x, y]);
    let spenders = owners.get_spenders(&[y, x], 1);
    assert_eq!(spenders, vec![(0, x), (1, y)]);

    // duplicate candidates contribute at most one match each
    let spenders = owners.get_spenders(&[y, y], 1);
    assert_eq!(spenders, vec![(1, y)]);
    assert!(!owners.meets_threshold(&[y, y], 1));
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- key::secp256k1::txs::test_owners_verify --exact --show-output
#[test]
fn test_owners_verify() {
    let x = short::Id::from_slice(&[0x01]);
    let y = short::Id::from_slice(&[0x02]);

    // "new" sorts for the caller
    let owners = OutputOwners::new(0, 1, &[y, x]);
    assert_eq!(owners.addresses, vec![x, y]);
    owners.verify().unwrap();

    // threshold above the address count is unspendable
    let owners = OutputOwners::new(0, 3, &[x, y]);
    assert!(owners.verify().is_err());

    // hand-built unsorted owners fail verification
    let owners = OutputOwners {
        locktime: 0,
        threshold: 1,
        addresses: vec![y, x],
    };
    assert!(owners.verify().is_err());
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- key::secp256k1::txs::test_owners_pack_round_trip --exact --show-output
#[test]
fn test_owners_pack_round_trip() {
    let owners = OutputOwners::new(
        7,
        1,
        &[short::Id::from_slice(&[0x01]), short::Id::from_slice(&[0x02])],
    );

    let packer = Packer::new_for_tx();
    owners.pack(&packer).unwrap();
    let b = packer.take_bytes();

    let expected: Vec<u8> = vec![
        // locktime
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x07, //
        // threshold
        0x00, 0x00, 0x00, 0x01, //
        // addrs.len()
        0x00, 0x00, 0x00, 0x02, //
        // addrs[0]
        0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
        // addrs[1]
        0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
    ];
    assert!(cmp_manager::eq_vectors(&expected, &b));

    let packer = Packer::load_bytes_for_unpack(1024, &b);
    let decoded = OutputOwners::unpack(&packer).unwrap();
    assert_eq!(owners, decoded);
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- key::secp256k1::txs::test_sort_output_owners --exact --show-output
#[test]
fn test_sort_output_owners() {
    let mut owners: Vec<OutputOwners> = Vec::new();
    for i in (0..10).rev() {
        owners.push(OutputOwners {
            locktime: i as u64,
            threshold: i as u32,
            addresses: vec![
                short::Id::from_slice(&[i as u8, 1, 2, 3]),
                short::Id::from_slice(&[i as u8, 2, 2, 3]),
            ],
        });
        owners.push(OutputOwners {
            locktime: i as u64,
            threshold: i as u32,
            addresses: vec![short::Id::from_slice(&[i as u8, 1, 2, 3])],
        });
    }
    assert!(!cmp_manager::is_sorted_and_unique(&owners));
    owners.sort();

    let mut sorted_owners: Vec<OutputOwners> = Vec::new();
    for i in 0..10 {
        sorted_owners.push(OutputOwners {
            locktime: i as u64,
            threshold: i as u32,
            addresses: vec![short::Id::from_slice(&[i as u8, 1, 2, 3])],
        });
        sorted_owners.push(OutputOwners {
            locktime: i as u64,
            threshold: i as u32,
            addresses: vec![
                short::Id::from_slice(&[i as u8, 1, 2, 3]),
                short::Id::from_slice(&[i as u8, 2, 2, 3]),
            ],
        });
    }
    assert!(cmp_manager::is_sorted_and_unique(&sorted_owners));
    assert_eq!(owners, sorted_owners);
}
