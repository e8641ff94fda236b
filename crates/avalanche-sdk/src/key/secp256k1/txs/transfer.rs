//! Amount-bearing secp256k1 transfer output and input.
use std::cmp::Ordering;

use crate::{
    codec,
    errors::{Error, Result},
    key,
    packer::Packer,
};
use serde::{Deserialize, Serialize};

/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/secp256k1fx#TransferOutput>
#[derive(Debug, Serialize, Deserialize, Eq, Clone, Default)]
pub struct Output {
    pub amount: u64,

    /// The custom de/serializer embeds "output_owners" at the same level as "amount".
    #[serde(flatten)]
    pub output_owners: key::secp256k1::txs::OutputOwners,
}

impl Output {
    pub fn new(amount: u64, output_owners: key::secp256k1::txs::OutputOwners) -> Self {
        Self {
            amount,
            output_owners,
        }
    }

    pub fn type_name() -> String {
        "secp256k1fx.TransferOutput".to_string()
    }

    pub fn type_id() -> u32 {
        *(codec::X_TYPES.get(&Self::type_name()).unwrap()) as u32
    }

    pub fn verify(&self) -> Result<()> {
        if self.amount == 0 {
            // ref. "errNoValueOutput"
            return Err(Error::InvalidInput {
                message: "output has no value".to_string(),
            });
        }
        self.output_owners.verify()
    }

    /// Packs `amount(8) ‖ output_owners` (without the type ID prefix).
    pub fn pack(&self, packer: &Packer) -> Result<()> {
        packer.pack_u64(self.amount)?;
        self.output_owners.pack(packer)
    }

    pub fn unpack(packer: &Packer) -> Result<Self> {
        let amount = packer.unpack_u64()?;
        let output_owners = key::secp256k1::txs::OutputOwners::unpack(packer)?;
        Ok(Self {
            amount,
            output_owners,
        })
    }
}

impl Ord for Output {
    fn cmp(&self, other: &Output) -> Ordering {
        self.amount
            .cmp(&(other.amount)) // returns when "amount"s are not Equal
            .then_with(
                || self.output_owners.cmp(&(other.output_owners)), // if "amount"s are Equal, compare "output_owners"
            )
    }
}

impl PartialOrd for Output {
    fn partial_cmp(&self, other: &Output) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Output {
    fn eq(&self, other: &Output) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/secp256k1fx#TransferInput>
#[derive(Debug, Serialize, Deserialize, Eq, Clone, Default)]
pub struct Input {
    pub amount: u64,
    #[serde(rename = "signatureIndices")]
    pub sig_indices: Vec<u32>,
}

impl Input {
    pub fn new(amount: u64, sig_indices: Vec<u32>) -> Self {
        Self {
            amount,
            sig_indices,
        }
    }

    pub fn type_name() -> String {
        "secp256k1fx.TransferInput".to_string()
    }

    pub fn type_id() -> u32 {
        *(codec::X_TYPES.get(&Self::type_name()).unwrap()) as u32
    }

    pub fn verify(&self) -> Result<()> {
        if self.amount == 0 {
            // ref. "errNoValueInput"
            return Err(Error::InvalidInput {
                message: "input has no value".to_string(),
            });
        }
        if !cmp_manager::is_sorted_and_unique(&self.sig_indices) {
            // ref. "errNotSortedUnique"
            return Err(Error::InvalidInput {
                message: "signatures not sorted and unique".to_string(),
            });
        }
        Ok(())
    }

    /// Packs `amount(8) ‖ nsigs(4) ‖ sig_indices` (without the type ID prefix).
    pub fn pack(&self, packer: &Packer) -> Result<()> {
        packer.pack_u64(self.amount)?;
        packer.pack_u32(self.sig_indices.len() as u32)?;
        for idx in self.sig_indices.iter() {
            packer.pack_u32(*idx)?;
        }
        Ok(())
    }

    pub fn unpack(packer: &Packer) -> Result<Self> {
        let amount = packer.unpack_u64()?;
        let n = packer.unpack_u32()?;
        let mut sig_indices: Vec<u32> = Vec::with_capacity(n as usize);
        for _ in 0..n {
            sig_indices.push(packer.unpack_u32()?);
        }
        Ok(Self {
            amount,
            sig_indices,
        })
    }
}

impl Ord for Input {
    fn cmp(&self, other: &Input) -> Ordering {
        self.amount
            .cmp(&(other.amount)) // returns when "amount"s are not Equal
            .then_with(
                || {
                    key::secp256k1::txs::SigIndices::new(&self.sig_indices)
                        .cmp(&key::secp256k1::txs::SigIndices::new(&other.sig_indices))
                }, // if "amount"s are Equal, compare "sig_indices"
            )
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

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- key::secp256k1::txs::transfer::test_transfer_round_trip --exact --show-output
#[test]
fn test_transfer_round_trip() {
    use crate::ids::short;

    let out = Output {
        amount: 12345,
        output_owners: key::secp256k1::txs::OutputOwners {
            locktime: 0,
            threshold: 1,
            addresses: vec![short::Id::from_slice(&[0x01])],
        },
    };
    out.verify().unwrap();

    let packer = Packer::new_for_tx();
    out.pack(&packer).unwrap();
    let b = packer.take_bytes();
    let packer = Packer::load_bytes_for_unpack(1024, &b);
    assert_eq!(Output::unpack(&packer).unwrap(), out);

    let input = Input {
        amount: 54321,
        sig_indices: vec![0, 2],
    };
    input.verify().unwrap();

    let packer = Packer::new_for_tx();
    input.pack(&packer).unwrap();
    let b = packer.take_bytes();
    let packer = Packer::load_bytes_for_unpack(1024, &b);
    assert_eq!(Input::unpack(&packer).unwrap(), input);

    // unsorted sig indices fail verification
    let input = Input {
        amount: 1,
        sig_indices: vec![2, 0],
    };
    assert!(input.verify().is_err());

    // zero-amount inputs fail verification
    let input = Input {
        amount: 0,
        sig_indices: vec![0],
    };
    assert!(input.verify().is_err());
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- key::secp256k1::txs::transfer::test_sort_transfer_inputs --exact --show-output
#[test]
fn test_sort_transfer_inputs() {
    let mut inputs: Vec<Input> = Vec::new();
    for i in (0..10).rev() {
        inputs.push(Input {
            amount: 5,
            sig_indices: vec![i as u32, 2, 2, 3, 4, 5, 6, 7, 8, 9],
        });
        inputs.push(Input {
            amount: 5,
            sig_indices: vec![i as u32, 1, 2, 3, 4, 5],
        });
    }
    assert!(!cmp_manager::is_sorted_and_unique(&inputs));
    inputs.sort();

    let mut sorted_inputs: Vec<Input> = Vec::new();
    for i in 0..10 {
        sorted_inputs.push(Input {
            amount: 5,
            sig_indices: vec![i as u32, 1, 2, 3, 4, 5],
        });
    }
    for i in 0..10 {
        sorted_inputs.push(Input {
            amount: 5,
            sig_indices: vec![i as u32, 2, 2, 3, 4, 5, 6, 7, 8, 9],
        });
    }
    assert!(cmp_manager::is_sorted_and_unique(&sorted_inputs));
    assert_eq!(inputs, sorted_inputs);
}
