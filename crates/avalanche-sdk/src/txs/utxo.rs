//! The unspent transaction output record.
use std::cmp::Ordering;

use crate::{
    codec,
    errors::{Error, Result},
    formatting, ids,
    packer::Packer,
    txs::transferable::TransferableOut,
};
use serde::{Deserialize, Serialize};

/// Identifies a UTXO by the transaction that created it and the index of
/// the output within that transaction.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/components/avax#UTXOID>
#[derive(Debug, Serialize, Deserialize, Eq, Clone, Default)]
pub struct Id {
    #[serde(rename = "txID")]
    pub tx_id: ids::Id,
    #[serde(rename = "outputIndex")]
    pub output_index: u32,

    /// The derived 32-byte id, "sha256(output_index ‖ tx_id)".
    #[serde(skip)]
    pub id: ids::Id,
}

impl Id {
    pub fn new(tx_id: &[u8], output_index: u32) -> Result<Self> {
        let tx_id = ids::Id::from_slice(tx_id);
        let prefixes: Vec<u64> = vec![output_index as u64];
        let id = tx_id.prefix(&prefixes)?;
        Ok(Self {
            tx_id,
            output_index,
            id,
        })
    }

    /// The canonical string form: cb58 of `tx_id ‖ output_index(4)`.
    pub fn to_cb58(&self) -> String {
        let mut b = self.tx_id.to_vec();
        b.extend_from_slice(&self.output_index.to_be_bytes());
        formatting::encode_cb58_with_checksum_string(&b)
    }

    /// Parses the cb58 string form of `tx_id ‖ output_index(4)`.
    pub fn from_cb58(s: &str) -> Result<Self> {
        let b = formatting::decode_cb58_with_checksum(s.trim())?;
        if b.len() != ids::LEN + 4 {
            return Err(Error::InvalidInput {
                message: format!("utxo id must decode to {} bytes, got {}", ids::LEN + 4, b.len()),
            });
        }
        let output_index = u32::from_be_bytes([
            b[ids::LEN],
            b[ids::LEN + 1],
            b[ids::LEN + 2],
            b[ids::LEN + 3],
        ]);
        Self::new(&b[..ids::LEN], output_index)
    }
}

impl Ord for Id {
    fn cmp(&self, other: &Id) -> Ordering {
        self.tx_id
            .cmp(&(other.tx_id)) // returns when "tx_id"s are not Equal
            .then_with(
                || self.output_index.cmp(&other.output_index), // if "tx_id"s are Equal, compare "output_index"
            )
    }
}

impl PartialOrd for Id {
    fn partial_cmp(&self, other: &Id) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Id {
    fn eq(&self, other: &Id) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/components/avax#SortUTXOIDs>
/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- txs::utxo::test_sort_utxo_ids --exact --show-output
#[test]
fn test_sort_utxo_ids() {
    let mut utxo_ids: Vec<Id> = Vec::new();
    for i in (0..10).rev() {
        utxo_ids.push(Id {
            tx_id: ids::Id::from_slice(&[i as u8, 1, 2, 3, 4, 5, 6, 7, 8, 9]),
            output_index: (i + 1) as u32,
            ..Id::default()
        });
        utxo_ids.push(Id {
            tx_id: ids::Id::from_slice(&[i as u8, 1, 2, 3, 4, 5, 6, 7, 8, 9]),
            output_index: i as u32,
            ..Id::default()
        });
    }
    assert!(!cmp_manager::is_sorted_and_unique(&utxo_ids));
    utxo_ids.sort();

    let mut sorted_utxo_ids: Vec<Id> = Vec::new();
    for i in 0..10 {
        sorted_utxo_ids.push(Id {
            tx_id: ids::Id::from_slice(&[i as u8, 1, 2, 3, 4, 5, 6, 7, 8, 9]),
            output_index: i as u32,
            ..Id::default()
        });
        sorted_utxo_ids.push(Id {
            tx_id: ids::Id::from_slice(&[i as u8, 1, 2, 3, 4, 5, 6, 7, 8, 9]),
            output_index: (i + 1) as u32,
            ..Id::default()
        });
    }
    assert!(cmp_manager::is_sorted_and_unique(&sorted_utxo_ids));
    assert_eq!(utxo_ids, sorted_utxo_ids);
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- txs::utxo::test_utxo_id --exact --show-output
/// ref. "avalanchego/vms/components/avax.TestUTXOID"
#[test]
fn test_utxo_id() {
    let tx_id: Vec<u8> = vec![
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e,
        0x0f, 0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17, 0x18, 0x19, 0x1a, 0x1b, 0x1c, 0x1d,
        0x1e, 0x1f,
    ];
    let utxo_id = Id::new(&tx_id, 0x20212223).unwrap();

    let expected_id: Vec<u8> = vec![
        42, 202, 101, 108, 44, 18, 156, 140, 88, 220, 97, 33, 177, 172, 79, 57, 207, 131, 41, 102,
        29, 103, 184, 89, 239, 38, 187, 183, 167, 216, 160, 212,
    ];
    let expected_id = ids::Id::from_slice(&expected_id);
    assert_eq!(utxo_id.id, expected_id);

    // the string form round-trips
    let s = utxo_id.to_cb58();
    let parsed = Id::from_cb58(&s).unwrap();
    assert_eq!(utxo_id, parsed);
    assert_eq!(parsed.id, expected_id);
}

/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/components/avax#UTXO>
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
pub struct Utxo {
    pub utxo_id: Id,
    pub asset_id: ids::Id,
    pub out: TransferableOut,
}

impl Utxo {
    pub fn new(utxo_id: Id, asset_id: ids::Id, out: TransferableOut) -> Self {
        Self {
            utxo_id,
            asset_id,
            out,
        }
    }

    /// Hex-encodes the Utxo with the prepended "0x".
    pub fn to_hex(&self) -> Result<String> {
        let packer = self.pack(codec::VERSION)?;
        let b = packer.take_bytes();

        let d = formatting::encode_hex_with_checksum(&b);
        Ok(format!("0x{}", d))
    }

    /// Parses the raw hex-encoded data from the "getUTXOs" API.
    pub fn from_hex(d: &str) -> Result<Self> {
        // ref. "utils/formatting.encode" prepends "0x" for "Hex" encoding
        let d = d.trim_start_matches("0x");

        let decoded = formatting::decode_hex_with_checksum(d.as_bytes())?;
        Self::unpack(&decoded)
    }

    /// Packs the Utxo:
    /// `codec_version(2) ‖ tx_id(32) ‖ output_index(4) ‖ asset_id(32) ‖ type_id(4) ‖ output`.
    pub fn pack(&self, codec_version: u16) -> Result<Packer> {
        let packer = Packer::new_for_tx();

        // codec version
        // ref. "avalanchego/codec.manager.Marshal"
        packer.pack_u16(codec_version)?;

        packer.pack_bytes(self.utxo_id.tx_id.as_ref())?;
        packer.pack_u32(self.utxo_id.output_index)?;
        packer.pack_bytes(self.asset_id.as_ref())?;
        self.out.pack(&packer)?;

        Ok(packer)
    }

    /// Parses raw bytes to "Utxo".
    /// It assumes the data are already decoded from "hex".
    pub fn unpack(d: &[u8]) -> Result<Self> {
        let packer = Packer::load_bytes_for_unpack(d.len() + 1024, d);

        let _codec_version = packer.unpack_u16()?;

        // must unpack in the order of struct
        let tx_id_bytes = packer.unpack_bytes(ids::LEN)?;
        let output_index = packer.unpack_u32()?;
        let utxo_id = Id::new(&tx_id_bytes, output_index)?;

        let asset_id = ids::Id::from_slice(&packer.unpack_bytes(ids::LEN)?);
        let out = TransferableOut::unpack(&packer)?;

        Ok(Self {
            utxo_id,
            asset_id,
            out,
        })
    }
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- txs::utxo::test_utxo_unpack_hex --exact --show-output
#[test]
fn test_utxo_unpack_hex() {
    use crate::{ids::short, key};

    let utxo_hex_1 = "0x000000000000000000000000000000000000000000000000000000000000000000000000000088eec2e099c6a528e689618e8721e04ae85ea574c7a15a7968644d14d54780140000000702c68af0bb1400000000000000000000000000010000000165844a05405f3662c1928142c6c2a783ef871de939b564db";
    let utxo = Utxo::from_hex(utxo_hex_1).unwrap();
    let utxo_hex_2 = utxo.to_hex().unwrap();
    assert_eq!(utxo_hex_1, utxo_hex_2);

    let expected = Utxo {
        utxo_id: Id::new(&[0u8; 32], 0).unwrap(),
        asset_id: ids::Id::from_slice(&<Vec<u8>>::from([
            136, 238, 194, 224, 153, 198, 165, 40, 230, 137, 97, 142, 135, 33, 224, 74, 232, 94,
            165, 116, 199, 161, 90, 121, 104, 100, 77, 20, 213, 71, 128, 20,
        ])),
        out: TransferableOut::TransferOutput(key::secp256k1::txs::transfer::Output {
            amount: 200000000000000000,
            output_owners: key::secp256k1::txs::OutputOwners {
                locktime: 0,
                threshold: 1,
                addresses: vec![short::Id::from_slice(&<Vec<u8>>::from([
                    101, 132, 74, 5, 64, 95, 54, 98, 193, 146, 129, 66, 198, 194, 167, 131, 239,
                    135, 29, 233,
                ]))],
            },
        }),
    };
    assert_eq!(utxo, expected);
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- txs::utxo::test_nft_utxo_round_trip --exact --show-output
#[test]
fn test_nft_utxo_round_trip() {
    use crate::{ids::short, key, nftfx};

    let utxo = Utxo {
        utxo_id: Id::new(&[0x11; 32], 3).unwrap(),
        asset_id: ids::Id::from_slice(&[0x22]),
        out: TransferableOut::NftTransferOutput(nftfx::TransferOutput::new(
            9,
            vec![0x01, 0x02, 0x03],
            key::secp256k1::txs::OutputOwners::new(0, 1, &[short::Id::from_slice(&[0x33])]),
        )),
    };

    let hex = utxo.to_hex().unwrap();
    let decoded = Utxo::from_hex(&hex).unwrap();
    assert_eq!(utxo, decoded);

    // a corrupted tag is rejected as unknown
    let packer = utxo.pack(codec::VERSION).unwrap();
    let mut b = packer.take_bytes().to_vec();
    // the type id sits right after codec version + tx id + index + asset id
    let tag_offset = 2 + 32 + 4 + 32;
    b[tag_offset + 3] = 0x63;
    match Utxo::unpack(&b) {
        Err(Error::UnknownTypeId { .. }) => {}
        other => panic!("expected unknown type ID, got {:?}", other),
    }
}
