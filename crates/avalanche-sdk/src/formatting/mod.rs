//! Checksummed string encodings for identifiers, transactions, and addresses.
use crate::{
    errors::{Error, Result},
    hash,
};
use bech32::{ToBase32, Variant};
use bs58::{decode::DecodeBuilder, encode::EncodeBuilder, Alphabet};

const CHECKSUM_LENGTH: usize = 4;

/// Encodes the payload as base-58 of `payload ‖ sha256(payload)[28..32]`.
/// Used for asset IDs, tx IDs, UTXO IDs, and private keys.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/utils/formatting#EncodeWithChecksum>
pub fn encode_cb58_with_checksum_string(d: &[u8]) -> String {
    EncodeBuilder::new(d, Alphabet::DEFAULT)
        .as_cb58(None)
        .into_string()
}

/// Same as `encode_cb58_with_checksum_string` but returns the raw encoded bytes.
pub fn encode_cb58_with_checksum_vec(d: &[u8]) -> Vec<u8> {
    EncodeBuilder::new(d, Alphabet::DEFAULT)
        .as_cb58(None)
        .into_vec()
}

/// Decodes the cb58 string, verifying the 4-byte sha256 checksum suffix.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/utils/formatting#Decode>
pub fn decode_cb58_with_checksum(d: &str) -> Result<Vec<u8>> {
    DecodeBuilder::new(d, Alphabet::DEFAULT)
        .as_cb58(None)
        .into_vec()
        .map_err(|err| match err {
            bs58::decode::Error::InvalidChecksum {
                checksum,
                expected_checksum,
            } => Error::Checksum {
                message: format!("invalid checksum {checksum:?} != {expected_checksum:?}"),
            },
            _ => Error::InvalidInput {
                message: format!("failed to decode base58 ({err})"),
            },
        })
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- formatting::test_encode_cb58_with_checksum --exact --show-output
#[test]
fn test_encode_cb58_with_checksum() {
    // ref. "avalanchego/utils/formatting.encoding_test"
    let d: Vec<u8> = Vec::new();
    let encoded = encode_cb58_with_checksum_string(&d);
    assert_eq!(encoded, "45PJLL");
    let decoded = decode_cb58_with_checksum(&encoded).unwrap();
    assert_eq!(d, decoded);

    let d: Vec<u8> = vec![0];
    let encoded = encode_cb58_with_checksum_string(&d);
    assert_eq!(encoded, "1c7hwa");
    let decoded = decode_cb58_with_checksum(&encoded).unwrap();
    assert_eq!(d, decoded);

    let d: Vec<u8> = vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 255];
    let encoded = encode_cb58_with_checksum_string(&d);
    assert_eq!(encoded, "1NVSVezva3bAtJesnUj");
    let decoded = decode_cb58_with_checksum(&encoded).unwrap();
    assert_eq!(d, decoded);

    let d: Vec<u8> = vec![
        1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25,
        26, 27, 28, 29, 30, 31, 32,
    ];
    let encoded = encode_cb58_with_checksum_string(&d);
    assert_eq!(encoded, "SkB92YpWm4Q2ijQHH34cqbKkCZWszsiQgHVjtNeFF2HdvDQU");
    let decoded = decode_cb58_with_checksum(&encoded).unwrap();
    assert_eq!(d, decoded);
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- formatting::test_cb58_checksum_flip --exact --show-output
#[test]
fn test_cb58_checksum_flip() {
    let d = "A".as_bytes().to_vec();
    let encoded = encode_cb58_with_checksum_string(&d);
    let decoded = decode_cb58_with_checksum(&encoded).unwrap();
    assert_eq!(d, decoded);

    // re-encode with each of the four checksum bytes flipped;
    // every mutation must be rejected as a checksum error
    let mut checked = d.clone();
    checked.extend_from_slice(&hash::sha256(&d)[hash::SHA256_OUTPUT_LEN - CHECKSUM_LENGTH..]);
    for i in 0..CHECKSUM_LENGTH {
        let mut corrupted = checked.clone();
        let n = corrupted.len();
        corrupted[n - 1 - i] ^= 0xff;
        let corrupted_str = bs58::encode(&corrupted).into_string();
        match decode_cb58_with_checksum(&corrupted_str) {
            Err(Error::Checksum { .. }) => {}
            other => panic!("expected checksum error, got {:?}", other),
        }
    }
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- formatting::test_cb58_random_round_trip --exact --show-output
#[test]
fn test_cb58_random_round_trip() {
    for n in [20, 32] {
        let d = random_manager::secure_string(n).into_bytes();
        let encoded = encode_cb58_with_checksum_string(&d);
        assert_eq!(decode_cb58_with_checksum(&encoded).unwrap(), d);
    }
}

/// Encodes the payload as hex of `payload ‖ sha256(payload)[28..32]`.
/// This is the node's "hex" encoding for UTXO and transaction strings.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/utils/formatting#EncodeWithChecksum>
pub fn encode_hex_with_checksum(d: &[u8]) -> String {
    // "hashing.Checksum" of "sha256.Sum256"
    let checksum = hash::sha256(d);
    let checksum_length = checksum.len();
    let checksum = &checksum[checksum_length - CHECKSUM_LENGTH..];

    let mut checked = d.to_vec();
    let mut checksum = checksum.to_vec();
    checked.append(&mut checksum);

    hex::encode(&checked)
}

/// Decodes the hex string, verifying the 4-byte sha256 checksum suffix.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/utils/formatting#Decode>
pub fn decode_hex_with_checksum(d: &[u8]) -> Result<Vec<u8>> {
    let decoded = hex::decode(d).map_err(|e| Error::InvalidInput {
        message: format!("failed to decode hex ({e})"),
    })?;
    let decoded_length = decoded.len();
    if decoded_length < CHECKSUM_LENGTH {
        return Err(Error::TruncatedBuffer {
            message: format!(
                "decoded hex too short for checksum ({decoded_length} < {CHECKSUM_LENGTH})"
            ),
        });
    }

    let checksum = &decoded[decoded_length - CHECKSUM_LENGTH..];
    let orig = &decoded[..decoded_length - CHECKSUM_LENGTH];

    let orig_checksum = hash::sha256(orig);
    let orig_checksum_length = orig_checksum.len();
    let orig_checksum = &orig_checksum[orig_checksum_length - CHECKSUM_LENGTH..];
    if !cmp_manager::eq_vectors(checksum, orig_checksum) {
        return Err(Error::Checksum {
            message: format!("invalid checksum {checksum:?} != {orig_checksum:?}"),
        });
    }

    Ok(orig.to_vec())
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- formatting::test_encode_hex_with_checksum --exact --show-output
#[test]
fn test_encode_hex_with_checksum() {
    // ref. "avalanchego/utils/formatting.encoding_test"
    let d: Vec<u8> = Vec::new();
    let encoded = encode_hex_with_checksum(&d);
    assert_eq!(encoded, "7852b855");
    let decoded = decode_hex_with_checksum(encoded.as_bytes()).unwrap();
    assert_eq!(d, decoded);

    let d: Vec<u8> = vec![0];
    let encoded = encode_hex_with_checksum(&d);
    assert_eq!(encoded, "0017afa01d");
    let decoded = decode_hex_with_checksum(encoded.as_bytes()).unwrap();
    assert_eq!(d, decoded);

    let d: Vec<u8> = vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 255];
    let encoded = encode_hex_with_checksum(&d);
    assert_eq!(encoded, "00010203040506070809ff4482539c");
    let decoded = decode_hex_with_checksum(encoded.as_bytes()).unwrap();
    assert_eq!(d, decoded);
}

/// Formats the 20-byte address as `<chain-alias>-<bech32(hrp, addr)>`.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/utils/formatting#FormatAddress>
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/utils/formatting#FormatBech32>
pub fn address(chain_id_alias: &str, hrp: &str, d: &[u8]) -> Result<String> {
    if d.len() != 20 {
        return Err(Error::InvalidInput {
            message: format!("address must be 20-byte, got {}", d.len()),
        });
    }

    // ".to_base32()" already does "bech32::convert_bits(d, 8, 5, true)"
    let encoded =
        bech32::encode(hrp, d.to_base32(), Variant::Bech32).map_err(|e| Error::InvalidInput {
            message: format!("failed bech32::encode {e}"),
        })?;
    Ok(format!("{chain_id_alias}-{encoded}"))
}

/// Parses a `<chain-alias>-<bech32>` address back into its HRP and 20 bytes.
pub fn parse_address(addr: &str) -> Result<(String, Vec<u8>)> {
    let (_, bech) = match addr.split_once('-') {
        Some(split) => split,
        None => ("", addr),
    };

    let (hrp, data, _) = bech32::decode(bech.trim()).map_err(|e| Error::InvalidInput {
        message: format!("failed bech32::decode '{e}'"),
    })?;
    let converted = bech32::convert_bits(&data, 5, 8, false).map_err(|e| Error::InvalidInput {
        message: format!("failed bech32::convert_bits '{e}'"),
    })?;
    if converted.len() != 20 {
        return Err(Error::InvalidInput {
            message: format!("address must decode to 20-byte, got {}", converted.len()),
        });
    }
    Ok((hrp, converted))
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- formatting::test_address_round_trip --exact --show-output
#[test]
fn test_address_round_trip() {
    let d: Vec<u8> = vec![
        0x3d, 0x0a, 0xd1, 0x2b, 0x8e, 0xe8, 0x92, 0x8e, 0xdf, 0x24, //
        0x8c, 0xa9, 0x1c, 0xa5, 0x56, 0x00, 0xfb, 0x38, 0x3f, 0x07, //
    ];
    let formatted = address("X", "avax", &d).unwrap();
    assert!(formatted.starts_with("X-avax1"));

    let (hrp, parsed) = parse_address(&formatted).unwrap();
    assert_eq!(hrp, "avax");
    assert_eq!(parsed, d);

    // 19-byte payload must be rejected
    assert!(address("X", "avax", &d[..19]).is_err());
}
