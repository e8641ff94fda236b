//! Hashing utilities.
//!
//! SHA256 for transaction digests and checksums, SHA256+RIPEMD160 for
//! short address derivation.
use crate::errors::{Error, Result};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

pub const SHA256_OUTPUT_LEN: usize = 32;

/// Returns SHA256 digest of the given data.
pub fn sha256(d: impl AsRef<[u8]>) -> Vec<u8> {
    Sha256::digest(d.as_ref()).to_vec()
}

/// Converts bytes to the short address bytes (20-byte).
/// e.g., "hashing.PubkeyBytesToAddress" and "ids.ToShortID"
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/utils/hashing#PubkeyBytesToAddress>
pub fn sha256_ripemd160<B>(b: B) -> Result<Vec<u8>>
where
    B: AsRef<[u8]>,
{
    let digest_sha256 = sha256(b);
    let hashed = Ripemd160::digest(digest_sha256);

    // "ids.ToShortID" merely enforces "ripemd160" size!
    // ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/ids#ToShortID>
    if hashed.len() != 20 {
        return Err(Error::InvalidInput {
            message: format!("ripemd160 of sha256 must be 20-byte, got {}", hashed.len()),
        });
    }

    Ok(hashed.to_vec())
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- hash::test_sha256 --exact --show-output
#[test]
fn test_sha256() {
    // sha256 of an empty input
    let d = sha256([]);
    assert_eq!(
        hex::encode(&d),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
    assert_eq!(d.len(), SHA256_OUTPUT_LEN);
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- hash::test_sha256_ripemd160 --exact --show-output
#[test]
fn test_sha256_ripemd160() {
    let d = sha256_ripemd160(<Vec<u8>>::from([
        0x3d, 0x0a, 0xd1, 0x2b, 0x8e, 0xe8, 0x92, 0x8e, 0xdf, 0x24, //
        0x8c, 0xa9, 0x1c, 0xa5, 0x56, 0x00, 0xfb, 0x38, 0x3f, 0x07, //
        0xc3, 0x2b, 0xff, 0x1d, 0x6d, 0xec, 0x47, 0x2b, 0x25, 0xcf, //
        0x59, 0xa7,
    ]))
    .unwrap();
    assert_eq!(d.len(), 20);
}
