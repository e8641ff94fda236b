//! Codec version and per-chain type-ID registries.
use std::collections::HashMap;

use lazy_static::lazy_static;

/// The latest (and only) linear codec version.
pub const VERSION: u16 = 0;

lazy_static! {
    /// X-chain (AVM) type-ID registry.
    /// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/codec#Registry>
    /// ref. "avalanchego/vms/avm/txs/codec.go"
    ///     (used for encoding Go interface type into a "struct")
    pub static ref X_TYPES: HashMap<String, usize> = {
        let mut m = HashMap::new();
        m.insert("avm.BaseTx".to_string(), 0);
        m.insert("avm.CreateAssetTx".to_string(), 1);
        m.insert("avm.OperationTx".to_string(), 2);
        m.insert("avm.ImportTx".to_string(), 3);
        m.insert("avm.ExportTx".to_string(), 4);
        m.insert("secp256k1fx.TransferInput".to_string(), 5);
        m.insert("secp256k1fx.MintOutput".to_string(), 6);
        m.insert("secp256k1fx.TransferOutput".to_string(), 7);
        m.insert("secp256k1fx.MintOperation".to_string(), 8);
        m.insert("secp256k1fx.Credential".to_string(), 9);
        m.insert("nftfx.MintOutput".to_string(), 10);
        m.insert("nftfx.TransferOutput".to_string(), 11);
        m.insert("nftfx.MintOperation".to_string(), 12);
        m.insert("nftfx.TransferOperation".to_string(), 13);
        m.insert("nftfx.Credential".to_string(), 14);
        m
    };

    /// P-chain (PlatformVM) type-ID registry.
    /// The same logical type can carry a different numeric ID per chain
    /// (e.g. "ImportTx" is 3 on X but 17 on P).
    /// ref. "avalanchego/vms/platformvm/txs/codec.go"
    pub static ref P_TYPES: HashMap<String, usize> = {
        let mut m = HashMap::new();
        m.insert("secp256k1fx.TransferInput".to_string(), 5);
        m.insert("secp256k1fx.MintOutput".to_string(), 6);
        m.insert("secp256k1fx.TransferOutput".to_string(), 7);
        m.insert("secp256k1fx.MintOperation".to_string(), 8);
        m.insert("secp256k1fx.Credential".to_string(), 9);
        m.insert("secp256k1fx.Input".to_string(), 10);
        m.insert("secp256k1fx.OutputOwners".to_string(), 11);

        m.insert("platformvm.AddValidatorTx".to_string(), 12);
        m.insert("platformvm.AddSubnetValidatorTx".to_string(), 13);
        m.insert("platformvm.AddDelegatorTx".to_string(), 14);
        m.insert("platformvm.CreateChainTx".to_string(), 15);
        m.insert("platformvm.CreateSubnetTx".to_string(), 16);
        m.insert("platformvm.ImportTx".to_string(), 17);
        m.insert("platformvm.ExportTx".to_string(), 18);

        m
    };
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- codec::test_type_registries --exact --show-output
#[test]
fn test_type_registries() {
    assert_eq!(*X_TYPES.get("avm.BaseTx").unwrap(), 0);
    assert_eq!(*X_TYPES.get("secp256k1fx.TransferOutput").unwrap(), 7);
    assert_eq!(*X_TYPES.get("nftfx.TransferOperation").unwrap(), 13);

    // per-chain divergence for the same logical type
    assert_eq!(*X_TYPES.get("avm.ImportTx").unwrap(), 3);
    assert_eq!(*P_TYPES.get("platformvm.ImportTx").unwrap(), 17);
    assert_eq!(
        *X_TYPES.get("secp256k1fx.TransferInput").unwrap(),
        *P_TYPES.get("secp256k1fx.TransferInput").unwrap(),
    );
}
