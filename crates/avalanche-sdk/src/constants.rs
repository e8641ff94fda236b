//! Constants for the Avalanche network.
use std::collections::HashMap;

use crate::units;
use lazy_static::lazy_static;

pub const DEFAULT_CUSTOM_NETWORK_ID: u32 = 1000000;

pub const FALLBACK_HRP: &str = "custom";

/// Chain aliases used as the address prefix (e.g. "X-avax1...").
pub const X_CHAIN_ALIAS: &str = "X";
pub const P_CHAIN_ALIAS: &str = "P";

/// Length of a short address in bytes.
pub const ADDRESS_LEN: usize = 20;
/// Length of an asset ID in bytes.
pub const ASSET_ID_LEN: usize = 32;

/// Maximum size of the BaseTx memo field.
pub const MAX_MEMO_SIZE: usize = 256;
/// Maximum length of an asset name.
pub const MAX_NAME_LEN: usize = 128;
/// Maximum length of an asset symbol.
pub const MAX_SYMBOL_LEN: usize = 4;
/// Maximum denomination of a fungible asset.
pub const MAX_DENOMINATION: u8 = 32;
/// Maximum size of an NFT payload.
pub const MAX_NFT_PAYLOAD_SIZE: usize = 1024;

/// Minimum stake to become a primary network validator.
/// ref. <https://docs.avax.network/nodes/validate/how-to-stake>
pub const MIN_VALIDATOR_STAKE: u64 = 2 * units::KILO_AVAX;
/// Minimum stake to delegate to a primary network validator.
pub const MIN_DELEGATOR_STAKE: u64 = 25 * units::AVAX;

/// Staking window bounds in seconds.
pub const MIN_STAKE_DURATION: u64 = 14 * 24 * 60 * 60;
pub const MAX_STAKE_DURATION: u64 = 365 * 24 * 60 * 60;

/// Delegation shares are in 1/10,000th of a percent
/// (1_000_000 shares == 100%).
pub const MAX_DELEGATION_SHARES: u32 = 1_000_000;

lazy_static! {
    /// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/utils/constants>
    pub static ref NETWORK_ID_TO_NETWORK_NAME: HashMap<u32, &'static str> = {
        let mut m = HashMap::new();
        m.insert(1, "mainnet");
        m.insert(2, "cascade");
        m.insert(3, "denali");
        m.insert(4, "everest");
        m.insert(5, "fuji");
        m.insert(12345, "local");
        m
    };

    /// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/utils/constants>
    pub static ref NETWORK_NAME_TO_NETWORK_ID: HashMap<&'static str, u32> = {
        let mut m = HashMap::new();
        m.insert("mainnet", 1);
        m.insert("cascade", 2);
        m.insert("denali", 3);
        m.insert("everest", 4);
        m.insert("fuji", 5);
        m.insert("local", 12345);
        m
    };

    /// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/utils/constants>
    pub static ref NETWORK_ID_TO_HRP: HashMap<u32, &'static str> = {
        let mut m = HashMap::new();
        m.insert(1, "avax");
        m.insert(2, "cascade");
        m.insert(3, "denali");
        m.insert(4, "everest");
        m.insert(5, "fuji");
        m.insert(12345, "local");
        m
    };

    /// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/utils/constants>
    pub static ref HRP_TO_NETWORK_ID: HashMap<&'static str, u32> = {
        let mut m = HashMap::new();
        m.insert("avax", 1);
        m.insert("cascade", 2);
        m.insert("denali", 3);
        m.insert("everest", 4);
        m.insert("fuji", 5);
        m.insert("local", 12345);
        m
    };

    /// Default fee burned by every non-state-creating transaction,
    /// keyed by network ID. Unlisted networks fall back to the local default.
    pub static ref NETWORK_ID_TO_TX_FEE: HashMap<u32, u64> = {
        let mut m = HashMap::new();
        m.insert(1, units::MILLI_AVAX);
        m.insert(5, units::MILLI_AVAX);
        m.insert(12345, units::MILLI_AVAX);
        m
    };

    /// Fee to create a new asset on the X-chain, keyed by network ID.
    pub static ref NETWORK_ID_TO_CREATE_ASSET_TX_FEE: HashMap<u32, u64> = {
        let mut m = HashMap::new();
        m.insert(1, 10 * units::MILLI_AVAX);
        m.insert(5, 10 * units::MILLI_AVAX);
        m.insert(12345, units::MILLI_AVAX);
        m
    };
}

/// Returns the HRP for the network ID, falling back to "custom".
pub fn hrp_for_network(network_id: u32) -> &'static str {
    NETWORK_ID_TO_HRP
        .get(&network_id)
        .copied()
        .unwrap_or(FALLBACK_HRP)
}

/// Returns the default tx fee for the network ID.
pub fn tx_fee_for_network(network_id: u32) -> u64 {
    NETWORK_ID_TO_TX_FEE
        .get(&network_id)
        .copied()
        .unwrap_or(units::MILLI_AVAX)
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- constants::test_network_tables --exact --show-output
#[test]
fn test_network_tables() {
    assert_eq!(hrp_for_network(1), "avax");
    assert_eq!(hrp_for_network(999999), FALLBACK_HRP);
    assert_eq!(*NETWORK_NAME_TO_NETWORK_ID.get("fuji").unwrap(), 5);
    assert_eq!(tx_fee_for_network(1), units::MILLI_AVAX);
    assert!(MIN_DELEGATOR_STAKE < MIN_VALIDATOR_STAKE);
}
