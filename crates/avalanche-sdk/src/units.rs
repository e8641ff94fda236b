//! AVAX denominations for the X and P chains.

pub const NANO_AVAX: u64 = 1;
pub const MICRO_AVAX: u64 = 1000 * NANO_AVAX;
pub const MILLI_AVAX: u64 = 1000 * MICRO_AVAX;

/// On the X-Chain, one AVAX is 10^9 units.
/// On the P-Chain, one AVAX is 10^9 units.
/// ref. <https://snowtrace.io/unitconverter>
pub const AVAX: u64 = 1000 * MILLI_AVAX;

pub const KILO_AVAX: u64 = 1000 * AVAX;
pub const MEGA_AVAX: u64 = 1000 * KILO_AVAX;

/// Converts nano-AVAX to whole AVAX, rounding down.
pub fn navax_to_avax(navax: u64) -> u64 {
    navax / AVAX
}

/// Converts whole AVAX to nano-AVAX, saturating on overflow.
pub fn avax_to_navax(avax: u64) -> u64 {
    avax.saturating_mul(AVAX)
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- units::test_units --exact --show-output
#[test]
fn test_units() {
    assert_eq!(AVAX, 1_000_000_000);
    assert_eq!(navax_to_avax(1_500_000_000), 1);
    assert_eq!(avax_to_navax(2), 2_000_000_000);
    assert_eq!(avax_to_navax(u64::MAX), u64::MAX);
}
