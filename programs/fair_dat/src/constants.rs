//! Protocol-wide constants
//! Centralized location for precision, defaults and seeds

// PRECISION CONSTANTS
pub const FAIR_DECIMALS: u8 = 9;
pub const FAIR_PRECISION: u64 = 1_000_000_000;  // 1 FAIR = 1e9 base units
pub const BPS_PRECISION: u64 = 10_000;          // 100% = 10000 bps

// DEFAULT CONFIGURATION
pub const DEFAULT_BUY_PRICE: u64 = FAIR_PRECISION;         // 1 currency unit per FAIR
pub const DEFAULT_INVESTMENT_RESERVE_BPS: u64 = 1_000;     // 10% of RUN buys stays in the reserve
pub const DEFAULT_EXIT_FEE_BPS: u64 = 10;                  // 0.1% kept in reserve on RUN sells

// LIMITS
pub const MAX_EXIT_FEE_BPS: u64 = BPS_PRECISION - 1;

// PDA SEEDS
pub const DAT_STATE_SEED: &[u8] = b"dat_state";
pub const VAULT_AUTHORITY_SEED: &[u8] = b"vault_authority";
pub const INVESTOR_SEED: &[u8] = b"investor";
