//! Invariant assertions for the DAT
//! These are the rules that protect reserve solvency
//! Every state-changing instruction MUST call these before committing

use anchor_lang::prelude::*;

use crate::error::DatError;
use crate::lifecycle::DatPhase;

/// Assert the reserve can pay `value` out
///
/// # Returns
/// Reserve left after the payout
pub fn debit_buyback_reserve(buyback_reserve: u64, value: u64) -> Result<u64> {
  let next = buyback_reserve
    .checked_sub(value)
    .ok_or(DatError::InsufficientReserve)?;
  Ok(next)
}

/// Burn `amount` from the tracked supply
pub fn debit_total_supply(total_supply: u64, amount: u64) -> Result<u64> {
  let next = total_supply
    .checked_sub(amount)
    .ok_or(DatError::Underflow)?;
  Ok(next)
}

/// Assert that a redemption never lowers the reserve backing per FAIR
/// left outstanding: new_reserve / new_supply >= old_reserve / old_supply
///
/// # Arguments
/// * `old_reserve`, `old_supply` - Reserve and supply before the sell
/// * `new_reserve`, `new_supply` - Reserve and supply after the sell
pub fn assert_backing_not_diluted(
  old_reserve: u64,
  old_supply: u64,
  new_reserve: u64,
  new_supply: u64,
) -> Result<()> {
  // cross-multiplied; u64 * u64 always fits in u128
  let lhs = (new_reserve as u128) * (old_supply as u128);
  let rhs = (old_reserve as u128) * (new_supply as u128);

  require!(lhs >= rhs, DatError::BackingDiluted);
  Ok(())
}

/// Assert a RUN-state payout stays strictly under the pro-rata share
/// Any other phase may pay at most the pro-rata share
pub fn assert_sell_within_pro_rata(phase: DatPhase, value: u64, pro_rata: u64) -> Result<()> {
  match phase {
    DatPhase::Run if pro_rata > 0 => {
      require!(value < pro_rata, DatError::SellAboveProRata);
    }
    _ => {
      require!(value <= pro_rata, DatError::SellAboveProRata);
    }
  }
  Ok(())
}

/// Assert the SPL mint agrees with the tracked supply after CPIs
pub fn assert_supply_reconciled(mint_supply: u64, total_supply: u64) -> Result<()> {
  require!(mint_supply == total_supply, DatError::SupplyMismatch);
  Ok(())
}

/// Assert the currency vault still holds at least the buyback reserve
pub fn assert_vault_covers_reserve(vault_amount: u64, buyback_reserve: u64) -> Result<()> {
  require!(vault_amount >= buyback_reserve, DatError::VaultShortfall);
  Ok(())
}
