//! Pure mathematical functions for the DAT
//! All functions are deterministic and use u128 intermediates
//! No account access, fully testable in isolation

use crate::constants::BPS_PRECISION;

/// Multiply two u64 values and divide by a third, rounding up
/// Used where rounding must favor the reserve (fees kept by the trust)
/// Returns None on overflow or division by zero
pub fn mul_div_up(a: u64, b: u64, c: u64) -> Option<u64> {
  if c == 0 {
    return None;
  }

  let result = (a as u128)
    .checked_mul(b as u128)?
    .checked_add((c - 1) as u128)? // add (c - 1) before division to round up
    .checked_div(c as u128)?;

  u64::try_from(result).ok()
}

/// Multiply two u64 values and divide by a third, rounding DOWN
/// Used for every payout so the reserve can never be over-drawn
/// Returns None on overflow or division by zero
pub fn mul_div_down(a: u64, b: u64, c: u64) -> Option<u64> {
  if c == 0 {
    return None;
  }

  let result = (a as u128)
    .checked_mul(b as u128)?
    .checked_div(c as u128)?;

  u64::try_from(result).ok()
}

/// Pro-rata share of the reserve owned by `amount` out of `total_supply`
///
/// # Arguments
/// * `reserve` - Currency held in the buyback reserve
/// * `amount` - FAIR being redeemed
/// * `total_supply` - FAIR outstanding before the redemption
///
/// # Returns
/// `reserve * amount / total_supply`, rounded down.
/// Returns 0 when `amount` is 0 (even with zero supply).
pub fn pro_rata_share(reserve: u64, amount: u64, total_supply: u64) -> Option<u64> {
  if amount == 0 {
    return Some(0);
  }
  mul_div_down(reserve, amount, total_supply)
}

/// Split an amount into (net, fee) with the fee rounded UP
///
/// # Arguments
/// * `amount` - Gross amount before fee
/// * `fee_bps` - Fee in basis points (e.g., 10 = 0.1%)
///
/// # Returns
/// (net_amount, fee_amount); any non-zero gross with non-zero fee pays at least 1 unit
pub fn apply_fee_up(amount: u64, fee_bps: u64) -> Option<(u64, u64)> {
  if fee_bps > BPS_PRECISION {
    return None;
  }
  let fee_amount = mul_div_up(amount, fee_bps, BPS_PRECISION)?;
  let net_amount = amount.checked_sub(fee_amount)?;
  Some((net_amount, fee_amount))
}

/// Split an amount by a basis-point share, rounding the share DOWN
///
/// # Returns
/// (share, remainder) where share + remainder == amount
pub fn split_bps(amount: u64, share_bps: u64) -> Option<(u64, u64)> {
  if share_bps > BPS_PRECISION {
    return None;
  }
  let share = mul_div_down(amount, share_bps, BPS_PRECISION)?;
  let remainder = amount.checked_sub(share)?;
  Some((share, remainder))
}
