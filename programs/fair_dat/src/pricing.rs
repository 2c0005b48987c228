//! Sell-side pricing for the trust
//! CANCEL pays strictly pro-rata; RUN delegates to a pluggable sell curve

use anchor_lang::prelude::*;

use crate::error::DatError;
use crate::lifecycle::DatPhase;
use crate::math::{apply_fee_up, pro_rata_share};

/// RUN-state sell curve
///
/// Implementations must be pure, non-decreasing in `amount`, and never pay
/// more than the pro-rata share `reserve * amount / total_supply`.
pub trait SellCurve {
  fn sell_value(&self, amount: u64, total_supply: u64, buyback_reserve: u64) -> Option<u64>;
}

/// Pro-rata share minus an exit fee rounded up
/// The withheld fee stays in the reserve as backing for remaining holders
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExitFeeCurve {
  pub exit_fee_bps: u64,
}

impl SellCurve for ExitFeeCurve {
  fn sell_value(&self, amount: u64, total_supply: u64, buyback_reserve: u64) -> Option<u64> {
    let gross = pro_rata_share(buyback_reserve, amount, total_supply)?;
    let (net, _fee) = apply_fee_up(gross, self.exit_fee_bps)?;
    Some(net)
  }
}

/// Estimate the currency paid for selling `amount` FAIR
///
/// # Arguments
/// * `phase` - Current lifecycle phase
/// * `amount` - FAIR to sell
/// * `total_supply` - FAIR outstanding before the sell
/// * `buyback_reserve` - Currency backing redemptions before the sell
/// * `curve` - RUN-state sell curve
///
/// # Returns
/// Currency value, rounded down. Repeated calls on the same state agree.
pub fn estimate_sell_value_with<C: SellCurve>(
  phase: DatPhase,
  amount: u64,
  total_supply: u64,
  buyback_reserve: u64,
  curve: &C,
) -> Result<u64> {
  require!(amount <= total_supply, DatError::Underflow);

  let value = match phase {
    DatPhase::Cancel => pro_rata_share(buyback_reserve, amount, total_supply),
    DatPhase::Run => curve.sell_value(amount, total_supply, buyback_reserve),
    DatPhase::Init | DatPhase::Close => return Err(DatError::InvalidState.into()),
  }
  .ok_or(DatError::MathOverflow)?;

  Ok(value)
}
