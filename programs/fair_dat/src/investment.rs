//! Investment ledger - the per-investor at-cost tranche
//! Increments come from buys; the cancel path consumes it exactly, never clamped

use anchor_lang::prelude::*;

use crate::error::DatError;
use crate::state::InvestorRecord;

/// Remaining tranche after consuming `amount`
/// Fails with `Underflow` instead of clamping to zero
pub fn checked_consume(init_investment: u64, amount: u64) -> Result<u64> {
  let remaining = init_investment
    .checked_sub(amount)
    .ok_or(DatError::Underflow)?;
  Ok(remaining)
}

/// Tranche after crediting `amount`
pub fn checked_record(init_investment: u64, amount: u64) -> Result<u64> {
  let next = init_investment
    .checked_add(amount)
    .ok_or(DatError::MathOverflow)?;
  Ok(next)
}

impl InvestorRecord {
  pub fn record_init_investment(&mut self, amount: u64) -> Result<()> {
    self.init_investment = checked_record(self.init_investment, amount)?;
    Ok(())
  }

  /// All-or-nothing; on error the record is untouched
  pub fn consume_init_investment(&mut self, amount: u64) -> Result<()> {
    self.init_investment = checked_consume(self.init_investment, amount)?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_record_then_consume_exactly_drains() {
    let mut record = InvestorRecord::default();
    record.record_init_investment(100).unwrap();
    record.record_init_investment(23).unwrap();
    record.consume_init_investment(123).unwrap();
    assert_eq!(record.init_investment, 0);
  }

  #[test]
  fn test_consume_more_than_recorded_fails_untouched() {
    let mut record = InvestorRecord::default();
    record.record_init_investment(100).unwrap();
    let err = record.consume_init_investment(101).unwrap_err();
    assert_eq!(err, anchor_lang::error::Error::from(DatError::Underflow));
    assert_eq!(record.init_investment, 100);
  }

  #[test]
  fn test_unknown_investor_reads_zero() {
    assert_eq!(InvestorRecord::init_investment_or_zero(None), 0);
    let record = InvestorRecord::default();
    assert_eq!(InvestorRecord::init_investment_or_zero(Some(&record)), 0);
    assert!(checked_consume(0, 1).is_err());
    assert_eq!(checked_consume(0, 0).unwrap(), 0);
  }

  #[test]
  fn test_record_overflow() {
    let err = checked_record(u64::MAX, 1).unwrap_err();
    assert_eq!(err, anchor_lang::error::Error::from(DatError::MathOverflow));
  }
}
