use anchor_lang::prelude::*;

#[error_code]
#[derive(PartialEq,Eq)]
pub enum DatError {
  #[msg("Operation is not allowed in the current lifecycle state")]
  InvalidState,

  #[msg("Lifecycle transition is not allowed")]
  InvalidStateTransition,

  #[msg("Caller is not allowed to act for this seller")]
  Unauthorized,

  #[msg("Insufficient FAIR balance to sell this amount")]
  InsufficientBalance,

  #[msg("Price slippage - value is below your minimum")]
  PriceSlippage,

  #[msg("Subtraction underflow - init investment or supply would go negative")]
  Underflow,

  #[msg("Amount must be greater than zero")]
  ZeroAmount,

  #[msg("Amount too small - buy would mint zero FAIR")]
  AmountTooSmall,

  #[msg("Math overflow occurred - values exceeded u64 bounds")]
  MathOverflow,

  #[msg("Buyback reserve cannot cover this payout")]
  InsufficientReserve,

  #[msg("Sell would reduce the reserve backing per remaining FAIR")]
  BackingDiluted,

  #[msg("RUN sell value must stay below the pro-rata share of the reserve")]
  SellAboveProRata,

  #[msg("FAIR mint supply does not match the tracked total supply")]
  SupplyMismatch,

  #[msg("Currency vault holds less than the buyback reserve")]
  VaultShortfall,

  #[msg("Minimum duration has not elapsed yet")]
  TooEarly,

  #[msg("Invalid parameter value provided")]
  InvalidParameter,
}
