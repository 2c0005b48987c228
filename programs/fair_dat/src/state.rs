//! State accounts for the DAT
//! The trust state is a singleton; investor records are one PDA per investor

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::DatError;
use crate::lifecycle::DatPhase;
use crate::math::pro_rata_share;
use crate::pricing::{estimate_sell_value_with, ExitFeeCurve};

/// Deployment configuration handed to `initialize`
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct DatConfig {
  /// FAIR minted to the beneficiary at launch
  pub init_reserve: u64,
  /// FAIR that must be sold outside the init reserve before RUN
  pub init_goal: u64,
  /// Currency base units paid per whole FAIR
  pub buy_price: u64,
  /// Share of RUN buys kept in the buyback reserve
  pub investment_reserve_bps: u64,
  /// Exit fee withheld from RUN sells, stays in the reserve
  pub exit_fee_bps: u64,
  /// Unix timestamp before which the trust cannot close
  pub min_duration: i64,
}

impl Default for DatConfig {
  fn default() -> Self {
    Self {
      init_reserve: 0,
      init_goal: 0,
      buy_price: DEFAULT_BUY_PRICE,
      investment_reserve_bps: DEFAULT_INVESTMENT_RESERVE_BPS,
      exit_fee_bps: DEFAULT_EXIT_FEE_BPS,
      min_duration: 0,
    }
  }
}

impl DatConfig {
  pub fn validate(&self) -> Result<()> {
    require!(self.buy_price > 0, DatError::InvalidParameter);
    require!(self.investment_reserve_bps <= BPS_PRECISION, DatError::InvalidParameter);
    require!(
      self.exit_fee_bps > 0 && self.exit_fee_bps <= MAX_EXIT_FEE_BPS,
      DatError::InvalidParameter
    );
    require!(self.min_duration >= 0, DatError::InvalidParameter);
    Ok(())
  }

  /// Phase the trust starts in; a zero goal skips INIT entirely
  pub fn initial_phase(&self) -> DatPhase {
    if self.init_goal == 0 {
      DatPhase::Run
    } else {
      DatPhase::Init
    }
  }
}

/// Collaborator accounts a trust is bound to at deployment
#[derive(Clone, Copy, Debug)]
pub struct DatAccounts {
  pub control: Pubkey,
  pub beneficiary: Pubkey,
  pub fair_mint: Pubkey,
  pub currency_mint: Pubkey,
  pub vault: Pubkey,
}

/// Trust state - the single source of truth for supply, reserve and phase
#[account]
#[derive(Debug, PartialEq, Eq)]
pub struct DatState {
  /// Authority allowed to cancel
  pub control: Pubkey,

  /// Receives the init reserve and may sell treasury FAIR
  pub beneficiary: Pubkey,

  pub fair_mint: Pubkey,

  pub currency_mint: Pubkey,

  pub vault: Pubkey,

  pub phase: DatPhase,

  pub total_supply: u64,

  pub buyback_reserve: u64,

  pub init_reserve: u64,

  pub init_goal: u64,

  pub buy_price: u64,

  pub investment_reserve_bps: u64,

  pub exit_fee_bps: u64,

  pub min_duration: i64,

  pub bump: u8,

  pub vault_authority_bump: u8,

  pub _reserved: [u64; 4],
}

impl DatState {
  pub const LEN: usize = 8 + // discriminator
    32 + // control
    32 + // beneficiary
    32 + // fair_mint
    32 + // currency_mint
    32 + // vault
    1 + // phase
    8 + // total_supply
    8 + // buyback_reserve
    8 + // init_reserve
    8 + // init_goal
    8 + // buy_price
    8 + // investment_reserve_bps
    8 + // exit_fee_bps
    8 + // min_duration
    1 + // bump
    1 + // vault_authority_bump
    32; // _reserved

  /// Fresh trust state; the init reserve is counted in supply from the start
  pub fn new(accounts: DatAccounts, config: &DatConfig, bump: u8, vault_authority_bump: u8) -> Self {
    Self {
      control: accounts.control,
      beneficiary: accounts.beneficiary,
      fair_mint: accounts.fair_mint,
      currency_mint: accounts.currency_mint,
      vault: accounts.vault,
      phase: config.initial_phase(),
      total_supply: config.init_reserve,
      buyback_reserve: 0,
      init_reserve: config.init_reserve,
      init_goal: config.init_goal,
      buy_price: config.buy_price,
      investment_reserve_bps: config.investment_reserve_bps,
      exit_fee_bps: config.exit_fee_bps,
      min_duration: config.min_duration,
      bump,
      vault_authority_bump,
      _reserved: [0; 4],
    }
  }

  pub fn sell_curve(&self) -> ExitFeeCurve {
    ExitFeeCurve { exit_fee_bps: self.exit_fee_bps }
  }

  /// Currency a sell of `amount` FAIR would pay out right now
  pub fn estimate_sell_value(&self, amount: u64) -> Result<u64> {
    estimate_sell_value_with(
      self.phase,
      amount,
      self.total_supply,
      self.buyback_reserve,
      &self.sell_curve(),
    )
  }

  /// Pro-rata share of the reserve for `amount`, the upper bound for any sell
  pub fn pro_rata_value(&self, amount: u64) -> Result<u64> {
    require!(amount <= self.total_supply, DatError::Underflow);
    let value = pro_rata_share(self.buyback_reserve, amount, self.total_supply)
      .ok_or(DatError::MathOverflow)?;
    Ok(value)
  }

  /// FAIR sold to investors outside the init reserve
  pub fn sold_supply(&self) -> u64 {
    self.total_supply.saturating_sub(self.init_reserve)
  }

  pub fn is_beneficiary(&self, key: &Pubkey) -> bool {
    self.beneficiary == *key
  }
}

/// Per-investor at-cost tranche bought before the trust ran
/// A record that was never created reads as zero
#[account]
#[derive(Debug, Default, PartialEq, Eq)]
pub struct InvestorRecord {
  pub investor: Pubkey,

  pub init_investment: u64,

  pub bump: u8,
}

impl InvestorRecord {
  pub const LEN: usize = 8 + // discriminator
    32 + // investor
    8 + // init_investment
    1; // bump

  /// Bind a record freshly created by `init_if_needed`
  pub fn bind(&mut self, investor: Pubkey, bump: u8) {
    if self.investor == Pubkey::default() {
      self.investor = investor;
      self.bump = bump;
    }
  }

  pub fn init_investment_or_zero(record: Option<&InvestorRecord>) -> u64 {
    record.map_or(0, |r| r.init_investment)
  }
}
