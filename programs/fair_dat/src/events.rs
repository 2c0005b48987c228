use anchor_lang::prelude::*;

use crate::lifecycle::DatPhase;

#[event]
pub struct DatInitialized {
  pub control: Pubkey,
  pub beneficiary: Pubkey,
  pub fair_mint: Pubkey,
  pub currency_mint: Pubkey,
  pub init_reserve: u64,
  pub init_goal: u64,
  pub phase: DatPhase,
  pub timestamp: i64,
}

#[event]
pub struct TokensBought {
  pub buyer: Pubkey,
  pub currency_paid: u64,
  pub fair_minted: u64,
  pub to_reserve: u64,
  pub to_beneficiary: u64,
  pub init_investment: u64,
  pub new_total_supply: u64,
  pub new_buyback_reserve: u64,
  pub timestamp: i64,
}

#[event]
pub struct TokensSold {
  pub seller: Pubkey,
  pub caller: Pubkey,
  pub fair_burned: u64,
  pub currency_received: u64,
  pub phase: DatPhase,
  pub init_investment: u64,
  pub new_total_supply: u64,
  pub new_buyback_reserve: u64,
  pub timestamp: i64,
}

#[event]
pub struct PhaseChanged {
  pub authority: Pubkey,
  pub old_phase: DatPhase,
  pub new_phase: DatPhase,
  pub timestamp: i64,
}

#[event]
pub struct ReserveDisbursed {
  pub beneficiary: Pubkey,
  pub amount: u64,
  pub timestamp: i64,
}
