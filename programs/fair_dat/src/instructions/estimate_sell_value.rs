//! estimate_sell_value instruction - read-only price quote
//! Returns the currency a sell of `amount` would pay against current state

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::state::*;

pub fn handler(ctx: Context<EstimateSellValue>, amount: u64) -> Result<u64> {
  let dat_state = &ctx.accounts.dat_state;
  let value = dat_state.estimate_sell_value(amount)?;

  msg!("Estimated sell value for {} FAIR: {} ({:?})", amount, value, dat_state.phase);

  Ok(value)
}

#[derive(Accounts)]
pub struct EstimateSellValue<'info> {
  #[account(
    seeds = [DAT_STATE_SEED],
    bump = dat_state.bump,
  )]
  pub dat_state: Box<Account<'info, DatState>>,
}
