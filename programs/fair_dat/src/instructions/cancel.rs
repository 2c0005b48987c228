//! Cancel instruction - control abandons the raise
//! From INIT or RUN; afterwards sells pay out the reserve strictly pro-rata

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::events::PhaseChanged;
use crate::lifecycle::DatPhase;
use crate::state::*;

/// Move the trust into CANCEL in-place
///
/// # Returns
/// The phase the trust was cancelled from
pub fn cancel_in_place(state: &mut DatState) -> Result<DatPhase> {
  let old_phase = state.phase;
  state.phase = old_phase.transition(DatPhase::Cancel)?;
  Ok(old_phase)
}

pub fn handler(ctx: Context<CancelDat>) -> Result<()> {
  let dat_state = &mut ctx.accounts.dat_state;
  let old_phase = cancel_in_place(dat_state)?;

  msg!("Trust cancelled (was {:?})", old_phase);
  msg!(
    "Reserve {} backs {} FAIR pro-rata",
    dat_state.buyback_reserve,
    dat_state.total_supply
  );

  emit!(PhaseChanged {
    authority: ctx.accounts.control.key(),
    old_phase,
    new_phase: DatPhase::Cancel,
    timestamp: ctx.accounts.clock.unix_timestamp,
  });

  Ok(())
}

#[derive(Accounts)]
pub struct CancelDat<'info> {
  pub control: Signer<'info>,

  #[account(
    mut,
    seeds = [DAT_STATE_SEED],
    bump = dat_state.bump,
    has_one = control,
  )]
  pub dat_state: Box<Account<'info, DatState>>,

  pub clock: Sysvar<'info, Clock>,
}
