//! Close instruction - beneficiary exits a running trust
//! Allowed once min_duration has passed; the whole buyback reserve is disbursed

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{self, Mint, TokenAccount, TokenInterface, TransferChecked};

use crate::constants::*;
use crate::error::DatError;
use crate::events::{PhaseChanged, ReserveDisbursed};
use crate::lifecycle::DatPhase;
use crate::state::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CloseSettlement {
  pub old_phase: DatPhase,
  pub disbursed: u64,
}

pub fn settle_close(state: &DatState, now: i64) -> Result<CloseSettlement> {
  // validates RUN -> CLOSE before looking at the clock
  state.phase.transition(DatPhase::Close)?;
  require!(now >= state.min_duration, DatError::TooEarly);

  Ok(CloseSettlement {
    old_phase: state.phase,
    disbursed: state.buyback_reserve,
  })
}

pub fn commit_close(state: &mut DatState) {
  state.phase = DatPhase::Close;
  state.buyback_reserve = 0;
}

pub fn handler(ctx: Context<CloseDat>) -> Result<()> {
  let now = ctx.accounts.clock.unix_timestamp;
  let settlement = settle_close(&ctx.accounts.dat_state, now)?;

  require!(
    ctx.accounts.vault.amount >= settlement.disbursed,
    DatError::VaultShortfall
  );

  commit_close(&mut ctx.accounts.dat_state);
  msg!("Trust closed, disbursing {} from reserve", settlement.disbursed);

  if settlement.disbursed > 0 {
    let seeds = &[VAULT_AUTHORITY_SEED, &[ctx.accounts.dat_state.vault_authority_bump]];
    let signer = &[&seeds[..]];

    let transfer_accounts = TransferChecked {
      from: ctx.accounts.vault.to_account_info(),
      mint: ctx.accounts.currency_mint.to_account_info(),
      to: ctx.accounts.beneficiary_currency_account.to_account_info(),
      authority: ctx.accounts.vault_authority.to_account_info(),
    };

    let cpi_ctx = CpiContext::new_with_signer(
      ctx.accounts.token_program.to_account_info(),
      transfer_accounts,
      signer,
    );

    token_interface::transfer_checked(cpi_ctx, settlement.disbursed, ctx.accounts.currency_mint.decimals)?;
  }

  let beneficiary = ctx.accounts.beneficiary.key();

  emit!(PhaseChanged {
    authority: beneficiary,
    old_phase: settlement.old_phase,
    new_phase: DatPhase::Close,
    timestamp: now,
  });

  emit!(ReserveDisbursed {
    beneficiary,
    amount: settlement.disbursed,
    timestamp: now,
  });

  Ok(())
}

#[derive(Accounts)]
pub struct CloseDat<'info> {
  pub beneficiary: Signer<'info>,

  #[account(
    mut,
    seeds = [DAT_STATE_SEED],
    bump = dat_state.bump,
    has_one = beneficiary,
    has_one = currency_mint,
    has_one = vault,
  )]
  pub dat_state: Box<Account<'info, DatState>>,

  pub currency_mint: Box<InterfaceAccount<'info, Mint>>,

  #[account(
    mut,
    token::mint = currency_mint,
    token::authority = vault_authority,
  )]
  pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

  /// CHECK: PDA validated by seeds
  #[account(
    seeds = [VAULT_AUTHORITY_SEED],
    bump = dat_state.vault_authority_bump,
  )]
  pub vault_authority: UncheckedAccount<'info>,

  #[account(
    mut,
    token::mint = currency_mint,
    token::authority = beneficiary,
  )]
  pub beneficiary_currency_account: Box<InterfaceAccount<'info, TokenAccount>>,

  pub token_program: Interface<'info, TokenInterface>,

  pub clock: Sysvar<'info, Clock>,
}
