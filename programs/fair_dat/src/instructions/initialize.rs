//! Initialize instruction - deploys the trust
//! Creates DatState, the FAIR mint and the currency vault, then mints the init reserve

use anchor_lang::prelude::*;
use anchor_spl::{
  associated_token::AssociatedToken,
  token_interface::{self, Mint, MintTo, TokenAccount, TokenInterface},
};

use crate::constants::*;
use crate::events::DatInitialized;
use crate::state::*;

pub fn handler(ctx: Context<Initialize>, config: DatConfig) -> Result<()> {
  config.validate()?;

  let accounts = DatAccounts {
    control: ctx.accounts.control.key(),
    beneficiary: ctx.accounts.beneficiary.key(),
    fair_mint: ctx.accounts.fair_mint.key(),
    currency_mint: ctx.accounts.currency_mint.key(),
    vault: ctx.accounts.vault.key(),
  };

  let dat_state = &mut ctx.accounts.dat_state;
  dat_state.set_inner(DatState::new(
    accounts,
    &config,
    ctx.bumps.dat_state,
    ctx.bumps.vault_authority,
  ));

  msg!("Trust initialized!");
  msg!("FAIR mint: {}", accounts.fair_mint);
  msg!("Currency mint: {}", accounts.currency_mint);
  msg!("Beneficiary: {}", accounts.beneficiary);
  msg!("Init reserve: {}, init goal: {}", config.init_reserve, config.init_goal);
  msg!("Starting phase: {:?}", dat_state.phase);

  if config.init_reserve > 0 {
    let seeds = &[DAT_STATE_SEED, &[ctx.bumps.dat_state]];
    let signer = &[&seeds[..]];

    let mint_accounts = MintTo {
      mint: ctx.accounts.fair_mint.to_account_info(),
      to: ctx.accounts.beneficiary_fair_account.to_account_info(),
      authority: ctx.accounts.dat_state.to_account_info(),
    };

    let cpi_ctx = CpiContext::new_with_signer(
      ctx.accounts.token_program.to_account_info(),
      mint_accounts,
      signer,
    );

    token_interface::mint_to(cpi_ctx, config.init_reserve)?;
    msg!("Minted init reserve of {} FAIR to beneficiary", config.init_reserve);
  }

  emit!(DatInitialized {
    control: accounts.control,
    beneficiary: accounts.beneficiary,
    fair_mint: accounts.fair_mint,
    currency_mint: accounts.currency_mint,
    init_reserve: config.init_reserve,
    init_goal: config.init_goal,
    phase: config.initial_phase(),
    timestamp: ctx.accounts.clock.unix_timestamp,
  });

  Ok(())
}

#[derive(Accounts)]
pub struct Initialize<'info> {
  #[account(mut)]
  pub control: Signer<'info>,

  /// DatState PDA - stores supply, reserve and phase
  #[account(
    init,
    payer = control,
    space = DatState::LEN,
    seeds = [DAT_STATE_SEED],
    bump
  )]
  pub dat_state: Box<Account<'info, DatState>>,

  /// CHECK: Stored as beneficiary; only receives FAIR and currency
  pub beneficiary: UncheckedAccount<'info>,

  /// FAIR mint, controlled by the DatState PDA
  #[account(
    init,
    payer = control,
    mint::decimals = FAIR_DECIMALS,
    mint::authority = dat_state,
    mint::token_program = token_program,
  )]
  pub fair_mint: Box<InterfaceAccount<'info, Mint>>,

  /// Beneficiary's FAIR account (receives the init reserve)
  #[account(
    init,
    payer = control,
    associated_token::mint = fair_mint,
    associated_token::authority = beneficiary,
    associated_token::token_program = token_program,
  )]
  pub beneficiary_fair_account: Box<InterfaceAccount<'info, TokenAccount>>,

  /// Collateral currency accepted by the trust
  pub currency_mint: Box<InterfaceAccount<'info, Mint>>,

  /// CHECK: PDA will be validated by the seeds
  #[account(
    seeds = [VAULT_AUTHORITY_SEED],
    bump
  )]
  pub vault_authority: UncheckedAccount<'info>,

  /// Buyback reserve vault
  /// Deterministic ATA owned by vault_authority PDA
  #[account(
    init,
    payer = control,
    associated_token::mint = currency_mint,
    associated_token::authority = vault_authority,
    associated_token::token_program = token_program,
  )]
  pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

  pub token_program: Interface<'info, TokenInterface>,
  pub associated_token_program: Program<'info, AssociatedToken>,
  pub system_program: Program<'info, System>,

  pub clock: Sysvar<'info, Clock>,
}
