//! Buy instruction - investor pays currency and receives FAIR at the flat buy price
//! INIT buys credit the investor's init investment; INIT moves to RUN once the goal is met

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{self, Mint, MintTo, TokenAccount, TokenInterface, TransferChecked};

use crate::constants::*;
use crate::error::DatError;
use crate::events::{PhaseChanged, TokensBought};
use crate::investment::checked_record;
use crate::invariants::*;
use crate::lifecycle::DatPhase;
use crate::math::{mul_div_down, split_bps};
use crate::state::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuyRequest {
  pub buyer: Pubkey,
  pub currency_amount: u64,
  pub min_tokens_out: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuySettlement {
  pub buyer: Pubkey,
  pub tokens: u64,
  pub to_reserve: u64,
  pub to_beneficiary: u64,
  pub old_phase: DatPhase,
  pub new_phase: DatPhase,
  pub new_total_supply: u64,
  pub new_buyback_reserve: u64,
  pub new_init_investment: u64,
}

/// FAIR bought for `currency_amount` at `buy_price` currency per whole FAIR
pub fn tokens_for_currency(currency_amount: u64, buy_price: u64) -> Option<u64> {
  mul_div_down(currency_amount, FAIR_PRECISION, buy_price)
}

pub fn settle_buy(
  state: &DatState,
  record: &InvestorRecord,
  request: &BuyRequest,
) -> Result<BuySettlement> {
  require!(state.phase.accepts_buys(), DatError::InvalidState);
  require!(request.currency_amount > 0, DatError::ZeroAmount);
  require!(
    record.investor == Pubkey::default() || record.investor == request.buyer,
    DatError::InvalidParameter
  );

  let tokens = tokens_for_currency(request.currency_amount, state.buy_price)
    .ok_or(DatError::MathOverflow)?;

  require!(tokens > 0, DatError::AmountTooSmall);
  require!(tokens >= request.min_tokens_out, DatError::PriceSlippage);

  // INIT keeps every unit for refunds; RUN splits with the beneficiary
  let (to_reserve, to_beneficiary) = match state.phase {
    DatPhase::Init => (request.currency_amount, 0),
    _ => split_bps(request.currency_amount, state.investment_reserve_bps)
      .ok_or(DatError::MathOverflow)?,
  };

  let new_total_supply = state.total_supply
    .checked_add(tokens)
    .ok_or(DatError::MathOverflow)?;

  let new_buyback_reserve = state.buyback_reserve
    .checked_add(to_reserve)
    .ok_or(DatError::MathOverflow)?;

  // only the INIT distribution is an at-cost tranche
  let new_init_investment = if state.phase == DatPhase::Init {
    checked_record(record.init_investment, tokens)?
  } else {
    record.init_investment
  };

  let sold = state.sold_supply().saturating_add(tokens);
  let new_phase = if state.phase == DatPhase::Init && sold >= state.init_goal {
    state.phase.transition(DatPhase::Run)?
  } else {
    state.phase
  };

  Ok(BuySettlement {
    buyer: request.buyer,
    tokens,
    to_reserve,
    to_beneficiary,
    old_phase: state.phase,
    new_phase,
    new_total_supply,
    new_buyback_reserve,
    new_init_investment,
  })
}

pub fn commit_buy(state: &mut DatState, record: &mut InvestorRecord, settlement: &BuySettlement) {
  state.total_supply = settlement.new_total_supply;
  state.buyback_reserve = settlement.new_buyback_reserve;
  state.phase = settlement.new_phase;
  record.init_investment = settlement.new_init_investment;
}

pub fn handler(
  ctx: Context<Buy>,
  currency_amount: u64,
  min_tokens_out: u64,
) -> Result<()> {
  let buyer = ctx.accounts.buyer.key();

  let request = BuyRequest {
    buyer,
    currency_amount,
    min_tokens_out,
  };

  require!(
    ctx.accounts.buyer_currency_account.amount >= currency_amount,
    DatError::InsufficientBalance
  );

  let settlement = settle_buy(&ctx.accounts.dat_state, &ctx.accounts.investor_record, &request)?;

  msg!("Currency paid: {}", currency_amount);
  msg!("FAIR to mint: {}", settlement.tokens);
  msg!("To reserve: {}, to beneficiary: {}", settlement.to_reserve, settlement.to_beneficiary);

  // Update state BEFORE external calls
  {
    ctx.accounts.investor_record.bind(buyer, ctx.bumps.investor_record);
    commit_buy(&mut ctx.accounts.dat_state, &mut ctx.accounts.investor_record, &settlement);
  }

  let decimals = ctx.accounts.currency_mint.decimals;

  if settlement.to_reserve > 0 {
    let transfer_accounts = TransferChecked {
      from: ctx.accounts.buyer_currency_account.to_account_info(),
      mint: ctx.accounts.currency_mint.to_account_info(),
      to: ctx.accounts.vault.to_account_info(),
      authority: ctx.accounts.buyer.to_account_info(),
    };

    let cpi_ctx = CpiContext::new(
      ctx.accounts.token_program.to_account_info(),
      transfer_accounts,
    );

    token_interface::transfer_checked(cpi_ctx, settlement.to_reserve, decimals)?;
    msg!("Transferred {} currency to vault", settlement.to_reserve);
  }

  if settlement.to_beneficiary > 0 {
    let transfer_accounts = TransferChecked {
      from: ctx.accounts.buyer_currency_account.to_account_info(),
      mint: ctx.accounts.currency_mint.to_account_info(),
      to: ctx.accounts.beneficiary_currency_account.to_account_info(),
      authority: ctx.accounts.buyer.to_account_info(),
    };

    let cpi_ctx = CpiContext::new(
      ctx.accounts.token_program.to_account_info(),
      transfer_accounts,
    );

    token_interface::transfer_checked(cpi_ctx, settlement.to_beneficiary, decimals)?;
    msg!("Transferred {} currency to beneficiary", settlement.to_beneficiary);
  }

  // Mint FAIR to buyer
  let seeds = &[DAT_STATE_SEED, &[ctx.bumps.dat_state]];
  let signer = &[&seeds[..]];

  let mint_accounts = MintTo {
    mint: ctx.accounts.fair_mint.to_account_info(),
    to: ctx.accounts.buyer_fair_account.to_account_info(),
    authority: ctx.accounts.dat_state.to_account_info(),
  };

  let cpi_ctx_mint = CpiContext::new_with_signer(
    ctx.accounts.token_program.to_account_info(),
    mint_accounts,
    signer,
  );

  token_interface::mint_to(cpi_ctx_mint, settlement.tokens)?;
  msg!("Minted {} FAIR to buyer", settlement.tokens);

  ctx.accounts.vault.reload()?;
  ctx.accounts.fair_mint.reload()?;

  assert_supply_reconciled(ctx.accounts.fair_mint.supply, ctx.accounts.dat_state.total_supply)?;
  assert_vault_covers_reserve(ctx.accounts.vault.amount, ctx.accounts.dat_state.buyback_reserve)?;

  let timestamp = ctx.accounts.clock.unix_timestamp;

  if settlement.new_phase != settlement.old_phase {
    msg!("Init goal reached, trust is now running");
    emit!(PhaseChanged {
      authority: buyer,
      old_phase: settlement.old_phase,
      new_phase: settlement.new_phase,
      timestamp,
    });
  }

  emit!(TokensBought {
    buyer,
    currency_paid: currency_amount,
    fair_minted: settlement.tokens,
    to_reserve: settlement.to_reserve,
    to_beneficiary: settlement.to_beneficiary,
    init_investment: settlement.new_init_investment,
    new_total_supply: settlement.new_total_supply,
    new_buyback_reserve: settlement.new_buyback_reserve,
    timestamp,
  });

  Ok(())
}

#[derive(Accounts)]
pub struct Buy<'info> {
  #[account(mut)]
  pub buyer: Signer<'info>,

  /// DatState PDA (mint authority of FAIR)
  #[account(
    mut,
    seeds = [DAT_STATE_SEED],
    bump,
    has_one = fair_mint,
    has_one = currency_mint,
    has_one = vault,
    has_one = beneficiary,
  )]
  pub dat_state: Box<Account<'info, DatState>>,

  #[account(
    init_if_needed,
    payer = buyer,
    space = InvestorRecord::LEN,
    seeds = [INVESTOR_SEED, buyer.key().as_ref()],
    bump,
  )]
  pub investor_record: Box<Account<'info, InvestorRecord>>,

  /// FAIR mint
  #[account(
    mut,
    constraint = fair_mint.mint_authority == anchor_lang::solana_program::program_option::COption::Some(dat_state.key()) @ DatError::InvalidParameter,
  )]
  pub fair_mint: Box<InterfaceAccount<'info, Mint>>,

  /// Buyer's FAIR account (receives minted FAIR)
  #[account(
    mut,
    token::mint = fair_mint,
    token::authority = buyer,
  )]
  pub buyer_fair_account: Box<InterfaceAccount<'info, TokenAccount>>,

  /// Buyer's currency account (source of payment)
  #[account(
    mut,
    token::mint = currency_mint,
    token::authority = buyer,
  )]
  pub buyer_currency_account: Box<InterfaceAccount<'info, TokenAccount>>,

  pub currency_mint: Box<InterfaceAccount<'info, Mint>>,

  /// Buyback reserve vault
  #[account(mut)]
  pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

  /// CHECK: Verified by has_one constraint on dat_state
  pub beneficiary: UncheckedAccount<'info>,

  /// Beneficiary's currency account (receives the non-reserve share)
  #[account(
    mut,
    token::mint = currency_mint,
    token::authority = beneficiary,
  )]
  pub beneficiary_currency_account: Box<InterfaceAccount<'info, TokenAccount>>,

  pub token_program: Interface<'info, TokenInterface>,
  pub system_program: Program<'info, System>,

  pub clock: Sysvar<'info, Clock>,
}
