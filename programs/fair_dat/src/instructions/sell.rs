//! Sell instruction - redeems FAIR against the buyback reserve
//! Seller burns FAIR and receives currency from the vault at the current sell value

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{self, Burn, Mint, TokenAccount, TokenInterface, TransferChecked};

use crate::error::DatError;
use crate::events::TokensSold;
use crate::investment::checked_consume;
use crate::invariants::*;
use crate::lifecycle::DatPhase;
use crate::constants::*;
use crate::state::*;

/// Inputs of a sell, with caller identity passed explicitly
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SellRequest {
  /// Owner of the FAIR being sold; receives the currency
  pub seller: Pubkey,
  /// Signer of the transaction
  pub caller: Pubkey,
  pub amount: u64,
  pub min_value: u64,
  /// Seller's FAIR balance as reported by the ledger
  pub seller_balance: u64,
}

/// Fully validated outcome of a sell, applied by `commit_sell`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SellSettlement {
  pub seller: Pubkey,
  pub amount: u64,
  pub value: u64,
  pub phase: DatPhase,
  pub new_total_supply: u64,
  pub new_buyback_reserve: u64,
  pub new_init_investment: u64,
}

/// Whether this sell must be reconciled against the seller's init investment
/// Only the cancel path is gated, and the beneficiary's treasury is exempt
pub fn consumes_init_investment(state: &DatState, seller: &Pubkey) -> bool {
  state.phase == DatPhase::Cancel && !state.is_beneficiary(seller)
}

/// Validate a sell against pre-mutation state and compute every new value
///
/// Nothing is mutated here; the first failing check wins, in order:
/// phase, caller, amount, balance, price, slippage, init investment, reserve.
pub fn settle_sell(
  state: &DatState,
  record: &InvestorRecord,
  request: &SellRequest,
) -> Result<SellSettlement> {
  require!(state.phase.accepts_sells(), DatError::InvalidState);
  // the beneficiary's treasury goes through the same check as any holder
  require!(request.caller == request.seller, DatError::Unauthorized);
  require!(request.amount > 0, DatError::ZeroAmount);
  require!(request.amount <= request.seller_balance, DatError::InsufficientBalance);
  require!(
    record.investor == Pubkey::default() || record.investor == request.seller,
    DatError::InvalidParameter
  );

  let value = state.estimate_sell_value(request.amount)?;

  // Inclusive: min_value == value is accepted
  require!(value >= request.min_value, DatError::PriceSlippage);

  let new_init_investment = if consumes_init_investment(state, &request.seller) {
    checked_consume(record.init_investment, request.amount)?
  } else {
    record.init_investment
  };

  let new_total_supply = debit_total_supply(state.total_supply, request.amount)?;
  let new_buyback_reserve = debit_buyback_reserve(state.buyback_reserve, value)?;

  let pro_rata = state.pro_rata_value(request.amount)?;
  assert_sell_within_pro_rata(state.phase, value, pro_rata)?;
  assert_backing_not_diluted(
    state.buyback_reserve,
    state.total_supply,
    new_buyback_reserve,
    new_total_supply,
  )?;

  Ok(SellSettlement {
    seller: request.seller,
    amount: request.amount,
    value,
    phase: state.phase,
    new_total_supply,
    new_buyback_reserve,
    new_init_investment,
  })
}

/// Apply a settlement; infallible so no partial update can be observed
pub fn commit_sell(state: &mut DatState, record: &mut InvestorRecord, settlement: &SellSettlement) {
  state.total_supply = settlement.new_total_supply;
  state.buyback_reserve = settlement.new_buyback_reserve;
  record.init_investment = settlement.new_init_investment;
}

pub fn handler(
  ctx: Context<Sell>,
  amount: u64,
  min_value: u64,
) -> Result<()> {
  let seller = ctx.accounts.seller_fair_account.owner;
  let caller = ctx.accounts.caller.key();

  let request = SellRequest {
    seller,
    caller,
    amount,
    min_value,
    seller_balance: ctx.accounts.seller_fair_account.amount,
  };

  msg!("FAIR to sell: {} (seller {}, caller {})", amount, seller, caller);

  // All validations before any state changes
  let settlement = settle_sell(&ctx.accounts.dat_state, &ctx.accounts.investor_record, &request)?;

  require!(
    ctx.accounts.vault.amount >= settlement.value,
    DatError::InsufficientReserve
  );

  msg!("Sell value: {} (min {})", settlement.value, min_value);

  // Update state BEFORE external calls
  {
    ctx.accounts.investor_record.bind(seller, ctx.bumps.investor_record);
    commit_sell(&mut ctx.accounts.dat_state, &mut ctx.accounts.investor_record, &settlement);
    msg!(
      "State updated: supply={}, reserve={}, init_investment={}",
      settlement.new_total_supply,
      settlement.new_buyback_reserve,
      settlement.new_init_investment
    );
  }

  // Burn FAIR from seller
  let burn_accounts = Burn {
    mint: ctx.accounts.fair_mint.to_account_info(),
    from: ctx.accounts.seller_fair_account.to_account_info(),
    authority: ctx.accounts.caller.to_account_info(),
  };

  let cpi_ctx_burn = CpiContext::new(
    ctx.accounts.token_program.to_account_info(),
    burn_accounts,
  );

  token_interface::burn(cpi_ctx_burn, amount)?;
  msg!("Burned {} FAIR from seller", amount);

  // Pay the seller out of the vault
  if settlement.value > 0 {
    let seeds = &[VAULT_AUTHORITY_SEED, &[ctx.accounts.dat_state.vault_authority_bump]];
    let signer = &[&seeds[..]];

    let transfer_accounts = TransferChecked {
      from: ctx.accounts.vault.to_account_info(),
      mint: ctx.accounts.currency_mint.to_account_info(),
      to: ctx.accounts.seller_currency_account.to_account_info(),
      authority: ctx.accounts.vault_authority.to_account_info(),
    };

    let cpi_ctx_transfer = CpiContext::new_with_signer(
      ctx.accounts.token_program.to_account_info(),
      transfer_accounts,
      signer,
    );

    token_interface::transfer_checked(
      cpi_ctx_transfer,
      settlement.value,
      ctx.accounts.currency_mint.decimals,
    )?;
    msg!("Transferred {} currency to seller", settlement.value);
  }

  ctx.accounts.vault.reload()?;
  ctx.accounts.fair_mint.reload()?;

  assert_supply_reconciled(ctx.accounts.fair_mint.supply, ctx.accounts.dat_state.total_supply)?;
  assert_vault_covers_reserve(ctx.accounts.vault.amount, ctx.accounts.dat_state.buyback_reserve)?;

  emit!(TokensSold {
    seller,
    caller,
    fair_burned: amount,
    currency_received: settlement.value,
    phase: settlement.phase,
    init_investment: settlement.new_init_investment,
    new_total_supply: settlement.new_total_supply,
    new_buyback_reserve: settlement.new_buyback_reserve,
    timestamp: ctx.accounts.clock.unix_timestamp,
  });

  Ok(())
}

#[derive(Accounts)]
pub struct Sell<'info> {
  #[account(mut)]
  pub caller: Signer<'info>,

  /// DatState PDA
  #[account(
    mut,
    seeds = [DAT_STATE_SEED],
    bump = dat_state.bump,
    has_one = fair_mint,
    has_one = currency_mint,
    has_one = vault,
  )]
  pub dat_state: Box<Account<'info, DatState>>,

  /// FAIR mint
  #[account(mut)]
  pub fair_mint: Box<InterfaceAccount<'info, Mint>>,

  /// FAIR account being sold from; its owner is the seller
  #[account(
    mut,
    token::mint = fair_mint,
  )]
  pub seller_fair_account: Box<InterfaceAccount<'info, TokenAccount>>,

  /// Seller's init-investment record, zero if it did not exist yet
  #[account(
    init_if_needed,
    payer = caller,
    space = InvestorRecord::LEN,
    seeds = [INVESTOR_SEED, seller_fair_account.owner.as_ref()],
    bump,
  )]
  pub investor_record: Box<Account<'info, InvestorRecord>>,

  /// Seller's currency account (receives the payout)
  #[account(
    mut,
    token::mint = currency_mint,
    constraint = seller_currency_account.owner == seller_fair_account.owner @ DatError::Unauthorized,
  )]
  pub seller_currency_account: Box<InterfaceAccount<'info, TokenAccount>>,

  pub currency_mint: Box<InterfaceAccount<'info, Mint>>,

  /// Buyback reserve vault (source of the payout)
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

  pub token_program: Interface<'info, TokenInterface>,
  pub system_program: Program<'info, System>,

  pub clock: Sysvar<'info, Clock>,
}
