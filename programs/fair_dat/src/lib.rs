use anchor_lang::prelude::*;

pub mod constants;
pub mod math;
pub mod lifecycle;
pub mod pricing;
pub mod investment;
pub mod invariants;
pub mod state;
pub mod events;
pub mod instructions;
pub mod error;

use instructions::*;
use state::DatConfig;

declare_id!("FA1RdAT7nVq3pYh2kWm9sT4xLc6bZgE5uJ8oRi1NvKd");

#[program]
pub mod fair_dat {
    use super::*;

    pub fn initialize(
        ctx: Context<Initialize>,
        config: DatConfig,
    ) -> Result<()> {
        instructions::initialize::handler(ctx, config)
    }

    /// Buy FAIR with collateral currency
    pub fn buy(
        ctx: Context<Buy>,
        currency_amount: u64,
        min_tokens_out: u64,
    ) -> Result<()> {
        instructions::buy::handler(ctx, currency_amount, min_tokens_out)
    }

    /// Sell FAIR back to the buyback reserve
    pub fn sell(
        ctx: Context<Sell>,
        amount: u64,
        min_value: u64,
    ) -> Result<()> {
        instructions::sell::handler(ctx, amount, min_value)
    }

    pub fn estimate_sell_value(
        ctx: Context<EstimateSellValue>,
        amount: u64,
    ) -> Result<u64> {
        instructions::estimate_sell_value::handler(ctx, amount)
    }

    pub fn cancel(ctx: Context<CancelDat>) -> Result<()> {
        instructions::cancel::handler(ctx)
    }

    pub fn close(ctx: Context<CloseDat>) -> Result<()> {
        instructions::close::handler(ctx)
    }
}
