#![allow(dead_code)]

use std::collections::HashMap;

use anchor_lang::prelude::*;
use fair_dat::constants::FAIR_PRECISION;
use fair_dat::error::DatError;
use fair_dat::instructions::buy::{commit_buy, settle_buy, BuyRequest, BuySettlement};
use fair_dat::instructions::cancel::cancel_in_place;
use fair_dat::instructions::close::{commit_close, settle_close, CloseSettlement};
use fair_dat::instructions::sell::{commit_sell, settle_sell, SellRequest, SellSettlement};
use fair_dat::lifecycle::DatPhase;
use fair_dat::state::{DatAccounts, DatConfig, DatState, InvestorRecord};

pub const INIT_RESERVE: u64 = 1_000 * FAIR_PRECISION;
pub const INIT_GOAL: u64 = 10_000 * FAIR_PRECISION;

/// Host-side model of a deployed trust
///
/// Plays the token ledger and the vault around the program's pure
/// settle/commit functions, the same order the handlers run them in.
#[derive(Clone, Debug, PartialEq)]
pub struct Trust {
    pub state: DatState,
    pub control: Pubkey,
    pub beneficiary: Pubkey,
    pub fair: HashMap<Pubkey, u64>,
    pub currency: HashMap<Pubkey, u64>,
    pub records: HashMap<Pubkey, InvestorRecord>,
    pub vault: u64,
}

impl Trust {
    pub fn deploy(config: DatConfig) -> Self {
        config.validate().unwrap();

        let control = Pubkey::new_unique();
        let beneficiary = Pubkey::new_unique();
        let accounts = DatAccounts {
            control,
            beneficiary,
            fair_mint: Pubkey::new_unique(),
            currency_mint: Pubkey::new_unique(),
            vault: Pubkey::new_unique(),
        };

        let mut fair = HashMap::new();
        if config.init_reserve > 0 {
            fair.insert(beneficiary, config.init_reserve);
        }

        Self {
            state: DatState::new(accounts, &config, 255, 254),
            control,
            beneficiary,
            fair,
            currency: HashMap::new(),
            records: HashMap::new(),
            vault: 0,
        }
    }

    /// Trust with the default config, a 1000 FAIR init reserve and a goal
    /// high enough that a handful of buys stays in INIT
    pub fn with_init_reserve() -> Self {
        Self::deploy(DatConfig {
            init_reserve: INIT_RESERVE,
            init_goal: INIT_GOAL,
            ..DatConfig::default()
        })
    }

    pub fn new_investor(&mut self, currency: u64) -> Pubkey {
        let investor = Pubkey::new_unique();
        self.currency.insert(investor, currency);
        investor
    }

    pub fn fair_balance(&self, who: &Pubkey) -> u64 {
        self.fair.get(who).copied().unwrap_or(0)
    }

    pub fn currency_balance(&self, who: &Pubkey) -> u64 {
        self.currency.get(who).copied().unwrap_or(0)
    }

    pub fn init_investment(&self, who: &Pubkey) -> u64 {
        InvestorRecord::init_investment_or_zero(self.records.get(who))
    }

    fn record_for(&self, who: &Pubkey) -> InvestorRecord {
        self.records.get(who).cloned().unwrap_or_default()
    }

    pub fn buy(&mut self, buyer: Pubkey, currency_amount: u64) -> Result<BuySettlement> {
        require!(
            self.currency_balance(&buyer) >= currency_amount,
            DatError::InsufficientBalance
        );

        let request = BuyRequest {
            buyer,
            currency_amount,
            min_tokens_out: 0,
        };
        let mut record = self.record_for(&buyer);
        let settlement = settle_buy(&self.state, &record, &request)?;

        record.bind(buyer, 253);
        commit_buy(&mut self.state, &mut record, &settlement);
        self.records.insert(buyer, record);

        *self.currency.entry(buyer).or_default() -= currency_amount;
        *self.currency.entry(self.beneficiary).or_default() += settlement.to_beneficiary;
        self.vault += settlement.to_reserve;
        *self.fair.entry(buyer).or_default() += settlement.tokens;

        Ok(settlement)
    }

    pub fn sell_as(
        &mut self,
        caller: Pubkey,
        seller: Pubkey,
        amount: u64,
        min_value: u64,
    ) -> Result<SellSettlement> {
        let request = SellRequest {
            seller,
            caller,
            amount,
            min_value,
            seller_balance: self.fair_balance(&seller),
        };
        let mut record = self.record_for(&seller);
        let settlement = settle_sell(&self.state, &record, &request)?;

        require!(self.vault >= settlement.value, DatError::InsufficientReserve);

        record.bind(seller, 253);
        commit_sell(&mut self.state, &mut record, &settlement);
        self.records.insert(seller, record);

        *self.fair.entry(seller).or_default() -= amount;
        self.vault -= settlement.value;
        *self.currency.entry(seller).or_default() += settlement.value;

        Ok(settlement)
    }

    pub fn sell(&mut self, seller: Pubkey, amount: u64, min_value: u64) -> Result<SellSettlement> {
        self.sell_as(seller, seller, amount, min_value)
    }

    pub fn estimate(&self, amount: u64) -> Result<u64> {
        self.state.estimate_sell_value(amount)
    }

    /// Plain FAIR transfer; the trust does not observe it
    pub fn transfer(&mut self, from: Pubkey, to: Pubkey, amount: u64) {
        let balance = self.fair_balance(&from);
        assert!(balance >= amount, "transfer exceeds balance");
        self.fair.insert(from, balance - amount);
        *self.fair.entry(to).or_default() += amount;
    }

    pub fn cancel(&mut self) -> Result<DatPhase> {
        cancel_in_place(&mut self.state)
    }

    pub fn close(&mut self, now: i64) -> Result<CloseSettlement> {
        let settlement = settle_close(&self.state, now)?;
        commit_close(&mut self.state);

        self.vault -= settlement.disbursed;
        *self.currency.entry(self.beneficiary).or_default() += settlement.disbursed;

        Ok(settlement)
    }

    pub fn holders(&self) -> Vec<Pubkey> {
        let mut holders: Vec<Pubkey> = self
            .fair
            .iter()
            .filter(|(_, balance)| **balance > 0)
            .map(|(key, _)| *key)
            .collect();
        holders.sort();
        holders
    }

    pub fn assert_books_balance(&self) {
        let ledger_supply: u64 = self.fair.values().sum();
        assert_eq!(ledger_supply, self.state.total_supply, "ledger vs total_supply");
        assert_eq!(self.vault, self.state.buyback_reserve, "vault vs buyback_reserve");
    }
}

pub fn assert_dat_error<T: std::fmt::Debug>(result: Result<T>, expected: DatError) {
    let err = result.expect_err("operation should have failed");
    assert_eq!(err, anchor_lang::error::Error::from(expected));
}

pub fn xorshift64(seed: &mut u64) -> u64 {
    let mut x = *seed;
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    *seed = x;
    x
}

pub fn rand_range(seed: &mut u64, lo: u64, hi: u64) -> u64 {
    if hi <= lo {
        return lo;
    }
    lo + (xorshift64(seed) % (hi - lo + 1))
}
