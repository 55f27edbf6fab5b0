#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the owner configures the pool and funds the reward budget.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub owner: Address,
    pub total_cap: i128,
    pub reward_rate_bps: u32,
    pub epoch_duration: u64,
    pub epoch_count: u32,
    pub start_time: u64,
    pub reward_budget: i128,
    pub timestamp: u64,
}

/// Fired when an account deposits its principal.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositedEvent {
    pub account: Address,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired when an account takes its principal back after the schedule.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub account: Address,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired when an account claims its reward.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardClaimedEvent {
    pub account: Address,
    pub amount: i128,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(env: &Env, owner: Address, config: &crate::FarmingConfig) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            owner,
            total_cap: config.total_cap,
            reward_rate_bps: config.reward_rate_bps,
            epoch_duration: config.epoch_duration,
            epoch_count: config.epoch_count,
            start_time: config.start_time,
            reward_budget: config.reward_budget,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_deposited(env: &Env, account: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("DEPOSITED"), account.clone()),
        DepositedEvent {
            account,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_withdrawn(env: &Env, account: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("WITHDRAWN"), account.clone()),
        WithdrawnEvent {
            account,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_claimed(env: &Env, account: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("CLAIMED"), account.clone()),
        RewardClaimedEvent {
            account,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}
