#![no_std]

pub mod events;
pub mod rewards;

use soroban_sdk::{
    contract, contractimpl, contracttype, panic_with_error, symbol_short, token, Address, Env,
    Symbol,
};

// ── Storage key constants ────────────────────────────────────────────────────

const OWNER: Symbol = symbol_short!("OWNER");
const STAKE_TOKEN: Symbol = symbol_short!("STK_TOK");
const REWARD_TOKEN: Symbol = symbol_short!("RWD_TOK");
const CONFIG: Symbol = symbol_short!("CONFIG");
const TOTAL_DEPOSITED: Symbol = symbol_short!("TOT_DEP");
const TOTAL_WITHDRAWN: Symbol = symbol_short!("TOT_WDR");
const TOTAL_CLAIMED: Symbol = symbol_short!("TOT_CLM");

// Per-account persistent storage uses tuple keys:  (prefix, account)
const USER_DEPOSIT: Symbol = symbol_short!("DEPOSIT");

const TTL_THRESHOLD: u32 = 518_400;
const TTL_EXTEND_TO: u32 = 3_110_400;

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidParameter = 4,
    InsufficientAllowance = 5,
    InsufficientBalance = 6,
    AlreadyDeposited = 7,
    NoDeposit = 8,
    AlreadyWithdrawn = 9,
    AlreadyClaimed = 10,
    CapExceeded = 11,
    ScheduleNotElapsed = 12,
    TokensIdentical = 13,
}

// ── Public-facing types (re-exported for test consumers) ─────────────────────

/// Pool parameters fixed by `initialize`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FarmingConfig {
    /// Ceiling on cumulative principal; also the base of the reward budget.
    pub total_cap: i128,
    /// Reward per epoch in basis points (0–10 000).
    pub reward_rate_bps: u32,
    /// Seconds per epoch.
    pub epoch_duration: u64,
    pub epoch_count: u32,
    /// Absolute ledger timestamp at which the schedule begins.
    pub start_time: u64,
    /// Reward tokens pulled from the owner at initialization.
    pub reward_budget: i128,
}

/// One account's single deposit slot.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositRecord {
    pub principal: i128,
    pub withdrawn: bool,
    pub claimed: bool,
    pub deposited_at: u64,
}

/// Snapshot of an account's position returned by `get_position`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PositionInfo {
    pub principal: i128,
    /// Reward owed once the schedule has elapsed (paid or not).
    pub reward: i128,
    pub withdrawn: bool,
    pub claimed: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolTotals {
    pub total_deposited: i128,
    pub total_withdrawn: i128,
    pub total_claimed: i128,
    pub remaining_capacity: i128,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct FarmingContract;

#[contractimpl]
impl FarmingContract {
    // ── Deployment ──────────────────────────────────────────────────────────

    /// Fix the owner and the token pair for the lifetime of the contract.
    ///
    /// * `owner`        – the only address allowed to call `initialize`.
    /// * `stake_token`  – SAC address of the token users deposit.
    /// * `reward_token` – SAC address of the token paid out as rewards.
    pub fn __constructor(env: Env, owner: Address, stake_token: Address, reward_token: Address) {
        if stake_token == reward_token {
            panic_with_error!(&env, ContractError::TokensIdentical);
        }

        env.storage().instance().set(&OWNER, &owner);
        env.storage().instance().set(&STAKE_TOKEN, &stake_token);
        env.storage().instance().set(&REWARD_TOKEN, &reward_token);
        extend_instance_ttl(&env);
    }

    // ── Initialisation ──────────────────────────────────────────────────────

    /// Configure the schedule and pull the reward budget from the owner.
    ///
    /// * `total_cap`       – maximum cumulative principal the pool accepts.
    /// * `reward_rate_bps` – reward per epoch, 0 to 10 000 inclusive.
    /// * `epoch_duration`  – seconds per epoch.
    /// * `epoch_count`     – number of epochs in the schedule.
    /// * `start_time`      – absolute ledger timestamp the schedule starts at.
    ///
    /// The owner must have approved this contract for at least
    /// `total_cap × reward_rate_bps × epoch_count / 10_000` reward tokens.
    pub fn initialize(
        env: Env,
        caller: Address,
        total_cap: i128,
        reward_rate_bps: u32,
        epoch_duration: u64,
        epoch_count: u32,
        start_time: u64,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        let owner = Self::require_owner(&env, &caller)?;

        if env.storage().instance().has(&CONFIG) {
            return Err(ContractError::AlreadyInitialized);
        }
        if !rewards::params_in_range(total_cap, reward_rate_bps, epoch_duration, epoch_count) {
            return Err(ContractError::InvalidParameter);
        }
        let reward_budget = rewards::reward_for(total_cap, reward_rate_bps, epoch_count)
            .ok_or(ContractError::InvalidParameter)?;
        rewards::schedule_end(start_time, epoch_duration, epoch_count)
            .ok_or(ContractError::InvalidParameter)?;

        let reward_token = token::Client::new(&env, &Self::reward_token_address(&env)?);
        ensure_pullable(&env, &reward_token, &owner, reward_budget)?;

        let config = FarmingConfig {
            total_cap,
            reward_rate_bps,
            epoch_duration,
            epoch_count,
            start_time,
            reward_budget,
        };
        env.storage().instance().set(&CONFIG, &config);
        extend_instance_ttl(&env);

        if reward_budget > 0 {
            reward_token.transfer_from(
                &env.current_contract_address(),
                &owner,
                &env.current_contract_address(),
                &reward_budget,
            );
        }

        events::publish_initialized(&env, owner, &config);

        Ok(())
    }

    // ── Deposits ────────────────────────────────────────────────────────────

    /// Deposit `amount` stake tokens. Each account gets exactly one deposit.
    ///
    /// The cap is cumulative across all accounts and is never released by
    /// withdrawals, so the budget pulled at initialization always covers
    /// every entitlement.
    pub fn deposit(env: Env, account: Address, amount: i128) -> Result<(), ContractError> {
        account.require_auth();
        let config = load_config(&env)?;

        if load_deposit(&env, &account).is_some() {
            return Err(ContractError::AlreadyDeposited);
        }
        if amount <= 0 {
            return Err(ContractError::InvalidParameter);
        }

        let prev_total: i128 = env.storage().instance().get(&TOTAL_DEPOSITED).unwrap_or(0);
        let new_total = prev_total
            .checked_add(amount)
            .ok_or(ContractError::CapExceeded)?;
        if amount > config.total_cap || new_total > config.total_cap {
            return Err(ContractError::CapExceeded);
        }

        let stake_token = token::Client::new(&env, &Self::stake_token_address(&env)?);
        ensure_pullable(&env, &stake_token, &account, amount)?;

        // Effects before the token call.
        let record = DepositRecord {
            principal: amount,
            withdrawn: false,
            claimed: false,
            deposited_at: env.ledger().timestamp(),
        };
        store_deposit(&env, &account, &record);
        env.storage().instance().set(&TOTAL_DEPOSITED, &new_total);
        extend_instance_ttl(&env);

        stake_token.transfer_from(
            &env.current_contract_address(),
            &account,
            &env.current_contract_address(),
            &amount,
        );

        events::publish_deposited(&env, account, amount);

        Ok(())
    }

    // ── Withdrawals ─────────────────────────────────────────────────────────

    /// Return the account's principal once the schedule has elapsed.
    ///
    /// Independent of `claim_rewards`; the reward is not paid here.
    pub fn withdraw(env: Env, account: Address) -> Result<i128, ContractError> {
        account.require_auth();
        let config = load_config(&env)?;

        let mut record = load_deposit(&env, &account).ok_or(ContractError::NoDeposit)?;
        Self::require_schedule_elapsed(&env, &config)?;
        if record.withdrawn {
            return Err(ContractError::AlreadyWithdrawn);
        }

        // Mark as withdrawn before transfer (checks-effects-interactions).
        record.withdrawn = true;
        store_deposit(&env, &account, &record);
        bump_total(&env, &TOTAL_WITHDRAWN, record.principal);

        let stake_token = Self::stake_token_address(&env)?;
        token::Client::new(&env, &stake_token).transfer(
            &env.current_contract_address(),
            &account,
            &record.principal,
        );

        events::publish_withdrawn(&env, account, record.principal);

        Ok(record.principal)
    }

    // ── Rewards ─────────────────────────────────────────────────────────────

    /// Pay the account's fixed reward once the schedule has elapsed.
    ///
    /// A zero reward (rate 0 or truncated to nothing) still consumes the claim.
    pub fn claim_rewards(env: Env, account: Address) -> Result<i128, ContractError> {
        account.require_auth();
        let config = load_config(&env)?;

        let mut record = load_deposit(&env, &account).ok_or(ContractError::NoDeposit)?;
        Self::require_schedule_elapsed(&env, &config)?;
        if record.claimed {
            return Err(ContractError::AlreadyClaimed);
        }

        let reward =
            rewards::reward_for(record.principal, config.reward_rate_bps, config.epoch_count)
                .ok_or(ContractError::InvalidParameter)?;

        record.claimed = true;
        store_deposit(&env, &account, &record);
        bump_total(&env, &TOTAL_CLAIMED, reward);

        if reward > 0 {
            let reward_token = Self::reward_token_address(&env)?;
            token::Client::new(&env, &reward_token).transfer(
                &env.current_contract_address(),
                &account,
                &reward,
            );
        }

        events::publish_reward_claimed(&env, account, reward);

        Ok(reward)
    }

    // ── View functions ───────────────────────────────────────────────────────

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&CONFIG)
    }

    pub fn get_owner(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&OWNER)
            .ok_or(ContractError::NotInitialized)
    }

    pub fn get_stake_token(env: Env) -> Result<Address, ContractError> {
        Self::stake_token_address(&env)
    }

    pub fn get_reward_token(env: Env) -> Result<Address, ContractError> {
        Self::reward_token_address(&env)
    }

    pub fn get_config(env: Env) -> Result<FarmingConfig, ContractError> {
        load_config(&env)
    }

    /// Reward tokens reserved at initialization, or 0 before it.
    pub fn get_reward_budget(env: Env) -> i128 {
        load_config(&env).map(|c| c.reward_budget).unwrap_or(0)
    }

    /// Timestamp from which `withdraw` and `claim_rewards` are accepted.
    pub fn get_schedule_end(env: Env) -> Result<u64, ContractError> {
        let config = load_config(&env)?;
        config_schedule_end(&config)
    }

    pub fn is_schedule_elapsed(env: Env) -> bool {
        match load_config(&env).and_then(|c| config_schedule_end(&c)) {
            Ok(end) => env.ledger().timestamp() >= end,
            Err(_) => false,
        }
    }

    /// Return the raw deposit record for `account`, if it ever deposited.
    pub fn get_deposit(env: Env, account: Address) -> Option<DepositRecord> {
        load_deposit(&env, &account)
    }

    /// Return the account's principal together with its computed reward.
    pub fn get_position(env: Env, account: Address) -> Result<PositionInfo, ContractError> {
        let config = load_config(&env)?;
        let record = load_deposit(&env, &account).ok_or(ContractError::NoDeposit)?;
        let reward =
            rewards::reward_for(record.principal, config.reward_rate_bps, config.epoch_count)
                .ok_or(ContractError::InvalidParameter)?;

        Ok(PositionInfo {
            principal: record.principal,
            reward,
            withdrawn: record.withdrawn,
            claimed: record.claimed,
        })
    }

    /// Return the pool-wide running totals.
    pub fn get_pool_totals(env: Env) -> PoolTotals {
        let total_deposited: i128 = env.storage().instance().get(&TOTAL_DEPOSITED).unwrap_or(0);
        let total_cap = load_config(&env).map(|c| c.total_cap).unwrap_or(0);

        PoolTotals {
            total_deposited,
            total_withdrawn: env.storage().instance().get(&TOTAL_WITHDRAWN).unwrap_or(0),
            total_claimed: env.storage().instance().get(&TOTAL_CLAIMED).unwrap_or(0),
            remaining_capacity: total_cap.saturating_sub(total_deposited).max(0),
        }
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    /// Guard: revert if `caller` is not the owner fixed at construction.
    fn require_owner(env: &Env, caller: &Address) -> Result<Address, ContractError> {
        let owner: Address = env
            .storage()
            .instance()
            .get(&OWNER)
            .ok_or(ContractError::NotInitialized)?;
        if *caller != owner {
            return Err(ContractError::Unauthorized);
        }
        Ok(owner)
    }

    /// Guard: revert until `start_time + epoch_duration × epoch_count`.
    fn require_schedule_elapsed(env: &Env, config: &FarmingConfig) -> Result<(), ContractError> {
        if env.ledger().timestamp() < config_schedule_end(config)? {
            return Err(ContractError::ScheduleNotElapsed);
        }
        Ok(())
    }

    fn stake_token_address(env: &Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&STAKE_TOKEN)
            .ok_or(ContractError::NotInitialized)
    }

    fn reward_token_address(env: &Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&REWARD_TOKEN)
            .ok_or(ContractError::NotInitialized)
    }
}

// ── Storage helpers ──────────────────────────────────────────────────────────

fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

fn load_config(env: &Env) -> Result<FarmingConfig, ContractError> {
    env.storage()
        .instance()
        .get(&CONFIG)
        .ok_or(ContractError::NotInitialized)
}

fn config_schedule_end(config: &FarmingConfig) -> Result<u64, ContractError> {
    rewards::schedule_end(config.start_time, config.epoch_duration, config.epoch_count)
        .ok_or(ContractError::InvalidParameter)
}

fn deposit_key(account: &Address) -> (Symbol, Address) {
    (USER_DEPOSIT, account.clone())
}

fn load_deposit(env: &Env, account: &Address) -> Option<DepositRecord> {
    let key = deposit_key(account);
    let record: Option<DepositRecord> = env.storage().persistent().get(&key);
    if record.is_some() {
        env.storage()
            .persistent()
            .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
    record
}

fn store_deposit(env: &Env, account: &Address, record: &DepositRecord) {
    let key = deposit_key(account);
    env.storage().persistent().set(&key, record);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Add `amount` to a running instance-storage total.
fn bump_total(env: &Env, key: &Symbol, amount: i128) {
    let prev: i128 = env.storage().instance().get(key).unwrap_or(0);
    env.storage()
        .instance()
        .set(key, &prev.saturating_add(amount));
    extend_instance_ttl(env);
}

/// Pre-flight for a `transfer_from` pull so token shortfalls surface as
/// contract errors instead of a host trap.
fn ensure_pullable(
    env: &Env,
    token: &token::Client,
    from: &Address,
    amount: i128,
) -> Result<(), ContractError> {
    if token.allowance(from, &env.current_contract_address()) < amount {
        return Err(ContractError::InsufficientAllowance);
    }
    if token.balance(from) < amount {
        return Err(ContractError::InsufficientBalance);
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
