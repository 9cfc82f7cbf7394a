use cosmwasm_std::{
    coins, to_json_binary, Addr, BankMsg, DepsMut, Env, Event, MessageInfo, Response, Storage,
    Uint128, WasmMsg,
};
use vestige_common::math::floor_to_uint128;
use vestige_common::{EscrowExecuteMsg, WEEK, YEAR};

use crate::error::ContractError;
use crate::rewards;
use crate::state::{
    Config, RewardState, StakerInfo, CONFIG, EPOCH_CHECKPOINTS, REWARD_STATE, STAKERS,
};

pub const DEFAULT_REWARDS_DURATION: u64 = WEEK;
pub const DEFAULT_COOLDOWN_PERIOD: u64 = 2 * WEEK;
pub const MIN_COOLDOWN_PERIOD: u64 = WEEK;
pub const MAX_COOLDOWN_PERIOD: u64 = YEAR;

/// Validate funds: exactly one non-zero coin of `denom`.
fn must_pay(info: &MessageInfo, denom: &str) -> Result<Uint128, ContractError> {
    if info.funds.is_empty() {
        return Err(ContractError::NoFundsSent);
    }
    if info.funds.len() != 1 {
        return Err(ContractError::InvalidFunds);
    }
    let sent = &info.funds[0];
    if sent.denom != denom {
        return Err(ContractError::WrongDenom {
            expected: denom.to_string(),
            denom: sent.denom.clone(),
        });
    }
    if sent.amount.is_zero() {
        return Err(ContractError::InvalidAmount);
    }
    Ok(sent.amount)
}

fn ensure_admin(config: &Config, info: &MessageInfo) -> Result<(), ContractError> {
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can perform this action".to_string(),
        });
    }
    Ok(())
}

fn ensure_escrow(config: &Config, info: &MessageInfo) -> Result<(), ContractError> {
    if info.sender != config.reward_escrow {
        return Err(ContractError::Unauthorized {
            reason: "only the reward escrow can move escrowed stake".to_string(),
        });
    }
    Ok(())
}

fn ensure_unlocked(config: &Config, staker: &StakerInfo, now: u64) -> Result<(), ContractError> {
    let unlock_time = staker.last_stake_time + config.cooldown_period;
    if now < unlock_time {
        return Err(ContractError::MustWaitForUnlock { unlock_time });
    }
    Ok(())
}

/// Settle the global accumulator and roll the epoch forward. Every epoch
/// boundary crossed since the last settlement gets a checkpoint holding the
/// accumulator value at that boundary, so idle weeks leave no gaps.
fn settle_global(
    storage: &mut dyn Storage,
    env: &Env,
    config: &Config,
    state: &mut RewardState,
) -> Result<Vec<Event>, ContractError> {
    let now = env.block.time.seconds();
    let epoch = rewards::epoch_at(config.epoch_anchor, now);

    let mut events = Vec::new();
    while state.current_epoch < epoch {
        let next = state.current_epoch + 1;
        let boundary = config.epoch_anchor + next * WEEK;
        rewards::update_reward(config, state, boundary)?;
        EPOCH_CHECKPOINTS.save(storage, next, &state.reward_per_score_stored)?;
        state.current_epoch = next;
        events.push(
            Event::new("vestige_epoch_started")
                .add_attribute("epoch", next.to_string())
                .add_attribute(
                    "reward_per_score",
                    state.reward_per_score_stored.to_string(),
                ),
        );
    }

    rewards::update_reward(config, state, now)?;
    Ok(events)
}

/// Settle the accumulator and `account` before any balance change.
fn checkpoint(
    storage: &mut dyn Storage,
    env: &Env,
    config: &Config,
    account: &Addr,
) -> Result<(RewardState, StakerInfo, Vec<Event>), ContractError> {
    let mut state = REWARD_STATE.load(storage)?;
    let epoch_events = settle_global(storage, env, config, &mut state)?;
    let mut staker = STAKERS.may_load(storage, account)?.unwrap_or_default();
    rewards::settle_account(&state, &mut staker)?;
    Ok((state, staker, epoch_events))
}

fn persist(
    storage: &mut dyn Storage,
    account: &Addr,
    state: &RewardState,
    staker: &StakerInfo,
) -> Result<(), ContractError> {
    STAKERS.save(storage, account, staker)?;
    REWARD_STATE.save(storage, state)?;
    Ok(())
}

fn with_epoch_events(response: Response, epoch_events: Vec<Event>) -> Response {
    response.add_events(epoch_events)
}

/// Remove liquid stake and build the transfer back to the staker.
fn withdraw(
    config: &Config,
    env: &Env,
    state: &mut RewardState,
    staker: &mut StakerInfo,
    account: &Addr,
    amount: Uint128,
) -> Result<BankMsg, ContractError> {
    if amount.is_zero() {
        return Err(ContractError::InvalidAmount);
    }
    let liquid = staker.liquid_balance();
    if amount > liquid {
        return Err(ContractError::InsufficientBalance {
            requested: amount,
            available: liquid,
        });
    }
    let remaining = liquid - amount;
    if !remaining.is_zero() && remaining < config.safety_minimum {
        return Err(ContractError::BelowSafetyMinimum {
            amount: remaining,
            safety_minimum: config.safety_minimum,
        });
    }
    ensure_unlocked(config, staker, env.block.time.seconds())?;

    staker.balance -= amount;
    state.total_staked -= amount;
    rewards::refresh_score(config, state, staker)?;

    Ok(BankMsg::Send {
        to_address: account.to_string(),
        amount: coins(amount.u128(), &config.staking_denom),
    })
}

/// Zero the staker's accrued reward and build the escrow deposit for it.
fn claim(
    config: &Config,
    staker: &mut StakerInfo,
    account: &Addr,
) -> Result<Option<WasmMsg>, ContractError> {
    let reward = staker.rewards;
    if reward.is_zero() {
        return Ok(None);
    }
    staker.rewards = Uint128::zero();

    Ok(Some(WasmMsg::Execute {
        contract_addr: config.reward_escrow.to_string(),
        msg: to_json_binary(&EscrowExecuteMsg::AppendVestingEntry {
            account: account.to_string(),
            amount: reward,
            duration: None,
            early_vesting_fee: None,
        })?,
        funds: coins(reward.u128(), &config.reward_denom),
    }))
}

/// Stake tokens sent in info.funds.
pub fn stake(deps: DepsMut, env: Env, info: MessageInfo) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if config.paused {
        return Err(ContractError::Paused);
    }
    let amount = must_pay(&info, &config.staking_denom)?;

    let (mut state, mut staker, epoch_events) =
        checkpoint(deps.storage, &env, &config, &info.sender)?;

    let liquid_after = staker.liquid_balance() + amount;
    if liquid_after < config.safety_minimum {
        return Err(ContractError::BelowSafetyMinimum {
            amount: liquid_after,
            safety_minimum: config.safety_minimum,
        });
    }

    staker.balance += amount;
    staker.last_stake_time = env.block.time.seconds();
    state.total_staked += amount;
    rewards::refresh_score(&config, &mut state, &mut staker)?;
    persist(deps.storage, &info.sender, &state, &staker)?;

    let response = Response::new()
        .add_attribute("action", "stake")
        .add_attribute("user", info.sender.to_string())
        .add_attribute("amount", amount.to_string())
        .add_event(
            Event::new("vestige_staked")
                .add_attribute("user", info.sender.to_string())
                .add_attribute("amount", amount.to_string())
                .add_attribute("balance", staker.balance.to_string())
                .add_attribute("reward_score", staker.reward_score.to_string()),
        );
    Ok(with_epoch_events(response, epoch_events))
}

/// Withdraw liquid stake.
pub fn unstake(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let (mut state, mut staker, epoch_events) =
        checkpoint(deps.storage, &env, &config, &info.sender)?;

    let send_msg = withdraw(&config, &env, &mut state, &mut staker, &info.sender, amount)?;
    persist(deps.storage, &info.sender, &state, &staker)?;

    let response = Response::new()
        .add_message(send_msg)
        .add_attribute("action", "unstake")
        .add_attribute("user", info.sender.to_string())
        .add_attribute("amount", amount.to_string())
        .add_event(
            Event::new("vestige_unstaked")
                .add_attribute("user", info.sender.to_string())
                .add_attribute("amount", amount.to_string())
                .add_attribute("balance", staker.balance.to_string())
                .add_attribute("reward_score", staker.reward_score.to_string()),
        );
    Ok(with_epoch_events(response, epoch_events))
}

/// Send accrued rewards into the escrow as a vesting entry.
pub fn get_reward(deps: DepsMut, env: Env, info: MessageInfo) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let (state, mut staker, epoch_events) = checkpoint(deps.storage, &env, &config, &info.sender)?;

    let reward = staker.rewards;
    let escrow_msg = claim(&config, &mut staker, &info.sender)?;
    persist(deps.storage, &info.sender, &state, &staker)?;

    let mut response = Response::new()
        .add_attribute("action", "get_reward")
        .add_attribute("user", info.sender.to_string())
        .add_attribute("reward", reward.to_string());
    if let Some(msg) = escrow_msg {
        response = response.add_message(msg).add_event(
            Event::new("vestige_reward_paid")
                .add_attribute("user", info.sender.to_string())
                .add_attribute("reward", reward.to_string()),
        );
    }
    Ok(with_epoch_events(response, epoch_events))
}

/// Unstake the whole liquid balance, then claim rewards.
pub fn exit(deps: DepsMut, env: Env, info: MessageInfo) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let (mut state, mut staker, epoch_events) =
        checkpoint(deps.storage, &env, &config, &info.sender)?;

    let liquid = staker.liquid_balance();
    let mut response = Response::new()
        .add_attribute("action", "exit")
        .add_attribute("user", info.sender.to_string())
        .add_attribute("unstaked", liquid.to_string());

    if !liquid.is_zero() {
        let send_msg = withdraw(&config, &env, &mut state, &mut staker, &info.sender, liquid)?;
        response = response.add_message(send_msg).add_event(
            Event::new("vestige_unstaked")
                .add_attribute("user", info.sender.to_string())
                .add_attribute("amount", liquid.to_string())
                .add_attribute("balance", staker.balance.to_string())
                .add_attribute("reward_score", staker.reward_score.to_string()),
        );
    }

    let reward = staker.rewards;
    if let Some(msg) = claim(&config, &mut staker, &info.sender)? {
        response = response.add_message(msg).add_event(
            Event::new("vestige_reward_paid")
                .add_attribute("user", info.sender.to_string())
                .add_attribute("reward", reward.to_string()),
        );
    }
    persist(deps.storage, &info.sender, &state, &staker)?;

    Ok(with_epoch_events(
        response.add_attribute("reward", reward.to_string()),
        epoch_events,
    ))
}

/// Record trading fees for `account`. Exchanger proxy only.
pub fn update_trader_score(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    account: String,
    fee_amount: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.exchanger_proxy {
        return Err(ContractError::Unauthorized {
            reason: "only the exchanger proxy can report fees".to_string(),
        });
    }
    if fee_amount.is_zero() {
        return Err(ContractError::InvalidAmount);
    }
    if fee_amount < config.safety_minimum {
        return Err(ContractError::BelowSafetyMinimum {
            amount: fee_amount,
            safety_minimum: config.safety_minimum,
        });
    }
    let account = deps.api.addr_validate(&account)?;

    let (mut state, mut staker, epoch_events) = checkpoint(deps.storage, &env, &config, &account)?;
    staker.trader_score += fee_amount;
    rewards::refresh_score(&config, &mut state, &mut staker)?;
    persist(deps.storage, &account, &state, &staker)?;

    let response = Response::new()
        .add_attribute("action", "update_trader_score")
        .add_attribute("account", account.to_string())
        .add_attribute("fee_amount", fee_amount.to_string())
        .add_event(
            Event::new("vestige_trader_score_updated")
                .add_attribute("account", account.to_string())
                .add_attribute("fee_amount", fee_amount.to_string())
                .add_attribute("trader_score", staker.trader_score.to_string())
                .add_attribute("reward_score", staker.reward_score.to_string()),
        );
    Ok(with_epoch_events(response, epoch_events))
}

/// Reward tokens the contract can commit to a new period.
/// Liquid stake shares the denom when staking and reward tokens coincide,
/// so it is excluded.
fn available_reward_balance(
    deps: &DepsMut,
    env: &Env,
    config: &Config,
    state: &RewardState,
) -> Result<Uint128, ContractError> {
    let balance = deps
        .querier
        .query_balance(&env.contract.address, &config.reward_denom)?
        .amount;
    if config.reward_denom != config.staking_denom {
        return Ok(balance);
    }
    let liquid_staked = state.total_staked.saturating_sub(state.total_escrow_staked);
    Ok(balance.saturating_sub(liquid_staked))
}

/// Start a new reward period, rolling over whatever the current one has not
/// emitted yet. Reward notifier only.
pub fn notify_reward_amount(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    reward: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.reward_notifier {
        return Err(ContractError::Unauthorized {
            reason: "only the reward notifier can add rewards".to_string(),
        });
    }
    if let Some(coin) = info.funds.iter().find(|c| c.denom != config.reward_denom) {
        return Err(ContractError::WrongDenom {
            expected: config.reward_denom.clone(),
            denom: coin.denom.clone(),
        });
    }

    let mut state = REWARD_STATE.load(deps.storage)?;
    let epoch_events = settle_global(deps.storage, &env, &config, &mut state)?;

    let now = env.block.time.seconds();
    let curve = config.reward_curve.curve();
    let leftover = if now < state.period_finish {
        let emitted = curve.emitted(
            state.reward_rate,
            now - state.period_start,
            state.period_finish - state.period_start,
        )?;
        floor_to_uint128(emitted)?
    } else {
        Uint128::zero()
    };

    let total = reward.checked_add(leftover)?;
    let reward_rate = curve.base_rate_for(total, config.rewards_duration)?;
    let required = floor_to_uint128(curve.emitted(reward_rate, 0, config.rewards_duration)?)?;
    let available = available_reward_balance(&deps, &env, &config, &state)?;
    if required > available {
        return Err(ContractError::RewardTooHigh {
            required,
            available,
        });
    }

    state.reward_rate = reward_rate;
    state.period_start = now;
    state.last_update_time = now;
    state.period_finish = now + config.rewards_duration;
    REWARD_STATE.save(deps.storage, &state)?;

    let response = Response::new()
        .add_attribute("action", "notify_reward_amount")
        .add_attribute("reward", reward.to_string())
        .add_event(
            Event::new("vestige_reward_added")
                .add_attribute("reward", reward.to_string())
                .add_attribute("leftover", leftover.to_string())
                .add_attribute("reward_rate", reward_rate.to_string())
                .add_attribute("period_finish", state.period_finish.to_string()),
        );
    Ok(with_epoch_events(response, epoch_events))
}

/// Count escrowed principal towards `account`'s stake. Escrow only.
pub fn stake_escrow(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    account: String,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_escrow(&config, &info)?;
    if config.paused {
        return Err(ContractError::Paused);
    }
    if amount.is_zero() {
        return Err(ContractError::InvalidAmount);
    }
    let account = deps.api.addr_validate(&account)?;

    let (mut state, mut staker, epoch_events) = checkpoint(deps.storage, &env, &config, &account)?;
    staker.balance += amount;
    staker.escrowed_balance += amount;
    staker.last_stake_time = env.block.time.seconds();
    state.total_staked += amount;
    state.total_escrow_staked += amount;
    rewards::refresh_score(&config, &mut state, &mut staker)?;
    persist(deps.storage, &account, &state, &staker)?;

    let response = Response::new()
        .add_attribute("action", "stake_escrow")
        .add_attribute("account", account.to_string())
        .add_attribute("amount", amount.to_string())
        .add_event(
            Event::new("vestige_escrow_staked")
                .add_attribute("account", account.to_string())
                .add_attribute("amount", amount.to_string())
                .add_attribute("escrowed_balance", staker.escrowed_balance.to_string()),
        );
    Ok(with_epoch_events(response, epoch_events))
}

/// Release escrowed principal from `account`'s stake. Escrow only.
/// The vesting path skips the cooldown so a vest never blocks on it.
pub fn unstake_escrow(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    account: String,
    amount: Uint128,
    skip_cooldown: bool,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_escrow(&config, &info)?;
    if amount.is_zero() {
        return Err(ContractError::InvalidAmount);
    }
    let account = deps.api.addr_validate(&account)?;

    let (mut state, mut staker, epoch_events) = checkpoint(deps.storage, &env, &config, &account)?;
    if amount > staker.escrowed_balance {
        return Err(ContractError::InsufficientBalance {
            requested: amount,
            available: staker.escrowed_balance,
        });
    }
    if !skip_cooldown {
        ensure_unlocked(&config, &staker, env.block.time.seconds())?;
    }

    staker.balance -= amount;
    staker.escrowed_balance -= amount;
    state.total_staked -= amount;
    state.total_escrow_staked -= amount;
    rewards::refresh_score(&config, &mut state, &mut staker)?;
    persist(deps.storage, &account, &state, &staker)?;

    let response = Response::new()
        .add_attribute("action", "unstake_escrow")
        .add_attribute("account", account.to_string())
        .add_attribute("amount", amount.to_string())
        .add_event(
            Event::new("vestige_escrow_unstaked")
                .add_attribute("account", account.to_string())
                .add_attribute("amount", amount.to_string())
                .add_attribute("escrowed_balance", staker.escrowed_balance.to_string())
                .add_attribute("skip_cooldown", skip_cooldown.to_string()),
        );
    Ok(with_epoch_events(response, epoch_events))
}

/// Change the length of future reward periods. Admin only.
pub fn set_rewards_duration(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    duration: u64,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;

    let state = REWARD_STATE.load(deps.storage)?;
    if env.block.time.seconds() <= state.period_finish {
        return Err(ContractError::RewardsPeriodActive {
            period_finish: state.period_finish,
        });
    }
    if duration == 0 {
        return Err(ContractError::InvalidRewardsDuration);
    }

    config.rewards_duration = duration;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "set_rewards_duration")
        .add_event(
            Event::new("vestige_rewards_duration_updated")
                .add_attribute("duration", duration.to_string()),
        ))
}

pub fn validate_cooldown_period(cooldown_period: u64) -> Result<(), ContractError> {
    if !(MIN_COOLDOWN_PERIOD..=MAX_COOLDOWN_PERIOD).contains(&cooldown_period) {
        return Err(ContractError::InvalidCooldownPeriod {
            value: cooldown_period,
            min: MIN_COOLDOWN_PERIOD,
            max: MAX_COOLDOWN_PERIOD,
        });
    }
    Ok(())
}

/// Admin only.
pub fn set_cooldown_period(
    deps: DepsMut,
    info: MessageInfo,
    cooldown_period: u64,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;
    validate_cooldown_period(cooldown_period)?;

    config.cooldown_period = cooldown_period;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "set_cooldown_period")
        .add_event(
            Event::new("vestige_cooldown_period_updated")
                .add_attribute("cooldown_period", cooldown_period.to_string()),
        ))
}

/// Admin only.
pub fn set_paused(
    deps: DepsMut,
    info: MessageInfo,
    paused: bool,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;

    config.paused = paused;
    CONFIG.save(deps.storage, &config)?;

    let action = if paused { "pause" } else { "unpause" };
    Ok(Response::new()
        .add_attribute("action", action)
        .add_event(Event::new("vestige_pause_changed").add_attribute("paused", paused.to_string())))
}

/// Send stray tokens to the admin. Admin only. Staking principal and the
/// reward pool both back outstanding claims and cannot be recovered.
pub fn recover_tokens(
    deps: DepsMut,
    info: MessageInfo,
    denom: String,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;
    if denom == config.staking_denom {
        return Err(ContractError::Unauthorized {
            reason: "cannot recover the staking denom".to_string(),
        });
    }
    if denom == config.reward_denom {
        return Err(ContractError::Unauthorized {
            reason: "cannot recover the reward denom".to_string(),
        });
    }
    if amount.is_zero() {
        return Err(ContractError::InvalidAmount);
    }

    let send_msg = BankMsg::Send {
        to_address: config.admin.to_string(),
        amount: coins(amount.u128(), &denom),
    };

    Ok(Response::new()
        .add_message(send_msg)
        .add_attribute("action", "recover_tokens")
        .add_attribute("denom", denom)
        .add_attribute("amount", amount.to_string()))
}

/// Admin only.
pub fn update_admin(
    deps: DepsMut,
    info: MessageInfo,
    admin: String,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;

    config.admin = deps.api.addr_validate(&admin)?;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_admin")
        .add_attribute("admin", config.admin.to_string()))
}
