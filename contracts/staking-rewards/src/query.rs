use cosmwasm_std::{to_json_binary, Binary, Decimal256, Deps, Env, StdResult};
use vestige_common::WEEK;

use crate::msg::{EpochResponse, StakerInfoResponse};
use crate::rewards;
use crate::state::{CONFIG, EPOCH_CHECKPOINTS, REWARD_STATE, STAKERS};

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_reward_state(deps: Deps) -> StdResult<Binary> {
    let state = REWARD_STATE.load(deps.storage)?;
    to_json_binary(&state)
}

pub fn query_staker_info(deps: Deps, env: Env, address: String) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    let config = CONFIG.load(deps.storage)?;
    let state = REWARD_STATE.load(deps.storage)?;
    let staker = STAKERS.may_load(deps.storage, &addr)?.unwrap_or_default();

    let current = rewards::reward_per_score(&config, &state, env.block.time.seconds())?;
    let earned = rewards::earned(&staker, current)?;

    to_json_binary(&StakerInfoResponse {
        address,
        balance: staker.balance,
        escrowed_balance: staker.escrowed_balance,
        trader_score: staker.trader_score,
        reward_score: staker.reward_score,
        earned,
        unlock_time: staker.last_stake_time + config.cooldown_period,
    })
}

pub fn query_earned(deps: Deps, env: Env, address: String) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    let config = CONFIG.load(deps.storage)?;
    let state = REWARD_STATE.load(deps.storage)?;
    let staker = STAKERS.may_load(deps.storage, &addr)?.unwrap_or_default();

    let current = rewards::reward_per_score(&config, &state, env.block.time.seconds())?;
    to_json_binary(&rewards::earned(&staker, current)?)
}

pub fn query_reward_per_reward_score(deps: Deps, env: Env) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let state = REWARD_STATE.load(deps.storage)?;
    to_json_binary(&rewards::reward_per_score(
        &config,
        &state,
        env.block.time.seconds(),
    )?)
}

pub fn query_reward_rate(deps: Deps, env: Env) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let state = REWARD_STATE.load(deps.storage)?;
    let now = env.block.time.seconds();
    if now >= state.period_finish {
        return to_json_binary(&Decimal256::zero());
    }
    let elapsed = now.saturating_sub(state.period_start);
    to_json_binary(&config.reward_curve.curve().rate(state.reward_rate, elapsed)?)
}

pub fn query_last_time_reward_applicable(deps: Deps, env: Env) -> StdResult<Binary> {
    let state = REWARD_STATE.load(deps.storage)?;
    to_json_binary(&rewards::last_time_reward_applicable(
        &state,
        env.block.time.seconds(),
    ))
}

pub fn query_reward_for_duration(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let state = REWARD_STATE.load(deps.storage)?;
    to_json_binary(&rewards::reward_for_duration(&config, &state)?)
}

pub fn query_escrowed_balance(deps: Deps, address: String) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    let staker = STAKERS.may_load(deps.storage, &addr)?.unwrap_or_default();
    to_json_binary(&staker.escrowed_balance)
}

pub fn query_unstaked_balance(deps: Deps, address: String) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    let staker = STAKERS.may_load(deps.storage, &addr)?.unwrap_or_default();
    to_json_binary(&staker.liquid_balance())
}

pub fn query_epoch(deps: Deps, env: Env) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let epoch = rewards::epoch_at(config.epoch_anchor, env.block.time.seconds());
    let epoch_start = config.epoch_anchor + epoch * WEEK;

    to_json_binary(&EpochResponse {
        epoch,
        epoch_start,
        epoch_end: epoch_start + WEEK,
        reward_per_score_at_start: EPOCH_CHECKPOINTS.may_load(deps.storage, epoch)?,
    })
}

pub fn query_epoch_checkpoint(deps: Deps, epoch: u64) -> StdResult<Binary> {
    let checkpoint = EPOCH_CHECKPOINTS.may_load(deps.storage, epoch)?;
    to_json_binary(&checkpoint)
}
