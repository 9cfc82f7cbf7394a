//! Reward-per-score accounting shared by execute and query paths.
//!
//! The accumulator follows the usual streaming pattern: between two
//! settlements every unit of reward score earns
//! `emitted / total_reward_score`, and each staker keeps a checkpoint of the
//! accumulator value at their last interaction.

use cosmwasm_std::{Decimal256, StdResult, Uint128};
use vestige_common::math::{checked_ratio, floor_to_uint128, mul_floor};
use vestige_common::WEEK;

use crate::state::{Config, RewardState, StakerInfo};

pub fn last_time_reward_applicable(state: &RewardState, now: u64) -> u64 {
    now.min(state.period_finish)
}

/// Accumulator value as of `now`, without writing anything.
pub fn reward_per_score(config: &Config, state: &RewardState, now: u64) -> StdResult<Decimal256> {
    if state.total_reward_score.is_zero() {
        return Ok(state.reward_per_score_stored);
    }

    let from = state.last_update_time.saturating_sub(state.period_start);
    let to = last_time_reward_applicable(state, now).saturating_sub(state.period_start);
    if to <= from {
        return Ok(state.reward_per_score_stored);
    }

    let emitted = config
        .reward_curve
        .curve()
        .emitted(state.reward_rate, from, to)?;
    let increment = checked_ratio(emitted, state.total_reward_score)?;
    Ok(state.reward_per_score_stored.checked_add(increment)?)
}

/// Reward accrued by `staker` against accumulator value `current`.
pub fn earned(staker: &StakerInfo, current: Decimal256) -> StdResult<Uint128> {
    let delta = current.saturating_sub(staker.reward_per_score_paid);
    let pending = mul_floor(staker.reward_score, delta)?;
    Ok(staker.rewards.checked_add(pending)?)
}

/// Settle the global accumulator up to `now` (clamped to the period end).
pub fn update_reward(config: &Config, state: &mut RewardState, now: u64) -> StdResult<()> {
    state.reward_per_score_stored = reward_per_score(config, state, now)?;
    state.last_update_time = last_time_reward_applicable(state, now).max(state.last_update_time);
    Ok(())
}

/// Move the staker's pending reward into `rewards` and refresh the checkpoint.
/// Must run after `update_reward` and before the staker's balance changes.
pub fn settle_account(state: &RewardState, staker: &mut StakerInfo) -> StdResult<()> {
    staker.rewards = earned(staker, state.reward_per_score_stored)?;
    staker.reward_per_score_paid = state.reward_per_score_stored;
    Ok(())
}

/// Recompute the staker's reward score from balance and trader score.
pub fn refresh_score(
    config: &Config,
    state: &mut RewardState,
    staker: &mut StakerInfo,
) -> StdResult<()> {
    let score = config
        .score_weighting
        .reward_score(staker.balance, staker.trader_score)?;
    state.total_reward_score = state
        .total_reward_score
        .checked_sub(staker.reward_score)?
        .checked_add(score)?;
    staker.reward_score = score;
    Ok(())
}

/// Tokens the current period emits over a full `rewards_duration`.
pub fn reward_for_duration(config: &Config, state: &RewardState) -> StdResult<Uint128> {
    let emitted = config
        .reward_curve
        .curve()
        .emitted(state.reward_rate, 0, config.rewards_duration)?;
    floor_to_uint128(emitted)
}

/// Weekly epoch number counted from `anchor`; zero before the anchor.
pub fn epoch_at(anchor: u64, now: u64) -> u64 {
    now.saturating_sub(anchor) / WEEK
}
