use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Decimal256, Uint128};
use cw_storage_plus::{Item, Map};
use vestige_common::{RewardCurveConfig, ScoreWeighting};

pub const CONFIG: Item<Config> = Item::new("config");
pub const REWARD_STATE: Item<RewardState> = Item::new("reward_state");
pub const STAKERS: Map<&Addr, StakerInfo> = Map::new("stakers");
/// Reward-per-score accumulator as first observed in each weekly epoch.
pub const EPOCH_CHECKPOINTS: Map<u64, Decimal256> = Map::new("epoch_checkpoints");

#[cw_serde]
pub struct Config {
    pub admin: Addr,
    pub staking_denom: String,
    pub reward_denom: String,
    /// Receives every claimed reward as a vesting entry. Immutable.
    pub reward_escrow: Addr,
    /// Only address allowed to start reward periods. Immutable.
    pub reward_notifier: Addr,
    /// Only address allowed to report trading fees. Immutable.
    pub exchanger_proxy: Addr,
    pub rewards_duration: u64,
    /// Seconds a stake stays locked after the staker's last deposit
    pub cooldown_period: u64,
    /// Floor for liquid stake positions and reported fee amounts
    pub safety_minimum: Uint128,
    pub score_weighting: ScoreWeighting,
    pub reward_curve: RewardCurveConfig,
    /// Timestamp the weekly epoch cadence is counted from
    pub epoch_anchor: u64,
    pub paused: bool,
}

#[cw_serde]
pub struct RewardState {
    pub total_staked: Uint128,
    /// Portion of `total_staked` held by the escrow rather than this contract.
    pub total_escrow_staked: Uint128,
    pub total_reward_score: Uint128,
    /// Curve base rate, in reward tokens per second.
    pub reward_rate: Decimal256,
    pub reward_per_score_stored: Decimal256,
    pub last_update_time: u64,
    pub period_start: u64,
    pub period_finish: u64,
    pub current_epoch: u64,
}

#[cw_serde]
#[derive(Default)]
pub struct StakerInfo {
    /// Total stake, escrowed principal included.
    pub balance: Uint128,
    pub escrowed_balance: Uint128,
    /// Cumulative trading fees reported for this staker.
    pub trader_score: Uint128,
    pub reward_score: Uint128,
    pub reward_per_score_paid: Decimal256,
    /// Accrued and not yet sent to escrow.
    pub rewards: Uint128,
    pub last_stake_time: u64,
}

impl StakerInfo {
    /// Stake that was deposited directly and may be withdrawn as tokens.
    pub fn liquid_balance(&self) -> Uint128 {
        self.balance.saturating_sub(self.escrowed_balance)
    }
}
