use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Decimal256, Uint128};
use vestige_common::{RewardCurveConfig, ScoreWeighting};

use crate::state::{Config, RewardState};

#[cw_serde]
pub struct InstantiateMsg {
    pub staking_denom: String,
    pub reward_denom: String,
    pub reward_escrow: String,
    pub reward_notifier: String,
    pub exchanger_proxy: String,
    /// Defaults to one week
    pub rewards_duration: Option<u64>,
    /// Defaults to two weeks
    pub cooldown_period: Option<u64>,
    pub safety_minimum: Option<Uint128>,
    pub score_weighting: Option<ScoreWeighting>,
    pub reward_curve: Option<RewardCurveConfig>,
    /// Defaults to the instantiation time
    pub epoch_anchor: Option<u64>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Stake the staking denom sent in info.funds.
    Stake {},
    /// Withdraw liquid (non-escrowed) stake once the cooldown has passed.
    Unstake { amount: Uint128 },
    /// Send accrued rewards to the escrow as a new vesting entry.
    GetReward {},
    /// Unstake the whole liquid balance and claim rewards.
    Exit {},
    /// Report trading fees paid by an account. Exchanger proxy only.
    UpdateTraderScore { account: String, fee_amount: Uint128 },
    /// Start or top up a reward period. Reward notifier only.
    NotifyRewardAmount { reward: Uint128 },
    /// Same as NotifyRewardAmount.
    SetRewards { reward: Uint128 },
    /// Escrow only: stake escrowed principal on behalf of `account`.
    StakeEscrow { account: String, amount: Uint128 },
    /// Escrow only: unstake escrowed principal, honouring the cooldown.
    UnstakeEscrow { account: String, amount: Uint128 },
    /// Escrow only: unstake escrowed principal while vesting it.
    UnstakeEscrowSkipCooldown { account: String, amount: Uint128 },
    /// Admin only. Allowed once the current period has finished.
    SetRewardsDuration { duration: u64 },
    /// Admin only.
    SetCooldownPeriod { cooldown_period: u64 },
    /// Admin only. Blocks new stakes.
    Pause {},
    /// Admin only.
    Unpause {},
    /// Admin only. Sends stray tokens to the admin; never the staking denom.
    RecoverTokens { denom: String, amount: Uint128 },
    /// Admin only.
    UpdateAdmin { admin: String },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Config)]
    Config {},
    #[returns(RewardState)]
    RewardState {},
    #[returns(StakerInfoResponse)]
    StakerInfo { address: String },
    #[returns(Uint128)]
    Earned { address: String },
    #[returns(Decimal256)]
    RewardPerRewardScore {},
    /// Instantaneous emission rate in reward tokens per second.
    #[returns(Decimal256)]
    RewardRate {},
    #[returns(u64)]
    LastTimeRewardApplicable {},
    #[returns(Uint128)]
    RewardForDuration {},
    #[returns(Uint128)]
    EscrowedBalance { address: String },
    #[returns(Uint128)]
    UnstakedBalance { address: String },
    #[returns(EpochResponse)]
    Epoch {},
    /// Accumulator value at the start of `epoch`. `None` until a settlement
    /// has crossed into that epoch.
    #[returns(Option<Decimal256>)]
    EpochCheckpoint { epoch: u64 },
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
pub struct StakerInfoResponse {
    pub address: String,
    pub balance: Uint128,
    pub escrowed_balance: Uint128,
    pub trader_score: Uint128,
    pub reward_score: Uint128,
    pub earned: Uint128,
    pub unlock_time: u64,
}

#[cw_serde]
pub struct EpochResponse {
    pub epoch: u64,
    pub epoch_start: u64,
    pub epoch_end: u64,
    /// Accumulator value at `epoch_start`, once a settlement has reached it.
    pub reward_per_score_at_start: Option<Decimal256>,
}
