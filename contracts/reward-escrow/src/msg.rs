use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Uint128;

use crate::state::{Config, VestingEntry};

#[cw_serde]
pub struct InstantiateMsg {
    pub denom: String,
    /// Usually unknown at deployment; see SetStakingRewards.
    pub staking_rewards: Option<String>,
    pub treasury: Option<String>,
    /// Defaults to 52 weeks
    pub default_duration: Option<u64>,
    /// Percentage points, defaults to 90
    pub default_early_vesting_fee: Option<u8>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Staking rewards contract only. Records rewards it sent along.
    AppendVestingEntry {
        account: String,
        amount: Uint128,
        duration: Option<u64>,
        early_vesting_fee: Option<u8>,
    },
    /// Lock the tokens sent in info.funds for `beneficiary`.
    CreateEscrowEntry {
        beneficiary: String,
        duration: u64,
        early_vesting_fee: u8,
    },
    /// Vest the caller's entries. Unknown, foreign or spent ids are skipped.
    Vest { entry_ids: Vec<u64> },
    /// Stake unstaked escrow with the staking rewards contract.
    StakeEscrow { amount: Uint128 },
    /// Unstake escrow from the staking rewards contract.
    UnstakeEscrow { amount: Uint128 },
    /// Admin only, once.
    SetStakingRewards { address: String },
    /// Admin only, once.
    #[serde(rename = "set_treasury_dao")]
    SetTreasuryDAO { address: String },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Config)]
    Config {},
    #[returns(VestingEntry)]
    VestingEntry { entry_id: u64 },
    #[returns(VestingEntryClaimableResponse)]
    VestingEntryClaimable { entry_id: u64 },
    /// Aggregate claimable amount and fee for `address`'s entries among `entry_ids`.
    #[returns(VestingQuantityResponse)]
    VestingQuantity { address: String, entry_ids: Vec<u64> },
    #[returns(Vec<VestingEntry>)]
    VestingSchedules {
        address: String,
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    #[returns(Vec<u64>)]
    AccountVestingEntryIds {
        address: String,
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    #[returns(u64)]
    NumVestingEntries { address: String },
    /// Escrowed, not yet vested amount of `address`.
    #[returns(Uint128)]
    BalanceOf { address: String },
    #[returns(Uint128)]
    TotalEscrowedBalance {},
    #[returns(Uint128)]
    TotalVestedAccountBalance { address: String },
    /// Escrowed amount not currently staked with the staking rewards contract.
    #[returns(Uint128)]
    UnstakedEscrowedBalance { address: String },
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
pub struct VestingEntryClaimableResponse {
    pub claimable: Uint128,
    pub fee: Uint128,
}

#[cw_serde]
pub struct VestingQuantityResponse {
    /// Net of fees
    pub total: Uint128,
    pub fee: Uint128,
}
