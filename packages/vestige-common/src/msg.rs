//! Messages each contract sends to the other.
//!
//! Variant names and fields must stay in sync with the receiving contract's
//! own `ExecuteMsg` / `QueryMsg`, since they are matched by their JSON shape.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint128;

/// Sent by the staking rewards contract to the escrow, with `amount` attached.
#[cw_serde]
pub enum EscrowExecuteMsg {
    AppendVestingEntry {
        account: String,
        amount: Uint128,
        duration: Option<u64>,
        early_vesting_fee: Option<u8>,
    },
}

/// Sent by the escrow to the staking rewards contract. No funds move.
#[cw_serde]
pub enum StakingRewardsExecuteMsg {
    StakeEscrow { account: String, amount: Uint128 },
    UnstakeEscrow { account: String, amount: Uint128 },
    UnstakeEscrowSkipCooldown { account: String, amount: Uint128 },
}

#[cw_serde]
pub enum StakingRewardsQueryMsg {
    /// Escrowed principal the account currently has staked. Returns `Uint128`.
    EscrowedBalance { address: String },
}
