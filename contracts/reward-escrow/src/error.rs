use cosmwasm_std::{OverflowError, StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("no tokens sent")]
    NoFundsSent,

    #[error("must send exactly one coin")]
    InvalidFunds,

    #[error("must send {expected}, got {denom}")]
    WrongDenom { expected: String, denom: String },

    #[error("amount must be greater than zero")]
    InvalidAmount,

    #[error("duration {duration} must be between 1 and {max} seconds")]
    InvalidDuration { duration: u64, max: u64 },

    #[error("early vesting fee {fee} outside [{min}, {max}]")]
    InvalidEarlyVestingFee { fee: u8, min: u8, max: u8 },

    #[error("escrow holds {available}, needs {required} to cover all entries")]
    InsufficientContractBalance {
        required: Uint128,
        available: Uint128,
    },

    #[error("insufficient unstaked escrow: requested {requested}, available {available}")]
    InsufficientUnstakedEscrow {
        requested: Uint128,
        available: Uint128,
    },

    #[error("treasury must be set before fees can be collected")]
    TreasuryNotSet,

    #[error("staking rewards contract is not set")]
    StakingRewardsNotSet,

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("{field} is already set")]
    AlreadySet { field: String },
}
