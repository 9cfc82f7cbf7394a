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

    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        requested: Uint128,
        available: Uint128,
    },

    #[error("{amount} is below the safety minimum {safety_minimum}")]
    BelowSafetyMinimum {
        amount: Uint128,
        safety_minimum: Uint128,
    },

    #[error("reward too high: period would emit {required}, contract holds {available}")]
    RewardTooHigh {
        required: Uint128,
        available: Uint128,
    },

    #[error("stake is locked until {unlock_time}")]
    MustWaitForUnlock { unlock_time: u64 },

    #[error("previous reward period must finish first (ends at {period_finish})")]
    RewardsPeriodActive { period_finish: u64 },

    #[error("rewards duration must be greater than zero")]
    InvalidRewardsDuration,

    #[error("cooldown period {value} outside [{min}, {max}]")]
    InvalidCooldownPeriod { value: u64, min: u64, max: u64 },

    #[error("staking is paused")]
    Paused,

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}
