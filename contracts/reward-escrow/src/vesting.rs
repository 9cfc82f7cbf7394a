//! Early vesting fee schedule.
//!
//! The fee on an entry starts at `early_vesting_fee` percent of the remaining
//! amount and decays linearly to zero at `end_time`. Rounding goes in the
//! beneficiary's favour: the fee is floored, so `claimable + fee` always equals
//! the remaining amount exactly.

use cosmwasm_std::{StdError, StdResult, Uint128};
use vestige_common::YEAR;

use crate::error::ContractError;
use crate::state::VestingEntry;

pub const MAX_DURATION: u64 = 4 * YEAR;
pub const DEFAULT_DURATION: u64 = YEAR;
pub const MIN_EARLY_VESTING_FEE: u8 = 50;
pub const MAX_EARLY_VESTING_FEE: u8 = 100;
pub const DEFAULT_EARLY_VESTING_FEE: u8 = 90;

pub fn validate_duration(duration: u64, max_duration: u64) -> Result<(), ContractError> {
    if duration == 0 || duration > max_duration {
        return Err(ContractError::InvalidDuration {
            duration,
            max: max_duration,
        });
    }
    Ok(())
}

pub fn validate_early_vesting_fee(fee: u8) -> Result<(), ContractError> {
    if !(MIN_EARLY_VESTING_FEE..=MAX_EARLY_VESTING_FEE).contains(&fee) {
        return Err(ContractError::InvalidEarlyVestingFee {
            fee,
            min: MIN_EARLY_VESTING_FEE,
            max: MAX_EARLY_VESTING_FEE,
        });
    }
    Ok(())
}

/// `(claimable, fee)` if `entry` were vested at `now`.
pub fn claimable_and_fee(entry: &VestingEntry, now: u64) -> StdResult<(Uint128, Uint128)> {
    let remaining = entry.escrow_amount;
    if remaining.is_zero() || entry.end_time <= now || entry.duration == 0 {
        return Ok((remaining, Uint128::zero()));
    }

    let time_until_vest = (entry.end_time - now).min(entry.duration);
    let numerator = Uint128::from(entry.early_vesting_fee).checked_mul(time_until_vest.into())?;
    let denominator = Uint128::from(entry.duration).checked_mul(Uint128::new(100))?;
    let fee = remaining
        .checked_multiply_ratio(numerator, denominator)
        .map_err(|e| StdError::generic_err(e.to_string()))?;

    Ok((remaining.checked_sub(fee)?, fee))
}
