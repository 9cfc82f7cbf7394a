use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Decimal, StdError, StdResult, Uint128};

use crate::math::weighted_geometric_mean;

/// How a staker's reward score is derived from stake and trading fees.
#[cw_serde]
pub enum ScoreWeighting {
    /// Score equals the staked balance; trader score is ignored.
    Linear {},
    /// `staked^w * trader_score^(1 - w)`.
    CobbDouglas { staking_weight: Decimal },
}

impl Default for ScoreWeighting {
    fn default() -> Self {
        ScoreWeighting::Linear {}
    }
}

impl ScoreWeighting {
    pub fn validate(&self) -> StdResult<()> {
        match self {
            ScoreWeighting::Linear {} => Ok(()),
            ScoreWeighting::CobbDouglas { staking_weight } => {
                if staking_weight.is_zero() || *staking_weight >= Decimal::one() {
                    return Err(StdError::generic_err("staking_weight must be in (0, 1)"));
                }
                Ok(())
            }
        }
    }

    pub fn reward_score(&self, staked: Uint128, trader_score: Uint128) -> StdResult<Uint128> {
        match self {
            ScoreWeighting::Linear {} => Ok(staked),
            ScoreWeighting::CobbDouglas { staking_weight } => {
                weighted_geometric_mean(staked, trader_score, *staking_weight)
            }
        }
    }
}
