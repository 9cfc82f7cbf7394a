use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Decimal, Decimal256, StdError, StdResult, Uint128};

use crate::math::{checked_ratio, exp_neg};

/// Shape of the reward emission over a reward period.
///
/// `elapsed`, `from` and `to` are seconds since the start of the period.
/// `base_rate` is tokens per second at the start of the period.
pub trait RewardCurve {
    /// Instantaneous emission rate `elapsed` seconds into the period.
    fn rate(&self, base_rate: Decimal256, elapsed: u64) -> StdResult<Decimal256>;

    /// Tokens emitted between `from` and `to` seconds into the period.
    fn emitted(&self, base_rate: Decimal256, from: u64, to: u64) -> StdResult<Decimal256>;

    /// Base rate that emits `total` tokens over `duration` seconds.
    fn base_rate_for(&self, total: Uint128, duration: u64) -> StdResult<Decimal256>;
}

/// Constant emission: `rate(t) = base_rate`.
pub struct FlatRate;

impl RewardCurve for FlatRate {
    fn rate(&self, base_rate: Decimal256, _elapsed: u64) -> StdResult<Decimal256> {
        Ok(base_rate)
    }

    fn emitted(&self, base_rate: Decimal256, from: u64, to: u64) -> StdResult<Decimal256> {
        let span = to.saturating_sub(from);
        Ok(base_rate.checked_mul(Decimal256::from_ratio(span, 1u128))?)
    }

    fn base_rate_for(&self, total: Uint128, duration: u64) -> StdResult<Decimal256> {
        checked_ratio(Decimal256::from_ratio(total, 1u128), Uint128::from(duration))
    }
}

/// Exponentially decaying emission: `rate(t) = base_rate * e^(-k t)`.
pub struct ExponentialDecay {
    pub decay_per_second: Decimal256,
}

impl ExponentialDecay {
    fn decay_factor(&self, seconds: u64) -> StdResult<Decimal256> {
        let kt = self
            .decay_per_second
            .checked_mul(Decimal256::from_ratio(seconds, 1u128))?;
        exp_neg(kt)
    }
}

impl RewardCurve for ExponentialDecay {
    fn rate(&self, base_rate: Decimal256, elapsed: u64) -> StdResult<Decimal256> {
        Ok(base_rate.checked_mul(self.decay_factor(elapsed)?)?)
    }

    fn emitted(&self, base_rate: Decimal256, from: u64, to: u64) -> StdResult<Decimal256> {
        if to <= from {
            return Ok(Decimal256::zero());
        }
        // base / k * (e^(-k from) - e^(-k to))
        let window = self
            .decay_factor(from)?
            .saturating_sub(self.decay_factor(to)?);
        let scaled = base_rate.checked_mul(window)?;
        scaled
            .checked_div(self.decay_per_second)
            .map_err(|e| StdError::generic_err(e.to_string()))
    }

    fn base_rate_for(&self, total: Uint128, duration: u64) -> StdResult<Decimal256> {
        // total * k / (1 - e^(-k duration))
        let coverage = Decimal256::one().saturating_sub(self.decay_factor(duration)?);
        if coverage.is_zero() {
            return Err(StdError::generic_err(
                "decay too slow for the reward duration",
            ));
        }
        Decimal256::from_ratio(total, 1u128)
            .checked_mul(self.decay_per_second)?
            .checked_div(coverage)
            .map_err(|e| StdError::generic_err(e.to_string()))
    }
}

/// Reward curve selected at instantiation.
#[cw_serde]
pub enum RewardCurveConfig {
    Flat {},
    ExponentialDecay { decay_per_second: Decimal },
}

impl Default for RewardCurveConfig {
    fn default() -> Self {
        RewardCurveConfig::Flat {}
    }
}

impl RewardCurveConfig {
    pub fn validate(&self) -> StdResult<()> {
        match self {
            RewardCurveConfig::Flat {} => Ok(()),
            RewardCurveConfig::ExponentialDecay { decay_per_second } => {
                if decay_per_second.is_zero() || *decay_per_second >= Decimal::one() {
                    return Err(StdError::generic_err(
                        "decay_per_second must be in (0, 1)",
                    ));
                }
                Ok(())
            }
        }
    }

    pub fn curve(&self) -> Box<dyn RewardCurve> {
        match self {
            RewardCurveConfig::Flat {} => Box::new(FlatRate),
            RewardCurveConfig::ExponentialDecay { decay_per_second } => {
                Box::new(ExponentialDecay {
                    decay_per_second: Decimal256::from(*decay_per_second),
                })
            }
        }
    }
}
