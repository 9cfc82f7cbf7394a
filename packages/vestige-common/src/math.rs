//! 18-decimal fixed-point helpers built on `Decimal256`.
//!
//! Only the non-negative half of the real line is needed by the protocol:
//! `ln` is evaluated for `x >= 1` (token amounts are whole units) and `exp`
//! for `y >= 0`. Every result rounds toward zero.

use cosmwasm_std::{Decimal, Decimal256, StdError, StdResult, Uint128, Uint256};

/// ln(2) rounded down to 18 decimals.
pub const LN_2: Decimal256 = Decimal256::raw(693_147_180_559_945_309);

/// e^-x is below one atomic unit (1e-18) past this point.
const EXP_NEG_CUTOFF: u128 = 42;

/// Largest power of two `exp` is allowed to scale by before `Decimal256` overflows.
const MAX_EXP_SHIFT: u32 = 190;

const MAX_SERIES_TERMS: u32 = 96;

fn math_err<E: std::fmt::Display>(err: E) -> StdError {
    StdError::generic_err(format!("fixed-point math: {err}"))
}

fn whole(value: impl Into<Uint256>) -> Decimal256 {
    Decimal256::from_ratio(value, 1u128)
}

/// Natural logarithm for `x >= 1`.
///
/// Splits `x = 2^k * m` with `1 <= m < 2`, then evaluates
/// `ln(m) = 2 * atanh((m - 1) / (m + 1))` as a power series.
pub fn ln(x: Decimal256) -> StdResult<Decimal256> {
    let one = Decimal256::one();
    if x < one {
        return Err(StdError::generic_err("ln: argument must be >= 1"));
    }

    let atomics = x.atomics();
    let one_atomics = one.atomics();
    let mut k: u32 = 0;
    while (atomics >> (k + 1)) >= one_atomics {
        k += 1;
    }
    let m = Decimal256::new(atomics >> k);

    let z = (m - one).checked_div(m + one).map_err(math_err)?;
    let z_squared = z.checked_mul(z).map_err(math_err)?;

    let mut sum = Decimal256::zero();
    let mut power = z;
    let mut n: u32 = 1;
    while !power.is_zero() && n < MAX_SERIES_TERMS {
        let term = Decimal256::new(power.atomics() / Uint256::from(n));
        sum = sum.checked_add(term).map_err(math_err)?;
        power = power.checked_mul(z_squared).map_err(math_err)?;
        n += 2;
    }

    let ln_m = sum.checked_add(sum).map_err(math_err)?;
    let ln_pow2 = LN_2.checked_mul(whole(k)).map_err(math_err)?;
    ln_pow2.checked_add(ln_m).map_err(math_err)
}

/// `e^y` for `y >= 0`.
///
/// Range-reduces `y = k * ln(2) + r` with `0 <= r < ln(2)`, sums the Taylor
/// series for `e^r`, then scales by `2^k`.
pub fn exp(y: Decimal256) -> StdResult<Decimal256> {
    let k_wide = y.checked_div(LN_2).map_err(math_err)?.to_uint_floor();
    if k_wide > Uint256::from(MAX_EXP_SHIFT) {
        return Err(math_err("exp: result overflows Decimal256"));
    }
    let k = u32::try_from(Uint128::try_from(k_wide).map_err(math_err)?.u128())
        .map_err(math_err)?;

    let reduced = LN_2.checked_mul(whole(k)).map_err(math_err)?;
    let r = y.checked_sub(reduced).map_err(math_err)?;

    let mut sum = Decimal256::one();
    let mut term = Decimal256::one();
    let mut n: u32 = 1;
    while n < MAX_SERIES_TERMS {
        term = term.checked_mul(r).map_err(math_err)?;
        term = Decimal256::new(term.atomics() / Uint256::from(n));
        if term.is_zero() {
            break;
        }
        sum = sum.checked_add(term).map_err(math_err)?;
        n += 1;
    }

    let scale = Uint256::from(2u128).checked_pow(k).map_err(math_err)?;
    Ok(Decimal256::new(
        sum.atomics().checked_mul(scale).map_err(math_err)?,
    ))
}

/// `e^-x` for `x >= 0`, flushed to zero once it drops below one atomic unit.
pub fn exp_neg(x: Decimal256) -> StdResult<Decimal256> {
    if x >= whole(EXP_NEG_CUTOFF) {
        return Ok(Decimal256::zero());
    }
    Decimal256::one()
        .checked_div(exp(x)?)
        .map_err(math_err)
}

/// `a^w * b^(1-w)`, rounded down and never above `max(a, b)`.
///
/// Zero when either input is zero.
pub fn weighted_geometric_mean(a: Uint128, b: Uint128, weight_a: Decimal) -> StdResult<Uint128> {
    if a.is_zero() || b.is_zero() {
        return Ok(Uint128::zero());
    }
    let w = Decimal256::from(weight_a);
    if w > Decimal256::one() {
        return Err(StdError::generic_err("weight must be <= 1"));
    }
    let w_rest = Decimal256::one() - w;

    let ln_a = ln(whole(a))?;
    let ln_b = ln(whole(b))?;
    let exponent = ln_a
        .checked_mul(w)
        .map_err(math_err)?
        .checked_add(ln_b.checked_mul(w_rest).map_err(math_err)?)
        .map_err(math_err)?;

    let mean = Uint128::try_from(exp(exponent)?.to_uint_floor()).map_err(math_err)?;
    Ok(mean.min(a.max(b)))
}

/// Convert a fixed-point token amount to whole units, rounding down.
pub fn floor_to_uint128(value: Decimal256) -> StdResult<Uint128> {
    Uint128::try_from(value.to_uint_floor()).map_err(math_err)
}

/// `amount * factor`, rounded down to whole units.
pub fn mul_floor(amount: Uint128, factor: Decimal256) -> StdResult<Uint128> {
    let product = whole(amount).checked_mul(factor).map_err(math_err)?;
    floor_to_uint128(product)
}

/// `numerator / denominator` as a fixed-point ratio.
pub fn checked_ratio(numerator: Decimal256, denominator: Uint128) -> StdResult<Decimal256> {
    if denominator.is_zero() {
        return Err(StdError::generic_err("ratio: division by zero"));
    }
    numerator
        .checked_div(whole(denominator))
        .map_err(math_err)
}
