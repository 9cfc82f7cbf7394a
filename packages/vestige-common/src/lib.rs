pub mod curve;
pub mod math;
pub mod msg;
pub mod score;

pub use curve::{ExponentialDecay, FlatRate, RewardCurve, RewardCurveConfig};
pub use msg::{EscrowExecuteMsg, StakingRewardsExecuteMsg, StakingRewardsQueryMsg};
pub use score::ScoreWeighting;

pub const DAY: u64 = 86_400;
pub const WEEK: u64 = 7 * DAY;
/// 52 weeks, the protocol's notion of a year.
pub const YEAR: u64 = 52 * WEEK;
