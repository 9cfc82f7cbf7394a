use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Uint128};
use cw_storage_plus::{Item, Map};

pub const CONFIG: Item<Config> = Item::new("config");
pub const NEXT_ENTRY_ID: Item<u64> = Item::new("next_entry_id");
pub const VESTING_ENTRIES: Map<u64, VestingEntry> = Map::new("vesting_entries");
/// (beneficiary, entry_id) index used for per-account listing.
pub const ACCOUNT_ENTRIES: Map<(&Addr, u64), ()> = Map::new("account_entries");
pub const ACCOUNT_ENTRY_COUNT: Map<&Addr, u64> = Map::new("account_entry_count");
pub const TOTAL_ESCROWED_ACCOUNT_BALANCE: Map<&Addr, Uint128> =
    Map::new("total_escrowed_account_balance");
pub const TOTAL_VESTED_ACCOUNT_BALANCE: Map<&Addr, Uint128> =
    Map::new("total_vested_account_balance");
pub const TOTAL_ESCROWED_BALANCE: Item<Uint128> = Item::new("total_escrowed_balance");

#[cw_serde]
pub struct Config {
    pub admin: Addr,
    pub denom: String,
    /// Only caller of AppendVestingEntry. Set once.
    pub staking_rewards: Option<Addr>,
    /// Receives early vesting fees. Set once.
    pub treasury: Option<Addr>,
    pub default_duration: u64,
    /// Percentage points
    pub default_early_vesting_fee: u8,
    pub max_duration: u64,
}

#[cw_serde]
pub struct VestingEntry {
    pub entry_id: u64,
    pub beneficiary: Addr,
    /// Unvested amount. Only ever decreases, to zero once vested.
    pub escrow_amount: Uint128,
    pub end_time: u64,
    pub duration: u64,
    /// Percentage points charged when vesting at the very start of the entry.
    pub early_vesting_fee: u8,
}
