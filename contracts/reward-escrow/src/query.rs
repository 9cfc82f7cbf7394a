use cosmwasm_std::{to_json_binary, Binary, Deps, Env, Order, StdResult, Uint128};
use cw_storage_plus::Bound;

use crate::execute::staked_escrow;
use crate::msg::{VestingEntryClaimableResponse, VestingQuantityResponse};
use crate::state::{
    VestingEntry, ACCOUNT_ENTRIES, ACCOUNT_ENTRY_COUNT, CONFIG, TOTAL_ESCROWED_ACCOUNT_BALANCE,
    TOTAL_ESCROWED_BALANCE, TOTAL_VESTED_ACCOUNT_BALANCE, VESTING_ENTRIES,
};
use crate::vesting::claimable_and_fee;

const DEFAULT_LIMIT: u32 = 50;
const MAX_LIMIT: u32 = 500;

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_vesting_entry(deps: Deps, entry_id: u64) -> StdResult<Binary> {
    let entry = VESTING_ENTRIES.load(deps.storage, entry_id)?;
    to_json_binary(&entry)
}

pub fn query_vesting_entry_claimable(deps: Deps, env: Env, entry_id: u64) -> StdResult<Binary> {
    let entry = VESTING_ENTRIES.load(deps.storage, entry_id)?;
    let (claimable, fee) = claimable_and_fee(&entry, env.block.time.seconds())?;
    to_json_binary(&VestingEntryClaimableResponse { claimable, fee })
}

pub fn query_vesting_quantity(
    deps: Deps,
    env: Env,
    address: String,
    entry_ids: Vec<u64>,
) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    let now = env.block.time.seconds();

    let mut seen: Vec<u64> = Vec::new();
    let mut total = Uint128::zero();
    let mut fee = Uint128::zero();
    for entry_id in entry_ids {
        if seen.contains(&entry_id) {
            continue;
        }
        seen.push(entry_id);
        let Some(entry) = VESTING_ENTRIES.may_load(deps.storage, entry_id)? else {
            continue;
        };
        if entry.beneficiary != addr {
            continue;
        }
        let (entry_claimable, entry_fee) = claimable_and_fee(&entry, now)?;
        total = total.checked_add(entry_claimable)?;
        fee = fee.checked_add(entry_fee)?;
    }

    to_json_binary(&VestingQuantityResponse { total, fee })
}

fn account_entry_ids(
    deps: Deps,
    address: &str,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Vec<u64>> {
    let addr = deps.api.addr_validate(address)?;
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.map(Bound::exclusive);

    ACCOUNT_ENTRIES
        .prefix(&addr)
        .keys(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .collect()
}

pub fn query_account_vesting_entry_ids(
    deps: Deps,
    address: String,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    to_json_binary(&account_entry_ids(deps, &address, start_after, limit)?)
}

pub fn query_vesting_schedules(
    deps: Deps,
    address: String,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let entries = account_entry_ids(deps, &address, start_after, limit)?
        .into_iter()
        .map(|entry_id| VESTING_ENTRIES.load(deps.storage, entry_id))
        .collect::<StdResult<Vec<VestingEntry>>>()?;
    to_json_binary(&entries)
}

pub fn query_num_vesting_entries(deps: Deps, address: String) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    let count = ACCOUNT_ENTRY_COUNT
        .may_load(deps.storage, &addr)?
        .unwrap_or_default();
    to_json_binary(&count)
}

pub fn query_balance_of(deps: Deps, address: String) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    let balance = TOTAL_ESCROWED_ACCOUNT_BALANCE
        .may_load(deps.storage, &addr)?
        .unwrap_or_default();
    to_json_binary(&balance)
}

pub fn query_total_escrowed_balance(deps: Deps) -> StdResult<Binary> {
    to_json_binary(&TOTAL_ESCROWED_BALANCE.load(deps.storage)?)
}

pub fn query_total_vested_account_balance(deps: Deps, address: String) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    let vested = TOTAL_VESTED_ACCOUNT_BALANCE
        .may_load(deps.storage, &addr)?
        .unwrap_or_default();
    to_json_binary(&vested)
}

pub fn query_unstaked_escrowed_balance(deps: Deps, address: String) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    let config = CONFIG.load(deps.storage)?;
    let escrowed = TOTAL_ESCROWED_ACCOUNT_BALANCE
        .may_load(deps.storage, &addr)?
        .unwrap_or_default();
    let staked = staked_escrow(&deps.querier, &config, &addr)?;
    to_json_binary(&escrowed.saturating_sub(staked))
}
