use cosmwasm_std::{
    entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult, Uint128,
};
use cw2::{get_contract_version, set_contract_version};

use crate::error::ContractError;
use crate::execute;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query;
use crate::state::{Config, CONFIG, NEXT_ENTRY_ID, TOTAL_ESCROWED_BALANCE};
use crate::vesting::{
    validate_duration, validate_early_vesting_fee, DEFAULT_DURATION, DEFAULT_EARLY_VESTING_FEE,
    MAX_DURATION,
};

const CONTRACT_NAME: &str = "crates.io:vestige-reward-escrow";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    if msg.denom.is_empty() {
        return Err(ContractError::InvalidConfig {
            reason: "denom must not be empty".to_string(),
        });
    }

    let default_duration = msg.default_duration.unwrap_or(DEFAULT_DURATION);
    validate_duration(default_duration, MAX_DURATION)?;
    let default_early_vesting_fee = msg
        .default_early_vesting_fee
        .unwrap_or(DEFAULT_EARLY_VESTING_FEE);
    validate_early_vesting_fee(default_early_vesting_fee)?;

    let config = Config {
        admin: info.sender.clone(),
        denom: msg.denom,
        staking_rewards: msg
            .staking_rewards
            .map(|addr| deps.api.addr_validate(&addr))
            .transpose()?,
        treasury: msg
            .treasury
            .map(|addr| deps.api.addr_validate(&addr))
            .transpose()?,
        default_duration,
        default_early_vesting_fee,
        max_duration: MAX_DURATION,
    };
    CONFIG.save(deps.storage, &config)?;
    NEXT_ENTRY_ID.save(deps.storage, &1)?;
    TOTAL_ESCROWED_BALANCE.save(deps.storage, &Uint128::zero())?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "reward-escrow")
        .add_attribute("admin", info.sender.to_string())
        .add_attribute("denom", config.denom))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::AppendVestingEntry {
            account,
            amount,
            duration,
            early_vesting_fee,
        } => execute::append_vesting_entry(
            deps,
            env,
            info,
            account,
            amount,
            duration,
            early_vesting_fee,
        ),
        ExecuteMsg::CreateEscrowEntry {
            beneficiary,
            duration,
            early_vesting_fee,
        } => execute::create_escrow_entry(
            deps,
            env,
            info,
            beneficiary,
            duration,
            early_vesting_fee,
        ),
        ExecuteMsg::Vest { entry_ids } => execute::vest(deps, env, info, entry_ids),
        ExecuteMsg::StakeEscrow { amount } => execute::stake_escrow(deps, info, amount),
        ExecuteMsg::UnstakeEscrow { amount } => execute::unstake_escrow(deps, info, amount),
        ExecuteMsg::SetStakingRewards { address } => {
            execute::set_staking_rewards(deps, info, address)
        }
        ExecuteMsg::SetTreasuryDAO { address } => execute::set_treasury_dao(deps, info, address),
    }
}

#[entry_point]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::VestingEntry { entry_id } => query::query_vesting_entry(deps, entry_id),
        QueryMsg::VestingEntryClaimable { entry_id } => {
            query::query_vesting_entry_claimable(deps, env, entry_id)
        }
        QueryMsg::VestingQuantity { address, entry_ids } => {
            query::query_vesting_quantity(deps, env, address, entry_ids)
        }
        QueryMsg::VestingSchedules {
            address,
            start_after,
            limit,
        } => query::query_vesting_schedules(deps, address, start_after, limit),
        QueryMsg::AccountVestingEntryIds {
            address,
            start_after,
            limit,
        } => query::query_account_vesting_entry_ids(deps, address, start_after, limit),
        QueryMsg::NumVestingEntries { address } => query::query_num_vesting_entries(deps, address),
        QueryMsg::BalanceOf { address } => query::query_balance_of(deps, address),
        QueryMsg::TotalEscrowedBalance {} => query::query_total_escrowed_balance(deps),
        QueryMsg::TotalVestedAccountBalance { address } => {
            query::query_total_vested_account_balance(deps, address)
        }
        QueryMsg::UnstakedEscrowedBalance { address } => {
            query::query_unstaked_escrowed_balance(deps, address)
        }
    }
}

#[entry_point]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::Unauthorized {
            reason: "Cannot migrate from different contract type".to_string(),
        });
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", stored.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}
