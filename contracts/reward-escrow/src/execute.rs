use cosmwasm_std::{
    coins, to_json_binary, Addr, BankMsg, CosmosMsg, DepsMut, Env, Event, MessageInfo,
    QuerierWrapper, Response, StdResult, Uint128, WasmMsg,
};
use vestige_common::{StakingRewardsExecuteMsg, StakingRewardsQueryMsg};

use crate::error::ContractError;
use crate::state::{
    Config, VestingEntry, ACCOUNT_ENTRIES, ACCOUNT_ENTRY_COUNT, CONFIG, NEXT_ENTRY_ID,
    TOTAL_ESCROWED_ACCOUNT_BALANCE, TOTAL_ESCROWED_BALANCE, TOTAL_VESTED_ACCOUNT_BALANCE,
    VESTING_ENTRIES,
};
use crate::vesting::{claimable_and_fee, validate_duration, validate_early_vesting_fee};

fn ensure_admin(config: &Config, info: &MessageInfo) -> Result<(), ContractError> {
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can perform this action".to_string(),
        });
    }
    Ok(())
}

/// Escrowed principal `account` has staked, as reported by the staking
/// rewards contract. Zero while that contract is not set.
pub fn staked_escrow(
    querier: &QuerierWrapper,
    config: &Config,
    account: &Addr,
) -> StdResult<Uint128> {
    match &config.staking_rewards {
        Some(staking_rewards) => querier.query_wasm_smart(
            staking_rewards,
            &StakingRewardsQueryMsg::EscrowedBalance {
                address: account.to_string(),
            },
        ),
        None => Ok(Uint128::zero()),
    }
}

/// Validate and record a new entry. The tokens backing it must already be in
/// the contract's balance.
fn append_entry(
    deps: DepsMut,
    env: &Env,
    config: &Config,
    beneficiary: &Addr,
    amount: Uint128,
    duration: u64,
    early_vesting_fee: u8,
) -> Result<VestingEntry, ContractError> {
    if amount.is_zero() {
        return Err(ContractError::InvalidAmount);
    }
    validate_duration(duration, config.max_duration)?;
    validate_early_vesting_fee(early_vesting_fee)?;

    let total_escrowed = TOTAL_ESCROWED_BALANCE.load(deps.storage)?;
    let required = total_escrowed.checked_add(amount)?;
    let available = deps
        .querier
        .query_balance(&env.contract.address, &config.denom)?
        .amount;
    if available < required {
        return Err(ContractError::InsufficientContractBalance {
            required,
            available,
        });
    }

    let entry_id = NEXT_ENTRY_ID.load(deps.storage)?;
    let entry = VestingEntry {
        entry_id,
        beneficiary: beneficiary.clone(),
        escrow_amount: amount,
        end_time: env.block.time.seconds() + duration,
        duration,
        early_vesting_fee,
    };

    VESTING_ENTRIES.save(deps.storage, entry_id, &entry)?;
    ACCOUNT_ENTRIES.save(deps.storage, (beneficiary, entry_id), &())?;
    ACCOUNT_ENTRY_COUNT.update(deps.storage, beneficiary, |count| -> StdResult<_> {
        Ok(count.unwrap_or_default() + 1)
    })?;
    NEXT_ENTRY_ID.save(deps.storage, &(entry_id + 1))?;
    TOTAL_ESCROWED_BALANCE.save(deps.storage, &required)?;
    TOTAL_ESCROWED_ACCOUNT_BALANCE.update(deps.storage, beneficiary, |balance| -> StdResult<_> {
        Ok(balance.unwrap_or_default().checked_add(amount)?)
    })?;

    Ok(entry)
}

fn entry_created_event(entry: &VestingEntry) -> Event {
    Event::new("vestige_vesting_entry_created")
        .add_attribute("entry_id", entry.entry_id.to_string())
        .add_attribute("beneficiary", entry.beneficiary.to_string())
        .add_attribute("amount", entry.escrow_amount.to_string())
        .add_attribute("end_time", entry.end_time.to_string())
        .add_attribute("early_vesting_fee", entry.early_vesting_fee.to_string())
}

/// Record rewards the staking rewards contract sent along with this call.
pub fn append_vesting_entry(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    account: String,
    amount: Uint128,
    duration: Option<u64>,
    early_vesting_fee: Option<u8>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if config.staking_rewards.as_ref() != Some(&info.sender) {
        return Err(ContractError::Unauthorized {
            reason: "only the staking rewards contract can append entries".to_string(),
        });
    }
    if let Some(coin) = info.funds.iter().find(|c| c.denom != config.denom) {
        return Err(ContractError::WrongDenom {
            expected: config.denom.clone(),
            denom: coin.denom.clone(),
        });
    }

    let account = deps.api.addr_validate(&account)?;
    let entry = append_entry(
        deps,
        &env,
        &config,
        &account,
        amount,
        duration.unwrap_or(config.default_duration),
        early_vesting_fee.unwrap_or(config.default_early_vesting_fee),
    )?;

    Ok(Response::new()
        .add_attribute("action", "append_vesting_entry")
        .add_attribute("account", account.to_string())
        .add_attribute("entry_id", entry.entry_id.to_string())
        .add_event(entry_created_event(&entry)))
}

/// Lock the coin sent with this call for `beneficiary`.
pub fn create_escrow_entry(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    beneficiary: String,
    duration: u64,
    early_vesting_fee: u8,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    if info.funds.is_empty() {
        return Err(ContractError::NoFundsSent);
    }
    if info.funds.len() != 1 {
        return Err(ContractError::InvalidFunds);
    }
    let sent = &info.funds[0];
    if sent.denom != config.denom {
        return Err(ContractError::WrongDenom {
            expected: config.denom.clone(),
            denom: sent.denom.clone(),
        });
    }
    let amount = sent.amount;

    let beneficiary = deps.api.addr_validate(&beneficiary)?;
    let entry = append_entry(
        deps,
        &env,
        &config,
        &beneficiary,
        amount,
        duration,
        early_vesting_fee,
    )?;

    Ok(Response::new()
        .add_attribute("action", "create_escrow_entry")
        .add_attribute("funder", info.sender.to_string())
        .add_attribute("beneficiary", beneficiary.to_string())
        .add_attribute("entry_id", entry.entry_id.to_string())
        .add_event(entry_created_event(&entry)))
}

/// Vest the caller's entries, paying the claimable part to the caller and the
/// early vesting fee to the treasury.
pub fn vest(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    entry_ids: Vec<u64>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let now = env.block.time.seconds();
    let account = info.sender;

    let mut total = Uint128::zero();
    let mut total_fee = Uint128::zero();
    let mut vested: Vec<VestingEntry> = Vec::new();
    for entry_id in entry_ids {
        if vested.iter().any(|e| e.entry_id == entry_id) {
            continue;
        }
        let Some(entry) = VESTING_ENTRIES.may_load(deps.storage, entry_id)? else {
            continue;
        };
        if entry.beneficiary != account || entry.escrow_amount.is_zero() {
            continue;
        }
        let (_, fee) = claimable_and_fee(&entry, now)?;
        total = total.checked_add(entry.escrow_amount)?;
        total_fee = total_fee.checked_add(fee)?;
        vested.push(entry);
    }

    if total.is_zero() {
        return Ok(Response::new()
            .add_attribute("action", "vest")
            .add_attribute("account", account.to_string())
            .add_attribute("total", "0"));
    }

    let treasury = match (&config.treasury, total_fee.is_zero()) {
        (_, true) => None,
        (Some(treasury), false) => Some(treasury.clone()),
        (None, false) => return Err(ContractError::TreasuryNotSet),
    };

    // Principal staked with the staking rewards contract has to be released
    // before it can leave the escrow.
    let escrowed = TOTAL_ESCROWED_ACCOUNT_BALANCE
        .may_load(deps.storage, &account)?
        .unwrap_or_default();
    let staked = staked_escrow(&deps.querier, &config, &account)?;
    let unstaked = escrowed.saturating_sub(staked);

    let mut messages: Vec<CosmosMsg> = Vec::new();
    if total > unstaked {
        if let Some(staking_rewards) = &config.staking_rewards {
            messages.push(
                WasmMsg::Execute {
                    contract_addr: staking_rewards.to_string(),
                    msg: to_json_binary(&StakingRewardsExecuteMsg::UnstakeEscrowSkipCooldown {
                        account: account.to_string(),
                        amount: total - unstaked,
                    })?,
                    funds: vec![],
                }
                .into(),
            );
        }
    }

    let mut entry_ids = Vec::with_capacity(vested.len());
    for mut entry in vested {
        entry.escrow_amount = Uint128::zero();
        VESTING_ENTRIES.save(deps.storage, entry.entry_id, &entry)?;
        entry_ids.push(entry.entry_id.to_string());
    }
    TOTAL_ESCROWED_ACCOUNT_BALANCE.save(deps.storage, &account, &escrowed.checked_sub(total)?)?;
    TOTAL_ESCROWED_BALANCE.update(deps.storage, |balance| -> StdResult<_> {
        Ok(balance.checked_sub(total)?)
    })?;

    let claimable = total.checked_sub(total_fee)?;
    TOTAL_VESTED_ACCOUNT_BALANCE.update(deps.storage, &account, |balance| -> StdResult<_> {
        Ok(balance.unwrap_or_default().checked_add(claimable)?)
    })?;

    if !claimable.is_zero() {
        messages.push(
            BankMsg::Send {
                to_address: account.to_string(),
                amount: coins(claimable.u128(), &config.denom),
            }
            .into(),
        );
    }
    if let Some(treasury) = treasury {
        messages.push(
            BankMsg::Send {
                to_address: treasury.to_string(),
                amount: coins(total_fee.u128(), &config.denom),
            }
            .into(),
        );
    }

    Ok(Response::new()
        .add_messages(messages)
        .add_attribute("action", "vest")
        .add_attribute("account", account.to_string())
        .add_attribute("total", total.to_string())
        .add_event(
            Event::new("vestige_vested")
                .add_attribute("account", account.to_string())
                .add_attribute("entry_ids", entry_ids.join(","))
                .add_attribute("claimable", claimable.to_string())
                .add_attribute("fee", total_fee.to_string()),
        ))
}

/// Stake part of the caller's unstaked escrow with the staking rewards contract.
pub fn stake_escrow(
    deps: DepsMut,
    info: MessageInfo,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let staking_rewards = config
        .staking_rewards
        .clone()
        .ok_or(ContractError::StakingRewardsNotSet)?;
    if amount.is_zero() {
        return Err(ContractError::InvalidAmount);
    }

    let escrowed = TOTAL_ESCROWED_ACCOUNT_BALANCE
        .may_load(deps.storage, &info.sender)?
        .unwrap_or_default();
    let staked = staked_escrow(&deps.querier, &config, &info.sender)?;
    let available = escrowed.saturating_sub(staked);
    if amount > available {
        return Err(ContractError::InsufficientUnstakedEscrow {
            requested: amount,
            available,
        });
    }

    let stake_msg = WasmMsg::Execute {
        contract_addr: staking_rewards.to_string(),
        msg: to_json_binary(&StakingRewardsExecuteMsg::StakeEscrow {
            account: info.sender.to_string(),
            amount,
        })?,
        funds: vec![],
    };

    Ok(Response::new()
        .add_message(stake_msg)
        .add_attribute("action", "stake_escrow")
        .add_attribute("account", info.sender.to_string())
        .add_attribute("amount", amount.to_string()))
}

/// Unstake escrow from the staking rewards contract, which enforces the cooldown.
pub fn unstake_escrow(
    deps: DepsMut,
    info: MessageInfo,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let staking_rewards = config
        .staking_rewards
        .ok_or(ContractError::StakingRewardsNotSet)?;
    if amount.is_zero() {
        return Err(ContractError::InvalidAmount);
    }

    let unstake_msg = WasmMsg::Execute {
        contract_addr: staking_rewards.to_string(),
        msg: to_json_binary(&StakingRewardsExecuteMsg::UnstakeEscrow {
            account: info.sender.to_string(),
            amount,
        })?,
        funds: vec![],
    };

    Ok(Response::new()
        .add_message(unstake_msg)
        .add_attribute("action", "unstake_escrow")
        .add_attribute("account", info.sender.to_string())
        .add_attribute("amount", amount.to_string()))
}

/// Admin only. Can be called once.
pub fn set_staking_rewards(
    deps: DepsMut,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;
    if config.staking_rewards.is_some() {
        return Err(ContractError::AlreadySet {
            field: "staking_rewards".to_string(),
        });
    }

    let staking_rewards = deps.api.addr_validate(&address)?;
    config.staking_rewards = Some(staking_rewards.clone());
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "set_staking_rewards")
        .add_event(
            Event::new("vestige_staking_rewards_set")
                .add_attribute("staking_rewards", staking_rewards.to_string()),
        ))
}

/// Admin only. Can be called once.
pub fn set_treasury_dao(
    deps: DepsMut,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;
    if config.treasury.is_some() {
        return Err(ContractError::AlreadySet {
            field: "treasury".to_string(),
        });
    }

    let treasury = deps.api.addr_validate(&address)?;
    config.treasury = Some(treasury.clone());
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "set_treasury_dao")
        .add_event(
            Event::new("vestige_treasury_set").add_attribute("treasury", treasury.to_string()),
        ))
}
