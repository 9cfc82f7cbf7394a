use cosmwasm_std::{
    entry_point, Binary, Decimal256, Deps, DepsMut, Env, MessageInfo, Response, StdResult, Uint128,
};
use cw2::{get_contract_version, set_contract_version};

use crate::error::ContractError;
use crate::execute;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query;
use crate::rewards::epoch_at;
use crate::state::{Config, RewardState, CONFIG, EPOCH_CHECKPOINTS, REWARD_STATE};

const CONTRACT_NAME: &str = "crates.io:vestige-staking-rewards";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    if msg.staking_denom.is_empty() || msg.reward_denom.is_empty() {
        return Err(ContractError::InvalidConfig {
            reason: "denoms must not be empty".to_string(),
        });
    }

    let rewards_duration = msg
        .rewards_duration
        .unwrap_or(execute::DEFAULT_REWARDS_DURATION);
    if rewards_duration == 0 {
        return Err(ContractError::InvalidRewardsDuration);
    }
    let cooldown_period = msg
        .cooldown_period
        .unwrap_or(execute::DEFAULT_COOLDOWN_PERIOD);
    execute::validate_cooldown_period(cooldown_period)?;

    let score_weighting = msg.score_weighting.unwrap_or_default();
    score_weighting
        .validate()
        .map_err(|e| ContractError::InvalidConfig {
            reason: e.to_string(),
        })?;
    let reward_curve = msg.reward_curve.unwrap_or_default();
    reward_curve
        .validate()
        .map_err(|e| ContractError::InvalidConfig {
            reason: e.to_string(),
        })?;

    let now = env.block.time.seconds();
    let epoch_anchor = msg.epoch_anchor.unwrap_or(now);

    let config = Config {
        admin: info.sender.clone(),
        staking_denom: msg.staking_denom,
        reward_denom: msg.reward_denom,
        reward_escrow: deps.api.addr_validate(&msg.reward_escrow)?,
        reward_notifier: deps.api.addr_validate(&msg.reward_notifier)?,
        exchanger_proxy: deps.api.addr_validate(&msg.exchanger_proxy)?,
        rewards_duration,
        cooldown_period,
        safety_minimum: msg.safety_minimum.unwrap_or_default(),
        score_weighting,
        reward_curve,
        epoch_anchor,
        paused: false,
    };
    CONFIG.save(deps.storage, &config)?;

    let current_epoch = epoch_at(epoch_anchor, now);
    let state = RewardState {
        total_staked: Uint128::zero(),
        total_escrow_staked: Uint128::zero(),
        total_reward_score: Uint128::zero(),
        reward_rate: Decimal256::zero(),
        reward_per_score_stored: Decimal256::zero(),
        last_update_time: now,
        period_start: now,
        period_finish: now,
        current_epoch,
    };
    REWARD_STATE.save(deps.storage, &state)?;
    EPOCH_CHECKPOINTS.save(deps.storage, current_epoch, &Decimal256::zero())?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "staking-rewards")
        .add_attribute("admin", info.sender.to_string())
        .add_attribute("reward_escrow", config.reward_escrow.to_string()))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::Stake {} => execute::stake(deps, env, info),
        ExecuteMsg::Unstake { amount } => execute::unstake(deps, env, info, amount),
        ExecuteMsg::GetReward {} => execute::get_reward(deps, env, info),
        ExecuteMsg::Exit {} => execute::exit(deps, env, info),
        ExecuteMsg::UpdateTraderScore {
            account,
            fee_amount,
        } => execute::update_trader_score(deps, env, info, account, fee_amount),
        ExecuteMsg::NotifyRewardAmount { reward } | ExecuteMsg::SetRewards { reward } => {
            execute::notify_reward_amount(deps, env, info, reward)
        }
        ExecuteMsg::StakeEscrow { account, amount } => {
            execute::stake_escrow(deps, env, info, account, amount)
        }
        ExecuteMsg::UnstakeEscrow { account, amount } => {
            execute::unstake_escrow(deps, env, info, account, amount, false)
        }
        ExecuteMsg::UnstakeEscrowSkipCooldown { account, amount } => {
            execute::unstake_escrow(deps, env, info, account, amount, true)
        }
        ExecuteMsg::SetRewardsDuration { duration } => {
            execute::set_rewards_duration(deps, env, info, duration)
        }
        ExecuteMsg::SetCooldownPeriod { cooldown_period } => {
            execute::set_cooldown_period(deps, info, cooldown_period)
        }
        ExecuteMsg::Pause {} => execute::set_paused(deps, info, true),
        ExecuteMsg::Unpause {} => execute::set_paused(deps, info, false),
        ExecuteMsg::RecoverTokens { denom, amount } => {
            execute::recover_tokens(deps, info, denom, amount)
        }
        ExecuteMsg::UpdateAdmin { admin } => execute::update_admin(deps, info, admin),
    }
}

#[entry_point]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::RewardState {} => query::query_reward_state(deps),
        QueryMsg::StakerInfo { address } => query::query_staker_info(deps, env, address),
        QueryMsg::Earned { address } => query::query_earned(deps, env, address),
        QueryMsg::RewardPerRewardScore {} => query::query_reward_per_reward_score(deps, env),
        QueryMsg::RewardRate {} => query::query_reward_rate(deps, env),
        QueryMsg::LastTimeRewardApplicable {} => {
            query::query_last_time_reward_applicable(deps, env)
        }
        QueryMsg::RewardForDuration {} => query::query_reward_for_duration(deps),
        QueryMsg::EscrowedBalance { address } => query::query_escrowed_balance(deps, address),
        QueryMsg::UnstakedBalance { address } => query::query_unstaked_balance(deps, address),
        QueryMsg::Epoch {} => query::query_epoch(deps, env),
        QueryMsg::EpochCheckpoint { epoch } => query::query_epoch_checkpoint(deps, epoch),
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
