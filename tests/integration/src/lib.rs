//! Two-contract harness for the integration tests.
//!
//! Each contract keeps its own mock storage. A small in-memory bank tracks the
//! single token both contracts use, and messages returned by one contract are
//! routed to the other (or to the bank) in order, the way the chain would run
//! them. A transaction is all-or-nothing: both storages and the bank are
//! snapshotted before the outermost call and restored if it, or any message
//! it dispatches, fails.

use std::collections::HashMap;

use cosmwasm_std::testing::{
    message_info, mock_dependencies, mock_env, MockApi, MockQuerier, MockStorage,
};
use cosmwasm_std::{
    coins, from_json, to_json_binary, Addr, BankMsg, Binary, Coin, ContractResult, CosmosMsg,
    Env, Order, OwnedDeps, Record, Response, StdResult, Storage, SystemError, SystemResult,
    Timestamp, Uint128, WasmMsg, WasmQuery,
};
use serde::de::DeserializeOwned;
use vestige_common::StakingRewardsQueryMsg;
use vestige_reward_escrow as escrow;
use vestige_staking_rewards as ledger;

pub const DENOM: &str = "uvest";

pub type MockDeps = OwnedDeps<MockStorage, MockApi, MockQuerier>;

pub fn addr(name: &str) -> Addr {
    MockApi::default().addr_make(name)
}

struct Snapshot {
    ledger: Vec<Record>,
    escrow: Vec<Record>,
    bank: HashMap<Addr, u128>,
}

fn dump(storage: &MockStorage) -> Vec<Record> {
    storage.range(None, None, Order::Ascending).collect()
}

fn load(records: Vec<Record>) -> MockStorage {
    let mut storage = MockStorage::new();
    for (key, value) in records {
        storage.set(&key, &value);
    }
    storage
}

pub struct Suite {
    pub ledger: MockDeps,
    pub escrow: MockDeps,
    pub ledger_addr: Addr,
    pub escrow_addr: Addr,
    pub bank: HashMap<Addr, u128>,
    pub time: u64,
}

impl Suite {
    /// Escrow first, then the ledger pointing at it, then the escrow's
    /// one-time link back to the ledger.
    pub fn new(ledger_msg: impl FnOnce(&Addr) -> ledger::msg::InstantiateMsg) -> Self {
        let mut suite = Suite {
            ledger: mock_dependencies(),
            escrow: mock_dependencies(),
            ledger_addr: addr("staking_rewards_contract"),
            escrow_addr: addr("reward_escrow_contract"),
            bank: HashMap::new(),
            time: mock_env().block.time.seconds(),
        };

        let admin = addr("admin");
        let env = suite.env_for(&suite.escrow_addr);
        escrow::contract::instantiate(
            suite.escrow.as_mut(),
            env,
            message_info(&admin, &[]),
            escrow::msg::InstantiateMsg {
                denom: DENOM.to_string(),
                staking_rewards: None,
                treasury: Some(addr("treasury").to_string()),
                default_duration: None,
                default_early_vesting_fee: None,
            },
        )
        .unwrap();

        let msg = ledger_msg(&suite.escrow_addr);
        let env = suite.env_for(&suite.ledger_addr);
        ledger::contract::instantiate(suite.ledger.as_mut(), env, message_info(&admin, &[]), msg)
            .unwrap();

        let ledger_addr = suite.ledger_addr.clone();
        let escrow_addr = suite.escrow_addr.clone();
        suite
            .execute(
                &admin,
                &escrow_addr,
                &escrow::msg::ExecuteMsg::SetStakingRewards {
                    address: ledger_addr.to_string(),
                },
                0,
            )
            .unwrap();

        suite
    }

    pub fn env_for(&self, contract: &Addr) -> Env {
        let mut env = mock_env();
        env.block.time = Timestamp::from_seconds(self.time);
        env.contract.address = contract.clone();
        env
    }

    pub fn advance(&mut self, seconds: u64) {
        self.time += seconds;
    }

    pub fn mint(&mut self, to: &Addr, amount: u128) {
        *self.bank.entry(to.clone()).or_default() += amount;
    }

    pub fn balance(&self, of: &Addr) -> u128 {
        self.bank.get(of).copied().unwrap_or_default()
    }

    pub fn transfer(&mut self, from: &Addr, to: &Addr, amount: u128) -> Result<(), String> {
        if amount == 0 {
            return Ok(());
        }
        let available = self.balance(from);
        if available < amount {
            return Err(format!("{from} has {available}{DENOM}, needs {amount}"));
        }
        self.bank.insert(from.clone(), available - amount);
        self.mint(to, amount);
        Ok(())
    }

    /// Push bank balances and the ledger's escrow stakes into the mock
    /// queriers the contracts read from.
    fn sync_queriers(&mut self) {
        let ledger_balance = self.balance(&self.ledger_addr);
        self.ledger
            .querier
            .bank
            .update_balance(self.ledger_addr.to_string(), coins(ledger_balance, DENOM));
        let escrow_balance = self.balance(&self.escrow_addr);
        self.escrow
            .querier
            .bank
            .update_balance(self.escrow_addr.to_string(), coins(escrow_balance, DENOM));

        let staked: HashMap<String, Uint128> = ledger::state::STAKERS
            .range(self.ledger.as_ref().storage, None, None, Order::Ascending)
            .map(|item| {
                item.map(|(account, staker)| (account.to_string(), staker.escrowed_balance))
            })
            .collect::<StdResult<_>>()
            .unwrap();
        let ledger_addr = self.ledger_addr.to_string();
        self.escrow.querier.update_wasm(move |query| match query {
            WasmQuery::Smart { contract_addr, msg } if *contract_addr == ledger_addr => {
                let StakingRewardsQueryMsg::EscrowedBalance { address } = from_json(msg).unwrap();
                let balance = staked.get(&address).copied().unwrap_or_default();
                SystemResult::Ok(ContractResult::Ok(to_json_binary(&balance).unwrap()))
            }
            _ => SystemResult::Err(SystemError::UnsupportedRequest {
                kind: "wasm".to_string(),
            }),
        });
    }

    /// Run `msg` against `contract` as `sender` with `funds` attached, then
    /// route every message the contract returns. On error nothing changes.
    pub fn execute<M: serde::Serialize>(
        &mut self,
        sender: &Addr,
        contract: &Addr,
        msg: &M,
        funds: u128,
    ) -> Result<Response, String> {
        let msg = to_json_binary(msg).map_err(|e| e.to_string())?;
        let snapshot = self.snapshot();
        let res = self.execute_raw(sender, contract, msg, funds);
        if res.is_err() {
            self.restore(snapshot);
        }
        res
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            ledger: dump(&self.ledger.storage),
            escrow: dump(&self.escrow.storage),
            bank: self.bank.clone(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.ledger.storage = load(snapshot.ledger);
        self.escrow.storage = load(snapshot.escrow);
        self.bank = snapshot.bank;
    }

    fn execute_raw(
        &mut self,
        sender: &Addr,
        contract: &Addr,
        msg: Binary,
        funds: u128,
    ) -> Result<Response, String> {
        self.transfer(sender, contract, funds)?;
        self.sync_queriers();

        let attached: Vec<Coin> = if funds == 0 {
            vec![]
        } else {
            coins(funds, DENOM)
        };
        let info = message_info(sender, &attached);
        let env = self.env_for(contract);

        let res = if *contract == self.ledger_addr {
            let msg: ledger::msg::ExecuteMsg = from_json(&msg).map_err(|e| e.to_string())?;
            ledger::contract::execute(self.ledger.as_mut(), env, info, msg)
                .map_err(|e| e.to_string())?
        } else if *contract == self.escrow_addr {
            let msg: escrow::msg::ExecuteMsg = from_json(&msg).map_err(|e| e.to_string())?;
            escrow::contract::execute(self.escrow.as_mut(), env, info, msg)
                .map_err(|e| e.to_string())?
        } else {
            return Err(format!("no contract at {contract}"));
        };

        for sub in &res.messages {
            self.route(contract, &sub.msg)?;
        }
        Ok(res)
    }

    fn route(&mut self, from: &Addr, msg: &CosmosMsg) -> Result<(), String> {
        match msg {
            CosmosMsg::Bank(BankMsg::Send { to_address, amount }) => {
                let total = amount
                    .iter()
                    .filter(|c| c.denom == DENOM)
                    .map(|c| c.amount.u128())
                    .sum();
                self.transfer(from, &Addr::unchecked(to_address), total)
            }
            CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr,
                msg,
                funds,
            }) => {
                let total = funds
                    .iter()
                    .filter(|c| c.denom == DENOM)
                    .map(|c| c.amount.u128())
                    .sum();
                self.execute_raw(from, &Addr::unchecked(contract_addr), msg.clone(), total)
                    .map(|_| ())
            }
            other => Err(format!("unsupported message: {other:?}")),
        }
    }

    pub fn query_ledger<T: DeserializeOwned>(&self, msg: ledger::msg::QueryMsg) -> T {
        let env = self.env_for(&self.ledger_addr);
        from_json(ledger::contract::query(self.ledger.as_ref(), env, msg).unwrap()).unwrap()
    }

    pub fn query_escrow<T: DeserializeOwned>(&mut self, msg: escrow::msg::QueryMsg) -> T {
        self.sync_queriers();
        let env = self.env_for(&self.escrow_addr);
        from_json(escrow::contract::query(self.escrow.as_ref(), env, msg).unwrap()).unwrap()
    }
}
