//! Integration tests for the Vestige staking rewards ledger and reward escrow.
//!
//! Both contracts run through their `instantiate` / `execute` / `query` entry
//! points. The `Suite` harness routes bank sends and wasm executes between
//! them, and answers the escrow's EscrowedBalance query from the ledger's
//! storage via `MockQuerier::update_wasm`.
//!
//! Run:
//! ```bash
//! cargo test -p vestige-integration-tests
//! ```

use cosmwasm_std::{Addr, Uint128};
use vestige_common::{WEEK, YEAR};
use vestige_integration_tests::{addr, Suite};
use vestige_reward_escrow::msg as escrow_msg;
use vestige_staking_rewards::msg as ledger_msg;
use vestige_staking_rewards::state as ledger_state;

// ─── Helpers ───

fn ledger_instantiate_msg(escrow: &Addr) -> ledger_msg::InstantiateMsg {
    ledger_msg::InstantiateMsg {
        staking_denom: vestige_integration_tests::DENOM.to_string(),
        reward_denom: vestige_integration_tests::DENOM.to_string(),
        reward_escrow: escrow.to_string(),
        reward_notifier: addr("notifier").to_string(),
        exchanger_proxy: addr("proxy").to_string(),
        rewards_duration: None,
        cooldown_period: None,
        safety_minimum: None,
        score_weighting: None,
        reward_curve: None,
        epoch_anchor: None,
    }
}

fn setup() -> Suite {
    let mut suite = Suite::new(ledger_instantiate_msg);
    suite.mint(&addr("alice"), 10_000);
    suite.mint(&addr("bob"), 10_000);
    suite.mint(&addr("notifier"), 10_000_000);
    suite.mint(&addr("distributor"), 10_000_000);
    suite
}

fn stake(suite: &mut Suite, user: &str, amount: u128) {
    let ledger = suite.ledger_addr.clone();
    suite
        .execute(&addr(user), &ledger, &ledger_msg::ExecuteMsg::Stake {}, amount)
        .unwrap();
}

fn notify(suite: &mut Suite, reward: u128) {
    let ledger = suite.ledger_addr.clone();
    suite
        .execute(
            &addr("notifier"),
            &ledger,
            &ledger_msg::ExecuteMsg::NotifyRewardAmount {
                reward: Uint128::new(reward),
            },
            reward,
        )
        .unwrap();
}

fn get_reward(suite: &mut Suite, user: &str) {
    let ledger = suite.ledger_addr.clone();
    suite
        .execute(&addr(user), &ledger, &ledger_msg::ExecuteMsg::GetReward {}, 0)
        .unwrap();
}

fn earned(suite: &Suite, user: &str) -> Uint128 {
    suite.query_ledger(ledger_msg::QueryMsg::Earned {
        address: addr(user).to_string(),
    })
}

fn staker_info(suite: &Suite, user: &str) -> ledger_msg::StakerInfoResponse {
    suite.query_ledger(ledger_msg::QueryMsg::StakerInfo {
        address: addr(user).to_string(),
    })
}

fn escrow_balance(suite: &mut Suite, user: &str) -> Uint128 {
    suite.query_escrow(escrow_msg::QueryMsg::BalanceOf {
        address: addr(user).to_string(),
    })
}

/// The escrow must always hold at least what its entries owe.
fn assert_escrow_custody(suite: &mut Suite) {
    let total: Uint128 = suite.query_escrow(escrow_msg::QueryMsg::TotalEscrowedBalance {});
    let held = suite.balance(&suite.escrow_addr.clone());
    assert!(
        held >= total.u128(),
        "escrow holds {held}, owes {total}"
    );
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_stake_claim_escrow_and_vest() {
    let mut suite = setup();
    let alice = addr("alice");
    let escrow = suite.escrow_addr.clone();

    // 1. Alice stakes, the notifier funds one week of rewards.
    stake(&mut suite, "alice", 1_000);
    notify(&mut suite, 604_800);

    // 2. A week later Alice has earned the whole period.
    suite.advance(WEEK);
    assert_eq!(earned(&suite, "alice"), Uint128::new(604_800));

    // 3. Claiming routes the reward into a vesting entry.
    get_reward(&mut suite, "alice");
    let entry_created = suite.time;
    assert_eq!(escrow_balance(&mut suite, "alice"), Uint128::new(604_800));
    assert_eq!(suite.balance(&escrow), 604_800);
    assert_eq!(suite.balance(&suite.ledger_addr.clone()), 1_000);
    assert_escrow_custody(&mut suite);

    let entry: vestige_reward_escrow::state::VestingEntry =
        suite.query_escrow(escrow_msg::QueryMsg::VestingEntry { entry_id: 1 });
    assert_eq!(entry.beneficiary, alice);
    assert_eq!(entry.end_time, entry_created + YEAR);
    assert_eq!(entry.early_vesting_fee, 90);

    // 4. Escrowed rewards are staked back into the ledger.
    suite
        .execute(
            &alice,
            &escrow,
            &escrow_msg::ExecuteMsg::StakeEscrow {
                amount: Uint128::new(604_800),
            },
            0,
        )
        .unwrap();
    let info = staker_info(&suite, "alice");
    assert_eq!(info.balance, Uint128::new(605_800));
    assert_eq!(info.escrowed_balance, Uint128::new(604_800));
    assert_eq!(info.reward_score, Uint128::new(605_800));

    // 5. Half way through vesting: 45% fee, and the staked principal is
    //    released from the ledger before the payout.
    suite.advance(YEAR / 2);
    let res = suite
        .execute(
            &alice,
            &escrow,
            &escrow_msg::ExecuteMsg::Vest { entry_ids: vec![1] },
            0,
        )
        .unwrap();
    assert_eq!(res.messages.len(), 3);

    assert_eq!(suite.balance(&alice), 10_000 - 1_000 + 332_640);
    assert_eq!(suite.balance(&addr("treasury")), 272_160);
    assert_eq!(suite.balance(&escrow), 0);

    let info = staker_info(&suite, "alice");
    assert_eq!(info.balance, Uint128::new(1_000));
    assert_eq!(info.escrowed_balance, Uint128::zero());

    let vested: Uint128 = suite.query_escrow(escrow_msg::QueryMsg::TotalVestedAccountBalance {
        address: alice.to_string(),
    });
    assert_eq!(vested, Uint128::new(332_640));
    assert_eq!(escrow_balance(&mut suite, "alice"), Uint128::zero());
    assert_escrow_custody(&mut suite);
}

#[test]
fn test_accrual_doubles_with_second_period() {
    let mut suite = setup();

    stake(&mut suite, "alice", 1_000);
    notify(&mut suite, 604_800);
    suite.advance(WEEK);
    assert_eq!(earned(&suite, "alice"), Uint128::new(604_800));

    // Twice the reward over the next week doubles the rate.
    notify(&mut suite, 2 * 604_800);
    suite.advance(WEEK / 2);
    assert_eq!(earned(&suite, "alice"), Uint128::new(604_800 + 604_800));
    suite.advance(WEEK / 2);
    assert_eq!(earned(&suite, "alice"), Uint128::new(604_800 + 1_209_600));

    get_reward(&mut suite, "alice");
    assert_eq!(escrow_balance(&mut suite, "alice"), Uint128::new(1_814_400));
    assert_eq!(earned(&suite, "alice"), Uint128::zero());
    assert_escrow_custody(&mut suite);
}

#[test]
fn test_two_stakers_share_by_score() {
    let mut suite = setup();

    stake(&mut suite, "alice", 1_000);
    stake(&mut suite, "bob", 3_000);
    notify(&mut suite, 604_800);
    suite.advance(WEEK);

    assert_eq!(earned(&suite, "alice"), Uint128::new(151_200));
    assert_eq!(earned(&suite, "bob"), Uint128::new(453_600));

    get_reward(&mut suite, "alice");
    get_reward(&mut suite, "bob");
    assert_eq!(escrow_balance(&mut suite, "alice"), Uint128::new(151_200));
    assert_eq!(escrow_balance(&mut suite, "bob"), Uint128::new(453_600));
    assert_escrow_custody(&mut suite);
}

#[test]
fn test_exit_returns_principal_and_escrows_rewards() {
    let mut suite = setup();
    let alice = addr("alice");
    let ledger = suite.ledger_addr.clone();

    stake(&mut suite, "alice", 1_000);
    notify(&mut suite, 604_800);

    // Still inside the cooldown.
    suite.advance(WEEK);
    let err = suite
        .execute(&alice, &ledger, &ledger_msg::ExecuteMsg::Exit {}, 0)
        .unwrap_err();
    assert!(err.contains("locked"), "{err}");

    suite.advance(WEEK);
    suite
        .execute(&alice, &ledger, &ledger_msg::ExecuteMsg::Exit {}, 0)
        .unwrap();

    assert_eq!(suite.balance(&alice), 10_000);
    assert_eq!(suite.balance(&ledger), 0);
    assert_eq!(escrow_balance(&mut suite, "alice"), Uint128::new(604_800));
    assert_eq!(staker_info(&suite, "alice").balance, Uint128::zero());
}

#[test]
fn test_unstake_escrow_honours_cooldown() {
    let mut suite = setup();
    let alice = addr("alice");
    let escrow = suite.escrow_addr.clone();

    stake(&mut suite, "alice", 1_000);
    notify(&mut suite, 604_800);
    suite.advance(WEEK);
    get_reward(&mut suite, "alice");

    suite
        .execute(
            &alice,
            &escrow,
            &escrow_msg::ExecuteMsg::StakeEscrow {
                amount: Uint128::new(500_000),
            },
            0,
        )
        .unwrap();

    let unstake = escrow_msg::ExecuteMsg::UnstakeEscrow {
        amount: Uint128::new(100_000),
    };
    let err = suite.execute(&alice, &escrow, &unstake, 0).unwrap_err();
    assert!(err.contains("locked"), "{err}");

    suite.advance(2 * WEEK);
    suite.execute(&alice, &escrow, &unstake, 0).unwrap();

    let unstaked: Uint128 = suite.query_escrow(escrow_msg::QueryMsg::UnstakedEscrowedBalance {
        address: alice.to_string(),
    });
    assert_eq!(unstaked, Uint128::new(604_800 - 400_000));
    assert_eq!(
        staker_info(&suite, "alice").escrowed_balance,
        Uint128::new(400_000)
    );
}

#[test]
fn test_vest_with_partially_staked_escrow() {
    let mut suite = setup();
    let alice = addr("alice");
    let escrow = suite.escrow_addr.clone();

    stake(&mut suite, "alice", 1_000);
    notify(&mut suite, 604_800);
    suite.advance(WEEK);
    get_reward(&mut suite, "alice");

    suite
        .execute(
            &alice,
            &escrow,
            &escrow_msg::ExecuteMsg::StakeEscrow {
                amount: Uint128::new(302_400),
            },
            0,
        )
        .unwrap();

    // Fully matured: no fee, and only the staked half is pulled from the ledger.
    suite.advance(YEAR);
    suite
        .execute(
            &alice,
            &escrow,
            &escrow_msg::ExecuteMsg::Vest { entry_ids: vec![1] },
            0,
        )
        .unwrap();

    assert_eq!(suite.balance(&alice), 10_000 - 1_000 + 604_800);
    assert_eq!(suite.balance(&addr("treasury")), 0);
    let info = staker_info(&suite, "alice");
    assert_eq!(info.balance, Uint128::new(1_000));
    assert_eq!(info.escrowed_balance, Uint128::zero());
}

#[test]
fn test_only_ledger_appends_entries() {
    let mut suite = setup();
    let escrow = suite.escrow_addr.clone();

    let err = suite
        .execute(
            &addr("alice"),
            &escrow,
            &escrow_msg::ExecuteMsg::AppendVestingEntry {
                account: addr("alice").to_string(),
                amount: Uint128::new(1_000),
                duration: None,
                early_vesting_fee: None,
            },
            1_000,
        )
        .unwrap_err();
    assert!(err.contains("unauthorized"), "{err}");

    // The rejected call keeps its attached funds with the sender.
    assert_eq!(suite.balance(&addr("alice")), 10_000);
    assert_eq!(suite.balance(&escrow), 0);
}

#[test]
fn test_vest_reverts_when_ledger_refuses_unstake() {
    let mut suite = setup();
    let alice = addr("alice");
    let escrow = suite.escrow_addr.clone();

    stake(&mut suite, "alice", 1_000);
    notify(&mut suite, 604_800);
    suite.advance(WEEK);
    get_reward(&mut suite, "alice");
    suite
        .execute(
            &alice,
            &escrow,
            &escrow_msg::ExecuteMsg::StakeEscrow {
                amount: Uint128::new(604_800),
            },
            0,
        )
        .unwrap();

    // The ledger stops recognising this escrow, so the release of staked
    // principal that vest dispatches fails.
    let mut config = ledger_state::CONFIG
        .load(suite.ledger.as_ref().storage)
        .unwrap();
    config.reward_escrow = addr("retired_escrow");
    ledger_state::CONFIG
        .save(suite.ledger.as_mut().storage, &config)
        .unwrap();

    suite.advance(YEAR / 2);
    let err = suite
        .execute(
            &alice,
            &escrow,
            &escrow_msg::ExecuteMsg::Vest { entry_ids: vec![1] },
            0,
        )
        .unwrap_err();
    assert!(err.contains("unauthorized"), "{err}");

    // Nothing the escrow wrote before dispatching survives.
    let entry: vestige_reward_escrow::state::VestingEntry =
        suite.query_escrow(escrow_msg::QueryMsg::VestingEntry { entry_id: 1 });
    assert_eq!(entry.escrow_amount, Uint128::new(604_800));
    assert_eq!(escrow_balance(&mut suite, "alice"), Uint128::new(604_800));
    let vested: Uint128 = suite.query_escrow(escrow_msg::QueryMsg::TotalVestedAccountBalance {
        address: alice.to_string(),
    });
    assert_eq!(vested, Uint128::zero());
    let total: Uint128 = suite.query_escrow(escrow_msg::QueryMsg::TotalEscrowedBalance {});
    assert_eq!(total, Uint128::new(604_800));

    assert_eq!(suite.balance(&escrow), 604_800);
    assert_eq!(suite.balance(&alice), 10_000 - 1_000);
    assert_eq!(suite.balance(&addr("treasury")), 0);
    assert_eq!(
        staker_info(&suite, "alice").escrowed_balance,
        Uint128::new(604_800)
    );
    assert_escrow_custody(&mut suite);
}

#[test]
fn test_distributor_creates_escrow_entries() {
    let mut suite = setup();
    let escrow = suite.escrow_addr.clone();

    for duration in [WEEK, 2 * WEEK, 3 * WEEK] {
        suite
            .execute(
                &addr("distributor"),
                &escrow,
                &escrow_msg::ExecuteMsg::CreateEscrowEntry {
                    beneficiary: addr("bob").to_string(),
                    duration,
                    early_vesting_fee: 90,
                },
                1_000,
            )
            .unwrap();
    }
    assert_escrow_custody(&mut suite);

    let ids: Vec<u64> = suite.query_escrow(escrow_msg::QueryMsg::AccountVestingEntryIds {
        address: addr("bob").to_string(),
        start_after: None,
        limit: None,
    });
    assert_eq!(ids, vec![1, 2, 3]);

    // Past the first two maturities, half a week into the last.
    suite.advance(2 * WEEK + WEEK / 2);
    suite
        .execute(
            &addr("bob"),
            &escrow,
            &escrow_msg::ExecuteMsg::Vest {
                entry_ids: vec![1, 2, 3],
            },
            0,
        )
        .unwrap();

    assert_eq!(suite.balance(&addr("bob")), 10_000 + 2_850);
    assert_eq!(suite.balance(&addr("treasury")), 150);
    assert_eq!(suite.balance(&escrow), 0);

    // Vesting again is a no-op.
    let res = suite
        .execute(
            &addr("bob"),
            &escrow,
            &escrow_msg::ExecuteMsg::Vest {
                entry_ids: vec![1, 2, 3],
            },
            0,
        )
        .unwrap();
    assert!(res.messages.is_empty());
}
