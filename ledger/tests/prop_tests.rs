use proptest::prelude::*;

use flash_ledger::{Tranche, TrancheLedger};
use flash_types::{AccountId, Timestamp, TokenParams};

const ACCOUNTS: u8 = 4;

fn account(n: u8) -> AccountId {
    let mut bytes = [0u8; 20];
    bytes[0] = 0xAC;
    bytes[19] = n + 1;
    AccountId::new(bytes)
}

fn owner() -> AccountId {
    AccountId::new([0xEE; 20])
}

#[derive(Clone, Debug)]
enum Op {
    Mint { to: u8, amount: u128, ttl: u64 },
    Transfer { from: u8, to: u8, amount: u128 },
    Burn { from: u8, amount: u128 },
    BurnExpired { account: u8 },
    Sweep,
    Advance { secs: u64 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..ACCOUNTS, 1u128..1_000, 1u64..500).prop_map(|(to, amount, ttl)| Op::Mint {
            to,
            amount,
            ttl
        }),
        (0..ACCOUNTS, 0..ACCOUNTS, 0u128..1_500).prop_map(|(from, to, amount)| Op::Transfer {
            from,
            to,
            amount
        }),
        (0..ACCOUNTS, 1u128..500).prop_map(|(from, amount)| Op::Burn { from, amount }),
        (0..ACCOUNTS).prop_map(|account| Op::BurnExpired { account }),
        Just(Op::Sweep),
        (1u64..200).prop_map(|secs| Op::Advance { secs }),
    ]
}

/// Apply one op, ignoring rejected ones (they must not mutate state).
fn apply(ledger: &mut TrancheLedger, op: &Op, now: &mut u64) {
    let t = Timestamp::new(*now);
    match *op {
        Op::Mint { to, amount, ttl } => {
            let _ = ledger.mint(owner(), account(to), amount, t.saturating_add(ttl), t);
        }
        Op::Transfer { from, to, amount } => {
            let _ = ledger.transfer(account(from), account(to), amount, t);
        }
        Op::Burn { from, amount } => {
            let _ = ledger.burn(account(from), amount, t);
        }
        Op::BurnExpired { account: a } => {
            ledger.burn_expired(account(a), t);
        }
        Op::Sweep => {
            let all: Vec<AccountId> = (0..ACCOUNTS).map(account).collect();
            ledger.sweep_expired(&all, t);
        }
        Op::Advance { secs } => *now += secs,
    }
}

proptest! {
    /// Conservation: tranche sums equal balances and balances sum to supply
    /// after every operation.
    #[test]
    fn supply_equals_sum_of_tranches(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut ledger = TrancheLedger::new(owner(), TokenParams::default());
        let mut now = 1_000u64;
        for op in &ops {
            apply(&mut ledger, op, &mut now);
            prop_assert!(ledger.state().is_consistent(), "inconsistent after {:?}", op);
            let tranche_sum: u128 = (0..ACCOUNTS)
                .flat_map(|n| ledger.flash_balances_of(account(n)))
                .map(|t| t.amount)
                .sum();
            prop_assert_eq!(tranche_sum, ledger.total_supply());
        }
    }

    /// Active plus expired balance always equals the gross balance, at any
    /// query time.
    #[test]
    fn active_plus_expired_is_total(
        ops in prop::collection::vec(op_strategy(), 1..40),
        probe in 0u64..2_000,
    ) {
        let mut ledger = TrancheLedger::new(owner(), TokenParams::default());
        let mut now = 1_000u64;
        for op in &ops {
            apply(&mut ledger, op, &mut now);
        }
        let at = Timestamp::new(now + probe);
        for n in 0..ACCOUNTS {
            let a = account(n);
            prop_assert_eq!(
                ledger.active_balance_of(a, at) + ledger.expired_balance_of(a, at),
                ledger.balance_of(a)
            );
        }
    }

    /// No stored tranche is ever empty.
    #[test]
    fn no_zero_amount_tranches(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut ledger = TrancheLedger::new(owner(), TokenParams::default());
        let mut now = 1_000u64;
        for op in &ops {
            apply(&mut ledger, op, &mut now);
        }
        for n in 0..ACCOUNTS {
            prop_assert!(ledger.flash_balances_of(account(n)).iter().all(|t| t.amount > 0));
        }
    }

    /// Once expired, value is never transferable again, and a second expiry
    /// burn in a row finds nothing.
    #[test]
    fn expired_value_never_resurrects(
        amount in 1u128..10_000,
        ttl in 1u64..1_000,
        late in 0u64..1_000,
    ) {
        let mut ledger = TrancheLedger::new(owner(), TokenParams::default());
        let t0 = Timestamp::new(10_000);
        ledger.mint(owner(), account(0), amount, t0.saturating_add(ttl), t0).unwrap();
        let after = t0.saturating_add(ttl + late);

        prop_assert_eq!(ledger.active_balance_of(account(0), after), 0);
        prop_assert!(ledger.transfer(account(0), account(1), 1, after).is_err());
        prop_assert_eq!(ledger.burn_expired(account(0), after), amount);
        prop_assert_eq!(ledger.burn_expired(account(0), after), 0);
        prop_assert_eq!(ledger.total_supply(), 0);
    }

    /// Two mints with the same expiry collapse into one tranche.
    #[test]
    fn same_expiry_mints_merge(a in 1u128..1_000_000, b in 1u128..1_000_000, ttl in 1u64..10_000) {
        let mut ledger = TrancheLedger::new(owner(), TokenParams::default());
        let now = Timestamp::new(500);
        let exp = now.saturating_add(ttl);
        ledger.mint(owner(), account(0), a, exp, now).unwrap();
        ledger.mint(owner(), account(0), b, exp, now).unwrap();
        prop_assert_eq!(ledger.flash_balances_of(account(0)), vec![Tranche::new(a + b, exp)]);
    }

    /// An over-sized transfer leaves both sides exactly as they were.
    #[test]
    fn failed_transfer_is_atomic(
        ops in prop::collection::vec(op_strategy(), 1..40),
        extra in 1u128..1_000,
    ) {
        let mut ledger = TrancheLedger::new(owner(), TokenParams::default());
        let mut now = 1_000u64;
        for op in &ops {
            apply(&mut ledger, op, &mut now);
        }
        let t = Timestamp::new(now);
        let (from, to) = (account(0), account(1));
        let before = ledger.state().clone();
        let request = ledger.active_balance_of(from, t) + extra;
        prop_assert!(ledger.transfer(from, to, request, t).is_err());
        prop_assert_eq!(ledger.state(), &before);
    }
}
