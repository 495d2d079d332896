#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use flash_ledger::TrancheLedger;
use flash_types::{AccountId, Timestamp, TokenParams};

#[derive(Arbitrary, Debug)]
enum Op {
    Mint { to: u8, amount: u64, ttl: u16 },
    Transfer { from: u8, to: u8, amount: u64 },
    Burn { from: u8, amount: u64 },
    BurnExpired { account: u8 },
    Sweep,
    Advance { secs: u16 },
}

fn account(n: u8) -> AccountId {
    let mut bytes = [0u8; 20];
    bytes[0] = 0xF0;
    bytes[19] = n % 8;
    AccountId::new(bytes)
}

// Random operation sequences must keep balances equal to tranche sums and
// supply equal to the sum of balances.
fuzz_target!(|ops: Vec<Op>| {
    let owner = AccountId::new([0xEE; 20]);
    let mut ledger = TrancheLedger::new(owner, TokenParams::default());
    let mut now = 1_000u64;

    for op in ops {
        let t = Timestamp::new(now);
        match op {
            Op::Mint { to, amount, ttl } => {
                let _ = ledger.mint(owner, account(to), amount as u128, t.saturating_add(ttl as u64), t);
            }
            Op::Transfer { from, to, amount } => {
                let _ = ledger.transfer(account(from), account(to), amount as u128, t);
            }
            Op::Burn { from, amount } => {
                let _ = ledger.burn(account(from), amount as u128, t);
            }
            Op::BurnExpired { account: a } => {
                ledger.burn_expired(account(a), t);
            }
            Op::Sweep => {
                let all: Vec<AccountId> = (0..8).map(account).collect();
                ledger.sweep_expired(&all, t);
            }
            Op::Advance { secs } => now += secs as u64,
        }
        assert!(ledger.state().is_consistent());
    }
});
