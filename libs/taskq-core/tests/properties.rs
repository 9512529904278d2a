//! Quantified invariants for the ledger and migration size/age admission,
//! checked with `proptest`.

use proptest::prelude::*;
use taskq_core::{DispatchConfig, DispatchPolicy, HostSlotLedger, MigrationGate};

proptest! {
    /// ledger[h] = max(0, k + credits - debits) for any sequence of
    /// credit/debit operations starting from ledger[h] = k.
    #[test]
    fn ledger_tracks_clamped_credit_debit_balance(
        start in 0i64..50,
        ops in prop::collection::vec(prop::bool::ANY, 0..200),
    ) {
        let ledger = HostSlotLedger::new();
        for _ in 0..start {
            ledger.mark_available("h");
        }

        let mut model = start;
        for credit in ops {
            if credit {
                ledger.mark_available("h");
                model += 1;
            } else {
                ledger.mark_kicked("h");
                model = (model - 1).max(0);
            }
        }

        prop_assert_eq!(ledger.snapshot("h"), model);
        prop_assert_eq!(ledger.has_slot("h"), model > 0);
    }

    /// sizeAgeAdmits(b, a) is monotone non-decreasing in `a` for fixed `b`.
    #[test]
    fn size_age_admits_is_monotone_in_age(
        byte_count in 0i64..20_000_000_000,
        a1 in 0i64..3_000_000,
        delta in 0i64..3_000_000,
    ) {
        let ledger = HostSlotLedger::new();
        let gate = MigrationGate::new();
        let config = DispatchConfig::default();
        let policy = DispatchPolicy::new(&ledger, &gate, &config);

        let a2 = a1 + delta;
        let admits_a1 = policy.size_age_admits(byte_count, a1);
        let admits_a2 = policy.size_age_admits(byte_count, a2);
        // admits_a1 => admits_a2, i.e. never flips from true back to false
        // as age grows.
        prop_assert!(!admits_a1 || admits_a2);
    }

    /// Strictly false once byte_count reaches the max ceiling, regardless
    /// of age.
    #[test]
    fn size_age_admits_rejects_at_or_above_max(
        extra in 0i64..1_000_000_000,
        age in 0i64..10_000_000,
    ) {
        let ledger = HostSlotLedger::new();
        let gate = MigrationGate::new();
        let config = DispatchConfig::default();
        let policy = DispatchPolicy::new(&ledger, &gate, &config);

        let byte_count = config.migration_max_bytes + extra;
        prop_assert!(!policy.size_age_admits(byte_count, age));
    }

    /// Always true below the min floor, for any non-negative age.
    #[test]
    fn size_age_admits_accepts_below_min(
        byte_count in 0i64..50_000_000,
        age in 0i64..10_000_000,
    ) {
        let ledger = HostSlotLedger::new();
        let gate = MigrationGate::new();
        let config = DispatchConfig::default();
        let policy = DispatchPolicy::new(&ledger, &gate, &config);

        prop_assert!(policy.size_age_admits(byte_count, age));
    }
}
