use proptest::prelude::*;
use stn_partition::coarsen::{Coarsening, ReducedKey};
use stn_partition::entropy::{binary_entropy, position_stats, CoarseningPlan};
use stn_partition::pool::Dataset;
use stn_partition::RetainPercent;
use std::collections::HashMap;

const BITS: usize = 10;

fn bit_string(bits: &[bool]) -> String {
    bits.iter().map(|&bit| if bit { '1' } else { '0' }).collect()
}

fn solutions() -> impl Strategy<Value = Vec<(i64, String)>> {
    prop::collection::vec(
        (-50i64..50, prop::collection::vec(any::<bool>(), BITS)),
        2..40,
    )
    .prop_map(|entries| {
        entries
            .into_iter()
            .map(|(fitness, bits)| (fitness, bit_string(&bits)))
            .collect()
    })
}

fn pooled(entries: &[(i64, String)]) -> Dataset {
    let mut data = Dataset::new();
    for pair in entries.chunks_exact(2) {
        data.add_pool_line(&format!(
            "0,{},{},{},{}",
            pair[0].0, pair[0].1, pair[1].0, pair[1].1
        ));
    }
    data
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn entropy_is_within_one_bit(p in 0.0f64..=1.0) {
        let entropy = binary_entropy(p);
        prop_assert!(entropy >= 0.0 && entropy <= 1.0 + 1e-12);
    }

    #[test]
    fn frequencies_and_entropies_are_bounded(entries in solutions()) {
        let stats = position_stats(entries.iter().map(|(_, s)| s.as_str()), BITS).unwrap();
        prop_assert_eq!(stats.len(), BITS);
        for stat in stats {
            prop_assert!((0.0..=1.0).contains(&stat.one_frequency));
            prop_assert!(stat.entropy >= 0.0 && stat.entropy <= 1.0 + 1e-12);
            if stat.one_frequency == 0.0 || stat.one_frequency == 1.0 {
                prop_assert_eq!(stat.entropy, 0.0);
            }
        }
    }

    #[test]
    fn canonical_fitness_is_a_lower_bound(entries in solutions(), percent in 0.0f64..100.0) {
        let data = pooled(&entries);
        let pool = data.global_pool();
        let stats = position_stats(pool.iter().map(|(s, _)| s), BITS).unwrap();
        let plan = CoarseningPlan::new(stats, RetainPercent::try_from(percent).unwrap());
        let coarsening = Coarsening::new(plan, &pool);

        let mut lowest: HashMap<ReducedKey, i64> = HashMap::new();
        for (fitness, solution) in entries.iter().take(entries.len() / 2 * 2) {
            let key = coarsening.key(solution);
            let canonical = coarsening.canonical_fitness(&key).unwrap();
            prop_assert!(canonical <= *fitness);
            let entry = lowest.entry(key).or_insert(*fitness);
            *entry = (*entry).min(*fitness);
        }
        for (key, fitness) in lowest {
            prop_assert_eq!(coarsening.canonical_fitness(&key), Some(fitness));
        }
    }

    #[test]
    fn full_plan_keeps_distinct_solutions_apart(entries in solutions()) {
        let data = pooled(&entries);
        let pool = data.global_pool();
        let stats = position_stats(pool.iter().map(|(s, _)| s), BITS).unwrap();
        let coarsening = Coarsening::new(CoarseningPlan::new(stats, RetainPercent::FULL), &pool);
        prop_assert_eq!(coarsening.node_count(), pool.len());
    }

    #[test]
    fn reduced_keys_are_stable_under_the_identity_plan(
        entries in solutions(),
        percent in 1.0f64..100.0
    ) {
        let data = pooled(&entries);
        let pool = data.global_pool();
        let stats = position_stats(pool.iter().map(|(s, _)| s), BITS).unwrap();
        let plan = CoarseningPlan::new(stats, RetainPercent::try_from(percent).unwrap());
        for (solution, _) in pool.iter() {
            let key = ReducedKey::new(&plan, solution);
            let identity = CoarseningPlan::identity(key.as_str().len());
            prop_assert_eq!(ReducedKey::new(&identity, key.as_str()), key);
        }
    }
}
