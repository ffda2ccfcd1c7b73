//! Integration test: properties over randomly shaped scenarios.

use pairwise_core::{GeneratorConfig, MoleculeUniverse, Scenario, generate, verify_coverage};
use proptest::prelude::*;

fn sized(sizes: &[usize]) -> Scenario<usize> {
    Scenario::from_dimensions(
        sizes
            .iter()
            .enumerate()
            .map(|(d, &n)| (format!("P{d}"), (0..n).collect::<Vec<_>>())),
    )
    .unwrap()
}

fn pair_count(sizes: &[usize]) -> u64 {
    let mut total = 0;
    for i in 0..sizes.len() {
        for j in i + 1..sizes.len() {
            total += (sizes[i] * sizes[j]) as u64;
        }
    }
    total
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn pairwise_molecule_count_matches_formula(sizes in prop::collection::vec(1usize..6, 2..7)) {
        let scenario = sized(&sizes);
        let universe = MoleculeUniverse::build(&scenario, 2).unwrap();
        prop_assert_eq!(universe.molecule_count() as u64, pair_count(&sizes));
    }

    #[test]
    fn pairwise_runs_always_complete(
        sizes in prop::collection::vec(1usize..5, 2..6),
        pool_size in 1usize..4,
        seed in any::<u64>(),
    ) {
        let scenario = sized(&sizes);
        let config = GeneratorConfig::default().with_pool_size(pool_size).with_seed(seed);
        let set = generate(&scenario, &config).unwrap();
        let check = verify_coverage(&scenario, 2, set.vectors()).unwrap();
        prop_assert!(check.is_complete(), "missing {:?}", check.missing);
        prop_assert!(set.len() as u64 <= scenario.full_combination_count());
        let widest_pair = (0..sizes.len())
            .flat_map(|i| (i + 1..sizes.len()).map(move |j| (i, j)))
            .map(|(i, j)| sizes[i] * sizes[j])
            .max()
            .unwrap_or(0);
        prop_assert!(set.len() >= widest_pair);
    }

    #[test]
    fn three_way_runs_always_complete(
        sizes in prop::collection::vec(1usize..4, 3..6),
        seed in any::<u64>(),
    ) {
        let scenario = sized(&sizes);
        let config = GeneratorConfig::default().with_arity(3).with_seed(seed);
        let set = generate(&scenario, &config).unwrap();
        prop_assert!(verify_coverage(&scenario, 3, set.vectors()).unwrap().is_complete());
    }
}
