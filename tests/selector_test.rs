//! Tests for [`select_random`]: uniform subset selection for a rotation.

use std::collections::HashSet;

use photoreel::select_random;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn selects_exactly_n_unique_from_larger_input() {
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let input: Vec<u32> = (0..10).collect();
        let picked = select_random(input.clone(), 6, &mut rng);

        assert_eq!(picked.len(), 6);
        let unique: HashSet<_> = picked.iter().collect();
        assert_eq!(unique.len(), 6, "duplicates in {picked:?}");
        assert!(picked.iter().all(|p| input.contains(p)));
    }
}

#[test]
fn exact_size_input_returns_permutation() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut picked = select_random((0..6).collect::<Vec<u32>>(), 6, &mut rng);
    picked.sort_unstable();
    assert_eq!(picked, vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn smaller_input_returns_everything() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut picked = select_random(vec!["a", "b", "c"], 6, &mut rng);
    assert_eq!(picked.len(), 3);
    picked.sort_unstable();
    assert_eq!(picked, vec!["a", "b", "c"]);
}

#[test]
fn order_is_not_fixed() {
    let orders: HashSet<Vec<u32>> = (0..20)
        .map(|seed| select_random((0..10).collect(), 6, &mut StdRng::seed_from_u64(seed)))
        .collect();
    assert!(orders.len() > 1, "every seed produced the same rotation");
}

#[test]
fn membership_is_roughly_uniform() {
    // Choose 2 of 4, 12_000 times: each element is expected 6_000 times.
    let mut rng = StdRng::seed_from_u64(2024);
    let mut counts = [0u32; 4];
    for _ in 0..12_000 {
        for i in select_random(vec![0usize, 1, 2, 3], 2, &mut rng) {
            counts[i] += 1;
        }
    }
    for (i, count) in counts.iter().enumerate() {
        assert!(
            (5_500..=6_500).contains(count),
            "element {i} picked {count} times: {counts:?}"
        );
    }
}

#[test]
fn first_position_is_not_biased_toward_list_order() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut firsts = [0u32; 4];
    for _ in 0..8_000 {
        let picked = select_random(vec![0usize, 1, 2, 3], 4, &mut rng);
        firsts[picked[0]] += 1;
    }
    for (i, count) in firsts.iter().enumerate() {
        assert!(
            (1_700..=2_300).contains(count),
            "element {i} led {count} times: {firsts:?}"
        );
    }
}
