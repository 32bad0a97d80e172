use rand::Rng;

/// Draw `k` indices from `0..n` uniformly with replacement
pub fn choose_ixs_with_replacement<R: Rng>(
    n: usize,
    k: usize,
    rng: &mut R,
) -> Vec<usize> {
    assert!(n > 0, "cannot draw from an empty population");
    (0..k).map(|_| rng.gen_range(0..n)).collect()
}

/// Draw `k` items from `xs` uniformly with replacement
pub fn choose_with_replacement<'a, T, R: Rng>(
    xs: &'a [T],
    k: usize,
    rng: &mut R,
) -> Vec<&'a T> {
    choose_ixs_with_replacement(xs.len(), k, rng)
        .into_iter()
        .map(|ix| &xs[ix])
        .collect()
}

/// Generate `n` seeds from a master generator, one per independent task.
///
/// Seeds are drawn sequentially so that per-task generators do not depend on
/// the order in which the tasks are later executed.
pub fn task_seeds<R: Rng>(n: usize, rng: &mut R) -> Vec<u64> {
    (0..n).map(|_| rng.gen()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    #[test]
    fn indices_are_in_range() {
        let mut rng = Xoshiro256Plus::seed_from_u64(1);
        let ixs = choose_ixs_with_replacement(3, 500, &mut rng);
        assert_eq!(ixs.len(), 500);
        assert!(ixs.iter().all(|&ix| ix < 3));
        // with replacement: every index shows up in a sample this large
        assert!((0..3).all(|ix| ixs.contains(&ix)));
    }

    #[test]
    fn same_seed_same_draws() {
        let xs = vec!["a", "b", "c", "d"];
        let mut rng_a = Xoshiro256Plus::seed_from_u64(42);
        let mut rng_b = Xoshiro256Plus::seed_from_u64(42);
        assert_eq!(
            choose_with_replacement(&xs, 20, &mut rng_a),
            choose_with_replacement(&xs, 20, &mut rng_b),
        );
    }

    #[test]
    fn task_seeds_are_reproducible() {
        let mut rng_a = Xoshiro256Plus::seed_from_u64(7);
        let mut rng_b = Xoshiro256Plus::seed_from_u64(7);
        assert_eq!(task_seeds(16, &mut rng_a), task_seeds(16, &mut rng_b));
    }

    #[test]
    #[should_panic]
    fn empty_population_panics() {
        let mut rng = Xoshiro256Plus::seed_from_u64(1);
        choose_ixs_with_replacement(0, 1, &mut rng);
    }
}
