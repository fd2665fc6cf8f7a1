//! Random subset selection for a rotation.

use rand::Rng;
use rand::seq::SliceRandom;

/// Pick up to `n` items uniformly at random, without replacement.
///
/// Runs a full Fisher–Yates shuffle and keeps the first `n` elements, so
/// every `n`-subset (and every ordering of it) is equally likely. When
/// fewer than `n` items are given, all of them are returned, shuffled.
pub fn select_random<T, R>(mut items: Vec<T>, n: usize, rng: &mut R) -> Vec<T>
where
    R: Rng + ?Sized,
{
    items.shuffle(rng);
    items.truncate(n);
    items
}
