//! Marking hasher (C1): a fast, deterministic polynomial rolling hash over
//! marking vectors (§4.1). Collisions are expected and handled by exact
//! vector comparison in the reachability explorer (C4); this hash only
//! needs to be cheap and reasonably spread.

use std::cell::RefCell;

const BASE: u64 = 31;
const MODULUS: u64 = 1_000_000_009;

thread_local! {
    static POWER_CACHE: RefCell<Vec<u64>> = RefCell::new(vec![1 % MODULUS]);
}

/// `h = sum_p M[p] * B^p mod N`. Powers of `B mod N` are cached per-thread
/// and extended on demand for longer markings.
pub fn hash_marking(marking: &[u64]) -> u64 {
    POWER_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        while cache.len() <= marking.len() {
            let next = (*cache.last().expect("cache seeded with B^0") * BASE) % MODULUS;
            cache.push(next);
        }
        marking
            .iter()
            .enumerate()
            .fold(0u64, |acc, (p, &tokens)| {
                let term = ((tokens % MODULUS) * cache[p]) % MODULUS;
                (acc + term) % MODULUS
            })
    })
}
