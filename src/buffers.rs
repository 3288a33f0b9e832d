//! Buffer data structures to avoid memory reallocation.
pub use self::random_range::RandomRangeBuffer;
pub use self::walk::{USTBuffer, NO_NEXT};

/// Buffers are intended to be lightweight, reusable containers
/// that improve the efficiency of inner loops. In most buffers,
/// fields are intended to be mutated directly, and invariants
/// are not strictly enforced.

/// Buffer for Wilson's algorithm.
mod walk {
    /// Marks a vertex whose successor has never been set.
    pub const NO_NEXT: usize = usize::MAX;

    /// A reusable buffer for Wilson's algorithm, indexed by vertex index.
    pub struct USTBuffer {
        /// Boolean representation of the subset of vertices in the tree.
        pub in_tree: Vec<bool>,
        /// The most recent successor of each vertex in a random walk.
        /// Once a vertex is in the tree, this is its parent.
        pub next: Vec<usize>,
        /// The walk in which each vertex was last visited (0 = never).
        pub visited_in: Vec<u64>,
        /// The number of walks started since the last reset.
        pub walk: u64,
        /// The number of vertices in the tree.
        pub committed: usize,
    }

    impl USTBuffer {
        /// Creates a buffer for a graph of size `n`.
        pub fn new(n: usize) -> USTBuffer {
            USTBuffer {
                in_tree: vec![false; n],
                next: vec![NO_NEXT; n],
                visited_in: vec![0; n],
                walk: 0,
                committed: 0,
            }
        }

        /// Resets the buffer for a graph of size `n`, growing it if needed.
        pub fn reset(&mut self, n: usize) {
            self.in_tree.clear();
            self.in_tree.resize(n, false);
            self.next.clear();
            self.next.resize(n, NO_NEXT);
            self.visited_in.clear();
            self.visited_in.resize(n, 0);
            self.walk = 0;
            self.committed = 0;
        }

        /// Adds the vertex with index `idx` to the tree.
        pub fn insert(&mut self, idx: usize) {
            if !self.in_tree[idx] {
                self.in_tree[idx] = true;
                self.committed += 1;
            }
        }
    }
}

/// Buffer for random bytes.
mod random_range {
    use rand::Rng;
    use std::num::Wrapping;

    /// Size of the buffer of random values.
    // (We try to set a buffer size that balances refresh time
    // and average efficiency per sample.)
    const RANGE_BUF_SIZE: usize = 1 << 16;

    /// A buffer used for uniformly sampling bytes.
    ///
    /// Unlike most other buffers, this buffer is intended to be opaque;
    /// values should be sampled with [RandomRangeBuffer::range].
    pub struct RandomRangeBuffer {
        buf: Vec<u8>,
        pos: usize,
    }

    impl RandomRangeBuffer {
        /// Creates a new buffer for uniformly sampling bytes.
        /// The buffer is prepopulated with `rng`.
        pub fn new<R: Rng>(rng: &mut R) -> RandomRangeBuffer {
            RandomRangeBuffer::with_size(rng, RANGE_BUF_SIZE)
        }

        /// Creates a buffer holding `size` (> 0) random bytes.
        pub fn with_size<R: Rng>(rng: &mut R, size: usize) -> RandomRangeBuffer {
            let mut buf = vec![0 as u8; size.max(1)];
            rng.fill(&mut buf[..]);
            RandomRangeBuffer { buf: buf, pos: 0 }
        }

        /// Gets the next value from the buffer, refreshing the buffer
        /// using `rng` if necessary.
        fn next<R: Rng>(&mut self, rng: &mut R) -> u8 {
            let val = self.buf[self.pos];
            self.pos += 1;
            if self.pos == self.buf.len() {
                rng.fill(&mut self.buf[..]);
                self.pos = 0;
            }
            val
        }

        /// Uniformly samples a byte in the range [0, ub), refreshing
        /// the buffer of random values using `rng` if necessary.
        /// `ub` must be nonzero.
        ///
        /// Uniform sampling in an arbitrary range is rather subtle
        /// (for instance, the standard modulus trick is both inefficient
        ///  and biased). For efficiency, we sample single bytes at a time.
        ///
        /// This is sufficient for the primary inner-loop use case of this
        /// buffer: choosing random neighbors of a vertex in a random walk.
        pub fn range<R: Rng>(&mut self, rng: &mut R, ub: u8) -> u8 {
            // https://www.pcg-random.org/posts/bounded-rands.html
            // https://lemire.me/blog/2019/06/06/nearly-divisionless-
            // random-integer-generation-on-various-systems/
            let mut x = self.next(rng);
            let mut m = (x as u16) * (ub as u16);
            let mut l = Wrapping(m).0 as u8;
            if l < ub {
                let t = (Wrapping(0u8) - Wrapping(ub)).0 % ub;
                while l < t {
                    x = self.next(rng);
                    m = (x as u16) * (ub as u16);
                    l = Wrapping(m).0 as u8;
                }
            }
            (m >> 8) as u8
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use rand::rngs::SmallRng;
        use rand::SeedableRng;

        #[test]
        fn range_stays_in_bounds() {
            let mut rng = SmallRng::seed_from_u64(0);
            // A tiny buffer forces frequent refreshes.
            let mut buf = RandomRangeBuffer::with_size(&mut rng, 7);
            for ub in 1..=255u8 {
                for _ in 0..50 {
                    assert!(buf.range(&mut rng, ub) < ub);
                }
            }
        }

        #[test]
        fn range_of_one_is_zero() {
            let mut rng = SmallRng::seed_from_u64(1);
            let mut buf = RandomRangeBuffer::new(&mut rng);
            assert!((0..1000).all(|_| buf.range(&mut rng, 1) == 0));
        }

        #[test]
        fn range_is_roughly_uniform() {
            let mut rng = SmallRng::seed_from_u64(2);
            let mut buf = RandomRangeBuffer::new(&mut rng);
            let mut counts = [0usize; 3];
            for _ in 0..30000 {
                counts[buf.range(&mut rng, 3) as usize] += 1;
            }
            for &count in counts.iter() {
                assert!(count > 9000 && count < 11000, "counts: {:?}", counts);
            }
        }
    }
}
