//! Injectable sources of uniform random choices.
//!
//! Wilson's algorithm only ever asks one question of its randomness: "pick
//! an index uniformly from `0..len`". Samplers take a [RandomSource] so
//! that tests can record and replay the exact sequence of choices.
use crate::buffers::RandomRangeBuffer;
use rand::Rng;

/// A source of uniform random indices.
pub trait RandomSource {
    /// Returns an index drawn uniformly from `0..len`. `len` is nonzero.
    fn index(&mut self, len: usize) -> usize;
}

impl<S: RandomSource + ?Sized> RandomSource for &mut S {
    fn index(&mut self, len: usize) -> usize {
        (**self).index(len)
    }
}

/// Draws indices from a `rand` generator.
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> RngSource<R> {
        RngSource { rng: rng }
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Draws small indices from a reservoir of random bytes, which is much
/// faster than calling into the generator for every step of a walk.
/// Ranges of 256 or more fall back to the generator.
pub struct BufferedSource<R> {
    rng: R,
    range_buf: RandomRangeBuffer,
}

impl<R: Rng> BufferedSource<R> {
    /// Creates a source backed by `rng` (used to fill the reservoir).
    pub fn new(mut rng: R) -> BufferedSource<R> {
        let range_buf = RandomRangeBuffer::new(&mut rng);
        BufferedSource {
            rng: rng,
            range_buf: range_buf,
        }
    }
}

impl<R: Rng> RandomSource for BufferedSource<R> {
    fn index(&mut self, len: usize) -> usize {
        if len < 256 {
            self.range_buf.range(&mut self.rng, len as u8) as usize
        } else {
            self.rng.gen_range(0..len)
        }
    }
}

/// Replays a fixed sequence of choices.
///
/// # Panics
/// Panics if the sequence runs out, or if a recorded choice is out of
/// range for the draw it is replayed into.
#[derive(Clone, Debug)]
pub struct ReplaySource {
    choices: Vec<usize>,
    pos: usize,
}

impl ReplaySource {
    pub fn new(choices: Vec<usize>) -> ReplaySource {
        ReplaySource {
            choices: choices,
            pos: 0,
        }
    }

    /// The number of choices not yet replayed.
    pub fn remaining(&self) -> usize {
        self.choices.len() - self.pos
    }
}

impl RandomSource for ReplaySource {
    fn index(&mut self, len: usize) -> usize {
        let choice = match self.choices.get(self.pos) {
            Some(&choice) => choice,
            None => panic!("replay source exhausted after {} draws", self.pos),
        };
        if choice >= len {
            panic!(
                "replayed choice {} (draw {}) is out of range 0..{}",
                choice, self.pos, len
            );
        }
        self.pos += 1;
        choice
    }
}

/// Records every choice made by an inner source.
pub struct RecordingSource<S> {
    inner: S,
    choices: Vec<usize>,
}

impl<S: RandomSource> RecordingSource<S> {
    pub fn new(inner: S) -> RecordingSource<S> {
        RecordingSource {
            inner: inner,
            choices: Vec::new(),
        }
    }

    /// The choices made so far.
    pub fn choices(&self) -> &[usize] {
        &self.choices
    }

    /// A source that replays the recorded choices from the beginning.
    pub fn replay(&self) -> ReplaySource {
        ReplaySource::new(self.choices.clone())
    }
}

impl<S: RandomSource> RandomSource for RecordingSource<S> {
    fn index(&mut self, len: usize) -> usize {
        let choice = self.inner.index(len);
        self.choices.push(choice);
        choice
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn rng_sources_stay_in_range() {
        let mut plain = RngSource::new(SmallRng::seed_from_u64(3));
        let mut buffered = BufferedSource::new(SmallRng::seed_from_u64(3));
        for len in [1, 2, 5, 255, 256, 1000].iter() {
            for _ in 0..100 {
                assert!(plain.index(*len) < *len);
                assert!(buffered.index(*len) < *len);
            }
        }
    }

    #[test]
    fn recorded_choices_replay() {
        let mut recorder = RecordingSource::new(RngSource::new(SmallRng::seed_from_u64(4)));
        let drawn: Vec<usize> = (1..20).map(|len| recorder.index(len)).collect();
        assert_eq!(recorder.choices(), &drawn[..]);

        let mut replay = recorder.replay();
        let replayed: Vec<usize> = (1..20).map(|len| replay.index(len)).collect();
        assert_eq!(replayed, drawn);
        assert_eq!(replay.remaining(), 0);
    }

    fn draw<S: RandomSource>(mut source: S, len: usize) -> usize {
        source.index(len)
    }

    #[test]
    fn replay_through_mutable_reference() {
        let mut replay = ReplaySource::new(vec![1, 0]);
        assert_eq!(draw(&mut replay, 2), 1);
        assert_eq!(replay.index(2), 0);
    }

    #[test]
    #[should_panic(expected = "exhausted")]
    fn replay_exhaustion_panics() {
        let mut replay = ReplaySource::new(vec![0]);
        replay.index(1);
        replay.index(1);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn replay_out_of_range_panics() {
        ReplaySource::new(vec![3]).index(2);
    }
}
