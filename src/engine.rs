//! Sequence engine: the core state machine producing gift IDs.
//!
//! Holds `(workshop_id, last_timestamp, sequence)` behind a single mutex
//! and serialises every call through one short critical section, per the
//! state machine:
//!
//! ```text
//!                        acquire -> read clock
//!                          now < 0            -> ClockBeforeEpoch
//!                          now overflows       -> EpochOverflow
//!                          now < last (<= tol)  -> wait, now := last
//!                          now < last (>  tol)  -> ClockRegression
//!                          now == last          -> same-ms (seq++ or wait-tick)
//!                          now >  last          -> advance (seq := 0)
//!                        encode -> release -> return
//! ```

use std::sync::{Arc, Mutex};

use crate::clock::{Clock, SystemClock};
use crate::codec::{self, GiftClass, MAX_SEQUENCE, MAX_TIMESTAMP_REL, MAX_WORKSHOP_ID};
use crate::error::{GeneratorError, Result};

/// Tolerance, in milliseconds, for a backward clock jump before the
/// engine gives up and fails with [`GeneratorError::ClockRegression`].
pub const MAX_BACKWARD_MS: i64 = 5;

impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn now(&self) -> i64 {
        (**self).now()
    }
}

struct EngineState {
    /// Most recent timestamp observed by a successful generation.
    /// `-1` means "no generation yet".
    last_timestamp: i64,
    /// Per-millisecond counter for the current `last_timestamp`.
    sequence: u16,
}

/// The per-process gift-ID generator.
///
/// Constructed once with a validated `workshop_id`; every subsequent
/// `generate` call serialises through an internal mutex. The generator
/// holds no other shared state and performs no I/O on its hot path.
pub struct GiftIdGenerator<C: Clock = SystemClock> {
    workshop_id: u16,
    clock: C,
    state: Mutex<EngineState>,
}

impl GiftIdGenerator<SystemClock> {
    /// Construct a generator backed by the real system clock.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::WorkshopIdInvalid`] if `workshop_id` is
    /// not in `0..1024`.
    pub fn new(workshop_id: u16) -> Result<Self> {
        Self::with_clock(workshop_id, SystemClock)
    }
}

impl<C: Clock> GiftIdGenerator<C> {
    /// Construct a generator backed by a custom [`Clock`] (used by tests
    /// to inject deterministic time).
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::WorkshopIdInvalid`] if `workshop_id` is
    /// not in `0..1024`.
    pub fn with_clock(workshop_id: u16, clock: C) -> Result<Self> {
        if workshop_id > MAX_WORKSHOP_ID {
            return Err(GeneratorError::WorkshopIdInvalid(workshop_id));
        }
        Ok(Self {
            workshop_id,
            clock,
            state: Mutex::new(EngineState {
                last_timestamp: -1,
                sequence: 0,
            }),
        })
    }

    /// The workshop ID this generator embeds in every identifier.
    #[must_use]
    pub const fn workshop_id(&self) -> u16 {
        self.workshop_id
    }

    /// Produce the next unique identifier for the given gift class.
    ///
    /// Serialises all callers through a single mutex; the critical
    /// section holds for the entire duration of clock regression and
    /// sequence-exhaustion waits, so no other caller can observe a
    /// partially-updated state.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::ClockBeforeEpoch`] if the clock predates
    /// the epoch, [`GeneratorError::EpochOverflow`] if the 41-bit
    /// timestamp field is exhausted, or
    /// [`GeneratorError::ClockRegression`] if the clock jumped backwards
    /// by more than [`MAX_BACKWARD_MS`].
    pub fn generate(&self, gift_class: GiftClass) -> Result<u64> {
        let mut state = self.state.lock().expect("engine mutex poisoned");

        let mut now_rel = self.clock.now_relative();
        if now_rel < 0 {
            return Err(GeneratorError::ClockBeforeEpoch);
        }
        if now_rel > MAX_TIMESTAMP_REL {
            return Err(GeneratorError::EpochOverflow);
        }

        if now_rel < state.last_timestamp {
            let delta_ms = state.last_timestamp - now_rel;
            if delta_ms > MAX_BACKWARD_MS {
                return Err(GeneratorError::ClockRegression { delta_ms });
            }
            while self.clock.now_relative() < state.last_timestamp {
                std::thread::yield_now();
            }
            now_rel = state.last_timestamp;
        }

        let sequence = if now_rel == state.last_timestamp {
            if state.sequence < MAX_SEQUENCE {
                state.sequence += 1;
                state.sequence
            } else {
                loop {
                    let ticked = self.clock.now_relative();
                    if ticked > state.last_timestamp {
                        now_rel = ticked;
                        break;
                    }
                    std::thread::yield_now();
                }
                state.last_timestamp = now_rel;
                state.sequence = 0;
                0
            }
        } else {
            state.last_timestamp = now_rel;
            state.sequence = 0;
            0
        };

        codec::encode(state.last_timestamp, self.workshop_id, sequence, gift_class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;
    use crate::codec::{decode, EPOCH_MS};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    fn gen_with_clock(workshop_id: u16, now_abs_ms: i64) -> (GiftIdGenerator<Arc<MockClock>>, Arc<MockClock>) {
        let clock = Arc::new(MockClock::new(now_abs_ms));
        let gen = GiftIdGenerator::with_clock(workshop_id, Arc::clone(&clock)).unwrap();
        (gen, clock)
    }

    #[test]
    fn workshop_id_validation() {
        assert!(GiftIdGenerator::new(1024).is_err());
        assert!(GiftIdGenerator::new(1023).is_ok());
    }

    #[test]
    fn same_ms_increments_sequence() {
        let (gen, _clock) = gen_with_clock(1, EPOCH_MS + 1000);
        let seqs: Vec<u16> = (0..4)
            .map(|_| decode(gen.generate(GiftClass::Toy).unwrap()).unwrap().sequence)
            .collect();
        assert_eq!(seqs, vec![0, 1, 2, 3]);
    }

    #[test]
    fn advance_resets_sequence() {
        let (gen, clock) = gen_with_clock(1, EPOCH_MS + 1000);
        let first = decode(gen.generate(GiftClass::Toy).unwrap()).unwrap();
        let second = decode(gen.generate(GiftClass::Toy).unwrap()).unwrap();
        clock.advance(1);
        let third = decode(gen.generate(GiftClass::Toy).unwrap()).unwrap();

        assert_eq!((first.sequence, first.timestamp_ms_rel), (0, 1000));
        assert_eq!((second.sequence, second.timestamp_ms_rel), (1, 1000));
        assert_eq!((third.sequence, third.timestamp_ms_rel), (0, 1001));
    }

    #[test]
    fn sequence_exhaustion_waits_for_next_tick() {
        let (gen, clock) = gen_with_clock(1, EPOCH_MS + 1000);
        for _ in 0..=MAX_SEQUENCE {
            gen.generate(GiftClass::Toy).unwrap();
        }

        let clock_for_thread = Arc::clone(&clock);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            clock_for_thread.advance(1);
        });

        let decoded = decode(gen.generate(GiftClass::Toy).unwrap()).unwrap();
        assert_eq!(decoded.sequence, 0);
        assert_eq!(decoded.timestamp_ms_rel, 1001);
    }

    #[test]
    fn regression_within_tolerance_waits_then_succeeds() {
        let (gen, clock) = gen_with_clock(1, EPOCH_MS + 1000);
        gen.generate(GiftClass::Toy).unwrap();

        clock.set(EPOCH_MS + 998);
        let clock_for_thread = Arc::clone(&clock);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            clock_for_thread.set(EPOCH_MS + 1000);
        });

        let decoded = decode(gen.generate(GiftClass::Toy).unwrap()).unwrap();
        assert!(decoded.timestamp_ms_rel >= 1000);
    }

    #[test]
    fn regression_beyond_tolerance_fails_and_state_is_unchanged() {
        let (gen, clock) = gen_with_clock(1, EPOCH_MS + 1000);
        gen.generate(GiftClass::Toy).unwrap();

        clock.set(EPOCH_MS + 900);
        let err = gen.generate(GiftClass::Toy).unwrap_err();
        assert_eq!(err, GeneratorError::ClockRegression { delta_ms: 100 });

        clock.set(EPOCH_MS + 1000);
        let decoded = decode(gen.generate(GiftClass::Toy).unwrap()).unwrap();
        assert_eq!(decoded.sequence, 1);
    }

    #[test]
    fn clock_before_epoch_fails() {
        let (gen, _clock) = gen_with_clock(1, EPOCH_MS - 1);
        assert_eq!(
            gen.generate(GiftClass::Toy).unwrap_err(),
            GeneratorError::ClockBeforeEpoch
        );
    }

    #[test]
    fn epoch_overflow_fails() {
        let (gen, _clock) = gen_with_clock(1, EPOCH_MS + MAX_TIMESTAMP_REL + 1);
        assert_eq!(
            gen.generate(GiftClass::Toy).unwrap_err(),
            GeneratorError::EpochOverflow
        );
    }

    #[test]
    fn every_id_carries_the_generators_workshop() {
        let (gen, _clock) = gen_with_clock(77, EPOCH_MS + 5000);
        for _ in 0..10 {
            let decoded = decode(gen.generate(GiftClass::Toy).unwrap()).unwrap();
            assert_eq!(decoded.workshop_id, 77);
        }
    }

    #[test]
    fn ids_are_unique_and_monotonic_within_a_run() {
        let (gen, clock) = gen_with_clock(1, EPOCH_MS + 5000);
        let mut ids = Vec::new();
        for i in 0..5000 {
            if i % 500 == 0 {
                clock.advance(1);
            }
            ids.push(gen.generate(GiftClass::Toy).unwrap());
        }
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), ids.len());
        for window in ids.windows(2) {
            assert!(window[1] > window[0]);
        }
    }

    #[test]
    fn concurrent_callers_produce_unique_monotonic_ids() {
        let (gen, clock) = gen_with_clock(1, EPOCH_MS + 5000);
        let gen = Arc::new(gen);

        let ticker_clock = Arc::clone(&clock);
        let ticker = thread::spawn(move || {
            for _ in 0..20 {
                thread::sleep(Duration::from_micros(200));
                ticker_clock.advance(1);
            }
        });

        let mut handles = Vec::new();
        for _ in 0..8 {
            let gen = Arc::clone(&gen);
            handles.push(thread::spawn(move || {
                (0..500)
                    .map(|_| gen.generate(GiftClass::Toy).unwrap())
                    .collect::<Vec<_>>()
            }));
        }

        let mut all_ids: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        ticker.join().unwrap();

        let total = all_ids.len();
        all_ids.sort_unstable();
        all_ids.dedup();
        assert_eq!(all_ids.len(), total);
    }
}
