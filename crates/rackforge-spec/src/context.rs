//! Injected time and id sources.
//!
//! Validators, the project service, and the panel editor take these as
//! explicit context values so tests can run with isolated, deterministic
//! instances instead of process-wide state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Creates a clock frozen at `start`.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Moves the clock by `delta` (may be negative).
    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += delta;
    }

    /// Sets the clock to `instant`.
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = instant;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the random suffix in project ids.
const PROJECT_SUFFIX_LEN: usize = 9;

/// Formats `n` in lowercase base 36.
pub fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

/// Generates control and project ids.
///
/// Control ids are derived from a millisecond timestamp that is forced to be
/// strictly increasing, so two controls created in the same millisecond still
/// get distinct, ordered ids.
#[derive(Debug)]
pub struct IdGenerator {
    last_stamp: AtomicU64,
    rng: Mutex<Pcg32>,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::seeded(rand::random())
    }
}

impl IdGenerator {
    /// Creates a generator with a random seed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a generator whose random suffixes are reproducible.
    pub fn seeded(seed: u64) -> Self {
        Self {
            last_stamp: AtomicU64::new(0),
            rng: Mutex::new(Pcg32::seed_from_u64(seed)),
        }
    }

    /// Returns a new control id (`ctl_<base36 stamp>`).
    pub fn control_id(&self, now: DateTime<Utc>) -> String {
        let stamp = self.next_stamp(millis(now));
        format!("ctl_{}", to_base36(stamp))
    }

    /// Returns a new project id (`prj_<base36 millis>_<9 random base36 chars>`).
    pub fn project_id(&self, now: DateTime<Utc>) -> String {
        format!(
            "prj_{}_{}",
            to_base36(millis(now)),
            self.random_suffix(PROJECT_SUFFIX_LEN)
        )
    }

    fn next_stamp(&self, millis: u64) -> u64 {
        let mut prev = self.last_stamp.load(Ordering::Relaxed);
        loop {
            let next = millis.max(prev + 1);
            match self.last_stamp.compare_exchange_weak(
                prev,
                next,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return next,
                Err(actual) => prev = actual,
            }
        }
    }

    fn random_suffix(&self, len: usize) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        (0..len)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect()
    }
}

fn millis(now: DateTime<Utc>) -> u64 {
    u64::try_from(now.timestamp_millis()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::is_valid_project_id;
    use chrono::TimeZone;

    fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_to_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_704_067_200_000), "lqu5m2o0");
    }

    #[test]
    fn test_control_ids_strictly_increase_within_a_millisecond() {
        let ids = IdGenerator::seeded(7);
        let now = epoch();
        let a = ids.control_id(now);
        let b = ids.control_id(now);
        let c = ids.control_id(now);
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_eq!(ids.last_stamp.load(Ordering::Relaxed), millis(now) + 2);
    }

    #[test]
    fn test_project_id_format() {
        let ids = IdGenerator::seeded(7);
        let id = ids.project_id(epoch());
        assert!(id.starts_with("prj_lqu5m2o0_"), "{}", id);
        assert!(is_valid_project_id(&id), "{}", id);
    }

    #[test]
    fn test_seeded_suffixes_are_reproducible() {
        let a = IdGenerator::seeded(42).project_id(epoch());
        let b = IdGenerator::seeded(42).project_id(epoch());
        assert_eq!(a, b);
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(epoch());
        clock.advance(Duration::seconds(5));
        assert_eq!(clock.now(), epoch() + Duration::seconds(5));
        clock.set(epoch());
        assert_eq!(clock.now(), epoch());
    }
}
