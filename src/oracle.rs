//! Time-weighted oracle ring buffer.
//!
//! The pair records one [`OracleSample`] per distinct timestamp at which
//! a swap (or other oracle-touching operation) runs. Samples hold
//! running cumulative sums, so the average active id, volatility, or
//! bin-crossing rate over any window is a difference of two samples
//! divided by the elapsed time.
//!
//! The ring starts at a configured capacity (possibly zero, meaning
//! disabled) and can only grow. Growing rotates the buffer so the
//! oldest sample sits at physical index zero before new slots are
//! appended, which keeps chronological order a simple wrap-around scan.

use primitive_types::U256;

use crate::domain::{BinId, Rounding, Timestamp};
use crate::error::{PairError, Result};
use crate::math::mul_div::{mul_div, u256_to_u128};

/// One oracle observation.
///
/// Cumulative values are running sums weighted by elapsed seconds, so
/// `(b.cumulative_id - a.cumulative_id) / (b.timestamp - a.timestamp)`
/// is the time-weighted average active id between `a` and `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OracleSample {
    /// When this sample was written.
    pub timestamp: Timestamp,
    /// Sum of `active_id * dt` since the first sample.
    pub cumulative_id: u128,
    /// Sum of `volatility_accumulator * dt` since the first sample.
    pub cumulative_volatility: u128,
    /// Plain count of bins crossed by swaps since the first sample.
    pub cumulative_bins_crossed: u128,
}

/// Snapshot of the ring's shape, for inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OracleParams {
    /// Allocated capacity in samples.
    pub size: u16,
    /// Number of slots actually written so far.
    pub active_size: u16,
    /// Timestamp of the newest sample, zero if none.
    pub last_updated: Timestamp,
    /// Timestamp of the oldest retained sample, zero if none.
    pub first_timestamp: Timestamp,
}

/// Ring buffer of oracle samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleRing {
    samples: Vec<OracleSample>,
    active_size: u16,
    /// Physical index of the newest sample. Meaningless while
    /// `active_size` is zero.
    index: u16,
}

impl OracleRing {
    /// Creates a ring with the given capacity. Zero is allowed and
    /// leaves the oracle disabled until [`Self::increase_length`].
    #[must_use]
    pub fn new(size: u16) -> Self {
        Self {
            samples: vec![OracleSample::default(); usize::from(size)],
            active_size: 0,
            index: 0,
        }
    }

    /// Allocated capacity in samples.
    #[must_use]
    pub fn size(&self) -> u16 {
        // capacity never exceeds u16::MAX by construction
        self.samples.len() as u16
    }

    /// Number of samples written so far.
    #[must_use]
    pub const fn active_size(&self) -> u16 {
        self.active_size
    }

    /// Snapshot of the ring's shape.
    #[must_use]
    pub fn params(&self) -> OracleParams {
        let (last_updated, first_timestamp) = if self.active_size == 0 {
            (0, 0)
        } else {
            (self.newest().timestamp, self.oldest().timestamp)
        };
        OracleParams {
            size: self.size(),
            active_size: self.active_size,
            last_updated,
            first_timestamp,
        }
    }

    /// Grows the ring to `new_size` slots.
    ///
    /// Existing samples are rotated so the oldest sits at physical index
    /// zero, then fresh slots are appended. Chronological order is
    /// preserved.
    ///
    /// # Errors
    ///
    /// Returns [`PairError::InvalidInput`] if `new_size` does not exceed
    /// the current capacity.
    pub fn increase_length(&mut self, new_size: u16) -> Result<()> {
        if new_size <= self.size() {
            return Err(PairError::InvalidInput(
                "oracle length can only increase",
            ));
        }
        if self.active_size > 0 {
            let oldest = self.oldest_index();
            self.samples.rotate_left(usize::from(oldest));
            self.index = self.active_size - 1;
        }
        self.samples
            .resize(usize::from(new_size), OracleSample::default());
        Ok(())
    }

    /// Records an observation at `now`.
    ///
    /// A second update at the same timestamp folds its bin count into
    /// the existing sample instead of consuming a slot. With zero
    /// capacity this is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`PairError::InvalidInput`] if `now` is before the
    /// newest sample.
    pub fn update(
        &mut self,
        now: Timestamp,
        active_id: BinId,
        volatility_accumulator: u32,
        bins_crossed: u32,
    ) -> Result<()> {
        if self.samples.is_empty() {
            return Ok(());
        }
        if self.active_size == 0 {
            self.samples[0] = OracleSample {
                timestamp: now,
                cumulative_id: 0,
                cumulative_volatility: 0,
                cumulative_bins_crossed: u128::from(bins_crossed),
            };
            self.active_size = 1;
            self.index = 0;
            return Ok(());
        }

        let newest = *self.newest();
        if now < newest.timestamp {
            return Err(PairError::InvalidInput("oracle timestamp went backwards"));
        }
        if now == newest.timestamp {
            self.samples[usize::from(self.index)].cumulative_bins_crossed +=
                u128::from(bins_crossed);
            return Ok(());
        }

        // each increment is at most 2^24 * 2^64, so the running u128
        // sums cannot overflow
        let dt = now - newest.timestamp;
        let sample = OracleSample {
            timestamp: now,
            cumulative_id: newest.cumulative_id + u128::from(active_id.get()) * u128::from(dt),
            cumulative_volatility: newest.cumulative_volatility
                + u128::from(volatility_accumulator) * u128::from(dt),
            cumulative_bins_crossed: newest.cumulative_bins_crossed + u128::from(bins_crossed),
        };

        let next = (self.index + 1) % self.size();
        self.samples[usize::from(next)] = sample;
        self.index = next;
        if self.active_size < self.size() {
            self.active_size += 1;
        }
        Ok(())
    }

    /// Cumulative values as of `now - lookback`.
    ///
    /// Returns the stored sample when the target timestamp hits one
    /// exactly, a linear interpolation between the two bracketing
    /// samples otherwise. A target at or past the newest sample returns
    /// the newest sample unchanged.
    ///
    /// # Errors
    ///
    /// - [`PairError::OracleNotInitialized`] if no sample exists.
    /// - [`PairError::OracleLookbackTooLong`] if the target predates the
    ///   oldest retained sample.
    pub fn sample_at(&self, now: Timestamp, lookback: u64) -> Result<OracleSample> {
        if self.active_size == 0 {
            return Err(PairError::OracleNotInitialized);
        }
        let target = now.saturating_sub(lookback);
        let newest = *self.newest();
        if target >= newest.timestamp {
            return Ok(newest);
        }
        let oldest = *self.oldest();
        if target < oldest.timestamp {
            return Err(PairError::OracleLookbackTooLong);
        }

        // binary search in chronological order over the written slots
        let (mut lo, mut hi) = (0u16, self.active_size - 1);
        while lo < hi {
            let mid = (lo + hi + 1) / 2;
            if self.chronological(mid).timestamp <= target {
                lo = mid;
            } else {
                hi = mid - 1;
            }
        }

        let before = *self.chronological(lo);
        if before.timestamp == target {
            return Ok(before);
        }
        let after = *self.chronological(lo + 1);
        Self::interpolate(&before, &after, target)
    }

    fn interpolate(
        before: &OracleSample,
        after: &OracleSample,
        target: Timestamp,
    ) -> Result<OracleSample> {
        // delta * elapsed can exceed 128 bits for wide sample gaps, so
        // the scaling runs through the full-width helper
        let span = U256::from(after.timestamp - before.timestamp);
        let elapsed = U256::from(target - before.timestamp);
        let lerp = |a: u128, b: u128| -> Result<u128> {
            let scaled = mul_div(U256::from(b - a), elapsed, span, Rounding::Down)?;
            Ok(a + u256_to_u128(scaled)?)
        };
        Ok(OracleSample {
            timestamp: target,
            cumulative_id: lerp(before.cumulative_id, after.cumulative_id)?,
            cumulative_volatility: lerp(before.cumulative_volatility, after.cumulative_volatility)?,
            cumulative_bins_crossed: lerp(
                before.cumulative_bins_crossed,
                after.cumulative_bins_crossed,
            )?,
        })
    }

    fn newest(&self) -> &OracleSample {
        &self.samples[usize::from(self.index)]
    }

    fn oldest(&self) -> &OracleSample {
        &self.samples[usize::from(self.oldest_index())]
    }

    fn oldest_index(&self) -> u16 {
        if self.active_size < self.size() {
            // buffer not yet full: writes started at physical zero
            self.index + 1 - self.active_size
        } else {
            (self.index + 1) % self.size()
        }
    }

    /// Physical index of the `pos`-th sample in chronological order.
    fn chronological(&self, pos: u16) -> &OracleSample {
        let physical = (self.oldest_index() + pos) % self.size();
        &self.samples[usize::from(physical)]
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn id(delta: i32) -> BinId {
        let Ok(id) = BinId::ONE.checked_offset(delta) else {
            panic!("in range");
        };
        id
    }

    fn filled_ring() -> OracleRing {
        let mut ring = OracleRing::new(4);
        let Ok(()) = ring.update(100, id(0), 0, 0) else {
            panic!("expected Ok");
        };
        let Ok(()) = ring.update(110, id(5), 1_000, 5) else {
            panic!("expected Ok");
        };
        let Ok(()) = ring.update(130, id(8), 2_000, 3) else {
            panic!("expected Ok");
        };
        ring
    }

    #[test]
    fn empty_ring_errors() {
        let ring = OracleRing::new(4);
        assert_eq!(ring.sample_at(100, 0), Err(PairError::OracleNotInitialized));
        assert_eq!(ring.params().active_size, 0);
    }

    #[test]
    fn zero_capacity_is_a_noop() {
        let mut ring = OracleRing::new(0);
        let Ok(()) = ring.update(100, id(0), 0, 0) else {
            panic!("expected Ok");
        };
        assert_eq!(ring.active_size(), 0);
        assert_eq!(ring.sample_at(100, 0), Err(PairError::OracleNotInitialized));
    }

    #[test]
    fn first_sample_has_zero_cumulatives() {
        let mut ring = OracleRing::new(4);
        let Ok(()) = ring.update(100, id(7), 500, 2) else {
            panic!("expected Ok");
        };
        let Ok(sample) = ring.sample_at(100, 0) else {
            panic!("expected Ok");
        };
        assert_eq!(sample.timestamp, 100);
        assert_eq!(sample.cumulative_id, 0);
        assert_eq!(sample.cumulative_volatility, 0);
        assert_eq!(sample.cumulative_bins_crossed, 2);
    }

    #[test]
    fn cumulatives_accumulate_by_elapsed_time() {
        let ring = filled_ring();
        let Ok(sample) = ring.sample_at(130, 0) else {
            panic!("expected Ok");
        };
        // 10s at id(5) then 20s at id(8)
        let expected_id =
            u128::from(id(5).get()) * 10 + u128::from(id(8).get()) * 20;
        assert_eq!(sample.cumulative_id, expected_id);
        assert_eq!(sample.cumulative_volatility, 1_000 * 10 + 2_000 * 20);
        assert_eq!(sample.cumulative_bins_crossed, 8);
    }

    #[test]
    fn same_timestamp_folds_bins_crossed() {
        let mut ring = filled_ring();
        let Ok(()) = ring.update(130, id(9), 2_500, 4) else {
            panic!("expected Ok");
        };
        assert_eq!(ring.active_size(), 3);
        let Ok(sample) = ring.sample_at(130, 0) else {
            panic!("expected Ok");
        };
        assert_eq!(sample.cumulative_bins_crossed, 12);
    }

    #[test]
    fn backwards_time_rejected() {
        let mut ring = filled_ring();
        assert_eq!(
            ring.update(129, id(0), 0, 0),
            Err(PairError::InvalidInput("oracle timestamp went backwards"))
        );
    }

    #[test]
    fn exact_hit_returns_stored_sample() {
        let ring = filled_ring();
        let Ok(sample) = ring.sample_at(130, 20) else {
            panic!("expected Ok");
        };
        assert_eq!(sample.timestamp, 110);
        assert_eq!(sample.cumulative_bins_crossed, 5);
    }

    #[test]
    fn lookback_interpolates_between_samples() {
        let ring = filled_ring();
        // target 120 is halfway between samples at 110 and 130
        let Ok(sample) = ring.sample_at(130, 10) else {
            panic!("expected Ok");
        };
        assert_eq!(sample.timestamp, 120);
        let at_110 = u128::from(id(5).get()) * 10;
        let at_130 = at_110 + u128::from(id(8).get()) * 20;
        assert_eq!(sample.cumulative_id, (at_110 + at_130) / 2);
        assert_eq!(sample.cumulative_bins_crossed, (5 + 8) / 2);
    }

    #[test]
    fn interpolation_handles_wide_sample_gaps() {
        // cumulative deltas of roughly 2^23 * dt times a multi-week
        // elapsed offset exceed u64 in the lerp products
        let mut ring = OracleRing::new(2);
        let Ok(()) = ring.update(0, BinId::ONE, 0, 0) else {
            panic!("expected Ok");
        };
        let Ok(()) = ring.update(4_000_000, BinId::ONE, 100_000, 6) else {
            panic!("expected Ok");
        };
        let Ok(sample) = ring.sample_at(4_000_000, 2_000_000) else {
            panic!("expected Ok");
        };
        assert_eq!(sample.timestamp, 2_000_000);
        assert_eq!(
            sample.cumulative_id,
            u128::from(BinId::ONE.get()) * 2_000_000
        );
        assert_eq!(sample.cumulative_volatility, 100_000 * 2_000_000);
        assert_eq!(sample.cumulative_bins_crossed, 3);
    }

    #[test]
    fn lookback_past_oldest_errors() {
        let ring = filled_ring();
        assert_eq!(
            ring.sample_at(130, 31),
            Err(PairError::OracleLookbackTooLong)
        );
    }

    #[test]
    fn zero_lookback_returns_newest() {
        let ring = filled_ring();
        let Ok(sample) = ring.sample_at(500, 0) else {
            panic!("expected Ok");
        };
        assert_eq!(sample.timestamp, 130);
    }

    #[test]
    fn ring_wraps_and_evicts_oldest() {
        let mut ring = filled_ring();
        let Ok(()) = ring.update(140, id(2), 0, 1) else {
            panic!("expected Ok");
        };
        let Ok(()) = ring.update(150, id(2), 0, 1) else {
            panic!("expected Ok");
        };
        // capacity 4, five writes: the t=100 sample is gone
        assert_eq!(ring.active_size(), 4);
        assert_eq!(ring.params().first_timestamp, 110);
        assert_eq!(
            ring.sample_at(150, 41),
            Err(PairError::OracleLookbackTooLong)
        );
    }

    #[test]
    fn increase_length_preserves_history() {
        let mut ring = filled_ring();
        let Ok(()) = ring.update(140, id(2), 0, 1) else {
            panic!("expected Ok");
        };
        let Ok(()) = ring.update(150, id(2), 0, 1) else {
            panic!("expected Ok");
        };
        let Ok(()) = ring.increase_length(8) else {
            panic!("expected Ok");
        };
        assert_eq!(ring.size(), 8);
        assert_eq!(ring.active_size(), 4);
        assert_eq!(ring.params().first_timestamp, 110);
        let Ok(sample) = ring.sample_at(150, 40) else {
            panic!("expected Ok");
        };
        assert_eq!(sample.timestamp, 110);

        // new capacity is usable
        let Ok(()) = ring.update(160, id(2), 0, 0) else {
            panic!("expected Ok");
        };
        assert_eq!(ring.active_size(), 5);
        assert_eq!(ring.params().first_timestamp, 110);
    }

    #[test]
    fn shrinking_rejected() {
        let mut ring = OracleRing::new(4);
        assert!(matches!(
            ring.increase_length(4),
            Err(PairError::InvalidInput(_))
        ));
        assert!(matches!(
            ring.increase_length(2),
            Err(PairError::InvalidInput(_))
        ));
    }
}
