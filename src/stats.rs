//! Summary statistics over decoded volume samples.

/// Range of the strictly positive samples of a volume.
///
/// Zero is background (outside the brain) by convention, so it never takes
/// part in the range. A volume without any positive sample has the
/// [`EMPTY`](ValueRange::EMPTY) range, where `min` is `+inf` and `max` is `-inf`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    /// Smallest positive sample
    pub min: f32,
    /// Largest positive sample
    pub max: f32,
}

impl ValueRange {
    /// The range of a volume with no positive sample.
    pub const EMPTY: ValueRange = ValueRange {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    /// Compute the range of the samples strictly greater than zero.
    /// NaN samples are ignored.
    pub fn of_positive(data: &[f32]) -> ValueRange {
        data.iter()
            .filter(|v| **v > 0.)
            .fold(ValueRange::EMPTY, |r, &v| ValueRange {
                min: r.min.min(v),
                max: r.max.max(v),
            })
    }

    /// Whether no positive sample contributed to this range.
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// The range as a `(min, max)` pair, or `None` if empty.
    pub fn bounds(&self) -> Option<(f32, f32)> {
        if self.is_empty() {
            None
        } else {
            Some((self.min, self.max))
        }
    }
}

impl Default for ValueRange {
    fn default() -> Self {
        ValueRange::EMPTY
    }
}
