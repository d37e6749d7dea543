/// A closed range of `f32` values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Everything, the identity for [`Interval::intersect`].
    pub const UNIVERSE: Interval = Interval {
        min: f32::NEG_INFINITY,
        max: f32::INFINITY,
    };

    /// The unit interval [0, 1], used for color channels.
    pub const UNIT: Interval = Interval { min: 0.0, max: 1.0 };

    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns true if no value lies in the interval (min > max).
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// The overlap of two intervals, possibly empty.
    pub fn intersect(&self, other: Interval) -> Interval {
        Interval::new(self.min.max(other.min), self.max.min(other.max))
    }

    /// Clamps x to be within the interval [min, max].
    ///
    /// NaN maps to `min`.
    pub fn clamp(&self, x: f32) -> f32 {
        if x.is_nan() {
            return self.min;
        }
        x.clamp(self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersect() {
        let a = Interval::new(0.0, 10.0);
        let b = Interval::new(5.0, 15.0);

        assert_eq!(a.intersect(b), Interval::new(5.0, 10.0));
        assert_eq!(Interval::UNIVERSE.intersect(a), a);
        assert!(!a.intersect(b).is_empty());
    }

    #[test]
    fn test_disjoint_is_empty() {
        let a = Interval::new(0.0, 1.0);
        let b = Interval::new(2.0, 3.0);

        assert!(a.intersect(b).is_empty());
        // A single point is not empty
        assert!(!Interval::new(1.0, 1.0).is_empty());
    }

    #[test]
    fn test_unit_clamp() {
        assert_eq!(Interval::UNIT.clamp(-0.5), 0.0);
        assert_eq!(Interval::UNIT.clamp(0.25), 0.25);
        assert_eq!(Interval::UNIT.clamp(7.0), 1.0);
        assert_eq!(Interval::UNIT.clamp(f32::NAN), 0.0);
    }
}
