//! Numeric priorities accepted by the heaps in this crate
//!
//! Priorities only need a partial order, but the heap relies on that order
//! being total over the values it actually stores. Floating-point NaN and the
//! infinities break this, so every priority is checked with
//! [`Priority::is_valid`] before it enters a heap.

/// A numeric priority key.
///
/// Smaller values are dequeued first.
pub trait Priority: PartialOrd {
    /// Returns true if this value can be stored in a heap.
    ///
    /// Integers are always valid. Floats are valid only when finite.
    fn is_valid(&self) -> bool;
}

macro_rules! impl_priority_integer {
    ($($t:ty),* $(,)?) => {
        $(
            impl Priority for $t {
                #[inline]
                fn is_valid(&self) -> bool {
                    true
                }
            }
        )*
    };
}

macro_rules! impl_priority_float {
    ($($t:ty),* $(,)?) => {
        $(
            impl Priority for $t {
                #[inline]
                fn is_valid(&self) -> bool {
                    self.is_finite()
                }
            }
        )*
    };
}

impl_priority_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_priority_float!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers_always_valid() {
        assert!(i32::MIN.is_valid());
        assert!(0u8.is_valid());
        assert!(u64::MAX.is_valid());
    }

    #[test]
    fn test_floats_must_be_finite() {
        assert!(1.5f64.is_valid());
        assert!((-0.0f32).is_valid());
        assert!(f64::MAX.is_valid());
        assert!(!f64::NAN.is_valid());
        assert!(!f64::INFINITY.is_valid());
        assert!(!f32::NEG_INFINITY.is_valid());
    }
}
