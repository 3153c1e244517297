//! Scalar sample types stored in a [`Grid`](crate::Grid)
//!
//! Flooding orders samples by discrete intensity level. [`Sample::level`]
//! is the quantization every ordering structure uses: integers map to
//! themselves and floats are rounded half away from zero.

use std::fmt::Debug;

/// A scalar value that can be stored in a grid and flooded
pub trait Sample: Copy + PartialOrd + Debug + Send + Sync + 'static {
    /// Smallest representable value; never wins a "larger neighbor" test
    const MIN: Self;
    /// Largest representable value; never wins a "smaller neighbor" test
    const MAX: Self;

    /// Widen to `f64` for comparisons against thresholds and floors
    fn to_f64(self) -> f64;

    /// Quantize to an integer intensity level
    fn level(self) -> i64;
}

macro_rules! impl_integer_sample {
    ($($t:ty),*) => {
        $(
            impl Sample for $t {
                const MIN: Self = <$t>::MIN;
                const MAX: Self = <$t>::MAX;

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[inline]
                fn level(self) -> i64 {
                    self as i64
                }
            }
        )*
    };
}

macro_rules! impl_float_sample {
    ($($t:ty),*) => {
        $(
            impl Sample for $t {
                const MIN: Self = <$t>::MIN;
                const MAX: Self = <$t>::MAX;

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[inline]
                fn level(self) -> i64 {
                    // NaN sorts below everything
                    if self.is_nan() {
                        i64::MIN
                    } else {
                        self.round() as i64
                    }
                }
            }
        )*
    };
}

impl_integer_sample!(u8, u16, u32, i16, i32, i64);
impl_float_sample!(f32, f64);
