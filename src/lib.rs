#![no_std]

//! Generic complex FFT for one-dimensional inputs of arbitrary size.
//!
//! Power-of-two sizes run a radix-2 decimation-in-time engine (bit
//! reversal followed by a cache-aware butterfly schedule, with runtime
//! SIMD specialization for `f32`/`f64`); every other size reduces to a
//! power-of-two convolution via Bluestein's algorithm. Data may be
//! interleaved (`&[Complex<T>]`), split into separate re/im arrays, or
//! placed by arbitrary strides inside one buffer.
//!
//! Forward transforms compute `Y[j] = Σ X[k]·exp(-2πi·j·k/n)`; the
//! inverse conjugates the twiddles. Scaling is always explicit: a forward
//! pass followed by an inverse pass with scales `1` and `1/n` round-trips
//! the input.

// Enables the standard library only for tests,
// so you can run 'cargo test' on your PC normally.
#[cfg(any(test, feature = "std"))]
extern crate std;

#[cfg(feature = "bluestein")]
extern crate alloc;

pub mod common;
pub mod scalar;
pub mod simd;

mod bitrev;
#[cfg(feature = "bluestein")]
mod bluestein;
mod butterfly;
mod transform;
mod twiddle;

pub use common::{Direction, FftError, FftOptions, Layout, MultipassHook};
pub use scalar::FftScalar;
pub use simd::{feature_mask, prime_feature_mask};
pub use transform::{
    fft, fft_in_place, fft_split, fft_split_in_place, fft_strided, fft_strided_in_place, ifft,
    ifft_in_place, ifft_split, ifft_split_in_place, ifft_strided, ifft_strided_in_place,
    transform, transform_in_place, transform_split, transform_split_in_place, transform_strided,
    transform_strided_in_place,
};
