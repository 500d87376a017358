// src/common.rs

use core::fmt;

/// log2 of the stack-resident twiddle buffer used by the butterfly engine.
/// A butterfly pass materializes at most `2^(LBUF - 1)` twiddles; deeper
/// passes compose a running multiplier instead.
pub const LBUF: u32 = 9;

/// Tile bits for the cache-blocked in-place bit reversal. The tile holds
/// `2^(2*Q)` elements and is only used for sizes above `2^16`.
pub const Q: u32 = 6;

const _: () = assert!(LBUF >= 2 && LBUF <= 16);
const _: () = assert!(Q >= 1 && 2 * Q <= 17);

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum FftError {
    SizeMismatch,
    InvalidStride,
    BufferTooSmall,
    NotPowerOfTwo,
    OutOfMemory,
}

impl fmt::Display for FftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FftError::SizeMismatch => write!(f, "Data buffer size does not match FFT size"),
            FftError::InvalidStride => write!(f, "Invalid stride configuration"),
            FftError::BufferTooSmall => write!(f, "Buffer is too small for the requested layout"),
            FftError::NotPowerOfTwo => {
                write!(f, "Size must be a power of 2 (Bluestein support disabled)")
            }
            FftError::OutOfMemory => write!(f, "Scratch allocation failed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FftError {}

impl FftError {
    /// C-style status code: invalid arguments are `-1`, allocation failure
    /// is `-2`. Success (`Ok`) corresponds to `0`.
    pub fn code(&self) -> i32 {
        match self {
            FftError::OutOfMemory => -2,
            _ => -1,
        }
    }
}

/// Transform direction. Forward computes `Y[j] = Σ X[k]·exp(-2πi·j·k/n)`,
/// inverse uses the conjugated twiddles. Neither applies a `1/n` factor on
/// its own; normalization comes from the caller-supplied scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Inverse,
}

impl Direction {
    #[inline]
    pub(crate) fn is_inverse(self) -> bool {
        matches!(self, Direction::Inverse)
    }
}

/// Placement of the real and imaginary channels inside one scalar buffer.
///
/// Element `k` of a channel lives at `offset + k * step`. Steps may be
/// negative; a zero step is only meaningful on source layouts, where it
/// broadcasts the element at `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub re_offset: usize,
    pub re_step: isize,
    pub im_offset: usize,
    pub im_step: isize,
}

impl Layout {
    /// The contiguous interleaved layout `[re0, im0, re1, im1, ...]`.
    pub const fn interleaved() -> Self {
        Layout { re_offset: 0, re_step: 2, im_offset: 1, im_step: 2 }
    }

    /// Two contiguous halves: reals in `[0, n)`, imaginaries in `[n, 2n)`.
    pub const fn split_at(n: usize) -> Self {
        Layout { re_offset: 0, re_step: 1, im_offset: n, im_step: 1 }
    }
}

/// Optional bottom-pass replacement for a region multipass.
///
/// Offered the region before the built-in vector kernels; it may process
/// one or more of the lowest butterfly passes and report how many it
/// consumed (0 leaves everything to the engine). Regions are always
/// contiguous split-layout slices of length `2^log2n`.
pub trait MultipassHook<T> {
    fn multipass(&self, re: &mut [T], im: &mut [T], log2n: u32, depth: u32, inverse: bool)
    -> u32;
}

/// Per-call knobs for the `transform_*` entry points.
pub struct FftOptions<'a, T> {
    /// Overrides the CPU feature probe. `Some(0)` forces the scalar path.
    pub feature_mask: Option<u32>,
    /// User replacement for the bottom butterfly passes.
    pub multipass_hook: Option<&'a dyn MultipassHook<T>>,
}

impl<T> Default for FftOptions<'_, T> {
    fn default() -> Self {
        FftOptions { feature_mask: None, multipass_hook: None }
    }
}
