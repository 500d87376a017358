// src/twiddle.rs

use crate::common::LBUF;
use crate::scalar::FftScalar;

/// Number of twiddles a butterfly pass materializes at once.
pub(crate) const BUF_LEN: usize = 1 << (LBUF - 1);

/// Stack-resident twiddle storage. The alignment guarantee lets the vector
/// kernels use aligned loads unconditionally on the twiddle side.
#[repr(align(64))]
pub(crate) struct TwiddleBuf<T> {
    pub re: [T; BUF_LEN],
    pub im: [T; BUF_LEN],
}

impl<T: FftScalar> TwiddleBuf<T> {
    #[inline]
    pub fn new() -> Self {
        TwiddleBuf { re: [T::ZERO; BUF_LEN], im: [T::ZERO; BUF_LEN] }
    }
}

/// `exp(2πi/2^k) - 1` with the transform direction applied (forward
/// twiddles rotate clockwise, `exp(-iθ)`).
#[inline]
pub(crate) fn step_root<T: FftScalar>(k: u32, inverse: bool) -> (T, T) {
    let (r, i) = T::cexpm1(k);
    if inverse { (r, i) } else { (r, -i) }
}

/// Full (unshifted) unit root `exp(±2πi/2^k)`.
#[inline]
pub(crate) fn unit_root<T: FftScalar>(k: u32, inverse: bool) -> (T, T) {
    let (r, i) = step_root::<T>(k, inverse);
    (r + T::ONE, i)
}

/// Fills `re/im` with `exp(±2πi·k/2^log_den)` for `k < re.len()`.
///
/// The recurrence works in the `exp(ix) - 1` form and doubles the filled
/// prefix each step, so entry `k` is the product of at most `log2(k)`
/// unit-accurate factors. The final pass shifts the real parts back.
pub(crate) fn expand_pow2<T: FftScalar>(re: &mut [T], im: &mut [T], log_den: u32, inverse: bool) {
    let count = re.len();
    debug_assert!(count >= 1 && (count as u64) <= (1u64 << log_den));
    re[0] = T::ZERO;
    im[0] = T::ZERO;
    let mut len = 1usize;
    let mut i = 0u32;
    while len < count {
        let (wr, wi) = step_root::<T>(log_den - i, inverse);
        let m = core::cmp::min(len, count - len);
        for j in 0..m {
            let (xr, xi) = (re[j], im[j]);
            re[len + j] = (wr * xr - wi * xi) + (wr + xr);
            im[len + j] = (wi * xr + wr * xi) + (wi + xi);
        }
        len <<= 1;
        i += 1;
    }
    for k in 0..count {
        re[k] = re[k] + T::ONE;
    }
}

/// Fills the order-`2n` chirp table `t[j] = exp(±2πi·j/(2n))`, `j < 2n`.
///
/// Only the first quadrant is built by the doubling recurrence (fresh
/// `cexpm1_frac` factors each step); the rest comes from the reflection
/// `t[n-j] = -conj(t[j])` and the half-turn `t[n+j] = -t[j]`. Handles odd
/// and even `n`.
#[cfg(feature = "bluestein")]
pub(crate) fn bluestein_table<T: FftScalar>(t_re: &mut [T], t_im: &mut [T], n: usize, inverse: bool) {
    debug_assert!(n >= 2 && t_re.len() == 2 * n && t_im.len() == 2 * n);
    let two_n = (2 * n) as u64;
    let quarter = n / 2 + 1;
    t_re[0] = T::ZERO;
    t_im[0] = T::ZERO;
    let mut len = 1usize;
    while len < quarter {
        let (wr, wi) = {
            let (r, i) = T::cexpm1_frac(len as u64, two_n);
            if inverse { (r, i) } else { (r, -i) }
        };
        let m = core::cmp::min(len, quarter - len);
        for j in 0..m {
            let (xr, xi) = (t_re[j], t_im[j]);
            t_re[len + j] = (wr * xr - wi * xi) + (wr + xr);
            t_im[len + j] = (wi * xr + wr * xi) + (wi + xi);
        }
        len <<= 1;
    }
    for j in 0..quarter {
        t_re[j] = t_re[j] + T::ONE;
    }
    for j in 1..(n - n / 2) {
        t_re[n - j] = -t_re[j];
        t_im[n - j] = t_im[j];
    }
    t_re[n] = -T::ONE;
    t_im[n] = T::ZERO;
    for j in 1..n {
        t_re[n + j] = -t_re[j];
        t_im[n + j] = -t_im[j];
    }
}

#[cfg(test)]
#[path = "twiddle_tests.rs"]
mod tests;
