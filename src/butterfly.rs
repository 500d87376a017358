// src/butterfly.rs
//
// Recursive decimation-in-time scheduler. Input is already bit-reversed;
// a pass at depth `d` combines halves of size `2^(d-1)` with twiddles
// `exp(±2πi·k/2^d)`. Twiddles beyond the stack buffer are reached by
// composing a running multiplier down a halving recursion, which keeps
// every effective twiddle a product of O(log n) unit-accurate factors.

use crate::bitrev::Lane;
use crate::common::{Layout, MultipassHook};
use crate::scalar::FftScalar;
use crate::twiddle::{BUF_LEN, TwiddleBuf, expand_pow2, unit_root};

/// Region size above which the schedule splits into two recursive halves
/// plus a joining pass.
const SPLIT_LOG2: u32 = 12;

/// Resolved per-call engine state.
pub(crate) struct Engine<'a, T> {
    pub mask: u32,
    pub hook: Option<&'a dyn MultipassHook<T>>,
}

/// Mutable complex view the passes run against. Implementations cover the
/// two storage shapes: separate re/im slices and one strided buffer.
pub(crate) trait ReIm<T: FftScalar> {
    fn re(&self, i: usize) -> T;
    fn im(&self, i: usize) -> T;
    fn set(&mut self, i: usize, re: T, im: T);
    fn re_lane(&mut self) -> Lane<'_, T>;
    fn im_lane(&mut self) -> Lane<'_, T>;

    /// Contiguous unit-stride sub-slices for `[base, base + len)`, when the
    /// storage allows handing them out. Gates the hook and vector kernels.
    fn split_contiguous(&mut self, base: usize, len: usize) -> Option<(&mut [T], &mut [T])> {
        let _ = (base, len);
        None
    }

    /// The whole view as one contiguous interleaved buffer of `2n` scalars.
    fn interleaved_contiguous(&mut self, n: usize) -> Option<&mut [T]> {
        let _ = n;
        None
    }
}

pub(crate) struct SplitSlices<'a, T> {
    pub re: &'a mut [T],
    pub im: &'a mut [T],
}

impl<T: FftScalar> ReIm<T> for SplitSlices<'_, T> {
    #[inline]
    fn re(&self, i: usize) -> T {
        self.re[i]
    }

    #[inline]
    fn im(&self, i: usize) -> T {
        self.im[i]
    }

    #[inline]
    fn set(&mut self, i: usize, re: T, im: T) {
        self.re[i] = re;
        self.im[i] = im;
    }

    fn re_lane(&mut self) -> Lane<'_, T> {
        Lane { buf: &mut *self.re, off: 0, step: 1 }
    }

    fn im_lane(&mut self) -> Lane<'_, T> {
        Lane { buf: &mut *self.im, off: 0, step: 1 }
    }

    fn split_contiguous(&mut self, base: usize, len: usize) -> Option<(&mut [T], &mut [T])> {
        Some((&mut self.re[base..base + len], &mut self.im[base..base + len]))
    }
}

/// Both channels inside one buffer, placed by a [`Layout`].
pub(crate) struct PackedStrided<'a, T> {
    pub buf: &'a mut [T],
    pub layout: Layout,
}

impl<T: FftScalar> PackedStrided<'_, T> {
    #[inline]
    fn re_pos(&self, i: usize) -> usize {
        (self.layout.re_offset as isize + i as isize * self.layout.re_step) as usize
    }

    #[inline]
    fn im_pos(&self, i: usize) -> usize {
        (self.layout.im_offset as isize + i as isize * self.layout.im_step) as usize
    }
}

impl<T: FftScalar> ReIm<T> for PackedStrided<'_, T> {
    #[inline]
    fn re(&self, i: usize) -> T {
        self.buf[self.re_pos(i)]
    }

    #[inline]
    fn im(&self, i: usize) -> T {
        self.buf[self.im_pos(i)]
    }

    #[inline]
    fn set(&mut self, i: usize, re: T, im: T) {
        let (rp, ip) = (self.re_pos(i), self.im_pos(i));
        self.buf[rp] = re;
        self.buf[ip] = im;
    }

    fn re_lane(&mut self) -> Lane<'_, T> {
        Lane { buf: &mut *self.buf, off: self.layout.re_offset, step: self.layout.re_step }
    }

    fn im_lane(&mut self) -> Lane<'_, T> {
        Lane { buf: &mut *self.buf, off: self.layout.im_offset, step: self.layout.im_step }
    }

    fn split_contiguous(&mut self, base: usize, len: usize) -> Option<(&mut [T], &mut [T])> {
        if self.layout.re_step != 1 || self.layout.im_step != 1 {
            return None;
        }
        let r0 = self.layout.re_offset + base;
        let i0 = self.layout.im_offset + base;
        if r0 + len <= i0 {
            let (a, b) = self.buf.split_at_mut(i0);
            Some((&mut a[r0..r0 + len], &mut b[..len]))
        } else if i0 + len <= r0 {
            let (a, b) = self.buf.split_at_mut(r0);
            Some((&mut b[..len], &mut a[i0..i0 + len]))
        } else {
            None
        }
    }

    fn interleaved_contiguous(&mut self, n: usize) -> Option<&mut [T]> {
        if self.layout == Layout::interleaved() && self.buf.len() >= 2 * n {
            Some(&mut self.buf[..2 * n])
        } else {
            None
        }
    }
}

#[inline]
fn butterfly2<T: FftScalar, V: ReIm<T>>(v: &mut V, lo: usize, hi: usize, wr: T, wi: T) {
    let (hr, hj) = (v.re(hi), v.im(hi));
    let tr = wr * hr - wi * hj;
    let ti = wr * hj + wi * hr;
    let (lr, li) = (v.re(lo), v.im(lo));
    v.set(lo, lr + tr, li + ti);
    v.set(hi, lr - tr, li - ti);
}

/// One flat pass over a single block: butterflies `(lo+k, lo+h+k)` with
/// materialized twiddles.
fn flat_pass<T: FftScalar, V: ReIm<T>>(v: &mut V, lo: usize, h: usize, wre: &[T], wim: &[T]) {
    let hi = lo + h;
    let mut k = 0usize;
    while k + 2 <= h {
        butterfly2(v, lo + k, hi + k, wre[k], wim[k]);
        butterfly2(v, lo + k + 1, hi + k + 1, wre[k + 1], wim[k + 1]);
        k += 2;
    }
    if k < h {
        butterfly2(v, lo + k, hi + k, wre[k], wim[k]);
    }
}

/// Twiddle-range recursion for passes whose half exceeds the buffer.
/// `(cr, ci)` is `exp(±2πi·k0/2^d)`, composed one factor per level.
#[allow(clippy::too_many_arguments)]
fn pass_recurse<T: FftScalar, V: ReIm<T>>(
    v: &mut V,
    lo_base: usize,
    hi_base: usize,
    d: u32,
    k0: usize,
    kw: usize,
    cr: T,
    ci: T,
    tw: &TwiddleBuf<T>,
    inverse: bool,
) {
    if kw <= BUF_LEN {
        for j in 0..kw {
            let wr = cr * tw.re[j] - ci * tw.im[j];
            let wi = ci * tw.re[j] + cr * tw.im[j];
            butterfly2(v, lo_base + k0 + j, hi_base + k0 + j, wr, wi);
        }
    } else {
        let half = kw >> 1;
        pass_recurse(v, lo_base, hi_base, d, k0, half, cr, ci, tw, inverse);
        let (xr, xi) = unit_root::<T>(d - half.trailing_zeros(), inverse);
        let (c2, s2) = (cr * xr - ci * xi, ci * xr + cr * xi);
        pass_recurse(v, lo_base, hi_base, d, k0 + half, half, c2, s2, tw, inverse);
    }
}

/// Runs the depth-`d` pass over every block of a `2^region_log2` region.
fn pass_blocks<T: FftScalar, V: ReIm<T>>(
    v: &mut V,
    base: usize,
    region_log2: u32,
    d: u32,
    inverse: bool,
) {
    let h = 1usize << (d - 1);
    let blocks = 1usize << (region_log2 - d);
    let mut tw = TwiddleBuf::<T>::new();
    if h <= BUF_LEN {
        expand_pow2(&mut tw.re[..h], &mut tw.im[..h], d, inverse);
        for blk in 0..blocks {
            flat_pass(v, base + (blk << d), h, &tw.re[..h], &tw.im[..h]);
        }
    } else {
        expand_pow2(&mut tw.re, &mut tw.im, d, inverse);
        for blk in 0..blocks {
            let lo = base + (blk << d);
            pass_recurse(v, lo, lo + h, d, 0, h, T::ONE, T::ZERO, &tw, inverse);
        }
    }
}

/// Fused bottom three passes on one 8-element block. `c = sin(π/4)` comes
/// from the `k = 3` table entry, the kernel's only constant.
fn radix8<T: FftScalar, V: ReIm<T>>(v: &mut V, b: usize, inverse: bool) {
    let c = T::cexpm1(3).1;

    let (x0r, x0i) = (v.re(b), v.im(b));
    let (x1r, x1i) = (v.re(b + 1), v.im(b + 1));
    let (x2r, x2i) = (v.re(b + 2), v.im(b + 2));
    let (x3r, x3i) = (v.re(b + 3), v.im(b + 3));
    let (x4r, x4i) = (v.re(b + 4), v.im(b + 4));
    let (x5r, x5i) = (v.re(b + 5), v.im(b + 5));
    let (x6r, x6i) = (v.re(b + 6), v.im(b + 6));
    let (x7r, x7i) = (v.re(b + 7), v.im(b + 7));

    let (t0r, t0i) = (x0r + x1r, x0i + x1i);
    let (t1r, t1i) = (x0r - x1r, x0i - x1i);
    let (t2r, t2i) = (x2r + x3r, x2i + x3i);
    let (t3r, t3i) = (x2r - x3r, x2i - x3i);
    let (t4r, t4i) = (x4r + x5r, x4i + x5i);
    let (t5r, t5i) = (x4r - x5r, x4i - x5i);
    let (t6r, t6i) = (x6r + x7r, x6i + x7i);
    let (t7r, t7i) = (x6r - x7r, x6i - x7i);

    let (u0r, u0i) = (t0r + t2r, t0i + t2i);
    let (u2r, u2i) = (t0r - t2r, t0i - t2i);
    let (u4r, u4i) = (t4r + t6r, t4i + t6i);
    let (u6r, u6i) = (t4r - t6r, t4i - t6i);
    // ∓i rotations of the odd terms; the inverse direction swaps the pair.
    let (ar, ai) = (t1r + t3i, t1i - t3r);
    let (br, bi) = (t1r - t3i, t1i + t3r);
    let (u1r, u1i, u3r, u3i) =
        if inverse { (br, bi, ar, ai) } else { (ar, ai, br, bi) };
    let (er, ei) = (t5r + t7i, t5i - t7r);
    let (fr, fi) = (t5r - t7i, t5i + t7r);
    let (u5r, u5i, u7r, u7i) =
        if inverse { (fr, fi, er, ei) } else { (er, ei, fr, fi) };

    v.set(b, u0r + u4r, u0i + u4i);
    v.set(b + 4, u0r - u4r, u0i - u4i);

    let p = c * (u5r + u5i);
    let q = c * (u5i - u5r);
    if inverse {
        v.set(b + 1, u1r - q, u1i + p);
        v.set(b + 5, u1r + q, u1i - p);
    } else {
        v.set(b + 1, u1r + p, u1i + q);
        v.set(b + 5, u1r - p, u1i - q);
    }

    let (y2r, y2i) = (u2r + u6i, u2i - u6r);
    let (y6r, y6i) = (u2r - u6i, u2i + u6r);
    if inverse {
        v.set(b + 2, y6r, y6i);
        v.set(b + 6, y2r, y2i);
    } else {
        v.set(b + 2, y2r, y2i);
        v.set(b + 6, y6r, y6i);
    }

    let m = c * (u7r + u7i);
    let w = c * (u7i - u7r);
    if inverse {
        v.set(b + 3, u3r - m, u3i - w);
        v.set(b + 7, u3r + m, u3i + w);
    } else {
        v.set(b + 3, u3r + w, u3i - m);
        v.set(b + 7, u3r - w, u3i + m);
    }
}

/// Straight multipass over one region: hook and vector kernels may consume
/// passes from the bottom, the scalar radix-8 terminal fuses the first
/// three otherwise, and the remaining depths run flat or recursive.
fn multipass<T: FftScalar, V: ReIm<T>>(
    v: &mut V,
    base: usize,
    log2n: u32,
    inverse: bool,
    eng: &Engine<'_, T>,
) {
    if log2n == 0 {
        return;
    }
    let mut next_d = 1u32;
    if let Some((re, im)) = v.split_contiguous(base, 1usize << log2n) {
        let mut consumed = 0u32;
        if let Some(hook) = eng.hook {
            consumed = hook.multipass(re, im, log2n, log2n, inverse);
        }
        if consumed == 0 && eng.mask != 0 {
            consumed = T::optimized_multipass(re, im, log2n, log2n, inverse, eng.mask);
        }
        debug_assert!(consumed <= log2n);
        next_d = consumed + 1;
    }
    if next_d == 1 && log2n >= 3 {
        for blk in 0..(1usize << (log2n - 3)) {
            radix8(v, base + (blk << 3), inverse);
        }
        next_d = 4;
    }
    for d in next_d..=log2n {
        pass_blocks(v, base, log2n, d, inverse);
    }
}

/// Top-level schedule: regions above `2^SPLIT_LOG2` split into two
/// recursively transformed halves joined by a single pass.
pub(crate) fn dbcf_butterfly<T: FftScalar, V: ReIm<T>>(
    v: &mut V,
    base: usize,
    log2n: u32,
    inverse: bool,
    eng: &Engine<'_, T>,
) {
    if log2n > SPLIT_LOG2 {
        let half = 1usize << (log2n - 1);
        dbcf_butterfly(v, base, log2n - 1, inverse, eng);
        dbcf_butterfly(v, base + half, log2n - 1, inverse, eng);
        pass_blocks(v, base, log2n, log2n, inverse);
    } else {
        multipass(v, base, log2n, inverse, eng);
    }
}

#[cfg(test)]
#[path = "butterfly_tests.rs"]
mod tests;
