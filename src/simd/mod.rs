// src/simd/mod.rs
//
// Runtime-dispatched vector kernels for the f32/f64 instantiations. Each
// backend provides the same three operations: a butterfly pass (2x
// unrolled, aligned/unaligned data variants), the twiddle-expansion
// recurrence, and a fused radix-8 terminal working lane-per-block.

/// Feature mask bits: one per (element type, lane count) specialization.
pub const F32X4: u32 = 1 << 0;
pub const F32X8: u32 = 1 << 1;
pub const F32X16: u32 = 1 << 2;
pub const F64X2: u32 = 1 << 3;
pub const F64X4: u32 = 1 << 4;
pub const F64X8: u32 = 1 << 5;

#[cfg(all(feature = "simd", any(target_arch = "x86", target_arch = "x86_64")))]
mod detect;
#[cfg(all(feature = "simd", any(target_arch = "x86", target_arch = "x86_64")))]
mod sse;
#[cfg(all(feature = "simd", feature = "avx", any(target_arch = "x86", target_arch = "x86_64")))]
mod avx;
#[cfg(all(feature = "simd", target_arch = "aarch64"))]
mod neon;

#[cfg(feature = "cache-detect")]
const PROBED: u32 = 1 << 31;

fn probe() -> u32 {
    #[cfg(all(feature = "simd", any(target_arch = "x86", target_arch = "x86_64")))]
    return detect::probe();
    #[cfg(all(feature = "simd", target_arch = "aarch64"))]
    return F32X4 | F64X2;
    #[cfg(not(all(
        feature = "simd",
        any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")
    )))]
    return 0;
}

#[cfg(feature = "cache-detect")]
static CACHED: core::sync::atomic::AtomicU32 = core::sync::atomic::AtomicU32::new(0);

/// Vector widths usable on this machine with the current build options.
///
/// With `cache-detect` the probe runs once per process; concurrent first
/// calls race benignly (every probe computes the same value). Once a
/// nonzero cached value is observed it never changes.
pub fn feature_mask() -> u32 {
    #[cfg(feature = "cache-detect")]
    {
        use core::sync::atomic::Ordering;
        let m = CACHED.load(Ordering::Relaxed);
        if m != 0 {
            return m & !PROBED;
        }
        let m = probe() | PROBED;
        CACHED.store(m, Ordering::Relaxed);
        return m & !PROBED;
    }
    #[cfg(not(feature = "cache-detect"))]
    return probe();
}

/// Runs the CPU probe eagerly. Calling this once during startup removes
/// the lazy-initialization race from all later transforms.
pub fn prime_feature_mask() -> u32 {
    feature_mask()
}

#[cfg(feature = "simd")]
#[allow(dead_code)]
#[inline]
fn aligned_to<T>(re: &[T], im: &[T], bytes: usize) -> bool {
    (re.as_ptr() as usize) % bytes == 0 && (im.as_ptr() as usize) % bytes == 0
}

// Kernel stampers shared by the backends. `$load`/`$store` are the aligned
// intrinsics, `$loadu`/`$storeu` the unaligned ones (identical on NEON).

#[cfg(all(feature = "simd", any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
macro_rules! vector_pass_kernel {
    ($name:ident, $ty:ty, $lanes:expr, $feat:literal,
     $load:path, $loadu:path, $store:path, $storeu:path,
     $add:path, $sub:path, $mul:path) => {
        /// Depth-`d` butterfly pass over every block of the region, with
        /// twiddles already expanded for this depth.
        #[target_feature(enable = $feat)]
        #[allow(unused_unsafe)]
        pub(super) unsafe fn $name<const ALIGNED: bool>(
            re: &mut [$ty],
            im: &mut [$ty],
            d: u32,
            twr: &[$ty],
            twi: &[$ty],
        ) {
            unsafe {
            const W: usize = $lanes;
            let n = re.len();
            let h = 1usize << (d - 1);
            debug_assert!(h >= 2 * W && twr.len() == h && twi.len() == h);
            let rp = re.as_mut_ptr();
            let jp = im.as_mut_ptr();
            let wrp = twr.as_ptr();
            let wip = twi.as_ptr();
            let mut blk = 0usize;
            while blk < n {
                let lo = blk;
                let hi = blk + h;
                let mut k = 0usize;
                while k < h {
                    unsafe {
                        let o = k;
                        let wr = $load(wrp.add(o));
                        let wi = $load(wip.add(o));
                        let hr = if ALIGNED { $load(rp.add(hi + o)) } else { $loadu(rp.add(hi + o)) };
                        let hj = if ALIGNED { $load(jp.add(hi + o)) } else { $loadu(jp.add(hi + o)) };
                        let tr = $sub($mul(wr, hr), $mul(wi, hj));
                        let ti = $add($mul(wr, hj), $mul(wi, hr));
                        let lr = if ALIGNED { $load(rp.add(lo + o)) } else { $loadu(rp.add(lo + o)) };
                        let li = if ALIGNED { $load(jp.add(lo + o)) } else { $loadu(jp.add(lo + o)) };
                        if ALIGNED {
                            $store(rp.add(lo + o), $add(lr, tr));
                            $store(jp.add(lo + o), $add(li, ti));
                            $store(rp.add(hi + o), $sub(lr, tr));
                            $store(jp.add(hi + o), $sub(li, ti));
                        } else {
                            $storeu(rp.add(lo + o), $add(lr, tr));
                            $storeu(jp.add(lo + o), $add(li, ti));
                            $storeu(rp.add(hi + o), $sub(lr, tr));
                            $storeu(jp.add(hi + o), $sub(li, ti));
                        }
                    }
                    unsafe {
                        let o = k + W;
                        let wr = $load(wrp.add(o));
                        let wi = $load(wip.add(o));
                        let hr = if ALIGNED { $load(rp.add(hi + o)) } else { $loadu(rp.add(hi + o)) };
                        let hj = if ALIGNED { $load(jp.add(hi + o)) } else { $loadu(jp.add(hi + o)) };
                        let tr = $sub($mul(wr, hr), $mul(wi, hj));
                        let ti = $add($mul(wr, hj), $mul(wi, hr));
                        let lr = if ALIGNED { $load(rp.add(lo + o)) } else { $loadu(rp.add(lo + o)) };
                        let li = if ALIGNED { $load(jp.add(lo + o)) } else { $loadu(jp.add(lo + o)) };
                        if ALIGNED {
                            $store(rp.add(lo + o), $add(lr, tr));
                            $store(jp.add(lo + o), $add(li, ti));
                            $store(rp.add(hi + o), $sub(lr, tr));
                            $store(jp.add(hi + o), $sub(li, ti));
                        } else {
                            $storeu(rp.add(lo + o), $add(lr, tr));
                            $storeu(jp.add(lo + o), $add(li, ti));
                            $storeu(rp.add(hi + o), $sub(lr, tr));
                            $storeu(jp.add(hi + o), $sub(li, ti));
                        }
                    }
                    k += 2 * W;
                }
                blk += 2 * h;
            }
            }
        }
    };
}

#[cfg(all(feature = "simd", any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
macro_rules! vector_expand_kernel {
    ($name:ident, $ty:ty, $lanes:expr, $feat:literal,
     $load:path, $store:path, $add:path, $sub:path, $mul:path, $set1:path) => {
        /// Twiddle doubling recurrence in the `-1` form, vectorized once
        /// the filled prefix reaches a full register. Destination is the
        /// aligned stack buffer.
        #[target_feature(enable = $feat)]
        #[allow(unused_unsafe)]
        pub(super) unsafe fn $name(twr: &mut [$ty], twi: &mut [$ty], log_den: u32, inverse: bool) {
            unsafe {
            const W: usize = $lanes;
            let count = twr.len();
            debug_assert!(count.is_power_of_two() && count >= W);
            twr[0] = 0.0;
            twi[0] = 0.0;
            let mut len = 1usize;
            let mut i = 0u32;
            while len < count && len < W {
                let (wr, wi) = crate::twiddle::step_root::<$ty>(log_den - i, inverse);
                for j in 0..len {
                    let (xr, xi) = (twr[j], twi[j]);
                    twr[len + j] = (wr * xr - wi * xi) + (wr + xr);
                    twi[len + j] = (wi * xr + wr * xi) + (wi + xi);
                }
                len <<= 1;
                i += 1;
            }
            let rp = twr.as_mut_ptr();
            let jp = twi.as_mut_ptr();
            while len < count {
                let (wr, wi) = crate::twiddle::step_root::<$ty>(log_den - i, inverse);
                let wrv = $set1(wr);
                let wiv = $set1(wi);
                let mut j = 0usize;
                while j < len {
                    unsafe {
                        let xr = $load(rp.add(j));
                        let xi = $load(jp.add(j));
                        let nr = $add($sub($mul(wrv, xr), $mul(wiv, xi)), $add(wrv, xr));
                        let ni = $add($add($mul(wiv, xr), $mul(wrv, xi)), $add(wiv, xi));
                        $store(rp.add(len + j), nr);
                        $store(jp.add(len + j), ni);
                    }
                    j += W;
                }
                len <<= 1;
                i += 1;
            }
            let one = $set1(1.0);
            let mut k = 0usize;
            while k + W <= count {
                unsafe {
                    $store(rp.add(k), $add($load(rp.add(k)), one));
                }
                k += W;
            }
            while k < count {
                twr[k] += 1.0;
                k += 1;
            }
            }
        }
    };
}

#[cfg(all(feature = "simd", any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
macro_rules! radix8_network {
    ($name:ident, $ty:ty, $vec:ty, $feat:literal, $c:expr,
     $add:path, $sub:path, $mul:path, $set1:path) => {
        /// The 8-point DIT network, one block per lane. Twiddle rotations
        /// are folded into operand order so no negation is needed; the
        /// inverse direction swaps the affected outputs.
        #[target_feature(enable = $feat)]
        #[inline]
        #[allow(unused_unsafe)]
        pub(super) unsafe fn $name<const INV: bool>(r: &mut [$vec; 8], s: &mut [$vec; 8]) {
            unsafe {
            let c = $set1($c);

            let t0r = $add(r[0], r[1]);
            let t0i = $add(s[0], s[1]);
            let t1r = $sub(r[0], r[1]);
            let t1i = $sub(s[0], s[1]);
            let t2r = $add(r[2], r[3]);
            let t2i = $add(s[2], s[3]);
            let t3r = $sub(r[2], r[3]);
            let t3i = $sub(s[2], s[3]);
            let t4r = $add(r[4], r[5]);
            let t4i = $add(s[4], s[5]);
            let t5r = $sub(r[4], r[5]);
            let t5i = $sub(s[4], s[5]);
            let t6r = $add(r[6], r[7]);
            let t6i = $add(s[6], s[7]);
            let t7r = $sub(r[6], r[7]);
            let t7i = $sub(s[6], s[7]);

            let u0r = $add(t0r, t2r);
            let u0i = $add(t0i, t2i);
            let u2r = $sub(t0r, t2r);
            let u2i = $sub(t0i, t2i);
            let u4r = $add(t4r, t6r);
            let u4i = $add(t4i, t6i);
            let u6r = $sub(t4r, t6r);
            let u6i = $sub(t4i, t6i);

            let ar = $add(t1r, t3i);
            let ai = $sub(t1i, t3r);
            let br = $sub(t1r, t3i);
            let bi = $add(t1i, t3r);
            let (u1r, u1i, u3r, u3i) =
                if INV { (br, bi, ar, ai) } else { (ar, ai, br, bi) };

            let er = $add(t5r, t7i);
            let ei = $sub(t5i, t7r);
            let fr = $sub(t5r, t7i);
            let fi = $add(t5i, t7r);
            let (u5r, u5i, u7r, u7i) =
                if INV { (fr, fi, er, ei) } else { (er, ei, fr, fi) };

            r[0] = $add(u0r, u4r);
            s[0] = $add(u0i, u4i);
            r[4] = $sub(u0r, u4r);
            s[4] = $sub(u0i, u4i);

            let p = $mul(c, $add(u5r, u5i));
            let q = $mul(c, $sub(u5i, u5r));
            if INV {
                r[1] = $sub(u1r, q);
                s[1] = $add(u1i, p);
                r[5] = $add(u1r, q);
                s[5] = $sub(u1i, p);
            } else {
                r[1] = $add(u1r, p);
                s[1] = $add(u1i, q);
                r[5] = $sub(u1r, p);
                s[5] = $sub(u1i, q);
            }

            let y2r = $add(u2r, u6i);
            let y2i = $sub(u2i, u6r);
            let y6r = $sub(u2r, u6i);
            let y6i = $add(u2i, u6r);
            if INV {
                r[2] = y6r;
                s[2] = y6i;
                r[6] = y2r;
                s[6] = y2i;
            } else {
                r[2] = y2r;
                s[2] = y2i;
                r[6] = y6r;
                s[6] = y6i;
            }

            let m = $mul(c, $add(u7r, u7i));
            let w = $mul(c, $sub(u7i, u7r));
            if INV {
                r[3] = $sub(u3r, m);
                s[3] = $sub(u3i, w);
                r[7] = $add(u3r, m);
                s[7] = $add(u3i, w);
            } else {
                r[3] = $add(u3r, w);
                s[3] = $sub(u3i, m);
                r[7] = $sub(u3r, w);
                s[7] = $add(u3i, m);
            }
            }
        }
    };
}

#[cfg(all(feature = "simd", any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
pub(crate) use {radix8_network, vector_expand_kernel, vector_pass_kernel};

#[cfg(all(feature = "simd", any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
use crate::twiddle::{BUF_LEN, TwiddleBuf};

/// Built-in optimized multipass for `f32` regions. Returns the number of
/// bottom passes consumed.
#[cfg(feature = "simd")]
#[allow(unused_variables)]
pub(crate) fn multipass_f32(
    re: &mut [f32],
    im: &mut [f32],
    log2n: u32,
    depth: u32,
    inverse: bool,
    mask: u32,
) -> u32 {
    #[cfg(all(feature = "simd", any(target_arch = "x86", target_arch = "x86_64")))]
    return multipass_f32_x86(re, im, log2n, depth, inverse, mask);
    #[cfg(all(feature = "simd", target_arch = "aarch64"))]
    return multipass_f32_neon(re, im, log2n, depth, inverse, mask);
    #[cfg(not(all(
        feature = "simd",
        any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")
    )))]
    return 0;
}

/// Built-in optimized multipass for `f64` regions.
#[cfg(feature = "simd")]
#[allow(unused_variables)]
pub(crate) fn multipass_f64(
    re: &mut [f64],
    im: &mut [f64],
    log2n: u32,
    depth: u32,
    inverse: bool,
    mask: u32,
) -> u32 {
    #[cfg(all(feature = "simd", any(target_arch = "x86", target_arch = "x86_64")))]
    return multipass_f64_x86(re, im, log2n, depth, inverse, mask);
    #[cfg(all(feature = "simd", target_arch = "aarch64"))]
    return multipass_f64_neon(re, im, log2n, depth, inverse, mask);
    #[cfg(not(all(
        feature = "simd",
        any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")
    )))]
    return 0;
}

#[cfg(all(feature = "simd", any(target_arch = "x86", target_arch = "x86_64")))]
fn multipass_f32_x86(
    re: &mut [f32],
    im: &mut [f32],
    log2n: u32,
    depth: u32,
    inverse: bool,
    mask: u32,
) -> u32 {
    if depth != log2n || log2n < 3 {
        return 0;
    }
    let n = re.len();
    let mut consumed = 0u32;
    #[cfg(feature = "avx")]
    if consumed == 0 && mask & F32X8 != 0 && n >= 64 {
        unsafe {
            if inverse {
                avx::radix8_f32::<true>(re, im);
            } else {
                avx::radix8_f32::<false>(re, im);
            }
        }
        consumed = 3;
    }
    if consumed == 0 && mask & F32X4 != 0 && n >= 32 {
        unsafe {
            if inverse {
                sse::radix8_f32::<true>(re, im);
            } else {
                sse::radix8_f32::<false>(re, im);
            }
        }
        consumed = 3;
    }
    if consumed == 0 {
        return 0;
    }
    let mut d = 4u32;
    while d <= log2n {
        let h = 1usize << (d - 1);
        if h > BUF_LEN {
            break;
        }
        let mut tw = TwiddleBuf::<f32>::new();
        let mut done = false;
        #[cfg(feature = "avx")]
        if mask & F32X8 != 0 && d >= 5 {
            unsafe {
                avx::expand_f32(&mut tw.re[..h], &mut tw.im[..h], d, inverse);
                if aligned_to(re, im, 32) {
                    avx::pass_f32::<true>(re, im, d, &tw.re[..h], &tw.im[..h]);
                } else {
                    avx::pass_f32::<false>(re, im, d, &tw.re[..h], &tw.im[..h]);
                }
            }
            done = true;
        }
        if !done && mask & F32X4 != 0 {
            unsafe {
                sse::expand_f32(&mut tw.re[..h], &mut tw.im[..h], d, inverse);
                if aligned_to(re, im, 16) {
                    sse::pass_f32::<true>(re, im, d, &tw.re[..h], &tw.im[..h]);
                } else {
                    sse::pass_f32::<false>(re, im, d, &tw.re[..h], &tw.im[..h]);
                }
            }
            done = true;
        }
        if !done {
            break;
        }
        consumed += 1;
        d += 1;
    }
    consumed
}

#[cfg(all(feature = "simd", any(target_arch = "x86", target_arch = "x86_64")))]
fn multipass_f64_x86(
    re: &mut [f64],
    im: &mut [f64],
    log2n: u32,
    depth: u32,
    inverse: bool,
    mask: u32,
) -> u32 {
    if depth != log2n || log2n < 3 {
        return 0;
    }
    let n = re.len();
    let mut consumed = 0u32;
    #[cfg(feature = "avx")]
    if consumed == 0 && mask & F64X4 != 0 && n >= 32 {
        unsafe {
            if inverse {
                avx::radix8_f64::<true>(re, im);
            } else {
                avx::radix8_f64::<false>(re, im);
            }
        }
        consumed = 3;
    }
    if consumed == 0 && mask & F64X2 != 0 && n >= 16 {
        unsafe {
            if inverse {
                sse::radix8_f64::<true>(re, im);
            } else {
                sse::radix8_f64::<false>(re, im);
            }
        }
        consumed = 3;
    }
    if consumed == 0 {
        return 0;
    }
    let mut d = 4u32;
    while d <= log2n {
        let h = 1usize << (d - 1);
        if h > BUF_LEN {
            break;
        }
        let mut tw = TwiddleBuf::<f64>::new();
        let mut done = false;
        #[cfg(feature = "avx")]
        if mask & F64X4 != 0 {
            unsafe {
                avx::expand_f64(&mut tw.re[..h], &mut tw.im[..h], d, inverse);
                if aligned_to(re, im, 32) {
                    avx::pass_f64::<true>(re, im, d, &tw.re[..h], &tw.im[..h]);
                } else {
                    avx::pass_f64::<false>(re, im, d, &tw.re[..h], &tw.im[..h]);
                }
            }
            done = true;
        }
        if !done && mask & F64X2 != 0 {
            unsafe {
                sse::expand_f64(&mut tw.re[..h], &mut tw.im[..h], d, inverse);
                if aligned_to(re, im, 16) {
                    sse::pass_f64::<true>(re, im, d, &tw.re[..h], &tw.im[..h]);
                } else {
                    sse::pass_f64::<false>(re, im, d, &tw.re[..h], &tw.im[..h]);
                }
            }
            done = true;
        }
        if !done {
            break;
        }
        consumed += 1;
        d += 1;
    }
    consumed
}

#[cfg(all(feature = "simd", target_arch = "aarch64"))]
#[allow(unused_unsafe)]
fn multipass_f32_neon(
    re: &mut [f32],
    im: &mut [f32],
    log2n: u32,
    depth: u32,
    inverse: bool,
    mask: u32,
) -> u32 {
    if depth != log2n || log2n < 3 || mask & F32X4 == 0 || re.len() < 32 {
        return 0;
    }
    unsafe {
        if inverse {
            neon::radix8_f32::<true>(re, im);
        } else {
            neon::radix8_f32::<false>(re, im);
        }
    }
    let mut consumed = 3u32;
    let mut d = 4u32;
    while d <= log2n {
        let h = 1usize << (d - 1);
        if h > BUF_LEN {
            break;
        }
        let mut tw = TwiddleBuf::<f32>::new();
        unsafe {
            neon::expand_f32(&mut tw.re[..h], &mut tw.im[..h], d, inverse);
            neon::pass_f32::<false>(re, im, d, &tw.re[..h], &tw.im[..h]);
        }
        consumed += 1;
        d += 1;
    }
    consumed
}

#[cfg(all(feature = "simd", target_arch = "aarch64"))]
#[allow(unused_unsafe)]
fn multipass_f64_neon(
    re: &mut [f64],
    im: &mut [f64],
    log2n: u32,
    depth: u32,
    inverse: bool,
    mask: u32,
) -> u32 {
    if depth != log2n || log2n < 3 || mask & F64X2 == 0 || re.len() < 16 {
        return 0;
    }
    unsafe {
        if inverse {
            neon::radix8_f64::<true>(re, im);
        } else {
            neon::radix8_f64::<false>(re, im);
        }
    }
    let mut consumed = 3u32;
    let mut d = 4u32;
    while d <= log2n {
        let h = 1usize << (d - 1);
        if h > BUF_LEN {
            break;
        }
        let mut tw = TwiddleBuf::<f64>::new();
        unsafe {
            neon::expand_f64(&mut tw.re[..h], &mut tw.im[..h], d, inverse);
            neon::pass_f64::<false>(re, im, d, &tw.re[..h], &tw.im[..h]);
        }
        consumed += 1;
        d += 1;
    }
    consumed
}
