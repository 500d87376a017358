// src/simd/sse.rs
//
// SSE2 backend: 4-lane f32 and 2-lane f64 kernels.

#[cfg(target_arch = "x86")]
use core::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

use super::{radix8_network, vector_expand_kernel, vector_pass_kernel};

vector_pass_kernel!(
    pass_f32, f32, 4, "sse2",
    _mm_load_ps, _mm_loadu_ps, _mm_store_ps, _mm_storeu_ps,
    _mm_add_ps, _mm_sub_ps, _mm_mul_ps
);
vector_pass_kernel!(
    pass_f64, f64, 2, "sse2",
    _mm_load_pd, _mm_loadu_pd, _mm_store_pd, _mm_storeu_pd,
    _mm_add_pd, _mm_sub_pd, _mm_mul_pd
);
vector_expand_kernel!(
    expand_f32, f32, 4, "sse2",
    _mm_load_ps, _mm_store_ps, _mm_add_ps, _mm_sub_ps, _mm_mul_ps, _mm_set1_ps
);
vector_expand_kernel!(
    expand_f64, f64, 2, "sse2",
    _mm_load_pd, _mm_store_pd, _mm_add_pd, _mm_sub_pd, _mm_mul_pd, _mm_set1_pd
);
radix8_network!(
    network_f32, f32, __m128, "sse2", core::f32::consts::FRAC_1_SQRT_2,
    _mm_add_ps, _mm_sub_ps, _mm_mul_ps, _mm_set1_ps
);
radix8_network!(
    network_f64, f64, __m128d, "sse2", core::f64::consts::FRAC_1_SQRT_2,
    _mm_add_pd, _mm_sub_pd, _mm_mul_pd, _mm_set1_pd
);

/// 4x4 register transpose.
#[target_feature(enable = "sse2")]
#[inline]
#[allow(unused_unsafe)]
unsafe fn transpose4(a: __m128, b: __m128, c: __m128, d: __m128) -> (__m128, __m128, __m128, __m128) {
    unsafe {
        let t0 = _mm_unpacklo_ps(a, b);
        let t1 = _mm_unpacklo_ps(c, d);
        let t2 = _mm_unpackhi_ps(a, b);
        let t3 = _mm_unpackhi_ps(c, d);
        (
            _mm_movelh_ps(t0, t1),
            _mm_movehl_ps(t1, t0),
            _mm_movelh_ps(t2, t3),
            _mm_movehl_ps(t3, t2),
        )
    }
}

/// Radix-8 terminal over four blocks at a time: two 4x4 transposes bring
/// one block into each lane, the shared network runs the three fused
/// passes, and the transposes invert themselves on the way out.
#[target_feature(enable = "sse2")]
#[allow(unused_unsafe)]
pub(super) unsafe fn radix8_f32<const INV: bool>(re: &mut [f32], im: &mut [f32]) {
    let n = re.len();
    debug_assert!(n % 32 == 0);
    let rp = re.as_mut_ptr();
    let jp = im.as_mut_ptr();
    let mut g = 0usize;
    while g < n {
        unsafe {
            let v0 = _mm_loadu_ps(rp.add(g));
            let v1 = _mm_loadu_ps(rp.add(g + 4));
            let v2 = _mm_loadu_ps(rp.add(g + 8));
            let v3 = _mm_loadu_ps(rp.add(g + 12));
            let v4 = _mm_loadu_ps(rp.add(g + 16));
            let v5 = _mm_loadu_ps(rp.add(g + 20));
            let v6 = _mm_loadu_ps(rp.add(g + 24));
            let v7 = _mm_loadu_ps(rp.add(g + 28));
            let (r0, r1, r2, r3) = transpose4(v0, v2, v4, v6);
            let (r4, r5, r6, r7) = transpose4(v1, v3, v5, v7);
            let mut r = [r0, r1, r2, r3, r4, r5, r6, r7];

            let w0 = _mm_loadu_ps(jp.add(g));
            let w1 = _mm_loadu_ps(jp.add(g + 4));
            let w2 = _mm_loadu_ps(jp.add(g + 8));
            let w3 = _mm_loadu_ps(jp.add(g + 12));
            let w4 = _mm_loadu_ps(jp.add(g + 16));
            let w5 = _mm_loadu_ps(jp.add(g + 20));
            let w6 = _mm_loadu_ps(jp.add(g + 24));
            let w7 = _mm_loadu_ps(jp.add(g + 28));
            let (s0, s1, s2, s3) = transpose4(w0, w2, w4, w6);
            let (s4, s5, s6, s7) = transpose4(w1, w3, w5, w7);
            let mut s = [s0, s1, s2, s3, s4, s5, s6, s7];

            network_f32::<INV>(&mut r, &mut s);

            let (o0, o1, o2, o3) = transpose4(r[0], r[1], r[2], r[3]);
            let (o4, o5, o6, o7) = transpose4(r[4], r[5], r[6], r[7]);
            _mm_storeu_ps(rp.add(g), o0);
            _mm_storeu_ps(rp.add(g + 8), o1);
            _mm_storeu_ps(rp.add(g + 16), o2);
            _mm_storeu_ps(rp.add(g + 24), o3);
            _mm_storeu_ps(rp.add(g + 4), o4);
            _mm_storeu_ps(rp.add(g + 12), o5);
            _mm_storeu_ps(rp.add(g + 20), o6);
            _mm_storeu_ps(rp.add(g + 28), o7);

            let (p0, p1, p2, p3) = transpose4(s[0], s[1], s[2], s[3]);
            let (p4, p5, p6, p7) = transpose4(s[4], s[5], s[6], s[7]);
            _mm_storeu_ps(jp.add(g), p0);
            _mm_storeu_ps(jp.add(g + 8), p1);
            _mm_storeu_ps(jp.add(g + 16), p2);
            _mm_storeu_ps(jp.add(g + 24), p3);
            _mm_storeu_ps(jp.add(g + 4), p4);
            _mm_storeu_ps(jp.add(g + 12), p5);
            _mm_storeu_ps(jp.add(g + 20), p6);
            _mm_storeu_ps(jp.add(g + 28), p7);
        }
        g += 32;
    }
}

/// Two blocks per iteration; each `__m128d` pairs the same element of both
/// blocks, so no transpose is needed beyond the paired loads/stores.
#[target_feature(enable = "sse2")]
#[allow(unused_unsafe)]
pub(super) unsafe fn radix8_f64<const INV: bool>(re: &mut [f64], im: &mut [f64]) {
    let n = re.len();
    debug_assert!(n % 16 == 0);
    let rp = re.as_mut_ptr();
    let jp = im.as_mut_ptr();
    let mut g = 0usize;
    while g < n {
        unsafe {
            let mut r = [_mm_setzero_pd(); 8];
            let mut s = [_mm_setzero_pd(); 8];
            for e in 0..8 {
                r[e] = _mm_set_pd(*rp.add(g + 8 + e), *rp.add(g + e));
                s[e] = _mm_set_pd(*jp.add(g + 8 + e), *jp.add(g + e));
            }
            network_f64::<INV>(&mut r, &mut s);
            for e in 0..8 {
                _mm_storel_pd(rp.add(g + e), r[e]);
                _mm_storeh_pd(rp.add(g + 8 + e), r[e]);
                _mm_storel_pd(jp.add(g + e), s[e]);
                _mm_storeh_pd(jp.add(g + 8 + e), s[e]);
            }
        }
        g += 16;
    }
}
