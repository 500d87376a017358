// src/simd/avx.rs
//
// AVX backend: 8-lane f32 and 4-lane f64 kernels.

#[cfg(target_arch = "x86")]
use core::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

use super::{radix8_network, vector_expand_kernel, vector_pass_kernel};

vector_pass_kernel!(
    pass_f32, f32, 8, "avx",
    _mm256_load_ps, _mm256_loadu_ps, _mm256_store_ps, _mm256_storeu_ps,
    _mm256_add_ps, _mm256_sub_ps, _mm256_mul_ps
);
vector_pass_kernel!(
    pass_f64, f64, 4, "avx",
    _mm256_load_pd, _mm256_loadu_pd, _mm256_store_pd, _mm256_storeu_pd,
    _mm256_add_pd, _mm256_sub_pd, _mm256_mul_pd
);
vector_expand_kernel!(
    expand_f32, f32, 8, "avx",
    _mm256_load_ps, _mm256_store_ps, _mm256_add_ps, _mm256_sub_ps, _mm256_mul_ps,
    _mm256_set1_ps
);
vector_expand_kernel!(
    expand_f64, f64, 4, "avx",
    _mm256_load_pd, _mm256_store_pd, _mm256_add_pd, _mm256_sub_pd, _mm256_mul_pd,
    _mm256_set1_pd
);
radix8_network!(
    network_f32, f32, __m256, "avx", core::f32::consts::FRAC_1_SQRT_2,
    _mm256_add_ps, _mm256_sub_ps, _mm256_mul_ps, _mm256_set1_ps
);
radix8_network!(
    network_f64, f64, __m256d, "avx", core::f64::consts::FRAC_1_SQRT_2,
    _mm256_add_pd, _mm256_sub_pd, _mm256_mul_pd, _mm256_set1_pd
);

/// 8x8 register transpose (unpack, shuffle, 128-bit lane swap).
#[target_feature(enable = "avx")]
#[inline]
#[allow(unused_unsafe)]
unsafe fn transpose8(v: [__m256; 8]) -> [__m256; 8] {
    unsafe {
    let t0 = _mm256_unpacklo_ps(v[0], v[1]);
    let t1 = _mm256_unpackhi_ps(v[0], v[1]);
    let t2 = _mm256_unpacklo_ps(v[2], v[3]);
    let t3 = _mm256_unpackhi_ps(v[2], v[3]);
    let t4 = _mm256_unpacklo_ps(v[4], v[5]);
    let t5 = _mm256_unpackhi_ps(v[4], v[5]);
    let t6 = _mm256_unpacklo_ps(v[6], v[7]);
    let t7 = _mm256_unpackhi_ps(v[6], v[7]);
    let u0 = _mm256_shuffle_ps::<0x44>(t0, t2);
    let u1 = _mm256_shuffle_ps::<0xEE>(t0, t2);
    let u2 = _mm256_shuffle_ps::<0x44>(t1, t3);
    let u3 = _mm256_shuffle_ps::<0xEE>(t1, t3);
    let u4 = _mm256_shuffle_ps::<0x44>(t4, t6);
    let u5 = _mm256_shuffle_ps::<0xEE>(t4, t6);
    let u6 = _mm256_shuffle_ps::<0x44>(t5, t7);
    let u7 = _mm256_shuffle_ps::<0xEE>(t5, t7);
    [
        _mm256_permute2f128_ps::<0x20>(u0, u4),
        _mm256_permute2f128_ps::<0x20>(u1, u5),
        _mm256_permute2f128_ps::<0x20>(u2, u6),
        _mm256_permute2f128_ps::<0x20>(u3, u7),
        _mm256_permute2f128_ps::<0x31>(u0, u4),
        _mm256_permute2f128_ps::<0x31>(u1, u5),
        _mm256_permute2f128_ps::<0x31>(u2, u6),
        _mm256_permute2f128_ps::<0x31>(u3, u7),
    ]
    }
}

/// Radix-8 terminal over eight blocks at a time; one whole block per row,
/// one element per register after the 8x8 transpose.
#[target_feature(enable = "avx")]
#[allow(unused_unsafe)]
pub(super) unsafe fn radix8_f32<const INV: bool>(re: &mut [f32], im: &mut [f32]) {
    let n = re.len();
    debug_assert!(n % 64 == 0);
    let rp = re.as_mut_ptr();
    let jp = im.as_mut_ptr();
    let mut g = 0usize;
    while g < n {
        unsafe {
            let mut r = [_mm256_setzero_ps(); 8];
            let mut s = [_mm256_setzero_ps(); 8];
            for b in 0..8 {
                r[b] = _mm256_loadu_ps(rp.add(g + 8 * b));
                s[b] = _mm256_loadu_ps(jp.add(g + 8 * b));
            }
            let mut r = transpose8(r);
            let mut s = transpose8(s);
            network_f32::<INV>(&mut r, &mut s);
            let r = transpose8(r);
            let s = transpose8(s);
            for b in 0..8 {
                _mm256_storeu_ps(rp.add(g + 8 * b), r[b]);
                _mm256_storeu_ps(jp.add(g + 8 * b), s[b]);
            }
        }
        g += 64;
    }
}

/// Four blocks per iteration; lanes are gathered per element, so the
/// network sees one block per lane without a full transpose.
#[target_feature(enable = "avx")]
#[allow(unused_unsafe)]
pub(super) unsafe fn radix8_f64<const INV: bool>(re: &mut [f64], im: &mut [f64]) {
    let n = re.len();
    debug_assert!(n % 32 == 0);
    let rp = re.as_mut_ptr();
    let jp = im.as_mut_ptr();
    let mut g = 0usize;
    while g < n {
        unsafe {
            let mut r = [_mm256_setzero_pd(); 8];
            let mut s = [_mm256_setzero_pd(); 8];
            for e in 0..8 {
                r[e] = _mm256_set_pd(
                    *rp.add(g + 24 + e),
                    *rp.add(g + 16 + e),
                    *rp.add(g + 8 + e),
                    *rp.add(g + e),
                );
                s[e] = _mm256_set_pd(
                    *jp.add(g + 24 + e),
                    *jp.add(g + 16 + e),
                    *jp.add(g + 8 + e),
                    *jp.add(g + e),
                );
            }
            network_f64::<INV>(&mut r, &mut s);
            for e in 0..8 {
                let mut tr = [0.0f64; 4];
                let mut ti = [0.0f64; 4];
                _mm256_storeu_pd(tr.as_mut_ptr(), r[e]);
                _mm256_storeu_pd(ti.as_mut_ptr(), s[e]);
                *rp.add(g + e) = tr[0];
                *rp.add(g + 8 + e) = tr[1];
                *rp.add(g + 16 + e) = tr[2];
                *rp.add(g + 24 + e) = tr[3];
                *jp.add(g + e) = ti[0];
                *jp.add(g + 8 + e) = ti[1];
                *jp.add(g + 16 + e) = ti[2];
                *jp.add(g + 24 + e) = ti[3];
            }
        }
        g += 32;
    }
}
