// src/simd/neon.rs
//
// NEON backend: 4-lane f32 and 2-lane f64 kernels. NEON loads carry no
// alignment requirement, so the aligned/unaligned split collapses.

use core::arch::aarch64::*;

use super::{radix8_network, vector_expand_kernel, vector_pass_kernel};

vector_pass_kernel!(
    pass_f32, f32, 4, "neon",
    vld1q_f32, vld1q_f32, vst1q_f32, vst1q_f32,
    vaddq_f32, vsubq_f32, vmulq_f32
);
vector_pass_kernel!(
    pass_f64, f64, 2, "neon",
    vld1q_f64, vld1q_f64, vst1q_f64, vst1q_f64,
    vaddq_f64, vsubq_f64, vmulq_f64
);
vector_expand_kernel!(
    expand_f32, f32, 4, "neon",
    vld1q_f32, vst1q_f32, vaddq_f32, vsubq_f32, vmulq_f32, vdupq_n_f32
);
vector_expand_kernel!(
    expand_f64, f64, 2, "neon",
    vld1q_f64, vst1q_f64, vaddq_f64, vsubq_f64, vmulq_f64, vdupq_n_f64
);
radix8_network!(
    network_f32, f32, float32x4_t, "neon", core::f32::consts::FRAC_1_SQRT_2,
    vaddq_f32, vsubq_f32, vmulq_f32, vdupq_n_f32
);
radix8_network!(
    network_f64, f64, float64x2_t, "neon", core::f64::consts::FRAC_1_SQRT_2,
    vaddq_f64, vsubq_f64, vmulq_f64, vdupq_n_f64
);

/// Four blocks per iteration, lanes gathered per element.
#[target_feature(enable = "neon")]
#[allow(unused_unsafe)]
pub(super) unsafe fn radix8_f32<const INV: bool>(re: &mut [f32], im: &mut [f32]) {
    let n = re.len();
    debug_assert!(n % 32 == 0);
    let mut g = 0usize;
    while g < n {
        unsafe {
            let mut r = [vdupq_n_f32(0.0); 8];
            let mut s = [vdupq_n_f32(0.0); 8];
            for e in 0..8 {
                let tr = [re[g + e], re[g + 8 + e], re[g + 16 + e], re[g + 24 + e]];
                let ti = [im[g + e], im[g + 8 + e], im[g + 16 + e], im[g + 24 + e]];
                r[e] = vld1q_f32(tr.as_ptr());
                s[e] = vld1q_f32(ti.as_ptr());
            }
            network_f32::<INV>(&mut r, &mut s);
            for e in 0..8 {
                let mut tr = [0.0f32; 4];
                let mut ti = [0.0f32; 4];
                vst1q_f32(tr.as_mut_ptr(), r[e]);
                vst1q_f32(ti.as_mut_ptr(), s[e]);
                re[g + e] = tr[0];
                re[g + 8 + e] = tr[1];
                re[g + 16 + e] = tr[2];
                re[g + 24 + e] = tr[3];
                im[g + e] = ti[0];
                im[g + 8 + e] = ti[1];
                im[g + 16 + e] = ti[2];
                im[g + 24 + e] = ti[3];
            }
        }
        g += 32;
    }
}

/// Two blocks per iteration.
#[target_feature(enable = "neon")]
#[allow(unused_unsafe)]
pub(super) unsafe fn radix8_f64<const INV: bool>(re: &mut [f64], im: &mut [f64]) {
    let n = re.len();
    debug_assert!(n % 16 == 0);
    let mut g = 0usize;
    while g < n {
        unsafe {
            let mut r = [vdupq_n_f64(0.0); 8];
            let mut s = [vdupq_n_f64(0.0); 8];
            for e in 0..8 {
                let tr = [re[g + e], re[g + 8 + e]];
                let ti = [im[g + e], im[g + 8 + e]];
                r[e] = vld1q_f64(tr.as_ptr());
                s[e] = vld1q_f64(ti.as_ptr());
            }
            network_f64::<INV>(&mut r, &mut s);
            for e in 0..8 {
                let mut tr = [0.0f64; 2];
                let mut ti = [0.0f64; 2];
                vst1q_f64(tr.as_mut_ptr(), r[e]);
                vst1q_f64(ti.as_mut_ptr(), s[e]);
                re[g + e] = tr[0];
                re[g + 8 + e] = tr[1];
                im[g + e] = ti[0];
                im[g + 8 + e] = ti[1];
            }
        }
        g += 16;
    }
}
