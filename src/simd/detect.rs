// src/simd/detect.rs
//
// x86/x86_64 runtime probe: CPUID leaf 0 for the maximum level, leaf 1
// for SSE2 and the AVX prerequisites, XGETBV for the OS register state,
// leaf 7 for AVX-512F.

#[cfg(target_arch = "x86")]
use core::arch::x86 as arch;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64 as arch;

use super::{F32X4, F32X8, F64X2, F64X4};
#[cfg(feature = "avx512")]
use super::{F32X16, F64X8};

pub(super) fn probe() -> u32 {
    let mut mask = 0u32;
    let max_leaf = unsafe { arch::__cpuid(0) }.eax;
    if max_leaf == 0 {
        return 0;
    }
    let leaf1 = unsafe { arch::__cpuid(1) };
    if leaf1.edx & (1 << 26) != 0 {
        mask |= F32X4 | F64X2;
    }
    // OSXSAVE and AVX both advertised, then confirm the OS enabled the
    // extended state (XCR0 bits 1..=2 for AVX, plus 5..=7 for AVX-512).
    if leaf1.ecx & (1 << 27) != 0 && leaf1.ecx & (1 << 28) != 0 {
        let xcr0 = unsafe { xgetbv0() };
        if xcr0 & 0x6 == 0x6 {
            mask |= F32X8 | F64X4;
            #[cfg(feature = "avx512")]
            if max_leaf >= 7 && xcr0 & 0xE6 == 0xE6 {
                let leaf7 = unsafe { arch::__cpuid_count(7, 0) };
                if leaf7.ebx & (1 << 16) != 0 {
                    mask |= F32X16 | F64X8;
                }
            }
        }
    }
    #[cfg(not(feature = "avx"))]
    {
        mask &= F32X4 | F64X2;
    }
    mask
}

#[target_feature(enable = "xsave")]
unsafe fn xgetbv0() -> u64 {
    unsafe { arch::_xgetbv(0) }
}
