//! A minimal Q32 fixed-point element exercising the scalar-trait seam:
//! custom twiddle primitives, shift-based `inv_pow2`, no SIMD hook.

use core::ops::{Add, Mul, Neg, Sub};
use strided_fft::{FftScalar, fft_split_in_place, ifft_split_in_place};

const FRAC: u32 = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Fix(i64);

impl Fix {
    fn from_f64(v: f64) -> Fix {
        Fix((v * (1u64 << FRAC) as f64).round() as i64)
    }

    fn to_f64(self) -> f64 {
        self.0 as f64 / (1u64 << FRAC) as f64
    }
}

impl Add for Fix {
    type Output = Fix;
    fn add(self, rhs: Fix) -> Fix {
        Fix(self.0 + rhs.0)
    }
}

impl Sub for Fix {
    type Output = Fix;
    fn sub(self, rhs: Fix) -> Fix {
        Fix(self.0 - rhs.0)
    }
}

impl Mul for Fix {
    type Output = Fix;
    fn mul(self, rhs: Fix) -> Fix {
        let wide = (self.0 as i128) * (rhs.0 as i128);
        let offset = 1i128 << (FRAC - 1);
        Fix(((wide + offset) >> FRAC) as i64)
    }
}

impl Neg for Fix {
    type Output = Fix;
    fn neg(self) -> Fix {
        Fix(-self.0)
    }
}

impl FftScalar for Fix {
    const ZERO: Fix = Fix(0);
    const ONE: Fix = Fix(1 << FRAC);

    fn cexpm1(k: u32) -> (Fix, Fix) {
        let (r, i) = f64::cexpm1(k);
        (Fix::from_f64(r), Fix::from_f64(i))
    }

    fn cexpm1_frac(p: u64, q: u64) -> (Fix, Fix) {
        let (r, i) = f64::cexpm1_frac(p, q);
        (Fix::from_f64(r), Fix::from_f64(i))
    }

    fn inv_pow2(k: u32) -> Fix {
        Fix(1 << (FRAC - k))
    }
}

#[test]
fn fixed_point_dc_and_impulse() {
    let n = 16usize;
    let mut re = vec![Fix::from_f64(0.125); n];
    let mut im = vec![Fix::ZERO; n];
    fft_split_in_place(&mut re, &mut im, Fix::ONE).unwrap();
    assert!((re[0].to_f64() - 2.0).abs() < 1e-6);
    for k in 1..n {
        assert!(re[k].to_f64().abs() < 1e-6 && im[k].to_f64().abs() < 1e-6);
    }
}

#[test]
fn fixed_point_round_trip() {
    let n = 32usize;
    let orig: Vec<f64> = (0..n).map(|k| ((k * 37 + 11) % 64) as f64 / 128.0 - 0.25).collect();
    let mut re: Vec<Fix> = orig.iter().map(|&v| Fix::from_f64(v)).collect();
    let mut im = vec![Fix::ZERO; n];
    fft_split_in_place(&mut re, &mut im, Fix::ONE).unwrap();
    ifft_split_in_place(&mut re, &mut im, Fix::inv_pow2(5)).unwrap();
    for k in 0..n {
        assert!(
            (re[k].to_f64() - orig[k]).abs() < 1e-5,
            "k={} got {} want {}",
            k,
            re[k].to_f64(),
            orig[k]
        );
        assert!(im[k].to_f64().abs() < 1e-5);
    }
}
