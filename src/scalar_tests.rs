use super::*;

fn assert_close(a: f64, b: f64, tol: f64) {
    assert!((a - b).abs() <= tol, "f64 mismatch: {} vs {}", a, b);
}

fn assert_close_f32(a: f32, b: f32, tol: f32) {
    assert!((a - b).abs() <= tol, "f32 mismatch: {} vs {}", a, b);
}

#[test]
fn cexpm1_table_matches_reference_f64() {
    for k in 0..=16u32 {
        let angle = core::f64::consts::TAU / (1u64 << k) as f64;
        let (re, im) = <f64 as FftScalar>::cexpm1(k);
        assert_close(re, angle.cos() - 1.0, 1e-15);
        assert_close(im, angle.sin(), 1e-15);
    }
}

#[test]
fn cexpm1_taylor_region_f64() {
    // Beyond the table the angle is tiny; the reference itself loses the
    // low bits of cos(x) - 1, so the tolerance reflects that.
    for k in 17..=30u32 {
        let angle = core::f64::consts::TAU / (1u64 << k) as f64;
        let (re, im) = <f64 as FftScalar>::cexpm1(k);
        assert_close(re, angle.cos() - 1.0, 1e-15);
        assert_close(im, angle.sin(), 1e-18);
    }
}

#[test]
fn cexpm1_table_matches_reference_f32() {
    for k in 0..=16u32 {
        let angle = core::f64::consts::TAU / (1u64 << k) as f64;
        let (re, im) = <f32 as FftScalar>::cexpm1(k);
        assert_close_f32(re, (angle.cos() - 1.0) as f32, 2e-7);
        assert_close_f32(im, angle.sin() as f32, 2e-7);
    }
}

#[test]
fn cexpm1_frac_matches_reference_f64() {
    let cases: &[(u64, u64)] = &[
        (0, 1),
        (1, 2),
        (1, 3),
        (2, 3),
        (1, 4),
        (1, 5),
        (2, 5),
        (1, 7),
        (3, 7),
        (5, 12),
        (7, 16),
        (1, 1000),
        (499, 1000),
        (1, 1 << 20),
    ];
    for &(p, q) in cases {
        let angle = core::f64::consts::TAU * p as f64 / q as f64;
        let (re, im) = <f64 as FftScalar>::cexpm1_frac(p, q);
        assert_close(re, angle.cos() - 1.0, 4e-15);
        assert_close(im, angle.sin(), 4e-15);
    }
}

#[test]
fn cexpm1_frac_matches_reference_f32() {
    for &(p, q) in &[(1u64, 3u64), (1, 5), (2, 5), (3, 7), (1, 2), (1, 100)] {
        let angle = core::f64::consts::TAU * p as f64 / q as f64;
        let (re, im) = <f32 as FftScalar>::cexpm1_frac(p, q);
        assert_close_f32(re, (angle.cos() - 1.0) as f32, 1e-6);
        assert_close_f32(im, angle.sin() as f32, 1e-6);
    }
}

#[test]
fn inv_pow2_values() {
    assert_eq!(<f64 as FftScalar>::inv_pow2(0), 1.0);
    assert_eq!(<f64 as FftScalar>::inv_pow2(3), 0.125);
    assert_eq!(<f64 as FftScalar>::inv_pow2(20), 1.0 / 1048576.0);
    assert_eq!(<f32 as FftScalar>::inv_pow2(4), 0.0625);
}

#[test]
fn default_multipass_hook_is_inert() {
    // Custom scalar types fall back to the scalar butterfly path.
    #[derive(Clone, Copy, PartialEq)]
    struct S(f64);
    use core::ops::{Add, Mul, Neg, Sub};
    impl Add for S {
        type Output = S;
        fn add(self, o: S) -> S {
            S(self.0 + o.0)
        }
    }
    impl Sub for S {
        type Output = S;
        fn sub(self, o: S) -> S {
            S(self.0 - o.0)
        }
    }
    impl Mul for S {
        type Output = S;
        fn mul(self, o: S) -> S {
            S(self.0 * o.0)
        }
    }
    impl Neg for S {
        type Output = S;
        fn neg(self) -> S {
            S(-self.0)
        }
    }
    impl FftScalar for S {
        const ZERO: S = S(0.0);
        const ONE: S = S(1.0);
        fn cexpm1(k: u32) -> (S, S) {
            let (r, i) = f64::cexpm1(k);
            (S(r), S(i))
        }
        fn cexpm1_frac(p: u64, q: u64) -> (S, S) {
            let (r, i) = f64::cexpm1_frac(p, q);
            (S(r), S(i))
        }
        fn inv_pow2(k: u32) -> S {
            S(f64::inv_pow2(k))
        }
    }
    let mut re = [S(1.0); 8];
    let mut im = [S(0.0); 8];
    assert_eq!(S::optimized_multipass(&mut re, &mut im, 3, 3, false, u32::MAX), 0);
}
