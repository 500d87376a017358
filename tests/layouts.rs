//! Layout contracts: stride invariance, zero/broadcast sources, and
//! interleaved/split equivalence.

use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use strided_fft::{
    Direction, FftOptions, Layout, fft, fft_split, fft_strided, ifft_strided, transform_split,
};

fn random_parts(n: usize, seed: u64) -> (Vec<f64>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let re = (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect();
    let im = (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect();
    (re, im)
}

/// Property 4: any positive strides produce the contiguous values at the
/// logical positions.
#[test]
fn stride_invariance() {
    for n in [8usize, 12, 64, 100, 256] {
        let (re, im) = random_parts(n, n as u64);
        let mut re_ref = vec![0.0; n];
        let mut im_ref = vec![0.0; n];
        // scalar path as the reference
        transform_split(
            Direction::Forward,
            &re,
            &im,
            &mut re_ref,
            &mut im_ref,
            1.0,
            &FftOptions { feature_mask: Some(0), multipass_hook: None },
        )
        .unwrap();

        for (sr, si) in [(1usize, 1usize), (2, 3), (3, 2), (5, 7)] {
            // pack the source with the same strides to reuse one buffer
            let src_layout = Layout {
                re_offset: 0,
                re_step: sr as isize,
                im_offset: sr * n,
                im_step: si as isize,
            };
            let mut src = vec![0.0; sr * n + si * n];
            for k in 0..n {
                src[sr * k] = re[k];
                src[sr * n + si * k] = im[k];
            }
            let mut dst = vec![0.0; sr * n + si * n];
            fft_strided(n, Some((&src, src_layout)), &mut dst, src_layout, 1.0).unwrap();
            for k in 0..n {
                assert!(
                    (dst[sr * k] - re_ref[k]).abs() < 1e-11
                        && (dst[sr * n + si * k] - im_ref[k]).abs() < 1e-11,
                    "n={} strides=({},{}) k={}",
                    n,
                    sr,
                    si,
                    k
                );
            }
        }
    }
}

/// Property 5: a broadcast source of magnitude `m` behaves as the constant
/// sequence: everything lands in the DC bin.
#[test]
fn broadcast_source_is_constant_sequence() {
    for n in [4usize, 10, 32] {
        let src = vec![2.5f64, 0.0];
        let src_layout = Layout { re_offset: 0, re_step: 0, im_offset: 1, im_step: 0 };
        let mut dst = vec![0.0f64; 2 * n];
        fft_strided(n, Some((&src, src_layout)), &mut dst, Layout::interleaved(), 1.0).unwrap();
        assert!((dst[0] - 2.5 * n as f64).abs() < 1e-9, "n={}", n);
        assert!(dst[1].abs() < 1e-9);
        for k in 1..n {
            assert!(dst[2 * k].abs() < 1e-9 && dst[2 * k + 1].abs() < 1e-9);
        }
    }
}

/// An absent source reads as all zeros.
#[test]
fn missing_source_reads_zero() {
    let n = 16usize;
    let mut dst = vec![7.0f64; 2 * n];
    fft_strided(n, None, &mut dst, Layout::interleaved(), 1.0).unwrap();
    assert!(dst.iter().all(|&x| x == 0.0));
}

/// Property 7: interleaved and split entry points agree on matched inputs.
/// The interleaved path may take the deinterleave/reinterleave shuffles,
/// so agreement is to a ULP-level tolerance rather than bitwise.
#[test]
fn interleaved_matches_split() {
    for n in [8usize, 20, 64, 512, 2048] {
        let (re, im) = random_parts(n, 9000 + n as u64);
        let src: Vec<Complex64> =
            re.iter().zip(&im).map(|(&r, &i)| Complex64::new(r, i)).collect();
        let mut out_c = vec![Complex64::default(); n];
        fft(&src, &mut out_c, 1.0).unwrap();

        let mut re_out = vec![0.0; n];
        let mut im_out = vec![0.0; n];
        fft_split(&re, &im, &mut re_out, &mut im_out, 1.0).unwrap();

        let scale: f64 =
            (out_c.iter().map(|v| v.norm_sqr()).sum::<f64>() / n as f64).sqrt().max(1.0);
        for k in 0..n {
            assert!(
                (out_c[k].re - re_out[k]).abs() <= 1e-13 * scale
                    && (out_c[k].im - im_out[k]).abs() <= 1e-13 * scale,
                "n={} k={}",
                n,
                k
            );
        }
    }
}

/// In-place and out-of-place strided calls agree.
#[test]
fn in_place_matches_out_of_place() {
    let n = 128usize;
    let (re, im) = random_parts(n, 77);
    let mut packed = vec![0.0f64; 2 * n];
    for k in 0..n {
        packed[2 * k] = re[k];
        packed[2 * k + 1] = im[k];
    }
    let mut out = vec![0.0f64; 2 * n];
    fft_strided(
        n,
        Some((&packed, Layout::interleaved())),
        &mut out,
        Layout::interleaved(),
        1.0,
    )
    .unwrap();
    let mut inplace = packed.clone();
    strided_fft::fft_strided_in_place(n, &mut inplace, Layout::interleaved(), 1.0).unwrap();
    for k in 0..2 * n {
        assert!((out[k] - inplace[k]).abs() < 1e-12);
    }
}

/// Inverse strided entry agrees with the inverse interleaved entry.
#[test]
fn inverse_strided_matches_interleaved() {
    let n = 64usize;
    let (re, im) = random_parts(n, 1234);
    let src: Vec<Complex64> = re.iter().zip(&im).map(|(&r, &i)| Complex64::new(r, i)).collect();
    let mut expect = vec![Complex64::default(); n];
    strided_fft::ifft(&src, &mut expect, 1.0).unwrap();

    let mut packed = vec![0.0f64; 2 * n];
    for k in 0..n {
        packed[2 * k] = re[k];
        packed[2 * k + 1] = im[k];
    }
    let mut out = vec![0.0f64; 2 * n];
    ifft_strided(
        n,
        Some((&packed, Layout::interleaved())),
        &mut out,
        Layout::interleaved(),
        1.0,
    )
    .unwrap();
    for k in 0..n {
        assert!(
            (out[2 * k] - expect[k].re).abs() < 1e-12 && (out[2 * k + 1] - expect[k].im).abs() < 1e-12
        );
    }
}
