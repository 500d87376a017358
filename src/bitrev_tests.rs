use super::*;
use std::vec;
use std::vec::Vec;

fn naive_reverse(mut i: usize, bits: u32) -> usize {
    let mut r = 0usize;
    for _ in 0..bits {
        r = (r << 1) | (i & 1);
        i >>= 1;
    }
    r
}

#[test]
fn index_reversal_matches_naive() {
    for bits in 0..=20u32 {
        let n = 1usize << bits;
        let step = (n / 256).max(1);
        let mut i = 0usize;
        while i < n {
            assert_eq!(bit_reverse(i, bits), naive_reverse(i, bits), "i={} bits={}", i, bits);
            i += step;
        }
        if n > 1 {
            assert_eq!(bit_reverse(n - 1, bits), n - 1);
            assert_eq!(bit_reverse(1, bits), n >> 1);
        }
    }
}

fn check_in_place(bits: u32, off: usize, step: isize, buf_len: usize) {
    let n = 1usize << bits;
    let mut buf: Vec<f64> = vec![-1.0; buf_len];
    for i in 0..n {
        buf[(off as isize + i as isize * step) as usize] = i as f64;
    }
    let mut lane = Lane { buf: &mut buf, off, step };
    permute_in_place(&mut lane, bits);
    for i in 0..n {
        let p = (off as isize + naive_reverse(i, bits) as isize * step) as usize;
        assert_eq!(buf[p], i as f64, "bits={} i={}", bits, i);
    }
}

#[test]
fn in_place_tiny_and_medium() {
    for bits in [0u32, 1, 2, 3, 5, 8, 9, 10, 12, 14, 16] {
        check_in_place(bits, 0, 1, 1 << bits);
    }
}

#[test]
fn in_place_large_blocked() {
    check_in_place(17, 0, 1, 1 << 17);
    check_in_place(18, 0, 1, 1 << 18);
}

#[test]
fn in_place_strided_lanes() {
    check_in_place(10, 3, 2, 3 + 2 * 1024);
    check_in_place(9, 0, 3, 3 * 512);
    // negative step: logical element i sits below the offset
    check_in_place(8, 2 * 255, -2, 2 * 255 + 1);
}

#[test]
fn copy_matches_in_place() {
    for bits in [0u32, 3, 7, 9, 11, 13, 16, 17] {
        let n = 1usize << bits;
        let src: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let mut dst: Vec<f64> = vec![0.0; n];
        let sl = SrcLane { buf: Some(&src), off: 0, step: 1 };
        let mut dl = Lane { buf: &mut dst, off: 0, step: 1 };
        permute_copy(&sl, &mut dl, bits);
        for i in 0..n {
            assert_eq!(dst[naive_reverse(i, bits)], i as f64, "bits={} i={}", bits, i);
        }
    }
}

#[test]
fn copy_strided_source_and_destination() {
    let bits = 9u32;
    let n = 1usize << bits;
    let src: Vec<f64> = (0..2 * n).map(|i| i as f64).collect();
    let mut dst: Vec<f64> = vec![0.0; 3 * n];
    let sl = SrcLane { buf: Some(&src), off: 1, step: 2 };
    let mut dl = Lane { buf: &mut dst, off: 2, step: 3 };
    permute_copy(&sl, &mut dl, bits);
    for i in 0..n {
        let expect = (1 + 2 * i) as f64;
        assert_eq!(dst[2 + 3 * naive_reverse(i, bits)], expect);
    }
}

#[test]
fn copy_broadcast_and_zero_sources() {
    let n = 256usize;
    let src = vec![7.5f64; 1];
    let mut dst = vec![0.0f64; n];
    let sl = SrcLane { buf: Some(&src), off: 0, step: 0 };
    let mut dl = Lane { buf: &mut dst, off: 0, step: 1 };
    permute_copy(&sl, &mut dl, 8);
    assert!(dst.iter().all(|&x| x == 7.5));

    let mut dst = vec![1.0f64; n];
    let sl: SrcLane<'_, f64> = SrcLane { buf: None, off: 0, step: 0 };
    let mut dl = Lane { buf: &mut dst, off: 0, step: 1 };
    permute_copy(&sl, &mut dl, 8);
    assert!(dst.iter().all(|&x| x == 0.0));
}

#[test]
fn deinterleave_then_interleave_round_trips() {
    for n in [2usize, 4, 32, 256, 1024] {
        let mut buf: Vec<f64> = (0..2 * n).map(|i| i as f64).collect();
        deinterleave_in_place(&mut buf);
        for k in 0..n {
            assert_eq!(buf[k], (2 * k) as f64, "re half, n={}", n);
            assert_eq!(buf[n + k], (2 * k + 1) as f64, "im half, n={}", n);
        }
        interleave_in_place(&mut buf);
        for (i, &x) in buf.iter().enumerate() {
            assert_eq!(x, i as f64);
        }
    }
}
