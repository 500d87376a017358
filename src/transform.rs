// src/transform.rs
//
// Argument validation, pipeline dispatch, and the public entry points.

use core::slice;

use num_complex::Complex;

use crate::bitrev::{SrcLane, deinterleave_in_place, interleave_in_place, permute_copy, permute_in_place};
use crate::butterfly::{Engine, PackedStrided, ReIm, SplitSlices, dbcf_butterfly};
use crate::common::{Direction, FftError, FftOptions, Layout};
use crate::scalar::FftScalar;

/// Read-only complex source: two strided channels, possibly over the same
/// buffer, possibly absent (all-zero input).
pub(crate) struct SrcPair<'a, T> {
    pub re: SrcLane<'a, T>,
    pub im: SrcLane<'a, T>,
}

fn effective_mask<T>(opts: &FftOptions<'_, T>) -> u32 {
    if let Some(m) = opts.feature_mask {
        return m;
    }
    #[cfg(feature = "simd")]
    return crate::simd::feature_mask();
    #[cfg(not(feature = "simd"))]
    return 0;
}

/// Power-of-two pipeline: bit-reverse each channel, switch an interleaved
/// destination to split layout while the vector kernels run, then scale.
fn pot_pipeline<T: FftScalar, V: ReIm<T>>(
    v: &mut V,
    src: Option<&SrcPair<'_, T>>,
    n: usize,
    inverse: bool,
    scale: T,
    eng: &Engine<'_, T>,
) {
    let bits = n.trailing_zeros();
    match src {
        Some(sp) => {
            permute_copy(&sp.re, &mut v.re_lane(), bits);
            permute_copy(&sp.im, &mut v.im_lane(), bits);
        }
        None => {
            permute_in_place(&mut v.re_lane(), bits);
            permute_in_place(&mut v.im_lane(), bits);
        }
    }
    let mut done = false;
    if eng.mask != 0 && n > 16 {
        if let Some(buf) = v.interleaved_contiguous(n) {
            deinterleave_in_place(buf);
            let (re, im) = buf.split_at_mut(n);
            let mut ss = SplitSlices { re, im };
            dbcf_butterfly(&mut ss, 0, bits, inverse, eng);
            interleave_in_place(buf);
            done = true;
        }
    }
    if !done {
        dbcf_butterfly(v, 0, bits, inverse, eng);
    }
    if scale != T::ONE {
        for i in 0..n {
            let (r, j) = (v.re(i), v.im(i));
            v.set(i, r * scale, j * scale);
        }
    }
}

/// In-place power-of-two transform over split slices; the Bluestein path
/// drives its sub-transforms through this.
pub(crate) fn pot_split_in_place<T: FftScalar>(
    re: &mut [T],
    im: &mut [T],
    inverse: bool,
    scale: T,
    eng: &Engine<'_, T>,
) {
    let n = re.len();
    debug_assert!(n.is_power_of_two() && im.len() == n);
    let mut v = SplitSlices { re, im };
    pot_pipeline(&mut v, None, n, inverse, scale, eng);
}

fn run<T: FftScalar, V: ReIm<T>>(
    v: &mut V,
    src: Option<&SrcPair<'_, T>>,
    n: usize,
    dir: Direction,
    scale: T,
    opts: &FftOptions<'_, T>,
) -> Result<(), FftError> {
    let eng = Engine { mask: effective_mask(opts), hook: opts.multipass_hook };
    if n.is_power_of_two() {
        pot_pipeline(v, src, n, dir.is_inverse(), scale, &eng);
        Ok(())
    } else {
        #[cfg(feature = "bluestein")]
        return crate::bluestein::run(v, src, n, dir.is_inverse(), scale, &eng);
        #[cfg(not(feature = "bluestein"))]
        return Err(FftError::NotPowerOfTwo);
    }
}

fn check_channel(
    len: usize,
    off: usize,
    step: isize,
    n: usize,
    allow_zero_step: bool,
) -> Result<(), FftError> {
    if step == 0 && !allow_zero_step {
        return Err(FftError::InvalidStride);
    }
    if off >= len {
        return Err(FftError::BufferTooSmall);
    }
    let last = off as i128 + (n as i128 - 1) * step as i128;
    if last < 0 || last >= len as i128 {
        return Err(FftError::BufferTooSmall);
    }
    Ok(())
}

fn channel_extent(off: usize, step: isize, n: usize) -> (i128, i128) {
    let a = off as i128;
    let b = off as i128 + (n as i128 - 1) * step as i128;
    if a <= b { (a, b) } else { (b, a) }
}

/// Detectable collisions between the two destination channels. Steps of
/// equal magnitude visit one residue class each, so a shared class with
/// overlapping extents is a definite clash. Unequal magnitudes fall under
/// the caller's no-partial-overlap contract.
fn channels_collide(l: &Layout, n: usize) -> bool {
    if l.re_offset == l.im_offset {
        return true;
    }
    let (sa, sb) = (l.re_step.unsigned_abs(), l.im_step.unsigned_abs());
    if sa != sb {
        return false;
    }
    if (l.re_offset as i128 - l.im_offset as i128) % (sa as i128) != 0 {
        return false;
    }
    let (rmin, rmax) = channel_extent(l.re_offset, l.re_step, n);
    let (imin, imax) = channel_extent(l.im_offset, l.im_step, n);
    rmin <= imax && imin <= rmax
}

fn check_src_layout(len: usize, l: &Layout, n: usize) -> Result<(), FftError> {
    check_channel(len, l.re_offset, l.re_step, n, true)?;
    check_channel(len, l.im_offset, l.im_step, n, true)
}

fn check_dst_layout(len: usize, l: &Layout, n: usize) -> Result<(), FftError> {
    check_channel(len, l.re_offset, l.re_step, n, false)?;
    check_channel(len, l.im_offset, l.im_step, n, false)?;
    if channels_collide(l, n) {
        return Err(FftError::InvalidStride);
    }
    Ok(())
}

// --- interleaved shape -----------------------------------------------------

/// `Complex<T>` is `repr(C)`, so a complex slice is exactly the interleaved
/// scalar layout.
fn as_scalars<T: FftScalar>(src: &[Complex<T>]) -> &[T] {
    unsafe { slice::from_raw_parts(src.as_ptr() as *const T, 2 * src.len()) }
}

fn as_scalars_mut<T: FftScalar>(dst: &mut [Complex<T>]) -> &mut [T] {
    unsafe { slice::from_raw_parts_mut(dst.as_mut_ptr() as *mut T, 2 * dst.len()) }
}

/// Interleaved transform with explicit options.
pub fn transform<T: FftScalar>(
    dir: Direction,
    src: &[Complex<T>],
    dst: &mut [Complex<T>],
    scale: T,
    opts: &FftOptions<'_, T>,
) -> Result<(), FftError> {
    if src.len() != dst.len() {
        return Err(FftError::SizeMismatch);
    }
    let n = dst.len();
    if n == 0 {
        return Ok(());
    }
    let sbuf = as_scalars(src);
    let sp = SrcPair {
        re: SrcLane { buf: Some(sbuf), off: 0, step: 2 },
        im: SrcLane { buf: Some(sbuf), off: 1, step: 2 },
    };
    let mut v = PackedStrided { buf: as_scalars_mut(dst), layout: Layout::interleaved() };
    run(&mut v, Some(&sp), n, dir, scale, opts)
}

/// In-place interleaved transform with explicit options.
pub fn transform_in_place<T: FftScalar>(
    dir: Direction,
    data: &mut [Complex<T>],
    scale: T,
    opts: &FftOptions<'_, T>,
) -> Result<(), FftError> {
    let n = data.len();
    if n == 0 {
        return Ok(());
    }
    let mut v = PackedStrided { buf: as_scalars_mut(data), layout: Layout::interleaved() };
    run(&mut v, None, n, dir, scale, opts)
}

// --- split shape -----------------------------------------------------------

/// Split-array transform with explicit options.
pub fn transform_split<T: FftScalar>(
    dir: Direction,
    re_src: &[T],
    im_src: &[T],
    re_dst: &mut [T],
    im_dst: &mut [T],
    scale: T,
    opts: &FftOptions<'_, T>,
) -> Result<(), FftError> {
    let n = re_dst.len();
    if im_dst.len() != n || re_src.len() != n || im_src.len() != n {
        return Err(FftError::SizeMismatch);
    }
    if n == 0 {
        return Ok(());
    }
    let sp = SrcPair {
        re: SrcLane { buf: Some(re_src), off: 0, step: 1 },
        im: SrcLane { buf: Some(im_src), off: 0, step: 1 },
    };
    let mut v = SplitSlices { re: re_dst, im: im_dst };
    run(&mut v, Some(&sp), n, dir, scale, opts)
}

/// In-place split-array transform with explicit options.
pub fn transform_split_in_place<T: FftScalar>(
    dir: Direction,
    re: &mut [T],
    im: &mut [T],
    scale: T,
    opts: &FftOptions<'_, T>,
) -> Result<(), FftError> {
    let n = re.len();
    if im.len() != n {
        return Err(FftError::SizeMismatch);
    }
    if n == 0 {
        return Ok(());
    }
    let mut v = SplitSlices { re, im };
    run(&mut v, None, n, dir, scale, opts)
}

// --- strided shape ---------------------------------------------------------

/// Strided transform with explicit options. `src == None` reads an
/// all-zero input; a zero source step broadcasts one element.
pub fn transform_strided<T: FftScalar>(
    dir: Direction,
    n: usize,
    src: Option<(&[T], Layout)>,
    dst: &mut [T],
    dst_layout: Layout,
    scale: T,
    opts: &FftOptions<'_, T>,
) -> Result<(), FftError> {
    if n == 0 {
        return Ok(());
    }
    check_dst_layout(dst.len(), &dst_layout, n)?;
    let sp = match src {
        Some((sbuf, sl)) => {
            check_src_layout(sbuf.len(), &sl, n)?;
            SrcPair {
                re: SrcLane { buf: Some(sbuf), off: sl.re_offset, step: sl.re_step },
                im: SrcLane { buf: Some(sbuf), off: sl.im_offset, step: sl.im_step },
            }
        }
        None => SrcPair {
            re: SrcLane { buf: None, off: 0, step: 0 },
            im: SrcLane { buf: None, off: 0, step: 0 },
        },
    };
    let mut v = PackedStrided { buf: dst, layout: dst_layout };
    run(&mut v, Some(&sp), n, dir, scale, opts)
}

/// In-place strided transform with explicit options.
pub fn transform_strided_in_place<T: FftScalar>(
    dir: Direction,
    n: usize,
    data: &mut [T],
    layout: Layout,
    scale: T,
    opts: &FftOptions<'_, T>,
) -> Result<(), FftError> {
    if n == 0 {
        return Ok(());
    }
    check_dst_layout(data.len(), &layout, n)?;
    let mut v = PackedStrided { buf: data, layout };
    run(&mut v, None, n, dir, scale, opts)
}

// --- default-option wrappers -----------------------------------------------

pub fn fft<T: FftScalar>(
    src: &[Complex<T>],
    dst: &mut [Complex<T>],
    scale: T,
) -> Result<(), FftError> {
    transform(Direction::Forward, src, dst, scale, &FftOptions::default())
}

pub fn ifft<T: FftScalar>(
    src: &[Complex<T>],
    dst: &mut [Complex<T>],
    scale: T,
) -> Result<(), FftError> {
    transform(Direction::Inverse, src, dst, scale, &FftOptions::default())
}

pub fn fft_in_place<T: FftScalar>(data: &mut [Complex<T>], scale: T) -> Result<(), FftError> {
    transform_in_place(Direction::Forward, data, scale, &FftOptions::default())
}

pub fn ifft_in_place<T: FftScalar>(data: &mut [Complex<T>], scale: T) -> Result<(), FftError> {
    transform_in_place(Direction::Inverse, data, scale, &FftOptions::default())
}

pub fn fft_split<T: FftScalar>(
    re_src: &[T],
    im_src: &[T],
    re_dst: &mut [T],
    im_dst: &mut [T],
    scale: T,
) -> Result<(), FftError> {
    transform_split(Direction::Forward, re_src, im_src, re_dst, im_dst, scale, &FftOptions::default())
}

pub fn ifft_split<T: FftScalar>(
    re_src: &[T],
    im_src: &[T],
    re_dst: &mut [T],
    im_dst: &mut [T],
    scale: T,
) -> Result<(), FftError> {
    transform_split(Direction::Inverse, re_src, im_src, re_dst, im_dst, scale, &FftOptions::default())
}

pub fn fft_split_in_place<T: FftScalar>(
    re: &mut [T],
    im: &mut [T],
    scale: T,
) -> Result<(), FftError> {
    transform_split_in_place(Direction::Forward, re, im, scale, &FftOptions::default())
}

pub fn ifft_split_in_place<T: FftScalar>(
    re: &mut [T],
    im: &mut [T],
    scale: T,
) -> Result<(), FftError> {
    transform_split_in_place(Direction::Inverse, re, im, scale, &FftOptions::default())
}

pub fn fft_strided<T: FftScalar>(
    n: usize,
    src: Option<(&[T], Layout)>,
    dst: &mut [T],
    dst_layout: Layout,
    scale: T,
) -> Result<(), FftError> {
    transform_strided(Direction::Forward, n, src, dst, dst_layout, scale, &FftOptions::default())
}

pub fn ifft_strided<T: FftScalar>(
    n: usize,
    src: Option<(&[T], Layout)>,
    dst: &mut [T],
    dst_layout: Layout,
    scale: T,
) -> Result<(), FftError> {
    transform_strided(Direction::Inverse, n, src, dst, dst_layout, scale, &FftOptions::default())
}

pub fn fft_strided_in_place<T: FftScalar>(
    n: usize,
    data: &mut [T],
    layout: Layout,
    scale: T,
) -> Result<(), FftError> {
    transform_strided_in_place(Direction::Forward, n, data, layout, scale, &FftOptions::default())
}

pub fn ifft_strided_in_place<T: FftScalar>(
    n: usize,
    data: &mut [T],
    layout: Layout,
    scale: T,
) -> Result<(), FftError> {
    transform_strided_in_place(Direction::Inverse, n, data, layout, scale, &FftOptions::default())
}

#[cfg(test)]
#[path = "transform_tests.rs"]
mod tests;
