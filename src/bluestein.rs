// src/bluestein.rs
//
// Arbitrary-size transform via the chirp convolution: premultiply by the
// chirp, convolve with the conjugate chirp kernel through a pair of
// power-of-two transforms, postmultiply. The chirp exponent is
// `j_k = k^2 mod 2n`, maintained incrementally; the identity
// `j^2 + k^2 - (j-k)^2 = 2jk` is what turns the convolution into a DFT.

use alloc::vec::Vec;

use crate::butterfly::{Engine, ReIm};
use crate::common::FftError;
use crate::scalar::FftScalar;
use crate::transform::{SrcPair, pot_split_in_place};
use crate::twiddle::bluestein_table;

pub(crate) fn run<T: FftScalar, V: ReIm<T>>(
    v: &mut V,
    src: Option<&SrcPair<'_, T>>,
    n: usize,
    inverse: bool,
    scale: T,
    eng: &Engine<'_, T>,
) -> Result<(), FftError> {
    debug_assert!(n >= 3 && !n.is_power_of_two());
    let m = (2 * n - 1).next_power_of_two();
    let mbits = m.trailing_zeros();

    // One allocation for the whole pipeline: a, b (length m each) and the
    // chirp table (length 2n). Freed on every path out of this function.
    let total = 4 * m + 4 * n;
    let mut scratch: Vec<T> = Vec::new();
    scratch.try_reserve_exact(total).map_err(|_| FftError::OutOfMemory)?;
    scratch.resize(total, T::ZERO);
    let (a_re, rest) = scratch.split_at_mut(m);
    let (a_im, rest) = rest.split_at_mut(m);
    let (b_re, rest) = rest.split_at_mut(m);
    let (b_im, t) = rest.split_at_mut(m);
    let (t_re, t_im) = t.split_at_mut(2 * n);

    bluestein_table(t_re, t_im, n, inverse);

    // Premultiplied input, pre-scaled by 1/m so the forward/inverse pair
    // of unit-scale sub-transforms nets out; the kernel is the conjugate
    // chirp with its tail reflected for negative lags.
    let inv_m = T::inv_pow2(mbits);
    let two_n = 2 * n;
    let mut j = 0usize;
    for k in 0..n {
        let (xr, xi) = match src {
            Some(sp) => (sp.re.get(k), sp.im.get(k)),
            None => (v.re(k), v.im(k)),
        };
        let (tr, ti) = (t_re[j], t_im[j]);
        a_re[k] = (xr * tr - xi * ti) * inv_m;
        a_im[k] = (xr * ti + xi * tr) * inv_m;
        b_re[k] = tr;
        b_im[k] = -ti;
        if k > 0 {
            b_re[m - k] = b_re[k];
            b_im[m - k] = b_im[k];
        }
        j += 2 * k + 1;
        if j >= two_n {
            j -= two_n;
        }
    }

    pot_split_in_place(a_re, a_im, false, T::ONE, eng);
    pot_split_in_place(b_re, b_im, false, T::ONE, eng);
    for i in 0..m {
        let (ar, ai) = (a_re[i], a_im[i]);
        let (br, bi) = (b_re[i], b_im[i]);
        a_re[i] = ar * br - ai * bi;
        a_im[i] = ar * bi + ai * br;
    }
    pot_split_in_place(a_re, a_im, true, scale, eng);

    let mut j = 0usize;
    for k in 0..n {
        let (tr, ti) = (t_re[j], t_im[j]);
        let (ar, ai) = (a_re[k], a_im[k]);
        v.set(k, ar * tr - ai * ti, ar * ti + ai * tr);
        j += 2 * k + 1;
        if j >= two_n {
            j -= two_n;
        }
    }
    Ok(())
}
