//! §4.D — IIDResampler<T>.

use rand::Rng;

use crate::error::ResamplingError;

/// Uniformly-with-replacement resampler for independent elements (trades,
/// or already-shuffled returns).
pub struct IidResampler;

impl IidResampler {
    /// Fills `dst[0..n)` with uniform-with-replacement draws from `src`.
    pub fn resample<T: Copy, R: Rng + ?Sized>(
        src: &[T],
        dst: &mut Vec<T>,
        n: usize,
        rng: &mut R,
    ) -> Result<(), ResamplingError> {
        if src.is_empty() {
            return Err(ResamplingError::EmptySource);
        }
        if n == 0 {
            return Err(ResamplingError::ZeroSampleCount);
        }
        dst.clear();
        dst.reserve(n);
        for _ in 0..n {
            let idx = rng.gen_range(0..src.len());
            dst.push(src[idx]);
        }
        Ok(())
    }

    /// The `n` leave-one-out samples used by the BCa jackknife step.
    pub fn jackknife<T: Copy>(src: &[T]) -> Result<Vec<Vec<T>>, ResamplingError> {
        if src.is_empty() {
            return Err(ResamplingError::EmptySource);
        }
        let mut out = Vec::with_capacity(src.len());
        for i in 0..src.len() {
            let mut sample = Vec::with_capacity(src.len() - 1);
            sample.extend_from_slice(&src[..i]);
            sample.extend_from_slice(&src[i + 1..]);
            out.push(sample);
        }
        Ok(out)
    }
}
