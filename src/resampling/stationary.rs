//! §4.D — StationaryBlockResampler<Decimal> (Politis-Romano).

use rand::Rng;

use crate::error::ResamplingError;

/// Stationary (Politis-Romano) block resampler parameterized by mean block
/// length `L >= 1`. Produces `n` samples from a source of length `m` by
/// picking a uniform start, emitting contiguous runs of geometric(1/L)
/// length, and wrapping circularly — preserving short-range dependence
/// (volatility clustering) while yielding a stationary output distribution.
pub struct StationaryBlockResampler {
    mean_block_length: u32,
}

impl StationaryBlockResampler {
    pub fn new(mean_block_length: u32) -> Result<Self, ResamplingError> {
        if mean_block_length == 0 {
            return Err(ResamplingError::InvalidBlockLength(mean_block_length));
        }
        Ok(StationaryBlockResampler { mean_block_length })
    }

    pub fn resample<T: Copy, R: Rng + ?Sized>(
        &self,
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
        let m = src.len();
        let restart_probability = 1.0 / self.mean_block_length as f64;

        dst.clear();
        dst.reserve(n);
        let mut pos = rng.gen_range(0..m);
        dst.push(src[pos]);
        for _ in 1..n {
            if rng.gen::<f64>() < restart_probability {
                pos = rng.gen_range(0..m);
            } else {
                pos = (pos + 1) % m;
            }
            dst.push(src[pos]);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn rejects_zero_block_length() {
        assert!(matches!(
            StationaryBlockResampler::new(0),
            Err(ResamplingError::InvalidBlockLength(0))
        ));
    }

    #[test]
    fn output_only_contains_source_values_and_wraps() {
        let src = vec![1, 2, 3, 4, 5];
        let resampler = StationaryBlockResampler::new(2).unwrap();
        let mut dst = Vec::new();
        let mut rng = Pcg64::seed_from_u64(7);
        resampler.resample(&src, &mut dst, 1000, &mut rng).unwrap();
        assert_eq!(dst.len(), 1000);
        assert!(dst.iter().all(|v| src.contains(v)));
    }

    #[test]
    fn single_element_source_is_deterministic() {
        let src = vec![42];
        let resampler = StationaryBlockResampler::new(3).unwrap();
        let mut dst = Vec::new();
        let mut rng = Pcg64::seed_from_u64(1);
        resampler.resample(&src, &mut dst, 10, &mut rng).unwrap();
        assert_eq!(dst, vec![42; 10]);
    }
}
