/// Window applied by the audio subsystem before its frequency transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WindowKind {
    Rectangular,
    Hann,
    Hamming,
    #[default]
    Blackman,
    BlackmanHarris,
}

/// Fixed-size magnitude buffer, overwritten in place every tick.
#[derive(Clone, Debug)]
pub struct SpectrumFrame {
    bins: Vec<f32>,
}

impl SpectrumFrame {
    /// Allocates `size` zeroed bins. A zero size is bumped to one bin.
    pub fn new(size: usize) -> Self {
        Self {
            bins: vec![0.0; size.max(1)],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.bins
    }

    /// Slice handed to the audio sink for filling. Length never changes.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.bins
    }

    pub fn clear(&mut self) {
        self.bins.iter_mut().for_each(|b| *b = 0.0);
    }

    /// Arithmetic mean of all bins.
    pub fn energy(&self) -> f32 {
        extract_energy(&self.bins)
    }
}

/// Mean magnitude of a spectrum. Empty input reads as silence.
pub fn extract_energy(bins: &[f32]) -> f32 {
    if bins.is_empty() {
        return 0.0;
    }
    let sum: f32 = bins.iter().sum();
    sum / bins.len() as f32
}
