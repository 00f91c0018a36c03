use crate::error::NetworkError;

/// One labelled sample borrowed from a dataset.
#[derive(Debug, Clone, Copy)]
pub struct Sample<'a> {
    /// Pixel intensities normalized to [0, 1].
    pub pixels: &'a [f32],
    pub label: usize,
}

/// Read-only source of labelled samples with a fixed input width.
pub trait Dataset {
    fn sample_count(&self) -> usize;

    /// Length of every sample's pixel vector.
    fn input_len(&self) -> usize;

    fn sample(&self, index: usize) -> Result<Sample<'_>, NetworkError>;

    fn is_empty(&self) -> bool {
        self.sample_count() == 0
    }
}

/// Dataset held fully in memory: a flat pixel buffer plus one label per sample.
#[derive(Debug, Clone, PartialEq)]
pub struct InMemoryDataset {
    input_len: usize,
    pixels: Vec<f32>,
    labels: Vec<u8>,
}

impl InMemoryDataset {
    /// `pixels` holds `labels.len()` consecutive vectors of `input_len` values.
    pub fn new(input_len: usize, pixels: Vec<f32>, labels: Vec<u8>) -> Result<Self, NetworkError> {
        if input_len == 0 {
            return Err(NetworkError::config("samples need at least one input value"));
        }
        let expected = labels.len() * input_len;
        if pixels.len() != expected {
            return Err(NetworkError::ShapeMismatch { expected, actual: pixels.len() });
        }
        Ok(InMemoryDataset { input_len, pixels, labels })
    }

    /// Builds a dataset from `(pixels, label)` pairs that all share one width.
    pub fn from_samples(samples: &[(Vec<f32>, u8)]) -> Result<Self, NetworkError> {
        let input_len = samples.first().map(|(p, _)| p.len()).unwrap_or(1);
        let mut pixels = Vec::with_capacity(samples.len() * input_len);
        let mut labels = Vec::with_capacity(samples.len());
        for (p, label) in samples {
            if p.len() != input_len {
                return Err(NetworkError::ShapeMismatch { expected: input_len, actual: p.len() });
            }
            pixels.extend_from_slice(p);
            labels.push(*label);
        }
        InMemoryDataset::new(input_len, pixels, labels)
    }

    /// Largest label present plus one, or zero for an empty dataset.
    pub fn class_count(&self) -> usize {
        self.labels.iter().max().map(|&m| m as usize + 1).unwrap_or(0)
    }

    pub fn labels(&self) -> &[u8] {
        &self.labels
    }
}

impl Dataset for InMemoryDataset {
    fn sample_count(&self) -> usize {
        self.labels.len()
    }

    fn input_len(&self) -> usize {
        self.input_len
    }

    fn sample(&self, index: usize) -> Result<Sample<'_>, NetworkError> {
        let label = *self.labels.get(index).ok_or(NetworkError::SampleOutOfRange {
            index,
            len: self.labels.len(),
        })?;
        let start = index * self.input_len;
        Ok(Sample {
            pixels: &self.pixels[start..start + self.input_len],
            label: label as usize,
        })
    }
}
