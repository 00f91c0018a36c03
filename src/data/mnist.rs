use std::path::Path;

use tracing::info;

use crate::data::dataset::{Dataset, InMemoryDataset};
use crate::data::idx::{load_idx_pair, DataError};

/// Which half of the MNIST distribution to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    Training,
    Test,
}

impl Split {
    /// `(images, labels)` file names as distributed.
    pub fn file_names(self) -> (&'static str, &'static str) {
        match self {
            Split::Training => ("train-images.idx3-ubyte", "train-labels.idx1-ubyte"),
            Split::Test => ("t10k-images.idx3-ubyte", "t10k-labels.idx1-ubyte"),
        }
    }
}

/// Loads one MNIST split from `dir`.
pub fn load_mnist(dir: &Path, split: Split) -> Result<InMemoryDataset, DataError> {
    let (images, labels) = split.file_names();
    let dataset = load_idx_pair(&dir.join(images), &dir.join(labels))?;
    info!(
        split = ?split,
        samples = dataset.sample_count(),
        input_len = dataset.input_len(),
        "loaded MNIST"
    );
    Ok(dataset)
}
