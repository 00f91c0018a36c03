pub mod dataset;
pub mod idx;
pub mod mnist;

pub use dataset::{Dataset, InMemoryDataset, Sample};
pub use idx::DataError;
pub use mnist::{load_mnist, Split};
