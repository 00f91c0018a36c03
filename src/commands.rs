use std::error::Error;
use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::config::RunConfig;
use crate::data::{load_mnist, Dataset, Split};
use crate::error::NetworkError;
use crate::network::{Network, ParameterExport};
use crate::train::{accuracy, train_loop, AccuracyLog, Trainer, TrainingReport};

/// Loads both MNIST splits, trains a freshly initialized network and writes
/// its parameters to `config.weights_out`.
///
/// One RNG seeds initialization and then drives shuffling.
pub fn run_train(config: &RunConfig) -> Result<TrainingReport, Box<dyn Error>> {
    config.validate()?;

    let train_set = load_mnist(&config.data_dir, Split::Training)?;
    let test_set = load_mnist(&config.data_dir, Split::Test)?;
    if test_set.input_len() != train_set.input_len() {
        return Err(NetworkError::config(format!(
            "training images have {} pixels but test images have {}",
            train_set.input_len(),
            test_set.input_len()
        ))
        .into());
    }

    let shape = config.shape_for(train_set.input_len())?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut network = Network::random(shape, &mut rng);
    let mut trainer = Trainer::new(rng);
    info!(
        shape = %shape,
        epochs = config.epochs,
        mini_batch_size = config.mini_batch_size,
        learning_rate = config.learning_rate,
        "starting training"
    );

    let mut log = match &config.accuracy_log {
        Some(path) => Some(AccuracyLog::create(path)?),
        None => None,
    };
    let report = train_loop(
        &mut network,
        &mut trainer,
        &train_set,
        Some(&test_set),
        &config.train_config(),
        log.as_mut(),
    )?;

    network.export()?.save_json(&config.weights_out)?;
    info!(path = %config.weights_out.display(), "saved weights and biases");
    Ok(report)
}

/// Loads exported parameters and measures accuracy on the MNIST test split.
pub fn run_evaluate(weights: &Path, data_dir: &Path) -> Result<f64, Box<dyn Error>> {
    let network = ParameterExport::load_json(weights)?.into_network()?;
    let test_set = load_mnist(data_dir, Split::Test)?;
    let acc = accuracy(&network, &test_set)?;
    info!(
        shape = %network.shape(),
        samples = test_set.sample_count(),
        accuracy = %format!("{:.2}%", acc * 100.0),
        "evaluated"
    );
    Ok(acc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::idx::tests::{image_file, label_file};
    use std::path::PathBuf;

    fn write_split(dir: &Path, split: Split, count: u32, labels: &[u8]) {
        let (images, label_name) = split.file_names();
        std::fs::write(dir.join(images), image_file(count, 2, 2, false)).unwrap();
        std::fs::write(dir.join(label_name), label_file(labels, false)).unwrap();
    }

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ferrite-digits-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn train_then_evaluate_on_tiny_idx_files() {
        let dir = scratch("commands");
        write_split(&dir, Split::Training, 6, &[0, 1, 2, 0, 1, 2]);
        write_split(&dir, Split::Test, 3, &[2, 1, 0]);

        let config = RunConfig {
            data_dir: dir.clone(),
            hidden_neurons: 4,
            output_neurons: 3,
            epochs: 2,
            mini_batch_size: 4,
            learning_rate: 0.5,
            seed: Some(3),
            accuracy_log: Some(dir.join("Error.csv")),
            weights_out: dir.join("weights.json"),
            ..RunConfig::default()
        };
        let report = run_train(&config).unwrap();
        assert_eq!(report.epochs.len(), 2);
        assert!(report.final_test_accuracy.is_some());

        let csv = std::fs::read_to_string(dir.join("Error.csv")).unwrap();
        assert!(csv.starts_with("\"Training Data Accuracy\",\"Testing Data Accuracy\""));
        // Header, initial, then one row per epoch.
        assert_eq!(csv.lines().count(), 4);

        let acc = run_evaluate(&dir.join("weights.json"), &dir).unwrap();
        assert_eq!(Some(acc), report.final_test_accuracy);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn contradicting_input_width_is_rejected() {
        let dir = scratch("commands-width");
        write_split(&dir, Split::Training, 2, &[0, 1]);
        write_split(&dir, Split::Test, 1, &[0]);

        let config = RunConfig {
            data_dir: dir.clone(),
            input_neurons: Some(785),
            accuracy_log: None,
            weights_out: dir.join("unused.json"),
            ..RunConfig::default()
        };
        let err = run_train(&config).unwrap_err();
        std::fs::remove_dir_all(&dir).ok();
        assert!(err.to_string().contains("input_neurons"));
    }

    #[test]
    fn missing_data_reports_the_path() {
        let config = RunConfig {
            data_dir: PathBuf::from("/nonexistent/ferrite-digits"),
            ..RunConfig::default()
        };
        let err = run_train(&config).unwrap_err();
        assert!(err.to_string().contains("train-images.idx3-ubyte"));
    }
}
