use std::io::Write;
use std::sync::atomic::Ordering;
use std::time::Instant;

use rand::Rng;
use tracing::{info, warn};

use crate::data::dataset::Dataset;
use crate::error::NetworkError;
use crate::network::Network;
use crate::train::accuracy::accuracy;
use crate::train::accuracy_log::AccuracyLog;
use crate::train::epoch_stats::{EpochStats, TrainingReport};
use crate::train::train_config::TrainConfig;
use crate::train::trainer::Trainer;

/// Trains `network` for `config.epochs` epochs.
///
/// With `config.report_accuracy`, training and test accuracy are measured
/// before the first epoch and after each one; every measurement is logged
/// and, if `log` is given, appended to the CSV. The final accuracy is always
/// reported; it is measured and written to the CSV only when no per-epoch
/// measurement already covers the current parameters.
///
/// # Early termination
/// The loop ends early if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set (checked at every mini-batch boundary).
pub fn train_loop<D, R, W>(
    network: &mut Network,
    trainer: &mut Trainer<R>,
    train_set: &D,
    test_set: Option<&D>,
    config: &TrainConfig,
    mut log: Option<&mut AccuracyLog<W>>,
) -> Result<TrainingReport, NetworkError>
where
    D: Dataset + ?Sized,
    R: Rng,
    W: Write,
{
    config.validate()?;
    if config.stop_flag.is_some() {
        trainer.set_stop_flag(config.stop_flag.clone());
    }

    let started = Instant::now();
    let mut epochs = Vec::with_capacity(config.epochs);
    let mut stopped_early = false;
    // Accuracy of the current parameters, if already measured and logged.
    let mut latest = None;

    if config.report_accuracy {
        let (train_acc, test_acc) = measure(network, train_set, test_set)?;
        report("initial", train_acc, test_acc, log.as_deref_mut());
        latest = Some((train_acc, test_acc));
    }

    for epoch in 1..=config.epochs {
        if stop_requested(config) {
            stopped_early = true;
            break;
        }

        info!(epoch, total = config.epochs, "training epoch");
        let epoch_start = Instant::now();
        let summary = trainer.train(network, train_set, config.mini_batch_size, config.learning_rate)?;
        let elapsed_ms = epoch_start.elapsed().as_millis() as u64;

        if !summary.mean_cost.is_finite() {
            warn!(epoch, cost = summary.mean_cost, "mean cost is not finite; parameters may have diverged");
        }

        let (training_accuracy, test_accuracy) = if config.report_accuracy {
            let (train_acc, test_acc) = measure(network, train_set, test_set)?;
            report("epoch", train_acc, test_acc, log.as_deref_mut());
            latest = Some((train_acc, test_acc));
            (Some(train_acc), test_acc)
        } else {
            (None, None)
        };

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            batches: summary.batches,
            mean_cost: summary.mean_cost,
            training_accuracy,
            test_accuracy,
            elapsed_ms,
        };
        info!(epoch, batches = stats.batches, cost = stats.mean_cost, elapsed_ms, "epoch finished");
        epochs.push(stats.clone());

        if summary.cancelled {
            stopped_early = true;
            break;
        }

        if let Some(ref tx) = config.progress_tx {
            // If the receiver has been dropped, stop training.
            if tx.send(stats).is_err() {
                stopped_early = epoch < config.epochs;
                break;
            }
        }
    }

    let (final_training_accuracy, final_test_accuracy) = match latest {
        Some((train_acc, test_acc)) => {
            report::<W>("final", train_acc, test_acc, None);
            (train_acc, test_acc)
        }
        None => {
            let (train_acc, test_acc) = measure(network, train_set, test_set)?;
            report("final", train_acc, test_acc, log.as_deref_mut());
            (train_acc, test_acc)
        }
    };

    let elapsed_ms = started.elapsed().as_millis() as u64;
    info!(
        seconds = %format!("{:.2}", elapsed_ms as f64 / 1000.0),
        epochs = epochs.len(),
        "training finished"
    );

    Ok(TrainingReport {
        epochs,
        final_training_accuracy,
        final_test_accuracy,
        stopped_early,
        elapsed_ms,
    })
}

fn stop_requested(config: &TrainConfig) -> bool {
    config
        .stop_flag
        .as_ref()
        .map(|flag| flag.load(Ordering::Relaxed))
        .unwrap_or(false)
}

fn measure<D: Dataset + ?Sized>(
    network: &Network,
    train_set: &D,
    test_set: Option<&D>,
) -> Result<(f64, Option<f64>), NetworkError> {
    let train_acc = accuracy(network, train_set)?;
    let test_acc = test_set.map(|ds| accuracy(network, ds)).transpose()?;
    Ok((train_acc, test_acc))
}

fn report<W: Write>(stage: &str, train_acc: f64, test_acc: Option<f64>, log: Option<&mut AccuracyLog<W>>) {
    match test_acc {
        Some(test) => info!(
            stage,
            training = %format!("{:.2}%", train_acc * 100.0),
            test = %format!("{:.2}%", test * 100.0),
            "accuracy"
        ),
        None => info!(stage, training = %format!("{:.2}%", train_acc * 100.0), "accuracy"),
    }

    if let Some(log) = log {
        if let Err(e) = log.record(train_acc, test_acc) {
            warn!(error = %e, "could not append to accuracy log");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::sync::{mpsc, Arc};

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::data::InMemoryDataset;
    use crate::network::NetworkShape;

    fn separable() -> InMemoryDataset {
        InMemoryDataset::from_samples(&[
            (vec![0.0, 0.0], 0),
            (vec![0.2, 0.1], 0),
            (vec![1.0, 1.0], 1),
            (vec![0.8, 0.9], 1),
        ]).unwrap()
    }

    fn network() -> Network {
        Network::random(NetworkShape::new(2, 3, 2).unwrap(), &mut StdRng::seed_from_u64(21))
    }

    #[test]
    fn reports_every_epoch_and_logs_rows() {
        let ds = separable();
        let mut net = network();
        let mut trainer = Trainer::seeded(4);
        let (tx, rx) = mpsc::channel();
        let mut config = TrainConfig::new(3, 2, 1.0);
        config.progress_tx = Some(tx);
        let mut log = AccuracyLog::from_writer(Vec::new()).unwrap();

        let report = train_loop(&mut net, &mut trainer, &ds, Some(&ds), &config, Some(&mut log)).unwrap();

        assert_eq!(report.epochs.len(), 3);
        assert!(!report.stopped_early);
        assert_eq!(report.epochs[2].epoch, 3);
        assert_eq!(report.epochs[0].batches, 2);
        assert!(report.epochs.iter().all(|e| e.training_accuracy.is_some() && e.test_accuracy.is_some()));
        assert_eq!(rx.try_iter().count(), 3);

        // Header, initial, one row per epoch; the last epoch's row is final.
        let csv = String::from_utf8(log.into_inner()).unwrap();
        let rows: Vec<&str> = csv.lines().collect();
        assert_eq!(rows.len(), 5);
        let last_epoch = report.epochs[2].training_accuracy.unwrap();
        assert_eq!(report.final_training_accuracy, last_epoch);
        assert!(rows[4].starts_with(&format!("\"{:.6}\"", last_epoch)));
    }

    #[test]
    fn without_reporting_only_final_accuracy_is_measured() {
        let ds = separable();
        let mut net = network();
        let mut config = TrainConfig::new(2, 4, 1.0);
        config.report_accuracy = false;
        let mut log = AccuracyLog::from_writer(Vec::new()).unwrap();

        let report = train_loop(&mut net, &mut Trainer::seeded(0), &ds, None, &config, Some(&mut log)).unwrap();

        assert!(report.epochs.iter().all(|e| e.training_accuracy.is_none()));
        assert_eq!(report.final_test_accuracy, None);
        let csv = String::from_utf8(log.into_inner()).unwrap();
        assert_eq!(csv.lines().count(), 2);
    }

    #[test]
    fn dropped_receiver_ends_training() {
        let ds = separable();
        let mut net = network();
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut config = TrainConfig::new(10, 4, 1.0);
        config.progress_tx = Some(tx);

        let report = train_loop::<_, _, Vec<u8>>(&mut net, &mut Trainer::seeded(0), &ds, None, &config, None)
            .unwrap();
        assert_eq!(report.epochs.len(), 1);
        assert!(report.stopped_early);
    }

    #[test]
    fn stop_flag_prevents_training() {
        let ds = separable();
        let mut net = network();
        let before = net.hidden_weights().to_vec();
        let mut config = TrainConfig::new(5, 2, 1.0);
        config.stop_flag = Some(Arc::new(AtomicBool::new(true)));

        let report = train_loop::<_, _, Vec<u8>>(&mut net, &mut Trainer::seeded(0), &ds, None, &config, None)
            .unwrap();
        assert!(report.epochs.is_empty());
        assert!(report.stopped_early);
        assert_eq!(net.hidden_weights(), &before[..]);
    }

    #[test]
    fn initial_measurement_is_not_repeated_when_no_epoch_runs() {
        let ds = separable();
        let mut net = network();
        let mut config = TrainConfig::new(5, 2, 1.0);
        config.stop_flag = Some(Arc::new(AtomicBool::new(true)));
        let mut log = AccuracyLog::from_writer(Vec::new()).unwrap();

        train_loop(&mut net, &mut Trainer::seeded(0), &ds, Some(&ds), &config, Some(&mut log)).unwrap();
        let csv = String::from_utf8(log.into_inner()).unwrap();
        assert_eq!(csv.lines().count(), 2);
    }

    #[test]
    fn invalid_config_fails_before_measuring() {
        let ds = separable();
        let mut net = network();
        let config = TrainConfig::new(1, 0, 1.0);
        let err = train_loop::<_, _, Vec<u8>>(&mut net, &mut Trainer::seeded(0), &ds, None, &config, None)
            .unwrap_err();
        assert!(matches!(err, NetworkError::Config(_)));
    }
}
