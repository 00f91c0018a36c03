use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// CSV log of accuracy measurements, one row per evaluation.
///
/// ```text
/// "Training Data Accuracy","Testing Data Accuracy"
/// "0.102350","0.098000"
/// ```
///
/// Values are fractions in [0, 1]. The test column is left empty when no
/// test set was supplied.
pub struct AccuracyLog<W: Write = BufWriter<File>> {
    writer: W,
}

impl AccuracyLog<BufWriter<File>> {
    /// Creates (or truncates) the CSV file at `path` and writes the header.
    pub fn create(path: &Path) -> io::Result<Self> {
        AccuracyLog::from_writer(BufWriter::new(File::create(path)?))
    }
}

impl<W: Write> AccuracyLog<W> {
    pub fn from_writer(mut writer: W) -> io::Result<Self> {
        writeln!(writer, "\"Training Data Accuracy\",\"Testing Data Accuracy\"")?;
        Ok(AccuracyLog { writer })
    }

    pub fn record(&mut self, training: f64, test: Option<f64>) -> io::Result<()> {
        let test = test.map(|t| format!("{:.6}", t)).unwrap_or_default();
        writeln!(self.writer, "\"{:.6}\",\"{}\"", training, test)?;
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_rows() {
        let mut log = AccuracyLog::from_writer(Vec::new()).unwrap();
        log.record(0.5, Some(0.25)).unwrap();
        log.record(1.0, None).unwrap();
        let text = String::from_utf8(log.into_inner()).unwrap();
        assert_eq!(
            text,
            "\"Training Data Accuracy\",\"Testing Data Accuracy\"\n\
             \"0.500000\",\"0.250000\"\n\
             \"1.000000\",\"\"\n"
        );
    }
}
