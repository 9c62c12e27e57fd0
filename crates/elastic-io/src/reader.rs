//! UCR archive reader: one labelled series per row.

use std::path::{Path, PathBuf};

use elastic_dist::{Sequence, mean_std, z_normalize_sequence};
use elastic_nn::Dataset;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, instrument, warn};

use crate::domain::{LabelMap, UcrSplit};
use crate::IoError;

/// Half-width of the uniform noise that replaces missing cells.
pub const MISSING_NOISE: f64 = 1e-3;

/// Reads UCR-format files: `label<TAB>v1<TAB>v2...` per row, no header.
///
/// Comma-separated files are accepted too; the delimiter is taken from the first row.
/// Rows may differ in length. Cells reading `NaN` (any case), `?` or nothing are missing
/// and are replaced by small uniform noise from a seeded generator, so a given seed
/// always yields the same data. Optionally each series is z-normalised afterwards.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed record |
/// | [`IoError::EmptyDataset`] | No data rows |
/// | [`IoError::EmptyRow`] | A row has a label but no values |
/// | [`IoError::InvalidValue`] | A cell is infinite or unparseable |
/// | [`IoError::InvalidDataset`] | The sequences do not form a dataset |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UcrReader {
    seed: u64,
    normalize: bool,
}

impl Default for UcrReader {
    fn default() -> Self {
        Self::new()
    }
}

impl UcrReader {
    /// A reader with seed `0` and no normalisation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            seed: 0,
            normalize: false,
        }
    }

    /// Seed for the noise that fills missing cells.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Z-normalise every series after loading.
    #[must_use]
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn normalize(&self) -> bool {
        self.normalize
    }

    /// Read a train/test pair whose labels are remapped jointly, train file first.
    #[instrument(skip_all, fields(train = %train.display(), test = %test.display()))]
    pub fn read_split(&self, train: &Path, test: &Path) -> Result<UcrSplit, IoError> {
        let mut labels = LabelMap::new();
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let train_seqs = self.read_sequences(train, &mut labels, &mut rng)?;
        let test_seqs = self.read_sequences(test, &mut labels, &mut rng)?;
        let n_classes = labels.len();

        let train = dataset(train, train_seqs, n_classes)?;
        let test = dataset(test, test_seqs, n_classes)?;
        info!(
            n_train = train.len(),
            n_test = test.len(),
            n_classes,
            max_len = train.max_len(),
            "split loaded"
        );
        Ok(UcrSplit { train, test, labels })
    }

    /// Read a single file with its own label mapping.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn read(&self, path: &Path) -> Result<(Dataset, LabelMap), IoError> {
        let mut labels = LabelMap::new();
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let sequences = self.read_sequences(path, &mut labels, &mut rng)?;
        let data = dataset(path, sequences, labels.len())?;
        info!(n = data.len(), n_classes = data.n_classes(), "dataset loaded");
        Ok((data, labels))
    }

    fn read_sequences(
        &self,
        path: &Path,
        labels: &mut LabelMap,
        rng: &mut ChaCha8Rng,
    ) -> Result<Vec<Sequence>, IoError> {
        let content = std::fs::read_to_string(path).map_err(|e| IoError::FileNotFound {
            path: path.to_path_buf(),
            source: e,
        })?;
        let delimiter = detect_delimiter(&content);
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let mut sequences = Vec::new();
        let mut missing = 0usize;
        let mut constant = 0usize;

        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| IoError::CsvParse {
                path: path.to_path_buf(),
                offset: e.position().map_or(0, |p| p.byte()),
                source: e,
            })?;
            let Some(raw_label) = record.get(0) else { continue };
            let label = labels.intern(raw_label);

            let mut values = Vec::with_capacity(record.len().saturating_sub(1));
            for (col_index, raw) in record.iter().skip(1).enumerate() {
                match parse_cell(raw) {
                    Some(Cell::Value(v)) => values.push(v),
                    Some(Cell::Missing) => {
                        missing += 1;
                        values.push(rng.gen_range(-MISSING_NOISE..MISSING_NOISE));
                    }
                    None => {
                        return Err(IoError::InvalidValue {
                            path: path.to_path_buf(),
                            row_index,
                            col_index,
                            raw: raw.to_owned(),
                        });
                    }
                }
            }
            if values.is_empty() {
                return Err(IoError::EmptyRow {
                    path: path.to_path_buf(),
                    row_index,
                });
            }

            let sequence = Sequence::new(values, label).map_err(|_| IoError::EmptyRow {
                path: path.to_path_buf(),
                row_index,
            })?;
            let sequence = if self.normalize {
                z_normalize_sequence(&sequence).or_else(|_| {
                    constant += 1;
                    centred(&sequence, path, row_index)
                })?
            } else {
                sequence
            };
            sequences.push(sequence);
        }

        if sequences.is_empty() {
            return Err(IoError::EmptyDataset {
                path: path.to_path_buf(),
            });
        }
        if missing > 0 {
            debug!(missing, "filled missing cells with noise");
        }
        if constant > 0 {
            warn!(constant, path = %path.display(), "constant series centred instead of normalised");
        }
        Ok(sequences)
    }
}

enum Cell {
    Value(f64),
    Missing,
}

fn parse_cell(raw: &str) -> Option<Cell> {
    if raw.is_empty() || raw == "?" || raw.eq_ignore_ascii_case("nan") {
        return Some(Cell::Missing);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_nan() => Some(Cell::Missing),
        Ok(v) if v.is_finite() => Some(Cell::Value(v)),
        _ => None,
    }
}

/// Tab if the first row contains one, comma otherwise.
fn detect_delimiter(content: &str) -> u8 {
    let first = content.lines().find(|l| !l.trim().is_empty()).unwrap_or_default();
    if first.contains('\t') { b'\t' } else { b',' }
}

/// A constant series shifted to zero mean.
fn centred(sequence: &Sequence, path: &Path, row_index: usize) -> Result<Sequence, IoError> {
    let (mean, _) = mean_std(sequence.values());
    let values = sequence.values().iter().map(|v| v - mean).collect();
    Sequence::new(values, sequence.label()).map_err(|_| IoError::EmptyRow {
        path: path.to_path_buf(),
        row_index,
    })
}

fn dataset(path: &Path, sequences: Vec<Sequence>, n_classes: usize) -> Result<Dataset, IoError> {
    Dataset::new(sequences, n_classes).map_err(|source| IoError::InvalidDataset {
        path: PathBuf::from(path),
        source,
    })
}
