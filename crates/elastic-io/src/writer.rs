//! JSON result writer for training and evaluation outputs.

use std::fs;
use std::path::{Path, PathBuf};

use elastic_nn::{TestResult, TrainResult};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::domain::{ExperimentName, LabelMap};
use crate::IoError;

/// Writes training and evaluation results to JSON files.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are named `{experiment}_{classifier}_train.json` and
/// `{experiment}_{classifier}_test.json`. Each file carries the raw class labels so
/// dense prediction indices can be mapped back.
pub struct ResultWriter {
    output_dir: PathBuf,
    experiment: ExperimentName,
}

impl ResultWriter {
    /// Create a new writer targeting the given directory and experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), experiment = %experiment))]
    pub fn new(output_dir: &Path, experiment: ExperimentName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            experiment,
        })
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path of the file written for `classifier` and `stage` (`train` or `test`).
    #[must_use]
    pub fn path_for(&self, classifier: &str, stage: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_{classifier}_{stage}.json", self.experiment.as_str()))
    }

    /// Write a training result to `{experiment}_{classifier}_train.json`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::Serialize`] | The result cannot be encoded |
    /// | [`IoError::WriteFile`] | The file cannot be written |
    #[instrument(skip_all, fields(classifier = %result.classifier))]
    pub fn write_train(&self, result: &TrainResult, labels: &LabelMap) -> Result<PathBuf, IoError> {
        let path = self.path_for(&result.classifier, "train");
        let artifact = Artifact {
            experiment: self.experiment.as_str(),
            labels: raw_labels(labels),
            result,
        };
        write_json(&path, &artifact)?;
        info!(path = %path.display(), accuracy = result.accuracy, "train result written");
        Ok(path)
    }

    /// Write an evaluation result to `{experiment}_{classifier}_test.json`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::Serialize`] | The result cannot be encoded |
    /// | [`IoError::WriteFile`] | The file cannot be written |
    #[instrument(skip_all, fields(classifier = classifier))]
    pub fn write_test(
        &self,
        classifier: &str,
        result: &TestResult,
        labels: &LabelMap,
    ) -> Result<PathBuf, IoError> {
        let path = self.path_for(classifier, "test");
        let artifact = Artifact {
            experiment: self.experiment.as_str(),
            labels: raw_labels(labels),
            result: &TestArtifact { classifier, result },
        };
        write_json(&path, &artifact)?;
        info!(path = %path.display(), accuracy = result.accuracy, "test result written");
        Ok(path)
    }
}

fn raw_labels(labels: &LabelMap) -> Vec<&str> {
    (0..labels.len()).filter_map(|i| labels.raw(i)).collect()
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), IoError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| IoError::Serialize {
        path: path.to_path_buf(),
        source: e,
    })?;
    fs::write(path, json).map_err(|e| IoError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })
}

// --- Shadow structs for JSON serialization ---

#[derive(Serialize)]
struct Artifact<'a, T: Serialize> {
    experiment: &'a str,
    labels: Vec<&'a str>,
    #[serde(flatten)]
    result: &'a T,
}

#[derive(Serialize)]
struct TestArtifact<'a> {
    classifier: &'a str,
    #[serde(flatten)]
    result: &'a TestResult,
}

#[cfg(test)]
mod tests {
    use super::*;
    use elastic_dist::{Measure, Sequence};
    use elastic_nn::{ClassifierConfig, Dataset};
    use tempfile::TempDir;

    fn data() -> Dataset {
        Dataset::from_sequences(vec![
            Sequence::new(vec![0.0, 1.0, 0.0], 0).unwrap(),
            Sequence::new(vec![0.0, 1.1, 0.0], 0).unwrap(),
            Sequence::new(vec![5.0, 4.0, 5.0], 1).unwrap(),
            Sequence::new(vec![5.0, 4.2, 5.0], 1).unwrap(),
        ])
    }

    fn labels() -> LabelMap {
        let mut m = LabelMap::new();
        m.intern("low");
        m.intern("high");
        m
    }

    fn read(path: &Path) -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn write_train_and_test_json() {
        let dir = TempDir::new().unwrap();
        let writer = ResultWriter::new(dir.path(), ExperimentName::new("run_1".into()).unwrap()).unwrap();
        let mut classifier = ClassifierConfig::new(Measure::Dtw).build();
        let trained = classifier.train("toy", &data()).unwrap();
        let tested = classifier.evaluate(&data()).unwrap();

        let train_path = writer.write_train(&trained, &labels()).unwrap();
        assert_eq!(train_path, dir.path().join("run_1_dtw-eap-incremental_train.json"));
        let train_json = read(&train_path);
        assert_eq!(train_json["experiment"], "run_1");
        assert_eq!(train_json["labels"][1], "high");
        assert_eq!(train_json["problem"], "toy");
        assert_eq!(train_json["param_accuracies"].as_array().unwrap().len(), 100);

        let test_path = writer.write_test(&trained.classifier, &tested, &labels()).unwrap();
        let test_json = read(&test_path);
        assert_eq!(test_json["classifier"], "dtw-eap-incremental");
        assert_eq!(test_json["size"], 4);
        assert!(test_json["confusion"]["matrix"].is_array());
    }

    #[test]
    fn creates_nested_output_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let writer = ResultWriter::new(&nested, ExperimentName::new("x".into()).unwrap()).unwrap();
        assert!(nested.is_dir());
        assert_eq!(writer.output_dir(), nested.as_path());
    }
}
