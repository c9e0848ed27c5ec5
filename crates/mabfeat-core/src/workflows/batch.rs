use crate::core::discover;
use crate::pipeline::config::PipelineConfig;
use crate::pipeline::error::PipelineError;
use crate::pipeline::progress::{Progress, ProgressReporter};
use crate::pipeline::record::FileRecord;
use crate::pipeline::stages::Stages;
use crate::pipeline::task::FileTask;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// How the orchestrator retrieves finished per-file tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollectionMode {
    /// Block once for the whole batch; records keep input order.
    #[default]
    Collect,
    /// Drain tasks as each one completes; records are in completion order.
    Streaming,
}

/// Runs the full batch: resolve the input, fan one task per file out onto
/// the thread pool, and collect every record.
///
/// Per-file failures degrade to partial or empty records; the only errors
/// that escape are an invalid input path and I/O failures during discovery.
#[instrument(skip_all, name = "batch_workflow")]
pub fn run(
    input: &Path,
    config: &PipelineConfig,
    mode: CollectionMode,
    reporter: &ProgressReporter,
) -> Result<Vec<FileRecord>, PipelineError> {
    let stages = Stages::from_config(config);
    run_with_stages(input, config, mode, reporter, &stages)
}

/// As [`run`], but with caller-supplied stage implementations.
pub fn run_with_stages(
    input: &Path,
    config: &PipelineConfig,
    mode: CollectionMode,
    reporter: &ProgressReporter,
    stages: &Stages,
) -> Result<Vec<FileRecord>, PipelineError> {
    let files = discover::resolve_input(input)?;
    info!(num_files = files.len(), "Resolved input files.");
    reporter.report(Progress::BatchStart {
        total_files: files.len() as u64,
    });

    let task = FileTask::new(
        stages.repairer.as_ref(),
        stages.annotator.as_ref(),
        stages.featurizer.as_ref(),
        config.repeats,
        config.ph,
    );

    let records = match mode {
        CollectionMode::Collect => collect_all(&files, &task, reporter),
        CollectionMode::Streaming => collect_streaming(&files, &task, reporter),
    };

    reporter.report(Progress::BatchFinish);
    info!(num_records = records.len(), "Batch complete.");
    Ok(records)
}

fn report_finished(reporter: &ProgressReporter, record: &FileRecord) {
    reporter.report(Progress::FileFinished {
        path: record.path.clone(),
        kept_repeats: record.features.len(),
    });
}

#[cfg(feature = "parallel")]
fn collect_all(
    files: &[PathBuf],
    task: &FileTask,
    reporter: &ProgressReporter,
) -> Vec<FileRecord> {
    files
        .par_iter()
        .map(|path| {
            let record = task.process(path);
            report_finished(reporter, &record);
            record
        })
        .collect()
}

#[cfg(feature = "parallel")]
fn collect_streaming(
    files: &[PathBuf],
    task: &FileTask,
    reporter: &ProgressReporter,
) -> Vec<FileRecord> {
    let (sender, receiver) = std::sync::mpsc::channel();
    let mut records = Vec::with_capacity(files.len());

    rayon::in_place_scope(|scope| {
        for path in files {
            let sender = sender.clone();
            scope.spawn(move |_| {
                let record = task.process(path);
                // The receiver outlives the scope; a send can only fail if
                // collection already stopped, and then the record is moot.
                let _ = sender.send(record);
            });
        }
        drop(sender);

        for record in receiver.iter() {
            report_finished(reporter, &record);
            records.push(record);
        }
    });

    records
}

#[cfg(not(feature = "parallel"))]
fn collect_all(
    files: &[PathBuf],
    task: &FileTask,
    reporter: &ProgressReporter,
) -> Vec<FileRecord> {
    files
        .iter()
        .map(|path| {
            let record = task.process(path);
            report_finished(reporter, &record);
            record
        })
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn collect_streaming(
    files: &[PathBuf],
    task: &FileTask,
    reporter: &ProgressReporter,
) -> Vec<FileRecord> {
    collect_all(files, task, reporter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::artifact::TempArtifact;
    use crate::pipeline::config::PipelineConfigBuilder;
    use crate::pipeline::record::FeatureMap;
    use crate::pipeline::stages::{Annotate, CHARGE_ASYMMETRY_KEY, Featurize, Repair};
    use std::collections::HashSet;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::tempdir;

    struct StubRepair {
        reject_marker: Option<&'static str>,
    }

    impl Repair for StubRepair {
        fn repair(&self, input: &Path, _ph: f64) -> Result<TempArtifact, PipelineError> {
            if let Some(marker) = self.reject_marker {
                if input.to_string_lossy().contains(marker) {
                    return Err(PipelineError::Structure {
                        path: input.to_path_buf(),
                        details: "unreadable coordinates".to_string(),
                    });
                }
            }
            Ok(TempArtifact::allocate(".pdb")?)
        }
    }

    struct StubAnnotator;

    impl Annotate for StubAnnotator {
        fn annotate(&self, _input: &Path) -> Option<TempArtifact> {
            TempArtifact::allocate("_annotated.pdb").ok()
        }
    }

    struct StubFeaturizer;

    impl Featurize for StubFeaturizer {
        fn featurize(&self, _input: &Path) -> Result<FeatureMap, PipelineError> {
            let mut map = FeatureMap::new();
            map.insert(CHARGE_ASYMMETRY_KEY.to_string(), 0.5);
            Ok(map)
        }
    }

    fn stub_stages(reject_marker: Option<&'static str>) -> Stages {
        Stages::new(
            Box::new(StubRepair { reject_marker }),
            Box::new(StubAnnotator),
            Box::new(StubFeaturizer),
        )
    }

    fn config(repeats: usize) -> PipelineConfig {
        PipelineConfigBuilder::new()
            .repeats(repeats)
            .repair_command(vec!["unused".to_string()])
            .annotator_command(vec!["unused".to_string()])
            .feature_command(vec!["unused".to_string()])
            .build()
            .unwrap()
    }

    fn write_batch(names: &[&str]) -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        for name in names {
            fs::write(dir.path().join(name), b"END\n").unwrap();
        }
        dir
    }

    #[test]
    fn batch_of_three_files_with_two_repeats() {
        let dir = write_batch(&["a.pdb", "b.pdb", "c.pdb"]);
        let reporter = ProgressReporter::new();

        let records = run_with_stages(
            dir.path(),
            &config(2),
            CollectionMode::Collect,
            &reporter,
            &stub_stages(None),
        )
        .unwrap();

        assert_eq!(records.len(), 3);
        let names: HashSet<_> = records
            .iter()
            .map(|r| r.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(
            names,
            HashSet::from(["a.pdb".to_string(), "b.pdb".to_string(), "c.pdb".to_string()])
        );
        for record in &records {
            assert_eq!(record.features.len(), 2);
        }
    }

    #[test]
    fn collect_mode_preserves_input_order() {
        let dir = write_batch(&["a.pdb", "b.pdb", "c.pdb", "d.pdb"]);
        let files = discover::resolve_input(dir.path()).unwrap();
        let reporter = ProgressReporter::new();

        let records = run_with_stages(
            dir.path(),
            &config(1),
            CollectionMode::Collect,
            &reporter,
            &stub_stages(None),
        )
        .unwrap();

        let record_paths: Vec<_> = records.iter().map(|r| r.path.clone()).collect();
        assert_eq!(record_paths, files);
    }

    #[test]
    fn streaming_mode_returns_every_record() {
        let dir = write_batch(&["a.pdb", "b.pdb", "c.pdb"]);
        let reporter = ProgressReporter::new();

        let records = run_with_stages(
            dir.path(),
            &config(1),
            CollectionMode::Streaming,
            &reporter,
            &stub_stages(None),
        )
        .unwrap();

        assert_eq!(records.len(), 3);
        let unique: HashSet<_> = records.iter().map(|r| r.path.clone()).collect();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn malformed_file_is_isolated_from_the_batch() {
        let dir = write_batch(&["good.pdb", "malformed.pdb"]);
        let reporter = ProgressReporter::new();

        let records = run_with_stages(
            dir.path(),
            &config(2),
            CollectionMode::Collect,
            &reporter,
            &stub_stages(Some("malformed")),
        )
        .unwrap();

        assert_eq!(records.len(), 2);
        for record in &records {
            if record.path.to_string_lossy().contains("malformed") {
                assert!(record.features.is_empty());
            } else {
                assert_eq!(record.features.len(), 2);
            }
        }
    }

    #[test]
    fn invalid_input_aborts_before_any_task() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("input.txt");
        fs::write(&input, b"not a structure").unwrap();
        let reporter = ProgressReporter::new();

        let result = run_with_stages(
            &input,
            &config(1),
            CollectionMode::Collect,
            &reporter,
            &stub_stages(None),
        );

        assert!(matches!(result, Err(PipelineError::InvalidInput { .. })));
    }

    #[test]
    fn progress_events_cover_the_whole_batch() {
        let dir = write_batch(&["a.pdb", "b.pdb"]);
        let events = Mutex::new(Vec::new());
        let capturing = ProgressReporter::with_callback(Box::new(|event: Progress| {
            events.lock().unwrap().push(event);
        }));

        run_with_stages(
            dir.path(),
            &config(1),
            CollectionMode::Streaming,
            &capturing,
            &stub_stages(None),
        )
        .unwrap();

        drop(capturing);
        let events = events.into_inner().unwrap();
        assert!(matches!(
            events.first(),
            Some(Progress::BatchStart { total_files: 2 })
        ));
        assert!(matches!(events.last(), Some(Progress::BatchFinish)));
        let finished = events
            .iter()
            .filter(|e| matches!(e, Progress::FileFinished { .. }))
            .count();
        assert_eq!(finished, 2);
    }
}
