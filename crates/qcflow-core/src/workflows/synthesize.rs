use super::load_template;
use crate::core::io::error::GeometryError;
use crate::core::io::format::read_geometry;
use crate::core::models::document::InputDocument;
use crate::core::models::geometry::MoleculeGeometry;
use crate::core::models::template::HeaderTemplate;
use crate::engine::cancel::CancellationToken;
use crate::engine::config::{BatchConfig, BatchPolicy};
use crate::engine::context::JobGroupContext;
use crate::engine::error::EngineError;
use crate::engine::fs::{ensure_dir, job_name, list_files};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::report::BatchReport;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// Count label for every input document written.
pub const WRITTEN_LABEL: &str = "input";

/// Synthesizes one input document per geometry file of the job group.
///
/// The header template and the molecule folder are checked before anything is written.
/// Geometry files are parsed on the worker pool; documents are written sequentially in
/// file-name order into the job input folder. Under [`BatchPolicy::Strict`] the batch
/// halts at the first file with an unsupported extension; under
/// [`BatchPolicy::Lenient`] such files are skipped.
///
/// # Errors
///
/// Returns an error if the template or the molecule folder is missing, the template is
/// invalid, or the input folder cannot be created. Per-file problems are reported in
/// the returned [`BatchReport`].
#[instrument(skip_all, name = "synthesis_workflow", fields(group = %context.job_group()))]
pub fn run(
    context: &JobGroupContext,
    batch: &BatchConfig,
    reporter: &ProgressReporter,
    cancel: &CancellationToken,
) -> Result<BatchReport, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Synthesizing inputs",
    });

    let template = load_template(context.header_path())?;
    let molecule_folder = context.molecule_folder();
    let files = list_files(&molecule_folder)?;
    info!(
        "Found {} geometry file(s) in {:?}.",
        files.len(),
        molecule_folder
    );

    let pool = batch.thread_pool()?;
    let parsed: Vec<(PathBuf, Result<MoleculeGeometry, GeometryError>)> = pool.install(|| {
        files
            .par_iter()
            .map(|path| (path.clone(), read_geometry(path)))
            .collect()
    });

    let output_folder = context.job_input_folder();
    ensure_dir(&output_folder)?;

    let mut report = BatchReport::new();
    reporter.report(Progress::TaskStart {
        total_files: parsed.len() as u64,
    });

    for (path, result) in parsed {
        if cancel.is_cancelled() {
            info!("Cancellation requested; stopping before {:?}.", path);
            report.cancelled = true;
            break;
        }

        let outcome = result
            .map_err(|e| EngineError::from_geometry(&path, e))
            .and_then(|geometry| {
                write_document(context, &template, &path, &geometry, &output_folder)
            });

        match outcome {
            Ok(()) => report.record(WRITTEN_LABEL),
            Err(e) => {
                if matches!(e, EngineError::UnsupportedFormat { .. }) {
                    warn!("{:?} is not a MOL or XYZ geometry file.", path);
                } else {
                    warn!("Failed to synthesize input for {:?}: {}", path, e);
                }
                match batch.policy {
                    BatchPolicy::Strict => {
                        reporter.report(Progress::Halted {
                            file: path.display().to_string(),
                            reason: e.to_string(),
                        });
                        report.halt(path, e);
                        break;
                    }
                    BatchPolicy::Lenient => {
                        reporter.report(Progress::FileSkipped {
                            file: path.display().to_string(),
                            reason: e.to_string(),
                        });
                        report.skip(path, e);
                    }
                }
            }
        }
        reporter.report(Progress::FileDone);
    }

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);
    info!(
        "Wrote {} input document(s) to {:?}.",
        report.count(WRITTEN_LABEL),
        output_folder
    );
    Ok(report)
}

fn write_document(
    context: &JobGroupContext,
    template: &HeaderTemplate,
    source: &Path,
    geometry: &MoleculeGeometry,
    output_folder: &Path,
) -> Result<(), EngineError> {
    let name = job_name(source).ok_or_else(|| EngineError::UnsupportedFormat {
        path: source.to_path_buf(),
    })?;
    if geometry.is_empty() {
        warn!("No atom records recognized in {:?}.", source);
    }
    let document = InputDocument::compose(template, context.checkpoint_prefix(), &name, geometry);
    let destination = output_folder.join(document.file_name());
    document
        .write_to_path(&destination)
        .map_err(|e| EngineError::io(&destination, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::context::JobGroupContextBuilder;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::{TempDir, tempdir};

    const WATER_XYZ: &str = "3\nwater\nO 0.0 0.0 0.1\nH 0.0 0.7 -0.4\nH 0.0 -0.7 -0.4\n";
    const METHANE_MOL: &str = "\
methane

  2  1  0  0  0  0  0  0  0  0999 V2000
    0.0000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
    0.6300    0.6300    0.6300 H   0  0  0  0  0  0  0  0  0  0  0  0
  1  2  1  0
M  END
";

    fn setup() -> (TempDir, JobGroupContext) {
        let dir = tempdir().unwrap();
        let header = dir.path().join("header_PM7");
        fs::write(&header, "%nproc=1\n%mem=1GB\nPLACEHOLDER\n# PM7 opt freq\n\ntitle\n\n0 1\n")
            .unwrap();
        let context = JobGroupContextBuilder::new()
            .method("PM7")
            .molecule("dyes")
            .sequence("dimer")
            .base_path(dir.path())
            .header_path(header)
            .checkpoint_prefix("%Chk=/x/")
            .build()
            .unwrap();
        fs::create_dir_all(context.molecule_folder()).unwrap();
        (dir, context)
    }

    fn run_batch(
        context: &JobGroupContext,
        batch: &BatchConfig,
    ) -> Result<BatchReport, EngineError> {
        run(
            context,
            batch,
            &ProgressReporter::new(),
            &CancellationToken::new(),
        )
    }

    #[test]
    fn writes_one_document_per_geometry_file() {
        let (_dir, context) = setup();
        fs::write(context.molecule_folder().join("water.xyz"), WATER_XYZ).unwrap();
        fs::write(context.molecule_folder().join("methane.mol"), METHANE_MOL).unwrap();

        let report = run_batch(&context, &BatchConfig::strict()).unwrap();

        assert!(report.is_complete());
        assert_eq!(report.count(WRITTEN_LABEL), 2);

        let water = fs::read_to_string(context.job_input_folder().join("water.gjf")).unwrap();
        let lines: Vec<_> = water.lines().collect();
        assert_eq!(lines.len(), 8 + 3 + 1);
        assert_eq!(lines[2], "%Chk=/x/water.chk");
        assert_eq!(lines[8], "O   0.0 0.0 0.1");
        assert_eq!(lines[11], "");

        let methane = fs::read_to_string(context.job_input_folder().join("methane.gjf")).unwrap();
        assert!(methane.contains("%Chk=/x/methane.chk\n"));
        assert!(methane.contains("C   0.0000    0.0000    0.0000\n"));
        assert!(methane.contains("H   0.6300    0.6300    0.6300\n"));
    }

    #[test]
    fn rerun_overwrites_documents_without_failing() {
        let (_dir, context) = setup();
        fs::write(context.molecule_folder().join("water.xyz"), WATER_XYZ).unwrap();

        run_batch(&context, &BatchConfig::strict()).unwrap();
        let report = run_batch(&context, &BatchConfig::strict()).unwrap();

        assert_eq!(report.count(WRITTEN_LABEL), 1);
        assert_eq!(fs::read_dir(context.job_input_folder()).unwrap().count(), 1);
    }

    #[test]
    fn strict_batch_halts_at_first_unsupported_file() {
        let (_dir, context) = setup();
        fs::write(context.molecule_folder().join("a.xyz"), WATER_XYZ).unwrap();
        fs::write(context.molecule_folder().join("b.pdb"), "ATOM").unwrap();
        fs::write(context.molecule_folder().join("c.xyz"), WATER_XYZ).unwrap();

        let report = run_batch(&context, &BatchConfig::strict()).unwrap();

        assert_eq!(report.count(WRITTEN_LABEL), 1);
        let halted = report.halted.expect("batch should halt");
        assert!(halted.path.ends_with("b.pdb"));
        assert!(context.job_input_folder().join("a.gjf").exists());
        assert!(!context.job_input_folder().join("c.gjf").exists());
    }

    #[test]
    fn lenient_batch_skips_unsupported_files() {
        let (_dir, context) = setup();
        fs::write(context.molecule_folder().join("a.xyz"), WATER_XYZ).unwrap();
        fs::write(context.molecule_folder().join("b.pdb"), "ATOM").unwrap();
        fs::write(context.molecule_folder().join("c.xyz"), WATER_XYZ).unwrap();

        let report = run_batch(&context, &BatchConfig::lenient()).unwrap();

        assert!(report.halted.is_none());
        assert_eq!(report.count(WRITTEN_LABEL), 2);
        assert_eq!(report.skipped.len(), 1);
        assert!(report.skipped[0].path.ends_with("b.pdb"));
    }

    #[test]
    fn bad_files_are_announced_to_the_reporter() {
        let (_dir, context) = setup();
        fs::write(context.molecule_folder().join("a.xyz"), WATER_XYZ).unwrap();
        fs::write(context.molecule_folder().join("b.pdb"), "ATOM").unwrap();

        for (batch, halts) in [(BatchConfig::lenient(), false), (BatchConfig::strict(), true)] {
            let events = Mutex::new(Vec::new());
            let reporter = ProgressReporter::with_callback(Box::new(|event: Progress| {
                if let Ok(mut events) = events.lock() {
                    events.push(event);
                }
            }));
            run(&context, &batch, &reporter, &CancellationToken::new()).unwrap();
            drop(reporter);

            let events = events.into_inner().unwrap();
            let skipped = events
                .iter()
                .filter(|e| matches!(e, Progress::FileSkipped { file, .. } if file.ends_with("b.pdb")))
                .count();
            let halted = events
                .iter()
                .filter(|e| matches!(e, Progress::Halted { file, .. } if file.ends_with("b.pdb")))
                .count();
            assert_eq!((skipped, halted), if halts { (0, 1) } else { (1, 0) });
        }
    }

    #[test]
    fn missing_template_fails_before_any_write() {
        let (dir, _) = setup();
        let context = JobGroupContext::new("HF", "dyes", "dimer", dir.path()).unwrap();
        fs::write(context.molecule_folder().join("water.xyz"), WATER_XYZ).unwrap();

        let err = run_batch(&context, &BatchConfig::strict()).unwrap_err();

        assert!(matches!(err, EngineError::MissingTemplate { .. }));
        assert!(!context.input_folder().exists());
    }

    #[test]
    fn missing_molecule_folder_fails_before_any_write() {
        let (_dir, context) = setup();
        fs::remove_dir_all(context.molecule_folder()).unwrap();

        let err = run_batch(&context, &BatchConfig::strict()).unwrap_err();

        assert!(matches!(err, EngineError::MissingDirectory { .. }));
        assert!(!context.job_input_folder().exists());
    }

    #[test]
    fn cancelled_batch_writes_nothing_further() {
        let (_dir, context) = setup();
        fs::write(context.molecule_folder().join("water.xyz"), WATER_XYZ).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let report = run(
            &context,
            &BatchConfig::strict(),
            &ProgressReporter::new(),
            &cancel,
        )
        .unwrap();

        assert!(report.cancelled);
        assert_eq!(report.processed(), 0);
    }
}
