use super::defaults::DefaultsConfig;
use super::file::{FileBatchPolicy, FileConfig, FileJobGroupConfig, FileZeroFrequency};
use super::models::AppConfig;
use crate::cli::{ClassifyArgs, JobGroupArgs, ZeroFrequencyArg};
use crate::error::{CliError, Result};
use qcflow::engine::config::{
    BatchPolicy, ClassifierConfigBuilder, ZeroFrequencyPolicy, build_batch,
};
use qcflow::engine::context::JobGroupContextBuilder;
use std::str::FromStr;

/// Merges CLI flags, `--set` overrides, the TOML file and built-in defaults, in that
/// order of precedence.
///
/// `classify` carries the classifier-only flags; other commands pass `None`.
pub fn build_config(
    job: &JobGroupArgs,
    classify: Option<&ClassifyArgs>,
    threads: Option<usize>,
) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &job.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &job.set_values)?;
    let group_file = file_config.job_group.take().unwrap_or_default();
    let batch_file = file_config.batch.take().unwrap_or_default();
    let classify_file = file_config.classify.take().unwrap_or_default();

    let mut builder = JobGroupContextBuilder::new().base_path(
        job.base_path
            .clone()
            .or(group_file.base_path)
            .unwrap_or(defaults.base_path),
    );
    if let Some(method) = job.method.clone().or(group_file.method) {
        builder = builder.method(method);
    }
    if let Some(molecule) = job.molecule.clone().or(group_file.molecule) {
        builder = builder.molecule(molecule);
    }
    if let Some(sequence) = job.sequence.clone().or(group_file.sequence) {
        builder = builder.sequence(sequence);
    }
    if let Some(header) = job.header.clone().or(group_file.header) {
        builder = builder.header_path(header);
    }
    if let Some(prefix) = job.checkpoint_prefix.clone().or(group_file.checkpoint_prefix) {
        builder = builder.checkpoint_prefix(prefix);
    }
    let context = builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let policy = if job.lenient {
        BatchPolicy::Lenient
    } else {
        batch_file.policy.map(Into::into).unwrap_or_default()
    };
    let batch = build_batch(Some(policy), threads.or(batch_file.workers))
        .map_err(|e| CliError::Config(e.to_string()))?;

    let (zero_cli, window_cli, ledger_cli) = classify
        .map(|args| {
            (
                args.zero_frequency,
                args.error_scan_window,
                args.ledger.clone(),
            )
        })
        .unwrap_or_default();

    let zero_frequency = zero_cli
        .map(zero_frequency_policy)
        .or(classify_file.zero_frequency.map(Into::into))
        .unwrap_or_default();
    let error_scan_window = window_cli
        .or(classify_file.error_scan_window)
        .unwrap_or(defaults.error_scan_window);

    let classifier = ClassifierConfigBuilder::new()
        .policy(batch.policy)
        .workers(batch.workers)
        .zero_frequency(zero_frequency)
        .error_scan_window(error_scan_window)
        .ledger_path(ledger_cli.or(classify_file.ledger))
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig {
        context,
        batch,
        classifier,
    })
}

fn zero_frequency_policy(arg: ZeroFrequencyArg) -> ZeroFrequencyPolicy {
    match arg {
        ZeroFrequencyArg::Normal => ZeroFrequencyPolicy::Normal,
        ZeroFrequencyArg::Negative => ZeroFrequencyPolicy::NegativeFrequency,
        ZeroFrequencyArg::Unclassified => ZeroFrequencyPolicy::Unclassified,
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

fn job_group(config: &mut FileConfig) -> &mut FileJobGroupConfig {
    config.job_group.get_or_insert_with(Default::default)
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "job-group.method" => job_group(&mut config).method = Some(value_str.to_string()),
            "job-group.molecule" => job_group(&mut config).molecule = Some(value_str.to_string()),
            "job-group.sequence" => job_group(&mut config).sequence = Some(value_str.to_string()),
            "job-group.base-path" => job_group(&mut config).base_path = Some(value_str.into()),
            "job-group.header" => job_group(&mut config).header = Some(value_str.into()),
            "job-group.checkpoint-prefix" => {
                job_group(&mut config).checkpoint_prefix = Some(value_str.to_string())
            }
            "batch.policy" => {
                let policy = match value_str {
                    "strict" => FileBatchPolicy::Strict,
                    "lenient" => FileBatchPolicy::Lenient,
                    _ => {
                        return Err(CliError::Config(format!(
                            "Invalid value for {}: '{}' (expected strict or lenient)",
                            key, value_str
                        )));
                    }
                };
                config.batch.get_or_insert_with(Default::default).policy = Some(policy);
            }
            "batch.workers" => {
                config.batch.get_or_insert_with(Default::default).workers =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "classify.zero-frequency" => {
                let policy = match value_str {
                    "normal" => FileZeroFrequency::Normal,
                    "negative" => FileZeroFrequency::Negative,
                    "unclassified" => FileZeroFrequency::Unclassified,
                    _ => {
                        return Err(CliError::Config(format!(
                            "Invalid value for {}: '{}' (expected normal, negative or unclassified)",
                            key, value_str
                        )));
                    }
                };
                config
                    .classify
                    .get_or_insert_with(Default::default)
                    .zero_frequency = Some(policy);
            }
            "classify.error-scan-window" => {
                config
                    .classify
                    .get_or_insert_with(Default::default)
                    .error_scan_window = Some(parse_value(key, value_str, "integer")?);
            }
            "classify.ledger" => {
                config.classify.get_or_insert_with(Default::default).ledger =
                    Some(value_str.into());
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    fn job_args() -> JobGroupArgs {
        JobGroupArgs {
            method: Some("PM7".to_string()),
            molecule: Some("dyes".to_string()),
            sequence: Some("dimer".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn cli_arguments_and_defaults_build_a_context() {
        let app = build_config(&job_args(), None, None).unwrap();

        assert_eq!(app.context.base_path(), Path::new("."));
        assert_eq!(app.context.header_path(), Path::new("header_PM7"));
        assert_eq!(app.batch.policy, BatchPolicy::Strict);
        assert_eq!(app.batch.workers, None);
        assert_eq!(
            app.classifier.zero_frequency,
            ZeroFrequencyPolicy::NegativeFrequency
        );
        assert_eq!(app.classifier.error_scan_window, 8);
        assert!(app.classifier.ledger_path.is_none());
    }

    #[test]
    fn file_values_fill_gaps_and_cli_wins() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("qcflow.toml");
        fs::write(
            &cfg_path,
            r#"
            [job-group]
            method = "HF"
            molecule = "dyes"
            sequence = "trimer"
            base-path = "/data/jobs"
            checkpoint-prefix = "%Chk=/scratch/"

            [batch]
            policy = "lenient"
            workers = 3

            [classify]
            zero-frequency = "normal"
            ledger = "ledger.csv"
            "#,
        )
        .unwrap();

        let job = JobGroupArgs {
            config: Some(cfg_path),
            method: Some("PM7".to_string()),
            ..Default::default()
        };
        let classify = ClassifyArgs {
            error_scan_window: Some(4),
            ..Default::default()
        };
        let app = build_config(&job, Some(&classify), Some(6)).unwrap();

        assert_eq!(app.context.method(), "PM7");
        assert_eq!(app.context.sequence(), "trimer");
        assert_eq!(app.context.base_path(), Path::new("/data/jobs"));
        assert_eq!(app.context.checkpoint_prefix(), "%Chk=/scratch/");
        assert_eq!(app.batch.policy, BatchPolicy::Lenient);
        assert_eq!(app.batch.workers, Some(6));
        assert_eq!(app.classifier.batch, app.batch);
        assert_eq!(app.classifier.zero_frequency, ZeroFrequencyPolicy::Normal);
        assert_eq!(app.classifier.error_scan_window, 4);
        assert_eq!(
            app.classifier.ledger_path,
            Some(PathBuf::from("ledger.csv"))
        );
    }

    #[test]
    fn set_values_override_file_but_not_flags() {
        let mut job = job_args();
        job.set_values = vec![
            "job-group.molecule=pigments".to_string(),
            "batch.policy=lenient".to_string(),
            "batch.workers=2".to_string(),
            "classify.zero-frequency=unclassified".to_string(),
        ];
        let app = build_config(&job, None, None).unwrap();

        assert_eq!(app.context.molecule(), "dyes");
        assert_eq!(app.batch.policy, BatchPolicy::Lenient);
        assert_eq!(app.batch.workers, Some(2));
        assert_eq!(
            app.classifier.zero_frequency,
            ZeroFrequencyPolicy::Unclassified
        );
    }

    #[test]
    fn zero_frequency_flag_beats_file() {
        let classify = ClassifyArgs {
            zero_frequency: Some(ZeroFrequencyArg::Normal),
            ..Default::default()
        };
        let mut job = job_args();
        job.set_values = vec!["classify.zero-frequency=unclassified".to_string()];

        let app = build_config(&job, Some(&classify), None).unwrap();

        assert_eq!(app.classifier.zero_frequency, ZeroFrequencyPolicy::Normal);
    }

    #[test]
    fn invalid_set_values_are_rejected() {
        for bad in [
            "batch.workers",
            "batch.workers=many",
            "batch.policy=sometimes",
            "classify.zero-frequency=zero",
            "classify.error-scan-window=0",
            "classify.error-scan-window=1000000",
            "optimization.max-iterations=3",
        ] {
            let mut job = job_args();
            job.set_values = vec![bad.to_string()];
            assert!(
                matches!(build_config(&job, None, None), Err(CliError::Config(_))),
                "accepted {bad}"
            );
        }
    }

    #[test]
    fn missing_identifier_is_a_config_error() {
        let job = JobGroupArgs {
            method: Some("PM7".to_string()),
            molecule: Some("dyes".to_string()),
            ..Default::default()
        };
        let err = build_config(&job, None, None).unwrap_err();
        assert!(matches!(err, CliError::Config(msg) if msg.contains("sequence")));
    }

    #[test]
    fn zero_workers_is_a_config_error() {
        assert!(matches!(
            build_config(&job_args(), None, Some(0)),
            Err(CliError::Config(_))
        ));
    }
}
