//! Focused unit tests covering shortlist CLI configuration validation.

use super::*;
use rstest::rstest;
use tempfile::TempDir;

fn complete_args(dir: &Path) -> ShortlistArgs {
    ShortlistArgs {
        artifact_dir: Some(dir.to_path_buf()),
        birth_year: Some(2008),
        position: Some("D".to_owned()),
        top_n: Some(25),
        output: None,
    }
}

#[rstest]
fn complete_arguments_convert() {
    let tmp = TempDir::new().expect("tempdir");
    let config =
        ShortlistConfig::try_from(complete_args(tmp.path())).expect("complete args convert");
    assert_eq!(config.birth_year(), 2008);
    assert_eq!(config.position(), PositionGroup::Defence);
    assert_eq!(config.top_n(), 25);
    assert!(config.validate_sources().is_ok());
}

#[rstest]
fn omitted_length_defaults() {
    let tmp = TempDir::new().expect("tempdir");
    let args = ShortlistArgs {
        top_n: None,
        ..complete_args(tmp.path())
    };
    let config = ShortlistConfig::try_from(args).expect("args convert");
    assert_eq!(config.top_n(), DEFAULT_TOP_N);
}

#[rstest]
#[case(
    ShortlistArgs { artifact_dir: None, ..Default::default() },
    ARG_ARTIFACT_DIR,
    ENV_ARTIFACT_DIR
)]
fn converting_without_required_fields_errors(
    #[case] args: ShortlistArgs,
    #[case] field: &'static str,
    #[case] env_var: &'static str,
) {
    let err = ShortlistConfig::try_from(args).expect_err("missing field should error");
    match err {
        CliError::MissingArgument {
            field: missing,
            env,
        } => {
            assert_eq!(missing, field);
            assert_eq!(env, env_var);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn missing_birth_year_errors() {
    let tmp = TempDir::new().expect("tempdir");
    let args = ShortlistArgs {
        birth_year: None,
        ..complete_args(tmp.path())
    };
    let err = ShortlistConfig::try_from(args).expect_err("missing year should error");
    assert!(matches!(
        err,
        CliError::MissingArgument {
            field: ARG_BIRTH_YEAR,
            ..
        }
    ));
}

#[rstest]
#[case("X")]
#[case("Unknown")]
#[case("")]
fn unknown_positions_are_rejected(#[case] value: &str) {
    let tmp = TempDir::new().expect("tempdir");
    let args = ShortlistArgs {
        position: Some(value.to_owned()),
        ..complete_args(tmp.path())
    };
    let err = ShortlistConfig::try_from(args).expect_err("position should be rejected");
    match err {
        CliError::InvalidPosition { value: rejected } => assert_eq!(rejected, value),
        other => panic!("expected InvalidPosition, found {other:?}"),
    }
}

#[rstest]
#[case(0)]
#[case(101)]
fn out_of_range_lengths_are_rejected(#[case] top_n: usize) {
    let tmp = TempDir::new().expect("tempdir");
    let args = ShortlistArgs {
        top_n: Some(top_n),
        ..complete_args(tmp.path())
    };
    let err = ShortlistConfig::try_from(args).expect_err("length should be rejected");
    assert!(matches!(
        err,
        CliError::Request(ShortlistRequestError::TopNOutOfRange { .. })
    ));
}

#[rstest]
fn validate_sources_reports_missing_directory() {
    let tmp = TempDir::new().expect("tempdir");
    let args = ShortlistArgs {
        artifact_dir: Some(tmp.path().join("missing")),
        ..complete_args(tmp.path())
    };
    let config = ShortlistConfig::try_from(args).expect("args convert");
    let err = config.validate_sources().expect_err("expected failure");
    assert!(matches!(err, CliError::MissingArtifactDir { .. }));
}

#[rstest]
fn validate_sources_rejects_files() {
    let tmp = TempDir::new().expect("tempdir");
    let file_path = tmp.path().join("artifacts");
    std::fs::write(&file_path, b"not a directory").expect("write file");
    let args = ShortlistArgs {
        artifact_dir: Some(file_path),
        ..complete_args(tmp.path())
    };
    let config = ShortlistConfig::try_from(args).expect("args convert");
    let err = config.validate_sources().expect_err("expected rejection");
    assert!(matches!(err, CliError::MissingArtifactDir { .. }));
}
