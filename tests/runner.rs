// ABOUTME: Integration tests for the process-backed CommandRunner.
// ABOUTME: Runs real child processes through sh to check streaming, exit codes, and timeouts.

#![cfg(unix)]

use gitship::report::Reporter;
use gitship::runner::{CommandError, CommandRunner, CommandSpec, ProcessRunner};
use std::time::{Duration, Instant};

fn sh(script: &str) -> CommandSpec {
    CommandSpec::new("sh").args(["-c", script])
}

#[tokio::test]
async fn merges_stdout_and_stderr() {
    let mut reporter = Reporter::detached();
    let result = ProcessRunner::new()
        .run(&sh("echo out; echo err 1>&2"), None, None, &mut reporter)
        .await
        .unwrap();

    assert!(result.succeeded());
    let mut lines = result.output_lines.clone();
    lines.sort();
    assert_eq!(lines, ["err", "out"]);
    assert!(reporter.transcript().contains("out"));
    assert!(reporter.transcript().contains("err"));
}

#[tokio::test]
async fn non_zero_exit_is_data() {
    let mut reporter = Reporter::detached();
    let result = ProcessRunner::new()
        .run(&sh("echo failing; exit 3"), None, None, &mut reporter)
        .await
        .unwrap();

    assert_eq!(result.exit_code, 3);
    assert_eq!(result.output_lines, ["failing"]);
}

#[tokio::test]
async fn runs_in_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    let canonical = dir.path().canonicalize().unwrap();
    let mut reporter = Reporter::detached();

    let result = ProcessRunner::new()
        .run(&sh("pwd -P"), Some(dir.path()), None, &mut reporter)
        .await
        .unwrap();

    assert_eq!(result.first_line(), Some(canonical.to_str().unwrap()));
}

#[tokio::test]
async fn passes_extra_environment() {
    let mut reporter = Reporter::detached();
    let command = sh("echo \"$COMPOSER_HOME\"").env("COMPOSER_HOME", "/var/cache/composer");

    let result = ProcessRunner::new()
        .run(&command, None, None, &mut reporter)
        .await
        .unwrap();

    assert_eq!(result.first_line(), Some("/var/cache/composer"));
}

#[tokio::test]
async fn timeout_kills_the_child() {
    let mut reporter = Reporter::detached();
    let started = Instant::now();

    let err = ProcessRunner::new()
        .run(
            &sh("echo started; sleep 30"),
            None,
            Some(Duration::from_millis(200)),
            &mut reporter,
        )
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    assert!(started.elapsed() < Duration::from_secs(10));
    assert!(matches!(err, CommandError::Timeout { limit, .. } if limit == Duration::from_millis(200)));
}

#[tokio::test]
async fn unknown_program_is_a_spawn_error() {
    let mut reporter = Reporter::detached();
    let err = ProcessRunner::new()
        .run(
            &CommandSpec::new("gitship-no-such-program"),
            None,
            None,
            &mut reporter,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, CommandError::Spawn { .. }));
    assert_eq!(err.command(), "gitship-no-such-program");
}

#[test]
fn locates_programs_on_path() {
    let runner = ProcessRunner::new();
    let sh = runner.locate("sh").unwrap();
    assert!(sh.is_absolute());
    assert!(runner.locate("gitship-no-such-program").is_none());
}
