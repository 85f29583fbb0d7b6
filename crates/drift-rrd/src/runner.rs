//! Execution of an accumulated job as a single engine invocation.

use crate::error::{QueryError, Result};
use crate::job::QueryJob;
use crate::reduce::{self, ResultMapping};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Default engine program name, resolved via `PATH`.
pub const DEFAULT_PROGRAM: &str = "rrdtool";

/// Handle to the external time-series engine.
///
/// The engine is invoked directly (no shell) with the job's argument
/// vector and blocks until it exits; the check's caller owns any hard
/// timeout. Non-zero exit fails the whole batch; the steps are
/// interdependent, so there is no meaningful partial result.
#[derive(Debug, Clone)]
pub struct Engine {
    program: PathBuf,
}

impl Engine {
    /// Creates an engine handle using [`DEFAULT_PROGRAM`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_PROGRAM),
        }
    }

    /// Creates an engine handle with an explicit program path.
    #[must_use]
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The program this handle will invoke.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Runs the job and reduces its output into a [`ResultMapping`].
    ///
    /// Takes the job by value: a job cannot be executed twice, and no
    /// step can be added after execution.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::EngineSpawn`] if the subprocess cannot be
    /// started, [`QueryError::EngineExit`] on non-zero exit, and
    /// [`QueryError::MalformedNumber`] if a data line fails to parse.
    pub fn run(&self, job: QueryJob) -> Result<ResultMapping> {
        let args = job.command_args();
        if !job.has_print_request() {
            tracing::warn!("job has no print requests; result mapping will be empty");
        }
        tracing::debug!(command = %self.describe(&args), "invoking engine");

        let output = Command::new(&self.program)
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| QueryError::EngineSpawn {
                command: self.describe(&args),
                source,
            })?;

        if !output.status.success() {
            return Err(QueryError::EngineExit {
                command: self.describe(&args),
                exit_code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let mapping = reduce::reduce_output(&stdout)?;
        tracing::debug!(results = mapping.len(), "engine output reduced");
        Ok(mapping)
    }

    fn describe(&self, args: &[String]) -> String {
        format!("{} {}", self.program.display(), args.join(" "))
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Consolidation;
    use std::path::Path;

    fn output_job() -> QueryJob {
        let mut job = QueryJob::new("/tmp/drift-test-scratch");
        let ds = job
            .define_series(Path::new("/perf/a.rrd"), 1, "out", Consolidation::Average)
            .expect("define");
        job.request_output(&ds).expect("output");
        job
    }

    #[test]
    fn default_program_is_rrdtool() {
        let engine = Engine::new();
        assert_eq!(engine.program(), Path::new("rrdtool"));
        assert_eq!(Engine::default().program(), engine.program());
    }

    #[test]
    fn custom_program_path() {
        let engine = Engine::with_program("/opt/rrdtool/bin/rrdtool");
        assert_eq!(engine.program(), Path::new("/opt/rrdtool/bin/rrdtool"));
    }

    #[test]
    fn spawn_failure_is_surfaced() {
        let engine = Engine::with_program("/nonexistent/driftwatch-fake-engine");
        let err = engine.run(output_job()).unwrap_err();
        match err {
            QueryError::EngineSpawn { command, .. } => {
                assert!(command.starts_with("/nonexistent/driftwatch-fake-engine graph"));
            }
            other => panic!("expected EngineSpawn, got {other:?}"),
        }
    }

    #[cfg(unix)]
    mod with_fake_engine {
        use super::*;
        use std::io::Write;
        use std::os::unix::fs::PermissionsExt;

        fn fake_engine(dir: &Path, body: &str) -> PathBuf {
            let path = dir.join("fake-engine");
            let mut file = std::fs::File::create(&path).expect("create script");
            writeln!(file, "#!/bin/sh").expect("write");
            file.write_all(body.as_bytes()).expect("write");
            drop(file);
            let mut perms = std::fs::metadata(&path).expect("metadata").permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&path, perms).expect("chmod");
            path
        }

        #[test]
        fn successful_run_reduces_stdout() {
            let dir = tempfile::tempdir().expect("tempdir");
            let script = fake_engine(
                dir.path(),
                "echo HEADER_JUNK\n\
                 echo 'curr_dsout_avg = 42.00'\n\
                 echo 497x179\n",
            );
            let mapping = Engine::with_program(&script)
                .run(output_job())
                .expect("run");
            assert_eq!(mapping.get("out_avg"), Some(&42.0));
        }

        #[test]
        fn non_zero_exit_fails_batch_with_stderr() {
            let dir = tempfile::tempdir().expect("tempdir");
            let script = fake_engine(
                dir.path(),
                "echo 'ERROR: opening rrd' >&2\n\
                 exit 1\n",
            );
            let err = Engine::with_program(&script)
                .run(output_job())
                .unwrap_err();
            match err {
                QueryError::EngineExit {
                    exit_code, stderr, ..
                } => {
                    assert_eq!(exit_code, 1);
                    assert_eq!(stderr, "ERROR: opening rrd");
                }
                other => panic!("expected EngineExit, got {other:?}"),
            }
        }

        #[test]
        fn malformed_engine_output_is_surfaced() {
            let dir = tempfile::tempdir().expect("tempdir");
            let script = fake_engine(
                dir.path(),
                "echo HEADER_JUNK\n\
                 echo 'curr_dsout_avg = NOTANUMBER'\n\
                 echo FOOTER_JUNK\n",
            );
            let err = Engine::with_program(&script)
                .run(output_job())
                .unwrap_err();
            assert!(matches!(err, QueryError::MalformedNumber { .. }));
        }
    }
}
