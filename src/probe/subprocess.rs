use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

use super::sentinel::find_version;
use super::{Candidate, ProbeError, VersionProbe};
use crate::core::version::Version;

/// File name of the probe executable
pub const PROBE_BINARY: &str = "ngs-version-probe";

/// Default bound on how long a probe child may run
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 30;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Runs `ngs-version-probe <library> <path> [true]` and reads its sentinel line.
#[derive(Debug, Clone)]
pub struct SubprocessProbe {
    executables: Vec<PathBuf>,
    timeout: Duration,
}

impl SubprocessProbe {
    /// Probe trying, in order, `configured`, the probe next to the current
    /// executable, and the probe on `PATH`.
    #[must_use]
    pub fn new(configured: Option<PathBuf>, timeout: Duration) -> Self {
        let binary = format!("{PROBE_BINARY}{}", std::env::consts::EXE_SUFFIX);

        let mut executables = Vec::new();
        executables.extend(configured);
        if let Some(dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            executables.push(dir.join(&binary));
        }
        executables.push(PathBuf::from(binary));

        Self {
            executables,
            timeout,
        }
    }

    /// Probe using exactly the given executables.
    #[must_use]
    pub fn with_executables(executables: Vec<PathBuf>, timeout: Duration) -> Self {
        Self {
            executables,
            timeout,
        }
    }

    #[must_use]
    pub fn executables(&self) -> &[PathBuf] {
        &self.executables
    }

    fn spawn(&self, library: &str, candidate: &Candidate) -> Result<Child, ProbeError> {
        let mut last_error = String::from("no probe executable configured");
        for exe in &self.executables {
            let mut command = Command::new(exe);
            command.arg(library).arg(&candidate.path);
            if candidate.search_path_load {
                command.arg("true");
            }
            command
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped());

            trace!("Spawning {:?}", command);
            match command.spawn() {
                Ok(child) => return Ok(child),
                Err(e) => {
                    trace!("Cannot run {}: {}", exe.display(), e);
                    last_error = e.to_string();
                }
            }
        }

        let tried = self
            .executables
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Err(ProbeError::Spawn {
            tried,
            reason: last_error,
        })
    }
}

fn drain<R: Read + Send + 'static>(stream: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut text = String::new();
        if let Some(mut s) = stream {
            let mut bytes = Vec::new();
            if s.read_to_end(&mut bytes).is_ok() {
                text = String::from_utf8_lossy(&bytes).into_owned();
            }
        }
        text
    })
}

/// Wait for `child`, killing it after `timeout`. Returns false on timeout.
fn wait_bounded(child: &mut Child, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                trace!("Probe exited with {}", status);
                return true;
            }
            Ok(None) if Instant::now() >= deadline => {
                if let Err(e) = child.kill() {
                    debug!("Cannot kill probe: {}", e);
                }
                let _ = child.wait();
                return false;
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => {
                debug!("Cannot wait for probe: {}", e);
                return true;
            }
        }
    }
}

impl VersionProbe for SubprocessProbe {
    fn probe(&self, library: &str, candidate: &Candidate) -> Result<Option<Version>, ProbeError> {
        let mut child = self.spawn(library, candidate)?;
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        if !wait_bounded(&mut child, self.timeout) {
            warn!(
                "Version probe of {} timed out after {:?}",
                candidate.path.display(),
                self.timeout
            );
            // a grandchild may still hold the pipes open; leave the readers detached
            drop((stdout, stderr));
            return Ok(None);
        }
        let out = stdout.join().unwrap_or_default();
        let err = stderr.join().unwrap_or_default();

        for line in out.lines().chain(err.lines()) {
            trace!("probe> {}", line);
        }

        let version = find_version(&out, library);
        match &version {
            Some(v) => debug!("{} reports version {}", candidate.path.display(), v),
            None => debug!("Cannot load or get version of {}", candidate.path.display()),
        }
        Ok(version.map(|v| Version::parse(&v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Location;

    #[test]
    fn test_default_executables_end_with_path_lookup() {
        let probe = SubprocessProbe::new(Some(PathBuf::from("/opt/probe")), Duration::from_secs(1));
        let exes = probe.executables();
        assert_eq!(exes[0], PathBuf::from("/opt/probe"));
        assert_eq!(
            exes.last().unwrap(),
            &PathBuf::from(format!("{PROBE_BINARY}{}", std::env::consts::EXE_SUFFIX))
        );
    }

    #[test]
    fn test_unspawnable_probe_is_fatal() {
        let probe = SubprocessProbe::with_executables(
            vec![PathBuf::from("/definitely/missing/ngs-version-probe")],
            Duration::from_secs(1),
        );
        let candidate = Candidate::new(Location::Cwd, "/tmp/libx.so", false);
        let err = probe.probe("x", &candidate).unwrap_err();
        assert!(err.to_string().contains("/definitely/missing/ngs-version-probe"));
    }

    #[cfg(unix)]
    #[test]
    fn test_sentinel_read_from_child_stdout() {
        let temp = tempfile::tempdir().unwrap();
        let script = temp.path().join("fake-probe");
        std::fs::write(
            &script,
            "#!/bin/sh\necho noise\necho \"ngs-version-probe: $1 version=2.9.3\"\n",
        )
        .unwrap();
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        }

        let probe = SubprocessProbe::with_executables(vec![script], Duration::from_secs(10));
        let candidate = Candidate::new(Location::Cwd, "/any/libngs-sdk.so", false);
        let version = probe.probe("ngs-sdk", &candidate).unwrap();
        assert_eq!(version, Some(Version::new(2, 9, 3)));
    }

    #[cfg(unix)]
    #[test]
    fn test_hung_child_times_out() {
        let temp = tempfile::tempdir().unwrap();
        let script = temp.path().join("slow-probe");
        std::fs::write(&script, "#!/bin/sh\nexec sleep 30\n").unwrap();
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        }

        let probe = SubprocessProbe::with_executables(vec![script], Duration::from_millis(200));
        let candidate = Candidate::new(Location::Cwd, "/any/lib.so", false);
        assert_eq!(probe.probe("ngs-sdk", &candidate).unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_with_inherited_pipes() {
        let temp = tempfile::tempdir().unwrap();
        let script = temp.path().join("forking-probe");
        std::fs::write(&script, "#!/bin/sh\nsleep 20 &\nexec sleep 20\n").unwrap();
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        }

        let probe = SubprocessProbe::with_executables(vec![script], Duration::from_millis(200));
        let candidate = Candidate::new(Location::Cwd, "/any/lib.so", false);
        let started = Instant::now();
        assert_eq!(probe.probe("ngs-sdk", &candidate).unwrap(), None);
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
