// ABOUTME: Fake CLI binaries written as shell scripts into a temp directory.
// ABOUTME: Every invocation appends its arguments to a log so tests can replay the call sequence.

use std::ffi::OsString;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct FakeBin {
    dir: TempDir,
    log: PathBuf,
}

impl FakeBin {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("invocations.log");
        Self { dir, log }
    }

    /// Install `name`; the script logs `$*` and then runs `body`.
    pub fn install(&self, name: &str, body: &str) {
        let path = self.dir.path().join(name);
        let script = format!(
            "#!/bin/sh\necho \"$*\" >> '{}'\n{}\n",
            self.log.display(),
            body
        );
        fs::write(&path, script).unwrap();

        // Make executable
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).unwrap();
    }

    /// Search path containing only the fake binaries.
    pub fn search_path(&self) -> OsString {
        self.dir.path().as_os_str().to_owned()
    }

    /// Arguments of every invocation so far, oldest first.
    pub fn invocations(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}
