use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

pub fn run_indico_store(args: &[&str]) -> Output {
    TestEnv::new().run(args)
}

pub struct TestEnv {
    home: TempDir,
    config: TempDir,
    data: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("create temporary HOME dir"),
            config: tempfile::tempdir().expect("create temporary XDG config dir"),
            data: tempfile::tempdir().expect("create temporary XDG data dir"),
        }
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_indico-store"))
            .args(args)
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.config.path())
            .env("XDG_DATA_HOME", self.data.path())
            .env("INDICO_STORE_DATA_DIR", self.data_dir())
            .env_remove("RUST_LOG")
            .output()
            .expect("failed to execute indico-store binary")
    }

    /// Run and assert success, returning stdout
    #[allow(dead_code)]
    pub fn run_ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "{:?} should succeed\nstdout:\n{}\nstderr:\n{}",
            args,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data.path().join("indico-store")
    }

    #[allow(dead_code)]
    pub fn data_path(&self, name: &str) -> PathBuf {
        self.data_dir().join(name)
    }

    #[allow(dead_code)]
    pub fn config_file(&self) -> PathBuf {
        self.config.path().join("indico-store").join("config.toml")
    }

    #[allow(dead_code)]
    pub fn home(&self) -> &Path {
        self.home.path()
    }
}
