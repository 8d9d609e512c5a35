use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;
use tracing::{info, warn};

use super::{AppLauncher, CommandRunner, TokioCommandRunner, bundle_name};
use crate::config::Config;

/// Launches bundles from a fixed applications directory through an
/// `open`-style program.
#[derive(Clone)]
pub struct SystemLauncher {
    applications_dir: PathBuf,
    bundle_suffix: String,
    open_program: String,
    runner: Arc<dyn CommandRunner>,
}

impl std::fmt::Debug for SystemLauncher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemLauncher")
            .field("applications_dir", &self.applications_dir)
            .field("bundle_suffix", &self.bundle_suffix)
            .field("open_program", &self.open_program)
            .finish_non_exhaustive()
    }
}

impl SystemLauncher {
    pub fn new(config: &Config) -> Self {
        Self::with_runner(config, Arc::new(TokioCommandRunner))
    }

    pub fn with_runner(config: &Config, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            applications_dir: config.applications_dir.clone(),
            bundle_suffix: config.bundle_suffix.clone(),
            open_program: config.open_program.clone(),
            runner,
        }
    }

    /// Absolute bundle path inside the applications directory.
    ///
    /// Leading separators are dropped so `join` cannot replace the base.
    pub fn bundle_path(&self, app_name: &str) -> PathBuf {
        let relative = app_name.trim_start_matches(std::path::is_separator);
        self.applications_dir
            .join(bundle_name(relative, &self.bundle_suffix))
    }

    async fn invoke(&self, args: Vec<OsString>) -> bool {
        match self.runner.run(&self.open_program, args).await {
            Ok(success) => success,
            Err(e) => {
                warn!(program = %self.open_program, error = %e, "cannot start command");
                false
            }
        }
    }
}

#[async_trait]
impl AppLauncher for SystemLauncher {
    async fn read_applications(&self) -> std::io::Result<Vec<String>> {
        let mut dir = fs::read_dir(&self.applications_dir).await?;
        let mut apps = Vec::new();

        while let Some(entry) = dir.next_entry().await? {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.ends_with(&self.bundle_suffix) {
                apps.push(name);
            }
        }

        apps.sort();
        Ok(apps)
    }

    async fn launch_app(&self, app_name: &str) -> bool {
        let path = self.bundle_path(app_name);
        info!(path = %path.display(), "launching application");
        self.invoke(vec![path.into_os_string()]).await
    }

    async fn open_with_app(&self, app_name: &str, file_path: &str) -> bool {
        let path = self.bundle_path(app_name);
        info!(app = %path.display(), file = file_path, "opening file with application");
        self.invoke(vec!["-a".into(), path.into_os_string(), file_operand(file_path)])
            .await
    }
}

/// A leading `-` would be parsed as an option; `./` keeps it a path to the same file.
fn file_operand(file_path: &str) -> OsString {
    if file_path.starts_with('-') {
        format!("./{file_path}").into()
    } else {
        file_path.into()
    }
}
