pub mod runner;
pub mod system;

use async_trait::async_trait;
use tracing::warn;

pub use runner::{CommandRunner, TokioCommandRunner};
pub use system::SystemLauncher;

/// OS action adapter. Receives only validated input.
///
/// `launch_app` and `open_with_app` report the immediate exit status of a
/// single fire-and-forget invocation; the started application is not tracked.
#[async_trait]
pub trait AppLauncher: Send + Sync {
    /// Installed application bundle names, filtered by suffix and sorted.
    async fn read_applications(&self) -> std::io::Result<Vec<String>>;

    async fn launch_app(&self, app_name: &str) -> bool;

    async fn open_with_app(&self, app_name: &str, file_path: &str) -> bool;

    /// `read_applications` with directory errors degraded to an empty listing.
    async fn list_applications(&self) -> Vec<String> {
        match self.read_applications().await {
            Ok(apps) => apps,
            Err(e) => {
                warn!(error = %e, "cannot list applications, reporting none");
                Vec::new()
            }
        }
    }
}

/// Append `suffix` unless the name already carries it.
pub fn bundle_name(app_name: &str, suffix: &str) -> String {
    if app_name.ends_with(suffix) {
        app_name.to_owned()
    } else {
        format!("{app_name}{suffix}")
    }
}
