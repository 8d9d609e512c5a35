pub mod capability;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod launcher;
pub mod server;

pub use config::Config;
pub use dispatch::{DispatchError, Dispatcher, InvocationRequest, InvocationResult};
pub use error::LauncherError;
pub use launcher::{AppLauncher, CommandRunner, SystemLauncher, TokioCommandRunner};
pub use server::LauncherServer;
