use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::capability::validate::{Intent, ValidatedArguments, ValidationError, validate};
use crate::capability::{self, Capability};
use crate::config::ListingFailure;
use crate::launcher::AppLauncher;

pub const LAUNCH_SUCCEEDED: &str = "Application launched successfully";
pub const LAUNCH_FAILED: &str = "Failed to launch application";
pub const OPEN_SUCCEEDED: &str = "File opened successfully";
pub const OPEN_FAILED: &str = "Failed to open file with application";

/// One client call, consumed by `Dispatcher::invoke`.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationRequest {
    pub capability: String,
    pub arguments: Map<String, Value>,
}

impl InvocationRequest {
    pub fn new(capability: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            capability: capability.into(),
            arguments,
        }
    }
}

/// Outcome delivered as response content.
///
/// An OS action that did not succeed is still a `Success` whose text says so;
/// `Failure` marks content the client should treat as an error result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationResult {
    Success(String),
    Failure(String),
}

impl InvocationResult {
    pub fn text(&self) -> &str {
        match self {
            InvocationResult::Success(text) | InvocationResult::Failure(text) => text,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, InvocationResult::Failure(_))
    }
}

/// Request-level errors. Raised before any OS action, except `Internal`.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("unknown capability: {0}")]
    UnknownCapability(String),

    #[error("invalid arguments for {capability}: {source}")]
    InvalidArguments {
        capability: &'static str,
        #[source]
        source: ValidationError,
    },

    #[error("internal error: {0}")]
    Internal(String),
}

/// Routes invocations through lookup, validation, and the launcher.
/// Holds no per-request state.
#[derive(Clone)]
pub struct Dispatcher {
    launcher: Arc<dyn AppLauncher>,
    listing_failure: ListingFailure,
}

impl Dispatcher {
    pub fn new(launcher: Arc<dyn AppLauncher>, listing_failure: ListingFailure) -> Self {
        Self {
            launcher,
            listing_failure,
        }
    }

    pub fn capabilities(&self) -> &'static [Capability] {
        capability::list()
    }

    pub async fn invoke(
        &self,
        request: InvocationRequest,
    ) -> Result<InvocationResult, DispatchError> {
        let capability = capability::resolve(&request.capability).ok_or_else(|| {
            warn!(capability = %request.capability, "unknown capability");
            DispatchError::UnknownCapability(request.capability.clone())
        })?;

        let arguments = validate(capability, &request.arguments).map_err(|source| {
            warn!(capability = capability.name, error = %source, "invalid arguments");
            DispatchError::InvalidArguments {
                capability: capability.name,
                source,
            }
        })?;

        info!(
            capability = capability.name,
            mutating = capability.effects.is_mutating(),
            "invoking capability"
        );

        // Spawned so a panicking launcher surfaces as an internal error.
        let launcher = Arc::clone(&self.launcher);
        let listing_failure = self.listing_failure;
        let handle = tokio::spawn(async move {
            perform(launcher.as_ref(), listing_failure, arguments).await
        });

        handle.await.map_err(|join_err| {
            if join_err.is_panic() {
                error!(capability = capability.name, "capability execution panicked");
            } else {
                error!(capability = capability.name, "capability execution cancelled");
            }
            DispatchError::Internal(format!("{} did not complete", capability.name))
        })
    }
}

async fn perform(
    launcher: &dyn AppLauncher,
    listing_failure: ListingFailure,
    arguments: ValidatedArguments,
) -> InvocationResult {
    match arguments.into_intent() {
        Intent::ListApplications => match listing_failure {
            ListingFailure::Empty => {
                InvocationResult::Success(numbered_listing(&launcher.list_applications().await))
            }
            ListingFailure::Report => match launcher.read_applications().await {
                Ok(apps) => InvocationResult::Success(numbered_listing(&apps)),
                Err(e) => {
                    warn!(error = %e, "cannot list applications");
                    InvocationResult::Failure(format!("Failed to list applications: {e}"))
                }
            },
        },
        Intent::LaunchApp { app_name } => {
            let launched = launcher.launch_app(&app_name).await;
            InvocationResult::Success(pick(launched, LAUNCH_SUCCEEDED, LAUNCH_FAILED))
        }
        Intent::OpenWithApp {
            app_name,
            file_path,
        } => {
            let opened = launcher.open_with_app(&app_name, &file_path).await;
            InvocationResult::Success(pick(opened, OPEN_SUCCEEDED, OPEN_FAILED))
        }
    }
}

fn pick(ok: bool, success: &str, failure: &str) -> String {
    let text = if ok { success } else { failure };
    text.to_owned()
}

/// "1. A.app\n2. B.app"; empty for no entries.
fn numbered_listing(apps: &[String]) -> String {
    apps.iter()
        .enumerate()
        .map(|(i, app)| format!("{}. {app}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}
