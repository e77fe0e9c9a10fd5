//! Playbook execution and download triggers.

use tracing::{info, instrument};

use remcon_core::{ExecuteSummary, RemediationId};

use crate::api::{ExecuteRequest, PlaybookApi};
use crate::error::ClientResult;
use crate::notify::{Notification, Notifier};

/// Trigger execution of a plan against its reachable executors.
///
/// Unreachable executors are excluded from the run. On success the
/// `on_success` callback fires (callers refetch their run history there)
/// and a success notification goes out; on failure a danger notification
/// carries the error message and the error is returned unchanged. There is
/// no automatic retry anywhere; retries are the operator re-clicking.
#[instrument(skip(api, notifier, summary, on_success), fields(remediation = %id))]
pub async fn execute_playbook<F>(
    api: &dyn PlaybookApi,
    notifier: &dyn Notifier,
    id: RemediationId,
    etag: String,
    name: &str,
    summary: &ExecuteSummary,
    on_success: F,
) -> ClientResult<()>
where
    F: FnOnce(),
{
    let request = ExecuteRequest {
        id,
        etag,
        exclude: summary.excluded_executor_ids(),
    };

    match api.execute_run(&request).await {
        Ok(()) => {
            info!(
                connected = summary.connected_system_count(),
                excluded = request.exclude.len(),
                "playbook execution started"
            );
            on_success();
            notifier.dispatch(Notification::success(
                format!("Executing playbook {name}"),
                "View results in the execution history",
            ));
            Ok(())
        }
        Err(err) => {
            let message = err.to_string();
            let description = if message.is_empty() {
                "Unknown error".to_string()
            } else {
                message
            };
            notifier.dispatch(Notification::danger(
                "Failed to execute playbook",
                description,
            ));
            Err(err)
        }
    }
}

/// Download the generated playbook, announcing the preparation step.
#[instrument(skip(api, notifier), fields(remediation = %id))]
pub async fn download_playbook(
    api: &dyn PlaybookApi,
    notifier: &dyn Notifier,
    id: RemediationId,
) -> ClientResult<Vec<u8>> {
    notifier.dispatch(Notification::info(
        "Preparing playbook for download",
        "Once complete, your download will start automatically.",
    ));
    api.download(&id).await
}
