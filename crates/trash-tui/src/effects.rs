//! Runs `ApiRequest`s against the server and reports back as `ApiOutcome`s.

use tracing::info;
use trash_proto::protocol::{DeleteResponse, EmptyResponse, RestoreResponse};
use trash_proto::{ApiError, TrashClient, TrashListing};

use crate::action::ApiRequest;

/// Result of one request, delivered to the event loop.
#[derive(Debug)]
pub enum ApiOutcome {
    Listed(Result<TrashListing, ApiError>),
    Restored {
        name: String,
        result: Result<RestoreResponse, ApiError>,
    },
    Deleted {
        name: String,
        result: Result<DeleteResponse, ApiError>,
    },
    Emptied(Result<EmptyResponse, ApiError>),
}

pub async fn execute(client: &TrashClient, request: ApiRequest) -> ApiOutcome {
    match request {
        ApiRequest::List => ApiOutcome::Listed(client.list().await),
        ApiRequest::Restore { trash_path, name } => {
            info!("restoring {}", trash_path);
            ApiOutcome::Restored {
                name,
                result: client.restore(&trash_path).await,
            }
        }
        ApiRequest::Delete { trash_path, name } => {
            info!("deleting {}", trash_path);
            ApiOutcome::Deleted {
                name,
                result: client.delete(&trash_path).await,
            }
        }
        ApiRequest::Empty => {
            info!("emptying trash");
            ApiOutcome::Emptied(client.empty().await)
        }
    }
}
