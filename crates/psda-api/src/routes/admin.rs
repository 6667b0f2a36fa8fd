//! Seeding trigger.

use axum::{body::Bytes, extract::State, Json};
use psda_db::{SeedOptions, SeedReport, WriteMode};
use tracing::info;

use crate::dto::SeedRequest;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// An empty body selects the defaults; anything else must be a valid request.
fn seed_request(body: &[u8]) -> ApiResult<SeedRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(SeedRequest::default());
    }
    Json::<SeedRequest>::from_bytes(body)
        .map(|Json(request)| request)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// Run a seeding pass. Answers 409 while another run holds the lock.
pub async fn seed(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<SeedReport>> {
    let request = seed_request(&body)?;
    let options = SeedOptions {
        sources: request.sources,
        delete_existing: request.delete_existing,
        resource_mode: if request.keep_existing_resources {
            WriteMode::KeepExisting
        } else {
            WriteMode::Overwrite
        },
    };
    info!(?options, "seeding requested over http");
    Ok(Json(state.seeder.run(&options).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_uses_defaults() {
        let request = seed_request(b"").unwrap();
        assert!(request.sources.is_none());
        assert!(request.delete_existing);
        assert!(seed_request(b"  \n").unwrap().delete_existing);
    }

    #[test]
    fn test_partial_body_keeps_remaining_defaults() {
        let request = seed_request(br#"{"sources":["EIA"]}"#).unwrap();
        assert_eq!(request.sources, Some(vec!["EIA".to_string()]));
        assert!(request.delete_existing);
        assert!(!request.keep_existing_resources);
    }

    #[test]
    fn test_malformed_body_is_rejected() {
        let err = seed_request(br#"{"sources":"EIA","delete_existing":false}"#).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
        assert!(seed_request(b"not json").is_err());
    }
}
