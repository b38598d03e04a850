use axum::{Json, http::StatusCode};

use crate::{migration::Migrator, success, types::MigrationResponse, warning};

/// Runs a full migration with the cached tokens.
///
/// Responds with `{message, errors}` on success. Any failure that stops the
/// run, including one after some playlists were already created, yields a
/// generic 500 without `errors`; details only go to the server output.
pub async fn migrate() -> (StatusCode, Json<MigrationResponse>) {
    let outcome = match Migrator::from_env().await {
        Ok(migrator) => migrator.run().await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(report) => {
            success!("{}", report.message);
            (
                StatusCode::OK,
                Json(MigrationResponse {
                    message: report.message,
                    errors: Some(report.errors),
                }),
            )
        }
        Err(e) => {
            warning!("Migration failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MigrationResponse {
                    message: "Migration failed".to_string(),
                    errors: None,
                }),
            )
        }
    }
}
