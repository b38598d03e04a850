use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};

use crate::{
    config,
    error::MigrationError,
    types::{ErrorLedger, ErrorTableRow},
};

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// HTTP client shared by the catalog clients, with the configured timeout.
pub fn http_client() -> Result<Client, MigrationError> {
    Ok(Client::builder().timeout(config::http_timeout()?).build()?)
}

/// Decodes a JSON body. A body that does not fit `T` is reported as an
/// upstream error of `service`, with the response status.
pub fn decode_body<T: DeserializeOwned>(
    service: &'static str,
    status: u16,
    body: &str,
) -> Result<T, MigrationError> {
    serde_json::from_str(body).map_err(|e| {
        MigrationError::upstream(
            service,
            Some(status),
            format!("unexpected response body: {}", e),
        )
    })
}

/// Reads and decodes a response body. Only transport failures stay
/// `MigrationError::Network`.
pub async fn decode_response<T: DeserializeOwned>(
    service: &'static str,
    response: Response,
) -> Result<T, MigrationError> {
    let status = response.status().as_u16();
    let body = response.text().await?;
    decode_body(service, status, &body)
}

/// Lowercases a playlist title and replaces spaces with underscores.
pub fn normalize_playlist_name(title: &str) -> String {
    title.to_lowercase().replace(' ', "_")
}

/// Name of the playlist created on the destination, e.g. `deezer_my_mix`.
pub fn destination_playlist_name(source_tag: &str, normalized_name: &str) -> String {
    format!("{}_{}", source_tag, normalized_name)
}

pub fn error_table_rows(errors: &ErrorLedger) -> Vec<ErrorTableRow> {
    errors
        .iter()
        .flat_map(|(playlist, tracks)| {
            tracks.iter().map(move |track| ErrorTableRow {
                playlist: playlist.clone(),
                track: track.clone(),
            })
        })
        .collect()
}
