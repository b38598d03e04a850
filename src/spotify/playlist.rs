use async_trait::async_trait;

use crate::{
    error::MigrationError,
    migration::{DestinationCatalog, UPLOAD_CHUNK_SIZE},
    spotify::client::{SpotifyClient, check},
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest,
        CreatePlaylistResponse,
    },
    utils::decode_response,
};

#[async_trait]
impl DestinationCatalog for SpotifyClient {
    /// Creates a private playlist for the current user.
    async fn create_playlist(&self, name: &str) -> Result<String, MigrationError> {
        let user_id = self.current_user_id().await?;
        let url = self.url(&format!("/users/{}/playlists", user_id));
        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: "Migrated from Deezer by deezify".to_string(),
            public: false,
            collaborative: false,
        };

        let response = self
            .authorized(|http| http.post(&url).json(&body))
            .await?
            .send()
            .await?;
        let playlist: CreatePlaylistResponse =
            decode_response("spotify", check(response).await?).await?;

        Ok(playlist.id)
    }

    async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<(), MigrationError> {
        if uris.len() > UPLOAD_CHUNK_SIZE {
            return Err(MigrationError::upstream(
                "spotify",
                None,
                format!(
                    "cannot add {} tracks at once, the limit is {}",
                    uris.len(),
                    UPLOAD_CHUNK_SIZE
                ),
            ));
        }

        let url = self.url(&format!("/playlists/{}/tracks", playlist_id));
        let body = AddTrackToPlaylistRequest {
            uris: uris.to_vec(),
        };

        let response = self
            .authorized(|http| http.post(&url).json(&body))
            .await?
            .send()
            .await?;
        let _: AddTrackToPlaylistResponse =
            decode_response("spotify", check(response).await?).await?;

        Ok(())
    }
}
