use crate::{
    spotify::client::{ApiError, WebApiClient},
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, AudioTrack,
        GetUserPlaylistsResponse, Page, Playlist, PlaylistItem,
    },
};

/// Spotify accepts at most this many URIs per add request.
pub const MAX_TRACKS_PER_REQUEST: usize = 100;

/// Page size limit of `GET /playlists/{id}/tracks`.
pub const MAX_PLAYLIST_TRACKS: u32 = 100;

impl WebApiClient {
    /// Lists playlists owned or followed by the current user.
    pub async fn user_playlists(&self, limit: u32) -> Result<Vec<Playlist>, ApiError> {
        let res: GetUserPlaylistsResponse = self
            .get_json("/me/playlists", &[("limit", limit.to_string())])
            .await?;
        Ok(res.items)
    }

    /// Tracks of a playlist, skipping removed items and local files.
    pub async fn playlist_tracks(
        &self,
        playlist_id: &str,
        limit: u32,
    ) -> Result<Vec<AudioTrack>, ApiError> {
        let res: Page<PlaylistItem> = self
            .get_json(
                &format!("/playlists/{}/tracks", playlist_id),
                &[
                    ("limit", limit.clamp(1, MAX_PLAYLIST_TRACKS).to_string()),
                    ("additional_types", "track".to_string()),
                ],
            )
            .await?;
        Ok(playable_tracks(res.items))
    }

    /// Appends tracks to a playlist, returning the last snapshot id.
    pub async fn add_tracks(
        &self,
        playlist_id: &str,
        track_uris: &[String],
    ) -> Result<Option<String>, ApiError> {
        let path = format!("/playlists/{}/tracks", playlist_id);
        let mut snapshot = None;

        for chunk in track_uris.chunks(MAX_TRACKS_PER_REQUEST) {
            let body = AddTrackToPlaylistRequest {
                uris: chunk.to_vec(),
            };
            let res: AddTrackToPlaylistResponse = self.post_json(&path, &body).await?;
            snapshot = Some(res.snapshot_id);
        }

        Ok(snapshot)
    }
}

/// Turns a bare track id into a track URI, leaving URIs untouched.
pub fn track_uri(track: &str) -> String {
    if track.starts_with("spotify:track:") {
        track.to_string()
    } else {
        format!("spotify:track:{}", track)
    }
}

/// Decodes the playable tracks of a playlist page in order.
pub fn playable_tracks(items: Vec<PlaylistItem>) -> Vec<AudioTrack> {
    items
        .into_iter()
        .filter_map(|item| item.track)
        .filter_map(|track| serde_json::from_value::<AudioTrack>(track).ok())
        .filter(|track| !track.id.is_empty())
        .collect()
}
