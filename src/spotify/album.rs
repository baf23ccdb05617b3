use crate::{
    spotify::client::{ApiError, WebApiClient},
    types::{AudioTrack, Page},
};

/// Page size limit of `GET /albums/{id}/tracks`.
pub const MAX_ALBUM_TRACKS: u32 = 50;

impl WebApiClient {
    /// Tracks of an album in disc and track order.
    ///
    /// The endpoint returns simplified tracks, so `album` is `None` on every
    /// item.
    pub async fn album_tracks(
        &self,
        album_id: &str,
        limit: u32,
    ) -> Result<Vec<AudioTrack>, ApiError> {
        let res: Page<AudioTrack> = self
            .get_json(
                &format!("/albums/{}/tracks", album_id),
                &[("limit", limit.clamp(1, MAX_ALBUM_TRACKS).to_string())],
            )
            .await?;
        Ok(res.items)
    }
}
