use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::{
    spotify::client::{ApiError, WebApiClient},
    types::{
        Album, AudioTrack, FeaturedPlaylistsResponse, NewReleasesResponse, Playlist,
        RecommendationGenresResponse, RecommendationsResponse,
    },
};

/// Items requested per browse section.
pub const SECTION_LIMIT: u32 = 50;

/// Endpoints behind the home feed.
///
/// Implemented by [`WebApiClient`]; tests substitute canned responses.
#[async_trait]
pub trait BrowseApi: Send + Sync {
    /// `GET /browse/new-releases`
    async fn get_new_releases(&self) -> Result<Vec<Album>, ApiError>;

    /// `GET /browse/featured-playlists`
    async fn get_featured_playlists(&self) -> Result<Vec<Playlist>, ApiError>;

    /// `GET /recommendations/available-genre-seeds`
    async fn get_recommendation_genres(&self) -> Result<Vec<String>, ApiError>;

    /// `GET /recommendations?seed_genres=...`
    async fn get_recommendations(
        &self,
        seed_genres: &BTreeSet<String>,
    ) -> Result<Vec<AudioTrack>, ApiError>;
}

#[async_trait]
impl BrowseApi for WebApiClient {
    async fn get_new_releases(&self) -> Result<Vec<Album>, ApiError> {
        let res: NewReleasesResponse = self
            .get_json(
                "/browse/new-releases",
                &[("limit", SECTION_LIMIT.to_string())],
            )
            .await?;
        Ok(res.albums.items)
    }

    async fn get_featured_playlists(&self) -> Result<Vec<Playlist>, ApiError> {
        let res: FeaturedPlaylistsResponse = self
            .get_json(
                "/browse/featured-playlists",
                &[("limit", SECTION_LIMIT.to_string())],
            )
            .await?;
        Ok(res.playlists.items)
    }

    async fn get_recommendation_genres(&self) -> Result<Vec<String>, ApiError> {
        let res: RecommendationGenresResponse = self
            .get_json("/recommendations/available-genre-seeds", &[])
            .await?;
        Ok(res.genres)
    }

    async fn get_recommendations(
        &self,
        seed_genres: &BTreeSet<String>,
    ) -> Result<Vec<AudioTrack>, ApiError> {
        let seeds = seed_genres
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",");

        let res: RecommendationsResponse = self
            .get_json(
                "/recommendations",
                &[
                    ("limit", SECTION_LIMIT.to_string()),
                    ("seed_genres", seeds),
                ],
            )
            .await?;
        Ok(res.tracks)
    }
}
