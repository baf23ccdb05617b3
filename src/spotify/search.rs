use crate::{
    spotify::client::{ApiError, WebApiClient},
    types::{SearchKind, SearchResult, SearchResultResponse},
};

impl WebApiClient {
    /// Searches the catalog for `query` across the given kinds.
    ///
    /// Results are flattened in the order artists, albums, tracks, playlists.
    /// An empty `kinds` slice searches all of them.
    pub async fn search(
        &self,
        query: &str,
        kinds: &[SearchKind],
        limit: u32,
    ) -> Result<Vec<SearchResult>, ApiError> {
        let kinds = search_types_param(kinds);
        let res: SearchResultResponse = self
            .get_json(
                "/search",
                &[
                    ("q", query.to_string()),
                    ("type", kinds),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        Ok(flatten_search_results(res))
    }
}

pub fn search_types_param(kinds: &[SearchKind]) -> String {
    let mut kinds = kinds.to_vec();
    if kinds.is_empty() {
        kinds = vec![
            SearchKind::Album,
            SearchKind::Artist,
            SearchKind::Playlist,
            SearchKind::Track,
        ];
    }
    kinds.sort();
    kinds.dedup();

    kinds
        .iter()
        .map(SearchKind::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

pub fn flatten_search_results(res: SearchResultResponse) -> Vec<SearchResult> {
    let mut results = Vec::new();

    if let Some(artists) = res.artists {
        results.extend(artists.items.into_iter().map(SearchResult::Artist));
    }
    if let Some(albums) = res.albums {
        results.extend(albums.items.into_iter().map(SearchResult::Album));
    }
    if let Some(tracks) = res.tracks {
        results.extend(tracks.items.into_iter().map(SearchResult::Track));
    }
    // spotify returns null entries for playlists it no longer serves
    if let Some(playlists) = res.playlists {
        results.extend(playlists.items.into_iter().flatten().map(SearchResult::Playlist));
    }

    results
}
