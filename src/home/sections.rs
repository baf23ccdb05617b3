use crate::{
    home::{result::AggregationResult, task::Slot},
    types::{Album, AudioTrack, Playlist},
};

/// A renderable section of the home screen.
#[derive(Debug, Clone)]
pub enum HomeSection {
    NewReleases(Vec<Album>),
    FeaturedPlaylists(Vec<Playlist>),
    RecommendedTracks(Vec<AudioTrack>),
}

impl HomeSection {
    pub fn slot(&self) -> Slot {
        match self {
            HomeSection::NewReleases(_) => Slot::NewReleases,
            HomeSection::FeaturedPlaylists(_) => Slot::FeaturedPlaylists,
            HomeSection::RecommendedTracks(_) => Slot::Recommendations,
        }
    }

    pub fn title(&self) -> &'static str {
        self.slot().title()
    }

    pub fn len(&self) -> usize {
        match self {
            HomeSection::NewReleases(albums) => albums.len(),
            HomeSection::FeaturedPlaylists(playlists) => playlists.len(),
            HomeSection::RecommendedTracks(tracks) => tracks.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Builds the sections for every slot that loaded, in screen order.
pub fn build_sections(result: AggregationResult) -> Vec<HomeSection> {
    let AggregationResult {
        albums,
        playlists,
        tracks,
        ..
    } = result;

    let mut sections = Vec::with_capacity(3);
    if let Some(albums) = albums {
        sections.push(HomeSection::NewReleases(albums));
    }
    if let Some(playlists) = playlists {
        sections.push(HomeSection::FeaturedPlaylists(playlists));
    }
    if let Some(tracks) = tracks {
        sections.push(HomeSection::RecommendedTracks(tracks));
    }
    sections
}
