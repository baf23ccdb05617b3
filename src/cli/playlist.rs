use tabled::Table;

use crate::{
    cli::load_client,
    error, info,
    spotify::playlist::track_uri,
    success,
    types::PlaylistTableRow,
};

pub async fn playlists(limit: u32) {
    let api = load_client().await;

    let playlists = match api.user_playlists(limit).await {
        Ok(playlists) => playlists,
        Err(e) => error!("Failed to load playlists. Err: {}", e),
    };

    if playlists.is_empty() {
        info!("You have no playlists yet.");
        return;
    }

    let rows: Vec<PlaylistTableRow> = playlists
        .into_iter()
        .map(|p| PlaylistTableRow {
            id: p.id,
            name: p.name,
            owner: p.owner.display_name.unwrap_or(p.owner.id),
        })
        .collect();
    println!("{}", Table::new(rows));
}

pub async fn add_to_playlist(track: String, playlist_id: String) {
    let api = load_client().await;

    let uris = vec![track_uri(&track)];
    match api.add_tracks(&playlist_id, &uris).await {
        Ok(_) => success!("Added track to playlist {}", playlist_id),
        Err(e) => error!("Failed to add track to playlist. Err: {}", e),
    }
}
