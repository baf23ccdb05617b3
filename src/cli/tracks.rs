use crate::{
    cli::{load_client, spinner, track_table},
    error, info,
};

/// Lists the tracks of an album, e.g. one shown under new releases.
pub async fn album(album_id: String, limit: u32) {
    let api = load_client().await;

    let pb = spinner("Fetching album tracks...");
    let tracks = api.album_tracks(&album_id, limit).await;
    pb.finish_and_clear();

    match tracks {
        Ok(tracks) if tracks.is_empty() => info!("Album {} has no tracks.", album_id),
        Ok(tracks) => println!("{}", track_table(tracks)),
        Err(e) => error!("Failed to load album {}. Err: {}", album_id, e),
    }
}

/// Lists the tracks of a playlist, e.g. one shown under featured playlists.
pub async fn playlist(playlist_id: String, limit: u32) {
    let api = load_client().await;

    let pb = spinner("Fetching playlist tracks...");
    let tracks = api.playlist_tracks(&playlist_id, limit).await;
    pb.finish_and_clear();

    match tracks {
        Ok(tracks) if tracks.is_empty() => {
            info!("Playlist {} has no playable tracks.", playlist_id)
        }
        Ok(tracks) => println!("{}", track_table(tracks)),
        Err(e) => error!("Failed to load playlist {}. Err: {}", playlist_id, e),
    }
}
