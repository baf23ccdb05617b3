use crate::{info, utils, warning};

/// Hands playback of a track over to the Spotify app or web player.
pub fn play(track: String) {
    let track_id = track.trim_start_matches("spotify:track:");
    let url = utils::track_url(track_id);

    if webbrowser::open(&url).is_err() {
        warning!("Failed to open browser. Open the track manually:\n{}", url);
        return;
    }

    info!("Opened {} for playback", url);
}
