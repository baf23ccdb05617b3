use sporlfeed::api::redirect_url;
use sporlfeed::server::callback_path;
use sporlfeed::spotify::playlist::track_uri;
use sporlfeed::spotify::search::{flatten_search_results, search_types_param};
use sporlfeed::types::{Artist, SearchKind, SearchResult, SearchResultResponse, TokenResponse};
use sporlfeed::utils::*;

fn artist(name: &str) -> Artist {
    Artist {
        id: format!("{}_id", name.to_lowercase()),
        name: name.to_string(),
        ..Default::default()
    }
}

#[test]
fn test_generate_code_verifier() {
    let verifier = generate_code_verifier();

    // Should be exactly 128 characters
    assert_eq!(verifier.len(), 128);

    // Should contain only alphanumeric characters
    assert!(verifier.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated verifiers should be different
    let verifier2 = generate_code_verifier();
    assert_ne!(verifier, verifier2);
}

#[test]
fn test_generate_code_challenge() {
    let verifier = "test_verifier_123";
    let challenge = generate_code_challenge(verifier);

    // Should be deterministic - same input produces same output
    assert_eq!(challenge, generate_code_challenge(verifier));

    // Different input should produce different output
    assert_ne!(challenge, generate_code_challenge("different_verifier"));

    // SHA-256 digest, base64 URL-safe without padding
    assert_eq!(challenge.len(), 43);
    assert!(
        challenge
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    );
}

#[test]
fn test_format_duration_ms() {
    assert_eq!(format_duration_ms(0), "0:00");
    assert_eq!(format_duration_ms(999), "0:00");
    assert_eq!(format_duration_ms(61_000), "1:01");
    assert_eq!(format_duration_ms(215_400), "3:35");
    assert_eq!(format_duration_ms(3_600_000), "60:00");
}

#[test]
fn test_first_artist_name() {
    assert_eq!(first_artist_name(&[]), "-");
    assert_eq!(
        first_artist_name(&[artist("Bonobo"), artist("Tycho")]),
        "Bonobo"
    );
}

#[test]
fn test_track_url_and_uri() {
    assert_eq!(track_url("abc"), "https://open.spotify.com/track/abc");
    assert_eq!(track_uri("abc"), "spotify:track:abc");
    // URIs are passed through untouched
    assert_eq!(track_uri("spotify:track:abc"), "spotify:track:abc");
}

#[test]
fn test_search_types_param() {
    // No kinds means every kind
    assert_eq!(search_types_param(&[]), "album,artist,playlist,track");

    // Sorted and deduplicated
    assert_eq!(
        search_types_param(&[SearchKind::Track, SearchKind::Album, SearchKind::Track]),
        "album,track"
    );
}

#[test]
fn test_flatten_search_results_skips_null_playlists() {
    let json = r#"{
        "tracks": { "items": [ { "id": "t1", "name": "Track", "uri": "spotify:track:t1", "duration_ms": 1000 } ] },
        "artists": { "items": [ { "id": "a1", "name": "Artist" } ] },
        "playlists": { "items": [ null, { "id": "p1", "name": "Mix", "owner": { "id": "me", "display_name": null } } ] }
    }"#;
    let res: SearchResultResponse = serde_json::from_str(json).unwrap();

    let results = flatten_search_results(res);

    assert_eq!(results.len(), 3);
    assert!(matches!(&results[0], SearchResult::Artist(a) if a.id == "a1"));
    assert!(matches!(&results[1], SearchResult::Track(t) if t.id == "t1"));
    assert!(matches!(&results[2], SearchResult::Playlist(p) if p.id == "p1"));
}

#[test]
fn test_redirect_url() {
    let redirect_uri = "http://127.0.0.1:8888/callback";
    assert_eq!(
        redirect_url(redirect_uri, Some("code=abc123&state=xyz")),
        "http://127.0.0.1:8888/callback?code=abc123&state=xyz"
    );
    assert_eq!(redirect_url(redirect_uri, Some("")), redirect_uri);
    assert_eq!(redirect_url(redirect_uri, None), redirect_uri);
}

#[test]
fn test_callback_path() {
    assert_eq!(callback_path("http://127.0.0.1:8888/callback"), "/callback");
    assert_eq!(
        callback_path("http://localhost:3000/auth/spotify"),
        "/auth/spotify"
    );
    // Falls back when the URI has no path or does not parse
    assert_eq!(callback_path("http://127.0.0.1:8888"), "/callback");
    assert_eq!(callback_path("not a url"), "/callback");
}

#[test]
fn test_token_response_keeps_previous_refresh_token() {
    let json = r#"{ "access_token": "new", "expires_in": 3600, "scope": "user-read-private" }"#;
    let res: TokenResponse = serde_json::from_str(json).unwrap();

    let token = res.into_token(Some("old-refresh"), 1_000);

    assert_eq!(token.access_token, "new");
    assert_eq!(token.refresh_token, "old-refresh");
    assert_eq!(token.expires_in, 3600);
    assert_eq!(token.obtained_at, 1_000);
}

#[test]
fn test_token_response_prefers_rotated_refresh_token() {
    let json = r#"{ "access_token": "new", "refresh_token": "rotated", "expires_in": 3600 }"#;
    let res: TokenResponse = serde_json::from_str(json).unwrap();

    let token = res.into_token(Some("old-refresh"), 1_000);
    assert_eq!(token.refresh_token, "rotated");

    // An empty refresh token counts as absent
    let json = r#"{ "access_token": "new", "refresh_token": "", "expires_in": 3600 }"#;
    let res: TokenResponse = serde_json::from_str(json).unwrap();
    assert_eq!(res.into_token(Some("old-refresh"), 1_000).refresh_token, "old-refresh");
}
