use std::{sync::Arc, time::Duration};

use tabled::Table;

use crate::{
    cli::{spinner, track_table},
    config, error,
    home::{AggregationCoordinator, AggregationError, HomeSection, build_sections},
    info,
    spotify::WebApiClient,
    types::{AlbumTableRow, PlaylistTableRow},
    utils, warning,
};

pub async fn home(timeout: Option<u64>) {
    let api = match WebApiClient::from_cache().await {
        Ok(client) => Arc::new(client),
        Err(e) => error!(
            "Failed to load token. Please run sporlfeed auth\n Error: {}",
            e
        ),
    };

    let deadline = timeout
        .map(Duration::from_secs)
        .unwrap_or_else(config::home_fetch_timeout);
    let coordinator = AggregationCoordinator::new(api).with_deadline(deadline);

    // ctrl-c aborts all in-flight requests instead of leaving them running
    let cancel = coordinator.cancel_handle();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let pb = spinner("Fetching home feed...");
    let feed = coordinator.fetch_all().await;
    pb.finish_and_clear();
    ctrl_c.abort();

    let result = match feed {
        Ok(result) => result,
        Err(AggregationError::Cancelled) => {
            warning!("Loading the home feed was cancelled.");
            return;
        }
        Err(e) => {
            warning!("{}", e);
            e.into_partial().unwrap_or_default()
        }
    };

    let sections = build_sections(result);
    if sections.is_empty() {
        error!("Could not load any section of the home feed.");
    }

    for section in sections {
        render_section(section);
    }

    info!("Use sporlfeed album <id> or sporlfeed playlist <id> to list the tracks.");
}

fn render_section(section: HomeSection) {
    let title = section.title();
    let table = match section {
        HomeSection::NewReleases(albums) => Table::new(albums.into_iter().map(|a| AlbumTableRow {
            artist: utils::first_artist_name(&a.artists),
            id: a.id,
            name: a.name,
            tracks: a.total_tracks,
            released: a.release_date,
        })),
        HomeSection::FeaturedPlaylists(playlists) => {
            Table::new(playlists.into_iter().map(|p| PlaylistTableRow {
                id: p.id,
                name: p.name,
                owner: p.owner.display_name.unwrap_or(p.owner.id),
            }))
        }
        HomeSection::RecommendedTracks(tracks) => track_table(tracks),
    };

    println!("{title}\n{table}\n", title = title, table = table);
}
