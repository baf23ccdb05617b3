use tabled::Table;

use crate::{
    cli::spinner,
    error, info,
    spotify::WebApiClient,
    types::{SearchKind, SearchResult, SearchTableRow},
    utils,
};

pub async fn search(query: String, kinds: Vec<SearchKind>, limit: u32) {
    let api = match WebApiClient::from_cache().await {
        Ok(client) => client,
        Err(e) => error!(
            "Failed to load token. Please run sporlfeed auth\n Error: {}",
            e
        ),
    };

    let pb = spinner("Searching...");
    let results = api.search(&query, &kinds, limit).await;
    pb.finish_and_clear();

    let results = match results {
        Ok(results) => results,
        Err(e) => error!("Search failed. Err: {}", e),
    };

    if results.is_empty() {
        info!("Nothing found for \"{}\"", query);
        return;
    }

    let rows: Vec<SearchTableRow> = results.into_iter().map(search_row).collect();
    println!("{}", Table::new(rows));
}

fn search_row(result: SearchResult) -> SearchTableRow {
    match result {
        SearchResult::Artist(a) => SearchTableRow {
            kind: "artist".to_string(),
            id: a.id,
            name: a.name,
            by: "-".to_string(),
        },
        SearchResult::Album(a) => SearchTableRow {
            kind: "album".to_string(),
            by: utils::first_artist_name(&a.artists),
            id: a.id,
            name: a.name,
        },
        SearchResult::Track(t) => SearchTableRow {
            kind: "track".to_string(),
            by: utils::first_artist_name(&t.artists),
            id: t.id,
            name: t.name,
        },
        SearchResult::Playlist(p) => SearchTableRow {
            kind: "playlist".to_string(),
            by: p.owner.display_name.unwrap_or(p.owner.id),
            id: p.id,
            name: p.name,
        },
    }
}
