//! Track matching against the catalog search endpoint.
//!
//! The search query is built from the sanitized title and the release year
//! only. Artist names are deliberately left out of the query text: the
//! catalog's own artist-field search is too strict for multi-artist or
//! alias-heavy electronic-music metadata, so title+year casts a wide net
//! and the artist match is verified client-side instead.
//!
//! Matching walks the server-returned pages in order and picks the first
//! candidate whose artist set shares at least one name with the query's
//! co-artist set, case- and diacritic-insensitively. There is no scoring
//! beyond first-found. A candidate without an artist list (a market
//! availability gap) is skipped. An empty page, an exhausted pagination or
//! a malformed response body all resolve to [`MatchResult::NotFound`];
//! none of them aborts a batch.

use std::collections::HashSet;

use crate::{
    Res, config,
    management::SharedSession,
    spotify::request,
    types::{CatalogTrack, MatchResult, SearchPage, SearchResponse, TrackQuery},
    utils,
};

/// Results requested per search page.
pub const PAGE_LIMIT: u32 = 50;

/// What one page of results tells us: a match, a further page to pull, or
/// the end of the road.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Matched(String),
    Continue(String),
    Exhausted,
}

/// Builds the free-text search query for a track.
pub fn build_query(query: &TrackQuery) -> String {
    format!(
        "track:{} year:{}",
        utils::sanitize_title(&query.title),
        query.year
    )
}

/// Normalized artist-name set of a candidate, or nothing when the catalog
/// returned no artist list for it.
pub fn candidate_artist_set(candidate: &CatalogTrack) -> Option<HashSet<String>> {
    candidate.artists.as_ref().map(|artists| {
        artists
            .iter()
            .map(|a| utils::normalize_artist(&a.name))
            .collect()
    })
}

/// First candidate (lowest index) whose artist set intersects the query's
/// artist set. Candidates without artist information never match.
pub fn match_in_page<'a>(
    query_artists: &HashSet<String>,
    items: &'a [CatalogTrack],
) -> Option<&'a CatalogTrack> {
    items.iter().find(|item| {
        candidate_artist_set(item)
            .map(|set| !set.is_disjoint(query_artists))
            .unwrap_or(false)
    })
}

/// Applies the matching policy to one page.
///
/// A page with zero items terminates the search unresolved regardless of
/// any next link; the catalog never returns items after an empty page.
pub fn page_outcome(query_artists: &HashSet<String>, page: &SearchPage) -> PageOutcome {
    if page.items.is_empty() {
        return PageOutcome::Exhausted;
    }

    if let Some(matched) = match_in_page(query_artists, &page.items) {
        return PageOutcome::Matched(matched.id.clone());
    }

    match &page.next {
        Some(url) => PageOutcome::Continue(url.clone()),
        None => PageOutcome::Exhausted,
    }
}

/// Resolves one track query to a catalog id, following pagination until a
/// match or exhaustion.
pub async fn search_track(session: &SharedSession, query: &TrackQuery) -> Res<MatchResult> {
    let query_artists = utils::normalize_artist_list(&query.artist);
    let q = build_query(query);
    let market = config::spotify_market();
    let limit = PAGE_LIMIT.to_string();
    let api_url = format!("{}/search", config::spotify_apiurl());

    let mut next_url: Option<String> = None;
    loop {
        let response = match &next_url {
            None => {
                request::send(session, |client, token| {
                    client
                        .get(&api_url)
                        .query(&[
                            ("q", q.as_str()),
                            ("type", "track"),
                            ("market", market.as_str()),
                            ("limit", limit.as_str()),
                        ])
                        .bearer_auth(token)
                })
                .await?
            }
            // further pages come back as fully-qualified URLs
            Some(url) => {
                request::send(session, |client, token| client.get(url).bearer_auth(token)).await?
            }
        };

        let page = match response.json::<SearchResponse>().await {
            Ok(body) => body.tracks,
            // missing expected keys is a catalog quirk, not a batch failure
            Err(_) => return Ok(MatchResult::NotFound),
        };

        match page_outcome(&query_artists, &page) {
            PageOutcome::Matched(id) => return Ok(MatchResult::Found(id)),
            PageOutcome::Continue(url) => next_url = Some(url),
            PageOutcome::Exhausted => return Ok(MatchResult::NotFound),
        }
    }
}
