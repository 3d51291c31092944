use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Durable credential record read at startup and rewritten on token rotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// One scraped chart row, normalized for persistence.
///
/// `artists` and `remixers` keep the scraped ordering; they are comma-joined
/// before hitting the store so the uniqueness key stays stable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartTrack {
    pub chart_name: String,
    pub chart_author: String,
    pub chart_date: String,
    pub title: String,
    pub artists: Vec<String>,
    pub remixers: Vec<String>,
    pub label: String,
    pub genre: String,
    pub bpm: Option<u16>,
    pub key: Option<String>,
    pub release_date: String,
    pub length_ms: Option<u32>,
}

/// Immutable input to matching: a (title, artist, year) tuple pulled from
/// the store. `artist` is a comma-joined list of co-artists.
#[derive(Debug, Clone)]
pub struct TrackQuery {
    pub title: String,
    pub artist: String,
    pub year: i32,
}

/// Terminal output of the matcher for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    Found(String),
    NotFound,
}

impl MatchResult {
    pub fn track_id(&self) -> Option<&str> {
        match self {
            MatchResult::Found(id) => Some(id),
            MatchResult::NotFound => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub tracks: SearchPage,
}

/// One page of catalog search results. `next` carries the fully-qualified
/// URL of the following page, or nothing on the last page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPage {
    pub items: Vec<CatalogTrack>,
    pub next: Option<String>,
}

/// A search candidate. The artist list can be absent for candidates outside
/// the requested market; such candidates are never matched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogTrack {
    pub id: String,
    pub name: Option<String>,
    pub artists: Option<Vec<CatalogArtist>>,
    pub external_urls: Option<ExternalUrls>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogArtist {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}

/// Audio feature record for one track. Every field is optional so an
/// unavailable analysis persists as an all-null row instead of failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub acousticness: Option<f64>,
    pub danceability: Option<f64>,
    pub energy: Option<f64>,
    pub instrumentalness: Option<f64>,
    pub liveness: Option<f64>,
    pub loudness: Option<f64>,
    pub speechiness: Option<f64>,
    pub tempo: Option<f64>,
    pub time_signature: Option<i32>,
    pub valence: Option<f64>,
}

/// Batch response of the audio-features endpoint. Entries are aligned with
/// the requested ids; ids without an analysis come back as `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioFeaturesResponse {
    pub audio_features: Vec<Option<AudioFeatures>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub tracks: Vec<RecommendedTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendedTrack {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTracksRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTracksResponse {
    pub snapshot_id: String,
}

#[derive(Tabled)]
pub struct MatchTableRow {
    pub title: String,
    pub artist: String,
    pub result: String,
}

#[derive(Tabled)]
pub struct InfoTableRow {
    pub metric: String,
    pub value: String,
}
