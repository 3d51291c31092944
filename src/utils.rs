use std::collections::HashSet;

use deunicode::deunicode;
use rand::seq::IndexedRandom;

// Queries containing these break the search endpoint even when percent-encoded.
const QUERY_LIMITERS: &str = ":/?#[]@!$&'()*+,;=";

/// Strips punctuation the search endpoint chokes on and drops any
/// "feat." suffix from a scraped track title.
pub fn sanitize_title(title: &str) -> String {
    let stripped: String = title
        .chars()
        .filter(|c| !QUERY_LIMITERS.contains(*c))
        .collect();

    // ASCII-only lowering keeps byte offsets aligned with `stripped`
    let lower: String = stripped.chars().map(|c| c.to_ascii_lowercase()).collect();
    let cut = lower.find("feat").map_or(stripped.len(), |idx| idx);

    stripped[..cut].trim_end().to_string()
}

/// Lowercased, transliterated artist-name set from a comma-joined co-artist
/// list. Matching against catalog candidates is set intersection, so order
/// and duplicates are irrelevant.
pub fn normalize_artist_list(artists: &str) -> HashSet<String> {
    artists
        .split(',')
        .map(|a| deunicode(a.trim()).to_lowercase())
        .filter(|a| !a.is_empty())
        .collect()
}

/// Lowercased, transliterated form of a single artist name.
pub fn normalize_artist(name: &str) -> String {
    deunicode(name.trim()).to_lowercase()
}

/// Samples recommendation seeds from a list of resolved track ids.
///
/// The recommendations endpoint accepts at most five seeds; when more ids
/// are available five are chosen at random, otherwise all of them are used.
pub fn sample_seeds(track_ids: &[String], count: usize) -> Vec<String> {
    if track_ids.len() <= count {
        return track_ids.to_vec();
    }

    let mut rng = rand::rng();
    track_ids.choose_multiple(&mut rng, count).cloned().collect()
}

/// Turns a bare track id into the URI form the playlist endpoints expect.
pub fn track_uri(track_id: &str) -> String {
    format!("spotify:track:{}", track_id)
}

/// Percent-encodes a query component for the authorization URL.
pub fn urlencode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            other => out.push_str(&format!("%{:02X}", other)),
        }
    }
    out
}

/// Extracts a four-digit year from a release date string ("2023-06-15").
pub fn release_year(release_date: &str) -> Option<i32> {
    release_date.get(0..4).and_then(|y| y.parse().ok())
}
