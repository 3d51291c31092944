use chartsync::utils::*;
use std::collections::HashSet;

#[test]
fn test_sanitize_title_strips_query_limiters() {
    assert_eq!(sanitize_title("Take It Off (Extended)"), "Take It Off Extended");
    assert_eq!(sanitize_title("Who's Afraid?"), "Whos Afraid");
    assert_eq!(sanitize_title("A/B: Test #1"), "AB Test 1");
}

#[test]
fn test_sanitize_title_drops_feat_suffix() {
    assert_eq!(sanitize_title("Take It Off feat. Aatig"), "Take It Off");
    assert_eq!(sanitize_title("Take It Off Feat. Aatig"), "Take It Off");
    assert_eq!(sanitize_title("Take It Off (feat. Aatig)"), "Take It Off");
}

#[test]
fn test_sanitize_title_without_feat_is_unchanged() {
    assert_eq!(sanitize_title("Remember"), "Remember");
}

#[test]
fn test_normalize_artist_list_splits_and_lowercases() {
    let set = normalize_artist_list("Kessell, Kerqus");
    let expected: HashSet<String> = ["kessell", "kerqus"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(set, expected);
}

#[test]
fn test_normalize_artist_list_strips_diacritics() {
    let set = normalize_artist_list("François K");
    assert!(set.contains("francois k"));
}

#[test]
fn test_normalize_artist_list_ignores_empty_segments() {
    let set = normalize_artist_list("Decka, ");
    assert_eq!(set.len(), 1);
    assert!(set.contains("decka"));
}

#[test]
fn test_normalize_artist_transliterates() {
    assert_eq!(normalize_artist("Âme"), "ame");
    assert_eq!(normalize_artist("  Sev Dah "), "sev dah");
}

#[test]
fn test_sample_seeds_returns_all_when_few() {
    let ids: Vec<String> = vec!["a".into(), "b".into(), "c".into()];
    assert_eq!(sample_seeds(&ids, 5), ids);
}

#[test]
fn test_sample_seeds_samples_exactly_count() {
    let ids: Vec<String> = (0..20).map(|i| format!("id{}", i)).collect();
    let seeds = sample_seeds(&ids, 5);
    assert_eq!(seeds.len(), 5);

    // every seed comes from the input, no duplicates
    let unique: HashSet<&String> = seeds.iter().collect();
    assert_eq!(unique.len(), 5);
    for seed in &seeds {
        assert!(ids.contains(seed));
    }
}

#[test]
fn test_track_uri() {
    assert_eq!(track_uri("abc123"), "spotify:track:abc123");
}

#[test]
fn test_urlencode_passes_unreserved() {
    assert_eq!(urlencode("abc-DEF_1.2~"), "abc-DEF_1.2~");
}

#[test]
fn test_urlencode_escapes_reserved() {
    assert_eq!(
        urlencode("http://localhost:7777/callback"),
        "http%3A%2F%2Flocalhost%3A7777%2Fcallback"
    );
    assert_eq!(urlencode("a b"), "a%20b");
}

#[test]
fn test_release_year() {
    assert_eq!(release_year("2023-06-15"), Some(2023));
    assert_eq!(release_year("2023"), Some(2023));
    assert_eq!(release_year("junk"), None);
    assert_eq!(release_year(""), None);
}
