use chartsync::store::{BATCH_CAP, Selection, Store};
use chartsync::types::{AudioFeatures, ChartTrack};

// Helper to create a scraped track record
fn chart_track(title: &str, artist: &str, date: &str) -> ChartTrack {
    ChartTrack {
        chart_name: "Peak Time Picks".to_string(),
        chart_author: "Philippe Petit".to_string(),
        chart_date: "2023-07-01".to_string(),
        title: title.to_string(),
        artists: vec![artist.to_string()],
        remixers: Vec::new(),
        label: "Suara".to_string(),
        genre: "Techno".to_string(),
        bpm: Some(130),
        key: Some("A min".to_string()),
        release_date: date.to_string(),
        length_ms: Some(390_000),
    }
}

fn sample_features() -> AudioFeatures {
    AudioFeatures {
        tempo: Some(130.0),
        energy: Some(0.9),
        ..AudioFeatures::default()
    }
}

#[test]
fn test_upsert_track_deduplicates_on_key() {
    let store = Store::open_in_memory().unwrap();

    assert!(store.upsert_track(&chart_track("Remember", "Philippe Petit", "2023-06-15")).unwrap());
    // same (title, artist, release date) key: ignored
    assert!(!store.upsert_track(&chart_track("Remember", "Philippe Petit", "2023-06-15")).unwrap());
    // different release date: new row
    assert!(store.upsert_track(&chart_track("Remember", "Philippe Petit", "2024-01-05")).unwrap());

    assert_eq!(store.count_tracks().unwrap(), 2);
}

#[test]
fn test_tracks_missing_features_excludes_completed_rows() {
    let store = Store::open_in_memory().unwrap();
    store.upsert_track(&chart_track("Remember", "Philippe Petit", "2023-06-15")).unwrap();
    store.upsert_track(&chart_track("Perimeter", "JXTPS", "2023-03-10")).unwrap();

    let pending = store.tracks_missing_features(100).unwrap();
    assert_eq!(pending.len(), 2);
    assert_eq!(pending[0].year, 2023);

    store.insert_features(pending[0].id, Some(&sample_features())).unwrap();

    let remaining = store.tracks_missing_features(100).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].title, "Perimeter");
}

#[test]
fn test_all_null_row_marks_looked_up_not_found() {
    let store = Store::open_in_memory().unwrap();
    store.upsert_track(&chart_track("Motor", "Roseen", "2023-05-01")).unwrap();

    let pending = store.tracks_missing_features(100).unwrap();
    store.insert_features(pending[0].id, None).unwrap();

    // "looked up, not found" is distinct from "never attempted"
    assert!(store.tracks_missing_features(100).unwrap().is_empty());
    assert_eq!(store.count_unresolved().unwrap(), 1);
    assert_eq!(store.count_feature_rows().unwrap(), 1);
}

#[test]
fn test_feature_rows_are_unique_per_track() {
    let store = Store::open_in_memory().unwrap();
    store.upsert_track(&chart_track("Reset", "Decka", "2023-02-20")).unwrap();

    let pending = store.tracks_missing_features(100).unwrap();
    store.insert_features(pending[0].id, Some(&sample_features())).unwrap();

    // a re-run must not produce a duplicate feature row
    assert!(store.insert_features(pending[0].id, Some(&sample_features())).is_err());
    assert_eq!(store.count_feature_rows().unwrap(), 1);
}

#[test]
fn test_missing_features_respects_limit_and_cap() {
    let store = Store::open_in_memory().unwrap();
    for i in 0..10 {
        store
            .upsert_track(&chart_track(&format!("Track {}", i), "Decka", "2023-02-20"))
            .unwrap();
    }

    assert_eq!(store.tracks_missing_features(3).unwrap().len(), 3);
    // a limit above the cap is clamped, not honored
    assert_eq!(BATCH_CAP, 1000);
    assert_eq!(store.tracks_missing_features(5000).unwrap().len(), 10);
}

#[test]
fn test_select_tracks_by_mode() {
    let store = Store::open_in_memory().unwrap();
    store.upsert_track(&chart_track("Remember", "Philippe Petit", "2023-06-15")).unwrap();

    let mut other = chart_track("Exile", "Dimi Angelis", "2023-04-01");
    other.chart_name = "Warehouse Weapons".to_string();
    other.chart_author = "Dimi Angelis".to_string();
    other.genre = "Hard Techno".to_string();
    store.upsert_track(&other).unwrap();

    let by_chart = store.select_tracks(&Selection::Chart("Peak Time Picks".to_string())).unwrap();
    assert_eq!(by_chart.len(), 1);
    assert_eq!(by_chart[0].title, "Remember");

    let by_author = store.select_tracks(&Selection::Author("Dimi Angelis".to_string())).unwrap();
    assert_eq!(by_author.len(), 1);
    assert_eq!(by_author[0].title, "Exile");

    let by_artist = store.select_tracks(&Selection::Artist("Philippe".to_string())).unwrap();
    assert_eq!(by_artist.len(), 1);

    let by_genre = store.select_tracks(&Selection::Genre("Hard Techno".to_string())).unwrap();
    assert_eq!(by_genre.len(), 1);
    assert_eq!(by_genre[0].title, "Exile");
}

#[test]
fn test_remixers_persist_as_joined_list() {
    let store = Store::open_in_memory().unwrap();
    let mut track = chart_track("Imadub", "Kessell", "2023-08-01");
    track.artists = vec!["Kessell".to_string(), "Kerqus".to_string()];
    track.remixers = vec!["Sev Dah".to_string()];
    store.upsert_track(&track).unwrap();

    let pending = store.tracks_missing_features(10).unwrap();
    assert_eq!(pending[0].artist, "Kessell, Kerqus");
}
