use chartsync::charts::{parse_chart_index, parse_chart_page, parse_track_length};

const INDEX_PAGE: &str = r#"
<html><body>
  <div class="chart-card"><a class="artwork" href="/chart/peak-time-picks/1001"></a></div>
  <div class="chart-card"><a class="artwork" href="/chart/warehouse-weapons/1002"></a></div>
  <div class="pages">
    <a href="/charts/all?page=1">1</a>
    <a class="active" href="/charts/all?page=2">2</a>
    <a href="/charts/all?page=3">3</a>
  </div>
</body></html>
"#;

const LAST_INDEX_PAGE: &str = r#"
<html><body>
  <div class="chart-card"><a class="artwork" href="/chart/final/2001"></a></div>
  <div class="pages">
    <a href="/charts/all?page=2">2</a>
    <a class="active" href="/charts/all?page=3">3</a>
  </div>
</body></html>
"#;

const CHART_PAGE: &str = r##"
<html><body>
  <h1 class="chart-name">Peak Time Picks</h1>
  <a class="chart-author" href="/artist/philippe-petit">Philippe Petit</a>
  <span class="chart-date">2023-07-01</span>
  <div class="track-row">
    <span class="track-title">Remember</span>
    <div class="track-artists"><a href="#">Philippe Petit</a></div>
    <div class="track-remixers"><a href="#">Sev Dah</a></div>
    <span class="track-label">Suara</span>
    <span class="track-genre">Techno</span>
    <span class="track-bpm">130</span>
    <span class="track-key">A min</span>
    <span class="track-date">2023-06-15</span>
    <span class="track-length">6:30</span>
  </div>
  <div class="track-row">
    <span class="track-title">Perimeter</span>
    <div class="track-artists"><a href="#">JXTPS</a><a href="#">Decka</a></div>
    <span class="track-label">Soma</span>
    <span class="track-genre">Techno</span>
    <span class="track-date">2023-03-10</span>
  </div>
  <div class="track-row">
    <span class="track-title"></span>
    <div class="track-artists"><a href="#">Nobody</a></div>
  </div>
</body></html>
"##;

#[test]
fn test_index_collects_chart_links() {
    let index = parse_chart_index(INDEX_PAGE);
    assert_eq!(
        index.chart_links,
        vec![
            "/chart/peak-time-picks/1001".to_string(),
            "/chart/warehouse-weapons/1002".to_string(),
        ]
    );
}

#[test]
fn test_index_next_follows_the_active_page() {
    let index = parse_chart_index(INDEX_PAGE);
    assert_eq!(index.next.as_deref(), Some("/charts/all?page=3"));
}

#[test]
fn test_last_index_page_has_no_next() {
    let index = parse_chart_index(LAST_INDEX_PAGE);
    assert_eq!(index.chart_links.len(), 1);
    assert!(index.next.is_none());
}

#[test]
fn test_chart_page_header_applies_to_every_row() {
    let tracks = parse_chart_page(CHART_PAGE);
    assert_eq!(tracks.len(), 2);
    for track in &tracks {
        assert_eq!(track.chart_name, "Peak Time Picks");
        assert_eq!(track.chart_author, "Philippe Petit");
        assert_eq!(track.chart_date, "2023-07-01");
    }
}

#[test]
fn test_chart_page_extracts_full_row() {
    let tracks = parse_chart_page(CHART_PAGE);
    let first = &tracks[0];
    assert_eq!(first.title, "Remember");
    assert_eq!(first.artists, vec!["Philippe Petit".to_string()]);
    assert_eq!(first.remixers, vec!["Sev Dah".to_string()]);
    assert_eq!(first.label, "Suara");
    assert_eq!(first.genre, "Techno");
    assert_eq!(first.bpm, Some(130));
    assert_eq!(first.key.as_deref(), Some("A min"));
    assert_eq!(first.release_date, "2023-06-15");
    assert_eq!(first.length_ms, Some(390_000));
}

#[test]
fn test_chart_page_tolerates_sparse_rows() {
    let tracks = parse_chart_page(CHART_PAGE);
    let sparse = &tracks[1];
    assert_eq!(sparse.artists, vec!["JXTPS".to_string(), "Decka".to_string()]);
    assert!(sparse.remixers.is_empty());
    assert_eq!(sparse.bpm, None);
    assert_eq!(sparse.key, None);
    assert_eq!(sparse.length_ms, None);
}

#[test]
fn test_rows_without_title_are_dropped() {
    let tracks = parse_chart_page(CHART_PAGE);
    assert!(tracks.iter().all(|t| !t.title.is_empty()));
}

#[test]
fn test_track_length_parsing() {
    assert_eq!(parse_track_length("6:30"), Some(390_000));
    assert_eq!(parse_track_length(" 0:59 "), Some(59_000));
    assert_eq!(parse_track_length("12:00"), Some(720_000));
    assert_eq!(parse_track_length("six minutes"), None);
    assert_eq!(parse_track_length(""), None);
}

#[test]
fn test_track_length_rejects_absurd_values() {
    // lengths beyond the representable range come back as unparsed
    assert_eq!(parse_track_length("4294967295:00"), None);
    // overflows at the second-to-millisecond step
    assert_eq!(parse_track_length("71583:00"), None);
}
