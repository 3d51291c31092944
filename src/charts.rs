//! Chart source scraping.
//!
//! Thin CSS extraction over the chart site's index and detail pages. The
//! index lists chart cards and paginates through a "next page" link; each
//! chart page carries a header (name, author, publish date) and one row
//! per track. Extracted rows are normalized into [`ChartTrack`] records
//! and upserted into the store.

use std::time::Duration;

use reqwest::Client;
use scraper::{Html, Selector};
use tokio::time::sleep;

use crate::{Res, config, store::Store, types::ChartTrack, warning};

const FETCH_ATTEMPTS: u32 = 3;

/// Extracted links of one chart index page.
#[derive(Debug, Clone)]
pub struct ChartIndex {
    pub chart_links: Vec<String>,
    pub next: Option<String>,
}

fn sel(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

/// Pulls the per-chart links and the pager's next link out of an index
/// page.
pub fn parse_chart_index(html: &str) -> ChartIndex {
    let document = Html::parse_document(html);
    let card = sel("div.chart-card a.artwork");
    let next = sel("div.pages a.active + a");

    let chart_links = document
        .select(&card)
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_string)
        .collect();

    let next = document
        .select(&next)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string);

    ChartIndex { chart_links, next }
}

/// Extracts the header and track rows of one chart page.
pub fn parse_chart_page(html: &str) -> Vec<ChartTrack> {
    let document = Html::parse_document(html);

    let chart_name = select_text(&document, "h1.chart-name").unwrap_or_default();
    let chart_author = select_text(&document, "a.chart-author").unwrap_or_default();
    let chart_date = select_text(&document, "span.chart-date").unwrap_or_default();

    let row = sel("div.track-row");
    let title = sel("span.track-title");
    let artist = sel("div.track-artists a");
    let remixer = sel("div.track-remixers a");
    let label = sel("span.track-label");
    let genre = sel("span.track-genre");
    let bpm = sel("span.track-bpm");
    let key = sel("span.track-key");
    let date = sel("span.track-date");
    let length = sel("span.track-length");

    document
        .select(&row)
        .map(|r| ChartTrack {
            chart_name: chart_name.clone(),
            chart_author: chart_author.clone(),
            chart_date: chart_date.clone(),
            title: element_text(r.select(&title).next()),
            artists: r.select(&artist).map(collect_text).collect(),
            remixers: r.select(&remixer).map(collect_text).collect(),
            label: element_text(r.select(&label).next()),
            genre: element_text(r.select(&genre).next()),
            bpm: r
                .select(&bpm)
                .next()
                .and_then(|e| collect_text(e).parse().ok()),
            key: r.select(&key).next().map(collect_text),
            release_date: element_text(r.select(&date).next()),
            length_ms: r
                .select(&length)
                .next()
                .and_then(|e| parse_track_length(&collect_text(e))),
        })
        .filter(|t| !t.title.is_empty() && !t.artists.is_empty())
        .collect()
}

/// Parses a "m:ss" track length into milliseconds. Lengths that would not
/// fit are treated like any other unparseable value.
pub fn parse_track_length(text: &str) -> Option<u32> {
    let (minutes, seconds) = text.trim().split_once(':')?;
    let minutes: u32 = minutes.parse().ok()?;
    let seconds: u32 = seconds.parse().ok()?;
    minutes
        .checked_mul(60)?
        .checked_add(seconds)?
        .checked_mul(1000)
}

fn select_text(document: &Html, css: &str) -> Option<String> {
    let selector = sel(css);
    document.select(&selector).next().map(collect_text)
}

fn element_text(element: Option<scraper::ElementRef<'_>>) -> String {
    element.map(collect_text).unwrap_or_default()
}

fn collect_text(element: scraper::ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn absolutize(base: &str, link: &str) -> String {
    if link.starts_with("http") {
        link.to_string()
    } else {
        format!("{}{}", base, link)
    }
}

/// Fetches one page, retrying connection timeouts a fixed number of times
/// before giving up.
async fn fetch_page(client: &Client, url: &str) -> Res<String> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        match client
            .get(url)
            .timeout(Duration::from_secs(30))
            .send()
            .await
        {
            Ok(response) => return Ok(response.error_for_status()?.text().await?),
            Err(e) if attempt < FETCH_ATTEMPTS && (e.is_timeout() || e.is_connect()) => {
                warning!("Attempt {} of {} failed: {}", attempt, FETCH_ATTEMPTS, e);
                sleep(Duration::from_secs(2)).await;
            }
            Err(e) => {
                return Err(format!("giving up on {} after {} attempts: {}", url, attempt, e).into());
            }
        }
    }
}

/// Walks the chart index, scrapes every discovered chart and upserts the
/// rows. Returns (charts visited, new tracks stored).
pub async fn scrape_charts(store: &Store, max_pages: Option<u32>) -> Res<(usize, usize)> {
    let client = Client::new();
    let base = config::chart_base_url();

    let mut url = format!("{}/charts/all?page=1&per_page=150", base);
    let mut charts = 0usize;
    let mut inserted = 0usize;
    let mut page_no = 0u32;

    loop {
        page_no += 1;
        let html = fetch_page(&client, &url).await?;
        let index = parse_chart_index(&html);

        for link in &index.chart_links {
            let chart_url = absolutize(&base, link);
            let chart_html = fetch_page(&client, &chart_url).await?;
            let tracks = parse_chart_page(&chart_html);
            charts += 1;

            for track in &tracks {
                match store.upsert_track(track) {
                    Ok(true) => inserted += 1,
                    Ok(false) => {}
                    Err(e) => warning!("Cannot store track {}: {}", track.title, e),
                }
            }
        }

        match index.next {
            Some(next) if max_pages.is_none_or(|max| page_no < max) => {
                url = absolutize(&base, &next);
            }
            _ => break,
        }
    }

    Ok((charts, inserted))
}
