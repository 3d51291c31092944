use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{charts, config, error, store::Store, success};

pub async fn update_charts(pages: Option<u32>) {
    let store = match Store::open(&config::database_path()) {
        Ok(store) => store,
        Err(e) => error!("Cannot open database: {}", e),
    };

    let pb = ProgressBar::new_spinner();
    pb.set_message("Scraping chart pages...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    match charts::scrape_charts(&store, pages).await {
        Ok((chart_count, inserted)) => {
            pb.finish_and_clear();
            success!(
                "Scraped {} charts, stored {} new tracks.",
                chart_count,
                inserted
            );
        }
        Err(e) => {
            pb.finish_and_clear();
            error!("Chart scrape failed: {}", e);
        }
    }
}
