use tabled::Table;

use crate::{config, error, store::Store, types::InfoTableRow};

pub async fn info() {
    let store = match Store::open(&config::database_path()) {
        Ok(store) => store,
        Err(e) => error!("Cannot open database: {}", e),
    };

    let tracks = store.count_tracks().unwrap_or(0);
    let features = store.count_feature_rows().unwrap_or(0);
    let unresolved = store.count_unresolved().unwrap_or(0);

    let rows = vec![
        InfoTableRow {
            metric: "stored tracks".to_string(),
            value: tracks.to_string(),
        },
        InfoTableRow {
            metric: "feature rows".to_string(),
            value: features.to_string(),
        },
        InfoTableRow {
            metric: "looked up, not found".to_string(),
            value: unresolved.to_string(),
        },
        InfoTableRow {
            metric: "pending".to_string(),
            value: (tracks - features).max(0).to_string(),
        },
    ];

    println!("{}", Table::new(rows));
}
