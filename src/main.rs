// src/main.rs

use bytelane_lib::database;
use bytelane_lib::library;
use bytelane_lib::query::{MemoryHistory, Navigator, Synchronizer};
use log::{error, info};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // The single argument stands in for the address bar's query string.
    let query = std::env::args().nth(1).unwrap_or_default();
    info!("Rendering library view for query '{}'", query);

    let catalog = match database::open_catalog() {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("Failed to open catalog: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let sync = Synchronizer::default();
    let mut history = MemoryHistory::new(&query);
    let state = sync.load(&mut history);
    if history.current_query() != query.trim_start_matches('?') {
        info!("Settled query '{}'", history.current_query());
    }

    let view = match library::render_library(&catalog, &state) {
        Ok(view) => view,
        Err(e) => {
            error!("Failed to render view: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&view) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to serialize view: {}", e);
            ExitCode::FAILURE
        }
    }
}
