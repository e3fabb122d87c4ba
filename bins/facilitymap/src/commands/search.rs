//! Search command - local search, optionally topped up by the geocoder

use super::{Context, OutputFormat};
use anyhow::Result;
use facilitymap_api_client::{ClientConfig, MapClient, NominatimApi};
use facilitymap_cli::output::{emphasize, format_coordinates, format_count, Status};
use facilitymap_cli::progress;
use facilitymap_core::feature::{Feature, FeatureCollection};
use facilitymap_search::{
    CombinedOptions, GeocodeBackend, ScriptFolder, SearchEngine, SearchResult, HIGHLIGHT_CLOSE,
    HIGHLIGHT_OPEN,
};
use facilitymap_telemetry::{metrics, Timer};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct SearchOutput<'q, 'a> {
    query: &'q str,
    total: usize,
    results: Vec<SearchResult<'a>>,
}

/// Run search command
pub async fn run(
    ctx: &Context,
    data: &Path,
    query: &str,
    remote: bool,
    max: Option<usize>,
) -> Result<()> {
    let collection = FeatureCollection::from_path(data)?;

    if remote {
        let client = MapClient::with_config(ClientConfig::from_schema(&ctx.schema).with_env_overrides())?;
        let engine = SearchEngine::from_config(client.nominatim(), &ctx.schema);
        if engine.geocoder().is_none() {
            Status::warning("Geocoder is disabled in the configuration; searching local data only");
        }
        search_with(ctx, engine, &collection.features, query, max).await
    } else {
        let mut options = CombinedOptions::from(&ctx.schema);
        options.include_remote = false;
        let engine: SearchEngine<NominatimApi> = SearchEngine::new(ScriptFolder::builtin(), None, options);
        search_with(ctx, engine, &collection.features, query, max).await
    }
}

async fn search_with<B: GeocodeBackend>(
    ctx: &Context,
    mut engine: SearchEngine<B>,
    features: &[Feature],
    query: &str,
    max: Option<usize>,
) -> Result<()> {
    if let Some(max) = max {
        engine.options_mut().local.max_results = max;
    }
    let query = query.trim();

    let spinner = match (ctx.format, engine.geocoder()) {
        (OutputFormat::Text, Some(_)) => progress::spinner("Searching..."),
        _ => progress::hidden(),
    };
    let timer = Timer::start("search.combined");
    let results = engine.search_combined(features, query).await;
    timer.stop();
    progress::finish(&spinner);

    let remote_hits = results.iter().filter(|r| matches!(r, SearchResult::Remote(_))).count();
    metrics().increment_by("search.remote_results", remote_hits as u64);

    if ctx.is_json() {
        return ctx.print_json(&SearchOutput { query, total: results.len(), results });
    }

    Status::header(&format!("Results for \"{query}\""));
    for (i, result) in results.iter().enumerate() {
        let name = emphasize(
            &engine.highlight(result.display_name(), query),
            HIGHLIGHT_OPEN,
            HIGHLIGHT_CLOSE,
        );
        println!("  {:>2}. {} {}", i + 1, name, format!("[{}]", result.layer()).dimmed());

        let coords = result
            .coordinates()
            .map_or_else(|| "-".to_string(), |(lat, lng)| format_coordinates(lat, lng));
        println!(
            "      {}",
            format!("{coords} · score {:.1} · {}", result.score(), result.source()).dimmed()
        );
    }

    println!();
    if results.is_empty() {
        Status::info("No matches");
    } else {
        Status::success(&format_count(results.len(), "result", "results"));
    }
    Ok(())
}
