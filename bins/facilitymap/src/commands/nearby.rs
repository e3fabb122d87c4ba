//! Nearby command - filter facilities against a shape link

use super::{query_part, Context, FeatureRow};
use anyhow::Result;
use facilitymap_cli::output::{format_coordinates, format_count, Status};
use facilitymap_core::error::Error;
use facilitymap_core::feature::{filter_by_layer, FeatureCollection, LayerIndex};
use facilitymap_geo::{parse_shape_query_str, ProximityFilter};
use facilitymap_telemetry::{metrics, Timer};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct NearbyOutput {
    shapes: usize,
    buffer_km: f64,
    scanned: usize,
    total: usize,
    features: Vec<FeatureRow>,
}

/// Run nearby command
pub fn run(
    ctx: &Context,
    data: &Path,
    input: &str,
    layer: Option<&str>,
    buffer_km: Option<f64>,
) -> Result<()> {
    let query = parse_shape_query_str(query_part(input));
    if query.is_empty() {
        return Err(Error::validation("The link contains no usable shapes")
            .with_suggestion("Pass parameters such as shape=circle&lat=25&lng=120&radius=50")
            .into());
    }

    let buffer_km = buffer_km.unwrap_or(ctx.schema.shapes.nearby_buffer_km);
    if !buffer_km.is_finite() || buffer_km < 0.0 {
        return Err(Error::validation("--buffer must be a non-negative number").into());
    }

    let collection = FeatureCollection::from_path(data)?;
    let index = LayerIndex::build(&collection.features);
    let candidates = filter_by_layer(&collection.features, layer, Some(&index));

    let filter = ProximityFilter::new(&query, buffer_km, ctx.schema.shapes.sector_step_deg);
    let timer = Timer::start("shapes.filter");
    let matched = filter.filter(&candidates);
    timer.stop();
    metrics().increment_by("shapes.matched", matched.len() as u64);

    let output = NearbyOutput {
        shapes: filter.shape_count(),
        buffer_km,
        scanned: candidates.len(),
        total: matched.len(),
        features: matched.iter().map(|f| FeatureRow::from(*f)).collect(),
    };

    if ctx.is_json() {
        return ctx.print_json(&output);
    }

    Status::header(&format!(
        "Facilities near {} (buffer {} km)",
        format_count(output.shapes, "shape", "shapes"),
        buffer_km
    ));
    for row in &output.features {
        let coords = match (row.lat, row.lng) {
            (Some(lat), Some(lng)) => format_coordinates(lat, lng),
            _ => "-".to_string(),
        };
        println!("  {} {} {}", row.name, format!("[{}]", row.layer).dimmed(), coords.dimmed());
    }
    for skipped in &query.skipped {
        Status::warning(&format!("Skipped {}={}: {}", skipped.param, skipped.raw, skipped.reason));
    }

    println!();
    if output.features.is_empty() {
        Status::info(&format!("No matches among {}", format_count(output.scanned, "facility", "facilities")));
    } else {
        Status::success(&format!(
            "{} of {}",
            format_count(output.total, "facility", "facilities"),
            output.scanned
        ));
    }
    Ok(())
}
