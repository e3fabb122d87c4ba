//! Layers command - list layers with facility counts

use super::Context;
use anyhow::Result;
use facilitymap_cli::output::{display_width, format_count, Status};
use facilitymap_core::feature::{FeatureCollection, LayerIndex};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct LayerCount<'a> {
    name: &'a str,
    count: usize,
}

#[derive(Debug, Serialize)]
struct LayersOutput<'a> {
    total: usize,
    layers: Vec<LayerCount<'a>>,
}

/// Run layers command
pub fn run(ctx: &Context, data: &Path) -> Result<()> {
    let collection = FeatureCollection::from_path(data)?;
    let index = LayerIndex::build(&collection.features);
    let output = LayersOutput {
        total: collection.len(),
        layers: index
            .counts()
            .into_iter()
            .map(|(name, count)| LayerCount { name, count })
            .collect(),
    };

    if ctx.is_json() {
        return ctx.print_json(&output);
    }

    Status::header("Layers");
    let width = output
        .layers
        .iter()
        .map(|layer| display_width(layer.name))
        .max()
        .unwrap_or(0);
    for layer in &output.layers {
        let pad = " ".repeat(width - display_width(layer.name));
        println!("  {}{pad}  {}", layer.name, layer.count.to_string().green());
    }

    println!();
    println!(
        "  Total: {} in {}",
        format_count(output.total, "facility", "facilities"),
        format_count(output.layers.len(), "layer", "layers")
    );
    Ok(())
}
