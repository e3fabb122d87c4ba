//! Shapes command - parse a shape link

use super::{query_part, Context};
use anyhow::Result;
use facilitymap_cli::output::{format_coordinates, format_distance, Status};
use facilitymap_geo::{
    build_sector_arc, close_ring, parse_shape_query_str, polyline_length_km, Coordinate, Shape,
    ShapeGeometry, ShapeQuery,
};
use owo_colors::OwoColorize;
use serde_json::{json, Map, Value};

/// Run shapes command
pub fn run(ctx: &Context, input: &str, geojson: bool) -> Result<()> {
    let query = parse_shape_query_str(query_part(input));
    let step_deg = ctx.schema.shapes.sector_step_deg;

    if geojson {
        return ctx.print_json(&to_feature_collection(&query, step_deg));
    }
    if ctx.is_json() {
        return ctx.print_json(&query);
    }

    let mode = query.mode.map_or("none", |mode| mode.as_str());
    Status::header(&format!("Shape link ({mode})"));
    println!("  Unit: {} ({} km)", query.unit, query.km_per_unit);

    for (i, shape) in query.shapes.iter().enumerate() {
        println!("  {}. {:<8} {}", i + 1, shape.kind().cyan(), describe(&shape.geometry));
        if let Some(label) = query.label_for(shape) {
            println!("     label: {label}");
        }
        let bounds = shape.bounds(step_deg);
        println!(
            "     {}",
            format!(
                "SW {} / NE {}",
                format_coordinates(bounds.south, bounds.west),
                format_coordinates(bounds.north, bounds.east)
            )
            .dimmed()
        );
    }

    if query.shapes.is_empty() {
        Status::warning("No shapes in link");
    }
    for skipped in &query.skipped {
        Status::warning(&format!("Skipped {}={}: {}", skipped.param, skipped.raw, skipped.reason));
    }
    println!();
    Ok(())
}

fn describe(geometry: &ShapeGeometry) -> String {
    match geometry {
        ShapeGeometry::Point { center, radius_km: None } => {
            format_coordinates(center.latitude, center.longitude)
        }
        ShapeGeometry::Point { center, radius_km: Some(r) } | ShapeGeometry::Circle { center, radius_km: r } => {
            format!(
                "{}, radius {}",
                format_coordinates(center.latitude, center.longitude),
                format_distance(*r)
            )
        }
        ShapeGeometry::Sector { center, radius_km, start_deg, end_deg } => format!(
            "{}, radius {}, {start_deg}° → {end_deg}°",
            format_coordinates(center.latitude, center.longitude),
            format_distance(*radius_km)
        ),
        ShapeGeometry::Line { coords } => format!(
            "{} vertices, {}",
            coords.len(),
            format_distance(polyline_length_km(coords))
        ),
        ShapeGeometry::Polygon { coords } => format!("{} vertices", coords.len()),
        ShapeGeometry::Bbox { bounds } => format!(
            "W {} S {} E {} N {}",
            bounds.west, bounds.south, bounds.east, bounds.north
        ),
    }
}

fn position(c: &Coordinate) -> Value {
    json!([c.longitude, c.latitude])
}

fn positions(coords: &[Coordinate]) -> Vec<Value> {
    coords.iter().map(position).collect()
}

/// GeoJSON rendering of the parsed shapes.
///
/// Round shapes become polygons at `step_deg` resolution; sectors are
/// expanded into their fan polygon.
pub fn to_feature_collection(query: &ShapeQuery, step_deg: f64) -> Value {
    let features: Vec<Value> = query
        .shapes
        .iter()
        .map(|shape| shape_feature(query, shape, step_deg))
        .collect();
    json!({ "type": "FeatureCollection", "features": features })
}

fn shape_feature(query: &ShapeQuery, shape: &Shape, step_deg: f64) -> Value {
    let geometry = match &shape.geometry {
        ShapeGeometry::Point { center, radius_km: None } => {
            json!({ "type": "Point", "coordinates": position(center) })
        }
        ShapeGeometry::Line { coords } => {
            json!({ "type": "LineString", "coordinates": positions(coords) })
        }
        ShapeGeometry::Sector { center, radius_km, start_deg, end_deg } => {
            let fan = build_sector_arc(center, *radius_km, *start_deg, *end_deg, step_deg);
            json!({ "type": "Polygon", "coordinates": [positions(&close_ring(&fan))] })
        }
        _ => {
            let ring = close_ring(&shape.perimeter(step_deg));
            json!({ "type": "Polygon", "coordinates": [positions(&ring)] })
        }
    };

    let mut properties = Map::new();
    properties.insert("shape".into(), shape.kind().into());
    if let Some(label) = query.label_for(shape) {
        properties.insert("label".into(), label.into());
    }
    match &shape.geometry {
        ShapeGeometry::Point { radius_km: Some(r), .. }
        | ShapeGeometry::Circle { radius_km: r, .. }
        | ShapeGeometry::Sector { radius_km: r, .. } => {
            properties.insert("radius_km".into(), json!(r));
        }
        _ => {}
    }

    json!({ "type": "Feature", "geometry": geometry, "properties": properties })
}
