//! Equipment command - extract and resolve equipment names

use super::Context;
use anyhow::Result;
use facilitymap_api_client::{ClientConfig, MapClient};
use facilitymap_cli::output::{format_count, Status};
use facilitymap_cli::progress;
use facilitymap_equipment::{
    basic_info, extract_equipment_names, normalize_for_lookup, EquipmentInfo, EquipmentResolver,
    ProfileLimits,
};
use facilitymap_telemetry::Timer;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::Read;

/// An extracted name with its lookup key and offline facts.
#[derive(Debug, Serialize)]
struct ExtractedName {
    name: String,
    lookup_key: String,
    kind: Option<&'static str>,
    country: Option<&'static str>,
}

/// Run equipment command
pub async fn run(ctx: &Context, text: &str, lookup: bool) -> Result<()> {
    let text = if text == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        text.to_string()
    };

    if lookup {
        resolve(ctx, &text).await
    } else {
        extract(ctx, &text)
    }
}

fn extract(ctx: &Context, text: &str) -> Result<()> {
    let limits = ProfileLimits::for_profile(ctx.schema.equipment.profile);
    let names: Vec<ExtractedName> = extract_equipment_names(text, limits.max_items)
        .into_iter()
        .map(|name| {
            let lookup_key = normalize_for_lookup(&name);
            let basic = basic_info(&lookup_key);
            ExtractedName {
                kind: basic.map(|b| b.kind),
                country: basic.map(|b| b.country),
                name,
                lookup_key,
            }
        })
        .collect();

    if ctx.is_json() {
        return ctx.print_json(&names);
    }

    if names.is_empty() {
        Status::info("No equipment clause found");
        return Ok(());
    }

    Status::header("Equipment");
    for entry in &names {
        let key = if entry.lookup_key == entry.name {
            String::new()
        } else {
            format!("→ {}", entry.lookup_key)
        };
        println!("  {} {}", entry.name.cyan(), key.dimmed());
        if let (Some(kind), Some(country)) = (entry.kind, entry.country) {
            println!("     {kind} ({country})");
        }
    }
    println!();
    Status::success(&format_count(names.len(), "name", "names"));
    Ok(())
}

async fn resolve(ctx: &Context, text: &str) -> Result<()> {
    let client = MapClient::with_config(ClientConfig::from_schema(&ctx.schema).with_env_overrides())?;
    let resolver = EquipmentResolver::new(client.wikipedia(), &ctx.schema.equipment);

    let spinner = if ctx.is_json() {
        progress::hidden()
    } else {
        progress::spinner("Looking up equipment...")
    };
    let timer = Timer::start("equipment.lookup");
    let infos = resolver.process_text(text).await;
    timer.stop();
    progress::finish(&spinner);

    if ctx.is_json() {
        return ctx.print_json(&infos);
    }

    if infos.is_empty() {
        Status::info("No equipment resolved");
        return Ok(());
    }

    Status::header("Equipment");
    for info in &infos {
        print_info(info);
    }
    println!();
    let offline = infos.iter().filter(|info| info.fallback).count();
    if offline > 0 {
        Status::warning(&format!(
            "{} from offline data",
            format_count(offline, "entry", "entries")
        ));
    }
    Status::success(&format_count(infos.len(), "entry", "entries"));
    Ok(())
}

fn print_info(info: &EquipmentInfo) {
    if info.title == info.name {
        println!("  {}", info.name.cyan().bold());
    } else {
        println!("  {} {}", info.name.cyan().bold(), format!("({})", info.title).dimmed());
    }
    println!("     {}", info.description);
    if let Some(url) = &info.page_url {
        println!("     {}", url.dimmed());
    }
}
