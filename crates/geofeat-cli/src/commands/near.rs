//! Near command implementation

use super::cli_error;
use crate::cli::NearArgs;
use crate::errors;
use crate::output::OutputWriter;
use crate::output_types::{CandidateMatch, NearOutput};
use anyhow::{Context, Result};
use geofeat_core::config::{CliConfigOverrides, LayeredConfig};
use geofeat_core::models::{Feature, GeoJsonObject};
use geofeat_geo::{reverse_object_axes, ProximityPlan, ProximityPlanner};
use std::fs;
use std::path::Path;

pub fn execute(args: NearArgs, mut config: LayeredConfig, output: &OutputWriter) -> Result<()> {
    if let Some(km) = args.km_per_degree {
        config.update_from_cli(CliConfigOverrides { km_per_degree: Some(km), ..Default::default() });
    }

    let planner = ProximityPlanner::from_config(&config).map_err(cli_error("near"))?;
    let plan = planner
        .plan((args.lng, args.lat), args.attribute.as_str(), args.radius)
        .map_err(cli_error("near"))?;
    tracing::debug!(window = ?plan.bounding_box, "Planned proximity search");

    let matches = match args.candidates.as_deref() {
        Some(path) => Some(rank_candidates(&plan, path, &config, output)?),
        None => None,
    };

    if output.is_json() {
        return output.result(NearOutput {
            plan: &plan,
            predicate: plan.bounding_box.predicate(&plan.attribute),
            distance_sql: plan.distance.to_string(),
            matches,
        });
    }

    output.section("Proximity Plan");
    output.kv("Attribute", &plan.attribute);
    output.kv("Origin", format!("{} {}", plan.origin[0], plan.origin[1]));
    output.kv("Radius (km)", plan.radius_km);
    output.kv("Bounding box", plan.bounding_box.predicate(&plan.attribute));
    output.kv("Distance", &plan.distance);
    output.kv("Filter", format!("{} < {}", plan.order_by.key, plan.filter.less_than_km));
    output.kv("Order", format!("{} ASC", plan.order_by.key));

    if let Some(matches) = matches {
        output.section("Matches");
        output.table(matches)?;
    }

    Ok(())
}

/// Features from a GeoJSON file that pass the plan, nearest first
fn rank_candidates(
    plan: &ProximityPlan,
    path: &Path,
    config: &LayeredConfig,
    output: &OutputWriter,
) -> Result<Vec<CandidateMatch>> {
    if !path.exists() {
        return Err(errors::candidates_not_found(&path.display().to_string()).into());
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read candidates from {}", path.display()))?;

    let mut object: GeoJsonObject = text.parse().map_err(cli_error("near"))?;
    if config.axis_order.value.needs_reversal() {
        object = reverse_object_axes(object);
    }

    let features = match object {
        GeoJsonObject::FeatureCollection(collection) => collection.features,
        GeoJsonObject::Feature(feature) => vec![feature],
        GeoJsonObject::Geometry(geometry) => vec![Feature::new(geometry, Default::default())],
    };

    let mut matches: Vec<CandidateMatch> = Vec::new();
    for (index, feature) in features.iter().enumerate() {
        let Some(geometry) = feature.geometry.as_ref() else {
            output.warning(format!("Skipping feature {} without geometry", index));
            continue;
        };
        if let Some(distance_km) = plan.matches_geometry(geometry) {
            let id = feature.properties.get("id").map(|v| v.to_string()).unwrap_or_default();
            matches.push(CandidateMatch { rank: 0, feature_index: index, id, distance_km });
        }
    }

    matches.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    for (i, m) in matches.iter_mut().enumerate() {
        m.rank = i + 1;
    }

    tracing::info!(
        candidates = features.len(),
        matched = matches.len(),
        "Ranked candidates"
    );
    Ok(matches)
}
