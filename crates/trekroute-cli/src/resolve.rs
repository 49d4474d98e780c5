//! `trekroute resolve`: load a trek catalogue and print one route per trek.
//!
//! Treks are resolved concurrently through a single engine so every trek in
//! the run shares the same session cache. A trek without a usable route is
//! reported inline instead of failing the run.

use std::path::Path;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde_json::{json, Value};
use trekroute_core::{
    load_treks, EngineConfig, InterpolationMode, ResolvedRoute, RouteError, TrekRecord,
};
use trekroute_geocode::{GeocodeResolver, MapboxGeocoder, RouteEngine, SessionCache};

use crate::OutputFormat;

#[derive(Debug, Clone)]
pub(crate) struct ResolveOptions {
    pub(crate) trek: Option<String>,
    pub(crate) format: OutputFormat,
    pub(crate) interpolation: InterpolationMode,
    pub(crate) offline: bool,
    pub(crate) concurrency: usize,
}

pub(crate) async fn run_resolve(
    config: &EngineConfig,
    file: &Path,
    options: &ResolveOptions,
) -> anyhow::Result<()> {
    let treks = select_treks(load_treks(file)?, options.trek.as_deref())?;
    let engine = build_engine(config, options)?;

    tracing::info!(
        treks = treks.len(),
        interpolation = %options.interpolation,
        concurrency = options.concurrency,
        "resolving treks"
    );

    let rendered: Vec<Value> = stream::iter(&treks)
        .map(|trek| {
            let engine = &engine;
            async move {
                let anchor = trek.anchor();
                let result = engine.resolve(&trek.itinerary, anchor.as_ref()).await;
                render_trek(trek, &result, options.format)
            }
        })
        .buffered(options.concurrency.max(1))
        .collect()
        .await;

    println!("{}", serde_json::to_string_pretty(&Value::Array(rendered))?);
    Ok(())
}

/// Narrow the catalogue to `trek_id` when one is given.
pub(crate) fn select_treks(
    treks: Vec<TrekRecord>,
    trek_id: Option<&str>,
) -> anyhow::Result<Vec<TrekRecord>> {
    let Some(id) = trek_id else {
        return Ok(treks);
    };
    let selected: Vec<TrekRecord> = treks.into_iter().filter(|t| t.id == id).collect();
    if selected.is_empty() {
        anyhow::bail!("trek '{id}' not found in catalogue");
    }
    Ok(selected)
}

fn build_engine(config: &EngineConfig, options: &ResolveOptions) -> anyhow::Result<RouteEngine> {
    let token = config
        .geocoder_token
        .as_deref()
        .filter(|_| !options.offline);

    let Some(token) = token else {
        tracing::info!("no geocoder configured; running offline");
        return Ok(RouteEngine::offline(options.interpolation));
    };

    let geocoder = MapboxGeocoder::from_config(config, token)?;
    let resolver = GeocodeResolver::from_config(geocoder, Arc::new(SessionCache::new()), config);
    Ok(RouteEngine::new(resolver, options.interpolation))
}

pub(crate) fn render_trek(
    trek: &TrekRecord,
    result: &Result<ResolvedRoute, RouteError>,
    format: OutputFormat,
) -> Value {
    let route = match result {
        Ok(route) => route,
        Err(e) => {
            tracing::warn!(trek = %trek.id, reason = %e, "route unavailable");
            return json!({
                "id": trek.id,
                "route": "unavailable",
                "reason": e.to_string(),
            });
        }
    };

    match format {
        OutputFormat::Json => json!({
            "id": trek.id,
            "name": trek.name,
            "route": route,
            "summary": route.summary(),
            "bounds": route.bounds(),
        }),
        OutputFormat::GeoJson => json!({
            "id": trek.id,
            "name": trek.name,
            "route": route.to_geojson(),
        }),
    }
}
