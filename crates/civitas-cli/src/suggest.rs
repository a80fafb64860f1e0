//! `suggest` command: one suggestion run printed as pretty JSON.

use anyhow::Context;
use civitas_core::{load_communes, AppConfig, CommuneRegistry};
use civitas_geocoder::{suggest_addresses, GeocoderClient};

pub(crate) async fn run_suggest(
    config: &AppConfig,
    commune_id: &str,
    query: &str,
    limit: Option<i64>,
) -> anyhow::Result<()> {
    let file = load_communes(&config.communes_path)?;
    let registry = CommuneRegistry::from_file(&file);
    let geo = registry
        .find_public(commune_id)
        .with_context(|| format!("commune {commune_id} not found or not public"))?;

    let client = GeocoderClient::new(
        &config.geocoder_base_url,
        &config.geocoder_user_agent,
        config.geocoder_timeout_secs,
    )?;

    tracing::info!(commune_id = %geo.id, query, "requesting address suggestions");
    let suggestions = suggest_addresses(&client, geo, query, limit).await?;

    println!("{}", serde_json::to_string_pretty(&suggestions)?);
    Ok(())
}
