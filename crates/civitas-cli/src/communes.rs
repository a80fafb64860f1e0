use civitas_core::{load_communes, AppConfig, CommuneGeoContext, CommuneRegistry};

pub(crate) fn run_communes(config: &AppConfig) -> anyhow::Result<()> {
    let file = load_communes(&config.communes_path)?;
    let registry = CommuneRegistry::from_file(&file);

    if registry.is_empty() {
        println!("no communes configured in {}", config.communes_path.display());
        return Ok(());
    }

    for (geo, is_public) in registry.entries() {
        println!("{}", format_commune_row(geo, is_public));
    }
    Ok(())
}

/// One tab-separated line: id, name, postal codes, visibility.
pub(crate) fn format_commune_row(geo: &CommuneGeoContext, is_public: bool) -> String {
    let postal_codes: Vec<&str> = geo.postal_code_list().collect();
    let postal_codes = if postal_codes.is_empty() {
        "-".to_string()
    } else {
        postal_codes.join(",")
    };
    let visibility = if is_public { "public" } else { "hidden" };
    format!("{}\t{}\t{}\t{}", geo.id, geo.name, postal_codes, visibility)
}
