use std::path::Path;

use anyhow::Context;

use framecart_core::lenses::{load_lens_catalog, LensCatalog, LensSelection};
use framecart_core::rx::resolve_usage_type;
use framecart_core::validate::{validate_prescription, LIMIT_EXPLANATION};
use framecart_core::{Prescription, UsageType};

/// Loads the catalog file, falling back to the built-in table when the
/// file does not exist.
pub fn load_catalog(path: &Path) -> LensCatalog {
    if !path.exists() {
        return LensCatalog::default();
    }
    match load_lens_catalog(path) {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "lens catalog unusable, using built-in table");
            LensCatalog::default()
        }
    }
}

pub fn validate(file: &Path, usage: &str) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read prescription file {}", file.display()))?;
    let prescription: Prescription =
        serde_json::from_str(&content).context("prescription file is not valid JSON")?;

    let requested: UsageType = usage
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    let (resolved, revert_message) = resolve_usage_type(requested, &prescription);
    if let Some(message) = revert_message {
        println!("note: {message} Falling back to Distance.");
    }

    let report = validate_prescription(&prescription, resolved);
    if report.valid {
        println!("prescription is valid for {resolved} use");
        return Ok(());
    }

    for error in &report.errors {
        println!("error: {error}");
    }
    println!("{LIMIT_EXPLANATION}");
    anyhow::bail!("prescription failed validation with {} error(s)", report.errors.len())
}

pub fn price(
    catalog: &LensCatalog,
    lens_type: &str,
    index: &str,
    coatings: Vec<String>,
) -> anyhow::Result<()> {
    let selection = LensSelection {
        lens_type: lens_type.to_string(),
        index: index.to_string(),
        coatings,
    };
    let normalized = selection.clone().normalized();
    if normalized.coatings != selection.coatings {
        println!("note: photochromic is not available with this selection and was dropped");
    }
    let price = catalog.price_selection(&selection);
    println!("£{price:.2}");
    Ok(())
}

pub fn catalog(catalog: &LensCatalog) -> anyhow::Result<()> {
    println!("Lens types:");
    for lens_type in catalog.types() {
        println!("  {:<10} {}", lens_type.code, lens_type.label);
    }
    println!("Indexes:");
    for index in catalog.indexes() {
        println!("  {:<10} {}", index.code, index.label);
    }
    println!("Coatings (price at each type's base index):");
    for coating in catalog.coatings() {
        print!("  {:<10} {}", coating.code, coating.label);
        let examples: Vec<String> = catalog
            .types()
            .iter()
            .map(|t| {
                let price = catalog.price(&t.code, "1.50", &[coating.code.clone()]);
                format!("{}: £{price:.2}", t.code)
            })
            .collect();
        println!("  [{}]", examples.join(", "));
    }
    Ok(())
}
