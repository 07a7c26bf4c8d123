//! # Catalog Seed Tool
//!
//! Seeds a database with sample catalog entries and a customer so the
//! quotation flow can be exercised end to end. Stands in for the external
//! catalog-management flow during development.
//!
//! ## Usage
//! ```text
//! cargo run -p quote-db --bin seed [path/to/tilequote.db]
//! ```

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use quote_core::CatalogEntry;
use quote_db::{Database, DbConfig};

fn entry(
    name: &str,
    size: &str,
    surface: Option<&str>,
    ex_factory: f64,
    mrp: f64,
    actual_area: f64,
    billed_area: f64,
    weight: f64,
) -> CatalogEntry {
    let now = Utc::now();
    CatalogEntry {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        size: size.to_string(),
        surface: surface.map(|s| s.to_string()),
        ex_factory_price: Some(ex_factory),
        mrp_per_area: Some(mrp),
        mrp_per_container: Some(mrp * billed_area),
        gst_percent: Some(18.0),
        insurance_percent: Some(1.0),
        actual_area_per_container: Some(actual_area),
        billed_area_per_container: Some(billed_area),
        weight: Some(weight),
        freight: None,
        archived: false,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tilequote.db".to_string());

    info!(path = %path, "Seeding database");
    let db = Database::new(DbConfig::new(&path)).await?;
    let catalog = db.catalog();

    let samples = vec![
        entry("Forest Oak", "600x1200", Some("Glossy"), 52.0, 110.0, 11.52, 12.0, 29.5),
        entry("Forest Oak", "600x1200", Some("Matt"), 50.0, 105.0, 11.52, 12.0, 29.5),
        entry("Forest Oak", "800x800", None, 48.0, 98.0, 10.24, 10.5, 27.0),
        entry("Slate Grey", "600x600", None, 38.0, 80.0, 8.64, 9.0, 22.0),
        entry("Slate Grey", "600x600", Some("Rustic"), 41.0, 86.0, 8.64, 9.0, 22.0),
        entry("Travertine Beige", "1200x1800", Some("Polished"), 95.0, 190.0, 17.28, 18.0, 48.0),
    ];

    for e in &samples {
        catalog.insert(e).await?;
    }
    info!(count = samples.len(), "Catalog entries inserted");

    let customer = db.customers().create("Sharma Interiors", Some("98200 00000")).await?;
    info!(id = %customer.id, "Sample customer created");

    let live = catalog.count().await?;
    info!(live_entries = live, "Seed complete");

    Ok(())
}
