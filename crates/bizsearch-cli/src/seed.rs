use std::path::Path;

use anyhow::Context;
use sqlx::PgPool;

use bizsearch_db::BusinessSeed;

pub(crate) async fn run_seed(pool: &PgPool, path: &Path) -> anyhow::Result<()> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading seed file {}", path.display()))?;
    let records: Vec<BusinessSeed> =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;

    tracing::info!(path = %path.display(), records = records.len(), "seeding businesses");
    let inserted = bizsearch_db::seed_businesses(pool, &records).await?;
    let skipped = records.len() - inserted;

    println!("seeded {inserted} businesses ({skipped} skipped)");
    Ok(())
}
