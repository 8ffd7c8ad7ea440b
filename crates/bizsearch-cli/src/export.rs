use std::path::Path;

use anyhow::Context;
use sqlx::PgPool;

use bizsearch_core::Business;

pub(crate) async fn run_export(pool: &PgPool, out: Option<&Path>) -> anyhow::Result<()> {
    let rows = bizsearch_db::list_all_businesses(pool).await?;
    let businesses: Vec<Business> = rows.into_iter().map(Business::from).collect();
    let json = serde_json::to_string_pretty(&businesses)?;

    match out {
        Some(path) => {
            tokio::fs::write(path, &json)
                .await
                .with_context(|| format!("writing {}", path.display()))?;
            println!("exported {} businesses to {}", businesses.len(), path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
