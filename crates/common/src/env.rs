//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use tracing::info;

/// Ensure the invoice output directory exists before any PDF render writes to it.
pub async fn ensure_env(invoice_dir: &str) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(invoice_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {invoice_dir}: {e}"))?;
    info!(%invoice_dir, "invoice output directory ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::ensure_env;

    #[tokio::test]
    async fn creates_nested_dir() {
        let dir = std::env::temp_dir().join(format!("spice-env-{}", std::process::id())).join("invoices");
        let path = dir.to_string_lossy().to_string();
        ensure_env(&path).await.unwrap();
        assert!(tokio::fs::metadata(&dir).await.unwrap().is_dir());
    }
}
