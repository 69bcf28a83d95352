//! PDF output by printing the invoice HTML from a headless Chromium.

use std::{path::PathBuf, process::Stdio, time::Duration};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::{errors::ServiceError, metrics};

#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render(&self, html: &str) -> Result<Vec<u8>, ServiceError>;
}

#[derive(Debug, Clone)]
pub struct ChromiumPdf {
    browser: String,
    work_dir: PathBuf,
    timeout: Duration,
}

impl ChromiumPdf {
    pub fn new(cfg: &configs::InvoiceConfig) -> Self {
        Self {
            browser: cfg.browser_path.clone(),
            work_dir: PathBuf::from(&cfg.output_dir),
            timeout: Duration::from_secs(cfg.render_timeout_secs.max(1)),
        }
    }

    fn args(html: &PathBuf, pdf: &PathBuf) -> Vec<String> {
        vec![
            "--headless".into(),
            "--disable-gpu".into(),
            "--no-sandbox".into(),
            "--no-pdf-header-footer".into(),
            format!("--print-to-pdf={}", pdf.display()),
            format!("file://{}", html.display()),
        ]
    }
}

fn pdf_error(msg: impl std::fmt::Display) -> ServiceError {
    ServiceError::external("chromium", msg)
}

async fn remove_quietly(path: &PathBuf) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "failed to remove invoice temp file");
        }
    }
}

#[async_trait]
impl PdfRenderer for ChromiumPdf {
    #[instrument(skip_all, fields(browser = %self.browser))]
    async fn render(&self, html: &str) -> Result<Vec<u8>, ServiceError> {
        tokio::fs::create_dir_all(&self.work_dir)
            .await
            .map_err(|e| pdf_error(format!("create {}: {e}", self.work_dir.display())))?;
        let dir = tokio::fs::canonicalize(&self.work_dir)
            .await
            .map_err(|e| pdf_error(format!("resolve {}: {e}", self.work_dir.display())))?;
        let stem = Uuid::new_v4();
        let html_path = dir.join(format!("{stem}.html"));
        let pdf_path = dir.join(format!("{stem}.pdf"));
        tokio::fs::write(&html_path, html)
            .await
            .map_err(|e| pdf_error(format!("write html: {e}")))?;

        let timer = metrics::PDF_RENDER_SECONDS.start_timer();
        let child = Command::new(&self.browser)
            .args(Self::args(&html_path, &pdf_path))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();
        let result = match child {
            Err(e) => Err(pdf_error(format!("spawn {}: {e}", self.browser))),
            Ok(child) => match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
                Err(_) => Err(pdf_error(format!("render timed out after {}s", self.timeout.as_secs()))),
                Ok(Err(e)) => Err(pdf_error(format!("wait: {e}"))),
                Ok(Ok(out)) if !out.status.success() => {
                    let stderr = String::from_utf8_lossy(&out.stderr);
                    Err(pdf_error(format!("exit {}: {}", out.status, stderr.trim())))
                }
                Ok(Ok(_)) => tokio::fs::read(&pdf_path).await.map_err(|e| pdf_error(format!("read pdf: {e}"))),
            },
        };
        timer.observe_duration();

        remove_quietly(&html_path).await;
        remove_quietly(&pdf_path).await;
        if let Ok(bytes) = &result {
            debug!(size = bytes.len(), "invoice pdf rendered");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_point_at_temp_files() {
        let args = ChromiumPdf::args(&PathBuf::from("/tmp/a.html"), &PathBuf::from("/tmp/a.pdf"));
        assert!(args.contains(&"--headless".to_string()));
        assert!(args.contains(&"--print-to-pdf=/tmp/a.pdf".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("file:///tmp/a.html"));
    }

    #[tokio::test]
    async fn missing_browser_is_external_error() {
        let dir = std::env::temp_dir().join(format!("invoice-pdf-{}", Uuid::new_v4()));
        let cfg = configs::InvoiceConfig {
            browser_path: "/nonexistent/chromium-binary".into(),
            render_timeout_secs: 2,
            output_dir: dir.display().to_string(),
            number_prefix: "INV".into(),
        };
        let err = ChromiumPdf::new(&cfg).render("<html></html>").await.unwrap_err();
        assert!(matches!(err, ServiceError::External(_)));
        let mut left = tokio::fs::read_dir(&dir).await.unwrap();
        assert!(left.next_entry().await.unwrap().is_none());
        let _ = tokio::fs::remove_dir(&dir).await;
    }
}
