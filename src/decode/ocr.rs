//! OCR decoding for image sources.
//!
//! The engine is a trait object injected into the assembler, so callers
//! control its lifetime and can substitute a test double. The shipped
//! implementation shells out to the `tesseract` CLI.

use std::io::Write;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::Mutex;

use crate::error::{DocmarkError, Result};

/// Text recognition engine for image inputs.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Initialize the engine's worker state. Idempotent; `recognize`
    /// calls this implicitly.
    async fn prepare(&self) -> Result<()>;

    /// Recognize text in raw image bytes. `ext` is the image extension
    /// ("png", "jpeg") used to name scratch files.
    async fn recognize(&self, image: &[u8], ext: &str) -> Result<String>;

    /// Release worker state. The engine can be used again afterwards;
    /// the next call re-initializes.
    async fn cleanup(&self) -> Result<()>;
}

struct Worker {
    version: String,
}

/// `OcrEngine` backed by the tesseract command-line binary.
///
/// The binary is probed once on first use; the probe result is cached
/// behind a mutex so concurrent first calls cannot race initialization.
pub struct TesseractOcr {
    binary: String,
    lang: String,
    worker: Mutex<Option<Worker>>,
}

impl TesseractOcr {
    #[must_use]
    pub fn new(binary: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            lang: lang.into(),
            worker: Mutex::new(None),
        }
    }
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self::new("tesseract", "eng")
    }
}

#[async_trait]
impl OcrEngine for TesseractOcr {
    async fn prepare(&self) -> Result<()> {
        let mut worker = self.worker.lock().await;
        if worker.is_some() {
            return Ok(());
        }
        let output = Command::new(&self.binary)
            .arg("--version")
            .output()
            .await
            .map_err(|e| DocmarkError::Ocr {
                detail: format!("cannot launch {}: {e}", self.binary),
            })?;
        if !output.status.success() {
            return Err(DocmarkError::Ocr {
                detail: format!("{} --version failed", self.binary),
            });
        }
        // tesseract prints its version banner to stderr
        let banner = String::from_utf8_lossy(&output.stderr);
        let version = banner
            .lines()
            .chain(String::from_utf8_lossy(&output.stdout).lines())
            .next()
            .unwrap_or("unknown")
            .to_string();
        tracing::debug!(version = %version, "ocr worker ready");
        *worker = Some(Worker { version });
        Ok(())
    }

    async fn recognize(&self, image: &[u8], ext: &str) -> Result<String> {
        self.prepare().await?;

        let mut scratch = tempfile::Builder::new()
            .prefix("docmark-ocr-")
            .suffix(&format!(".{ext}"))
            .tempfile()?;
        scratch.write_all(image)?;

        let output = Command::new(&self.binary)
            .arg(scratch.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.lang)
            .output()
            .await
            .map_err(|e| DocmarkError::Ocr {
                detail: format!("cannot launch {}: {e}", self.binary),
            })?;
        if !output.status.success() {
            return Err(DocmarkError::Ocr {
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn cleanup(&self) -> Result<()> {
        let mut worker = self.worker.lock().await;
        if let Some(w) = worker.take() {
            tracing::debug!(version = %w.version, "ocr worker released");
        }
        Ok(())
    }
}
