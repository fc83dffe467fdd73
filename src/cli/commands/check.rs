//! Availability check command.

use console::style;

use crate::config::Settings;
use crate::knowledge::KnowledgeBaseLookup;
use crate::ocr::OcrBackend;

/// Report whether the OCR engine and knowledge base are usable.
pub async fn cmd_check(settings: &Settings) -> anyhow::Result<()> {
    let backend = settings.ocr_backend();
    let ocr_ok = backend.is_available();
    println!(
        "{} OCR ({} via {}, languages {})",
        if ocr_ok {
            style("✓").green()
        } else {
            style("✗").red()
        },
        backend.backend_type(),
        backend.config().tesseract_cmd,
        backend.config().language
    );
    if !ocr_ok {
        println!("  {}", backend.availability_hint());
    }

    let kb_ok = match settings.knowledge_base() {
        Ok(kb) => match kb.query("").await {
            Ok(records) => {
                println!(
                    "{} Knowledge base ({}): {} records",
                    style("✓").green(),
                    kb.name(),
                    records.len()
                );
                true
            }
            Err(e) => {
                println!("{} Knowledge base ({}): {}", style("✗").red(), kb.name(), e);
                false
            }
        },
        Err(e) => {
            println!("{} Knowledge base: {}", style("✗").red(), e);
            false
        }
    };

    println!(
        "  Threshold {}, marker '{}', {} keyword(s)",
        settings.threshold,
        settings.marker,
        settings.keywords.len()
    );

    if ocr_ok && kb_ok {
        Ok(())
    } else {
        anyhow::bail!("One or more components are unavailable")
    }
}
