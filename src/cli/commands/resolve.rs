//! Resolve commands: screenshot or raw text to an answer.

use std::io::Read;
use std::path::{Path, PathBuf};

use console::style;

use crate::config::Settings;
use crate::ocr::OcrBackend;
use crate::pipeline::{Resolution, ResolutionStatus};

/// OCR an image file and resolve the error message it contains.
pub async fn cmd_resolve(settings: &Settings, image: &Path, show_text: bool) -> anyhow::Result<()> {
    if !image.is_file() {
        anyhow::bail!("Image not found: {}", image.display());
    }
    match infer::get_from_path(image)? {
        Some(kind) if kind.matcher_type() == infer::MatcherType::Image => {}
        _ => anyhow::bail!("Not a supported image: {}", image.display()),
    }

    let backend = settings.ocr_backend();
    if !backend.is_available() {
        anyhow::bail!("{}", backend.availability_hint());
    }

    let knowledge = settings.knowledge_base().map_err(anyhow::Error::msg)?;

    let path: PathBuf = image.to_path_buf();
    let result = tokio::task::spawn_blocking(move || backend.ocr_image(&path)).await??;

    if show_text {
        println!("{} OCR text ({}ms):", style("→").cyan(), result.processing_time_ms);
        for line in result.text.lines() {
            println!("  {}", style(line).dim());
        }
    }

    let resolution = settings
        .pipeline()
        .resolve(&result.text, knowledge.as_ref())
        .await;
    print_resolution(&resolution);
    Ok(())
}

/// Resolve text that was recognised elsewhere.
pub async fn cmd_match(settings: &Settings, text: &str) -> anyhow::Result<()> {
    let text = if text == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        text.to_string()
    };

    let knowledge = settings.knowledge_base().map_err(anyhow::Error::msg)?;
    let resolution = settings.pipeline().resolve(&text, knowledge.as_ref()).await;
    print_resolution(&resolution);
    Ok(())
}

fn print_resolution(resolution: &Resolution) {
    if resolution.status == ResolutionStatus::NoMessageFound {
        println!("{} {}", style("✗").yellow(), resolution.response_text());
        return;
    }

    println!(
        "{} Message: {}",
        style("→").cyan(),
        style(&resolution.extracted_message).bold()
    );

    let marker = match resolution.status {
        ResolutionStatus::Answered => style("✓").green(),
        ResolutionStatus::LookupUnavailable => style("✗").red(),
        _ => style("✗").yellow(),
    };
    match resolution.score {
        Some(score) => println!(
            "{} {} (score {}, {})",
            marker,
            resolution.response_text(),
            score,
            resolution.status
        ),
        None => println!(
            "{} {} ({})",
            marker,
            resolution.response_text(),
            resolution.status
        ),
    }
}
