use anyhow::{Context, Result};
use pdfsplit::{
    LoadOptions, PageSource, PageStatus, PdfDocument, ProgressSink, ProgressSnapshot,
    Splitter, Stage,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageReport {
    pub page: u32,
    pub status: PageStatus,
    pub size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Logs stage changes at info level and per-page progress at debug level.
#[derive(Default)]
struct ProgressLog {
    stage: Stage,
}

impl ProgressSink for ProgressLog {
    fn report(&mut self, snapshot: ProgressSnapshot) {
        if snapshot.stage != self.stage {
            self.stage = snapshot.stage;
            info!(
                stage = ?snapshot.stage,
                progress = snapshot.overall_progress,
                total = snapshot.total_pages,
                "split progress"
            );
        } else {
            debug!(
                progress = snapshot.overall_progress,
                processed = snapshot.processed_pages,
                total = snapshot.total_pages,
                "split progress"
            );
        }
    }
}

pub fn output_file_name(stem: &str, page_number: u32) -> String {
    format!("{}_{:04}.pdf", stem, page_number)
}

/// Split `input` into `output_dir`, writing each page as soon as it is produced.
///
/// Request-level failures come back as a [`pdfsplit::SplitError`] inside the
/// `anyhow::Error`; failed pages are only recorded in the report.
pub fn split_to_dir<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output_dir: Q,
    pages: Option<&str>,
    options: LoadOptions,
) -> Result<Vec<PageReport>> {
    let input = input.as_ref();
    let output_dir = output_dir.as_ref();

    let doc = PdfDocument::open(input, options)?;
    info!(path = %input.display(), pages = doc.page_count(), "loaded PDF");

    let splitter = Splitter::new(&doc, ProgressLog::default(), pages)?;

    // Create output directory if it doesn't exist
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

    // Get the base name of the input file
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("page");

    let mut reports = Vec::with_capacity(splitter.total_pages() as usize);
    for outcome in splitter {
        let page = outcome.page_number;
        let status = outcome.status();
        let size = outcome.final_size();
        let error = outcome.error().map(str::to_string);

        let output_path = match outcome.into_artifact() {
            Some(bytes) => {
                let output_path: PathBuf = output_dir.join(output_file_name(stem, page));
                std::fs::write(&output_path, &bytes)
                    .with_context(|| format!("Failed to write PDF: {}", output_path.display()))?;
                Some(output_path.display().to_string())
            }
            None => None,
        };

        let report = PageReport {
            page,
            status,
            size,
            output_path,
            error,
        };
        reports.push(report);
    }

    Ok(reports)
}

pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output_dir: Q,
    pages: Option<&str>,
    options: LoadOptions,
    json: bool,
) -> Result<()> {
    let output_dir = output_dir.as_ref();
    let reports = split_to_dir(input, output_dir, pages, options)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    for report in reports.iter().filter(|r| r.status == PageStatus::Error) {
        println!(
            "Page {} failed: {}",
            report.page,
            report.error.as_deref().unwrap_or("unknown error")
        );
    }

    let written = reports
        .iter()
        .filter(|r| r.status == PageStatus::Ok)
        .count();
    println!(
        "Split {} of {} page(s) into {}",
        written,
        reports.len(),
        output_dir.display()
    );

    Ok(())
}
