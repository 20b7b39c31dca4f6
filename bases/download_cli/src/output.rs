// bases/download_cli/src/output.rs
use crate::menu::{MenuChoice, DEFAULT_MAX_RESULTS};
use media_downloader::{DownloadListener, DownloadReport, ProgressEvent, ProgressStatus};
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::Path;

pub struct OutputHandler {
    verbose: bool,
}

impl OutputHandler {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn print_menu(&self) {
        println!();
        println!("Wavegrab");
        for choice in MenuChoice::ALL {
            println!("  {}. {}", choice.number(), choice.label());
        }
    }

    pub fn prompt(&self, text: &str) -> io::Result<()> {
        print!("{}", text);
        io::stdout().flush()
    }

    pub fn print_invalid_choice(&self, input: &str) {
        println!("Invalid choice '{}'. Please pick a number from the menu.", input.trim());
    }

    pub fn print_max_results_warning(&self, input: &str) {
        tracing::debug!(input = input.trim(), "unusable result count");
        println!(
            "Invalid input for number of videos. Defaulting to {}.",
            DEFAULT_MAX_RESULTS
        );
    }

    pub fn print_report(&self, report: &DownloadReport) {
        if report.nothing_new() {
            println!("No new songs to download.");
            return;
        }

        println!(
            "✅ Download complete. The songs are in the folder: {}",
            report.folder.display()
        );

        if self.verbose {
            println!("Submitted: {}", report.downloaded_count());
            println!("Skipped:   {}", report.skipped.len());
        }
    }

    pub fn print_goodbye(&self) {
        println!("Goodbye!");
    }

    pub fn print_error(&self, error: &color_eyre::Report) {
        eprintln!("Error: {}", error);

        if self.verbose {
            eprintln!("\nError details:");
            error.chain().skip(1).for_each(|cause| {
                eprintln!("  caused by: {}", cause);
            });
        }
    }
}

/// Prints skip notices and each file's status changes
#[derive(Default)]
pub struct ConsoleProgress {
    last_status: HashMap<String, ProgressStatus>,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the event; returns true when it changes the file's status
    fn transition(&mut self, event: &ProgressEvent) -> bool {
        self.last_status.insert(event.filename.clone(), event.status) != Some(event.status)
    }
}

impl DownloadListener for ConsoleProgress {
    fn on_progress(&mut self, event: &ProgressEvent) {
        if !self.transition(event) {
            return;
        }

        let name = display_name(&event.filename);
        match event.status {
            ProgressStatus::Downloading => println!("⬇️  Downloading: {}", name),
            ProgressStatus::Finished => {
                println!("Finished downloading {}, now post-processing...", name)
            }
            ProgressStatus::PostProcessing => println!("Converting: {}", name),
            ProgressStatus::PostProcessed => println!("Saved: {}", name),
            ProgressStatus::Error => println!("❌ Failed: {}", name),
        }
    }

    fn on_skip(&mut self, title: &str) {
        println!("Skipping duplicate: {}", title);
    }
}

fn display_name(filename: &str) -> String {
    Path::new(filename)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string())
}
