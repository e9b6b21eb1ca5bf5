//! Terminal rendering of report notifications

use colored::*;
use folio_report::{FailureKind, Notification, NotificationSink};
use tracing::warn;

/// Prints notifications as coloured status lines
pub struct TerminalNotifier {
    show_progress: bool,
}

impl TerminalNotifier {
    pub fn new(show_progress: bool) -> Self {
        Self { show_progress }
    }
}

impl NotificationSink for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        match notification {
            Notification::Started { job_id } => {
                println!("{} {}", "⟳".cyan(), "Generating PDF...".bold());
                println!(
                    "  {}",
                    "Your document is being generated and will download automatically.".dimmed()
                );
                println!("  Job: {}", job_id.to_string().dimmed());
            }
            Notification::Progress {
                attempt,
                max_attempts,
            } => {
                if self.show_progress {
                    println!(
                        "  {}",
                        format!("checking status ({}/{})", attempt, max_attempts).dimmed()
                    );
                }
            }
            Notification::Succeeded {
                file_name,
                location,
            } => {
                println!("{} {}", "✓".green(), "Print successful".bold());
                println!("  PDF has been downloaded successfully: {}", file_name.cyan());
                println!("  Saved to: {}", location.dimmed());
            }
            Notification::Failed { kind, message } => {
                eprintln!("{} {} {}", "✗".red(), "Error".red().bold(), label(kind).dimmed());
                eprintln!("  {}", message.red());
            }
        }
    }
}

/// Prints one JSON object per notification, for hosts that drive the CLI
pub struct JsonNotifier;

impl NotificationSink for JsonNotifier {
    fn notify(&self, notification: Notification) {
        match serde_json::to_string(&notification) {
            Ok(line) => println!("{}", line),
            Err(e) => warn!("Failed to encode notification: {}", e),
        }
    }
}

fn label(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::Transport => "(service unreachable or rejected the request)",
        FailureKind::JobFailed => "(reported by server)",
        FailureKind::TimedOut => "(timed out waiting)",
        FailureKind::Delivery => "(could not save file)",
        FailureKind::Internal => "(internal)",
    }
}
