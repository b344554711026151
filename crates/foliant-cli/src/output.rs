// SPDX-License-Identifier: MIT
//
// Output sink — every line the user sees goes through this trait.
//
// The shell and the operation dispatcher receive a sink reference instead of
// printing directly, so tests can capture the full transcript with a buffer
// implementation. The console implementation styles text with the `console`
// crate (styling drops out automatically when stdout is not a terminal) and
// renders progress with `indicatif` (drawn to stderr, hidden off-terminal).

use std::io::Write;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

// -- Traits -------------------------------------------------------------------

/// Destination for user-facing output.
pub trait OutputSink {
    /// Section heading.
    fn title(&self, text: &str);
    /// Unstyled line.
    fn plain(&self, message: &str);
    /// Input prompt: styled, no trailing newline.
    fn prompt(&self, text: &str);
    /// Completed-operation line.
    fn success(&self, message: &str);
    /// Attention line (headings, farewells).
    fn notice(&self, message: &str);
    /// Failure line, sent to stderr.
    fn error(&self, message: &str);
    /// One metadata key/value pair.
    fn pair(&self, key: &str, value: &str);
    /// Start a progress indicator: a counting bar when `total` is known,
    /// otherwise a spinner.
    fn progress(&self, label: &str, total: Option<u64>) -> Box<dyn ProgressHandle>;
}

/// Handle to a running progress indicator. The indicator is cleared when the
/// handle drops, so error returns never leave a stuck spinner behind.
pub trait ProgressHandle {
    fn advance(&self, delta: u64);
}

// -- Console implementation ---------------------------------------------------

/// Sink backed by the process's stdout/stderr.
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }
}

impl OutputSink for ConsoleSink {
    fn title(&self, text: &str) {
        println!("{}", style(text).magenta().bold());
    }

    fn plain(&self, message: &str) {
        println!("{message}");
    }

    fn prompt(&self, text: &str) {
        print!("{}", style(text).cyan());
        let _ = std::io::stdout().flush();
    }

    fn success(&self, message: &str) {
        println!("{}", style(message).green());
    }

    fn notice(&self, message: &str) {
        println!("{}", style(message).yellow());
    }

    fn error(&self, message: &str) {
        eprintln!("{}", style(message).red());
    }

    fn pair(&self, key: &str, value: &str) {
        println!("{} {value}", style(format!("{key}:")).cyan());
    }

    fn progress(&self, label: &str, total: Option<u64>) -> Box<dyn ProgressHandle> {
        let bar = match total {
            Some(total) => {
                let bar = ProgressBar::new(total);
                bar.set_style(
                    ProgressStyle::with_template("{msg} [{bar:30}] {pos}/{len}")
                        .unwrap_or_else(|_| ProgressStyle::default_bar()),
                );
                bar
            }
            None => {
                let spinner = ProgressBar::new_spinner();
                spinner.enable_steady_tick(Duration::from_millis(100));
                spinner
            }
        };
        bar.set_message(label.to_string());
        Box::new(ConsoleProgress(bar))
    }
}

struct ConsoleProgress(ProgressBar);

impl ProgressHandle for ConsoleProgress {
    fn advance(&self, delta: u64) {
        self.0.inc(delta);
    }
}

impl Drop for ConsoleProgress {
    fn drop(&mut self) {
        self.0.finish_and_clear();
    }
}

// -- Test implementation ------------------------------------------------------

/// Sink that records every call for transcript assertions.
#[cfg(test)]
pub(crate) struct BufferSink {
    entries: std::cell::RefCell<Vec<(&'static str, String)>>,
}

#[cfg(test)]
impl BufferSink {
    pub(crate) fn new() -> Self {
        Self {
            entries: std::cell::RefCell::new(Vec::new()),
        }
    }

    /// All recorded texts, in emission order.
    pub(crate) fn texts(&self) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .map(|(_, text)| text.clone())
            .collect()
    }

    /// Whether any recorded text contains `needle`.
    pub(crate) fn contains(&self, needle: &str) -> bool {
        self.entries
            .borrow()
            .iter()
            .any(|(_, text)| text.contains(needle))
    }

    /// Whether a call of `kind` with text containing `needle` was recorded.
    pub(crate) fn contains_kind(&self, kind: &str, needle: &str) -> bool {
        self.entries
            .borrow()
            .iter()
            .any(|(k, text)| *k == kind && text.contains(needle))
    }

    fn push(&self, kind: &'static str, text: String) {
        self.entries.borrow_mut().push((kind, text));
    }
}

#[cfg(test)]
struct NullProgress;

#[cfg(test)]
impl ProgressHandle for NullProgress {
    fn advance(&self, _delta: u64) {}
}

#[cfg(test)]
impl OutputSink for BufferSink {
    fn title(&self, text: &str) {
        self.push("title", text.to_string());
    }

    fn plain(&self, message: &str) {
        self.push("plain", message.to_string());
    }

    fn prompt(&self, text: &str) {
        self.push("prompt", text.to_string());
    }

    fn success(&self, message: &str) {
        self.push("success", message.to_string());
    }

    fn notice(&self, message: &str) {
        self.push("notice", message.to_string());
    }

    fn error(&self, message: &str) {
        self.push("error", message.to_string());
    }

    fn pair(&self, key: &str, value: &str) {
        self.push("pair", format!("{key}: {value}"));
    }

    fn progress(&self, label: &str, _total: Option<u64>) -> Box<dyn ProgressHandle> {
        self.push("progress", label.to_string());
        Box::new(NullProgress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_sink_records_kinds_and_order() {
        let sink = BufferSink::new();
        sink.notice("first");
        sink.error("second");
        sink.pair("Title", "Report");

        assert_eq!(sink.texts(), vec!["first", "second", "Title: Report"]);
        assert!(sink.contains_kind("error", "second"));
        assert!(!sink.contains_kind("success", "second"));
        assert!(sink.contains("Report"));
    }
}
