// SPDX-License-Identifier: MIT
//
// The fixed 12-option menu: rendering and selection parsing.

use crate::output::OutputSink;

/// Number of the exit option, also substituted for invalid piped input.
pub const EXIT_OPTION: u32 = 12;

const OPTIONS: [&str; 12] = [
    "Encrypt PDF",
    "Decrypt PDF",
    "Extract Metadata",
    "Merge PDFs",
    "Split PDF",
    "Rotate Pages",
    "PDF to Word",
    "Word to PDF",
    "Images to PDF",
    "PDF to Images",
    "Create Sample Files",
    "Exit",
];

/// Print the menu followed by the selection prompt.
pub fn render(sink: &dyn OutputSink) {
    sink.plain("");
    sink.title("Foliant PDF Toolbox");
    sink.plain("");
    for (index, label) in OPTIONS.iter().enumerate() {
        sink.plain(&format!("{}. {label}", index + 1));
    }
    sink.plain("");
    sink.prompt("Choose an option (1-12): ");
}

/// Parse a selection line; `None` for anything outside 1..=12.
pub fn parse_selection(line: &str) -> Option<u32> {
    let value: u32 = line.trim().parse().ok()?;
    (1..=EXIT_OPTION).contains(&value).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::BufferSink;

    #[test]
    fn every_option_is_listed_with_its_number() {
        let sink = BufferSink::new();
        render(&sink);

        assert!(sink.contains("1. Encrypt PDF"));
        assert!(sink.contains("10. PDF to Images"));
        assert!(sink.contains("12. Exit"));
        assert!(sink.contains_kind("prompt", "Choose an option (1-12): "));
    }

    #[test]
    fn selection_parsing_bounds_the_range() {
        assert_eq!(parse_selection("1"), Some(1));
        assert_eq!(parse_selection(" 12 \n"), Some(12));
        assert_eq!(parse_selection("0"), None);
        assert_eq!(parse_selection("13"), None);
        assert_eq!(parse_selection("banana"), None);
        assert_eq!(parse_selection(""), None);
    }
}
