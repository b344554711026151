// SPDX-License-Identifier: MIT
//
// Interactive shell — the menu loop as an explicit state machine.
//
// One `Shell` drives a whole session: show the menu, read a selection,
// collect the operation's parameters, execute, report, and round again until
// exit. The input source is any `BufRead`, so tests drive the shell with
// in-memory scripts. Every operation failure is reported and survived; only
// the exit option or the end of input ends the loop, and the process exits
// with code 0 either way.

use std::io::BufRead;
use std::path::PathBuf;

use foliant_core::error::FoliantError;
use foliant_core::{AppConfig, OperationReport, Result};
use tracing::debug;

use crate::menu;
use crate::ops;
use crate::output::OutputSink;
use crate::samples;

/// How selections are read, resolved once at startup from whether stdin is a
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellMode {
    /// Re-prompt on bad selections, pause for Enter between operations.
    Interactive,
    /// One read per prompt; a bad or missing selection means exit; no pauses.
    Piped,
}

/// Session state. `run` steps through these until `Terminated`.
enum ShellState {
    DisplayingMenu,
    AwaitingSelection,
    CollectingParameters(u32),
    Executing(PendingOperation),
    Reporting(Result<OperationReport>),
    Terminated,
}

/// A fully-collected operation, ready to dispatch.
enum PendingOperation {
    Encrypt { input: PathBuf, password: String },
    Decrypt { input: PathBuf, password: String },
    ExtractMetadata { input: PathBuf },
    Merge { inputs: Vec<PathBuf>, output: PathBuf },
    Split { input: PathBuf, output_dir: PathBuf },
    Rotate { input: PathBuf, page_number: u32, degrees: i64 },
    PdfToWord { input: PathBuf },
    WordToPdf { input: PathBuf },
    ImagesToPdf { inputs: Vec<PathBuf>, output: PathBuf },
    PdfToImages { input: PathBuf, output_dir: PathBuf },
    CreateSamples,
}

pub struct Shell<'a, R: BufRead> {
    input: R,
    sink: &'a dyn OutputSink,
    config: AppConfig,
    mode: ShellMode,
}

impl<'a, R: BufRead> Shell<'a, R> {
    pub fn new(input: R, sink: &'a dyn OutputSink, config: AppConfig, mode: ShellMode) -> Self {
        Self {
            input,
            sink,
            config,
            mode,
        }
    }

    /// Drive the session to completion.
    pub fn run(&mut self) {
        let mut state = ShellState::DisplayingMenu;
        loop {
            state = match state {
                ShellState::DisplayingMenu => {
                    menu::render(self.sink);
                    ShellState::AwaitingSelection
                }
                ShellState::AwaitingSelection => self.read_selection(),
                ShellState::CollectingParameters(choice) => self.collect(choice),
                ShellState::Executing(operation) => ShellState::Reporting(self.execute(operation)),
                ShellState::Reporting(outcome) => self.report(outcome),
                ShellState::Terminated => break,
            };
        }
    }

    // -- State handlers -------------------------------------------------------

    fn read_selection(&mut self) -> ShellState {
        match self.mode {
            // One shot: anything but a valid selection substitutes the exit
            // option.
            ShellMode::Piped => match self.read_line().and_then(|l| menu::parse_selection(&l)) {
                Some(choice) => self.dispatch_choice(choice),
                None => self.exit(),
            },
            ShellMode::Interactive => loop {
                match self.read_line() {
                    Some(line) => match menu::parse_selection(&line) {
                        Some(choice) => return self.dispatch_choice(choice),
                        None => self.sink.error("Invalid choice. Please select 1-12."),
                    },
                    None => {
                        self.sink.notice("Exiting...");
                        return self.exit();
                    }
                }
            },
        }
    }

    fn dispatch_choice(&self, choice: u32) -> ShellState {
        debug!(choice, "Menu selection");
        if choice == menu::EXIT_OPTION {
            self.exit()
        } else {
            ShellState::CollectingParameters(choice)
        }
    }

    fn exit(&self) -> ShellState {
        self.sink.notice("Thank you for using Foliant!");
        ShellState::Terminated
    }

    /// Prompt for the selected operation's parameters.
    ///
    /// End of input at any prompt ends the session like the exit option;
    /// during multi-file collection it ends the list like the `done`
    /// sentinel instead.
    fn collect(&mut self, choice: u32) -> ShellState {
        match choice {
            1 => {
                let Some(input) = self.ask("Enter PDF path to encrypt: ") else {
                    return self.exit();
                };
                let Some(password) = self.ask("Enter password for encryption: ") else {
                    return self.exit();
                };
                ShellState::Executing(PendingOperation::Encrypt {
                    input: PathBuf::from(input),
                    password,
                })
            }
            2 => {
                let Some(input) = self.ask("Enter PDF path to decrypt: ") else {
                    return self.exit();
                };
                let Some(password) = self.ask("Enter password: ") else {
                    return self.exit();
                };
                ShellState::Executing(PendingOperation::Decrypt {
                    input: PathBuf::from(input),
                    password,
                })
            }
            3 => {
                let Some(input) = self.ask("Enter PDF path to extract metadata: ") else {
                    return self.exit();
                };
                ShellState::Executing(PendingOperation::ExtractMetadata {
                    input: PathBuf::from(input),
                })
            }
            4 => {
                let inputs = self.collect_paths("Enter PDF path (or 'done' to finish): ");
                if inputs.is_empty() {
                    return ShellState::Reporting(Err(FoliantError::EmptyInput("PDF files")));
                }
                let Some(output) = self.ask("Enter output PDF path: ") else {
                    return self.exit();
                };
                ShellState::Executing(PendingOperation::Merge {
                    inputs,
                    output: PathBuf::from(output),
                })
            }
            5 => {
                let Some(input) = self.ask("Enter PDF path to split: ") else {
                    return self.exit();
                };
                let Some(output_dir) = self.ask("Enter output directory: ") else {
                    return self.exit();
                };
                ShellState::Executing(PendingOperation::Split {
                    input: PathBuf::from(input),
                    output_dir: PathBuf::from(output_dir),
                })
            }
            6 => {
                let Some(input) = self.ask("Enter PDF path to rotate pages: ") else {
                    return self.exit();
                };
                let Some(page_line) = self.ask("Enter page number to rotate: ") else {
                    return self.exit();
                };
                let Ok(page_number) = page_line.parse::<u32>() else {
                    self.sink
                        .error("Please enter valid numbers for page and rotation.");
                    return self.pause_then_menu();
                };
                let Some(angle_line) = self.ask("Enter rotation angle (90, 180, 270): ") else {
                    return self.exit();
                };
                let Ok(degrees) = angle_line.parse::<i64>() else {
                    self.sink
                        .error("Please enter valid numbers for page and rotation.");
                    return self.pause_then_menu();
                };
                ShellState::Executing(PendingOperation::Rotate {
                    input: PathBuf::from(input),
                    page_number,
                    degrees,
                })
            }
            7 => {
                let Some(input) = self.ask("Enter PDF path to convert to Word: ") else {
                    return self.exit();
                };
                ShellState::Executing(PendingOperation::PdfToWord {
                    input: PathBuf::from(input),
                })
            }
            8 => {
                let Some(input) = self.ask("Enter Word document path to convert to PDF: ") else {
                    return self.exit();
                };
                ShellState::Executing(PendingOperation::WordToPdf {
                    input: PathBuf::from(input),
                })
            }
            9 => {
                let inputs = self.collect_paths("Enter image path (or 'done' to finish): ");
                if inputs.is_empty() {
                    return ShellState::Reporting(Err(FoliantError::EmptyInput("image files")));
                }
                let Some(output) = self.ask("Enter output PDF path: ") else {
                    return self.exit();
                };
                ShellState::Executing(PendingOperation::ImagesToPdf {
                    inputs,
                    output: PathBuf::from(output),
                })
            }
            10 => {
                let Some(input) = self.ask("Enter PDF path to convert to images: ") else {
                    return self.exit();
                };
                let Some(output_dir) = self.ask("Enter output directory for images: ") else {
                    return self.exit();
                };
                ShellState::Executing(PendingOperation::PdfToImages {
                    input: PathBuf::from(input),
                    output_dir: PathBuf::from(output_dir),
                })
            }
            11 => {
                self.sink.notice("Creating sample files for testing...");
                ShellState::Executing(PendingOperation::CreateSamples)
            }
            _ => unreachable!("selections are bounded by menu::parse_selection"),
        }
    }

    fn execute(&self, operation: PendingOperation) -> Result<OperationReport> {
        match operation {
            PendingOperation::Encrypt { input, password } => {
                ops::encrypt(self.sink, &input, &password)
            }
            PendingOperation::Decrypt { input, password } => {
                ops::decrypt(self.sink, &input, &password)
            }
            PendingOperation::ExtractMetadata { input } => {
                ops::extract_metadata(self.sink, &input)
            }
            PendingOperation::Merge { inputs, output } => {
                ops::merge(self.sink, &inputs, &output)
            }
            PendingOperation::Split { input, output_dir } => {
                ops::split(self.sink, &input, &output_dir)
            }
            PendingOperation::Rotate {
                input,
                page_number,
                degrees,
            } => ops::rotate(self.sink, &input, page_number, degrees),
            PendingOperation::PdfToWord { input } => ops::pdf_to_word(self.sink, &input),
            PendingOperation::WordToPdf { input } => {
                ops::word_to_pdf(self.sink, &input, &self.config)
            }
            PendingOperation::ImagesToPdf { inputs, output } => {
                ops::images_to_pdf(self.sink, &inputs, &output, &self.config)
            }
            PendingOperation::PdfToImages { input, output_dir } => {
                ops::pdf_to_images(self.sink, &input, &output_dir, &self.config)
            }
            PendingOperation::CreateSamples => samples::create_samples(self.sink, &self.config),
        }
    }

    fn report(&mut self, outcome: Result<OperationReport>) -> ShellState {
        match outcome {
            Ok(report) => {
                // Operations that already rendered their output leave the
                // message empty.
                if !report.message.is_empty() {
                    self.sink.success(&report.message);
                }
            }
            Err(err) => self.sink.error(&format!("Error: {err}")),
        }
        self.pause_then_menu()
    }

    // -- Input helpers --------------------------------------------------------

    /// Interactive mode waits for Enter before the menu comes back; piped
    /// mode rolls straight on. End of input here ends the session.
    fn pause_then_menu(&mut self) -> ShellState {
        if self.mode == ShellMode::Interactive {
            self.sink.plain("");
            self.sink.success("Press Enter to continue...");
            if self.read_line().is_none() {
                return ShellState::Terminated;
            }
        }
        ShellState::DisplayingMenu
    }

    /// Read paths until `done` (case-insensitive) or the end of input.
    fn collect_paths(&mut self, prompt: &str) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        while let Some(line) = self.ask(prompt) {
            if line.eq_ignore_ascii_case("done") {
                break;
            }
            if !line.is_empty() {
                paths.push(PathBuf::from(line));
            }
        }
        paths
    }

    fn ask(&mut self, prompt: &str) -> Option<String> {
        self.sink.prompt(prompt);
        self.read_line()
    }

    /// One trimmed line; `None` once the input source is exhausted.
    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::BufferSink;
    use std::io::Cursor;

    fn run_shell(script: &str, mode: ShellMode, config: AppConfig) -> BufferSink {
        let sink = BufferSink::new();
        let mut shell = Shell::new(Cursor::new(script.to_string()), &sink, config, mode);
        shell.run();
        sink
    }

    fn run_piped(script: &str) -> BufferSink {
        run_shell(script, ShellMode::Piped, AppConfig::default())
    }

    #[test]
    fn piped_exit_option_says_goodbye() {
        let sink = run_piped("12\n");
        assert!(sink.contains("1. Encrypt PDF"));
        assert!(sink.contains_kind("notice", "Thank you for using Foliant!"));
    }

    #[test]
    fn piped_invalid_selection_substitutes_exit() {
        let sink = run_piped("banana\n");
        assert!(sink.contains_kind("notice", "Thank you for using Foliant!"));
        assert!(!sink.contains("Invalid choice"));
    }

    #[test]
    fn piped_missing_selection_exits() {
        let sink = run_piped("");
        assert!(sink.contains_kind("notice", "Thank you for using Foliant!"));
    }

    #[test]
    fn interactive_reprompts_until_a_valid_selection() {
        let sink = run_shell("nope\n12\n", ShellMode::Interactive, AppConfig::default());
        assert!(sink.contains_kind("error", "Invalid choice. Please select 1-12."));
        assert!(sink.contains("Thank you for using Foliant!"));
    }

    #[test]
    fn interactive_end_of_input_notes_the_exit() {
        let sink = run_shell("", ShellMode::Interactive, AppConfig::default());
        assert!(sink.contains_kind("notice", "Exiting..."));
        assert!(sink.contains_kind("notice", "Thank you for using Foliant!"));
    }

    #[test]
    fn merge_with_no_paths_reports_empty_input() {
        // The sentinel is case-insensitive; nothing was collected first.
        let sink = run_piped("4\nDONE\n");
        assert!(sink.contains_kind("error", "Error: no PDF files provided"));
        // The session survived the failure and reached the exit path.
        assert!(sink.contains("Thank you for using Foliant!"));
    }

    #[test]
    fn rotate_with_malformed_numbers_never_dispatches() {
        let sink = run_piped("6\nwhatever.pdf\nabc\n");
        assert!(sink.contains_kind("error", "Please enter valid numbers for page and rotation."));
        assert!(!sink.contains("file not found"));
    }

    #[test]
    fn operation_errors_are_survivable() {
        let sink = run_piped("1\nmissing.pdf\npw\n12\n");
        assert!(sink.contains_kind("error", "file not found: missing.pdf"));
        assert!(sink.contains("Thank you for using Foliant!"));
    }

    #[test]
    fn samples_then_split_runs_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let sample_dir = dir.path().join("sample_files");
        let config = AppConfig {
            sample_dir: sample_dir.display().to_string(),
            ..Default::default()
        };

        let multi = sample_dir.join("sample_multi.pdf");
        let pages_dir = dir.path().join("pages");
        let script = format!(
            "11\n5\n{}\n{}\n12\n",
            multi.display(),
            pages_dir.display()
        );

        let sink = run_shell(&script, ShellMode::Piped, config);
        assert!(sink.contains_kind("success", "Sample files created successfully!"));
        assert!(sink.contains_kind("success", "PDF split successfully into"));
        assert!(pages_dir.join("page_3.pdf").exists());
        assert!(sink.contains("Thank you for using Foliant!"));
    }
}
