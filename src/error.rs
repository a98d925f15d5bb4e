//! Process exit codes and the `--json-errors` report.

use serde::Serialize;

/// How a run ended.
///
/// | code | prefix  | meaning                                              |
/// |------|---------|------------------------------------------------------|
/// | 0    | `DD000` | duplicates found, requested action completed         |
/// | 1    | `DD001` | fatal error, nothing was scanned or acted on         |
/// | 2    | `DD002` | scan completed, every file is unique                 |
/// | 3    | `DD003` | finished, but the root, a file, a delete or the export failed |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    NoDuplicates = 2,
    PartialSuccess = 3,
}

impl ExitCode {
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Stable identifier printed in front of error messages.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DD000",
            Self::GeneralError => "DD001",
            Self::NoDuplicates => "DD002",
            Self::PartialSuccess => "DD003",
        }
    }

    /// Partial when `partial` is set, `self` otherwise.
    #[must_use]
    pub fn or_partial(self, partial: bool) -> Self {
        if partial {
            Self::PartialSuccess
        } else {
            self
        }
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        // Discriminants are 0..=3
        Self::from(code as u8)
    }
}

/// Fatal error as printed on stderr with `--json-errors`.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    pub code: &'static str,
    pub exit_code: i32,
    /// Full context chain, outermost first
    pub message: String,
}

impl StructuredError {
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
        }
    }
}
