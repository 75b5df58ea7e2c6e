// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable conversion failures for the mobile app.
//
// Every technical error is mapped to a plain message with a clear suggestion.
// `retriable` tells the job-tracking layer whether an automatic retry makes
// sense; this crate never retries on its own.

use crate::error::ConvertError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Temporary condition — trying again may work.
    Transient,
    /// The user must do something (pick another file, free up space).
    ActionRequired,
    /// Retrying the same input will fail the same way.
    Permanent,
}

/// A human-readable error with a plain message and an actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Short summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether the job layer may retry automatically.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `ConvertError` into a `HumanError`.
pub fn humanize_error(err: &ConvertError) -> HumanError {
    match err {
        ConvertError::Extraction(_) => HumanError {
            message: "We couldn't read this document.".into(),
            suggestion: "The file may be damaged or password-protected. Try opening it on a computer and saving a fresh copy.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        ConvertError::UnsupportedConversion { from, to } => HumanError {
            message: "That conversion isn't available.".into(),
            suggestion: format!("Converting {from} files to {to} isn't supported yet. Try converting to PDF first."),
            retriable: false,
            severity: Severity::Permanent,
        },

        ConvertError::InvalidGeometry(_) => HumanError {
            message: "The page settings don't leave room for any text.".into(),
            suggestion: "Choose a larger paper size or smaller margins, then try again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        ConvertError::Render { .. } => HumanError {
            message: "We couldn't build slides from this document.".into(),
            suggestion: "Neither page images nor text could be taken from the file. Try exporting it as a PDF first.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        ConvertError::Cancelled => HumanError {
            message: "The conversion was stopped.".into(),
            suggestion: "Start the conversion again when you're ready.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        ConvertError::Serialization(_) => HumanError {
            message: "We couldn't save the converted document.".into(),
            suggestion: "Your device's storage may be full. Free up some space and try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        ConvertError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound => HumanError {
                message: "The file couldn't be found.".into(),
                suggestion: "It may have been moved or deleted. Try uploading the file again.".into(),
                retriable: false,
                severity: Severity::ActionRequired,
            },
            std::io::ErrorKind::PermissionDenied => HumanError {
                message: "The app doesn't have permission to use that file.".into(),
                suggestion: "Try uploading a copy of the file instead.".into(),
                retriable: false,
                severity: Severity::ActionRequired,
            },
            _ => HumanError {
                message: "There was a problem reading or writing a file.".into(),
                suggestion: "Try again. If this keeps happening, your device's storage may be full.".into(),
                retriable: true,
                severity: Severity::Transient,
            },
        },

        ConvertError::Json(_) => HumanError {
            message: "The conversion settings couldn't be understood.".into(),
            suggestion: "Update the app and try again. If this keeps happening, please report it.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}
