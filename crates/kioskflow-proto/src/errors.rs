//! Document load errors.
//!
//! A [`ParseError`] means the document must not be entered. Callers keep the
//! previously active flow and show the message verbatim next to the editor.

use thiserror::Error;

use crate::ScreenId;

/// Why a raw document was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Text is not valid JSON.
    #[error("invalid JSON at line {line}, column {column}: {message}")]
    Syntax {
        /// 1-based line of the error.
        line: usize,
        /// 1-based column of the error.
        column: usize,
        /// Decoder message.
        message: String,
    },

    /// Valid JSON that does not describe a flow.
    #[error("invalid flow document: {message}")]
    Shape {
        /// Decoder message, naming the offending field.
        message: String,
    },

    /// The entry point is not one of the screens.
    #[error("start screen '{start_screen_id}' is not defined in screens")]
    UnknownStartScreen {
        /// The missing entry point.
        start_screen_id: ScreenId,
    },
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        use serde_json::error::Category;

        match err.classify() {
            Category::Syntax | Category::Eof | Category::Io => {
                Self::Syntax { line: err.line(), column: err.column(), message: err.to_string() }
            },
            Category::Data => Self::Shape { message: err.to_string() },
        }
    }
}
