use std::fmt;

use serde::Serialize;

/// Pipeline stage that produced a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Lexical,
    Syntax,
    Semantic,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Lexical => write!(f, "lexical"),
            Phase::Syntax => write!(f, "syntax"),
            Phase::Semantic => write!(f, "semantic"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A user-facing error or warning. Constructors build errors; warnings
/// go through [`Diagnostic::into_warning`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Diagnostic {
    pub phase: Phase,
    pub severity: Severity,
    pub line: usize,
    pub column: Option<usize>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        phase: Phase,
        line: usize,
        column: Option<usize>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            phase,
            severity: Severity::Error,
            line,
            column,
            message: message.into(),
        }
    }

    pub fn lexical(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::new(Phase::Lexical, line, Some(column), message)
    }

    pub fn syntax(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::new(Phase::Syntax, line, Some(column), message)
    }

    pub fn semantic(line: usize, message: impl Into<String>) -> Self {
        Self::new(Phase::Semantic, line, None, message)
    }

    pub fn into_warning(self) -> Self {
        Self {
            severity: Severity::Warning,
            ..self
        }
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} at line {}", self.phase, self.severity, self.line)?;
        if let Some(column) = self.column {
            write!(f, ", column {}", column)?;
        }
        write!(f, ": {}", self.message)
    }
}
