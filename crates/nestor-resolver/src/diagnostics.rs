//! Non-fatal problems collected during an import.

use std::fmt;

use nestor_util::errors::NestorError;
use serde::Serialize;

use crate::synth::ModuleId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    UnresolvedProject,
    UnresolvedBuild,
    HiddenBuild,
    UnresolvedPlugin,
    MalformedNotation,
    VersionIncompatibility,
}

impl DiagnosticKind {
    /// Unresolvable references break the module they belong to; an unknown
    /// tool version only changes which rules were assumed.
    pub fn severity(self) -> Severity {
        match self {
            Self::VersionIncompatibility => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::UnresolvedProject => "unresolved project",
            Self::UnresolvedBuild => "unresolved build",
            Self::HiddenBuild => "hidden build",
            Self::UnresolvedPlugin => "unresolved plugin",
            Self::MalformedNotation => "malformed notation",
            Self::VersionIncompatibility => "version incompatibility",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("warning"),
            Self::Error => f.write_str("error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Module the problem is attached to; `None` for import-wide problems.
    pub module: Option<ModuleId>,
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn new(module: Option<ModuleId>, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            module,
            kind,
            severity: kind.severity(),
            message: message.into(),
        }
    }

    pub fn from_error(module: Option<ModuleId>, kind: DiagnosticKind, err: &NestorError) -> Self {
        Self::new(module, kind, err.to_string())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.module {
            Some(module) => write!(f, "{} [{}] {}: {}", self.severity, self.kind, module, self.message),
            None => write!(f, "{} [{}] {}", self.severity, self.kind, self.message),
        }
    }
}

/// All diagnostics of one import, in the order they were raised.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::warn!("{diagnostic}");
        self.entries.push(diagnostic);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.kind == kind)
    }

    pub fn for_module<'a>(&'a self, module: &'a str) -> impl Iterator<Item = &'a Diagnostic> {
        self.entries
            .iter()
            .filter(move |d| d.module.as_ref().is_some_and(|m| m.as_str() == module))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return write!(f, "No problems.");
        }
        writeln!(f, "Problems ({}):", self.entries.len())?;
        for d in &self.entries {
            writeln!(f, "  {d}")?;
        }
        Ok(())
    }
}
