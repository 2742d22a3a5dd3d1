//! Output formatting and writing utilities
//!
//! Renders generated document maps and validation results in human, JSON,
//! or YAML form. The human renderer is the only place diagnostics are
//! colored; structured formats emit the wire shape untouched.

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use indexmap::IndexMap;
use seqspec_core::{OpenApiDocument, Severity, ValidationIssue, ValidationResult};
use serde::Serialize;
use std::io::{self, Write};

/// Output writer that handles formats, colors, and quiet mode
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer targeting stdout
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self {
            format,
            use_color,
            quiet,
            writer: Box::new(io::stdout()),
        }
    }

    /// Create an output writer with a custom writer (used in tests)
    #[allow(dead_code)]
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            quiet,
            writer,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Print a progress note unless quiet
    pub fn note(&mut self, message: &str) -> Result<()> {
        if !self.quiet {
            writeln!(self.writer, "{message}")?;
        }
        Ok(())
    }

    fn format_value<T: Serialize>(&self, value: &T) -> Result<String> {
        let rendered = match self.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::JsonPretty | OutputFormat::Human => serde_json::to_string_pretty(value)?,
            OutputFormat::Yaml => serde_yaml::to_string(value)?,
        };
        Ok(rendered)
    }

    /// Emit the generated per-service document map
    pub fn emit_documents(&mut self, documents: &IndexMap<String, OpenApiDocument>) -> Result<()> {
        let rendered = self.format_value(documents)?;
        writeln!(self.writer, "{}", rendered.trim_end())?;
        Ok(())
    }

    /// Emit a validation result in the selected format
    pub fn emit_result(&mut self, result: &ValidationResult) -> Result<()> {
        if self.format == OutputFormat::Human {
            return self.emit_result_human(result);
        }
        let rendered = self.format_value(result)?;
        writeln!(self.writer, "{}", rendered.trim_end())?;
        Ok(())
    }

    fn emit_result_human(&mut self, result: &ValidationResult) -> Result<()> {
        if !self.quiet {
            for issue in result.errors.iter().chain(&result.warnings) {
                let rendered = self.render_issue(issue);
                writeln!(self.writer, "{rendered}")?;
            }
        }

        let summary = if result.valid {
            let text = format!("valid ({} warning(s))", result.warnings.len());
            if self.use_color {
                format!("{} {text}", "✓".green().bold())
            } else {
                format!("OK {text}")
            }
        } else {
            let text = format!(
                "invalid: {} error(s), {} warning(s)",
                result.errors.len(),
                result.warnings.len()
            );
            if self.use_color {
                format!("{} {text}", "✗".red().bold())
            } else {
                format!("FAIL {text}")
            }
        };
        writeln!(self.writer, "{summary}")?;
        Ok(())
    }

    fn render_issue(&self, issue: &ValidationIssue) -> String {
        let label = match issue.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        let label = if self.use_color {
            match issue.severity {
                Severity::Error => label.red().bold().to_string(),
                Severity::Warning => label.yellow().bold().to_string(),
                Severity::Info => label.cyan().to_string(),
            }
        } else {
            label.to_string()
        };

        let mut rendered = label;
        if let Some(line) = issue.line {
            rendered.push_str(&format!(" [line {line}]"));
        }
        rendered.push_str(&format!(": {}", issue.message));
        if let Some(context) = &issue.context {
            rendered.push_str(&format!(" ({context})"));
        }
        if let Some(suggestion) = &issue.suggestion {
            rendered.push_str(&format!("\n    hint: {suggestion}"));
        }
        rendered
    }
}
