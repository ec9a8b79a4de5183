//! cli::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Human output respects the quiet flag. Structured output (`--json`) is
//! always printed, so scripts can combine `--quiet --json`.

use std::fmt::{Display, Write as _};

use serde::Serialize;

use crate::mapping::{ClassMetadata, PropertyMetadata, XmlStyle};
use crate::warmer::WarmUpReport;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_quiet(quiet: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Pretty JSON for `--json` output.
pub fn to_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

fn xml_style_name(style: XmlStyle) -> &'static str {
    match style {
        XmlStyle::Element => "element",
        XmlStyle::Attribute => "attribute",
        XmlStyle::Value => "value",
        XmlStyle::Inline => "inline",
    }
}

fn describe_property(property: &PropertyMetadata) -> String {
    let mut details = Vec::new();

    if let Some(type_hint) = property.type_hint() {
        details.push(format!("type={}", type_hint));
    }
    if !property.is_readable() {
        details.push("write-only".to_string());
    }
    if !property.is_writable() {
        details.push("read-only".to_string());
    }
    if let Some(accessor) = property.accessor() {
        details.push(format!("accessor={}", accessor));
    }
    if let Some(mutator) = property.mutator() {
        details.push(format!("mutator={}", mutator));
    }
    if !property.groups().is_empty() {
        let groups: Vec<&str> = property.groups().iter().map(String::as_str).collect();
        details.push(format!("groups=[{}]", groups.join(", ")));
    }
    if let Some(since) = property.since_version() {
        details.push(format!("since={}", since));
    }
    if let Some(until) = property.until_version() {
        details.push(format!("until={}", until));
    }
    if let Some(depth) = property.max_depth() {
        details.push(format!("max_depth={}", depth));
    }
    if property.xml_style() != XmlStyle::Element {
        details.push(format!("xml={}", xml_style_name(property.xml_style())));
    }

    let mut line = property.name().to_string();
    if property.serialized_name() != property.name() {
        let _ = write!(line, " -> {}", property.serialized_name());
    }
    if !details.is_empty() {
        let _ = write!(line, " ({})", details.join(", "));
    }
    line
}

/// Human-readable rendering of one record.
pub fn render_metadata(metadata: &ClassMetadata) -> String {
    let mut out = format!("class {}\n", metadata.name());

    if let Some(root) = metadata.xml_root() {
        let _ = writeln!(out, "xml root: {}", root);
    }

    if metadata.is_empty() {
        out.push_str("no serializable properties\n");
        return out;
    }

    for property in metadata.properties() {
        let _ = writeln!(out, "  {}", describe_property(property));
    }
    out
}

/// Human-readable rendering of a warm-up run.
pub fn render_report(report: &WarmUpReport) -> String {
    if !report.enumerable {
        return "no enumerable mapping sources, nothing to warm\n".to_string();
    }

    let mut out = String::new();
    if let Some(error) = &report.enumeration_error {
        let _ = writeln!(out, "could not list classes: {}", error);
    }
    let _ = writeln!(out, "warmed {} class(es)", report.warmed.len());
    for (class, message) in &report.failed {
        let _ = writeln!(out, "  failed {}: {}", class, message);
    }
    out
}
