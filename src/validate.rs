//! Structural `.proto` text validation.
//!
//! Independent of the synthesizer: the scanner re-derives a model from raw
//! text (hand-written schemas included), the rule set walks it, and the
//! report formatter renders the outcome. A fresh set of accumulators is
//! built per call; nothing is retained.

pub mod report;
pub mod rules;
pub mod scan;

/// Outcome of one `validate` call. `valid` is true iff there are zero
/// errors, regardless of warning/info counts.
#[derive(Debug)]
pub struct Report {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub info: Vec<String>,
    pub summary: String,
}

pub fn validate(proto_text: &str) -> Report {
    let model = scan::scan(proto_text);
    let mut findings = rules::Findings::default();
    rules::check(&model, &mut findings);

    let valid = findings.errors.is_empty();
    let summary = report::summary(
        valid,
        findings.errors.len(),
        findings.warnings.len(),
        findings.info.len(),
    );
    Report {
        valid,
        errors: findings.errors,
        warnings: findings.warnings,
        info: findings.info,
        summary,
    }
}
