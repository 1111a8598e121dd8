//! Summary line selection and the fixed plain-text report layout.

use crate::validate::Report;

pub fn summary(valid: bool, errors: usize, warnings: usize, info: usize) -> String {
    if !valid {
        return format!("Invalid schema: {errors} error(s) found.");
    }
    if warnings > 0 {
        return format!("Valid schema, but {warnings} warning(s) deserve attention.");
    }
    if info > 0 {
        return format!("Valid schema with {info} informational note(s).");
    }
    "Perfect! The schema passed all validation checks.".to_string()
}

/// Fixed layout for export/copy: banner, status line, three labeled sections.
pub fn render(report: &Report) -> String {
    let mut out = String::new();
    out.push_str("============================================\n");
    out.push_str(" PROTO VALIDATION REPORT\n");
    out.push_str("============================================\n");
    out.push_str(&format!(
        "Status: {}\n",
        if report.valid { "VALID" } else { "INVALID" }
    ));
    out.push_str(&format!("{}\n\n", report.summary));

    render_section(&mut out, "ERRORS", &report.errors);
    render_section(&mut out, "WARNINGS", &report.warnings);
    render_section(&mut out, "INFO", &report.info);

    out
}

fn render_section(out: &mut String, label: &str, items: &[String]) {
    out.push_str(&format!("{label} ({}):\n", items.len()));
    for item in items {
        out.push_str(&format!("  - {item}\n"));
    }
    out.push('\n');
}
