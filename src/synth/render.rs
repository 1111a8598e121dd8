//! Deterministic `.proto` text emission. Everything here is pure string
//! formatting over the finished registry; byte-identical input and options
//! produce byte-identical output.

use std::collections::BTreeSet;

use crate::model::{MessageDef, Registry};
use crate::synth::Syntax;

pub struct RenderPlan<'a> {
    pub syntax: Syntax,
    pub package: &'a str,
    pub imports: &'a BTreeSet<&'static str>,
    pub auto_import: bool,
    pub registry: &'a Registry,
    pub root_message: &'a str,
    pub service_name: Option<&'a str>,
}

pub fn render(plan: &RenderPlan) -> String {
    let mut out = String::new();

    out.push_str("// Generated by json-protogen from JSON sample data.\n");
    out.push_str(&format!("// Root message: {}\n", plan.root_message));
    out.push('\n');

    out.push_str(&format!("syntax = \"{}\";\n\n", plan.syntax.as_str()));
    out.push_str(&format!("package {};\n\n", plan.package));

    if plan.auto_import && !plan.imports.is_empty() {
        // BTreeSet keeps the import list sorted and unique.
        for path in plan.imports {
            out.push_str(&format!("import \"{path}\";\n"));
        }
        out.push('\n');
    }

    // Shallow messages first; insertion order breaks ties (stable sort).
    let mut messages: Vec<&MessageDef> = plan.registry.iter().collect();
    messages.sort_by_key(|m| m.depth);

    for (i, msg) in messages.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        render_message(&mut out, msg);
    }

    if let Some(service) = plan.service_name {
        out.push('\n');
        render_service(&mut out, service, plan.root_message);
    }

    out
}

fn render_message(out: &mut String, msg: &MessageDef) {
    out.push_str(&format!("message {} {{\n", msg.name));
    for field in &msg.fields {
        let modifier = if field.optional { "optional " } else { "" };
        out.push_str(&format!(
            "  {}{} {} = {};",
            modifier,
            field.ty.render(),
            field.name,
            field.number
        ));
        if let Some(comment) = &field.comment {
            out.push_str(&format!(" // {comment}"));
        }
        out.push('\n');
    }
    out.push_str("}\n");
}

/// CRUD-shaped stub over the root message. All three rpcs take and return
/// the root so the output stays self-contained.
fn render_service(out: &mut String, service: &str, entity: &str) {
    out.push_str(&format!("service {service} {{\n"));
    out.push_str(&format!("  rpc Create{entity}({entity}) returns ({entity});\n"));
    out.push_str(&format!("  rpc Get{entity}ById({entity}) returns ({entity});\n"));
    out.push_str(&format!("  rpc List{entity}s({entity}) returns ({entity});\n"));
    out.push_str("}\n");
}
