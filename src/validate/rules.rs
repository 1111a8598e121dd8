//! Rule set over the scanned proto model. Three independent severities;
//! `errors` alone decides validity.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{FIELD_NUMBER_MAX, RESERVED_NUMBER_RANGE};
use crate::synth::names;
use crate::validate::scan::{MessageBlock, ProtoModel, ServiceBlock};

const SCALAR_TYPES: &[&str] = &[
    "double", "float", "int32", "int64", "uint32", "uint64", "sint32", "sint64",
    "fixed32", "fixed64", "sfixed32", "sfixed64", "bool", "string", "bytes",
];

const WELL_KNOWN_TYPES: &[&str] = &[
    "google.protobuf.Timestamp",
    "google.protobuf.Duration",
    "google.protobuf.Any",
    "google.protobuf.Empty",
    "google.protobuf.Struct",
    "google.protobuf.Value",
    "google.protobuf.ListValue",
    "google.protobuf.NullValue",
    "google.protobuf.FieldMask",
    "google.protobuf.StringValue",
    "google.protobuf.BytesValue",
    "google.protobuf.BoolValue",
    "google.protobuf.Int32Value",
    "google.protobuf.Int64Value",
    "google.protobuf.UInt32Value",
    "google.protobuf.UInt64Value",
    "google.protobuf.FloatValue",
    "google.protobuf.DoubleValue",
];

// Map keys: integral scalars and string only.
const MAP_KEY_TYPES: &[&str] = &[
    "int32", "int64", "uint32", "uint64", "sint32", "sint64",
    "fixed32", "fixed64", "sfixed32", "sfixed64", "string",
];

// Fields named like these usually want an enum.
const ENUM_HINT_NAMES: &[&str] = &["status", "type", "state"];

static PASCAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][A-Za-z0-9]*$").unwrap());
static SNAKE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").unwrap());
static MAP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^map<([\w.]+),([\w.]+)>$").unwrap());

#[derive(Debug, Default)]
pub struct Findings {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub info: Vec<String>,
}

impl Findings {
    fn error(&mut self, msg: String) {
        self.errors.push(msg);
    }
    fn warning(&mut self, msg: String) {
        self.warnings.push(msg);
    }
    fn note(&mut self, msg: String) {
        self.info.push(msg);
    }
}

pub fn check(model: &ProtoModel, findings: &mut Findings) {
    check_syntax(model, findings);
    check_package(model, findings);
    check_imports(model, findings);

    let message_names: HashSet<&str> =
        model.messages.iter().map(|m| m.name.as_str()).collect();
    for message in &model.messages {
        check_message(message, &message_names, findings);
    }
    for service in &model.services {
        check_service(service, &message_names, findings);
    }
}

fn check_syntax(model: &ProtoModel, findings: &mut Findings) {
    match model.syntax.as_deref() {
        None => findings.error("missing syntax declaration (expected syntax = \"proto3\";)".into()),
        Some("proto3") => {}
        Some("proto2") => {
            findings.warning("proto2 syntax detected; consider upgrading to proto3".into())
        }
        Some(other) => findings.error(format!(
            "invalid syntax version \"{other}\"; expected \"proto2\" or \"proto3\""
        )),
    }
}

fn check_package(model: &ProtoModel, findings: &mut Findings) {
    match model.package.as_deref() {
        None => findings.warning("no package declared; a package avoids name clashes".into()),
        Some(pkg) => {
            if names::package_name(pkg).is_none() {
                findings.error(format!(
                    "invalid package name '{pkg}'; expected lowercase dotted segments"
                ));
            } else if !pkg.contains('.') {
                findings.warning(format!(
                    "single-segment package '{pkg}'; consider a reverse-domain name"
                ));
            }
        }
    }
}

fn check_imports(model: &ProtoModel, findings: &mut Findings) {
    for import in &model.imports {
        if import.starts_with("google/protobuf/") {
            findings.note(format!("well-known type import: {import}"));
        } else {
            findings.note(format!("import: {import}"));
        }
    }
}

fn check_message(
    message: &MessageBlock,
    message_names: &HashSet<&str>,
    findings: &mut Findings,
) {
    if !PASCAL_RE.is_match(&message.name) {
        findings.error(format!(
            "message name '{}' is not PascalCase",
            message.name
        ));
    }
    if names::is_reserved(&message.name) {
        findings.error(format!(
            "message name '{}' collides with a reserved word",
            message.name
        ));
    }
    if message.fields.is_empty() {
        findings.warning(format!("message '{}' has no fields", message.name));
    }

    let mut seen_names: HashSet<&str> = HashSet::new();
    let mut seen_numbers: HashSet<u64> = HashSet::new();
    let mut max_number = 0u64;

    for field in &message.fields {
        let ctx = format!("{}.{}", message.name, field.name);

        if !SNAKE_RE.is_match(&field.name) {
            findings.error(format!("field '{ctx}' is not snake_case"));
        }
        if names::is_reserved(&field.name) {
            findings.error(format!("field '{ctx}' collides with a reserved word"));
        }
        if !seen_names.insert(field.name.as_str()) {
            findings.error(format!(
                "duplicate field name '{}' in message '{}'",
                field.name, message.name
            ));
        }

        match field.number {
            None => findings.error(format!("field '{ctx}' has an unparseable field number")),
            Some(n) => {
                if n < 1 || n > FIELD_NUMBER_MAX {
                    findings.error(format!(
                        "field '{ctx}' number {n} is outside [1, {FIELD_NUMBER_MAX}]"
                    ));
                } else if RESERVED_NUMBER_RANGE.contains(&n) {
                    findings.error(format!(
                        "field '{ctx}' number {n} falls in the reserved range 19000-19999"
                    ));
                }
                if !seen_numbers.insert(n) {
                    findings.error(format!(
                        "duplicate field number {n} in message '{}'",
                        message.name
                    ));
                }
                max_number = max_number.max(n);
            }
        }

        check_field_type(&ctx, &field.ty, message_names, findings);

        if ENUM_HINT_NAMES.iter().any(|h| field.name == *h || field.name.ends_with(&format!("_{h}")))
        {
            findings.note(format!(
                "field '{ctx}' looks like a fixed set of values; consider an enum"
            ));
        }
        if field.modifier.as_deref() == Some("repeated")
            && SCALAR_TYPES.contains(&field.ty.as_str())
            && !field.name.ends_with('s')
        {
            findings.note(format!(
                "repeated field '{ctx}' could use a plural name"
            ));
        }
    }

    // Sparse numbering relative to field count suggests manual renumbering.
    let count = message.fields.len() as f64;
    if max_number > 0 && count < 0.7 * max_number as f64 {
        findings.warning(format!(
            "message '{}' has sparse field numbering ({} fields, highest number {})",
            message.name,
            message.fields.len(),
            max_number
        ));
    }
}

fn check_field_type(
    ctx: &str,
    ty: &str,
    message_names: &HashSet<&str>,
    findings: &mut Findings,
) {
    if let Some(caps) = MAP_RE.captures(ty) {
        let key = &caps[1];
        let value = &caps[2];
        if !MAP_KEY_TYPES.contains(&key) {
            findings.error(format!(
                "field '{ctx}' map key type '{key}' must be an integral or string type"
            ));
        }
        if !resolves(value, message_names) {
            findings.error(format!(
                "field '{ctx}' references unknown type '{value}'"
            ));
        }
        return;
    }
    if !resolves(ty, message_names) {
        findings.error(format!("field '{ctx}' references unknown type '{ty}'"));
    }
}

fn resolves(ty: &str, message_names: &HashSet<&str>) -> bool {
    SCALAR_TYPES.contains(&ty)
        || WELL_KNOWN_TYPES.contains(&ty)
        || message_names.contains(ty)
}

fn check_service(
    service: &ServiceBlock,
    message_names: &HashSet<&str>,
    findings: &mut Findings,
) {
    if !PASCAL_RE.is_match(&service.name) {
        findings.error(format!(
            "service name '{}' is not PascalCase",
            service.name
        ));
    }
    if service.rpcs.is_empty() {
        findings.warning(format!("service '{}' has no rpcs", service.name));
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for rpc in &service.rpcs {
        let ctx = format!("{}.{}", service.name, rpc.name);
        if !PASCAL_RE.is_match(&rpc.name) {
            findings.error(format!("rpc name '{ctx}' is not PascalCase"));
        }
        if !seen.insert(rpc.name.as_str()) {
            findings.error(format!(
                "duplicate rpc name '{}' in service '{}'",
                rpc.name, service.name
            ));
        }
        if !message_names.contains(rpc.request.as_str()) {
            findings.error(format!(
                "rpc '{ctx}' request type '{}' is not a defined message",
                rpc.request
            ));
        }
        if !message_names.contains(rpc.response.as_str()) {
            findings.error(format!(
                "rpc '{ctx}' response type '{}' is not a defined message",
                rpc.response
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::scan;

    fn run(text: &str) -> Findings {
        let model = scan::scan(text);
        let mut findings = Findings::default();
        check(&model, &mut findings);
        findings
    }

    #[test]
    fn proto4_yields_exactly_one_error() {
        let f = run("syntax = \"proto4\";");
        assert_eq!(f.errors.len(), 1);
        assert!(f.errors[0].contains("invalid syntax version"));
    }

    #[test]
    fn proto2_is_a_warning_not_an_error() {
        let f = run("syntax = \"proto2\";\npackage a.b;\n");
        assert!(f.errors.is_empty());
        assert!(f.warnings.iter().any(|w| w.contains("proto2")));
    }

    #[test]
    fn missing_syntax_and_package() {
        let f = run("message M { int32 a = 1; }");
        assert!(f.errors.iter().any(|e| e.contains("missing syntax")));
        assert!(f.warnings.iter().any(|w| w.contains("no package")));
    }

    #[test]
    fn field_number_rules() {
        let f = run(
            "syntax = \"proto3\";\npackage a.b;\nmessage M {\n  int32 a = 0;\n  int32 b = 19500;\n  int32 c = 600000000;\n  int32 d = 3;\n  int32 e = 3;\n}",
        );
        assert!(f.errors.iter().any(|e| e.contains("outside [1,")));
        assert!(f.errors.iter().any(|e| e.contains("reserved range")));
        assert!(f.errors.iter().any(|e| e.contains("duplicate field number 3")));
    }

    #[test]
    fn naming_rules() {
        let f = run(
            "syntax = \"proto3\";\npackage a.b;\nmessage lowercase { int32 CamelField = 1; }",
        );
        assert!(f.errors.iter().any(|e| e.contains("not PascalCase")));
        assert!(f.errors.iter().any(|e| e.contains("not snake_case")));
    }

    #[test]
    fn unknown_types_are_errors_and_known_ones_are_not() {
        let f = run(
            "syntax = \"proto3\";\npackage a.b;\nmessage M {\n  Widget w = 1;\n  google.protobuf.Timestamp t = 2;\n  Other o = 3;\n}\nmessage Other { int32 x = 1; }",
        );
        assert_eq!(f.errors.len(), 1);
        assert!(f.errors[0].contains("unknown type 'Widget'"));
    }

    #[test]
    fn map_key_types_are_restricted() {
        let f = run(
            "syntax = \"proto3\";\npackage a.b;\nmessage M {\n  map<string, int32> ok = 1;\n  map<float, int32> bad = 2;\n  map<string, Missing> worse = 3;\n}",
        );
        assert!(f.errors.iter().any(|e| e.contains("map key type 'float'")));
        assert!(f.errors.iter().any(|e| e.contains("unknown type 'Missing'")));
        assert!(!f.errors.iter().any(|e| e.contains("'M.ok'")));
    }

    #[test]
    fn service_rules() {
        let f = run(
            "syntax = \"proto3\";\npackage a.b;\nmessage User { int32 id = 1; }\nservice UserService {\n  rpc GetUser(User) returns (User);\n  rpc GetUser(User) returns (User);\n  rpc Fetch(Ghost) returns (User);\n}\nservice empty_service { }",
        );
        assert!(f.errors.iter().any(|e| e.contains("duplicate rpc name 'GetUser'")));
        assert!(f.errors.iter().any(|e| e.contains("request type 'Ghost'")));
        assert!(f.errors.iter().any(|e| e.contains("service name 'empty_service'")));
        assert!(f.warnings.iter().any(|w| w.contains("has no rpcs")));
    }

    #[test]
    fn best_practice_heuristics_never_error() {
        let f = run(
            "syntax = \"proto3\";\npackage a.b;\nmessage M {\n  string status = 1;\n  repeated int32 count = 2;\n  int32 big = 100;\n}",
        );
        assert!(f.errors.is_empty());
        assert!(f.info.iter().any(|i| i.contains("consider an enum")));
        assert!(f.info.iter().any(|i| i.contains("plural name")));
        assert!(f.warnings.iter().any(|w| w.contains("sparse field numbering")));
    }

    #[test]
    fn imports_are_recorded_as_info() {
        let f = run(
            "syntax = \"proto3\";\npackage a.b;\nimport \"google/protobuf/any.proto\";\nimport \"other/thing.proto\";\n",
        );
        assert!(f.info.iter().any(|i| i.contains("well-known type import")));
        assert!(f.info.iter().any(|i| i == "import: other/thing.proto"));
    }
}
