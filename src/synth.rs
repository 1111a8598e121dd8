//! JSON → proto3 schema synthesis.
//!
//! Feed raw JSON text in, get `.proto` source text, warnings, and counters
//! back. The whole pipeline is a pure function of its input: every call
//! builds a fresh context (registry, import set, accumulators) and discards
//! it on return, so nothing leaks across calls.

pub mod classify;
pub mod names;
pub mod render;

use std::collections::{BTreeSet, HashSet};

use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::{FieldDef, FieldType, MessageDef, Registry, Scalar, Stats, WellKnown};
use classify::StringClass;
use render::RenderPlan;

// ------------------------------- Policy ---------------------------------- //

pub const MAX_INPUT_BYTES: usize = 10 * 1024 * 1024;
/// Warn past this depth.
pub const SOFT_DEPTH_LIMIT: usize = 20;
/// Give up on structure past this depth and emit `google.protobuf.Any`.
pub const HARD_DEPTH_LIMIT: usize = 50;
/// Array elements sampled for type inference, always the first N in order.
pub const ARRAY_SAMPLE_LIMIT: usize = 10;

// Defense in depth, not the primary security boundary.
const DANGEROUS_PATTERNS: &[&str] = &["<script", "javascript:", "onerror=", "onload=", "<iframe"];

// Ordered: first matching entity wins for root-name inference.
const ENTITY_PATTERNS: &[(&str, &str)] = &[
    ("order", "Order"),
    ("user", "User"),
    ("product", "Product"),
    ("transaction", "Transaction"),
    ("invoice", "Invoice"),
    ("customer", "Customer"),
    ("event", "Event"),
    ("payment", "Payment"),
    ("account", "Account"),
    ("session", "Session"),
];

// ------------------------------- Options ---------------------------------- //

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    Proto2,
    Proto3,
}

impl Syntax {
    pub fn as_str(self) -> &'static str {
        match self {
            Syntax::Proto2 => "proto2",
            Syntax::Proto3 => "proto3",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Options {
    pub package: String,
    pub syntax: Syntax,
    pub root_message: Option<String>,
    pub service_name: Option<String>,
    pub auto_import: bool,
    pub use_optional: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            package: names::DEFAULT_PACKAGE.to_string(),
            syntax: Syntax::Proto3,
            root_message: None,
            service_name: None,
            auto_import: true,
            use_optional: true,
        }
    }
}

// ------------------------------- Results ---------------------------------- //

#[derive(Debug)]
pub struct Conversion {
    pub proto: String,
    pub warnings: Vec<String>,
    pub stats: Stats,
}

/// Structured failure: the message plus whatever warnings and counters had
/// accumulated before the call went bad. Never a raw panic or io error.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ConvertFailure {
    pub message: String,
    pub warnings: Vec<String>,
    pub stats: Stats,
}

#[derive(Debug, Error)]
enum ConvertError {
    #[error("input is empty")]
    Empty,
    #[error("input is {0} bytes; the limit is 10 MB")]
    TooLarge(usize),
    #[error("input contains a potentially dangerous pattern ({0})")]
    Dangerous(&'static str),
    #[error("invalid JSON: {0}")]
    Parse(String),
    #[error("Root cannot be an array; wrap arrays in an object, e.g. {{\"items\": [...]}}")]
    RootArray,
    #[error("root must be a JSON object, got {0}")]
    RootScalar(&'static str),
    #[error("root object has no fields; nothing to convert")]
    EmptyObject,
}

// ------------------------------- Front API -------------------------------- //

pub fn convert(json_text: &str, opts: &Options) -> Result<Conversion, ConvertFailure> {
    let mut ctx = Ctx::new(opts);
    match ctx.run(json_text) {
        Ok(proto) => Ok(Conversion { proto, warnings: ctx.warnings, stats: ctx.stats }),
        Err(err) => Err(ConvertFailure {
            message: err.to_string(),
            warnings: ctx.warnings,
            stats: ctx.stats,
        }),
    }
}

// ------------------------------- Context ---------------------------------- //

/// One synthesis run. Constructed at the top of `convert`, dropped with it.
struct Ctx<'o> {
    opts: &'o Options,
    registry: Registry,
    imports: BTreeSet<&'static str>,
    warnings: Vec<String>,
    stats: Stats,
    in_progress: HashSet<(String, usize)>,
    /// Names claimed by builders still on the stack; descendants must not
    /// probe onto an ancestor's name before its definition is stored.
    reserved_names: HashSet<String>,
    use_optional: bool,
}

struct Inferred {
    ty: FieldType,
    comment: Option<String>,
    optional: bool,
}

impl Inferred {
    fn plain(ty: FieldType) -> Self {
        Self { ty, comment: None, optional: false }
    }

    fn commented(ty: FieldType, comment: &str) -> Self {
        Self { ty, comment: Some(comment.to_string()), optional: false }
    }
}

impl<'o> Ctx<'o> {
    fn new(opts: &'o Options) -> Self {
        // `optional` is a proto3 modifier; inert under proto2
        let use_optional = opts.use_optional && opts.syntax == Syntax::Proto3;
        Self {
            opts,
            registry: Registry::new(),
            imports: BTreeSet::new(),
            warnings: Vec::new(),
            stats: Stats::default(),
            in_progress: HashSet::new(),
            reserved_names: HashSet::new(),
            use_optional,
        }
    }

    fn warn(&mut self, msg: String) {
        self.warnings.push(msg);
    }

    fn run(&mut self, json_text: &str) -> Result<String, ConvertError> {
        check_input(json_text)?;
        let value = parse_json(json_text)?;
        let root = match value {
            Value::Object(map) if map.is_empty() => return Err(ConvertError::EmptyObject),
            Value::Object(map) => map,
            Value::Array(_) => return Err(ConvertError::RootArray),
            other => return Err(ConvertError::RootScalar(kind_name(&other))),
        };

        let package = self.resolve_package();
        let requested_root = self.resolve_root_name(&root);
        let root_name = self.build_message(&requested_root, &root, 0)?;
        let service_name = self.resolve_service_name(&root_name);

        Ok(render::render(&RenderPlan {
            syntax: self.opts.syntax,
            package: &package,
            imports: &self.imports,
            auto_import: self.opts.auto_import,
            registry: &self.registry,
            root_message: &root_name,
            service_name: service_name.as_deref(),
        }))
    }

    fn resolve_package(&mut self) -> String {
        match names::package_name(&self.opts.package) {
            Some(p) => p,
            None => {
                self.warn(format!(
                    "invalid package name '{}'; using default '{}'",
                    self.opts.package,
                    names::DEFAULT_PACKAGE
                ));
                names::DEFAULT_PACKAGE.to_string()
            }
        }
    }

    fn resolve_root_name(&mut self, root: &Map<String, Value>) -> String {
        if let Some(requested) = &self.opts.root_message {
            match names::message_name(requested) {
                Some(name) => return name,
                None => self.warn(format!(
                    "invalid root message name '{requested}'; inferring one from the input"
                )),
            }
        }
        infer_root_name(root)
    }

    fn resolve_service_name(&mut self, root_name: &str) -> Option<String> {
        let requested = self.opts.service_name.as_ref()?;
        match names::message_name(requested) {
            Some(name) => Some(name),
            None => {
                let fallback = format!("{root_name}Service");
                self.warn(format!(
                    "invalid service name '{requested}'; using '{fallback}'"
                ));
                Some(fallback)
            }
        }
    }

    /// Registers the WKT's import and returns its field type.
    fn well_known(&mut self, wk: WellKnown) -> FieldType {
        self.imports.insert(wk.import_path());
        self.stats.well_known_types_used += 1;
        FieldType::WellKnown(wk)
    }

    // --------------------------- Recursion core --------------------------- //

    /// Build (or short-circuit) the message for `map` and return the name it
    /// landed under in the registry.
    fn build_message(
        &mut self,
        desired: &str,
        map: &Map<String, Value>,
        depth: usize,
    ) -> Result<String, ConvertError> {
        self.stats.nested_levels = self.stats.nested_levels.max(depth);

        // Bounds direct same-depth re-entry; JSON itself cannot cycle.
        let guard = (desired.to_string(), depth);
        if self.in_progress.contains(&guard) {
            self.warn(format!(
                "recursive definition of '{desired}' at depth {depth}; reference left unresolved"
            ));
            return Ok(desired.to_string());
        }

        if depth > SOFT_DEPTH_LIMIT {
            self.warn(format!(
                "deep nesting at '{desired}' (depth {depth}); consider flattening the structure"
            ));
        }

        let name = self.registry.unique_name(desired, &self.reserved_names);
        self.reserved_names.insert(name.clone());
        self.in_progress.insert(guard.clone());

        let mut fields = Vec::with_capacity(map.len());
        let mut used_names: HashSet<String> = HashSet::new();
        for (i, (key, value)) in map.iter().enumerate() {
            let number = (i + 1) as u64;
            let sanitized = names::field_name(key);
            if sanitized.renamed_reserved {
                self.warn(format!(
                    "field '{key}' collides with a reserved word; renamed to '{}'",
                    sanitized.name
                ));
            }
            let mut field_name = sanitized.name;
            if !used_names.insert(field_name.clone()) {
                let mut n = 2usize;
                let renamed = loop {
                    let candidate = format!("{field_name}_{n}");
                    if used_names.insert(candidate.clone()) {
                        break candidate;
                    }
                    n += 1;
                };
                self.warn(format!(
                    "duplicate field name '{field_name}' in message '{name}'; renamed to '{renamed}'"
                ));
                field_name = renamed;
            }

            let inferred = self.infer_type(value, key, depth, false)?;
            self.stats.fields_generated += 1;
            fields.push(FieldDef {
                name: field_name,
                ty: inferred.ty,
                number,
                comment: inferred.comment,
                optional: inferred.optional && self.use_optional,
                original_key: key.clone(),
            });
        }

        self.registry.insert(MessageDef { name: name.clone(), fields, depth });
        self.stats.messages_generated += 1;
        self.in_progress.remove(&guard);
        Ok(name)
    }

    fn infer_type(
        &mut self,
        value: &Value,
        key: &str,
        depth: usize,
        in_array: bool,
    ) -> Result<Inferred, ConvertError> {
        Ok(match value {
            Value::Null => {
                if self.use_optional {
                    // `repeated` fields never carry the `optional` modifier,
                    // so a null array element is just a plain string slot.
                    if in_array {
                        Inferred::plain(FieldType::Scalar(Scalar::String))
                    } else {
                        self.stats.optional_fields_detected += 1;
                        Inferred {
                            ty: FieldType::Scalar(Scalar::String),
                            comment: Some("Null value detected".to_string()),
                            optional: true,
                        }
                    }
                } else {
                    Inferred::plain(self.well_known(WellKnown::NullValue))
                }
            }
            Value::Bool(_) => Inferred::plain(FieldType::Scalar(Scalar::Bool)),
            Value::Number(n) => {
                let (scalar, comment) = classify::classify_number(n);
                match comment {
                    Some(c) => Inferred::commented(FieldType::Scalar(scalar), c),
                    None => Inferred::plain(FieldType::Scalar(scalar)),
                }
            }
            Value::String(s) => self.infer_string(s),
            Value::Array(items) => self.infer_array(items, key, depth)?,
            Value::Object(obj) => {
                if depth + 1 > HARD_DEPTH_LIMIT {
                    self.warn(format!(
                        "nesting deeper than {HARD_DEPTH_LIMIT} at '{key}'; falling back to google.protobuf.Any"
                    ));
                    Inferred::plain(self.well_known(WellKnown::Any))
                } else {
                    let candidate = match names::message_name(key) {
                        Some(c) => c,
                        None => {
                            self.warn(format!(
                                "cannot derive a message name from key '{key}'; using 'NestedMessage'"
                            ));
                            "NestedMessage".to_string()
                        }
                    };
                    let name = self.build_message(&candidate, obj, depth + 1)?;
                    Inferred::plain(FieldType::Message(name))
                }
            }
        })
    }

    fn infer_string(&mut self, s: &str) -> Inferred {
        match classify::classify_string(s) {
            StringClass::Timestamp => {
                let ty = self.well_known(WellKnown::Timestamp);
                Inferred::commented(ty, "ISO 8601 timestamp")
            }
            StringClass::Duration => {
                let ty = self.well_known(WellKnown::Duration);
                Inferred::commented(ty, "Duration")
            }
            StringClass::Uuid => Inferred::commented(FieldType::Scalar(Scalar::String), "UUID"),
            StringClass::Url => Inferred::commented(FieldType::Scalar(Scalar::String), "URL"),
            StringClass::Email => {
                Inferred::commented(FieldType::Scalar(Scalar::String), "Email address")
            }
            StringClass::LargeText => {
                Inferred::commented(FieldType::Scalar(Scalar::Bytes), "Large text content")
            }
            StringClass::Plain => Inferred::plain(FieldType::Scalar(Scalar::String)),
        }
    }

    fn infer_array(
        &mut self,
        items: &[Value],
        key: &str,
        depth: usize,
    ) -> Result<Inferred, ConvertError> {
        if items.is_empty() {
            self.warn(format!(
                "field '{key}': empty array; defaulting to 'repeated string', verify the element type"
            ));
            return Ok(Inferred::plain(FieldType::Repeated(Box::new(FieldType::Scalar(
                Scalar::String,
            )))));
        }

        // proto3 has no repeated-of-repeated; a nested array would need a
        // wrapper message, so degrade the same way mixed arrays do.
        if items.iter().take(ARRAY_SAMPLE_LIMIT).any(Value::is_array) {
            self.warn(format!(
                "field '{key}': nested arrays are not representable; falling back to 'repeated google.protobuf.Any'"
            ));
            let any = self.well_known(WellKnown::Any);
            return Ok(Inferred::plain(FieldType::Repeated(Box::new(any))));
        }

        let mut distinct: Vec<String> = Vec::new();
        let mut element: Option<FieldType> = None;
        // Sibling object elements share the message built from the first one;
        // re-running build_message per element would probe fresh names and
        // falsely report the array as mixed.
        let mut object_ty: Option<FieldType> = None;

        for item in items.iter().take(ARRAY_SAMPLE_LIMIT) {
            let ty = if item.is_object() {
                match &object_ty {
                    Some(t) => t.clone(),
                    None => {
                        let t = self.infer_type(item, key, depth, true)?.ty;
                        object_ty = Some(t.clone());
                        t
                    }
                }
            } else {
                self.infer_type(item, key, depth, true)?.ty
            };
            let rendered = ty.render();
            if !distinct.contains(&rendered) {
                distinct.push(rendered);
            }
            if element.is_none() {
                element = Some(ty);
            }
        }

        if distinct.len() > 1 {
            self.warn(format!(
                "field '{key}': mixed array element types ({}); falling back to 'repeated google.protobuf.Any'",
                distinct.join(", ")
            ));
            let any = self.well_known(WellKnown::Any);
            return Ok(Inferred::plain(FieldType::Repeated(Box::new(any))));
        }

        let element = element.unwrap_or(FieldType::Scalar(Scalar::String));
        Ok(Inferred::plain(FieldType::Repeated(Box::new(element))))
    }
}

// ------------------------------- Helpers ---------------------------------- //

fn check_input(text: &str) -> Result<(), ConvertError> {
    if text.trim().is_empty() {
        return Err(ConvertError::Empty);
    }
    if text.len() > MAX_INPUT_BYTES {
        return Err(ConvertError::TooLarge(text.len()));
    }
    let lowered = text.to_ascii_lowercase();
    for pat in DANGEROUS_PATTERNS {
        if lowered.contains(pat) {
            return Err(ConvertError::Dangerous(pat));
        }
    }
    Ok(())
}

fn parse_json(text: &str) -> Result<Value, ConvertError> {
    match serde_json::from_str::<Value>(text) {
        Ok(v) => Ok(v),
        Err(err) => {
            let offset = offset_of(text, err.line(), err.column());
            let context = context_window(text, offset);
            Err(ConvertError::Parse(format!("{err} near `{context}`")))
        }
    }
}

// serde_json reports 1-based line/column; fold back to a byte offset.
fn offset_of(text: &str, line: usize, column: usize) -> usize {
    let mut remaining = line.saturating_sub(1);
    let mut line_start = 0;
    for (i, c) in text.char_indices() {
        if remaining == 0 {
            break;
        }
        if c == '\n' {
            remaining -= 1;
            line_start = i + 1;
        }
    }
    (line_start + column.saturating_sub(1)).min(text.len())
}

/// ~40 characters centered on the failure offset, newlines flattened.
fn context_window(text: &str, offset: usize) -> String {
    const HALF: usize = 20;
    let raw_start = offset.saturating_sub(HALF);
    let start = (0..=raw_start)
        .rev()
        .find(|&i| text.is_char_boundary(i))
        .unwrap_or(0);
    let raw_end = (offset + HALF).min(text.len());
    let end = (raw_end..=text.len())
        .find(|&i| text.is_char_boundary(i))
        .unwrap_or(text.len());
    text[start..end].replace(['\n', '\r'], " ")
}

fn kind_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn infer_root_name(root: &Map<String, Value>) -> String {
    for (stem, entity) in ENTITY_PATTERNS {
        for key in root.keys() {
            let folded: String = key
                .chars()
                .filter(|c| *c != '_')
                .collect::<String>()
                .to_ascii_lowercase();
            if folded == *stem
                || folded == format!("{stem}id")
                || folded == format!("{stem}number")
                || folded == format!("{stem}name")
            {
                return (*entity).to_string();
            }
        }
    }
    if let Some(first) = root.keys().next() {
        for suffix in ["Id", "Name", "_id", "_name"] {
            if let Some(stem) = first.strip_suffix(suffix) {
                if let Some(name) = names::message_name(stem) {
                    return name;
                }
            }
        }
    }
    "RootMessage".to_string()
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    fn convert_default(json: &str) -> Conversion {
        convert(json, &Options::default()).expect("conversion should succeed")
    }

    #[test]
    fn user_scenario_end_to_end() {
        let out = convert_default(
            r#"{"userId": 1, "email": "a@b.com", "createdAt": "2024-01-01T00:00:00Z", "tags": ["x","y"]}"#,
        );
        assert!(out.proto.contains("message User {"));
        assert!(out.proto.contains("  int32 user_id = 1;\n"));
        assert!(out.proto.contains("  string email = 2; // Email address\n"));
        assert!(out
            .proto
            .contains("  google.protobuf.Timestamp created_at = 3; // ISO 8601 timestamp\n"));
        assert!(out.proto.contains("  repeated string tags = 4;\n"));
        assert!(out.proto.contains("import \"google/protobuf/timestamp.proto\";"));
        assert_eq!(out.stats.messages_generated, 1);
        assert_eq!(out.stats.fields_generated, 4);
    }

    #[test]
    fn output_is_idempotent() {
        let json = r#"{"orderId": 7, "items": [{"sku": "a", "qty": 2}], "note": null}"#;
        let a = convert_default(json);
        let b = convert_default(json);
        assert_eq!(a.proto, b.proto);
        assert_eq!(a.warnings, b.warnings);
    }

    #[test]
    fn field_numbers_are_gapless_in_key_order() {
        let out = convert_default(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#);
        assert!(out.proto.contains("  int32 zeta = 1;\n"));
        assert!(out.proto.contains("  int32 alpha = 2;\n"));
        assert!(out.proto.contains("  int32 mid = 3;\n"));
    }

    #[test]
    fn duplicate_nested_names_probe_suffixes() {
        let out = convert_default(
            r#"{"profile": {"a": 1}, "wrapper": {"profile": {"b": 2}}}"#,
        );
        assert!(out.proto.contains("message Profile {"));
        assert!(out.proto.contains("message Profile1 {"));
    }

    #[test]
    fn ancestor_shadowed_names_probe_instead_of_collapsing() {
        let out = convert_default(
            r#"{"config": {"retries": 1, "config": {"timeout_label": "x"}}}"#,
        );
        assert!(out.proto.contains("message Config {"));
        assert!(out.proto.contains("message Config1 {"));
        assert!(out.proto.contains("  string timeout_label = 1;\n"));
        assert!(out.proto.contains("  Config1 config = 2;\n"));
        assert_eq!(out.stats.messages_generated, 3);
        assert_eq!(out.proto.matches("\nmessage ").count(), 3);
    }

    #[test]
    fn nested_arrays_fall_back_to_any() {
        let out = convert_default(r#"{"matrix": [[1,2],[3,4]]}"#);
        assert!(out.proto.contains("  repeated google.protobuf.Any matrix = 1;\n"));
        assert!(!out.proto.contains("repeated repeated"));
        assert!(out.warnings.iter().any(|w| w.contains("nested arrays")));
    }

    #[test]
    fn null_array_elements_do_not_count_as_optional_fields() {
        let out = convert_default(r#"{"xs": [null, null, null]}"#);
        assert!(out.proto.contains("  repeated string xs = 1;\n"));
        assert!(!out.proto.contains("optional"));
        assert_eq!(out.stats.optional_fields_detected, 0);
    }

    #[test]
    fn root_array_is_rejected() {
        let err = convert("[1,2,3]", &Options::default()).unwrap_err();
        assert!(err.message.starts_with("Root cannot be an array"));
    }

    #[test]
    fn scalar_root_is_rejected() {
        let err = convert("42", &Options::default()).unwrap_err();
        assert!(err.message.contains("got a number"));
    }

    #[test]
    fn empty_and_oversized_and_dangerous_inputs_fail_fast() {
        assert!(convert("   ", &Options::default()).unwrap_err().message.contains("empty"));
        let big = format!("{{\"a\": \"{}\"}}", "x".repeat(MAX_INPUT_BYTES));
        assert!(convert(&big, &Options::default()).unwrap_err().message.contains("limit"));
        let err = convert(r#"{"x": "<script>alert(1)</script>"}"#, &Options::default())
            .unwrap_err();
        assert!(err.message.contains("dangerous"));
    }

    #[test]
    fn malformed_json_reports_a_context_window() {
        let err = convert(r#"{"a": 1, "b": }"#, &Options::default()).unwrap_err();
        assert!(err.message.contains("invalid JSON"));
        assert!(err.message.contains("near `"));
        assert!(err.message.contains(r#""b": "#));
    }

    #[test]
    fn empty_object_root_is_rejected() {
        let err = convert("{}", &Options::default()).unwrap_err();
        assert!(err.message.contains("no fields"));
    }

    #[test]
    fn reserved_keyword_key_is_renamed_with_warning() {
        let out = convert_default(r#"{"message": "hi"}"#);
        assert!(out.proto.contains("  string message_field = 1;\n"));
        assert!(out.warnings.iter().any(|w| w.contains("reserved word")));
    }

    #[test]
    fn heterogeneous_array_falls_back_to_any() {
        let out = convert_default(r#"{"data": [1, "x"]}"#);
        assert!(out.proto.contains("  repeated google.protobuf.Any data = 1;\n"));
        assert!(out.proto.contains("import \"google/protobuf/any.proto\";"));
        assert!(out.warnings.iter().any(|w| w.contains("mixed array")));
    }

    #[test]
    fn homogeneous_and_empty_arrays() {
        let out = convert_default(r#"{"tags": ["a","b","c"], "empty": []}"#);
        assert!(out.proto.contains("  repeated string tags = 1;\n"));
        assert!(out.proto.contains("  repeated string empty = 2;\n"));
        assert!(out.warnings.iter().any(|w| w.contains("empty array")));
    }

    #[test]
    fn object_arrays_reuse_one_message() {
        let out = convert_default(r#"{"items": [{"sku": "a"}, {"sku": "b"}]}"#);
        assert!(out.proto.contains("  repeated Items items = 1;\n"));
        assert!(out.proto.contains("message Items {"));
        assert!(!out.proto.contains("message Items1 {"));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn null_fields_under_optional_mode() {
        let out = convert_default(r#"{"userId": 1, "nickname": null}"#);
        assert!(out
            .proto
            .contains("  optional string nickname = 2; // Null value detected\n"));
        assert_eq!(out.stats.optional_fields_detected, 1);
    }

    #[test]
    fn null_fields_without_optional_mode() {
        let opts = Options { use_optional: false, ..Options::default() };
        let out = convert(r#"{"nickname": null}"#, &opts).unwrap();
        assert!(out.proto.contains("  google.protobuf.NullValue nickname = 1;\n"));
        assert!(out.proto.contains("import \"google/protobuf/struct.proto\";"));
    }

    #[test]
    fn root_name_inference_table() {
        let out = convert_default(r#"{"orderId": 1}"#);
        assert!(out.proto.contains("message Order {"));
        let out = convert_default(r#"{"invoice_number": "A-1"}"#);
        assert!(out.proto.contains("message Invoice {"));
        let out = convert_default(r#"{"widgetId": 1}"#);
        assert!(out.proto.contains("message Widget {"));
        let out = convert_default(r#"{"foo": 1}"#);
        assert!(out.proto.contains("message RootMessage {"));
    }

    #[test]
    fn invalid_package_falls_back_to_default_with_warning() {
        let opts = Options { package: "Bad.Package".into(), ..Options::default() };
        let out = convert(r#"{"a": 1}"#, &opts).unwrap();
        assert!(out.proto.contains("package com.example.api;"));
        assert!(out.warnings.iter().any(|w| w.contains("invalid package name")));
    }

    #[test]
    fn service_stub_is_emitted_and_sanitized() {
        let opts = Options {
            service_name: Some("user service".into()),
            ..Options::default()
        };
        let out = convert(r#"{"userId": 1}"#, &opts).unwrap();
        assert!(out.proto.contains("service UserService {"));
        assert!(out.proto.contains("rpc CreateUser(User) returns (User);"));
    }

    #[test]
    fn proto2_disables_the_optional_modifier() {
        let opts = Options { syntax: Syntax::Proto2, ..Options::default() };
        let out = convert(r#"{"nickname": null}"#, &opts).unwrap();
        assert!(out.proto.contains("syntax = \"proto2\";"));
        assert!(!out.proto.contains("optional string"));
        assert!(out.proto.contains("google.protobuf.NullValue nickname = 1;"));
    }

    #[test]
    fn deep_nesting_warns_then_degrades_to_any() {
        // 25 levels: past the soft limit, below the hard one
        let mut json = String::from("{\"v\": 1}");
        for _ in 0..25 {
            json = format!("{{\"inner\": {json}}}");
        }
        let out = convert_default(&json);
        assert!(out.warnings.iter().any(|w| w.contains("deep nesting")));

        // 60 levels: structural inference must stop at the hard cutoff
        let mut json = String::from("{\"v\": 1}");
        for _ in 0..60 {
            json = format!("{{\"inner\": {json}}}");
        }
        let out = convert_default(&json);
        assert!(out.proto.contains("  google.protobuf.Any inner = 1;\n"));
        assert!(out.proto.contains("import \"google/protobuf/any.proto\";"));
        assert!(out.warnings.iter().any(|w| w.contains("falling back to google.protobuf.Any")));
        // every built message must survive into the output
        assert_eq!(out.proto.matches("\nmessage ").count(), out.stats.messages_generated);
    }

    #[test]
    fn mixed_scalar_array_names_both_types_in_warning() {
        let out = convert_default(r#"{"data": [true, 3]}"#);
        let warn = out
            .warnings
            .iter()
            .find(|w| w.contains("mixed array"))
            .expect("mixed-array warning");
        assert!(warn.contains("bool"));
        assert!(warn.contains("int32"));
    }
}
