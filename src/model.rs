// Strongly-typed schema model shared by the synthesizer and renderer.
// No serde_json::Value here.

use std::collections::HashSet;

use indexmap::IndexMap;

/// Highest field number allowed on the wire.
pub const FIELD_NUMBER_MAX: u64 = 536_870_911;
/// Range reserved by the protobuf implementation itself.
pub const RESERVED_NUMBER_RANGE: std::ops::RangeInclusive<u64> = 19000..=19999;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar {
    Bool,
    Int32,
    Int64,
    Uint32,
    Float,
    Double,
    String,
    Bytes,
}

impl Scalar {
    pub fn as_proto(self) -> &'static str {
        match self {
            Scalar::Bool => "bool",
            Scalar::Int32 => "int32",
            Scalar::Int64 => "int64",
            Scalar::Uint32 => "uint32",
            Scalar::Float => "float",
            Scalar::Double => "double",
            Scalar::String => "string",
            Scalar::Bytes => "bytes",
        }
    }
}

/// Well-known protobuf types we may emit, each tied to its import path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WellKnown {
    Timestamp,
    Duration,
    Any,
    NullValue,
}

impl WellKnown {
    pub fn qualified_name(self) -> &'static str {
        match self {
            WellKnown::Timestamp => "google.protobuf.Timestamp",
            WellKnown::Duration => "google.protobuf.Duration",
            WellKnown::Any => "google.protobuf.Any",
            WellKnown::NullValue => "google.protobuf.NullValue",
        }
    }

    pub fn import_path(self) -> &'static str {
        match self {
            WellKnown::Timestamp => "google/protobuf/timestamp.proto",
            WellKnown::Duration => "google/protobuf/duration.proto",
            WellKnown::Any => "google/protobuf/any.proto",
            WellKnown::NullValue => "google/protobuf/struct.proto",
        }
    }
}

/// Closed field-type union. `Repeated` wraps exactly one level; rendering is
/// deferred to [`FieldType::render`] so nothing in the pipeline concatenates
/// type strings ad hoc.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Scalar(Scalar),
    WellKnown(WellKnown),
    /// Reference to a message held by the registry; referential, not nested.
    Message(String),
    Repeated(Box<FieldType>),
}

impl FieldType {
    pub fn render(&self) -> String {
        match self {
            FieldType::Scalar(s) => s.as_proto().to_string(),
            FieldType::WellKnown(w) => w.qualified_name().to_string(),
            FieldType::Message(name) => name.clone(),
            FieldType::Repeated(inner) => format!("repeated {}", inner.render()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: String,
    pub ty: FieldType,
    pub number: u64,
    pub comment: Option<String>,
    pub optional: bool,
    /// JSON key this field was derived from, before sanitization.
    pub original_key: String,
}

#[derive(Debug, Clone)]
pub struct MessageDef {
    pub name: String,
    pub fields: Vec<FieldDef>,
    pub depth: usize,
}

/// Insertion-ordered message store for one synthesis run. Created fresh per
/// `convert` call and discarded with it; nothing survives across calls.
#[derive(Debug, Default)]
pub struct Registry {
    messages: IndexMap<String, MessageDef>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a unique name by probing `Name`, `Name1`, `Name2`, …
    /// `reserved` holds names claimed by in-flight builders whose definitions
    /// have not landed yet; they must be just as unavailable as stored ones.
    pub fn unique_name(&self, base: &str, reserved: &HashSet<String>) -> String {
        let taken = |name: &str| self.messages.contains_key(name) || reserved.contains(name);
        if !taken(base) {
            return base.to_string();
        }
        let mut i = 1usize;
        loop {
            let candidate = format!("{base}{i}");
            if !taken(&candidate) {
                return candidate;
            }
            i += 1;
        }
    }

    pub fn insert(&mut self, def: MessageDef) {
        self.messages.insert(def.name.clone(), def);
    }

    pub fn iter(&self) -> impl Iterator<Item = &MessageDef> {
        self.messages.values()
    }
}

/// Per-run counters, returned alongside the rendered schema.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct Stats {
    pub messages_generated: usize,
    pub fields_generated: usize,
    pub nested_levels: usize,
    pub optional_fields_detected: usize,
    pub well_known_types_used: usize,
}
