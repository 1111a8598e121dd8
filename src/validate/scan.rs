//! Regex text scanner for `.proto` source.
//!
//! Deliberately independent of the synthesizer's in-memory model: this
//! module re-derives a disposable [`ProtoModel`] from raw text so the
//! validator also works on hand-written schemas. Message blocks are captured
//! up to their first unmatched `}` (no nested-message support).

use once_cell::sync::Lazy;
use regex::Regex;

static SYNTAX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"syntax\s*=\s*"([^"]*)"\s*;"#).unwrap());

static PACKAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"package\s+([A-Za-z0-9_.]+)\s*;").unwrap());

static IMPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"import\s+(?:public\s+)?"([^"]+)"\s*;"#).unwrap());

static MESSAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bmessage\s+([A-Za-z_]\w*)\s*\{([^}]*)\}").unwrap());

static SERVICE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bservice\s+([A-Za-z_]\w*)\s*\{([^}]*)\}").unwrap());

static FIELD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:(repeated|optional|required)\s+)?([A-Za-z_][\w.]*(?:\s*<\s*[\w.]+\s*,\s*[\w.]+\s*>)?)\s+([A-Za-z_]\w*)\s*=\s*(\d+)\s*;",
    )
    .unwrap()
});

static RPC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"rpc\s+([A-Za-z_]\w*)\s*\(\s*(?:stream\s+)?([\w.]+)\s*\)\s*returns\s*\(\s*(?:stream\s+)?([\w.]+)\s*\)",
    )
    .unwrap()
});

/// Disposable intermediate; built per `validate` call, never retained.
#[derive(Debug, Default)]
pub struct ProtoModel {
    pub syntax: Option<String>,
    pub package: Option<String>,
    pub imports: Vec<String>,
    pub messages: Vec<MessageBlock>,
    pub services: Vec<ServiceBlock>,
}

#[derive(Debug)]
pub struct MessageBlock {
    pub name: String,
    pub fields: Vec<FieldLine>,
}

#[derive(Debug)]
pub struct FieldLine {
    pub modifier: Option<String>,
    pub ty: String,
    pub name: String,
    pub number: Option<u64>,
}

#[derive(Debug)]
pub struct ServiceBlock {
    pub name: String,
    pub rpcs: Vec<RpcLine>,
}

#[derive(Debug)]
pub struct RpcLine {
    pub name: String,
    pub request: String,
    pub response: String,
}

pub fn scan(proto_text: &str) -> ProtoModel {
    let text = strip_line_comments(proto_text);
    let mut model = ProtoModel {
        syntax: SYNTAX_RE.captures(&text).map(|c| c[1].to_string()),
        package: PACKAGE_RE.captures(&text).map(|c| c[1].to_string()),
        imports: IMPORT_RE
            .captures_iter(&text)
            .map(|c| c[1].to_string())
            .collect(),
        ..ProtoModel::default()
    };

    for caps in MESSAGE_RE.captures_iter(&text) {
        let name = caps[1].to_string();
        let body = &caps[2];
        let fields = body.lines().filter_map(parse_field_line).collect();
        model.messages.push(MessageBlock { name, fields });
    }

    for caps in SERVICE_RE.captures_iter(&text) {
        let name = caps[1].to_string();
        let body = &caps[2];
        let rpcs = RPC_RE
            .captures_iter(body)
            .map(|c| RpcLine {
                name: c[1].to_string(),
                request: c[2].to_string(),
                response: c[3].to_string(),
            })
            .collect();
        model.services.push(ServiceBlock { name, rpcs });
    }

    model
}

fn parse_field_line(line: &str) -> Option<FieldLine> {
    let caps = FIELD_RE.captures(line)?;
    // normalize whitespace inside map<...> tokens
    let ty: String = caps[2].split_whitespace().collect::<Vec<_>>().join("");
    let ty = if ty.starts_with("map<") { ty } else { caps[2].to_string() };
    Some(FieldLine {
        modifier: caps.get(1).map(|m| m.as_str().to_string()),
        ty,
        name: caps[3].to_string(),
        number: caps[4].parse::<u64>().ok(),
    })
}

// Comments may contain keyword-shaped text; drop them before matching.
fn strip_line_comments(text: &str) -> String {
    text.lines()
        .map(|line| match line.find("//") {
            Some(i) => &line[..i],
            None => line,
        })
        .collect::<Vec<_>>()
        .join("\n")
}
