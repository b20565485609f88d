//! Parsed template representation
//!
//! A template is a flat list of nodes; iteration blocks nest their bodies.
//! Markers keep their raw source slice because an unresolvable marker must
//! come out of rendering exactly as it went in.

/// One node of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Literal text.
    Text(String),
    /// `{{ path | filter }}`
    Marker(Marker),
    /// `{{#each path as |var|}}...{{/each}}`
    Each(EachBlock),
}

/// An interpolation marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// The full source slice, braces included.
    pub raw: String,
    /// Trimmed interior (used in diagnostics).
    pub key: String,
    /// Dotted lookup path (first `|`-separated token).
    pub path: String,
    /// Filter names, applied left to right.
    pub filters: Vec<String>,
}

impl Marker {
    /// Split a marker interior into path expression and filters. Tokens are
    /// trimmed and empty ones dropped, so `{{ a.b | json }}` and
    /// `{{a.b|json|}}` parse the same.
    pub fn from_inner(raw: &str, inner: &str) -> Self {
        let mut parts = inner.split('|').map(str::trim).filter(|s| !s.is_empty());
        let path = parts.next().unwrap_or_default().to_string();
        let filters = parts.map(str::to_string).collect();
        Self {
            raw: raw.to_string(),
            key: inner.trim().to_string(),
            path,
            filters,
        }
    }
}

/// An iteration block with its parsed body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EachBlock {
    /// Dotted path to the sequence being iterated.
    pub path: String,
    /// Loop variable bound per element.
    pub var: String,
    pub body: Vec<Node>,
}
