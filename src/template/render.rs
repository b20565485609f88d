//! Expansion: blocks, substitution, cleanup
//!
//! Rendering runs in the same order as the original pipeline: iteration
//! blocks expand first (outermost to innermost, each element rendered in a
//! scope where the loop variable shadows the outer context), then one
//! substitution pass over the whole result resolves the remaining markers
//! against the root context, and a final cleanup strips the trailing
//! separators that per-element expansion of serialized lists leaves behind.
//!
//! Nothing in here aborts. Markers that don't resolve stay in the output
//! verbatim and every problem is reported as a [`Warning`].

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use super::ast::{EachBlock, Marker, Node};
use super::diag::Warning;
use super::lexer::{Token, lex};
use super::parser;
use super::resolve::resolve_in_scope;

/// Loop-variable names that are allowed to be unresolved outside their
/// block without a warning.
const QUIET_VARS: &[&str] = &["item", "feature", "section"];

/// Path prefixes populated by the build driver after template authoring;
/// markers under them never warn.
const QUIET_PREFIXES: &[&str] = &["seo.structured_data."];

/// A parsed template, reusable across contexts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    /// Compile template source. Total: malformed constructs parse as
    /// literal text, so there is no error case.
    pub fn parse(source: &str) -> Self {
        Self {
            nodes: parser::parse(source),
        }
    }

    /// Render with the default [`Engine`].
    pub fn render(&self, context: &Value) -> Rendered {
        Engine::default().render(self, context)
    }
}

/// Expanded text plus everything the engine had to warn about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    pub warnings: Vec<Warning>,
}

/// The expansion engine. Holds the warning-suppression lists; rendering
/// itself is stateless, so one engine can serve any number of calls.
#[derive(Debug, Clone)]
pub struct Engine {
    quiet_vars: Vec<String>,
    quiet_prefixes: Vec<String>,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            quiet_vars: QUIET_VARS.iter().map(|s| s.to_string()).collect(),
            quiet_prefixes: QUIET_PREFIXES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Engine {
    /// An engine with custom suppression lists. `quiet_vars` match the full
    /// path expression exactly; `quiet_prefixes` match by prefix.
    pub fn new(quiet_vars: Vec<String>, quiet_prefixes: Vec<String>) -> Self {
        Self {
            quiet_vars,
            quiet_prefixes,
        }
    }

    /// Parse and render in one call.
    pub fn expand(&self, source: &str, context: &Value) -> Rendered {
        self.render(&Template::parse(source), context)
    }

    pub fn render(&self, template: &Template, context: &Value) -> Rendered {
        let mut warnings = Vec::new();

        // Pass 1: iteration blocks. Top-level markers are left for pass 2.
        let mut text = String::new();
        for node in &template.nodes {
            match node {
                Node::Text(t) => text.push_str(t),
                Node::Marker(marker) => text.push_str(&marker.raw),
                Node::Each(block) => {
                    text.push_str(&self.expand_block(block, context, &mut warnings));
                }
            }
        }

        // Pass 2: remaining markers against the root context. This also
        // catches markers preserved unresolved inside blocks.
        let text = self.substitute_text(&text, context, &mut warnings);

        // Final safety net for separators the per-block cleanup missed.
        let text = strip_trailing_separators(&text);
        Rendered { text, warnings }
    }

    fn expand_block(
        &self,
        block: &EachBlock,
        context: &Value,
        warnings: &mut Vec<Warning>,
    ) -> String {
        let items = match resolve_in_scope(context, &block.path) {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => {
                if !block.path.contains('.') {
                    warnings.push(Warning::SequenceNotFound {
                        path: block.path.clone(),
                    });
                }
                return String::new();
            }
            Some(other) => {
                warnings.push(Warning::NotASequence {
                    path: block.path.clone(),
                    found: type_name(other),
                });
                return String::new();
            }
        };

        let mut out = String::new();
        for element in items {
            let scope = merge_scope(context, &block.var, element);
            out.push_str(&self.render_body(&block.body, &scope, warnings));
        }
        strip_trailing_separators(&out)
    }

    /// Render a block body in an element scope: nested blocks expand and
    /// markers substitute, both seeing the loop variable.
    fn render_body(&self, nodes: &[Node], scope: &Value, warnings: &mut Vec<Warning>) -> String {
        let mut out = String::new();
        for node in nodes {
            match node {
                Node::Text(t) => out.push_str(t),
                Node::Marker(marker) => {
                    out.push_str(&self.substitute_marker(marker, scope, warnings));
                }
                Node::Each(block) => out.push_str(&self.expand_block(block, scope, warnings)),
            }
        }
        out
    }

    /// The final substitution pass works on text, not the AST, because
    /// block expansion may have emitted preserved markers.
    fn substitute_text(&self, text: &str, context: &Value, warnings: &mut Vec<Warning>) -> String {
        let mut out = String::new();
        for token in lex(text) {
            match token {
                Token::Text(t) => out.push_str(t),
                Token::Marker { raw, inner } => {
                    let marker = Marker::from_inner(raw, inner);
                    out.push_str(&self.substitute_marker(&marker, context, warnings));
                }
                // reserved tags stay untouched by substitution
                Token::EachOpen { raw, .. } | Token::EachClose { raw } => out.push_str(raw),
            }
        }
        out
    }

    fn substitute_marker(
        &self,
        marker: &Marker,
        context: &Value,
        warnings: &mut Vec<Warning>,
    ) -> String {
        let Some(value) = resolve_in_scope(context, &marker.path) else {
            if !self.is_quiet(&marker.path) {
                warnings.push(Warning::UnresolvedPath {
                    path: marker.path.clone(),
                });
            }
            return marker.raw.clone();
        };

        let mut value = value.clone();
        for filter in &marker.filters {
            match filter.as_str() {
                // canonical compact JSON of the resolved value
                "json" => value = Value::String(value.to_string()),
                unknown => warnings.push(Warning::UnknownFilter {
                    name: unknown.to_string(),
                    marker: marker.key.clone(),
                }),
            }
        }
        display_value(&value)
    }

    fn is_quiet(&self, path: &str) -> bool {
        self.quiet_vars.iter().any(|v| v == path)
            || self.quiet_prefixes.iter().any(|p| path.starts_with(p.as_str()))
    }
}

/// Shallow-merge a `{var: element}` binding over the outer context. The
/// element wins on collision, which is what gives loop variables shadowing
/// semantics. The outer context is never mutated.
fn merge_scope(context: &Value, var: &str, element: &Value) -> Value {
    let mut scope = context.as_object().cloned().unwrap_or_default();
    scope.insert(var.to_string(), element.clone());
    Value::Object(scope)
}

/// Textual form of a resolved value when substituted without `| json`.
fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                // sequences render as comma-joined elements, nulls blank
                Value::Null => String::new(),
                other => display_value(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "object",
    }
}

fn multiline_separator_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r",\s*\n[\s\n]*\]").unwrap())
}

fn inline_separator_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r",\s*\]").unwrap())
}

/// Strip a dangling comma before a closing `]`. Per-element expansion of
/// serialized list content emits one separator per element, so the last one
/// must go before the list closes. The across-line-break form re-indents to
/// match the JSON-LD templates; the same-line form is the fallback.
pub(crate) fn strip_trailing_separators(text: &str) -> String {
    let text = multiline_separator_re().replace_all(text, "\n            ]");
    inline_separator_re().replace_all(&text, "]").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn expand(source: &str, context: &Value) -> Rendered {
        Engine::default().expand(source, context)
    }

    #[test]
    fn template_without_constructs_is_identity() {
        let ctx = json!({"a": 1});
        let html = "<html>\n  <body>no markers here</body>\n</html>";
        let out = expand(html, &ctx);
        assert_eq!(out.text, html);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn scalar_marker_substitution() {
        let ctx = json!({"a": {"b": {"c": "deep"}}, "n": 7, "t": true});
        assert_eq!(expand("{{a.b.c}}", &ctx).text, "deep");
        assert_eq!(expand("n={{ n }} t={{ t }}", &ctx).text, "n=7 t=true");
    }

    #[test]
    fn json_filter_serializes_canonically() {
        let ctx = json!({"obj": {"k": [1, 2]}, "s": "hi"});
        assert_eq!(expand("{{obj | json}}", &ctx).text, r#"{"k":[1,2]}"#);
        // strings come out quoted, exactly as serialized
        assert_eq!(expand("{{s | json}}", &ctx).text, r#""hi""#);
    }

    #[test]
    fn unknown_filter_is_a_noop_with_warning() {
        let ctx = json!({"title": "Hello"});
        let out = expand("{{title | upperize}}", &ctx);
        assert_eq!(out.text, "Hello");
        assert_eq!(
            out.warnings,
            vec![Warning::UnknownFilter {
                name: "upperize".to_string(),
                marker: "title | upperize".to_string(),
            }]
        );
    }

    #[test]
    fn unresolved_marker_is_preserved_verbatim() {
        let ctx = json!({"a": 1});
        let out = expand("x {{nope.path}} y", &ctx);
        assert_eq!(out.text, "x {{nope.path}} y");
        assert_eq!(
            out.warnings,
            vec![Warning::UnresolvedPath {
                path: "nope.path".to_string()
            }]
        );
    }

    #[test]
    fn quiet_paths_do_not_warn() {
        let ctx = json!({});
        let out = expand("{{item}}{{feature}}{{section}}", &ctx);
        assert_eq!(out.text, "{{item}}{{feature}}{{section}}");
        assert!(out.warnings.is_empty());

        let out = expand("{{seo.structured_data.faqpage | json}}", &ctx);
        assert_eq!(out.text, "{{seo.structured_data.faqpage | json}}");
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn substitution_is_idempotent_on_resolved_text() {
        let ctx = json!({"name": "w"});
        let once = expand("hi {{name}}", &ctx);
        let twice = expand(&once.text, &ctx);
        assert_eq!(once.text, twice.text);
    }

    #[test]
    fn empty_sequence_renders_nothing() {
        let ctx = json!({"items": []});
        let out = expand("a{{#each items as |item|}}<li>{{item}}</li>{{/each}}b", &ctx);
        assert_eq!(out.text, "ab");
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn iteration_binds_and_concatenates_in_order() {
        let ctx = json!({"items": [{"name": "a"}, {"name": "b"}]});
        let out = expand("{{#each items as |item|}}{{item.name}},{{/each}}", &ctx);
        assert_eq!(out.text, "a,b,");
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn trailing_separator_removed_before_closing_bracket() {
        let ctx = json!({"items": [{"name": "a"}, {"name": "b"}]});
        let out = expand("[{{#each items as |item|}}\"{{item.name}}\",{{/each}}]", &ctx);
        assert_eq!(out.text, "[\"a\",\"b\"]");
    }

    #[test]
    fn multiline_trailing_separator_reindents() {
        let ctx = json!({"items": [{"v": 1}, {"v": 2}]});
        let source = "[\n{{#each items as |item|}}  {{item.v}},\n{{/each}}]";
        let out = expand(source, &ctx);
        assert_eq!(out.text, "[\n  1,\n  2\n            ]");
    }

    #[test]
    fn nested_blocks_with_scope_fallback() {
        let ctx = json!({"sections": [{"items": ["x", "y"]}, {"items": ["z"]}]});
        let out = expand(
            "{{#each sections as |section|}}{{#each section.items as |item|}}{{item}}{{/each}}{{/each}}",
            &ctx,
        );
        assert_eq!(out.text, "xyz");
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn loop_variable_shadows_outer_context() {
        let ctx = json!({"item": "outer", "items": ["inner"]});
        let out = expand("{{#each items as |item|}}{{item}}{{/each}}|{{item}}", &ctx);
        assert_eq!(out.text, "inner|outer");
    }

    #[test]
    fn non_sequence_iteration_drops_block_with_warning() {
        let ctx = json!({"title": "just a string", "after": "!"});
        let out = expand("a{{#each title as |t|}}{{t}}{{/each}}{{after}}", &ctx);
        assert_eq!(out.text, "a!");
        assert_eq!(
            out.warnings,
            vec![Warning::NotASequence {
                path: "title".to_string(),
                found: "string",
            }]
        );
    }

    #[test]
    fn missing_dotless_sequence_warns() {
        let ctx = json!({});
        let out = expand("{{#each gone as |x|}}{{x}}{{/each}}", &ctx);
        assert_eq!(out.text, "");
        assert_eq!(
            out.warnings,
            vec![Warning::SequenceNotFound {
                path: "gone".to_string()
            }]
        );
    }

    #[test]
    fn missing_dotted_sequence_is_silent() {
        // optional nested sections are commonly absent; no noise for them
        let ctx = json!({"section": {}});
        let out = expand("{{#each section.list_items as |item|}}{{item}}{{/each}}", &ctx);
        assert_eq!(out.text, "");
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn null_iteration_path_counts_as_missing() {
        let ctx = json!({"maybe": null});
        let out = expand("{{#each maybe as |m|}}{{m}}{{/each}}", &ctx);
        assert_eq!(out.text, "");
        assert_eq!(
            out.warnings,
            vec![Warning::SequenceNotFound {
                path: "maybe".to_string()
            }]
        );
    }

    #[test]
    fn unclosed_block_passes_through() {
        let ctx = json!({"items": ["a"]});
        let out = expand("{{#each items as |item|}}{{item}}", &ctx);
        // the opener is literal; {{item}} is quiet-listed and preserved
        assert_eq!(out.text, "{{#each items as |item|}}{{item}}");
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn markers_resolve_against_merged_scope_not_just_element() {
        // body markers can still see the root context
        let ctx = json!({"brand": "W", "items": ["a", "b"]});
        let out = expand("{{#each items as |item|}}{{brand}}{{item}} {{/each}}", &ctx);
        assert_eq!(out.text, "Wa Wb ");
    }

    #[test]
    fn deep_nesting_three_levels() {
        let ctx = json!({
            "groups": [
                {"rows": [{"cells": [1, 2]}, {"cells": [3]}]},
                {"rows": [{"cells": [4]}]}
            ]
        });
        let out = expand(
            "{{#each groups as |group|}}{{#each group.rows as |row|}}{{#each row.cells as |cell|}}{{cell}}{{/each}};{{/each}}|{{/each}}",
            &ctx,
        );
        assert_eq!(out.text, "12;3;|4;|");
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn separator_cleanup_patterns() {
        assert_eq!(strip_trailing_separators("[1,2,]"), "[1,2]");
        assert_eq!(strip_trailing_separators("[1,2, ]"), "[1,2]");
        assert_eq!(
            strip_trailing_separators("[\n  {\"a\":1},\n  \n]"),
            "[\n  {\"a\":1}\n            ]"
        );
        // no comma, nothing to do
        assert_eq!(strip_trailing_separators("[1,2]"), "[1,2]");
    }

    #[test]
    fn display_forms() {
        assert_eq!(display_value(&json!(null)), "null");
        assert_eq!(display_value(&json!([1, "a", null, [2, 3]])), "1,a,,2,3");
        assert_eq!(display_value(&json!({"k": 1})), "[object Object]");
    }
}
