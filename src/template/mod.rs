//! Template expansion engine
//!
//! The substitution/iteration language the landing-page templates are
//! written in, operating over a JSON context:
//!
//! ```text
//! {{ path.to.value }}            - interpolation, dotted-path lookup
//! {{ value | json }}             - filter applied to the resolved value
//! {{#each items as |item|}}      - iteration; may nest
//!   {{ item.name }}
//! {{/each}}
//! ```
//!
//! Expansion is forgiving by design: a marker that resolves to nothing is
//! left in the output verbatim, a block over a non-sequence renders empty,
//! and an unknown filter is skipped. Each of those surfaces as a
//! [`Warning`] next to the output instead of failing the build.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use weft::template::Template;
//!
//! let template = Template::parse("Hello, {{name}}!");
//! let out = template.render(&json!({"name": "world"}));
//! assert_eq!(out.text, "Hello, world!");
//! assert!(out.warnings.is_empty());
//! ```

mod ast;
mod diag;
mod lexer;
mod parser;
mod render;
mod resolve;

pub use diag::Warning;
pub use render::{Engine, Rendered, Template};
pub use resolve::{resolve, resolve_in_scope};
