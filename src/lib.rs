//! weft: build pipeline for a localized static landing page
//!
//! Renders one HTML page per configured language from a shared template
//! and per-language JSON translation files. The interesting part lives in
//! [`template`]: a small substitution/iteration engine (`{{ path }}`
//! markers with filters, nestable `{{#each}}` blocks) that never aborts and
//! reports problems as structured warnings. Everything else is driver:
//! [`config`] for the site layout, [`context`] for the computed fields the
//! templates rely on, and [`pipeline`] for the language loop and file I/O.

pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod template;
