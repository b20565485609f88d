//! Build-level errors
//!
//! The template engine itself never fails; these cover everything around
//! it: files that can't be read or written, translation documents that
//! aren't valid JSON, and strict mode promoting engine warnings to a
//! failing build.

use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum BuildError {
    #[error("failed to read `{path}`")]
    #[diagnostic(code(weft::io::read))]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write `{path}`")]
    #[diagnostic(code(weft::io::write))]
    Write {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("`{path}` is not valid JSON")]
    #[diagnostic(code(weft::translations::parse))]
    Json {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("`{path}` is not a JSON object")]
    #[diagnostic(
        code(weft::translations::shape),
        help("translation files need an object at the top level")
    )]
    NotAnObject { path: Utf8PathBuf },

    #[error("invalid config `{path}`")]
    #[diagnostic(code(weft::config))]
    Config {
        path: Utf8PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{count} template warning(s) rendering `{target}`")]
    #[diagnostic(
        code(weft::strict),
        help("{details}")
    )]
    Strict {
        target: String,
        count: usize,
        details: String,
    },
}
