//! Build driver
//!
//! Walks the configured languages and turns `build/template.html` plus
//! `build/<lang>.json` into the published pages: `index.html` at the site
//! root for the default language, `<lang>/index.html` for the rest, plus a
//! `urls.txt` manifest of the public page URLs.
//!
//! Engine warnings are advisory and logged; `strict` promotes them to a
//! failed build.

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;
use tracing::{info, warn};

use crate::config::SiteConfig;
use crate::context;
use crate::error::BuildError;
use crate::template::{Engine, Rendered};

#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Site root: contains `build/`, receives the rendered pages.
    pub root: Utf8PathBuf,
    /// Fail the build on any engine warning.
    pub strict: bool,
}

pub fn build(options: &BuildOptions, config: &SiteConfig) -> Result<(), BuildError> {
    let root = &options.root;
    let build_dir = root.join("build");
    let template = read(&build_dir.join("template.html"))?;

    let urls: Vec<String> = config.page_urls().into_iter().map(|p| p.url).collect();
    let urls_path = root.join("urls.txt");
    write(&urls_path, &urls.join("\n"))?;
    info!("wrote {urls_path}");

    let engine = Engine::default();
    for lang in &config.languages {
        let data_path = build_dir.join(format!("{lang}.json"));
        let mut data = load_translations(&data_path)?;
        context::augment(&mut data, config);

        let rendered = engine.expand(&template, &data);
        check_warnings(&rendered, lang, options.strict)?;

        let out_dir = if lang == &config.default_language {
            root.clone()
        } else {
            root.join(lang)
        };
        std::fs::create_dir_all(&out_dir).map_err(|source| BuildError::Write {
            path: out_dir.clone(),
            source,
        })?;
        let out_path = out_dir.join("index.html");
        write(&out_path, &rendered.text)?;
        info!("built {lang} from {data_path} -> {out_path}");
    }

    Ok(())
}

/// One-off expansion of a template against a JSON document, for the
/// `render` subcommand. Returns the expanded text.
pub fn render_file(
    template_path: &Utf8Path,
    data_path: &Utf8Path,
    strict: bool,
) -> Result<String, BuildError> {
    let template = read(template_path)?;
    let data = load_translations(data_path)?;
    let rendered = Engine::default().expand(&template, &data);
    check_warnings(&rendered, data_path.as_str(), strict)?;
    Ok(rendered.text)
}

fn check_warnings(rendered: &Rendered, target: &str, strict: bool) -> Result<(), BuildError> {
    for warning in &rendered.warnings {
        warn!("{target}: {warning}");
    }
    if strict && !rendered.warnings.is_empty() {
        let details = rendered
            .warnings
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        return Err(BuildError::Strict {
            target: target.to_string(),
            count: rendered.warnings.len(),
            details,
        });
    }
    Ok(())
}

fn load_translations(path: &Utf8Path) -> Result<Value, BuildError> {
    let text = read(path)?;
    let data: Value = serde_json::from_str(&text).map_err(|source| BuildError::Json {
        path: path.to_owned(),
        source,
    })?;
    if !data.is_object() {
        return Err(BuildError::NotAnObject {
            path: path.to_owned(),
        });
    }
    Ok(data)
}

fn read(path: &Utf8Path) -> Result<String, BuildError> {
    std::fs::read_to_string(path).map_err(|source| BuildError::Read {
        path: path.to_owned(),
        source,
    })
}

fn write(path: &Utf8Path, contents: &str) -> Result<(), BuildError> {
    std::fs::write(path, contents).map_err(|source| BuildError::Write {
        path: path.to_owned(),
        source,
    })
}
