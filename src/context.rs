//! Per-language context preparation
//!
//! The translation JSON is not rendered as-is: before it reaches the
//! engine the build augments it with computed fields so the template never
//! hardcodes them. That covers cache busting (`meta.version`), alternate
//! language links, the copyright year, and the schema.org structured-data
//! objects derived from the translated content.

use std::sync::OnceLock;

use chrono::{Datelike, Local, Utc};
use regex::Regex;
use serde_json::{Map, Value, json};

use crate::config::SiteConfig;
use crate::template::resolve;

/// Augment a translation document in place. A non-object document is left
/// untouched; validating the shape is the loader's job.
pub fn augment(data: &mut Value, config: &SiteConfig) {
    // clone everything read before taking the document apart mutably
    let canonical = resolve(data, "meta.canonical").cloned();
    let download_url = resolve(data, "header.download_url").cloned();
    let steps = resolve(data, "how_it_works.steps")
        .and_then(Value::as_array)
        .cloned();
    let faq = resolve(data, "seo.faq").and_then(Value::as_array).cloned();
    let breadcrumb_home = resolve(data, "seo.breadcrumb_home").cloned();

    let Some(root) = data.as_object_mut() else {
        return;
    };

    // build timestamp for cache busting + alternate-language links
    let meta = ensure_object(root, "meta");
    meta.insert("version".to_string(), json!(Utc::now().timestamp_millis()));
    meta.insert(
        "alternate_default".to_string(),
        Value::String(config.site_url.clone()),
    );
    meta.insert(
        "alternate_languages".to_string(),
        Value::Array(
            config
                .page_urls()
                .into_iter()
                .map(|p| json!({"lang": p.lang, "url": p.url}))
                .collect(),
        ),
    );

    if let Some(footer) = root.get_mut("footer").and_then(Value::as_object_mut)
        && let Some(Value::String(copyright)) = footer.get_mut("copyright")
    {
        *copyright = copyright.replace("{year}", &Local::now().year().to_string());
    }

    let seo = ensure_object(root, "seo");
    let structured = ensure_object(seo, "structured_data");

    // SoftwareApplication: canonical/download URLs are language-specific
    if let Some(app) = structured
        .get_mut("software_application")
        .and_then(Value::as_object_mut)
    {
        set_or_remove(app, "url", canonical.clone());
        set_or_remove(app, "downloadUrl", download_url);
    }

    // WebSite: keep translated content, pin url to the canonical
    if let Some(website) = structured.get_mut("website").and_then(Value::as_object_mut) {
        set_or_remove(website, "url", canonical.clone());
    }

    // HowTo: steps come from how_it_works.steps, with markup stripped
    if let Some(howto) = structured.get_mut("howto").and_then(Value::as_object_mut) {
        if let Some(steps) = &steps {
            let step = steps
                .iter()
                .map(|s| {
                    let mut obj = Map::new();
                    obj.insert("@type".to_string(), json!("HowToStep"));
                    set_or_remove(&mut obj, "name", stripped(s.get("title")));
                    set_or_remove(&mut obj, "text", stripped(s.get("description")));
                    Value::Object(obj)
                })
                .collect();
            howto.insert("step".to_string(), Value::Array(step));
        }
        // `step` must always be an array for the JSON-LD to validate
        if howto.get("step").is_none_or(Value::is_null) {
            howto.insert("step".to_string(), Value::Array(Vec::new()));
        }
    }

    // FAQPage: rebuilt wholesale from seo.faq
    if let Some(faq) = &faq {
        let main_entity: Vec<Value> = faq
            .iter()
            .map(|f| {
                let mut question = Map::new();
                question.insert("@type".to_string(), json!("Question"));
                set_or_remove(&mut question, "name", stripped(f.get("question")));
                let mut answer = Map::new();
                answer.insert("@type".to_string(), json!("Answer"));
                set_or_remove(&mut answer, "text", stripped(f.get("answer")));
                question.insert("acceptedAnswer".to_string(), Value::Object(answer));
                Value::Object(question)
            })
            .collect();
        structured.insert(
            "faqpage".to_string(),
            json!({
                "@context": "https://schema.org",
                "@type": "FAQPage",
                "mainEntity": main_entity,
            }),
        );
    }

    // BreadcrumbList: always rebuilt from the translated label + canonical
    let mut item = Map::new();
    item.insert("@type".to_string(), json!("ListItem"));
    item.insert("position".to_string(), json!(1));
    set_or_remove(&mut item, "name", breadcrumb_home);
    set_or_remove(&mut item, "item", canonical);
    structured.insert(
        "breadcrumb_list".to_string(),
        json!({
            "@context": "https://schema.org",
            "@type": "BreadcrumbList",
            "itemListElement": [Value::Object(item)],
        }),
    );
}

/// Get `key` as a mutable object, replacing whatever non-object was there.
fn ensure_object<'a>(map: &'a mut Map<String, Value>, key: &str) -> &'a mut Map<String, Value> {
    let entry = map
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !entry.is_object() {
        *entry = Value::Object(Map::new());
    }
    match entry {
        Value::Object(obj) => obj,
        _ => unreachable!(),
    }
}

/// Insert `value` under `key`, or drop the key entirely when there is no
/// value. Removing matches what serializing an absent field would produce.
fn set_or_remove(map: &mut Map<String, Value>, key: &str, value: Option<Value>) {
    match value {
        Some(value) => {
            map.insert(key.to_string(), value);
        }
        None => {
            map.remove(key);
        }
    }
}

/// `strip_html` applied when the value is a string; anything else passes
/// through unchanged.
fn stripped(value: Option<&Value>) -> Option<Value> {
    value.map(|v| match v {
        Value::String(s) => Value::String(strip_html(s)),
        other => other.clone(),
    })
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").unwrap())
}

/// Replace tags with a space, collapse whitespace, trim. Structured data
/// must not carry markup from the translated rich-text fields.
pub fn strip_html(text: &str) -> String {
    let without_tags = tag_re().replace_all(text, " ");
    without_tags.split_whitespace().collect::<Vec<_>>().join(" ")
}
