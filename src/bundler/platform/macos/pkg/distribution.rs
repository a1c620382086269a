//! Distribution manifest materialization.
//!
//! The manifest template is plain XML with `%(key)s` placeholders keyed by
//! configuration option names. Values are escaped for use inside XML
//! attributes before substitution.

use crate::bundler::{
    error::{Error, ErrorExt, Result},
    settings::Settings,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Escapes `<`, `>`, `&`, `'` and `"` for an XML attribute value.
pub fn xml_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '\'' => escaped.push_str("&apos;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Substitutes `%(key)s` placeholders in `template`.
///
/// `%%` produces a literal `%`. Any other use of `%`, a placeholder that is
/// not terminated by `)s`, or a key missing from `values` is an
/// [`Error::Template`].
pub fn render_template(template: &str, values: &BTreeMap<String, String>) -> Result<String> {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find('%') {
        rendered.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(tail) = after.strip_prefix('%') {
            rendered.push('%');
            rest = tail;
            continue;
        }

        let Some(body) = after.strip_prefix('(') else {
            let shown: String = after.chars().take(1).collect();
            return Err(Error::Template(format!(
                "unsupported format sequence '%{shown}'"
            )));
        };

        let Some(close) = body.find(')') else {
            return Err(Error::Template("unterminated placeholder '%('".into()));
        };
        let key = &body[..close];

        let Some(tail) = body[close + 1..].strip_prefix('s') else {
            return Err(Error::Template(format!(
                "placeholder '%({key})' must use the 's' conversion"
            )));
        };

        let value = values
            .get(key)
            .ok_or_else(|| Error::Template(format!("unknown key '{key}'")))?;
        rendered.push_str(value);
        rest = tail;
    }

    rendered.push_str(rest);
    Ok(rendered)
}

/// Renders the configured template into `<staging>/distribution.xml`.
///
/// Returns `None` without touching the filesystem when no template is
/// configured.
pub async fn write_manifest(settings: &Settings, staging: &Path) -> Result<Option<PathBuf>> {
    let Some(template_path) = settings.distribution_template() else {
        return Ok(None);
    };

    let template = tokio::fs::read_to_string(template_path)
        .await
        .fs_context("reading distribution template", template_path)?;

    let rendered = render_template(&template, &settings.template_values())?;

    let manifest = staging.join("distribution.xml");
    tokio::fs::write(&manifest, rendered)
        .await
        .fs_context("writing distribution manifest", &manifest)?;

    log::debug!("Wrote distribution manifest: {}", manifest.display());
    Ok(Some(manifest))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_xml_escape() {
        assert_eq!(xml_escape("<a&b>"), "&lt;a&amp;b&gt;");
        assert_eq!(xml_escape(r#"it's "x""#), "it&apos;s &quot;x&quot;");
        assert_eq!(xml_escape("plain"), "plain");
    }

    #[test]
    fn test_render_substitutes_and_keeps_literal_percent() {
        let out = render_template(
            r#"<title>%(name)s</title><pkg-ref version="%(version)s"/> 100%%"#,
            &values(&[("name", "Kodegen"), ("version", "1.2.3")]),
        )
        .unwrap();
        assert_eq!(
            out,
            r#"<title>Kodegen</title><pkg-ref version="1.2.3"/> 100%"#
        );
    }

    #[test]
    fn test_render_rejects_unknown_key() {
        let err = render_template("%(missing)s", &values(&[])).unwrap_err();
        assert!(matches!(err, Error::Template(ref msg) if msg.contains("missing")));
    }

    #[test]
    fn test_render_rejects_bad_sequences() {
        let vals = values(&[("k", "v")]);
        assert!(render_template("50% off", &vals).is_err());
        assert!(render_template("%(k)d", &vals).is_err());
        assert!(render_template("%(k", &vals).is_err());
        assert!(render_template("trailing %", &vals).is_err());
    }
}
