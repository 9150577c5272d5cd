use super::filters;
use crate::{context::SubstitutionContext, error::Error, error::Result};
use crate::renderer::interface::TemplateRenderer;
use minijinja::{AutoEscape, Environment, Template, UndefinedBehavior};
use regex::Regex;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Names MiniJinja resolves on its own, never reported as unresolved.
const BUILTIN_GLOBALS: &[&str] = &["range", "dict", "debug", "namespace"];

const DEFAULT_TEMPLATE_NAME: &str = "template";

/// MiniJinja-based template rendering engine.
///
/// Undefined values are errors, block tags do not leave stray newlines
/// (`trim_blocks` + `lstrip_blocks`), and output is never HTML-escaped.
pub struct MiniJinjaRenderer {
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        filters::register(&mut env);

        Self { env }
    }

    /// Maps a MiniJinja failure onto the crate taxonomy.
    ///
    /// Strict-mode errors carry no variable name. The key is the missing
    /// variable named inside the failing expression's span; without a usable
    /// span it falls back to the first undeclared variable the context lacks.
    fn classify(
        &self,
        err: minijinja::Error,
        template: &Template<'_, '_>,
        source: &str,
        context: &SubstitutionContext,
        name: &str,
    ) -> Error {
        if err.kind() == minijinja::ErrorKind::UndefinedError {
            let mut missing: Vec<String> = template
                .undeclared_variables(false)
                .into_iter()
                .filter(|var| !context.contains_key(var))
                .filter(|var| !BUILTIN_GLOBALS.contains(&var.as_str()))
                .collect();
            missing.sort();

            let key = failing_identifier(&err, source, &missing)
                .or_else(|| missing.into_iter().next());
            if let Some(key) = key {
                return Error::UnresolvedPlaceholder { key, template: PathBuf::from(name) };
            }
        }
        Error::RenderFailed { template: PathBuf::from(name), source: err }
    }
}

/// First identifier in the error span that is one of `missing`.
fn failing_identifier(err: &minijinja::Error, source: &str, missing: &[String]) -> Option<String> {
    static IDENT: OnceLock<Regex> = OnceLock::new();
    let ident = IDENT.get_or_init(|| {
        Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").unwrap_or_else(|e| panic!("static pattern: {e}"))
    });

    let span = source.get(err.range()?)?;
    ident
        .find_iter(span)
        // Attribute names after `.` are not variables.
        .filter(|m| !span[..m.start()].ends_with('.'))
        .map(|m| m.as_str())
        .find(|id| missing.iter().any(|var| var == id))
        .map(str::to_string)
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(
        &self,
        template: &str,
        context: &SubstitutionContext,
        template_name: Option<&str>,
    ) -> Result<String> {
        let name = template_name.unwrap_or(DEFAULT_TEMPLATE_NAME);
        let mut env = self.env.clone();
        env.add_template_owned(name.to_string(), template.to_string())
            .map_err(|e| Error::RenderFailed { template: PathBuf::from(name), source: e })?;

        let tmpl = env
            .get_template(name)
            .map_err(|e| Error::RenderFailed { template: PathBuf::from(name), source: e })?;

        tmpl.render(context.as_map())
            .map_err(|e| self.classify(e, &tmpl, template, context, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    fn context(value: serde_json::Value) -> SubstitutionContext {
        SubstitutionContext::from_value(value).unwrap()
    }

    fn render(template: &str, value: serde_json::Value) -> Result<String> {
        MiniJinjaRenderer::new().render(template, &context(value), None)
    }

    #[test]
    fn substitutes_variables() {
        assert_eq!(render("ENV={{ env }}", json!({"env": "dev"})).unwrap(), "ENV=dev");
    }

    #[test]
    fn missing_key_is_unresolved_placeholder() {
        let err = render("ENV={{ env }}", json!({})).unwrap_err();
        match err {
            Error::UnresolvedPlaceholder { key, .. } => assert_eq!(key, "env"),
            other => panic!("Expected UnresolvedPlaceholder, got {other:?}"),
        }
    }

    #[test]
    fn reports_the_missing_key_among_present_ones() {
        let err = render("{{ region }}-{{ env }}", json!({"region": "us-east-1"})).unwrap_err();
        assert!(matches!(err, Error::UnresolvedPlaceholder { ref key, .. } if key == "env"));
    }

    #[test]
    fn guarded_keys_are_not_blamed_for_a_later_miss() {
        let err = render("{% if a is defined %}{{ a }}{% endif %}{{ z }}", json!({})).unwrap_err();
        assert!(
            matches!(err, Error::UnresolvedPlaceholder { ref key, .. } if key == "z"),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn untaken_branches_are_not_blamed() {
        let template = "{% if enabled %}{{ bucket }}{% endif %}region={{ region }}";
        let err = render(template, json!({"enabled": false})).unwrap_err();
        assert!(
            matches!(err, Error::UnresolvedPlaceholder { ref key, .. } if key == "region"),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn defined_test_does_not_require_the_key() {
        let out = render("{% if tags is defined %}tags{% endif %}ok", json!({})).unwrap();
        assert_eq!(out, "ok");
    }

    #[test]
    fn control_blocks_leave_no_blank_lines() {
        let template = "a\n{% if enabled %}\nb\n{% endif %}\nc\n";
        assert_eq!(render(template, json!({"enabled": true})).unwrap(), "a\nb\nc\n");
        assert_eq!(render(template, json!({"enabled": false})).unwrap(), "a\nc\n");
    }

    #[test]
    fn loops_over_context_lists() {
        let template = "{% for az in zones %}\n{{ az }}\n{% endfor %}\n";
        let out = render(template, json!({"zones": ["a", "b"]})).unwrap();
        assert_eq!(out, "a\nb\n");
    }

    #[test]
    fn output_is_not_html_escaped() {
        let out = render("{{ value }}", json!({"value": "<a & b>"})).unwrap();
        assert_eq!(out, "<a & b>");
    }

    #[test]
    fn syntax_errors_are_render_failures() {
        let err = render("{% if %}", json!({})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RenderFailed);
    }

    #[test]
    fn filters_are_available() {
        let out = render("{{ name | tf_identifier }}/{{ name | snake_case }}", json!({"name": "Web App"}))
            .unwrap();
        assert_eq!(out, "Web_App/web_app");
    }
}
