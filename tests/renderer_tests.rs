use iac_scaffold::context::SubstitutionContext;
use iac_scaffold::error::{Error, ErrorKind};
use iac_scaffold::renderer::{MiniJinjaRenderer, TemplateRenderer};
use serde_json::json;
use std::fs;
use test_log::test;

fn test_template(template: &str, expected: &str) {
    let renderer = MiniJinjaRenderer::new();
    let result = renderer.render(template, &SubstitutionContext::new(), None).unwrap();
    assert_eq!(result, expected);
}

#[test]
fn test_camel_case_filter() {
    test_template("{{ 'hello world' | camel_case }}", "helloWorld");
}

#[test]
fn test_kebab_case_filter() {
    test_template("{{ 'hello world' | kebab_case }}", "hello-world");
}

#[test]
fn test_pascal_case_filter() {
    test_template("{{ 'hello world' | pascal_case }}", "HelloWorld");
}

#[test]
fn test_screaming_snake_case_filter() {
    test_template("{{ 'hello world' | screaming_snake_case }}", "HELLO_WORLD");
}

#[test]
fn test_snake_case_filter() {
    test_template("{{ 'hello world' | snake_case }}", "hello_world");
}

#[test]
fn test_tf_identifier_filter() {
    test_template("{{ 'billing api.prod' | tf_identifier }}", "billing_api_prod");
    test_template("{{ '9lives' | tf_identifier }}", "_9lives");
}

#[test]
fn test_loop_controls() {
    test_template(
        "{% for i in range(1, 6) %}{% if i == 4 %}{% break %}{% endif %}{{ i }}{% if not loop.last %} {% endif %}{% endfor %}",
        "1 2 3 ",
    );
}

#[test]
fn test_block_lines_leave_no_blank_lines() {
    let renderer = MiniJinjaRenderer::new();
    let context = SubstitutionContext::from_value(json!({"zones": ["a", "b"]})).unwrap();
    let template = "zones = [\n{% for z in zones %}\n  \"{{ z }}\",\n{% endfor %}\n]\n";

    let result = renderer.render(template, &context, None).unwrap();
    assert_eq!(result, "zones = [\n  \"a\",\n  \"b\",\n]\n");
}

#[test]
fn test_render_file_names_the_template_in_errors() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("backend.tf.j2"), "bucket = \"{{ state_bucket }}\"").unwrap();

    let err = MiniJinjaRenderer::new()
        .render_file(dir.path(), "backend.tf.j2", &SubstitutionContext::new())
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UnresolvedPlaceholder);
    match err {
        Error::UnresolvedPlaceholder { key, template } => {
            assert_eq!(key, "state_bucket");
            assert!(template.ends_with("backend.tf.j2"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_syntax_error_is_render_failure() {
    let err = MiniJinjaRenderer::new()
        .render("{% if %}", &SubstitutionContext::new(), Some("broken.tf.j2"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RenderFailed);
}
