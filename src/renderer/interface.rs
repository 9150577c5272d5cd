use crate::context::SubstitutionContext;
use crate::error::Result;
use std::path::Path;

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders a template string with the given context.
    ///
    /// # Arguments
    /// * `template` - Template string to render
    /// * `context` - Placeholder values
    /// * `template_name` - Optional name for the template (used in error messages)
    ///
    /// # Returns
    /// * `Result<String>` - Rendered text, or `UnresolvedPlaceholder` when the
    ///   template evaluates a key missing from `context`
    fn render(
        &self,
        template: &str,
        context: &SubstitutionContext,
        template_name: Option<&str>,
    ) -> Result<String>;

    /// Reads `template_root/template_filename` and renders it.
    fn render_file(
        &self,
        template_root: &Path,
        template_filename: &str,
        context: &SubstitutionContext,
    ) -> Result<String> {
        let template_path = template_root.join(template_filename);
        let template = std::fs::read_to_string(&template_path)?;
        let name = template_path.display().to_string();
        self.render(&template, context, Some(&name))
    }
}
