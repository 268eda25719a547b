//! Template rendering with Handlebars.
//!
//! Rendering runs in strict mode: a template that references a variable missing from the
//! [`TemplateContext`] fails instead of producing an empty string.

use super::TemplateContext;
use crate::packager::error::{Error, Result};
use handlebars::{Handlebars, RenderErrorReason};

/// Suffix carried by template files.
pub const TPL_EXTENSION: &str = ".tpl";

/// Strips a trailing `.tpl` from a template file name.
pub fn trim_tpl_extension(file_name: &str) -> &str {
    file_name.strip_suffix(TPL_EXTENSION).unwrap_or(file_name)
}

/// Strict, non-escaping Handlebars renderer.
pub struct TemplateRenderer {
    registry: Handlebars<'static>,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TemplateRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateRenderer").finish_non_exhaustive()
    }
}

impl TemplateRenderer {
    /// Creates a renderer. Output is written verbatim (no HTML escaping).
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        registry.set_strict_mode(true);
        Self { registry }
    }

    /// Renders `template` against `context`. `name` is only used in error messages.
    pub fn render(&self, name: &str, template: &str, context: &TemplateContext) -> Result<String> {
        self.registry
            .render_template(template, context)
            .map_err(|e| match e.reason() {
                RenderErrorReason::MissingVariable(Some(key)) => Error::MissingKey { key: key.clone() },
                _ => Error::Template {
                    name: name.to_string(),
                    reason: e.to_string(),
                },
            })
    }
}

/// Resolves a one-off template string, such as a configured package version.
pub fn resolve_template(template: &str, context: &TemplateContext) -> Result<String> {
    TemplateRenderer::new().render(template, template, context)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> TemplateContext {
        let mut ctx = TemplateContext::new();
        ctx.set("projectVersion", "1.2.0");
        ctx.set("projectName", "a&b");
        ctx
    }

    #[test]
    fn renders_variables_without_escaping() {
        let out = TemplateRenderer::new()
            .render("t", "{{projectName}} v{{projectVersion}}", &context())
            .unwrap();
        assert_eq!(out, "a&b v1.2.0");
    }

    #[test]
    fn missing_variable_fails_in_strict_mode() {
        let err = resolve_template("{{chocolateyPackageName}}", &context()).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingKey { .. } | Error::Template { .. }
        ));
        assert!(err.to_string().contains("chocolateyPackageName"));
    }

    #[test]
    fn escaped_braces_pass_through() {
        let out = resolve_template("key: $\\{{ secrets.KEY }}", &context()).unwrap();
        assert_eq!(out, "key: ${{ secrets.KEY }}");
    }

    #[test]
    fn trims_tpl_suffix_only_at_end() {
        assert_eq!(trim_tpl_extension("binary.nuspec.tpl"), "binary.nuspec");
        assert_eq!(trim_tpl_extension("tools/install.ps1"), "tools/install.ps1");
        assert_eq!(trim_tpl_extension("a.tpl.md"), "a.tpl.md");
    }
}
