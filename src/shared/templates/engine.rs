//! Template engine for outbound notification text using Jinja2 syntax.
//!
//! Built-in templates are compiled into the binary. A file with the same
//! relative name under `templates/` on disk overrides the built-in one, so
//! wording can be adjusted per deployment without a rebuild.

use minijinja::{AutoEscape, Environment, Value};
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

/// Global template environment
static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

/// Override directory relative to the working directory
const TEMPLATE_DIR: &str = "templates";

/// Email body sent to the municipal authority for a new report
pub const REPORT_EMAIL_BODY: &str = "email/report_body.jinja";

const BUILTIN_TEMPLATES: &[(&str, &str)] = &[(
    REPORT_EMAIL_BODY,
    include_str!("../../../templates/email/report_body.jinja"),
)];

/// Errors that can occur during template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

fn init_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::None);

    for &(name, source) in BUILTIN_TEMPLATES {
        let overridden = Path::new(TEMPLATE_DIR).join(name);
        let content = match std::fs::read_to_string(&overridden) {
            Ok(content) => {
                tracing::info!("Using template override: {}", overridden.display());
                // Leaked once per template for the lifetime of the process
                Box::leak(content.into_boxed_str()) as &'static str
            }
            Err(_) => source,
        };

        if let Err(e) = env.add_template(name, content) {
            tracing::warn!("Failed to load template {}: {}", name, e);
            if content != source {
                // Broken override, keep the built-in so rendering still works
                let _ = env.add_template(name, source);
            }
        } else {
            tracing::debug!("Loaded template: {}", name);
        }
    }

    env
}

fn get_environment() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(init_environment)
}

/// Render a registered template with the given context.
///
/// # Example
/// ```ignore
/// use minijinja::context;
/// use crate::shared::templates::{render_template, REPORT_EMAIL_BODY};
///
/// let body = render_template(REPORT_EMAIL_BODY, context! { area_name => "Koramangala" })?;
/// ```
pub fn render_template(template_name: &str, ctx: Value) -> Result<String, TemplateError> {
    let template = get_environment()
        .get_template(template_name)
        .map_err(|_| TemplateError::NotFound(template_name.to_string()))?;

    template
        .render(ctx)
        .map_err(|e| TemplateError::RenderError(e.to_string()))
}
