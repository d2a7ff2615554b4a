mod engine;

pub use engine::{render_template, TemplateError, REPORT_EMAIL_BODY};
