//! Template variables and rendering.

mod context;
pub mod keys;
mod render;

pub use context::TemplateContext;
pub use render::{TPL_EXTENSION, TemplateRenderer, resolve_template, trim_tpl_extension};
