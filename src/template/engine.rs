//! Named template registry

use std::collections::HashMap;

use super::render::Template;
use super::value::Context;
use super::TemplateError;

/// Holds parsed templates by name so each source is tokenized once per build
#[derive(Debug, Clone)]
pub struct TemplateEngine {
    templates: HashMap<String, Template>,
    autoescape: bool,
}

impl TemplateEngine {
    pub fn new() -> Self {
        Self {
            templates: HashMap::new(),
            autoescape: true,
        }
    }

    /// Turn HTML escaping of interpolated values on or off
    pub fn autoescape(mut self, on: bool) -> Self {
        self.autoescape = on;
        self
    }

    /// Parse and register a template under a name
    pub fn register(&mut self, name: &str, source: &str) -> Result<(), TemplateError> {
        let template = Template::parse(source)?;
        self.templates.insert(name.to_string(), template);
        Ok(())
    }

    /// Get a registered template
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// Render a registered template
    pub fn render(&self, name: &str, context: &Context) -> Result<String, TemplateError> {
        let template = self
            .get(name)
            .ok_or_else(|| TemplateError::TemplateNotFound(name.to_string()))?;
        Ok(template.render_with(context, self.autoescape))
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}
