//! Embedded templates and rendering
//!
//! This module provides:
//! - The embedded template set ([`embedded::TEMPLATES`])
//! - [`TemplateRegistry`] lookups by template id
//! - Rendering through Tera, treated as a pure function of template text and bindings

pub mod embedded;

use crate::error::{Error, Result};
use crate::plan::{ArtifactPlan, Bindings};
use std::collections::HashMap;
use tera::Tera;

#[derive(Debug, Clone, Copy)]
pub enum TemplateBody {
    Text(&'static str),
    Binary(&'static [u8]),
}

#[derive(Debug, Clone, Copy)]
pub struct EmbeddedTemplate {
    pub id: &'static str,
    pub body: TemplateBody,
}

impl EmbeddedTemplate {
    pub fn bytes(&self) -> &'static [u8] {
        match self.body {
            TemplateBody::Text(s) => s.as_bytes(),
            TemplateBody::Binary(b) => b,
        }
    }
}

/// Template lookup by id
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    templates: HashMap<&'static str, EmbeddedTemplate>,
}

impl TemplateRegistry {
    /// Registry over the templates compiled into the binary
    pub fn embedded() -> Self {
        Self::from_templates(embedded::TEMPLATES.iter().copied())
    }

    pub fn from_templates(templates: impl IntoIterator<Item = EmbeddedTemplate>) -> Self {
        Self {
            templates: templates.into_iter().map(|t| (t.id, t)).collect(),
        }
    }

    pub fn lookup(&self, id: &str) -> Result<&EmbeddedTemplate> {
        self.templates
            .get(id)
            .ok_or_else(|| Error::TemplateNotFound(id.to_string()))
    }

    /// Check that every template referenced by `plan` exists
    pub fn validate(&self, plan: &ArtifactPlan) -> Result<()> {
        plan.artifacts()
            .iter()
            .filter_map(|a| a.source.template())
            .try_for_each(|id| self.lookup(id).map(|_| ()))
    }

    /// Render a text template against `bindings`
    pub fn render(&self, id: &str, bindings: &Bindings) -> Result<String> {
        let template = self.lookup(id)?;
        let TemplateBody::Text(source) = template.body else {
            return Err(Error::BinaryTemplate(id.to_string()));
        };
        render_str(id, source, bindings)
    }
}

/// Render template text. Output is never HTML-escaped; templates emit paths
/// and code, not user content.
pub fn render_str(name: &str, source: &str, bindings: &Bindings) -> Result<String> {
    Tera::one_off(source, &bindings.to_context(), false).map_err(|source| Error::Render {
        template: name.to_string(),
        source,
    })
}
