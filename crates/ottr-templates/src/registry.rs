//! Template Registry
//!
//! Identifier → template mapping. Populated at load time, read-only during
//! expansion. Every registry starts with the base library; redefining any
//! template, base or not, is a load-time error.

use std::collections::BTreeMap;

use ottr_core::{parse_templates, PrefixMap, Span, Template};
use ottr_types::Iri;
use tracing::{debug, info, warn};

use crate::error::{LoadErrors, RegistryError};
use crate::library;

/// A body call to a template that is not registered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    /// Template whose body makes the call
    pub template: Iri,
    /// The missing template
    pub missing: Iri,
    pub span: Span,
}

/// Registry of all loaded templates
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    templates: BTreeMap<Iri, Template>,
}

impl TemplateRegistry {
    /// Registry holding the base library only
    pub fn new() -> Self {
        let templates = library::base_templates()
            .into_iter()
            .map(|t| (t.iri.clone(), t))
            .collect();
        Self { templates }
    }

    /// Base library plus the standard `o-rdf` / `o-rdfs` templates
    pub fn with_standard_library() -> Result<Self, LoadErrors> {
        let mut registry = Self::new();
        registry.load_standard_library()?;
        Ok(registry)
    }

    pub fn load_standard_library(&mut self) -> Result<usize, LoadErrors> {
        let mut prefixes = PrefixMap::with_defaults();
        self.load_str(library::STANDARD_LIBRARY, &mut prefixes)
    }

    /// Get template by IRI
    pub fn get(&self, iri: &Iri) -> Option<&Template> {
        self.templates.get(iri)
    }

    /// Check if a template exists
    pub fn contains(&self, iri: &Iri) -> bool {
        self.templates.contains_key(iri)
    }

    /// Count of templates, base library included
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// All templates, ordered by IRI
    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.values()
    }

    pub fn base_templates(&self) -> impl Iterator<Item = &Template> {
        self.templates.values().filter(|t| t.is_base())
    }

    /// Add one template
    pub fn register(&mut self, template: Template) -> Result<(), RegistryError> {
        if self.templates.contains_key(&template.iri) {
            return Err(RegistryError::Redefinition {
                template: template.iri,
                span: template.span,
            });
        }
        debug!(template = %template.iri, arity = template.arity(), "registered template");
        self.templates.insert(template.iri.clone(), template);
        Ok(())
    }

    /// Add every template that does not clash; report all clashes together
    pub fn register_all(&mut self, templates: impl IntoIterator<Item = Template>) -> Result<usize, LoadErrors> {
        let mut registered = 0;
        let mut errors = Vec::new();
        for template in templates {
            match self.register(template) {
                Ok(()) => registered += 1,
                Err(e) => {
                    warn!("{}", e);
                    errors.push(e);
                }
            }
        }
        if errors.is_empty() {
            Ok(registered)
        } else {
            Err(LoadErrors(errors))
        }
    }

    /// Parse template text and register its templates
    ///
    /// A text with syntax errors registers nothing and leaves `prefixes`
    /// untouched.
    pub fn load_str(&mut self, source: &str, prefixes: &mut PrefixMap) -> Result<usize, LoadErrors> {
        let mut declared = prefixes.clone();
        let templates = parse_templates(source, &mut declared)
            .map_err(|e| LoadErrors(vec![RegistryError::Syntax(e)]))?;
        *prefixes = declared;
        let count = self.register_all(templates)?;
        info!("Loaded {} templates ({} registered in total)", count, self.len());
        Ok(count)
    }

    /// Body calls to templates that are not registered
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        self.templates
            .values()
            .flat_map(|t| {
                t.instances()
                    .iter()
                    .filter(|inst| !self.templates.contains_key(&inst.template))
                    .map(move |inst| DanglingReference {
                        template: t.iri.clone(),
                        missing: inst.template.clone(),
                        span: inst.span,
                    })
            })
            .collect()
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}
