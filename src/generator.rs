//! OTTR Generator
//!
//! Driver that owns the template registry and turns instance text into
//! statements.
//!
//! ## Pipeline
//!
//! ```text
//! template files ──► load_templates ──► TemplateRegistry (+ diagnostics)
//!                                             │
//! instance file ──► instantiate ──► Instances │
//!                                      │      │
//!                    execute / execute_parallel (one scope token per instance)
//!                                      ↓
//!                        InstanceOutcome { instance, result }
//! ```
//!
//! Load problems become diagnostics; instantiation is refused while any of
//! them is an error. Expansion failures are scoped to one top-level instance.

use std::path::Path;

use anyhow::{Context, Result};
use ottr_core::{
    parse_instances, syntax_diagnostics, Diagnostic, DiagnosticCode, GroundInstance, PrefixMap,
    SyntaxErrors,
};
use ottr_templates::{
    DanglingReference, ExpansionError, Expander, LoadErrors, ScopeGenerator, TemplateRegistry,
};
use ottr_types::{ScopeToken, Statement};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::OttrConfig;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("standard library failed to load: {0}")]
    StandardLibrary(LoadErrors),

    #[error("refusing to instantiate: {count} template load error(s) recorded")]
    LoadErrorsRecorded { count: usize },

    #[error("{source_name}: {errors}")]
    Syntax {
        source_name: String,
        errors: SyntaxErrors,
    },
}

impl GeneratorError {
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            GeneratorError::StandardLibrary(errors) => errors.diagnostics("<standard library>"),
            GeneratorError::LoadErrorsRecorded { .. } => Vec::new(),
            GeneratorError::Syntax {
                source_name,
                errors,
            } => syntax_diagnostics(errors, source_name),
        }
    }
}

// ============================================================================
// Generator
// ============================================================================

pub struct OttrGenerator {
    registry: TemplateRegistry,
    /// Prefixes shared by every template text loaded so far
    prefixes: PrefixMap,
    diagnostics: Vec<Diagnostic>,
    max_depth: Option<usize>,
    parallel: bool,
    scopes: ScopeGenerator,
}

impl OttrGenerator {
    pub fn new(config: &OttrConfig) -> Result<Self, GeneratorError> {
        let registry = if config.standard_library {
            TemplateRegistry::with_standard_library().map_err(GeneratorError::StandardLibrary)?
        } else {
            TemplateRegistry::new()
        };
        debug!(
            templates = registry.len(),
            standard_library = config.standard_library,
            "generator initialized"
        );
        Ok(Self {
            registry,
            prefixes: config.prefix_map(),
            diagnostics: Vec::new(),
            max_depth: config.max_depth,
            parallel: config.parallel,
            scopes: ScopeGenerator::new(),
        })
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    pub fn prefixes(&self) -> &PrefixMap {
        &self.prefixes
    }

    /// Parse template text and register its templates
    ///
    /// Returns the number of templates registered. Problems are recorded as
    /// diagnostics rather than returned.
    pub fn load_templates(&mut self, source: &str, source_name: &str) -> usize {
        // Templates that do not clash are registered even when others do
        let before = self.registry.len();
        if let Err(errors) = self.registry.load_str(source, &mut self.prefixes) {
            let diagnostics = errors.diagnostics(source_name);
            warn!(
                "{} problem(s) loading templates from {}",
                diagnostics.len(),
                source_name
            );
            self.diagnostics.extend(diagnostics);
        }
        let count = self.registry.len() - before;
        info!("Loaded {} templates from {}", count, source_name);
        count
    }

    pub fn load_template_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read template file {}", path.display()))?;
        Ok(self.load_templates(&source, &path.display().to_string()))
    }

    /// Recorded load diagnostics followed by dangling-reference warnings
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut all = self.diagnostics.clone();
        all.extend(
            self.registry
                .dangling_references()
                .iter()
                .map(dangling_diagnostic),
        );
        all
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Parse instance text against the loaded templates
    ///
    /// Prefixes declared in the instance text do not leak back into the
    /// generator.
    pub fn instantiate(
        &self,
        source: &str,
        source_name: &str,
    ) -> Result<Instances<'_>, GeneratorError> {
        let count = self.diagnostics.iter().filter(|d| d.is_error()).count();
        if count > 0 {
            return Err(GeneratorError::LoadErrorsRecorded { count });
        }

        let mut prefixes = self.prefixes.clone();
        let instances =
            parse_instances(source, &mut prefixes).map_err(|errors| GeneratorError::Syntax {
                source_name: source_name.to_string(),
                errors,
            })?;
        info!("Parsed {} instances from {}", instances.len(), source_name);

        Ok(Instances {
            generator: self,
            source_name: source_name.to_string(),
            instances,
        })
    }

    pub fn instantiate_file(&self, path: impl AsRef<Path>) -> Result<Instances<'_>> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read instance file {}", path.display()))?;
        let instances = self
            .instantiate(&source, &path.display().to_string())
            .with_context(|| format!("Failed to instantiate {}", path.display()))?;
        Ok(instances)
    }

    fn expander(&self) -> Expander<'_> {
        Expander::new(&self.registry).with_max_depth(self.max_depth)
    }
}

fn dangling_diagnostic(dangling: &DanglingReference) -> Diagnostic {
    let message = format!(
        "template {} calls {}, which is not defined",
        dangling.template, dangling.missing
    );
    let diag = Diagnostic::warning(DiagnosticCode::DanglingReference, message);
    if dangling.span.line > 0 {
        diag.with_location(dangling.span.location())
    } else {
        diag
    }
}

// ============================================================================
// Instances
// ============================================================================

/// Parsed top-level instances, ready to expand
pub struct Instances<'g> {
    generator: &'g OttrGenerator,
    source_name: String,
    instances: Vec<GroundInstance>,
}

/// Result of expanding one top-level instance
#[derive(Debug)]
pub struct InstanceOutcome<'g> {
    /// Position in the instance text
    pub index: usize,
    pub instance: &'g GroundInstance,
    pub scope: ScopeToken,
    pub result: Result<Vec<Statement>, ExpansionError>,
}

impl InstanceOutcome<'_> {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Statements produced, empty on failure
    pub fn statements(&self) -> &[Statement] {
        self.result.as_deref().unwrap_or(&[])
    }

    /// Error diagnostic naming the failed instance
    pub fn diagnostic(&self, source_name: &str) -> Option<Diagnostic> {
        let err = self.result.as_ref().err()?;
        let mut diag = err.diagnostic();
        diag.message = format!("instance #{} {}: {}", self.index + 1, self.instance, diag.message);
        if diag.location.is_none() && self.instance.span.line > 0 {
            diag = diag.with_location(self.instance.span.location());
        }
        Some(diag.with_source(source_name))
    }
}

impl<'g> Instances<'g> {
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn iter(&self) -> impl Iterator<Item = &GroundInstance> {
        self.instances.iter()
    }

    /// Expand instances one at a time, in order, as the iterator is driven
    pub fn execute(&self) -> impl Iterator<Item = InstanceOutcome<'_>> + '_ {
        let expander = self.generator.expander();
        self.instances.iter().enumerate().map(move |(index, instance)| {
            let scope = self.generator.scopes.next_scope();
            outcome(&expander, index, instance, scope)
        })
    }

    /// Expand all instances on the rayon pool
    ///
    /// Scope tokens are drawn in instance order before the fan-out, and the
    /// outcomes come back in instance order.
    pub fn execute_parallel(&self) -> Vec<InstanceOutcome<'_>> {
        let expander = self.generator.expander();
        let scopes: Vec<ScopeToken> = self
            .instances
            .iter()
            .map(|_| self.generator.scopes.next_scope())
            .collect();
        self.instances
            .par_iter()
            .zip(scopes)
            .enumerate()
            .map(|(index, (instance, scope))| outcome(&expander, index, instance, scope))
            .collect()
    }

    /// Expand everything, in parallel when the configuration asks for it
    pub fn run(&self) -> Vec<InstanceOutcome<'_>> {
        if self.generator.parallel {
            self.execute_parallel()
        } else {
            self.execute().collect()
        }
    }
}

fn outcome<'g>(
    expander: &Expander<'_>,
    index: usize,
    instance: &'g GroundInstance,
    scope: ScopeToken,
) -> InstanceOutcome<'g> {
    let result = expander.expand(instance, scope);
    if let Err(e) = &result {
        warn!("Instance #{} ({}) failed: {}", index + 1, instance.template, e);
    }
    InstanceOutcome {
        index,
        instance,
        scope,
        result,
    }
}
