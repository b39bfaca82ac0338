//! OTTR template expansion
//!
//! Loads stOTTR template libraries, parses instance files and expands every
//! top-level instance into a flat stream of statements.
//!
//! ## Pipeline
//!
//! ```text
//! template text ─► ottr-core (lex, parse) ─► ottr-templates::TemplateRegistry
//! instance text ─► ottr-core (lex, parse) ─► GroundInstance list
//!                                                  │
//!                     ottr-templates::Expander (per top-level instance)
//!                                                  ↓
//!                                   Statement stream (N-Triples / JSON)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ottr::{OttrConfig, OttrGenerator};
//!
//! let mut generator = OttrGenerator::new(&OttrConfig::default()).unwrap();
//! generator.load_templates(
//!     "@prefix ex: <http://example.org#> .
//!      ex:Person[ ?name, ?email ] :: { ottr:Triple(?name, ex:hasEmail, ?email) } .",
//!     "people.stottr",
//! );
//! let instances = generator
//!     .instantiate("ex:Person(ex:alice, \"a@example.org\") .", "people.inst")
//!     .unwrap();
//! for outcome in instances.execute() {
//!     for statement in outcome.statements() {
//!         println!("{}", statement);
//!     }
//! }
//! ```

pub mod config;
pub mod generator;
pub mod output;

pub use config::OttrConfig;
pub use generator::{GeneratorError, InstanceOutcome, Instances, OttrGenerator};
pub use output::{write_statements, OutputFormat};

// Re-export the layers below for callers that only depend on `ottr`
pub use ottr_core::{Diagnostic, DiagnosticCode, GroundInstance, PrefixMap, Severity, Template};
pub use ottr_templates::{ExpansionError, ScopeGenerator, TemplateRegistry};
pub use ottr_types::{BlankNode, Iri, Literal, ScopeToken, Statement, Term};
