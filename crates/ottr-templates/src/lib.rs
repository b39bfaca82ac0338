//! ottr-templates: template registry and expansion engine
//!
//! - `registry`: identifier → template map, seeded with the base library
//! - `library`: `ottr:Triple`, `ottr:Cross` and the standard `o-rdf`/`o-rdfs` text
//! - `typecheck`: argument validation against parameter declarations
//! - `scope`: atomic scope-token generator for blank-node freshness
//! - `expander`: recursive instantiation of ground instances into statements

pub mod error;
pub mod expander;
pub mod library;
pub mod registry;
pub mod scope;
pub mod typecheck;

pub use error::{ExpansionError, LoadErrors, MismatchReason, RegistryError, TypeMismatch};
pub use expander::{expand, Expander};
pub use registry::{DanglingReference, TemplateRegistry};
pub use scope::ScopeGenerator;
