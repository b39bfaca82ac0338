//! Prefix map shared by all texts parsed in one run

use once_cell::sync::Lazy;
use ottr_types::{vocab, Iri};
use std::collections::BTreeMap;

/// Prefixes every parse starts with
static DEFAULT_PREFIXES: Lazy<BTreeMap<&'static str, &'static str>> = Lazy::new(|| {
    BTreeMap::from([
        ("ottr", vocab::OTTR),
        ("rdf", vocab::RDF),
        ("rdfs", vocab::RDFS),
        ("xsd", vocab::XSD),
        ("owl", vocab::OWL),
        ("foaf", vocab::FOAF),
        ("dc", vocab::DC),
        ("schema", vocab::SCHEMA),
        ("o-rdf", vocab::O_RDF),
        ("o-rdfs", vocab::O_RDFS),
        ("ax", vocab::AX),
        ("rstr", vocab::RSTR),
    ])
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixMap {
    prefixes: BTreeMap<String, String>,
}

impl Default for PrefixMap {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl PrefixMap {
    /// Empty map, no default prefixes
    pub fn empty() -> Self {
        Self {
            prefixes: BTreeMap::new(),
        }
    }

    pub fn with_defaults() -> Self {
        Self {
            prefixes: DEFAULT_PREFIXES
                .iter()
                .map(|(p, ns)| (p.to_string(), ns.to_string()))
                .collect(),
        }
    }

    /// Bind (or rebind) a prefix
    pub fn bind(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(String::as_str)
    }

    /// Expand `prefix:local`; `None` when the prefix is not bound
    pub fn resolve(&self, prefix: &str, local: &str) -> Option<Iri> {
        self.namespace(prefix)
            .map(|ns| Iri::from_namespace(ns, local))
    }

    /// Shortest `prefix:local` form of an IRI, if any prefix matches
    pub fn compact(&self, iri: &Iri) -> Option<String> {
        self.prefixes
            .iter()
            .filter(|(_, ns)| !ns.is_empty() && iri.as_str().starts_with(ns.as_str()))
            .max_by_key(|(_, ns)| ns.len())
            .map(|(prefix, ns)| format!("{}:{}", prefix, &iri.as_str()[ns.len()..]))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(p, ns)| (p.as_str(), ns.as_str()))
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}
