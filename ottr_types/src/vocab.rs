//! Namespaces and well-known IRIs used by the OTTR base library

use crate::Iri;

pub const OTTR: &str = "http://ns.ottr.xyz/0.4/";
pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
pub const FOAF: &str = "http://xmlns.com/foaf/0.1/";
pub const DC: &str = "http://purl.org/dc/elements/1.1/";
pub const SCHEMA: &str = "http://schema.org/";
pub const O_RDF: &str = "http://tpl.ottr.xyz/rdf/0.1/";
pub const O_RDFS: &str = "http://tpl.ottr.xyz/rdfs/0.1/";
pub const AX: &str = "http://tpl.ottr.xyz/owl/axiom/0.1/";
pub const RSTR: &str = "http://tpl.ottr.xyz/owl/restriction/0.1/";

pub mod ottr {
    use super::*;

    /// The statement primitive
    pub fn triple() -> Iri {
        Iri::from_namespace(OTTR, "Triple")
    }

    /// The cross-product primitive
    pub fn cross() -> Iri {
        Iri::from_namespace(OTTR, "Cross")
    }

    pub fn none() -> Iri {
        Iri::from_namespace(OTTR, "none")
    }

    pub fn iri_type() -> Iri {
        Iri::from_namespace(OTTR, "IRI")
    }
}

pub mod rdf {
    use super::*;

    pub fn type_() -> Iri {
        Iri::from_namespace(RDF, "type")
    }

    pub fn lang_string() -> Iri {
        Iri::from_namespace(RDF, "langString")
    }

    pub fn property() -> Iri {
        Iri::from_namespace(RDF, "Property")
    }
}

pub mod rdfs {
    use super::*;

    pub fn resource() -> Iri {
        Iri::from_namespace(RDFS, "Resource")
    }

    pub fn literal() -> Iri {
        Iri::from_namespace(RDFS, "Literal")
    }

    pub fn label() -> Iri {
        Iri::from_namespace(RDFS, "label")
    }

    pub fn class() -> Iri {
        Iri::from_namespace(RDFS, "Class")
    }
}

pub mod xsd {
    use super::*;

    pub fn string() -> Iri {
        Iri::from_namespace(XSD, "string")
    }

    pub fn integer() -> Iri {
        Iri::from_namespace(XSD, "integer")
    }

    pub fn decimal() -> Iri {
        Iri::from_namespace(XSD, "decimal")
    }

    pub fn boolean() -> Iri {
        Iri::from_namespace(XSD, "boolean")
    }
}
