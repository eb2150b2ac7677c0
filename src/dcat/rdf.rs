//! RDF graph model and serialization layer for the export profiles.
//!
//! This module provides RDF parsing and serialization using the oxrdfio library.
//! It wraps the library's functionality in a higher-level API tailored for
//! building one dataset record at a time.
//!
//! An [`RdfGraph`] is a set: adding a triple twice keeps one copy. Triples
//! are only ever added, with [`RdfGraph::remove_matching`] as the single
//! replace-on-conflict escape hatch.

use std::io::{Read, Write};

use indexmap::{IndexMap, IndexSet};
use oxiri::IriRef;
use oxrdf::{BlankNode, Literal, NamedNode, NamedOrBlankNode, Quad, Term, Triple};
use oxrdfio::{JsonLdProfileSet, RdfFormat as OxRdfFormat, RdfParser, RdfSerializer};

use crate::config::RdfFormat;
use crate::error::{Result, ThemeError};

use super::namespaces::{self, RDF};

/// A single RDF triple (subject, predicate, object).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RdfTriple {
    /// The subject of the triple.
    pub subject: RdfNode,
    /// The predicate (property) of the triple.
    pub predicate: String,
    /// The object of the triple.
    pub object: RdfNode,
}

impl RdfTriple {
    /// Creates a new RDF triple.
    #[must_use]
    pub fn new(subject: RdfNode, predicate: impl Into<String>, object: RdfNode) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object,
        }
    }
}

/// An RDF node (subject or object in a triple).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RdfNode {
    /// A named node (IRI/URI).
    Uri(String),
    /// A blank node with a local identifier.
    BlankNode(String),
    /// A literal value with optional language tag or datatype.
    Literal {
        /// The literal value.
        value: String,
        /// Optional language tag (e.g., "de", "en").
        language: Option<String>,
        /// Optional datatype URI.
        datatype: Option<String>,
    },
}

impl RdfNode {
    /// Creates a new URI node.
    #[must_use]
    pub fn uri(uri: impl Into<String>) -> Self {
        Self::Uri(uri.into())
    }

    /// Creates a new blank node.
    #[must_use]
    pub fn blank(id: impl Into<String>) -> Self {
        Self::BlankNode(id.into())
    }

    /// Creates a new plain literal.
    #[must_use]
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            language: None,
            datatype: None,
        }
    }

    /// Creates a new literal with a language tag.
    #[must_use]
    pub fn literal_with_lang(value: impl Into<String>, lang: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            language: Some(lang.into()),
            datatype: None,
        }
    }

    /// Creates a new typed literal.
    #[must_use]
    pub fn typed_literal(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            language: None,
            datatype: Some(datatype.into()),
        }
    }

    /// Creates a literal typed with an XML Schema datatype, e.g. `"date"`.
    #[must_use]
    pub fn xsd_literal(value: impl Into<String>, xsd_type: &str) -> Self {
        Self::typed_literal(value, format!("{}{xsd_type}", namespaces::XSD))
    }

    /// Returns true if this is a URI node.
    #[must_use]
    pub const fn is_uri(&self) -> bool {
        matches!(self, Self::Uri(_))
    }

    /// Returns true if this is a blank node.
    #[must_use]
    pub const fn is_blank(&self) -> bool {
        matches!(self, Self::BlankNode(_))
    }

    /// Returns true if this is a literal.
    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(self, Self::Literal { .. })
    }

    /// Returns the IRI, blank node id or literal lexical value.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Uri(v) | Self::BlankNode(v) => v,
            Self::Literal { value, .. } => value,
        }
    }

    /// Returns the datatype IRI of a typed literal.
    #[must_use]
    pub fn datatype(&self) -> Option<&str> {
        match self {
            Self::Literal { datatype, .. } => datatype.as_deref(),
            _ => None,
        }
    }

    /// Returns the language tag of a language-tagged literal.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        match self {
            Self::Literal { language, .. } => language.as_deref(),
            _ => None,
        }
    }

    /// Creates a class URI in the given namespace.
    #[must_use]
    pub fn class(namespace: &str, class_name: &str) -> Self {
        Self::Uri(format!("{namespace}{class_name}"))
    }
}

/// An RDF graph containing a set of triples.
#[derive(Debug, Clone, Default)]
pub struct RdfGraph {
    /// The triples in this graph, in insertion order.
    triples: IndexSet<RdfTriple>,
    /// Prefix bindings used by the Turtle and RDF/XML serializers.
    prefixes: IndexMap<String, String>,
    /// Counter for generating unique blank node IDs.
    blank_node_counter: usize,
}

impl PartialEq for RdfGraph {
    /// Graphs are equal when they hold the same triples, in any order.
    fn eq(&self, other: &Self) -> bool {
        self.triples == other.triples
    }
}

impl Eq for RdfGraph {}

impl RdfGraph {
    /// Creates a new empty RDF graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a triple to the graph. Returns false if it was already present.
    pub fn add_triple(&mut self, triple: RdfTriple) -> bool {
        self.triples.insert(triple)
    }

    /// Adds a triple from components.
    pub fn add(&mut self, subject: RdfNode, predicate: impl Into<String>, object: RdfNode) -> bool {
        self.add_triple(RdfTriple::new(subject, predicate, object))
    }

    /// Adds an `rdf:type` statement.
    pub fn add_type(&mut self, subject: &RdfNode, namespace: &str, class_name: &str) {
        self.add(
            subject.clone(),
            format!("{RDF}{}", namespaces::rdf::TYPE),
            RdfNode::class(namespace, class_name),
        );
    }

    /// Removes every triple with the given subject and predicate.
    ///
    /// Returns the number of removed triples.
    pub fn remove_matching(&mut self, subject: &RdfNode, predicate: &str) -> usize {
        let before = self.triples.len();
        self.triples
            .retain(|t| !(t.subject == *subject && t.predicate == predicate));
        before - self.triples.len()
    }

    /// An empty graph that continues this graph's blank node numbering.
    ///
    /// Triples written to it can be moved back with [`RdfGraph::commit`]
    /// without clashing blank node ids.
    #[must_use]
    pub(crate) fn stage(&self) -> Self {
        Self {
            blank_node_counter: self.blank_node_counter,
            ..Self::default()
        }
    }

    /// Moves the triples and prefix bindings of a staged graph into this one.
    pub(crate) fn commit(&mut self, staged: Self) {
        self.triples.extend(staged.triples);
        self.prefixes.extend(staged.prefixes);
        self.blank_node_counter = self.blank_node_counter.max(staged.blank_node_counter);
    }

    /// Returns true if the exact triple is present.
    #[must_use]
    pub fn contains(&self, subject: &RdfNode, predicate: &str, object: &RdfNode) -> bool {
        self.triples.contains(&RdfTriple::new(
            subject.clone(),
            predicate.to_string(),
            object.clone(),
        ))
    }

    /// Returns all objects for the given subject and predicate.
    pub fn objects<'a, 'b>(
        &'a self,
        subject: &'b RdfNode,
        predicate: &'b str,
    ) -> impl Iterator<Item = &'a RdfNode> + 'b
    where
        'a: 'b,
    {
        self.triples
            .iter()
            .filter(move |t| t.subject == *subject && t.predicate == predicate)
            .map(|t| &t.object)
    }

    /// Returns the first object for the given subject and predicate.
    #[must_use]
    pub fn object(&self, subject: &RdfNode, predicate: &str) -> Option<&RdfNode> {
        self.objects(subject, predicate).next()
    }

    /// Returns all subjects having the given predicate.
    pub fn subjects_with<'a, 'b>(&'a self, predicate: &'b str) -> impl Iterator<Item = &'a RdfNode> + 'b
    where
        'a: 'b,
    {
        self.triples
            .iter()
            .filter(move |t| t.predicate == predicate)
            .map(|t| &t.subject)
    }

    /// Binds a namespace prefix for serialization.
    pub fn bind(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    /// Returns the bound prefixes.
    #[must_use]
    pub fn prefixes(&self) -> &IndexMap<String, String> {
        &self.prefixes
    }

    /// Generates a new unique blank node ID.
    pub fn new_blank_node(&mut self) -> RdfNode {
        self.blank_node_counter += 1;
        RdfNode::blank(format!("b{}", self.blank_node_counter))
    }

    /// Returns the number of triples in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Returns true if the graph is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Returns an iterator over the triples.
    pub fn triples(&self) -> impl Iterator<Item = &RdfTriple> {
        self.triples.iter()
    }

    /// Serializes the graph to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn serialize(&self, format: RdfFormat) -> Result<String> {
        let mut output = Vec::new();
        self.serialize_to_writer(&mut output, format)?;
        String::from_utf8(output).map_err(|e| ThemeError::Rdf(e.to_string()))
    }

    /// Serializes the graph to a writer in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if a node is not valid RDF (e.g. a relative IRI)
    /// or the writer fails.
    pub fn serialize_to_writer<W: Write>(&self, writer: W, format: RdfFormat) -> Result<()> {
        let ox_format = to_oxrdf_format(format);
        let mut serializer = RdfSerializer::from_format(ox_format);
        for (prefix, namespace) in &self.prefixes {
            serializer = serializer
                .with_prefix(prefix.as_str(), namespace.as_str())
                .map_err(|e| ThemeError::Rdf(format!("Invalid prefix IRI {namespace}: {e}")))?;
        }
        let mut serializer = serializer.for_writer(writer);

        for triple in &self.triples {
            let ox_triple = to_oxrdf_triple(triple)?;
            serializer.serialize_triple(&ox_triple)?;
        }

        serializer.finish()?;

        Ok(())
    }

    /// Parses an RDF graph from a reader in the specified format.
    ///
    /// Relative IRI references in object position are kept verbatim, so a
    /// serialized graph reads back unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails.
    pub fn parse_from_reader<R: Read>(reader: R, format: RdfFormat) -> Result<Self> {
        let ox_format = to_oxrdf_format(format);
        let parser = RdfParser::from_format(ox_format).lenient().for_reader(reader);

        let mut graph = Self::new();

        for result in parser {
            let quad = result.map_err(|e| ThemeError::Rdf(e.to_string()))?;
            let triple = from_oxrdf_quad(&quad)?;
            graph.add_triple(triple);
        }

        Ok(graph)
    }

    /// Parses an RDF graph from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails.
    pub fn parse(input: &str, format: RdfFormat) -> Result<Self> {
        Self::parse_from_reader(input.as_bytes(), format)
    }
}

/// Converts our [`RdfFormat`] to oxrdfio's format.
fn to_oxrdf_format(format: RdfFormat) -> OxRdfFormat {
    match format {
        RdfFormat::RdfXml => OxRdfFormat::RdfXml,
        RdfFormat::JsonLd => OxRdfFormat::JsonLd {
            profile: JsonLdProfileSet::default(),
        },
        RdfFormat::Turtle => OxRdfFormat::Turtle,
        RdfFormat::NTriples => OxRdfFormat::NTriples,
    }
}

fn named_node(iri: &str) -> Result<NamedNode> {
    NamedNode::new(iri).map_err(|e| ThemeError::Rdf(format!("Invalid URI '{iri}': {e}")))
}

/// Objects may also be relative references such as a bare email address.
fn object_node(iri: &str) -> Result<NamedNode> {
    match NamedNode::new(iri) {
        Ok(node) => Ok(node),
        Err(_) if IriRef::parse(iri).is_ok() => Ok(NamedNode::new_unchecked(iri)),
        Err(e) => Err(ThemeError::Rdf(format!("Invalid URI '{iri}': {e}"))),
    }
}

fn blank_node(id: &str) -> Result<BlankNode> {
    BlankNode::new(id).map_err(|e| ThemeError::Rdf(format!("Invalid blank node ID: {e}")))
}

/// Converts an [`RdfTriple`] to an oxrdf Triple.
fn to_oxrdf_triple(triple: &RdfTriple) -> Result<Triple> {
    let subject = match &triple.subject {
        RdfNode::Uri(uri) => NamedOrBlankNode::NamedNode(named_node(uri)?),
        RdfNode::BlankNode(id) => NamedOrBlankNode::BlankNode(blank_node(id)?),
        RdfNode::Literal { .. } => {
            return Err(ThemeError::Rdf("Literals cannot be triple subjects".into()));
        },
    };

    let predicate = named_node(&triple.predicate)?;

    let object = match &triple.object {
        RdfNode::Uri(uri) => Term::NamedNode(object_node(uri)?),
        RdfNode::BlankNode(id) => Term::BlankNode(blank_node(id)?),
        RdfNode::Literal {
            value,
            language,
            datatype,
        } => {
            let lit = if let Some(lang) = language {
                Literal::new_language_tagged_literal(value, lang)
                    .map_err(|e| ThemeError::Rdf(format!("Invalid language tag: {e}")))?
            } else if let Some(dt) = datatype {
                Literal::new_typed_literal(value, named_node(dt)?)
            } else {
                Literal::new_simple_literal(value)
            };
            Term::Literal(lit)
        },
    };

    Ok(Triple::new(subject, predicate, object))
}

/// Converts an oxrdf Quad back to our [`RdfTriple`].
fn from_oxrdf_quad(quad: &Quad) -> Result<RdfTriple> {
    let subject = match &quad.subject {
        NamedOrBlankNode::NamedNode(n) => RdfNode::Uri(n.as_str().to_string()),
        NamedOrBlankNode::BlankNode(b) => RdfNode::BlankNode(b.as_str().to_string()),
        #[allow(unreachable_patterns)]
        _ => {
            return Err(ThemeError::Rdf("Unsupported subject type".into()));
        },
    };

    let predicate = quad.predicate.as_str().to_string();

    let object = match &quad.object {
        Term::NamedNode(n) => RdfNode::Uri(n.as_str().to_string()),
        Term::BlankNode(b) => RdfNode::BlankNode(b.as_str().to_string()),
        Term::Literal(lit) => {
            let value = lit.value().to_string();
            let language = lit.language().map(String::from);
            let datatype = lit.datatype().as_str();
            let datatype = if language.is_none()
                && datatype != format!("{}string", namespaces::XSD)
            {
                Some(datatype.to_string())
            } else {
                None
            };
            RdfNode::Literal {
                value,
                language,
                datatype,
            }
        },
        #[allow(unreachable_patterns)]
        _ => {
            return Err(ThemeError::Rdf("Unsupported object type".into()));
        },
    };

    Ok(RdfTriple::new(subject, predicate, object))
}
