//! Triple emission helpers.
//!
//! Every profile step funnels its output through these methods so the
//! coercion rules live in one place: empty values never produce a triple,
//! and [`ObjectKind`] decides whether a value becomes a plain literal, a
//! tagged or typed literal, or a URI reference. Values that cannot be
//! written as an IRI are dropped here, not at serialization time.

use log::warn;
use oxiri::{Iri, IriRef};
use serde_json::Value;

use crate::record::{value_text, FieldSource};

use super::dates;
use super::rdf::{RdfGraph, RdfNode};

/// How a raw string value is turned into an RDF object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind<'a> {
    /// Plain literal.
    Literal,
    /// Literal with a language tag.
    Lang(&'a str),
    /// Literal typed with an XML Schema datatype, e.g. `xsd::DECIMAL`.
    Typed(&'a str),
    /// URI reference, absolute or relative.
    Uri,
    /// URI reference if the value is an absolute `http` IRI, plain literal
    /// otherwise.
    UriIfHttp,
}

impl ObjectKind<'_> {
    /// Builds the object node for `value`.
    ///
    /// Returns `None` for a [`ObjectKind::Uri`] value that is not a valid
    /// IRI reference.
    #[must_use]
    pub fn node(self, value: &str) -> Option<RdfNode> {
        match self {
            Self::Literal => Some(RdfNode::literal(value)),
            Self::Lang(lang) => Some(RdfNode::literal_with_lang(value, lang)),
            Self::Typed(xsd_type) => Some(RdfNode::xsd_literal(value, xsd_type)),
            Self::Uri => IriRef::parse(value).ok().map(|_| RdfNode::uri(value)),
            Self::UriIfHttp if value.starts_with("http") && Iri::parse(value).is_ok() => {
                Some(RdfNode::uri(value))
            },
            Self::UriIfHttp => Some(RdfNode::literal(value)),
        }
    }
}

/// Joins a namespace and a local term into a predicate IRI.
#[must_use]
pub fn term(namespace: &str, local: &str) -> String {
    format!("{namespace}{local}")
}

/// Reads a field holding one or several values.
///
/// Accepts a JSON array, a string containing a JSON array, a
/// comma-separated string or a single scalar. Empty entries are dropped.
#[must_use]
pub fn list_values(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(value_text)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.starts_with('[') {
                if let Ok(parsed @ Value::Array(_)) = serde_json::from_str::<Value>(trimmed) {
                    return list_values(&parsed);
                }
            }
            trimmed
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        },
        other => value_text(other).map(|s| vec![s.into_owned()]).unwrap_or_default(),
    }
}

impl RdfGraph {
    /// Adds `subject predicate value` unless the value is empty or not a
    /// usable IRI.
    ///
    /// Returns true if a new triple was added.
    pub fn add_value(
        &mut self,
        subject: &RdfNode,
        predicate: &str,
        value: &str,
        kind: ObjectKind<'_>,
    ) -> bool {
        if value.is_empty() {
            return false;
        }
        match kind.node(value) {
            Some(node) => self.add(subject.clone(), predicate, node),
            None => {
                warn!("Dropping invalid IRI {value:?} for {predicate}");
                false
            },
        }
    }

    /// Adds one triple per non-empty value.
    ///
    /// Returns the number of triples added.
    pub fn add_values<I, S>(
        &mut self,
        subject: &RdfNode,
        predicate: &str,
        values: I,
        kind: ObjectKind<'_>,
    ) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        values
            .into_iter()
            .filter(|v| self.add_value(subject, predicate, v.as_ref(), kind))
            .count()
    }

    /// Adds the first non-empty field among `names` of `record`.
    pub fn add_field<R: FieldSource + ?Sized>(
        &mut self,
        subject: &RdfNode,
        predicate: &str,
        record: &R,
        names: &[&str],
        kind: ObjectKind<'_>,
    ) -> bool {
        match record.first_text(names) {
            Some(value) => self.add_value(subject, predicate, &value, kind),
            None => false,
        }
    }

    /// Adds every value of a list field (see [`list_values`]).
    pub fn add_list_field<R: FieldSource + ?Sized>(
        &mut self,
        subject: &RdfNode,
        predicate: &str,
        record: &R,
        name: &str,
        kind: ObjectKind<'_>,
    ) -> usize {
        match record.field(name) {
            Some(value) => self.add_values(subject, predicate, list_values(value), kind),
            None => 0,
        }
    }

    /// Adds the first date field among `names`, normalized to `xsd:dateTime`
    /// or kept as a plain literal when it cannot be parsed.
    pub fn add_date<R: FieldSource + ?Sized>(
        &mut self,
        subject: &RdfNode,
        predicate: &str,
        record: &R,
        names: &[&str],
    ) -> bool {
        match record.first_text(names) {
            Some(raw) => self.add(subject.clone(), predicate, dates::normalize(&raw)),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dcat::namespaces::{dct, spdx, xsd, DCT, SPDX};
    use crate::record::Resource;
    use serde_json::json;

    fn subject() -> RdfNode {
        RdfNode::uri("http://example.org/ds")
    }

    #[test]
    fn test_empty_values_are_skipped() {
        let mut graph = RdfGraph::new();
        let title = term(DCT, dct::TITLE);
        assert!(!graph.add_value(&subject(), &title, "", ObjectKind::Literal));
        assert!(graph.is_empty());
    }

    #[test]
    fn test_uri_if_http() {
        let algorithm = term(SPDX, spdx::ALGORITHM);
        let mut graph = RdfGraph::new();
        graph.add_value(
            &subject(),
            &algorithm,
            "http://spdx.org/rdf/terms#checksumAlgorithm_sha1",
            ObjectKind::UriIfHttp,
        );
        graph.add_value(&subject(), &algorithm, "sha1", ObjectKind::UriIfHttp);

        let subject = subject();
        let objects: Vec<_> = graph.objects(&subject, &algorithm).collect();
        assert_eq!(objects.len(), 2);
        assert!(objects[0].is_uri());
        assert_eq!(objects[1], &RdfNode::literal("sha1"));
    }

    #[test]
    fn test_uri_if_http_needs_absolute_iri() {
        assert_eq!(ObjectKind::UriIfHttp.node("http"), Some(RdfNode::literal("http")));
        assert_eq!(
            ObjectKind::UriIfHttp.node("http://bad uri"),
            Some(RdfNode::literal("http://bad uri"))
        );
        assert_eq!(
            ObjectKind::UriIfHttp.node("https://x.ch/a"),
            Some(RdfNode::uri("https://x.ch/a"))
        );
    }

    #[test]
    fn test_invalid_uri_is_dropped() {
        let publisher = term(DCT, dct::PUBLISHER);
        let mut graph = RdfGraph::new();
        let malformed = "Velo Team <velo@zuerich.ch>";
        assert!(!graph.add_value(&subject(), &publisher, malformed, ObjectKind::Uri));
        assert!(graph.is_empty());

        assert!(graph.add_value(&subject(), &publisher, "velo@zuerich.ch", ObjectKind::Uri));
        assert_eq!(
            graph.object(&subject(), &publisher),
            Some(&RdfNode::uri("velo@zuerich.ch"))
        );
    }

    #[test]
    fn test_typed_literal() {
        let node = ObjectKind::Typed(xsd::DECIMAL).node("1024.0").unwrap();
        assert_eq!(
            node.datatype(),
            Some("http://www.w3.org/2001/XMLSchema#decimal")
        );
    }

    #[test]
    fn test_list_values_shapes() {
        assert_eq!(list_values(&json!(["a", "", "b"])), vec!["a", "b"]);
        assert_eq!(list_values(&json!(r#"["x", "y"]"#)), vec!["x", "y"]);
        assert_eq!(list_values(&json!("x, y ,")), vec!["x", "y"]);
        assert_eq!(list_values(&json!("single")), vec!["single"]);
        assert_eq!(list_values(&json!(7)), vec!["7"]);
        assert!(list_values(&Value::Null).is_empty());
    }

    #[test]
    fn test_add_field_fallback_and_dates() {
        let mut resource = Resource::default();
        resource.set_field("created", "04.03.2015");
        resource.set_field("title", "");
        resource.set_field("name", "Velozählung");

        let mut graph = RdfGraph::new();
        let title = term(DCT, dct::TITLE);
        assert!(graph.add_field(
            &subject(),
            &title,
            &resource,
            &["title", "name"],
            ObjectKind::Lang("de"),
        ));
        assert_eq!(
            graph.object(&subject(), &title),
            Some(&RdfNode::literal_with_lang("Velozählung", "de"))
        );

        let issued = term(DCT, dct::ISSUED);
        assert!(graph.add_date(&subject(), &issued, &resource, &["created"]));
        assert_eq!(
            graph.object(&subject(), &issued).map(RdfNode::value),
            Some("2015-03-04T00:00:00")
        );
        assert!(!graph.add_date(&subject(), &issued, &resource, &["last_modified"]));
    }
}
