//! Namespace definitions and vocabulary terms used by the export profiles.
//!
//! Predicates are built as `format!("{DCT}{}", dct::TITLE)` so every term is
//! spelled out exactly once.

/// Dublin Core terms namespace.
pub const DCT: &str = "http://purl.org/dc/terms/";

/// DCAT namespace.
pub const DCAT: &str = "http://www.w3.org/ns/dcat#";

/// Asset Description Metadata Schema namespace.
pub const ADMS: &str = "http://www.w3.org/ns/adms#";

/// vCard namespace.
pub const VCARD: &str = "http://www.w3.org/2006/vcard/ns#";

/// FOAF namespace.
pub const FOAF: &str = "http://xmlns.com/foaf/0.1/";

/// Schema.org namespace.
pub const SCHEMA: &str = "http://schema.org/";

/// OWL time namespace.
pub const TIME: &str = "http://www.w3.org/2006/time";

/// SKOS namespace.
pub const SKOS: &str = "http://www.w3.org/2004/02/skos/core#";

/// ISA location core namespace.
pub const LOCN: &str = "http://www.w3.org/ns/locn#";

/// GeoSPARQL namespace.
pub const GSP: &str = "http://www.opengis.net/ont/geosparql#";

/// OWL namespace.
pub const OWL: &str = "http://www.w3.org/2002/07/owl#";

/// SPDX namespace.
pub const SPDX: &str = "http://spdx.org/rdf/terms#";

/// RDF namespace.
pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// RDF Schema namespace.
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";

/// XML Schema namespace.
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

/// Base of the opendata.swiss theme vocabulary.
pub const OGD_THEMES: &str = "http://opendata.swiss/themes/";

/// Prefixes bound on every DCAT export graph.
pub const DCAT_PREFIXES: &[(&str, &str)] = &[
    ("dct", DCT),
    ("dcat", DCAT),
    ("adms", ADMS),
    ("vcard", VCARD),
    ("foaf", FOAF),
    ("schema", SCHEMA),
    ("time", TIME),
    ("skos", SKOS),
    ("locn", LOCN),
    ("gsp", GSP),
    ("owl", OWL),
    ("spdx", SPDX),
    ("xsd", XSD),
];

/// Prefixes bound on every Schema.org export graph.
pub const SCHEMA_ORG_PREFIXES: &[(&str, &str)] = &[("schema", SCHEMA), ("xsd", XSD)];

/// RDF and RDFS terms.
pub mod rdf {
    /// rdf:type
    pub const TYPE: &str = "type";
    /// rdf:Description
    pub const DESCRIPTION: &str = "Description";
    /// rdfs:label
    pub const LABEL: &str = "label";
}

/// XML Schema datatypes.
pub mod xsd {
    /// xsd:date
    pub const DATE: &str = "date";
    /// xsd:dateTime
    pub const DATE_TIME: &str = "dateTime";
    /// xsd:decimal
    pub const DECIMAL: &str = "decimal";
    /// xsd:hexBinary
    pub const HEX_BINARY: &str = "hexBinary";
}

/// Dublin Core terms.
pub mod dct {
    /// `PeriodOfTime` class.
    pub const PERIOD_OF_TIME: &str = "PeriodOfTime";
    /// identifier
    pub const IDENTIFIER: &str = "identifier";
    /// title
    pub const TITLE: &str = "title";
    /// description
    pub const DESCRIPTION: &str = "description";
    /// language
    pub const LANGUAGE: &str = "language";
    /// modified
    pub const MODIFIED: &str = "modified";
    /// issued
    pub const ISSUED: &str = "issued";
    /// `accrualPeriodicity`
    pub const ACCRUAL_PERIODICITY: &str = "accrualPeriodicity";
    /// temporal
    pub const TEMPORAL: &str = "temporal";
    /// `accessRights`
    pub const ACCESS_RIGHTS: &str = "accessRights";
    /// rights
    pub const RIGHTS: &str = "rights";
    /// license
    pub const LICENSE: &str = "license";
    /// `conformsTo`
    pub const CONFORMS_TO: &str = "conformsTo";
    /// format
    pub const FORMAT: &str = "format";
    /// publisher
    pub const PUBLISHER: &str = "publisher";
}

/// DCAT terms.
pub mod dcat {
    /// Catalog class.
    pub const CATALOG: &str = "Catalog";
    /// Dataset class.
    pub const DATASET: &str = "Dataset";
    /// dataset (catalog membership)
    pub const DATASET_PROPERTY: &str = "dataset";
    /// Distribution class.
    pub const DISTRIBUTION_CLASS: &str = "Distribution";
    /// `landingPage`
    pub const LANDING_PAGE: &str = "landingPage";
    /// theme
    pub const THEME: &str = "theme";
    /// `contactPoint`
    pub const CONTACT_POINT: &str = "contactPoint";
    /// keyword
    pub const KEYWORD: &str = "keyword";
    /// distribution
    pub const DISTRIBUTION: &str = "distribution";
    /// `mediaType`
    pub const MEDIA_TYPE: &str = "mediaType";
    /// `accessURL`
    pub const ACCESS_URL: &str = "accessURL";
    /// `downloadURL`
    pub const DOWNLOAD_URL: &str = "downloadURL";
    /// `byteSize`
    pub const BYTE_SIZE: &str = "byteSize";
}

/// Schema.org terms.
pub mod schema {
    /// Dataset class.
    pub const DATASET: &str = "Dataset";
    /// `DataDownload` class.
    pub const DATA_DOWNLOAD: &str = "DataDownload";
    /// Organization class.
    pub const ORGANIZATION: &str = "Organization";
    /// identifier
    pub const IDENTIFIER: &str = "identifier";
    /// name
    pub const NAME: &str = "name";
    /// description
    pub const DESCRIPTION: &str = "description";
    /// version
    pub const VERSION: &str = "version";
    /// url
    pub const URL: &str = "url";
    /// `contentUrl`
    pub const CONTENT_URL: &str = "contentUrl";
    /// `inLanguage`
    pub const IN_LANGUAGE: &str = "inLanguage";
    /// keywords
    pub const KEYWORDS: &str = "keywords";
    /// `datePublished`
    pub const DATE_PUBLISHED: &str = "datePublished";
    /// `dateModified`
    pub const DATE_MODIFIED: &str = "dateModified";
    /// `dateCreated`
    pub const DATE_CREATED: &str = "dateCreated";
    /// publisher
    pub const PUBLISHER: &str = "publisher";
    /// distribution
    pub const DISTRIBUTION: &str = "distribution";
    /// `encodingFormat`
    pub const ENCODING_FORMAT: &str = "encodingFormat";
    /// `contentSize`
    pub const CONTENT_SIZE: &str = "contentSize";
    /// text
    pub const TEXT: &str = "text";
    /// `sourceOrganization`
    pub const SOURCE_ORGANIZATION: &str = "sourceOrganization";
    /// author
    pub const AUTHOR: &str = "author";
    /// `spatialCoverage`
    pub const SPATIAL_COVERAGE: &str = "spatialCoverage";
    /// `temporalCoverage`
    pub const TEMPORAL_COVERAGE: &str = "temporalCoverage";
    /// `startDate`
    pub const START_DATE: &str = "startDate";
    /// `endDate`
    pub const END_DATE: &str = "endDate";
}

/// vCard terms.
pub mod vcard {
    /// Organization class.
    pub const ORGANIZATION: &str = "Organization";
    /// `hasEmail`
    pub const HAS_EMAIL: &str = "hasEmail";
    /// fn (formatted name)
    pub const FN: &str = "fn";
}

/// SPDX terms.
pub mod spdx {
    /// Checksum class.
    pub const CHECKSUM_CLASS: &str = "Checksum";
    /// checksum
    pub const CHECKSUM: &str = "checksum";
    /// `checksumValue`
    pub const CHECKSUM_VALUE: &str = "checksumValue";
    /// algorithm
    pub const ALGORITHM: &str = "algorithm";
}

/// ADMS terms.
pub mod adms {
    /// status
    pub const STATUS: &str = "status";
}

/// OWL terms.
pub mod owl {
    /// `versionInfo`
    pub const VERSION_INFO: &str = "versionInfo";
}
