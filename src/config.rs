//! Theme configuration.
//!
//! [`ThemeConfig`] mirrors the host settings the theme reads (site URL,
//! frontend URL, default locale, DCAT organization slug, storage path) and
//! [`RdfFormat`] selects the export serialization.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ThemeError};

/// Output format for RDF serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RdfFormat {
    /// RDF/XML format (application/rdf+xml) - Most compatible with legacy systems
    #[serde(alias = "xml")]
    RdfXml,
    /// JSON-LD format (application/ld+json) - Modern, readable, web-friendly
    JsonLd,
    /// Turtle format (text/turtle) - Compact, human-friendly
    #[default]
    Turtle,
    /// N-Triples format (application/n-triples) - Simple, line-based
    NTriples,
}

impl fmt::Display for RdfFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RdfXml => write!(f, "RDF/XML"),
            Self::JsonLd => write!(f, "JSON-LD"),
            Self::Turtle => write!(f, "Turtle"),
            Self::NTriples => write!(f, "N-Triples"),
        }
    }
}

impl FromStr for RdfFormat {
    type Err = ThemeError;

    /// Accepts the file extensions and MIME types the host's `/catalog.{ext}`
    /// endpoints understand.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "xml" | "rdf" | "rdfxml" | "application/rdf+xml" => Ok(Self::RdfXml),
            "jsonld" | "json-ld" | "application/ld+json" => Ok(Self::JsonLd),
            "ttl" | "turtle" | "text/turtle" => Ok(Self::Turtle),
            "nt" | "ntriples" | "n-triples" | "application/n-triples" => Ok(Self::NTriples),
            other => Err(ThemeError::InvalidConfig(format!(
                "unknown RDF format '{other}'"
            ))),
        }
    }
}

impl RdfFormat {
    /// Returns the MIME type for this RDF format.
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::RdfXml => "application/rdf+xml",
            Self::JsonLd => "application/ld+json",
            Self::Turtle => "text/turtle",
            Self::NTriples => "application/n-triples",
        }
    }

    /// Returns the typical file extension for this RDF format.
    #[must_use]
    pub const fn file_extension(&self) -> &'static str {
        match self {
            Self::RdfXml => "rdf",
            Self::JsonLd => "jsonld",
            Self::Turtle => "ttl",
            Self::NTriples => "nt",
        }
    }
}

/// Configuration for the theme.
///
/// # Examples
///
/// ```ignore
/// use ogdzh::config::{RdfFormat, ThemeConfig};
///
/// let config = ThemeConfig::new()
///     .with_site_url("https://data.stadt-zuerich.ch")
///     .with_organization_slug("stadt-zurich")
///     .with_output_format(RdfFormat::Turtle);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Public base URL of the catalog (`ckan.site_url`), without trailing slash.
    pub site_url: String,

    /// Base URL of the public frontend used in rewritten download links.
    pub frontend_url: String,

    /// Default catalog language, used for language-tagged literals.
    pub locale_default: String,

    /// Organization slug appended to DCAT identifiers (`{id}@{slug}`).
    pub organization_slug: String,

    /// Root of the host's file storage; uploads live under `resources/`.
    pub storage_path: Option<PathBuf>,

    /// Downloads are served by an S3 filestore instead of local storage.
    pub s3_filestore: bool,

    /// JSON file with canned per-format resource descriptions.
    pub descriptions_path: Option<PathBuf>,

    /// Output format for RDF serialization.
    pub output_format: RdfFormat,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            site_url: String::new(),
            frontend_url: String::new(),
            locale_default: "de".to_string(),
            organization_slug: String::new(),
            storage_path: None,
            s3_filestore: false,
            descriptions_path: None,
            output_format: RdfFormat::default(),
        }
    }
}

impl ThemeConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration from a JSON file; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// resulting configuration is invalid.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let mut config: Self = serde_json::from_str(&text)?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Sets the public site URL.
    #[must_use]
    pub fn with_site_url(mut self, url: impl Into<String>) -> Self {
        self.site_url = url.into();
        self.normalize();
        self
    }

    /// Sets the frontend URL used in download links.
    #[must_use]
    pub fn with_frontend_url(mut self, url: impl Into<String>) -> Self {
        self.frontend_url = url.into();
        self.normalize();
        self
    }

    /// Sets the default locale.
    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale_default = locale.into();
        self
    }

    /// Sets the DCAT organization slug.
    #[must_use]
    pub fn with_organization_slug(mut self, slug: impl Into<String>) -> Self {
        self.organization_slug = slug.into();
        self
    }

    /// Sets the storage root.
    #[must_use]
    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = Some(path.into());
        self
    }

    /// Enables S3 filestore redirects for downloads.
    #[must_use]
    pub const fn with_s3_filestore(mut self, enabled: bool) -> Self {
        self.s3_filestore = enabled;
        self
    }

    /// Sets the output format.
    #[must_use]
    pub const fn with_output_format(mut self, format: RdfFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Checks the settings the export profiles depend on.
    ///
    /// # Errors
    ///
    /// [`ThemeError::InvalidConfig`] if the site URL is set but not an
    /// absolute http(s) URL, or the locale is empty.
    pub fn validate(&self) -> Result<()> {
        if !self.site_url.is_empty() {
            let parsed = url::Url::parse(&self.site_url).map_err(|e| {
                ThemeError::InvalidConfig(format!("site_url '{}': {e}", self.site_url))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ThemeError::InvalidConfig(format!(
                    "site_url '{}' must use http or https",
                    self.site_url
                )));
            }
        }
        if self.locale_default.trim().is_empty() {
            return Err(ThemeError::InvalidConfig(
                "locale_default must not be empty".into(),
            ));
        }
        Ok(())
    }

    fn normalize(&mut self) {
        while self.site_url.ends_with('/') {
            self.site_url.pop();
        }
        while self.frontend_url.ends_with('/') {
            self.frontend_url.pop();
        }
    }
}
