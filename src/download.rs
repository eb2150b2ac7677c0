//! Download permalinks.
//!
//! `GET /dataset/<package>/download/<resource name>` addresses a resource
//! by its name instead of its id, so the link survives a resource being
//! deleted and uploaded again.
//!
//! # Examples
//!
//! ```ignore
//! use ogdzh::download::{parse_permalink_path, resolve_download};
//!
//! let (package, resource) = parse_permalink_path("/dataset/velo/download/data.csv")?;
//! let response = resolve_download(&catalog, &config, &package, &resource)?;
//! println!("{} {response}", response.status());
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::config::ThemeConfig;
use crate::error::{Result, ThemeError};
use crate::host::{CatalogApi, HostError};
use crate::record::Resource;

/// Message for unknown datasets and resources.
pub const RESOURCE_NOT_FOUND: &str = "Resource not found";
/// Message for resources the user may not read.
pub const NOT_AUTHORIZED: &str = "Not authorized to download resource";
/// Message for resources without a payload.
pub const NO_DOWNLOAD: &str = "No download is available";

const MAX_FILENAME_EXTENSION_LENGTH: usize = 21;
const MIN_FILENAME_TOTAL_LENGTH: usize = 3;
const MAX_FILENAME_TOTAL_LENGTH: usize = 100;

/// Outcome of a permalink request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadResponse {
    /// Serve a stored upload.
    File {
        /// Location in the file store.
        path: PathBuf,
        /// File name offered to the client (the resource name).
        download_name: String,
        /// Declared media type, if any.
        content_type: Option<String>,
    },
    /// Redirect to the given URL.
    Redirect(String),
    /// 404 with a message.
    NotFound(String),
    /// 403 with a message.
    Forbidden(String),
}

impl DownloadResponse {
    /// HTTP status code of the response.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::File { .. } => 200,
            Self::Redirect(_) => 302,
            Self::NotFound(_) => 404,
            Self::Forbidden(_) => 403,
        }
    }
}

impl fmt::Display for DownloadResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File { path, .. } => write!(f, "{}", path.display()),
            Self::Redirect(url) => write!(f, "{url}"),
            Self::NotFound(msg) | Self::Forbidden(msg) => write!(f, "{msg}"),
        }
    }
}

/// Splits `/dataset/<package>/download/<resource>` into its two names.
///
/// # Errors
///
/// [`ThemeError::NotFound`] if the path has a different shape.
pub fn parse_permalink_path(path: &str) -> Result<(String, String)> {
    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    match segments.as_slice() {
        ["dataset", package, "download", resource] if !package.is_empty() && !resource.is_empty() => {
            Ok(((*package).to_string(), (*resource).to_string()))
        },
        _ => Err(ThemeError::NotFound(format!("no permalink route for {path}"))),
    }
}

/// Location of an uploaded resource: `<root>/resources/<aaa>/<bbb>/<rest>`.
#[must_use]
pub fn upload_path(storage_path: &Path, resource_id: &str) -> PathBuf {
    let (first, rest) = split_at_char(resource_id, 3);
    let (second, rest) = split_at_char(rest, 3);
    storage_path
        .join("resources")
        .join(first)
        .join(second)
        .join(rest)
}

fn split_at_char(s: &str, n: usize) -> (&str, &str) {
    let idx = s.char_indices().nth(n).map_or(s.len(), |(i, _)| i);
    s.split_at(idx)
}

/// Resolves a permalink request.
///
/// The dataset is read as the acting user; the resource with the matching
/// name is then read by id to make sure it is visible too.
///
/// # Errors
///
/// Host failures other than "not found" and "not authorized", which map to
/// [`DownloadResponse::NotFound`] and [`DownloadResponse::Forbidden`].
pub fn resolve_download<C: CatalogApi + ?Sized>(
    catalog: &C,
    config: &ThemeConfig,
    package_name: &str,
    resource_name: &str,
) -> Result<DownloadResponse> {
    let resource = match lookup_resource(catalog, package_name, resource_name) {
        Ok(Some(resource)) => resource,
        Ok(None) | Err(HostError::NotFound(_)) => {
            debug!("No resource '{resource_name}' in dataset '{package_name}'");
            return Ok(DownloadResponse::NotFound(RESOURCE_NOT_FOUND.into()));
        },
        Err(HostError::NotAuthorized(_)) => {
            return Ok(DownloadResponse::Forbidden(NOT_AUTHORIZED.into()));
        },
        Err(e) => return Err(e.into()),
    };

    if config.s3_filestore {
        // the object store keys uploads by file name, not resource name
        let filename = resource.filename().unwrap_or(resource_name);
        let id = resource.id().unwrap_or_default();
        return Ok(DownloadResponse::Redirect(format!(
            "{}/dataset/{package_name}/resource/{id}/download/{}",
            config.site_url,
            munge_filename(filename)
        )));
    }

    if resource.is_upload() {
        let (Some(storage), Some(id)) = (&config.storage_path, resource.id()) else {
            warn!("Upload '{resource_name}' cannot be served without a storage path");
            return Ok(DownloadResponse::NotFound(NO_DOWNLOAD.into()));
        };
        let path = upload_path(storage, id);
        if !path.is_file() {
            warn!("Upload '{resource_name}' missing from file store at {}", path.display());
            return Ok(DownloadResponse::NotFound(NO_DOWNLOAD.into()));
        }
        info!("Serving '{resource_name}' of dataset '{package_name}'");
        return Ok(DownloadResponse::File {
            path,
            download_name: resource_name.to_string(),
            content_type: resource.mimetype().map(String::from),
        });
    }

    match resource.url() {
        Some(url) => Ok(DownloadResponse::Redirect(url.to_string())),
        None => Ok(DownloadResponse::NotFound(NO_DOWNLOAD.into())),
    }
}

fn lookup_resource<C: CatalogApi + ?Sized>(
    catalog: &C,
    package_name: &str,
    resource_name: &str,
) -> std::result::Result<Option<Resource>, HostError> {
    let dataset = catalog.package_show(package_name)?;
    let Some(id) = dataset
        .resources
        .iter()
        .find(|r| r.name() == Some(resource_name))
        .and_then(Resource::id)
    else {
        return Ok(None);
    };
    catalog.resource_show(id).map(Some)
}

/// Turns an arbitrary file name into a safe storage key.
///
/// Drops any directory part, lower-cases, replaces Latin-1 letters by ASCII
/// equivalents, keeps only `[a-z0-9_. -]`, turns spaces into `-` and
/// collapses runs of `-`. The extension is capped at 21 characters and the
/// whole name kept between 3 and 100 characters (padding with `_`).
#[must_use]
pub fn munge_filename(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or_default();
    let mut cleaned = String::with_capacity(base.len());
    for c in base.trim().to_lowercase().chars() {
        match ascii_equivalent(c) {
            Some(sub) => cleaned.push_str(sub),
            None if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') => cleaned.push(c),
            None if c == ' ' => cleaned.push('-'),
            None => {},
        }
    }
    let mut collapsed = String::with_capacity(cleaned.len());
    for c in cleaned.chars() {
        if c == '-' && collapsed.ends_with('-') {
            continue;
        }
        collapsed.push(c);
    }

    let (name, ext) = split_extension(&collapsed);
    let ext = &ext[..ext.len().min(MAX_FILENAME_EXTENSION_LENGTH)];
    let min = MIN_FILENAME_TOTAL_LENGTH.saturating_sub(ext.len()).max(1);
    let max = MAX_FILENAME_TOTAL_LENGTH - ext.len();
    let mut name = name.to_string();
    if name.len() < min {
        name.push_str(&"_".repeat(min - name.len()));
    }
    name.truncate(max);
    name + ext
}

/// Splits off the last `.ext`; leading dots do not start an extension.
fn split_extension(filename: &str) -> (&str, &str) {
    match filename.rfind('.') {
        Some(idx) if filename[..idx].chars().any(|c| c != '.') => filename.split_at(idx),
        _ => (filename, ""),
    }
}

fn ascii_equivalent(c: char) -> Option<&'static str> {
    Some(match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
        'æ' => "ae",
        'ç' => "c",
        'è' | 'é' | 'ê' | 'ë' => "e",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'ð' | 'þ' => "th",
        'ñ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => "o",
        'ù' | 'ú' | 'û' | 'ü' => "u",
        'ý' | 'ÿ' => "y",
        'ß' => "ss",
        _ => return None,
    })
}
