//! Validators for submitted dataset and resource values.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::error::{Result, ThemeError};
use crate::host::CatalogApi;
use crate::record::Resource;

lazy_static! {
    /// `dd.mm.yyyy` with an optional `, HH:MM` time.
    static ref DISPLAY_DATE: Regex =
        Regex::new(r"^[0-9]{2}\.[0-9]{2}\.[0-9]{4}(, [0-9]{2}:[0-9]{2})?$").unwrap();
    static ref EMAIL: Regex = Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$"
    )
    .unwrap();
}

/// Checks a resource URL.
///
/// Uploads are skipped: their `url` is a storage reference. Everything
/// else must be an absolute http(s) URL with a host.
///
/// # Errors
///
/// [`ThemeError::Validation`] on the `url` field.
pub fn validate_url(resource: &Resource) -> Result<()> {
    if resource.is_upload() {
        debug!("url_type is upload, skipping URL validation");
        return Ok(());
    }
    let Some(raw) = resource.url() else {
        return Ok(());
    };
    let parsed = url::Url::parse(raw)
        .map_err(|_| ThemeError::validation("url", format!("Please provide a valid URL: {raw}")))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(ThemeError::validation(
            "url",
            format!("Please provide a valid URL: {raw}"),
        ));
    }
    Ok(())
}

/// Returns the input if it is a display date (`dd.mm.yyyy[, HH:MM]`).
#[must_use]
pub fn validate_date(value: &str) -> Option<&str> {
    DISPLAY_DATE.is_match(value).then_some(value)
}

/// Returns the input if it is a syntactically valid e-mail address.
#[must_use]
pub fn validate_email(value: &str) -> Option<&str> {
    let value = value.trim();
    (value.len() <= 254 && EMAIL.is_match(value)).then_some(value)
}

/// Records the uploaded file's base name as the resource `filename`.
pub fn set_resource_filename(resource: &mut Resource, upload_filename: Option<&str>) {
    if !resource.is_upload() {
        return;
    }
    // Browsers on Windows may send the full client path.
    let base = upload_filename
        .and_then(|f| f.rsplit(['/', '\\']).next())
        .filter(|f| !f.is_empty());
    if let Some(base) = base {
        resource.set_field("filename", base);
    }
}

/// Rejects a new resource whose name is already used in its dataset.
///
/// Permalinks address resources by name, so names must stay unique.
///
/// # Errors
///
/// [`ThemeError::Validation`] on the `resources` field for duplicates, or
/// the host error if the dataset cannot be read.
pub fn ensure_unique_resource_name<C: CatalogApi + ?Sized>(
    catalog: &C,
    package_id: &str,
    resource: &Resource,
) -> Result<()> {
    let Some(name) = resource.name() else {
        return Ok(());
    };
    let dataset = catalog.package_show(package_id)?;
    if dataset.resources.iter().any(|r| r.name() == Some(name)) {
        return Err(ThemeError::validation(
            "resources",
            format!("The resource name \"{name}\" is already in use"),
        ));
    }
    Ok(())
}

/// Hook for resource creation: sets the filename and enforces unique names.
///
/// # Errors
///
/// See [`ensure_unique_resource_name`].
pub fn before_resource_create<C: CatalogApi + ?Sized>(
    catalog: &C,
    package_id: &str,
    resource: &mut Resource,
    upload_filename: Option<&str>,
) -> Result<()> {
    set_resource_filename(resource, upload_filename);
    ensure_unique_resource_name(catalog, package_id, resource)
}

/// Hook for resource updates: only refreshes the filename.
pub fn before_resource_update(resource: &mut Resource, upload_filename: Option<&str>) {
    set_resource_filename(resource, upload_filename);
}
