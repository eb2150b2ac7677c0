//! Storage maintenance.
//!
//! Two jobs remove data whose resource no longer exists on the host:
//!
//! - [`cleanup_datastore`] empties datastore tables of deleted resources.
//!   The tables themselves are kept, only their rows go.
//! - [`cleanup_filestore`] deletes uploaded files of deleted resources and
//!   then removes storage directories left empty.
//!
//! Both support a dry run that only reports what would be deleted.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ThemeError};
use crate::host::{CatalogApi, HostError};

/// Number of table metadata records fetched per page.
pub const PAGE_SIZE: usize = 100;

/// One row of the datastore's table metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMetadata {
    /// Table name, equal to the resource id.
    pub name: String,
    /// Set for alias entries pointing at another table.
    #[serde(default)]
    pub alias_of: Option<String>,
}

impl TableMetadata {
    /// Returns true for alias entries.
    #[must_use]
    pub fn is_alias(&self) -> bool {
        self.alias_of.as_deref().is_some_and(|a| !a.is_empty())
    }
}

/// Datastore operations needed by the cleanup.
pub trait DatastoreApi {
    /// Returns up to [`PAGE_SIZE`] metadata rows starting at `offset`.
    ///
    /// # Errors
    ///
    /// Any datastore failure.
    fn table_metadata(&self, offset: usize) -> std::result::Result<Vec<TableMetadata>, HostError>;

    /// Deletes all rows of a table, keeping the table.
    ///
    /// # Errors
    ///
    /// Any datastore failure.
    fn datastore_delete(&mut self, resource_id: &str) -> std::result::Result<(), HostError>;
}

/// Result of a datastore cleanup run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatastoreCleanupReport {
    /// Metadata pages read.
    pub pages: usize,
    /// Tables whose resource is gone.
    pub orphaned: Vec<String>,
    /// Tables emptied.
    pub deleted: Vec<String>,
    /// Tables that could not be emptied, with the reason.
    pub failed: Vec<(String, String)>,
}

/// Empties datastore tables whose resource no longer exists.
///
/// Metadata is paged until an empty page comes back; alias rows are
/// skipped. A paging failure stops collection but tables found so far are
/// still processed. Individual delete failures are recorded and do not
/// stop the run.
///
/// # Errors
///
/// [`ThemeError::NotAuthorized`] if the acting user may not read the
/// table metadata.
pub fn cleanup_datastore<C, D>(
    catalog: &C,
    datastore: &mut D,
    dry_run: bool,
) -> Result<DatastoreCleanupReport>
where
    C: CatalogApi + ?Sized,
    D: DatastoreApi + ?Sized,
{
    let mut report = DatastoreCleanupReport::default();
    let mut offset = 0;
    loop {
        info!("Load metadata records from datastore (offset: {offset})");
        let page = match datastore.table_metadata(offset) {
            Ok(page) => page,
            Err(HostError::NotAuthorized(msg)) => return Err(ThemeError::NotAuthorized(msg)),
            Err(e) => {
                error!("Error while gathering resources: {e}");
                break;
            },
        };
        if page.is_empty() {
            break;
        }
        report.pages += 1;
        offset += page.len();

        for table in page.iter().filter(|t| !t.is_alias()) {
            match catalog.resource_show(&table.name) {
                Ok(_) => debug!("Resource '{}' found", table.name),
                Err(HostError::NotFound(_)) => {
                    info!("Resource '{}' *not* found", table.name);
                    report.orphaned.push(table.name.clone());
                },
                Err(HostError::NotAuthorized(_)) => {
                    warn!("Not authorized to read resource '{}'", table.name);
                },
                Err(e) => error!("Error while handling record {}: {e}", table.name),
            }
        }
    }

    if dry_run {
        info!("Dry run: {} tables would be emptied", report.orphaned.len());
        return Ok(report);
    }
    for resource_id in &report.orphaned {
        match datastore.datastore_delete(resource_id) {
            Ok(()) => {
                info!("Table '{resource_id}' deleted (not dropped)");
                report.deleted.push(resource_id.clone());
            },
            Err(e) => {
                error!("Error while deleting datastore resource {resource_id}: {e}");
                report.failed.push((resource_id.clone(), e.to_string()));
            },
        }
    }
    info!("Deleted content of {} tables", report.deleted.len());
    Ok(report)
}

/// Datastore held in memory, loadable from a JSON list of metadata rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryDatastore {
    tables: Vec<TableMetadata>,
    #[serde(skip)]
    emptied: Vec<String>,
}

impl MemoryDatastore {
    /// Creates a datastore listing `tables`.
    #[must_use]
    pub fn new(tables: Vec<TableMetadata>) -> Self {
        Self {
            tables,
            emptied: Vec::new(),
        }
    }

    /// Tables emptied so far.
    #[must_use]
    pub fn emptied(&self) -> &[String] {
        &self.emptied
    }
}

impl DatastoreApi for MemoryDatastore {
    fn table_metadata(&self, offset: usize) -> std::result::Result<Vec<TableMetadata>, HostError> {
        Ok(self.tables.iter().skip(offset).take(PAGE_SIZE).cloned().collect())
    }

    fn datastore_delete(&mut self, resource_id: &str) -> std::result::Result<(), HostError> {
        if !self.tables.iter().any(|t| t.name == resource_id) {
            return Err(HostError::NotFound(format!("Table {resource_id}")));
        }
        self.emptied.push(resource_id.to_string());
        Ok(())
    }
}

/// Result of a file store cleanup run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilestoreCleanupReport {
    /// Files whose resource still exists.
    pub kept: Vec<PathBuf>,
    /// Files of deleted resources, left in place by a dry run.
    pub deleted: Vec<PathBuf>,
    /// Empty storage directories removed.
    pub removed_dirs: Vec<PathBuf>,
}

/// Rebuilds a resource id from a stored file path.
///
/// Uploads live at `<root>/<aaa>/<bbb>/<rest>`; the id is `aaa+bbb+rest`.
#[must_use]
pub fn resource_id_from_path(path: &Path) -> Option<String> {
    let file = path.file_name()?.to_str()?;
    let parent = path.parent()?;
    let second = parent.file_name()?.to_str()?;
    let first = parent.parent()?.file_name()?.to_str()?;
    Some(format!("{first}{second}{file}"))
}

/// Deletes uploaded files of resources that no longer exist.
///
/// `resource_root` is the `resources` directory of the file store.
///
/// # Errors
///
/// IO failures, and any host failure other than "not found" since a
/// file must never be deleted on an uncertain answer.
pub fn cleanup_filestore<C: CatalogApi + ?Sized>(
    catalog: &C,
    resource_root: &Path,
    dry_run: bool,
) -> Result<FilestoreCleanupReport> {
    info!("Clean up file storage at {}", resource_root.display());
    let mut files = Vec::new();
    collect_files(resource_root, &mut files)?;
    files.sort();

    let mut report = FilestoreCleanupReport::default();
    for path in files {
        let Some(resource_id) = resource_id_from_path(&path) else {
            warn!("Skipping unexpected file {}", path.display());
            continue;
        };
        match catalog.resource_show(&resource_id) {
            Ok(_) => report.kept.push(path),
            Err(HostError::NotFound(_)) => report.deleted.push(path),
            Err(e) => return Err(e.into()),
        }
    }

    info!("{} files will be deleted", report.deleted.len());
    if dry_run {
        return Ok(report);
    }
    for path in &report.deleted {
        fs::remove_file(path)?;
        info!("- deleted: {}", path.display());
    }
    report.removed_dirs = remove_empty_directories(resource_root)?;
    info!("{} files are remaining in storage", report.kept.len());
    Ok(report)
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(&path, files)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}

/// Removes empty `<aaa>/<bbb>` directories, then `<aaa>` directories left
/// with no non-empty children.
///
/// # Errors
///
/// IO failures while listing or removing directories.
pub fn remove_empty_directories(resource_root: &Path) -> Result<Vec<PathBuf>> {
    let mut to_delete = Vec::new();
    for entry in fs::read_dir(resource_root)? {
        let dir = entry?.path();
        if !dir.is_dir() {
            continue;
        }
        let mut dir_empty = true;
        for sub in fs::read_dir(&dir)? {
            let sub = sub?.path();
            if sub.is_dir() && fs::read_dir(&sub)?.next().is_none() {
                to_delete.push(sub);
            } else {
                dir_empty = false;
            }
        }
        if dir_empty {
            to_delete.push(dir);
        }
    }
    info!("{} directories will be deleted", to_delete.len());
    for dir in &to_delete {
        fs::remove_dir(dir)?;
        info!("- deleted {}", dir.display());
    }
    Ok(to_delete)
}
