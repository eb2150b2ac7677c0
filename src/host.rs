//! Contract with the host cataloging platform.
//!
//! The host owns dataset storage, authorization and search. The theme only
//! needs a couple of read operations from it, expressed by [`CatalogApi`].
//! [`MemoryCatalog`] serves a fixed set of datasets, e.g. a `package_show`
//! dump loaded by the command line tool.

use indexmap::IndexMap;
use thiserror::Error;

use crate::record::{Dataset, Resource};

/// Failure reported by a host action.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The object does not exist.
    #[error("{0} not found")]
    NotFound(String),
    /// The acting user may not see or change the object.
    #[error("not authorized to access {0}")]
    NotAuthorized(String),
    /// Anything else.
    #[error("{0}")]
    Other(String),
}

/// Read access to datasets and resources on the host platform.
pub trait CatalogApi {
    /// Returns the dataset with the given id or name.
    ///
    /// # Errors
    ///
    /// [`HostError::NotFound`] for unknown datasets, [`HostError::NotAuthorized`]
    /// when the acting user may not read it.
    fn package_show(&self, id_or_name: &str) -> std::result::Result<Dataset, HostError>;

    /// Returns the resource with the given id.
    ///
    /// # Errors
    ///
    /// Same as [`CatalogApi::package_show`].
    fn resource_show(&self, id: &str) -> std::result::Result<Resource, HostError>;
}

/// A read-only catalog backed by an in-memory list of datasets.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    datasets: Vec<Dataset>,
    /// Dataset names the acting user may not read.
    restricted: Vec<String>,
    /// resource id -> (dataset index, resource index)
    resource_index: IndexMap<String, (usize, usize)>,
}

impl MemoryCatalog {
    /// Creates a catalog serving `datasets`.
    #[must_use]
    pub fn new(datasets: Vec<Dataset>) -> Self {
        let mut resource_index = IndexMap::new();
        for (d, dataset) in datasets.iter().enumerate() {
            for (r, resource) in dataset.resources.iter().enumerate() {
                if let Some(id) = resource.id() {
                    resource_index.insert(id.to_string(), (d, r));
                }
            }
        }
        Self {
            datasets,
            restricted: Vec::new(),
            resource_index,
        }
    }

    /// Marks a dataset (by name) as not readable for the acting user.
    #[must_use]
    pub fn with_restricted(mut self, name: impl Into<String>) -> Self {
        self.restricted.push(name.into());
        self
    }

    /// Number of datasets served.
    #[must_use]
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    /// Returns true if no datasets are served.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    fn check_access(&self, dataset: &Dataset) -> std::result::Result<(), HostError> {
        if self.restricted.iter().any(|n| Some(n.as_str()) == dataset.name()) {
            return Err(HostError::NotAuthorized(
                dataset.name().unwrap_or_default().to_string(),
            ));
        }
        Ok(())
    }
}

impl CatalogApi for MemoryCatalog {
    fn package_show(&self, id_or_name: &str) -> std::result::Result<Dataset, HostError> {
        let dataset = self
            .datasets
            .iter()
            .find(|d| d.id() == Some(id_or_name) || d.name() == Some(id_or_name))
            .ok_or_else(|| HostError::NotFound(format!("Dataset {id_or_name}")))?;
        self.check_access(dataset)?;
        Ok(dataset.clone())
    }

    fn resource_show(&self, id: &str) -> std::result::Result<Resource, HostError> {
        let (d, r) = self
            .resource_index
            .get(id)
            .copied()
            .ok_or_else(|| HostError::NotFound(format!("Resource {id}")))?;
        let dataset = &self.datasets[d];
        self.check_access(dataset)?;
        Ok(dataset.resources[r].clone())
    }
}
