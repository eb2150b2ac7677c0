//! Export orchestration.
//!
//! An [`ExportPipeline`] owns the list of profiles to apply and runs each
//! profile's named steps in order against one dataset. Work happens on a
//! staged copy of the caller's graph, which is only replaced when every step
//! succeeded, so a failing dataset leaves the graph as it was.

use std::fmt;
use std::str::FromStr;

use log::{debug, error};

use crate::config::ThemeConfig;
use crate::descriptions::ResourceDescriptions;
use crate::error::{Result, ThemeError};
use crate::record::Dataset;

use super::rdf::{RdfGraph, RdfNode};
use super::{schemaorg, swiss};

/// Signature shared by all profile steps.
pub type StepFn = fn(&ExportContext<'_>, &mut RdfGraph, &RdfNode, &Dataset) -> Result<()>;

/// One named transformation step.
#[derive(Clone, Copy)]
pub struct DatasetStep {
    /// Step name used in logs and reports.
    pub name: &'static str,
    /// The transformation.
    pub run: StepFn,
}

impl DatasetStep {
    /// Creates a step.
    #[must_use]
    pub const fn new(name: &'static str, run: StepFn) -> Self {
        Self { name, run }
    }
}

impl fmt::Debug for DatasetStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatasetStep").field("name", &self.name).finish()
    }
}

/// Read-only inputs shared by every step.
#[derive(Debug, Clone, Copy)]
pub struct ExportContext<'a> {
    /// Theme settings (site URL, locale, organization slug).
    pub config: &'a ThemeConfig,
    /// Canned resource descriptions.
    pub descriptions: &'a ResourceDescriptions,
}

/// Available export profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Profile {
    /// DCAT for the Swiss open government data portal.
    SwissDcat,
    /// Schema.org `Dataset` markup.
    SchemaOrg,
}

impl Profile {
    /// Registered profile name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SwissDcat => "stadtzh_swiss_dcat",
            Self::SchemaOrg => "stadtzh_schemaorg",
        }
    }

    /// Steps in emission order.
    #[must_use]
    pub const fn steps(self) -> &'static [DatasetStep] {
        match self {
            Self::SwissDcat => swiss::STEPS,
            Self::SchemaOrg => schemaorg::STEPS,
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Profile {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stadtzh_swiss_dcat" | "swiss_dcat" | "dcat" => Ok(Self::SwissDcat),
            "stadtzh_schemaorg" | "schemaorg" | "schema.org" => Ok(Self::SchemaOrg),
            other => Err(ThemeError::InvalidConfig(format!(
                "unknown export profile '{other}'"
            ))),
        }
    }
}

/// Net number of triples one step contributed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    /// Profile the step belongs to.
    pub profile: Profile,
    /// Step name.
    pub name: &'static str,
    /// Triples the step left in the dataset's staging graph, after
    /// removals.
    pub net_triples: isize,
}

/// Counters for one export call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    /// Steps that ran, in order.
    pub steps: Vec<StepReport>,
}

impl ExportReport {
    /// Net triples added by all steps.
    #[must_use]
    pub fn total_triples(&self) -> isize {
        self.steps.iter().map(|s| s.net_triples).sum()
    }

    /// Report entry for a step, if it ran.
    #[must_use]
    pub fn step(&self, profile: Profile, name: &str) -> Option<&StepReport> {
        self.steps
            .iter()
            .find(|s| s.profile == profile && s.name == name)
    }

    /// Appends the entries of another report.
    pub fn merge(&mut self, other: Self) {
        self.steps.extend(other.steps);
    }
}

/// Caller-owned orchestrator applying one or more profiles.
#[derive(Debug, Clone)]
pub struct ExportPipeline<'a> {
    context: ExportContext<'a>,
    profiles: Vec<Profile>,
}

impl<'a> ExportPipeline<'a> {
    /// Creates a pipeline with no profiles.
    #[must_use]
    pub fn new(config: &'a ThemeConfig, descriptions: &'a ResourceDescriptions) -> Self {
        Self {
            context: ExportContext {
                config,
                descriptions,
            },
            profiles: Vec::new(),
        }
    }

    /// Adds a profile; profiles run in the order they were added.
    #[must_use]
    pub fn with_profile(mut self, profile: Profile) -> Self {
        if !self.profiles.contains(&profile) {
            self.profiles.push(profile);
        }
        self
    }

    /// Profiles this pipeline applies.
    #[must_use]
    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    /// Shared step inputs.
    #[must_use]
    pub const fn context(&self) -> &ExportContext<'a> {
        &self.context
    }

    /// Maps one dataset into `graph`, rooted at `dataset_ref`.
    ///
    /// Steps write into a staging graph holding only this dataset's triples,
    /// which is merged into `graph` once every step succeeded.
    ///
    /// # Errors
    ///
    /// Returns the first step error; `graph` is left untouched in that case.
    pub fn graph_from_dataset(
        &self,
        dataset: &Dataset,
        dataset_ref: &RdfNode,
        graph: &mut RdfGraph,
    ) -> Result<ExportReport> {
        let mut staged = graph.stage();
        let mut report = ExportReport::default();
        let label = dataset.name().or(dataset.id()).unwrap_or("<unnamed>");

        for profile in &self.profiles {
            for step in profile.steps() {
                let before = staged.len();
                debug!("{profile}: running step '{}' for dataset '{label}'", step.name);
                if let Err(e) = (step.run)(&self.context, &mut staged, dataset_ref, dataset) {
                    error!(
                        "{profile}: step '{}' failed for dataset '{label}': {e}",
                        step.name
                    );
                    return Err(e);
                }
                report.steps.push(StepReport {
                    profile: *profile,
                    name: step.name,
                    net_triples: count_delta(before, staged.len()),
                });
            }
        }

        graph.commit(staged);
        Ok(report)
    }

    /// Adds the catalog node for the DCAT profile.
    pub fn graph_from_catalog(&self, catalog_ref: &RdfNode, graph: &mut RdfGraph) {
        if self.profiles.contains(&Profile::SwissDcat) {
            swiss::catalog(graph, catalog_ref);
        }
    }
}

fn count_delta(before: usize, after: usize) -> isize {
    let before = isize::try_from(before).unwrap_or(isize::MAX);
    let after = isize::try_from(after).unwrap_or(isize::MAX);
    after - before
}
