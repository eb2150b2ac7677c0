use clap::{Parser, Subcommand, ValueHint};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about, version, name = "ogdzh")]
/// Open Data Zurich catalog toolkit: RDF export, permalinks and storage maintenance
pub struct Args {
    /// Theme configuration file (JSON)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Export datasets as RDF
    Export {
        /// Dataset files as returned by `package_show` or `package_search`
        #[arg(required = true, value_hint = ValueHint::FilePath)]
        files: Vec<PathBuf>,
        /// Export profiles to apply, in order
        ///
        /// Either "stadtzh_swiss_dcat" or "stadtzh_schemaorg".
        #[arg(short, long, default_value = "stadtzh_swiss_dcat")]
        profile: Vec<String>,
        /// Output format
        ///
        /// It can be an extension like "ttl" or a MIME type like "application/rdf+xml".
        /// Defaults to the configured format.
        #[arg(short, long)]
        format: Option<String>,
        /// File to write to
        ///
        /// If no file is given, stdout is written.
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
        /// Also emit the catalog node and link every dataset to it
        #[arg(long)]
        catalog: bool,
        /// Print the per-step triple counts to stderr
        #[arg(long)]
        report: bool,
    },
    /// Resolve a download permalink without serving it
    Download {
        /// Dataset dump to resolve against
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        datasets: PathBuf,
        /// Dataset name
        package: String,
        /// Resource name
        resource: String,
    },
    /// Delete uploaded files whose resource no longer exists
    CleanupFilestore {
        /// Dataset dump listing every existing resource
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        datasets: PathBuf,
        /// Storage root, overriding the configured one
        #[arg(short, long, value_hint = ValueHint::DirPath)]
        storage_path: Option<PathBuf>,
        /// Only report what would be deleted
        #[arg(long)]
        dry_run: bool,
    },
    /// Empty datastore tables whose resource no longer exists
    CleanupDatastore {
        /// Dataset dump listing every existing resource
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        datasets: PathBuf,
        /// Table metadata dump (JSON list of `{"name", "alias_of"}` rows)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        tables: PathBuf,
        /// Only report what would be emptied
        #[arg(long)]
        dry_run: bool,
    },
    /// Create the updateInterval and dataType vocabularies if missing
    Vocabularies {
        /// Vocabulary state file, created if it does not exist
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        state: PathBuf,
    },
}
