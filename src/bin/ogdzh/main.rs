#![allow(clippy::print_stderr, clippy::print_stdout)]
use crate::cli::{Args, Command};
use anyhow::{bail, Context};
use clap::Parser;
use ogdzh::cleanup::{cleanup_datastore, cleanup_filestore, MemoryDatastore, TableMetadata};
use ogdzh::dcat::{
    dataset_uri, graph_from_catalog, ExportPipeline, ExportReport, Profile, RdfGraph, RdfNode,
};
use ogdzh::download::{resolve_download, DownloadResponse};
use ogdzh::record::{parse_datasets, Dataset};
use ogdzh::vocabulary::{ensure_vocabularies, MemoryVocabularyStore};
use ogdzh::{MemoryCatalog, RdfFormat, ResourceDescriptions, ThemeConfig};
use std::fs::{self, File};
use std::io::{stdout, BufWriter, Write};
use std::path::Path;

mod cli;

pub fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = Args::parse();
    let config = match &matches.config {
        Some(path) => ThemeConfig::from_json_file(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => ThemeConfig::default(),
    };

    match matches.command {
        Command::Export {
            files,
            profile,
            format,
            output,
            catalog,
            report,
        } => {
            let format = match format {
                Some(name) => name.parse::<RdfFormat>()?,
                None => config.output_format,
            };
            let descriptions = ResourceDescriptions::from_config(&config)
                .context("Failed to load resource descriptions")?;
            let mut pipeline = ExportPipeline::new(&config, &descriptions);
            for name in &profile {
                pipeline = pipeline.with_profile(name.parse::<Profile>()?);
            }

            let mut datasets = Vec::new();
            for file in &files {
                datasets.extend(load_datasets(file)?);
            }

            let mut graph = RdfGraph::new();
            let export_report = if catalog {
                graph_from_catalog(&pipeline, &datasets, &mut graph)?
            } else {
                let mut export_report = ExportReport::default();
                for dataset in &datasets {
                    let dataset_ref = RdfNode::uri(dataset_uri(&config, dataset)?);
                    export_report.merge(
                        pipeline
                            .graph_from_dataset(dataset, &dataset_ref, &mut graph)
                            .with_context(|| {
                                format!(
                                    "Failed to export dataset {}",
                                    dataset.name().unwrap_or("<unnamed>")
                                )
                            })?,
                    );
                }
                export_report
            };

            if let Some(path) = output {
                let file = File::create(&path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                graph.serialize_to_writer(BufWriter::new(file), format)?;
            } else {
                graph.serialize_to_writer(stdout().lock(), format)?;
            }

            if report {
                for step in &export_report.steps {
                    eprintln!("{}\t{}\t{}", step.profile, step.name, step.net_triples);
                }
                eprintln!(
                    "{} datasets, {} triples",
                    datasets.len(),
                    export_report.total_triples()
                );
            }
            Ok(())
        },
        Command::Download {
            datasets,
            package,
            resource,
        } => {
            let catalog = MemoryCatalog::new(load_datasets(&datasets)?);
            let response = resolve_download(&catalog, &config, &package, &resource)?;
            let mut out = stdout().lock();
            match &response {
                DownloadResponse::File {
                    path,
                    download_name,
                    content_type,
                } => writeln!(
                    out,
                    "{} {} as {download_name} ({})",
                    response.status(),
                    path.display(),
                    content_type.as_deref().unwrap_or("application/octet-stream")
                )?,
                other => writeln!(out, "{} {other}", other.status())?,
            }
            Ok(())
        },
        Command::CleanupFilestore {
            datasets,
            storage_path,
            dry_run,
        } => {
            let Some(storage) = storage_path.or_else(|| config.storage_path.clone()) else {
                bail!("No storage path configured, use --storage-path")
            };
            let resource_root = storage.join("resources");
            if !resource_root.is_dir() {
                bail!("{} is not a directory", resource_root.display())
            }
            let catalog = MemoryCatalog::new(load_datasets(&datasets)?);
            let report = cleanup_filestore(&catalog, &resource_root, dry_run)?;
            println!(
                "{} files deleted, {} kept, {} directories removed",
                report.deleted.len(),
                report.kept.len(),
                report.removed_dirs.len()
            );
            Ok(())
        },
        Command::CleanupDatastore {
            datasets,
            tables,
            dry_run,
        } => {
            let catalog = MemoryCatalog::new(load_datasets(&datasets)?);
            let rows: Vec<TableMetadata> = serde_json::from_str(&read(&tables)?)
                .with_context(|| format!("Invalid table metadata in {}", tables.display()))?;
            let mut datastore = MemoryDatastore::new(rows);
            let report = cleanup_datastore(&catalog, &mut datastore, dry_run)?;
            for table in &report.orphaned {
                println!("{table}");
            }
            if !report.failed.is_empty() {
                bail!("{} tables could not be emptied", report.failed.len())
            }
            Ok(())
        },
        Command::Vocabularies { state } => {
            let mut store = MemoryVocabularyStore::load(&state)?;
            let report = ensure_vocabularies(&mut store)?;
            store
                .save(&state)
                .with_context(|| format!("Failed to write {}", state.display()))?;
            println!(
                "created: {:?}, skipped: {:?}, tags: {}",
                report.created_vocabularies, report.skipped_vocabularies, report.created_tags
            );
            Ok(())
        },
    }
}

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn load_datasets(path: &Path) -> anyhow::Result<Vec<Dataset>> {
    let payload = serde_json::from_str(&read(path)?)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    let datasets = parse_datasets(payload)
        .with_context(|| format!("No datasets in {}", path.display()))?;
    if datasets.is_empty() {
        bail!("{} contains no datasets", path.display())
    }
    Ok(datasets)
}
