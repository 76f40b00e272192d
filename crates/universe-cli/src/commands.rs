use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, info_span, trace};

use universe_cli::edits::{apply_edits, collect_edits};
use universe_cli::logging::redact_value;
use universe_core::{
    CommitMode, CreateOutcome, PipelineOptions, UniverseRequest, UploadLimits,
    create_universe_with_progress, prepare_with_progress,
};
use universe_ingest::{IngestOptions, IngestSummary, inspect_path_with_progress};
use universe_map::{MappingRow, MappingState, MappingSummary};
use universe_model::Taxonomy;
use universe_store::JsonFileStore;

use crate::cli::{CreateArgs, EditArgs, InspectArgs, MapArgs};
use crate::progress::{byte_bar, record_bar};
use crate::summary::{print_created, print_fields, print_ingest_summary, print_mapping};

/// Mapping as printed by `map --json`.
#[derive(Serialize)]
struct MapReport<'a> {
    records: usize,
    fingerprint: &'a str,
    summary: MappingSummary,
    rows: Vec<MappingRow>,
}

pub fn run_fields(taxonomy: &Taxonomy) -> Result<()> {
    info!(categories = taxonomy.categories().len(), fields = taxonomy.len(), "listing fields");
    print_fields(taxonomy);
    Ok(())
}

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let path = &args.source.file;
    let span = info_span!("inspect", source = %path.display());
    let _guard = span.enter();

    let options = IngestOptions::default()
        .with_delimiter(args.source.delimiter)
        .with_values(args.values);
    let summary = inspect_with_bar(path, &options)?;
    trace_samples(&summary);

    if args.json {
        let json = serde_json::to_string_pretty(&summary).context("serialize summary")?;
        println!("{json}");
    } else {
        print_ingest_summary(&summary);
    }
    Ok(())
}

pub fn run_map(args: &MapArgs, taxonomy: Taxonomy) -> Result<()> {
    let path = &args.source.file;
    let span = info_span!("map", source = %path.display());
    let _guard = span.enter();

    let options = IngestOptions::default().with_delimiter(args.source.delimiter);
    let summary = inspect_with_bar(path, &options)?;

    let mut state = MappingState::from_suggestions(taxonomy, summary.headers.clone());
    apply_cli_edits(&mut state, &args.edits)?;

    if args.json {
        let report = MapReport {
            records: summary.record_count,
            fingerprint: &summary.fingerprint,
            summary: state.summary(),
            rows: state.rows(),
        };
        let json = serde_json::to_string_pretty(&report).context("serialize mapping")?;
        println!("{json}");
    } else {
        print_mapping(&state);
    }
    Ok(())
}

pub fn run_create(args: &CreateArgs, taxonomy: Taxonomy) -> Result<CreateOutcome> {
    let path = &args.source.file;
    let span = info_span!("create", name = %args.name, source = %path.display());
    let _guard = span.enter();

    let options = PipelineOptions {
        ingest: IngestOptions::default()
            .with_delimiter(args.source.delimiter)
            .with_values(true),
        limits: UploadLimits::from_megabytes(args.max_size_mb),
        commit_mode: if args.compensate {
            CommitMode::Compensating
        } else {
            CommitMode::Legacy
        },
        insert_batch_size: args.batch_size,
    };
    let request = UniverseRequest::new(args.name.clone(), args.kind.clone()).with_source(path);

    // =========================================================================
    // Stage 1: validate, inspect and auto-map
    // =========================================================================
    let file_len = std::fs::metadata(path).map(|meta| meta.len()).unwrap_or(0);
    let bar = byte_bar(file_len, "reading");
    let prepared = prepare_with_progress(&request, taxonomy, &options, |offset| {
        bar.set_position(offset);
    });
    bar.finish_and_clear();
    let mut prepared = prepared.context("prepare upload")?;
    trace_samples(&prepared.summary);

    // =========================================================================
    // Stage 2: review edits
    // =========================================================================
    apply_cli_edits(&mut prepared.state, &args.edits)?;
    print_mapping(&prepared.state);

    // =========================================================================
    // Stage 3: create and insert
    // =========================================================================
    let mut store = JsonFileStore::open(&args.store)
        .with_context(|| format!("open store {}", args.store.display()))?;
    let bar = record_bar(prepared.summary.record_count as u64, "inserting");
    let outcome = create_universe_with_progress(&mut store, &prepared, &options, |done, _| {
        bar.set_position(done as u64);
    });
    bar.finish_and_clear();
    let outcome = outcome.context("create universe")?;

    info!(
        collection_id = %outcome.collection.id,
        records = outcome.inserted,
        store = %store.root().display(),
        "stored universe"
    );
    print_created(&outcome);
    Ok(outcome)
}

fn inspect_with_bar(path: &Path, options: &IngestOptions) -> Result<IngestSummary> {
    let len = std::fs::metadata(path).map(|meta| meta.len()).unwrap_or(0);
    let bar = byte_bar(len, "reading");
    let summary = inspect_path_with_progress(path, options, |offset| bar.set_position(offset));
    bar.finish_and_clear();
    summary.with_context(|| format!("read {}", path.display()))
}

fn apply_cli_edits(state: &mut MappingState, edits: &EditArgs) -> Result<()> {
    let edits = collect_edits(edits.mapping.as_deref(), &edits.set, &edits.unset)?;
    if !edits.is_empty() {
        info!(edits = edits.len(), "applying mapping edits");
    }
    apply_edits(state, &edits)
}

fn trace_samples(summary: &IngestSummary) {
    for header in &summary.headers {
        if let Some(sample) = summary.values_for(header).and_then(|values| values.first()) {
            trace!(header = %header, sample = redact_value(sample), "column sample");
        }
    }
}
