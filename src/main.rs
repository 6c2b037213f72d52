// Inherit lint configuration from lib.rs for consistency
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::items_after_statements,
    clippy::too_many_lines,
    clippy::similar_names
)]

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use uuid::Uuid;

use docmark::cli::commands::{Cli, Command};
use docmark::cli::output::{self, DocumentSummary, SectionOutline};
use docmark::config::Config;
use docmark::decode::ocr::{OcrEngine, TesseractOcr};
use docmark::error::DocmarkError;
use docmark::export::{self, ExportFormat};
use docmark::history::HistoryStore;
use docmark::models::{FileType, ParsedDocument};
use docmark::pipeline::{DocumentAssembler, DocumentInput};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::fmt::Display>> {
    match cli.command {
        Command::Convert {
            file,
            no_history,
            quiet,
        } => cmd_convert(&file, no_history, quiet),
        Command::History { limit } => cmd_history(limit),
        Command::Show { id, markdown } => cmd_show(&id, markdown),
        Command::Search { term } => cmd_search(&term),
        Command::Export { id, format, output } => cmd_export(&id, &format, output.as_deref()),
        Command::Remove { id } => cmd_remove(&id),
        Command::Clear => cmd_clear(),
        Command::Sections { file } => cmd_sections(&file),
        Command::Supported => cmd_supported(),
    }
}

type CmdResult = Result<(), Box<dyn std::fmt::Display>>;

fn map_err(e: impl std::fmt::Display + 'static) -> Box<dyn std::fmt::Display> {
    Box::new(e.to_string())
}

fn get_config() -> Result<Config, Box<dyn std::fmt::Display>> {
    Config::from_cwd().map_err(map_err)
}

fn open_store(config: &Config) -> HistoryStore {
    HistoryStore::with_bound(
        &config.history_path,
        config.settings.history.max_documents,
    )
}

fn parse_id(id: &str) -> Result<Uuid, Box<dyn std::fmt::Display>> {
    Uuid::parse_str(id).map_err(|e| map_err(format!("invalid document id {id}: {e}")))
}

fn lookup<'a>(
    store: &'a HistoryStore,
    id: Uuid,
) -> Result<&'a ParsedDocument, Box<dyn std::fmt::Display>> {
    store
        .get(id)
        .ok_or_else(|| map_err(DocmarkError::DocumentNotFound { id: id.to_string() }))
}

/// Run the full pipeline over one file, releasing the OCR worker
/// before returning.
fn run_pipeline(config: &Config, file: &str, quiet: bool) -> Result<ParsedDocument, Box<dyn std::fmt::Display>> {
    let input = DocumentInput::from_path(Path::new(file)).map_err(map_err)?;
    let ocr: Arc<dyn OcrEngine> = Arc::new(TesseractOcr::new(
        config.settings.ocr.binary.clone(),
        config.settings.ocr.lang.clone(),
    ));
    let assembler = DocumentAssembler::new(ocr.clone());

    let progress = move |percent: u8, message: &str| {
        if !quiet {
            eprintln!("[{percent:>3}%] {message}");
        }
    };

    let rt = tokio::runtime::Runtime::new().map_err(map_err)?;
    rt.block_on(async {
        let result = assembler.parse(&input, Some(&progress)).await;
        if let Err(e) = ocr.cleanup().await {
            tracing::warn!(error = %e, "ocr cleanup failed");
        }
        result
    })
    .map_err(map_err)
}

fn cmd_convert(file: &str, no_history: bool, quiet: bool) -> CmdResult {
    let config = get_config()?;
    let doc = run_pipeline(&config, file, quiet)?;

    if !no_history {
        let mut store = open_store(&config);
        store.add_document(doc.clone()).map_err(map_err)?;
    }

    println!(
        "{}",
        output::format_for(&DocumentSummary::from(&doc), &config.settings.output.format)
    );
    Ok(())
}

fn cmd_history(limit: usize) -> CmdResult {
    let config = get_config()?;
    let store = open_store(&config);

    #[derive(serde::Serialize)]
    struct HistoryOutput {
        count: usize,
        documents: Vec<DocumentSummary>,
    }

    let documents: Vec<DocumentSummary> = store
        .documents()
        .iter()
        .take(limit)
        .map(DocumentSummary::from)
        .collect();
    println!(
        "{}",
        output::format_for(
            &HistoryOutput {
                count: documents.len(),
                documents,
            },
            &config.settings.output.format
        )
    );
    Ok(())
}

fn cmd_show(id: &str, markdown: bool) -> CmdResult {
    let config = get_config()?;
    let store = open_store(&config);
    let doc = lookup(&store, parse_id(id)?)?;

    if markdown {
        println!("{}", doc.markdown_content);
    } else {
        println!("{}", output::format_for(doc, &config.settings.output.format));
    }
    Ok(())
}

fn cmd_search(term: &str) -> CmdResult {
    let config = get_config()?;
    let store = open_store(&config);

    #[derive(serde::Serialize)]
    struct SearchOutput {
        term: String,
        count: usize,
        documents: Vec<DocumentSummary>,
    }

    let documents: Vec<DocumentSummary> = store
        .search(term)
        .into_iter()
        .map(DocumentSummary::from)
        .collect();
    println!(
        "{}",
        output::format_for(
            &SearchOutput {
                term: term.to_string(),
                count: documents.len(),
                documents,
            },
            &config.settings.output.format
        )
    );
    Ok(())
}

fn cmd_export(id: &str, format: &str, output_path: Option<&str>) -> CmdResult {
    let config = get_config()?;
    let store = open_store(&config);
    let doc = lookup(&store, parse_id(id)?)?;
    let format = ExportFormat::parse(format).map_err(map_err)?;

    let written = export::export_to_file(doc, format, output_path.map(Path::new)).map_err(map_err)?;

    #[derive(serde::Serialize)]
    struct ExportOutput {
        id: Uuid,
        path: String,
    }
    println!(
        "{}",
        output::format_json(&ExportOutput {
            id: doc.id,
            path: written.display().to_string(),
        })
    );
    Ok(())
}

fn cmd_remove(id: &str) -> CmdResult {
    let config = get_config()?;
    let mut store = open_store(&config);
    let removed = store.remove(parse_id(id)?).map_err(map_err)?;
    println!("{{\"removed\":{removed}}}");
    Ok(())
}

fn cmd_clear() -> CmdResult {
    let config = get_config()?;
    let mut store = open_store(&config);
    store.clear().map_err(map_err)?;
    println!("{{\"cleared\":true}}");
    Ok(())
}

fn cmd_sections(file: &str) -> CmdResult {
    let config = get_config()?;
    let doc = run_pipeline(&config, file, true)?;

    #[derive(serde::Serialize)]
    struct SectionsOutput {
        file: String,
        count: usize,
        sections: Vec<SectionOutline>,
    }

    let sections: Vec<SectionOutline> = doc.sections.iter().map(SectionOutline::from).collect();
    println!(
        "{}",
        output::format_for(
            &SectionsOutput {
                file: file.to_string(),
                count: sections.len(),
                sections,
            },
            &config.settings.output.format
        )
    );
    Ok(())
}

fn cmd_supported() -> CmdResult {
    #[derive(serde::Serialize)]
    struct SupportedType {
        format: &'static str,
        extensions: &'static [&'static str],
        mime_type: &'static str,
    }
    #[derive(serde::Serialize)]
    struct SupportedOutput {
        types: Vec<SupportedType>,
    }

    let types = FileType::all()
        .iter()
        .map(|t| SupportedType {
            format: t.as_str(),
            extensions: t.extensions(),
            mime_type: t.mime_type(),
        })
        .collect();
    println!("{}", output::format_json(&SupportedOutput { types }));
    Ok(())
}
