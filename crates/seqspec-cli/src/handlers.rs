//! Subcommand handlers
//!
//! Each handler reads its inputs, delegates the actual work to
//! `seqspec-core`, and returns the process exit code: 0 for success or a
//! valid result, 1 for validation failures. Operational failures surface as
//! errors and exit with 2.

use crate::cli::{CheckArgs, GenerateArgs, OutputFormat, ValidateArgs};
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use indexmap::IndexMap;
use seqspec_core::{
    generate_specs, validate_document, validate_documents, validate_generated, validate_syntax,
};
use std::fs;
use std::path::Path;
use tracing::info;

fn read_input(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(fs::read_to_string(path)?)
}

/// Generate per-service OpenAPI documents from a diagram file
pub fn handle_generate(args: GenerateArgs, output: &mut OutputWriter) -> Result<i32> {
    let source = read_input(&args.diagram)?;
    let documents = generate_specs(&source);
    info!(services = documents.len(), "generated documents");

    match args.out_dir {
        Some(dir) => {
            fs::create_dir_all(&dir)?;
            for (service, document) in &documents {
                let (extension, rendered) = match output.format() {
                    OutputFormat::Yaml => ("yaml", serde_yaml::to_string(document)?),
                    OutputFormat::Json => ("json", document.to_json()?),
                    _ => ("json", document.to_json_pretty()?),
                };
                let file = dir.join(format!("{service}.{extension}"));
                fs::write(&file, rendered)?;
                output.note(&format!("wrote {}", file.display()))?;
            }
            Ok(0)
        }
        None => {
            output.emit_documents(&documents)?;
            Ok(0)
        }
    }
}

/// Validate diagram syntax, optionally also the generated documents
pub fn handle_validate(args: ValidateArgs, output: &mut OutputWriter) -> Result<i32> {
    let source = read_input(&args.diagram)?;
    let mut result = validate_syntax(&source);

    if args.specs {
        let documents = generate_specs(&source);
        info!(services = documents.len(), "validating generated documents");
        result.merge(validate_generated(&documents));
    }

    output.emit_result(&result)?;
    Ok(if result.valid { 0 } else { 1 })
}

/// Validate externally supplied OpenAPI JSON documents
pub fn handle_check(args: CheckArgs, output: &mut OutputWriter) -> Result<i32> {
    let mut documents: IndexMap<String, serde_json::Value> = IndexMap::new();
    for path in &args.documents {
        let raw = read_input(path)?;
        let value = serde_json::from_str(&raw).map_err(|err| Error::InvalidJson {
            path: path.clone(),
            message: err.to_string(),
        })?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        documents.insert(name, value);
    }

    let result = if documents.len() == 1 {
        let (_, document) = documents.first().expect("one document");
        validate_document(document)
    } else {
        validate_documents(&documents)
    };

    output.emit_result(&result)?;
    Ok(if result.valid { 0 } else { 1 })
}
