pub mod docx;
mod error;
pub mod fields;
pub mod fill;
pub mod mapping;
pub mod model;
pub mod placeholder;
pub mod report;
pub mod resolve;

pub use error::{Error, Result};
pub use fields::{FieldDictionary, FieldValue};
pub use fill::{Filled, fill};
pub use mapping::{Entry, Mapping, Resolution, Source, Tier};
pub use model::{Block, Document, Paragraph, Run, Table, TableCell, TableRow};
pub use placeholder::extract;
pub use report::Report;
pub use resolve::{Resolver, ResolverConfig};

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

#[derive(Clone, Debug, Default)]
pub struct FillOptions {
    pub resolver: ResolverConfig,
    /// Manual values applied on top of the resolver's output.
    pub overrides: BTreeMap<String, String>,
}

#[derive(Clone, Debug)]
pub struct FillOutcome {
    pub document: Document,
    pub mapping: Mapping,
    pub report: Report,
    pub paragraphs_changed: usize,
}

/// Extract, resolve, apply overrides and fill. The template is not modified.
pub fn fill_template(template: &Document, fields: &FieldDictionary, options: &FillOptions) -> FillOutcome {
    let placeholders = placeholder::extract(template);
    let resolver = Resolver::new(options.resolver.clone());
    let mut mapping = resolver.resolve_all(&placeholders, fields);
    if !options.overrides.is_empty() {
        let applied = mapping.apply_overrides(&options.overrides);
        log::info!("Applied {applied} manual overrides");
    }
    let report = report::report(&placeholders, &mapping, fields);
    let Filled {
        document,
        paragraphs_changed,
    } = fill(template, &mapping);
    FillOutcome {
        document,
        mapping,
        report,
        paragraphs_changed,
    }
}

pub fn fill_template_file(
    input: &Path,
    fields: &FieldDictionary,
    output: &Path,
    options: &FillOptions,
) -> Result<Report> {
    let t0 = Instant::now();

    let template = docx::parse(input)?;
    let t_parse = t0.elapsed();

    let outcome = fill_template(&template, fields, options);
    let t_fill = t0.elapsed();

    docx::write(&outcome.document, output)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: parse={:.1}ms, fill={:.1}ms, write={:.1}ms, total={:.1}ms ({})",
        t_parse.as_secs_f64() * 1000.0,
        (t_fill - t_parse).as_secs_f64() * 1000.0,
        (t_total - t_fill).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        outcome.report.summary(),
    );

    Ok(outcome.report)
}
