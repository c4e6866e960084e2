use regex::Captures;

use crate::mapping::Mapping;
use crate::model::{Document, Paragraph, Run};
use crate::placeholder;

/// A filled copy of a template.
#[derive(Clone, Debug)]
pub struct Filled {
    pub document: Document,
    /// Paragraphs that had at least one placeholder substituted.
    pub paragraphs_changed: usize,
}

/// Values must not smuggle in new placeholder tokens: `[X]` becomes `(X)`.
fn neutralize(value: &str) -> String {
    placeholder::pattern()
        .replace_all(value, "(${1})")
        .into_owned()
}

fn fill_paragraph(para: &mut Paragraph, mapping: &Mapping) -> bool {
    let text = para.text();
    let mut hit = false;
    let new_text = placeholder::pattern()
        .replace_all(&text, |caps: &Captures| match mapping.value(&caps[1]) {
            Some(value) => {
                hit = true;
                neutralize(value)
            }
            None => caps[0].to_string(),
        })
        .into_owned();
    if !hit {
        return false;
    }

    // The paragraph collapses to one run styled like its first run.
    let run = match para.runs.first() {
        Some(first) => Run {
            text: new_text,
            ..first.clone()
        },
        None => Run::new(new_text),
    };
    para.set_single_run(run);
    true
}

/// Substitute every mapped placeholder in a copy of `doc`. The input is left untouched
/// so one template can serve many fills.
pub fn fill(doc: &Document, mapping: &Mapping) -> Filled {
    let mut document = doc.clone();
    let mut paragraphs_changed = 0;
    for para in document.paragraphs_mut() {
        if fill_paragraph(para, mapping) {
            paragraphs_changed += 1;
        }
    }
    log::info!("Completed {paragraphs_changed} paragraph replacements");
    Filled {
        document,
        paragraphs_changed,
    }
}
