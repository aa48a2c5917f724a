//! The single-pass conversion orchestrator.

use std::time::Instant;

use tracing::{debug, info};

use crate::engine::balancer::BlockBalancer;
use crate::engine::error::ConvertError;
use crate::engine::resolver::MappingResolver;
use crate::parser::{Element, tokenize};
use crate::types::{
    ConversionMetrics, ConversionResult, IssueKind, MappingReportEntry, MappingSources,
    ValidationError,
};

/// Converts an element sequence into the target dialect.
///
/// Makes one forward pass over `elements`. Text is copied unchanged, merge
/// fields are resolved against `sources`, and control tags are balanced into
/// block delimiters. Emitted tokens are concatenated directly, so whitespace
/// in the output comes only from text elements.
///
/// Per-element problems never abort the pass: the offending tag is emitted
/// verbatim and recorded in [`ConversionResult::errors`]. The only failure is
/// [`ConvertError::MalformedElement`] for elements that could not have come
/// from the tokenizer.
///
/// # Example
///
/// ```
/// use tagbridge::{Element, MappingSources, convert};
///
/// let sources = MappingSources::builder()
///     .direct([("Name", "contact.name")].into_iter().collect())
///     .build();
/// let elements = vec![Element::text("Dear "), Element::merge_field("Name")];
///
/// let result = convert(&elements, &sources).unwrap();
/// assert_eq!(result.converted, "Dear {{contact.name}}");
/// assert_eq!(result.report.len(), 1);
/// ```
pub fn convert(
    elements: &[Element],
    sources: &MappingSources,
) -> Result<ConversionResult, ConvertError> {
    let started = Instant::now();
    validate_elements(elements)?;

    if elements.is_empty() {
        debug!("empty element sequence; nothing to convert");
        return Ok(ConversionResult {
            converted: String::new(),
            report: Vec::new(),
            errors: vec![ValidationError::general(
                IssueKind::EmptyInput,
                "the document is empty or no elements were extracted",
            )],
            metrics: ConversionMetrics {
                elapsed: started.elapsed(),
                ..ConversionMetrics::default()
            },
        });
    }

    let mut pass = ConversionPass::new(sources);
    for (index, element) in elements.iter().enumerate() {
        pass.step(index, element);
    }
    let result = pass.finish(elements.len(), started);

    info!(
        elements = result.metrics.element_count,
        report_entries = result.report.len(),
        issues = result.errors.len(),
        has_errors = result.has_errors(),
        "conversion finished"
    );
    Ok(result)
}

/// Tokenizes `text` and converts it in one call.
pub fn convert_text(text: &str, sources: &MappingSources) -> Result<ConversionResult, ConvertError> {
    let elements: Vec<Element> = tokenize(text).collect();
    convert(&elements, sources)
}

/// Mutable state of one conversion pass.
struct ConversionPass<'a> {
    sources: &'a MappingSources,
    resolver: MappingResolver<'a>,
    balancer: BlockBalancer<'a>,
    output: String,
    report: Vec<MappingReportEntry>,
    errors: Vec<ValidationError>,
    merge_fields: usize,
    control_tags: usize,
}

impl<'a> ConversionPass<'a> {
    fn new(sources: &'a MappingSources) -> Self {
        Self {
            sources,
            resolver: MappingResolver::new(sources),
            balancer: BlockBalancer::new(sources),
            output: String::new(),
            report: Vec::new(),
            errors: Vec::new(),
            merge_fields: 0,
            control_tags: 0,
        }
    }

    fn step(&mut self, index: usize, element: &Element) {
        match element {
            Element::Text { content } => self.output.push_str(content),
            Element::MergeField {
                original_tag,
                field_name,
            } => self.merge_field(index, original_tag, field_name),
            Element::ControlTag {
                original_tag,
                control_type,
                parameter,
            } => self.control_tag(index, original_tag, control_type, parameter.as_deref()),
        }
    }

    fn merge_field(&mut self, index: usize, original_tag: &str, field_name: &str) {
        self.merge_fields += 1;
        let resolution = self
            .resolver
            .resolve_in(field_name, self.balancer.current_section());
        debug!(index, tag = original_tag, method = %resolution.method, "merge field");

        match &resolution.target {
            Some(target) => self.output.push_str(target),
            None => {
                self.output.push_str(original_tag);
                let message = if self.sources.is_query_field(field_name) {
                    format!(
                        "merge field '{original_tag}' is selected by the query context but could not be mapped"
                    )
                } else {
                    format!("merge field '{original_tag}' could not be mapped using available rules")
                };
                self.errors.push(ValidationError::at(
                    IssueKind::UnmappedField,
                    index,
                    original_tag,
                    message,
                ));
            }
        }

        self.report.push(MappingReportEntry {
            source_tag: original_tag.to_string(),
            target_tag: resolution.target,
            method: resolution.method,
            note: resolution.note,
            element_index: index,
        });
    }

    fn control_tag(
        &mut self,
        index: usize,
        original_tag: &str,
        control_type: &str,
        parameter: Option<&str>,
    ) {
        self.control_tags += 1;
        let outcome = self
            .balancer
            .apply(index, original_tag, control_type, parameter);
        debug!(
            index,
            tag = original_tag,
            method = %outcome.entry.method,
            depth = self.balancer.open_blocks().len(),
            "control tag"
        );

        self.output.push_str(&outcome.output);
        self.report.push(outcome.entry);
        self.errors.extend(outcome.issue);
    }

    fn finish(self, element_count: usize, started: Instant) -> ConversionResult {
        let mut errors = self.errors;
        errors.extend(self.balancer.finish());

        ConversionResult {
            converted: self.output,
            report: self.report,
            errors,
            metrics: ConversionMetrics {
                element_count,
                merge_field_count: self.merge_fields,
                control_tag_count: self.control_tags,
                elapsed: started.elapsed(),
            },
        }
    }
}

/// Rejects elements that violate the tokenizer's guarantees.
fn validate_elements(elements: &[Element]) -> Result<(), ConvertError> {
    for (index, element) in elements.iter().enumerate() {
        let reason = match element {
            Element::Text { .. } => None,
            Element::MergeField {
                original_tag,
                field_name,
            } => {
                if original_tag.is_empty() {
                    Some("merge field has an empty original tag".to_string())
                } else if field_name.trim() != field_name {
                    Some(format!("field name '{field_name}' is not trimmed"))
                } else {
                    None
                }
            }
            Element::ControlTag {
                original_tag,
                control_type,
                parameter,
            } => {
                if original_tag.is_empty() {
                    Some("control tag has an empty original tag".to_string())
                } else if control_type.trim() != control_type {
                    Some(format!("control type '{control_type}' is not trimmed"))
                } else if let Some(parameter) = parameter {
                    if parameter.trim().is_empty() {
                        Some("parameter is present but blank".to_string())
                    } else if parameter.trim() != parameter {
                        Some(format!("parameter '{parameter}' is not trimmed"))
                    } else {
                        None
                    }
                } else {
                    None
                }
            }
        };

        if let Some(reason) = reason {
            return Err(ConvertError::MalformedElement { index, reason });
        }
    }
    Ok(())
}
