//! Stack-based pairing of block openers and closers.

use crate::dialect::{close_block, open_block};
use crate::parser::ControlKind;
use crate::types::{
    IssueKind, MappingReportEntry, MappingSources, RepeatingSection, ResolutionMethod,
    ValidationError,
};

/// A block that has been opened and not yet closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenBlock<'a> {
    /// The opener's parameter as written in the source.
    pub parameter: String,
    /// The name used in the emitted `{{#...}}` delimiter.
    pub target: String,
    /// The opener as written in the source.
    pub source_tag: String,
    pub element_index: usize,
    /// The repeating section this block maps to, if declared.
    pub section: Option<&'a RepeatingSection>,
}

/// What the balancer decided for one control tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockOutcome {
    /// Text to append to the converted document.
    pub output: String,
    pub entry: MappingReportEntry,
    pub issue: Option<ValidationError>,
}

/// Rewrites control tags into target-dialect block delimiters.
///
/// The balancer owns the open-block stack for one conversion pass. Malformed
/// tags never abort the pass: they are emitted verbatim and reported.
/// Closers always close the innermost open block, whatever parameter they
/// name.
#[derive(Debug)]
pub struct BlockBalancer<'a> {
    sources: &'a MappingSources,
    stack: Vec<OpenBlock<'a>>,
}

impl<'a> BlockBalancer<'a> {
    pub fn new(sources: &'a MappingSources) -> Self {
        Self {
            sources,
            stack: Vec::new(),
        }
    }

    /// Blocks currently open, outermost first.
    pub fn open_blocks(&self) -> &[OpenBlock<'a>] {
        &self.stack
    }

    /// The innermost open block that maps to a repeating section.
    pub fn current_section(&self) -> Option<&'a RepeatingSection> {
        self.stack.iter().rev().find_map(|block| block.section)
    }

    /// Handles one control tag at element position `index`.
    pub fn apply(
        &mut self,
        index: usize,
        original_tag: &str,
        control_type: &str,
        parameter: Option<&str>,
    ) -> BlockOutcome {
        let kind = ControlKind::from_name(control_type);
        if kind.opens_block() {
            match parameter {
                Some(parameter) => self.open(index, original_tag, kind, parameter),
                None => missing_parameter(index, original_tag, control_type),
            }
        } else if kind.closes_block() {
            self.close(index, original_tag, parameter)
        } else {
            unhandled(index, original_tag, control_type)
        }
    }

    /// Ends the pass, reporting every block still open, innermost first.
    pub fn finish(self) -> Vec<ValidationError> {
        self.stack
            .into_iter()
            .rev()
            .map(|block| {
                ValidationError::at(
                    IssueKind::UnclosedBlock,
                    block.element_index,
                    &block.source_tag,
                    format!(
                        "block '{}' opened by '{}' is never closed",
                        block.parameter, block.source_tag
                    ),
                )
            })
            .collect()
    }

    fn open(
        &mut self,
        index: usize,
        original_tag: &str,
        kind: ControlKind,
        parameter: &str,
    ) -> BlockOutcome {
        let section = if kind == ControlKind::TableStart {
            self.sources.section_for_block(parameter)
        } else {
            None
        };
        let target = section.map_or(parameter, |s| s.target_path.as_str());
        let output = open_block(target);

        let block_name = if kind == ControlKind::TableStart {
            "table section"
        } else {
            "conditional block"
        };
        let note = match section {
            Some(section) => format!(
                "opens {block_name} '{parameter}' as repeating section '{}'",
                section.target_path
            ),
            None => format!("opens {block_name} '{parameter}'"),
        };

        self.stack.push(OpenBlock {
            parameter: parameter.to_string(),
            target: target.to_string(),
            source_tag: original_tag.to_string(),
            element_index: index,
            section,
        });

        BlockOutcome {
            entry: MappingReportEntry {
                source_tag: original_tag.to_string(),
                target_tag: Some(output.clone()),
                method: ResolutionMethod::ControlOpen,
                note: Some(note),
                element_index: index,
            },
            output,
            issue: None,
        }
    }

    fn close(&mut self, index: usize, original_tag: &str, parameter: Option<&str>) -> BlockOutcome {
        let Some(block) = self.stack.pop() else {
            return BlockOutcome {
                output: original_tag.to_string(),
                entry: MappingReportEntry {
                    source_tag: original_tag.to_string(),
                    target_tag: None,
                    method: ResolutionMethod::ControlClose,
                    note: Some("no open block to close".to_string()),
                    element_index: index,
                },
                issue: Some(ValidationError::at(
                    IssueKind::UnexpectedBlockEnd,
                    index,
                    original_tag,
                    format!("'{original_tag}' has no matching open block"),
                )),
            };
        };

        let output = close_block(&block.target);
        let (note, issue) = match parameter {
            Some(named) if named != block.parameter => (
                format!(
                    "names '{named}' but closes the innermost open block '{}'",
                    block.parameter
                ),
                Some(ValidationError::at(
                    IssueKind::MismatchedBlockEnd,
                    index,
                    original_tag,
                    format!(
                        "'{original_tag}' names '{named}' but the innermost open block is '{}'; closing '{}'",
                        block.parameter, block.parameter
                    ),
                )),
            ),
            _ => (format!("closes block '{}'", block.parameter), None),
        };

        BlockOutcome {
            entry: MappingReportEntry {
                source_tag: original_tag.to_string(),
                target_tag: Some(output.clone()),
                method: ResolutionMethod::ControlClose,
                note: Some(note),
                element_index: index,
            },
            output,
            issue,
        }
    }
}

fn missing_parameter(index: usize, original_tag: &str, control_type: &str) -> BlockOutcome {
    BlockOutcome {
        output: original_tag.to_string(),
        entry: MappingReportEntry {
            source_tag: original_tag.to_string(),
            target_tag: None,
            method: ResolutionMethod::ControlOpen,
            note: Some(format!("{control_type} without a parameter was not converted")),
            element_index: index,
        },
        issue: Some(ValidationError::at(
            IssueKind::MissingParameter,
            index,
            original_tag,
            format!("{control_type} tag '{original_tag}' is missing its required parameter"),
        )),
    }
}

fn unhandled(index: usize, original_tag: &str, control_type: &str) -> BlockOutcome {
    BlockOutcome {
        output: original_tag.to_string(),
        entry: MappingReportEntry {
            source_tag: original_tag.to_string(),
            target_tag: None,
            method: ResolutionMethod::Unhandled,
            note: Some(format!("control type '{control_type}' is not converted")),
            element_index: index,
        },
        issue: Some(ValidationError::at(
            IssueKind::UnhandledControlTag,
            index,
            original_tag,
            format!("control tag '{original_tag}' has unsupported type '{control_type}'"),
        )),
    }
}
