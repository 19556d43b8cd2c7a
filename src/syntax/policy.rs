//! Region transfer policy.
//!
//! Two static tables keyed by the candidate region. Each entry lists
//! context patterns, read top-of-stack downward:
//!
//! - [`OPENING_CONTEXTS`]: the contexts a region may be entered from. A
//!   region missing from the table (`Markup`) can never be entered.
//! - [`IGNORED_CONTEXTS`]: the contexts where a transfer request is a
//!   silent no-op.
//!
//! Some opening entries are shadowed by ignored entries (a quote directly
//! inside a template tag is always ignored). They stay listed as-is.

use super::region::{Region, RegionStack};
use Region::*;

/// A context pattern, top of stack first.
pub type Pattern = &'static [Region];

pub static OPENING_CONTEXTS: &[(Region, &[Pattern])] = &[
    (
        MarkupTag,
        &[&[Markup], &[SingleQuoted, TemplateTag], &[DoubleQuoted, TemplateTag]],
    ),
    (
        TemplateTag,
        &[
            &[Markup],
            &[MarkupTag],
            &[SingleQuoted, MarkupTag],
            &[DoubleQuoted, MarkupTag],
        ],
    ),
    (
        SingleQuoted,
        &[&[Markup], &[MarkupTag], &[DoubleQuoted], &[TemplateTag]],
    ),
    (
        DoubleQuoted,
        &[&[Markup], &[MarkupTag], &[SingleQuoted], &[TemplateTag]],
    ),
];

pub static IGNORED_CONTEXTS: &[(Region, &[Pattern])] = &[
    (SingleQuoted, &[&[DoubleQuoted], &[TemplateTag], &[Markup]]),
    (DoubleQuoted, &[&[SingleQuoted], &[TemplateTag], &[Markup]]),
    (
        MarkupTag,
        &[&[TemplateTag], &[SingleQuoted, MarkupTag], &[DoubleQuoted, MarkupTag]],
    ),
];

/// Outcome of consulting the policy for one transfer request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Transfer {
    /// Perform the push or pop.
    Proceed,
    /// Drop the request silently.
    Ignore,
    /// The request is a nesting error.
    Deny,
}

fn lookup(table: &'static [(Region, &'static [Pattern])], region: Region) -> &'static [Pattern] {
    table
        .iter()
        .find(|(candidate, _)| *candidate == region)
        .map_or(&[], |(_, patterns)| *patterns)
}

fn any_matches(stack: &RegionStack, patterns: &[Pattern]) -> bool {
    patterns.iter().any(|pattern| stack.matches_from_top(pattern))
}

/// Whether a transfer involving `region` is a no-op in the current context.
pub fn is_ignored(stack: &RegionStack, region: Region) -> bool {
    any_matches(stack, lookup(IGNORED_CONTEXTS, region))
}

/// Whether `region` may be opened in the current context.
pub fn can_open(stack: &RegionStack, region: Region) -> bool {
    any_matches(stack, lookup(OPENING_CONTEXTS, region))
}

/// Decide what to do with a request to enter `region`.
///
/// The ignored table is consulted before the opening table.
pub fn enter(stack: &RegionStack, region: Region) -> Transfer {
    if is_ignored(stack, region) {
        Transfer::Ignore
    } else if can_open(stack, region) {
        Transfer::Proceed
    } else {
        Transfer::Deny
    }
}

/// Decide what to do with a request to leave `region`.
pub fn exit(stack: &RegionStack, region: Region) -> Transfer {
    if is_ignored(stack, region) {
        Transfer::Ignore
    } else if stack.top(0) == Some(region) {
        Transfer::Proceed
    } else {
        Transfer::Deny
    }
}
