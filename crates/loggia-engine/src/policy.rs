use loggia::device::Device;
use loggia::reply::Candidate;

/// The terminal outcome of resolving one selection query.
///
/// No action is ever executed against more than one device per request,
/// and no action is executed speculatively while the selection is
/// ambiguous.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The query matched no device; no mutation is attempted.
    NotFound,
    /// The query matched exactly one device; the action proceeds without
    /// further confirmation.
    Act(Device),
    /// The query matched several devices; the caller is asked a single
    /// clarifying question and is expected to issue a narrowed query on
    /// its next turn.
    Clarify(Vec<Candidate>),
}

/// Applies the disambiguation policy to the finder's candidates.
///
/// Candidates are never narrowed here by action validity, only by the
/// selection query: a brightness request matching lights that are both on
/// and off still asks for clarification instead of pre-filtering.
#[must_use]
pub fn resolve(mut candidates: Vec<Device>) -> Resolution {
    match candidates.len() {
        0 => Resolution::NotFound,
        1 => Resolution::Act(candidates.remove(0)),
        _ => Resolution::Clarify(candidates.iter().map(Candidate::from).collect()),
    }
}
