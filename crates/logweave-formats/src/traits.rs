use logweave_types::MatchedRecord;

/// A predicate that tries to interpret one line as a known shape.
///
/// Responsibilities:
/// - Decide whether the line has this format (returning `None` otherwise)
/// - Resolve a timestamp when the format carries one
/// - Produce styled text for display
///
/// Implementations must not panic on arbitrary input; malformed lines are
/// declined rather than reported as errors.
pub trait LogFormat: Send + Sync {
    /// Stable identifier (e.g., "json", "common", "combined")
    fn name(&self) -> &'static str;

    /// Interpret `line`, or decline with `None`
    fn parse(&self, line: &str) -> Option<MatchedRecord>;
}
