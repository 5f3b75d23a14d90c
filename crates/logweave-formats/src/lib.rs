// Line interpretation layer: raw text line -> MatchedRecord
// Matchers never fail; a line they cannot interpret is simply declined.

pub mod ansi;
pub mod highlight;
pub mod timestamps;

// Trait-based matcher architecture (public API)
pub mod traits;

// Matcher implementations
pub mod access_log;
pub mod causal_line;
pub mod fallback;
pub mod json;

// Matcher registry
pub mod registry;

// Adaptive classifier
pub mod classifier;

pub use access_log::{AccessLogFormat, AccessLogGrammar};
pub use causal_line::CausalLineFormat;
pub use classifier::{Classifier, ClassifierConfig, DEFAULT_MAX_LINE_LENGTH, rotate_to_front};
pub use fallback::DefaultLogFormat;
pub use json::{DEFAULT_TIMESTAMP_FIELDS, JsonLogFormat};
pub use registry::{create_format, format_names};
pub use traits::LogFormat;
