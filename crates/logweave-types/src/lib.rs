pub mod causal;
pub mod error;
pub mod record;
pub mod style;

pub use causal::*;
pub use error::{Error, Result};
pub use record::MatchedRecord;
pub use style::{Color, Span, Style, StyledText};
