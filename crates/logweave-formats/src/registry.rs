use crate::access_log::AccessLogFormat;
use crate::causal_line::CausalLineFormat;
use crate::json::JsonLogFormat;
use crate::traits::LogFormat;

/// Known matchers, in default classification order.
const FORMAT_NAMES: &[&str] = &["causal", "json", "common", "combined"];

pub fn format_names() -> &'static [&'static str] {
    FORMAT_NAMES
}

/// Create a matcher by name. `timestamp_fields` only applies to `json`; an
/// empty list turns JSON timestamp detection off.
pub fn create_format(name: &str, timestamp_fields: &[String]) -> Option<Box<dyn LogFormat>> {
    let format: Box<dyn LogFormat> = match name {
        "causal" => Box::new(CausalLineFormat),
        "json" => Box::new(JsonLogFormat::with_timestamp_fields(
            timestamp_fields.iter().cloned(),
        )),
        "common" => Box::new(AccessLogFormat::common()),
        "combined" => Box::new(AccessLogFormat::combined()),
        _ => return None,
    };
    Some(format)
}
