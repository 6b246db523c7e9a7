//! `${VAR}` / `${VAR:-default}` expansion for configuration strings.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ConfigError;

/// A single braced reference; `$NAME` outside braces is never matched.
static BRACED_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{[^}]*\}").expect("valid braced reference regex"));

/// Expand environment variable references in `value`.
///
/// Only the braced form is expanded; a bare `$` is kept literally, also when
/// the same string contains braced references.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    let mut out = String::with_capacity(value.len());
    let mut last = 0;
    for m in BRACED_REF.find_iter(value) {
        out.push_str(&value[last..m.start()]);
        out.push_str(&expand_reference(m.as_str(), field)?);
        last = m.end();
    }
    out.push_str(&value[last..]);
    Ok(out)
}

/// Expand one `${...}` reference.
fn expand_reference(reference: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env_with_context(reference, |name| match std::env::var(name) {
        Ok(val) => Ok(Some(val)),
        Err(_) => Err(UnsetVar(name.to_owned())),
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

/// Expand an optional string field in place.
pub(crate) fn expand_opt(value: &mut Option<String>, field: &str) -> Result<(), ConfigError> {
    if let Some(v) = value.as_mut() {
        *v = expand_env(v, field)?;
    }
    Ok(())
}

/// Name of a variable that was referenced but not set.
struct UnsetVar(String);
