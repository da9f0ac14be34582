//! Tracked-link composition
//!
//! Turns a free-text base link plus an ordered list of parameters into a
//! single URL string. Links typed without a scheme (`example.com/page`) are
//! parsed with a temporary `http://` prefix that is stripped again from the
//! result, so the caller gets back the same shape they typed.

use std::sync::LazyLock;

use thiserror::Error;
use url::Url;

use crate::model::Parameter;

/// Prefix used to make scheme-less links parseable.
const SYNTHETIC_SCHEME: &str = "http://";

/// Letters-only scheme followed by `://`. Schemes with digits, `+`, `-` or
/// `.` are deliberately not recognized.
static SCHEME_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[a-zA-Z]+://").expect("scheme pattern is valid"));

/// Failure while building a link.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// The working link is not valid URL syntax.
    #[error("Invalid URL: {input}")]
    InvalidUrl {
        /// Raw input as supplied, before any scheme was added
        input: String,
        #[source]
        source: url::ParseError,
    },
}

impl ComposeError {
    /// Short message recorded in the error log.
    pub fn message(&self) -> &'static str {
        match self {
            ComposeError::InvalidUrl { .. } => "Invalid URL",
        }
    }

    /// Diagnostic context recorded alongside [`message`](Self::message).
    pub fn context(&self) -> String {
        match self {
            ComposeError::InvalidUrl { input, .. } => input.clone(),
        }
    }
}

/// Returns true when `link` already starts with a recognized scheme.
pub fn has_scheme(link: &str) -> bool {
    SCHEME_RE.is_match(link)
}

/// Appends `params` to `raw_link` and returns the resulting URL
///
/// 1. Whitespace around `raw_link` is trimmed.
/// 2. Without a scheme, `http://` is prepended for parsing only.
/// 3. Applicable parameters are appended in order with
///    `application/x-www-form-urlencoded` encoding. Existing query pairs are
///    kept, re-encoded the same way (`?flag` becomes `?flag=`, `%20` becomes
///    `+`, empty segments are dropped). Repeated keys are emitted again
///    rather than replaced. With nothing to append the query is untouched.
/// 4. A synthetic `http://` is stripped from the serialized result.
///
/// Pure and deterministic: no I/O, no logging side effects.
///
/// ```
/// use linkly::composer::compose;
/// use linkly::model::Parameter;
///
/// let url = compose("example.com", &[Parameter::new("utm_source", "google")]).unwrap();
/// assert_eq!(url, "example.com/?utm_source=google");
/// ```
pub fn compose(raw_link: &str, params: &[Parameter]) -> Result<String, ComposeError> {
    let trimmed = raw_link.trim();
    let synthetic = !has_scheme(trimmed);

    let working = if synthetic {
        format!("{SYNTHETIC_SCHEME}{trimmed}")
    } else {
        trimmed.to_string()
    };

    let mut url = Url::parse(&working).map_err(|source| ComposeError::InvalidUrl {
        input: raw_link.to_string(),
        source,
    })?;

    // query_pairs_mut() always leaves a `?` behind, even with nothing appended.
    let mut applicable = params.iter().filter(|param| param.is_applicable()).peekable();
    if applicable.peek().is_some() {
        // Appending re-serializes the whole query in form encoding.
        let existing: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        url.query_pairs_mut()
            .clear()
            .extend_pairs(existing)
            .extend_pairs(applicable.map(|param| (param.key.as_str(), param.value.as_str())));
    }

    let serialized = String::from(url);

    if synthetic {
        if let Some(rest) = serialized.strip_prefix(SYNTHETIC_SCHEME) {
            return Ok(rest.to_string());
        }
    }

    Ok(serialized)
}
