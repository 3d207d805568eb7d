use std::{fmt, str::FromStr};

use url::Url;

/// Base used only to check that a relative reference resolves.
const CHECK_BASE: &str = "http://localhost/";

/// A URL reference could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlError {
    #[error("invalid control character in URL")]
    ControlCharacter,
    #[error("invalid URL escape {0:?}")]
    InvalidEscape(String),
    #[error("missing protocol scheme")]
    MissingScheme,
    #[error("first path segment in URL cannot contain colon")]
    ColonInFirstSegment,
    #[error(transparent)]
    Parse(#[from] url::ParseError),
}

/// An absolute URL or a reference relative to some base that is not known yet.
///
/// `"https://example.com/api"` is [`Absolute`](UrlRef::Absolute); `"/api/v1"`,
/// `"callback"`, `"?page=2"` and `"//cdn.example.com/x"` are
/// [`Relative`](UrlRef::Relative) and are kept as written. Use
/// [`resolve`](UrlRef::resolve) to turn either into a full [`Url`].
///
/// # Examples
///
/// ```rust
/// use envparse::UrlRef;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/app/").unwrap();
///
/// let path: UrlRef = "/api/v1".parse().unwrap();
/// assert!(!path.is_absolute());
/// assert_eq!(path.resolve(&base).unwrap().as_str(), "https://example.com/api/v1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlRef {
    Absolute(Url),
    Relative(String),
}

impl UrlRef {
    pub fn parse(input: &str) -> Result<Self, UrlError> {
        if input.bytes().any(|b| b < 0x20 || b == 0x7f) {
            return Err(UrlError::ControlCharacter);
        }
        if input.starts_with(':') {
            return Err(UrlError::MissingScheme);
        }
        check_escapes(input)?;

        match Url::parse(input) {
            Ok(url) => Ok(Self::Absolute(url)),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let first_segment = input.split(['/', '?', '#']).next().unwrap_or_default();
                if first_segment.contains(':') {
                    return Err(UrlError::ColonInFirstSegment);
                }
                Url::parse(CHECK_BASE)?.join(input)?;
                Ok(Self::Relative(input.to_owned()))
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn is_absolute(&self) -> bool {
        matches!(self, Self::Absolute(_))
    }

    /// The parsed URL, if this reference is absolute.
    pub fn as_url(&self) -> Option<&Url> {
        match self {
            Self::Absolute(url) => Some(url),
            Self::Relative(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Absolute(url) => url.as_str(),
            Self::Relative(reference) => reference,
        }
    }

    /// Resolve against `base`. An absolute reference ignores the base.
    pub fn resolve(&self, base: &Url) -> Result<Url, url::ParseError> {
        match self {
            Self::Absolute(url) => Ok(url.clone()),
            Self::Relative(reference) => base.join(reference),
        }
    }
}

impl FromStr for UrlRef {
    type Err = UrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Url> for UrlRef {
    fn from(url: Url) -> Self {
        Self::Absolute(url)
    }
}

impl fmt::Display for UrlRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every `%` must start a two digit hex escape. The query is left alone.
fn check_escapes(input: &str) -> Result<(), UrlError> {
    let (rest, fragment) = input.split_once('#').unwrap_or((input, ""));
    let before_query = rest.split_once('?').map_or(rest, |(head, _)| head);

    for part in [before_query, fragment] {
        let bytes = part.as_bytes();
        for (i, _) in part.match_indices('%') {
            let hex = bytes.get(i + 1..i + 3);
            if !hex.is_some_and(|h| h.iter().all(u8::is_ascii_hexdigit)) {
                let escape: String = part[i..].chars().take(3).collect();
                return Err(UrlError::InvalidEscape(escape));
            }
        }
    }
    Ok(())
}
