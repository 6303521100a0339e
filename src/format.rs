use std::fmt;
use std::str::FromStr;

/// Output style requested by the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Format {
    #[default]
    Abstract,
    LinkedinPost,
    TwitterThread,
}

impl Format {
    /// Every accepted format, in the order they are advertised to callers.
    pub const ALL: [Format; 3] = [
        Format::Abstract,
        Format::LinkedinPost,
        Format::TwitterThread,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Abstract => "abstract",
            Format::LinkedinPost => "linkedin_post",
            Format::TwitterThread => "twitter_thread",
        }
    }

    pub fn allowed_names() -> Vec<&'static str> {
        Self::ALL.iter().map(Format::as_str).collect()
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFormat(pub String);

impl fmt::Display for UnknownFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown format: {}", self.0)
    }
}

impl std::error::Error for UnknownFormat {}

impl FromStr for Format {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| UnknownFormat(s.to_string()))
    }
}
