//! Portal form inputs: jurisdiction tuple, date and case type.

use std::fmt;
use std::str::FromStr;

/// (state, district, court complex) identifying the filing venue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Jurisdiction {
    pub state: String,
    pub district: String,
    pub court_complex: String,
}

impl Jurisdiction {
    pub fn new(
        state: impl Into<String>,
        district: impl Into<String>,
        court_complex: impl Into<String>,
    ) -> Self {
        Self {
            state: state.into(),
            district: district.into(),
            court_complex: court_complex.into(),
        }
    }
}

/// Which cause list the portal should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseType {
    #[default]
    Civil,
    Criminal,
}

impl FromStr for CaseType {
    type Err = String;

    /// Accepts any casing and prefix, e.g. "Civil", "civ", "CRIMINAL", "crim".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        if lower.starts_with("civ") {
            Ok(CaseType::Civil)
        } else if lower.starts_with("crim") {
            Ok(CaseType::Criminal)
        } else {
            Err(format!("unknown case type {s:?} (expected civil or criminal)"))
        }
    }
}

impl fmt::Display for CaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseType::Civil => write!(f, "Civil"),
            CaseType::Criminal => write!(f, "Criminal"),
        }
    }
}

/// Everything the portal form asks for before the captcha.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub jurisdiction: Jurisdiction,
    /// Free-text date as typed into the portal; also the manifest key.
    pub date: String,
    pub case_type: CaseType,
}
