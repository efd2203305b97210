//! Seam to the component that drives the portal form.
//!
//! Filling the selectors, showing the captcha to a person and finding the
//! "View PDF" link happen outside this crate. What comes back is either a
//! [`LocatedPdf`] or `None` when the portal showed no link.

use crate::error::{Error, Result};
use crate::selection::Selection;

/// A cause list link found on the portal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedPdf {
    pub url: String,
    /// Court name as shown in the court selector.
    pub court: String,
    pub judge: Option<String>,
}

impl LocatedPdf {
    /// Checks that `url` is an absolute http(s) URL.
    pub fn new(url: &str, court: &str, judge: Option<&str>) -> Result<Self> {
        let parsed = url::Url::parse(url).map_err(|e| Error::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::InvalidUrl {
                url: url.to_string(),
                reason: format!("unsupported scheme {:?}", parsed.scheme()),
            });
        }
        Ok(Self {
            url: parsed.to_string(),
            court: court.to_string(),
            judge: judge.map(str::to_string),
        })
    }
}

pub trait PdfLocator {
    /// Finds the cause list PDF for `selection`.
    ///
    /// `Ok(None)` means the portal answered but offered no PDF. Errors are
    /// for prerequisites that never appeared (captcha image, selectors).
    fn locate(&mut self, selection: &Selection) -> Result<Option<LocatedPdf>>;
}

/// A link the user already copied from the portal.
#[derive(Debug, Clone)]
pub struct DirectLink {
    pdf: Option<LocatedPdf>,
}

impl DirectLink {
    pub fn new(pdf: LocatedPdf) -> Self {
        Self { pdf: Some(pdf) }
    }
}

impl PdfLocator for DirectLink {
    fn locate(&mut self, _selection: &Selection) -> Result<Option<LocatedPdf>> {
        Ok(self.pdf.take())
    }
}
