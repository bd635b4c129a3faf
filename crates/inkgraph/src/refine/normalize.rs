//! OCR label clean-up.

use regex::{NoExpand, Regex};

use crate::{config::Correction, error::InkgraphError};

/// Strips list markers and trailing punctuation, then applies whole-word
/// OCR corrections.
#[derive(Debug, Clone)]
pub struct LabelNormalizer {
    leading_markers: Regex,
    trailing_punctuation: Regex,
    corrections: Vec<(Regex, String)>,
}

impl LabelNormalizer {
    /// Compiles the correction table.
    ///
    /// Correction words are matched literally, case-insensitively and only
    /// on word boundaries.
    pub fn new(corrections: &[Correction]) -> Result<Self, InkgraphError> {
        let corrections = corrections
            .iter()
            .map(|correction| {
                let pattern = format!(r"(?i)\b{}\b", regex::escape(&correction.word));
                Regex::new(&pattern)
                    .map(|regex| (regex, correction.replacement.clone()))
                    .map_err(|err| {
                        InkgraphError::Config(format!(
                            "invalid correction `{}`: {err}",
                            correction.word
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            leading_markers: compile(r"^[\d.\-•\s]+")?,
            trailing_punctuation: compile(r"[.:,]+$")?,
            corrections,
        })
    }

    /// Returns the normalized form of `label`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use inkgraph::{config::RefineConfig, refine::LabelNormalizer};
    /// let normalizer = LabelNormalizer::new(RefineConfig::default().corrections()).unwrap();
    /// assert_eq!(normalizer.normalize("2. Datal:"), "Data");
    /// assert_eq!(normalizer.normalize("the folowing"), "the following");
    /// ```
    pub fn normalize(&self, label: &str) -> String {
        let stripped = self.leading_markers.replace(label, "");
        let trimmed = stripped.trim();
        let mut text = self.trailing_punctuation.replace(trimmed, "").into_owned();
        for (pattern, replacement) in &self.corrections {
            text = pattern
                .replace_all(&text, NoExpand(replacement.as_str()))
                .into_owned();
        }
        text.trim().to_string()
    }
}

fn compile(pattern: &str) -> Result<Regex, InkgraphError> {
    Regex::new(pattern).map_err(|err| InkgraphError::Config(err.to_string()))
}
