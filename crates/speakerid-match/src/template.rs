//! Enrolled speakers and their template sequences.

use std::collections::BTreeSet;
use std::fmt;

use speakerid_dtw::Sequence;

use crate::error::MatchError;

/// An enrolled speaker's identifier ("ID or name").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpeakerId(String);

impl SpeakerId {
    /// Create a speaker id from a non-empty string.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::EmptySpeakerId`] if `id` is empty or only whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self, MatchError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(MatchError::EmptySpeakerId);
        }
        Ok(Self(id))
    }

    /// Return the speaker id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpeakerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One enrolled recording's feature sequence.
#[derive(Debug, Clone)]
pub struct Template {
    speaker: SpeakerId,
    name: String,
    sequence: Sequence,
}

impl Template {
    /// Create a template for `speaker`. `name` labels the recording (e.g. a file stem).
    #[must_use]
    pub fn new(speaker: SpeakerId, name: impl Into<String>, sequence: Sequence) -> Self {
        Self {
            speaker,
            name: name.into(),
            sequence,
        }
    }

    /// Return the speaker this template was enrolled for.
    #[must_use]
    pub fn speaker(&self) -> &SpeakerId {
        &self.speaker
    }

    /// Return the recording label.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the feature sequence.
    #[must_use]
    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }
}

/// A non-empty set of templates sharing one frame dimension.
#[derive(Debug, Clone)]
pub struct TemplateBank {
    dim: usize,
    templates: Vec<Template>,
}

impl TemplateBank {
    /// Build a bank, checking that every non-empty template has the same dimension.
    ///
    /// Templates with no frames are kept; they can never match.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`MatchError::EmptyBank`] | `templates` is empty |
    /// | [`MatchError::InconsistentTemplate`] | A template's dimension differs from the first non-empty one |
    pub fn new(templates: Vec<Template>) -> Result<Self, MatchError> {
        if templates.is_empty() {
            return Err(MatchError::EmptyBank);
        }

        let mut dim = None;
        for (index, template) in templates.iter().enumerate() {
            let seq = template.sequence();
            if seq.is_empty() {
                continue;
            }
            match dim {
                None => dim = Some(seq.dim()),
                Some(expected) if expected != seq.dim() => {
                    return Err(MatchError::InconsistentTemplate {
                        index,
                        name: template.name().to_string(),
                        expected,
                        got: seq.dim(),
                    });
                }
                Some(_) => {}
            }
        }

        Ok(Self {
            dim: dim.unwrap_or(0),
            templates,
        })
    }

    /// Return the frame dimension shared by the templates (0 if all are empty).
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Return the number of templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Return true if the bank holds no templates. Always false for a constructed bank.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Return the template at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Template> {
        self.templates.get(index)
    }

    /// Return the templates as a slice.
    #[must_use]
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Return the distinct enrolled speakers in sorted order.
    #[must_use]
    pub fn speakers(&self) -> BTreeSet<&SpeakerId> {
        self.templates.iter().map(Template::speaker).collect()
    }
}
