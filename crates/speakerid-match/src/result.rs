//! Result types for template identification.

use std::collections::BTreeMap;

use speakerid_dtw::{DtwDistance, DtwOutcome};

use crate::template::SpeakerId;

/// How one template scored against the candidate.
#[derive(Debug, Clone)]
pub struct TemplateScore {
    /// Index of the template in the bank.
    pub template: usize,
    /// Speaker the template belongs to.
    pub speaker: SpeakerId,
    /// DTW result for this template.
    pub outcome: DtwOutcome,
    /// Whether the template aligned within the rejection threshold.
    pub accepted: bool,
}

/// The closest accepted template.
#[derive(Debug, Clone)]
pub struct Match {
    /// Index of the template in the bank.
    pub template: usize,
    /// Identified speaker.
    pub speaker: SpeakerId,
    /// Alignment cost against the candidate.
    pub distance: DtwDistance,
}

/// Result of scoring one candidate against a template bank.
#[derive(Debug, Clone)]
pub struct Identification {
    /// Closest accepted template, or `None` if every template was rejected.
    pub best: Option<Match>,
    /// One score per template, in bank order.
    pub scores: Vec<TemplateScore>,
}

impl Identification {
    /// Return the accepted scores ordered by ascending distance.
    ///
    /// Equal distances keep bank order.
    #[must_use]
    pub fn ranking(&self) -> Vec<&TemplateScore> {
        let mut ranked: Vec<&TemplateScore> = self.scores.iter().filter(|s| s.accepted).collect();
        ranked.sort_by(|a, b| a.outcome.total_cmp(&b.outcome));
        ranked
    }

    /// Return each speaker's best accepted distance.
    #[must_use]
    pub fn best_per_speaker(&self) -> BTreeMap<&SpeakerId, DtwDistance> {
        let mut best: BTreeMap<&SpeakerId, DtwDistance> = BTreeMap::new();
        for score in self.scores.iter().filter(|s| s.accepted) {
            let Some(d) = score.outcome.distance() else {
                continue;
            };
            best.entry(&score.speaker)
                .and_modify(|cur| {
                    if d.total_cmp(cur).is_lt() {
                        *cur = d;
                    }
                })
                .or_insert(d);
        }
        best
    }

    /// Return the number of templates that were not accepted.
    #[must_use]
    pub fn n_rejected(&self) -> usize {
        self.scores.iter().filter(|s| !s.accepted).count()
    }
}
