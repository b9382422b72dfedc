//! Closest-template search over a template bank.

use rayon::prelude::*;
use speakerid_dtw::{Dtw, DtwOutcome, Sequence};
use tracing::{debug, info, instrument};

use crate::config::{MatchConfig, SearchStrategy, Variant};
use crate::error::MatchError;
use crate::result::{Identification, Match, TemplateScore};
use crate::template::TemplateBank;

/// Score one template. `bound` only affects [`Variant::Thresholded`].
fn score(
    variant: Variant,
    candidate: &Sequence,
    template: &Sequence,
    bound: f64,
) -> Result<DtwOutcome, MatchError> {
    let outcome = match variant {
        Variant::Full => Dtw::unconstrained().lattice(candidate, template)?.outcome(),
        Variant::Banded { band } => Dtw::with_sakoe_chiba(band).distance(candidate, template)?,
        Variant::Thresholded { band } => {
            Dtw::with_sakoe_chiba(band).distance_with_threshold(candidate, template, bound)?
        }
    };
    Ok(outcome)
}

#[instrument(
    skip(candidate, bank, config),
    fields(
        n_templates = bank.len(),
        variant = ?config.variant,
        search = ?config.search,
    )
)]
pub(crate) fn identify(
    candidate: &Sequence,
    bank: &TemplateBank,
    config: &MatchConfig,
) -> Result<Identification, MatchError> {
    if let Some(value) = config.rejection_threshold
        && (value.is_nan() || value < 0.0)
    {
        return Err(MatchError::InvalidThreshold { value });
    }
    if !candidate.is_empty() && bank.dim() != 0 && candidate.dim() != bank.dim() {
        return Err(MatchError::DimensionMismatch {
            expected: bank.dim(),
            got: candidate.dim(),
        });
    }

    let cap = config.rejection_threshold.unwrap_or(f64::INFINITY);
    let templates = bank.templates();

    let outcomes: Vec<DtwOutcome> = match config.search {
        SearchStrategy::Exhaustive => templates
            .iter()
            .map(|t| score(config.variant, candidate, t.sequence(), cap))
            .collect::<Result<_, _>>()?,
        SearchStrategy::Parallel => templates
            .par_iter()
            .map(|t| score(config.variant, candidate, t.sequence(), cap))
            .collect::<Result<_, _>>()?,
        SearchStrategy::BestSoFar => {
            let mut bound = cap;
            let mut outcomes = Vec::with_capacity(templates.len());
            for t in templates {
                let outcome = score(config.variant, candidate, t.sequence(), bound)?;
                if let Some(d) = outcome.distance()
                    && d.value() < bound
                {
                    bound = d.value();
                    debug!(template = t.name(), bound, "best-so-far bound tightened");
                }
                outcomes.push(outcome);
            }
            outcomes
        }
    };

    let scores: Vec<TemplateScore> = templates
        .iter()
        .zip(outcomes)
        .enumerate()
        .map(|(index, (t, outcome))| {
            let accepted = outcome.distance().is_some_and(|d| d.value() <= cap);
            debug!(
                template = t.name(),
                speaker = %t.speaker(),
                %outcome,
                accepted,
                "template scored"
            );
            TemplateScore {
                template: index,
                speaker: t.speaker().clone(),
                outcome,
                accepted,
            }
        })
        .collect();

    let mut best: Option<Match> = None;
    for s in scores.iter().filter(|s| s.accepted) {
        let Some(distance) = s.outcome.distance() else {
            continue;
        };
        if best
            .as_ref()
            .is_none_or(|b| distance.total_cmp(&b.distance).is_lt())
        {
            best = Some(Match {
                template: s.template,
                speaker: s.speaker.clone(),
                distance,
            });
        }
    }

    let identification = Identification { best, scores };
    match &identification.best {
        Some(m) => info!(
            speaker = %m.speaker,
            template = m.template,
            distance = m.distance.value(),
            n_rejected = identification.n_rejected(),
            "identification complete"
        ),
        None => info!(
            n_rejected = identification.n_rejected(),
            "no template within rejection threshold"
        ),
    }
    Ok(identification)
}
