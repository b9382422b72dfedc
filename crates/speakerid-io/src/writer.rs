//! JSON result writer for identification and comparison outputs.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use speakerid_dtw::DtwOutcome;
use speakerid_match::{Identification, MatchConfig, SearchStrategy, TemplateBank, Variant};
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::RunName;

/// A single pairwise comparison, as reported by the `compare` command.
#[derive(Debug, Clone)]
pub struct ComparisonRecord<'a> {
    /// Label of the first sequence (typically its path).
    pub a: &'a str,
    /// Label of the second sequence.
    pub b: &'a str,
    /// Frame counts of the two sequences.
    pub frames: (usize, usize),
    /// DTW variant used.
    pub variant: Variant,
    /// Abandonment threshold, for [`Variant::Thresholded`].
    pub threshold: Option<f64>,
    /// Result of the alignment.
    pub outcome: DtwOutcome,
    /// Number of steps in the optimal warping path, when it was traced.
    pub path_len: Option<usize>,
}

/// Writes identification and comparison results to JSON files.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are named `{run}_identify.json` and `{run}_compare.json`.
pub struct ResultWriter {
    output_dir: PathBuf,
    run: RunName,
}

impl ResultWriter {
    /// Create a new writer targeting the given directory and run name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), run = %run))]
    pub fn new(output_dir: &Path, run: RunName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            run,
        })
    }

    /// Return the path `{output_dir}/{run}_{kind}.json`.
    #[must_use]
    pub fn artifact_path(&self, kind: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_{kind}.json", self.run.as_str()))
    }

    /// Write an identification result to `{run}_identify.json`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Serialize`] or [`IoError::WriteFile`] if the artifact
    /// cannot be produced.
    #[instrument(skip_all, fields(candidate = candidate))]
    pub fn write_identify(
        &self,
        candidate: &str,
        candidate_frames: usize,
        bank: &TemplateBank,
        config: &MatchConfig,
        identification: &Identification,
    ) -> Result<(), IoError> {
        let path = self.artifact_path("identify");
        let (variant, band) = variant_fields(config.variant());

        let scores: Vec<ScoreEntry<'_>> = bank
            .templates()
            .iter()
            .zip(&identification.scores)
            .map(|(template, score)| ScoreEntry {
                template: template.name(),
                speaker: template.speaker().as_str(),
                frames: template.sequence().len(),
                distance: score.outcome.distance().map(|d| d.value()),
                rejection: score.outcome.rejection().map(|r| r.to_string()),
                accepted: score.accepted,
            })
            .collect();

        let best = identification.best.as_ref().map(|m| BestEntry {
            speaker: m.speaker.as_str(),
            template: bank.get(m.template).map_or("", |t| t.name()),
            index: m.template,
            distance: m.distance.value(),
        });

        let per_speaker: BTreeMap<&str, f64> = identification
            .best_per_speaker()
            .into_iter()
            .map(|(speaker, d)| (speaker.as_str(), d.value()))
            .collect();

        let artifact = IdentifyArtifact {
            run: self.run.as_str(),
            candidate,
            candidate_frames,
            variant,
            band,
            rejection_threshold: config.rejection_threshold(),
            search: search_label(config.search()),
            n_templates: bank.len(),
            n_rejected: identification.n_rejected(),
            best,
            per_speaker,
            scores,
        };

        write_json(&path, &artifact)?;
        info!(path = %path.display(), "identification result written");
        Ok(())
    }

    /// Write a pairwise comparison to `{run}_compare.json`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Serialize`] or [`IoError::WriteFile`] if the artifact
    /// cannot be produced.
    #[instrument(skip_all)]
    pub fn write_compare(&self, record: &ComparisonRecord<'_>) -> Result<(), IoError> {
        let path = self.artifact_path("compare");
        let (variant, band) = variant_fields(record.variant);

        let artifact = CompareArtifact {
            run: self.run.as_str(),
            a: record.a,
            b: record.b,
            a_frames: record.frames.0,
            b_frames: record.frames.1,
            variant,
            band,
            threshold: record.threshold,
            aligned: record.outcome.is_aligned(),
            distance: record.outcome.distance().map(|d| d.value()),
            rejection: record.outcome.rejection().map(|r| r.to_string()),
            sentinel_value: record.outcome.value_or_sentinel(),
            path_len: record.path_len,
        };

        write_json(&path, &artifact)?;
        info!(path = %path.display(), "comparison result written");
        Ok(())
    }
}

fn write_json<T: Serialize>(path: &Path, artifact: &T) -> Result<(), IoError> {
    let json = serde_json::to_string_pretty(artifact).map_err(|e| IoError::Serialize {
        path: path.to_path_buf(),
        source: e,
    })?;
    fs::write(path, json).map_err(|e| IoError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })
}

fn variant_fields(variant: Variant) -> (&'static str, Option<usize>) {
    match variant {
        Variant::Full => ("full", None),
        Variant::Banded { band } => ("banded", Some(band)),
        Variant::Thresholded { band } => ("thresholded", Some(band)),
    }
}

fn search_label(search: SearchStrategy) -> &'static str {
    match search {
        SearchStrategy::Exhaustive => "exhaustive",
        SearchStrategy::BestSoFar => "best-so-far",
        SearchStrategy::Parallel => "parallel",
    }
}

// --- Shadow structs for JSON serialization ---

#[derive(Serialize)]
struct IdentifyArtifact<'a> {
    run: &'a str,
    candidate: &'a str,
    candidate_frames: usize,
    variant: &'static str,
    band: Option<usize>,
    rejection_threshold: Option<f64>,
    search: &'static str,
    n_templates: usize,
    n_rejected: usize,
    best: Option<BestEntry<'a>>,
    per_speaker: BTreeMap<&'a str, f64>,
    scores: Vec<ScoreEntry<'a>>,
}

#[derive(Serialize)]
struct BestEntry<'a> {
    speaker: &'a str,
    template: &'a str,
    index: usize,
    distance: f64,
}

#[derive(Serialize)]
struct ScoreEntry<'a> {
    template: &'a str,
    speaker: &'a str,
    frames: usize,
    distance: Option<f64>,
    rejection: Option<String>,
    accepted: bool,
}

#[derive(Serialize)]
struct CompareArtifact<'a> {
    run: &'a str,
    a: &'a str,
    b: &'a str,
    a_frames: usize,
    b_frames: usize,
    variant: &'static str,
    band: Option<usize>,
    threshold: Option<f64>,
    aligned: bool,
    distance: Option<f64>,
    rejection: Option<String>,
    sentinel_value: f64,
    path_len: Option<usize>,
}
