//! Template bank loading from a speaker directory tree.

use std::fs;
use std::path::{Path, PathBuf};

use speakerid_dtw::MFCC_DIM;
use speakerid_match::{SpeakerId, Template, TemplateBank};
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::reader::SequenceReader;

/// Loads enrolled templates laid out as `<root>/<speaker>/<take>.csv`.
///
/// Each subdirectory of `root` is one speaker; each `.csv` file inside it is
/// one template, named by its file stem. Entries starting with `.` and files
/// without a `.csv` extension are ignored. Templates are ordered by speaker,
/// then by take, so bank indices are stable across platforms.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::ReadDir`] | `root` or a speaker directory cannot be listed |
/// | [`IoError::NoTemplates`] | No `.csv` file was found under `root` |
/// | [`IoError::Bank`] | Speaker name is blank or templates disagree in dimension |
/// | any [`SequenceReader`] error | A take file is invalid |
pub struct TemplateLoader {
    root: PathBuf,
    dim: usize,
}

impl TemplateLoader {
    /// Create a loader for the given template root, expecting [`MFCC_DIM`] coefficients per frame.
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            dim: MFCC_DIM,
        }
    }

    /// Expect `dim` coefficients per frame instead of [`MFCC_DIM`].
    #[must_use]
    pub fn with_dim(mut self, dim: usize) -> Self {
        self.dim = dim;
        self
    }

    /// Read every take under the root into a [`TemplateBank`].
    #[instrument(skip(self), fields(root = %self.root.display(), dim = self.dim))]
    pub fn load(&self) -> Result<TemplateBank, IoError> {
        let mut templates = Vec::new();
        for speaker_dir in sorted_entries(&self.root, true)? {
            let speaker = file_name(&speaker_dir);
            let id = SpeakerId::new(speaker.as_str())?;

            let takes: Vec<PathBuf> = sorted_entries(&speaker_dir, false)?
                .into_iter()
                .filter(|p| p.extension().is_some_and(|ext| ext == "csv"))
                .collect();
            debug!(speaker = %speaker, n_takes = takes.len(), "speaker directory scanned");

            for take in takes {
                let sequence = SequenceReader::new(&take).with_dim(self.dim).read()?;
                let name = take
                    .file_stem()
                    .map_or_else(String::new, |s| s.to_string_lossy().into_owned());
                templates.push(Template::new(id.clone(), name, sequence));
            }
        }

        if templates.is_empty() {
            return Err(IoError::NoTemplates {
                path: self.root.clone(),
            });
        }

        let bank = TemplateBank::new(templates)?;
        info!(
            n_templates = bank.len(),
            n_speakers = bank.speakers().len(),
            "template bank loaded"
        );
        Ok(bank)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(String::new, |s| s.to_string_lossy().into_owned())
}

/// List the non-hidden directories (`dirs = true`) or files of `dir`, sorted by path.
fn sorted_entries(dir: &Path, dirs: bool) -> Result<Vec<PathBuf>, IoError> {
    let read_dir_error = |source| IoError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_dir_error)? {
        let entry = entry.map_err(read_dir_error)?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let file_type = entry.file_type().map_err(read_dir_error)?;
        if file_type.is_dir() == dirs {
            entries.push(entry.path());
        }
    }
    entries.sort();
    Ok(entries)
}
