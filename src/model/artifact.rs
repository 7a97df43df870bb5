use atomic_write_file::AtomicWriteFile;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

use super::forest::Forest;
use super::scoring::ScoringModel;
use crate::encoder::{EncoderTable, Encoder};
use crate::error::ModelLoadError;

/// Current layout of the model artifact.
pub const MODEL_FORMAT_VERSION: u32 = 1;

/// The trained model together with the encoder table it was trained behind.
///
/// Both halves share `model_version`; there is no way to load one without the
/// other.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub model_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub feature_count: usize,
    pub encoder: EncoderTable,
    pub forest: Forest,
}

impl ModelArtifact {
    /// Read and parse a model artifact. The file handle is released before
    /// this returns, whatever the outcome.
    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        let artifact: ModelArtifact = read_json(path)?;
        if artifact.format_version != MODEL_FORMAT_VERSION {
            return Err(ModelLoadError::UnsupportedFormat {
                found: artifact.format_version,
                supported: MODEL_FORMAT_VERSION,
            });
        }
        info!(
            path = %path.display(),
            model_version = %artifact.model_version,
            trees = artifact.forest.trees.len(),
            "Model artifact read"
        );
        Ok(artifact)
    }

    /// Write the artifact atomically.
    pub fn save(&self, path: &Path) -> Result<(), ModelLoadError> {
        write_json(path, self)
    }

    /// Validate the artifact and split it into the encoder and the model.
    pub fn into_parts(self) -> Result<(Encoder, ScoringModel), ModelLoadError> {
        if self.encoder.len() != self.feature_count {
            return Err(ModelLoadError::FeatureCountMismatch {
                encoder: self.encoder.len(),
                model: self.feature_count,
            });
        }
        let feature_names = self.encoder.feature_names();
        let encoder = Encoder::new(self.model_version.clone(), self.encoder)?;
        let model = ScoringModel::new(self.model_version, feature_names, self.forest)?;
        Ok((encoder, model))
    }
}

/// Deserialize a JSON artifact through a buffered reader.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ModelLoadError> {
    let file = File::open(path).map_err(|source| ModelLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ModelLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize a JSON artifact atomically: readers see the old file or the new
/// one, never a partial write.
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ModelLoadError> {
    let io_err = |source| ModelLoadError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut file = AtomicWriteFile::open(path).map_err(io_err)?;
    {
        let mut writer = BufWriter::new(&mut file);
        serde_json::to_writer_pretty(&mut writer, value)
            .map_err(|e| io_err(std::io::Error::other(e)))?;
        writer.write_all(b"\n").map_err(io_err)?;
        writer.flush().map_err(io_err)?;
    }
    file.commit().map_err(io_err)?;
    Ok(())
}
