//! The batch process: decode one image, write its rotations and a
//! smoothed rotation.
//!
//! # Stages
//!
//! 1. Decode the input file
//! 2. Rotate clockwise and counter-clockwise (in parallel, both read the
//!    same decoded image)
//! 3. Smooth the rotation selected by [`PipelineConfig::filter_source`]
//! 4. Encode the three outputs
//!
//! Any failure stops the run and names the stage and file involved.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::bitmap::BmpImage;
use crate::decode::DecodeError;
use crate::encode::EncodeError;
use crate::transform::RotationDirection;

/// Settings for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Source image.
    pub input: PathBuf,
    /// Directory the outputs are written to.
    pub output_dir: PathBuf,
    /// File name of the clockwise rotation.
    pub rotate_right_name: String,
    /// File name of the counter-clockwise rotation.
    pub rotate_left_name: String,
    /// File name of the smoothed image.
    pub filtered_name: String,
    /// Which rotation the Gaussian filter is applied to.
    pub filter_source: RotationDirection,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("Picture.bmp"),
            output_dir: PathBuf::from("."),
            rotate_right_name: "RotateRight.bmp".to_string(),
            rotate_left_name: "RotateLeft.bmp".to_string(),
            filtered_name: "FilteredImage.bmp".to_string(),
            filter_source: RotationDirection::Clockwise,
        }
    }
}

impl PipelineConfig {
    /// Create a config with default output names for `input`.
    pub fn new<P: Into<PathBuf>>(input: P) -> Self {
        Self {
            input: input.into(),
            ..Self::default()
        }
    }

    pub fn rotate_right_path(&self) -> PathBuf {
        self.output_dir.join(&self.rotate_right_name)
    }

    pub fn rotate_left_path(&self) -> PathBuf {
        self.output_dir.join(&self.rotate_left_name)
    }

    pub fn filtered_path(&self) -> PathBuf {
        self.output_dir.join(&self.filtered_name)
    }
}

/// A pipeline stage, used to label failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Decode,
    RotateRight,
    RotateLeft,
    Filter,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Decode => "decode",
            Stage::RotateRight => "rotate right",
            Stage::RotateLeft => "rotate left",
            Stage::Filter => "gaussian filter",
        })
    }
}

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The source image couldn't be read.
    #[error("{stage} failed for {}", .path.display(), stage = Stage::Decode)]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    /// An output image couldn't be written.
    #[error("{stage} failed writing {}", .path.display())]
    Encode {
        stage: Stage,
        path: PathBuf,
        #[source]
        source: EncodeError,
    },
}

impl PipelineError {
    /// The stage that failed.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Decode { .. } => Stage::Decode,
            PipelineError::Encode { stage, .. } => *stage,
        }
    }
}

/// One file written by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFile {
    pub stage: Stage,
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub bytes: u64,
}

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub input: PathBuf,
    /// `file_size` declared by the source header.
    pub source_file_size: u32,
    pub source_width: u32,
    pub source_height: u32,
    pub outputs: Vec<OutputFile>,
}

/// The three derived images of one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outputs {
    pub rotated_right: BmpImage,
    pub rotated_left: BmpImage,
    pub filtered: BmpImage,
}

/// Compute the rotations and the smoothed rotation of `source`.
///
/// The two rotations only read `source` and each own their result, so they
/// run on separate rayon workers.
pub fn derive_outputs(source: &BmpImage, filter_source: RotationDirection) -> Outputs {
    let (rotated_right, rotated_left) = rayon::join(
        || source.rotated(RotationDirection::Clockwise),
        || source.rotated(RotationDirection::CounterClockwise),
    );
    let filtered = match filter_source {
        RotationDirection::Clockwise => rotated_right.smoothed(),
        RotationDirection::CounterClockwise => rotated_left.smoothed(),
    };
    Outputs {
        rotated_right,
        rotated_left,
        filtered,
    }
}

/// Run the full batch process described by `config`.
pub fn run(config: &PipelineConfig) -> Result<PipelineReport, PipelineError> {
    let source = BmpImage::load(&config.input).map_err(|source| PipelineError::Decode {
        path: config.input.clone(),
        source,
    })?;
    info!(
        input = %config.input.display(),
        width = source.width(),
        height = source.height(),
        file_size = source.header.file_size,
        "loaded source image"
    );

    let outputs = derive_outputs(&source, config.filter_source);

    let plan = [
        (Stage::RotateRight, config.rotate_right_path(), &outputs.rotated_right),
        (Stage::RotateLeft, config.rotate_left_path(), &outputs.rotated_left),
        (Stage::Filter, config.filtered_path(), &outputs.filtered),
    ];

    let mut written = Vec::with_capacity(plan.len());
    for (stage, path, image) in plan {
        written.push(write_output(stage, &path, image)?);
    }

    Ok(PipelineReport {
        input: config.input.clone(),
        source_file_size: source.header.file_size,
        source_width: source.width(),
        source_height: source.height(),
        outputs: written,
    })
}

fn write_output(stage: Stage, path: &Path, image: &BmpImage) -> Result<OutputFile, PipelineError> {
    let bytes = image.save(path).map_err(|source| PipelineError::Encode {
        stage,
        path: path.to_path_buf(),
        source,
    })?;
    info!(%stage, path = %path.display(), bytes, "wrote output");
    Ok(OutputFile {
        stage,
        path: path.to_path_buf(),
        width: image.width(),
        height: image.height(),
        bytes,
    })
}
