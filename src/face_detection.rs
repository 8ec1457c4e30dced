//! SCRFD face detection on ONNX Runtime.
//!
//! The detector returns faces in frame coordinates together with the five
//! SCRFD keypoints (eyes, nose tip, mouth corners) when the model provides
//! them. Decoding and suppression are plain functions over slices so they can
//! be exercised without a model file.

use crate::{
    constants::{
        IMAGE_NORMALIZATION_OFFSET, IMAGE_NORMALIZATION_SCALE, SCRFD_DEFAULT_INPUT_SIZE,
        SCRFD_NOSE_KEYPOINT, SCRFD_NUM_KEYPOINTS,
    },
    error::{Error, Result},
    utils::{letterbox, safe_cast::i32_to_u32},
};
use log::{debug, info, warn};
use ndarray::{Array4, CowArray};
use opencv::core::{self, Mat, Rect, Scalar, Size, Vec3b};
use opencv::imgproc::{self, InterpolationFlags};
use opencv::prelude::*;
use ort::{Environment, GraphOptimizationLevel, LoggingLevel, Session, SessionBuilder, Value};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// A detected face in frame coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct FaceDetection {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    /// Confidence score of the detection
    pub score: f32,
    /// Five facial keypoints, when the model predicts them
    pub keypoints: Option<[(f32, f32); SCRFD_NUM_KEYPOINTS]>,
}

impl FaceDetection {
    /// Horizontal center of the bounding box
    #[must_use]
    pub fn center_x(&self) -> f32 {
        (self.x1 + self.x2) / 2.0
    }

    /// Nose tip keypoint
    #[must_use]
    pub fn nose_tip(&self) -> Option<(f32, f32)> {
        self.keypoints.map(|kps| kps[SCRFD_NOSE_KEYPOINT])
    }

    /// Box area, with the +1 pixel convention used by SCRFD's NMS
    #[must_use]
    pub fn area(&self) -> f32 {
        (self.x2 - self.x1 + 1.0).max(0.0) * (self.y2 - self.y1 + 1.0).max(0.0)
    }

    /// Intersection over union with another detection
    #[must_use]
    pub fn iou(&self, other: &Self) -> f32 {
        let w = (self.x2.min(other.x2) - self.x1.max(other.x1) + 1.0).max(0.0);
        let h = (self.y2.min(other.y2) - self.y1.max(other.y1) + 1.0).max(0.0);
        let inter = w * h;
        let union = self.area() + other.area() - inter;
        if union <= 0.0 {
            0.0
        } else {
            inter / union
        }
    }

    /// Integer rectangle for drawing
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.x1 as i32,
            self.y1 as i32,
            (self.x2 - self.x1) as i32,
            (self.y2 - self.y1) as i32,
        )
    }

    fn scaled(mut self, factor: f32) -> Self {
        self.x1 /= factor;
        self.y1 /= factor;
        self.x2 /= factor;
        self.y2 /= factor;
        if let Some(kps) = self.keypoints.as_mut() {
            for (x, y) in kps.iter_mut() {
                *x /= factor;
                *y /= factor;
            }
        }
        self
    }
}

/// How the SCRFD outputs are arranged, inferred from the output count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    /// Feature map strides, one score/box(/keypoint) output each
    pub strides: Vec<i32>,
    /// Anchors per feature map cell
    pub anchors_per_cell: usize,
    /// Whether keypoint outputs follow the box outputs
    pub with_keypoints: bool,
}

impl OutputLayout {
    /// Pick the layout for a model with `num_outputs` outputs
    #[must_use]
    pub fn from_output_count(num_outputs: usize) -> Self {
        let (strides, anchors_per_cell, with_keypoints) = match num_outputs {
            6 => (vec![8, 16, 32], 2, false),
            9 => (vec![8, 16, 32], 2, true),
            10 => (vec![8, 16, 32, 64, 128], 1, false),
            15 => (vec![8, 16, 32, 64, 128], 1, true),
            _ => {
                warn!("Unknown SCRFD model with {} outputs, assuming 3 strides without keypoints", num_outputs);
                (vec![8, 16, 32], 2, false)
            }
        };
        Self {
            strides,
            anchors_per_cell,
            with_keypoints,
        }
    }

    /// Offset between score, box and keypoint output groups
    #[must_use]
    pub fn group_size(&self) -> usize {
        self.strides.len()
    }
}

/// SCRFD face detector
pub struct FaceDetector {
    session: Session,
    input_size: (i32, i32),
    layout: OutputLayout,
    conf_threshold: f32,
    nms_threshold: f32,
    anchor_cache: HashMap<(i32, i32, i32), Vec<(f32, f32)>>,
}

impl FaceDetector {
    /// Load an SCRFD model from an ONNX file
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be loaded or has no inputs
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn new<P: AsRef<Path>>(model_path: P, conf_threshold: f32, nms_threshold: f32) -> Result<Self> {
        info!("Loading face detector: {}", model_path.as_ref().display());

        let environment = Arc::new(
            Environment::builder()
                .with_name("face_detector")
                .with_log_level(LoggingLevel::Warning)
                .build()?,
        );

        let session = SessionBuilder::new(&environment)?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_model_from_file(model_path)?;

        let input_meta = session
            .inputs
            .first()
            .ok_or_else(|| Error::ModelError("Model has no inputs".to_string()))?;

        // [batch, channels, height, width], dynamic dimensions fall back to 640
        let dims = &input_meta.dimensions;
        let input_size = if dims.len() >= 4 {
            let height = dims[2].map_or(SCRFD_DEFAULT_INPUT_SIZE, |d| d as i32);
            let width = dims[3].map_or(SCRFD_DEFAULT_INPUT_SIZE, |d| d as i32);
            (width, height)
        } else {
            (SCRFD_DEFAULT_INPUT_SIZE, SCRFD_DEFAULT_INPUT_SIZE)
        };

        let layout = OutputLayout::from_output_count(session.outputs.len());
        info!(
            "Face detector input {}x{}, strides {:?}, keypoints: {}",
            input_size.0, input_size.1, layout.strides, layout.with_keypoints
        );

        Ok(Self {
            session,
            input_size,
            layout,
            conf_threshold,
            nms_threshold,
            anchor_cache: HashMap::new(),
        })
    }

    /// Whether the loaded model predicts keypoints
    #[must_use]
    pub const fn has_keypoints(&self) -> bool {
        self.layout.with_keypoints
    }

    /// Detect faces in a BGR frame, best score first
    ///
    /// # Errors
    ///
    /// Returns an error if preprocessing or inference fails
    pub fn detect(&mut self, image: &Mat) -> Result<Vec<FaceDetection>> {
        let (input_width, input_height) = self.input_size;
        let fit = letterbox(image.cols(), image.rows(), input_width, input_height);

        let mut resized = Mat::default();
        imgproc::resize(
            image,
            &mut resized,
            Size::new(fit.width, fit.height),
            0.0,
            0.0,
            InterpolationFlags::INTER_LINEAR as i32,
        )?;

        // Pad right and bottom so the resized frame sits at the origin
        let mut padded = Mat::default();
        core::copy_make_border(
            &resized,
            &mut padded,
            0,
            (input_height - fit.height).max(0),
            0,
            (input_width - fit.width).max(0),
            core::BORDER_CONSTANT,
            Scalar::all(0.0),
        )?;

        let blob = Self::preprocess(&padded)?;
        let candidates = self.forward(blob)?;
        debug!("{} face candidates above threshold", candidates.len());

        Ok(non_max_suppression(candidates, self.nms_threshold)
            .into_iter()
            .map(|d| d.scaled(fit.scale))
            .collect())
    }

    /// BGR u8 image to normalized RGB NCHW tensor
    fn preprocess(image: &Mat) -> Result<Array4<f32>> {
        let height = i32_to_u32(image.rows())? as usize;
        let width = i32_to_u32(image.cols())? as usize;
        let mut blob = Array4::<f32>::zeros((1, 3, height, width));

        for row in 0..height {
            for col in 0..width {
                #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                let pixel = image.at_2d::<Vec3b>(row as i32, col as i32)?;
                // BGR -> RGB
                for (ch, &value) in [pixel[2], pixel[1], pixel[0]].iter().enumerate() {
                    blob[[0, ch, row, col]] =
                        (f32::from(value) - IMAGE_NORMALIZATION_OFFSET) / IMAGE_NORMALIZATION_SCALE;
                }
            }
        }

        Ok(blob)
    }

    /// Run the model and decode every stride
    fn forward(&mut self, blob: Array4<f32>) -> Result<Vec<FaceDetection>> {
        let input = CowArray::from(blob.into_dyn());
        let input_tensor = Value::from_array(self.session.allocator(), &input)?;
        let outputs = self.session.run(vec![input_tensor])?;

        let extract = |idx: usize| -> Result<Vec<f32>> {
            let output = outputs
                .get(idx)
                .ok_or_else(|| Error::ModelError(format!("Missing model output {idx}")))?;
            let tensor = output.try_extract::<f32>()?;
            let view = tensor.view();
            Ok(view.iter().copied().collect())
        };

        let group = self.layout.group_size();
        let (input_width, input_height) = self.input_size;
        let mut candidates = Vec::new();

        for (idx, &stride) in self.layout.strides.iter().enumerate() {
            let scores = extract(idx)?;
            let distances = extract(idx + group)?;
            let keypoints = if self.layout.with_keypoints {
                Some(extract(idx + group * 2)?)
            } else {
                None
            };

            let key = (input_height / stride, input_width / stride, stride);
            let anchors_per_cell = self.layout.anchors_per_cell;
            let centers = self
                .anchor_cache
                .entry(key)
                .or_insert_with(|| anchor_centers(key.0, key.1, stride, anchors_per_cell));

            candidates.extend(decode_stride(
                &scores,
                &distances,
                keypoints.as_deref(),
                centers,
                stride,
                self.conf_threshold,
            )?);
        }

        Ok(candidates)
    }
}

/// Anchor centers for a `height` x `width` feature map, row major
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn anchor_centers(height: i32, width: i32, stride: i32, anchors_per_cell: usize) -> Vec<(f32, f32)> {
    let mut centers = Vec::new();
    for y in 0..height {
        for x in 0..width {
            let center = ((x * stride) as f32, (y * stride) as f32);
            centers.extend(std::iter::repeat(center).take(anchors_per_cell.max(1)));
        }
    }
    centers
}

/// Decode one stride's raw outputs into candidate detections
///
/// `distances` holds four box distances per anchor and `keypoints` ten
/// offsets per anchor, both in stride units.
///
/// # Errors
///
/// Returns an error if the output sizes don't match the anchor count
#[allow(clippy::cast_precision_loss)]
pub fn decode_stride(
    scores: &[f32],
    distances: &[f32],
    keypoints: Option<&[f32]>,
    centers: &[(f32, f32)],
    stride: i32,
    threshold: f32,
) -> Result<Vec<FaceDetection>> {
    let n = centers.len();
    if scores.len() < n || distances.len() < n * 4 {
        return Err(Error::ModelError(format!(
            "Stride {stride}: expected {n} anchors, got {} scores and {} distances",
            scores.len(),
            distances.len()
        )));
    }
    if let Some(kps) = keypoints {
        if kps.len() < n * SCRFD_NUM_KEYPOINTS * 2 {
            return Err(Error::ModelError(format!(
                "Stride {stride}: expected {} keypoint values, got {}",
                n * SCRFD_NUM_KEYPOINTS * 2,
                kps.len()
            )));
        }
    }

    let s = stride as f32;
    let detections = centers
        .iter()
        .enumerate()
        .filter(|&(i, _)| scores[i] >= threshold)
        .map(|(i, &(cx, cy))| {
            let d = &distances[i * 4..i * 4 + 4];
            let keypoints = keypoints.map(|kps| {
                let base = i * SCRFD_NUM_KEYPOINTS * 2;
                let mut points = [(0.0, 0.0); SCRFD_NUM_KEYPOINTS];
                for (j, point) in points.iter_mut().enumerate() {
                    *point = (
                        cx + kps[base + j * 2] * s,
                        cy + kps[base + j * 2 + 1] * s,
                    );
                }
                points
            });
            FaceDetection {
                x1: cx - d[0] * s,
                y1: cy - d[1] * s,
                x2: cx + d[2] * s,
                y2: cy + d[3] * s,
                score: scores[i],
                keypoints,
            }
        })
        .collect();

    Ok(detections)
}

/// Greedy non-maximum suppression, returning survivors best score first
#[must_use]
pub fn non_max_suppression(mut candidates: Vec<FaceDetection>, iou_threshold: f32) -> Vec<FaceDetection> {
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    let mut keep: Vec<FaceDetection> = Vec::new();
    for candidate in candidates {
        if keep.iter().all(|k| k.iou(&candidate) <= iou_threshold) {
            keep.push(candidate);
        }
    }
    keep
}
