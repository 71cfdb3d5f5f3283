//! Core data types handed to the recording pipeline.
//!
//! - [`Tensor`]: shaped, typed flat buffer
//! - [`Observation`] / [`Action`]: namespaced tensor maps returned by a teleop step
//! - [`StepLogs`]: timing samples keyed by name
//! - [`Feature`]: per-key description so a recorder can allocate up front

use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Observation key for the state vector
pub const OBS_STATE: &str = "observation.state";

/// Prefix for per-camera observation keys
pub const OBS_IMAGES_PREFIX: &str = "observation.images.";

/// Action key for the gamepad vector
pub const ACTION: &str = "action";

/// Observation key for a named camera
pub fn image_key(camera: &str) -> String {
    format!("{}{}", OBS_IMAGES_PREFIX, camera)
}

/// Element type of a tensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    F32,
    U8,
}

/// Flat tensor storage
#[derive(Debug, Clone, PartialEq)]
pub enum TensorData {
    F32(Vec<f32>),
    U8(Vec<u8>),
}

/// Row-major tensor
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: Vec<usize>,
    data: TensorData,
}

impl Tensor {
    /// 1-D float tensor
    pub fn from_f32(values: Vec<f32>) -> Self {
        Self {
            shape: vec![values.len()],
            data: TensorData::F32(values),
        }
    }

    /// HWC `u8` tensor from an RGB frame
    pub fn from_image(frame: RgbImage) -> Self {
        let (width, height) = frame.dimensions();
        Self {
            shape: vec![height as usize, width as usize, 3],
            data: TensorData::U8(frame.into_raw()),
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn dtype(&self) -> DType {
        match self.data {
            TensorData::F32(_) => DType::F32,
            TensorData::U8(_) => DType::U8,
        }
    }

    /// Number of elements
    pub fn numel(&self) -> usize {
        match &self.data {
            TensorData::F32(v) => v.len(),
            TensorData::U8(v) => v.len(),
        }
    }

    pub fn as_f32(&self) -> Option<&[f32]> {
        match &self.data {
            TensorData::F32(v) => Some(v),
            TensorData::U8(_) => None,
        }
    }

    pub fn as_u8(&self) -> Option<&[u8]> {
        match &self.data {
            TensorData::U8(v) => Some(v),
            TensorData::F32(_) => None,
        }
    }
}

/// Observation tensors keyed by `observation.*` names
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Observation {
    entries: BTreeMap<String, Tensor>,
}

impl Observation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, tensor: Tensor) {
        self.entries.insert(key.into(), tensor);
    }

    pub fn get(&self, key: &str) -> Option<&Tensor> {
        self.entries.get(key)
    }

    /// The `observation.state` tensor
    pub fn state(&self) -> Option<&Tensor> {
        self.get(OBS_STATE)
    }

    /// The frame of a named camera
    pub fn image(&self, camera: &str) -> Option<&Tensor> {
        self.get(&image_key(camera))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tensor)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Action tensors keyed by `action`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Action {
    entries: BTreeMap<String, Tensor>,
}

impl Action {
    /// Action map holding the single `action` tensor
    pub fn from_tensor(tensor: Tensor) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(ACTION.to_string(), tensor);
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&Tensor> {
        self.entries.get(key)
    }

    /// The `action` tensor
    pub fn action(&self) -> Option<&Tensor> {
        self.get(ACTION)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Timing samples in seconds, keyed by name (e.g. `read_pos_dt_s`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepLogs {
    samples: BTreeMap<String, f64>,
}

impl StepLogs {
    /// Record or overwrite a sample
    #[inline]
    pub fn set(&mut self, key: &str, seconds: f64) {
        if let Some(v) = self.samples.get_mut(key) {
            *v = seconds;
        } else {
            self.samples.insert(key.to_string(), seconds);
        }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.samples.get(key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.samples.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Description of one recorded key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub dtype: DType,
    pub shape: Vec<usize>,
    /// Channel or axis names (`["height", "width", "channel"]` for images)
    pub names: Vec<String>,
}
