//! Camera drivers

pub mod synthetic;

pub use synthetic::SyntheticCamera;

use crate::config::CameraConfig;
use crate::core::driver::Camera;
use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// Create a camera driver based on configuration
pub fn create_camera(name: &str, config: &CameraConfig) -> Result<Box<dyn Camera>> {
    match config.driver.as_str() {
        "synthetic" => Ok(Box::new(SyntheticCamera::new(name, config.clone()))),
        other => Err(Error::UnknownDevice(format!("camera driver '{}'", other))),
    }
}

/// Create every configured camera, keyed by name
pub fn create_cameras(
    configs: &BTreeMap<String, CameraConfig>,
) -> Result<BTreeMap<String, Box<dyn Camera>>> {
    configs
        .iter()
        .map(|(name, config)| Ok((name.clone(), create_camera(name, config)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_driver() {
        let mut config = CameraConfig::synthetic(30, 640, 480);
        config.driver = "realsense".to_string();
        assert!(matches!(
            create_camera("head", &config),
            Err(Error::UnknownDevice(_))
        ));
    }

    #[test]
    fn test_create_cameras_keeps_names() {
        let mut configs = BTreeMap::new();
        configs.insert("cam2".to_string(), CameraConfig::synthetic(30, 8, 8));
        configs.insert("cam1".to_string(), CameraConfig::synthetic(30, 8, 8));
        let cameras = create_cameras(&configs).unwrap();
        assert_eq!(cameras.keys().collect::<Vec<_>>(), vec!["cam1", "cam2"]);
        assert!(cameras.values().all(|c| !c.is_connected()));
    }
}
