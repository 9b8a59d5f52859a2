//! Word-cloud render specification.
//!
//! Word-cloud layout stays an external responsibility; this module produces
//! the input the renderer consumes as JSON: the frequency table plus the
//! geometry, shape/mask, font and scaling parameters.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Canvas shape for the cloud.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudShape {
    Rectangle,
    Ellipse,
    /// Arbitrary grayscale mask image; requires `mask_path`.
    Custom,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudSpec {
    pub width: u32,
    pub height: u32,
    pub background_color: String,
    pub font_path: Option<PathBuf>,
    pub relative_scaling: f64,
    pub min_font_size: u32,
    pub max_font_size: u32,
    pub colormap: String,
    pub shape: CloudShape,
    pub mask_path: Option<PathBuf>,
    /// Word -> count, sorted for stable output.
    pub frequencies: BTreeMap<String, usize>,
}

impl CloudSpec {
    /// A spec with the default render parameters.
    pub fn new(word_freq: &HashMap<String, usize>) -> Self {
        Self {
            width: 1000,
            height: 600,
            background_color: "white".to_string(),
            font_path: None,
            relative_scaling: 0.5,
            min_font_size: 10,
            max_font_size: 100,
            colormap: "tab10".to_string(),
            shape: CloudShape::Rectangle,
            mask_path: None,
            frequencies: word_freq
                .iter()
                .map(|(w, &c)| (w.clone(), c))
                .collect(),
        }
    }

    /// Check referenced files and shape/mask consistency.
    pub fn validate(&self) -> Result<()> {
        if self.frequencies.is_empty() {
            return Err(Error::Chart("no words for the word cloud".to_string()));
        }
        if self.shape == CloudShape::Custom && self.mask_path.is_none() {
            return Err(Error::Chart(
                "custom shape requires a mask image".to_string(),
            ));
        }
        if let Some(path) = &self.mask_path {
            if !path.exists() {
                return Err(Error::MissingFile(path.clone()));
            }
        }
        if let Some(path) = &self.font_path {
            if !path.exists() {
                return Err(Error::MissingFile(path.clone()));
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn freq() -> HashMap<String, usize> {
        [("人工知能", 8), ("進化", 5)]
            .iter()
            .map(|(w, c)| (w.to_string(), *c))
            .collect()
    }

    #[test]
    fn test_default_parameters() {
        let spec = CloudSpec::new(&freq());
        assert_eq!(spec.width, 1000);
        assert_eq!(spec.height, 600);
        assert_eq!(spec.relative_scaling, 0.5);
        assert_eq!(spec.colormap, "tab10");
        assert_eq!(spec.shape, CloudShape::Rectangle);
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip() {
        let spec = CloudSpec::new(&freq());
        let json = spec.to_json().unwrap();
        let parsed: CloudSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.frequencies.get("人工知能"), Some(&8));
        assert_eq!(parsed.shape, CloudShape::Rectangle);
    }

    #[test]
    fn test_custom_shape_requires_mask() {
        let mut spec = CloudSpec::new(&freq());
        spec.shape = CloudShape::Custom;
        assert!(spec.validate().is_err());
    }

    #[test]
    fn test_missing_font_is_an_error() {
        let mut spec = CloudSpec::new(&freq());
        spec.font_path = Some(PathBuf::from("/nonexistent/font.ttc"));
        assert!(matches!(spec.validate(), Err(Error::MissingFile(_))));
    }

    #[test]
    fn test_empty_frequencies_rejected() {
        let spec = CloudSpec::new(&HashMap::new());
        assert!(spec.validate().is_err());
    }
}
