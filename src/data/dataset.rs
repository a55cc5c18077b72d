use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::domain::image::Image;

/// Training wrapper around the one loaded image.
/// Reports a length of 1 and hands back the same image for any index.
pub struct ImageDataset {
    /// The single training sample, cloned out on every `get`
    image: Image,
}

impl ImageDataset {
    pub fn new(image: Image) -> Self { Self { image } }
}

impl Dataset<Image> for ImageDataset {
    fn get(&self, _index: usize) -> Option<Image> {
        Some(self.image.clone())
    }

    fn len(&self) -> usize {
        1
    }
}

/// One positional record of the validation set: the fragments found at
/// `index` in the data and labels fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationItem {
    pub index: usize,
    pub data:  String,
    pub label: String,
}

pub const VALIDATION_DATA:   &str = "/content/7/7.jpeg";
pub const VALIDATION_LABELS: &str = "/content/7/7test.txt";

/// Validation wrapper over a `data` and a `labels` field.
///
/// The constructor arguments are not used: both fields are always the two
/// fixed path strings. Records are produced by positional access into those
/// strings, so the batcher rejects the first record (a path character is
/// neither image bytes nor a class index).
pub struct ValidationDataset {
    data:   String,
    labels: String,
}

impl ValidationDataset {
    pub fn new(_data: impl Into<String>, _labels: impl Into<String>) -> Self {
        Self {
            data:   VALIDATION_DATA.to_string(),
            labels: VALIDATION_LABELS.to_string(),
        }
    }

    /// Set both fields directly, for exercising the loop on other inputs.
    #[cfg(test)]
    pub fn with_fields(data: impl Into<String>, labels: impl Into<String>) -> Self {
        Self { data: data.into(), labels: labels.into() }
    }

    /// A validation set with no records.
    #[cfg(test)]
    pub fn empty() -> Self {
        Self::with_fields("", "")
    }
}

impl Dataset<ValidationItem> for ValidationDataset {
    fn get(&self, index: usize) -> Option<ValidationItem> {
        let data  = self.data.chars().nth(index)?;
        let label = self.labels.chars().nth(index)?;
        Some(ValidationItem {
            index,
            data:  data.to_string(),
            label: label.to_string(),
        })
    }

    fn len(&self) -> usize {
        self.data.chars().count()
    }
}
