use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ordered set of class names the model's output indices map to.
///
/// Indices past the end of the list fall back to a synthetic `Class N` name
/// so a model emitting more classes than configured still produces a
/// complete response.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LabelSpace {
    labels: Vec<String>,
}

impl Default for LabelSpace {
    fn default() -> Self {
        Self::new(vec![
            "Anger and aggression".into(),
            "Anxiety".into(),
            "Happy".into(),
            "Sad".into(),
        ])
    }
}

impl LabelSpace {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    pub fn label_for(&self, index: usize) -> String {
        self.labels
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("Class {}", index))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PredictionResponse {
    pub predictions: BTreeMap<String, String>,
}

impl PredictionResponse {
    /// Maps a probability vector to labelled percentage strings,
    /// one entry per emitted index.
    pub fn from_probs(probs: &[f32], labels: &LabelSpace) -> Self {
        let predictions = probs
            .iter()
            .enumerate()
            .map(|(i, p)| (labels.label_for(i), format!("{:.2}%", p * 100.0)))
            .collect();
        Self { predictions }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ErrorResponse {
    pub error: String,
}
