// Decorative step list shown while a request is in flight. It is advanced by a
// timer and has no relation to how far the model actually got.

use serde::Serialize;

use crate::prompt::Mode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressStep {
    pub id: String,
    pub label: String,
    pub is_complete: bool,
}

const EDIT_LABELS: [&str; 5] = [
    "Analyzing visual context...",
    "Segmenting subjects...",
    "Processing background layers...",
    "Applying neural filters...",
    "Optimizing final render...",
];

const GENERATE_LABELS: [&str; 5] = [
    "Interpreting writing prompt...",
    "Sampling latent space...",
    "Synthesizing textures...",
    "Enhancing resolution...",
    "Finalizing composition...",
];

/// Fresh, all-incomplete steps for a run in `mode`.
pub fn template(mode: Mode) -> Vec<ProgressStep> {
    let labels = match mode {
        Mode::Edit => EDIT_LABELS,
        Mode::Generate => GENERATE_LABELS,
    };
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| ProgressStep {
            id: (i + 1).to_string(),
            label: (*label).to_string(),
            is_complete: false,
        })
        .collect()
}

/// One timer tick: completes the first incomplete step unless it is the last one.
/// Returns whether anything changed.
pub fn advance(steps: &mut [ProgressStep]) -> bool {
    let last = steps.len().saturating_sub(1);
    match steps.iter().position(|s| !s.is_complete) {
        Some(next) if next < last => {
            steps[next].is_complete = true;
            true
        }
        _ => false,
    }
}

pub fn complete_all(steps: &mut [ProgressStep]) {
    for step in steps {
        step.is_complete = true;
    }
}

/// Completed share in `0.0..=1.0`, for the progress bar.
pub fn fraction(steps: &[ProgressStep]) -> f32 {
    if steps.is_empty() {
        return 0.0;
    }
    steps.iter().filter(|s| s.is_complete).count() as f32 / steps.len() as f32
}
