//! Immutable studio snapshots and their transitions.
//!
//! Each transition takes `&self` and hands back a new snapshot, or `None` when
//! the event does not apply in the current state. Requests carry the run number
//! they were started under; results for a run that has since been superseded
//! are dropped.

use serde::Serialize;

use crate::image::ImageBuffer;
use crate::progress::{self, ProgressStep};
use crate::prompt::{self, Enhancement, Mode, Selection, WritingKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Status {
    Idle,
    Processing,
    Success,
    Error { message: String },
}

impl Status {
    pub fn is_processing(&self) -> bool {
        matches!(self, Status::Processing)
    }
}

/// Everything needed to make the image call for one run.
#[derive(Debug, Clone)]
pub struct ProcessJob {
    pub run: u64,
    pub mode: Mode,
    pub instruction: String,
    pub image: Option<ImageBuffer>,
}

#[derive(Debug, Clone)]
pub struct WritingJob {
    pub run: u64,
    pub prompt: &'static str,
    pub image: Option<ImageBuffer>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudioState {
    mode: Mode,
    status: Status,
    original_image: Option<ImageBuffer>,
    edited_image: Option<ImageBuffer>,
    enhancements: Selection,
    prompt: String,
    steps: Vec<ProgressStep>,
    progress: f32,
    generated_text: Option<String>,
    text_loading: bool,
    /// Bumped whenever the images may have changed; the page uses it to refetch.
    #[serde(rename = "revision")]
    run: u64,
    #[serde(skip)]
    writing_run: u64,
}

impl Default for StudioState {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            status: Status::Idle,
            original_image: None,
            edited_image: None,
            enhancements: Selection::default(),
            prompt: String::new(),
            steps: Vec::new(),
            progress: 0.0,
            generated_text: None,
            text_loading: false,
            run: 0,
            writing_run: 0,
        }
    }
}

impl StudioState {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn original_image(&self) -> Option<&ImageBuffer> {
        self.original_image.as_ref()
    }

    pub fn edited_image(&self) -> Option<&ImageBuffer> {
        self.edited_image.as_ref()
    }

    pub fn enhancements(&self) -> &Selection {
        &self.enhancements
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn steps(&self) -> &[ProgressStep] {
        &self.steps
    }

    pub fn generated_text(&self) -> Option<&str> {
        self.generated_text.as_deref()
    }

    pub fn text_loading(&self) -> bool {
        self.text_loading
    }

    pub fn run(&self) -> u64 {
        self.run
    }

    /// The image writing works on: the result if there is one, else the upload.
    pub fn displayed_image(&self) -> Option<&ImageBuffer> {
        self.edited_image.as_ref().or(self.original_image.as_ref())
    }

    /// Result image and the file name it downloads under.
    pub fn download(&self) -> Option<(String, &ImageBuffer)> {
        self.edited_image
            .as_ref()
            .map(|image| (download_name(self.mode), image))
    }

    fn with_steps(mut self, steps: Vec<ProgressStep>) -> Self {
        self.progress = progress::fraction(&steps);
        self.steps = steps;
        self
    }

    /// Drops images, result and generated text; any request in flight is
    /// superseded.
    pub fn switch_mode(&self, mode: Mode) -> Self {
        let mut next = self.clone().with_steps(Vec::new());
        next.mode = mode;
        next.status = Status::Idle;
        next.original_image = None;
        next.edited_image = None;
        next.generated_text = None;
        next.text_loading = false;
        next.run += 1;
        next.writing_run += 1;
        next
    }

    /// Replaces the upload. Refused while a request is in flight.
    pub fn select_image(&self, image: ImageBuffer) -> Option<Self> {
        if self.status.is_processing() {
            return None;
        }
        let mut next = self.clone().with_steps(Vec::new());
        next.status = Status::Idle;
        next.original_image = Some(image);
        next.edited_image = None;
        next.generated_text = None;
        next.run += 1;
        Some(next)
    }

    pub fn set_enhancement(&self, flag: Enhancement, on: bool) -> Self {
        let mut next = self.clone();
        next.enhancements.set(flag, on);
        next
    }

    pub fn toggle_enhancement(&self, flag: Enhancement) -> Self {
        let mut next = self.clone();
        next.enhancements.toggle(flag);
        next
    }

    pub fn set_prompt(&self, text: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.prompt = text.into();
        next
    }

    /// Idle/Success/Error → Processing.
    ///
    /// Refused (no transition) when a request is already running, when Edit mode
    /// has no image, or when Generate mode has no description.
    pub fn begin_processing(&self) -> Option<(Self, ProcessJob)> {
        if self.status.is_processing() {
            return None;
        }
        let image = match self.mode {
            Mode::Edit => Some(self.original_image.clone()?),
            Mode::Generate if self.prompt.trim().is_empty() => return None,
            Mode::Generate => None,
        };

        let mut next = self.clone().with_steps(progress::template(self.mode));
        next.status = Status::Processing;
        next.run += 1;

        let job = ProcessJob {
            run: next.run,
            mode: self.mode,
            instruction: prompt::assemble(self.mode, &self.enhancements, &self.prompt),
            image,
        };
        Some((next, job))
    }

    /// Cosmetic timer tick. No-op unless `run` is the live processing run.
    pub fn tick(&self, run: u64) -> Option<Self> {
        if run != self.run || !self.status.is_processing() {
            return None;
        }
        let mut steps = self.steps.clone();
        if !progress::advance(&mut steps) {
            return None;
        }
        Some(self.clone().with_steps(steps))
    }

    /// Processing → Success.
    pub fn succeed(&self, run: u64, image: ImageBuffer) -> Option<Self> {
        if run != self.run || !self.status.is_processing() {
            return None;
        }
        let mut steps = self.steps.clone();
        progress::complete_all(&mut steps);
        let mut next = self.clone().with_steps(steps);
        next.status = Status::Success;
        next.edited_image = Some(image);
        Some(next)
    }

    /// Processing → Error. Images are left as they were.
    pub fn fail(&self, run: u64, message: impl Into<String>) -> Option<Self> {
        if run != self.run || !self.status.is_processing() {
            return None;
        }
        let mut message = message.into();
        if message.trim().is_empty() {
            message = "Failed to process image.".to_string();
        }
        let mut next = self.clone();
        next.status = Status::Error { message };
        Some(next)
    }

    /// "New project": back to Idle with nothing loaded.
    pub fn new_project(&self) -> Option<Self> {
        if self.status.is_processing() {
            return None;
        }
        let mut next = self.clone().with_steps(Vec::new());
        next.status = Status::Idle;
        next.original_image = None;
        next.edited_image = None;
        next.generated_text = None;
        next.run += 1;
        Some(next)
    }

    /// Starts a caption/story request. Only one at a time; independent of the
    /// processing status.
    pub fn begin_writing(&self, kind: WritingKind) -> Option<(Self, WritingJob)> {
        if self.text_loading {
            return None;
        }
        let mut next = self.clone();
        next.text_loading = true;
        next.writing_run += 1;
        let job = WritingJob {
            run: next.writing_run,
            prompt: kind.prompt(),
            image: self.displayed_image().cloned(),
        };
        Some((next, job))
    }

    /// Ends a writing request. `None` text means it failed and the previous text
    /// stays.
    pub fn finish_writing(&self, run: u64, text: Option<String>) -> Option<Self> {
        if run != self.writing_run || !self.text_loading {
            return None;
        }
        let mut next = self.clone();
        next.text_loading = false;
        if let Some(text) = text {
            next.generated_text = Some(text);
        }
        Some(next)
    }

    pub fn dismiss_text(&self) -> Self {
        let mut next = self.clone();
        next.generated_text = None;
        next
    }
}

pub fn download_name(mode: Mode) -> String {
    format!("sujit_{}_result.png", mode)
}
