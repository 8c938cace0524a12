//! Sujit Editor: portrait enhancement and photo generation on top of Gemini.
//!
//! The browser page is a thin view over [`studio::Studio`], which owns the
//! request lifecycle. Instructions are built by [`prompt::assemble`] and sent
//! through a [`gateway::Gateway`].

pub mod config;
pub mod error;
pub mod gateway;
pub mod image;
pub mod progress;
pub mod prompt;
pub mod studio;
pub mod upload;
pub mod web;

pub use config::Config;
pub use error::{GatewayError, UploadError};
pub use gateway::{GeminiGateway, Gateway, KeySource};
pub use crate::image::ImageBuffer;
pub use prompt::{assemble, Enhancement, Mode, Selection, WritingKind};
pub use studio::{ProcessOutcome, Status, Studio, StudioState, WritingOutcome};
