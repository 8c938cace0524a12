#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sujit_editor::{Gateway, GatewayError, ImageBuffer};
use tokio::sync::oneshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Image,
    Text,
}

#[derive(Debug, Clone)]
pub struct Call {
    pub kind: CallKind,
    pub instruction: String,
    pub image: Option<ImageBuffer>,
}

enum Reply<T> {
    Now(Result<T, GatewayError>),
    Later(oneshot::Receiver<Result<T, GatewayError>>),
}

impl<T> Reply<T> {
    async fn resolve(self) -> Result<T, GatewayError> {
        match self {
            Reply::Now(result) => result,
            Reply::Later(rx) => rx
                .await
                .unwrap_or_else(|_| Err(GatewayError::Transport("reply dropped".into()))),
        }
    }
}

/// Records every call and answers from a script.
#[derive(Default)]
pub struct SpyGateway {
    calls: Mutex<Vec<Call>>,
    images: Mutex<VecDeque<Reply<ImageBuffer>>>,
    texts: Mutex<VecDeque<Reply<String>>>,
}

impl SpyGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply_image(&self, result: Result<ImageBuffer, GatewayError>) {
        self.images.lock().unwrap().push_back(Reply::Now(result));
    }

    pub fn defer_image(&self) -> oneshot::Sender<Result<ImageBuffer, GatewayError>> {
        let (tx, rx) = oneshot::channel();
        self.images.lock().unwrap().push_back(Reply::Later(rx));
        tx
    }

    pub fn reply_text(&self, result: Result<String, GatewayError>) {
        self.texts.lock().unwrap().push_back(Reply::Now(result));
    }

    pub fn defer_text(&self) -> oneshot::Sender<Result<String, GatewayError>> {
        let (tx, rx) = oneshot::channel();
        self.texts.lock().unwrap().push_back(Reply::Later(rx));
        tx
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, kind: CallKind, instruction: &str, image: Option<&ImageBuffer>) {
        self.calls.lock().unwrap().push(Call {
            kind,
            instruction: instruction.to_string(),
            image: image.cloned(),
        });
    }
}

#[async_trait]
impl Gateway for SpyGateway {
    async fn transform_image(
        &self,
        instruction: &str,
        image: Option<&ImageBuffer>,
    ) -> Result<ImageBuffer, GatewayError> {
        self.record(CallKind::Image, instruction, image);
        let reply = self.images.lock().unwrap().pop_front();
        match reply {
            Some(reply) => reply.resolve().await,
            None => Err(GatewayError::Transport("no scripted reply".into())),
        }
    }

    async fn generate_text(
        &self,
        instruction: &str,
        image: Option<&ImageBuffer>,
    ) -> Result<String, GatewayError> {
        self.record(CallKind::Text, instruction, image);
        let reply = self.texts.lock().unwrap().pop_front();
        match reply {
            Some(reply) => reply.resolve().await,
            None => Err(GatewayError::Transport("no scripted reply".into())),
        }
    }
}

pub fn png(bytes: &[u8]) -> ImageBuffer {
    ImageBuffer::new(bytes.to_vec(), "image/png")
}
