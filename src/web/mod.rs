// HTTP surface: the single page plus a small JSON API the page polls and posts
// intents to. Handlers never touch state directly; they go through `Studio`.

mod page;

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

use crate::error::UploadError;
use crate::prompt::{Enhancement, Mode, UnknownEnhancement, WritingKind};
use crate::studio::{Studio, StudioState};
use crate::upload::{self, UploadedFile};

#[derive(Clone)]
pub struct AppState {
    pub studio: Arc<Studio>,
}

pub fn router(studio: Arc<Studio>, max_upload_bytes: usize) -> Router {
    let state = Arc::new(AppState { studio });

    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health))
        .route("/api/state", get(snapshot))
        .route("/api/mode", post(switch_mode))
        .route("/api/upload", post(upload_image))
        .route("/api/enhancements", post(set_enhancement))
        .route("/api/enhancements/:flag/toggle", post(toggle_enhancement))
        .route("/api/prompt", post(set_prompt))
        .route("/api/process", post(process))
        .route("/api/writing", post(write).delete(dismiss_text))
        .route("/api/reset", post(new_project))
        .route("/api/image/:slot", get(serve_image))
        .route("/api/download", get(download))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .with_state(state)
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        };
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<UnknownEnhancement> for ApiError {
    fn from(err: UnknownEnhancement) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

type ApiResult<T> = Result<T, ApiError>;

async fn index() -> Html<&'static str> {
    Html(page::INDEX_HTML)
}

async fn health() -> &'static str {
    "ok"
}

async fn snapshot(State(app): State<Arc<AppState>>) -> Json<StudioState> {
    Json(app.studio.snapshot())
}

#[derive(Deserialize)]
struct ModeRequest {
    mode: Mode,
}

async fn switch_mode(
    State(app): State<Arc<AppState>>,
    Json(req): Json<ModeRequest>,
) -> Json<StudioState> {
    Json(app.studio.switch_mode(req.mode))
}

async fn upload_image(
    State(app): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<Json<StudioState>> {
    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if field.file_name().is_none() && field.name() != Some("image") {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        file = Some(UploadedFile {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
        break;
    }

    let image = upload::accept(file).await.map_err(|e| {
        warn!(error = %e, "upload rejected");
        ApiError::from(e)
    })?;

    app.studio
        .select_image(image)
        .map(Json)
        .ok_or_else(|| ApiError::Conflict("a request is already in progress".to_string()))
}

#[derive(Deserialize)]
struct EnhancementRequest {
    flag: String,
    enabled: bool,
}

async fn set_enhancement(
    State(app): State<Arc<AppState>>,
    Json(req): Json<EnhancementRequest>,
) -> ApiResult<Json<StudioState>> {
    let flag: Enhancement = req
        .flag
        .parse()
        .map_err(ApiError::from)?;
    Ok(Json(app.studio.set_enhancement(flag, req.enabled)))
}

async fn toggle_enhancement(
    State(app): State<Arc<AppState>>,
    Path(flag): Path<String>,
) -> ApiResult<Json<StudioState>> {
    let flag: Enhancement = flag.parse().map_err(ApiError::from)?;
    Ok(Json(app.studio.toggle_enhancement(flag)))
}

#[derive(Deserialize)]
struct PromptRequest {
    text: String,
}

async fn set_prompt(
    State(app): State<Arc<AppState>>,
    Json(req): Json<PromptRequest>,
) -> Json<StudioState> {
    Json(app.studio.set_prompt(req.text))
}

async fn process(State(app): State<Arc<AppState>>) -> ApiResult<(StatusCode, Json<StudioState>)> {
    match app.studio.start_processing() {
        Some(_) => Ok((StatusCode::ACCEPTED, Json(app.studio.snapshot()))),
        None => Err(ApiError::Conflict(
            "nothing to process, or a request is already in progress".to_string(),
        )),
    }
}

#[derive(Deserialize)]
struct WritingRequest {
    kind: WritingKind,
}

async fn write(
    State(app): State<Arc<AppState>>,
    Json(req): Json<WritingRequest>,
) -> ApiResult<(StatusCode, Json<StudioState>)> {
    match app.studio.start_writing(req.kind) {
        Some(_) => Ok((StatusCode::ACCEPTED, Json(app.studio.snapshot()))),
        None => Err(ApiError::Conflict("writing already in progress".to_string())),
    }
}

async fn dismiss_text(State(app): State<Arc<AppState>>) -> Json<StudioState> {
    Json(app.studio.dismiss_text())
}

async fn new_project(State(app): State<Arc<AppState>>) -> ApiResult<Json<StudioState>> {
    app.studio
        .new_project()
        .map(Json)
        .ok_or_else(|| ApiError::Conflict("a request is already in progress".to_string()))
}

async fn serve_image(
    State(app): State<Arc<AppState>>,
    Path(slot): Path<String>,
) -> ApiResult<Response> {
    let state = app.studio.snapshot();
    let image = match slot.as_str() {
        "original" => state.original_image(),
        "edited" => state.edited_image(),
        _ => return Err(ApiError::NotFound(format!("unknown image `{}`", slot))),
    }
    .ok_or_else(|| ApiError::NotFound(format!("no {} image", slot)))?;

    Ok((
        [
            (header::CONTENT_TYPE, image.mime_type().to_string()),
            (header::CACHE_CONTROL, "no-cache".to_string()),
        ],
        image.bytes().to_vec(),
    )
        .into_response())
}

async fn download(State(app): State<Arc<AppState>>) -> ApiResult<Response> {
    let state = app.studio.snapshot();
    let (file_name, image) = state
        .download()
        .ok_or_else(|| ApiError::NotFound("no result to download".to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, image.mime_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        image.bytes().to_vec(),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::error::GatewayError;
    use crate::gateway::Gateway;
    use crate::image::ImageBuffer;

    struct Echo;

    #[async_trait]
    impl Gateway for Echo {
        async fn transform_image(
            &self,
            _instruction: &str,
            _image: Option<&ImageBuffer>,
        ) -> Result<ImageBuffer, GatewayError> {
            Ok(ImageBuffer::new(b"Y".to_vec(), "image/png"))
        }

        async fn generate_text(
            &self,
            _instruction: &str,
            _image: Option<&ImageBuffer>,
        ) -> Result<String, GatewayError> {
            Ok("caption".to_string())
        }
    }

    /// Never answers, so a run stays in flight.
    struct Stalled;

    #[async_trait]
    impl Gateway for Stalled {
        async fn transform_image(
            &self,
            _instruction: &str,
            _image: Option<&ImageBuffer>,
        ) -> Result<ImageBuffer, GatewayError> {
            std::future::pending().await
        }

        async fn generate_text(
            &self,
            _instruction: &str,
            _image: Option<&ImageBuffer>,
        ) -> Result<String, GatewayError> {
            std::future::pending().await
        }
    }

    fn app() -> (Router, Arc<Studio>) {
        app_with(Arc::new(Echo))
    }

    fn app_with(gateway: Arc<dyn Gateway>) -> (Router, Arc<Studio>) {
        let studio = Arc::new(Studio::new(gateway, Duration::from_millis(1200)));
        (router(studio.clone(), 1024 * 1024), studio)
    }

    fn empty_post(uri: &str) -> Request<Body> {
        Request::post(uri).body(Body::empty()).unwrap()
    }

    async fn fetch(app: Router, uri: &str) -> Response {
        app.oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart(field: &str, file_name: &str, content_type: &str, data: &[u8]) -> Request<Body> {
        let boundary = "sujit-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
        Request::post("/api/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn index_serves_the_page() {
        let (app, _) = app();
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("Sujit"));
    }

    #[tokio::test]
    async fn process_without_image_is_a_conflict() {
        let (app, studio) = app();
        let (status, body) = send(app, Request::post("/api/process").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["error"].is_string());
        assert_eq!(studio.snapshot().status(), &crate::studio::Status::Idle);
    }

    #[tokio::test]
    async fn upload_then_process() {
        let (app, studio) = app();
        let (status, body) = send(app.clone(), multipart("image", "me.png", "image/png", b"X")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["originalImage"]["mimeType"], "image/png");

        let (status, body) = send(app, Request::post("/api/process").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body["mode"], "edit");

        for _ in 0..50 {
            if studio.snapshot().edited_image().is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(
            studio.snapshot().edited_image(),
            Some(&ImageBuffer::new(b"Y".to_vec(), "image/png"))
        );
    }

    #[tokio::test]
    async fn upload_without_file_is_rejected() {
        let (app, studio) = app();
        let boundary = "sujit-boundary";
        let req = Request::post("/api/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(format!("--{boundary}--\r\n")))
            .unwrap();
        let (status, body) = send(app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
        assert!(studio.snapshot().original_image().is_none());
    }

    #[tokio::test]
    async fn enhancement_endpoints_respect_exclusivity() {
        let (app, _) = app();
        let (_, body) = send(
            app.clone(),
            post_json("/api/enhancements", json!({ "flag": "removeBackground", "enabled": true })),
        )
        .await;
        assert_eq!(body["enhancements"]["removeBackground"], true);

        let (status, body) = send(
            app.clone(),
            Request::post("/api/enhancements/himalayanBackground/toggle")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["enhancements"]["himalayanBackground"], true);
        assert_eq!(body["enhancements"]["removeBackground"], false);

        let (_, body) = send(
            app.clone(),
            post_json("/api/enhancements", json!({ "flag": "removeBackground", "enabled": false })),
        )
        .await;
        assert_eq!(body["enhancements"]["himalayanBackground"], true);

        let (status, _) = send(
            app,
            post_json("/api/enhancements", json!({ "flag": "sparkles", "enabled": true })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn mode_switch_resets_images() {
        let (app, studio) = app();
        send(app.clone(), multipart("image", "me.png", "image/png", b"X")).await;
        let (status, body) = send(app, post_json("/api/mode", json!({ "mode": "generate" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mode"], "generate");
        assert!(body["originalImage"].is_null());
        assert_eq!(studio.snapshot().mode(), Mode::Generate);
    }

    #[tokio::test]
    async fn download_needs_a_result() {
        let (app, studio) = app();
        let response = app
            .clone()
            .oneshot(Request::get("/api/download").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        studio.switch_mode(Mode::Generate);
        studio.set_prompt("a cat");
        studio.process().await;

        let response = app
            .oneshot(Request::get("/api/download").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"sujit_generate_result.png\""
        );
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"Y");
    }

    #[tokio::test]
    async fn images_are_served_from_their_own_endpoint() {
        let (app, _) = app();
        send(app.clone(), multipart("image", "me.png", "image/png", b"X")).await;

        let (_, body) = send(app.clone(), Request::get("/api/state").body(Body::empty()).unwrap()).await;
        assert_eq!(body["originalImage"], json!({ "mimeType": "image/png", "size": 1 }));
        assert!(body["revision"].is_u64());

        let response = fetch(app.clone(), "/api/image/original").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"X");

        assert_eq!(fetch(app.clone(), "/api/image/edited").await.status(), StatusCode::NOT_FOUND);
        assert_eq!(fetch(app, "/api/image/thumbnail").await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn second_process_while_busy_is_a_conflict() {
        let (app, studio) = app_with(Arc::new(Stalled));
        send(app.clone(), multipart("image", "me.png", "image/png", b"X")).await;

        let (status, body) = send(app.clone(), empty_post("/api/process")).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body["status"]["state"], "processing");

        let (status, body) = send(app.clone(), empty_post("/api/process")).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["error"].is_string());

        let (status, _) = send(app, empty_post("/api/reset")).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(studio.snapshot().status().is_processing());
    }

    #[tokio::test]
    async fn reset_starts_a_new_project() {
        let (app, studio) = app();
        send(app.clone(), multipart("image", "me.png", "image/png", b"X")).await;

        let (status, body) = send(app, empty_post("/api/reset")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["originalImage"].is_null());
        assert!(body["editedImage"].is_null());
        assert_eq!(body["status"]["state"], "idle");
        assert!(studio.snapshot().original_image().is_none());
    }

    #[tokio::test]
    async fn writing_can_be_requested_and_dismissed() {
        let (app, studio) = app();
        send(app.clone(), multipart("image", "me.png", "image/png", b"X")).await;

        let (status, body) = send(
            app.clone(),
            post_json("/api/writing", json!({ "kind": "caption" })),
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body["textLoading"], true);

        for _ in 0..50 {
            if studio.snapshot().generated_text().is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(studio.snapshot().generated_text(), Some("caption"));

        let response = app
            .clone()
            .oneshot(Request::delete("/api/writing").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(studio.snapshot().generated_text().is_none());

        let (status, _) = send(app, post_json("/api/writing", json!({ "kind": "poem" }))).await;
        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn second_writing_request_is_a_conflict() {
        let (app, _) = app_with(Arc::new(Stalled));
        let (status, _) = send(
            app.clone(),
            post_json("/api/writing", json!({ "kind": "story" })),
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);

        let (status, body) = send(app, post_json("/api/writing", json!({ "kind": "caption" }))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["error"].is_string());
    }
}
