use crate::book::ExampleId;
use crate::error::AppError;
use crate::render::{render_page, QaFormState};
use crate::server::state::AppState;
use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};

/// 表单提交
#[derive(Debug, Deserialize)]
pub struct AskForm {
    pub example: String,
    #[serde(default)]
    pub question: String,
}

/// JSON 问答请求
#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub question: String,
    #[serde(default)]
    pub example: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub answer: String,
    pub section: String,
}

/// 健康检查响应
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// 运行秒数
    pub uptime: u64,
    pub documents: usize,
}

/// 请求中的示例标识必须与当前加载的一致
fn check_example(state: &AppState, raw: &str) -> Result<(), AppError> {
    let example = ExampleId::parse(raw)?;
    if &example != state.example() {
        return Err(AppError::UnknownExample(example.to_string()));
    }
    Ok(())
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_page(&state.page, &QaFormState::default()))
}

pub async fn ask_form(
    State(state): State<AppState>,
    Form(form): Form<AskForm>,
) -> Result<Html<String>, AppError> {
    check_example(&state, &form.example)?;

    let prediction = state.ask_blocking(form.question.clone()).await?;
    let form_state = QaFormState {
        question: form.question,
        answer: Some(prediction.answer),
        section: Some(prediction.section),
    };

    Ok(Html(render_page(&state.page, &form_state)))
}

pub async fn api_answer(
    State(state): State<AppState>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, AppError> {
    if let Some(example) = &request.example {
        check_example(&state, example)?;
    }

    let prediction = state.ask_blocking(request.question).await?;
    Ok(Json(AnswerResponse {
        answer: prediction.answer,
        section: prediction.section,
    }))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let body = HealthResponse {
        status: "up".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: state.started_at.elapsed().as_secs(),
        documents: state.document_count(),
    };

    (
        [
            (header::CACHE_CONTROL, "no-store, no-cache, must-revalidate"),
            (header::PRAGMA, "no-cache"),
        ],
        Json(body),
    )
}
