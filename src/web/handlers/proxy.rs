//! 通用代理分发器
//!
//! 每个请求走同一台状态机：OPTIONS 预检短路 → 参数校验 → 抓取 →
//! 分类 → 分支处理（二进制/JSON 直通、脚本直通、HTML 重写）→ 响应。
//! 通用路由和搜索引擎路由共用一条参数化流水线，只在 HTML 分支的
//! 站点处理上分叉。

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{
        header::{CONTENT_TYPE, USER_AGENT},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{Html, IntoResponse, Response},
};
use encoding_rs::Encoding;

use crate::core::{process_html_content, ContentClassification, ProxyError};
use crate::parsers::html::{inject_before_body_end, inject_debug_tools};
use crate::parsers::rewrite_json_assets;
use crate::utils::url::{decode_percent_escapes, Url, GOOGLE_ROUTE, PROXY_ROUTE};
use crate::web::headers::{apply_cors_headers, sanitize_response_headers};
use crate::web::postprocess::{search_interceptor_script, PostProcessOutcome};
use crate::web::types::{AppState, ProxyQuery};

/// HTML 分支结束后的站点处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyRoute {
    /// 通用路由：运行站点后处理器注册表
    Generic,
    /// 搜索引擎路由：注入表单解包与搜索拦截脚本，不再运行注册表
    Google,
}

impl ProxyRoute {
    fn path(self) -> &'static str {
        match self {
            ProxyRoute::Generic => PROXY_ROUTE,
            ProxyRoute::Google => GOOGLE_ROUTE,
        }
    }
}

/// 谷歌结果页专用：解包 tsf 表单并撑开搜索栏
const GOOGLE_FORM_UNWRAP_SCRIPT: &str = r#"
        <script>
          (() => {
            const form = document.getElementById('tsf');
            if (form) {
              const parent = form.parentNode;
              const children = Array.from(form.childNodes);
              children.forEach(child => parent.insertBefore(child, form));
              parent.removeChild(form);
              console.log('Form unwrapped successfully.');
            } else {
              console.warn('No form with ID "tsf" found.');
            }
          })();

          setInterval(function() {
            const searchBar = document.getElementsByClassName('SDkEP')[0];
            if (searchBar && searchBar.style.width !== '670px') {
              searchBar.style.width = '670px';
            }
          }, 10);
        </script>
      "#;

/// `GET /proxy`：通用代理与重写
pub async fn proxy(
    State(state): State<Arc<AppState>>,
    request_headers: HeaderMap,
    Query(params): Query<ProxyQuery>,
) -> Response {
    handle_proxy(state, request_headers, params, ProxyRoute::Generic).await
}

/// `GET /proxy/google`：带搜索引擎后处理的代理
pub async fn google_proxy(
    State(state): State<Arc<AppState>>,
    request_headers: HeaderMap,
    Query(params): Query<ProxyQuery>,
) -> Response {
    handle_proxy(state, request_headers, params, ProxyRoute::Google).await
}

/// `OPTIONS` 预检：固定 CORS 头加空 204
pub async fn preflight() -> Response {
    let mut headers = HeaderMap::new();
    apply_cors_headers(&mut headers);
    (StatusCode::NO_CONTENT, headers).into_response()
}

/// 参数化的代理流水线
async fn handle_proxy(
    state: Arc<AppState>,
    request_headers: HeaderMap,
    params: ProxyQuery,
    route: ProxyRoute,
) -> Response {
    // Validating：缺参或坏 URL 直接 400，不发起任何抓取
    let Some(raw_url) = params.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) else {
        return validation_error_response(&ProxyError::Validation(
            "Missing `url` query parameter.".to_string(),
        ));
    };
    let base_url: Url = match raw_url.parse() {
        Ok(parsed) => parsed,
        Err(err) => {
            return validation_error_response(&ProxyError::Validation(format!(
                "Invalid `url` query parameter: {err}"
            )));
        }
    };

    tracing::info!("Proxying: {}", raw_url);

    // Fetching：UA 透传，超时与 TLS 姿态由会话决定
    let user_agent = request_headers
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok());
    let fetched = match state.session.fetch(&base_url, user_agent, "*/*").await {
        Ok(result) => result,
        Err(err) => return proxy_error_response(&err),
    };

    // Classifying：只看 URL 扩展名和 Content-Type 头
    let classification = ContentClassification::classify(
        raw_url,
        fetched
            .headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
    );

    let mut response_headers = sanitize_response_headers(&fetched.headers);
    if let Ok(value) = HeaderValue::from_str(&classification.content_type) {
        response_headers.insert(CONTENT_TYPE, value);
    }

    // 图片、字体与 JSON 原样转发，状态透传
    if classification.is_passthrough_binary() || classification.is_json {
        return (fetched.status, response_headers, fetched.body).into_response();
    }

    let text = decode_body_text(&fetched.body, &classification);

    if !classification.is_html() {
        // 脚本与其他文本内容直通，不重写也不做转义还原
        return (fetched.status, response_headers, text).into_response();
    }

    let mut html = process_html_content(&text, &base_url, route.path());
    if state.session.options.debug_tools {
        html = inject_debug_tools(&html);
    }

    match route {
        ProxyRoute::Generic => match state.postprocessors.apply(&html, raw_url) {
            PostProcessOutcome::Replaced(body) => {
                // 终端替换体直接发送，跳过剩余流水线
                return (fetched.status, response_headers, Html(body)).into_response();
            }
            PostProcessOutcome::Rewritten(rewritten) => html = rewritten,
            PostProcessOutcome::Unchanged => {}
        },
        ProxyRoute::Google => {
            html = inject_before_body_end(&html, GOOGLE_FORM_UNWRAP_SCRIPT);
            html = inject_before_body_end(&html, &search_interceptor_script());
        }
    }

    html = rewrite_json_assets(&html, &base_url);
    html = decode_percent_escapes(&html);

    (fetched.status, response_headers, Html(html)).into_response()
}

/// 按声明的字符集解码响应体文本
fn decode_body_text(body: &[u8], classification: &ContentClassification) -> String {
    match classification
        .charset()
        .and_then(|label| Encoding::for_label(label.as_bytes()))
    {
        Some(encoding) => encoding.decode(body).0.into_owned(),
        None => String::from_utf8_lossy(body).into_owned(),
    }
}

/// 参数校验失败：400 纯文本，从不重试，不发起抓取
fn validation_error_response(err: &ProxyError) -> Response {
    tracing::warn!("{}", err);
    (StatusCode::BAD_REQUEST, err.to_string()).into_response()
}

/// Failed：抓取或内部错误映射为 500 HTML 错误页
fn proxy_error_response(err: &ProxyError) -> Response {
    tracing::error!("Proxy Error: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(format!("<h1>Proxy Error</h1><p>{}</p>", err)),
    )
        .into_response()
}
