//! 视频平台路由
//!
//! `/proxy/video` 抓取观看页并注入播放器替换脚本：页面里的播放器
//! 报错元素一出现，就换成指向嵌入路由的 iframe。
//! `/proxy/video/embed` 按 `action` 参数分两种模式：`search` 做
//! 元素级重写，默认 `proxy` 原样直通。
//! 这两条路由的错误响应是 JSON 体。

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header::CONTENT_TYPE, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};

use crate::parsers::html::{
    html_to_dom, inject_before_body_end, inject_debug_tools, rewrite_embed_elements,
    serialize_document,
};
use crate::utils::url::{Url, PROXY_ROUTE, VIDEO_EMBED_ROUTE};
use crate::web::headers::apply_cors_headers;
use crate::web::types::{AppState, ErrorResponse, ProxyQuery};

/// `GET /proxy/video`：观看页代理
pub async fn video_proxy(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ProxyQuery>,
) -> Response {
    let Some(raw_url) = params.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) else {
        return json_error(StatusCode::BAD_REQUEST, "Missing URL parameter");
    };
    let target_url: Url = match raw_url.parse() {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::warn!(url = raw_url, %err, "invalid video URL");
            return json_error(StatusCode::BAD_REQUEST, "Missing URL parameter");
        }
    };

    tracing::info!("Fetching URL: {}", raw_url);

    let fetched = match state
        .session
        .fetch(&target_url, Some("Mozilla/5.0"), "text/html")
        .await
    {
        Ok(result) => result,
        Err(err) => {
            tracing::error!("Error occurred: {}", err);
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
        }
    };

    let content_type = fetched
        .headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("text/html")
        .to_string();

    let mut response_headers = HeaderMap::new();
    apply_cors_headers(&mut response_headers);
    if let Ok(value) = HeaderValue::from_str(&content_type) {
        response_headers.insert(CONTENT_TYPE, value);
    }

    if !content_type.contains("text/html") {
        return (fetched.status, response_headers, fetched.body).into_response();
    }

    let mut html = String::from_utf8_lossy(&fetched.body).into_owned();

    if let Some(video_id) = extract_video_id(&target_url) {
        html = inject_before_body_end(&html, &iframe_replacement_script(&video_id));
    }
    if state.session.options.debug_tools {
        html = inject_debug_tools(&html);
    }

    (StatusCode::OK, response_headers, html).into_response()
}

/// `GET /proxy/video/embed`：嵌入资源代理
pub async fn video_embed(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ProxyQuery>,
) -> Response {
    let Some(raw_url) = params.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) else {
        return json_error(StatusCode::BAD_REQUEST, "Missing URL parameter");
    };
    let target_url: Url = match raw_url.parse() {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::warn!(url = raw_url, %err, "invalid embed URL");
            return json_error(StatusCode::BAD_REQUEST, "Missing URL parameter");
        }
    };

    let fetched = match state
        .session
        .fetch(&target_url, Some("Mozilla/5.0"), "text/html")
        .await
    {
        Ok(result) => result,
        Err(err) => {
            tracing::error!("Error proxying request: {}", err);
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
        }
    };

    let mut response_headers = HeaderMap::new();
    apply_cors_headers(&mut response_headers);
    if let Some(content_type) = fetched.headers.get(CONTENT_TYPE) {
        response_headers.insert(CONTENT_TYPE, content_type.clone());
    }

    if params.action.as_deref() == Some("search") {
        // 元素级重写：相对引用全部改道回通用代理路由
        let dom = html_to_dom(&fetched.body, "utf-8".to_string());
        rewrite_embed_elements(&dom.document, PROXY_ROUTE);
        let mut html = String::from_utf8_lossy(&serialize_document(dom)).into_owned();
        if state.session.options.debug_tools {
            html = inject_debug_tools(&html);
        }
        return (fetched.status, response_headers, html).into_response();
    }

    // 默认 proxy 动作：保留内容类型原样直通
    (fetched.status, response_headers, fetched.body).into_response()
}

/// 从观看页 URL 提取视频 ID
///
/// 先看 `v` 查询参数，再看 `/shorts/<id>` 路径段。
fn extract_video_id(url: &Url) -> Option<String> {
    if let Some((_, id)) = url.query_pairs().find(|(key, _)| key == "v") {
        if !id.is_empty() {
            return Some(id.into_owned());
        }
    }

    url.path()
        .split_once("/shorts/")
        .map(|(_, rest)| rest.trim_matches('/').to_string())
        .filter(|id| !id.is_empty())
}

/// 播放器替换脚本：报错元素出现时换成嵌入路由的 iframe
fn iframe_replacement_script(video_id: &str) -> String {
    format!(
        r#"
        <script>
          (function () {{
            const videoId = "{video_id}";
            const iframe = document.createElement('iframe');
            iframe.src = '{embed_route}?url=https://www.youtube.com/embed/' + videoId;
            iframe.style = 'width:100%; height:100%; border:none; position:absolute; top:0; left:0; z-index:1;';
            iframe.allow = 'accelerometer; autoplay; encrypted-media; gyroscope; picture-in-picture';
            iframe.allowFullscreen = true;

            const observer = new MutationObserver((mutations, obs) => {{
              const target = document.querySelector('yt-player-error-message-renderer');
              if (target) {{
                target.replaceWith(iframe);
                obs.disconnect();
              }}
            }});

            observer.observe(document.body, {{ childList: true, subtree: true }});
          }})();
        </script>
      "#,
        video_id = video_id,
        embed_route = VIDEO_EMBED_ROUTE,
    )
}

fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}
