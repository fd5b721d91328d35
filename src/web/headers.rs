//! 响应头清理
//!
//! 复制上游响应头并剔除会阻止内嵌/重写内容的安全头，
//! 再统一覆盖固定的 CORS 头。

use axum::http::header::{
    HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN,
};

/// 会阻止页面被代理展示的安全头，必须剔除
const STRIPPED_HEADERS: &[&str] = &[
    "content-security-policy",
    "content-security-policy-report-only",
    "x-frame-options",
];

/// 逐跳头：响应体已被解压并重新发出，这些头不再成立
const HOP_BY_HOP_HEADERS: &[&str] = &[
    "transfer-encoding",
    "content-length",
    "content-encoding",
    "connection",
];

/// 设置固定的 CORS 头，覆盖上游同名值
pub fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, User-Agent, Referer"),
    );
}

/// 清理上游响应头
///
/// 复制全部头，大小写不敏感地剔除 CSP 系列与 `x-frame-options`，
/// 丢弃逐跳头，最后覆盖固定的 CORS 三元组。
pub fn sanitize_response_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut sanitized = HeaderMap::new();

    for (name, value) in upstream {
        let lowered = name.as_str().to_ascii_lowercase();
        if STRIPPED_HEADERS.contains(&lowered.as_str())
            || HOP_BY_HOP_HEADERS.contains(&lowered.as_str())
        {
            continue;
        }
        sanitized.append(name.clone(), value.clone());
    }

    apply_cors_headers(&mut sanitized);
    sanitized
}
