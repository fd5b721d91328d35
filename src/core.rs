//! # 核心模块
//!
//! 包含代理处理的核心逻辑：
//!
//! - 错误分类（参数校验、上游抓取、未预期错误）
//! - 代理选项
//! - 响应内容分类（图片、二进制、JSON、脚本、HTML）
//! - HTML 重写流水线的编排

use thiserror::Error;

use crate::parsers::html::{html_to_dom, rewrite_document_urls, serialize_document};
use crate::parsers::{rewrite_css_urls, rewrite_js_navigation};
use crate::utils::url::Url;

/// 代理处理过程中可能出现的错误
///
/// 单条引用的重写失败在发生处就地恢复，不会出现在这里；
/// 只有参数校验失败、上游抓取失败和未预期错误会传播到分发器。
#[derive(Debug, Error)]
pub enum ProxyError {
    /// 缺少或非法的 `url` 查询参数
    #[error("{0}")]
    Validation(String),
    /// 上游抓取失败（网络错误、超时；非 2xx 状态不是错误）
    #[error("{0}")]
    UpstreamFetch(String),
    /// 未预期的内部错误
    #[error("{0}")]
    Unexpected(String),
}

/// 代理行为选项
///
/// 每个请求独立处理，选项在服务启动时确定后只读共享。
#[derive(Debug, Clone)]
pub struct ProxyOptions {
    /// 出站抓取超时（秒）
    pub timeout: u64,
    /// 是否关闭出站 TLS 证书校验
    ///
    /// 默认关闭校验：代理需要能访问证书配置有误的站点。
    /// 这是刻意明确的信任放宽，可通过 `GLACIER_INSECURE_TLS=false` 恢复校验。
    pub insecure_tls: bool,
    /// 是否向重写后的页面注入调试工具脚本
    pub debug_tools: bool,
}

impl Default for ProxyOptions {
    fn default() -> Self {
        Self {
            timeout: 30,
            insecure_tls: true,
            debug_tools: true,
        }
    }
}

/// 图片扩展名
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp", "svg"];
/// 字体等二进制扩展名
const BINARY_EXTENSIONS: &[&str] = &["woff", "woff2", "ttf", "eot", "otf", "ico"];

/// 响应内容分类
///
/// 仅由目标 URL 扩展名和响应 Content-Type 头派生，创建后不可变，
/// 从不检查响应体字节。分支优先级：图片/二进制 > JSON >（脚本抑制
/// HTML 重写）> HTML > 原样转发。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentClassification {
    pub is_image: bool,
    pub is_binary: bool,
    pub is_json: bool,
    pub is_script: bool,
    pub content_type: String,
}

impl ContentClassification {
    /// 按目标 URL 扩展名和 Content-Type 头分类
    pub fn classify(target_url: &str, content_type_header: Option<&str>) -> Self {
        // 扩展名针对 URL 路径部分测试，忽略查询串和片段
        let path = target_url
            .split(['?', '#'])
            .next()
            .unwrap_or(target_url)
            .to_ascii_lowercase();
        let extension = path.rsplit('.').next().filter(|ext| !ext.contains('/'));

        let has_ext =
            |extensions: &[&str]| extension.is_some_and(|ext| extensions.contains(&ext));

        Self {
            is_image: has_ext(IMAGE_EXTENSIONS),
            is_binary: has_ext(BINARY_EXTENSIONS),
            is_json: has_ext(&["json"]),
            is_script: has_ext(&["js"]),
            content_type: content_type_header
                .filter(|value| !value.is_empty())
                .unwrap_or("application/octet-stream")
                .to_string(),
        }
    }

    /// 图片或字体等二进制内容，原样转发字节
    pub fn is_passthrough_binary(&self) -> bool {
        self.is_image || self.is_binary
    }

    /// 是否走 HTML 重写分支（脚本扩展名抑制 HTML 重写）
    pub fn is_html(&self) -> bool {
        !self.is_script && self.content_type.contains("text/html")
    }

    /// 从 Content-Type 头提取字符集标签
    pub fn charset(&self) -> Option<&str> {
        self.content_type
            .split(';')
            .map(str::trim)
            .find_map(|part| part.strip_prefix("charset="))
            .map(|value| value.trim_matches('"'))
    }
}

/// 对 HTML 文档执行通用重写流水线
///
/// 固定顺序：DOM 阶段重写 `src`/`href`/`srcset`/`poster` 属性、
/// 懒加载标记、iframe 源和残留的绝对链接；文本阶段重写内联脚本
/// 的跳转调用和 CSS `url()` 引用。每一步无匹配时原文不变，
/// 单条引用失败只放弃该条，绝不让整个响应失败。
pub fn process_html_content(html: &str, base_url: &Url, route: &str) -> String {
    let dom = html_to_dom(html.as_bytes(), "utf-8".to_string());
    rewrite_document_urls(&dom.document, base_url, route);
    let html = String::from_utf8_lossy(&serialize_document(dom)).into_owned();

    let html = rewrite_js_navigation(&html, base_url, route);
    rewrite_css_urls(&html, base_url, route)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_image_extensions() {
        for url in [
            "https://example.com/a.png",
            "https://example.com/a.JPG",
            "https://example.com/dir/pic.webp",
            "https://example.com/pic.svg",
        ] {
            let classification = ContentClassification::classify(url, Some("text/html"));
            // 图片扩展名优先于声明的 Content-Type
            assert!(classification.is_image, "{url} should classify as image");
            assert!(!classification.is_html());
        }
    }

    #[test]
    fn test_classify_binary_and_json_and_script() {
        let font = ContentClassification::classify("https://example.com/f.woff2", None);
        assert!(font.is_binary && !font.is_image);
        assert_eq!(font.content_type, "application/octet-stream");

        let json = ContentClassification::classify("https://example.com/data.json", Some("application/json"));
        assert!(json.is_json && !json.is_binary);

        let script =
            ContentClassification::classify("https://example.com/app.js", Some("text/html"));
        assert!(script.is_script);
        // 脚本扩展名抑制 HTML 重写
        assert!(!script.is_html());
    }

    #[test]
    fn test_classify_html_by_content_type() {
        // 无扩展名的 URL 通过 Content-Type 走 HTML 分支
        let classification =
            ContentClassification::classify("https://example.com/page", Some("text/html; charset=utf-8"));
        assert!(!classification.is_image);
        assert!(!classification.is_binary);
        assert!(!classification.is_json);
        assert!(!classification.is_script);
        assert!(classification.is_html());
        assert_eq!(classification.charset(), Some("utf-8"));
    }

    #[test]
    fn test_classify_query_string_ignored() {
        let classification =
            ContentClassification::classify("https://example.com/a.png?v=2#top", None);
        assert!(classification.is_image);
    }

    #[test]
    fn test_classification_exclusivity() {
        // 每个 (url, content-type) 组合只会选中一个分发分支
        let cases = [
            ("https://example.com/a.png", Some("text/html")),
            ("https://example.com/f.woff", Some("text/html")),
            ("https://example.com/d.json", Some("text/html")),
            ("https://example.com/s.js", Some("text/html")),
            ("https://example.com/page", Some("text/html")),
            ("https://example.com/page", Some("text/plain")),
        ];
        for (url, content_type) in cases {
            let c = ContentClassification::classify(url, content_type);
            let branches = [
                c.is_passthrough_binary(),
                !c.is_passthrough_binary() && c.is_json,
                !c.is_passthrough_binary() && !c.is_json && c.is_html(),
            ];
            assert!(
                branches.iter().filter(|selected| **selected).count() <= 1,
                "multiple branches for {url}"
            );
        }
    }

    #[test]
    fn test_process_html_content_rewrites_attributes() {
        let base: Url = "https://example.com/dir/".parse().unwrap();
        let html = r#"<html><body><img src="/img/a.png"><a href="page.html">x</a></body></html>"#;
        let result = process_html_content(html, &base, "/proxy");

        assert!(result.contains("/proxy?url=https%3A%2F%2Fexample.com%2Fimg%2Fa.png"));
        assert!(result.contains("/proxy?url=https%3A%2F%2Fexample.com%2Fdir%2Fpage.html"));
    }

    #[test]
    fn test_process_html_content_skip_schemes_untouched() {
        let base: Url = "https://example.com/".parse().unwrap();
        let html = concat!(
            r#"<html><body>"#,
            r#"<a href="javascript:void(0)">js</a>"#,
            r#"<a href="mailto:a@b.c">mail</a>"#,
            r#"<img src="data:image/png;base64,AAAA">"#,
            r#"</body></html>"#
        );
        let result = process_html_content(html, &base, "/proxy");

        // 跳过 scheme 的引用逐字节保留
        assert!(result.contains(r#"href="javascript:void(0)""#));
        assert!(result.contains(r#"href="mailto:a@b.c""#));
        assert!(result.contains(r#"src="data:image/png;base64,AAAA""#));
    }
}
