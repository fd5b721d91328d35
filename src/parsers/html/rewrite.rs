//! DOM 级链接重写
//!
//! 对格式良好的标签走解析树改写（属性 URL、懒加载标记、iframe 源、
//! 残留绝对链接）；内联脚本与 CSS 文本不是标记语言，
//! 由 `parsers::js` 和 `parsers::css` 的文本替换处理。

use markup5ever_rcdom::{Handle, NodeData};
use regex::Regex;

use crate::parsers::html::{get_node_attr, set_node_attr};
use crate::utils::url::{encode_uri_component, is_skippable_url, resolve_target, to_proxied_url, Url};

/// 通用重写覆盖的属性（iframe 的 src 与残留的 a[href] 同样在此列）
const REWRITE_ATTRS: &[&str] = &["src", "href", "srcset", "poster"];

/// 递归遍历 DOM 树并把引用重写为代理链接
///
/// 跳过 scheme 的引用逐字节保留；解析失败的引用原样放过，
/// 绝不让单条坏引用影响整个文档。
pub fn rewrite_document_urls(node: &Handle, base_url: &Url, route: &str) {
    if let NodeData::Element { .. } = node.data {
        for attr_name in REWRITE_ATTRS {
            if let Some(value) = get_node_attr(node, attr_name) {
                let trimmed = value.trim();
                if trimmed.is_empty() || is_skippable_url(trimmed) {
                    continue;
                }
                if let Some(absolute_url) = resolve_target(base_url, trimmed) {
                    set_node_attr(node, attr_name, Some(to_proxied_url(route, &absolute_url)));
                }
            }
        }

        // 破除懒加载：代理无法拦截后续动态抓取，资源必须首屏就加载
        if let Some(loading) = get_node_attr(node, "loading") {
            if loading.eq_ignore_ascii_case("lazy") {
                set_node_attr(node, "loading", Some("eager".to_string()));
            }
        }
    }

    for child_node in node.children.borrow().iter() {
        rewrite_document_urls(child_node, base_url, route);
    }
}

/// 视频嵌入页的元素级重写
///
/// 把 `img[src]`、`a[href]`、`video[src|poster]`、`form[action]` 中
/// 非绝对（不以 `http` 开头）的值改写为通用代理路由，
/// 不做相对解析，原值直接作为参数编码。
pub fn rewrite_embed_elements(node: &Handle, route: &str) {
    if let NodeData::Element { ref name, .. } = node.data {
        let attr_names: &[&str] = match name.local.as_ref() {
            "img" => &["src"],
            "a" => &["href"],
            "video" => &["src", "poster"],
            "form" => &["action"],
            _ => &[],
        };

        for attr_name in attr_names {
            if let Some(value) = get_node_attr(node, attr_name) {
                if !value.is_empty() && !value.starts_with("http") {
                    set_node_attr(
                        node,
                        attr_name,
                        Some(format!("{}?url={}", route, encode_uri_component(&value))),
                    );
                }
            }
        }
    }

    for child_node in node.children.borrow().iter() {
        rewrite_embed_elements(child_node, route);
    }
}

/// 在 `</body>` 前注入 eruda 调试控制台
///
/// 尽力而为：畸形输入缺少 `</body>` 时原文不变。
pub fn inject_debug_tools(html: &str) -> String {
    let closing_body = Regex::new(r"(?i)</body>").unwrap();
    closing_body
        .replace(
            html,
            r#"
    <script src="https://cdn.jsdelivr.net/npm/eruda"></script>
    <script>eruda.init();</script>
  </body>"#,
        )
        .into_owned()
}

/// 在 `</body>` 前注入任意脚本片段
pub fn inject_before_body_end(html: &str, snippet: &str) -> String {
    let closing_body = Regex::new(r"(?i)</body>").unwrap();
    closing_body
        .replace(html, format!("{}</body>", snippet.replace('$', "$$")))
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::html::{html_to_dom, serialize_document};

    fn rewrite(html: &str, base: &str, route: &str) -> String {
        let dom = html_to_dom(html.as_bytes(), "utf-8".to_string());
        let base_url: Url = base.parse().unwrap();
        rewrite_document_urls(&dom.document, &base_url, route);
        String::from_utf8(serialize_document(dom)).unwrap()
    }

    #[test]
    fn test_rewrite_document_urls() {
        let html = concat!(
            r#"<html><body>"#,
            r#"<img src="/a.png" loading="lazy">"#,
            r#"<a href="https://other.com/page">x</a>"#,
            r#"<video poster="p.jpg"></video>"#,
            r#"<iframe src="/frame.html"></iframe>"#,
            r#"</body></html>"#
        );
        let result = rewrite(html, "https://example.com/dir/", "/proxy");

        assert!(result.contains("/proxy?url=https%3A%2F%2Fexample.com%2Fa.png"));
        assert!(result.contains("/proxy?url=https%3A%2F%2Fother.com%2Fpage"));
        assert!(result.contains("/proxy?url=https%3A%2F%2Fexample.com%2Fdir%2Fp.jpg"));
        assert!(result.contains("/proxy?url=https%3A%2F%2Fexample.com%2Fframe.html"));
        // 懒加载被破除
        assert!(result.contains(r#"loading="eager""#));
        assert!(!result.contains(r#"loading="lazy""#));
    }

    #[test]
    fn test_rewrite_keeps_skip_schemes() {
        let html = r#"<html><body><a href="javascript:history.back()">back</a></body></html>"#;
        let result = rewrite(html, "https://example.com/", "/proxy");
        assert!(result.contains(r#"href="javascript:history.back()""#));
    }

    #[test]
    fn test_rewrite_embed_elements() {
        let html = concat!(
            r#"<html><body>"#,
            r#"<img src="/thumb.jpg">"#,
            r#"<a href="/watch?v=abc">w</a>"#,
            r#"<a href="https://example.com/full">f</a>"#,
            r#"<form action="/results"></form>"#,
            r#"</body></html>"#
        );
        let dom = html_to_dom(html.as_bytes(), "utf-8".to_string());
        rewrite_embed_elements(&dom.document, "/proxy");
        let result = String::from_utf8(serialize_document(dom)).unwrap();

        assert!(result.contains(r#"src="/proxy?url=%2Fthumb.jpg""#));
        assert!(result.contains(r#"href="/proxy?url=%2Fwatch%3Fv%3Dabc""#));
        assert!(result.contains(r#"action="/proxy?url=%2Fresults""#));
        // 绝对链接保持不变
        assert!(result.contains(r#"href="https://example.com/full""#));
    }

    #[test]
    fn test_inject_debug_tools() {
        let html = "<html><body>hi</BODY></html>";
        let result = inject_debug_tools(html);
        assert!(result.contains("cdn.jsdelivr.net/npm/eruda"));
        assert!(result.contains("eruda.init();"));

        // 缺少 </body> 时原文不变
        let fragment = "<div>no body end</div>";
        assert_eq!(inject_debug_tools(fragment), fragment);
    }
}
