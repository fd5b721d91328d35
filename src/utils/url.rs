//! URL 处理工具
//!
//! 提供目标 URL 解析、代理 URL 构建和百分号转义还原功能。
//! 所有重写器都通过 [`to_proxied_url`] 构建代理链接，
//! 保证"被代理"的含义只有一个定义点。

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

pub use url::Url;

/// 代理路由路径
pub const PROXY_ROUTE: &str = "/proxy";
/// 搜索引擎专用代理路由路径
pub const GOOGLE_ROUTE: &str = "/proxy/google";
/// 视频页面代理路由路径
pub const VIDEO_ROUTE: &str = "/proxy/video";
/// 视频嵌入代理路由路径
pub const VIDEO_EMBED_ROUTE: &str = "/proxy/video/embed";

/// Define the percent-encoding set for URLs - encode everything except unreserved characters
const URL_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ').add(b'"').add(b'<').add(b'>').add(b'`')
    .add(b':').add(b'/').add(b'?').add(b'#').add(b'[').add(b']').add(b'@')
    .add(b'!').add(b'$').add(b'&').add(b'\'').add(b'(').add(b')')
    .add(b'*').add(b'+').add(b',').add(b';').add(b'=');

/// 与 JavaScript encodeURIComponent 行为对齐的编码集
const COMPONENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ').add(b'"').add(b'#').add(b'$').add(b'%').add(b'&').add(b'+')
    .add(b',').add(b'/').add(b':').add(b';').add(b'<').add(b'=').add(b'>')
    .add(b'?').add(b'@').add(b'[').add(b'\\').add(b']').add(b'^').add(b'`')
    .add(b'{').add(b'|').add(b'}');

/// 判断引用是否属于不应重写的 scheme
///
/// `data:`、`mailto:` 和 `javascript:` 引用必须原样保留，
/// 任何重写器都不得修改它们。
pub fn is_skippable_url(reference: &str) -> bool {
    reference.starts_with("data:")
        || reference.starts_with("mailto:")
        || reference.starts_with("javascript:")
}

/// 将（可能是相对的）引用解析为绝对 URL
///
/// 跳过的 scheme 或解析失败时返回 `None`，调用方保留原始文本，
/// 绝不向上抛错。
pub fn resolve_target(base_url: &Url, reference: &str) -> Option<Url> {
    if is_skippable_url(reference) {
        return None;
    }
    base_url.join(reference).ok()
}

/// 构建代理 URL：路由路径加上百分号编码后的目标 URL 参数
pub fn to_proxied_url(route: &str, absolute_url: &Url) -> String {
    format!(
        "{}?url={}",
        route,
        utf8_percent_encode(absolute_url.as_str(), URL_ENCODE_SET)
    )
}

/// 按 encodeURIComponent 的规则编码一段文本
pub fn encode_uri_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT_ENCODE_SET).to_string()
}

/// 还原固定表内的百分号转义（%20–%7E，十六进制字母为大写）
///
/// 对整个文档做一次从左到右的字面替换，把上游编码步骤引入的
/// 可打印 ASCII 转义还原为字符本身，使最终 HTML 可读。
/// 小写十六进制（如 `%3c`）不在表内，保持原样。
/// 只在 HTML 分支调用一次，二进制/JSON/脚本分支不得调用。
pub fn decode_percent_escapes(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2])) {
                let code = hi * 16 + lo;
                if (0x20..=0x7E).contains(&code) {
                    out.push(code);
                    i += 3;
                    continue;
                }
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    // 替换只产生 ASCII 字节，输出仍是合法 UTF-8
    String::from_utf8(out).unwrap_or_else(|_| text.to_string())
}

fn hex_digit(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_skippable_url() {
        assert!(is_skippable_url("data:text/plain;base64,SGVsbG8="));
        assert!(is_skippable_url("mailto:test@example.com"));
        assert!(is_skippable_url("javascript:void(0)"));

        assert!(!is_skippable_url("https://example.com"));
        assert!(!is_skippable_url("/relative/path"));
        assert!(!is_skippable_url("relative.html"));
    }

    #[test]
    fn test_resolve_target() {
        let base: Url = "https://example.com/dir/page".parse().unwrap();

        // 相对引用相对于 base 解析
        let resolved = resolve_target(&base, "/img/a.png").unwrap();
        assert_eq!(resolved.as_str(), "https://example.com/img/a.png");

        let resolved = resolve_target(&base, "other.html").unwrap();
        assert_eq!(resolved.as_str(), "https://example.com/dir/other.html");

        // 跳过的 scheme 返回 None
        assert!(resolve_target(&base, "javascript:void(0)").is_none());
        assert!(resolve_target(&base, "data:image/png;base64,AAAA").is_none());
        assert!(resolve_target(&base, "mailto:a@b.c").is_none());
    }

    #[test]
    fn test_to_proxied_url() {
        let url: Url = "https://other.com/page".parse().unwrap();
        assert_eq!(
            to_proxied_url(PROXY_ROUTE, &url),
            "/proxy?url=https%3A%2F%2Fother.com%2Fpage"
        );
    }

    #[test]
    fn test_proxied_url_wrap_depth() {
        // 已代理引用再次包装后，内层目标保持不变（嵌套深度受单次重写约束）
        let target: Url = "https://example.com/page".parse().unwrap();
        let proxied = to_proxied_url(PROXY_ROUTE, &target);

        let base: Url = "https://example.com/".parse().unwrap();
        let rewrapped = resolve_target(&base, &proxied).unwrap();
        let inner = rewrapped
            .query_pairs()
            .find(|(key, _)| key == "url")
            .map(|(_, value)| value.into_owned())
            .unwrap();
        assert_eq!(inner, "https://example.com/page");
    }

    #[test]
    fn test_decode_percent_escapes() {
        assert_eq!(decode_percent_escapes("%3Chtml%3E"), "<html>");
        assert_eq!(decode_percent_escapes("a%20b%21"), "a b!");
        assert_eq!(
            decode_percent_escapes("https%3A%2F%2Fexample.com%2F"),
            "https://example.com/"
        );

        // 表外内容保持不变
        assert_eq!(decode_percent_escapes("no escapes here"), "no escapes here");
        assert_eq!(decode_percent_escapes("%3c"), "%3c"); // 小写十六进制不在表内
        assert_eq!(decode_percent_escapes("%ZZ"), "%ZZ");
        assert_eq!(decode_percent_escapes("100%"), "100%");
    }

    #[test]
    fn test_encode_uri_component() {
        assert_eq!(
            encode_uri_component("https://example.com/?q=1"),
            "https%3A%2F%2Fexample.com%2F%3Fq%3D1"
        );
        assert_eq!(encode_uri_component("a b"), "a%20b");
    }
}
