//! JavaScript 跳转重写
//!
//! 内联脚本不是标记语言，这里用针对性的文本替换处理两类导航模式：
//! `location`/`location.href` 赋值（可带 `window.`/`top.`/`document.`
//! 限定）和 `window.open(...)` 调用。无法解析的目标保持原文。

use regex::{Captures, Regex};

use crate::utils::url::{resolve_target, to_proxied_url, Url};

/// 重写内联脚本中的导航调用
pub fn rewrite_js_navigation(data: &str, base_url: &Url, route: &str) -> String {
    let location_assign =
        Regex::new(r#"(?i)(?:window\.|top\.|document\.)?location(?:\.href)?\s*=\s*["'`](.*?)["'`]"#)
            .unwrap();
    let window_open =
        Regex::new(r#"(?i)window\.open\s*\(\s*["'`](.*?)["'`]\s*(,.*?)?\)"#).unwrap();

    let data = location_assign.replace_all(data, |caps: &Captures| {
        match resolve_navigation_target(base_url, &caps[1]) {
            Some(absolute_url) => {
                format!("window.location = '{}'", to_proxied_url(route, &absolute_url))
            }
            None => caps[0].to_string(),
        }
    });

    window_open
        .replace_all(&data, |caps: &Captures| {
            match resolve_navigation_target(base_url, &caps[1]) {
                Some(absolute_url) => {
                    let extra = caps.get(2).map_or("", |m| m.as_str());
                    format!(
                        "window.open('{}'{})",
                        to_proxied_url(route, &absolute_url),
                        extra
                    )
                }
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// 空目标按当前文档（`.`）处理
fn resolve_navigation_target(base_url: &Url, link: &str) -> Option<Url> {
    let link = if link.is_empty() { "." } else { link };
    resolve_target(base_url, link)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        "https://example.com/dir/page.html".parse().unwrap()
    }

    #[test]
    fn test_location_assignment() {
        let script = r#"window.location.href = "/next";"#;
        let result = rewrite_js_navigation(script, &base(), "/proxy");
        assert_eq!(
            result,
            "window.location = '/proxy?url=https%3A%2F%2Fexample.com%2Fnext';"
        );
    }

    #[test]
    fn test_qualified_and_bare_location() {
        for script in [
            r#"top.location = 'https://other.com/'"#,
            r#"document.location.href = 'https://other.com/'"#,
            r#"location = 'https://other.com/'"#,
        ] {
            let result = rewrite_js_navigation(script, &base(), "/proxy");
            assert_eq!(
                result,
                "window.location = '/proxy?url=https%3A%2F%2Fother.com%2F'"
            );
        }
    }

    #[test]
    fn test_window_open_preserves_extra_args() {
        let script = r#"window.open("popup.html", "_blank", "width=100")"#;
        let result = rewrite_js_navigation(script, &base(), "/proxy");
        assert_eq!(
            result,
            "window.open('/proxy?url=https%3A%2F%2Fexample.com%2Fdir%2Fpopup.html', \"_blank\", \"width=100\")"
        );
    }

    #[test]
    fn test_unresolvable_target_left_alone() {
        // javascript: 目标属于跳过 scheme，原文保留
        let script = r#"window.location = "javascript:void(0)""#;
        assert_eq!(rewrite_js_navigation(script, &base(), "/proxy"), script);
    }

    #[test]
    fn test_no_match_is_noop() {
        let script = "console.log('nothing to rewrite');";
        assert_eq!(rewrite_js_navigation(script, &base(), "/proxy"), script);
    }
}
