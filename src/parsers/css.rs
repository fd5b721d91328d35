//! CSS URL 重写
//!
//! 样式文本不是标记语言，这里对两类引用做针对性文本替换：
//! `--background-image` 自定义属性声明和一般的 `url(...)` 引用。
//! 已是绝对地址、`data:` 或协议相对（`//`）的引用不动。

use regex::{Captures, Regex};

use crate::utils::url::{resolve_target, to_proxied_url, Url};

/// 重写 CSS 文本中的资源引用
pub fn rewrite_css_urls(data: &str, base_url: &Url, route: &str) -> String {
    let custom_property =
        Regex::new(r#"(--background-image\s*:\s*url\(["']?)([^"')]+)(["']?\))"#).unwrap();
    let generic_url = Regex::new(r#"(?i)url\(["']?([^"')]+)["']?\)"#).unwrap();

    let data = custom_property.replace_all(data, |caps: &Captures| {
        let reference = &caps[2];
        if reference.starts_with("http") {
            return caps[0].to_string();
        }
        match resolve_target(base_url, reference) {
            Some(absolute_url) => format!(
                "{}{}{}",
                &caps[1],
                to_proxied_url(route, &absolute_url),
                &caps[3]
            ),
            None => caps[0].to_string(),
        }
    });

    generic_url
        .replace_all(&data, |caps: &Captures| {
            let reference = &caps[1];
            // 已代理（route 开头）、data:、绝对和协议相对引用保持原样
            if reference.starts_with("data:")
                || reference.starts_with("http")
                || reference.starts_with("//")
                || reference.starts_with(route)
            {
                return caps[0].to_string();
            }
            match resolve_target(base_url, reference) {
                Some(absolute_url) => format!("url('{}')", to_proxied_url(route, &absolute_url)),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        "https://ex.com/dir/".parse().unwrap()
    }

    #[test]
    fn test_relative_url_rewritten() {
        let css = "background: url(/img/a.png);";
        let result = rewrite_css_urls(css, &base(), "/proxy");
        assert_eq!(
            result,
            "background: url('/proxy?url=https%3A%2F%2Fex.com%2Fimg%2Fa.png');"
        );
    }

    #[test]
    fn test_quoted_relative_url() {
        let css = r#"background-image: url("paper.gif");"#;
        let result = rewrite_css_urls(css, &base(), "/proxy");
        assert!(result.contains("/proxy?url=https%3A%2F%2Fex.com%2Fdir%2Fpaper.gif"));
    }

    #[test]
    fn test_absolute_data_and_protocol_relative_untouched() {
        for css in [
            "background: url(https://cdn.com/a.png);",
            "background: url(data:image/png;base64,AAAA);",
            "background: url(//cdn.com/a.png);",
        ] {
            assert_eq!(rewrite_css_urls(css, &base(), "/proxy"), css);
        }
    }

    #[test]
    fn test_custom_property_rewritten() {
        let css = "--background-image: url('/bg/hero.jpg');";
        let result = rewrite_css_urls(css, &base(), "/proxy");
        assert_eq!(
            result,
            "--background-image: url('/proxy?url=https%3A%2F%2Fex.com%2Fbg%2Fhero.jpg');"
        );

        let absolute = "--background-image: url(https://cdn.com/bg.jpg);";
        assert_eq!(rewrite_css_urls(absolute, &base(), "/proxy"), absolute);
    }

    #[test]
    fn test_no_match_is_noop() {
        let css = "body { color: red; }";
        assert_eq!(rewrite_css_urls(css, &base(), "/proxy"), css);
    }
}
