//! 站点专用后处理器
//!
//! 以谓词为键的小型注册表，每个处理器在通用流水线之后、
//! 百分号转义还原之前运行，彼此独立可测，
//! 避免把站点判断散落在分发器里。

use crate::parsers::html::inject_before_body_end;
use crate::utils::url::{encode_uri_component, GOOGLE_ROUTE, PROXY_ROUTE};

/// 后处理结果
#[derive(Debug, PartialEq, Eq)]
pub enum PostProcessOutcome {
    /// 未命中，文档不变
    Unchanged,
    /// 文档被改写，继续走剩余流水线（资产清单、转义还原）
    Rewritten(String),
    /// 文档被整体替换为终端响应体，跳过剩余流水线直接发送
    Replaced(String),
}

/// 站点后处理能力
pub trait PostProcessor: Send + Sync {
    fn name(&self) -> &'static str;

    /// 目标 URL 是否命中本处理器
    fn matches(&self, target_url: &str) -> bool;

    /// 对已重写的文档做站点专用处理
    fn apply(&self, html: &str, target_url: &str) -> PostProcessOutcome;
}

/// 搜索结果页：整体替换为跳转页
///
/// 跳转到 `/proxy/google`，让同一 URL 走另一套后处理再抓取一次。
/// 这是刻意的一次性强制改道，不是循环：另一条路由不再注册本处理器。
pub struct GoogleSearchProcessor;

impl PostProcessor for GoogleSearchProcessor {
    fn name(&self) -> &'static str {
        "google-search"
    }

    fn matches(&self, target_url: &str) -> bool {
        target_url.contains("google.com/search")
    }

    fn apply(&self, _html: &str, target_url: &str) -> PostProcessOutcome {
        let body = format!(
            r#"
      <body>
        <script>
          alert('Google will attempt to load from 3-30 or more times before it succeeds.');
          window.location.href = '{}?url={}';
        </script>
      </body>
    "#,
            GOOGLE_ROUTE,
            encode_uri_component(target_url)
        );
        PostProcessOutcome::Replaced(body)
    }
}

/// 搜索引擎主页：丢弃抓取结果，换上内置的替换页
///
/// 注入回车拦截脚本，把搜索提交改道回通用代理路由。
pub struct GoogleHomepageProcessor;

impl PostProcessor for GoogleHomepageProcessor {
    fn name(&self) -> &'static str {
        "google-homepage"
    }

    fn matches(&self, target_url: &str) -> bool {
        target_url.contains("https://google.com")
    }

    fn apply(&self, _html: &str, _target_url: &str) -> PostProcessOutcome {
        let homepage = include_str!("../../templates/google/index.html");
        PostProcessOutcome::Rewritten(inject_before_body_end(
            homepage,
            &search_interceptor_script(),
        ))
    }
}

/// 回车拦截脚本：把搜索框提交改写为经代理的搜索请求
///
/// 谷歌路由的注入和主页替换页共用同一段脚本。
pub fn search_interceptor_script() -> String {
    format!(
        r#"
          <script>
            document.addEventListener('DOMContentLoaded', function () {{
              const searchInput = document.querySelector('input[name="q"], textarea[name="q"]');
              if (searchInput) {{
                searchInput.addEventListener('keypress', function (event) {{
                  if (event.key === 'Enter') {{
                    event.preventDefault();
                    const searchTerm = searchInput.value;
                    const searchUrl = 'https://www.google.com/search?q=' + encodeURIComponent(searchTerm);
                    window.location.href = '{}?url=' + encodeURIComponent(searchUrl);
                  }}
                }});
              }}
            }});
          </script>
        "#,
        PROXY_ROUTE
    )
}

/// 后处理器注册表
pub struct PostProcessorRegistry {
    processors: Vec<Box<dyn PostProcessor>>,
}

impl PostProcessorRegistry {
    /// 创建带默认站点处理器的注册表
    pub fn new() -> Self {
        Self {
            processors: vec![
                Box::new(GoogleSearchProcessor),
                Box::new(GoogleHomepageProcessor),
            ],
        }
    }

    /// 应用第一个命中的处理器
    pub fn apply(&self, html: &str, target_url: &str) -> PostProcessOutcome {
        for processor in &self.processors {
            if processor.matches(target_url) {
                tracing::debug!(processor = processor.name(), %target_url, "post-processing");
                return processor.apply(html, target_url);
            }
        }
        PostProcessOutcome::Unchanged
    }
}

impl Default for PostProcessorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
