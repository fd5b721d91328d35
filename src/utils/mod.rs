//! # 工具模块
//!
//! 这个模块包含各种工具函数和实用程序：
//!
//! - URL 处理和解析工具
//! - 代理 URL 构建
//! - 百分号转义还原
//!
//! # 模块组织
//!
//! - `url` - URL 解析、代理链接构建、转义还原等工具函数

pub mod url;

// Re-export commonly used items for convenience
pub use url::{
    decode_percent_escapes, encode_uri_component, is_skippable_url, resolve_target,
    to_proxied_url, Url, GOOGLE_ROUTE, PROXY_ROUTE, VIDEO_EMBED_ROUTE, VIDEO_ROUTE,
};
