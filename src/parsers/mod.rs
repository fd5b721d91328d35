//! # 解析器模块
//!
//! 这个模块包含所有用于解析和重写不同类型 web 资源的功能：
//!
//! - HTML 解析、DOM 操作与属性链接重写
//! - CSS 文本中 `url()` 引用的重写
//! - 内联 JavaScript 跳转调用的重写
//! - 属性内嵌 JSON 资产清单的重写
//!
//! # 模块组织
//!
//! - `html` - HTML 文档解析、DOM 操作、链接重写、脚本注入
//! - `css` - CSS 文本的 URL 重写
//! - `js` - 内联脚本导航重写
//! - `json_assets` - `content="..."` 属性中 JSON 资产清单的重写

pub mod css;
pub mod html;
pub mod js;
pub mod json_assets;

// Re-export commonly used items for convenience
pub use css::rewrite_css_urls;
pub use html::{
    html_to_dom, inject_debug_tools, rewrite_document_urls, rewrite_embed_elements,
    serialize_document,
};
pub use js::rewrite_js_navigation;
pub use json_assets::rewrite_json_assets;
