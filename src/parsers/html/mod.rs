//! HTML 解析与重写
//!
//! # 模块组织
//!
//! - `dom` - HTML 解析、序列化与属性读写
//! - `rewrite` - DOM 级链接重写与脚本注入

pub mod dom;
pub mod rewrite;

// Re-export commonly used items for convenience
pub use dom::{get_node_attr, get_node_name, html_to_dom, serialize_document, set_node_attr};
pub use rewrite::{
    inject_before_body_end, inject_debug_tools, rewrite_document_urls, rewrite_embed_elements,
};
