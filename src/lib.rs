//! # Glacier Library
//!
//! 内容重写型 HTTP 正向代理：服务端抓取目标 URL，把页面里的
//! 链接、脚本、样式和结构化元数据引用全部改写为经过代理的地址，
//! 再返回改写后的内容。
//!
//! ## 模块组织
//!
//! - `core` - 错误分类、代理选项、响应分类与重写流水线编排
//! - `parsers` - 资源重写器（HTML、CSS、JavaScript、JSON 资产清单）
//! - `network` - 出站抓取会话
//! - `utils` - URL 工具与转义还原
//! - `env` - 类型安全的环境变量系统
//! - `web` - Web 服务器功能

pub mod core;
pub mod env;
pub mod network;
pub mod parsers;
pub mod utils;
pub mod web;

// Re-export commonly used items for convenience
pub use crate::core::*;
pub use crate::network::*;
pub use crate::parsers::*;
pub use crate::utils::*;
