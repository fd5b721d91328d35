//! # 网络模块
//!
//! 这个模块包含与出站网络通信相关的功能：
//!
//! - HTTP 会话管理和目标资源抓取
//! - 抓取结果的状态、头部和响应体封装
//!
//! # 模块组织
//!
//! - `session` - HTTP 会话管理、出站请求处理

pub mod session;

// Re-export commonly used items for convenience
pub use session::{FetchResult, Session};
