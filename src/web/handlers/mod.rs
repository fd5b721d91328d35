//! 请求处理器
//!
//! - `proxy` - 通用与搜索引擎代理分发器
//! - `youtube` - 视频观看页与嵌入资源路由

pub mod proxy;
pub mod youtube;

pub use proxy::{google_proxy, preflight, proxy};
pub use youtube::{video_embed, video_proxy};
