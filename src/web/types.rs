//! Web 模块的数据类型定义

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::network::Session;
use crate::web::postprocess::PostProcessorRegistry;

/// 应用状态
///
/// 只持有只读共享的会话与后处理器注册表，
/// 并发请求之间没有可变共享状态。
#[derive(Clone)]
pub struct AppState {
    pub session: Session,
    pub postprocessors: Arc<PostProcessorRegistry>,
}

impl AppState {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            postprocessors: Arc::new(PostProcessorRegistry::new()),
        }
    }
}

/// 代理请求的查询参数
#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    /// 目标 URL（百分号编码）
    pub url: Option<String>,
    /// 嵌入路由的动作：`search` 或 `proxy`（默认）
    pub action: Option<String>,
}

/// JSON 错误响应体
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}
