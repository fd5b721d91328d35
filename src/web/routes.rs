//! Web 路由定义

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::web::{handlers::*, types::AppState};

/// 创建代理路由结构
///
/// 每条路由都带 OPTIONS 预检短路。
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        // 通用代理与重写
        .route("/proxy", get(proxy).options(preflight))
        // 搜索引擎专用后处理
        .route("/proxy/google", get(google_proxy).options(preflight))
        // 视频观看页与嵌入资源
        .route("/proxy/video", get(video_proxy).options(preflight))
        .route("/proxy/video/embed", get(video_embed).options(preflight))
}
