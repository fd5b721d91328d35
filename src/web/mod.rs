//! Web 服务器模块
//!
//! 对外提供内容重写代理的 HTTP 服务
//!
//! # 模块组织
//!
//! - `config` - 服务器配置
//! - `headers` - 响应头清理与 CORS
//! - `postprocess` - 站点专用后处理器
//! - `routes` - 路由定义
//! - `types` - 应用状态与请求/响应类型
//! - `handlers` - 各路由的请求处理器

pub mod config;
pub mod handlers;
pub mod headers;
pub mod postprocess;
pub mod routes;
pub mod types;

use std::sync::Arc;

use crate::core::ProxyOptions;
use crate::network::Session;
use crate::web::types::AppState;

pub use config::WebConfig;

/// Web 服务器
pub struct WebServer {
    config: WebConfig,
    options: ProxyOptions,
}

impl WebServer {
    /// 创建新的 Web 服务器
    pub fn new(config: WebConfig, options: ProxyOptions) -> Self {
        Self { config, options }
    }

    /// 启动 Web 服务器
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error>> {
        let session = Session::new(self.options.clone())?;
        let state = Arc::new(AppState::new(session));
        let app = routes::create_routes().with_state(state);

        let addr = format!("{}:{}", self.config.bind_addr, self.config.port);
        tracing::info!("glacier web server listening on http://{}", addr);
        if self.options.insecure_tls {
            tracing::warn!("outbound TLS certificate verification is disabled");
        }

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
