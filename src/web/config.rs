//! Web 服务器配置
//!
//! 使用类型安全的环境变量系统进行配置管理

use crate::core::ProxyOptions;
use crate::env::{proxy, web, EnvResult, EnvVar};

/// Web 服务器配置
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// 绑定地址
    pub bind_addr: String,
    /// 端口
    pub port: u16,
}

impl WebConfig {
    /// 从环境变量创建配置
    pub fn from_env() -> EnvResult<Self> {
        Ok(Self {
            bind_addr: web::BindAddr::get()?,
            port: web::Port::get()?,
        })
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 7080,
        }
    }
}

/// 从环境变量构建代理选项
pub fn proxy_options_from_env() -> EnvResult<ProxyOptions> {
    Ok(ProxyOptions {
        timeout: proxy::FetchTimeout::get()?,
        insecure_tls: proxy::InsecureTls::get()?,
        debug_tools: proxy::DebugTools::get()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WebConfig::default();
        assert_eq!(config.bind_addr, "127.0.0.1");
        assert_eq!(config.port, 7080);
    }
}
