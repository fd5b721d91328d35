//! 统一的环境变量管理系统
//!
//! 提供类型安全、可验证的环境变量访问

use std::env;
use std::fmt;

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn default() -> T;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => Ok(Self::default()),
        }
    }

    fn get_or_default() -> T {
        Self::get().unwrap_or_else(|_| Self::default())
    }
}

fn parse_bool(variable: &str, value: &str) -> EnvResult<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(EnvError {
            variable: variable.to_string(),
            message: format!("Invalid boolean '{}'. Use: true, false", value),
        }),
    }
}

/// Web 服务器环境变量定义
pub mod web {
    use super::*;

    /// 服务绑定地址
    pub struct BindAddr;
    impl EnvVar<String> for BindAddr {
        const NAME: &'static str = "GLACIER_BIND";
        const DESCRIPTION: &'static str = "Bind address for the web server";

        fn parse(value: &str) -> EnvResult<String> {
            Ok(value.to_string())
        }

        fn default() -> String {
            "127.0.0.1".to_string()
        }
    }

    /// 服务监听端口
    pub struct Port;
    impl EnvVar<u16> for Port {
        const NAME: &'static str = "GLACIER_PORT";
        const DESCRIPTION: &'static str = "Listen port for the web server";

        fn parse(value: &str) -> EnvResult<u16> {
            value.parse().map_err(|_| EnvError {
                variable: Self::NAME.to_string(),
                message: format!("Invalid port number '{}'", value),
            })
        }

        fn default() -> u16 {
            7080
        }
    }
}

/// 代理行为环境变量定义
pub mod proxy {
    use super::*;

    /// 出站抓取超时（秒）
    pub struct FetchTimeout;
    impl EnvVar<u64> for FetchTimeout {
        const NAME: &'static str = "GLACIER_FETCH_TIMEOUT";
        const DESCRIPTION: &'static str = "Outbound fetch timeout in seconds";

        fn parse(value: &str) -> EnvResult<u64> {
            let seconds: u64 = value.parse().map_err(|_| EnvError {
                variable: Self::NAME.to_string(),
                message: format!("Invalid timeout '{}'", value),
            })?;
            if seconds == 0 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Timeout must be greater than zero".to_string(),
                });
            }
            Ok(seconds)
        }

        fn default() -> u64 {
            30
        }
    }

    /// 是否关闭出站 TLS 证书校验
    ///
    /// 默认关闭校验，这样代理才能访问证书配置有误的站点；
    /// 设为 false 可恢复校验。
    pub struct InsecureTls;
    impl EnvVar<bool> for InsecureTls {
        const NAME: &'static str = "GLACIER_INSECURE_TLS";
        const DESCRIPTION: &'static str = "Disable TLS certificate verification for outbound fetches";

        fn parse(value: &str) -> EnvResult<bool> {
            parse_bool(Self::NAME, value)
        }

        fn default() -> bool {
            true
        }
    }

    /// 是否注入页面调试工具脚本
    pub struct DebugTools;
    impl EnvVar<bool> for DebugTools {
        const NAME: &'static str = "GLACIER_DEBUG_TOOLS";
        const DESCRIPTION: &'static str = "Inject the eruda debug console into rewritten pages";

        fn parse(value: &str) -> EnvResult<bool> {
            parse_bool(Self::NAME, value)
        }

        fn default() -> bool {
            true
        }
    }
}
