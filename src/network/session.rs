//! HTTP 会话管理
//!
//! 封装出站抓取：带超时、UA 透传和可选的 TLS 校验放宽。
//! 非 2xx 状态不是错误，上游状态原样交给分发器转发。

use std::time::Duration;

use reqwest::header::{HeaderMap, ACCEPT, USER_AGENT};
use reqwest::StatusCode;

use crate::core::{ProxyError, ProxyOptions};
use crate::utils::url::Url;

/// 一次抓取的结果
///
/// 只在单个请求的处理期间由分发器独占持有，从不跨请求共享。
#[derive(Debug)]
pub struct FetchResult {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// HTTP 会话
///
/// 内部的 reqwest 客户端自带连接池且可廉价克隆，
/// 所有请求处理器共享同一个会话。
#[derive(Debug, Clone)]
pub struct Session {
    client: reqwest::Client,
    pub options: ProxyOptions,
}

impl Session {
    /// 按代理选项创建会话
    ///
    /// `options.insecure_tls` 为 true 时关闭出站证书校验，
    /// 这是文档化的明确姿态（见 DESIGN.md），不是疏忽。
    pub fn new(options: ProxyOptions) -> Result<Self, ProxyError> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(options.insecure_tls)
            .timeout(Duration::from_secs(options.timeout))
            .build()
            .map_err(|err| ProxyError::Unexpected(err.to_string()))?;

        Ok(Self { client, options })
    }

    /// 抓取目标 URL
    ///
    /// `user_agent` 为 None 时退回 `Mozilla/5.0`。超时或网络失败
    /// 映射为 [`ProxyError::UpstreamFetch`]，不自动重试。
    pub async fn fetch(
        &self,
        target_url: &Url,
        user_agent: Option<&str>,
        accept: &str,
    ) -> Result<FetchResult, ProxyError> {
        let response = self
            .client
            .get(target_url.clone())
            .header(USER_AGENT, user_agent.unwrap_or("Mozilla/5.0"))
            .header(ACCEPT, accept)
            .send()
            .await
            .map_err(|err| ProxyError::UpstreamFetch(err.to_string()))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|err| ProxyError::UpstreamFetch(err.to_string()))?
            .to_vec();

        tracing::debug!(%target_url, status = status.as_u16(), bytes = body.len(), "fetched");

        Ok(FetchResult {
            status,
            headers,
            body,
        })
    }
}
