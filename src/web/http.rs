//! HTTP 传输层的浏览器实现
//!
//! 基于 `gloo-net` 的 fetch 封装，把网关的抽象请求翻译为真实调用。
//! 状态码与响应体原样带回，错误归类是网关的职责。

use crate::gateway::{HttpTransport, Method, TransportRequest, TransportResponse};
use async_trait::async_trait;
use gloo_net::http::Request;

#[derive(Clone, Copy, Default)]
pub struct FetchTransport;

#[async_trait(?Send)]
impl HttpTransport for FetchTransport {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, String> {
        let mut builder = match request.method {
            Method::Get => Request::get(&request.url),
            Method::Post => Request::post(&request.url),
            Method::Put => Request::put(&request.url),
            Method::Patch => Request::patch(&request.url),
            Method::Delete => Request::delete(&request.url),
        };

        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }

        let response = match request.body {
            Some(body) => builder
                .body(body)
                .map_err(|e| e.to_string())?
                .send()
                .await
                .map_err(|e| e.to_string())?,
            None => builder.send().await.map_err(|e| e.to_string())?,
        };

        let status = response.status();
        // 空响应体（204 等）按空字符串处理
        let body = response.text().await.unwrap_or_default();

        Ok(TransportResponse { status, body })
    }
}
