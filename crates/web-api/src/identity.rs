use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

/// 携带调用者名称的请求头
pub const USER_HEADER: &str = "user";

/// `user` 请求头中的参与者名称；缺失或非 UTF-8 时为 `None`，由服务层决定如何处理。
#[derive(Debug, Clone, Default)]
pub struct UserHeader(pub Option<String>);

impl UserHeader {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for UserHeader
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .headers
            .get(USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        Ok(UserHeader(user))
    }
}
