//! Classification of HTTP status failures into readable errors.

use reqwest::StatusCode;

/// HTTP failures reported by the API or a file host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpError {
    /// Resource not found (HTTP 404)
    NotFound(String),
    /// Rate limit exceeded (HTTP 429)
    RateLimited(String),
    /// Other 4xx responses
    ClientError(u16),
    /// 5xx responses
    ServerError(u16),
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpError::NotFound(url) => write!(f, "Not found: {}", url),
            HttpError::RateLimited(url) => {
                write!(f, "Rate limit exceeded while requesting {}. Try again later.", url)
            }
            HttpError::ClientError(status) => write!(f, "Request error: HTTP {}", status),
            HttpError::ServerError(status) => {
                write!(f, "Server error: HTTP {}. The API may be down.", status)
            }
        }
    }
}

impl std::error::Error for HttpError {}

/// Map an error produced by `error_for_status()` to an [`HttpError`] when it
/// carries a status code; connection errors are passed through unchanged.
pub fn classify_error(error: reqwest::Error) -> anyhow::Error {
    let url = error
        .url()
        .map(|u| u.to_string())
        .unwrap_or_else(|| "(unknown url)".to_string());

    match error.status() {
        Some(StatusCode::NOT_FOUND) => HttpError::NotFound(url).into(),
        Some(StatusCode::TOO_MANY_REQUESTS) => HttpError::RateLimited(url).into(),
        Some(s) if s.is_client_error() => HttpError::ClientError(s.as_u16()).into(),
        Some(s) if s.is_server_error() => HttpError::ServerError(s.as_u16()).into(),
        _ => anyhow::Error::from(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_display() {
        let err = HttpError::NotFound("https://api.test/x".to_string());
        assert_eq!(err.to_string(), "Not found: https://api.test/x");

        let err = HttpError::RateLimited("https://api.test/x".to_string());
        assert!(err.to_string().contains("Rate limit"));

        assert_eq!(
            HttpError::ClientError(418).to_string(),
            "Request error: HTTP 418"
        );
        assert!(HttpError::ServerError(503).to_string().contains("503"));
    }

    async fn status_error(status: usize) -> reqwest::Error {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .with_status(status)
            .create_async()
            .await;

        reqwest::get(server.url())
            .await
            .unwrap()
            .error_for_status()
            .unwrap_err()
    }

    #[tokio::test]
    async fn test_classify_not_found() {
        let err = classify_error(status_error(404).await);
        assert!(matches!(
            err.downcast_ref::<HttpError>(),
            Some(HttpError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_classify_rate_limited() {
        let err = classify_error(status_error(429).await);
        assert!(matches!(
            err.downcast_ref::<HttpError>(),
            Some(HttpError::RateLimited(_))
        ));
    }

    #[tokio::test]
    async fn test_classify_client_and_server_errors() {
        let err = classify_error(status_error(400).await);
        assert_eq!(
            err.downcast_ref::<HttpError>(),
            Some(&HttpError::ClientError(400))
        );

        let err = classify_error(status_error(502).await);
        assert_eq!(
            err.downcast_ref::<HttpError>(),
            Some(&HttpError::ServerError(502))
        );
    }
}
