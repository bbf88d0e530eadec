use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Sends requests that reached the reverse proxy over plain HTTP to the
/// same URL on HTTPS.
pub async fn enforce_https(req: Request, next: Next) -> Response {
    let is_https = req
        .headers()
        .get(FORWARDED_PROTO)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|proto| proto.eq_ignore_ascii_case("https"));
    if is_https {
        return next.run(req).await;
    }

    let Some(host) = req
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
    else {
        return (StatusCode::BAD_REQUEST, "missing Host header").into_response();
    };
    let path = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    let location = format!("https://{host}{path}");
    tracing::debug!(%location, "redirecting plain http request");
    Redirect::permanent(&location).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, middleware::from_fn, routing::get, Router};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/api/v1/labs", get(|| async { "labs" }))
            .layer(from_fn(enforce_https))
    }

    #[tokio::test]
    async fn plain_http_is_redirected() {
        let req = Request::builder()
            .uri("/api/v1/labs?q=net")
            .header(header::HOST, "luba.example.edu")
            .header(FORWARDED_PROTO, "http")
            .body(Body::empty())
            .unwrap();
        let res = app().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::PERMANENT_REDIRECT);
        assert_eq!(
            res.headers()[header::LOCATION],
            "https://luba.example.edu/api/v1/labs?q=net"
        );
    }

    #[tokio::test]
    async fn forwarded_https_passes_through() {
        let req = Request::builder()
            .uri("/api/v1/labs")
            .header(header::HOST, "luba.example.edu")
            .header(FORWARDED_PROTO, "HTTPS")
            .body(Body::empty())
            .unwrap();
        let res = app().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_host_is_a_bad_request() {
        let req = Request::builder()
            .uri("/api/v1/labs")
            .body(Body::empty())
            .unwrap();
        let res = app().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
