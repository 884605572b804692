use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use tracing::warn;

use super::error::ServiceError;
use crate::config::Config;

/// Guard extractor: the request carried the configured `x-api-key`
///
/// With no key configured every request is rejected.
pub struct ApiKey;

fn check(req: &HttpRequest) -> Result<ApiKey, ServiceError> {
    let expected = req
        .app_data::<web::Data<Config>>()
        .and_then(|config| config.api_key.clone());
    let Some(expected) = expected else {
        warn!("VORTIA_API_KEY not configured");
        return Err(ServiceError::Unauthorized);
    };

    let presented = req
        .headers()
        .get("x-api-key")
        .and_then(|value| value.to_str().ok());
    match presented {
        Some(key) if key == expected => Ok(ApiKey),
        _ => Err(ServiceError::Unauthorized),
    }
}

impl FromRequest for ApiKey {
    type Error = ServiceError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(check(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn config(key: Option<&str>) -> web::Data<Config> {
        web::Data::new(Config {
            api_key: key.map(str::to_string),
            ..Config::default()
        })
    }

    #[test]
    fn test_matching_key_is_accepted() {
        let req = TestRequest::default()
            .app_data(config(Some("k1")))
            .insert_header(("x-api-key", "k1"))
            .to_http_request();
        assert!(check(&req).is_ok());
    }

    #[test]
    fn test_wrong_or_missing_key_is_rejected() {
        let wrong = TestRequest::default()
            .app_data(config(Some("k1")))
            .insert_header(("x-api-key", "k2"))
            .to_http_request();
        assert!(check(&wrong).is_err());

        let missing = TestRequest::default()
            .app_data(config(Some("k1")))
            .to_http_request();
        assert!(check(&missing).is_err());
    }

    #[test]
    fn test_unconfigured_key_rejects_everything() {
        let req = TestRequest::default()
            .app_data(config(None))
            .insert_header(("x-api-key", ""))
            .to_http_request();
        assert!(check(&req).is_err());
    }
}
