use async_trait::async_trait;

use crate::domain::DomainError;

/// Trait for HTTP client operations (for mocking)
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    async fn get_json(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<serde_json::Value, DomainError>;

    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, DomainError>;
}

/// Real HTTP client using reqwest
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    async fn read_json(response: reqwest::Response) -> Result<serde_json::Value, DomainError> {
        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            return Err(DomainError::upstream(
                "http",
                format!("HTTP {}: {}", status, error_body),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| DomainError::upstream("http", format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn get_json(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<serde_json::Value, DomainError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| DomainError::upstream("http", format!("Request failed: {}", e)))?;

        Self::read_json(response).await
    }

    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, DomainError> {
        let mut request = self.client.post(url);

        for (key, value) in headers {
            request = request.header(key, value);
        }

        let response = request
            .json(body)
            .send()
            .await
            .map_err(|e| DomainError::upstream("http", format!("Request failed: {}", e)))?;

        Self::read_json(response).await
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_json_sends_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/maps/api/geocode/json"))
            .and(query_param("address", "Main St"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "OK"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new();
        let url = format!("{}/maps/api/geocode/json", server.uri());
        let json = client
            .get_json(&url, &[("address", "Main St".to_string())])
            .await
            .unwrap();

        assert_eq!(json["status"], "OK");
    }

    #[tokio::test]
    async fn test_post_json_sends_headers_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/places:searchNearby"))
            .and(header("X-Goog-Api-Key", "secret"))
            .and(body_json(serde_json::json!({"maxResultCount": 20})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"places": []})))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new();
        let url = format!("{}/v1/places:searchNearby", server.uri());
        let json = client
            .post_json(
                &url,
                vec![("X-Goog-Api-Key", "secret")],
                &serde_json::json!({"maxResultCount": 20}),
            )
            .await
            .unwrap();

        assert!(json["places"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_error_status_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let client = HttpClient::new();
        let err = client
            .get_json(&format!("{}/anything", server.uri()), &[])
            .await
            .unwrap_err();

        match err {
            DomainError::Upstream { message, .. } => {
                assert!(message.contains("503"));
                assert!(message.contains("unavailable"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = HttpClient::new();
        let err = client
            .get_json(&format!("{}/anything", server.uri()), &[])
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Upstream { .. }));
    }
}
