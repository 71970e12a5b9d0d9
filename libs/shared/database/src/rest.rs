use anyhow::{anyhow, Result};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

/// Thin JSON client for the portal's REST backend.
#[derive(Clone)]
pub struct RestClient {
    client: Client,
    base_url: String,
}

impl RestClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.backend_url(),
        }
    }

    fn get_headers(&self, auth_token: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = auth_token {
            match HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(value) => {
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => debug!("Skipping malformed bearer token"),
            }
        }

        headers
    }

    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        auth_token: Option<&str>,
        body: Option<Value>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let headers = self.get_headers(auth_token);

        let mut req = self.client.request(method, &url).headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("API error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => anyhow!("Authentication error: {}", error_text),
                404 => anyhow!("Resource not found: {}", error_text),
                _ => anyhow!("API error ({}): {}", status, error_text),
            });
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, auth_token: Option<&str>) -> Result<T> {
        self.request(Method::GET, path, auth_token, None).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        auth_token: Option<&str>,
        body: Value,
    ) -> Result<T> {
        self.request(Method::POST, path, auth_token, Some(body)).await
    }

    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        auth_token: Option<&str>,
        body: Value,
    ) -> Result<T> {
        self.request(Method::PUT, path, auth_token, Some(body)).await
    }

    pub async fn patch<T: DeserializeOwned>(
        &self,
        path: &str,
        auth_token: Option<&str>,
        body: Value,
    ) -> Result<T> {
        self.request(Method::PATCH, path, auth_token, Some(body)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> AppConfig {
        AppConfig {
            api_base_url: server.uri(),
            session_store_path: String::new(),
            port: 0,
            generic_credential_errors: false,
        }
    }

    #[tokio::test]
    async fn test_get_attaches_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/doctors"))
            .and(header("Authorization", "Bearer abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": "1" }])))
            .mount(&server)
            .await;

        let client = RestClient::new(&config_for(&server));
        let doctors: Vec<Value> = client.get("/doctors", Some("abc")).await.unwrap();
        assert_eq!(doctors.len(), 1);
    }

    #[tokio::test]
    async fn test_not_found_maps_to_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/doctors/99"))
            .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
            .mount(&server)
            .await;

        let client = RestClient::new(&config_for(&server));
        let result: Result<Value> = client.get("/doctors/99", None).await;
        let message = result.unwrap_err().to_string();
        assert!(message.starts_with("Resource not found"));
    }
}
