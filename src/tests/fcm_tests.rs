//! tests/fcm_tests.rs
//! FcmClient y TokenProvider contra un servidor wiremock.

#[cfg(test)]
mod tests {
    use std::{io::Write, time::Duration};

    use chrono::Utc;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::config::app_config::{FcmConfig, PushConfig};
    use crate::services::dispatch_service::{build_message, ValidAlert};
    use crate::services::fcm_auth::{ServiceAccountKey, TokenProvider};
    use crate::services::push_service::{FcmClient, PushProvider};

    const TEST_KEY_PEM: &str = include_str!("fixtures/service_account_key.pem");

    fn fcm_config(base_url: &str, access_token: Option<&str>) -> FcmConfig {
        FcmConfig {
            project_id: "demo-project".to_string(),
            api_base_url: base_url.to_string(),
            access_token: access_token.map(str::to_string),
            credentials_path: None,
            send_timeout: Duration::from_secs(2),
        }
    }

    fn severe_message() -> crate::models::push_model::PushMessage {
        let valid = ValidAlert {
            title: "Flood",
            message: "Evacuate now",
            level: "severe",
            sent_by: None,
            sent_by_name: None,
        };
        build_message("a1", &valid, "all-channel", &PushConfig::default(), Utc::now())
    }

    #[tokio::test]
    async fn test_send_posts_message_to_topic() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/projects/demo-project/messages:send"))
            .and(header("authorization", "Bearer test-token"))
            .and(body_partial_json(json!({
                "message": {
                    "topic": "all-channel",
                    "notification": { "title": "Flood", "body": "Evacuate now" },
                    "android": { "priority": "high" },
                    "apns": { "payload": { "aps": { "category": "EMERGENCY_ALERT" } } }
                }
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "name": "projects/demo-project/messages/42" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = FcmClient::new(&fcm_config(&server.uri(), Some("test-token"))).unwrap();
        let result = client.send(&severe_message()).await;

        assert_eq!(result.unwrap(), "projects/demo-project/messages/42");
    }

    #[tokio::test]
    async fn test_send_fails_on_provider_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/projects/demo-project/messages:send"))
            .respond_with(ResponseTemplate::new(404).set_body_string("topic not found"))
            .mount(&server)
            .await;

        let client = FcmClient::new(&fcm_config(&server.uri(), Some("test-token"))).unwrap();
        let err = client.send(&severe_message()).await.unwrap_err();

        assert!(err.to_string().contains("404"), "err={}", err);
        assert!(err.to_string().contains("topic not found"));
    }

    #[tokio::test]
    async fn test_send_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "name": "late" }))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let mut config = fcm_config(&server.uri(), Some("test-token"));
        config.send_timeout = Duration::from_millis(200);
        let client = FcmClient::new(&config).unwrap();

        assert!(client.send(&severe_message()).await.is_err());
    }

    #[tokio::test]
    async fn test_service_account_token_is_cached() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains(
                "grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer",
            ))
            .and(body_string_contains("assertion="))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "ya29.test",
                "expires_in": 3600,
                "token_type": "Bearer"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = TokenProvider::service_account(ServiceAccountKey {
            client_email: "push@demo-project.iam.gserviceaccount.com".to_string(),
            private_key: TEST_KEY_PEM.to_string(),
            token_uri: format!("{}/token", server.uri()),
        })
        .unwrap();

        assert_eq!(provider.access_token().await.unwrap(), "ya29.test");
        assert_eq!(provider.access_token().await.unwrap(), "ya29.test");
    }

    #[tokio::test]
    async fn test_token_endpoint_error_surfaces() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
            .mount(&server)
            .await;

        let provider = TokenProvider::service_account(ServiceAccountKey {
            client_email: "push@demo-project.iam.gserviceaccount.com".to_string(),
            private_key: TEST_KEY_PEM.to_string(),
            token_uri: format!("{}/token", server.uri()),
        })
        .unwrap();

        let err = provider.access_token().await.unwrap_err();
        assert!(err.to_string().contains("invalid_grant"), "err={}", err);
    }

    #[test]
    fn test_credentials_loading() {
        assert!(TokenProvider::service_account(ServiceAccountKey {
            client_email: "x".to_string(),
            private_key: "not a pem".to_string(),
            token_uri: "http://localhost/token".to_string(),
        })
        .is_err());

        let mut key_file = tempfile::NamedTempFile::new().unwrap();
        write!(
            key_file,
            "{}",
            json!({
                "type": "service_account",
                "client_email": "push@demo-project.iam.gserviceaccount.com",
                "private_key": TEST_KEY_PEM
            })
        )
        .unwrap();

        let mut config = fcm_config("http://localhost", None);
        config.credentials_path = Some(key_file.path().to_path_buf());
        assert!(TokenProvider::from_config(&config).is_ok());

        config.credentials_path = Some("/does/not/exist.json".into());
        assert!(TokenProvider::from_config(&config).is_err());
    }
}
