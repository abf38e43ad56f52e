//! Integration tests for the HTTP server

#[cfg(feature = "server")]
mod server_tests {
    use activity_classifier::server::{run, ServerConfig};
    use activity_classifier::stats::create_shared_stats;
    use activity_classifier::{Artifacts, NormalizationParameters, RandomForest};
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::oneshot;

    /// Forest that predicts "standing" for still windows and 3 otherwise.
    const MODEL_JSON: &str = r#"{
        "n_features": 36,
        "classes": ["standing", 3],
        "trees": [{"nodes": [
            {"feature": 1, "threshold": 0.01, "left": 1, "right": 2},
            {"value": [1, 0]},
            {"value": [0, 1]}
        ]}]
    }"#;

    async fn start() -> (SocketAddr, oneshot::Sender<()>) {
        let params = NormalizationParameters::from_bounds(&[0.0; 9], &[1.0; 9])
            .expect("Failed to build scaler");
        let model = RandomForest::from_json(MODEL_JSON).expect("Failed to build model");
        let artifacts = Arc::new(Artifacts::new(params, Box::new(model)));

        let config = ServerConfig::new("127.0.0.1", 0);
        let started = run(config, artifacts, create_shared_stats())
            .await
            .expect("Failed to start server");

        // Give server time to start
        tokio::time::sleep(Duration::from_millis(100)).await;
        started
    }

    fn series(rows: usize, moving: bool) -> serde_json::Value {
        let data: Vec<Vec<f64>> = (0..rows)
            .map(|t| {
                let mut row = vec![0.5; 9];
                if moving {
                    row[0] = if t % 2 == 0 { 0.0 } else { 1.0 };
                }
                row
            })
            .collect();
        serde_json::json!({ "data": data })
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (addr, shutdown_tx) = start().await;

        let client = reqwest::Client::new();
        let response = client
            .get(format!("http://{}/health", addr))
            .send()
            .await
            .expect("Failed to send request");

        assert!(response.status().is_success());

        let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
        assert_eq!(body["status"], "ok");
        assert!(body["version"].as_str().is_some());

        let _ = shutdown_tx.send(());
    }

    #[tokio::test]
    async fn test_predict_maps_both_output_forms() {
        let (addr, shutdown_tx) = start().await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!("http://{}/predict", addr))
            .json(&series(60, false))
            .send()
            .await
            .expect("Failed to send request");
        assert!(response.status().is_success());
        let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
        assert_eq!(body["predicted_label"], 4);
        assert_eq!(body["label"], "standing");
        assert!(body["request_id"].as_str().is_some());

        let response = client
            .post(format!("http://{}/predict", addr))
            .json(&series(50, true))
            .send()
            .await
            .expect("Failed to send request");
        let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
        assert_eq!(body["predicted_label"], 3);
        assert_eq!(body["label"], "running");

        let _ = shutdown_tx.send(());
    }

    #[tokio::test]
    async fn test_short_series_is_client_error() {
        let (addr, shutdown_tx) = start().await;

        let client = reqwest::Client::new();
        let response = client
            .post(format!("http://{}/predict", addr))
            .json(&series(49, false))
            .send()
            .await
            .expect("Failed to send request");

        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
        assert_eq!(body["code"], "INSUFFICIENT_DATA");
        assert!(body.get("predicted_label").is_none());

        let _ = shutdown_tx.send(());
    }

    #[tokio::test]
    async fn test_malformed_rows_are_processing_errors() {
        let (addr, shutdown_tx) = start().await;

        let mut payload = series(55, false);
        payload["data"][10] = serde_json::json!([0.5, 0.5]);

        let client = reqwest::Client::new();
        let response = client
            .post(format!("http://{}/predict", addr))
            .json(&payload)
            .send()
            .await
            .expect("Failed to send request");

        assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
        assert_eq!(body["code"], "NORMALIZATION_FAILED");

        let _ = shutdown_tx.send(());
    }

    #[tokio::test]
    async fn test_stats_endpoint_counts_requests() {
        let (addr, shutdown_tx) = start().await;
        let client = reqwest::Client::new();

        for payload in [series(60, false), series(10, false)] {
            client
                .post(format!("http://{}/predict", addr))
                .json(&payload)
                .send()
                .await
                .expect("Failed to send request");
        }

        let body: serde_json::Value = client
            .get(format!("http://{}/stats", addr))
            .send()
            .await
            .expect("Failed to send request")
            .json()
            .await
            .expect("Failed to parse JSON");

        assert_eq!(body["requests"], 2);
        assert_eq!(body["predictions"]["standing"], 1);
        assert_eq!(body["client_errors"], 1);
        assert_eq!(body["processing_errors"], 0);

        let _ = shutdown_tx.send(());
    }

    #[tokio::test]
    async fn test_cors_headers() {
        let (addr, shutdown_tx) = start().await;

        // Send OPTIONS request to check CORS
        let client = reqwest::Client::new();
        let response = client
            .request(reqwest::Method::OPTIONS, format!("http://{}/predict", addr))
            .header("Origin", "http://localhost")
            .header("Access-Control-Request-Method", "POST")
            .send()
            .await
            .expect("Failed to send request");

        assert!(
            response.status().is_success() || response.status() == reqwest::StatusCode::NO_CONTENT,
            "CORS preflight failed: {}",
            response.status()
        );

        let _ = shutdown_tx.send(());
    }
}
