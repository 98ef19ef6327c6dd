//! Integration tests for the demo server

use std::net::TcpListener;
use tokengate::configuration::AuthSettings;
use tokengate::startup::run;
use tokengate::Authenticator;

fn spawn_app() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let authenticator = Authenticator::new(AuthSettings::new("access", "refresh").with_hash_cost(4))
        .expect("Invalid test settings");
    let server = run(listener, authenticator).expect("Failed to create server");

    let _ = tokio::spawn(async move {
        let _ = server.await;
    });

    format!("http://127.0.0.1:{}", port)
}

#[tokio::test]
async fn health_check_works() {
    let addr = spawn_app();

    let response = reqwest::Client::new()
        .get(&format!("{}/health_check", addr))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    assert_eq!(Some(0), response.content_length());
}
