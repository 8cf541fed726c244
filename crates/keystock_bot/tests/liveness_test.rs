//! Tests for the liveness endpoint.

use keystock_bot::liveness::{self, LIVENESS_BODY};
use tokio::net::TcpListener;

#[tokio::test]
async fn test_root_reports_alive() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(liveness::serve(listener));

    let response = reqwest::get(format!("http://{addr}/")).await.unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), LIVENESS_BODY);
}

#[tokio::test]
async fn test_other_paths_are_not_found() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(liveness::serve(listener));

    let response = reqwest::get(format!("http://{addr}/stock")).await.unwrap();

    assert_eq!(response.status().as_u16(), 404);
}
