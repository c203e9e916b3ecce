//! Wire-shape tests for the broker HTTP transport

use pinot_client::{ClientTransport, Error, JsonHttpTransport, Request};
use std::collections::HashMap;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BROKER_RESPONSE: &str = r#"{
    "resultTable": {
        "dataSchema": {"columnNames": ["cnt"], "columnDataTypes": ["LONG"]},
        "rows": [[97889]]
    },
    "exceptions": [],
    "numServersQueried": 1,
    "numServersResponded": 1,
    "totalDocs": 97889,
    "timeUsedMs": 5
}"#;

fn transport() -> JsonHttpTransport {
    JsonHttpTransport::new(None, &HashMap::new()).unwrap()
}

#[tokio::test]
async fn test_execute_posts_sql_and_parses_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/query/sql"))
        .and(body_partial_json(serde_json::json!({
            "sql": "select count(*) from baseballStats"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string(BROKER_RESPONSE))
        .mount(&mock_server)
        .await;

    let request = Request::sql("select count(*) from baseballStats", false, false);
    let response = transport()
        .execute(&mock_server.address().to_string(), &request)
        .await
        .unwrap();

    assert_eq!(response.time_used_ms, 5);
    assert_eq!(response.total_docs, 97889);
    let table = response.result_table.unwrap();
    assert_eq!(table.get_long(0, 0), Some(97889));
}

#[tokio::test]
async fn test_trace_flag_in_request_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/query/sql"))
        .and(body_partial_json(serde_json::json!({"trace": true})))
        .respond_with(ResponseTemplate::new(200).set_body_string(BROKER_RESPONSE))
        .mount(&mock_server)
        .await;

    let request = Request::sql("select 1", true, false);
    let result = transport()
        .execute(&mock_server.address().to_string(), &request)
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_multistage_engine_query_option() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/query/sql"))
        .and(body_partial_json(serde_json::json!({
            "queryOptions": "useMultiStageEngine=true"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string(BROKER_RESPONSE))
        .mount(&mock_server)
        .await;

    let request = Request::sql("select 1", false, true);
    let result = transport()
        .execute(&mock_server.address().to_string(), &request)
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_extra_headers_forwarded_to_broker() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/query/sql"))
        .and(header("authorization", "Bearer token"))
        .respond_with(ResponseTemplate::new(200).set_body_string(BROKER_RESPONSE))
        .mount(&mock_server)
        .await;

    let mut headers = HashMap::new();
    headers.insert("authorization".to_string(), "Bearer token".to_string());
    let transport = JsonHttpTransport::new(None, &headers).unwrap();

    let request = Request::sql("select 1", false, false);
    let result = transport
        .execute(&mock_server.address().to_string(), &request)
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_broker_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/query/sql"))
        .respond_with(ResponseTemplate::new(500).set_body_string("broker exploded"))
        .mount(&mock_server)
        .await;

    let request = Request::sql("select 1", false, false);
    let result = transport()
        .execute(&mock_server.address().to_string(), &request)
        .await;

    match result {
        Err(e @ Error::HttpClient(_)) => {
            assert!(e.is_transport());
            assert!(e.to_string().contains("500"));
        }
        other => panic!("expected HttpClient error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_payload_is_json_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/query/sql"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    let request = Request::sql("select 1", false, false);
    let result = transport()
        .execute(&mock_server.address().to_string(), &request)
        .await;

    assert!(matches!(result, Err(Error::Json(_))));
}

#[tokio::test]
async fn test_unreachable_broker() {
    // Nothing listens on this port.
    let request = Request::sql("select 1", false, false);
    let result = transport().execute("127.0.0.1:1", &request).await;

    match result {
        Err(e) => assert!(e.is_transport()),
        Ok(_) => panic!("expected a transport failure"),
    }
}
