#![allow(non_snake_case)]

use super::*;
use serde_json::json;

// RequestMessage tests

#[test]
fn RequestMessage___serialize___passes_params_by_name() {
    let request = RequestMessage::new(
        RequestId::Number(1),
        "Generate",
        Some(json!({ "outputPath": "out" })),
    );

    let value = serde_json::to_value(&request).unwrap();

    assert_eq!(
        value,
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "Generate",
            "params": { "outputPath": "out" }
        })
    );
}

#[test]
fn RequestMessage___without_params___omits_field() {
    let request = RequestMessage::new(RequestId::Number(2), "GetVersion", None);

    let value = serde_json::to_value(&request).unwrap();

    assert!(value.get("params").is_none());
}

// RequestId tests

#[test]
fn RequestId___string_id___deserializes() {
    let id: RequestId = serde_json::from_value(json!("abc")).unwrap();

    assert_eq!(id, RequestId::String("abc".to_string()));
    assert_eq!(id.to_string(), "abc");
}

// ResponseError tests

#[test]
fn ResponseError___detail_message___reads_data_message() {
    let error = ResponseError::new(-32000, "Request failed")
        .with_data(json!({ "type": "System.IO.IOException", "message": "path is invalid" }));

    assert_eq!(error.detail_message(), Some("path is invalid"));
}

#[test]
fn ResponseError___detail_message___absent_without_data() {
    let error = ResponseError::new(-32603, "boom");

    assert_eq!(error.detail_message(), None);
}

#[test]
fn ResponseError___detail_message___empty_counts_as_absent() {
    let error = ResponseError::new(-32000, "x").with_data(json!({ "message": "" }));

    assert_eq!(error.detail_message(), None);
}

// ResponseMessage tests

#[test]
fn ResponseMessage___into_result___success_yields_value() {
    let response = ResponseMessage::success(RequestId::Number(3), json!([1, 2]));

    assert_eq!(response.into_result().unwrap(), json!([1, 2]));
}

#[test]
fn ResponseMessage___into_result___error_yields_error() {
    let response = ResponseMessage::failure(
        Some(RequestId::Number(3)),
        ResponseError::new(error_codes::METHOD_NOT_FOUND, "nope"),
    );

    let error = response.into_result().unwrap_err();

    assert_eq!(error.code, -32601);
}

#[test]
fn ResponseMessage___into_result___empty_response_is_null() {
    let response: ResponseMessage =
        serde_json::from_value(json!({ "jsonrpc": "2.0", "id": 1 })).unwrap();

    assert_eq!(response.into_result().unwrap(), Value::Null);
}

// Message classification tests

#[test]
fn Message___from_value___method_and_id_is_request() {
    let message =
        Message::from_value(json!({ "jsonrpc": "2.0", "id": 5, "method": "workspace/configuration" }))
            .unwrap();

    assert!(
        matches!(message, Message::Request(ref request) if request.method == "workspace/configuration")
    );
}

#[test]
fn Message___from_value___method_without_id_is_notification() {
    let message =
        Message::from_value(json!({ "jsonrpc": "2.0", "method": "$/progress", "params": {} }))
            .unwrap();

    assert!(matches!(message, Message::Notification(_)));
}

#[test]
fn Message___from_value___result_is_response() {
    let message = Message::from_value(json!({ "jsonrpc": "2.0", "id": 1, "result": [] })).unwrap();

    assert!(matches!(message, Message::Response(_)));
}

#[test]
fn Message___from_slice___not_an_object_is_error() {
    assert!(Message::from_slice(b"[1,2,3]").is_err());
}
