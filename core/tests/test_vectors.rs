//! Verify build/parse against the JSON test vectors in `test-vectors/`.
//!
//! Each vector describes an event, the expected request, a simulated
//! response, and the expected outcome. Bodies are compared as parsed JSON so
//! field order does not matter.

use chrono::{DateTime, Utc};
use habits_core::{Event, EventClient, HttpMethod, HttpResponse, SubmitError, TimestampFormat, ToiletAction};

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

/// Build an `Event` from a vector's `event` object.
fn parse_event(value: &serde_json::Value) -> Event {
    let at: DateTime<Utc> = value["occurred_at"].as_str().unwrap().parse().unwrap();
    let text = |key: &str| value[key].as_str().unwrap().to_string();
    match value["kind"].as_str().unwrap() {
        "food" => Event::food(text("item"), text("amount"), at),
        "drink" => Event::drink(text("item"), text("amount"), at),
        "toilet" => {
            let action: ToiletAction = value["action"].as_str().unwrap().parse().unwrap();
            Event::toilet(action, at)
        }
        other => panic!("unknown kind: {other}"),
    }
}

#[test]
fn submission_test_vectors() {
    let raw = include_str!("../../test-vectors/submissions.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();
    let endpoint = vectors["endpoint"].as_str().unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let format: TimestampFormat = case["timestamp_format"].as_str().unwrap().parse().unwrap();
        let client = EventClient::new(endpoint).with_timestamp_format(format);
        let event = parse_event(&case["event"]);
        let expected_req = &case["expected_request"];

        // Verify build
        let req = client.build_submission(&event).unwrap();
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, endpoint, "{name}: url");

        let expected_headers: Vec<(String, String)> = expected_req["headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");

        let req_body: serde_json::Value = serde_json::from_str(&req.body).unwrap();
        assert_eq!(req_body, expected_req["body"], "{name}: body");
        assert_eq!(req_body["type"], event.kind().as_str(), "{name}: type discriminator");

        // Verify parse
        let sim = &case["simulated_response"];
        let response = HttpResponse {
            status: sim["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: sim["body"].as_str().unwrap().to_string(),
        };
        let result = client.parse_submission(response);

        match case["expected_outcome"].as_str().unwrap() {
            "Delivered" => {
                let delivery = result.unwrap();
                assert_eq!(delivery.status, 200, "{name}: delivered status");
            }
            "NonSuccessStatus" => {
                let err = result.unwrap_err();
                assert!(
                    matches!(err, SubmitError::NonSuccessStatus { status, .. } if u64::from(status) == sim["status"].as_u64().unwrap()),
                    "{name}: expected NonSuccessStatus, got {err}"
                );
            }
            other => panic!("{name}: unknown expected_outcome: {other}"),
        }
    }
}
