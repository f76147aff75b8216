//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use mathjs_core::{ApiError, BaseUrl, EvalRequest, HttpMethod, HttpResponse, MathjsClient, Precision};

const BASE_URL: &str = "http://localhost:3000/";

fn client() -> MathjsClient {
    MathjsClient::new(BaseUrl::new(BASE_URL).unwrap())
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated(case: &serde_json::Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn check_expected_error(name: &str, case: &serde_json::Value, err: ApiError) {
    let expected = case["expected_error"].as_u64().unwrap() as u16;
    match err {
        ApiError::HttpError { status, .. } => assert_eq!(status, expected, "{name}: status"),
        other => panic!("{name}: expected HttpError, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// GET
// ---------------------------------------------------------------------------

#[test]
fn get_test_vectors() {
    let raw = include_str!("../../test-vectors/get.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let expr = input["expr"].as_str().unwrap();
        let precision: Option<Precision> = input
            .get("precision")
            .map(|p| serde_json::from_value(p.clone()).unwrap());
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.build_get(expr, precision.as_ref());
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(
            req.url,
            format!("{BASE_URL}?{}", expected_req["query"].as_str().unwrap()),
            "{name}: url"
        );
        assert!(req.body.is_none(), "{name}: body should be None");

        // Verify parse
        let result = c.parse_text(simulated(case));
        if case.get("expected_error").is_some() {
            check_expected_error(name, case, result.unwrap_err());
        } else {
            assert_eq!(result.unwrap(), case["expected_result"].as_str().unwrap(), "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// POST
// ---------------------------------------------------------------------------

#[test]
fn post_test_vectors() {
    let raw = include_str!("../../test-vectors/post.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input: EvalRequest = serde_json::from_value(case["input"].clone()).unwrap();
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.build_post(input.expr.as_slice(), input.precision.as_ref()).unwrap();
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, BASE_URL, "{name}: url");

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

        let req_body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(req_body, expected_req["body"], "{name}: body");

        // Verify parse
        let result = c.parse_results(simulated(case));
        if case.get("expected_error").is_some() {
            check_expected_error(name, case, result.unwrap_err());
        } else {
            let expected: Vec<String> = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}
