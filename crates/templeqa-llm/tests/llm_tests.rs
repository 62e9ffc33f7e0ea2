use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use templeqa_core::config::Settings;
use templeqa_core::error::Error;
use templeqa_core::traits::LanguageModel;
use templeqa_llm::{GroqClient, ScriptedModel};

/// Serve `app` on an ephemeral port from a background runtime; returns the base URL.
fn spawn_stub(app: Router) -> (tokio::runtime::Runtime, String) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let listener = rt.block_on(tokio::net::TcpListener::bind("127.0.0.1:0")).unwrap();
    let addr = listener.local_addr().unwrap();
    rt.spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (rt, format!("http://{addr}"))
}

fn client_for(url: String) -> GroqClient {
    let mut settings = Settings::default().llm;
    settings.api_url = url;
    GroqClient::with_api_key(&settings, "test-key".to_string()).expect("client")
}

#[test]
fn groq_client_sends_prompt_and_returns_content() {
    let app = Router::new().route(
        "/chat",
        post(|headers: HeaderMap, Json(body): Json<Value>| async move {
            let auth = headers.get("authorization").and_then(|v| v.to_str().ok()).unwrap_or("");
            if auth != "Bearer test-key" {
                return (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad key"})));
            }
            let prompt = body["messages"][0]["content"].as_str().unwrap_or("").to_string();
            let model = body["model"].as_str().unwrap_or("").to_string();
            (
                StatusCode::OK,
                Json(json!({"choices": [{"message": {"role": "assistant", "content": format!("{model}|{prompt}")}}]})),
            )
        }),
    );
    let (_rt, base) = spawn_stub(app);
    let client = client_for(format!("{base}/chat"));

    let reply = client.complete("What are the darsanas?").expect("complete");
    assert_eq!(reply, "llama-3.3-70b-versatile|What are the darsanas?");
}

#[test]
fn groq_client_surfaces_http_errors() {
    let app = Router::new().route("/chat", post(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }));
    let (_rt, base) = spawn_stub(app);
    let err = client_for(format!("{base}/chat")).complete("hi").unwrap_err();
    assert!(err.to_string().contains("429"), "got {err}");
}

#[test]
fn groq_client_rejects_empty_choices() {
    let app = Router::new().route("/chat", post(|| async { Json(json!({"choices": []})) }));
    let (_rt, base) = spawn_stub(app);
    let err = client_for(format!("{base}/chat")).complete("hi").unwrap_err();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Llm(_))));
}

#[test]
fn missing_api_key_is_reported() {
    let mut settings = Settings::default().llm;
    settings.api_key_env = "TEMPLEQA_TEST_KEY_THAT_IS_NEVER_SET".to_string();
    let err = GroqClient::from_env(&settings).err().expect("must fail");
    assert!(matches!(err, Error::MissingApiKey(ref var) if var == "TEMPLEQA_TEST_KEY_THAT_IS_NEVER_SET"));
}

#[test]
fn scripted_model_records_prompts() {
    let model = ScriptedModel::replying("Three darsanas.");
    let shared = model.clone();
    assert_eq!(model.complete("q1").expect("reply"), "Three darsanas.");
    assert_eq!(shared.prompts(), vec!["q1".to_string()]);

    let failing = ScriptedModel::failing("upstream down");
    assert!(failing.complete("q2").is_err());
    assert_eq!(failing.calls(), 1);
}
