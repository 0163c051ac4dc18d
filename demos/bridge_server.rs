use argh::FromArgs;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use cv_bridge::{Bridge, BridgeConfig, BridgeResponse, OpenCvBackend, Payload, Request, Value};
use std::sync::Arc;

mod messages;

// defaults for the server; path-mode calls touch the local filesystem, so listen on loopback
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;

#[derive(FromArgs)]
/// Serves the OpenCV bridge over HTTP.
struct ServerArgs {
    /// the host to run the server on
    #[argh(option, short = 'h', default = "DEFAULT_HOST.to_string()")]
    host: String,

    /// the port to run the server on
    #[argh(option, short = 'p', default = "DEFAULT_PORT")]
    port: u16,
}

type SharedBridge = Arc<Bridge<OpenCvBackend>>;

async fn post_call(
    State(bridge): State<SharedBridge>,
    Json(payload): Json<messages::CallRequest>,
) -> impl IntoResponse {
    let request = match to_request(payload) {
        Ok(request) => request,
        Err(message) => {
            log::warn!("Rejected malformed call: {message}");
            return (
                StatusCode::BAD_REQUEST,
                Json(messages::CallResponse::Error {
                    code: "invalid_argument".to_string(),
                    message,
                    cause: None,
                }),
            );
        }
    };

    // native calls block, keep them off the async workers
    let response = match tokio::task::spawn_blocking(move || bridge.dispatch(request)).await {
        Ok(response) => response,
        Err(e) => {
            log::error!("Bridge task failed: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(messages::CallResponse::Error {
                    code: "internal".to_string(),
                    message: e.to_string(),
                    cause: None,
                }),
            );
        }
    };

    (StatusCode::OK, Json(to_message(response)))
}

async fn get_methods(State(bridge): State<SharedBridge>) -> impl IntoResponse {
    Json(bridge.supported_methods())
}

fn to_request(payload: messages::CallRequest) -> Result<Request, String> {
    let mut request = Request::new(payload.method);
    for (name, value) in payload.arguments {
        let value = if name == "data" {
            match value {
                serde_json::Value::String(encoded) => Value::Bytes(
                    STANDARD
                        .decode(encoded)
                        .map_err(|e| format!("`data` is not valid base64: {e}"))?,
                ),
                other => to_value(other)?,
            }
        } else {
            to_value(value)?
        };
        request.arguments.insert(name, value);
    }
    Ok(request)
}

fn to_value(value: serde_json::Value) -> Result<Value, String> {
    Ok(match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().ok_or_else(|| format!("unsupported number {n}"))?),
        },
        serde_json::Value::String(s) => Value::Str(s),
        serde_json::Value::Array(items) => {
            Value::List(items.into_iter().map(to_value).collect::<Result<_, _>>()?)
        }
        serde_json::Value::Object(_) => return Err("objects are not valid arguments".to_string()),
    })
}

fn to_message(response: BridgeResponse) -> messages::CallResponse {
    match response {
        BridgeResponse::Success(payload) => messages::CallResponse::Success {
            result: match payload {
                Payload::Bytes(bytes) => messages::ResultPayload::Bytes(STANDARD.encode(bytes)),
                Payload::Path(path) => messages::ResultPayload::Path(path),
                Payload::Text(text) => messages::ResultPayload::Text(text),
            },
        },
        BridgeResponse::Error(report) => messages::CallResponse::Error {
            code: report.code.to_string(),
            message: report.message,
            cause: report.cause,
        },
        BridgeResponse::NotImplemented => messages::CallResponse::NotImplemented,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: ServerArgs = argh::from_env();

    // format the host and port
    let addr = format!("{}:{}", args.host, args.port);

    let config = BridgeConfig::from_env()?;
    let bridge = Arc::new(Bridge::new(OpenCvBackend::new(), config));

    let app = Router::new()
        .route("/", get(|| async { "cv-bridge" }))
        .route("/methods", get(get_methods))
        .route("/call", post(post_call))
        .with_state(bridge);

    log::info!("Starting the bridge server");
    log::info!("Listening on: {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
