//! `HttpApi` against an in-process stub server.

use axum::{
    Json, Router,
    extract::{Multipart, Path},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use cipherlab_client::{Api, ApiError, ClientConfig, HttpApi};
use cipherlab_proto::{
    Algorithm, AttackMethod, CipherAttackKind, KeyParams, ResultKey,
    requests::{
        CheckUserRequest, CipherAttackRequest, Credentials, DecryptRequest, EncryptRequest,
        StartAttackRequest, StegoUpload,
    },
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

async fn serve(router: Router) -> HttpApi {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
    HttpApi::new(&ClientConfig::with_base_url(format!("http://{addr}"))).unwrap()
}

async fn check_user(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({"exists": body["username"] == "alice"}))
}

async fn start(Json(body): Json<Value>) -> Json<Value> {
    assert_eq!(body["method"], "bruteforce");
    Json(json!({
        "success": true, "found": true, "password": "q7*88+",
        "attempts": 12345, "duration": 2.3
    }))
}

async fn crypto_attack(Json(body): Json<Value>) -> Json<Value> {
    assert_eq!(body["cipher_type"], "caesar");
    Json(json!({
        "success": true,
        "type": "Caesar Brute-Force",
        "results": [
            {"key": 3, "plaintext": "HELLO", "is_likely": true},
            {"key": "WORD", "plaintext": "<b>x</b>"}
        ]
    }))
}

async fn signin(Json(body): Json<Value>) -> impl IntoResponse {
    if body["password"] == "secret" {
        (
            StatusCode::OK,
            [(header::SET_COOKIE, "session=abc; Path=/")],
            Json(json!({"success": true, "message": "Welcome"})),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            [(header::SET_COOKIE, "session=; Path=/")],
            Json(json!({"success": false, "message": "Invalid credentials"})),
        )
    }
}

async fn users(headers: HeaderMap) -> impl IntoResponse {
    let authed = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("session=abc"));
    if authed {
        (StatusCode::OK, Json(json!({"success": true, "users": [{"id": 2, "username": "bob"}]})))
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({"success": false, "message": "Not authenticated"})))
    }
}

async fn stego_send(mut multipart: Multipart) -> Json<Value> {
    let mut fields = serde_json::Map::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file = field.file_name().map(str::to_string);
        let value = match file {
            Some(file) => {
                let len = field.bytes().await.unwrap().len();
                json!({"file": file, "len": len})
            },
            None => json!(field.text().await.unwrap()),
        };
        fields.insert(name, value);
    }
    assert_eq!(fields["audio_file"], json!({"file": "carrier.wav", "len": 4}));
    assert_eq!(fields["receiver_id"], "7");
    Json(json!({"success": true, "message": fields["secret_message"]}))
}

async fn audio(Path(file): Path<String>) -> impl IntoResponse {
    if file == "stego_1.wav" {
        (StatusCode::OK, b"RIFF".to_vec())
    } else {
        (StatusCode::NOT_FOUND, b"missing".to_vec())
    }
}

fn router() -> Router {
    Router::new()
        .route("/api/attack_auth/check-user", post(check_user))
        .route("/api/attack_auth/start", post(start))
        .route("/api/crypto/attack", post(crypto_attack))
        .route(
            "/api/crypto/encrypt",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "<html>boom</html>") }),
        )
        .route(
            "/api/crypto/decrypt",
            post(|| async {
                (StatusCode::BAD_REQUEST, Json(json!({"success": false, "message": "Invalid key"})))
            }),
        )
        .route("/api/auth/signin", post(signin))
        .route("/api/users", get(users))
        .route("/api/stego/send", post(stego_send))
        .route("/api/stego/audio/:file", get(audio))
}

#[tokio::test]
async fn check_user_then_start() {
    let api = serve(router()).await;

    let check = api.check_user(CheckUserRequest { username: "alice".into() }).await.unwrap();
    assert!(check.exists);
    let check = api.check_user(CheckUserRequest { username: "mallory".into() }).await.unwrap();
    assert!(!check.exists);

    let outcome = api
        .start_attack(StartAttackRequest { username: "alice".into(), method: AttackMethod::Bruteforce })
        .await
        .unwrap();
    assert!(outcome.found);
    assert_eq!(outcome.password.as_deref(), Some("q7*88+"));
    assert_eq!(outcome.attempts, 12345);
}

#[tokio::test]
async fn cipher_attack_results_are_typed() {
    let api = serve(router()).await;

    let report = api
        .cipher_attack(CipherAttackRequest {
            cipher_type: CipherAttackKind::Caesar,
            ciphertext: "KHOOR".into(),
        })
        .await
        .unwrap();

    assert_eq!(report.label, "Caesar Brute-Force");
    let results = report.results.unwrap();
    assert_eq!(results[0].key, ResultKey::Number(3));
    assert!(results[0].is_likely);
    assert_eq!(results[1].key, ResultKey::Text("WORD".into()));
    assert!(!results[1].is_likely);
}

#[tokio::test]
async fn session_cookie_is_kept_between_calls() {
    let api = serve(router()).await;

    let err = api.users(None).await.unwrap_err();
    assert_eq!(err, ApiError::Rejected { message: "Not authenticated".into() });

    let err = api
        .sign_in(Credentials { username: "alice".into(), password: "wrong".into() })
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Rejected { message: "Invalid credentials".into() });

    let ack = api
        .sign_in(Credentials { username: "alice".into(), password: "secret".into() })
        .await
        .unwrap();
    assert_eq!(ack.message.as_deref(), Some("Welcome"));

    // Clones share the cookie jar.
    let users = api.clone().users(None).await.unwrap();
    assert_eq!(users.users.len(), 1);
    assert_eq!(users.users[0].username, "bob");
}

#[tokio::test]
async fn error_statuses() {
    let api = serve(router()).await;

    let err = api
        .decrypt(DecryptRequest {
            encrypted_message: "KHOOR".into(),
            algorithm: Algorithm::Caesar,
            key_params: KeyParams::default_for(Algorithm::Caesar),
        })
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Rejected { message: "Invalid key".into() });

    let err = api
        .encrypt(EncryptRequest {
            message: "hello".into(),
            algorithm: Algorithm::Hill,
            key_params: KeyParams::Empty {},
        })
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Status(500));

    // Unrouted path: 404 with an empty body.
    let err = api.conversation(9).await.unwrap_err();
    assert_eq!(err, ApiError::Status(404));
}

#[tokio::test]
async fn stego_upload_is_multipart() {
    let api = serve(router()).await;

    let receipt = api
        .stego_send(StegoUpload {
            file_name: "carrier.wav".into(),
            mime: "audio/wav".into(),
            audio: b"RIFF".to_vec(),
            secret_message: "meet at noon".into(),
            receiver_id: 7,
        })
        .await
        .unwrap();

    assert_eq!(receipt.message.as_deref(), Some("meet at noon"));
    assert!(receipt.analysis.is_none());
}

#[tokio::test]
async fn audio_download() {
    let api = serve(router()).await;

    assert_eq!(api.stego_audio("stego_1.wav".into()).await.unwrap(), b"RIFF");
    assert_eq!(api.stego_audio("gone.wav".into()).await.unwrap_err(), ApiError::Status(404));
}

#[tokio::test]
async fn encoded_traversal_is_refused_before_sending() {
    let api = serve(router()).await;

    for name in ["%2e%2e", "..%2fapp.db", "stego_1.wav%00"] {
        let err = api.stego_audio(name.into()).await.unwrap_err();
        assert!(
            matches!(err, ApiError::Decode(cipherlab_proto::ProtoError::InvalidPathSegment(_))),
            "{name:?} gave {err:?}"
        );
    }
}

#[tokio::test]
async fn transport_failure() {
    // Bind then drop so nothing listens on the port.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = HttpApi::new(&ClientConfig::with_base_url(format!("http://{addr}"))).unwrap();
    let err = api.users(None).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "got {err:?}");
}
