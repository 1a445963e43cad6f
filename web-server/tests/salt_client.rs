// web-server/tests/salt_client.rs
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use common::SaltApiConfig;
use saltshark_server::salt::{Command, SaltApi, SaltClient, UpstreamError, Verb};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Minimal salt-api: `/login` hands out numbered tokens, `/minions` and `/`
/// only answer to the token handed out last
#[derive(Default)]
struct Master {
    logins: AtomicUsize,
    valid: Mutex<Option<String>>,
    reject_all: AtomicBool,
    lowstate: Mutex<Vec<Value>>,
}

impl Master {
    fn authorized(&self, req: &HttpRequest) -> bool {
        if self.reject_all.load(Ordering::SeqCst) {
            return false;
        }
        let sent = req.headers().get("X-Auth-Token").and_then(|v| v.to_str().ok());
        sent.is_some() && sent == self.valid.lock().unwrap().as_deref()
    }
}

async fn login(master: web::Data<Master>, body: web::Json<Value>) -> HttpResponse {
    if body["username"] != "saltapi" || body["password"] != "saltpass" || body["eauth"] != "pam" {
        return HttpResponse::Unauthorized().finish();
    }
    let n = master.logins.fetch_add(1, Ordering::SeqCst) + 1;
    let token = format!("tok-{}", n);
    *master.valid.lock().unwrap() = Some(token.clone());

    HttpResponse::Ok().json(json!({"return": [{"token": token, "eauth": "pam"}]}))
}

async fn minions(master: web::Data<Master>, req: HttpRequest) -> HttpResponse {
    if !master.authorized(&req) {
        return HttpResponse::Unauthorized().finish();
    }
    HttpResponse::Ok().json(json!({"return": [{"minion-1": {"os": "Debian"}}]}))
}

async fn lowstate(master: web::Data<Master>, req: HttpRequest, chunk: web::Json<Value>) -> HttpResponse {
    if !master.authorized(&req) {
        return HttpResponse::Unauthorized().finish();
    }
    master.lowstate.lock().unwrap().push(chunk.into_inner());
    HttpResponse::Ok().json(json!({"return": [{"minion-1": true}]}))
}

async fn spawn_master(master: web::Data<Master>) -> String {
    let server = HttpServer::new(move || {
        App::new()
            .app_data(master.clone())
            .route("/login", web::post().to(login))
            .route("/minions", web::get().to(minions))
            .route("/", web::post().to(lowstate))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();

    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{}", addr)
}

fn client(url: &str, demo_mode: bool) -> SaltClient {
    SaltClient::new(&SaltApiConfig {
        url: url.to_string(),
        user: "saltapi".to_string(),
        password: "saltpass".to_string(),
        eauth: "pam".to_string(),
        timeout_secs: 5,
        demo_mode,
    })
    .unwrap()
}

#[actix_web::test]
async fn test_session_is_reused() {
    let master = web::Data::new(Master::default());
    let salt = client(&spawn_master(master.clone()).await, false);

    for _ in 0..3 {
        let minions = salt.run(Command::new(Verb::ListMinions)).await.unwrap();
        assert_eq!(minions["return"][0]["minion-1"]["os"], "Debian");
    }
    assert_eq!(master.logins.load(Ordering::SeqCst), 1);
}

#[actix_web::test]
async fn test_expired_session_logs_in_again_once() {
    let master = web::Data::new(Master::default());
    let salt = client(&spawn_master(master.clone()).await, false);

    salt.run(Command::new(Verb::ListMinions)).await.unwrap();
    // the master forgets the session
    *master.valid.lock().unwrap() = Some("revoked".to_string());

    salt.run(Command::new(Verb::ListMinions)).await.unwrap();
    assert_eq!(master.logins.load(Ordering::SeqCst), 2);

    master.reject_all.store(true, Ordering::SeqCst);
    let err = salt.run(Command::new(Verb::ListMinions)).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(master.logins.load(Ordering::SeqCst), 3);
}

#[actix_web::test]
async fn test_lowstate_chunk_reaches_the_master() {
    let master = web::Data::new(Master::default());
    let salt = client(&spawn_master(master.clone()).await, false);

    let command = Command::new(Verb::Execute)
        .target("minion-*")
        .function("cmd.run")
        .arg("uptime");
    let result = salt.run(command).await.unwrap();
    assert_eq!(result["return"][0]["minion-1"], true);

    let chunks = master.lowstate.lock().unwrap().clone();
    assert_eq!(
        chunks,
        vec![json!({"client": "local", "tgt": "minion-*", "fun": "cmd.run", "arg": ["uptime"]})]
    );
}

#[actix_web::test]
async fn test_bad_credentials_fail_login() {
    let master = web::Data::new(Master::default());
    let url = spawn_master(master.clone()).await;
    let salt = SaltClient::new(&SaltApiConfig {
        url,
        password: "wrong".to_string(),
        ..Default::default()
    })
    .unwrap();

    let err = salt.run(Command::new(Verb::ListMinions)).await.unwrap_err();
    assert!(matches!(err, UpstreamError::Login(_)));
}

#[actix_web::test]
async fn test_demo_mode_serves_samples_when_unreachable() {
    // nothing listens on port 1
    let err = client("http://127.0.0.1:1", false)
        .run(Command::new(Verb::ListMinions))
        .await
        .unwrap_err();
    assert!(matches!(err, UpstreamError::Login(_)));

    let demo = client("http://127.0.0.1:1", true);
    assert!(demo.demo_mode());
    let minions = demo.run(Command::new(Verb::ListMinions)).await.unwrap();
    let nodes = minions["return"][0].as_object().unwrap();
    assert!(nodes.contains_key("minion-1"));
    assert!(nodes.contains_key("minion-3"));
}
