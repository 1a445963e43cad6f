// web-server/src/api/webhooks.rs
//! Inbound automation hooks. Payloads are acknowledged, not acted upon.
use actix_web::{get, post, web, HttpResponse};
use chrono::Utc;
use serde_json::{json, Value};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(receive_hook).service(list_hooks);
}

/// Size of a JSON payload; anything that is not JSON counts as empty
pub fn payload_size(body: &[u8]) -> usize {
    match serde_json::from_slice::<Value>(body) {
        Ok(payload) => payload.to_string().len(),
        Err(_) => 0,
    }
}

#[post("/hook/{hook_id}")]
pub async fn receive_hook(path: web::Path<String>, body: web::Bytes) -> HttpResponse {
    let hook_id = path.into_inner();
    let size = payload_size(&body);
    tracing::info!("Webhook {} received ({} bytes)", hook_id, size);

    HttpResponse::Ok().json(json!({
        "success": true,
        "hook_id": hook_id,
        "timestamp": Utc::now().to_rfc3339(),
        "message": format!("Webhook '{}' received successfully", hook_id),
        "payload_size": size,
    }))
}

#[get("/hook")]
pub async fn list_hooks() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": true,
        "hooks": [{
            "id": "example-hook",
            "path": "/api/v1/hook/example-hook",
            "description": "Example webhook endpoint",
            "method": "POST",
        }],
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_size() {
        assert_eq!(payload_size(br#"{"ref": "main"}"#), r#"{"ref":"main"}"#.len());
        assert_eq!(payload_size(b""), 0);
        assert_eq!(payload_size(b"not json"), 0);
    }
}
