use anyhow::{Context, Result};
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::header::CONTENT_TYPE;
use hyper::{Method, Request, StatusCode, Uri};
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use shared::constants::{JSON_CONTENT_TYPE, SIGNATURE_HEADER};
use shared::Payload;
use webhook_signature::{SignedPayload, Signer};

/// What the receiver answered.
#[derive(Debug)]
pub struct Delivery {
    pub status: StatusCode,
    pub body: Bytes,
}

/// Posts already signed bytes. Only plain `http://` targets are supported.
pub async fn deliver(uri: &Uri, signed: SignedPayload) -> Result<Delivery> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri.clone())
        .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
        .header(SIGNATURE_HEADER, signed.signature.to_hex())
        .body(Full::new(Bytes::from(signed.body)))?;

    let client = Client::builder(TokioExecutor::new()).build_http();
    let response = client
        .request(request)
        .await
        .with_context(|| format!("Could not deliver the webhook to {}", uri))?;

    let status = response.status();
    let body = response.into_body().collect().await?.to_bytes();

    tracing::info!(%status, "Webhook sent");

    Ok(Delivery { status, body })
}

pub async fn send(uri: &Uri, signer: &Signer, payload: &Payload) -> Result<Delivery> {
    let signed = signer.sign_payload(payload)?;

    deliver(uri, signed).await
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tokio::net::TcpListener;

    use super::*;
    use crate::server::tests::{config, PATIENT_UPDATED, PATIENT_UPDATED_SIGNATURE};
    use crate::server::{serve, ACCEPTED_BODY};

    async fn receiver() -> Uri {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(serve(listener, config(1 << 16)));

        format!("http://{}/webhook", addr).parse().unwrap()
    }

    fn patient_updated() -> Payload {
        Payload::new()
            .with("event", "patient_updated")
            .with("patient_id", "123456")
            .with("updated_fields", json!(["diagnosis", "treatment"]))
            .with("timestamp", "2025-03-14T12:34:56Z")
    }

    #[tokio::test]
    async fn round_trip_over_http() {
        let uri = receiver().await;
        let signer = config(0).route.signer.clone();

        let delivery = send(&uri, &signer, &patient_updated()).await.unwrap();

        assert_eq!(delivery.status, StatusCode::OK);
        assert_eq!(delivery.body, ACCEPTED_BODY);
    }

    #[tokio::test]
    async fn signature_matches_the_wire_bytes() {
        let signed = config(0)
            .route
            .signer
            .sign_payload(&patient_updated())
            .unwrap();

        assert_eq!(signed.body, PATIENT_UPDATED);
        assert_eq!(signed.signature.to_hex(), PATIENT_UPDATED_SIGNATURE);
    }

    #[tokio::test]
    async fn foreign_key_is_forbidden() {
        let uri = receiver().await;
        let secret = webhook_signature::SharedSecret::new("not-the-shared-key").unwrap();
        let signer = Signer::new(&secret).unwrap();

        let delivery = send(&uri, &signer, &patient_updated()).await.unwrap();

        assert_eq!(delivery.status, StatusCode::FORBIDDEN);
        assert!(delivery.body.is_empty());
    }

    #[tokio::test]
    async fn unreachable_receiver_is_an_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let uri: Uri = format!("http://{}/webhook", addr).parse().unwrap();
        let signer = config(0).route.signer.clone();

        assert!(send(&uri, &signer, &patient_updated()).await.is_err());
    }
}
