use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use config_parser::internal::ConfigFileInternal;
use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use shared::constants::SIGNATURE_HEADER;
use shared::Payload;
use tokio::net::TcpListener;
use tracing::Instrument;
use uuid::Uuid;
use webhook_signature::Verdict;

pub const ACCEPTED_BODY: &str = "Webhook received securely";

fn respond(status: StatusCode, body: impl Into<Bytes>) -> Result<Response<Full<Bytes>>> {
    Ok(Response::builder()
        .status(status)
        .body(Full::new(body.into()))?)
}

async fn not_found<B>(request: &Request<B>) -> Result<Response<Full<Bytes>>> {
    respond(
        StatusCode::NOT_FOUND,
        format!(
            "Couldn't find handler for the route {:?} '{:?}'\n",
            request.method(),
            request.uri()
        ),
    )
}

async fn webhook_request<B>(
    request: Request<B>,
    config: Arc<ConfigFileInternal>,
) -> Result<Response<Full<Bytes>>>
where
    B: Body,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    if request.method() != Method::POST {
        return respond(
            StatusCode::METHOD_NOT_ALLOWED,
            "Only POST is allowed on this route\n",
        );
    }

    let max_body_size = config.config.max_body_size;
    let upper = request.body().size_hint().upper().unwrap_or(u64::MAX);
    if upper > max_body_size {
        return respond(
            StatusCode::PAYLOAD_TOO_LARGE,
            format!(
                "Body is too big, max allowed body size is {} bytes, but received a size hint of {} bytes\n",
                max_body_size, upper
            ),
        );
    }

    let (parts, body) = request.into_parts();
    let body = body.collect().await?.to_bytes();
    let signature = parts.headers.get(SIGNATURE_HEADER).map(|value| value.as_bytes());

    let outcome = config.route.verifier.check(&body, signature);
    if let Err(reason) = &outcome {
        tracing::warn!(%reason, bytes = body.len(), "Rejected webhook delivery");
    }
    if Verdict::from(outcome) == Verdict::Unauthorized {
        return respond(StatusCode::FORBIDDEN, Bytes::new());
    }

    let payload = match Payload::from_slice(&body) {
        Ok(payload) => payload,
        Err(err) => {
            tracing::warn!(error = %err, "Verified body is not a JSON object");

            return respond(StatusCode::BAD_REQUEST, "Body is not a JSON object\n");
        }
    };

    tracing::info!(
        event = payload.event().unwrap_or("<none>"),
        fields = ?payload.keys().collect::<Vec<_>>(),
        "Webhook received and verified"
    );

    respond(StatusCode::OK, ACCEPTED_BODY)
}

async fn handle_request<B>(
    config: Arc<ConfigFileInternal>,
    request: Request<B>,
) -> Result<Response<Full<Bytes>>>
where
    B: Body,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    let span = tracing::info_span!(
        "request",
        id = %Uuid::new_v4(),
        path = %request.uri().path()
    );

    async move {
        if request.uri().path() == config.route.path {
            webhook_request(request, config).await
        } else {
            not_found(&request).await
        }
    }
    .instrument(span)
    .await
}

pub async fn serve(listener: TcpListener, config: Arc<ConfigFileInternal>) -> Result<()> {
    tracing::info!(
        addr = %listener.local_addr()?,
        path = %config.route.path,
        "Waiting for webhook deliveries"
    );

    loop {
        let (stream, remote) = listener.accept().await?;

        tracing::debug!(%remote, "Got a new connection");

        let io = TokioIo::new(stream);
        let config = config.clone();

        tokio::spawn(async move {
            if let Err(err) = http1::Builder::new()
                .serve_connection(
                    io,
                    service_fn(|request| handle_request(config.clone(), request)),
                )
                .await
            {
                tracing::error!(%remote, "Error serving connection: {:?}", err);
            }
        });
    }
}

pub async fn start(config: Arc<ConfigFileInternal>) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.config.expose));

    let listener = TcpListener::bind(addr).await?;

    serve(listener, config).await
}
