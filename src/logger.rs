use {
    actix_web::{
        dev::{Service, ServiceRequest, ServiceResponse, Transform},
        http::header::{HeaderName, HeaderValue},
        Error,
    },
    futures::{
        future::{ok, Ready},
        task::{Context, Poll},
    },
    std::{future::Future, pin::Pin},
    tracing::Span,
    tracing_futures::Instrument,
    tracing_log::LogTracer,
    tracing_subscriber::{fmt::Layer, layer::SubscriberExt as _, EnvFilter, Registry},
    uuid::Uuid,
};

/// Installs the global subscriber, `RUST_LOG` overrides the `info` default.
pub fn init() -> color_eyre::Result<()> {
    LogTracer::init()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing::subscriber::set_global_default(
        Registry::default().with(filter).with(Layer::default()),
    )?;

    Ok(())
}

pub struct TracingLogger;

impl<S, B> Transform<S, ServiceRequest> for TracingLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = TracingLoggerMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(TracingLoggerMiddleware { service })
    }
}

#[doc(hidden)]
pub struct TracingLoggerMiddleware<S> {
    service: S,
}

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Per-request id, recorded on the `Request` span and echoed in the
/// `x-request-id` response header.
#[derive(Clone, Copy, Debug)]
pub struct RequestId(Uuid);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<S, B> Service<ServiceRequest> for TracingLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let user_agent = req
            .headers()
            .get("User-Agent")
            .map(|h| h.to_str().unwrap_or(""))
            .unwrap_or("")
            .to_string();

        let client_ip_address = req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or("")
            .to_string();

        let request_id = RequestId(Uuid::new_v4());

        let span = tracing::info_span!(
            "Request",
            method = %req.method(),
            request_path = %req.path(),
            user_agent = %user_agent,
            client_ip_address = %client_ip_address,
            request_id = %request_id.0,
            status_code = tracing::field::Empty,
        );

        let fut = {
            let _entered = span.enter();
            self.service.call(req)
        };

        Box::pin(
            async move {
                let mut outcome = fut.await;

                let status_code = match &mut outcome {
                    Ok(response) => {
                        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
                            response
                                .headers_mut()
                                .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
                        }

                        response.response().status()
                    }
                    Err(error) => error.as_response_error().status_code(),
                };

                Span::current().record("status_code", &status_code.as_u16());

                tracing::info!(status_code = status_code.as_u16(), "finished request");

                outcome
            }
            .instrument(span),
        )
    }
}
