use actix_web::body::BoxBody;
use actix_web::{HttpRequest, HttpResponse, Responder};
use serde::Serialize;

/// JSON envelope of the control plane: every endpoint answers
/// `{"result": ...}`.
///
/// Payload endpoints put their data under `result`, acknowledgement
/// endpoints answer a short verdict string, and the auth middleware and
/// error paths use the same shape with a non-2xx status. The HTTP
/// status carries the outcome, the body the substance.
#[derive(Debug, Serialize)]
pub struct ApiReply<T> {
    pub result: T,
}

impl<T: Serialize> ApiReply<T> {
    pub fn of(result: T) -> Self {
        Self { result }
    }
}

/// Acknowledgement for mutations with nothing else to report.
pub fn acked() -> ApiReply<&'static str> {
    ApiReply { result: "success" }
}

impl<T: Serialize> Responder for ApiReply<T> {
    type Body = BoxBody;

    fn respond_to(self, _req: &HttpRequest) -> HttpResponse<BoxBody> {
        HttpResponse::Ok().json(&self)
    }
}
