pub mod public;
pub mod v1;

use actix_web::web;

pub(crate) fn configure_routes(cfg: &mut web::ServiceConfig) {
    v1::configure_routes(cfg);
}

pub(crate) fn configure_public_routes(cfg: &mut web::ServiceConfig) {
    public::configure_routes(cfg);
}
