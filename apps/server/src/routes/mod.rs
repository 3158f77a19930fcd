use actix_web::web;

pub mod cached;
pub mod fortunes;
pub mod hello;
pub mod params;
pub mod world;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(hello::configure_routes)
        .configure(world::configure_routes)
        .configure(fortunes::configure_routes)
        .configure(cached::configure_routes)
        .configure(crate::health::configure_routes);
}
