use crate::{
    api::{attendance, device, employee, enrollment, sensor},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-surface limiter config
    fn build_limiter(requests_per_min: u32) -> GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap()
    }

    let device_limiter = build_limiter(config.rate_device_per_min);
    let admin_limiter = build_limiter(config.rate_admin_per_min);

    // Device-facing surface
    cfg.service(
        web::resource("/attendance")
            .wrap(Governor::new(&device_limiter))
            .route(web::post().to(attendance::submit_event)),
    );
    cfg.service(
        web::scope("/sensor")
            .service(
                web::resource("/update")
                    .wrap(Governor::new(&device_limiter))
                    .route(web::post().to(sensor::update)),
            )
            .service(
                web::resource("/next-id")
                    .wrap(Governor::new(&device_limiter))
                    .route(web::get().to(sensor::next_template_id)),
            ),
    );

    // Control plane, invoked by the surrounding application
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(Governor::new(&admin_limiter))
            .service(
                web::scope("/enrollment")
                    .service(web::resource("/start").route(web::post().to(enrollment::start)))
                    .service(web::resource("/status").route(web::get().to(enrollment::status)))
                    .service(web::resource("/cancel").route(web::post().to(enrollment::cancel))),
            )
            .service(
                web::resource("/attendance-log").route(web::get().to(attendance::list_logs)),
            )
            .service(
                web::scope("/devices")
                    .service(web::resource("").route(web::get().to(device::list_devices)))
                    .service(web::resource("/{id}").route(web::put().to(device::update_device))),
            )
            .service(
                web::scope("/employees")
                    .service(web::resource("").route(web::get().to(employee::list_employees)))
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(employee::get_employee))
                            .route(web::put().to(employee::update_employee)),
                    ),
            ),
    );
}
