use crate::{
    api::{activity_log, attendance, dashboard, employee, scan, schedule},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let scan_limiter = Arc::new(build_limiter(config.rate_scan_per_min));
    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let refresh_limiter = Arc::new(build_limiter(config.rate_refresh_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Kiosk routes. No authentication, the badge itself is the credential.
    cfg.service(
        web::scope("/scan")
            .service(
                web::resource("")
                    .wrap(scan_limiter.clone())
                    .route(web::post().to(scan::scan)),
            )
            .service(
                web::resource("/status")
                    .wrap(scan_limiter.clone())
                    .route(web::get().to(scan::scan_status)),
            ),
    );

    // Public auth routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(refresh_limiter.clone())
                    .route(web::post().to(handlers::refresh_token)),
            )
            .service(
                web::resource("/logout")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(protected_limiter) // rate limiting
            .service(
                web::resource("/attendance").route(web::get().to(attendance::attendance_list)),
            )
            .service(web::resource("/schedule").route(web::get().to(schedule::get_schedule)))
            .service(
                web::resource("/employees")
                    .route(web::get().to(employee::list_employees))
                    .route(web::post().to(employee::create_employee)),
            )
            .service(
                web::resource("/activity-logs")
                    .route(web::get().to(activity_log::list_activity_logs)),
            )
            .service(web::resource("/dashboard").route(web::get().to(dashboard::dashboard))),
    );
}

// BADGE SCAN
//  └─ POST /scan with identifier (no token)
//       └─ engine decides create / punch / reject

// LOGIN
//  ├─ access_token (15 min)
//  └─ refresh_token (7 days)

// ACCESS EXPIRED
//  └─ POST /refresh with refresh_token
//       └─ returns new access_token
