use crate::{
    api::{attendance, health, stats},
    error::AppError,
};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    // body and query extraction errors use the same JSON shape as validation failures
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        AppError::validation(format!("Malformed JSON body: {err}"), Vec::new()).into()
    });
    let query_config = web::QueryConfig::default().error_handler(|err, _req| {
        AppError::validation(format!("Malformed query string: {err}"), Vec::new()).into()
    });

    cfg.app_data(json_config)
        .app_data(query_config)
        .service(health::index)
        .service(
        web::scope("/api")
            .service(
                web::scope("/attendance")
                    // /api/attendance
                    .service(
                        web::resource("")
                            .route(web::post().to(attendance::create_attendance))
                            .route(web::get().to(attendance::list_attendance)),
                    )
                    // /api/attendance/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(attendance::get_attendance))
                            .route(web::delete().to(attendance::delete_attendance)),
                    ),
            )
            // /api/stats
            .service(web::resource("/stats").route(web::get().to(stats::get_stats))),
    );
}
