pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::web;

/// Mounts the `/auth` and `/tasks` scopes. Expected under `/api`, wrapped in
/// `AuthMiddleware`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth::signin)
            .service(auth::signup),
    )
    .service(
        web::scope("/tasks")
            .service(tasks::get_tasks)
            .service(tasks::create_task)
            .service(tasks::get_task)
            .service(tasks::update_task_status),
    );
}
