use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{CreateTaskInput, UpdateTaskStatusInput},
    tasks::{TaskFilter, TaskService},
};
use actix_web::{get, patch, post, web, HttpResponse, Responder};
use validator::Validate;

/// Retrieves the authenticated user's tasks.
///
/// ## Query Parameters:
/// - `status` (optional): `OPEN`, `IN_PROGRESS` or `DONE`.
/// - `search` (optional): case-sensitive substring of the title or description.
/// - `sortBy` (optional): `dueDate`. Without it tasks come back in creation order.
/// - `orderBy` (optional): `ASC` (default) or `DESC`.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Task` objects, possibly empty.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
#[get("")]
pub async fn get_tasks(
    tasks: web::Data<TaskService>,
    filter: web::Query<TaskFilter>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let found = tasks.query(filter.into_inner(), &user.0).await?;
    Ok(HttpResponse::Ok().json(found))
}

/// Creates a new task for the authenticated user.
///
/// ## Request Body:
/// - `title`: The title of the task (required).
/// - `description` (optional)
/// - `dueDate` (optional): ISO 8601 timestamp.
/// - `boardId`: The board the task is filed under.
///
/// The task always starts as `OPEN`; a `status` in the body is ignored.
///
/// ## Responses:
/// - `201 Created`: The created `Task`.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `422 Unprocessable Entity`: If input validation fails.
#[post("")]
pub async fn create_task(
    tasks: web::Data<TaskService>,
    task_data: web::Json<CreateTaskInput>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    let task = tasks.create(task_data.into_inner(), &user.0).await?;
    Ok(HttpResponse::Created().json(task))
}

/// Retrieves one of the authenticated user's tasks.
///
/// ## Responses:
/// - `200 OK`: The `Task`.
/// - `404 Not Found`: No such task, or it belongs to someone else.
#[get("/{id}")]
pub async fn get_task(
    tasks: web::Data<TaskService>,
    task_id: web::Path<i32>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task = tasks.get(task_id.into_inner(), &user.0).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Moves a task to a new status. Any status can follow any other.
///
/// ## Request Body:
/// `{ "status": "OPEN" | "IN_PROGRESS" | "DONE" }`
///
/// ## Responses:
/// - `200 OK`: The updated `Task`.
/// - `404 Not Found`: No such task, or it belongs to someone else.
#[patch("/{id}/status")]
pub async fn update_task_status(
    tasks: web::Data<TaskService>,
    task_id: web::Path<i32>,
    body: web::Json<UpdateTaskStatusInput>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task = tasks
        .set_status(task_id.into_inner(), body.status, &user.0)
        .await?;
    Ok(HttpResponse::Ok().json(task))
}
