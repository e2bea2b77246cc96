use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{NewTask, TaskUpdate},
    store::TaskStore,
};
use actix_web::{delete, get, http::header, post, put, web, HttpResponse, Responder};

/// Lists every task, newest first.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Task` objects ordered by `created_at` descending.
/// - `401 Unauthorized`: missing, invalid or expired token.
#[get("")]
pub async fn list_tasks(
    store: web::Data<TaskStore>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    log::debug!("{} listing tasks", user.username());
    let tasks = store.list_all().await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Lists completed tasks, most recently completed first.
#[get("/completed")]
pub async fn list_completed(
    store: web::Data<TaskStore>,
    _user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let tasks = store.list_completed().await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Lists pending tasks, newest first.
#[get("/pending")]
pub async fn list_pending(
    store: web::Data<TaskStore>,
    _user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let tasks = store.list_pending().await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new task.
///
/// ## Request Body:
/// - `title`: required, 1-200 characters.
/// - `description` (optional): up to 500 characters.
///
/// Any `id` or completion flag in the body is ignored.
///
/// ## Responses:
/// - `201 Created`: the new `Task`, with a `Location` header.
/// - `401 Unauthorized`: missing, invalid or expired token.
/// - `422 Unprocessable Entity`: field validation failed.
#[post("")]
pub async fn create_task(
    store: web::Data<TaskStore>,
    task_data: web::Json<NewTask>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task = store.create(task_data.into_inner()).await?;
    log::debug!("{} created task {}", user.username(), task.id);

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/todo/{}", task.id)))
        .json(task))
}

/// Retrieves a task by id.
///
/// ## Responses:
/// - `200 OK`: the `Task`.
/// - `404 Not Found`: no task with that id.
#[get("/{id}")]
pub async fn get_task(
    store: web::Data<TaskStore>,
    task_id: web::Path<i32>,
    _user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task = store.get(task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Updates title, description and completion flag of a task.
///
/// Completing a task stamps `completed_at`; reopening it clears the stamp.
///
/// ## Responses:
/// - `200 OK`: the updated `Task`.
/// - `404 Not Found`: no task with that id.
/// - `422 Unprocessable Entity`: field validation failed.
#[put("/{id}")]
pub async fn update_task(
    store: web::Data<TaskStore>,
    task_id: web::Path<i32>,
    task_data: web::Json<TaskUpdate>,
    _user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task = store
        .update(task_id.into_inner(), task_data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task.
///
/// ## Responses:
/// - `204 No Content`: the task was removed.
/// - `404 Not Found`: no task with that id.
#[delete("/{id}")]
pub async fn delete_task(
    store: web::Data<TaskStore>,
    task_id: web::Path<i32>,
    _user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let id = task_id.into_inner();
    if !store.delete(id).await? {
        return Err(AppError::NotFound(format!("Task {} not found", id)));
    }
    Ok(HttpResponse::NoContent().finish())
}
