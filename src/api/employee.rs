use crate::{error::PipelineError, model::employee::Employee};
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use tracing::debug;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct EmployeeQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployee {
    pub name: Option<String>,
    pub email: Option<String>,
    pub rank: Option<String>,
    pub status: Option<String>,
    pub template_id: Option<i64>,
}

/// List employees
///
/// Read surface for the surrounding application; none of the pipeline
/// invariants are involved here.
#[utoipa::path(
    get,
    path = "/api/employees",
    params(
        ("page", Query, description = "Page number"),
        ("per_page", Query, description = "Items per page"),
        ("search", Query, description = "Search by name or email")
    ),
    responses((status = 200, description = "Employee list", body = [Employee])),
    tag = "Employee"
)]
pub async fn list_employees(
    pool: web::Data<SqlitePool>,
    query: web::Query<EmployeeQuery>,
) -> Result<HttpResponse, PipelineError> {
    let page = query.page.unwrap_or(1).max(1);
    // i64 math: an absurd but valid page number must not overflow u32
    let per_page = i64::from(query.per_page.unwrap_or(20).clamp(1, 100));
    let offset = (i64::from(page) - 1) * per_page;

    let like = query.search.as_ref().map(|s| format!("%{s}%"));
    debug!(page, per_page, search = ?query.search, "listing employees");

    let employees = match &like {
        Some(like) => {
            sqlx::query_as::<_, Employee>(
                "SELECT * FROM employees WHERE name LIKE ? OR email LIKE ? ORDER BY id LIMIT ? OFFSET ?",
            )
            .bind(like)
            .bind(like)
            .bind(per_page)
            .bind(offset)
            .fetch_all(pool.get_ref())
            .await?
        }
        None => {
            sqlx::query_as::<_, Employee>("SELECT * FROM employees ORDER BY id LIMIT ? OFFSET ?")
                .bind(per_page)
                .bind(offset)
                .fetch_all(pool.get_ref())
                .await?
        }
    };

    Ok(HttpResponse::Ok().json(employees))
}

/// Get employee by ID
#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(("id", Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, PipelineError> {
    let id = path.into_inner();

    let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(id)
        .fetch_optional(pool.get_ref())
        .await?;

    match employee {
        Some(employee) => Ok(HttpResponse::Ok().json(employee)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        }))),
    }
}

/// Update employee metadata
#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    params(("id", Path, description = "Employee ID")),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Updated employee", body = Employee),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn update_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    payload: web::Json<UpdateEmployee>,
) -> Result<HttpResponse, PipelineError> {
    let id = path.into_inner();

    let employee = sqlx::query_as::<_, Employee>(
        r#"
        UPDATE employees
        SET name = COALESCE(?, name),
            email = COALESCE(?, email),
            rank = COALESCE(?, rank),
            status = COALESCE(?, status),
            template_id = COALESCE(?, template_id)
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(&payload.name)
    .bind(&payload.email)
    .bind(&payload.rank)
    .bind(&payload.status)
    .bind(payload.template_id)
    .bind(id)
    .fetch_optional(pool.get_ref())
    .await?;

    match employee {
        Some(employee) => Ok(HttpResponse::Ok().json(employee)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        }))),
    }
}
