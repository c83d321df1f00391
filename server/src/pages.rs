//! Server-rendered HTML pages.

use askama::Template;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use products_hr::{
    HrError, ValidationErrors, activity, analytics,
    charts::DashboardCharts,
    dashboard::{self, DashboardFilter, DashboardQuery},
    employees::{self, EmployeeFilter, EmployeeQuery},
    export,
    validation::{EmployeeForm, ExitForm, today},
};

use crate::http::AppState;
use crate::views::{
    AttendanceRow, DashboardTemplate, DepartmentRow, DepartmentsTemplate, EmployeeDetailTemplate,
    EmployeeFormTemplate, EmployeeRow, EmployeesTemplate, ErrorTemplate, ExitRow, LeaveRow,
    PageContext, SelectOption,
};

pub type PageResult<T> = Result<T, PageError>;

/// Error rendered as an HTML page with a matching status.
#[derive(Debug)]
pub struct PageError {
    status: StatusCode,
    message: String,
}

impl PageError {
    fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: "The page or record you asked for does not exist.".into(),
        }
    }

    fn internal(err: anyhow::Error) -> Self {
        tracing::error!(error = %err, "page failed");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Something went wrong while loading this page.".into(),
        }
    }
}

impl From<HrError> for PageError {
    fn from(err: HrError) -> Self {
        match err {
            HrError::NotFound { .. } => Self::not_found(),
            HrError::Validation(errors) => Self {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                message: errors.messages().join("; "),
            },
            other => Self::internal(anyhow::Error::new(other)),
        }
    }
}

impl From<askama::Error> for PageError {
    fn from(err: askama::Error) -> Self {
        Self::internal(anyhow::Error::new(err))
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let template = ErrorTemplate {
            ctx: PageContext::fallback(),
            status: self.status.as_u16(),
            title: self
                .status
                .canonical_reason()
                .unwrap_or("Error")
                .to_string(),
            message: self.message,
        };
        match template.render() {
            Ok(body) => (self.status, Html(body)).into_response(),
            Err(err) => {
                tracing::error!(error = %err, "error page failed to render");
                (self.status, template.title).into_response()
            }
        }
    }
}

fn render<T: Template>(status: StatusCode, template: &T) -> PageResult<Response> {
    let body = template.render()?;
    Ok((status, Html(body)).into_response())
}

pub async fn not_found() -> PageError {
    PageError::not_found()
}

pub async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> PageResult<Response> {
    let known = employees::departments(&state.pool).await?;
    let today = today();
    let (filter, status, filter_error) =
        match DashboardFilter::resolve(&query, &known, state.config.windows, today) {
            Ok(filter) => (filter, StatusCode::OK, String::new()),
            Err(errors) => (
                DashboardFilter::unfiltered(state.config.windows, today),
                StatusCode::UNPROCESSABLE_ENTITY,
                errors.messages().join("; "),
            ),
        };
    let data = dashboard::load_dashboard(&state.pool, filter).await?;
    let charts = DashboardCharts::build(&data)
        .to_json()
        .map_err(|err| PageError::internal(err.into()))?;
    let template = DashboardTemplate::new(
        PageContext::new(&state.config.site_title, "dashboard"),
        &data,
        &known,
        &query,
        charts,
        filter_error,
    );
    render(status, &template)
}

pub async fn list_employees(
    State(state): State<AppState>,
    Query(query): Query<EmployeeQuery>,
) -> PageResult<Response> {
    let filter = EmployeeFilter::from(&query);
    let rows = employees::list_employees(&state.pool, &filter).await?;
    let known = employees::departments(&state.pool).await?;
    let template = EmployeesTemplate {
        ctx: PageContext::new(&state.config.site_title, "employees"),
        count: rows.len(),
        employees: rows.iter().map(EmployeeRow::from).collect(),
        departments: SelectOption::list(&known, filter.department.as_deref()),
        statuses: SelectOption::pairs(
            &[("active", "Active"), ("attrited", "Attrited")],
            filter.status.map(|s| s.as_str()),
        ),
        q: filter.q.unwrap_or_default(),
    };
    render(StatusCode::OK, &template)
}

pub async fn new_employee(State(state): State<AppState>) -> PageResult<Response> {
    let form = EmployeeForm {
        attrition: "No".into(),
        ..EmployeeForm::default()
    };
    employee_form_page(&state, None, form, ValidationErrors::new(), StatusCode::OK)
}

pub async fn create_employee(
    State(state): State<AppState>,
    Form(form): Form<EmployeeForm>,
) -> PageResult<Response> {
    let input = match form.parse(today()) {
        Ok(input) => input,
        Err(errors) => {
            return employee_form_page(&state, None, form, errors, StatusCode::UNPROCESSABLE_ENTITY);
        }
    };
    match employees::create_employee(&state.pool, input).await {
        Ok(model) => Ok(Redirect::to(&format!("/employees/{}", model.id)).into_response()),
        Err(HrError::Validation(errors)) => {
            employee_form_page(&state, None, form, errors, StatusCode::UNPROCESSABLE_ENTITY)
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn employee_detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> PageResult<Response> {
    detail_page(
        &state,
        id,
        ExitForm::default(),
        ValidationErrors::new(),
        StatusCode::OK,
    )
    .await
}

pub async fn edit_employee(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> PageResult<Response> {
    let employee = employees::get_employee(&state.pool, id).await?;
    let form = EmployeeForm::from(&employee);
    employee_form_page(&state, Some(id), form, ValidationErrors::new(), StatusCode::OK)
}

pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<EmployeeForm>,
) -> PageResult<Response> {
    employees::get_employee(&state.pool, id).await?;
    let input = match form.parse(today()) {
        Ok(input) => input,
        Err(errors) => {
            return employee_form_page(
                &state,
                Some(id),
                form,
                errors,
                StatusCode::UNPROCESSABLE_ENTITY,
            );
        }
    };
    match employees::update_employee(&state.pool, id, input).await {
        Ok(model) => Ok(Redirect::to(&format!("/employees/{}", model.id)).into_response()),
        Err(HrError::Validation(errors)) => employee_form_page(
            &state,
            Some(id),
            form,
            errors,
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        Err(err) => Err(err.into()),
    }
}

pub async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> PageResult<Redirect> {
    employees::delete_employee(&state.pool, id).await?;
    Ok(Redirect::to("/employees"))
}

pub async fn record_exit(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<ExitForm>,
) -> PageResult<Response> {
    let input = match form.parse(today()) {
        Ok(input) => input,
        Err(errors) => {
            return detail_page(&state, id, form, errors, StatusCode::UNPROCESSABLE_ENTITY).await;
        }
    };
    match activity::record_exit(&state.pool, id, input).await {
        Ok(_) => Ok(Redirect::to(&format!("/employees/{id}")).into_response()),
        Err(HrError::Validation(errors)) => {
            detail_page(&state, id, form, errors, StatusCode::UNPROCESSABLE_ENTITY).await
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn departments(State(state): State<AppState>) -> PageResult<Response> {
    let rows = analytics::department_summary(&state.pool).await?;
    let total: i64 = rows.iter().map(|row| row.headcount).sum();
    let template = DepartmentsTemplate {
        ctx: PageContext::new(&state.config.site_title, "departments"),
        total,
        departments: rows.iter().map(DepartmentRow::from).collect(),
    };
    render(StatusCode::OK, &template)
}

pub async fn export_csv(State(state): State<AppState>) -> PageResult<Response> {
    let body = export::export_employees_csv(&state.pool).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"employees.csv\"",
            ),
        ],
        body,
    )
        .into_response())
}

fn employee_form_page(
    state: &AppState,
    id: Option<i32>,
    form: EmployeeForm,
    errors: ValidationErrors,
    status: StatusCode,
) -> PageResult<Response> {
    let template = EmployeeFormTemplate::new(
        PageContext::new(&state.config.site_title, "employees"),
        id,
        form,
        errors,
    );
    render(status, &template)
}

async fn detail_page(
    state: &AppState,
    id: i32,
    exit_form: ExitForm,
    exit_errors: ValidationErrors,
    status: StatusCode,
) -> PageResult<Response> {
    let employee = employees::get_employee(&state.pool, id).await?;
    let history = activity::employee_activity(&state.pool, id).await?;
    let attendance = analytics::attendance_summary(&history.attendance);
    let template = EmployeeDetailTemplate {
        ctx: PageContext::new(&state.config.site_title, "employees"),
        employee: EmployeeRow::from(&employee),
        attendance_percentage: format!("{:.2}", attendance.percentage),
        attendance_days: attendance.total_days,
        attendance: history.attendance.iter().map(AttendanceRow::from).collect(),
        leaves: history.leaves.iter().map(LeaveRow::from).collect(),
        has_exit: history.exit.is_some(),
        exit: history.exit.as_ref().map(ExitRow::from).unwrap_or_default(),
        exit_reasons: ExitRow::reason_options(&exit_form.reason),
        exit_date: exit_form.exit_date,
        exit_details: exit_form.details,
        exit_errors,
        today: today().to_string(),
    };
    render(status, &template)
}
