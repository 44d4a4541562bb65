//! Dashboard API Client
//!
//! Typed calls for the CRUD endpoints behind the dashboard screens. Each call
//! is a plain request through the [`RequestPipeline`], so an expired cookie is
//! refreshed transparently; any status other than the one the endpoint
//! promises becomes [`ApiError::Status`].

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::session::pipeline::{ApiRequest, RequestPipeline};
use crate::shared::error::ApiError;
use crate::shared::models::{
    AdvanceRequest, BoardResponse, CategoryRequest, CategoryResponse, ChangePasswordRequest,
    EmployeeFinanceResponse, EmployeeResponse, FinanceRequest, HistoryQuery, HistoryResponse,
    OperationQuery, OperationRequest, OperationResponse, OperationType, Page, Paging,
    StatisticsResponse, UserQuery, UserResponse,
};

/// API client
#[derive(Clone)]
pub struct ApiClient {
    pipeline: RequestPipeline,
}

fn with_paging(mut request: ApiRequest, paging: Option<&Paging>) -> ApiRequest {
    if let Some(paging) = paging {
        request.query.extend(paging.query_pairs());
    }
    request
}

impl ApiClient {
    pub fn new(pipeline: RequestPipeline) -> Self {
        Self { pipeline }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        expected: StatusCode,
    ) -> Result<T, ApiError> {
        self.pipeline
            .execute(&request)
            .await?
            .expect_status(expected)?
            .json()
    }

    async fn expect(&self, request: ApiRequest, expected: StatusCode) -> Result<(), ApiError> {
        self.pipeline
            .execute(&request)
            .await?
            .expect_status(expected)
            .map(|_| ())
    }

    // Create endpoints answer 200 or 201 depending on the resource
    async fn expect_success(&self, request: ApiRequest) -> Result<(), ApiError> {
        let response = self.pipeline.execute(&request).await?;
        if response.is_success() {
            Ok(())
        } else {
            Err(ApiError::status(response.status, response.text()))
        }
    }

    // Users

    /// List accounts, filtered by username and role
    pub async fn list_users(&self, query: &UserQuery) -> Result<Page<UserResponse>, ApiError> {
        let request = ApiRequest::get("/users")
            .query_opt("username", query.username.as_deref())
            .query_opt("role", query.role.map(|r| r.as_str()));
        self.fetch(with_paging(request, query.paging.as_ref()), StatusCode::OK)
            .await
    }

    pub async fn delete_user(&self, user_id: i64) -> Result<(), ApiError> {
        self.expect(
            ApiRequest::delete(format!("/users/delete/{}", user_id)),
            StatusCode::NO_CONTENT,
        )
        .await
    }

    pub async fn change_password(
        &self,
        user_id: i64,
        password: &str,
        confirm_password: &str,
    ) -> Result<(), ApiError> {
        let body = ChangePasswordRequest {
            password: password.to_string(),
            confirm_password: confirm_password.to_string(),
        };
        let request =
            ApiRequest::post(format!("/users/change-password/{}", user_id)).json(&body)?;
        self.expect(request, StatusCode::NO_CONTENT).await
    }

    // Boards and categories

    pub async fn board(&self, board_id: i64) -> Result<BoardResponse, ApiError> {
        self.fetch(ApiRequest::get(format!("/boards/{}", board_id)), StatusCode::OK)
            .await
    }

    pub async fn categories(&self) -> Result<Vec<CategoryResponse>, ApiError> {
        self.fetch(ApiRequest::get("/categories"), StatusCode::OK).await
    }

    pub async fn create_category(&self, name: &str) -> Result<(), ApiError> {
        let request = ApiRequest::post("/categories").json(&CategoryRequest {
            name: name.trim().to_string(),
        })?;
        self.expect(request, StatusCode::CREATED).await
    }

    pub async fn rename_category(&self, category_id: i64, name: &str) -> Result<(), ApiError> {
        let request = ApiRequest::put(format!("/categories/{}", category_id)).json(
            &CategoryRequest {
                name: name.trim().to_string(),
            },
        )?;
        self.expect(request, StatusCode::OK).await
    }

    pub async fn delete_category(&self, category_id: i64) -> Result<(), ApiError> {
        self.expect(
            ApiRequest::delete(format!("/categories/{}", category_id)),
            StatusCode::NO_CONTENT,
        )
        .await
    }

    // Operations

    /// Search a board's operations; the filter travels in the POST body
    pub async fn search_operations(
        &self,
        query: &OperationQuery,
    ) -> Result<Page<OperationResponse>, ApiError> {
        let request = ApiRequest::post("/operations").json(query)?;
        self.fetch(request, StatusCode::OK).await
    }

    pub async fn create_operation(&self, operation: &OperationRequest) -> Result<(), ApiError> {
        let request = ApiRequest::post("/operations/create").json(operation)?;
        self.expect_success(request).await
    }

    pub async fn update_operation(
        &self,
        operation_id: i64,
        operation: &OperationRequest,
    ) -> Result<(), ApiError> {
        let request = ApiRequest::put(format!("/operations/{}", operation_id)).json(operation)?;
        self.expect(request, StatusCode::OK).await
    }

    pub async fn delete_operation(&self, operation_id: i64) -> Result<(), ApiError> {
        self.expect(
            ApiRequest::delete(format!("/operations/{}", operation_id)),
            StatusCode::NO_CONTENT,
        )
        .await
    }

    // Employees and finances

    pub async fn employee(&self, employee_id: i64) -> Result<EmployeeResponse, ApiError> {
        self.fetch(
            ApiRequest::get(format!("/employees/{}", employee_id)),
            StatusCode::OK,
        )
        .await
    }

    pub async fn employee_finances(
        &self,
        employee_id: i64,
        paging: &Paging,
    ) -> Result<Page<EmployeeFinanceResponse>, ApiError> {
        let request = ApiRequest::get("/employee-finances").query("employeeId", employee_id);
        self.fetch(with_paging(request, Some(paging)), StatusCode::OK)
            .await
    }

    pub async fn create_finance(&self, finance: &FinanceRequest) -> Result<(), ApiError> {
        let request = ApiRequest::post("/employee-finances").json(finance)?;
        self.expect_success(request).await
    }

    pub async fn update_finance(
        &self,
        finance_id: i64,
        finance: &FinanceRequest,
    ) -> Result<(), ApiError> {
        let request =
            ApiRequest::put(format!("/employee-finances/{}", finance_id)).json(finance)?;
        self.expect(request, StatusCode::OK).await
    }

    pub async fn delete_finance(&self, finance_id: i64) -> Result<(), ApiError> {
        self.expect(
            ApiRequest::delete(format!("/employee-finances/{}", finance_id)),
            StatusCode::NO_CONTENT,
        )
        .await
    }

    pub async fn create_advance(&self, advance: &AdvanceRequest) -> Result<(), ApiError> {
        let request = ApiRequest::post("/employee-advances").json(advance)?;
        self.expect_success(request).await
    }

    pub async fn delete_advance(&self, advance_id: i64) -> Result<(), ApiError> {
        self.expect(
            ApiRequest::delete(format!("/employee-advances/{}", advance_id)),
            StatusCode::NO_CONTENT,
        )
        .await
    }

    // Audit log and statistics

    pub async fn histories(&self, query: &HistoryQuery) -> Result<Page<HistoryResponse>, ApiError> {
        let request = ApiRequest::get("/histories")
            .query_opt("username", query.username.as_deref())
            .query_opt("type", query.history_type.map(|t| t.as_str()));
        self.fetch(with_paging(request, query.paging.as_ref()), StatusCode::OK)
            .await
    }

    /// Monthly totals for the admin dashboard
    pub async fn statistics(
        &self,
        year: i32,
        operation_type: OperationType,
    ) -> Result<StatisticsResponse, ApiError> {
        let request = ApiRequest::get("/stats")
            .query("year", year)
            .query("type", operation_type.as_str());
        self.fetch(request, StatusCode::OK).await
    }
}
