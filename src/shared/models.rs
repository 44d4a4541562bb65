//! Collaborator payloads
//!
//! Request and response bodies for the dashboard's CRUD endpoints. The session
//! core never looks inside these; they only flow through the pipeline.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::user::Role;

/// Paged list envelope: `{"content": [...], "total_pages": n}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default = "one")]
    pub total_pages: u32,
}

fn one() -> u32 {
    1
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            content: Vec::new(),
            total_pages: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Sorting and paging shared by every list endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paging {
    pub sort_by: String,
    pub direction: SortDirection,
    pub page: u32,
    pub size: u32,
}

impl Paging {
    pub fn new(sort_by: impl Into<String>, direction: SortDirection, size: u32) -> Self {
        Self {
            sort_by: sort_by.into(),
            direction,
            page: 0,
            size,
        }
    }

    /// Clicking a column: flip direction on the same column, else sort ascending
    pub fn sort(&mut self, field: &str) {
        if self.sort_by == field {
            self.direction = self.direction.toggled();
        } else {
            self.sort_by = field.to_string();
            self.direction = SortDirection::Asc;
        }
    }

    /// Move to `page` if it exists
    pub fn go_to(&mut self, page: u32, total_pages: u32) -> bool {
        if page < total_pages {
            self.page = page;
            true
        } else {
            false
        }
    }

    pub fn query_pairs(&self) -> Vec<(String, String)> {
        vec![
            ("sort_by".to_string(), self.sort_by.clone()),
            ("direction".to_string(), self.direction.as_str().to_string()),
            ("page".to_string(), self.page.to_string()),
            ("size".to_string(), self.size.to_string()),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationType {
    Expense,
    Income,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Expense => "EXPENSE",
            OperationType::Income => "INCOME",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LevelType {
    Main,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub role: Role,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub modified_at: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserQuery {
    pub username: Option<String>,
    pub role: Option<Role>,
    pub paging: Option<Paging>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChangePasswordRequest {
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardResponse {
    pub id: i64,
    pub name: String,
    pub operation_type: OperationType,
    pub level_type: LevelType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryRequest {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationResponse {
    pub id: i64,
    pub amount: f64,
    #[serde(default)]
    pub comment: Option<String>,
    pub operation_type: OperationType,
    pub category: CategoryResponse,
    pub date: DateTime<Utc>,
}

/// Body of `POST /operations/create` and `PUT /operations/{id}`
#[derive(Debug, Clone, Serialize)]
pub struct OperationRequest {
    pub board_id: i64,
    pub category_id: i64,
    pub operation_type: OperationType,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

/// Body of the `POST /operations` search
#[derive(Debug, Clone, Serialize)]
pub struct OperationQuery {
    pub board_id: i64,
    #[serde(rename = "type")]
    pub operation_type: OperationType,
    pub page: u32,
    pub size: u32,
    pub sort_by: String,
    pub direction: SortDirection,
    pub category_ids: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeResponse {
    pub id: i64,
    pub name: String,
}

/// Dates arrive either as `"2025-01-31"` or as `[2025, 1, 31]`
mod backend_date {
    use chrono::NaiveDate;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(NaiveDate),
        Parts(i32, u32, u32),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Text(date) => Ok(date),
            Raw::Parts(year, month, day) => NaiveDate::from_ymd_opt(year, month, day)
                .ok_or_else(|| D::Error::custom(format!("invalid date {}-{}-{}", year, month, day))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeAdvanceResponse {
    pub id: i64,
    #[serde(deserialize_with = "backend_date::deserialize")]
    pub date: NaiveDate,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeFinanceResponse {
    pub id: i64,
    #[serde(deserialize_with = "backend_date::deserialize")]
    pub start_date: NaiveDate,
    #[serde(deserialize_with = "backend_date::deserialize")]
    pub end_date: NaiveDate,
    pub income_qfd: f64,
    pub paid_ref: f64,
    pub percent_qfd: f64,
    #[serde(default)]
    pub advances: Vec<EmployeeAdvanceResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FinanceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<i64>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub income_qfd: f64,
    pub paid_ref: f64,
    pub percent_qfd: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdvanceRequest {
    pub employee_id: i64,
    pub amount: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HistoryType {
    User,
    Operation,
}

impl HistoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryType::User => "USER",
            HistoryType::Operation => "OPERATION",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub id: i64,
    pub user: UserResponse,
    #[serde(rename = "type")]
    pub history_type: String,
    /// Audit body; its shape depends on `history_type`
    pub body: serde_json::Value,
    pub date: i64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HistoryQuery {
    pub username: Option<String>,
    pub history_type: Option<HistoryType>,
    pub paging: Option<Paging>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthStats {
    pub month: u32,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsResponse {
    #[serde(default)]
    pub statistics: Vec<MonthStats>,
    pub year: i32,
}

impl StatisticsResponse {
    /// Twelve monthly amounts, zero-filled where the backend sent nothing
    pub fn by_month(&self) -> [f64; 12] {
        let mut months = [0.0; 12];
        for stat in &self.statistics {
            if (1..=12).contains(&stat.month) {
                months[(stat.month - 1) as usize] = stat.amount;
            }
        }
        months
    }
}
