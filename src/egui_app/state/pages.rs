//! State for the expense board, the employee finance page and the account
//! password form.
//!
//! Inputs are kept as text while the user types and parsed into request
//! bodies on submit; a parse failure becomes the page's error line.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use super::Remote;
use crate::shared::models::{
    AdvanceRequest, BoardResponse, CategoryResponse, EmployeeFinanceResponse, EmployeeResponse,
    FinanceRequest, OperationQuery, OperationRequest, OperationResponse, OperationType, Page,
    Paging, SortDirection,
};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

fn parse_amount(raw: &str, field: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .replace(',', ".")
        .parse()
        .map_err(|_| format!("{}: введіть число", field))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("{}: значення не може бути від'ємним", field));
    }
    Ok(value)
}

fn parse_date(raw: &str, field: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| format!("{}: дата у форматі РРРР-ММ-ДД", field))
}

fn parse_optional_date(raw: &str, field: &str) -> Result<Option<NaiveDate>, String> {
    if raw.trim().is_empty() {
        Ok(None)
    } else {
        parse_date(raw, field).map(Some)
    }
}

/// `YYYY-MM-DD HH:MM`, or a bare date at midnight; empty means "now" on the backend
fn parse_optional_date_time(raw: &str) -> Result<Option<DateTime<Utc>>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDateTime::parse_from_str(raw, DATE_TIME_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(raw, DATE_FORMAT).map(|d| d.and_time(NaiveTime::MIN)))
        .map(|moment| Some(moment.and_utc()))
        .map_err(|_| "Дата: формат РРРР-ММ-ДД ГГ:ХХ".to_string())
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// New or edited operation row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationDraft {
    pub amount: String,
    pub category_id: Option<i64>,
    pub comment: String,
    pub date: String,
}

impl OperationDraft {
    pub fn from_operation(operation: &OperationResponse) -> Self {
        Self {
            amount: operation.amount.to_string(),
            category_id: Some(operation.category.id),
            comment: operation.comment.clone().unwrap_or_default(),
            date: operation.date.format(DATE_TIME_FORMAT).to_string(),
        }
    }

    pub fn to_request(&self, board: &BoardResponse) -> Result<OperationRequest, String> {
        let amount = parse_amount(&self.amount, "Сума")?;
        let category_id = self.category_id.ok_or("Оберіть категорію")?;
        Ok(OperationRequest {
            board_id: board.id,
            category_id,
            operation_type: board.operation_type,
            amount,
            comment: non_empty(&self.comment),
            date: parse_optional_date_time(&self.date)?,
        })
    }
}

/// Operation search filters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardFilter {
    pub category_ids: Vec<i64>,
    pub comment: String,
    pub start_date: String,
    pub end_date: String,
}

impl BoardFilter {
    pub fn toggle_category(&mut self, category_id: i64) {
        if let Some(pos) = self.category_ids.iter().position(|id| *id == category_id) {
            self.category_ids.remove(pos);
        } else {
            self.category_ids.push(category_id);
        }
    }
}

pub struct BoardState {
    pub board_id: i64,
    pub board: Remote<BoardResponse>,
    pub categories: Remote<Vec<CategoryResponse>>,
    pub operations: Remote<Page<OperationResponse>>,
    pub paging: Paging,
    pub filter: BoardFilter,
    pub new_category: String,
    pub renaming: Option<(i64, String)>,
    pub adding: Option<OperationDraft>,
    pub editing: Option<(i64, OperationDraft)>,
    pub error: Option<String>,
}

impl BoardState {
    pub fn new(board_id: i64) -> Self {
        Self {
            board_id,
            board: Remote::NotLoaded,
            categories: Remote::NotLoaded,
            operations: Remote::NotLoaded,
            paging: Paging::new("date", SortDirection::Desc, 25),
            filter: BoardFilter::default(),
            new_category: String::new(),
            renaming: None,
            adding: None,
            editing: None,
            error: None,
        }
    }

    pub fn loaded_board(&self) -> Option<&BoardResponse> {
        match &self.board {
            Remote::Loaded(board) => Some(board),
            _ => None,
        }
    }

    /// Search body for the current filters; the date range covers whole days
    pub fn query(&self) -> Result<OperationQuery, String> {
        let operation_type = self
            .loaded_board()
            .map(|board| board.operation_type)
            .unwrap_or(OperationType::Expense);
        let start_date = parse_optional_date(&self.filter.start_date, "Від")?
            .map(|day| day.and_time(NaiveTime::MIN).and_utc());
        let end_date = parse_optional_date(&self.filter.end_date, "До")?
            .and_then(|day| day.and_hms_milli_opt(23, 59, 59, 999))
            .map(|moment| moment.and_utc());
        Ok(OperationQuery {
            board_id: self.board_id,
            operation_type,
            page: self.paging.page,
            size: self.paging.size,
            sort_by: self.paging.sort_by.clone(),
            direction: self.paging.direction,
            category_ids: self.filter.category_ids.clone(),
            comment: non_empty(&self.filter.comment),
            start_date,
            end_date,
        })
    }
}

/// New or edited settlement period
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinanceDraft {
    pub start_date: String,
    pub end_date: String,
    pub income_qfd: String,
    pub paid_ref: String,
    pub percent_qfd: String,
}

impl FinanceDraft {
    pub fn from_finance(finance: &EmployeeFinanceResponse) -> Self {
        Self {
            start_date: finance.start_date.format(DATE_FORMAT).to_string(),
            end_date: finance.end_date.format(DATE_FORMAT).to_string(),
            income_qfd: finance.income_qfd.to_string(),
            paid_ref: finance.paid_ref.to_string(),
            percent_qfd: finance.percent_qfd.to_string(),
        }
    }

    /// `employee_id` is sent on create only
    pub fn to_request(&self, employee_id: Option<i64>) -> Result<FinanceRequest, String> {
        let start_date = parse_date(&self.start_date, "Початок")?;
        let end_date = parse_date(&self.end_date, "Кінець")?;
        if end_date < start_date {
            return Err("Кінець періоду раніше за початок".to_string());
        }
        Ok(FinanceRequest {
            employee_id,
            start_date,
            end_date,
            income_qfd: parse_amount(&self.income_qfd, "Дохід")?,
            paid_ref: parse_amount(&self.paid_ref, "Виплачено")?,
            percent_qfd: parse_amount(&self.percent_qfd, "Відсоток")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdvanceDraft {
    pub amount: String,
    pub date: String,
}

impl AdvanceDraft {
    /// An advance must fall inside one of the employee's periods
    pub fn to_request(
        &self,
        employee_id: i64,
        finances: &[EmployeeFinanceResponse],
    ) -> Result<AdvanceRequest, String> {
        let amount = parse_amount(&self.amount, "Аванс")?;
        let date = parse_date(&self.date, "Дата")?;
        if !finances
            .iter()
            .any(|f| f.start_date <= date && date <= f.end_date)
        {
            return Err("Дата авансу поза розрахунковими періодами".to_string());
        }
        Ok(AdvanceRequest {
            employee_id,
            amount,
            date,
        })
    }
}

pub struct EmployeeState {
    pub employee_id: i64,
    pub employee: Remote<EmployeeResponse>,
    pub finances: Remote<Page<EmployeeFinanceResponse>>,
    pub paging: Paging,
    pub adding: Option<FinanceDraft>,
    pub editing: Option<(i64, FinanceDraft)>,
    pub advance: Option<AdvanceDraft>,
    pub expanded: Option<i64>,
    pub error: Option<String>,
}

impl EmployeeState {
    pub fn new(employee_id: i64) -> Self {
        Self {
            employee_id,
            employee: Remote::NotLoaded,
            finances: Remote::NotLoaded,
            paging: Paging::new("id", SortDirection::Desc, 15),
            adding: None,
            editing: None,
            advance: None,
            expanded: None,
            error: None,
        }
    }

    pub fn loaded_finances(&self) -> &[EmployeeFinanceResponse] {
        match &self.finances {
            Remote::Loaded(page) => &page.content,
            _ => &[],
        }
    }
}

/// Admin password reset for one account
#[derive(Debug, Clone, PartialEq)]
pub struct PasswordDraft {
    pub user_id: i64,
    pub password: String,
    pub confirm_password: String,
}

impl PasswordDraft {
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            password: String::new(),
            confirm_password: String::new(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.password.is_empty() {
            return Err("Введіть новий пароль".to_string());
        }
        if self.password != self.confirm_password {
            return Err("Паролі не збігаються".to_string());
        }
        Ok(())
    }
}
