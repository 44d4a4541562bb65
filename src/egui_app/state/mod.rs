use std::future::Future;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;

use chrono::Datelike;
use eframe::egui;
use thiserror::Error;
use tokio::runtime::Runtime;

use crate::session::{
    Credentials, GuardDecision, MemoryNavigator, Navigator, RouteGuard, SessionManager,
};
use crate::shared::error::ApiError;
use crate::shared::models::{
    HistoryQuery, HistoryResponse, OperationType, Page, Paging, SortDirection,
    StatisticsResponse, UserQuery, UserResponse,
};
use crate::shared::routes::{LOGIN_PATH, REGISTER_PATH};
use crate::shared::{AppConfig, Session};

pub mod pages;

pub use pages::{
    AdvanceDraft, BoardFilter, BoardState, EmployeeState, FinanceDraft, OperationDraft,
    PasswordDraft,
};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),

    #[error(transparent)]
    Client(#[from] ApiError),
}

/// Result of a background request, polled once per frame
pub enum Remote<T> {
    NotLoaded,
    Loading(Receiver<Result<T, String>>),
    Loaded(T),
    Failed(String),
}

impl<T> Remote<T> {
    pub fn poll(&mut self) {
        let next = match self {
            Remote::Loading(rx) => match rx.try_recv() {
                Ok(Ok(value)) => Some(Remote::Loaded(value)),
                Ok(Err(message)) => Some(Remote::Failed(message)),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => {
                    Some(Remote::Failed("request cancelled".to_string()))
                }
            },
            _ => None,
        };
        if let Some(next) = next {
            *self = next;
        }
    }

    pub fn is_not_loaded(&self) -> bool {
        matches!(self, Remote::NotLoaded)
    }
}

/// Login and register form inputs
#[derive(Debug, Default)]
pub struct AuthForm {
    pub username: String,
    pub password: String,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub loading: bool,
}

impl AuthForm {
    fn reset(&mut self) {
        self.password.clear();
        self.error = None;
        self.loading = false;
    }
}

enum AuthOutcome {
    LoggedIn(Session),
    Registered,
    Failed(String),
}

pub struct DashboardState {
    pub year: i32,
    pub operation_type: OperationType,
    pub statistics: Remote<StatisticsResponse>,
    pub user_query: UserQuery,
    pub users: Remote<Page<UserResponse>>,
    pub password_change: Option<PasswordDraft>,
    pub accounts_error: Option<String>,
    pub history_query: HistoryQuery,
    pub histories: Remote<Page<HistoryResponse>>,
}

/// What to reload once a mutation succeeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reload {
    Users,
    Categories,
    Operations,
    Finances,
}

struct PendingAction {
    rx: Receiver<Result<(), String>>,
    reload: Reload,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            year: chrono::Utc::now().year(),
            operation_type: OperationType::Expense,
            statistics: Remote::NotLoaded,
            user_query: UserQuery {
                paging: Some(Paging::new("username", SortDirection::Asc, 25)),
                ..UserQuery::default()
            },
            users: Remote::NotLoaded,
            password_change: None,
            accounts_error: None,
            history_query: HistoryQuery {
                paging: Some(Paging::new("date", SortDirection::Desc, 25)),
                ..HistoryQuery::default()
            },
            histories: Remote::NotLoaded,
        }
    }
}

/// Central application state shared across egui views.
pub struct AppState {
    runtime: Runtime,
    ctx: egui::Context,
    pub manager: SessionManager,
    pub navigator: Arc<MemoryNavigator>,
    pub guard: Arc<RouteGuard>,
    pub auth_form: AuthForm,
    auth_result: Option<Receiver<AuthOutcome>>,
    pub dashboard: DashboardState,
    pub board: Option<BoardState>,
    pub employee: Option<EmployeeState>,
    actions: Vec<PendingAction>,
}

impl AppState {
    /// Wire the session core to the UI and start the mount-time session check
    pub fn new(config: AppConfig, ctx: &egui::Context) -> Result<Self, StartupError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("finboard-io")
            .enable_all()
            .build()?;

        let navigator = Arc::new(MemoryNavigator::new("/"));
        let manager = SessionManager::new(config, navigator.clone())?;
        let guard = Arc::new(manager.guard());
        guard.watch();

        let repaint = ctx.clone();
        manager.store().subscribe(move |_| repaint.request_repaint());

        let check = manager.clone();
        runtime.spawn(async move {
            check.check_session().await;
        });

        tracing::info!("AppState initialized");
        Ok(Self {
            runtime,
            ctx: ctx.clone(),
            manager,
            navigator,
            guard,
            auth_form: AuthForm::default(),
            auth_result: None,
            dashboard: DashboardState::default(),
            board: None,
            employee: None,
            actions: Vec::new(),
        })
    }

    pub fn session(&self) -> Session {
        self.manager.session()
    }

    pub fn current_path(&self) -> String {
        self.navigator.current_path()
    }

    /// Guard decision for this frame; carries out any redirect
    pub fn decision(&self) -> GuardDecision {
        self.guard.evaluate()
    }

    pub fn navigate(&mut self, path: &str) {
        if path == LOGIN_PATH || path == REGISTER_PATH {
            self.auth_form.reset();
        }
        self.guard.on_navigate(path);
    }

    fn spawn_request<T, F>(&self, request: F) -> Receiver<Result<T, String>>
    where
        T: Send + 'static,
        F: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let (tx, rx) = channel();
        let ctx = self.ctx.clone();
        self.runtime.spawn(async move {
            let _ = tx.send(request.await.map_err(|e| e.to_string()));
            ctx.request_repaint();
        });
        rx
    }

    fn spawn_remote<T, F>(&self, request: F) -> Remote<T>
    where
        T: Send + 'static,
        F: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        Remote::Loading(self.spawn_request(request))
    }

    fn spawn_action<F>(&mut self, reload: Reload, request: F)
    where
        F: Future<Output = Result<(), ApiError>> + Send + 'static,
    {
        let rx = self.spawn_request(request);
        self.actions.push(PendingAction { rx, reload });
    }

    /// Drain finished background work
    pub fn poll(&mut self) {
        self.check_auth_result();
        self.poll_actions();
        self.dashboard.statistics.poll();
        self.dashboard.users.poll();
        self.dashboard.histories.poll();
        if let Some(board) = self.board.as_mut() {
            board.board.poll();
            board.categories.poll();
            board.operations.poll();
        }
        if let Some(employee) = self.employee.as_mut() {
            employee.employee.poll();
            employee.finances.poll();
        }
    }

    fn poll_actions(&mut self) {
        let mut finished = Vec::new();
        self.actions.retain(|action| match action.rx.try_recv() {
            Ok(result) => {
                finished.push((action.reload, result));
                false
            }
            Err(TryRecvError::Empty) => true,
            Err(TryRecvError::Disconnected) => {
                finished.push((action.reload, Err("request cancelled".to_string())));
                false
            }
        });

        for (reload, result) in finished {
            match result {
                Ok(()) => match reload {
                    Reload::Users => self.load_users(),
                    Reload::Categories => self.load_categories(),
                    Reload::Operations => self.load_operations(),
                    Reload::Finances => self.load_finances(),
                },
                Err(message) => {
                    tracing::warn!(?reload, %message, "dashboard action failed");
                    self.report(reload, message);
                }
            }
        }
    }

    fn report(&mut self, reload: Reload, message: String) {
        match reload {
            Reload::Users => self.dashboard.accounts_error = Some(message),
            Reload::Categories | Reload::Operations => {
                if let Some(board) = self.board.as_mut() {
                    board.error = Some(message);
                }
            }
            Reload::Finances => {
                if let Some(employee) = self.employee.as_mut() {
                    employee.error = Some(message);
                }
            }
        }
    }

    fn check_auth_result(&mut self) {
        let Some(rx) = &self.auth_result else {
            return;
        };
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => AuthOutcome::Failed("request cancelled".into()),
        };
        self.auth_result = None;
        self.auth_form.loading = false;

        match outcome {
            AuthOutcome::LoggedIn(session) => {
                if let Some(user) = session.user() {
                    tracing::info!(username = %user.username, "signed in");
                }
                self.auth_form.password.clear();
                self.auth_form.error = None;
                self.auth_form.notice = None;
                self.dashboard = DashboardState::default();
                self.board = None;
                self.employee = None;
                self.navigate("/");
            }
            AuthOutcome::Registered => {
                self.navigate(LOGIN_PATH);
                self.auth_form.notice = Some("Обліковий запис створено".to_string());
            }
            AuthOutcome::Failed(message) => {
                self.auth_form.error = Some(message);
            }
        }
    }

    fn submit<F>(&mut self, action: F)
    where
        F: Future<Output = AuthOutcome> + Send + 'static,
    {
        self.auth_form.loading = true;
        self.auth_form.error = None;

        let (tx, rx) = channel();
        let ctx = self.ctx.clone();
        self.runtime.spawn(async move {
            let _ = tx.send(action.await);
            ctx.request_repaint();
        });
        self.auth_result = Some(rx);
    }

    pub fn handle_login(&mut self) {
        let credentials = Credentials::new(self.auth_form.username.trim(), &self.auth_form.password);
        if let Err(err) = credentials.validate() {
            self.auth_form.error = Some(err.user_message());
            return;
        }
        let manager = self.manager.clone();
        self.submit(async move {
            match manager.login(&credentials).await {
                Ok(session) => AuthOutcome::LoggedIn(session),
                Err(err) => AuthOutcome::Failed(err.user_message()),
            }
        });
    }

    pub fn handle_register(&mut self) {
        let credentials = Credentials::new(self.auth_form.username.trim(), &self.auth_form.password);
        if let Err(err) = credentials.validate() {
            self.auth_form.error = Some(err.user_message());
            return;
        }
        let manager = self.manager.clone();
        self.submit(async move {
            match manager.register(&credentials).await {
                Ok(()) => AuthOutcome::Registered,
                Err(err) => AuthOutcome::Failed(err.user_message()),
            }
        });
    }

    /// The store is invalidated by the manager; the guard redirects on its own
    pub fn logout(&mut self) {
        let manager = self.manager.clone();
        self.runtime.spawn(async move {
            if let Err(err) = manager.logout().await {
                tracing::warn!(%err, "logout did not reach the backend");
            }
        });
        self.dashboard = DashboardState::default();
        self.board = None;
        self.employee = None;
    }

    pub fn load_statistics(&mut self) {
        let api = self.manager.api();
        let (year, operation_type) = (self.dashboard.year, self.dashboard.operation_type);
        self.dashboard.statistics =
            self.spawn_remote(async move { api.statistics(year, operation_type).await });
    }

    pub fn load_users(&mut self) {
        let api = self.manager.api();
        let query = self.dashboard.user_query.clone();
        self.dashboard.users = self.spawn_remote(async move { api.list_users(&query).await });
    }

    pub fn load_histories(&mut self) {
        let api = self.manager.api();
        let query = self.dashboard.history_query.clone();
        self.dashboard.histories = self.spawn_remote(async move { api.histories(&query).await });
    }

    // Accounts

    pub fn delete_user(&mut self, user_id: i64) {
        self.dashboard.accounts_error = None;
        let api = self.manager.api();
        self.spawn_action(Reload::Users, async move { api.delete_user(user_id).await });
    }

    pub fn change_password(&mut self) {
        let Some(draft) = self.dashboard.password_change.clone() else {
            return;
        };
        if let Err(message) = draft.validate() {
            self.dashboard.accounts_error = Some(message);
            return;
        }
        self.dashboard.password_change = None;
        self.dashboard.accounts_error = None;
        let api = self.manager.api();
        self.spawn_action(Reload::Users, async move {
            api.change_password(draft.user_id, &draft.password, &draft.confirm_password)
                .await
        });
    }

    // Expense board

    /// Show `board_id`, loading it the first time
    pub fn open_board(&mut self, board_id: i64) {
        if self.board.as_ref().map(|b| b.board_id) != Some(board_id) {
            self.board = Some(BoardState::new(board_id));
        }
        if self
            .board
            .as_ref()
            .is_some_and(|board| board.board.is_not_loaded())
        {
            let api = self.manager.api();
            let remote = self.spawn_remote(async move { api.board(board_id).await });
            if let Some(board) = self.board.as_mut() {
                board.board = remote;
            }
            self.load_categories();
            self.load_operations();
        }
    }

    pub fn load_categories(&mut self) {
        if self.board.is_none() {
            return;
        }
        let api = self.manager.api();
        let remote = self.spawn_remote(async move { api.categories().await });
        if let Some(board) = self.board.as_mut() {
            board.categories = remote;
        }
    }

    pub fn load_operations(&mut self) {
        let Some(board) = self.board.as_mut() else {
            return;
        };
        let query = match board.query() {
            Ok(query) => query,
            Err(message) => {
                board.error = Some(message);
                return;
            }
        };
        board.error = None;
        let api = self.manager.api();
        let remote = self.spawn_remote(async move { api.search_operations(&query).await });
        if let Some(board) = self.board.as_mut() {
            board.operations = remote;
        }
    }

    pub fn create_category(&mut self) {
        let Some(board) = self.board.as_mut() else {
            return;
        };
        let name = std::mem::take(&mut board.new_category);
        if name.trim().is_empty() {
            return;
        }
        let api = self.manager.api();
        self.spawn_action(Reload::Categories, async move { api.create_category(&name).await });
    }

    pub fn rename_category(&mut self) {
        let Some((category_id, name)) = self.board.as_mut().and_then(|b| b.renaming.take()) else {
            return;
        };
        if name.trim().is_empty() {
            return;
        }
        let api = self.manager.api();
        self.spawn_action(Reload::Categories, async move {
            api.rename_category(category_id, &name).await
        });
    }

    /// Deleting a category also drops it from the filter
    pub fn delete_category(&mut self, category_id: i64) {
        let Some(board) = self.board.as_mut() else {
            return;
        };
        board.filter.category_ids.retain(|id| *id != category_id);
        let api = self.manager.api();
        self.spawn_action(Reload::Categories, async move {
            api.delete_category(category_id).await
        });
    }

    pub fn create_operation(&mut self) {
        let Some(board) = self.board.as_mut() else {
            return;
        };
        let (Some(draft), Some(details)) = (&board.adding, board.loaded_board()) else {
            return;
        };
        let operation = match draft.to_request(details) {
            Ok(operation) => operation,
            Err(message) => {
                board.error = Some(message);
                return;
            }
        };
        board.adding = None;
        board.error = None;
        let api = self.manager.api();
        self.spawn_action(Reload::Operations, async move {
            api.create_operation(&operation).await
        });
    }

    pub fn save_operation(&mut self) {
        let Some(board) = self.board.as_mut() else {
            return;
        };
        let (Some((operation_id, draft)), Some(details)) = (&board.editing, board.loaded_board())
        else {
            return;
        };
        let operation_id = *operation_id;
        let operation = match draft.to_request(details) {
            Ok(operation) => operation,
            Err(message) => {
                board.error = Some(message);
                return;
            }
        };
        board.editing = None;
        board.error = None;
        let api = self.manager.api();
        self.spawn_action(Reload::Operations, async move {
            api.update_operation(operation_id, &operation).await
        });
    }

    pub fn delete_operation(&mut self, operation_id: i64) {
        let api = self.manager.api();
        self.spawn_action(Reload::Operations, async move {
            api.delete_operation(operation_id).await
        });
    }

    // Employee finances

    /// Show `employee_id`, loading it the first time
    pub fn open_employee(&mut self, employee_id: i64) {
        if self.employee.as_ref().map(|e| e.employee_id) != Some(employee_id) {
            self.employee = Some(EmployeeState::new(employee_id));
        }
        if self
            .employee
            .as_ref()
            .is_some_and(|employee| employee.employee.is_not_loaded())
        {
            let api = self.manager.api();
            let remote = self.spawn_remote(async move { api.employee(employee_id).await });
            if let Some(employee) = self.employee.as_mut() {
                employee.employee = remote;
            }
            self.load_finances();
        }
    }

    pub fn load_finances(&mut self) {
        let Some(employee) = self.employee.as_ref() else {
            return;
        };
        let (employee_id, paging) = (employee.employee_id, employee.paging.clone());
        let api = self.manager.api();
        let remote =
            self.spawn_remote(async move { api.employee_finances(employee_id, &paging).await });
        if let Some(employee) = self.employee.as_mut() {
            employee.finances = remote;
        }
    }

    pub fn create_finance(&mut self) {
        let Some(employee) = self.employee.as_mut() else {
            return;
        };
        let Some(draft) = &employee.adding else {
            return;
        };
        let finance = match draft.to_request(Some(employee.employee_id)) {
            Ok(finance) => finance,
            Err(message) => {
                employee.error = Some(message);
                return;
            }
        };
        employee.adding = None;
        employee.error = None;
        let api = self.manager.api();
        self.spawn_action(Reload::Finances, async move { api.create_finance(&finance).await });
    }

    pub fn save_finance(&mut self) {
        let Some(employee) = self.employee.as_mut() else {
            return;
        };
        let Some((finance_id, draft)) = &employee.editing else {
            return;
        };
        let finance_id = *finance_id;
        let finance = match draft.to_request(None) {
            Ok(finance) => finance,
            Err(message) => {
                employee.error = Some(message);
                return;
            }
        };
        employee.editing = None;
        employee.error = None;
        let api = self.manager.api();
        self.spawn_action(Reload::Finances, async move {
            api.update_finance(finance_id, &finance).await
        });
    }

    pub fn delete_finance(&mut self, finance_id: i64) {
        let api = self.manager.api();
        self.spawn_action(Reload::Finances, async move { api.delete_finance(finance_id).await });
    }

    pub fn create_advance(&mut self) {
        let Some(employee) = self.employee.as_mut() else {
            return;
        };
        let Some(draft) = &employee.advance else {
            return;
        };
        let advance = match draft.to_request(employee.employee_id, employee.loaded_finances()) {
            Ok(advance) => advance,
            Err(message) => {
                employee.error = Some(message);
                return;
            }
        };
        employee.advance = None;
        employee.error = None;
        let api = self.manager.api();
        self.spawn_action(Reload::Finances, async move { api.create_advance(&advance).await });
    }

    pub fn delete_advance(&mut self, advance_id: i64) {
        let api = self.manager.api();
        self.spawn_action(Reload::Finances, async move { api.delete_advance(advance_id).await });
    }
}
