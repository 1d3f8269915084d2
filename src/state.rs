use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub notify_url: Option<String>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, notify_url: Option<String>) -> Self {
        Self { db, notify_url }
    }
}

impl FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}
