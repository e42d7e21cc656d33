use crate::config::Config;
use crate::store::DynExamStore;
use axum::extract::FromRef;

#[derive(Clone)]
pub struct AppState {
    pub store: DynExamStore,
    pub config: Config,
}

impl FromRef<AppState> for DynExamStore {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}
