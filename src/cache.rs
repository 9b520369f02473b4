use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

use log::debug;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::error::{AppError, AppResult};

pub const BUDGETS: &str = "budgets";
pub const GOALS: &str = "goals";
pub const DEBTS: &str = "debts";
pub const TRANSACTIONS: &str = "transactions";
pub const CATEGORIES: &str = "categories";
pub const PAYMENT_METHODS: &str = "payment-methods";
pub const RECOMMENDATIONS: &str = "recommendations";
pub const NOTIFICATIONS: &str = "notifications";
pub const SUBSCRIPTION: &str = "subscription";
pub const USERS: &str = "users";
pub const PLANS: &str = "plans";
pub const REPORTS: &str = "reports";

// Bumping a key's revision re-runs every fetch that lists it in its deps.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryRevisions {
    revisions: HashMap<&'static str, u32>,
}

impl QueryRevisions {
    pub fn revision(&self, key: &str) -> u32 {
        self.revisions.get(key).copied().unwrap_or(0)
    }
}

pub enum CacheAction {
    Invalidate(&'static str),
}

impl Reducible for QueryRevisions {
    type Action = CacheAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match action {
            CacheAction::Invalidate(key) => {
                let mut next = (*self).clone();
                let entry = next.revisions.entry(key).or_insert(0);
                *entry = entry.wrapping_add(1);
                debug!("invalidated query key {} (rev {})", key, entry);
                Rc::new(next)
            }
        }
    }
}

pub type QueryCache = UseReducerHandle<QueryRevisions>;

#[hook]
pub fn use_revision(key: &'static str) -> u32 {
    use_context::<QueryCache>()
        .map(|cache| cache.revision(key))
        .unwrap_or(0)
}

#[hook]
pub fn use_invalidate() -> Callback<&'static str> {
    let cache = use_context::<QueryCache>();
    Callback::from(move |key: &'static str| {
        if let Some(cache) = cache.as_ref() {
            cache.dispatch(CacheAction::Invalidate(key));
        }
    })
}

#[derive(Clone, Debug, PartialEq)]
pub struct QueryState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<AppError>,
}

impl<T> QueryState<T> {
    fn loading(data: Option<T>) -> Self {
        Self {
            data,
            loading: true,
            error: None,
        }
    }

    fn settled(result: AppResult<T>, previous: Option<T>) -> Self {
        match result {
            Ok(data) => Self {
                data: Some(data),
                loading: false,
                error: None,
            },
            Err(error) => Self {
                data: previous,
                loading: false,
                error: Some(error),
            },
        }
    }
}

impl<T: Clone + Default> QueryState<T> {
    pub fn value(&self) -> T {
        self.data.clone().unwrap_or_default()
    }
}

fn next_generation(counter: &RefCell<u32>) -> u32 {
    let mut latest = counter.borrow_mut();
    *latest = latest.wrapping_add(1);
    *latest
}

fn is_latest(issued: u32, latest: u32) -> bool {
    issued == latest
}

// Only the latest issued fetch may settle the state.
#[hook]
pub fn use_query<T, D, F, Fut>(key: &'static str, deps: D, fetch: F) -> QueryState<T>
where
    T: Clone + PartialEq + 'static,
    D: Clone + PartialEq + 'static,
    F: FnOnce(D) -> Fut + 'static,
    Fut: Future<Output = AppResult<T>> + 'static,
{
    let state = use_state(|| QueryState::<T>::loading(None));
    let revision = use_revision(key);
    let generation = use_mut_ref(|| 0u32);

    {
        let state = state.clone();
        use_effect_with_deps(
            move |(deps, _)| {
                let issued = next_generation(&generation);
                let previous = state.data.clone();
                state.set(QueryState::loading(previous.clone()));
                let deps = deps.clone();
                spawn_local(async move {
                    let result = fetch(deps).await;
                    if !is_latest(issued, *generation.borrow()) {
                        debug!("dropping stale {} response", key);
                        return;
                    }
                    state.set(QueryState::settled(result, previous));
                });
                || ()
            },
            (deps, revision),
        );
    }

    (*state).clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalidation_bumps_only_the_given_key() {
        let state = Rc::new(QueryRevisions::default());
        let state = state.reduce(CacheAction::Invalidate(RECOMMENDATIONS));
        let state = state.reduce(CacheAction::Invalidate(RECOMMENDATIONS));
        let state = state.reduce(CacheAction::Invalidate(BUDGETS));
        assert_eq!(state.revision(RECOMMENDATIONS), 2);
        assert_eq!(state.revision(BUDGETS), 1);
        assert_eq!(state.revision(GOALS), 0);
    }

    #[test]
    fn earlier_fetch_finishing_last_is_discarded() {
        let counter = RefCell::new(0);
        let current_month = next_generation(&counter);
        let last_six_months = next_generation(&counter);
        assert!(!is_latest(current_month, *counter.borrow()));
        assert!(is_latest(last_six_months, *counter.borrow()));
    }

    #[test]
    fn failed_refetch_keeps_previous_data() {
        let state = QueryState::settled(Err(AppError::Unauthenticated), Some(vec![1, 2]));
        assert!(!state.loading);
        assert_eq!(state.value(), vec![1, 2]);
        assert_eq!(state.error, Some(AppError::Unauthenticated));

        let state: QueryState<Vec<u8>> = QueryState::settled(Ok(vec![3]), Some(vec![1]));
        assert_eq!(state.data, Some(vec![3]));
        assert!(QueryState::<u8>::loading(None).loading);
    }
}
