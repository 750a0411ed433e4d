// Todo store: the single owner of the collection and the view filter

use crate::codec;
use crate::error::TodoError;
use crate::filter::Filter;
use crate::provider::Provider;
use crate::stats::Stats;
use crate::todo::{IdStrategy, Todo, TodoId};
use chrono::Utc;
use eyre::Result;
use tracing::{debug, info, warn};

/// Key the collection is stored under unless configured otherwise
pub const DEFAULT_KEY: &str = "todos";

/// Whether an operation changed what a view would show
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Changed,
    Unchanged,
}

impl Change {
    pub fn is_changed(self) -> bool {
        self == Change::Changed
    }
}

/// Handle returned by [`TodoStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Options for [`TodoStore::open_with`]
#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub key: String,
    pub id_strategy: IdStrategy,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            key: DEFAULT_KEY.to_string(),
            id_strategy: IdStrategy::default(),
        }
    }
}

type Listener = Box<dyn FnMut()>;

/// Todo collection backed by a key-value [`Provider`]
///
/// All mutations go through the store's operations. Each one that changes the
/// collection writes the full, unfiltered collection back to the provider
/// before returning, then notifies subscribers. A failed write leaves the
/// in-memory collection as it was.
pub struct TodoStore<P: Provider> {
    provider: P,
    key: String,
    id_strategy: IdStrategy,
    todos: Vec<Todo>,
    filter: Filter,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<P: Provider> TodoStore<P> {
    /// Open a store over `provider` with the default key and id strategy
    pub fn open(provider: P) -> Self {
        Self::open_with(provider, StoreOptions::default())
    }

    /// Open a store and load whatever the provider holds under `options.key`
    ///
    /// Never fails: missing, unreadable or malformed data yields an empty
    /// collection.
    pub fn open_with(provider: P, options: StoreOptions) -> Self {
        let mut store = Self {
            provider,
            key: options.key,
            id_strategy: options.id_strategy,
            todos: Vec::new(),
            filter: Filter::default(),
            listeners: Vec::new(),
            next_subscription: 0,
        };
        store.load();
        store
    }

    fn load(&mut self) {
        self.todos = match self.provider.get(&self.key) {
            Ok(Some(raw)) => codec::decode(&raw),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(key = %self.key, error = ?e, "Failed to read persisted todos, starting empty");
                Vec::new()
            }
        };
        info!(key = %self.key, count = self.todos.len(), "Loaded todos");
    }

    /// Re-read the collection from the provider, discarding in-memory state
    pub fn reload(&mut self) -> Change {
        let before = self.todos.clone();
        self.load();
        if before == self.todos {
            return Change::Unchanged;
        }
        self.notify();
        Change::Changed
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Add a todo at the front of the collection
    ///
    /// Returns the new id, or `None` when `raw_text` is blank (nothing is
    /// added or written in that case).
    pub fn add(&mut self, raw_text: &str) -> Result<Option<TodoId>> {
        let text = raw_text.trim();
        if text.is_empty() {
            debug!("add: ignoring blank text");
            return Ok(None);
        }

        let id = self.id_strategy.generate(|candidate| self.contains(candidate));
        let Some(todo) = Todo::new(id.clone(), text, Utc::now()) else {
            return Ok(None);
        };

        let mut next = Vec::with_capacity(self.todos.len() + 1);
        next.push(todo);
        next.extend(self.todos.iter().cloned());

        self.commit(next)?;
        debug!(%id, "add: inserted");
        Ok(Some(id))
    }

    /// Flip the completion flag of one todo; unknown ids are ignored
    pub fn toggle(&mut self, id: &str) -> Result<Change> {
        let Some(index) = self.position(id) else {
            debug!(id, "toggle: no such todo");
            return Ok(Change::Unchanged);
        };

        let mut next = self.todos.clone();
        next[index] = next[index].toggled();
        let completed = next[index].completed();

        self.commit(next)?;
        debug!(id, completed, "toggle: flipped");
        Ok(Change::Changed)
    }

    /// Remove one todo; unknown ids are ignored
    pub fn delete(&mut self, id: &str) -> Result<Change> {
        // Absent ids skip the rewrite (the browser app saved unconditionally)
        let Some(index) = self.position(id) else {
            debug!(id, "delete: no such todo");
            return Ok(Change::Unchanged);
        };

        let mut next = self.todos.clone();
        next.remove(index);

        self.commit(next)?;
        debug!(id, "delete: removed");
        Ok(Change::Changed)
    }

    /// Remove every completed todo, returning how many were removed
    ///
    /// The collection is written back even when nothing was completed.
    pub fn clear_completed(&mut self) -> Result<usize> {
        let next: Vec<Todo> = self.todos.iter().filter(|todo| !todo.completed()).cloned().collect();
        let removed = self.todos.len() - next.len();

        self.commit(next)?;
        debug!(removed, "clear_completed");
        Ok(removed)
    }

    /// Select which todos [`view`](Self::view) returns. Never persisted.
    pub fn set_filter(&mut self, filter: Filter) -> Change {
        if self.filter == filter {
            return Change::Unchanged;
        }

        debug!(%filter, "set_filter");
        self.filter = filter;
        self.notify();
        Change::Changed
    }

    /// Parse and apply a filter name; unknown names leave the filter as is
    pub fn set_filter_str(&mut self, name: &str) -> std::result::Result<Change, TodoError> {
        let filter = name.parse::<Filter>()?;
        Ok(self.set_filter(filter))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// Todos selected by the current filter, newest first
    pub fn view(&self) -> Vec<&Todo> {
        self.filter.apply(&self.todos)
    }

    /// Todos selected by `filter`, ignoring the current one
    pub fn view_with(&self, filter: Filter) -> Vec<&Todo> {
        filter.apply(&self.todos)
    }

    pub fn stats(&self) -> Stats {
        Stats::from_todos(&self.todos)
    }

    /// Full, unfiltered collection, newest first
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn get(&self, id: &str) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id().as_str() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn into_provider(self) -> P {
        self.provider
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    /// Register a callback run after every operation that changes the view
    pub fn subscribe(&mut self, listener: impl FnMut() + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Drop a subscription; returns whether it existed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn position(&self, id: &str) -> Option<usize> {
        self.todos.iter().position(|todo| todo.id().as_str() == id)
    }

    /// Persist `next` and only then make it the live collection
    fn commit(&mut self, next: Vec<Todo>) -> Result<()> {
        let raw = codec::encode(&next)?;
        self.provider.set(&self.key, &raw)?;
        self.todos = next;
        self.notify();
        Ok(())
    }

    fn notify(&mut self) {
        for (_, listener) in self.listeners.iter_mut() {
            listener();
        }
    }
}
