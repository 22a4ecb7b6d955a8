use std::fmt::Debug;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

/// Atomic reference-counted string type used for identifiers.
pub type ArcStr = Arc<str>;

type Thunk<T> = Box<dyn Fn() -> T + Send + Sync>;

struct ProviderInner<T> {
    value: OnceLock<T>,
    thunk: Option<Thunk<T>>,
}

/// A lazily evaluated value.
///
/// A `Provider` stores a zero-argument thunk and evaluates it the first time
/// the value is requested with [`Provider::get`]. The result is memoized, so
/// the thunk runs at most once no matter how many clones of the provider
/// exist. Configuration never calls `get` itself; the value is pulled by
/// whoever finally needs it.
pub struct Provider<T> {
    inner: Arc<ProviderInner<T>>,
}

impl<T> Provider<T>
where
    T: Send + Sync + 'static,
{
    /// Creates a provider from a deferred computation.
    pub fn new<F>(thunk: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(ProviderInner {
                value: OnceLock::new(),
                thunk: Some(Box::new(thunk)),
            }),
        }
    }

    /// Creates a provider which is already resolved to `value`.
    pub fn of(value: T) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(value);

        Self {
            inner: Arc::new(ProviderInner {
                value: cell,
                thunk: None,
            }),
        }
    }

    /// Returns the value, evaluating the thunk on first access.
    pub fn get(&self) -> &T {
        self.inner.value.get_or_init(|| match &self.inner.thunk {
            Some(thunk) => thunk(),
            // `of` always fills the cell, so a missing thunk means the cell
            // is already initialized and this branch cannot be reached.
            None => unreachable!("resolved provider without a value"),
        })
    }

    /// Whether the value has been computed already.
    pub fn is_resolved(&self) -> bool {
        self.inner.value.get().is_some()
    }

    /// Derives a new provider without evaluating this one.
    pub fn map<U, F>(&self, f: F) -> Provider<U>
    where
        U: Send + Sync + 'static,
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        let upstream = self.clone();
        Provider::new(move || f(upstream.get()))
    }
}

impl<T> Clone for Provider<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Debug> Debug for Provider<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.inner.value.get() {
            Some(value) => write!(f, "Provider({value:?})"),
            None => write!(f, "Provider(<unresolved>)"),
        }
    }
}

/// A shared, settable value owned by the host project.
///
/// Unlike a [`Provider`], a property can be changed during configuration.
/// Providers obtained through [`Property::provider`] observe whatever value
/// the property holds at the moment they are first evaluated.
pub struct Property<T> {
    cell: Arc<RwLock<T>>,
}

impl<T> Property<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(value: T) -> Self {
        Self {
            cell: Arc::new(RwLock::new(value)),
        }
    }

    pub fn get(&self) -> T {
        self.cell
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set(&self, value: T) {
        *self.cell.write().unwrap_or_else(PoisonError::into_inner) = value;
    }

    /// Changes the value in place.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let mut value = self.cell.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut *value);
    }

    /// A lazy view of this property.
    pub fn provider(&self) -> Provider<T> {
        let property = self.clone();
        Provider::new(move || property.get())
    }
}

impl<T> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T> Debug for Property<T>
where
    T: Clone + Debug + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Property").field(&self.get()).finish()
    }
}
