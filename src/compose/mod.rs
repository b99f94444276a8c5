//! Function composition helpers
//!
//! Small combinators the extractors are built from: `pipe!` chains plain
//! stages, `try_pipe!` chains fallible stages and stops at the first error,
//! and `from_spec` fans one input out into a keyed, ordered record.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Compose two functions: the result computes `g(f(x))`.
pub fn pipe2<A, B, C, F, G>(f: F, g: G) -> impl Fn(A) -> C
where
    F: Fn(A) -> B,
    G: Fn(B) -> C,
{
    move |x| g(f(x))
}

/// Compose two fallible functions. `g` is never called when `f` fails.
pub fn try_pipe2<A, B, C, E, F, G>(f: F, g: G) -> impl Fn(A) -> Result<C, E>
where
    F: Fn(A) -> Result<B, E>,
    G: Fn(B) -> Result<C, E>,
{
    move |x| g(f(x)?)
}

/// Chain two or more stages left to right.
///
/// `pipe!(f, g, h)(x)` is `h(g(f(x)))`. A single stage is rejected at
/// compile time, and every stage's output type must match the next stage's
/// input type.
#[macro_export]
macro_rules! pipe {
    ($f:expr, $g:expr $(,)?) => {
        $crate::compose::pipe2($f, $g)
    };
    ($f:expr, $g:expr, $($rest:expr),+ $(,)?) => {
        $crate::pipe!($crate::compose::pipe2($f, $g), $($rest),+)
    };
}

/// Like [`pipe!`] for stages returning `Result`; the first `Err` is
/// returned unchanged and the remaining stages are skipped.
#[macro_export]
macro_rules! try_pipe {
    ($f:expr, $g:expr $(,)?) => {
        $crate::compose::try_pipe2($f, $g)
    };
    ($f:expr, $g:expr, $($rest:expr),+ $(,)?) => {
        $crate::try_pipe!($crate::compose::try_pipe2($f, $g), $($rest),+)
    };
}

/// Apply `f` only when `pred` holds; otherwise pass the value through.
pub fn when<T, P, F>(pred: P, f: F) -> impl Fn(T) -> T
where
    P: Fn(&T) -> bool,
    F: Fn(T) -> T,
{
    move |x| if pred(&x) { f(x) } else { x }
}

/// Apply `f` only when `pred` does not hold; otherwise pass the value through.
pub fn unless<T, P, F>(pred: P, f: F) -> impl Fn(T) -> T
where
    P: Fn(&T) -> bool,
    F: Fn(T) -> T,
{
    move |x| if pred(&x) { x } else { f(x) }
}

/// Replace an absent value with `fallback`.
pub fn default<T: Clone>(fallback: T) -> impl Fn(Option<T>) -> T {
    move |x| x.unwrap_or_else(|| fallback.clone())
}

/// Lift `f` over an optional value. Absent input stays absent and `f` is
/// not called.
pub fn maybe<A, B, F>(f: F) -> impl Fn(Option<A>) -> Option<B>
where
    F: Fn(A) -> Option<B>,
{
    move |x| x.and_then(&f)
}

pub fn is_none<T>(x: &Option<T>) -> bool {
    x.is_none()
}

pub fn apply_to<T, R>(value: T, f: impl FnOnce(T) -> R) -> R {
    f(value)
}

/// Run `f` for its effect and hand the value on unchanged.
pub fn through<T, F>(f: F) -> impl Fn(T) -> T
where
    F: Fn(&T),
{
    move |x| {
        f(&x);
        x
    }
}

/// Partially applied `map`: the returned function maps lazily over whatever
/// iterable it is given, without buffering.
pub fn map_with<I, B, F>(f: F) -> impl Fn(I) -> std::iter::Map<I::IntoIter, F>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> B + Clone,
{
    move |items| items.into_iter().map(f.clone())
}

/// Partially applied `filter`, lazy like [`map_with`].
pub fn filter_by<I, P>(pred: P) -> impl Fn(I) -> std::iter::Filter<I::IntoIter, P>
where
    I: IntoIterator,
    P: FnMut(&I::Item) -> bool + Clone,
{
    move |items| items.into_iter().filter(pred.clone())
}

/// Ordered key/value record produced by a [`Spec`].
///
/// Keys keep the order they were declared in, and serialize as a JSON
/// object in that same order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<V> {
    entries: Vec<(&'static str, V)>,
}

impl<V> Record<V> {
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &V)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<(&'static str, V)> {
        self.entries
    }
}

impl<V: Serialize> Serialize for Record<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

type FieldFn<T, V, E> = Box<dyn Fn(&T) -> Result<V, E>>;

/// Ordered mapping of field name to extractor, all applied to one shared
/// input.
pub struct Spec<T: ?Sized, V, E> {
    fields: Vec<(&'static str, FieldFn<T, V, E>)>,
}

impl<T: ?Sized, V, E> Default for Spec<T, V, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized, V, E> Spec<T, V, E> {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Declare a field. Redeclaring a key swaps in the new extractor but
    /// keeps the key's original position.
    pub fn field<F>(mut self, key: &'static str, f: F) -> Self
    where
        F: Fn(&T) -> Result<V, E> + 'static,
    {
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = Box::new(f),
            None => self.fields.push((key, Box::new(f))),
        }
        self
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.fields.iter().map(|(k, _)| *k).collect()
    }

    /// Run every extractor against `input` in declaration order. The first
    /// failing extractor aborts the build.
    pub fn apply(&self, input: &T) -> Result<Record<V>, E> {
        let entries = self
            .fields
            .iter()
            .map(|(key, f)| f(input).map(|value| (*key, value)))
            .collect::<Result<Vec<_>, E>>()?;
        Ok(Record { entries })
    }
}

/// Turn a [`Spec`] into a record-building function.
pub fn from_spec<T: ?Sized, V, E>(spec: Spec<T, V, E>) -> impl Fn(&T) -> Result<Record<V>, E> {
    move |input: &T| spec.apply(input)
}
