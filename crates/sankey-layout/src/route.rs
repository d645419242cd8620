//! Routes and the insertion-ordered collections that hold them.

/// A named, rated energy flow: a source or a sink.
///
/// `rate` is unit-agnostic (power or energy) and non-negative in intent.
/// Synthetic routes produced by reconciliation may carry no `id`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Route {
    pub id: Option<String>,
    /// Display name; presentation only.
    pub text: Option<String>,
    pub rate: f64,
    /// Icon hint for the renderer; presentation only.
    pub icon: Option<String>,
}

impl Route {
    /// A tracked route with the given id.
    #[must_use]
    pub fn new(id: impl Into<String>, rate: f64) -> Self {
        Self {
            id: Some(id.into()),
            text: None,
            rate,
            icon: None,
        }
    }

    /// A route without an id, as produced by reconciliation.
    #[must_use]
    pub fn synthetic(text: impl Into<String>, rate: f64) -> Self {
        Self {
            id: None,
            text: Some(text.into()),
            rate,
            icon: None,
        }
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// The id, if any, as `&str`.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Same route with a negative rate replaced by zero.
    pub(crate) fn clamped_non_negative(mut self) -> Self {
        if self.rate < 0.0 {
            sankey_core::warn!(
                code = sankey_core::logging::Diagnostic::NegativeRateClamped.code(),
                id = ?self.id,
                rate = self.rate,
                "negative consumer rate clamped to zero"
            );
            self.rate = 0.0;
        }
        self
    }
}

/// Routes keyed by id, iterated in insertion order.
///
/// Replacing a route keeps its original position so the layout does not
/// reshuffle when a rate changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteMap {
    entries: Vec<Route>,
}

impl RouteMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Route> {
        self.entries.iter().find(|r| r.id() == Some(id))
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Route> {
        self.entries.iter_mut().find(|r| r.id() == Some(id))
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Insert `route`, replacing any route with the same id in place.
    ///
    /// Returns the replaced route. A route without an id cannot be keyed and
    /// is appended.
    pub fn insert_or_replace(&mut self, route: Route) -> Option<Route> {
        let Some(id) = route.id.as_deref() else {
            sankey_core::warn!(
                code = sankey_core::logging::Diagnostic::MissingRouteId.code(),
                text = ?route.text,
                "route without id appended"
            );
            self.entries.push(route);
            return None;
        };
        match self.entries.iter().position(|r| r.id() == Some(id)) {
            Some(index) => Some(std::mem::replace(&mut self.entries[index], route)),
            None => {
                self.entries.push(route);
                None
            }
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Route> {
        self.entries.iter()
    }

    /// Sum of all rates.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|r| r.rate).sum()
    }
}

impl<'a> IntoIterator for &'a RouteMap {
    type Item = &'a Route;
    type IntoIter = std::slice::Iter<'a, Route>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Route> for RouteMap {
    fn from_iter<I: IntoIterator<Item = Route>>(iter: I) -> Self {
        let mut map = Self::new();
        for route in iter {
            map.insert_or_replace(route);
        }
        map
    }
}
