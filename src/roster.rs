//! Ordered roster of simulated gateway services.
//!
//! A [`Roster`] is the fixed set of services a dispatch run fans out over.
//! Order matters: launch offsets are assigned by roster position, so the
//! first entry fires immediately and the last fires after the longest
//! stagger delay. The roster is immutable for the lifetime of a dispatcher;
//! cloning it is cheap (shared slice).

use std::fmt;
use std::sync::Arc;

/// Identity of a single simulated gateway service.
///
/// Wraps a shared string so identities can be cloned into launch tasks and
/// events without reallocating.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceId(Arc<str>);

impl ServiceId {
    /// Creates an identity from any string-like name.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// Service name as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ServiceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&ServiceId> for Arc<str> {
    fn from(id: &ServiceId) -> Self {
        Arc::clone(&id.0)
    }
}

/// Immutable, ordered collection of [`ServiceId`]s.
///
/// Duplicate names are dropped, keeping the first occurrence, so every
/// position maps to a distinct service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Roster {
    services: Arc<[ServiceId]>,
}

impl Roster {
    /// Builds a roster from an ordered list of service names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        let mut services: Vec<ServiceId> = Vec::new();
        for name in names {
            let id = ServiceId::new(name);
            if !services.contains(&id) {
                services.push(id);
            }
        }
        Self {
            services: services.into(),
        }
    }

    /// The stock demo roster: 38 fictional gateway services.
    pub fn demo() -> Self {
        Self::new([
            "aeropush",
            "beaconly",
            "bluequill",
            "brightwire",
            "cedarping",
            "chirpline",
            "cloudhorn",
            "daisycast",
            "dartwave",
            "echofleet",
            "emberpage",
            "fernsignal",
            "flintcast",
            "fogwhistle",
            "galepost",
            "glowping",
            "harborsend",
            "hummingbyte",
            "ionbeacon",
            "jadeflare",
            "kitegram",
            "larkmail",
            "lumenbuzz",
            "mapleping",
            "mistrelay",
            "northchime",
            "novachirp",
            "oakenpage",
            "orbitdove",
            "pebbletone",
            "pinewire",
            "quartzping",
            "ravenpost",
            "reedsignal",
            "sablewave",
            "tidecast",
            "violetbeam",
            "wrenflash",
        ])
    }

    /// Number of services on the roster.
    #[inline]
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Returns `true` when the roster has no services.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Service at `position`, if within bounds.
    #[inline]
    pub fn get(&self, position: usize) -> Option<&ServiceId> {
        self.services.get(position)
    }

    /// Roster position of `id`, if present.
    pub fn position(&self, id: &ServiceId) -> Option<usize> {
        self.services.iter().position(|s| s == id)
    }

    /// Iterates services in launch order.
    pub fn iter(&self) -> impl Iterator<Item = &ServiceId> {
        self.services.iter()
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::demo()
    }
}
