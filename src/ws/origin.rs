//! Origin checks performed before a request is upgraded.

use axum::http::HeaderValue;

/// Which request origins may open a connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OriginPolicy {
    /// Accept every origin. This is the default.
    #[default]
    Any,
    /// Accept only the listed origins, stored normalized.
    AllowList(Vec<String>),
}

impl OriginPolicy {
    /// Builds a policy from configured origins. An empty list means [`OriginPolicy::Any`].
    #[must_use]
    pub fn from_list<S: AsRef<str>>(origins: &[S]) -> Self {
        let list: Vec<String> = origins
            .iter()
            .map(|o| normalize(o.as_ref()))
            .filter(|o| !o.is_empty())
            .collect();
        if list.is_empty() {
            Self::Any
        } else {
            Self::AllowList(list)
        }
    }

    /// Returns `true` if every origin is accepted.
    #[must_use]
    pub const fn is_permissive(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Decides whether a request carrying `origin` may upgrade.
    ///
    /// Requests without an `Origin` header come from non-browser clients and
    /// are always accepted. A header that is not valid UTF-8 never matches an
    /// allow-list.
    #[must_use]
    pub fn permits(&self, origin: Option<&HeaderValue>) -> bool {
        let Self::AllowList(allowed) = self else {
            return true;
        };
        let Some(origin) = origin else {
            return true;
        };
        let Ok(origin) = origin.to_str() else {
            return false;
        };
        let origin = normalize(origin);
        allowed.iter().any(|a| *a == origin)
    }
}

fn normalize(origin: &str) -> String {
    origin.trim().trim_end_matches('/').to_ascii_lowercase()
}
