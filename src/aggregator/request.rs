//! Incoming page requests.

use std::collections::BTreeMap;

/// Page routes served by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteId {
    Home,
    Teams,
    TeamDetail,
    TeamLineup,
    Players,
    PlayerDetail,
}

impl RouteId {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteId::Home => "home",
            RouteId::Teams => "teams",
            RouteId::TeamDetail => "team_detail",
            RouteId::TeamLineup => "team_lineup",
            RouteId::Players => "players",
            RouteId::PlayerDetail => "player_detail",
        }
    }
}

/// Route plus its path/query parameters, one per inbound page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRequest {
    pub route: RouteId,
    params: BTreeMap<String, String>,
}

impl ViewRequest {
    pub fn new(route: RouteId) -> Self {
        Self {
            route,
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn with_params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Parameter value; an empty string counts as absent.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_param_is_absent() {
        let request = ViewRequest::new(RouteId::Players)
            .with_param("search", "")
            .with_param("position", "QB");

        assert_eq!(request.param("search"), None);
        assert_eq!(request.param("position"), Some("QB"));
        assert_eq!(request.param("teamId"), None);
    }
}
