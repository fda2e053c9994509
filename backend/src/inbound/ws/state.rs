//! Shared WebSocket adapter state.

use std::sync::Arc;

use url::Url;

use crate::inbound::ws::rooms::OrderRooms;

/// Origins permitted to open the gateway. An empty list admits any origin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OriginAllowList(Vec<String>);

impl OriginAllowList {
    /// Build the list from configured origins. Entries are normalised to the
    /// `scheme://host[:port]` form browsers send; unparsable entries are
    /// dropped.
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            origins
                .into_iter()
                .filter_map(|origin| Url::parse(origin.as_ref().trim()).ok())
                .map(|url| url.origin().ascii_serialization())
                .collect(),
        )
    }

    /// True when no origins are configured, which admits every origin.
    pub fn allows_any(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether a parsed `Origin` header is on the list.
    pub fn allows(&self, origin: &Url) -> bool {
        self.allows_any() || self.0.contains(&origin.origin().ascii_serialization())
    }
}

/// Dependency bundle for the gateway handler and sessions.
#[derive(Clone)]
pub struct WsState {
    /// Shared order room registry.
    pub rooms: Arc<OrderRooms>,
    /// Origins allowed to open a session.
    pub allowed_origins: OriginAllowList,
}

impl WsState {
    /// Bundle the room registry with the origin allow-list.
    pub fn new(rooms: Arc<OrderRooms>, allowed_origins: OriginAllowList) -> Self {
        Self {
            rooms,
            allowed_origins,
        }
    }
}
