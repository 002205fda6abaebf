//! Static route declarations and upstream call planning.
//!
//! # Design Decisions
//! - Each route declares its template, slots and failure message once
//! - Planning is pure: `ViewRequest` → calls, no I/O
//! - Players listing issues exactly one call, chosen by precedence:
//!   name search > position filter > team availability > active players

use thiserror::Error;

use crate::aggregator::request::{RouteId, ViewRequest};
use crate::aggregator::view_model::{SlotDecl, SlotKind};
use crate::render::Template;
use crate::upstream::call::is_dot_segment;
use crate::upstream::UpstreamCallSpec;

/// Query parameter names of the players listing.
pub const PARAM_SEARCH: &str = "search";
pub const PARAM_POSITION: &str = "position";
pub const PARAM_TEAM_ID: &str = "teamId";
/// Path parameter naming a team or player.
pub const PARAM_ID: &str = "id";

/// Everything the aggregator needs to know about one page route.
#[derive(Debug)]
pub struct RouteSpec {
    pub route: RouteId,
    pub template: Template,
    pub slots: &'static [SlotDecl],
    /// Shown to the user when any upstream call for this route fails.
    pub failure_message: &'static str,
}

impl RouteSpec {
    pub fn slot_kind(&self, name: &str) -> Option<SlotKind> {
        self.slots.iter().find(|d| d.name == name).map(|d| d.kind)
    }
}

static HOME: RouteSpec = RouteSpec {
    route: RouteId::Home,
    template: Template::Index,
    slots: &[],
    failure_message: "Failed to load page",
};

static TEAMS: RouteSpec = RouteSpec {
    route: RouteId::Teams,
    template: Template::Teams,
    slots: &[SlotDecl::listing("teams")],
    failure_message: "Failed to load teams",
};

static TEAM_DETAIL: RouteSpec = RouteSpec {
    route: RouteId::TeamDetail,
    template: Template::TeamDetail,
    slots: &[SlotDecl::entity("team"), SlotDecl::listing("roster")],
    failure_message: "Failed to load team details",
};

static TEAM_LINEUP: RouteSpec = RouteSpec {
    route: RouteId::TeamLineup,
    template: Template::TeamLineup,
    slots: &[
        SlotDecl::entity("team"),
        SlotDecl::listing("starters"),
        SlotDecl::listing("bench"),
    ],
    failure_message: "Failed to load team lineup",
};

static PLAYERS: RouteSpec = RouteSpec {
    route: RouteId::Players,
    template: Template::Players,
    slots: &[
        SlotDecl::listing("players"),
        SlotDecl::text("searchName"),
        SlotDecl::text("position"),
        SlotDecl::text("teamId"),
    ],
    failure_message: "Failed to load players",
};

static PLAYER_DETAIL: RouteSpec = RouteSpec {
    route: RouteId::PlayerDetail,
    template: Template::PlayerDetail,
    slots: &[SlotDecl::entity("player")],
    failure_message: "Failed to load player",
};

/// Look up the declaration for `route`.
pub fn route_spec(route: RouteId) -> &'static RouteSpec {
    match route {
        RouteId::Home => &HOME,
        RouteId::Teams => &TEAMS,
        RouteId::TeamDetail => &TEAM_DETAIL,
        RouteId::TeamLineup => &TEAM_LINEUP,
        RouteId::Players => &PLAYERS,
        RouteId::PlayerDetail => &PLAYER_DETAIL,
    }
}

/// One upstream call and the slot its payload fills.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedCall {
    pub slot: &'static str,
    pub call: UpstreamCallSpec,
}

impl PlannedCall {
    fn new(slot: &'static str, call: UpstreamCallSpec) -> Self {
        Self { slot, call }
    }
}

/// The upstream work for one request, plus text slots filled locally.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewPlan {
    pub calls: Vec<PlannedCall>,
    pub echoes: Vec<(&'static str, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("missing route parameter '{0}'")]
    MissingParam(&'static str),
    #[error("route parameter '{0}' is not a valid path segment")]
    InvalidParam(&'static str),
}

/// Resolve the upstream calls for `request`.
pub fn plan(request: &ViewRequest) -> Result<ViewPlan, PlanError> {
    let plan = match request.route {
        RouteId::Home => ViewPlan::default(),
        RouteId::Teams => ViewPlan {
            calls: vec![PlannedCall::new("teams", UpstreamCallSpec::get(["teams"]))],
            echoes: Vec::new(),
        },
        RouteId::TeamDetail => {
            let id = required(request, PARAM_ID)?;
            ViewPlan {
                calls: vec![
                    PlannedCall::new("team", UpstreamCallSpec::get(["teams", id])),
                    PlannedCall::new("roster", UpstreamCallSpec::get(["teams", id, "roster"])),
                ],
                echoes: Vec::new(),
            }
        }
        RouteId::TeamLineup => {
            let id = required(request, PARAM_ID)?;
            ViewPlan {
                calls: vec![
                    PlannedCall::new("team", UpstreamCallSpec::get(["teams", id])),
                    PlannedCall::new("starters", UpstreamCallSpec::get(["teams", id, "starters"])),
                    PlannedCall::new("bench", UpstreamCallSpec::get(["teams", id, "bench"])),
                ],
                echoes: Vec::new(),
            }
        }
        RouteId::Players => plan_players(request),
        RouteId::PlayerDetail => {
            let id = required(request, PARAM_ID)?;
            ViewPlan {
                calls: vec![PlannedCall::new(
                    "player",
                    UpstreamCallSpec::get(["players", id, "with-stats"]),
                )],
                echoes: Vec::new(),
            }
        }
    };

    Ok(plan)
}

fn plan_players(request: &ViewRequest) -> ViewPlan {
    let search = request.param(PARAM_SEARCH);
    let position = request.param(PARAM_POSITION);
    let team_id = request.param(PARAM_TEAM_ID);

    let call = if let Some(name) = search {
        UpstreamCallSpec::get(["players", "search"]).with_query("name", name)
    } else if let Some(position) = position {
        UpstreamCallSpec::get(["players", "position", position])
    } else if let Some(team_id) = team_id {
        UpstreamCallSpec::get(["players", "available", team_id])
    } else {
        UpstreamCallSpec::get(["players", "active"])
    };

    ViewPlan {
        calls: vec![PlannedCall::new("players", call)],
        echoes: vec![
            ("searchName", search.unwrap_or_default().to_string()),
            ("position", position.unwrap_or_default().to_string()),
            ("teamId", team_id.unwrap_or_default().to_string()),
        ],
    }
}

fn required<'a>(request: &'a ViewRequest, name: &'static str) -> Result<&'a str, PlanError> {
    let value = request.param(name).ok_or(PlanError::MissingParam(name))?;
    if is_dot_segment(value) {
        return Err(PlanError::InvalidParam(name));
    }
    Ok(value)
}
