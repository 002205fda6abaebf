//! HTML page shell for view models.

use askama::Template;
use serde_json::Value;

use crate::aggregator::Page;

struct NavLink {
    href: &'static str,
    label: &'static str,
}

const NAV: [NavLink; 3] = [
    NavLink { href: "/", label: "Home" },
    NavLink { href: "/teams", label: "Teams" },
    NavLink { href: "/players", label: "Players" },
];

enum SlotBody {
    Listing(Vec<String>),
    Entity(Vec<(String, String)>),
    Text(String),
    Empty,
}

struct SlotSection {
    name: String,
    body: SlotBody,
}

#[derive(Template)]
#[template(path = "page.html")]
struct PageTemplate<'a> {
    title: &'static str,
    template: &'static str,
    nav: &'a [NavLink],
    error: Option<&'a str>,
    sections: Vec<SlotSection>,
    /// Pre-serialized; `</` is escaped so it cannot close the script tag.
    model_json: String,
}

/// Render `page` as a complete HTML document.
///
/// Every slot is rendered from whatever value it holds, so an empty
/// sentinel simply produces an empty section.
pub fn render_html(page: &Page) -> Result<String, askama::Error> {
    let model_json = serde_json::to_string(&page.model)
        .unwrap_or_else(|_| "{}".to_string())
        .replace("</", "<\\/");

    PageTemplate {
        title: page.template.title(),
        template: page.template.name(),
        nav: &NAV,
        error: page.model.error(),
        sections: page
            .model
            .slots()
            .map(|(name, value)| SlotSection {
                name: name.to_string(),
                body: slot_body(value),
            })
            .collect(),
        model_json,
    }
    .render()
}

fn slot_body(value: &Value) -> SlotBody {
    match value {
        Value::Array(items) => SlotBody::Listing(items.iter().map(label).collect()),
        Value::Object(fields) => SlotBody::Entity(
            fields
                .iter()
                .filter_map(|(key, field)| scalar(field).map(|text| (key.clone(), text)))
                .collect(),
        ),
        Value::String(text) => SlotBody::Text(text.clone()),
        _ => SlotBody::Empty,
    }
}

/// Best display name for a listing entry: teams have `name`, players
/// `firstName`/`lastName`, roster entries wrap a `player`.
fn label(item: &Value) -> String {
    if let Some(player) = item.get("player") {
        let inner = label(player);
        return match item.get("rosterPosition").and_then(Value::as_str) {
            Some(slot) => format!("{} ({})", inner, slot),
            None => inner,
        };
    }

    let first = item.get("firstName").and_then(Value::as_str);
    let last = item.get("lastName").and_then(Value::as_str);
    match (first, last) {
        (Some(first), Some(last)) => return format!("{} {}", first, last),
        (Some(name), None) | (None, Some(name)) => return name.to_string(),
        (None, None) => {}
    }

    item.get("name")
        .and_then(scalar)
        .or_else(|| item.get("id").and_then(scalar))
        .or_else(|| scalar(item))
        .unwrap_or_default()
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{route_spec, RouteId, ViewModel};
    use serde_json::json;

    fn page(route: RouteId, model: ViewModel) -> Page {
        Page {
            route,
            template: route_spec(route).template,
            model,
        }
    }

    #[test]
    fn test_degraded_page_keeps_navigation_and_error() {
        let spec = route_spec(RouteId::TeamDetail);
        let html = render_html(&page(
            RouteId::TeamDetail,
            ViewModel::degraded(spec.slots, spec.failure_message),
        ))
        .unwrap();

        assert!(html.contains("<a href=\"/teams\">Teams</a>"));
        assert!(html.contains("role=\"alert\">Failed to load team details</div>"));
        assert!(html.contains("data-slot=\"roster\""));
    }

    #[test]
    fn test_roster_entries_are_labelled_and_escaped() {
        let spec = route_spec(RouteId::TeamDetail);
        let model = ViewModel::populated(
            spec.slots,
            [
                ("team", json!({"id": 1, "name": "<Bombers>"})),
                (
                    "roster",
                    json!([{"rosterPosition": "QB", "player": {"firstName": "Patrick", "lastName": "Mahomes"}}]),
                ),
            ],
        );
        let html = render_html(&page(RouteId::TeamDetail, model)).unwrap();

        assert!(html.contains("<li>Patrick Mahomes (QB)</li>"));
        assert!(html.contains("&lt;Bombers&gt;"));
        assert!(!html.contains("role=\"alert\""));
    }

    #[test]
    fn test_embedded_model_cannot_close_script() {
        let spec = route_spec(RouteId::Teams);
        let model = ViewModel::populated(spec.slots, [("teams", json!([{"name": "</script>"}]))]);
        let html = render_html(&page(RouteId::Teams, model)).unwrap();

        assert_eq!(html.matches("</script>").count(), 1);
    }

    #[test]
    fn test_players_echoes_become_hidden_inputs() {
        let spec = route_spec(RouteId::Players);
        let model = ViewModel::populated(
            spec.slots,
            [
                ("players", json!([])),
                ("searchName", json!("O\"Neil & co")),
                ("position", json!("")),
                ("teamId", json!("")),
            ],
        );
        let html = render_html(&page(RouteId::Players, model)).unwrap();

        assert!(html.contains("data-template=\"players\""));
        assert!(html.contains("name=\"searchName\""));
        assert!(!html.contains("O\"Neil"));
        assert!(html.contains("&amp; co"));
    }
}
