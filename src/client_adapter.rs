use serde_json::{json, Value};
use crate::quiz_engine::models::{AnswerChoice, ClubEntry, PlayerCard, ProgressSummary, RoundView};

/// Club selector entries.
fn clubs_json(clubs: &[ClubEntry]) -> Value {
    Value::Array(
        clubs
            .iter()
            .map(|c| json!({ "name": c.name, "badge": c.badge_url, "selected": c.selected }))
            .collect(),
    )
}

/// Info row under the photo. The second flag is only present when the
/// roster carried one.
fn player_json(p: &PlayerCard) -> Value {
    let flags: Vec<Value> = p
        .nationalities
        .iter()
        .map(|n| json!({ "title": n.name, "src": n.flag_url }))
        .collect();
    json!({
        "image": p.image_url,
        "club": { "title": p.club, "src": p.badge_url },
        "flags": flags,
        "position": p.position,
        "jersey": format!("#{}", p.jersey_number)
    })
}

/// Answer buttons. `class` is the CSS class for the option's mark.
fn options_json(options: &[AnswerChoice]) -> Value {
    Value::Array(
        options
            .iter()
            .map(|o| json!({ "id": o.id, "label": o.name, "class": o.mark.to_string() }))
            .collect(),
    )
}

/// Map an engine snapshot to the JSON document consumed by the web client.
pub fn to_client_state(view: &RoundView, summary: &ProgressSummary, clubs: &[ClubEntry]) -> Value {
    let body = match view {
        RoundView::Question { target, options } => json!({
            "kind": "question",
            "player": player_json(target),
            "options": options_json(options)
        }),
        RoundView::Finished { clubs } => json!({
            "kind": "completion",
            "clubs": clubs,
            "actions": ["restart", "change_teams"]
        }),
    };

    json!({
        "clubs": clubs_json(clubs),
        "all_selected": clubs.iter().all(|c| c.selected),
        "progress": {
            "learned": summary.learned,
            "total": summary.total,
            "label": summary.to_string()
        },
        "body": body
    })
}
