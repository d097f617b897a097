use serde_json::json;

use stardrift_data::galaxy::system::StarSystem;
use stardrift_data::syslog::TurnEvent;
use stardrift_data::universe::Universe;

fn system_report(system: &StarSystem) -> serde_json::Value {
    let star: &'static str = system.star.kind.into();
    let objects: Vec<serde_json::Value> = system
        .objects()
        .iter()
        .map(|obj| {
            json!({
                "name": obj.name,
                "class": obj.body.class(),
                "colony": obj.colony.map(|c| c.to_string()),
            })
        })
        .collect();
    json!({
        "id": system.id.to_string(),
        "name": system.name,
        "row": system.pos.row,
        "col": system.pos.col,
        "star": star,
        "objects": objects,
        "ships": system.ships().map(|s| s.report()).collect::<Vec<_>>(),
    })
}

pub fn report(universe: &Universe, events: &[(u32, TurnEvent)]) -> serde_json::Value {
    let transit: Vec<serde_json::Value> = universe
        .deep_space()
        .fleets()
        .map(|t| {
            json!({
                "fleet": t.fleet.id.to_string(),
                "civ": t.fleet.civ.to_string(),
                "origin": t.origin.to_string(),
                "destination": t.destination.to_string(),
                "distance_left": t.distance,
                "ships": t.fleet.len(),
            })
        })
        .collect();
    let events: Vec<serde_json::Value> = events
        .iter()
        .map(|(turn, evt)| {
            json!({
                "turn": turn,
                "kind": evt.kind(),
                "civ": evt.civ().to_string(),
                "data": evt,
            })
        })
        .collect();

    json!({
        "turn": universe.turn(),
        "civs": universe.civs().map(|c| c.report()).collect::<Vec<_>>(),
        "systems": universe.systems().map(system_report).collect::<Vec<_>>(),
        "deep_space": transit,
        "events": events,
    })
}

#[test]
fn test_report_layout() {
    use stardrift_data::config::EngineConfig;

    let mut universe = crate::scenario::create_universe(EngineConfig::default()).unwrap();
    let events: Vec<(u32, TurnEvent)> = universe.update().into_iter().map(|e| (1, e)).collect();
    let report = report(&universe, &events);
    assert_eq!(report["turn"], 1);
    assert_eq!(report["civs"].as_array().map(|c| c.len()), Some(2));
    assert_eq!(report["systems"].as_array().map(|s| s.len()), Some(9));
    assert_eq!(report["systems"][0]["star"], "Yellow");
    assert_eq!(report["civs"][0]["money"], 5000.0 + 1.2);
}
