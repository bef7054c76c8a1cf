use crate::model::PackedGroup;
use serde_json::{Value, json};

/// Serialize the group as `{ group, containers: [{ id, name, size, sprites }], dropped, outcome }`.
/// Suitable for generic tooling and simple consumption.
pub fn to_json_array(group: &PackedGroup) -> Value {
    let containers_val = group
        .containers
        .iter()
        .map(|c| {
            let sprites: Vec<Value> = c
                .placements
                .iter()
                .map(|p| {
                    json!({
                        "key": p.key,
                        "frame": {"x": p.frame.x, "y": p.frame.y, "w": p.frame.w, "h": p.frame.h},
                    })
                })
                .collect();
            json!({
                "id": c.id,
                "name": c.name,
                "size": c.size,
                "sprites": sprites,
            })
        })
        .collect::<Vec<_>>();
    json!({
        "group": group.name,
        "containers": containers_val,
        "dropped": group.dropped,
        "outcome": group.outcome,
    })
}

/// Flatten sprites keyed by name, with their container name and size.
/// Shape: `{ group, frames: { key: { frame, container, containerSize } }, dropped }`.
pub fn to_json_hash(group: &PackedGroup) -> Value {
    let mut frames = serde_json::Map::new();
    for c in &group.containers {
        for p in &c.placements {
            frames.insert(
                p.key.clone(),
                json!({
                    "frame": {"x": p.frame.x, "y": p.frame.y, "w": p.frame.w, "h": p.frame.h},
                    "container": c.name,
                    "containerSize": {"w": c.size, "h": c.size},
                }),
            );
        }
    }
    json!({
        "group": group.name,
        "frames": frames,
        "dropped": group.dropped,
    })
}
