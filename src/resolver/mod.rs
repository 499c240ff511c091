//! Link resolution for Delivery API responses.
//!
//! A response carries its primary `items` plus an `includes` side-table of
//! referenced entities. Fields inside those items embed reference markers
//! (`{ "sys": { "type": "Link", "linkType": <kind>, "id": <id> } }`) directly,
//! inside arrays, or inside locale-keyed maps. [`resolve`] rewrites every
//! marker whose target is part of the response into the target object itself.
//!
//! Resolution is a pure function of `(items, includes, options)`: each call
//! builds its own lookup index and caches, and discards them afterwards. The
//! walk is cycle-safe: entities currently being expanded are tracked by
//! `(kind, id)` and a marker back into the active path links to the item as
//! found in the index without descending again.

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};
use tracing::debug;

use crate::types::Link;

/// Policy options for one resolution pass.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Delete markers whose target is not part of the response. When false,
    /// unresolved markers are left exactly as received.
    pub remove_unresolved: bool,
}

/// Composite identity of a resolvable entity: `(kind, id)`.
type EntityKey = (String, String);

/// Resolve all reference markers in a response payload.
///
/// `payload` is the raw `{ items, includes?, ...metadata }` document. The
/// returned payload has `items` replaced by the resolved sequence; every
/// other envelope member (totals, paging, sync tokens, the includes table)
/// passes through untouched. Payloads without an `items` array are returned
/// unchanged: the resolver has no error paths of its own.
pub fn resolve(mut payload: Value, options: &ResolveOptions) -> Value {
    let items = payload.get("items").and_then(Value::as_array).cloned();
    let Some(items) = items else {
        return payload;
    };

    let index = build_index(&items, payload.get("includes"));
    debug!(
        entities = index.len(),
        items = items.len(),
        "resolving response links"
    );

    let mut resolver = Resolver {
        index,
        resolved: HashMap::new(),
        expanding: HashSet::new(),
        remove_unresolved: options.remove_unresolved,
    };

    let resolved_items: Vec<Value> = items
        .into_iter()
        .map(|item| resolver.resolve_item(item))
        .collect();

    payload["items"] = Value::Array(resolved_items);
    payload
}

/// Identity of an addressable item. Markers themselves are not addressable.
fn entity_key(item: &Value) -> Option<EntityKey> {
    let sys = item.get("sys")?;
    let kind = sys.get("type")?.as_str()?;
    if kind == "Link" {
        return None;
    }
    let id = sys.get("id")?.as_str()?;
    Some((kind.to_string(), id.to_string()))
}

/// Build the lookup index over items ∪ includes.
///
/// Includes buckets are keyed by their bucket name (the linkType markers use
/// to address them). Primary `items` are written last: on a duplicate
/// `(kind, id)` the authoritative direct query result wins.
fn build_index(items: &[Value], includes: Option<&Value>) -> HashMap<EntityKey, Value> {
    let mut index = HashMap::new();

    if let Some(buckets) = includes.and_then(Value::as_object) {
        for (kind, bucket) in buckets {
            let Some(members) = bucket.as_array() else {
                continue;
            };
            for item in members {
                let id = item
                    .get("sys")
                    .and_then(|sys| sys.get("id"))
                    .and_then(Value::as_str);
                if let Some(id) = id {
                    index.insert((kind.clone(), id.to_string()), item.clone());
                }
            }
        }
    }

    for item in items {
        if let Some(key) = entity_key(item) {
            index.insert(key, item.clone());
        }
    }

    index
}

/// Runtime-discriminated shape of a field value.
///
/// Markers keep their original wire value so the keep-unresolved policy can
/// return it verbatim.
enum FieldShape {
    Marker(Link, Value),
    Sequence(Vec<Value>),
    Mapping(Map<String, Value>),
    Scalar(Value),
}

fn classify(value: Value) -> FieldShape {
    if let Some(link) = Link::from_value(&value) {
        return FieldShape::Marker(link, value);
    }
    match value {
        Value::Array(members) => FieldShape::Sequence(members),
        Value::Object(map) => FieldShape::Mapping(map),
        other => FieldShape::Scalar(other),
    }
}

/// Per-pass resolution state.
struct Resolver {
    /// `(kind, id)` → entity, items ∪ includes.
    index: HashMap<EntityKey, Value>,
    /// Entities whose fields have been fully walked. Subsequent references
    /// reuse this single instance.
    resolved: HashMap<EntityKey, Value>,
    /// Keys on the active expansion path; markers back into this set break
    /// the cycle instead of descending.
    expanding: HashSet<EntityKey>,
    remove_unresolved: bool,
}

impl Resolver {
    /// Resolve one top-level item. Addressable items go through the shared
    /// entity cache so duplicates across items and includes end up as the
    /// same resolved instance; anything else has its fields walked in place.
    fn resolve_item(&mut self, item: Value) -> Value {
        match entity_key(&item) {
            Some(key) if self.index.contains_key(&key) => self.resolve_entity(&key),
            _ => self.walk_fields(item),
        }
    }

    /// Expand an entity from the index, walking its fields exactly once.
    fn resolve_entity(&mut self, key: &EntityKey) -> Value {
        if let Some(done) = self.resolved.get(key) {
            return done.clone();
        }
        let Some(item) = self.index.get(key).cloned() else {
            // Callers check the index first; an absent key resolves to null
            // rather than panicking.
            return Value::Null;
        };

        self.expanding.insert(key.clone());
        let walked = self.walk_fields(item);
        self.expanding.remove(key);

        self.resolved.insert(key.clone(), walked.clone());
        walked
    }

    /// Walk an item's `fields` map, applying the removal policy per field.
    fn walk_fields(&mut self, mut item: Value) -> Value {
        if let Some(fields) = item.get_mut("fields").and_then(Value::as_object_mut) {
            let names: Vec<String> = fields.keys().cloned().collect();
            for name in names {
                let Some(value) = fields.remove(&name) else {
                    continue;
                };
                if let Some(resolved) = self.resolve_value(value) {
                    fields.insert(name, resolved);
                }
            }
        }
        item
    }

    /// Resolve a single field value, dispatching on its runtime shape.
    /// Returns `None` when the value is an unresolved marker under the
    /// removal policy; containers drop the corresponding slot or key.
    fn resolve_value(&mut self, value: Value) -> Option<Value> {
        match classify(value) {
            FieldShape::Marker(link, original) => self.resolve_marker(&link, original),
            FieldShape::Sequence(members) => {
                let resolved: Vec<Value> = members
                    .into_iter()
                    .filter_map(|member| self.resolve_value(member))
                    .collect();
                Some(Value::Array(resolved))
            }
            FieldShape::Mapping(map) => {
                // Locale-keyed maps and structured values alike: walk each
                // member under the same rule.
                let mut walked = Map::with_capacity(map.len());
                for (locale_or_key, member) in map {
                    if let Some(resolved) = self.resolve_value(member) {
                        walked.insert(locale_or_key, resolved);
                    }
                }
                Some(Value::Object(walked))
            }
            FieldShape::Scalar(scalar) => Some(scalar),
        }
    }

    /// Resolve one marker by `(kind, id)`. Matching is purely by the pair;
    /// the declared linkType is never validated against the target's shape.
    fn resolve_marker(&mut self, link: &Link, original: Value) -> Option<Value> {
        let key = (link.link_type.clone(), link.id.clone());

        if self.expanding.contains(&key) {
            // Back-reference into the active path: link to the item as found
            // in the index, without re-descending into its fields.
            return self.index.get(&key).cloned();
        }
        if self.index.contains_key(&key) {
            return Some(self.resolve_entity(&key));
        }
        if self.remove_unresolved {
            None
        } else {
            Some(original)
        }
    }
}
