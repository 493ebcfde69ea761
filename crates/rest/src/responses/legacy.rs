//! Legacy XML key rewriting for vote breakdowns.
//!
//! Vote breakdowns are keyed by free-text labels such as `"Not Voting"`,
//! which are not valid XML element names. Older clients depend on these
//! keys arriving with spaces replaced by hyphens in XML output only.
//! This applies to the `vote_breakdown` of each entry in a votes result
//! list and nowhere else. Slated for removal with the next API version.

use serde_json::{Map, Value};

/// Collection whose results carry vote breakdowns.
const VOTES_COLLECTION: &str = "votes";

/// Field rewritten inside each vote.
const BREAKDOWN_FIELD: &str = "vote_breakdown";

/// Rewrites breakdown keys in place.
///
/// Looks at a top-level `votes` list, and at the top-level `results` list
/// when `collection` is `votes`.
pub fn dasherize_vote_breakdowns(payload: &mut Value, collection: &str) {
    let Some(root) = payload.as_object_mut() else {
        return;
    };

    let mut lists = vec![VOTES_COLLECTION];
    if collection == VOTES_COLLECTION {
        lists.push("results");
    }

    for key in lists {
        if let Some(Value::Array(votes)) = root.get_mut(key) {
            for vote in votes.iter_mut() {
                if let Some(breakdown) = vote.get_mut(BREAKDOWN_FIELD)
                    && let Value::Object(map) = breakdown
                {
                    *map = dasherize_keys(std::mem::take(map));
                }
            }
        }
    }
}

fn dasherize_keys(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::Object(inner) => Value::Object(dasherize_keys(inner)),
                other => other,
            };
            (key.replace(' ', "-"), value)
        })
        .collect()
}
