//! Property tests over generated configuration trees.

use proptest::prelude::*;
use serde_json::{json, Map, Value};

use extconf_types::tree::{deep_merge, get_path};
use extconf_types::{Attribution, ConfigLayer};

use crate::engine::merge_extension;
use crate::index::PathIndex;

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::from),
        "[a-z]{0,6}".prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
    ]
}

fn subtree() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(3, 24, 4, |inner| {
        prop::collection::btree_map("[a-d]", inner, 1..4)
            .prop_map(|children| Value::Object(children.into_iter().collect()))
    })
}

fn settings() -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-d]", subtree(), 1..4).prop_map(|children| {
        let settings: Map<String, Value> = children.into_iter().collect();
        json!({ "settings": settings })
    })
}

/// Meta tree describing every node of `config`.
fn describe(config: &Value) -> Value {
    match config {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), describe(value)))
                .collect(),
        ),
        _ => json!({ "description": "generated" }),
    }
}

/// `describe(config)` plus a meta-only group the configuration never sets.
fn document(config: &Value, extra: &str) -> Value {
    let mut meta = describe(config);
    meta["settings"][extra] = json!({ "note": { "description": "meta only" } });
    meta
}

/// Same shape as `config`, different leaf values.
fn perturb(config: &Value) -> Value {
    match config {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), perturb(value)))
                .collect(),
        ),
        _ => json!("changed"),
    }
}

fn fold(state: &mut ConfigLayer, name: &str, extension: &ConfigLayer) -> bool {
    match merge_extension(name, extension, state) {
        Ok(meta) => {
            deep_merge(&mut state.config, &extension.config);
            state.meta = meta;
            true
        }
        Err(_) => false,
    }
}

proptest! {
    #[test]
    fn remerging_same_extension_never_conflicts(config in settings()) {
        let extension = ConfigLayer::new(config.clone(), describe(&config));
        let mut state = ConfigLayer::empty();
        prop_assert!(fold(&mut state, "a", &extension));
        let first = state.meta.clone();
        prop_assert!(fold(&mut state, "a", &extension));
        prop_assert_eq!(state.meta, first);
    }

    #[test]
    fn every_declared_path_is_attributed(config in settings(), extra in "[e-h]") {
        let meta = document(&config, &extra);
        let extension = ConfigLayer::new(config.clone(), meta.clone());
        let mut state = ConfigLayer::empty();
        prop_assert!(fold(&mut state, "a", &extension));

        let config_paths = PathIndex::extract(&config, true);
        let meta_paths = PathIndex::extract(&meta, false);
        let note_path = format!("settings.{extra}.note").parse().unwrap();
        prop_assert!(meta_paths.contains(&note_path));
        for path in config_paths.paths().chain(meta_paths.paths()) {
            let attribution = Attribution::from_node(get_path(&state.meta, path));
            prop_assert_eq!(attribution.names(), vec!["a"], "{} unattributed", path);
        }
    }

    #[test]
    fn same_shape_contributions_only_grow_attribution(config in settings()) {
        let mut state = ConfigLayer::empty();
        prop_assert!(fold(&mut state, "a", &ConfigLayer::config_only(config.clone())));
        let before = state.clone();

        prop_assert!(fold(&mut state, "b", &ConfigLayer::config_only(perturb(&config))));
        for path in PathIndex::extract(&before.meta, false).paths() {
            let old = Attribution::from_node(get_path(&before.meta, path));
            let new = Attribution::from_node(get_path(&state.meta, path));
            prop_assert!(old.is_subset(&new), "{} lost contributors", path);
        }
    }

    #[test]
    fn config_after_meta_only_contribution_keeps_history(config in settings()) {
        let mut state = ConfigLayer::empty();
        let folded = fold(&mut state, "docs", &ConfigLayer::new(json!({}), describe(&config)));
        prop_assert!(folded);
        let before = state.clone();

        prop_assert!(fold(&mut state, "b", &ConfigLayer::config_only(config.clone())));
        for path in PathIndex::extract(&before.meta, false).paths() {
            let old = Attribution::from_node(get_path(&before.meta, path));
            let new = Attribution::from_node(get_path(&state.meta, path));
            prop_assert!(old.is_subset(&new), "{} lost contributors", path);
        }
    }

    #[test]
    fn override_true_resets_attribution_on_flip(group in "[a-d]", child in "[a-d]", value in leaf()) {
        let mut state = ConfigLayer::empty();
        let owned = json!({ "settings": { group.clone(): { child: 1 } } });
        prop_assert!(fold(&mut state, "a", &ConfigLayer::config_only(owned)));

        let takeover = ConfigLayer::new(
            json!({ "settings": { group.clone(): value } }),
            json!({ "settings": { group.clone(): { "__meta": { "override": true } } } }),
        );
        prop_assert!(fold(&mut state, "b", &takeover));
        let path = format!("settings.{group}").parse().unwrap();
        let attribution = Attribution::from_node(get_path(&state.meta, &path));
        prop_assert_eq!(attribution.names(), vec!["b"]);
    }

    #[test]
    fn override_naming_stranger_never_authorizes(group in "[a-d]", stranger in "[c-h]{1,4}") {
        let mut state = ConfigLayer::empty();
        let owned = json!({ "settings": { group.clone(): { "x": 1 } } });
        prop_assert!(fold(&mut state, "a", &ConfigLayer::config_only(owned)));

        let takeover = ConfigLayer::new(
            json!({ "settings": { group.clone(): "flat" } }),
            json!({ "settings": { group.clone(): { "__meta": { "override": stranger } } } }),
        );
        prop_assert!(merge_extension("b", &takeover, &state).is_err());
    }
}
