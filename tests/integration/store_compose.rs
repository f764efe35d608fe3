//! Two-phase store composition, end to end over on-disk libraries.

use std::collections::BTreeMap;
use std::sync::Arc;

use conhub::config::InstanceOverride;
use conhub::connector::{ConnectorId, RawConnectorStore};
use conhub::parser::StoreComposer;
use serde_yaml::Value;

use crate::common::LibraryFixture;

const DISK_TEMPLATE: &str = r"
connector:
  displayName: Disk Usage
  variables:
    unit:
      description: Block size unit
      defaultValue: '5'
monitors:
  disk:
    collect:
      sources:
        usage:
          commandLine: 'df -B${var::unit}'
";

fn overrides(
    entries: Vec<(&str, InstanceOverride)>,
) -> BTreeMap<ConnectorId, InstanceOverride> {
    entries.into_iter().map(|(id, o)| (ConnectorId::from(id), o)).collect()
}

fn string_vars(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[test]
fn end_to_end_eager_store_contains_the_unreferenced_variable_template() {
    // `disk` declares a variable but never references it, so nothing needs
    // substituting and it resolves in the eager pass.
    let lib = LibraryFixture::new();
    lib.file("base.yaml", "constants:\n  q: SELECT 1\n");
    lib.file(
        "disk.yaml",
        r"
extends: [base]
connector:
  displayName: Disk
  variables:
    unit:
      defaultValue: GB
monitors:
  disk:
    collect:
      sources:
        usage:
          query: '${constants.q}'
",
    );

    let raw_store = Arc::new(RawConnectorStore::load(lib.path()));
    let composer = StoreComposer::new(Arc::clone(&raw_store));
    let store = composer.build_eager_store();

    assert!(store.pending_variable_ids().is_empty());
    let disk = store.get(&ConnectorId::from("disk")).expect("disk resolved eagerly");
    assert_eq!(
        disk.monitors["disk"]["collect"]["sources"]["usage"]["query"],
        Value::from("SELECT 1")
    );
    assert_eq!(disk.compiled_filename, "disk");
}

#[test]
fn variable_bearing_templates_are_excluded_from_the_eager_store() {
    let lib = LibraryFixture::new();
    lib.file("disk.yaml", DISK_TEMPLATE);
    lib.file("plain.yaml", "connector:\n  displayName: Plain\n");

    let composer = StoreComposer::new(Arc::new(RawConnectorStore::load(lib.path())));
    let store = composer.build_eager_store();

    assert!(store.get(&ConnectorId::from("plain")).is_some());
    assert!(store.get(&ConnectorId::from("disk")).is_none());
    assert!(store.pending_variable_ids().contains(&ConnectorId::from("disk")));
}

#[test]
fn defaults_win_absent_an_override() {
    let lib = LibraryFixture::new();
    lib.file("disk.yaml", DISK_TEMPLATE);

    let composer = StoreComposer::new(Arc::new(RawConnectorStore::load(lib.path())));
    let store = composer.build_eager_store();
    let result = composer.resolve_deferred(&store, &BTreeMap::new());

    let disk = &result.custom_connectors()[&ConnectorId::from("disk")];
    assert_eq!(
        disk.monitors["disk"]["collect"]["sources"]["usage"]["commandLine"],
        Value::from("df -B5")
    );
}

#[test]
fn an_override_creates_a_sibling_without_displacing_the_default() {
    let lib = LibraryFixture::new();
    lib.file("disk.yaml", DISK_TEMPLATE);

    let composer = StoreComposer::new(Arc::new(RawConnectorStore::load(lib.path())));
    let store = composer.build_eager_store();
    let result = composer.resolve_deferred(
        &store,
        &overrides(vec![(
            "disk-custom",
            InstanceOverride {
                uses: Some("disk".into()),
                variables: string_vars(&[("unit", "9")]),
                force: false,
            },
        )]),
    );

    let custom = &result.custom_connectors()[&ConnectorId::from("disk-custom")];
    assert_eq!(
        custom.monitors["disk"]["collect"]["sources"]["usage"]["commandLine"],
        Value::from("df -B9")
    );
    let default = &result.custom_connectors()[&ConnectorId::from("disk")];
    assert_eq!(
        default.monitors["disk"]["collect"]["sources"]["usage"]["commandLine"],
        Value::from("df -B5")
    );
}

#[test]
fn instance_embedded_files_diverge_while_the_raw_blob_stays_intact() {
    let lib = LibraryFixture::new();
    lib.file("report.sh", "df -B${var::unit} | tail -n +2");
    lib.file(
        "disk.yaml",
        r"
connector:
  displayName: Disk
  variables:
    unit:
      defaultValue: GB
monitors:
  disk:
    collect:
      sources:
        usage:
          script: '${file::report.sh}'
",
    );

    let raw_store = Arc::new(RawConnectorStore::load(lib.path()));
    let composer = StoreComposer::new(Arc::clone(&raw_store));
    let store = composer.build_eager_store();
    let result = composer.resolve_deferred(
        &store,
        &overrides(vec![
            (
                "disk-mb",
                InstanceOverride {
                    uses: Some("disk".into()),
                    variables: string_vars(&[("unit", "MB")]),
                    force: false,
                },
            ),
            (
                "disk-kb",
                InstanceOverride {
                    uses: Some("disk".into()),
                    variables: string_vars(&[("unit", "KB")]),
                    force: false,
                },
            ),
        ]),
    );

    let text = |id: &str| {
        result.custom_connectors()[&ConnectorId::from(id)].embedded_files[&1]
            .decode_as_text()
            .into_owned()
    };
    assert_eq!(text("disk"), "df -BGB | tail -n +2");
    assert_eq!(text("disk-mb"), "df -BMB | tail -n +2");
    assert_eq!(text("disk-kb"), "df -BKB | tail -n +2");

    // the raw snapshot is untouched by all three substitutions
    assert_eq!(
        raw_store.get(&ConnectorId::from("disk")).unwrap().embedded_files()[&1].decode_as_text(),
        "df -B${var::unit} | tail -n +2"
    );
}

#[test]
fn uses_matching_is_case_insensitive_and_force_is_recorded() {
    let lib = LibraryFixture::new();
    lib.file("disk.yaml", DISK_TEMPLATE);

    let composer = StoreComposer::new(Arc::new(RawConnectorStore::load(lib.path())));
    let store = composer.build_eager_store();
    let result = composer.resolve_deferred(
        &store,
        &overrides(vec![(
            "Disk-Forced",
            InstanceOverride {
                uses: Some("DISK".into()),
                variables: BTreeMap::new(),
                force: true,
            },
        )]),
    );

    assert!(result.custom_connectors().contains_key(&ConnectorId::from("disk-forced")));
    assert_eq!(
        result.resource_connector_refs().iter().collect::<Vec<_>>(),
        vec!["+Disk-Forced"]
    );
}

#[test]
fn repeated_resolution_is_byte_identical() {
    let lib = LibraryFixture::new();
    lib.file("report.sh", "du ${var::path}");
    lib.file(
        "disk.yaml",
        r"
connector:
  displayName: Disk
  variables:
    path:
      defaultValue: /
monitors:
  disk:
    collect:
      sources:
        usage:
          script: '${file::report.sh}'
          commandLine: 'du ${var::path}'
",
    );

    let composer = StoreComposer::new(Arc::new(RawConnectorStore::load(lib.path())));
    let store = composer.build_eager_store();
    let config = overrides(vec![(
        "disk-data",
        InstanceOverride {
            uses: Some("disk".into()),
            variables: string_vars(&[("path", "/data")]),
            force: true,
        },
    )]);

    let first = composer.resolve_deferred(&store, &config);
    let second = composer.resolve_deferred(&store, &config);
    assert_eq!(first, second);
}

#[test]
fn merged_results_keep_per_resource_instances_apart() {
    let lib = LibraryFixture::new();
    lib.file("disk.yaml", DISK_TEMPLATE);

    let composer = StoreComposer::new(Arc::new(RawConnectorStore::load(lib.path())));
    let store = composer.build_eager_store();

    let mut accumulated = composer.resolve_deferred(
        &store,
        &overrides(vec![(
            "disk-host-a",
            InstanceOverride {
                uses: Some("disk".into()),
                variables: string_vars(&[("unit", "1")]),
                force: false,
            },
        )]),
    );
    accumulated.merge(composer.resolve_deferred(
        &store,
        &overrides(vec![(
            "disk-host-b",
            InstanceOverride {
                uses: Some("disk".into()),
                variables: string_vars(&[("unit", "2")]),
                force: false,
            },
        )]),
    ));

    // two custom instances plus the shared default
    assert_eq!(accumulated.custom_connectors().len(), 3);
    let command = |id: &str| {
        accumulated.custom_connectors()[&ConnectorId::from(id)].monitors["disk"]["collect"]
            ["sources"]["usage"]["commandLine"]
            .clone()
    };
    assert_eq!(command("disk-host-a"), Value::from("df -B1"));
    assert_eq!(command("disk-host-b"), Value::from("df -B2"));
}
