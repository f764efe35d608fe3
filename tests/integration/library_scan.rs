//! Library scanning and single-file parsing, end to end.

use conhub::connector::{ConnectorId, RawConnectorStore};
use serde_yaml::Value;

use crate::common::LibraryFixture;

#[test]
fn fragments_never_surface_as_top_level_ids() {
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
      description: Reporting unit
      defaultValue: GB
monitors:
  disk:
    discovery:
      sources:
        usage:
          query: '${constants.q}'
",
    );

    let store = RawConnectorStore::load(lib.path());

    // exactly one top-level id: the fragment is only an ancestor
    assert_eq!(store.len(), 1);
    let disk = store.get(&ConnectorId::from("disk")).expect("disk connector loaded");

    // the constant declared in the ancestor was inlined into the child
    assert_eq!(
        disk.tree()["monitors"]["disk"]["discovery"]["sources"]["usage"]["query"],
        Value::from("SELECT 1")
    );
}

#[test]
fn extends_flattening_keeps_ancestor_values_the_child_does_not_override() {
    let lib = LibraryFixture::new();
    lib.file("a.yaml", "foo: 1\nbar: 2\n");
    lib.file("b.yaml", "extends: [a]\nconnector:\n  displayName: B\nbar: 3\n");

    let store = RawConnectorStore::load(lib.path());
    let b = store.get(&ConnectorId::from("b")).unwrap();
    assert_eq!(b.tree()["foo"], Value::from(1));
    assert_eq!(b.tree()["bar"], Value::from(3));
    assert!(b.tree().get("extends").is_none());
}

#[test]
fn a_missing_ancestor_only_loses_that_file() {
    let lib = LibraryFixture::new();
    lib.file("orphan.yaml", "extends: [nonexistent]\nconnector:\n  displayName: Orphan\n");
    lib.file("healthy.yaml", "connector:\n  displayName: Healthy\n");

    let store = RawConnectorStore::load(lib.path());
    assert_eq!(store.len(), 1);
    assert!(store.get(&ConnectorId::from("healthy")).is_some());
    assert!(store.get(&ConnectorId::from("orphan")).is_none());
}

#[test]
fn circular_ancestries_only_lose_the_affected_files() {
    let lib = LibraryFixture::new();
    lib.file("ring-a.yaml", "extends: [ring-b]\nconnector:\n  displayName: A\n");
    lib.file("ring-b.yaml", "extends: [ring-a]\nconnector:\n  displayName: B\n");
    lib.file("standalone.yaml", "connector:\n  displayName: Standalone\n");

    let store = RawConnectorStore::load(lib.path());
    assert_eq!(store.len(), 1);
    assert!(store.get(&ConnectorId::from("standalone")).is_some());
}

#[test]
fn ancestry_across_directories_resolves_via_the_connectors_root() {
    let lib = LibraryFixture::new();
    lib.file("connectors/semconv.yaml", "shared:\n  vendor: acme\n");
    lib.file(
        "connectors/hardware/dell/server.yaml",
        "extends: [semconv]\nconnector:\n  displayName: Dell Server\n",
    );

    let store = RawConnectorStore::load(lib.path());
    let server = store.get(&ConnectorId::from("server")).unwrap();
    assert_eq!(server.tree()["shared"]["vendor"], Value::from("acme"));
}

#[test]
fn embedded_files_load_and_renumber_across_the_ancestry() {
    let lib = LibraryFixture::new();
    lib.file("system/probe.awk", "BEGIN { print \"probe\" }");
    lib.file("system/base.yaml", "pre:\n  boot:\n    type: osCommand\n");
    lib.file(
        "hardware/disk.yaml",
        r"
extends: ['../system/base']
connector:
  displayName: Disk
monitors:
  disk:
    collect:
      sources:
        run:
          script: '${file::probe.awk}'
",
    );

    let store = RawConnectorStore::load(lib.path());
    let disk = store.get(&ConnectorId::from("disk")).unwrap();
    assert_eq!(
        disk.tree()["monitors"]["disk"]["collect"]["sources"]["run"]["script"],
        Value::from("${file::1}")
    );
    assert_eq!(disk.embedded_files()[&1].decode_as_text(), "BEGIN { print \"probe\" }");
    // the pre source inherited from the ancestor got its canonical key
    assert_eq!(disk.tree()["pre"]["boot"]["key"], Value::from("${source::pre.boot}"));
}

#[test]
fn source_references_are_normalized_during_the_scan() {
    let lib = LibraryFixture::new();
    lib.file(
        "net.yaml",
        r"
connector:
  displayName: Net
monitors:
  interface:
    discovery:
      sources:
        raw:
          type: snmpTable
        filtered:
          leftTable: '${source::raw}'
",
    );

    let store = RawConnectorStore::load(lib.path());
    let net = store.get(&ConnectorId::from("net")).unwrap();
    let sources = &net.tree()["monitors"]["interface"]["discovery"]["sources"];
    assert_eq!(
        sources["filtered"]["leftTable"],
        Value::from("${source::monitors.interface.discovery.sources.raw}")
    );
    assert_eq!(
        sources["raw"]["key"],
        Value::from("${source::monitors.interface.discovery.sources.raw}")
    );
}
