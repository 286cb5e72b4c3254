use std::collections::{BTreeMap, HashMap};

use indoc::indoc;
use yaml_registry::{Registry, from_str, record};

#[derive(Debug, Default)]
struct Wrapper {
    custom: HashMap<String, i32>,
}
record!(Wrapper { custom });

#[derive(Debug, Default)]
struct NestedWrapper {
    custom: HashMap<String, HashMap<String, i32>>,
}
record!(NestedWrapper { custom });

#[test]
fn flat_map() -> anyhow::Result<()> {
    let yaml = indoc! {"
        ---
        custom:
          key1: 1
          key2: 2
    "};
    let wrapper: Wrapper = from_str(yaml, &Registry::primitives())?;
    assert_eq!(wrapper.custom.len(), 2);
    assert_eq!(wrapper.custom["key1"], 1);
    assert_eq!(wrapper.custom["key2"], 2);
    Ok(())
}

#[test]
fn nested_map() -> anyhow::Result<()> {
    let yaml = indoc! {"
        ---
        custom:
          key1:
            sub1: 1
          key2:
            sub2: 2
            sub23: 23
    "};
    let wrapper: NestedWrapper = from_str(yaml, &Registry::primitives())?;
    assert_eq!(wrapper.custom["key1"]["sub1"], 1);
    assert_eq!(wrapper.custom["key2"]["sub2"], 2);
    assert_eq!(wrapper.custom["key2"]["sub23"], 23);
    Ok(())
}

#[test]
fn map_of_records() -> anyhow::Result<()> {
    #[derive(Debug, Default, PartialEq)]
    struct Service {
        port: u16,
        hosts: Vec<String>,
    }
    record!(Service { port, hosts });

    let yaml = indoc! {"
        web:
          port: 80
          hosts: [a, b]
        db:
          port: 5432
    "};
    let services: BTreeMap<String, Service> = from_str(yaml, &Registry::primitives())?;
    let names: Vec<&str> = services.keys().map(String::as_str).collect();
    assert_eq!(names, ["db", "web"]);
    assert_eq!(services["web"].hosts, ["a", "b"]);
    assert_eq!(services["db"].port, 5432);
    Ok(())
}

#[test]
fn scalar_keys_use_their_canonical_text() -> anyhow::Result<()> {
    let map: BTreeMap<String, String> =
        from_str("1: one\ntrue: yes\n.inf: big\n", &Registry::primitives())?;
    assert_eq!(map["1"], "one");
    assert_eq!(map["true"], "yes");
    assert_eq!(map["Inf"], "big");
    Ok(())
}

#[test]
fn repeated_documents_merge_entries() -> anyhow::Result<()> {
    let map: HashMap<String, i32> = from_str("a: 1\n---\nb: 2\n---\na: 3\n", &Registry::primitives())?;
    assert_eq!(map.len(), 2);
    assert_eq!((map["a"], map["b"]), (3, 2));
    Ok(())
}

#[test]
fn optional_map_is_populated_on_demand() -> anyhow::Result<()> {
    #[derive(Debug, Default)]
    struct Maybe {
        labels: Option<HashMap<String, String>>,
        absent: Option<HashMap<String, String>>,
    }
    record!(Maybe { labels, absent });

    let maybe: Maybe = from_str("labels:\n  team: core\nabsent: null\n", &Registry::primitives())?;
    assert_eq!(maybe.labels.unwrap()["team"], "core");
    assert!(maybe.absent.is_none());
    Ok(())
}

#[test]
fn map_value_errors_name_the_key() {
    let err = from_str::<HashMap<String, i32>>("a: 1\nb:\n  c: 2\n", &Registry::primitives())
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "unsupported type at 3:4: for yaml field named \"c\" into golang type \"i32\""
    );
}
