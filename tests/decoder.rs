use indoc::indoc;
use std::rc::Rc;
use yaml_registry::{Decoder, Destination, Error, Registry, from_str, record};

#[derive(Debug, Default, PartialEq)]
struct Nested {
    path: String,
}
record!(Nested { path as "Path" });

#[derive(Debug, Default, PartialEq)]
struct Pet {
    name: String,
    age: i64,
    fluff_factor: f32,
    fav_nums: Vec<i64>,
    do_true: bool,
    config: Nested,
    nullable: Option<String>,
}
record!(Pet {
    name as "Name",
    age as "Age",
    fluff_factor as "FluffFactor",
    fav_nums as "FavNums",
    do_true as "DoTrue",
    config as "Config",
    nullable as "Nullable",
});

fn decode_pet(input: &str, registry: &Registry) -> Result<Pet, Error> {
    let mut pet = Pet::default();
    Decoder::new(input.as_bytes(), registry).decode(&mut pet)?;
    Ok(pet)
}

#[test]
fn full_record() -> anyhow::Result<()> {
    let yaml = indoc! {r#"
        ---
        name: "puppy"
        Age: 30
        FluffFactor: 3.14159
        # Comment
        FavNums:
         - 2
         - 13
         - 27
        DoTrue: true
        Config:
         Path: "/thing"
        Nullable: null
    "#};
    let pet = decode_pet(yaml, &Registry::primitives())?;
    assert_eq!(
        pet,
        Pet {
            name: "puppy".into(),
            age: 30,
            fluff_factor: 3.14159,
            fav_nums: vec![2, 13, 27],
            do_true: true,
            config: Nested {
                path: "/thing".into()
            },
            nullable: None,
        }
    );
    Ok(())
}

#[test]
fn unknown_field_is_reported_at_its_key() {
    let err = decode_pet("---\nmissing: \"puppy\"\n", &Registry::primitives()).unwrap_err();
    assert_eq!(
        err.to_string(),
        format!(
            "unsupported type at 2:8: for yaml field named \"missing\" into golang type \"{}\"",
            std::any::type_name::<Pet>()
        )
    );
}

#[test]
fn folded_block_is_unwrapped() -> anyhow::Result<()> {
    let pet = decode_pet("---\nName: >\n  Literal Value\n", &Registry::primitives())?;
    assert_eq!(pet.name, "Literal Value");
    Ok(())
}

#[test]
fn block_scalar_binds_like_plain_scalar() -> anyhow::Result<()> {
    let registry = Registry::primitives();
    for block in ["Name: >\n  x\n", "Name: |\n  x\n", "Name: >-\n  x\n"] {
        assert_eq!(decode_pet(block, &registry)?, decode_pet("Name: x", &registry)?, "{block}");
    }
    Ok(())
}

#[test]
fn literal_block_keeps_inner_line_breaks() -> anyhow::Result<()> {
    let pet = decode_pet("Name: |\n  first\n  second\n", &Registry::primitives())?;
    assert_eq!(pet.name, "first\nsecond");
    let kept = decode_pet("Name: |+\n  first\n  second\n", &Registry::primitives())?;
    assert_eq!(kept.name, "first\nsecond\n");
    Ok(())
}

#[test]
fn empty_mapping_leaves_defaults() -> anyhow::Result<()> {
    let pet = decode_pet("---\n{}\n", &Registry::primitives())?;
    assert_eq!(pet, Pet::default());
    Ok(())
}

#[test]
fn trailing_comment_is_not_part_of_the_value() -> anyhow::Result<()> {
    let pet = decode_pet("---\nName: a name # comment\n", &Registry::primitives())?;
    assert_eq!(pet.name, "a name");
    Ok(())
}

#[test]
fn empty_registry_reports_the_scalar() {
    let err = decode_pet("---\nName: name\n", &Registry::new()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "unsupported type at 2:7: into golang type \"alloc::string::String\""
    );
    assert!(matches!(err, Error::UnsupportedType { field: None, .. }));
}

#[test]
fn nan_and_infinity() -> anyhow::Result<()> {
    #[derive(Debug, Default)]
    struct Special {
        nan: f64,
        inf: f64,
        neg: f64,
    }
    record!(Special { nan as "Nan", inf as "Inf", neg as "Neg" });

    let special: Special = from_str(
        "---\nNan: .nan\nInf: .inf\nNeg: -.inf\n",
        &Registry::primitives(),
    )?;
    assert!(special.nan.is_nan());
    assert_eq!(special.inf, f64::INFINITY);
    assert_eq!(special.neg, f64::NEG_INFINITY);
    Ok(())
}

#[test]
fn optional_field() -> anyhow::Result<()> {
    #[derive(Debug, Default, PartialEq)]
    struct Opt {
        name: Option<String>,
    }
    record!(Opt { name as "Name" });

    let registry = Registry::primitives();
    let set: Opt = from_str("---\nName: \"puppy\"\n", &registry)?;
    assert_eq!(set.name.as_deref(), Some("puppy"));

    let unset: Opt = from_str("---\n", &registry)?;
    assert_eq!(unset, Opt::default());

    let null: Opt = from_str("Name: ~\n", &registry)?;
    assert_eq!(null.name, None);
    Ok(())
}

#[test]
fn converter_for_a_record_type_takes_scalars() -> anyhow::Result<()> {
    #[derive(Debug, Default, PartialEq)]
    struct SemVer {
        major: String,
        minor: String,
        patch: String,
    }
    record!(SemVer { major, minor, patch });

    let mut registry = Registry::primitives();
    registry.register(|version: &mut SemVer, text: &str| {
        let parts: Vec<&str> = text.split('.').collect();
        let [major, minor, patch] = parts.as_slice() else {
            return Err(format!("not a version: {text}").into());
        };
        *version = SemVer {
            major: major.to_string(),
            minor: minor.to_string(),
            patch: patch.to_string(),
        };
        Ok(())
    });

    let version: SemVer = from_str("1.2.3", &registry)?;
    assert_eq!(
        version,
        SemVer {
            major: "1".into(),
            minor: "2".into(),
            patch: "3".into()
        }
    );

    // The same type still binds structurally from a mapping.
    let version: SemVer = from_str("major: 4\nminor: 0\npatch: 1\n", &registry)?;
    assert_eq!(version.major, "4");

    let err = from_str::<SemVer>("1.2", &registry).unwrap_err();
    assert_eq!(err.to_string(), "not a version: 1.2");
    Ok(())
}

#[test]
fn conversion_failure_keeps_converter_message() {
    let err = decode_pet("Age: thirty\n", &Registry::primitives()).unwrap_err();
    assert_eq!(err.to_string(), "invalid i64: `thirty`");
    let location = err.location().unwrap();
    assert_eq!((location.line(), location.column()), (1, 6));
}

#[test]
fn sequence_replaces_previous_contents() -> anyhow::Result<()> {
    let mut pet = Pet {
        fav_nums: vec![9, 9, 9, 9],
        ..Pet::default()
    };
    Decoder::new("FavNums: [1, 2]\n".as_bytes(), &Registry::primitives()).decode(&mut pet)?;
    assert_eq!(pet.fav_nums, vec![1, 2]);
    Ok(())
}

#[test]
fn sequence_into_a_scalar_destination_fails() {
    let err = decode_pet("Age: [1, 2]\n", &Registry::primitives()).unwrap_err();
    assert!(
        err.to_string()
            .starts_with("unsupported type at 1:6: into golang type \"i64\""),
        "{err}"
    );
}

#[test]
fn absent_destination_is_rejected() {
    let registry = Registry::primitives();
    let mut decoder = Decoder::new("a: 1\n".as_bytes(), &registry);
    let err = decoder.decode_dyn(None).unwrap_err();
    assert_eq!(err.to_string(), "invalid parameter 'out' must not be nil");
}

#[test]
fn shared_destination_is_rejected() {
    let registry = Registry::primitives();
    let mut shared = Rc::new(Pet::default());
    let _other = Rc::clone(&shared);
    let err = Decoder::new("Name: x\n".as_bytes(), &registry)
        .decode(&mut shared)
        .unwrap_err();
    assert_eq!(err.to_string(), "invalid parameter 'out' must be settable");
}

#[test]
fn uniquely_owned_rc_is_written() -> anyhow::Result<()> {
    let registry = Registry::primitives();
    let mut owned = Rc::new(Pet::default());
    Decoder::new("Name: x\n".as_bytes(), &registry).decode(&mut owned)?;
    assert_eq!(owned.name, "x");
    Ok(())
}

#[test]
fn boxed_trait_object_destination() -> anyhow::Result<()> {
    let registry = Registry::primitives();
    let mut pet = Pet::default();
    let out: &mut dyn Destination = &mut pet;
    Decoder::new("Age: 4\n".as_bytes(), &registry).decode_dyn(Some(out))?;
    assert_eq!(pet.age, 4);
    Ok(())
}

#[test]
fn utf8_bom_is_skipped() -> anyhow::Result<()> {
    let input = "\u{FEFF}Name: bom\n";
    let pet = decode_pet(input, &Registry::primitives())?;
    assert_eq!(pet.name, "bom");
    Ok(())
}

#[test]
fn reader_input_in_utf16_is_transcoded() -> anyhow::Result<()> {
    let mut bytes = vec![0xFF, 0xFE];
    bytes.extend("Name: wide\nAge: 2\n".encode_utf16().flat_map(u16::to_le_bytes));
    let pet: Pet = yaml_registry::from_reader(bytes.as_slice(), &Registry::primitives())?;
    assert_eq!((pet.name.as_str(), pet.age), ("wide", 2));
    Ok(())
}
