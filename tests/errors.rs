use indoc::indoc;
use yamlet::{DuplicateKeyPolicy, Error, from_str, from_str_with_options, yaml_struct};

yaml_struct! {
    #[derive(Debug, PartialEq)]
    pub struct Name {
        [key = "first name"] first: String,
        [key = "last name"] last: String,
    }
}

yaml_struct! {
    #[derive(Debug)]
    pub struct Person {
        [key = "city of birth"] from: String,
        [key = "full name"] name: Name,
        age: i64,
        email: Option<String>,
        [key = "is_student"] student: bool,
    }
}

#[test]
fn missing_required_property_names_type_and_key() {
    let yaml = indoc! {"
        city of birth: London
        full name:
          first name: John
          last name: Doe
        age: 30
    "};
    let err = from_str::<Person>(yaml).unwrap_err();
    match err {
        Error::MissingRequiredProperty { type_name, key } => {
            assert_eq!(type_name, "Person");
            assert_eq!(key, "is_student");
        }
        other => panic!("expected a missing property, got {other:?}"),
    }
    let rendered = format!(
        "{}",
        from_str::<Person>(yaml).unwrap_err()
    );
    assert!(rendered.contains("is_student"), "got: {rendered}");
    assert!(rendered.contains("Person"), "got: {rendered}");
}

#[test]
fn supplying_every_required_key_succeeds() {
    let yaml = indoc! {"
        city of birth: London
        full name:
          first name: John
          last name: Doe
        age: 30
        email: john@example.com
        is_student: false
    "};
    let person = from_str::<Person>(yaml).unwrap();
    assert_eq!(person.from, "London");
    assert_eq!(person.name.first, "John");
    assert_eq!(person.name.last, "Doe");
    assert_eq!(person.age, 30);
    assert_eq!(person.email.as_deref(), Some("john@example.com"));
    assert!(!person.student);
}

#[test]
fn non_numeric_text_is_a_coercion_failure() {
    let yaml = indoc! {"
        city of birth: London
        full name:
          first name: John
          last name: Doe
        age: thirty
        is_student: false
    "};
    let err = from_str::<Person>(yaml).unwrap_err();
    match err {
        Error::TypeCoercionFailure {
            type_name,
            key,
            detail,
        } => {
            assert_eq!(type_name, "Person");
            assert_eq!(key, "age");
            assert!(detail.contains("thirty"), "got: {detail}");
        }
        other => panic!("expected a coercion failure, got {other:?}"),
    }
}

#[test]
fn booleans_reject_anything_but_the_exact_literals() {
    for bad in ["True", "FALSE", "yes", "no", "on", "off", "1"] {
        let yaml = format!(
            "city of birth: London\nfull name:\n  first name: John\n  last name: Doe\nage: 30\nis_student: {bad}\n"
        );
        let err = from_str::<Person>(&yaml).unwrap_err();
        assert!(
            matches!(err, Error::TypeCoercionFailure { key: "is_student", .. }),
            "`{bad}` must not parse as a boolean, got {err:?}"
        );
    }
}

#[test]
fn a_stray_line_is_a_malformed_block_with_a_location() {
    let yaml = "city of birth: London\nthis line has no colon\nage: 30\n";
    let err = from_str::<Person>(yaml).unwrap_err();
    match &err {
        Error::MalformedBlock { type_name, .. } => assert_eq!(*type_name, "Person"),
        other => panic!("expected a malformed block, got {other:?}"),
    }
    assert_eq!(err.location().map(|l| l.line()), Some(2));
}

#[test]
fn a_nested_block_where_a_scalar_is_declared_fails() {
    let yaml = indoc! {"
        city of birth: London
        full name:
          first name: John
          last name: Doe
        age:
          value: 30
        is_student: false
    "};
    let err = from_str::<Person>(yaml).unwrap_err();
    assert!(
        matches!(err, Error::TypeCoercionFailure { key: "age", .. }),
        "got: {err:?}"
    );
}

#[test]
fn a_scalar_where_a_composite_is_declared_fails_without_a_converter() {
    let yaml = indoc! {"
        city of birth: London
        full name: John Doe
        age: 30
        is_student: false
    "};
    let err = from_str::<Person>(yaml).unwrap_err();
    assert!(
        matches!(err, Error::TypeCoercionFailure { key: "full name", .. }),
        "got: {err:?}"
    );
}

#[test]
fn duplicate_keys_error_by_default() {
    let yaml = "age: 30\nage: 31\n";
    let err = from_str::<Person>(yaml).unwrap_err();
    match &err {
        Error::MalformedBlock { reason, .. } => {
            assert!(reason.contains("duplicate key"), "got: {reason}")
        }
        other => panic!("expected a malformed block, got {other:?}"),
    }
}

yaml_struct! {
    #[derive(Debug, PartialEq)]
    pub struct Pair {
        a: i64,
        b: Option<i64>,
    }
}

#[test]
fn duplicate_key_policies_pick_a_winner() {
    let yaml = "a: 1\na: 2\nb: 7\n";
    let first: Pair = from_str_with_options(
        yaml,
        yamlet::options! { duplicate_keys: DuplicateKeyPolicy::FirstWins },
    )
    .unwrap();
    assert_eq!(first, Pair { a: 1, b: Some(7) });

    let last: Pair = from_str_with_options(
        yaml,
        yamlet::options! { duplicate_keys: DuplicateKeyPolicy::LastWins },
    )
    .unwrap();
    assert_eq!(last, Pair { a: 2, b: Some(7) });
}

#[test]
fn io_failures_are_reported_as_io_errors() {
    let err = yamlet::from_folder::<Pair, _>("/no/such/directory").unwrap_err();
    assert!(matches!(err, Error::Io { .. }), "got: {err:?}");
    assert!(err.type_name().is_none());
}
