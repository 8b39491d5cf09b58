use std::sync::Mutex;

use indoc::indoc;
use yamlet::{Error, from_list_str, from_str, yaml_struct};

// A scalar target implemented by hand, without the macro: documents and
// fields of this type parse from `yyyy-mm-dd` text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Date {
    pub year: i64,
    pub month: i64,
    pub day: i64,
}

fn parse_date(value: &str) -> Result<Date, String> {
    let mut parts = value.trim().split('-');
    let mut next = |what: &str| {
        parts
            .next()
            .ok_or_else(|| format!("missing {what} in `{value}`"))?
            .parse::<i64>()
            .map_err(|e| format!("bad {what} in `{value}`: {e}"))
    };
    let year = next("year")?;
    let month = next("month")?;
    let day = next("day")?;
    Ok(Date { year, month, day })
}

fn date_field(s: &str) -> Result<yamlet::Field, String> {
    parse_date(s).map(|d| Box::new(d) as yamlet::Field)
}

impl yamlet::FromYaml for Date {
    fn type_name() -> &'static str {
        "Date"
    }
    fn shape() -> yamlet::Shape {
        yamlet::Shape::Scalar(date_field)
    }
}

impl yamlet::FieldBind for Date {
    fn field_spec() -> yamlet::FieldSpec {
        yamlet::FieldSpec::of::<Date>()
    }
}

yaml_struct! {
    #[derive(Debug, PartialEq)]
    pub struct Name {
        [key = "first name"] first: String,
        [key = "last name"] last: String,
    }
}

fn comma_name(value: &str) -> Result<Name, String> {
    match value.split_once(", ") {
        Some((last, first)) => Ok(Name {
            first: first.to_string(),
            last: last.to_string(),
        }),
        None => Err(format!("expected `Last, First`, got `{value}`")),
    }
}

yaml_struct! {
    #[derive(Debug)]
    pub struct Person {
        [via = comma_name] [key = "full name"] name: Name,
        [via = parse_date] birth: Date,
        age: i64,
        email: Option<String>,
    }
}

#[test]
fn converter_builds_a_composite_from_scalar_text() {
    let yaml = indoc! {"
        full name: Candida, Maria
        birth: 2005-03-15
        age: 15
        email: maria@example.com
    "};
    let person: Person = from_str(yaml).unwrap();
    assert_eq!(person.name.first, "Maria");
    assert_eq!(person.name.last, "Candida");
    assert_eq!(
        person.birth,
        Date {
            year: 2005,
            month: 3,
            day: 15
        }
    );
    assert_eq!(person.age, 15);
    assert_eq!(person.email.as_deref(), Some("maria@example.com"));
}

#[test]
fn converter_errors_surface_as_coercion_failures() {
    let yaml = "full name: Maria Candida\nbirth: 2005-03-15\nage: 15\n";
    let err = from_str::<Person>(yaml).unwrap_err();
    match err {
        Error::TypeCoercionFailure { type_name, key, .. } => {
            assert_eq!(type_name, "Person");
            assert_eq!(key, "full name");
        }
        other => panic!("expected a coercion failure, got {other:?}"),
    }
}

yaml_struct! {
    #[derive(Debug, PartialEq)]
    pub struct Student {
        [key = "full name"] name: Name,
        [via = parse_date] birth: Date,
        nr: i64,
        [via = parse_date] graduated: Option<Date>,
    }
}

#[test]
fn converter_output_lifts_into_optional_fields() {
    let yaml = indoc! {"
        full name:
          first name: Maria
          last name: Candida
        birth: 2005-03-15
        nr: 123
        graduated: 2027-07-01
    "};
    let student: Student = from_str(yaml).unwrap();
    assert_eq!(student.name.first, "Maria");
    assert_eq!(student.birth.year, 2005);
    assert_eq!(
        student.graduated,
        Some(Date {
            year: 2027,
            month: 7,
            day: 1
        })
    );

    let without = indoc! {"
        full name:
          first name: Maria
          last name: Candida
        birth: 2005-03-15
        nr: 123
    "};
    let student: Student = from_str(without).unwrap();
    assert_eq!(student.graduated, None);
}

#[test]
fn dates_also_bind_as_plain_scalar_documents() {
    let date: Date = from_str("2024-02-29").unwrap();
    assert_eq!(date.month, 2);
}

yaml_struct! {
    #[derive(Debug)]
    pub struct Entry {
        [via = logged_value] value: String,
    }
}

static SEEN: Mutex<Vec<String>> = Mutex::new(Vec::new());

fn logged_value(value: &str) -> Result<String, String> {
    SEEN.lock().unwrap().push(value.to_string());
    Ok(value.to_string())
}

#[test]
fn converter_runs_once_per_occurrence_in_document_order() {
    let yaml = indoc! {"
        -
          value: first
        -
          value: second
        -
          value: third
    "};
    SEEN.lock().unwrap().clear();
    let entries: Vec<Entry> = from_list_str(yaml).unwrap();
    assert_eq!(entries.len(), 3);
    let seen = SEEN.lock().unwrap();
    assert_eq!(*seen, ["first", "second", "third"]);
}
