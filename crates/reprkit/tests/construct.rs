use pretty_assertions::assert_eq;
use reprkit::{Introspect, IntrospectError, IntrospectExt, Kwargs, Value};
use rstest::rstest;

#[derive(Clone, Debug, PartialEq, Introspect)]
#[introspect(name = "Address")]
enum PostalAddress {
    House {
        country: String,
        city: String,
        street: String,
        street_number: u32,
    },
    Unknown,
}

#[derive(Clone, Debug, PartialEq, Introspect)]
struct Person {
    name: String,
    #[introspect(default)]
    age: u8,
    #[introspect(default = "PostalAddress::Unknown")]
    address: PostalAddress,
    #[introspect(skip, default = "String::from(\"unset\")")]
    note: String,
}

fn house_kwargs() -> Kwargs {
    Kwargs::new()
        .with("country", "Country here")
        .with("city", "City here")
        .with("street", "Street here")
        .with("street_number", 4_294_967_295u32)
}

#[test]
fn test_defaults_fill_omitted_fields() {
    let person = Person::from_kwargs(&Kwargs::new().with("name", "Name here")).unwrap();
    assert_eq!(
        person,
        Person {
            name: "Name here".into(),
            age: 0,
            address: PostalAddress::Unknown,
            note: "unset".into(),
        }
    );
    assert_eq!(
        person.to_display_string().unwrap(),
        r#"Person(name="Name here", age=0, address=Address.Unknown)"#
    );
}

#[test]
fn test_defaulted_and_explicit_render_identically() {
    let defaulted = Person::from_kwargs(&Kwargs::new().with("name", "A")).unwrap();
    let explicit = Person::from_kwargs(
        &Kwargs::new()
            .with("name", "A")
            .with("age", 0u8)
            .with("address", Value::object(PostalAddress::Unknown)),
    )
    .unwrap();
    assert_eq!(
        defaulted.to_display_string().unwrap(),
        explicit.to_display_string().unwrap()
    );
    assert_eq!(defaulted.to_mapping().unwrap(), explicit.to_mapping().unwrap());
}

#[test]
fn test_nested_object_kwargs() {
    let address = PostalAddress::from_variant_kwargs("House", &house_kwargs()).unwrap();
    let person = Person::from_kwargs(
        &Kwargs::new()
            .with("name", "Name here")
            .with("address", Value::object(address.clone())),
    )
    .unwrap();
    assert_eq!(person.address, address);
    assert_eq!(
        address.to_display_string().unwrap(),
        r#"Address.House(country="Country here", city="City here", street="Street here", street_number=4294967295)"#
    );
}

#[rstest]
#[case::missing(
    Kwargs::new(),
    IntrospectError::MissingField { type_name: "Person", field: "name" }
)]
#[case::negative_age(
    Kwargs::new().with("name", "x").with("age", -1i32),
    IntrospectError::Range { type_name: "Person", field: "age", value: "-1".into(), target: "u8" }
)]
#[case::wrong_kind(
    Kwargs::new().with("name", 3u8),
    IntrospectError::TypeMismatch { type_name: "Person", field: "name", expected: "string", found: "integer" }
)]
#[case::wrong_object(
    Kwargs::new().with("name", "x").with("address", "Baker Street"),
    IntrospectError::TypeMismatch { type_name: "Person", field: "address", expected: "Address", found: "string" }
)]
#[case::hidden_field(
    Kwargs::new().with("name", "x").with("note", "y"),
    IntrospectError::attribute_not_found("Person", "note")
)]
#[case::unknown_field(
    Kwargs::new().with("name", "x").with("height", 180u32),
    IntrospectError::attribute_not_found("Person", "height")
)]
fn test_person_construction_errors(#[case] kwargs: Kwargs, #[case] expected: IntrospectError) {
    assert_eq!(Person::from_kwargs(&kwargs), Err(expected));
}

#[test]
fn test_unsigned_boundary() {
    let over = house_kwargs().with("street_number", 4_294_967_296u64);
    assert_eq!(
        PostalAddress::from_variant_kwargs("House", &over),
        Err(IntrospectError::Range {
            type_name: "Address.House",
            field: "street_number",
            value: "4294967296".into(),
            target: "u32",
        })
    );

    let negative = house_kwargs().with("street_number", -1i64);
    assert!(matches!(
        PostalAddress::from_variant_kwargs("House", &negative),
        Err(IntrospectError::Range { value, .. }) if value == "-1"
    ));
}

#[test]
fn test_variant_construction_errors() {
    assert_eq!(
        PostalAddress::from_variant_kwargs("Flat", &Kwargs::new()),
        Err(IntrospectError::attribute_not_found("Address", "Flat"))
    );
    assert_eq!(
        PostalAddress::from_variant_kwargs("Unknown", &Kwargs::new().with("street", "x")),
        Err(IntrospectError::attribute_not_found("Address.Unknown", "street"))
    );
    assert_eq!(
        PostalAddress::from_variant_kwargs("House", &Kwargs::new().with("country", "x")),
        Err(IntrospectError::MissingField {
            type_name: "Address.House",
            field: "city",
        })
    );
    assert_eq!(
        PostalAddress::from_variant_kwargs("Unknown", &Kwargs::new()),
        Ok(PostalAddress::Unknown)
    );
}

#[derive(Clone, Debug, PartialEq, Introspect)]
struct Sample {
    ratio: f32,
}

#[test]
fn test_f32_range_is_checked() {
    assert_eq!(
        Sample::from_kwargs(&Kwargs::new().with("ratio", 1e300f64)),
        Err(IntrospectError::Range {
            type_name: "Sample",
            field: "ratio",
            value: "1e300".into(),
            target: "f32",
        })
    );
    assert_eq!(
        Sample::from_kwargs(&Kwargs::new().with("ratio", 0.5f64)),
        Ok(Sample { ratio: 0.5 })
    );
}

#[derive(Clone, Debug, PartialEq, Introspect)]
struct Reading(u32, #[introspect(default)] f32, #[introspect(skip)] String);

#[test]
fn test_tuple_struct_from_positional_names() {
    assert_eq!(
        Reading::from_kwargs(&Kwargs::new().with("0", 7u32).with("1", 2.5f64)),
        Ok(Reading(7, 2.5, String::new()))
    );
    assert_eq!(
        Reading::from_kwargs(&Kwargs::new().with("0", 7u32)),
        Ok(Reading(7, 0.0, String::new()))
    );
    assert_eq!(
        Reading::from_kwargs(&Kwargs::new()),
        Err(IntrospectError::MissingField {
            type_name: "Reading",
            field: "0",
        })
    );
    assert_eq!(
        Reading::from_kwargs(&Kwargs::new().with("0", 1u32).with("2", "x")),
        Err(IntrospectError::attribute_not_found("Reading", "2"))
    );
}
