use proptest::prelude::*;
use reprkit::{Introspect, IntrospectExt, Kwargs};

#[derive(Clone, Debug, Introspect)]
struct Record {
    zeta: String,
    alpha: u32,
    #[introspect(skip)]
    hidden: bool,
    mid: Option<i64>,
    #[introspect(skip_str)]
    beta: Vec<u8>,
}

fn record() -> impl Strategy<Value = Record> {
    (
        any::<String>(),
        any::<u32>(),
        any::<bool>(),
        any::<Option<i64>>(),
        proptest::collection::vec(any::<u8>(), 0..8),
    )
        .prop_map(|(zeta, alpha, hidden, mid, beta)| Record {
            zeta,
            alpha,
            hidden,
            mid,
            beta,
        })
}

proptest! {
    #[test]
    fn names_are_sorted_and_match_mapping(value in record()) {
        let names = value.visible_attribute_names().unwrap();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        prop_assert_eq!(&names, &sorted);
        prop_assert_eq!(names.clone(), vec!["alpha", "beta", "mid", "zeta"]);

        let mapping = value.to_mapping().unwrap();
        prop_assert_eq!(mapping.keys().collect::<Vec<_>>(), names);
    }

    #[test]
    fn display_shows_each_visible_field_once_in_order(value in record()) {
        let text = value.to_display_string().unwrap();
        let expected = format!(
            "Record(zeta={:?}, alpha={}, mid={})",
            value.zeta,
            value.alpha,
            value.mid.map_or_else(|| "None".to_string(), |n| n.to_string()),
        );
        prop_assert_eq!(text, expected);
        prop_assert!(!value.to_repr_string().unwrap().contains("hidden="));
    }

    #[test]
    fn equal_inputs_give_equal_views(value in record()) {
        let kwargs = Kwargs::new()
            .with("zeta", value.zeta.clone())
            .with("alpha", value.alpha)
            .with("mid", value.mid)
            .with("beta", value.beta.clone());
        let first = Record::from_kwargs(&kwargs).unwrap();
        let second = Record::from_kwargs(&kwargs).unwrap();

        prop_assert_eq!(first.to_display_string().unwrap(), second.to_display_string().unwrap());
        prop_assert_eq!(first.to_repr_string().unwrap(), value.to_repr_string().unwrap());
        prop_assert_eq!(first.to_mapping().unwrap(), second.to_mapping().unwrap());
        prop_assert_eq!(
            first.visible_attribute_names().unwrap(),
            second.visible_attribute_names().unwrap()
        );
        prop_assert!(!first.hidden);
    }

    #[test]
    fn unsigned_values_render_without_sign_flip(n in any::<u32>()) {
        let value = Record {
            zeta: String::new(),
            alpha: n,
            hidden: false,
            mid: None,
            beta: Vec::new(),
        };
        prop_assert_eq!(
            value.to_display_string().unwrap(),
            format!("Record(zeta=\"\", alpha={n}, mid=None)")
        );
    }
}
