//! Closure contracts: the input-to-marker mapping of every decision value.
//!
//! Each scenario drives a full analysis over an assembled model and then
//! checks the decision's `evaluate` form against the exact markers the
//! generated logging layer must observe. The rendered form is validated by
//! parsing it back as a Rust expression; `evaluate` and the rendered closure
//! are two renditions of one mapping, so behavioral assertions live on
//! `evaluate` alone.

use shroud::{HeaderMarker, QueryMarker};
use shroud_codegen::model::{
    HttpBinding, Member, Model, Operation, Shape, ShapeId, ShapeTrait, UriPattern,
};
use shroud_codegen::{
    HeaderSensitivity, QuerySensitivity, RuntimeConfig, SensitivityAnalyzer,
};

fn header_marker(value: bool, key_suffix: Option<usize>) -> HeaderMarker {
    HeaderMarker { value, key_suffix }
}

fn query_marker(key: bool, value: bool) -> QueryMarker {
    QueryMarker { key, value }
}

fn assert_parses_as_closure(tokens: &proc_macro2::TokenStream) {
    let parsed: syn::Expr = syn::parse2(tokens.clone()).expect("rendered closure should parse");
    assert!(
        matches!(parsed, syn::Expr::Closure(_)),
        "rendered tokens should be a closure expression"
    );
}

/// Analyzes the one operation `test#Secret` and returns its input's header
/// and query decisions.
fn decide(model: &Model) -> (HeaderSensitivity, QuerySensitivity) {
    let operation = model
        .operation(&ShapeId::new("test#Secret"))
        .expect("operation should be defined");
    let analyzer = SensitivityAnalyzer::new(model, operation);
    let input = operation.input().expect("operation should declare an input");
    (
        analyzer.find_header_sensitivity(input).unwrap(),
        analyzer.find_query_sensitivity(input).unwrap(),
    )
}

fn prefix_map_model(key_target: &str, value_target: &str, input_sensitive: bool) -> Model {
    let mut input = Shape::structure(
        "test#Input",
        [Member::new("prefixMap", "test#PrefixMap")
            .with_trait(ShapeTrait::HttpPrefixHeaders("prefix-".to_string()))],
    );
    if input_sensitive {
        input = input.with_traits([ShapeTrait::Sensitive]);
    }
    Model::builder()
        .shape(Shape::primitive("test#String"))
        .shape(Shape::primitive("test#SensitiveKey").with_traits([ShapeTrait::Sensitive]))
        .shape(Shape::primitive("test#SensitiveValue").with_traits([ShapeTrait::Sensitive]))
        .shape(Shape::map("test#PrefixMap", key_target, value_target))
        .shape(input)
        .operation(Operation::new("test#Secret").with_input("test#Input"))
        .build()
        .unwrap()
}

fn query_map_model(key_target: &str, value_target: &str, input_sensitive: bool) -> Model {
    let mut input = Shape::structure(
        "test#Input",
        [Member::new("queryMap", "test#QueryMap").with_trait(ShapeTrait::HttpQueryParams)],
    );
    if input_sensitive {
        input = input.with_traits([ShapeTrait::Sensitive]);
    }
    Model::builder()
        .shape(Shape::primitive("test#String"))
        .shape(Shape::primitive("test#SensitiveKey").with_traits([ShapeTrait::Sensitive]))
        .shape(Shape::primitive("test#SensitiveValue").with_traits([ShapeTrait::Sensitive]))
        .shape(Shape::map("test#QueryMap", key_target, value_target))
        .shape(input)
        .operation(Operation::new("test#Secret").with_input("test#Input"))
        .build()
        .unwrap()
}

#[test]
fn named_header_closure_redacts_only_bound_sensitive_names() {
    let model = Model::builder()
        .shape(Shape::primitive("test#String"))
        .shape(Shape::structure(
            "test#Input",
            [
                Member::new("headerA", "test#String")
                    .with_trait(ShapeTrait::HttpHeader("header-a".to_string())),
                Member::new("nestedB", "test#NestedB"),
            ],
        ))
        .shape(
            Shape::structure(
                "test#NestedB",
                [Member::new("headerC", "test#String")
                    .with_trait(ShapeTrait::HttpHeader("header-c".to_string()))],
            )
            .with_traits([ShapeTrait::Sensitive]),
        )
        .operation(Operation::new("test#Secret").with_input("test#Input"))
        .build()
        .unwrap();

    let (headers, _) = decide(&model);
    assert_eq!(headers.header_keys(), ["header-c"]);
    assert!(matches!(
        headers,
        HeaderSensitivity::NotSensitiveMapValue {
            prefix_header: None,
            ..
        }
    ));

    assert_eq!(headers.evaluate("header-a"), header_marker(false, None));
    assert_eq!(headers.evaluate("header-c"), header_marker(true, None));

    let rendered = headers.closure(&RuntimeConfig::default());
    assert_parses_as_closure(&rendered);
    assert!(rendered.to_string().contains("\"header-c\""));
}

#[test]
fn sensitive_structure_prefix_closure_redacts_value_and_key_suffix() {
    let model = prefix_map_model("test#String", "test#String", true);
    let (headers, _) = decide(&model);
    match &headers {
        HeaderSensitivity::SensitiveMapValue { prefix_header, .. } => {
            assert_eq!(prefix_header, "prefix-");
        }
        HeaderSensitivity::NotSensitiveMapValue { .. } => panic!("expected SensitiveMapValue"),
    }

    assert_eq!(headers.evaluate("prefix-a"), header_marker(true, Some(7)));
    assert_eq!(headers.evaluate("prefix-b"), header_marker(true, Some(7)));
    assert_eq!(headers.evaluate("other"), header_marker(false, None));

    assert_parses_as_closure(&headers.closure(&RuntimeConfig::default()));
}

#[test]
fn key_only_sensitive_prefix_closure_exposes_values() {
    let model = prefix_map_model("test#SensitiveKey", "test#String", false);
    let (headers, _) = decide(&model);
    match &headers {
        HeaderSensitivity::NotSensitiveMapValue {
            header_keys,
            prefix_header,
        } => {
            assert!(header_keys.is_empty());
            assert_eq!(prefix_header.as_deref(), Some("prefix-"));
        }
        HeaderSensitivity::SensitiveMapValue { .. } => panic!("expected NotSensitiveMapValue"),
    }

    assert_eq!(headers.evaluate("prefix-a"), header_marker(false, Some(7)));
    assert_eq!(headers.evaluate("prefix-b"), header_marker(false, Some(7)));
    assert_eq!(headers.evaluate("other"), header_marker(false, None));

    assert_parses_as_closure(&headers.closure(&RuntimeConfig::default()));
}

#[test]
fn value_only_sensitive_prefix_closure_exposes_key_suffix() {
    let model = prefix_map_model("test#String", "test#SensitiveValue", false);
    let (headers, _) = decide(&model);
    match &headers {
        HeaderSensitivity::SensitiveMapValue {
            header_keys,
            prefix_header,
            key_sensitive,
        } => {
            assert!(header_keys.is_empty());
            assert_eq!(prefix_header, "prefix-");
            assert!(!key_sensitive);
        }
        HeaderSensitivity::NotSensitiveMapValue { .. } => panic!("expected SensitiveMapValue"),
    }

    assert_eq!(headers.evaluate("prefix-a"), header_marker(true, None));
    assert_eq!(headers.evaluate("prefix-b"), header_marker(true, None));
    assert_eq!(headers.evaluate("other"), header_marker(false, None));
}

#[test]
fn named_query_closure_redacts_only_bound_sensitive_keys() {
    let model = Model::builder()
        .shape(Shape::primitive("test#String"))
        .shape(Shape::structure(
            "test#Input",
            [
                Member::new("queryA", "test#String")
                    .with_trait(ShapeTrait::HttpQuery("query_a".to_string())),
                Member::new("nestedB", "test#NestedB"),
            ],
        ))
        .shape(
            Shape::structure(
                "test#NestedB",
                [Member::new("queryC", "test#String")
                    .with_trait(ShapeTrait::HttpQuery("query_c".to_string()))],
            )
            .with_traits([ShapeTrait::Sensitive]),
        )
        .operation(Operation::new("test#Secret").with_input("test#Input"))
        .build()
        .unwrap();

    let (_, query) = decide(&model);
    assert_eq!(query.evaluate("query_a"), query_marker(false, false));
    assert_eq!(query.evaluate("query_c"), query_marker(false, true));

    let rendered = query.closure(&RuntimeConfig::default());
    assert_parses_as_closure(&rendered);
    assert!(rendered.to_string().contains(":: shroud :: QueryMarker"));
}

#[test]
fn sensitive_structure_wildcard_closure_redacts_everything() {
    let model = query_map_model("test#String", "test#String", true);
    let (_, query) = decide(&model);
    assert!(matches!(query, QuerySensitivity::SensitiveMapValue { .. }));
    assert_eq!(query.evaluate("wildcard"), query_marker(true, true));
}

#[test]
fn key_only_sensitive_wildcard_closure_exposes_values() {
    let model = query_map_model("test#SensitiveKey", "test#String", false);
    let (_, query) = decide(&model);
    assert_eq!(query.evaluate("wildcard"), query_marker(true, false));
}

#[test]
fn value_only_sensitive_wildcard_closure_exposes_keys() {
    let model = query_map_model("test#String", "test#SensitiveValue", false);
    let (_, query) = decide(&model);
    assert_eq!(query.evaluate("wildcard"), query_marker(false, true));
}

#[test]
fn uri_label_closure_redacts_bound_positions_only() {
    let model = Model::builder()
        .shape(Shape::primitive("test#SensitiveString").with_traits([ShapeTrait::Sensitive]))
        .shape(Shape::structure(
            "test#Input",
            [
                Member::new("labelB", "test#SensitiveString").with_trait(ShapeTrait::HttpLabel),
                Member::new("labelA", "test#SensitiveString").with_trait(ShapeTrait::HttpLabel),
            ],
        ))
        .operation(
            Operation::new("test#Secret")
                .with_input("test#Input")
                .with_http(HttpBinding::new(
                    "GET",
                    UriPattern::parse("/secret/{labelA}/{labelB}").unwrap(),
                )),
        )
        .build()
        .unwrap();

    let operation = model.operation(&ShapeId::new("test#Secret")).unwrap();
    let analyzer = SensitivityAnalyzer::new(&model, operation);
    let pattern = operation.http().unwrap().uri();
    let labels = analyzer
        .find_label_sensitivity(pattern, operation.input().unwrap())
        .unwrap();

    assert_eq!(labels.label_indexes(), [2, 1]);
    assert!(!labels.evaluate(0));
    assert!(labels.evaluate(1));
    assert!(labels.evaluate(2));

    assert_parses_as_closure(&labels.closure());
}

#[test]
fn rendered_closures_honor_a_custom_runtime_path() {
    let model = query_map_model("test#String", "test#String", true);
    let (_, query) = decide(&model);
    let config = RuntimeConfig::new(quote::quote!(crate::instrument));
    let rendered = query.closure(&config).to_string();
    assert!(rendered.contains("crate :: instrument :: QueryMarker"));
    assert!(!rendered.contains(":: shroud ::"));
}
