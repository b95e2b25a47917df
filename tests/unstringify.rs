use std::collections::{BTreeMap, HashMap};

use cfn_resource::encoding::{self, Error, leaf::ScalarKind};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
enum StringLike {
    StrLike,
}

#[derive(Debug, PartialEq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
struct Scalars {
    s: String,
    sp: Option<String>,
    sl: StringLike,
    slp: Option<StringLike>,
    b: bool,
    bp: Option<bool>,
    i: i64,
    ip: Option<i32>,
    f: f64,
    fp: Option<f64>,
}

fn expected_scalars() -> Scalars {
    Scalars {
        s: "foo".into(),
        sp: Some("bar".into()),
        sl: StringLike::StrLike,
        slp: Some(StringLike::StrLike),
        b: true,
        bp: Some(true),
        i: 42,
        ip: Some(42),
        f: 3.14,
        fp: Some(22.0),
    }
}

#[test]
fn scalars_from_strings() {
    let source = json!({
        "S": "foo", "SP": "bar", "SL": "StrLike", "SLP": "StrLike",
        "B": "true", "BP": "true", "I": "42", "IP": "42", "F": "3.14", "FP": "22",
    });
    assert_eq!(encoding::unstringify::<Scalars>(&source).unwrap(), expected_scalars());
}

#[test]
fn scalars_from_native_types() {
    let source = json!({
        "S": "foo", "SP": "bar", "SL": "StrLike", "SLP": "StrLike",
        "B": true, "BP": true, "I": 42, "IP": 42, "F": 3.14, "FP": 22.0,
    });
    assert_eq!(encoding::unstringify::<Scalars>(&source).unwrap(), expected_scalars());
}

#[test]
fn scalars_from_compatible_types() {
    let source = json!({
        "S": "foo", "SP": "bar", "SL": "StrLike", "SLP": "StrLike",
        "B": true, "BP": true, "I": 42.0, "IP": 42.0, "F": 3.14, "FP": 22,
    });
    assert_eq!(encoding::unstringify::<Scalars>(&source).unwrap(), expected_scalars());
}

#[test]
fn sequences() {
    #[derive(Debug, PartialEq, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    struct Lists {
        s: Vec<String>,
        sp: Vec<Option<String>>,
        b: Vec<bool>,
        bp: Vec<Option<bool>>,
        i: Vec<i64>,
        ip: Vec<Option<i64>>,
        f: Vec<f64>,
        fp: Vec<Option<f64>>,
    }

    let expected = Lists {
        s: vec!["foo".into()],
        sp: vec![Some("bar".into())],
        b: vec![true],
        bp: vec![Some(true)],
        i: vec![42],
        ip: vec![Some(42)],
        f: vec![3.14],
        fp: vec![Some(22.0)],
    };

    let strings = json!({
        "S": ["foo"], "SP": ["bar"], "B": ["true"], "BP": ["true"],
        "I": ["42"], "IP": ["42"], "F": ["3.14"], "FP": ["22"],
    });
    let natives = json!({
        "S": ["foo"], "SP": ["bar"], "B": [true], "BP": [true],
        "I": [42.0], "IP": [42], "F": [3.14], "FP": [22],
    });
    assert_eq!(encoding::unstringify::<Lists>(&strings).unwrap(), expected);
    assert_eq!(encoding::unstringify::<Lists>(&natives).unwrap(), expected);
}

#[test]
fn mappings() {
    #[derive(Debug, PartialEq, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    struct Maps {
        s: HashMap<String, String>,
        b: BTreeMap<String, bool>,
        ip: HashMap<String, Option<i32>>,
        fp: BTreeMap<String, Option<f64>>,
    }

    let expected = Maps {
        s: HashMap::from([("Val".to_owned(), "foo".to_owned())]),
        b: BTreeMap::from([("Val".to_owned(), true)]),
        ip: HashMap::from([("Val".to_owned(), Some(42))]),
        fp: BTreeMap::from([("Val".to_owned(), Some(22.0))]),
    };

    let strings = json!({
        "S": { "Val": "foo" }, "B": { "Val": "true" },
        "IP": { "Val": "42" }, "FP": { "Val": "22" },
    });
    let natives = json!({
        "S": { "Val": "foo" }, "B": { "Val": true },
        "IP": { "Val": 42.0 }, "FP": { "Val": 22 },
    });
    assert_eq!(encoding::unstringify::<Maps>(&strings).unwrap(), expected);
    assert_eq!(encoding::unstringify::<Maps>(&natives).unwrap(), expected);
}

#[test]
fn optional_collections() {
    #[derive(Debug, PartialEq, Deserialize)]
    struct Model {
        #[serde(rename = "SSP")]
        ssp: Option<Vec<String>>,
        #[serde(rename = "SMP")]
        smp: Option<BTreeMap<String, String>>,
        #[serde(rename = "Unset")]
        unset: Option<Vec<String>>,
    }

    let model: Model = encoding::unstringify(&json!({
        "SSP": ["foo"],
        "SMP": { "bar": "baz" },
    }))
    .unwrap();
    assert_eq!(model.ssp, Some(vec!["foo".to_owned()]));
    assert_eq!(model.smp, Some(BTreeMap::from([("bar".to_owned(), "baz".to_owned())])));
    assert_eq!(model.unset, None);

    let explicit_null: Model = encoding::unstringify(&json!({ "SSP": null, "SMP": {} })).unwrap();
    assert_eq!(explicit_null.ssp, None);
    assert_eq!(explicit_null.smp, Some(BTreeMap::new()));
}

#[test]
fn blank_booleans_are_false() {
    #[derive(Debug, PartialEq, Deserialize)]
    struct Flags {
        #[serde(rename = "B")]
        b: bool,
        #[serde(rename = "BP")]
        bp: Option<bool>,
        #[serde(rename = "Odd")]
        odd: bool,
    }

    let flags: Flags = encoding::unstringify(&json!({ "B": "", "BP": "", "Odd": "yes" })).unwrap();
    assert_eq!(flags, Flags { b: false, bp: Some(false), odd: false });
}

#[test]
fn absent_defaults_are_zero() {
    #[derive(Debug, PartialEq, Deserialize)]
    struct Record {
        #[serde(rename = "Count", default)]
        count: i64,
        #[serde(rename = "Active")]
        active: bool,
    }

    let record: Record = encoding::unstringify(&json!({ "Active": true })).unwrap();
    assert_eq!(record, Record { count: 0, active: true });
}

#[test]
fn integer_literal_forms() {
    let values: Vec<i64> = encoding::unstringify(&json!(["0x10", "-0b11", "017", "+5"])).unwrap();
    assert_eq!(values, [16, -3, 15, 5]);
}

#[test]
fn native_scalars_fill_string_fields() {
    let values: Vec<String> = encoding::unstringify(&json!([true, 7, "x"])).unwrap();
    assert_eq!(values, ["true", "7", "x"]);
}

#[test]
fn bad_numbers_report_their_path() {
    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Inner {
        #[serde(rename = "Values")]
        values: Vec<f64>,
    }
    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Outer {
        #[serde(rename = "Count")]
        count: Option<i64>,
        #[serde(rename = "Inner")]
        inner: Option<Inner>,
    }

    let err = encoding::unstringify::<Outer>(&json!({ "Count": "forty-two" })).unwrap_err();
    assert_eq!(err.path(), Some("Count"));
    assert!(
        matches!(err.root_cause(), Error::InvalidLeaf { kind: ScalarKind::Int, value, .. } if value == "forty-two"),
        "{err}"
    );

    let err = encoding::unstringify::<Outer>(&json!({ "Inner": { "Values": ["1", "pi"] } })).unwrap_err();
    assert_eq!(err.path(), Some("Inner.Values[1]"));
    assert!(matches!(err.root_cause(), Error::InvalidLeaf { kind: ScalarKind::Float, .. }), "{err}");

    let err = encoding::unstringify::<Outer>(&json!({ "Count": 4.5 })).unwrap_err();
    assert!(matches!(err.root_cause(), Error::InvalidLeaf { kind: ScalarKind::Int, .. }), "{err}");
}

#[test]
fn narrowing_is_checked() {
    let err = encoding::unstringify::<Vec<i8>>(&json!(["300"])).unwrap_err();
    assert!(err.to_string().contains("out of range for i8"), "{err}");

    let err = encoding::unstringify::<u8>(&json!("-1")).unwrap_err();
    assert!(matches!(err.root_cause(), Error::InvalidLeaf { kind: ScalarKind::Uint, .. }), "{err}");

    assert_eq!(encoding::unstringify::<u16>(&json!("65535")).unwrap(), u16::MAX);
}

#[test]
fn shape_mismatches_fail() {
    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Model {
        #[serde(rename = "Name")]
        name: Option<String>,
        #[serde(rename = "Items")]
        items: Option<Vec<i64>>,
    }

    let err = encoding::unstringify::<Model>(&json!({ "Name": ["a"] })).unwrap_err();
    assert!(
        matches!(err.root_cause(), Error::ShapeMismatch { expected: "string", found: "array" }),
        "{err}"
    );

    let err = encoding::unstringify::<Model>(&json!({ "Items": { "a": "1" } })).unwrap_err();
    assert!(
        matches!(err.root_cause(), Error::ShapeMismatch { expected: "array", found: "object" }),
        "{err}"
    );

    let err = encoding::unstringify::<Model>(&json!("Name")).unwrap_err();
    assert_eq!(err.path(), None);
    assert!(matches!(err, Error::ShapeMismatch { expected: "object", .. }), "{err}");

    let err = encoding::unstringify::<bool>(&json!(1)).unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch { expected: "boolean", found: "number" }), "{err}");
}

#[test]
fn missing_required_fields_fail() {
    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Required {
        #[serde(rename = "Id")]
        id: String,
    }

    let err = encoding::unstringify::<Required>(&json!({})).unwrap_err();
    assert!(err.to_string().contains("missing field `Id`"), "{err}");
}

#[test]
fn enums_by_variant_name() {
    #[derive(Debug, PartialEq, Deserialize)]
    enum Protocol {
        Http,
        Tcp(u16),
        Tls { port: u16 },
    }

    let values: Vec<Protocol> =
        encoding::unstringify(&json!(["Http", { "Tcp": "8080" }, { "Tls": { "port": 443 } }])).unwrap();
    assert_eq!(values, [Protocol::Http, Protocol::Tcp(8080), Protocol::Tls { port: 443 }]);

    assert!(encoding::unstringify::<Protocol>(&json!("Udp")).is_err());
    assert!(encoding::unstringify::<Protocol>(&json!({ "Tcp": "1", "Http": null })).is_err());
}

#[test]
fn into_place() {
    #[derive(Debug, Default, PartialEq, Deserialize)]
    struct Counter {
        #[serde(default)]
        value: i64,
    }

    let mut counter = Counter { value: 9 };
    encoding::unstringify_into(&json!({ "value": "10" }), &mut counter).unwrap();
    assert_eq!(counter.value, 10);

    assert!(encoding::unstringify_into(&json!({ "value": "ten" }), &mut counter).is_err());
    assert_eq!(counter.value, 10);
}

#[test]
fn generic_targets_pass_through() {
    let source = json!({ "a": [1, "2", null], "b": { "c": true } });
    let value: Value = encoding::unstringify(&source).unwrap();
    assert_eq!(value, source);
}

#[test]
fn from_json_text() {
    #[derive(Debug, PartialEq, Deserialize)]
    struct Size {
        width: u32,
        height: u32,
    }

    let size: Size = encoding::from_str(r#"{"width":"640","height":480}"#).unwrap();
    assert_eq!(size, Size { width: 640, height: 480 });
    assert!(matches!(encoding::from_slice::<Size>(b"{"), Err(Error::Json(_))));
}

#[test]
fn scalar_keys_are_parsed() {
    let by_port: BTreeMap<u16, String> = encoding::unstringify(&json!({ "0x50": "http", "443": "https" })).unwrap();
    assert_eq!(by_port, BTreeMap::from([(80, "http".to_owned()), (443, "https".to_owned())]));

    let err = encoding::unstringify::<BTreeMap<u8, String>>(&json!({ "300": "x" })).unwrap_err();
    assert!(matches!(err.root_cause(), Error::InvalidLeaf { kind: ScalarKind::Uint, .. }), "{err}");

    let err = encoding::unstringify::<HashMap<i32, bool>>(&json!({ "one": true })).unwrap_err();
    assert!(matches!(err.root_cause(), Error::InvalidLeaf { kind: ScalarKind::Int, .. }), "{err}");
}
