use std::collections::{BTreeMap, HashMap};

use cfn_resource::encoding::{self, Error, StrValue};
use serde::Serialize;
use serde_json::{Value, json};

fn stringified<T: Serialize + ?Sized>(value: &T) -> Value {
    encoding::stringify(value).unwrap().into_json()
}

#[derive(Debug, Clone, Serialize)]
struct Plain {
    #[serde(rename = "S")]
    s: String,
}

#[test]
fn scalars_become_strings() {
    assert_eq!(stringified("foo"), json!("foo"));
    assert_eq!(stringified(&true), json!("true"));
    assert_eq!(stringified(&42), json!("42"));
    assert_eq!(stringified(&-7i8), json!("-7"));
    assert_eq!(stringified(&u64::MAX), json!("18446744073709551615"));
    assert_eq!(stringified(&3.14), json!("3.14"));
    assert_eq!(stringified(&22.0f64), json!("22"));
    assert_eq!(stringified(&1.1f32), json!("1.1"));
    assert_eq!(stringified(&'x'), json!("x"));
}

#[test]
fn collections_keep_their_shape() {
    let list = json!(["foo", true, 42, 3.14]);
    assert_eq!(stringified(&list), json!(["foo", "true", "42", "3.14"]));

    let map = json!({ "l": list });
    assert_eq!(stringified(&map), json!({ "l": ["foo", "true", "42", "3.14"] }));

    let plain = Plain { s: "foo".into() };
    assert_eq!(stringified(&plain), json!({ "S": "foo" }));

    let tuple = (1, "two", false);
    assert_eq!(stringified(&tuple), json!(["1", "two", "false"]));
}

#[test]
fn pointers_are_transparent() {
    let plain = Plain { s: "foo".into() };
    assert_eq!(stringified(&Box::new(plain.clone())), stringified(&plain));
    assert_eq!(stringified(&Some(&plain)), stringified(&plain));
    assert_eq!(stringified(&Some(Box::new(42))), json!("42"));
    assert_eq!(stringified(&Some(vec![1, 2])), json!(["1", "2"]));
}

#[test]
fn nils_are_stripped_from_mappings() {
    assert_eq!(stringified(&json!({ "foo": null })), json!({}));

    let mut map: HashMap<String, Option<i32>> = HashMap::new();
    map.insert("a".into(), None);
    map.insert("b".into(), Some(2));
    assert_eq!(stringified(&map), json!({ "b": "2" }));
}

#[test]
fn nil_roots_are_null() {
    assert_eq!(encoding::stringify(&Option::<Plain>::None).unwrap(), StrValue::Null);
    assert_eq!(encoding::stringify(&()).unwrap(), StrValue::Null);
    assert_eq!(stringified(&Value::Null), Value::Null);
}

#[test]
fn sequences_keep_length_with_nulls() {
    let values = vec![Some(1), None, Some(3)];
    assert_eq!(stringified(&values), json!(["1", null, "3"]));
}

#[test]
fn empty_collections_stay_empty() {
    assert_eq!(encoding::stringify(&Vec::<i32>::new()).unwrap(), StrValue::Sequence(vec![]));
    assert_eq!(stringified(&BTreeMap::<String, i32>::new()), json!({}));
}

#[test]
fn model_with_unset_optionals() {
    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    struct Model {
        bucket_name: Option<String>,
        key: Option<String>,
        body: Option<String>,
        is_base64_encoded: Option<bool>,
        content_type: Option<String>,
        content_length: Option<i64>,
        #[serde(rename = "ACL")]
        acl: Option<String>,
        grants: BTreeMap<String, Vec<String>>,
    }

    let model = Model {
        bucket_name: Some("foo".into()),
        key: Some("bar".into()),
        body: Some("baz".into()),
        is_base64_encoded: None,
        content_type: Some("quux".into()),
        content_length: None,
        acl: Some("mooz".into()),
        grants: BTreeMap::new(),
    };

    let tree = encoding::stringify(&model).unwrap();
    let keys: Vec<&str> = tree.as_mapping().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, ["BucketName", "Key", "Body", "ContentType", "ACL", "Grants"]);
    assert_eq!(
        tree.into_json(),
        json!({
            "BucketName": "foo",
            "Key": "bar",
            "Body": "baz",
            "ContentType": "quux",
            "ACL": "mooz",
            "Grants": {},
        })
    );
}

#[test]
fn omit_policy_is_per_field() {
    #[derive(Serialize)]
    struct Record {
        #[serde(rename = "Count", skip_serializing_if = "encoding::is_default")]
        count: i64,
        #[serde(rename = "Active")]
        active: bool,
        #[serde(rename = "Retries")]
        retries: i64,
    }

    let record = Record { count: 0, active: true, retries: 0 };
    assert_eq!(stringified(&record), json!({ "Active": "true", "Retries": "0" }));

    let record = Record { count: 3, active: false, retries: 0 };
    assert_eq!(stringified(&record), json!({ "Count": "3", "Active": "false", "Retries": "0" }));
}

#[test]
fn enums_are_externally_tagged() {
    #[derive(Serialize)]
    enum Protocol {
        Http,
        Tcp(u16),
        Tls { port: u16, sni: Option<String> },
        Pair(i32, i32),
    }

    assert_eq!(stringified(&Protocol::Http), json!("Http"));
    assert_eq!(stringified(&Protocol::Tcp(8080)), json!({ "Tcp": "8080" }));
    assert_eq!(
        stringified(&Protocol::Tls { port: 443, sni: None }),
        json!({ "Tls": { "port": "443" } })
    );
    assert_eq!(stringified(&Protocol::Pair(1, 2)), json!({ "Pair": ["1", "2"] }));
}

#[test]
fn scalar_map_keys_are_rendered() {
    let mut by_port = BTreeMap::new();
    by_port.insert(443, true);
    assert_eq!(stringified(&by_port), json!({ "443": "true" }));
}

#[test]
fn compound_map_keys_are_unsupported() {
    let mut by_pair = BTreeMap::new();
    by_pair.insert(vec![1, 2], "x");
    let err = encoding::stringify(&by_pair).unwrap_err();
    assert!(matches!(err.root_cause(), Error::Unsupported(_)), "{err}");
}

#[test]
fn serializes_to_all_string_json() {
    #[derive(Serialize)]
    struct Limits {
        max: u32,
        ratio: f64,
        enabled: Option<bool>,
    }

    let text = encoding::to_string(&Limits { max: 10, ratio: 0.5, enabled: None }).unwrap();
    assert_eq!(text, r#"{"max":"10","ratio":"0.5"}"#);
    assert_eq!(encoding::to_string(&Option::<Limits>::None).unwrap(), "null");
}
