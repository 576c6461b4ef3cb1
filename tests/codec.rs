//! End-to-end checks over the public API

use std::thread;

use amf3_rs::amf::{AmfArray, AmfValue, TypeMarker};
use amf3_rs::{AmfError, Amf3Decoder, CodecConfig, Error};
use bytes::Bytes;

#[test]
fn test_wire_vectors() {
    assert_eq!(&amf3_rs::encode(&AmfValue::Boolean(true)).unwrap()[..], &[0x03]);
    assert_eq!(&amf3_rs::encode(&AmfValue::Integer(1)).unwrap()[..], &[0x04, 0x01]);
    assert_eq!(&amf3_rs::encode(&AmfValue::Integer(13)).unwrap()[..], &[0x04, 0x0D]);
    assert_eq!(
        &amf3_rs::encode(&AmfValue::from("hello")).unwrap()[..],
        &[0x06, 0x0B, b'h', b'e', b'l', b'l', b'o']
    );

    let forced = amf3_rs::encode_as(&AmfValue::Integer(-123), TypeMarker::Integer).unwrap();
    assert_eq!(amf3_rs::decode(&forced).unwrap(), AmfValue::Integer(-123));
}

#[test]
fn test_integer_double_boundary() {
    let below = amf3_rs::encode(&AmfValue::Integer((1 << 28) - 1)).unwrap();
    assert_eq!(below[0], TypeMarker::Integer.as_byte());

    let above = amf3_rs::encode(&AmfValue::Integer(1 << 28)).unwrap();
    assert_eq!(above[0], TypeMarker::Double.as_byte());
    assert_eq!(amf3_rs::decode(&above).unwrap(), AmfValue::Double(268_435_456.0));
}

#[test]
fn test_nested_graph_roundtrip() {
    let tags = AmfValue::array(vec!["a", "b", "a"]);
    let sparse = AmfValue::assoc_array([("1", AmfValue::from("a")), ("x", AmfValue::from("b"))]);
    let value = AmfValue::object([
        ("id", AmfValue::from(42)),
        ("ratio", AmfValue::from(0.25)),
        ("created", AmfValue::Date(1_700_000_000_123.0)),
        ("payload", AmfValue::from(Bytes::from_static(b"\x00\x01\x02"))),
        ("tags", tags.clone()),
        ("again", tags),
        ("sparse", sparse),
        ("missing", AmfValue::Null),
        ("unset", AmfValue::Undefined),
    ]);

    let decoded = amf3_rs::decode(&amf3_rs::encode(&value).unwrap()).unwrap();
    assert_eq!(decoded, value);

    // one array reached twice decodes to one shared handle
    let tags = decoded.get("tags").unwrap();
    assert!(tags.same_ref(&decoded.get("again").unwrap()));
}

#[test]
fn test_mutual_cycle() {
    let a = AmfValue::object([("name", "a")]);
    let b = AmfValue::object([("name", "b")]);
    a.as_object().unwrap().write().set_field("next", b.clone()).unwrap();
    b.as_object().unwrap().write().set_field("next", a.clone()).unwrap();

    let decoded = amf3_rs::decode(&amf3_rs::encode(&a).unwrap()).unwrap();
    let next = decoded.get("next").unwrap();
    assert_eq!(next.get_string("name").as_deref(), Some("b"));
    assert!(next.get("next").unwrap().same_ref(&decoded));
    assert_eq!(decoded, a);
}

#[test]
fn test_array_containing_itself() {
    let list = AmfValue::from(AmfArray::dense(vec![AmfValue::from(1)]));
    list.as_array().unwrap().write().push(list.clone());

    let decoded = amf3_rs::decode(&amf3_rs::encode(&list).unwrap()).unwrap();
    let inner = decoded.as_array().unwrap().read().dense[1].clone();
    assert!(inner.same_ref(&decoded));
}

#[test]
fn test_decode_error_context() {
    let err = amf3_rs::decode(&[0x09, 0x03, 0x01, 0x04]).unwrap_err();
    match &err {
        Error::Decode { source, position, .. } => {
            assert_eq!(source, &AmfError::BufferUnderrun);
            assert_eq!(*position, 4);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("at byte 4"));

    let err = amf3_rs::encode(&AmfValue::Xml("<a/>".into())).unwrap_err();
    assert!(matches!(err.amf(), Some(AmfError::UnsupportedType(_))));
}

#[test]
fn test_lenient_decoder_keeps_class_name() {
    let value = AmfValue::typed_object("com.example.User", [("name", "alice")]);
    let mut encoder = amf3_rs::Amf3Encoder::with_config(CodecConfig::default().class_mapping(true));
    encoder.encode(&value).unwrap();
    let data = encoder.finish();

    assert!(matches!(
        amf3_rs::decode(&data).unwrap_err().amf(),
        Some(AmfError::ClassNotFound(_))
    ));

    let mut decoder = Amf3Decoder::with_config(CodecConfig::lenient());
    let decoded = decoder.decode(&mut data.clone()).unwrap();
    assert_eq!(decoded.as_object().unwrap().read().class_name(), "com.example.User");
    assert_eq!(decoded, value);
}

#[test]
fn test_parallel_calls() {
    let handles: Vec<_> = (0..8i64)
        .map(|n| {
            thread::spawn(move || {
                let value = AmfValue::object([
                    ("n", AmfValue::from(n)),
                    ("label", AmfValue::from(format!("item-{}", n))),
                ]);
                for _ in 0..100 {
                    let decoded = amf3_rs::decode(&amf3_rs::encode(&value).unwrap()).unwrap();
                    assert_eq!(decoded, value);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
