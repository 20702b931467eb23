use bacstack_core::apdu::{Apdu, ConfirmedRequest, SimpleAck, UnconfirmedRequest};
use bacstack_core::encoding::writer::{encode_to_vec, Writer};
use bacstack_core::npdu::{Npdu, NpduMessage};
use bacstack_core::services::{
    ConfirmedService, CovNotificationRequest, CovPropertyValue, IAmRequest, ReadPropertyRequest,
    SubscribeCovRequest, UnconfirmedService, WhoIsRequest, WritePropertyRequest,
    SERVICE_WRITE_PROPERTY,
};
use bacstack_core::types::{ObjectId, ObjectType, PropertyId};
use bacstack_core::value::{StatusFlags, Value};
use bacstack_core::{DecodeError, Layer};

fn frame(npdu: Npdu, apdu: Apdu) -> Vec<u8> {
    encode_to_vec::<256>(|w| NpduMessage::new(npdu, apdu).encode(w)).unwrap()
}

#[test]
fn who_is_global_frame_matches_fixture() {
    let bytes = frame(
        Npdu::default(),
        Apdu::UnconfirmedRequest(UnconfirmedRequest::new(UnconfirmedService::WhoIs(
            WhoIsRequest::global(),
        ))),
    );
    assert_eq!(bytes, [0x01, 0x00, 0x10, 0x08]);
}

#[test]
fn broadcast_who_is_frame_matches_fixture() {
    let bytes = frame(
        Npdu::global_broadcast(),
        Apdu::UnconfirmedRequest(UnconfirmedRequest::new(UnconfirmedService::WhoIs(
            WhoIsRequest::global(),
        ))),
    );
    assert_eq!(bytes, [0x01, 0x20, 0xFF, 0xFF, 0x00, 0xFF, 0x10, 0x08]);
}

#[test]
fn read_property_frame_matches_fixture() {
    let bytes = frame(
        Npdu::default(),
        Apdu::ConfirmedRequest(ConfirmedRequest::new(
            1,
            ConfirmedService::ReadProperty(ReadPropertyRequest::new(
                ObjectId::new(ObjectType::Device, 123).unwrap(),
                PropertyId::ObjectName,
            )),
        )),
    );
    assert_eq!(
        bytes,
        [0x01, 0x00, 0x00, 0x05, 0x01, 0x0C, 0x0C, 0x02, 0x00, 0x00, 0x7B, 0x19, 0x4D]
    );
}

#[test]
fn subscribe_cov_frame_matches_fixture() {
    let bytes = frame(
        Npdu::default(),
        Apdu::ConfirmedRequest(ConfirmedRequest::new(
            3,
            ConfirmedService::SubscribeCov(SubscribeCovRequest::new(
                7,
                ObjectId::new(ObjectType::AnalogInput, 2).unwrap(),
                false,
                600,
            )),
        )),
    );
    assert_eq!(
        bytes,
        [
            0x01, 0x00, 0x00, 0x05, 0x03, 0x05, 0x09, 0x07, 0x1C, 0x00, 0x00, 0x00, 0x02, 0x29,
            0x00, 0x3A, 0x02, 0x58,
        ]
    );
}

#[test]
fn write_property_frame_matches_fixture() {
    let mut req = WritePropertyRequest::new(
        ObjectId::new(ObjectType::AnalogValue, 1).unwrap(),
        PropertyId::PresentValue,
        Value::real(22.5).unwrap(),
    );
    req.priority = Some(8);
    let bytes = frame(
        Npdu::default(),
        Apdu::ConfirmedRequest(ConfirmedRequest::new(2, ConfirmedService::WriteProperty(req))),
    );
    assert_eq!(
        bytes,
        [
            0x01, 0x00, 0x00, 0x05, 0x02, 0x0F, 0x0C, 0x00, 0x80, 0x00, 0x01, 0x19, 0x55, 0x3E,
            0x44, 0x41, 0xB4, 0x00, 0x00, 0x3F, 0x49, 0x08,
        ]
    );
}

#[test]
fn i_am_frame_decodes_expected() {
    let bytes = [
        0x01, 0x20, 0xFF, 0xFF, 0x00, 0xFF, 0x10, 0x00, 0xC4, 0x02, 0x00, 0x27, 0x0F, 0x22,
        0x05, 0xC4, 0x91, 0x03, 0x21, 0x0F,
    ];
    let msg = NpduMessage::decode(&bytes).unwrap();
    let apdu = msg.apdu.unwrap();
    assert_eq!(apdu.vendor_id(), Some(15));
    assert_eq!(
        apdu.object_id(),
        Some(ObjectId::new(ObjectType::Device, 9999).unwrap())
    );
    let Apdu::UnconfirmedRequest(UnconfirmedRequest {
        service: UnconfirmedService::IAm(IAmRequest { max_apdu, .. }),
    }) = apdu
    else {
        panic!("expected i-am");
    };
    assert_eq!(max_apdu, 1476);
}

#[test]
fn cov_notification_fixture_decodes_expected() {
    let bytes = [
        0x01, 0x00, 0x10, 0x02, 0x09, 0x4D, 0x1C, 0x02, 0x00, 0x00, 0x01, 0x2C, 0x00, 0x00,
        0x00, 0x02, 0x39, 0x78, 0x4E, 0x09, 0x55, 0x2E, 0x44, 0x42, 0x29, 0x00, 0x00, 0x2F,
        0x09, 0x6F, 0x2E, 0x82, 0x04, 0x00, 0x2F, 0x4F,
    ];
    let msg = NpduMessage::decode(&bytes).unwrap();
    let Some(Apdu::UnconfirmedRequest(UnconfirmedRequest {
        service: UnconfirmedService::CovNotification(cov),
    })) = msg.apdu
    else {
        panic!("expected cov notification");
    };
    assert_eq!(
        cov,
        CovNotificationRequest {
            subscriber_process_id: 77,
            initiating_device_id: ObjectId::new(ObjectType::Device, 1).unwrap(),
            monitored_object_id: ObjectId::new(ObjectType::AnalogInput, 2).unwrap(),
            time_remaining_seconds: 120,
            values: vec![
                CovPropertyValue::new(PropertyId::PresentValue, Value::real(42.25).unwrap()),
                CovPropertyValue::new(
                    PropertyId::StatusFlags,
                    Value::status_flags(StatusFlags::default())
                ),
            ],
        }
    );
}

#[test]
fn simple_ack_frame_roundtrips() {
    let ack = Apdu::SimpleAck(SimpleAck {
        invoke_id: 2,
        service_choice: SERVICE_WRITE_PROPERTY,
    });
    let bytes = frame(Npdu::default(), ack.clone());
    assert_eq!(bytes, [0x01, 0x00, 0x20, 0x02, 0x0F]);
    assert_eq!(NpduMessage::decode(&bytes).unwrap().apdu, Some(ack));
}

#[test]
fn truncated_frame_fails_then_next_frame_decodes() {
    let valid = [
        0x01, 0x00, 0x00, 0x05, 0x01, 0x0c, 0x0c, 0x02, 0x00, 0x27, 0x0f, 0x19, 0x4d,
    ];
    for cut in 0..valid.len() {
        let err = NpduMessage::decode(&valid[..cut]).unwrap_err();
        assert_eq!(err.layer(), Layer::Npdu, "cut at {cut}");
        assert_eq!(err.root_cause(), DecodeError::BufferUnderrun, "cut at {cut}");
    }
    let msg = NpduMessage::decode(&valid).unwrap();
    assert_eq!(msg.apdu.unwrap().invoke_id(), Some(1));
}

#[test]
fn writer_reports_short_buffer() {
    let mut buf = [0u8; 4];
    let mut w = Writer::new(&mut buf);
    let req = ConfirmedRequest::new(
        1,
        ConfirmedService::ReadProperty(ReadPropertyRequest::new(
            ObjectId::new(ObjectType::Device, 1).unwrap(),
            PropertyId::ObjectName,
        )),
    );
    assert!(req.encode(&mut w).is_err());
}

#[cfg(feature = "serde")]
#[test]
fn decoded_messages_serialize() {
    let msg = NpduMessage::decode(&[0x01, 0x00, 0x10, 0x08]).unwrap();
    let json = serde_json::to_string(&msg).unwrap();
    let back: NpduMessage = serde_json::from_str(&json).unwrap();
    assert_eq!(back, msg);
}
