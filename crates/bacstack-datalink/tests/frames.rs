use bacstack_core::apdu::Apdu;
use bacstack_core::services::{
    ConfirmedService, ReadPropertyRequest, UnconfirmedService, WhoIsRequest,
    SERVICE_READ_PROPERTY,
};
use bacstack_core::types::{ObjectId, ObjectType, PropertyId};
use bacstack_core::Layer;
use bacstack_datalink::builder::{build_read_property, build_who_is};
use bacstack_datalink::{decode_frame, BvlcFunction};

#[test]
fn ranged_who_is_frame() {
    let frame = build_who_is(WhoIsRequest::range(10, 20)).unwrap();
    assert_eq!(
        frame,
        [
            0x81, 0x0B, 0x00, 0x10, 0x01, 0x20, 0xFF, 0xFF, 0x00, 0xFF, 0x10, 0x08, 0x09, 0x0A,
            0x19, 0x14,
        ]
    );
    let msg = decode_frame(&frame).unwrap();
    let apdu = msg.npdu.unwrap().apdu.unwrap();
    match apdu {
        Apdu::UnconfirmedRequest(req) => {
            assert_eq!(req.service, UnconfirmedService::WhoIs(WhoIsRequest::range(10, 20)));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn read_property_frame_decodes_to_request() {
    let object_id = ObjectId::new(ObjectType::AnalogInput, 3).unwrap();
    let frame =
        build_read_property(77, ReadPropertyRequest::new(object_id, PropertyId::PresentValue))
            .unwrap();
    let msg = decode_frame(&frame).unwrap();
    assert_eq!(msg.header.function, BvlcFunction::OriginalUnicastNpdu);
    assert_eq!(usize::from(msg.header.length), frame.len());
    let apdu = msg.npdu.unwrap().apdu.unwrap();
    assert_eq!(apdu.invoke_id(), Some(77));
    assert_eq!(apdu.service_choice(), SERVICE_READ_PROPERTY);
    assert_eq!(
        apdu.confirmed_service(),
        Some(&ConfirmedService::ReadProperty(ReadPropertyRequest::new(
            object_id,
            PropertyId::PresentValue
        )))
    );
}

#[test]
fn truncated_frame_reports_outer_layer_and_next_frame_decodes() {
    let frame = build_who_is(WhoIsRequest::global()).unwrap();
    for cut in 1..frame.len() {
        let err = decode_frame(&frame[..cut]).unwrap_err();
        assert_eq!(err.layer(), Layer::Bvlc, "cut at {cut}");
    }
    assert!(decode_frame(&frame).is_ok());
}
