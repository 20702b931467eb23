//! Complete outbound frames: BVLC + NPDU + APDU, in that order.
//!
//! This is the only place that decides whether a service goes out as a
//! unicast or a broadcast. Broadcast services (Who-Is, I-Am) get a global
//! broadcast NPDU and `Original-Broadcast-NPDU`; everything else a default
//! NPDU and `Original-Unicast-NPDU`.

use crate::bip::bvlc::{encode_frame, BvlcFunction, BvlcMessage};
use bacstack_core::apdu::{Apdu, ComplexAck, ConfirmedRequest, SimpleAck, UnconfirmedRequest};
use bacstack_core::encoding::writer::encode_to_vec;
use bacstack_core::npdu::Npdu;
use bacstack_core::services::{
    ComplexAckService, ConfirmedService, CovNotificationRequest, IAmRequest, ReadPropertyAck,
    ReadPropertyRequest, SubscribeCovRequest, UnconfirmedService, WhoIsRequest,
    WritePropertyRequest,
};
use bacstack_core::{EncodeError, ProtocolError};

/// Scratch size for one APDU; matches the largest BACnet/IP APDU.
const MAX_APDU_LEN: usize = 1476;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delivery {
    Unicast,
    Broadcast,
}

fn build(apdu: &Apdu, delivery: Delivery) -> Result<Vec<u8>, EncodeError> {
    let apdu_bytes = encode_to_vec::<MAX_APDU_LEN>(|w| apdu.encode(w))?;
    let (npdu, function) = match delivery {
        Delivery::Unicast => (Npdu::default(), BvlcFunction::OriginalUnicastNpdu),
        Delivery::Broadcast => (Npdu::global_broadcast(), BvlcFunction::OriginalBroadcastNpdu),
    };
    let npdu_bytes = encode_to_vec::<32>(|w| npdu.encode(w))?;
    encode_frame(function, &npdu_bytes, &apdu_bytes)
}

fn confirmed(invoke_id: u8, service: ConfirmedService) -> Result<Vec<u8>, EncodeError> {
    build(
        &Apdu::ConfirmedRequest(ConfirmedRequest::new(invoke_id, service)),
        Delivery::Unicast,
    )
}

fn unconfirmed(service: UnconfirmedService, delivery: Delivery) -> Result<Vec<u8>, EncodeError> {
    build(
        &Apdu::UnconfirmedRequest(UnconfirmedRequest::new(service)),
        delivery,
    )
}

pub fn build_who_is(request: WhoIsRequest) -> Result<Vec<u8>, EncodeError> {
    unconfirmed(UnconfirmedService::WhoIs(request), Delivery::Broadcast)
}

pub fn build_i_am(request: IAmRequest) -> Result<Vec<u8>, EncodeError> {
    unconfirmed(UnconfirmedService::IAm(request), Delivery::Broadcast)
}

pub fn build_read_property(
    invoke_id: u8,
    request: ReadPropertyRequest,
) -> Result<Vec<u8>, EncodeError> {
    confirmed(invoke_id, ConfirmedService::ReadProperty(request))
}

pub fn build_write_property(
    invoke_id: u8,
    request: WritePropertyRequest,
) -> Result<Vec<u8>, EncodeError> {
    confirmed(invoke_id, ConfirmedService::WriteProperty(request))
}

pub fn build_subscribe_cov(
    invoke_id: u8,
    request: SubscribeCovRequest,
) -> Result<Vec<u8>, EncodeError> {
    confirmed(invoke_id, ConfirmedService::SubscribeCov(request))
}

pub fn build_read_property_ack(
    invoke_id: u8,
    ack: ReadPropertyAck,
) -> Result<Vec<u8>, EncodeError> {
    build(
        &Apdu::ComplexAck(ComplexAck::new(invoke_id, ComplexAckService::ReadProperty(ack))),
        Delivery::Unicast,
    )
}

pub fn build_simple_ack(invoke_id: u8, service_choice: u8) -> Result<Vec<u8>, EncodeError> {
    build(
        &Apdu::SimpleAck(SimpleAck {
            invoke_id,
            service_choice,
        }),
        Delivery::Unicast,
    )
}

pub fn build_cov_notification(request: CovNotificationRequest) -> Result<Vec<u8>, EncodeError> {
    unconfirmed(UnconfirmedService::CovNotification(request), Delivery::Unicast)
}

/// Inverse of the builders: decodes a whole datagram.
pub fn decode_frame(bytes: &[u8]) -> Result<BvlcMessage, ProtocolError> {
    BvlcMessage::decode(bytes)
}

#[cfg(test)]
mod tests {
    use super::{
        build_cov_notification, build_i_am, build_read_property, build_read_property_ack,
        build_simple_ack, build_subscribe_cov, build_who_is, build_write_property, decode_frame,
    };
    use crate::bip::bvlc::BvlcFunction;
    use bacstack_core::apdu::{Apdu, ApduType};
    use bacstack_core::services::{
        CovNotificationRequest, CovPropertyValue, IAmRequest, ReadPropertyAck,
        ReadPropertyRequest, SubscribeCovRequest, WhoIsRequest, WritePropertyRequest,
        SERVICE_I_AM, SERVICE_WHO_IS, SERVICE_WRITE_PROPERTY,
    };
    use bacstack_core::types::{ObjectId, ObjectType, PropertyId};
    use bacstack_core::value::Value;

    fn device(instance: u32) -> ObjectId {
        ObjectId::new(ObjectType::Device, instance).unwrap()
    }

    fn apdu_of(frame: &[u8]) -> (BvlcFunction, Apdu) {
        let msg = decode_frame(frame).unwrap();
        let npdu = msg.npdu.unwrap();
        (msg.header.function, npdu.apdu.unwrap())
    }

    #[test]
    fn who_is_is_a_global_broadcast() {
        let frame = build_who_is(WhoIsRequest::global()).unwrap();
        assert_eq!(
            frame,
            [0x81, 0x0B, 0x00, 0x0C, 0x01, 0x20, 0xFF, 0xFF, 0x00, 0xFF, 0x10, 0x08]
        );
        let (function, apdu) = apdu_of(&frame);
        assert_eq!(function, BvlcFunction::OriginalBroadcastNpdu);
        assert_eq!(apdu.service_choice(), SERVICE_WHO_IS);
    }

    #[test]
    fn i_am_is_a_global_broadcast() {
        let frame = build_i_am(IAmRequest {
            device_id: device(9999),
            max_apdu: 1476,
            segmentation: 3,
            vendor_id: 15,
        })
        .unwrap();
        let msg = decode_frame(&frame).unwrap();
        let npdu = msg.npdu.unwrap();
        assert_eq!(npdu.header.destination.unwrap().network, 0xFFFF);
        assert_eq!(npdu.header.hop_count, Some(0xFF));
        assert_eq!(npdu.apdu.unwrap().service_choice(), SERVICE_I_AM);
    }

    #[test]
    fn read_property_is_unicast_with_literal_apdu() {
        let frame =
            build_read_property(1, ReadPropertyRequest::new(device(9999), PropertyId::ObjectName))
                .unwrap();
        assert_eq!(
            frame,
            [
                0x81, 0x0A, 0x00, 0x11, 0x01, 0x00, 0x00, 0x05, 0x01, 0x0c, 0x0c, 0x02, 0x00,
                0x27, 0x0f, 0x19, 0x4d,
            ]
        );
    }

    #[test]
    fn confirmed_builders_carry_invoke_id() {
        let write = build_write_property(
            9,
            WritePropertyRequest::new(
                ObjectId::new(ObjectType::AnalogValue, 1).unwrap(),
                PropertyId::PresentValue,
                Value::real(21.0).unwrap(),
            ),
        )
        .unwrap();
        let (function, apdu) = apdu_of(&write);
        assert_eq!(function, BvlcFunction::OriginalUnicastNpdu);
        assert_eq!(apdu.invoke_id(), Some(9));
        assert_eq!(apdu.service_choice(), SERVICE_WRITE_PROPERTY);

        let sub = build_subscribe_cov(
            10,
            SubscribeCovRequest::new(
                1,
                ObjectId::new(ObjectType::AnalogInput, 0).unwrap(),
                false,
                300,
            ),
        )
        .unwrap();
        assert_eq!(apdu_of(&sub).1.invoke_id(), Some(10));
    }

    #[test]
    fn responses_decode_back() {
        let ack = build_read_property_ack(
            4,
            ReadPropertyAck {
                object_id: device(9999),
                property_id: PropertyId::ObjectName,
                array_index: None,
                values: vec![Value::character_string("bench")],
            },
        )
        .unwrap();
        assert_eq!(apdu_of(&ack).1.service_type(), ApduType::ComplexAck);

        let simple = build_simple_ack(4, SERVICE_WRITE_PROPERTY).unwrap();
        assert_eq!(&simple[6..], &[0x20, 0x04, 0x0F]);

        let cov = build_cov_notification(CovNotificationRequest {
            subscriber_process_id: 1,
            initiating_device_id: device(1),
            monitored_object_id: ObjectId::new(ObjectType::AnalogInput, 0).unwrap(),
            time_remaining_seconds: 60,
            values: vec![CovPropertyValue::new(
                PropertyId::PresentValue,
                Value::real(1.0).unwrap(),
            )],
        })
        .unwrap();
        let (function, apdu) = apdu_of(&cov);
        assert_eq!(function, BvlcFunction::OriginalUnicastNpdu);
        assert_eq!(apdu.service_type(), ApduType::UnconfirmedRequest);
    }
}
