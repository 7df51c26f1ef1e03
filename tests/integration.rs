use bytes::BytesMut;
use rumqttc::mqttbytes::v4;
use rustie_mqtt_codec::stream::{read_message, write_message};
use rustie_mqtt_codec::{CodecConfig, Connect, Header, Message, MqttError, Publish, QosLevel, Subscribe, Subscription};
use tokio::io::AsyncWriteExt;
use tokio::time::{timeout, Duration};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[tokio::test]
async fn test_stream_round_trip() {
    init_tracing();
    let config = CodecConfig::new();
    let (mut client, mut server) = tokio::io::duplex(4096);

    let messages = vec![
        Message::Connect(Connect::new("stream-client")),
        Message::Publish(Publish::new("test/topic", &b"Hello, MQTT!"[..]).with_qos(QosLevel::AtLeastOnce, 10)),
        Message::puback(10),
        Message::PingReq(Header::default()),
        Message::Disconnect(Header::default()),
    ];

    // Write everything from the client side
    for message in &messages {
        write_message(&mut client, message, &config).await.unwrap();
    }

    // Read it back in order on the server side
    for message in &messages {
        let received = timeout(Duration::from_secs(1), read_message(&mut server, &config))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(&received, message);
    }
}

#[tokio::test]
async fn test_stream_truncated_packet() {
    let config = CodecConfig::new();
    let (mut client, mut server) = tokio::io::duplex(64);

    // PUBLISH announcing ten bytes, then the peer goes away after four
    client.write_all(&[0x30, 0x0A, 0x00, 0x01, b't', b'x']).await.unwrap();
    drop(client);

    let result = read_message(&mut server, &config).await;
    assert!(matches!(result, Err(MqttError::TruncatedStream)));
}

#[tokio::test]
async fn test_stream_rejects_oversized_packet() {
    let config = CodecConfig::new().with_max_packet_size(16);
    let (mut client, mut server) = tokio::io::duplex(64);

    // remaining length of 128 without any payload behind it
    client.write_all(&[0x30, 0x80, 0x01]).await.unwrap();

    let result = read_message(&mut server, &config).await;
    assert!(matches!(result, Err(MqttError::PacketTooLarge(128))));
}

#[tokio::test]
async fn test_stream_write_validation_sends_nothing() {
    let config = CodecConfig::new();
    let (mut client, mut server) = tokio::io::duplex(64);

    let mut publish = Publish::new("t", &b"x"[..]);
    publish.header.qos = QosLevel::Reserved;
    let result = write_message(&mut client, &Message::Publish(publish), &config).await;
    assert!(matches!(result, Err(MqttError::BadQos(3))));

    // Nothing was written, so the next read sees the following message first
    write_message(&mut client, &Message::PingResp(Header::default()), &config).await.unwrap();
    let received = read_message(&mut server, &config).await.unwrap();
    assert_eq!(received, Message::PingResp(Header::default()));
}

#[test]
fn test_decode_rumqttc_publish() {
    let mut publish = rumqttc::Publish::new("rumqttc/topic", rumqttc::QoS::AtLeastOnce, "from rumqttc");
    publish.pkid = 321;
    let mut buf = BytesMut::new();
    publish.write(&mut buf).unwrap();

    let decoded = rustie_mqtt_codec::decode_read(&mut &buf[..]).unwrap();
    let expected = Publish::new("rumqttc/topic", &b"from rumqttc"[..]).with_qos(QosLevel::AtLeastOnce, 321);
    assert_eq!(decoded, Message::Publish(expected));
}

#[test]
fn test_rumqttc_decodes_our_packets() {
    let mut buf = BytesMut::new();
    Message::puback(321).encode_to(&mut buf).unwrap();
    Message::Subscribe(Subscribe::new(5, vec![Subscription::new("a/b", QosLevel::ExactlyOnce)]))
        .encode_to(&mut buf)
        .unwrap();
    Message::Publish(Publish::new("a/b", &b"payload"[..]).with_qos(QosLevel::ExactlyOnce, 6))
        .encode_to(&mut buf)
        .unwrap();

    match v4::read(&mut buf, 1024).unwrap() {
        rumqttc::Packet::PubAck(ack) => assert_eq!(ack.pkid, 321),
        other => panic!("expected PUBACK, got {:?}", other),
    }
    match v4::read(&mut buf, 1024).unwrap() {
        rumqttc::Packet::Subscribe(subscribe) => {
            assert_eq!(subscribe.pkid, 5);
            assert_eq!(subscribe.filters.len(), 1);
            assert_eq!(subscribe.filters[0].path, "a/b");
            assert_eq!(subscribe.filters[0].qos, rumqttc::QoS::ExactlyOnce);
        }
        other => panic!("expected SUBSCRIBE, got {:?}", other),
    }
    match v4::read(&mut buf, 1024).unwrap() {
        rumqttc::Packet::Publish(publish) => {
            assert_eq!(publish.topic, "a/b");
            assert_eq!(publish.pkid, 6);
            assert_eq!(publish.qos, rumqttc::QoS::ExactlyOnce);
            assert_eq!(&publish.payload[..], b"payload");
        }
        other => panic!("expected PUBLISH, got {:?}", other),
    }
    assert!(buf.is_empty());
}
