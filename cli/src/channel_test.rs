use super::*;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::{WebSocketStream, accept_async};

fn fast_policy(max_attempts: Option<u32>) -> ReconnectPolicy {
    ReconnectPolicy {
        initial: Duration::from_millis(10),
        max: Duration::from_millis(20),
        max_attempts,
    }
}

async fn listen() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind should succeed");
    let url = format!("ws://{}", listener.local_addr().expect("local addr"));
    (listener, url)
}

async fn accept(listener: &TcpListener) -> WebSocketStream<TcpStream> {
    let (stream, _) = timeout(Duration::from_secs(2), listener.accept())
        .await
        .expect("accept timed out")
        .expect("accept failed");
    accept_async(stream).await.expect("handshake failed")
}

fn join_alice() -> ClientEvent {
    ClientEvent::Join {
        name: "Alice".to_owned(),
    }
}

async fn next(channel: &mut Channel) -> ChannelMessage {
    timeout(Duration::from_secs(2), channel.events.recv())
        .await
        .expect("channel message timed out")
        .expect("channel task ended")
}

async fn next_lifecycle(channel: &mut Channel) -> ChannelEvent {
    let ChannelMessage::Lifecycle(event) = next(channel).await else {
        panic!("expected a lifecycle event");
    };
    event
}

async fn server_recv(server: &mut WebSocketStream<TcpStream>) -> Message {
    timeout(Duration::from_secs(2), server.next())
        .await
        .expect("server recv timed out")
        .expect("client closed")
        .expect("server recv failed")
}

#[tokio::test]
async fn json_frames_flow_both_ways() {
    let (listener, url) = listen().await;
    let mut channel = spawn_channel(url, WireFormat::Json, fast_policy(None));
    let mut server = accept(&listener).await;

    assert_eq!(
        next(&mut channel).await,
        ChannelMessage::Lifecycle(ChannelEvent::Connect)
    );
    assert!(channel.handle.is_connected());

    assert!(channel.handle.send(&join_alice()));
    let Message::Text(text) = server_recv(&mut server).await else {
        panic!("expected a text message");
    };
    let frame = frames::decode_text(&text).expect("valid json frame");
    assert!(frame.ts > 0, "outgoing frames carry a send timestamp");
    assert_eq!(
        ClientEvent::from_frame(&frame).expect("known event"),
        join_alice()
    );

    let roster = r#"{"event":"updatePlayers","data":{"players":["Alice","Bob"]}}"#;
    server
        .send(Message::text(roster.to_owned()))
        .await
        .expect("server send");
    assert_eq!(
        next(&mut channel).await,
        ChannelMessage::Server(ServerEvent::UpdatePlayers {
            players: vec!["Alice".to_owned(), "Bob".to_owned()]
        })
    );

    channel.shutdown();
}

#[tokio::test]
async fn proto_wire_uses_binary_messages() {
    let (listener, url) = listen().await;
    let mut channel = spawn_channel(url, WireFormat::Proto, fast_policy(None));
    let mut server = accept(&listener).await;
    next(&mut channel).await;

    assert!(channel.handle.send(&ClientEvent::StartGame));
    let Message::Binary(bytes) = server_recv(&mut server).await else {
        panic!("expected a binary message");
    };
    let frame = frames::decode_frame(&bytes).expect("valid proto frame");
    assert_eq!(frame.event, "startGame");

    let assign = ServerEvent::AssignCard {
        card: "card5".to_owned(),
    };
    server
        .send(Message::binary(frames::encode_frame(&assign.to_frame())))
        .await
        .expect("server send");
    assert_eq!(next(&mut channel).await, ChannelMessage::Server(assign));

    channel.shutdown();
}

#[tokio::test]
async fn undecodable_messages_are_skipped() {
    let (listener, url) = listen().await;
    let mut channel = spawn_channel(url, WireFormat::Json, fast_policy(None));
    let mut server = accept(&listener).await;
    next(&mut channel).await;

    for text in [
        "not json",
        r#"{"event":"mystery","data":{}}"#,
        r#"{"event":"gameStarted"}"#,
    ] {
        server
            .send(Message::text(text.to_owned()))
            .await
            .expect("server send");
    }

    assert_eq!(
        next(&mut channel).await,
        ChannelMessage::Server(ServerEvent::GameStarted)
    );
    channel.shutdown();
}

#[tokio::test]
async fn dropped_socket_reconnects() {
    let (listener, url) = listen().await;
    let mut channel = spawn_channel(url, WireFormat::Json, fast_policy(None));
    let server = accept(&listener).await;
    assert_eq!(next_lifecycle(&mut channel).await, ChannelEvent::Connect);

    drop(server);
    assert_eq!(next_lifecycle(&mut channel).await, ChannelEvent::Disconnect);
    assert!(!channel.handle.is_connected());
    assert!(!channel.handle.send(&ClientEvent::StartGame));
    assert_eq!(
        next_lifecycle(&mut channel).await,
        ChannelEvent::ReconnectAttempt(1)
    );

    let _server = accept(&listener).await;
    assert_eq!(next_lifecycle(&mut channel).await, ChannelEvent::Reconnect(1));
    assert!(channel.handle.is_connected());

    channel.shutdown();
}

#[tokio::test]
async fn capped_retries_report_failure() {
    let (listener, url) = listen().await;
    drop(listener);

    let mut channel = spawn_channel(url, WireFormat::Json, fast_policy(Some(1)));
    let mut seen = Vec::new();
    for _ in 0..4 {
        seen.push(next_lifecycle(&mut channel).await);
    }

    assert_eq!(
        seen,
        vec![
            ChannelEvent::ReconnectError,
            ChannelEvent::ReconnectAttempt(1),
            ChannelEvent::ReconnectError,
            ChannelEvent::ReconnectFailed,
        ]
    );
    assert!(!channel.handle.is_connected());
}
