//! Integration tests for the server, handler and full connection flow.

use std::time::Duration;

use dicehall::prelude::*;
use dicehall_room::testing::ScriptedDice;
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite;

// =========================================================================
// Helpers
// =========================================================================

type ClientWs = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// Starts a server on a random port whose dice always show `faces`.
async fn start_server(faces: &[u8]) -> String {
    let server = DicehallServerBuilder::new()
        .bind("127.0.0.1:0")
        .dice_source(ScriptedDice::new(faces.iter().copied()).factory())
        .build()
        .await
        .expect("server should build");

    let addr = server
        .local_addr()
        .expect("should have local addr")
        .to_string();

    tokio::spawn(async move {
        let _ = server.run().await;
    });

    // Give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(10)).await;
    addr
}

/// Connects and consumes the `ServerJoin` greeting.
async fn connect(addr: &str) -> (ClientWs, PlayerInfo) {
    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .expect("should connect");
    match recv(&mut ws).await {
        Message::ServerJoin { player } => (ws, player),
        other => panic!("expected ServerJoin, got {other:?}"),
    }
}

async fn send(ws: &mut ClientWs, msg: &Message) {
    let text = serde_json::to_string(msg).expect("encode");
    ws.send(tungstenite::Message::Text(text.into()))
        .await
        .expect("send");
}

async fn recv(ws: &mut ClientWs) -> Message {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(2), ws.next())
            .await
            .expect("timed out waiting for a message")
            .expect("stream ended")
            .expect("recv");
        match frame {
            tungstenite::Message::Binary(_) | tungstenite::Message::Text(_) => {
                return serde_json::from_slice(&frame.into_data()).expect("decode");
            }
            _ => continue,
        }
    }
}

/// Receives messages until one of `kind` arrives, returning it.
async fn recv_kind(ws: &mut ClientWs, kind: &str) -> Message {
    loop {
        let msg = recv(ws).await;
        if msg.kind() == kind {
            return msg;
        }
    }
}

/// Seats two fresh players in a started game. Returns (room, A, B).
async fn start_game(addr: &str) -> (RoomId, ClientWs, ClientWs) {
    let (mut a, _) = connect(addr).await;
    let (mut b, _) = connect(addr).await;

    send(&mut a, &Message::CreateRoom).await;
    let room_id = match recv(&mut a).await {
        Message::RoomCreated { room_id, .. } => room_id,
        other => panic!("expected RoomCreated, got {other:?}"),
    };
    recv_kind(&mut a, "RoomJoined").await;

    send(
        &mut b,
        &Message::JoinRoom {
            room_id: room_id.clone(),
        },
    )
    .await;
    recv_kind(&mut b, "UpdateScorecard").await;
    recv_kind(&mut a, "TurnStarted").await;
    (room_id, a, b)
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_connect_assigns_distinct_players() {
    let addr = start_server(&[1]).await;
    let (_a, first) = connect(&addr).await;
    let (_b, second) = connect(&addr).await;

    assert_ne!(first.id, second.id);
    assert_eq!(first.name, format!("Player {}", first.id.0));
    assert_eq!(first.scorecard, Scorecard::new());
}

#[tokio::test]
async fn test_create_and_join_starts_game() {
    let addr = start_server(&[1]).await;
    let (mut a, alice) = connect(&addr).await;
    let (mut b, bob) = connect(&addr).await;

    send(&mut a, &Message::CreateRoom).await;
    let room_id = match recv(&mut a).await {
        Message::RoomCreated { room_id, player } => {
            assert_eq!(player.id, alice.id);
            room_id
        }
        other => panic!("expected RoomCreated, got {other:?}"),
    };
    assert_eq!(recv(&mut a).await.kind(), "RoomJoined");

    send(
        &mut b,
        &Message::JoinRoom {
            room_id: room_id.clone(),
        },
    )
    .await;

    let b_kinds: Vec<&str> = [
        recv(&mut b).await,
        recv(&mut b).await,
        recv(&mut b).await,
    ]
    .iter()
    .map(Message::kind)
    .collect();
    assert_eq!(b_kinds, vec!["RoomJoined", "GameStarted", "UpdateScorecard"]);

    match recv(&mut a).await {
        Message::PlayerJoinedRoom { player, .. } => assert_eq!(player.id, bob.id),
        other => panic!("expected PlayerJoinedRoom, got {other:?}"),
    }
    assert_eq!(recv(&mut a).await.kind(), "GameStarted");
    assert_eq!(recv(&mut a).await.kind(), "UpdateScorecard");
    match recv(&mut a).await {
        Message::TurnStarted { room_id: r, player } => {
            assert_eq!(r, room_id);
            assert_eq!(player.id, alice.id);
        }
        other => panic!("expected TurnStarted, got {other:?}"),
    }
}

#[tokio::test]
async fn test_roll_and_score_over_the_wire() {
    let addr = start_server(&[3, 3, 5, 5, 5]).await;
    let (room_id, mut a, mut b) = start_game(&addr).await;

    send(
        &mut a,
        &Message::RollDice {
            room_id: room_id.clone(),
        },
    )
    .await;
    for ws in [&mut a, &mut b] {
        match recv_kind(ws, "DiceRolled").await {
            Message::DiceRolled {
                dice, dice_rolls, ..
            } => {
                assert_eq!(dice_rolls, 1);
                let faces: Vec<u8> = dice.iter().map(|d| d.value).collect();
                assert_eq!(faces, vec![3, 3, 5, 5, 5]);
            }
            other => panic!("expected DiceRolled, got {other:?}"),
        }
    }

    send(
        &mut a,
        &Message::ChooseCategory {
            room_id: room_id.clone(),
            category: ScoreCategory::FullHouse,
        },
    )
    .await;

    match recv_kind(&mut b, "UpdateScorecard").await {
        Message::UpdateScorecard { players, .. } => {
            assert_eq!(players[0].scorecard.score(ScoreCategory::FullHouse), Some(25));
            assert_eq!(players[1].scorecard.total(), 0);
        }
        other => panic!("expected UpdateScorecard, got {other:?}"),
    }
    assert_eq!(recv(&mut b).await.kind(), "TurnStarted");
}

#[tokio::test]
async fn test_out_of_turn_roll_is_ignored() {
    let addr = start_server(&[2]).await;
    let (room_id, mut a, mut b) = start_game(&addr).await;

    send(
        &mut b,
        &Message::RollDice {
            room_id: room_id.clone(),
        },
    )
    .await;
    send(&mut b, &Message::ListRooms).await;

    // The next thing B hears is the room list, not a roll.
    assert_eq!(recv(&mut b).await.kind(), "RoomList");

    send(&mut a, &Message::ListRooms).await;
    assert_eq!(recv(&mut a).await.kind(), "RoomList");
}

#[tokio::test]
async fn test_malformed_frame_is_skipped() {
    let addr = start_server(&[1]).await;
    let (mut ws, _) = connect(&addr).await;

    ws.send(tungstenite::Message::Text("not json".into()))
        .await
        .expect("send");
    send(&mut ws, &Message::ListRooms).await;

    match recv(&mut ws).await {
        Message::RoomList { rooms } => assert!(rooms.is_empty()),
        other => panic!("expected RoomList, got {other:?}"),
    }
}

#[tokio::test]
async fn test_abrupt_disconnect_ends_game_for_others() {
    let addr = start_server(&[4]).await;
    let (room_id, mut a, b) = start_game(&addr).await;

    drop(b);

    match recv_kind(&mut a, "PlayerLeftRoom").await {
        Message::PlayerLeftRoom { room_id: r, .. } => assert_eq!(r, room_id),
        other => panic!("expected PlayerLeftRoom, got {other:?}"),
    }
    assert_eq!(recv(&mut a).await.kind(), "GameOver");
}

#[tokio::test]
async fn test_last_leave_removes_room_from_listing() {
    let addr = start_server(&[1]).await;
    let (mut a, _) = connect(&addr).await;

    send(&mut a, &Message::CreateRoom).await;
    let room_id = match recv(&mut a).await {
        Message::RoomCreated { room_id, .. } => room_id,
        other => panic!("expected RoomCreated, got {other:?}"),
    };
    recv_kind(&mut a, "RoomJoined").await;

    send(&mut a, &Message::ListRooms).await;
    match recv(&mut a).await {
        Message::RoomList { rooms } => assert_eq!(rooms, vec![room_id.clone()]),
        other => panic!("expected RoomList, got {other:?}"),
    }

    send(
        &mut a,
        &Message::LeaveRoom {
            room_id: room_id.clone(),
        },
    )
    .await;
    assert_eq!(recv(&mut a).await.kind(), "RoomLeft");

    send(&mut a, &Message::ListRooms).await;
    match recv(&mut a).await {
        Message::RoomList { rooms } => assert!(rooms.is_empty()),
        other => panic!("expected RoomList, got {other:?}"),
    }
}
