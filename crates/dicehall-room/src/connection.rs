//! The message-level connection a player is reached through.

use std::future::Future;
use std::sync::Arc;

use dicehall_protocol::{Message, PlayerId};

/// A player's connection, speaking whole [`Message`]s.
///
/// The room layer only ever sends through this trait. The server crate
/// implements it over a transport connection plus a codec; tests use
/// [`MockConnection`](crate::testing::MockConnection).
pub trait PlayerConnection: Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sends one message.
    fn send(
        &self,
        message: &Message,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Receives the next message. `Ok(None)` means the peer closed the
    /// connection.
    fn receive(
        &self,
    ) -> impl Future<Output = Result<Option<Message>, Self::Error>> + Send;

    /// Closes the connection.
    fn close(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// One outbound message bound to a resolved connection.
pub struct Delivery<C> {
    pub player_id: PlayerId,
    pub connection: Arc<C>,
    pub message: Message,
}

/// Sends every delivery in order. A failed send is logged and does not
/// stop the rest.
pub async fn deliver<C: PlayerConnection>(deliveries: Vec<Delivery<C>>) {
    for delivery in deliveries {
        if let Err(e) = delivery.connection.send(&delivery.message).await {
            tracing::warn!(
                player_id = %delivery.player_id,
                kind = delivery.message.kind(),
                error = %e,
                "failed to deliver message"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockConnection;
    use dicehall_protocol::RoomId;

    fn started(room: &str) -> Message {
        Message::GameStarted {
            room_id: RoomId::new(room),
        }
    }

    #[tokio::test]
    async fn test_deliver_continues_after_failed_send() {
        let broken = Arc::new(MockConnection::new());
        broken.fail_sends(true);
        let healthy = Arc::new(MockConnection::new());

        deliver(vec![
            Delivery {
                player_id: PlayerId(1),
                connection: Arc::clone(&broken),
                message: started("r"),
            },
            Delivery {
                player_id: PlayerId(2),
                connection: Arc::clone(&healthy),
                message: started("r"),
            },
        ])
        .await;

        assert!(broken.sent().is_empty());
        assert_eq!(healthy.sent(), vec![started("r")]);
    }
}
