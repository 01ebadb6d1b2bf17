//! Bridges a byte-level transport connection to the room layer's
//! message-level [`PlayerConnection`].

use dicehall_protocol::{Codec, Message};
use dicehall_room::PlayerConnection;
use dicehall_transport::{Connection, ConnectionId, TransportError};

use crate::DicehallError;

/// A transport connection plus the codec that frames its messages.
pub struct CodecConnection<T, K> {
    inner: T,
    codec: K,
}

impl<T: Connection, K: Codec> CodecConnection<T, K> {
    pub fn new(inner: T, codec: K) -> Self {
        Self { inner, codec }
    }

    pub fn id(&self) -> ConnectionId {
        self.inner.id()
    }
}

impl<T, K> PlayerConnection for CodecConnection<T, K>
where
    T: Connection<Error = TransportError>,
    K: Codec,
{
    type Error = DicehallError;

    async fn send(&self, message: &Message) -> Result<(), Self::Error> {
        let bytes = self.codec.encode(message)?;
        self.inner.send(&bytes).await?;
        Ok(())
    }

    /// Frames that don't decode are logged and skipped.
    async fn receive(&self) -> Result<Option<Message>, Self::Error> {
        loop {
            let Some(data) = self.inner.recv().await? else {
                return Ok(None);
            };
            match self.codec.decode::<Message>(&data) {
                Ok(message) => return Ok(Some(message)),
                Err(e) => {
                    tracing::debug!(
                        conn_id = %self.inner.id(),
                        error = %e,
                        "dropping undecodable frame"
                    );
                }
            }
        }
    }

    async fn close(&self) -> Result<(), Self::Error> {
        self.inner.close().await?;
        Ok(())
    }
}
