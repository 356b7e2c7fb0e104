//! One Modbus transaction per call against the gripper's register blocks.

use std::time::Duration;

use crate::error::TransportError;
use crate::register::{
    ActionRequest, GripperStatus, ACTION_REQUEST_ADDRESS, BLOCK_BYTES, BLOCK_REGISTERS,
    STATUS_ADDRESS,
};
use crate::transport::Transport;

/// Encodes requests, decodes responses and bounds each transaction in time.
///
/// Failures are returned as they happen, nothing is retried here.
pub struct ProtocolClient<T> {
    transport: T,
    timeout: Duration,
}

impl<T: Transport> ProtocolClient<T> {
    pub fn new(transport: T, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Write the action request block.
    pub async fn write_action(&mut self, request: &ActionRequest) -> Result<(), TransportError> {
        let bytes = request.encode();
        log::debug!("write {:02X?} to register {}", bytes, ACTION_REQUEST_ADDRESS);
        tokio::time::timeout(
            self.timeout,
            self.transport.write(ACTION_REQUEST_ADDRESS, &bytes),
        )
        .await
        .map_err(|_| TransportError::Timeout)?
    }

    /// Read and decode the status block.
    pub async fn read_status(&mut self) -> Result<GripperStatus, TransportError> {
        let bytes = tokio::time::timeout(
            self.timeout,
            self.transport.read(STATUS_ADDRESS, BLOCK_REGISTERS),
        )
        .await
        .map_err(|_| TransportError::Timeout)??;

        let block: [u8; BLOCK_BYTES] = bytes.as_slice().try_into().map_err(|_| {
            TransportError::Malformed(format!(
                "expected {} status bytes, got {}",
                BLOCK_BYTES,
                bytes.len()
            ))
        })?;
        log::debug!("read {:02X?} from register {}", block, STATUS_ADDRESS);
        Ok(GripperStatus::decode(&block))
    }

    pub async fn disconnect(&mut self) -> Result<(), TransportError> {
        self.transport.disconnect().await
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::register::{ActivationStatus, GripperPhase};

    /// Replies with a canned payload and records what was written.
    #[derive(Default)]
    struct Canned {
        reply: Vec<u8>,
        written: Vec<(u16, Vec<u8>)>,
        reads: Vec<(u16, u16)>,
        hang: bool,
        fail: Option<TransportError>,
    }

    #[async_trait]
    impl Transport for Canned {
        async fn write(&mut self, address: u16, bytes: &[u8]) -> Result<(), TransportError> {
            if let Some(err) = self.fail.clone() {
                return Err(err);
            }
            self.written.push((address, bytes.to_vec()));
            Ok(())
        }

        async fn read(&mut self, address: u16, count: u16) -> Result<Vec<u8>, TransportError> {
            if self.hang {
                std::future::pending::<()>().await;
            }
            if let Some(err) = self.fail.clone() {
                return Err(err);
            }
            self.reads.push((address, count));
            Ok(self.reply.clone())
        }
    }

    fn client(canned: Canned) -> ProtocolClient<Canned> {
        ProtocolClient::new(canned, Duration::from_millis(50))
    }

    #[tokio::test]
    async fn writes_action_block() {
        let mut client = client(Canned::default());
        client
            .write_action(&ActionRequest::go_to_position(0x80, 0xFF, 0x10))
            .await
            .unwrap();
        assert_eq!(
            client.transport().written,
            vec![(1000, vec![0x09, 0, 0, 0x80, 0xFF, 0x10])]
        );
    }

    #[tokio::test]
    async fn reads_three_status_registers() {
        let mut client = client(Canned {
            reply: vec![0x31, 0, 0, 0, 0x03, 0],
            ..Default::default()
        });
        let status = client.read_status().await.unwrap();
        assert_eq!(client.transport().reads, vec![(2000, 3)]);
        assert_eq!(status.activation, ActivationStatus::Activated);
        assert_eq!(status.gripper, GripperPhase::Complete);
        assert_eq!(status.current_position, 0x03);
    }

    #[tokio::test]
    async fn short_and_long_replies_are_malformed() {
        for reply in [vec![0x31, 0, 0, 0], vec![0; 8], vec![]] {
            let mut client = client(Canned {
                reply,
                ..Default::default()
            });
            assert!(matches!(
                client.read_status().await,
                Err(TransportError::Malformed(_))
            ));
        }
    }

    #[tokio::test]
    async fn stalled_transaction_times_out() {
        let mut client = client(Canned {
            hang: true,
            ..Default::default()
        });
        assert_eq!(client.read_status().await, Err(TransportError::Timeout));
    }

    #[tokio::test]
    async fn link_failures_propagate_without_retry() {
        let mut client = client(Canned {
            fail: Some(TransportError::LinkFailure("port closed".into())),
            ..Default::default()
        });
        assert!(matches!(
            client.write_action(&ActionRequest::new()).await,
            Err(TransportError::LinkFailure(_))
        ));
        assert!(client.transport().written.is_empty());
    }
}
