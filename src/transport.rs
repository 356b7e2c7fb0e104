//! Byte level access to the gripper's register blocks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_modbus::prelude::*;
use tokio_serial::SerialPortBuilderExt;

use crate::config::GripperConfig;
use crate::error::TransportError;

/// Modbus function used to read the status block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFunction {
    /// Function code `0x03`
    #[default]
    Holding,
    /// Function code `0x04`
    Input,
}

/// A request/response link to one gripper.
///
/// `write` stores `bytes` into consecutive registers starting at `address`
/// (write multiple registers), `read` returns the bytes of `count` registers
/// starting at `address`, big-endian. Framing and CRC are the implementor's
/// concern. One transaction is outstanding at a time.
#[async_trait]
pub trait Transport: Send {
    async fn write(&mut self, address: u16, bytes: &[u8]) -> Result<(), TransportError>;

    async fn read(&mut self, address: u16, count: u16) -> Result<Vec<u8>, TransportError>;

    /// Release the underlying link.
    async fn disconnect(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
}

/// Pack bytes into big-endian registers.
fn to_registers(bytes: &[u8]) -> Result<Vec<u16>, TransportError> {
    if bytes.len() % 2 != 0 {
        return Err(TransportError::Malformed(format!(
            "odd payload length {} for register write",
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect())
}

/// Modbus RTU over a serial RS485 adapter.
pub struct ModbusRtuTransport {
    ctx: client::Context,
    status_function: StatusFunction,
}

impl ModbusRtuTransport {
    /// The Default Modbus slave ID of robotiq gripper
    pub const DEFAULT_SLAVE_ID: u8 = 9;
    /// Line speed of the gripper's RS485 interface
    pub const DEFAULT_BAUD_RATE: u32 = 115_200;

    /// Constructor from a modbus context.
    pub fn new(ctx: client::Context, status_function: StatusFunction) -> Self {
        Self {
            ctx,
            status_function,
        }
    }

    /// Open the serial port at `path` (8N1) and attach to the configured slave.
    pub fn open(path: impl Into<String>, config: &GripperConfig) -> Result<Self, std::io::Error> {
        let path = path.into();
        let port = tokio_serial::new(path.clone(), config.baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .stop_bits(tokio_serial::StopBits::One)
            .parity(tokio_serial::Parity::None)
            .timeout(config.transaction_timeout())
            .open_native_async()?;

        log::info!(
            "opened {} at {} baud, slave id {}",
            path,
            config.baud_rate,
            config.slave_id
        );
        let ctx = rtu::attach_slave(port, Slave(config.slave_id));

        Ok(Self::new(ctx, config.status_function))
    }
}

#[async_trait]
impl Transport for ModbusRtuTransport {
    async fn write(&mut self, address: u16, bytes: &[u8]) -> Result<(), TransportError> {
        let registers = to_registers(bytes)?;
        Ok(self
            .ctx
            .write_multiple_registers(address, &registers)
            .await??)
    }

    async fn read(&mut self, address: u16, count: u16) -> Result<Vec<u8>, TransportError> {
        let registers = match self.status_function {
            StatusFunction::Holding => self.ctx.read_holding_registers(address, count).await??,
            StatusFunction::Input => self.ctx.read_input_registers(address, count).await??,
        };
        Ok(registers.into_iter().flat_map(u16::to_be_bytes).collect())
    }

    async fn disconnect(&mut self) -> Result<(), TransportError> {
        Ok(self.ctx.disconnect().await??)
    }
}
