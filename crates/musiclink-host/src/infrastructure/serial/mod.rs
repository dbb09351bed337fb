//! Serial link to the display device.
//!
//! - **`discovery`** – picks the device's port out of `serialport::available_ports`
//!   and opens it as a [`SerialConnector`].
//! - **`transport`** – newline framing over an open port.
//! - **`mock`** – in-memory transport and connector for tests.

pub mod discovery;
pub mod mock;
pub mod transport;

pub use discovery::SerialConnector;
pub use transport::SerialTransport;
