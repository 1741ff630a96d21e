//! Transmitter capability contract
//!
//! Every device family implements [`Transmitter`]. There are no default
//! methods: each family states its identifiers and restriction itself. The
//! shared lifecycle (scanning, event handling) comes from
//! [`ScanExt`](crate::ScanExt), available on anything implementing this trait.
//!
//! Mutable access to the connection state needs a [`ConnectionToken`], which
//! only this crate can create. Code outside the crate can implement
//! [`Transmitter`] but never calls [`Transmitter::connection_mut`], so it can
//! neither replace the state nor write identity:
//!
//! ```compile_fail
//! use cgm_core::{ConnectionState, ConnectionToken, RadioProvider, Transmitter, XDripG4Transmitter};
//!
//! fn reset<P: RadioProvider>(provider: &P) {
//!     let mut transmitter = XDripG4Transmitter::new(provider, None).unwrap();
//!     *transmitter.connection_mut(ConnectionToken(())) =
//!         ConnectionState::open(provider, None, None).unwrap();
//! }
//! ```

use crate::connection::ConnectionState;
use crate::radio::Radio;
use crate::registry::TransmitterFamily;

// ----------------------------------------------------------------------------
// Connection Token
// ----------------------------------------------------------------------------

/// Permission to mutate a transmitter's [`ConnectionState`]
///
/// Only this crate can create one.
#[derive(Debug)]
pub struct ConnectionToken(pub(crate) ());

// ----------------------------------------------------------------------------
// Transmitter Trait
// ----------------------------------------------------------------------------

/// Identifiers and capabilities of one transmitter family
///
/// ## Identifiers
///
/// All identifiers are fixed per family. The advertisement identifier may be
/// empty, meaning scans report every device; platforms only allow that while
/// the application is in the foreground.
pub trait Transmitter {
    /// Radio session type held in the connection state
    type Radio: Radio;

    /// Family tag, constant per type
    fn transmitter_type(&self) -> TransmitterFamily;

    /// Service UUID the transmitter advertises, or an empty string
    fn advertisement_uuid(&self) -> &'static str;

    /// Service to discover after connecting
    fn service_uuid(&self) -> &'static str;

    /// Characteristic the transmitter notifies data on
    fn read_characteristic_uuid(&self) -> &'static str;

    /// Characteristic commands are written to
    fn write_characteristic_uuid(&self) -> &'static str;

    /// Whether the sensor data format is vendor restricted
    fn is_type_limited(&self) -> bool;

    /// Shared connection state
    fn connection(&self) -> &ConnectionState<Self::Radio>;

    /// Shared connection state, mutable. Callable from this crate only.
    fn connection_mut(&mut self, token: ConnectionToken) -> &mut ConnectionState<Self::Radio>;
}
