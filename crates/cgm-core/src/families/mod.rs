//! Concrete transmitter families
//!
//! Each family binds one [`TransmitterFamily`] tag to a fixed set of service
//! and characteristic UUIDs and composes a
//! [`ConnectionState`](crate::ConnectionState). Parsing of
//! the family's data once connected is layered on top of these types.

mod blucon;
mod dexcom;
mod miaomiao;
mod xdrip_g4;

pub use blucon::BluconTransmitter;
pub use dexcom::{DexcomG5Transmitter, DexcomG6Transmitter};
pub use miaomiao::MiaoMiaoTransmitter;
pub use xdrip_g4::XDripG4Transmitter;

use crate::connection::KnownDevice;
use crate::error::{Result, TransmitterError};
use crate::radio::RadioProvider;
use crate::registry::TransmitterFamily;
use crate::transmitter::Transmitter;

/// Transmitter of any family, chosen at runtime
pub type DynTransmitter<R> = Box<dyn Transmitter<Radio = R> + Send>;

/// Construct a transmitter for `family`
///
/// Dexcom G5/G6 and Blucon need the transmitter id printed on the device;
/// the other families ignore it.
pub fn open<P>(
    family: TransmitterFamily,
    provider: &P,
    transmitter_id: Option<&str>,
    known: Option<KnownDevice>,
) -> Result<DynTransmitter<P::Radio>>
where
    P: RadioProvider,
    P::Radio: 'static,
{
    let required_id = || {
        transmitter_id.ok_or_else(|| TransmitterError::InvalidTransmitterId {
            id: String::new(),
            reason: "transmitter id is required for this family",
        })
    };

    let transmitter: DynTransmitter<P::Radio> = match family {
        TransmitterFamily::DexcomXDripG4 => Box::new(XDripG4Transmitter::new(provider, known)?),
        TransmitterFamily::DexcomG5 => {
            Box::new(DexcomG5Transmitter::new(provider, required_id()?, known)?)
        }
        TransmitterFamily::DexcomG6 => {
            Box::new(DexcomG6Transmitter::new(provider, required_id()?, known)?)
        }
        TransmitterFamily::Blucon => {
            Box::new(BluconTransmitter::new(provider, required_id()?, known)?)
        }
        TransmitterFamily::MiaoMiao => Box::new(MiaoMiaoTransmitter::new(provider, known)?),
    };
    Ok(transmitter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockRadioProvider;

    #[test]
    fn test_open_every_family() {
        let provider = MockRadioProvider::new();

        for family in TransmitterFamily::ALL {
            let id = match family {
                TransmitterFamily::Blucon => Some("12345"),
                _ => Some("ABCDEF"),
            };
            let transmitter = open(family, &provider, id, None).unwrap();
            assert_eq!(transmitter.transmitter_type(), family);
            assert_eq!(transmitter.is_type_limited(), family.is_type_limited());
        }

        assert_eq!(provider.sessions_opened(), TransmitterFamily::ALL.len());
    }

    #[test]
    fn test_missing_id_rejected() {
        let provider = MockRadioProvider::new();
        let result = open(TransmitterFamily::DexcomG6, &provider, None, None);
        assert!(matches!(
            result,
            Err(TransmitterError::InvalidTransmitterId { .. })
        ));
        assert_eq!(provider.sessions_opened(), 0);
    }
}
