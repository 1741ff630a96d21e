//! Transmitter family tags and scan outcome codes

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseFamilyError;

// ----------------------------------------------------------------------------
// Transmitter Families
// ----------------------------------------------------------------------------

/// Supported transmitter families
///
/// One tag per device model or protocol variant. The tag of a concrete
/// transmitter type never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransmitterFamily {
    /// Dexcom G4 through an xDrip bridge
    #[serde(rename = "xdrip-g4")]
    DexcomXDripG4,
    #[serde(rename = "dexcom-g5")]
    DexcomG5,
    #[serde(rename = "dexcom-g6")]
    DexcomG6,
    /// Libre reader clip-on
    #[serde(rename = "blucon")]
    Blucon,
    /// Libre reader clip-on
    #[serde(rename = "miaomiao")]
    MiaoMiao,
}

impl TransmitterFamily {
    /// Every known family
    pub const ALL: [TransmitterFamily; 5] = [
        TransmitterFamily::DexcomXDripG4,
        TransmitterFamily::DexcomG5,
        TransmitterFamily::DexcomG6,
        TransmitterFamily::Blucon,
        TransmitterFamily::MiaoMiao,
    ];

    /// Whether transmitters of this family carry vendor-restricted sensor data
    ///
    /// Libre based readers are type limited, Dexcom and xDrip are not.
    pub fn is_type_limited(self) -> bool {
        matches!(self, TransmitterFamily::Blucon | TransmitterFamily::MiaoMiao)
    }

    /// Name used in configuration files and on the command line
    pub fn config_name(self) -> &'static str {
        match self {
            TransmitterFamily::DexcomXDripG4 => "xdrip-g4",
            TransmitterFamily::DexcomG5 => "dexcom-g5",
            TransmitterFamily::DexcomG6 => "dexcom-g6",
            TransmitterFamily::Blucon => "blucon",
            TransmitterFamily::MiaoMiao => "miaomiao",
        }
    }

    /// Short human readable label
    pub fn label(self) -> &'static str {
        match self {
            TransmitterFamily::DexcomXDripG4 => "xDrip G4",
            TransmitterFamily::DexcomG5 => "Dexcom G5",
            TransmitterFamily::DexcomG6 => "Dexcom G6",
            TransmitterFamily::Blucon => "Blucon",
            TransmitterFamily::MiaoMiao => "MiaoMiao",
        }
    }
}

impl FromStr for TransmitterFamily {
    type Err = ParseFamilyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransmitterFamily::ALL
            .into_iter()
            .find(|family| family.config_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseFamilyError(s.to_string()))
    }
}

impl fmt::Display for TransmitterFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ----------------------------------------------------------------------------
// Scan Outcomes
// ----------------------------------------------------------------------------

/// Result of a single scan attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanOutcome {
    /// A scan request was issued
    Success,
    /// A scan was already running, nothing was issued
    AlreadyScanning,
    /// The radio is not powered on, retry once its state changes
    RadioNotReady,
    /// Unexpected state, no scan was issued
    Other,
}

impl ScanOutcome {
    /// True only when this attempt issued a new scan request
    pub fn started_scan(self) -> bool {
        self == ScanOutcome::Success
    }
}

impl fmt::Display for ScanOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ScanOutcome::Success => "scan started",
            ScanOutcome::AlreadyScanning => "already scanning",
            ScanOutcome::RadioNotReady => "radio not powered on",
            ScanOutcome::Other => "scan not started",
        };
        f.write_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_limited_families() {
        let limited: Vec<_> = TransmitterFamily::ALL
            .iter()
            .filter(|family| family.is_type_limited())
            .collect();
        assert_eq!(
            limited,
            vec![&TransmitterFamily::Blucon, &TransmitterFamily::MiaoMiao]
        );
    }

    #[test]
    fn test_family_config_names() {
        use serde::de::value::{Error as ValueError, StrDeserializer};
        use serde::de::IntoDeserializer;

        let cases = [
            ("xdrip-g4", TransmitterFamily::DexcomXDripG4),
            ("dexcom-g5", TransmitterFamily::DexcomG5),
            ("dexcom-g6", TransmitterFamily::DexcomG6),
            ("blucon", TransmitterFamily::Blucon),
            ("miaomiao", TransmitterFamily::MiaoMiao),
        ];

        for (name, expected) in cases {
            let deserializer: StrDeserializer<'_, ValueError> = name.into_deserializer();
            assert_eq!(TransmitterFamily::deserialize(deserializer).unwrap(), expected);
        }
    }

    #[test]
    fn test_parse_config_names() {
        for family in TransmitterFamily::ALL {
            assert_eq!(family.config_name().parse::<TransmitterFamily>().unwrap(), family);
        }
        assert_eq!(
            "MiaoMiao".parse::<TransmitterFamily>().unwrap(),
            TransmitterFamily::MiaoMiao
        );
        assert!("libre2".parse::<TransmitterFamily>().is_err());
    }

    #[test]
    fn test_only_success_starts_scan() {
        assert!(ScanOutcome::Success.started_scan());
        assert!(!ScanOutcome::AlreadyScanning.started_scan());
        assert!(!ScanOutcome::RadioNotReady.started_scan());
        assert!(!ScanOutcome::Other.started_scan());
    }
}
