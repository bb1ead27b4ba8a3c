use crate::error::ProtoError;

/// Identity of an addressable subsystem.
///
/// The registry is closed: nine mock subsystems used for testing, the
/// scheduler itself, and the three real subassemblies. Each 3-character code
/// maps bijectively to a small positive id used as the routing key on the
/// message buses. Id 0 is never valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum SubsystemId {
    Nu1 = 1,
    Nu2 = 2,
    Nu3 = 3,
    Nu4 = 4,
    Nu5 = 5,
    Nu6 = 6,
    Nu7 = 7,
    Nu8 = 8,
    Nu9 = 9,
    /// The scheduler itself. Commands addressed here are handled immediately
    /// by the executive and never enter the task ring.
    Mcs = 10,
    /// Shelter controller.
    Shl = 11,
    /// Analog signal processor.
    Asp = 12,
    /// Digital processor.
    Dp = 13,
}

impl SubsystemId {
    /// Every registered subsystem, in id order.
    pub const ALL: [SubsystemId; 13] = [
        SubsystemId::Nu1,
        SubsystemId::Nu2,
        SubsystemId::Nu3,
        SubsystemId::Nu4,
        SubsystemId::Nu5,
        SubsystemId::Nu6,
        SubsystemId::Nu7,
        SubsystemId::Nu8,
        SubsystemId::Nu9,
        SubsystemId::Mcs,
        SubsystemId::Shl,
        SubsystemId::Asp,
        SubsystemId::Dp,
    ];

    pub fn from_code(code: &str) -> Result<SubsystemId, ProtoError> {
        match code {
            "NU1" => Ok(SubsystemId::Nu1),
            "NU2" => Ok(SubsystemId::Nu2),
            "NU3" => Ok(SubsystemId::Nu3),
            "NU4" => Ok(SubsystemId::Nu4),
            "NU5" => Ok(SubsystemId::Nu5),
            "NU6" => Ok(SubsystemId::Nu6),
            "NU7" => Ok(SubsystemId::Nu7),
            "NU8" => Ok(SubsystemId::Nu8),
            "NU9" => Ok(SubsystemId::Nu9),
            "MCS" => Ok(SubsystemId::Mcs),
            "SHL" => Ok(SubsystemId::Shl),
            "ASP" => Ok(SubsystemId::Asp),
            "DP_" => Ok(SubsystemId::Dp),
            other => Err(ProtoError::UnknownSubsystemCode(other.to_owned())),
        }
    }

    pub fn from_id(id: u16) -> Result<SubsystemId, ProtoError> {
        SubsystemId::ALL
            .iter()
            .copied()
            .find(|s| s.id() == id)
            .ok_or(ProtoError::UnknownSubsystemId(id))
    }

    /// The 3-character wire code.
    pub fn code(self) -> &'static str {
        match self {
            SubsystemId::Nu1 => "NU1",
            SubsystemId::Nu2 => "NU2",
            SubsystemId::Nu3 => "NU3",
            SubsystemId::Nu4 => "NU4",
            SubsystemId::Nu5 => "NU5",
            SubsystemId::Nu6 => "NU6",
            SubsystemId::Nu7 => "NU7",
            SubsystemId::Nu8 => "NU8",
            SubsystemId::Nu9 => "NU9",
            SubsystemId::Mcs => "MCS",
            SubsystemId::Shl => "SHL",
            SubsystemId::Asp => "ASP",
            SubsystemId::Dp => "DP_",
        }
    }

    pub fn id(self) -> u16 {
        self as u16
    }

    /// True for the NU1..NU9 mock subsystems, which support only PNG, RPT,
    /// and SHT.
    pub fn is_mock(self) -> bool {
        (self as u16) <= 9
    }
}

impl std::fmt::Display for SubsystemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
