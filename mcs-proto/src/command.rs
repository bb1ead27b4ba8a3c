use crate::error::ProtoError;

/// Identity of a command type.
///
/// A fixed registry of 3-character command codes. `Terminate` is internal:
/// it instructs a subsystem client to exit and never appears as an inbound
/// wire code (its outbound rendering is `SHT`, matching the shutdown it
/// follows).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum CommandId {
    Terminate = 0,
    Png = 1,
    Rpt = 2,
    Sht = 3,
    Ini = 4,
    // SHL
    Tmp = 5,
    Dif = 6,
    Pwr = 7,
    // ASP
    Fil = 8,
    At1 = 9,
    At2 = 10,
    Ats = 11,
    Fpw = 12,
    Rxp = 13,
    Fep = 14,
    // DP_
    Tbw = 15,
    Tbn = 16,
    Drx = 17,
    Bam = 18,
    Fst = 19,
    Clk = 20,
}

impl CommandId {
    /// Parses a 3-character wire code. `Terminate` has no wire code and is
    /// never produced here.
    pub fn from_code(code: &str) -> Result<CommandId, ProtoError> {
        match code {
            "PNG" => Ok(CommandId::Png),
            "RPT" => Ok(CommandId::Rpt),
            "SHT" => Ok(CommandId::Sht),
            "INI" => Ok(CommandId::Ini),
            "TMP" => Ok(CommandId::Tmp),
            "DIF" => Ok(CommandId::Dif),
            "PWR" => Ok(CommandId::Pwr),
            "FIL" => Ok(CommandId::Fil),
            "AT1" => Ok(CommandId::At1),
            "AT2" => Ok(CommandId::At2),
            "ATS" => Ok(CommandId::Ats),
            "FPW" => Ok(CommandId::Fpw),
            "RXP" => Ok(CommandId::Rxp),
            "FEP" => Ok(CommandId::Fep),
            "TBW" => Ok(CommandId::Tbw),
            "TBN" => Ok(CommandId::Tbn),
            "DRX" => Ok(CommandId::Drx),
            "BAM" => Ok(CommandId::Bam),
            "FST" => Ok(CommandId::Fst),
            "CLK" => Ok(CommandId::Clk),
            other => Err(ProtoError::UnknownCommandCode(other.to_owned())),
        }
    }

    pub fn from_id(id: u16) -> Result<CommandId, ProtoError> {
        const ALL: [CommandId; 21] = [
            CommandId::Terminate,
            CommandId::Png,
            CommandId::Rpt,
            CommandId::Sht,
            CommandId::Ini,
            CommandId::Tmp,
            CommandId::Dif,
            CommandId::Pwr,
            CommandId::Fil,
            CommandId::At1,
            CommandId::At2,
            CommandId::Ats,
            CommandId::Fpw,
            CommandId::Rxp,
            CommandId::Fep,
            CommandId::Tbw,
            CommandId::Tbn,
            CommandId::Drx,
            CommandId::Bam,
            CommandId::Fst,
            CommandId::Clk,
        ];
        ALL.iter()
            .copied()
            .find(|c| c.id() == id)
            .ok_or(ProtoError::UnknownCommandId(id))
    }

    /// The 3-character wire code used in frames and log lines.
    pub fn code(self) -> &'static str {
        match self {
            CommandId::Terminate => "SHT",
            CommandId::Png => "PNG",
            CommandId::Rpt => "RPT",
            CommandId::Sht => "SHT",
            CommandId::Ini => "INI",
            CommandId::Tmp => "TMP",
            CommandId::Dif => "DIF",
            CommandId::Pwr => "PWR",
            CommandId::Fil => "FIL",
            CommandId::At1 => "AT1",
            CommandId::At2 => "AT2",
            CommandId::Ats => "ATS",
            CommandId::Fpw => "FPW",
            CommandId::Rxp => "RXP",
            CommandId::Fep => "FEP",
            CommandId::Tbw => "TBW",
            CommandId::Tbn => "TBN",
            CommandId::Drx => "DRX",
            CommandId::Bam => "BAM",
            CommandId::Fst => "FST",
            CommandId::Clk => "CLK",
        }
    }

    pub fn id(self) -> u16 {
        self as u16
    }
}

impl std::fmt::Display for CommandId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
