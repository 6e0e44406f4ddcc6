//! # Device Command Encoder
//!
//! Encodes configuration commands for the master device.
//!
//! Commands are sent as one tagged byte stream:
//! ```text
//! [type][payload][type][payload]...
//! ```
//! Values are validated when a command is built. The device parser also
//! constrains the order of entries in one stream:
//! - a `SystemMsg` is only accepted as the last entry
//! - a `ForceAdvertise` tag ends the stream, nothing after it is read
//! - a `MacName` entry (address, name, NUL) is at most 22 bytes and must not
//!   be followed by more than that many bytes in total
//!
//! `RefPathLoss` and `EnvFactor` entries can be chained freely.

use bytes::BufMut;
use thiserror::Error;

use super::address::Address;

/// Command type tags
pub const COMMAND_SYSTEM_MSG: u8 = 0;
pub const COMMAND_REF_PATH_LOSS: u8 = 1;
pub const COMMAND_ENV_FACTOR: u8 = 2;
pub const COMMAND_MAC_NAME: u8 = 3;
pub const COMMAND_FORCE_ADVERTISE: u8 = 4;

/// Reference path loss range
pub const PATH_LOSS_MAX: u8 = 100;

/// Environment factor range
pub const ENV_FACTOR_MIN: f32 = 0.0;
pub const ENV_FACTOR_MAX: f32 = 10.0;

/// Name length range in bytes, terminator excluded
pub const NAME_MIN_LEN: usize = 1;
pub const NAME_MAX_LEN: usize = 15;

/// Name terminator; the device finds the end of a name by searching for it
pub const NAME_TERMINATOR: u8 = 0;

/// Command validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("Path loss should be between 0 and 100 (got {0})")]
    PathLossOutOfRange(u8),

    #[error("Environment factor should be between 0 and 10 (got {0})")]
    EnvFactorOutOfRange(f32),

    #[error("Name should have between 1 and 15 bytes (got {0})")]
    NameLength(usize),

    #[error("Name cannot contain a NUL character (at byte {0})")]
    NameContainsNul(usize),
}

/// Device-wide operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SystemOperation {
    Restart = 0,
    ResetScanners = 1,
    SwitchToAp = 2,
    SwitchToSta = 3,
}

/// One configuration command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    System(SystemOperation),
    RefPathLoss { address: Address, value: u8 },
    EnvFactor { address: Address, value: f32 },
    MacName { address: Address, name: String },
    ForceAdvertise { address: Address },
}

impl Command {
    /// Set the reference path loss of a scanner (0-100)
    pub fn ref_path_loss(address: Address, value: u8) -> Result<Self, CommandError> {
        if value > PATH_LOSS_MAX {
            return Err(CommandError::PathLossOutOfRange(value));
        }
        Ok(Command::RefPathLoss { address, value })
    }

    /// Set the environment factor of a scanner (0.0-10.0)
    pub fn env_factor(address: Address, value: f32) -> Result<Self, CommandError> {
        // NaN fails both comparisons
        if !(ENV_FACTOR_MIN..=ENV_FACTOR_MAX).contains(&value) {
            return Err(CommandError::EnvFactorOutOfRange(value));
        }
        Ok(Command::EnvFactor { address, value })
    }

    /// Map a display name to an address (1-15 UTF-8 bytes, no NUL)
    pub fn mac_name(address: Address, name: impl Into<String>) -> Result<Self, CommandError> {
        let name = name.into();
        if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&name.len()) {
            return Err(CommandError::NameLength(name.len()));
        }
        if let Some(pos) = name.bytes().position(|b| b == NAME_TERMINATOR) {
            return Err(CommandError::NameContainsNul(pos));
        }
        Ok(Command::MacName { address, name })
    }

    pub fn force_advertise(address: Address) -> Self {
        Command::ForceAdvertise { address }
    }

    pub fn system(operation: SystemOperation) -> Self {
        Command::System(operation)
    }

    /// Type tag of this command
    pub fn tag(&self) -> u8 {
        match self {
            Command::System(_) => COMMAND_SYSTEM_MSG,
            Command::RefPathLoss { .. } => COMMAND_REF_PATH_LOSS,
            Command::EnvFactor { .. } => COMMAND_ENV_FACTOR,
            Command::MacName { .. } => COMMAND_MAC_NAME,
            Command::ForceAdvertise { .. } => COMMAND_FORCE_ADVERTISE,
        }
    }

    /// Append `[type][payload]` to `buf`
    pub fn encode_into<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(self.tag());
        match self {
            Command::System(operation) => buf.put_u8(*operation as u8),
            Command::RefPathLoss { address, value } => {
                buf.put_slice(address.as_bytes());
                buf.put_u8(*value);
            }
            Command::EnvFactor { address, value } => {
                buf.put_slice(address.as_bytes());
                buf.put_f32_le(*value);
            }
            Command::MacName { address, name } => {
                buf.put_slice(address.as_bytes());
                buf.put_slice(name.as_bytes());
                buf.put_u8(NAME_TERMINATOR);
            }
            Command::ForceAdvertise { address } => buf.put_slice(address.as_bytes()),
        }
    }
}

/// Encode a command stream
pub fn encode_commands(commands: &[Command]) -> Vec<u8> {
    let mut buf = Vec::new();
    for command in commands {
        command.encode_into(&mut buf);
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: Address = Address::new([0x01, 0x23, 0x45, 0x67, 0x89, 0xAB]);

    #[test]
    fn test_ref_path_loss_range() {
        assert!(Command::ref_path_loss(ADDR, 0).is_ok());
        assert!(Command::ref_path_loss(ADDR, 100).is_ok());
        assert_eq!(
            Command::ref_path_loss(ADDR, 101),
            Err(CommandError::PathLossOutOfRange(101))
        );
    }

    #[test]
    fn test_env_factor_range() {
        assert!(Command::env_factor(ADDR, 0.0).is_ok());
        assert!(Command::env_factor(ADDR, 10.0).is_ok());
        assert!(Command::env_factor(ADDR, -0.1).is_err());
        assert!(Command::env_factor(ADDR, 10.5).is_err());
        assert!(Command::env_factor(ADDR, f32::NAN).is_err());
    }

    #[test]
    fn test_mac_name_length() {
        assert!(Command::mac_name(ADDR, "a").is_ok());
        assert!(Command::mac_name(ADDR, "0123456789abcde").is_ok());
        assert_eq!(Command::mac_name(ADDR, ""), Err(CommandError::NameLength(0)));
        assert_eq!(
            Command::mac_name(ADDR, "0123456789abcdef"),
            Err(CommandError::NameLength(16))
        );
    }

    #[test]
    fn test_mac_name_rejects_nul() {
        assert_eq!(
            Command::mac_name(ADDR, "a\0b"),
            Err(CommandError::NameContainsNul(1))
        );
    }

    #[test]
    fn test_longest_mac_name_fits_device_entry() {
        let bytes = encode_commands(&[Command::mac_name(ADDR, "0123456789abcde").unwrap()]);
        // Tag plus a 22-byte entry: address, 15-byte name, terminator
        assert_eq!(bytes.len(), 1 + 22);
        assert_eq!(bytes.last(), Some(&NAME_TERMINATOR));
    }

    #[test]
    fn test_encode_ref_path_loss() {
        let bytes = encode_commands(&[Command::ref_path_loss(ADDR, 42).unwrap()]);
        assert_eq!(bytes, vec![1, 0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 42]);
    }

    #[test]
    fn test_encode_env_factor() {
        let bytes = encode_commands(&[Command::env_factor(ADDR, 2.5).unwrap()]);
        assert_eq!(bytes.len(), 11);
        assert_eq!(bytes[0], COMMAND_ENV_FACTOR);
        assert_eq!(&bytes[7..11], &2.5f32.to_le_bytes());
    }

    #[test]
    fn test_encode_mac_name() {
        let bytes = encode_commands(&[Command::mac_name(ADDR, "door").unwrap()]);
        assert_eq!(bytes[0], COMMAND_MAC_NAME);
        assert_eq!(&bytes[7..], b"door\0");
    }

    /// Name length as the device reads it: bytes up to the first NUL
    fn device_name_len(entry: &[u8]) -> usize {
        entry[7..]
            .iter()
            .take(NAME_MAX_LEN + 1)
            .position(|&b| b == NAME_TERMINATOR)
            .unwrap_or(entry.len() - 7)
    }

    #[test]
    fn test_mac_name_followed_by_command_stays_in_sync() {
        let bytes = encode_commands(&[
            Command::mac_name(ADDR, "door").unwrap(),
            Command::force_advertise(ADDR),
        ]);

        assert_eq!(device_name_len(&bytes), 4);
        assert_eq!(bytes[11], NAME_TERMINATOR);
        assert_eq!(bytes[12], COMMAND_FORCE_ADVERTISE);
        assert_eq!(&bytes[13..], ADDR.as_bytes());
    }

    #[test]
    fn test_encode_stream() {
        let bytes = encode_commands(&[
            Command::ref_path_loss(ADDR, 42).unwrap(),
            Command::system(SystemOperation::ResetScanners),
        ]);
        assert_eq!(bytes, vec![1, 0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 42, 0, 1]);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CommandError::PathLossOutOfRange(120).to_string(),
            "Path loss should be between 0 and 100 (got 120)"
        );
        assert_eq!(
            CommandError::NameLength(0).to_string(),
            "Name should have between 1 and 15 bytes (got 0)"
        );
        assert_eq!(
            CommandError::NameContainsNul(3).to_string(),
            "Name cannot contain a NUL character (at byte 3)"
        );
    }
}
