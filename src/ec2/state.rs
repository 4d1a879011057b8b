use std::fmt;

const STATE_CODE_MASK: i32 = 0xff;

/// Instance power state decoded from the EC2 state code.
///
/// Only the low byte of the code is meaningful; the high byte carries
/// internal information and is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    Pending,
    Running,
    ShuttingDown,
    Terminated,
    Stopping,
    Stopped,
    Unknown(i32),
}

impl PowerState {
    pub fn from_code(code: i32) -> Self {
        match code & STATE_CODE_MASK {
            0 => Self::Pending,
            16 => Self::Running,
            32 => Self::ShuttingDown,
            48 => Self::Terminated,
            64 => Self::Stopping,
            80 => Self::Stopped,
            _ => Self::Unknown(code),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::ShuttingDown => "shutting-down",
            Self::Terminated => "terminated",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
            Self::Unknown(_) => "unknown",
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_codes() {
        let test_cases = vec![
            (0, PowerState::Pending),
            (16, PowerState::Running),
            (32, PowerState::ShuttingDown),
            (48, PowerState::Terminated),
            (64, PowerState::Stopping),
            (80, PowerState::Stopped),
        ];

        for (code, expected) in test_cases {
            assert_eq!(
                PowerState::from_code(code),
                expected,
                "State code {} should decode to {}",
                code,
                expected
            );
        }
    }

    #[test]
    fn test_high_byte_is_ignored() {
        assert_eq!(PowerState::from_code(0x0100 | 80), PowerState::Stopped);
        assert_eq!(PowerState::from_code(0x0200 | 16), PowerState::Running);
    }

    #[test]
    fn test_unknown_code_keeps_raw_value() {
        assert_eq!(PowerState::from_code(17), PowerState::Unknown(17));
        assert_eq!(PowerState::from_code(-1), PowerState::Unknown(-1));
    }

    #[test]
    fn test_state_names_match_ec2() {
        assert_eq!(PowerState::ShuttingDown.to_string(), "shutting-down");
        assert_eq!(PowerState::Stopped.to_string(), "stopped");
    }
}
