//! Enumerated code values shared by several records.

use crate::error::{FieldError, FieldErrorKind};

/// Service class code of a batch, declaring which directions it may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceClassCode {
    MixedDebitsAndCredits,
    CreditsOnly,
    DebitsOnly,
    AutomatedAccountingAdvices,
}

impl ServiceClassCode {
    pub const fn code(self) -> u16 {
        match self {
            ServiceClassCode::MixedDebitsAndCredits => 200,
            ServiceClassCode::CreditsOnly => 220,
            ServiceClassCode::DebitsOnly => 225,
            ServiceClassCode::AutomatedAccountingAdvices => 280,
        }
    }

    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            200 => Some(ServiceClassCode::MixedDebitsAndCredits),
            220 => Some(ServiceClassCode::CreditsOnly),
            225 => Some(ServiceClassCode::DebitsOnly),
            280 => Some(ServiceClassCode::AutomatedAccountingAdvices),
            _ => None,
        }
    }

    /// Parses the numeric field, rejecting codes outside the closed set.
    pub fn parse(code: u16) -> Result<Self, FieldError> {
        Self::from_code(code)
            .ok_or_else(|| FieldError::new("ServiceClassCode", code, FieldErrorKind::InvalidValue))
    }

    pub fn permits(self, direction: Direction) -> bool {
        match self {
            ServiceClassCode::CreditsOnly => direction == Direction::Credit,
            ServiceClassCode::DebitsOnly => direction == Direction::Debit,
            ServiceClassCode::MixedDebitsAndCredits
            | ServiceClassCode::AutomatedAccountingAdvices => true,
        }
    }
}

/// Whether an entry moves money to or from the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Credit,
    Debit,
}

/// Kind of account a transaction code posts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountKind {
    Checking,
    Savings,
    GeneralLedger,
    Loan,
}

/// Decoded meaning of a two-digit transaction code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionCode {
    pub code: u8,
    pub account: AccountKind,
    pub direction: Direction,
    /// Zero-dollar prenotification or remittance entry.
    pub prenote: bool,
    /// Return or notification of change entry.
    pub automated_return: bool,
}

pub const CHECKING_CREDIT: u8 = 22;
pub const CHECKING_DEBIT: u8 = 27;
pub const SAVINGS_CREDIT: u8 = 32;
pub const SAVINGS_DEBIT: u8 = 37;

impl TransactionCode {
    /// Classifies a transaction code; `None` when the code is not defined.
    pub fn classify(code: u8) -> Option<Self> {
        let account = match code / 10 {
            2 => AccountKind::Checking,
            3 => AccountKind::Savings,
            4 => AccountKind::GeneralLedger,
            5 => AccountKind::Loan,
            _ => return None,
        };
        let (direction, automated_return, prenote) = match code % 10 {
            1 => (Direction::Credit, true, false),
            2 => (Direction::Credit, false, false),
            3 => (Direction::Credit, false, true),
            4 => (Direction::Credit, false, true),
            5 if account == AccountKind::Loan => (Direction::Debit, false, false),
            6 if account != AccountKind::Loan => (Direction::Debit, true, false),
            7 if account != AccountKind::Loan => (Direction::Debit, false, false),
            8 if account != AccountKind::Loan => (Direction::Debit, false, true),
            9 if account != AccountKind::Loan => (Direction::Debit, false, true),
            6 => (Direction::Debit, true, false),
            _ => return None,
        };
        Some(TransactionCode {
            code,
            account,
            direction,
            prenote,
            automated_return,
        })
    }

    pub fn parse(code: u8) -> Result<Self, FieldError> {
        Self::classify(code)
            .ok_or_else(|| FieldError::new("TransactionCode", code, FieldErrorKind::InvalidValue))
    }

    pub fn is_debit(&self) -> bool {
        self.direction == Direction::Debit
    }
}

const US_STATES_AND_TERRITORIES: &[&str] = &[
    "AK", "AL", "AR", "AS", "AZ", "CA", "CO", "CT", "DC", "DE", "FL", "FM", "GA", "GU", "HI",
    "IA", "ID", "IL", "IN", "KS", "KY", "LA", "MA", "MD", "ME", "MH", "MI", "MN", "MO", "MP",
    "MS", "MT", "NC", "ND", "NE", "NH", "NJ", "NM", "NV", "NY", "OH", "OK", "OR", "PA", "PR",
    "PW", "RI", "SC", "SD", "TN", "TX", "UM", "UT", "VA", "VI", "VT", "WA", "WI", "WV", "WY",
];

/// True for two-letter US state and territory codes (upper case).
pub fn is_us_state(code: &str) -> bool {
    US_STATES_AND_TERRITORIES.contains(&code)
}

/// ABA mod-10 check digit for an 8-digit routing prefix.
pub fn routing_check_digit(routing: u32) -> u8 {
    const WEIGHTS: [u32; 8] = [3, 7, 1, 3, 7, 1, 3, 7];
    let digits = format!("{:08}", routing);
    let sum: u32 = digits
        .bytes()
        .zip(WEIGHTS)
        .map(|(b, w)| u32::from(b - b'0') * w)
        .sum();
    ((10 - sum % 10) % 10) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_class_round_trip() {
        for scc in [
            ServiceClassCode::MixedDebitsAndCredits,
            ServiceClassCode::CreditsOnly,
            ServiceClassCode::DebitsOnly,
            ServiceClassCode::AutomatedAccountingAdvices,
        ] {
            assert_eq!(ServiceClassCode::from_code(scc.code()), Some(scc));
        }
        let err = ServiceClassCode::parse(0).unwrap_err();
        assert_eq!(err.field_name, "ServiceClassCode");
    }

    #[test]
    fn test_service_class_direction() {
        assert!(ServiceClassCode::DebitsOnly.permits(Direction::Debit));
        assert!(!ServiceClassCode::DebitsOnly.permits(Direction::Credit));
        assert!(ServiceClassCode::CreditsOnly.permits(Direction::Credit));
        assert!(!ServiceClassCode::CreditsOnly.permits(Direction::Debit));
        assert!(ServiceClassCode::MixedDebitsAndCredits.permits(Direction::Debit));
    }

    #[test]
    fn test_classify_transaction_codes() {
        let tc = TransactionCode::classify(CHECKING_DEBIT).unwrap();
        assert!(tc.is_debit());
        assert_eq!(tc.account, AccountKind::Checking);
        assert!(!tc.prenote);

        let tc = TransactionCode::classify(SAVINGS_CREDIT).unwrap();
        assert_eq!(tc.direction, Direction::Credit);
        assert_eq!(tc.account, AccountKind::Savings);

        assert!(TransactionCode::classify(23).unwrap().prenote);
        assert!(TransactionCode::classify(26).unwrap().automated_return);
        assert!(TransactionCode::classify(55).unwrap().is_debit());
        assert!(TransactionCode::classify(56).unwrap().automated_return);
    }

    #[test]
    fn test_undefined_transaction_codes() {
        for code in [0, 10, 20, 25, 30, 57, 58, 61, 99] {
            assert!(TransactionCode::classify(code).is_none(), "code {}", code);
        }
    }

    #[test]
    fn test_states() {
        assert!(is_us_state("VA"));
        assert!(is_us_state("PA"));
        assert!(is_us_state("PR"));
        assert!(is_us_state("WY"));
        assert!(!is_us_state("XX"));
        assert!(!is_us_state("va"));
        assert!(!is_us_state(""));
    }

    #[test]
    fn test_routing_check_digit() {
        assert_eq!(routing_check_digit(3130001), 2);
        assert_eq!(routing_check_digit(23138010), 4);
        assert_eq!(routing_check_digit(12104288), 2);
    }
}
