//! Standard Entry Class rule set.
//!
//! Each SEC code maps to exactly one compiled [`SecRules`] descriptor. The
//! batch engine resolves it once from the batch header and applies it to
//! every entry.

use crate::codes::{is_us_state, AccountKind, Direction, ServiceClassCode, TransactionCode};
use crate::error::{BatchError, FieldError, FieldErrorKind};
use crate::field::is_blank_or_zeros;
use crate::records::{Addenda, AddendaType, EntryDetail};
use std::fmt;
use std::str::FromStr;

/// Standard Entry Class codes understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecCode {
    /// Accounts Receivable check conversion.
    Arc,
    /// Back Office check conversion.
    Boc,
    /// Corporate Credit or Debit.
    Ccd,
    /// Customer Initiated Entry.
    Cie,
    /// Corporate Trade Exchange.
    Ctx,
    /// Machine Transfer Entry.
    Mte,
    /// Point of Purchase check conversion.
    Pop,
    /// Point of Sale.
    Pos,
    /// Prearranged Payment and Deposit.
    Ppd,
    /// Shared Network Transaction.
    Shr,
    /// Telephone-initiated.
    Tel,
    /// Internet-initiated.
    Web,
}

impl SecCode {
    pub const ALL: [SecCode; 12] = [
        SecCode::Arc,
        SecCode::Boc,
        SecCode::Ccd,
        SecCode::Cie,
        SecCode::Ctx,
        SecCode::Mte,
        SecCode::Pop,
        SecCode::Pos,
        SecCode::Ppd,
        SecCode::Shr,
        SecCode::Tel,
        SecCode::Web,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            SecCode::Arc => "ARC",
            SecCode::Boc => "BOC",
            SecCode::Ccd => "CCD",
            SecCode::Cie => "CIE",
            SecCode::Ctx => "CTX",
            SecCode::Mte => "MTE",
            SecCode::Pop => "POP",
            SecCode::Pos => "POS",
            SecCode::Ppd => "PPD",
            SecCode::Shr => "SHR",
            SecCode::Tel => "TEL",
            SecCode::Web => "WEB",
        }
    }

    /// The rule descriptor for this class.
    pub fn rules(self) -> &'static SecRules {
        match self {
            SecCode::Arc => &ARC,
            SecCode::Boc => &BOC,
            SecCode::Ccd => &CCD,
            SecCode::Cie => &CIE,
            SecCode::Ctx => &CTX,
            SecCode::Mte => &MTE,
            SecCode::Pop => &POP,
            SecCode::Pos => &POS,
            SecCode::Ppd => &PPD,
            SecCode::Shr => &SHR,
            SecCode::Tel => &TEL,
            SecCode::Web => &WEB,
        }
    }
}

impl FromStr for SecCode {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SecCode::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| {
                FieldError::new("StandardEntryClassCode", s, FieldErrorKind::InvalidValue)
            })
    }
}

impl fmt::Display for SecCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A class-specific check on a single entry.
pub struct EntryRule {
    /// Field reported when the rule fails.
    pub field_name: &'static str,
    pub msg: &'static str,
    pub holds: fn(&EntryDetail) -> bool,
}

/// Rule descriptor for one SEC code.
pub struct SecRules {
    pub sec: SecCode,
    /// Addenda variants an originated entry may carry. Returns (Addenda99)
    /// are accepted for every class.
    pub allowed_addenda: &'static [AddendaType],
    pub max_addenda_per_entry: usize,
    /// An originated entry must carry exactly one Addenda02.
    pub requires_addenda02: bool,
    pub directions: &'static [Direction],
    pub accounts: &'static [AccountKind],
    pub allows_prenotes: bool,
    pub extra_entry_rules: &'static [EntryRule],
}

/// Highest defined transaction code.
const MAX_TRANSACTION_CODE: u8 = 59;

impl SecRules {
    /// Transaction codes this class may use in a batch of the given service class.
    pub fn allowed_transaction_codes(&self, service_class: ServiceClassCode) -> Vec<u8> {
        (0..=MAX_TRANSACTION_CODE)
            .filter_map(TransactionCode::classify)
            .filter(|tc| self.permits(service_class, tc))
            .map(|tc| tc.code)
            .collect()
    }

    pub fn permits(&self, service_class: ServiceClassCode, tc: &TransactionCode) -> bool {
        service_class.permits(tc.direction)
            && self.directions.contains(&tc.direction)
            && self.accounts.contains(&tc.account)
            && (self.allows_prenotes || !tc.prenote)
    }

    /// Classifies an entry's transaction code, rejecting codes this class
    /// or the batch's service class does not allow.
    pub fn check_transaction_code(
        &self,
        service_class: ServiceClassCode,
        entry: &EntryDetail,
        batch_number: u32,
    ) -> Result<TransactionCode, BatchError> {
        let tc = TransactionCode::classify(entry.transaction_code).ok_or_else(|| {
            BatchError::new(
                batch_number,
                "TransactionCode",
                format!("{} is not a defined transaction code", entry.transaction_code),
            )
        })?;
        if !self.permits(service_class, &tc) {
            return Err(BatchError::new(
                batch_number,
                "TransactionCode",
                format!(
                    "{} is not allowed for {} with service class code {}",
                    tc.code,
                    self.sec,
                    service_class.code()
                ),
            ));
        }
        Ok(tc)
    }

    /// Checks addenda variants, their count, and the class-specific rules.
    pub fn check_entry(&self, entry: &EntryDetail, batch_number: u32) -> Result<(), BatchError> {
        let mut originated = 0usize;
        let mut returns = 0usize;
        let mut addenda02 = 0usize;
        for addenda in &entry.addenda {
            let kind = addenda.addenda_type();
            match addenda {
                Addenda::Addenda99(_) => returns += 1,
                _ if !self.allowed_addenda.contains(&kind) => {
                    return Err(BatchError::new(
                        batch_number,
                        kind.name(),
                        format!("{} is not permitted for {} entries", kind.name(), self.sec),
                    ));
                }
                Addenda::Addenda02(_) => {
                    originated += 1;
                    addenda02 += 1;
                }
                Addenda::Addenda05(_) => originated += 1,
            }
        }

        if returns > 0 && entry.addenda.len() > 1 {
            return Err(BatchError::new(
                batch_number,
                "EntryAddendaCount",
                "a returned entry carries exactly one Addenda99",
            ));
        }
        if returns > 0
            && !TransactionCode::classify(entry.transaction_code)
                .is_some_and(|tc| tc.automated_return)
        {
            return Err(BatchError::new(
                batch_number,
                "TransactionCode",
                format!(
                    "{} is not an automated return code for an Addenda99 entry",
                    entry.transaction_code
                ),
            ));
        }
        if originated > self.max_addenda_per_entry {
            return Err(BatchError::new(
                batch_number,
                "EntryAddendaCount",
                format!(
                    "{} addenda exceed the {} limit of {} per entry",
                    originated, self.sec, self.max_addenda_per_entry
                ),
            ));
        }
        if self.requires_addenda02 && returns == 0 && addenda02 == 0 {
            return Err(BatchError::new(
                batch_number,
                "Addenda02",
                format!("{} entries require an Addenda02", self.sec),
            ));
        }

        for rule in self.extra_entry_rules {
            if !(rule.holds)(entry) {
                return Err(BatchError::new(batch_number, rule.field_name, rule.msg));
            }
        }
        Ok(())
    }
}

const BOTH: &[Direction] = &[Direction::Debit, Direction::Credit];
const DEBITS: &[Direction] = &[Direction::Debit];
const CREDITS: &[Direction] = &[Direction::Credit];

const DEPOSITS: &[AccountKind] = &[AccountKind::Checking, AccountKind::Savings];
const CHECKING: &[AccountKind] = &[AccountKind::Checking];
const ALL_ACCOUNTS: &[AccountKind] = &[
    AccountKind::Checking,
    AccountKind::Savings,
    AccountKind::GeneralLedger,
    AccountKind::Loan,
];

/// Largest check conversion amount, in cents.
const CHECK_CONVERSION_LIMIT: u64 = 2_500_000;

fn has_identification_number(entry: &EntryDetail) -> bool {
    !is_blank_or_zeros(&entry.identification_number)
}

fn has_individual_name(entry: &EntryDetail) -> bool {
    !entry.individual_name.trim().is_empty()
}

fn has_amount(entry: &EntryDetail) -> bool {
    entry.amount > 0
}

fn within_check_conversion_limit(entry: &EntryDetail) -> bool {
    entry.amount <= CHECK_CONVERSION_LIMIT
}

fn has_valid_terminal_state(entry: &EntryDetail) -> bool {
    entry.addenda.iter().all(|a| match a {
        Addenda::Addenda02(a02) => is_us_state(&a02.terminal_state),
        _ => true,
    })
}

fn has_payment_type_code(entry: &EntryDetail) -> bool {
    matches!(entry.discretionary_data.trim(), "R" | "S")
}

const RECEIVER_NAME: EntryRule = EntryRule {
    field_name: "IndividualName",
    msg: "receiver name is mandatory",
    holds: has_individual_name,
};

const CHECK_SERIAL_NUMBER: EntryRule = EntryRule {
    field_name: "IdentificationNumber",
    msg: "check serial number is mandatory",
    holds: has_identification_number,
};

const CHECK_AMOUNT_LIMIT: EntryRule = EntryRule {
    field_name: "Amount",
    msg: "check conversion amount exceeds 25000.00",
    holds: within_check_conversion_limit,
};

static ARC: SecRules = SecRules {
    sec: SecCode::Arc,
    allowed_addenda: &[],
    max_addenda_per_entry: 0,
    requires_addenda02: false,
    directions: DEBITS,
    accounts: CHECKING,
    allows_prenotes: false,
    extra_entry_rules: &[CHECK_SERIAL_NUMBER, CHECK_AMOUNT_LIMIT],
};

static BOC: SecRules = SecRules {
    sec: SecCode::Boc,
    allowed_addenda: &[],
    max_addenda_per_entry: 0,
    requires_addenda02: false,
    directions: DEBITS,
    accounts: CHECKING,
    allows_prenotes: false,
    extra_entry_rules: &[CHECK_SERIAL_NUMBER, CHECK_AMOUNT_LIMIT],
};

static CCD: SecRules = SecRules {
    sec: SecCode::Ccd,
    allowed_addenda: &[AddendaType::Addenda05],
    max_addenda_per_entry: 1,
    requires_addenda02: false,
    directions: BOTH,
    accounts: ALL_ACCOUNTS,
    allows_prenotes: true,
    extra_entry_rules: &[RECEIVER_NAME],
};

static CIE: SecRules = SecRules {
    sec: SecCode::Cie,
    allowed_addenda: &[AddendaType::Addenda05],
    max_addenda_per_entry: 1,
    requires_addenda02: false,
    directions: CREDITS,
    accounts: DEPOSITS,
    allows_prenotes: true,
    extra_entry_rules: &[],
};

static CTX: SecRules = SecRules {
    sec: SecCode::Ctx,
    allowed_addenda: &[AddendaType::Addenda05],
    max_addenda_per_entry: 9999,
    requires_addenda02: false,
    directions: BOTH,
    accounts: ALL_ACCOUNTS,
    allows_prenotes: true,
    extra_entry_rules: &[],
};

static MTE: SecRules = SecRules {
    sec: SecCode::Mte,
    allowed_addenda: &[AddendaType::Addenda02],
    max_addenda_per_entry: 1,
    requires_addenda02: true,
    directions: BOTH,
    accounts: DEPOSITS,
    allows_prenotes: false,
    extra_entry_rules: &[
        EntryRule {
            field_name: "IdentificationNumber",
            msg: "identification number cannot be all spaces or all zeros",
            holds: has_identification_number,
        },
        RECEIVER_NAME,
        EntryRule {
            field_name: "Amount",
            msg: "amount must be greater than zero",
            holds: has_amount,
        },
        EntryRule {
            field_name: "TerminalState",
            msg: "terminal state must be a US state or territory",
            holds: has_valid_terminal_state,
        },
    ],
};

static POP: SecRules = SecRules {
    sec: SecCode::Pop,
    allowed_addenda: &[],
    max_addenda_per_entry: 0,
    requires_addenda02: false,
    directions: DEBITS,
    accounts: CHECKING,
    allows_prenotes: false,
    extra_entry_rules: &[CHECK_SERIAL_NUMBER, CHECK_AMOUNT_LIMIT],
};

static POS: SecRules = SecRules {
    sec: SecCode::Pos,
    allowed_addenda: &[AddendaType::Addenda02],
    max_addenda_per_entry: 1,
    requires_addenda02: true,
    directions: BOTH,
    accounts: DEPOSITS,
    allows_prenotes: false,
    extra_entry_rules: &[],
};

static PPD: SecRules = SecRules {
    sec: SecCode::Ppd,
    allowed_addenda: &[AddendaType::Addenda05],
    max_addenda_per_entry: 1,
    requires_addenda02: false,
    directions: BOTH,
    accounts: ALL_ACCOUNTS,
    allows_prenotes: true,
    extra_entry_rules: &[RECEIVER_NAME],
};

static SHR: SecRules = SecRules {
    sec: SecCode::Shr,
    allowed_addenda: &[AddendaType::Addenda02],
    max_addenda_per_entry: 1,
    requires_addenda02: true,
    directions: BOTH,
    accounts: DEPOSITS,
    allows_prenotes: false,
    extra_entry_rules: &[],
};

static TEL: SecRules = SecRules {
    sec: SecCode::Tel,
    allowed_addenda: &[],
    max_addenda_per_entry: 0,
    requires_addenda02: false,
    directions: DEBITS,
    accounts: DEPOSITS,
    allows_prenotes: true,
    extra_entry_rules: &[RECEIVER_NAME],
};

static WEB: SecRules = SecRules {
    sec: SecCode::Web,
    allowed_addenda: &[AddendaType::Addenda05],
    max_addenda_per_entry: 1,
    requires_addenda02: false,
    directions: BOTH,
    accounts: DEPOSITS,
    allows_prenotes: true,
    extra_entry_rules: &[
        RECEIVER_NAME,
        EntryRule {
            field_name: "PaymentTypeCode",
            msg: "payment type code must be R (recurring) or S (single)",
            holds: has_payment_type_code,
        },
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::{CHECKING_CREDIT, CHECKING_DEBIT, SAVINGS_DEBIT};
    use crate::records::{Addenda02, Addenda05};

    fn entry(code: u8) -> EntryDetail {
        let mut e = EntryDetail::new(code);
        e.set_rdfi("23138010").unwrap();
        e.dfi_account_number = "12345".to_string();
        e.amount = 100;
        e.identification_number = "ID1".to_string();
        e.individual_name = "JANE DOE".to_string();
        e.set_trace_number(23138010, 1);
        e
    }

    fn addenda02() -> Addenda02 {
        Addenda02 {
            terminal_identification_code: "200509".to_string(),
            transaction_serial_number: "123456".to_string(),
            transaction_date: "1224".to_string(),
            terminal_location: "321 East Market Street".to_string(),
            terminal_city: "ANYTOWN".to_string(),
            terminal_state: "VA".to_string(),
            trace_number: 231380100000001,
            ..Addenda02::default()
        }
    }

    #[test]
    fn test_every_code_parses_to_itself() {
        for code in SecCode::ALL {
            assert_eq!(code.as_str().parse::<SecCode>().unwrap(), code);
            assert_eq!(code.rules().sec, code);
        }
        let err = "ACK".parse::<SecCode>().unwrap_err();
        assert_eq!(err.field_name, "StandardEntryClassCode");
    }

    #[test]
    fn test_mte_transaction_codes_per_service_class() {
        let rules = SecCode::Mte.rules();
        let debits = rules.allowed_transaction_codes(ServiceClassCode::DebitsOnly);
        assert!(debits.contains(&CHECKING_DEBIT));
        assert!(debits.contains(&SAVINGS_DEBIT));
        assert!(!debits.contains(&CHECKING_CREDIT));
        assert!(!debits.contains(&28));
        assert!(!debits.contains(&47));

        let credits = rules.allowed_transaction_codes(ServiceClassCode::CreditsOnly);
        assert!(credits.contains(&CHECKING_CREDIT));
        assert!(!credits.contains(&CHECKING_DEBIT));
    }

    #[test]
    fn test_debit_only_classes_reject_credits() {
        for sec in [SecCode::Arc, SecCode::Boc, SecCode::Pop, SecCode::Tel] {
            let codes = sec.rules().allowed_transaction_codes(ServiceClassCode::MixedDebitsAndCredits);
            assert!(!codes.contains(&CHECKING_CREDIT), "{}", sec);
        }
        let codes = SecCode::Cie.rules().allowed_transaction_codes(ServiceClassCode::MixedDebitsAndCredits);
        assert!(!codes.contains(&CHECKING_DEBIT));
    }

    #[test]
    fn test_check_transaction_code() {
        let rules = SecCode::Mte.rules();
        let e = entry(CHECKING_DEBIT);
        assert!(rules.check_transaction_code(ServiceClassCode::DebitsOnly, &e, 1).is_ok());
        let err = rules
            .check_transaction_code(ServiceClassCode::CreditsOnly, &e, 1)
            .unwrap_err();
        assert_eq!(err.field_name, "TransactionCode");
    }

    #[test]
    fn test_mte_addenda_rules() {
        let rules = SecCode::Mte.rules();

        let mut e = entry(CHECKING_DEBIT);
        let err = rules.check_entry(&e, 1).unwrap_err();
        assert_eq!(err.field_name, "Addenda02");

        e.add_addenda02(addenda02());
        rules.check_entry(&e, 1).unwrap();

        e.add_addenda02(addenda02());
        assert_eq!(rules.check_entry(&e, 1).unwrap_err().field_name, "EntryAddendaCount");

        let mut e = entry(CHECKING_DEBIT);
        e.add_addenda02(addenda02());
        e.add_addenda05(Addenda05::new("NOT FOR MTE"));
        assert_eq!(rules.check_entry(&e, 1).unwrap_err().field_name, "Addenda05");
    }

    #[test]
    fn test_mte_identification_number() {
        let rules = SecCode::Mte.rules();
        for bad in ["   ", "000000", ""] {
            let mut e = entry(CHECKING_DEBIT);
            e.add_addenda02(addenda02());
            e.identification_number = bad.to_string();
            let err = rules.check_entry(&e, 1).unwrap_err();
            assert_eq!(err.field_name, "IdentificationNumber", "input {:?}", bad);
        }
    }

    #[test]
    fn test_ppd_allows_one_addenda05() {
        let rules = SecCode::Ppd.rules();
        let mut e = entry(CHECKING_CREDIT);
        e.add_addenda05(Addenda05::new("ONE"));
        rules.check_entry(&e, 1).unwrap();
        e.add_addenda05(Addenda05::new("TWO"));
        assert_eq!(rules.check_entry(&e, 1).unwrap_err().field_name, "EntryAddendaCount");
    }

    #[test]
    fn test_ctx_allows_many_addenda05() {
        let rules = SecCode::Ctx.rules();
        let mut e = entry(CHECKING_CREDIT);
        for _ in 0..25 {
            e.add_addenda05(Addenda05::new("EDI SEGMENT"));
        }
        rules.check_entry(&e, 1).unwrap();
    }

    #[test]
    fn test_check_conversion_limit() {
        let rules = SecCode::Arc.rules();
        let mut e = entry(CHECKING_DEBIT);
        e.amount = CHECK_CONVERSION_LIMIT;
        rules.check_entry(&e, 1).unwrap();
        e.amount += 1;
        assert_eq!(rules.check_entry(&e, 1).unwrap_err().field_name, "Amount");
    }

    #[test]
    fn test_web_payment_type_code() {
        let rules = SecCode::Web.rules();
        let mut e = entry(CHECKING_DEBIT);
        assert_eq!(rules.check_entry(&e, 1).unwrap_err().field_name, "PaymentTypeCode");
        e.discretionary_data = "S".to_string();
        rules.check_entry(&e, 1).unwrap();
    }

    #[test]
    fn test_return_replaces_required_addenda02() {
        let rules = SecCode::Mte.rules();
        let mut e = entry(26);
        let mut ret = crate::records::Addenda99::new("R01");
        ret.original_trace = 231380100000001;
        ret.trace_number = e.trace_number;
        e.add_addenda99(ret);
        rules.check_entry(&e, 1).unwrap();

        e.add_addenda02(addenda02());
        assert_eq!(rules.check_entry(&e, 1).unwrap_err().field_name, "EntryAddendaCount");
    }

    #[test]
    fn test_return_needs_automated_return_code() {
        let rules = SecCode::Ppd.rules();
        let mut e = entry(CHECKING_DEBIT);
        e.add_addenda99(crate::records::Addenda99::new("R01"));
        assert_eq!(rules.check_entry(&e, 1).unwrap_err().field_name, "TransactionCode");

        e.transaction_code = 26;
        rules.check_entry(&e, 1).unwrap();
    }
}
