//! Per-user display and locale preferences.

use crate::{Error, auth::UserID, timezone::is_known_timezone};

/// A field whose value must be one of a fixed set of choices.
pub trait Choice: Sized + Copy + PartialEq + 'static {
    /// Every choice, in the order they are presented to the user.
    const ALL: &'static [Self];

    /// The value stored in the database and submitted in forms.
    fn value(self) -> &'static str;

    /// The text shown to the user.
    fn label(self) -> &'static str;
}

/// Find the choice for `field` whose value is `value`.
///
/// # Errors
///
/// Returns [Error::InvalidChoice] if no choice has the value `value`.
pub fn parse_choice<T: Choice>(field: &'static str, value: &str) -> Result<T, Error> {
    T::ALL
        .iter()
        .copied()
        .find(|choice| choice.value() == value)
        .ok_or_else(|| Error::InvalidChoice {
            field,
            value: value.to_owned(),
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFormat {
    /// Use the short date format of the user's language.
    #[default]
    Auto,
    DayMonthYear,
    MonthDayYear,
    YearMonthDay,
    DayMonthYearDotted,
}

impl Choice for DateFormat {
    const ALL: &'static [Self] = &[
        Self::Auto,
        Self::DayMonthYear,
        Self::MonthDayYear,
        Self::YearMonthDay,
        Self::DayMonthYearDotted,
    ];

    fn value(self) -> &'static str {
        match self {
            Self::Auto => "SHORT_DATE_FORMAT",
            Self::DayMonthYear => "d/m/Y",
            Self::MonthDayYear => "m/d/Y",
            Self::YearMonthDay => "Y-m-d",
            Self::DayMonthYearDotted => "d.m.Y",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Auto => "Auto",
            Self::DayMonthYear => "20/01/2025",
            Self::MonthDayYear => "01/20/2025",
            Self::YearMonthDay => "2025-01-20",
            Self::DayMonthYearDotted => "20.01.2025",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateTimeFormat {
    /// Use the short date and time format of the user's language.
    #[default]
    Auto,
    DayMonthYear,
    MonthDayYear12Hour,
    YearMonthDay,
    DayMonthYearDotted,
}

impl Choice for DateTimeFormat {
    const ALL: &'static [Self] = &[
        Self::Auto,
        Self::DayMonthYear,
        Self::MonthDayYear12Hour,
        Self::YearMonthDay,
        Self::DayMonthYearDotted,
    ];

    fn value(self) -> &'static str {
        match self {
            Self::Auto => "SHORT_DATETIME_FORMAT",
            Self::DayMonthYear => "d/m/Y H:i",
            Self::MonthDayYear12Hour => "m/d/Y h:i A",
            Self::YearMonthDay => "Y-m-d H:i",
            Self::DayMonthYearDotted => "d.m.Y H:i",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Auto => "Auto",
            Self::DayMonthYear => "20/01/2025 15:30",
            Self::MonthDayYear12Hour => "01/20/2025 03:30 PM",
            Self::YearMonthDay => "2025-01-20 15:30",
            Self::DayMonthYearDotted => "20.01.2025 15:30",
        }
    }
}

/// The decimal and thousands separators used for amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberFormat {
    #[default]
    Auto,
    DotThousandsCommaDecimal,
    CommaThousandsDotDecimal,
    SpaceThousandsDotDecimal,
    SpaceThousandsCommaDecimal,
}

impl Choice for NumberFormat {
    const ALL: &'static [Self] = &[
        Self::Auto,
        Self::DotThousandsCommaDecimal,
        Self::CommaThousandsDotDecimal,
        Self::SpaceThousandsDotDecimal,
        Self::SpaceThousandsCommaDecimal,
    ];

    fn value(self) -> &'static str {
        match self {
            Self::Auto => "AA",
            Self::DotThousandsCommaDecimal => "DC",
            Self::CommaThousandsDotDecimal => "CD",
            Self::SpaceThousandsDotDecimal => "SD",
            Self::SpaceThousandsCommaDecimal => "SC",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Auto => "Auto",
            Self::DotThousandsCommaDecimal => "1.234,50",
            Self::CommaThousandsDotDecimal => "1,234.50",
            Self::SpaceThousandsDotDecimal => "1 234.50",
            Self::SpaceThousandsCommaDecimal => "1 234,50",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    /// Use the language requested by the browser.
    #[default]
    Auto,
    English,
    BrazilianPortuguese,
    Dutch,
    German,
    Spanish,
    French,
}

impl Choice for Language {
    const ALL: &'static [Self] = &[
        Self::Auto,
        Self::English,
        Self::BrazilianPortuguese,
        Self::Dutch,
        Self::German,
        Self::Spanish,
        Self::French,
    ];

    fn value(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::English => "en",
            Self::BrazilianPortuguese => "pt-br",
            Self::Dutch => "nl",
            Self::German => "de",
            Self::Spanish => "es",
            Self::French => "fr",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Auto => "Auto",
            Self::English => "English",
            Self::BrazilianPortuguese => "Português (Brasil)",
            Self::Dutch => "Nederlands",
            Self::German => "Deutsch",
            Self::Spanish => "Español",
            Self::French => "Français",
        }
    }
}

/// The page the user lands on after logging in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartPage {
    #[default]
    Monthly,
    YearlyByCurrency,
    YearlyByAccount,
    NetWorthCurrent,
    NetWorthProjected,
    AllTransactions,
    Calendar,
}

impl Choice for StartPage {
    const ALL: &'static [Self] = &[
        Self::Monthly,
        Self::YearlyByCurrency,
        Self::YearlyByAccount,
        Self::NetWorthCurrent,
        Self::NetWorthProjected,
        Self::AllTransactions,
        Self::Calendar,
    ];

    fn value(self) -> &'static str {
        match self {
            Self::Monthly => "MONTHLY_OVERVIEW",
            Self::YearlyByCurrency => "YEARLY_OVERVIEW_CURRENCY",
            Self::YearlyByAccount => "YEARLY_OVERVIEW_ACCOUNT",
            Self::NetWorthCurrent => "NETWORTH_CURRENT",
            Self::NetWorthProjected => "NETWORTH_PROJECTED",
            Self::AllTransactions => "ALL_TRANSACTIONS",
            Self::Calendar => "CALENDAR",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Monthly => "Monthly",
            Self::YearlyByCurrency => "Yearly by currency",
            Self::YearlyByAccount => "Yearly by account",
            Self::NetWorthCurrent => "Current Net Worth",
            Self::NetWorthProjected => "Projected Net Worth",
            Self::AllTransactions => "All Transactions",
            Self::Calendar => "Calendar",
        }
    }
}

/// The value stored for [TimezoneSetting::Auto].
pub const AUTO_TIMEZONE: &str = "auto";

/// The timezone dates are displayed in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TimezoneSetting {
    /// Use the server's timezone.
    #[default]
    Auto,
    /// A canonical timezone name, e.g. "Europe/Lisbon".
    Named(String),
}

impl TimezoneSetting {
    /// Parse "auto" or a canonical timezone name.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidChoice] if `value` is not a known timezone.
    pub fn parse(value: &str) -> Result<Self, Error> {
        let value = value.trim();

        if value == AUTO_TIMEZONE {
            Ok(Self::Auto)
        } else if is_known_timezone(value) {
            Ok(Self::Named(value.to_owned()))
        } else {
            Err(Error::InvalidChoice {
                field: "timezone",
                value: value.to_owned(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Auto => AUTO_TIMEZONE,
            Self::Named(name) => name,
        }
    }
}

/// A user's preferences.
///
/// Every user has exactly one set of settings.
#[derive(Debug, Clone, PartialEq)]
pub struct UserSettings {
    pub user_id: UserID,
    pub hide_amounts: bool,
    pub mute_sounds: bool,
    pub date_format: DateFormat,
    pub datetime_format: DateTimeFormat,
    pub number_format: NumberFormat,
    pub language: Language,
    pub timezone: TimezoneSetting,
    pub start_page: StartPage,
}

impl UserSettings {
    /// The settings a new user starts with.
    pub fn default_for(user_id: UserID) -> Self {
        Self {
            user_id,
            hide_amounts: false,
            mute_sounds: false,
            date_format: DateFormat::default(),
            datetime_format: DateTimeFormat::default(),
            number_format: NumberFormat::default(),
            language: Language::default(),
            timezone: TimezoneSetting::default(),
            start_page: StartPage::default(),
        }
    }
}
