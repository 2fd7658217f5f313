use chrono::{DateTime, Datelike, FixedOffset, Timelike};
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum Locale {
    #[default]
    #[strum(serialize = "en")]
    En,
    #[strum(serialize = "pt")]
    Pt,
    #[strum(serialize = "pt-BR")]
    PtBr,
    #[strum(serialize = "es")]
    Es,
}

/// Key into a locale's relative-time table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Seconds,
    Minute,
    Minutes,
    Hour,
    Hours,
    Day,
    Days,
    Month,
    Months,
    Year,
    Years,
}

struct Phrases {
    future: &'static str,
    past: &'static str,
    seconds: &'static str,
    minute: &'static str,
    minutes: &'static str,
    hour: &'static str,
    hours: &'static str,
    day: &'static str,
    days: &'static str,
    month: &'static str,
    months: &'static str,
    year: &'static str,
    years: &'static str,
    month_names: [&'static str; 12],
}

const MESES: [&str; 12] = [
    "janeiro", "fevereiro", "março", "abril", "maio", "junho", "julho", "agosto", "setembro",
    "outubro", "novembro", "dezembro",
];

static EN: Phrases = Phrases {
    future: "in %s",
    past: "%s ago",
    seconds: "a few seconds",
    minute: "a minute",
    minutes: "%d minutes",
    hour: "an hour",
    hours: "%d hours",
    day: "a day",
    days: "%d days",
    month: "a month",
    months: "%d months",
    year: "a year",
    years: "%d years",
    month_names: [
        "January", "February", "March", "April", "May", "June", "July", "August", "September",
        "October", "November", "December",
    ],
};

static PT_BR: Phrases = Phrases {
    future: "em %s",
    past: "há %s",
    seconds: "poucos segundos",
    minute: "um minuto",
    minutes: "%d minutos",
    hour: "uma hora",
    hours: "%d horas",
    day: "um dia",
    days: "%d dias",
    month: "um mês",
    months: "%d meses",
    year: "um ano",
    years: "%d anos",
    month_names: MESES,
};

static PT: Phrases = Phrases {
    future: "em %s",
    past: "há %s",
    seconds: "alguns segundos",
    minute: "um minuto",
    minutes: "%d minutos",
    hour: "uma hora",
    hours: "%d horas",
    day: "um dia",
    days: "%d dias",
    month: "um mês",
    months: "%d meses",
    year: "um ano",
    years: "%d anos",
    month_names: MESES,
};

static ES: Phrases = Phrases {
    future: "en %s",
    past: "hace %s",
    seconds: "unos segundos",
    minute: "un minuto",
    minutes: "%d minutos",
    hour: "una hora",
    hours: "%d horas",
    day: "un día",
    days: "%d días",
    month: "un mes",
    months: "%d meses",
    year: "un año",
    years: "%d años",
    month_names: [
        "enero", "febrero", "marzo", "abril", "mayo", "junio", "julio", "agosto", "septiembre",
        "octubre", "noviembre", "diciembre",
    ],
};

impl Locale {
    /// Resolve a BCP-47 tag the way a browser's `navigator.language` would be:
    /// exact tag, then primary language, then English.
    pub fn from_tag(tag: &str) -> Locale {
        let tag = tag.trim().replace('_', "-");
        if let Ok(l) = Locale::from_str(&tag) {
            return l;
        }
        let primary = tag.split('-').next().unwrap_or_default();
        match primary.to_ascii_lowercase().as_str() {
            "pt" => Locale::Pt,
            "es" => Locale::Es,
            _ => Locale::En,
        }
    }

    fn phrases(&self) -> &'static Phrases {
        match self {
            Locale::En => &EN,
            Locale::Pt => &PT,
            Locale::PtBr => &PT_BR,
            Locale::Es => &ES,
        }
    }

    /// Phrase for `amount` of `unit`, without past/future wrapping.
    pub fn unit(&self, unit: Unit, amount: i64) -> String {
        let p = self.phrases();
        let pat = match unit {
            Unit::Seconds => p.seconds,
            Unit::Minute => p.minute,
            Unit::Minutes => p.minutes,
            Unit::Hour => p.hour,
            Unit::Hours => p.hours,
            Unit::Day => p.day,
            Unit::Days => p.days,
            Unit::Month => p.month,
            Unit::Months => p.months,
            Unit::Year => p.year,
            Unit::Years => p.years,
        };
        pat.replace("%d", &amount.to_string())
    }

    pub fn past(&self, phrase: &str) -> String {
        self.phrases().past.replace("%s", phrase)
    }

    pub fn future(&self, phrase: &str) -> String {
        self.phrases().future.replace("%s", phrase)
    }

    /// Long date with time of day, the "LLL" layout of each locale.
    pub fn long_datetime(&self, t: &DateTime<FixedOffset>) -> String {
        let month = self.phrases().month_names[t.month0() as usize];
        match self {
            Locale::En => {
                let (pm, h12) = t.hour12();
                format!(
                    "{} {}, {} {}:{:02} {}",
                    month,
                    t.day(),
                    t.year(),
                    h12,
                    t.minute(),
                    if pm { "PM" } else { "AM" }
                )
            }
            Locale::Pt | Locale::PtBr => format!(
                "{} de {} de {} às {:02}:{:02}",
                t.day(),
                month,
                t.year(),
                t.hour(),
                t.minute()
            ),
            Locale::Es => format!(
                "{} de {} de {} {}:{:02}",
                t.day(),
                month,
                t.year(),
                t.hour(),
                t.minute()
            ),
        }
    }
}
