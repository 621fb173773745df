//! Currency and percent affixes
//!
//! ICU4X's stable decimal formatter renders digits and separators only, so
//! the strings placed around them are kept here per base language. Anything
//! not listed falls back to the English tables.

use super::brands::LocaleCode;

pub(crate) const NBSP: &str = "\u{a0}";

/// Where the currency symbol goes relative to the number, with its separator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CurrencyPlacement {
    Prefix(&'static str),
    Suffix(&'static str),
}

#[derive(Debug)]
pub(crate) struct Affixes {
    pub language: &'static str,
    pub percent_suffix: &'static str,
    pub currency_placement: CurrencyPlacement,
    /// `(code, symbol)` overrides; anything missing displays its ISO code
    pub currency_symbols: &'static [(&'static str, &'static str)],
    /// `(code, one, other)` display names
    pub currency_names: &'static [(&'static str, &'static str, &'static str)],
}

impl Affixes {
    pub fn currency_symbol(&self, code: &str) -> Option<&'static str> {
        self.currency_symbols
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, s)| *s)
    }

    pub fn currency_name(&self, code: &str, plural_one: bool) -> Option<&'static str> {
        self.currency_names
            .iter()
            .find(|(c, _, _)| *c == code)
            .map(|(_, one, other)| if plural_one { *one } else { *other })
    }
}

/// Narrow currency symbols shared by every locale
pub(crate) fn narrow_currency_symbol(code: &str) -> Option<&'static str> {
    match code {
        "USD" | "CAD" | "AUD" | "MXN" | "NZD" | "ARS" | "CLP" | "COP" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" | "CNY" => Some("¥"),
        "BRL" => Some("R$"),
        "INR" => Some("₹"),
        "KRW" => Some("₩"),
        "RUB" => Some("₽"),
        "TRY" => Some("₺"),
        _ => None,
    }
}

/// ISO 4217 minor-unit digits
pub(crate) fn currency_digits(code: &str) -> u8 {
    match code {
        "JPY" | "KRW" | "CLP" | "VND" | "ISK" | "PYG" | "UGX" | "XAF" | "XOF" => 0,
        "BHD" | "KWD" | "JOD" | "OMR" | "TND" | "LYD" | "IQD" => 3,
        _ => 2,
    }
}

pub(crate) fn affixes(locale: &LocaleCode) -> &'static Affixes {
    match locale.language() {
        "es" => &ES,
        "fr" => &FR,
        "de" => &DE,
        "it" => &IT,
        "pt" => &PT,
        "nl" => &NL,
        "ja" => &JA,
        _ => &EN,
    }
}

static EN: Affixes = Affixes {
    language: "en",
    percent_suffix: "%",
    currency_placement: CurrencyPlacement::Prefix(""),
    currency_symbols: &[
        ("USD", "$"),
        ("EUR", "€"),
        ("GBP", "£"),
        ("JPY", "¥"),
        ("CNY", "CN¥"),
        ("CAD", "CA$"),
        ("AUD", "A$"),
        ("MXN", "MX$"),
        ("BRL", "R$"),
        ("INR", "₹"),
        ("KRW", "₩"),
    ],
    currency_names: &[
        ("USD", "US dollar", "US dollars"),
        ("EUR", "euro", "euros"),
        ("GBP", "British pound", "British pounds"),
        ("JPY", "Japanese yen", "Japanese yen"),
        ("MXN", "Mexican peso", "Mexican pesos"),
        ("BRL", "Brazilian real", "Brazilian reals"),
    ],
};

static ES: Affixes = Affixes {
    language: "es",
    percent_suffix: "\u{a0}%",
    currency_placement: CurrencyPlacement::Suffix(NBSP),
    currency_symbols: &[("USD", "US$"), ("EUR", "€")],
    currency_names: &[
        ("USD", "dólar estadounidense", "dólares estadounidenses"),
        ("EUR", "euro", "euros"),
        ("GBP", "libra esterlina", "libras esterlinas"),
        ("JPY", "yen", "yenes"),
        ("MXN", "peso mexicano", "pesos mexicanos"),
    ],
};

static FR: Affixes = Affixes {
    language: "fr",
    percent_suffix: "\u{202f}%",
    currency_placement: CurrencyPlacement::Suffix(NBSP),
    currency_symbols: &[
        ("USD", "$US"),
        ("EUR", "€"),
        ("GBP", "£GB"),
        ("CAD", "$CA"),
    ],
    currency_names: &[
        ("USD", "dollar des États-Unis", "dollars des États-Unis"),
        ("EUR", "euro", "euros"),
        ("GBP", "livre sterling", "livres sterling"),
        ("JPY", "yen japonais", "yens japonais"),
    ],
};

static DE: Affixes = Affixes {
    language: "de",
    percent_suffix: "\u{a0}%",
    currency_placement: CurrencyPlacement::Suffix(NBSP),
    currency_symbols: &[("USD", "$"), ("EUR", "€"), ("GBP", "£"), ("JPY", "¥")],
    currency_names: &[
        ("USD", "US-Dollar", "US-Dollar"),
        ("EUR", "Euro", "Euro"),
        ("GBP", "Britisches Pfund", "Britische Pfund"),
        ("JPY", "Japanischer Yen", "Japanische Yen"),
    ],
};

static IT: Affixes = Affixes {
    language: "it",
    percent_suffix: "%",
    currency_placement: CurrencyPlacement::Suffix(NBSP),
    currency_symbols: &[("USD", "USD"), ("EUR", "€"), ("GBP", "£"), ("JPY", "JPY")],
    currency_names: &[
        ("USD", "dollaro statunitense", "dollari statunitensi"),
        ("EUR", "euro", "euro"),
        ("GBP", "sterlina britannica", "sterline britanniche"),
        ("JPY", "yen giapponese", "yen giapponesi"),
    ],
};

static PT: Affixes = Affixes {
    language: "pt",
    percent_suffix: "%",
    currency_placement: CurrencyPlacement::Prefix(NBSP),
    currency_symbols: &[
        ("USD", "US$"),
        ("EUR", "€"),
        ("GBP", "£"),
        ("JPY", "JP¥"),
        ("BRL", "R$"),
    ],
    currency_names: &[
        ("USD", "Dólar americano", "Dólares americanos"),
        ("EUR", "Euro", "Euros"),
        ("GBP", "Libra esterlina", "Libras esterlinas"),
        ("JPY", "Iene japonês", "Ienes japoneses"),
        ("BRL", "Real brasileiro", "Reais brasileiros"),
    ],
};

static NL: Affixes = Affixes {
    language: "nl",
    percent_suffix: "%",
    currency_placement: CurrencyPlacement::Prefix(NBSP),
    currency_symbols: &[("USD", "US$"), ("EUR", "€"), ("GBP", "£"), ("JPY", "JP¥")],
    currency_names: &[
        ("USD", "Amerikaanse dollar", "Amerikaanse dollar"),
        ("EUR", "euro", "euro"),
        ("GBP", "Brits pond", "Brits pond"),
    ],
};

static JA: Affixes = Affixes {
    language: "ja",
    percent_suffix: "%",
    currency_placement: CurrencyPlacement::Prefix(""),
    currency_symbols: &[("USD", "$"), ("EUR", "€"), ("GBP", "£"), ("JPY", "￥")],
    currency_names: &[
        ("USD", "米ドル", "米ドル"),
        ("EUR", "ユーロ", "ユーロ"),
        ("JPY", "円", "円"),
    ],
};
