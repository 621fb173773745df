//! Relative-time wording
//!
//! ICU4X has no stable relative-time formatter, so the patterns, unit names
//! and `numeric: "auto"` phrases are kept here per base language. Numbers
//! inside the patterns are still rendered by the ICU-backed number formatter.

use super::brands::LocaleCode;

/// Unit names in `(one, other)` plural forms, ordered
/// year, quarter, month, week, day, hour, minute, second.
pub(crate) type UnitForms = [(&'static str, &'static str); 8];

#[derive(Debug)]
pub(crate) struct RelativeData {
    pub future: &'static str,
    pub past: &'static str,
    pub long: UnitForms,
    pub short: UnitForms,
    /// `numeric: "auto"` phrases keyed by (unit, offset)
    pub phrases: &'static [(&'static str, i64, &'static str)],
}

pub(crate) fn relative_data(locale: &LocaleCode) -> &'static RelativeData {
    match locale.language() {
        "es" => &ES,
        "fr" => &FR,
        "de" => &DE,
        "pt" => &PT,
        _ => &EN,
    }
}

static EN: RelativeData = RelativeData {
    future: "in {0}",
    past: "{0} ago",
    long: [
        ("year", "years"),
        ("quarter", "quarters"),
        ("month", "months"),
        ("week", "weeks"),
        ("day", "days"),
        ("hour", "hours"),
        ("minute", "minutes"),
        ("second", "seconds"),
    ],
    short: [
        ("yr.", "yr."),
        ("qtr.", "qtrs."),
        ("mo.", "mo."),
        ("wk.", "wk."),
        ("day", "days"),
        ("hr.", "hr."),
        ("min.", "min."),
        ("sec.", "sec."),
    ],
    phrases: &[
        ("year", -1, "last year"),
        ("year", 0, "this year"),
        ("year", 1, "next year"),
        ("quarter", -1, "last quarter"),
        ("quarter", 0, "this quarter"),
        ("quarter", 1, "next quarter"),
        ("month", -1, "last month"),
        ("month", 0, "this month"),
        ("month", 1, "next month"),
        ("week", -1, "last week"),
        ("week", 0, "this week"),
        ("week", 1, "next week"),
        ("day", -1, "yesterday"),
        ("day", 0, "today"),
        ("day", 1, "tomorrow"),
        ("hour", 0, "this hour"),
        ("minute", 0, "this minute"),
        ("second", 0, "now"),
    ],
};

static ES: RelativeData = RelativeData {
    future: "dentro de {0}",
    past: "hace {0}",
    long: [
        ("año", "años"),
        ("trimestre", "trimestres"),
        ("mes", "meses"),
        ("semana", "semanas"),
        ("día", "días"),
        ("hora", "horas"),
        ("minuto", "minutos"),
        ("segundo", "segundos"),
    ],
    short: [
        ("a.", "a."),
        ("trim.", "trim."),
        ("m.", "m."),
        ("sem.", "sem."),
        ("d.", "d."),
        ("h", "h"),
        ("min", "min"),
        ("s", "s"),
    ],
    phrases: &[
        ("year", -1, "el año pasado"),
        ("year", 0, "este año"),
        ("year", 1, "el próximo año"),
        ("month", -1, "el mes pasado"),
        ("month", 0, "este mes"),
        ("month", 1, "el próximo mes"),
        ("week", -1, "la semana pasada"),
        ("week", 0, "esta semana"),
        ("week", 1, "la próxima semana"),
        ("day", -2, "anteayer"),
        ("day", -1, "ayer"),
        ("day", 0, "hoy"),
        ("day", 1, "mañana"),
        ("day", 2, "pasado mañana"),
        ("second", 0, "ahora"),
    ],
};

static FR: RelativeData = RelativeData {
    future: "dans {0}",
    past: "il y a {0}",
    long: [
        ("an", "ans"),
        ("trimestre", "trimestres"),
        ("mois", "mois"),
        ("semaine", "semaines"),
        ("jour", "jours"),
        ("heure", "heures"),
        ("minute", "minutes"),
        ("seconde", "secondes"),
    ],
    short: [
        ("a", "a"),
        ("trim.", "trim."),
        ("m.", "m."),
        ("sem.", "sem."),
        ("j", "j"),
        ("h", "h"),
        ("min", "min"),
        ("s", "s"),
    ],
    phrases: &[
        ("year", -1, "l’année dernière"),
        ("year", 0, "cette année"),
        ("year", 1, "l’année prochaine"),
        ("month", -1, "le mois dernier"),
        ("month", 0, "ce mois-ci"),
        ("month", 1, "le mois prochain"),
        ("week", -1, "la semaine dernière"),
        ("week", 0, "cette semaine"),
        ("week", 1, "la semaine prochaine"),
        ("day", -2, "avant-hier"),
        ("day", -1, "hier"),
        ("day", 0, "aujourd’hui"),
        ("day", 1, "demain"),
        ("day", 2, "après-demain"),
        ("second", 0, "maintenant"),
    ],
};

static DE: RelativeData = RelativeData {
    future: "in {0}",
    past: "vor {0}",
    long: [
        ("Jahr", "Jahren"),
        ("Quartal", "Quartalen"),
        ("Monat", "Monaten"),
        ("Woche", "Wochen"),
        ("Tag", "Tagen"),
        ("Stunde", "Stunden"),
        ("Minute", "Minuten"),
        ("Sekunde", "Sekunden"),
    ],
    short: [
        ("J.", "J."),
        ("Quart.", "Quart."),
        ("Mon.", "Mon."),
        ("Woche", "Wochen"),
        ("Tag", "Tagen"),
        ("Std.", "Std."),
        ("Min.", "Min."),
        ("Sek.", "Sek."),
    ],
    phrases: &[
        ("year", -1, "letztes Jahr"),
        ("year", 0, "dieses Jahr"),
        ("year", 1, "nächstes Jahr"),
        ("month", -1, "letzten Monat"),
        ("month", 0, "diesen Monat"),
        ("month", 1, "nächsten Monat"),
        ("week", -1, "letzte Woche"),
        ("week", 0, "diese Woche"),
        ("week", 1, "nächste Woche"),
        ("day", -2, "vorgestern"),
        ("day", -1, "gestern"),
        ("day", 0, "heute"),
        ("day", 1, "morgen"),
        ("day", 2, "übermorgen"),
        ("second", 0, "jetzt"),
    ],
};

static PT: RelativeData = RelativeData {
    future: "em {0}",
    past: "há {0}",
    long: [
        ("ano", "anos"),
        ("trimestre", "trimestres"),
        ("mês", "meses"),
        ("semana", "semanas"),
        ("dia", "dias"),
        ("hora", "horas"),
        ("minuto", "minutos"),
        ("segundo", "segundos"),
    ],
    short: [
        ("ano", "anos"),
        ("tri.", "tri."),
        ("mês", "meses"),
        ("sem.", "sem."),
        ("dia", "dias"),
        ("h", "h"),
        ("min.", "min."),
        ("seg.", "seg."),
    ],
    phrases: &[
        ("year", -1, "ano passado"),
        ("year", 0, "este ano"),
        ("year", 1, "próximo ano"),
        ("month", -1, "mês passado"),
        ("month", 0, "este mês"),
        ("month", 1, "próximo mês"),
        ("week", -1, "semana passada"),
        ("week", 0, "esta semana"),
        ("week", 1, "próxima semana"),
        ("day", -2, "anteontem"),
        ("day", -1, "ontem"),
        ("day", 0, "hoje"),
        ("day", 1, "amanhã"),
        ("day", 2, "depois de amanhã"),
        ("second", 0, "agora"),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_by_base_language() {
        let es_mx = LocaleCode::parse("es-MX").unwrap();
        assert_eq!(relative_data(&es_mx).past, "hace {0}");

        let ja = LocaleCode::parse("ja").unwrap();
        assert_eq!(relative_data(&ja).future, "in {0}");
    }
}
