/// pt-BR display formatting for dates and prices.
use chrono::{Datelike, NaiveDate};

const WEEKDAYS_SHORT: [&str; 7] = ["seg", "ter", "qua", "qui", "sex", "sáb", "dom"];

const MONTHS: [&str; 12] = [
    "Janeiro", "Fevereiro", "Março", "Abril", "Maio", "Junho", "Julho", "Agosto", "Setembro",
    "Outubro", "Novembro", "Dezembro",
];

const MONTHS_SHORT: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

pub fn weekday_short(date: NaiveDate) -> &'static str {
    WEEKDAYS_SHORT[date.weekday().num_days_from_monday() as usize]
}

pub fn month_name(month: u32) -> &'static str {
    MONTHS
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("")
}

/// "05 jan" style short day label.
pub fn day_short(date: NaiveDate) -> String {
    let month = MONTHS_SHORT
        .get(date.month0() as usize)
        .copied()
        .unwrap_or("");
    format!("{:02} {}", date.day(), month)
}

/// "Semana de 05 jan a 11 jan" header for the week grid.
pub fn week_label(start: NaiveDate, end: NaiveDate) -> String {
    format!("Semana de {} a {}", day_short(start), day_short(end))
}

/// Whole-real price in the local convention: `R$ 80,00`.
pub fn price(amount: u32) -> String {
    format!("R$ {},00", amount)
}
