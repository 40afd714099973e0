// src/common/time.rs

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};

/// Normaliza qualquer data para a segunda-feira da sua semana.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    let days_from_monday = date.weekday().num_days_from_monday() as u64;
    date - Days::new(days_from_monday)
}

/// O domingo que fecha a semana da data dada.
pub fn sunday_of(date: NaiveDate) -> NaiveDate {
    monday_of(date) + Days::new(6)
}

/// Horas (fracionárias) entre `now` e o início da sessão, calculadas em
/// minutos inteiros divididos por 60. Negativo = a sessão já começou.
pub fn hours_until(now: NaiveDateTime, date: NaiveDate, start_time: NaiveTime) -> f64 {
    let start = date.and_time(start_time);
    let minutes = (start - now).num_minutes();
    minutes as f64 / 60.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn t(h: u32, min: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, min, 0).unwrap()
    }

    #[test]
    fn monday_of_normalizes_any_weekday() {
        // 2024-06-10 é uma segunda-feira.
        let monday = d(2024, 6, 10);
        assert_eq!(monday_of(monday), monday);
        assert_eq!(monday_of(d(2024, 6, 12)), monday); // quarta
        assert_eq!(monday_of(d(2024, 6, 16)), monday); // domingo
    }

    #[test]
    fn monday_of_crosses_month_boundary() {
        // 2024-06-01 é um sábado; a segunda da semana é 27/05.
        assert_eq!(monday_of(d(2024, 6, 1)), d(2024, 5, 27));
    }

    #[test]
    fn sunday_closes_the_same_week() {
        assert_eq!(sunday_of(d(2024, 6, 10)), d(2024, 6, 16));
        assert_eq!(sunday_of(d(2024, 6, 16)), d(2024, 6, 16));
    }

    #[test]
    fn hours_until_keeps_fraction_of_whole_minutes() {
        let now = d(2024, 6, 10).and_time(t(9, 0));
        // 18h30 depois
        assert_eq!(hours_until(now, d(2024, 6, 11), t(3, 30)), 18.5);
        // Sessão no passado fica negativa
        assert!(hours_until(now, d(2024, 6, 10), t(8, 0)) < 0.0);
    }

    #[test]
    fn hours_until_truncates_seconds_to_whole_minutes() {
        let now = d(2024, 6, 10)
            .and_time(NaiveTime::from_hms_opt(8, 59, 30).unwrap());
        // 1h00m30s até o início: os 30s sobram, ficam 60 minutos inteiros.
        assert_eq!(hours_until(now, d(2024, 6, 10), t(10, 0)), 1.0);
    }
}
