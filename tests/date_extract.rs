// tests/date_extract.rs
use chrono::{Datelike, NaiveDate};
use lunch_menu_notifier::{DateExtractor, DateResolution};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn full_date_is_found_regardless_of_surrounding_text() {
    let ex = DateExtractor::korean();
    let today = d(2030, 7, 1);
    let wrappers = [
        ("", ""),
        ("점심메뉴 ", ""),
        ("", " 점심메뉴"),
        ("[공지] ", " (목) 12:00~13:30"),
        ("메뉴판\n", "\n김치찌개 / 제육볶음"),
    ];
    for year in [2024, 2025, 2026] {
        for month in 1..=12u32 {
            for day in [1u32, 9, 15, 28] {
                for (pre, post) in wrappers {
                    let text = format!("{pre}{year}년 {month:02}월 {day:02}일{post}");
                    assert_eq!(
                        ex.resolve(&text, today).date(),
                        Some(d(year, month, day)),
                        "{text:?}"
                    );
                }
            }
        }
    }
}

#[test]
fn full_date_tolerates_missing_spaces_and_single_digits() {
    let ex = DateExtractor::korean();
    assert_eq!(
        ex.resolve("2026년2월5일", d(2030, 1, 1)).date(),
        Some(d(2026, 2, 5))
    );
}

#[test]
fn month_day_takes_the_year_of_resolution_time() {
    let ex = DateExtractor::korean();
    for year in [2025, 2026, 2031] {
        let today = d(year, 6, 15);
        let got = ex.resolve("2월 5일 (목) 점심", today);
        assert_eq!(got.date().map(|d| d.year()), Some(year));
        assert_eq!(got.date(), Some(d(year, 2, 5)));
    }
}

#[test]
fn year_boundary_assumes_current_year() {
    // Read on New Year's Day, last year's December menu lands in the coming December.
    let got = DateExtractor::korean().resolve("12월 31일 메뉴", d(2026, 1, 1));
    assert_eq!(got.date(), Some(d(2026, 12, 31)));
}

#[test]
fn dotted_and_slashed_forms() {
    let ex = DateExtractor::korean();
    let today = d(2026, 3, 1);
    assert_eq!(
        ex.resolve("02.05 오늘의 메뉴", today),
        DateResolution::Resolved { date: d(2026, 2, 5), pattern: "dotted" }
    );
    assert_eq!(
        ex.resolve("메뉴 2/5", today),
        DateResolution::Resolved { date: d(2026, 2, 5), pattern: "slashed" }
    );
}

#[test]
fn priority_order_prefers_korean_forms() {
    let ex = DateExtractor::korean();
    let got = ex.resolve("3/4 업데이트 - 2월 5일 메뉴", d(2026, 1, 1));
    assert_eq!(
        got,
        DateResolution::Resolved { date: d(2026, 2, 5), pattern: "month-day" }
    );
}

#[test]
fn text_without_digit_dates_resolves_to_no_match() {
    let ex = DateExtractor::korean();
    let today = d(2026, 2, 5);
    for text in [
        "오늘의 메뉴",
        "김치찌개, 제육볶음, 계란말이",
        "Lunch menu!",
        "월요일 화요일",
        "년 월 일",
        "🍱🍱🍱",
    ] {
        assert_eq!(ex.resolve(text, today), DateResolution::NoMatch, "{text:?}");
    }
}

#[test]
fn empty_text_is_distinguished_from_no_match() {
    let ex = DateExtractor::korean();
    let today = d(2026, 2, 5);
    assert_eq!(ex.resolve("", today), DateResolution::EmptyText);
    assert_eq!(ex.resolve("   ", today), DateResolution::EmptyText);
    assert_ne!(ex.resolve("", today), ex.resolve("메뉴", today));
}

#[test]
fn calendar_invalid_fields_never_raise() {
    let ex = DateExtractor::korean();
    let today = d(2026, 2, 5);
    for text in ["2026년 02월 30일", "13월 40일", "99.99", "00/00", "2025년 2월 29일"] {
        assert!(!ex.resolve(text, today).is_resolved(), "{text:?}");
    }
}

#[test]
fn leap_day_is_valid_in_leap_years() {
    let got = DateExtractor::korean().resolve("2월 29일", d(2028, 2, 1));
    assert_eq!(got.date(), Some(d(2028, 2, 29)));
}

#[test]
fn fullwidth_digits_resolve_like_ascii() {
    let ex = DateExtractor::korean();
    let today = d(2026, 2, 5);
    let cases = [
        ("２월 ５일 (목) 점심", "month-day"),
        ("２０２６년 ０２월 ０５일", "year-month-day"),
        ("2026년 ０2월 0５일", "year-month-day"),
        ("０２.０５ 메뉴", "dotted"),
        ("메뉴 ２/５", "slashed"),
    ];
    for (text, pattern) in cases {
        assert_eq!(
            ex.resolve(text, today),
            DateResolution::Resolved { date: today, pattern },
            "{text:?}"
        );
    }
    assert_eq!(ex.resolve("２월 ３０일", today), DateResolution::NoMatch);
}
