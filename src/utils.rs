// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::{Decimal, RoundingStrategy};

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM[:SS]` or the `T`-separated form.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    let d = NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| {
        format!("Invalid date '{}', expected YYYY-MM-DD or YYYY-MM-DD HH:MM[:SS]", s)
    })?;
    Ok(d.and_hms_opt(0, 0, 0).unwrap_or_default())
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// `$1,234.56`; negatives render as `$-1,234.56`.
pub fn fmt_money(d: &Decimal) -> String {
    let r = d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if r.is_sign_negative() && !r.is_zero() { "-" } else { "" };
    let plain = format!("{:.2}", r.abs());
    let (int_part, frac) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));
    format!("${}{}.{}", sign, group_thousands(int_part), frac)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// One decimal place, no percent sign.
pub fn fmt_pct(d: &Decimal) -> String {
    let r = d.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.1}", r)
}

/// `part / whole * 100`, or zero when `whole` is zero.
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part.checked_div(whole)
        .and_then(|q| q.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn money_has_separators_and_two_places() {
        assert_eq!(fmt_money(&dec("0")), "$0.00");
        assert_eq!(fmt_money(&dec("150")), "$150.00");
        assert_eq!(fmt_money(&dec("1234.5")), "$1,234.50");
        assert_eq!(fmt_money(&dec("1234567.891")), "$1,234,567.89");
        assert_eq!(fmt_money(&dec("-200")), "$-200.00");
        assert_eq!(fmt_money(&dec("999.995")), "$1,000.00");
    }

    #[test]
    fn pct_one_place_and_zero_safe() {
        assert_eq!(fmt_pct(&percent_of(dec("800"), dec("950"))), "84.2");
        assert_eq!(fmt_pct(&percent_of(dec("1000"), dec("5000"))), "20.0");
        assert_eq!(percent_of(dec("10"), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(fmt_pct(&Decimal::ZERO), "0.0");
    }

    #[test]
    fn dates_accept_date_only_and_time() {
        assert_eq!(
            parse_datetime("2025-01-03").unwrap().to_string(),
            "2025-01-03 00:00:00"
        );
        assert_eq!(
            parse_datetime("2025-01-03 10:30").unwrap().to_string(),
            "2025-01-03 10:30:00"
        );
        assert!(parse_datetime("03/01/2025").is_err());
    }
}
