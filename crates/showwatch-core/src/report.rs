//! Plain-text digest of matched shows.

use std::fmt::Write as _;

use thiserror::Error;

use crate::matcher::MatchResult;

/// Placeholder replaced by the show id in the event URL template.
pub const ID_PLACEHOLDER: &str = "{id}";

const HEADER: &str = "🎶 הופעות חדשות שזוהו:";
const CURRENCY: &str = "₪";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("show {show_id} matched for {artist} is missing required field '{field}'")]
    MissingField {
        field: &'static str,
        artist: String,
        show_id: String,
    },
}

/// A rendered notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub subject: String,
    pub body: String,
}

/// Renders match results into a [`Report`].
#[derive(Debug, Clone)]
pub struct ReportFormatter {
    subject: String,
    event_url_template: String,
}

impl ReportFormatter {
    #[must_use]
    pub fn new(subject: impl Into<String>, event_url_template: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            event_url_template: event_url_template.into(),
        }
    }

    /// Canonical event link for a show id.
    #[must_use]
    pub fn event_url(&self, show_id: &str) -> String {
        self.event_url_template.replace(ID_PLACEHOLDER, show_id)
    }

    /// Render one block per match, in the order given.
    ///
    /// Each block lists the artist and show name, date and time, price, and
    /// the event link, followed by a blank line.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::MissingField`] for the first matched show lacking
    /// its id, name, date, time or price. Blank strings count as missing.
    pub fn format(&self, matches: &[MatchResult]) -> Result<Report, FormatError> {
        let mut body = format!("{HEADER}\n\n");

        for m in matches {
            let show = &m.show;
            let show_id = present(show.id.as_deref());
            let missing = |field: &'static str| FormatError::MissingField {
                field,
                artist: m.artist.clone(),
                show_id: show_id.unwrap_or("<unknown>").to_string(),
            };

            let id = show_id.ok_or_else(|| missing("id"))?;
            let name = present(show.display_name.as_deref()).ok_or_else(|| missing("displayName"))?;
            let date = present(show.date.as_deref()).ok_or_else(|| missing("date"))?;
            let time = present(show.time.as_deref()).ok_or_else(|| missing("time"))?;
            let price = show.price.ok_or_else(|| missing("price"))?;

            // Writing to a String cannot fail.
            let _ = write!(
                body,
                "🎤 {artist}: {name}\n📅 {date} {time}\n💰 {price}{CURRENCY}\n🔗 {link}\n\n",
                artist = m.artist,
                link = self.event_url(id),
            );
        }

        Ok(Report {
            subject: self.subject.clone(),
            body,
        })
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::shows::ShowRecord;

    fn formatter() -> ReportFormatter {
        ReportFormatter::new("subject", "https://barby.co.il/event/{id}")
    }

    fn full_show(id: &str, name: &str) -> ShowRecord {
        ShowRecord {
            id: Some(id.to_string()),
            display_name: Some(name.to_string()),
            date: Some("2024-05-01".to_string()),
            time: Some("21:00".to_string()),
            price: Some(Decimal::from(80)),
        }
    }

    fn matched(artist: &str, show: ShowRecord) -> MatchResult {
        MatchResult {
            artist: artist.to_string(),
            show,
        }
    }

    #[test]
    fn renders_single_block() {
        let report = formatter()
            .format(&[matched("Tuna", full_show("1", "Tuna Live Night"))])
            .unwrap();
        assert_eq!(report.subject, "subject");
        assert_eq!(
            report.body,
            "🎶 הופעות חדשות שזוהו:\n\n\
             🎤 Tuna: Tuna Live Night\n\
             📅 2024-05-01 21:00\n\
             💰 80₪\n\
             🔗 https://barby.co.il/event/1\n\n"
        );
    }

    #[test]
    fn one_block_per_match_in_given_order() {
        let report = formatter()
            .format(&[
                matched("Tuna", full_show("1", "Tuna x Shazamat")),
                matched("Shazamat", full_show("1", "Tuna x Shazamat")),
                matched("Shazamat", full_show("2", "Shazamat Solo")),
            ])
            .unwrap();
        assert_eq!(report.body.matches("🎤 ").count(), 3);
        let tuna = report.body.find("🎤 Tuna:").unwrap();
        let shaz_first = report.body.find("🎤 Shazamat: Tuna x Shazamat").unwrap();
        let shaz_second = report.body.find("🎤 Shazamat: Shazamat Solo").unwrap();
        assert!(tuna < shaz_first && shaz_first < shaz_second);
        assert!(report.body.contains("🔗 https://barby.co.il/event/2\n"));
    }

    #[test]
    fn format_is_deterministic() {
        let matches = vec![
            matched("Tuna", full_show("1", "Tuna Live")),
            matched("Shazamat", full_show("2", "Shazamat")),
        ];
        let f = formatter();
        assert_eq!(f.format(&matches).unwrap(), f.format(&matches).unwrap());
    }

    #[test]
    fn empty_matches_render_header_only() {
        let report = formatter().format(&[]).unwrap();
        assert_eq!(report.body, "🎶 הופעות חדשות שזוהו:\n\n");
    }

    #[test]
    fn fractional_price_is_rendered_verbatim() {
        let mut show = full_show("4", "Tuna");
        show.price = Some(Decimal::new(995, 1));
        let report = formatter().format(&[matched("Tuna", show)]).unwrap();
        assert!(report.body.contains("💰 99.5₪\n"));
    }

    #[test]
    fn missing_fields_are_reported() {
        let cases: [(&str, fn(&mut ShowRecord)); 5] = [
            ("id", |s| s.id = None),
            ("displayName", |s| s.display_name = None),
            ("date", |s| s.date = None),
            ("time", |s| s.time = Some("  ".to_string())),
            ("price", |s| s.price = None),
        ];

        for (field, strip) in cases {
            let mut show = full_show("7", "Tuna");
            strip(&mut show);
            let err = formatter()
                .format(&[matched("Tuna", show)])
                .expect_err("expected FormatError");
            assert!(
                matches!(err, FormatError::MissingField { field: f, .. } if f == field),
                "expected missing {field}, got: {err:?}"
            );
        }
    }

    #[test]
    fn missing_field_error_names_show_and_artist() {
        let mut show = full_show("42", "Tuna");
        show.date = None;
        let err = formatter().format(&[matched("Tuna", show)]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "show 42 matched for Tuna is missing required field 'date'"
        );
    }

    #[test]
    fn event_url_substitutes_id() {
        let f = ReportFormatter::new("s", "https://venue.example/e/{id}?ref=watch");
        assert_eq!(f.event_url("12"), "https://venue.example/e/12?ref=watch");
    }
}
