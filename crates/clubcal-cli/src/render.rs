use std::io::Write;

use clubcal_core::{CalendarConfig, EventCard};
use unicode_width::UnicodeWidthStr;

#[tracing::instrument(skip(writer, cards, config))]
pub fn print_card_table<W: Write>(
    mut writer: W,
    cards: &[EventCard],
    config: &CalendarConfig,
) -> anyhow::Result<()> {
    if cards.is_empty() {
        writeln!(writer, "no events")?;
        return Ok(());
    }

    let rows: Vec<[String; 5]> = cards
        .iter()
        .map(|card| {
            let location = card
                .view
                .location_html
                .as_deref()
                .map(|html| {
                    let text = html
                        .strip_prefix(config.labels.location_prefix.as_str())
                        .unwrap_or(html);
                    strip_tags(text)
                })
                .unwrap_or_default();

            [
                card.dom_id.clone(),
                card.view.when.text.clone(),
                card.category.clone(),
                card.view.title.clone(),
                location,
            ]
        })
        .collect();

    write_table(&mut writer, HEADERS, &rows)
}

const HEADERS: [&str; 5] = ["ID", "When", "Category", "Title", "Location"];
const GAP: &str = "  ";

/// Left-aligned columns sized by display width, so venue names with
/// wide characters still line up.
fn write_table<W: Write, const N: usize>(
    mut writer: W,
    headers: [&str; N],
    rows: &[[String; N]],
) -> anyhow::Result<()> {
    let widths: [usize; N] = std::array::from_fn(|col| {
        rows.iter()
            .map(|row| row[col].width())
            .fold(headers[col].width(), usize::max)
    });

    write_row(&mut writer, &headers, &widths)?;
    let rules = widths.map(|width| "-".repeat(width));
    write_row(&mut writer, &rules, &widths)?;
    for row in rows {
        write_row(&mut writer, row, &widths)?;
    }
    Ok(())
}

fn write_row<W, S>(writer: &mut W, cells: &[S], widths: &[usize]) -> anyhow::Result<()>
where
    W: Write,
    S: AsRef<str>,
{
    let mut line = String::new();
    for (cell, width) in cells.iter().zip(widths) {
        let cell = cell.as_ref();
        line.push_str(cell);
        line.push_str(&" ".repeat(width.saturating_sub(cell.width())));
        line.push_str(GAP);
    }
    writeln!(writer, "{}", line.trim_end())?;
    Ok(())
}

/// Drops markup tags, keeping the text between them.
pub fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        if in_tag {
            if ch == '>' {
                in_tag = false;
            }
            continue;
        }

        if ch == '<' {
            in_tag = true;
            continue;
        }

        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use clubcal_core::CalendarConfig;
    use clubcal_core::datetime::DateRange;
    use clubcal_core::format::EventView;
    use clubcal_core::render::EventCard;

    use super::{print_card_table, strip_tags};

    fn card(title: &str, location: Option<&str>) -> EventCard {
        EventCard {
            dom_id: "event1".to_string(),
            category: "racing".to_string(),
            view: EventView {
                title: title.to_string(),
                when: DateRange {
                    text: "July 12, 2025 8:30 am".to_string(),
                    badge: None,
                },
                location_html: location.map(str::to_string),
                description_html: String::new(),
                description_filled: false,
            },
        }
    }

    #[test]
    fn strips_anchor_markup() {
        assert_eq!(
            strip_tags("<a href=\"/poway-field.html\">Poway Field</a> north lot"),
            "Poway Field north lot"
        );
    }

    #[test]
    fn table_shows_plain_location() {
        let mut out = Vec::new();
        print_card_table(
            &mut out,
            &[card(
                "Race",
                Some("Location: <a href=\"/poway-field.html\">Poway Field</a>"),
            )],
            &CalendarConfig::default(),
        )
        .expect("render table");

        let text = String::from_utf8(out).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID "));
        assert!(lines[2].contains("Race"));
        assert!(lines[2].contains("Poway Field"));
        assert!(!lines[2].contains("href"));
        assert!(!lines[2].contains("Location:"));
    }

    #[test]
    fn columns_align_on_display_width() {
        let mut out = Vec::new();
        print_card_table(
            &mut out,
            &[card("Race", Some("Location: Poway Field")), card("Éclair fly-in", None)],
            &CalendarConfig::default(),
        )
        .expect("render table");

        let text = String::from_utf8(out).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        let title_col = lines[0].find("Title").expect("title header");
        assert_eq!(lines[2].find("Race"), Some(title_col));
        assert!(lines.iter().all(|line| !line.ends_with(' ')));
    }

    #[test]
    fn empty_list_prints_marker() {
        let mut out = Vec::new();
        print_card_table(&mut out, &[], &CalendarConfig::default()).expect("render");
        assert_eq!(String::from_utf8(out).expect("utf8"), "no events\n");
    }
}
