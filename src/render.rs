//! HTML fragments for the card grid.
//!
//! Every interpolated value goes through [`escape_html`], backend error
//! messages included.

use cardex_schema::{Backend, GraphicsCard};
use chrono::NaiveDate;

pub const LOADING_HTML: &str = r#"<div class="loading">Loading cards...</div>"#;

pub const EMPTY_STATE_HTML: &str = r#"<div class="empty-state"><h3>No cards found</h3><p>Click "Add New Card" to get started!</p></div>"#;

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// `Oct 12, 2022`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// `$1599.00`
pub fn format_price(price: f64) -> String {
    format!("${price:.2}")
}

pub fn error_html(message: &str) -> String {
    format!(
        r#"<div class="empty-state"><h3>Error</h3><p>{}</p></div>"#,
        escape_html(message)
    )
}

/// The whole grid body for `backend`; an empty slice yields the call-to-action.
pub fn grid_html(backend: Backend, cards: &[GraphicsCard]) -> String {
    if cards.is_empty() {
        return EMPTY_STATE_HTML.to_string();
    }
    cards.iter().map(|card| card_html(backend, card)).collect()
}

pub fn card_html(backend: Backend, card: &GraphicsCard) -> String {
    let id = escape_html(card.id.as_str());
    let db = backend.path_segment();

    let mut html = String::new();
    html.push_str(r#"<div class="card">"#);
    html.push_str(r#"<div class="card-header"><div>"#);
    html.push_str(&format!(
        r#"<div class="card-title">{}</div><div class="card-manufacturer">{} {}</div>"#,
        escape_html(&card.name),
        escape_html(&card.manufacturer),
        escape_html(&card.model),
    ));
    html.push_str("</div>");
    html.push_str(&format!(
        r#"<div class="card-actions"><button class="card-btn btn-warning" data-action="edit" data-backend="{db}" data-card-id="{id}">✏️ Edit</button><button class="card-btn btn-danger" data-action="delete" data-backend="{db}" data-card-id="{id}">🗑️ Delete</button></div>"#
    ));
    html.push_str("</div>");

    html.push_str(r#"<div class="card-info">"#);
    push_info(
        &mut html,
        "Memory",
        &format!(
            "{} GB {}",
            card.memory_gb,
            escape_html(&card.memory_type)
        ),
    );
    push_info(
        &mut html,
        "Core Clock",
        &format!("{} MHz", card.core_clock_mhz),
    );
    if let Some(boost) = card.boost_clock_mhz.filter(|v| *v != 0) {
        push_info(&mut html, "Boost Clock", &format!("{boost} MHz"));
    }
    if let Some(price) = card.price_usd.filter(|v| *v != 0.0) {
        push_info(&mut html, "Price", &format_price(price));
    }
    if let Some(date) = card.release_date {
        push_info(&mut html, "Release Date", &format_date(date));
    }
    html.push_str("</div></div>");
    html
}

/// `value` must already be escaped.
fn push_info(html: &mut String, label: &str, value: &str) {
    html.push_str(&format!(
        r#"<div class="info-item"><div class="info-label">{label}</div><div class="info-value">{value}</div></div>"#
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardex_schema::CardId;

    fn bare_card() -> GraphicsCard {
        GraphicsCard {
            id: CardId::new("3").expect("non-empty id"),
            name: "Arc A770".to_string(),
            manufacturer: "Intel".to_string(),
            model: "A770".to_string(),
            memory_gb: 16,
            memory_type: "GDDR6".to_string(),
            core_clock_mhz: 2100,
            boost_clock_mhz: None,
            price_usd: None,
            release_date: None,
        }
    }

    #[test]
    fn empty_grid_renders_call_to_action() {
        let html = grid_html(Backend::Relational, &[]);
        assert!(html.contains("No cards found"));
        assert!(html.contains(r#"Click "Add New Card" to get started!"#));
    }

    #[test]
    fn card_without_optionals_has_only_required_blocks() {
        let html = card_html(Backend::Relational, &bare_card());
        assert!(html.contains("16 GB GDDR6"));
        assert!(html.contains("2100 MHz"));
        assert!(!html.contains("Boost Clock"));
        assert!(!html.contains("Price"));
        assert!(!html.contains("Release Date"));
    }

    #[test]
    fn optionals_are_formatted() {
        let mut card = bare_card();
        card.boost_clock_mhz = Some(2400);
        card.price_usd = Some(329.0);
        card.release_date = NaiveDate::from_ymd_opt(2022, 10, 5);

        let html = card_html(Backend::Document, &card);
        assert!(html.contains("2400 MHz"));
        assert!(html.contains("$329.00"));
        assert!(html.contains("Oct 5, 2022"));
    }

    #[test]
    fn zero_optionals_are_treated_as_absent() {
        let mut card = bare_card();
        card.boost_clock_mhz = Some(0);
        card.price_usd = Some(0.0);
        let html = card_html(Backend::Relational, &card);
        assert!(!html.contains("Boost Clock"));
        assert!(!html.contains("Price"));
    }

    #[test]
    fn actions_are_bound_to_card_id_and_backend() {
        let html = card_html(Backend::Document, &bare_card());
        assert!(html.contains(r#"data-action="edit" data-backend="mongodb" data-card-id="3""#));
        assert!(html.contains(r#"data-action="delete" data-backend="mongodb" data-card-id="3""#));
    }

    #[test]
    fn user_text_is_escaped() {
        let mut card = bare_card();
        card.name = "<script>alert('x')</script>".to_string();
        let html = card_html(Backend::Relational, &card);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));

        assert_eq!(
            error_html("a < b"),
            r#"<div class="empty-state"><h3>Error</h3><p>a &lt; b</p></div>"#
        );
    }
}
