use std::fmt;

use super::game::{Deal, GameDetail, GameId, GameSummary};

pub const SCORE_PLACEHOLDER: &str = "N/A";
pub const DEALS_HEADING: &str = "Ofertas disponibles:";
pub const DISMISS_LABEL: &str = "Cerrar";

/// A rendered search result. Clicking it opens the detail for `game_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultCard {
    pub game_id: GameId,
    pub thumb: String,
    pub title: String,
    pub price: String,
}

impl ResultCard {
    pub fn new(game: &GameSummary) -> ResultCard {
        ResultCard {
            game_id: game.game_id.clone(),
            thumb: game.thumb.clone(),
            title: game.external.clone(),
            price: format!("Precio: ${}", game.cheapest),
        }
    }
}

impl fmt::Display for ResultCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "    {}", self.price)?;
        write!(f, "    {}", self.thumb)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DealsSection {
    pub heading: String,
    pub lines: Vec<String>,
}

/// The expanded view of one game, built completely before it replaces the
/// panel currently shown.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailPanel {
    pub title: String,
    pub thumb: String,
    pub score: String,
    pub deals: Option<DealsSection>,
    pub dismiss_label: String,
}

impl DetailPanel {
    pub fn new(detail: &GameDetail) -> DetailPanel {
        let deals = if detail.deals.is_empty() {
            None
        } else {
            Some(DealsSection {
                heading: DEALS_HEADING.to_string(),
                lines: detail.deals.iter().map(deal_line).collect(),
            })
        };

        DetailPanel {
            title: detail.info.title.clone(),
            thumb: detail.info.thumb.clone(),
            score: format!(
                "Metacritic Score: {}",
                score_text(detail.info.metacritic_score.as_deref())
            ),
            deals,
            dismiss_label: DISMISS_LABEL.to_string(),
        }
    }
}

fn deal_line(deal: &Deal) -> String {
    format!("Tienda: {} - Precio: ${}", deal.store_id, deal.price)
}

// Absent, empty and zero scores all mean there is no review score
fn score_text(score: Option<&str>) -> &str {
    match score.map(str::trim) {
        Some(s) if !s.is_empty() && s.parse::<f64>().map_or(true, |n| n != 0.0) => s,
        _ => SCORE_PLACEHOLDER,
    }
}

impl fmt::Display for DetailPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.title)?;
        writeln!(f, "{}", self.thumb)?;
        writeln!(f, "{}", self.score)?;

        if let Some(deals) = &self.deals {
            writeln!(f, "{}", deals.heading)?;
            for line in &deals.lines {
                writeln!(f, "  {}", line)?;
            }
        }

        write!(f, "[{}]", self.dismiss_label)
    }
}
