use std::cmp::Ordering;

use crate::features::transactions::{CategoryTotal, MonthlyTrend};
use crate::period::{parse_month_key, short_month};

pub const STAT_CARDS: usize = 6;
pub const PIE_SLICES: usize = 5;
pub const TREND_MONTHS: usize = 6;
pub const PREVIEW_ITEMS: usize = 3;

#[derive(Clone, Debug, PartialEq)]
pub struct CategoryCard {
    pub icon: String,
    pub name: String,
    pub count: u32,
    pub amount: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PieSlice {
    pub name: String,
    pub value: f64,
    pub percentage: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrendPoint {
    pub month: String,
    pub income: f64,
    pub expense: f64,
}

pub fn category_cards(totals: &[CategoryTotal]) -> Vec<CategoryCard> {
    totals
        .iter()
        .take(STAT_CARDS)
        .map(|total| {
            let name = total.category_name.clone().filter(|n| !n.is_empty());
            CategoryCard {
                icon: name
                    .as_ref()
                    .and_then(|n| n.chars().next())
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "📦".to_string()),
                name: name.unwrap_or_else(|| "Otros".to_string()),
                count: total.count.unwrap_or(0),
                amount: total.total,
            }
        })
        .collect()
}

pub fn pie_slices(totals: &[CategoryTotal]) -> Vec<PieSlice> {
    let grand_total: f64 = totals.iter().map(|t| t.total).sum();
    let mut slices: Vec<PieSlice> = totals
        .iter()
        .filter(|t| t.total > 0.0)
        .map(|t| PieSlice {
            name: t.display_name(),
            value: t.total,
            percentage: if grand_total > 0.0 {
                t.total / grand_total * 100.0
            } else {
                0.0
            },
        })
        .collect();
    slices.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
    slices.truncate(PIE_SLICES);
    slices
}

fn trend_point(trend: &MonthlyTrend) -> TrendPoint {
    TrendPoint {
        month: parse_month_key(&trend.month)
            .map(|m| short_month(m).to_string())
            .unwrap_or_else(|| trend.month.clone()),
        income: trend.income,
        expense: trend.expense,
    }
}

pub fn recent_trends(trends: &[MonthlyTrend]) -> Vec<TrendPoint> {
    let skip = trends.len().saturating_sub(TREND_MONTHS);
    trends[skip..].iter().map(trend_point).collect()
}

pub fn capped_percent(current: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }
    (current / target * 100.0).min(100.0)
}

pub fn progress_color(percentage: f64, inverse: bool) -> &'static str {
    if inverse {
        if percentage >= 100.0 {
            "bg-red-500"
        } else if percentage >= 90.0 {
            "bg-yellow-500"
        } else if percentage >= 75.0 {
            "bg-yellow-400"
        } else {
            "bg-green-500"
        }
    } else if percentage >= 100.0 {
        "bg-green-500"
    } else if percentage >= 75.0 {
        "bg-green-400"
    } else if percentage >= 50.0 {
        "bg-yellow-400"
    } else {
        "bg-red-500"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn totals() -> Vec<CategoryTotal> {
        serde_json::from_value(json!([
            {"category": 1, "categoryName": "Comida", "total": 100, "count": 3},
            {"category": 2, "categoryName": "Hogar", "total": 300},
            {"category": 3, "total": 0},
            {"category": 4, "categoryName": "Ocio", "total": 50},
            {"category": 5, "categoryName": "Salud", "total": 25},
            {"category": 6, "categoryName": "Ropa", "total": 15},
            {"category": 7, "categoryName": "Regalos", "total": 10}
        ]))
        .unwrap()
    }

    #[test]
    fn pie_keeps_top_five_positive_sorted() {
        let slices = pie_slices(&totals());
        assert_eq!(slices.len(), 5);
        assert_eq!(slices[0].name, "Hogar");
        assert_eq!(slices[0].percentage, 60.0);
        assert_eq!(slices[4].name, "Ropa");
        assert!(slices.iter().all(|s| s.value > 0.0));
    }

    #[test]
    fn cards_keep_server_order_and_fallbacks() {
        let cards = category_cards(&totals());
        assert_eq!(cards.len(), 6);
        assert_eq!(cards[0].icon, "C");
        assert_eq!(cards[0].count, 3);
        assert_eq!(cards[2].name, "Otros");
        assert_eq!(cards[2].icon, "📦");
    }

    #[test]
    fn trends_keep_last_six_months() {
        let trends: Vec<MonthlyTrend> = (1..=8)
            .map(|m| MonthlyTrend {
                month: format!("2024-{:02}", m),
                income: m as f64,
                expense: 0.0,
            })
            .collect();
        let recent = recent_trends(&trends);
        assert_eq!(recent.len(), 6);
        assert_eq!(recent[0].month, "mar");
        assert_eq!(recent[5].income, 8.0);
    }

    #[test]
    fn colour_thresholds() {
        assert_eq!(progress_color(100.0, false), "bg-green-500");
        assert_eq!(progress_color(80.0, false), "bg-green-400");
        assert_eq!(progress_color(50.0, false), "bg-yellow-400");
        assert_eq!(progress_color(49.9, false), "bg-red-500");
        assert_eq!(progress_color(100.0, true), "bg-red-500");
        assert_eq!(progress_color(95.0, true), "bg-yellow-500");
        assert_eq!(progress_color(75.0, true), "bg-yellow-400");
        assert_eq!(progress_color(10.0, true), "bg-green-500");
        assert_eq!(capped_percent(150.0, 100.0), 100.0);
        assert_eq!(capped_percent(1.0, 0.0), 0.0);
    }
}
