//! Profit and stock reports.
//!
//! Both reports are plain aggregations over the rows already read from the
//! sheet. Cancelled sales and cancelled purchases never count.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::models::{Product, Purchase, Sale, margin_percent, parse_sheet_date};
use crate::types::currency::round_cents;

/// Month bucket for sales whose date cannot be parsed.
pub const UNDATED_MONTH: &str = "sem data";

/// Totals for one group of sales.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SalesSummary {
    pub count: usize,
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
}

impl SalesSummary {
    fn add(&mut self, sale: &Sale) {
        self.count += 1;
        self.revenue += sale.amounts.received;
        self.cost += sale.amounts.cost;
        self.profit = self.revenue - self.cost;
    }

    fn rounded(mut self) -> Self {
        self.revenue = round_cents(self.revenue);
        self.cost = round_cents(self.cost);
        self.profit = round_cents(self.profit);
        self
    }

    /// Profit over revenue, in percent.
    #[must_use]
    pub fn margin_percent(&self) -> f64 {
        round_cents(margin_percent(self.profit, self.revenue))
    }
}

/// Sales grouped under a label (a platform or a month).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportGroup {
    pub label: String,
    pub summary: SalesSummary,
}

/// Profit over all non-cancelled sales.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfitReport {
    pub totals: SalesSummary,
    /// Profit over revenue, in percent; 0 without revenue.
    pub average_margin_percent: f64,
    /// Spent on non-cancelled purchases.
    pub purchases_total: f64,
    /// Sorted by revenue, highest first.
    pub by_platform: Vec<ReportGroup>,
    /// Keyed `YYYY-MM`, ascending, with [`UNDATED_MONTH`] last.
    pub by_month: Vec<ReportGroup>,
}

impl ProfitReport {
    /// Aggregate sales and purchases.
    #[must_use]
    pub fn build(sales: &[Sale], purchases: &[Purchase]) -> Self {
        let mut totals = SalesSummary::default();
        let mut platforms: HashMap<String, SalesSummary> = HashMap::new();
        let mut months: BTreeMap<String, SalesSummary> = BTreeMap::new();
        let mut undated = SalesSummary::default();

        for sale in sales.iter().filter(|s| !s.status.is_cancelled()) {
            totals.add(sale);
            platforms
                .entry(platform_label(sale))
                .or_default()
                .add(sale);
            match month_key(&sale.date) {
                Some(month) => months.entry(month).or_default().add(sale),
                None => undated.add(sale),
            }
        }

        let mut by_platform: Vec<ReportGroup> = platforms
            .into_iter()
            .map(|(label, summary)| ReportGroup {
                label,
                summary: summary.rounded(),
            })
            .collect();
        by_platform.sort_by(|a, b| {
            b.summary
                .revenue
                .total_cmp(&a.summary.revenue)
                .then_with(|| a.label.cmp(&b.label))
        });

        let mut by_month: Vec<ReportGroup> = months
            .into_iter()
            .map(|(label, summary)| ReportGroup {
                label,
                summary: summary.rounded(),
            })
            .collect();
        if undated.count > 0 {
            by_month.push(ReportGroup {
                label: UNDATED_MONTH.to_string(),
                summary: undated.rounded(),
            });
        }

        let purchases_total = purchases
            .iter()
            .filter(|p| !p.status.is_cancelled())
            .map(Purchase::total_cost)
            .sum();

        let totals = totals.rounded();
        Self {
            average_margin_percent: totals.margin_percent(),
            totals,
            purchases_total: round_cents(purchases_total),
            by_platform,
            by_month,
        }
    }
}

fn platform_label(sale: &Sale) -> String {
    let label = sale.platform.label().trim();
    if label.is_empty() {
        crate::types::Platform::Unspecified.label().to_string()
    } else {
        label.to_string()
    }
}

/// `YYYY-MM` for a sheet date.
#[must_use]
pub fn month_key(date: &str) -> Option<String> {
    parse_sheet_date(date).map(|d| d.format("%Y-%m").to_string())
}

/// Stock position of one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockLine {
    /// Empty for rows that reference a product not in the catalog.
    pub product_id: String,
    pub product_name: String,
    /// Units from purchases marked received.
    pub received: i64,
    /// Units ordered or in transit.
    pub incoming: i64,
    /// Non-cancelled sales; each sale row is one unit.
    pub sold: i64,
    /// `received - sold`. Negative means more was sold than booked in.
    pub on_hand: i64,
}

impl StockLine {
    fn new(product_id: String, product_name: String) -> Self {
        Self {
            product_id,
            product_name,
            received: 0,
            incoming: 0,
            sold: 0,
            on_hand: 0,
        }
    }
}

/// Per-product stock position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StockReport {
    /// Catalog products first, in catalog order, then unknown products in the
    /// order they first appear.
    pub lines: Vec<StockLine>,
}

impl StockReport {
    /// Tally purchases and sales against the catalog.
    #[must_use]
    pub fn build(products: &[Product], purchases: &[Purchase], sales: &[Sale]) -> Self {
        let mut ledger = StockLedger::default();
        for product in products {
            ledger.line(&product.id, &product.name);
        }

        for purchase in purchases {
            let qty = i64::from(purchase.quantity);
            let line = ledger.line(&purchase.product_id, &purchase.product_name);
            if purchase.status.is_received() {
                line.received += qty;
            } else if purchase.status.is_pending() {
                line.incoming += qty;
            }
        }

        for sale in sales.iter().filter(|s| !s.status.is_cancelled()) {
            ledger.line(&sale.product_id, &sale.product_name).sold += 1;
        }

        let mut lines = ledger.lines;
        for line in &mut lines {
            line.on_hand = line.received - line.sold;
        }
        Self { lines }
    }

    /// Units on hand across all products.
    #[must_use]
    pub fn total_on_hand(&self) -> i64 {
        self.lines.iter().map(|l| l.on_hand).sum()
    }

    /// Lines with nothing on hand.
    pub fn out_of_stock(&self) -> impl Iterator<Item = &StockLine> {
        self.lines.iter().filter(|l| l.on_hand <= 0)
    }
}

#[derive(Default)]
struct StockLedger {
    lines: Vec<StockLine>,
    by_id: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
}

impl StockLedger {
    /// Find the line for a product, by catalog ID first and name second,
    /// creating it when neither matches.
    fn line(&mut self, id: &str, name: &str) -> &mut StockLine {
        let name_key = name.trim().to_lowercase();
        let existing = self
            .by_id
            .get(id)
            .filter(|_| !id.is_empty())
            .or_else(|| self.by_name.get(&name_key))
            .copied();

        let index = existing.unwrap_or_else(|| {
            self.lines
                .push(StockLine::new(id.to_string(), name.trim().to_string()));
            let index = self.lines.len() - 1;
            if !id.is_empty() {
                self.by_id.insert(id.to_string(), index);
            }
            self.by_name.entry(name_key).or_insert(index);
            index
        });
        &mut self.lines[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SaleAmounts;
    use crate::types::{Platform, PurchaseStatus, SaleStatus};

    fn sale(id: &str, status: SaleStatus, platform: Platform, date: &str, cost: f64, received: f64) -> Sale {
        Sale {
            order_code: String::new(),
            product_id: id.to_string(),
            product_name: format!("Perfume {id}"),
            status,
            amounts: SaleAmounts::compute(cost, 0.0, received),
            date: date.to_string(),
            platform,
            contact: None,
            notes: None,
        }
    }

    fn purchase(id: &str, status: PurchaseStatus, quantity: u32, unit_cost: f64) -> Purchase {
        Purchase {
            order_code: String::new(),
            date: String::new(),
            arrival_date: None,
            product_id: id.to_string(),
            product_name: format!("Perfume {id}"),
            quantity,
            unit_cost,
            supplier: None,
            status,
            notes: None,
        }
    }

    fn product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Perfume {id}"),
            standard_cost: 0.0,
            sale_price: 0.0,
            image_url: None,
        }
    }

    #[test]
    fn test_profit_report_excludes_cancelled_sales() {
        let sales = vec![
            sale("1", SaleStatus::Paid, Platform::Instagram, "05/01/2026", 100.0, 150.0),
            sale("1", SaleStatus::Cancelled, Platform::Instagram, "06/01/2026", 100.0, 150.0),
            sale("2", SaleStatus::Delivered, Platform::WhatsApp, "10/02/2026", 200.0, 300.0),
        ];
        let report = ProfitReport::build(&sales, &[]);

        assert_eq!(report.totals.count, 2);
        assert!((report.totals.revenue - 450.0).abs() < 1e-9);
        assert!((report.totals.profit - 150.0).abs() < 1e-9);
        assert!((report.average_margin_percent - 33.33).abs() < 1e-9);
    }

    #[test]
    fn test_profit_report_without_revenue() {
        let report = ProfitReport::build(&[], &[]);
        assert_eq!(report.totals.count, 0);
        assert!(report.average_margin_percent.abs() < f64::EPSILON);
        assert!(report.by_platform.is_empty());
    }

    #[test]
    fn test_platforms_sorted_by_revenue() {
        let sales = vec![
            sale("1", SaleStatus::Paid, Platform::Instagram, "", 10.0, 50.0),
            sale("2", SaleStatus::Paid, Platform::MercadoLivre, "", 10.0, 400.0),
            sale("3", SaleStatus::Paid, Platform::Instagram, "", 10.0, 60.0),
        ];
        let report = ProfitReport::build(&sales, &[]);
        let labels: Vec<&str> = report.by_platform.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["Mercado Livre", "Instagram"]);
        assert_eq!(report.by_platform[1].summary.count, 2);
    }

    #[test]
    fn test_months_ascending_with_undated_last() {
        let sales = vec![
            sale("1", SaleStatus::Paid, Platform::Site, "03/02/2026", 1.0, 2.0),
            sale("1", SaleStatus::Paid, Platform::Site, "", 1.0, 2.0),
            sale("1", SaleStatus::Paid, Platform::Site, "28/12/2025 19:00", 1.0, 2.0),
        ];
        let report = ProfitReport::build(&sales, &[]);
        let labels: Vec<&str> = report.by_month.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["2025-12", "2026-02", UNDATED_MONTH]);
    }

    #[test]
    fn test_purchases_total_skips_cancelled() {
        let purchases = vec![
            purchase("1", PurchaseStatus::Received, 2, 50.0),
            purchase("1", PurchaseStatus::Cancelled, 10, 50.0),
            purchase("2", PurchaseStatus::InTransit, 1, 80.5),
        ];
        let report = ProfitReport::build(&[], &purchases);
        assert!((report.purchases_total - 180.5).abs() < 1e-9);
    }

    #[test]
    fn test_stock_on_hand_is_received_minus_sold() {
        let products = vec![product("1"), product("2")];
        let purchases = vec![
            purchase("1", PurchaseStatus::Received, 3, 10.0),
            purchase("1", PurchaseStatus::Ordered, 5, 10.0),
            purchase("2", PurchaseStatus::Cancelled, 4, 10.0),
        ];
        let sales = vec![
            sale("1", SaleStatus::Paid, Platform::Site, "", 0.0, 0.0),
            sale("1", SaleStatus::Cancelled, Platform::Site, "", 0.0, 0.0),
            sale("2", SaleStatus::Reserved, Platform::Site, "", 0.0, 0.0),
        ];
        let report = StockReport::build(&products, &purchases, &sales);

        let first = &report.lines[0];
        assert_eq!((first.received, first.incoming, first.sold, first.on_hand), (3, 5, 1, 2));
        let second = &report.lines[1];
        assert_eq!((second.received, second.sold, second.on_hand), (0, 1, -1));
        assert_eq!(report.total_on_hand(), 1);
        assert_eq!(report.out_of_stock().count(), 1);
    }

    #[test]
    fn test_unknown_products_grouped_by_name() {
        let mut first = sale("", SaleStatus::Paid, Platform::Site, "", 0.0, 0.0);
        first.product_name = "Amostra 5ml".to_string();
        let mut second = first.clone();
        second.product_name = "amostra 5ml ".to_string();

        let report = StockReport::build(&[product("1")], &[], &[first, second]);
        assert_eq!(report.lines.len(), 2);
        assert_eq!(report.lines[1].product_name, "Amostra 5ml");
        assert_eq!(report.lines[1].sold, 2);
        assert_eq!(report.lines[1].product_id, "");
    }

    #[test]
    fn test_month_key() {
        assert_eq!(month_key("18/10/2026").as_deref(), Some("2026-10"));
        assert_eq!(month_key("n/a"), None);
    }
}
