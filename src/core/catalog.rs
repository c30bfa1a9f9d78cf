use super::types::{CatalogItem, HistoricalReturns, RiskTier};

pub const CATEGORY_ELSS: &str = "ELSS (Tax Saving)";
pub const CATEGORY_EQUITY_SIP: &str = "Equity SIP";
pub const CATEGORY_DEBT: &str = "Debt Fund";
pub const CATEGORY_PPF: &str = "PPF";
pub const CATEGORY_NPS: &str = "NPS";

const LOW_RISK_NPS_MIN_SAVINGS: f64 = 3_000.0;
const HIGH_RISK_NPS_MIN_SAVINGS: f64 = 5_000.0;

const fn returns(y3: f64, y5: f64, y10: f64) -> HistoricalReturns {
    HistoricalReturns { y3, y5, y10 }
}

static CATALOG: [CatalogItem; 8] = [
    CatalogItem {
        id: "elss1",
        name: "ELSS Tax Saver Growth",
        category: CATEGORY_ELSS,
        risk: RiskTier::Medium,
        historical: returns(17.2, 15.1, 13.4),
        expense_ratio: 0.9,
        lock_in: "3 yrs",
        tax_benefit: Some("80C up to ₹1.5L"),
        min_sip: 500,
        rating: 5,
        affiliate_url: "#",
        blurb: "Equity-linked savings with Section 80C tax benefits.",
    },
    CatalogItem {
        id: "elss2",
        name: "ELSS Flexi Equity",
        category: CATEGORY_ELSS,
        risk: RiskTier::Medium,
        historical: returns(16.1, 14.5, 12.8),
        expense_ratio: 1.1,
        lock_in: "3 yrs",
        tax_benefit: Some("80C up to ₹1.5L"),
        min_sip: 500,
        rating: 4,
        affiliate_url: "#",
        blurb: "Diversified ELSS suitable for salaried investors.",
    },
    CatalogItem {
        id: "eq1",
        name: "Bluechip Equity SIP",
        category: CATEGORY_EQUITY_SIP,
        risk: RiskTier::High,
        historical: returns(18.5, 16.3, 14.1),
        expense_ratio: 0.8,
        lock_in: "None",
        tax_benefit: None,
        min_sip: 1000,
        rating: 5,
        affiliate_url: "#",
        blurb: "Large-cap focused for stability with growth.",
    },
    CatalogItem {
        id: "eq2",
        name: "Flexicap Growth SIP",
        category: CATEGORY_EQUITY_SIP,
        risk: RiskTier::High,
        historical: returns(20.2, 17.4, 15.0),
        expense_ratio: 1.0,
        lock_in: "None",
        tax_benefit: None,
        min_sip: 1000,
        rating: 4,
        affiliate_url: "#",
        blurb: "Dynamic allocation across market caps.",
    },
    CatalogItem {
        id: "debt1",
        name: "Corporate Bond Fund",
        category: CATEGORY_DEBT,
        risk: RiskTier::Low,
        historical: returns(7.4, 7.1, 7.0),
        expense_ratio: 0.4,
        lock_in: "None",
        tax_benefit: None,
        min_sip: 500,
        rating: 4,
        affiliate_url: "#",
        blurb: "Quality corporate papers for steady income.",
    },
    CatalogItem {
        id: "debt2",
        name: "Short Duration Debt",
        category: CATEGORY_DEBT,
        risk: RiskTier::Low,
        historical: returns(6.8, 6.9, 6.7),
        expense_ratio: 0.35,
        lock_in: "None",
        tax_benefit: None,
        min_sip: 500,
        rating: 4,
        affiliate_url: "#",
        blurb: "Lower interest-rate risk; good for parking surplus.",
    },
    CatalogItem {
        id: "ppf",
        name: "PPF (Public Provident Fund)",
        category: CATEGORY_PPF,
        risk: RiskTier::Low,
        historical: returns(7.1, 7.1, 7.7),
        expense_ratio: 0.0,
        lock_in: "15 yrs (partial from 7th)",
        tax_benefit: Some("80C + EEE"),
        min_sip: 500,
        rating: 5,
        affiliate_url: "#",
        blurb: "Govt-backed, tax-free compounding; long-term.",
    },
    CatalogItem {
        id: "nps1",
        name: "NPS Tier I (Auto Choice)",
        category: CATEGORY_NPS,
        risk: RiskTier::Medium,
        historical: returns(10.5, 9.8, 9.2),
        expense_ratio: 0.1,
        lock_in: "Till retirement",
        tax_benefit: Some("80C + 80CCD(1B)"),
        min_sip: 500,
        rating: 4,
        affiliate_url: "#",
        blurb: "Lifecycle-based asset mix + additional tax benefit.",
    },
];

pub fn catalog() -> &'static [CatalogItem] {
    &CATALOG
}

/// Shortlists catalog products for a risk tier, best five-year performers
/// first within each category. NPS is only offered to low and high risk
/// savers above a monthly savings floor.
pub fn pick_plans(risk: RiskTier, monthly_savings: f64) -> Vec<CatalogItem> {
    let picks: &[(&str, usize)] = match risk {
        RiskTier::Low if monthly_savings >= LOW_RISK_NPS_MIN_SAVINGS => {
            &[(CATEGORY_DEBT, 2), (CATEGORY_PPF, 1), (CATEGORY_NPS, 1)]
        }
        RiskTier::Low => &[(CATEGORY_DEBT, 2), (CATEGORY_PPF, 1)],
        RiskTier::Medium => &[(CATEGORY_ELSS, 2), (CATEGORY_DEBT, 1), (CATEGORY_NPS, 1)],
        RiskTier::High if monthly_savings >= HIGH_RISK_NPS_MIN_SAVINGS => {
            &[(CATEGORY_EQUITY_SIP, 2), (CATEGORY_ELSS, 1), (CATEGORY_NPS, 1)]
        }
        RiskTier::High => &[(CATEGORY_EQUITY_SIP, 2), (CATEGORY_ELSS, 1)],
    };

    let mut shortlist: Vec<CatalogItem> = Vec::new();
    for &(category, count) in picks {
        for item in top_in_category(category, count) {
            if !shortlist.iter().any(|picked| picked.id == item.id) {
                shortlist.push(item.clone());
            }
        }
    }
    shortlist
}

fn top_in_category(category: &str, count: usize) -> Vec<&'static CatalogItem> {
    let mut items: Vec<&'static CatalogItem> = CATALOG
        .iter()
        .filter(|item| item.category == category)
        .collect();
    items.sort_by(|a, b| b.historical.y5.total_cmp(&a.historical.y5));
    items.truncate(count);
    items
}
