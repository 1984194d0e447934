use analysis_core::{
    AnalysisError, AssetKind, AssetMetadata, CryptoMetrics, CryptoProfile, EquityMetrics,
    FinancialMetrics, StockProfile,
};
use serde_json::Value;

/// Modules requested from the quoteSummary endpoint
pub(crate) const SUMMARY_MODULES: &str =
    "assetProfile,price,summaryDetail,defaultKeyStatistics,financialData";

/// One quoteSummary result, split into its modules.
#[derive(Debug, Default)]
pub(crate) struct QuoteSummary {
    asset_profile: Value,
    price: Value,
    summary_detail: Value,
    key_statistics: Value,
    financial_data: Value,
}

impl QuoteSummary {
    /// Extract the first result. `Ok(None)` when Yahoo returned no result.
    pub fn from_response(json: &Value) -> Result<Option<Self>, AnalysisError> {
        let body = json
            .get("quoteSummary")
            .ok_or_else(|| AnalysisError::InvalidData("missing quoteSummary".to_string()))?;

        if let Some(err) = body.get("error").filter(|e| !e.is_null()) {
            let code = err.get("code").and_then(Value::as_str).unwrap_or("unknown");
            if code.eq_ignore_ascii_case("Not Found") {
                return Ok(None);
            }
            return Err(AnalysisError::ApiError(format!(
                "quoteSummary {}: {}",
                code,
                err.get("description").and_then(Value::as_str).unwrap_or_default()
            )));
        }

        let Some(result) = body
            .get("result")
            .and_then(Value::as_array)
            .and_then(|arr| arr.first())
        else {
            return Ok(None);
        };

        let module = |name: &str| result.get(name).cloned().unwrap_or(Value::Null);
        Ok(Some(Self {
            asset_profile: module("assetProfile"),
            price: module("price"),
            summary_detail: module("summaryDetail"),
            key_statistics: module("defaultKeyStatistics"),
            financial_data: module("financialData"),
        }))
    }

    /// Profile shaped by asset kind; `None` when every attribute is missing.
    pub fn metadata(&self, kind: AssetKind) -> Option<AssetMetadata> {
        let name = text(&self.price, "longName").or_else(|| text(&self.price, "shortName"));
        let market_cap = num(&self.price, "marketCap").or_else(|| num(&self.summary_detail, "marketCap"));

        match kind {
            AssetKind::Stock => {
                let profile = StockProfile {
                    name,
                    sector: text(&self.asset_profile, "sector"),
                    industry: text(&self.asset_profile, "industry"),
                    country: text(&self.asset_profile, "country"),
                    exchange: text(&self.price, "exchangeName").or_else(|| text(&self.price, "exchange")),
                    market_cap,
                    employees: num(&self.asset_profile, "fullTimeEmployees")
                        .filter(|v| *v >= 0.0)
                        .map(|v| v as u64),
                    website: text(&self.asset_profile, "website"),
                    business_summary: text(&self.asset_profile, "longBusinessSummary"),
                };
                let empty = profile.name.is_none()
                    && profile.sector.is_none()
                    && profile.industry.is_none()
                    && profile.market_cap.is_none()
                    && profile.business_summary.is_none();
                (!empty).then_some(AssetMetadata::Stock(profile))
            }
            AssetKind::Crypto => {
                let profile = CryptoProfile {
                    name,
                    market_cap,
                    volume_24h: num(&self.summary_detail, "volume24Hr"),
                    circulating_supply: num(&self.summary_detail, "circulatingSupply"),
                    description: text(&self.asset_profile, "description")
                        .or_else(|| text(&self.asset_profile, "longBusinessSummary")),
                };
                let empty = profile.name.is_none()
                    && profile.market_cap.is_none()
                    && profile.volume_24h.is_none()
                    && profile.circulating_supply.is_none()
                    && profile.description.is_none();
                (!empty).then_some(AssetMetadata::Crypto(profile))
            }
        }
    }

    /// Ratios shaped by asset kind; `None` when there is no price and no ratio at all.
    pub fn metrics(&self, kind: AssetKind) -> Option<FinancialMetrics> {
        let sd = &self.summary_detail;
        let ks = &self.key_statistics;
        let fd = &self.financial_data;
        let price = &self.price;

        match kind {
            AssetKind::Stock => {
                let m = EquityMetrics {
                    current_price: num(fd, "currentPrice").or_else(|| num(price, "regularMarketPrice")),
                    trailing_pe: num(sd, "trailingPE"),
                    dividend_yield: num(sd, "dividendYield"),
                    fifty_two_week_high: num(sd, "fiftyTwoWeekHigh"),
                    fifty_two_week_low: num(sd, "fiftyTwoWeekLow"),
                    trailing_eps: num(ks, "trailingEps"),
                    price_to_book: num(ks, "priceToBook"),
                    return_on_equity: num(fd, "returnOnEquity"),
                    profit_margins: num(fd, "profitMargins").or_else(|| num(ks, "profitMargins")),
                    debt_to_equity: num(fd, "debtToEquity"),
                    revenue_growth: num(fd, "revenueGrowth"),
                    gross_margins: num(fd, "grossMargins"),
                    operating_margins: num(fd, "operatingMargins"),
                    quick_ratio: num(fd, "quickRatio"),
                    current_ratio: num(fd, "currentRatio"),
                    beta: num(sd, "beta").or_else(|| num(ks, "beta")),
                    shares_outstanding: num(ks, "sharesOutstanding"),
                    book_value: num(ks, "bookValue"),
                    target_mean_price: num(fd, "targetMeanPrice"),
                };
                let empty = m.current_price.is_none()
                    && m.trailing_pe.is_none()
                    && m.trailing_eps.is_none()
                    && m.fifty_two_week_high.is_none();
                (!empty).then_some(FinancialMetrics::Equity(m))
            }
            AssetKind::Crypto => {
                let m = CryptoMetrics {
                    current_price: num(price, "regularMarketPrice"),
                    change_24h: num(price, "regularMarketChangePercent"),
                    volume_24h: num(sd, "volume24Hr"),
                    volume: num(sd, "volume").or_else(|| num(price, "regularMarketVolume")),
                    market_cap: num(price, "marketCap").or_else(|| num(sd, "marketCap")),
                    circulating_supply: num(sd, "circulatingSupply"),
                    fifty_two_week_high: num(sd, "fiftyTwoWeekHigh"),
                    fifty_two_week_low: num(sd, "fiftyTwoWeekLow"),
                    max_supply: num(sd, "maxSupply"),
                    total_supply: num(sd, "totalSupply"),
                    average_volume_10d: num(sd, "averageDailyVolume10Day")
                        .or_else(|| num(price, "averageDailyVolume10Day")),
                    average_volume_3m: num(price, "averageDailyVolume3Month")
                        .or_else(|| num(sd, "averageVolume")),
                    market_dominance: num(sd, "marketDominance"),
                    beta: num(sd, "beta"),
                    ytd_return: num(ks, "ytdReturn"),
                };
                let empty = m.current_price.is_none() && m.market_cap.is_none() && m.volume_24h.is_none();
                (!empty).then_some(FinancialMetrics::Crypto(m))
            }
        }
    }
}

/// True when Yahoo refused the session crumb. The refusal arrives as
/// `{"finance": {"error": {"code": "Unauthorized", "description": "Invalid Crumb"}}}`,
/// sometimes under `quoteSummary` instead of `finance`.
pub(crate) fn is_crumb_rejection(json: &Value) -> bool {
    ["finance", "quoteSummary"]
        .iter()
        .filter_map(|envelope| json.get(envelope)?.get("error"))
        .any(|err| {
            let field = |name: &str| err.get(name).and_then(Value::as_str).unwrap_or_default().to_string();
            field("code").eq_ignore_ascii_case("Unauthorized")
                || field("description").to_ascii_lowercase().contains("invalid crumb")
        })
}

/// Yahoo numbers arrive either bare or as `{ "raw": n, "fmt": "..." }`.
/// An empty object means "no value".
fn num(module: &Value, key: &str) -> Option<f64> {
    let v = module.get(key)?;
    v.as_f64()
        .or_else(|| v.get("raw").and_then(Value::as_f64))
        .filter(|x| x.is_finite())
}

fn text(module: &Value, key: &str) -> Option<String> {
    module
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
